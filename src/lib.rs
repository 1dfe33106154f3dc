pub mod biome;
pub mod climate;
pub mod config;
pub mod elevation;
pub mod error;
pub mod export;
pub mod graph;
pub mod pipeline;
pub mod preview;
pub mod rivers;
pub mod settlement;
pub mod water;

pub use biome::Biome;
pub use config::{GenerationParams, LatitudeModel, WaterEdges};
pub use error::{ConfigError, ExportError, GenerationError};
pub use export::TerrainSnapshot;
pub use graph::{Cell, CellGraph, CellId, Elevation, Moisture, Temperature, WaterType};
pub use pipeline::{GenerationReport, generate_terrain};
pub use preview::{render_preview, save_preview};
pub use settlement::Settlement;
