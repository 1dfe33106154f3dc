// src/pipeline.rs
//! Оркестратор: запускает фазы генерации строго по порядку
//!
//! водоёмы → рельеф → климат → реки → биомы → поселения
//!
//! Каждая фаза читает только поля, записанные предыдущими, поэтому порядок
//! менять нельзя. Все проверки выполняются до первой фазы; сами фазы не
//! возвращают ошибок.

use rand::Rng;

use crate::biome::assign_biomes;
use crate::climate::generate_climate;
use crate::config::GenerationParams;
use crate::elevation::{ElevationSummary, generate_elevation};
use crate::error::GenerationError;
use crate::graph::CellGraph;
use crate::rivers::{RiverSummary, generate_rivers};
use crate::settlement::place_settlements;
use crate::water::{WaterSummary, generate_water};

/// Сводка по всем фазам
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub water: WaterSummary,
    pub elevation: ElevationSummary,
    pub rivers: RiverSummary,
    pub settlements: usize,
}

/// Полностью аннотирует граф ячеек.
///
/// # Ошибки
/// [`GenerationError`], если параметры вне допустимых диапазонов или граф
/// нарушает предусловия (пустой, изолированная ячейка, несимметричная смежность).
pub fn generate_terrain<R: Rng + ?Sized>(
    graph: &mut CellGraph,
    params: &GenerationParams,
    rng: &mut R,
) -> Result<GenerationReport, GenerationError> {
    params.validate()?;
    graph.validate()?;

    log::info!(
        "генерация местности: {} ячеек, растр {}×{}",
        graph.len(),
        graph.width,
        graph.height
    );

    let water = generate_water(graph, params, rng);
    let elevation = generate_elevation(graph);
    generate_climate(graph, params, rng);
    let rivers = generate_rivers(graph, params, rng);
    assign_biomes(graph);
    let settlements = place_settlements(graph, params, rng).len();

    Ok(GenerationReport {
        water,
        elevation,
        rivers,
        settlements,
    })
}
