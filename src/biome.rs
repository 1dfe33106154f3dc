use serde::{Deserialize, Serialize};

use crate::graph::{CellGraph, Elevation, Moisture, Temperature, WaterType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Lake,
    Ice,
    Glacier,
    Tundra,
    Taiga,
    TemperateForest,
    TropicalRainforest,
    Grassland,
    Savanna,
    Desert,
    Swamp,
    Mountain,
}

impl Biome {
    #[must_use]
    pub fn to_rgb(&self) -> [u8; 3] {
        match self {
            Biome::Ocean => [0, 64, 128],
            Biome::Lake => [40, 110, 180],
            Biome::Ice => [220, 220, 255],
            Biome::Glacier => [235, 245, 255],
            Biome::Tundra => [200, 220, 180],
            Biome::Taiga => [100, 150, 100],
            Biome::TemperateForest => [60, 120, 60],
            Biome::TropicalRainforest => [30, 100, 30],
            Biome::Grassland => [150, 200, 100],
            Biome::Savanna => [200, 180, 100],
            Biome::Desert => [200, 180, 120],
            Biome::Swamp => [80, 100, 60],
            Biome::Mountain => [150, 150, 150],
        }
    }
}

/// Биом по климату, высоте и типу воды. Чистая функция без состояния.
#[must_use]
pub fn classify(
    temperature: Temperature,
    moisture: Moisture,
    elevation: Elevation,
    water: WaterType,
) -> Biome {
    match water {
        WaterType::Ocean | WaterType::UnspecifiedWater => return Biome::Ocean,
        WaterType::Lake => return Biome::Lake,
        WaterType::Land => {}
    }

    if elevation == Elevation::MountainPeaks {
        // На пиках температура всегда Frigid, но оставляем различие на случай ручной правки
        return if temperature == Temperature::Frigid {
            Biome::Glacier
        } else {
            Biome::Mountain
        };
    }

    let dry = moisture < Moisture::Normal;
    match temperature {
        Temperature::Frigid => {
            if dry {
                Biome::Tundra
            } else {
                Biome::Ice
            }
        }
        Temperature::Cold => {
            if dry {
                Biome::Tundra
            } else {
                Biome::Taiga
            }
        }
        Temperature::Average => match moisture {
            Moisture::SuperDry | Moisture::Dry => Biome::Grassland,
            Moisture::Normal | Moisture::Wet => Biome::TemperateForest,
            Moisture::SuperWet | Moisture::Submerged => Biome::Swamp,
        },
        Temperature::Hot | Temperature::Scorching => match moisture {
            Moisture::SuperDry => Biome::Desert,
            Moisture::Dry if temperature == Temperature::Scorching => Biome::Desert,
            Moisture::Dry | Moisture::Normal => Biome::Savanna,
            Moisture::Wet | Moisture::SuperWet | Moisture::Submerged => Biome::TropicalRainforest,
        },
    }
}

/// Назначает биомы всем ячейкам
pub fn assign_biomes(graph: &mut CellGraph) {
    for id in graph.ids() {
        let cell = graph.cell_mut(id);
        let water = cell.water.unwrap_or(WaterType::Land);
        cell.biome = Some(classify(cell.temperature, cell.moisture, cell.elevation, water));
    }
    log::info!("биомы назначены");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_overrides_climate() {
        for t in [Temperature::Frigid, Temperature::Scorching] {
            assert_eq!(
                classify(t, Moisture::Submerged, Elevation::High, WaterType::Ocean),
                Biome::Ocean
            );
            assert_eq!(
                classify(t, Moisture::Submerged, Elevation::Low, WaterType::Lake),
                Biome::Lake
            );
        }
    }

    #[test]
    fn climate_table_samples() {
        use Elevation::{Low, MountainPeaks};
        use WaterType::Land;
        assert_eq!(classify(Temperature::Frigid, Moisture::Wet, MountainPeaks, Land), Biome::Glacier);
        assert_eq!(classify(Temperature::Cold, Moisture::Dry, Low, Land), Biome::Tundra);
        assert_eq!(classify(Temperature::Cold, Moisture::Wet, Low, Land), Biome::Taiga);
        assert_eq!(classify(Temperature::Average, Moisture::SuperWet, Low, Land), Biome::Swamp);
        assert_eq!(classify(Temperature::Scorching, Moisture::Dry, Low, Land), Biome::Desert);
        assert_eq!(classify(Temperature::Hot, Moisture::Dry, Low, Land), Biome::Savanna);
        assert_eq!(classify(Temperature::Hot, Moisture::Wet, Low, Land), Biome::TropicalRainforest);
    }

    #[test]
    fn classification_is_idempotent() {
        let mut graph = crate::graph::builder::square_grid(4, 4).unwrap();
        for id in graph.ids() {
            let cell = graph.cell_mut(id);
            cell.water = Some(WaterType::Land);
            cell.temperature = Temperature::from_ordinal((id.index() % 5) as i32).unwrap();
        }
        assign_biomes(&mut graph);
        let first: Vec<_> = graph.cells().iter().map(|c| c.biome).collect();
        assign_biomes(&mut graph);
        let second: Vec<_> = graph.cells().iter().map(|c| c.biome).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(Option::is_some));
    }
}
