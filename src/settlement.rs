// src/settlement.rs
//! Размещение поселений
//!
//! Ячейки суши перебираются в случайном порядке. Каждая получает целочисленную
//! оценку привлекательности; поселение ставится с вероятностью `score / 100`.
//! Два поселения никогда не оказываются в соседних ячейках.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::GenerationParams;
use crate::graph::{CellGraph, CellId, Elevation, Moisture, Temperature};

/// Поселение; его положение — ячейка, к которой оно прикреплено
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub name: String,
}

/// Предел числа поселений: `city_modifier` на каждые полные 100 ячеек суши,
/// но не больше, чем есть названий.
#[must_use]
pub fn settlement_limit(land_cells: usize, city_modifier: f64, names: usize) -> usize {
    let by_density = (city_modifier * (land_cells / 100) as f64) as usize;
    by_density.min(names)
}

/// Размещает поселения и возвращает ячейки, где они появились.
pub fn place_settlements<R: Rng + ?Sized>(
    graph: &mut CellGraph,
    params: &GenerationParams,
    rng: &mut R,
) -> Vec<CellId> {
    let mut land: Vec<CellId> = graph.ids().filter(|&id| graph.cell(id).is_land()).collect();
    let limit = settlement_limit(land.len(), params.city_modifier, params.settlement_names.len());
    land.shuffle(rng);

    let mut placed = Vec::with_capacity(limit);
    for id in land {
        if placed.len() >= limit {
            break;
        }
        if graph.has_settlement_neighbor(id) {
            continue;
        }
        if settlement_score(graph, id) > rng.gen_range(0..100) {
            let name = params.settlement_names[placed.len()].clone();
            graph.cell_mut(id).settlement = Some(Settlement { name });
            placed.push(id);
        }
    }

    log::info!("поселения: {} из {limit} возможных", placed.len());
    placed
}

/// Оценка привлекательности ячейки для поселения.
///
/// Две строки таблиц намеренно «проваливаются» в соседний вариант:
/// `Scorching` получает 0, как `Cold`, а `Dry` получает и свой штраф −5,
/// и штраф `SuperDry` −20. На этих значениях откалибрована плотность поселений.
#[must_use]
pub fn settlement_score(graph: &CellGraph, id: CellId) -> i32 {
    let cell = graph.cell(id);

    let mut score = match cell.temperature {
        Temperature::Frigid => -30,
        Temperature::Cold | Temperature::Scorching => 0,
        Temperature::Average => 10,
        Temperature::Hot => 15,
    };

    score += match cell.moisture {
        Moisture::SuperWet | Moisture::Wet => 10,
        Moisture::Normal => 5,
        Moisture::Dry => -5 - 20,
        Moisture::SuperDry => -20,
        Moisture::Submerged => 0,
    };

    if cell.elevation == Elevation::MountainPeaks {
        score -= 30;
    }

    if graph.has_ocean_neighbor(id) {
        score += 40;
    } else if graph.has_lake_neighbor(id) {
        score += 20;
    }

    if cell.river {
        score += 30;
    } else if graph.has_river_neighbor(id) {
        score += 10;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WaterType;
    use crate::graph::builder::square_grid;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fertile_land(width: u32, height: u32) -> CellGraph {
        let mut graph = square_grid(width, height).unwrap();
        for id in graph.ids() {
            let cell = graph.cell_mut(id);
            cell.water = Some(WaterType::Land);
            cell.temperature = Temperature::Hot;
            cell.moisture = Moisture::Wet;
            cell.elevation = Elevation::Low;
            cell.river = true;
        }
        graph
    }

    fn named(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("Town{i}")).collect()
    }

    #[test]
    fn scores_follow_table() {
        let mut graph = fertile_land(3, 1);
        // Hot 15 + Wet 10 + река 30
        assert_eq!(settlement_score(&graph, CellId(1)), 55);

        graph.cell_mut(CellId(0)).water = Some(WaterType::Ocean);
        assert_eq!(settlement_score(&graph, CellId(1)), 95);

        let cell = graph.cell_mut(CellId(2));
        cell.moisture = Moisture::Dry;
        cell.temperature = Temperature::Scorching;
        cell.river = false;
        cell.elevation = Elevation::MountainPeaks;
        // Scorching 0 + Dry −25 + пики −30 + соседняя река 10
        assert_eq!(settlement_score(&graph, CellId(2)), -45);
    }

    #[test]
    fn settlements_are_never_adjacent() {
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut graph = fertile_land(30, 30);
            let params = GenerationParams {
                city_modifier: 20.0,
                settlement_names: named(500),
                ..GenerationParams::default()
            };
            let placed = place_settlements(&mut graph, &params, &mut rng);
            assert!(!placed.is_empty());
            for &id in &placed {
                assert!(!graph.has_settlement_neighbor(id), "поселение {id} рядом с другим");
            }
        }
    }

    #[test]
    fn limit_respects_density_and_names() {
        assert_eq!(settlement_limit(950, 2.0, 100), 18);
        assert_eq!(settlement_limit(950, 2.0, 5), 5);
        assert_eq!(settlement_limit(99, 10.0, 5), 0);
    }

    #[test]
    fn zero_limit_places_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut graph = fertile_land(10, 10);
        let params = GenerationParams {
            city_modifier: 0.0,
            ..GenerationParams::default()
        };
        assert!(place_settlements(&mut graph, &params, &mut rng).is_empty());

        let params = GenerationParams {
            settlement_names: Vec::new(),
            ..GenerationParams::default()
        };
        assert!(place_settlements(&mut graph, &params, &mut rng).is_empty());
    }

    #[test]
    fn names_are_handed_out_in_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut graph = fertile_land(20, 20);
        let params = GenerationParams {
            city_modifier: 3.0,
            settlement_names: named(12),
            ..GenerationParams::default()
        };
        let placed = place_settlements(&mut graph, &params, &mut rng);
        for (i, &id) in placed.iter().enumerate() {
            let name = &graph.cell(id).settlement.as_ref().unwrap().name;
            assert_eq!(name, &format!("Town{i}"));
        }
    }
}
