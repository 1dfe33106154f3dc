// src/elevation.rs
//! Рельеф: расстояние до побережья и высотные пояса
//!
//! Поиск в ширину стартует от ячеек суши, касающихся океана, и проходит по
//! всем соседям (включая воду). Затем по глубине поиска, её максимуму и
//! среднему значению каждая достигнутая ячейка получает высотный пояс.

use std::collections::VecDeque;

use crate::graph::{CellGraph, CellId, Elevation, UNREACHED_OCEAN};

/// Итоги фазы рельефа
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElevationSummary {
    pub reached_cells: usize,
    pub max_distance: i32,
    pub average_distance: i32,
    /// Суша, до которой поиск не дошёл (внутренние карманы или карта без океана)
    pub unreached_land: usize,
}

pub fn generate_elevation(graph: &mut CellGraph) -> ElevationSummary {
    let reached = ocean_distance(graph);

    let mut summary = ElevationSummary {
        reached_cells: reached.len(),
        ..ElevationSummary::default()
    };

    if !reached.is_empty() {
        let distances = reached.iter().map(|&id| graph.cell(id).distance_to_ocean);
        summary.max_distance = distances.clone().max().unwrap_or(0);
        summary.average_distance = distances.sum::<i32>() / reached.len() as i32;

        for &id in &reached {
            let cell = graph.cell_mut(id);
            cell.elevation = band(
                cell.distance_to_ocean,
                summary.average_distance,
                summary.max_distance,
                cell.elevation,
            );
        }
    }

    // Недостигнутая суша считается максимально удалённой от берега
    for id in graph.ids() {
        let cell = graph.cell_mut(id);
        if cell.is_land() && cell.distance_to_ocean == UNREACHED_OCEAN {
            cell.elevation = Elevation::MountainPeaks;
            summary.unreached_land += 1;
        }
    }

    log::info!(
        "рельеф: достигнуто {} ячеек, max {}, avg {}, недостижимая суша {}",
        summary.reached_cells,
        summary.max_distance,
        summary.average_distance,
        summary.unreached_land
    );
    summary
}

/// Записывает `distance_to_ocean` и возвращает достигнутые ячейки в порядке обхода.
fn ocean_distance(graph: &mut CellGraph) -> Vec<CellId> {
    let mut visited = vec![false; graph.len()];
    let mut queue = VecDeque::new();
    let mut order = Vec::new();

    for id in graph.ids() {
        if graph.cell(id).is_land() && graph.has_ocean_neighbor(id) {
            graph.cell_mut(id).distance_to_ocean = 0;
            visited[id.index()] = true;
            queue.push_back(id);
        }
    }

    while let Some(id) = queue.pop_front() {
        order.push(id);
        let distance = graph.cell(id).distance_to_ocean + 1;
        let neighbors = graph.cell(id).neighbors.clone();
        for neighbor in neighbors {
            if !visited[neighbor.index()] {
                visited[neighbor.index()] = true;
                graph.cell_mut(neighbor).distance_to_ocean = distance;
                queue.push_back(neighbor);
            }
        }
    }
    order
}

/// Высотный пояс по расстоянию до берега
#[must_use]
pub fn band(distance: i32, average: i32, max: i32, current: Elevation) -> Elevation {
    if distance <= 2 {
        Elevation::Low
    } else if distance < average + 5 {
        Elevation::Medium
    } else if current != Elevation::MountainPeaks && distance < (max + 8 + average) / 2 {
        Elevation::High
    } else {
        Elevation::MountainPeaks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WaterType;
    use crate::graph::builder::square_grid;

    /// Полоса `width × 1`: первая ячейка — океан, остальное — суша
    fn strip(width: u32) -> CellGraph {
        let mut graph = square_grid(width, 1).unwrap();
        for id in graph.ids() {
            graph.cell_mut(id).water = Some(WaterType::Land);
        }
        graph.cell_mut(CellId(0)).water = Some(WaterType::Ocean);
        graph
    }

    #[test]
    fn coast_cells_start_at_zero() {
        let mut graph = strip(6);
        generate_elevation(&mut graph);
        assert_eq!(graph.cell(CellId(1)).distance_to_ocean, 0);
        assert_eq!(graph.cell(CellId(5)).distance_to_ocean, 4);
        // океан тоже достигается, через соседнюю сушу
        assert_eq!(graph.cell(CellId(0)).distance_to_ocean, 1);
    }

    #[test]
    fn distances_follow_bfs_layers() {
        let mut graph = square_grid(12, 9).unwrap();
        for id in graph.ids() {
            let (x, y) = graph.cell(id).center;
            graph.cell_mut(id).water = Some(if x == 0 || y == 0 {
                WaterType::Ocean
            } else {
                WaterType::Land
            });
        }
        generate_elevation(&mut graph);

        for (id, cell) in graph.iter() {
            let d = cell.distance_to_ocean;
            assert!(d >= 0, "ячейка {id} не достигнута");
            if cell.is_land() && graph.has_ocean_neighbor(id) {
                assert_eq!(d, 0);
            } else {
                let nearest = graph.neighbors(id).map(|n| n.distance_to_ocean).min().unwrap();
                assert_eq!(d, nearest + 1, "ячейка {id}");
            }
        }
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(band(2, 3, 10, Elevation::Water), Elevation::Low);
        assert_eq!(band(7, 3, 10, Elevation::Water), Elevation::Medium);
        assert_eq!(band(8, 3, 20, Elevation::Water), Elevation::High);
        assert_eq!(band(8, 3, 20, Elevation::MountainPeaks), Elevation::MountainPeaks);
        assert_eq!(band(19, 3, 20, Elevation::Water), Elevation::MountainPeaks);
    }

    #[test]
    fn long_strip_reaches_mountains() {
        let mut graph = strip(40);
        let summary = generate_elevation(&mut graph);
        assert_eq!(summary.max_distance, 38);
        assert_eq!(graph.cell(CellId(2)).elevation, Elevation::Low);
        assert_eq!(graph.cell(CellId(39)).elevation, Elevation::MountainPeaks);
    }

    #[test]
    fn land_without_ocean_becomes_peaks() {
        let mut graph = square_grid(4, 4).unwrap();
        for id in graph.ids() {
            graph.cell_mut(id).water = Some(WaterType::Land);
        }
        let summary = generate_elevation(&mut graph);
        assert_eq!(summary.reached_cells, 0);
        assert_eq!(summary.unreached_land, 16);
        for cell in graph.cells() {
            assert_eq!(cell.elevation, Elevation::MountainPeaks);
            assert_eq!(cell.distance_to_ocean, UNREACHED_OCEAN);
        }
    }
}
