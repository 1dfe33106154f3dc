// src/water.rs
//! Генерация водоёмов: океан, озёра и поле расстояний до озёр
//!
//! Порядок шагов:
//! 1. Ячейки на «водных» краях карты помечаются как `UnspecifiedWater`
//! 2. Заливка океана в ширину от угловых (и случайных серединных) ячеек
//! 3. Случайные затравки озёр вдали от побережья
//! 4. Самоограничивающийся рост озёр
//! 5. Поиск в ширину от озёр по суше — `distance_to_lake`

use std::collections::VecDeque;

use rand::Rng;

use crate::config::{GenerationParams, WaterEdges};
use crate::graph::{CellGraph, CellId, WaterType};

/// Итоги фазы водоёмов
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaterSummary {
    pub ocean_cells: usize,
    pub lake_cells: usize,
    pub lake_seeds: usize,
    pub land_cells: usize,
}

pub fn generate_water<R: Rng + ?Sized>(
    graph: &mut CellGraph,
    params: &GenerationParams,
    rng: &mut R,
) -> WaterSummary {
    mark_border_water(graph, params.water_edges);
    let ocean_cells = create_ocean(graph, params, rng);

    let land: Vec<CellId> = graph.ids().filter(|&id| graph.cell(id).is_land()).collect();
    let lake_limit = lake_limit(land.len(), params.lake_count_modifier);
    let seeds = seed_lakes(graph, &land, lake_limit, rng);
    let lake_seeds = seeds.len();
    expand_lakes(graph, seeds, lake_limit, params);
    set_lake_distance(graph);

    let summary = WaterSummary {
        ocean_cells,
        lake_cells: graph.count_water(WaterType::Lake),
        lake_seeds,
        land_cells: graph.land_cell_count(),
    };
    log::info!(
        "водоёмы: океан {}, озёра {} ({} затравок), суша {}",
        summary.ocean_cells,
        summary.lake_cells,
        summary.lake_seeds,
        summary.land_cells
    );
    summary
}

fn mark_border_water(graph: &mut CellGraph, edges: WaterEdges) {
    let (width, height) = (graph.width, graph.height);
    for x in 0..width {
        if edges.top {
            let id = graph.cell_at(x, 0);
            graph.cell_mut(id).water = Some(WaterType::UnspecifiedWater);
        }
        if edges.bottom {
            let id = graph.cell_at(x, height - 1);
            graph.cell_mut(id).water = Some(WaterType::UnspecifiedWater);
        }
    }
    for y in 0..height {
        if edges.left {
            let id = graph.cell_at(0, y);
            graph.cell_mut(id).water = Some(WaterType::UnspecifiedWater);
        }
        if edges.right {
            let id = graph.cell_at(width - 1, y);
            graph.cell_mut(id).water = Some(WaterType::UnspecifiedWater);
        }
    }
}

/// Порог доли водных соседей, выше которого ячейка становится океаном.
///
/// Убывает с ростом карты: на больших картах вода расползается шире.
/// Не опускается ниже нуля, поэтому ячейка без единого водного соседа
/// никогда не становится океаном.
#[must_use]
pub fn ocean_threshold(cell_count: usize, water_level_constant: f64) -> f64 {
    (0.3 - (cell_count as f64 / 50.0).log(3.0) * water_level_constant).max(0.0)
}

/// Стартовые ячейки заливки океана: углы водных краёв и, с вероятностью,
/// середины краёв.
fn ocean_seeds<R: Rng + ?Sized>(graph: &CellGraph, edges: WaterEdges, rng: &mut R) -> Vec<CellId> {
    let (right, bottom) = (graph.width - 1, graph.height - 1);
    let mut seeds = Vec::new();

    if edges.bottom || edges.left {
        seeds.push(graph.cell_at(0, bottom));
    }
    if edges.bottom || edges.right {
        let corner = graph.cell_at(right, bottom);
        seeds.push(corner);
        seeds.extend(graph.cell(corner).neighbors.first().copied());
    }
    if edges.top || edges.left {
        seeds.push(graph.cell_at(0, 0));
    }
    if edges.top || edges.right {
        seeds.push(graph.cell_at(right, 0));
    }

    if edges.bottom && (rng.gen_range(0..3) != 0 || graph.len() > 10_000) {
        seeds.push(graph.cell_at(graph.width / 2, bottom));
    }
    if edges.top && rng.gen_range(0..4) == 0 {
        seeds.push(graph.cell_at(graph.width / 2, 0));
    }
    if edges.left && rng.gen_range(0..4) == 0 {
        seeds.push(graph.cell_at(0, graph.height / 2));
    }
    if edges.right && rng.gen_range(0..4) == 0 {
        seeds.push(graph.cell_at(right, graph.height / 2));
    }
    seeds
}

/// Заливка океана. Возвращает число ячеек-океанов.
fn create_ocean<R: Rng + ?Sized>(
    graph: &mut CellGraph,
    params: &GenerationParams,
    rng: &mut R,
) -> usize {
    let threshold = ocean_threshold(graph.len(), params.water_level_constant);
    let seeds = ocean_seeds(graph, params.water_edges, rng);
    flood_ocean(graph, &seeds, threshold, params.land_min_fraction)
}

/// Заливка в ширину от затравок: неопределённая вода становится океаном,
/// пустая ячейка — океаном, если доля водных соседей выше `threshold`.
fn flood_ocean(
    graph: &mut CellGraph,
    seeds: &[CellId],
    threshold: f64,
    land_min_fraction: f64,
) -> usize {
    let total = graph.len() as f64;
    let mut visited = vec![false; graph.len()];
    let mut queue = VecDeque::new();
    for &seed in seeds {
        if !visited[seed.index()] {
            visited[seed.index()] = true;
            queue.push_back(seed);
        }
    }

    let mut ocean = 0usize;
    loop {
        if 1.0 - (ocean as f64 / total) < land_min_fraction {
            log::debug!("заливка океана остановлена на минимуме суши");
            break;
        }
        let Some(id) = queue.pop_front() else {
            break;
        };

        let water = graph.cell(id).water;
        if !matches!(water, None | Some(WaterType::UnspecifiedWater)) {
            continue;
        }

        for &neighbor in &graph.cell(id).neighbors {
            if !visited[neighbor.index()] {
                visited[neighbor.index()] = true;
                queue.push_back(neighbor);
            }
        }

        let becomes_ocean = water.is_some() || graph.water_to_land_ratio(id) > threshold;
        graph.cell_mut(id).water = Some(if becomes_ocean {
            ocean += 1;
            WaterType::Ocean
        } else {
            WaterType::Land
        });
    }

    // Всё, до чего заливка не дошла, остаётся сушей
    for id in graph.ids() {
        let cell = graph.cell_mut(id);
        if cell.water.is_none() {
            cell.water = Some(WaterType::Land);
        }
    }
    ocean
}

/// Допустимое число озёр: одно на каждые 300 ячеек суши плюс модификатор
#[must_use]
pub fn lake_limit(land_cells: usize, lake_count_modifier: i32) -> usize {
    let limit = (land_cells / 300) as i64 + i64::from(lake_count_modifier);
    usize::try_from(limit).unwrap_or(0)
}

fn seed_lakes<R: Rng + ?Sized>(
    graph: &mut CellGraph,
    land: &[CellId],
    lake_limit: usize,
    rng: &mut R,
) -> Vec<CellId> {
    let mut seeds = Vec::new();
    if land.is_empty() {
        return seeds;
    }
    let land_count = land.len();

    for &id in land {
        if seeds.len() >= lake_limit {
            break;
        }
        if graph.has_ocean_neighbor(id) {
            continue;
        }
        let roll = rng.gen_range(0..land_count) as f64 / land_count as f64;
        if roll > 0.995 {
            graph.cell_mut(id).water = Some(WaterType::Lake);
            seeds.push(id);
        }
    }
    seeds
}

/// Рост озёр от затравок.
///
/// Сосед присоединяется, пока доля воды вокруг него ниже порога
/// `1 − added / lake_size_limit_modifier`, который падает с каждой новой
/// ячейкой озера. Поэтому озёра ограничивают сами себя.
fn expand_lakes(
    graph: &mut CellGraph,
    seeds: Vec<CellId>,
    lake_limit: usize,
    params: &GenerationParams,
) {
    let area_limit = lake_limit as f64 * params.total_lake_area_limit_multiplier;
    let mut visited = vec![false; graph.len()];
    for &seed in &seeds {
        visited[seed.index()] = true;
    }
    let mut queue: VecDeque<CellId> = seeds.into();
    let mut added = 0usize;

    while let Some(id) = queue.pop_front() {
        let neighbors = graph.cell(id).neighbors.clone();
        for neighbor in neighbors {
            if area_limit < added as f64 {
                break;
            }
            if visited[neighbor.index()]
                || !graph.cell(neighbor).is_land()
                || graph.has_ocean_neighbor(neighbor)
            {
                continue;
            }
            let cap = 1.0 - added as f64 / params.lake_size_limit_modifier;
            if graph.water_to_land_ratio(neighbor) < cap {
                graph.cell_mut(neighbor).water = Some(WaterType::Lake);
                added += 1;
                visited[neighbor.index()] = true;
                queue.push_back(neighbor);
            }
        }
    }
    log::debug!("озёра выросли на {added} ячеек");
}

/// Многоисточниковый поиск в ширину от озёр только по суше
fn set_lake_distance(graph: &mut CellGraph) {
    let mut visited = vec![false; graph.len()];
    let mut queue = VecDeque::new();
    for id in graph.ids() {
        if graph.cell(id).is_lake() {
            graph.cell_mut(id).distance_to_lake = 0;
            visited[id.index()] = true;
            queue.push_back(id);
        }
    }

    while let Some(id) = queue.pop_front() {
        let distance = graph.cell(id).distance_to_lake + 1;
        let neighbors = graph.cell(id).neighbors.clone();
        for neighbor in neighbors {
            if visited[neighbor.index()] || !graph.cell(neighbor).is_land() {
                continue;
            }
            visited[neighbor.index()] = true;
            graph.cell_mut(neighbor).distance_to_lake = distance;
            queue.push_back(neighbor);
        }
    }
}
