// src/rivers.rs
//! Реки: направления стока, истоки и распространение русел
//!
//! 1. Каждая ячейка получает ровно одно направление стока (сосед или она сама)
//! 2. Из перемешанных ячеек выбираются истоки — чем выше, тем вероятнее
//! 3. Поиск в ширину от истоков по направлениям стока помечает русла и
//!    увлажняет ячейки. Первая дошедшая река «забирает» ячейку, так что
//!    притоки сливаются автоматически.

use std::collections::{HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::GenerationParams;
use crate::graph::{CellGraph, CellId, Elevation, Temperature};

/// Итоги фазы рек
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiverSummary {
    pub sources: usize,
    pub river_cells: usize,
    /// Сколько раз ячейка попадала в очередь распространения
    pub enqueued: usize,
    /// Циклы стока, затрагивающие сушу
    pub land_cycles: usize,
}

pub fn generate_rivers<R: Rng + ?Sized>(
    graph: &mut CellGraph,
    params: &GenerationParams,
    rng: &mut R,
) -> RiverSummary {
    assign_drainage(graph);

    let land = graph.land_cell_count();
    let limit = river_limit(land, params.river_count_modifier);
    let sources = select_sources(graph, land, limit, rng);
    let enqueued = propagate_rivers(graph, &sources);

    let cycles = drainage_cycles(graph);
    let land_cycles = cycles
        .iter()
        .filter(|cycle| cycle.iter().any(|&id| graph.cell(id).is_land()))
        .count();
    if land_cycles > 0 {
        log::warn!("обнаружено {land_cycles} циклов стока через сушу");
    }
    log::debug!("циклов стока всего: {}", cycles.len());

    let summary = RiverSummary {
        sources: sources.len(),
        river_cells: graph.cells().iter().filter(|c| c.river).count(),
        enqueued,
        land_cycles,
    };
    log::info!(
        "реки: {} истоков (лимит {limit}), {} ячеек русел",
        summary.sources,
        summary.river_cells
    );
    summary
}

/// Назначает направление стока каждой ячейке в порядке арены.
///
/// Используются только поля прошлых фаз (вода, высота, расстояние до океана)
/// и уже назначенные в этом проходе направления соседей.
pub fn assign_drainage(graph: &mut CellGraph) {
    for id in graph.ids() {
        let target = choose_drainage(graph, id);
        graph.cell_mut(id).drainage_target = Some(target);
    }
}

fn choose_drainage(graph: &CellGraph, id: CellId) -> CellId {
    let neighbors = &graph.cell(id).neighbors;

    if let Some(&ocean) = neighbors.iter().find(|&&n| graph.cell(n).is_ocean()) {
        return ocean;
    }

    let mut target = id;
    for &n in neighbors {
        if graph.cell(n).elevation < graph.cell(target).elevation && !drains_back(graph, n, id) {
            target = n;
        }
        if graph.cell(target).elevation == Elevation::Water {
            break;
        }
    }

    if target == id {
        for &n in neighbors {
            if graph.cell(n).distance_to_ocean < graph.cell(target).distance_to_ocean
                && !drains_back(graph, n, id)
            {
                target = n;
            }
        }
    }

    if target == id {
        if let Some(&n) = neighbors
            .iter()
            .find(|&&n| graph.cell(n).river && !drains_back(graph, n, id))
        {
            target = n;
        }
    }
    target
}

/// Возвращается ли сток из `candidate` по уже назначенным направлениям в `origin`.
///
/// Проверяет всю цепочку, а не только один шаг, поэтому кандидат, замыкающий
/// цикл любой длины, отбрасывается.
fn drains_back(graph: &CellGraph, candidate: CellId, origin: CellId) -> bool {
    let mut seen = HashSet::new();
    let mut current = candidate;
    loop {
        if current == origin {
            return true;
        }
        if !seen.insert(current) {
            return false;
        }
        match graph.cell(current).drainage_target {
            Some(next) if next != current => current = next,
            _ => return false,
        }
    }
}

/// Допустимое число истоков: один на каждые 100 ячеек суши плюс модификатор
#[must_use]
pub fn river_limit(land_cells: usize, river_count_modifier: i32) -> usize {
    let limit = (land_cells / 100) as i64 + i64::from(river_count_modifier);
    usize::try_from(limit).unwrap_or(0)
}

fn select_sources<R: Rng + ?Sized>(
    graph: &mut CellGraph,
    land_cells: usize,
    limit: usize,
    rng: &mut R,
) -> Vec<CellId> {
    let mut order: Vec<CellId> = graph.ids().collect();
    order.shuffle(rng);

    let mut sources = Vec::new();
    for id in order {
        if sources.len() >= limit {
            break;
        }
        let cell = graph.cell(id);
        let frozen = cell.temperature == Temperature::Frigid && cell.elevation != Elevation::MountainPeaks;
        if !cell.is_land()
            || frozen
            || cell.elevation.ordinal() < 2
            || cell.moisture.ordinal() < 2
        {
            continue;
        }

        // Вероятность растёт с высотой: ≈ (h − 0.995) / h
        let span = usize::from(cell.elevation.ordinal()) * land_cells;
        let roll = rng.gen_range(0..span) as f64 / land_cells as f64;
        if roll > 0.995 {
            graph.cell_mut(id).river = true;
            sources.push(id);
        }
    }
    sources
}

/// Распространяет реки от истоков вниз по стоку.
///
/// Каждая ячейка попадает в очередь не более одного раза, поэтому обход
/// конечен даже при циклах стока. Возвращает число постановок в очередь.
pub fn propagate_rivers(graph: &mut CellGraph, sources: &[CellId]) -> usize {
    let mut visited = vec![false; graph.len()];
    let mut queue = VecDeque::new();
    for &source in sources {
        if !visited[source.index()] {
            visited[source.index()] = true;
            queue.push_back(source);
        }
    }
    let mut enqueued = queue.len();

    while let Some(id) = queue.pop_front() {
        let cell = graph.cell_mut(id);
        cell.river = true;
        cell.moisture = cell.moisture.wetter();

        let target = cell.drainage_target.unwrap_or(id);
        if !visited[target.index()] {
            visited[target.index()] = true;
            queue.push_back(target);
            enqueued += 1;
        }
    }
    enqueued
}

/// Сеть стока как ориентированный граф: узел на ячейку, ребро к цели стока.
/// Стоки (петли на себя) рёбер не дают.
#[must_use]
pub fn drainage_network(graph: &CellGraph) -> DiGraph<CellId, ()> {
    let mut network = DiGraph::with_capacity(graph.len(), graph.len());
    let nodes: Vec<_> = graph.ids().map(|id| network.add_node(id)).collect();
    for (id, cell) in graph.iter() {
        if let Some(target) = cell.drainage_target {
            if target != id {
                network.add_edge(nodes[id.index()], nodes[target.index()], ());
            }
        }
    }
    network
}

/// Циклы стока длиной больше одной ячейки
#[must_use]
pub fn drainage_cycles(graph: &CellGraph) -> Vec<Vec<CellId>> {
    let network = drainage_network(graph);
    tarjan_scc(&network)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| component.into_iter().map(|node| network[node]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::square_grid;
    use crate::graph::{Cell, Moisture, WaterType};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Цепочка из пяти ячеек суши со строго убывающей высотой
    fn descending_chain() -> CellGraph {
        let mut graph = square_grid(5, 1).unwrap();
        let levels = [
            Elevation::MountainPeaks,
            Elevation::High,
            Elevation::Medium,
            Elevation::Low,
            Elevation::Water,
        ];
        for (i, level) in levels.into_iter().enumerate() {
            let cell = graph.cell_mut(CellId(i));
            cell.water = Some(WaterType::Land);
            cell.elevation = level;
            cell.distance_to_ocean = 4 - i as i32;
        }
        graph
    }

    #[test]
    fn chain_drains_downhill_to_a_sink() {
        let mut graph = descending_chain();
        assign_drainage(&mut graph);
        for i in 0..4 {
            assert_eq!(graph.cell(CellId(i)).drainage_target, Some(CellId(i + 1)));
        }
        assert_eq!(graph.cell(CellId(4)).drainage_target, Some(CellId(4)));

        let enqueued = propagate_rivers(&mut graph, &[CellId(0)]);
        assert_eq!(enqueued, 5);
        assert!(graph.cells().iter().all(|c| c.river));
        assert_eq!(graph.cell(CellId(4)).drainage_target, Some(CellId(4)));
    }

    #[test]
    fn ocean_neighbor_wins() {
        let mut graph = descending_chain();
        graph.cell_mut(CellId(4)).water = Some(WaterType::Ocean);
        assign_drainage(&mut graph);
        assert_eq!(graph.cell(CellId(3)).drainage_target, Some(CellId(4)));
    }

    #[test]
    fn elevation_tie_triangle_does_not_cycle() {
        let triangle = |me: usize| {
            let mut cell = Cell::new((me as u32, 0), (0..3).filter(|&n| n != me).map(CellId).collect());
            cell.water = Some(WaterType::Land);
            cell.elevation = Elevation::Medium;
            cell.distance_to_ocean = 5;
            cell.river = true;
            cell
        };
        let cells = (0..3).map(triangle).collect();
        let mut graph =
            CellGraph::new(3, 1, cells, vec![CellId(0), CellId(1), CellId(2)]).unwrap();

        assign_drainage(&mut graph);
        assert_eq!(graph.cell(CellId(0)).drainage_target, Some(CellId(1)));
        assert_eq!(graph.cell(CellId(1)).drainage_target, Some(CellId(2)));
        assert_eq!(graph.cell(CellId(2)).drainage_target, Some(CellId(2)));
        assert!(drainage_cycles(&graph).is_empty());

        assert_eq!(propagate_rivers(&mut graph, &[CellId(0)]), 3);
    }

    #[test]
    fn propagation_terminates_on_forced_cycle() {
        let mut graph = square_grid(3, 1).unwrap();
        graph.cell_mut(CellId(0)).drainage_target = Some(CellId(1));
        graph.cell_mut(CellId(1)).drainage_target = Some(CellId(2));
        graph.cell_mut(CellId(2)).drainage_target = Some(CellId(1));
        assert_eq!(propagate_rivers(&mut graph, &[CellId(0)]), 3);
        assert_eq!(drainage_cycles(&graph).len(), 1);
    }

    #[test]
    fn moisture_never_exceeds_super_wet() {
        let mut graph = descending_chain();
        for id in graph.ids() {
            graph.cell_mut(id).moisture = Moisture::Wet;
        }
        graph.cell_mut(CellId(2)).moisture = Moisture::SuperWet;
        assign_drainage(&mut graph);
        propagate_rivers(&mut graph, &[CellId(0), CellId(1)]);
        for cell in graph.cells() {
            assert_eq!(cell.moisture, Moisture::SuperWet);
        }
    }

    #[test]
    fn every_cell_drains_to_itself_or_a_neighbor() {
        let mut graph = square_grid(9, 7).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for id in graph.ids() {
            let cell = graph.cell_mut(id);
            cell.water = Some(WaterType::Land);
            cell.elevation = match rng.gen_range(0..4) {
                0 => Elevation::Low,
                1 => Elevation::Medium,
                2 => Elevation::High,
                _ => Elevation::MountainPeaks,
            };
            cell.distance_to_ocean = rng.gen_range(0..6);
        }
        assign_drainage(&mut graph);
        for (id, cell) in graph.iter() {
            let target = cell.drainage_target.expect("сток назначен");
            assert!(target == id || cell.neighbors.contains(&target));
        }
        assert!(drainage_cycles(&graph).is_empty());
    }

    #[test]
    fn zero_limit_yields_no_rivers() {
        assert_eq!(river_limit(150, -1), 0);
        let mut graph = descending_chain();
        for id in graph.ids() {
            graph.cell_mut(id).moisture = Moisture::Wet;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let sources = select_sources(&mut graph, 5, 0, &mut rng);
        assert!(sources.is_empty());
        assert!(graph.cells().iter().all(|c| !c.river));
    }

    #[test]
    fn frozen_lowland_never_sources() {
        let mut graph = descending_chain();
        for id in graph.ids() {
            let cell = graph.cell_mut(id);
            cell.moisture = Moisture::SuperWet;
            cell.temperature = Temperature::Frigid;
        }
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let sources = select_sources(&mut graph, 5, 5, &mut rng);
            // только пик может стать истоком на морозе
            assert!(sources.iter().all(|&id| id == CellId(0)));
        }
    }
}
