// src/graph/builder.rs
//! Построение планарного разбиения растра на ячейки
//!
//! Сам генератор местности принимает граф как данность; здесь лежат два
//! простых построителя, чтобы крейт можно было запускать автономно:
//! - [`square_grid`] — одна ячейка на пиксель, 4-связность (удобно для тестов)
//! - [`jittered_voronoi`] — случайные центры и рост областей от них (BFS)

use std::collections::{HashSet, VecDeque};

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::GenerationError;
use crate::graph::{Cell, CellGraph, CellId};

const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Сетка, где каждая растровая позиция — отдельная ячейка.
pub fn square_grid(width: u32, height: u32) -> Result<CellGraph, GenerationError> {
    if width == 0 || height == 0 {
        return Err(GenerationError::InvalidDimensions { width, height });
    }
    let w = width as i32;
    let h = height as i32;

    let mut cells = Vec::with_capacity(width as usize * height as usize);
    for y in 0..h {
        for x in 0..w {
            let neighbors = DIRECTIONS
                .iter()
                .map(|&(dx, dy)| (x + dx, y + dy))
                .filter(|&(nx, ny)| nx >= 0 && nx < w && ny >= 0 && ny < h)
                .map(|(nx, ny)| CellId((ny * w + nx) as usize))
                .collect();
            cells.push(Cell::new((x as u32, y as u32), neighbors));
        }
    }
    let owners = (0..cells.len()).map(CellId).collect();
    CellGraph::new(width, height, cells, owners)
}

/// Разбиение на `cell_count` областей вокруг случайных уникальных центров.
///
/// Растр заливается в ширину одновременно от всех центров: каждая позиция
/// достаётся центру, чья волна пришла первой. Соседство ячеек определяется по
/// 4-связным границам между их пикселями.
pub fn jittered_voronoi<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    cell_count: usize,
    rng: &mut R,
) -> Result<CellGraph, GenerationError> {
    if width == 0 || height == 0 {
        return Err(GenerationError::InvalidDimensions { width, height });
    }
    if cell_count == 0 {
        return Err(GenerationError::EmptyGraph);
    }
    let w = width as usize;
    let h = height as usize;
    let cell_count = cell_count.min(w * h);

    // ШАГ 1: уникальные центры
    let mut taken = HashSet::with_capacity(cell_count);
    let mut centers = Vec::with_capacity(cell_count);
    while centers.len() < cell_count {
        let point = (rng.gen_range(0..width), rng.gen_range(0..height));
        if taken.insert(point) {
            centers.push(point);
        }
    }

    // ШАГ 2: рост областей от центров
    let mut owner: Vec<Option<CellId>> = vec![None; w * h];
    let mut queue = VecDeque::with_capacity(cell_count);
    for (i, &(x, y)) in centers.iter().enumerate() {
        owner[y as usize * w + x as usize] = Some(CellId(i));
        queue.push_back((x as i32, y as i32, CellId(i)));
    }
    while let Some((x, y, id)) = queue.pop_front() {
        for &(dx, dy) in &DIRECTIONS {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                continue;
            }
            let nidx = ny as usize * w + nx as usize;
            if owner[nidx].is_none() {
                owner[nidx] = Some(id);
                queue.push_back((nx, ny, id));
            }
        }
    }
    // Каждый пиксель достижим от любого центра, поэтому дыр не остаётся
    let owners: Vec<CellId> = owner.into_iter().map(|o| o.unwrap_or(CellId(0))).collect();

    // ШАГ 3: смежность по границам пикселей
    let mut edges = border_edges(&owners, w, h);
    edges.sort_unstable();
    edges.dedup();

    let mut neighbors: Vec<Vec<CellId>> = vec![Vec::new(); cell_count];
    for (a, b) in edges {
        neighbors[a.index()].push(b);
        neighbors[b.index()].push(a);
    }

    let cells = centers
        .into_iter()
        .zip(neighbors)
        .map(|(center, mut list)| {
            list.sort_unstable();
            Cell::new(center, list)
        })
        .collect();

    log::debug!("разбиение {width}×{height}: {cell_count} ячеек");
    CellGraph::new(width, height, cells, owners)
}

/// Пары соседних ячеек `(меньший, больший)`, найденные по правой и нижней
/// границе каждого пикселя.
fn border_edges(owners: &[CellId], w: usize, h: usize) -> Vec<(CellId, CellId)> {
    let row_edges = |y: usize| {
        let mut found = Vec::new();
        for x in 0..w {
            let here = owners[y * w + x];
            if x + 1 < w {
                push_edge(&mut found, here, owners[y * w + x + 1]);
            }
            if y + 1 < h {
                push_edge(&mut found, here, owners[(y + 1) * w + x]);
            }
        }
        found
    };

    #[cfg(feature = "parallel")]
    {
        (0..h).into_par_iter().flat_map_iter(row_edges).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..h).flat_map(row_edges).collect()
    }
}

fn push_edge(found: &mut Vec<(CellId, CellId)>, a: CellId, b: CellId) {
    if a != b {
        found.push((a.min(b), a.max(b)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn square_grid_links_four_neighbors() {
        let graph = square_grid(3, 3).unwrap();
        assert_eq!(graph.len(), 9);
        assert_eq!(graph.cell(CellId(4)).neighbors.len(), 4);
        assert_eq!(graph.cell(CellId(0)).neighbors, vec![CellId(1), CellId(3)]);
        assert_eq!(graph.cell_at(2, 1), CellId(5));
    }

    #[test]
    fn single_pixel_grid_is_rejected() {
        assert_eq!(
            square_grid(1, 1).unwrap_err(),
            GenerationError::IsolatedCell(CellId(0))
        );
    }

    #[test]
    fn voronoi_is_symmetric_and_covers_raster() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let graph = jittered_voronoi(64, 48, 120, &mut rng).unwrap();
        assert_eq!(graph.len(), 120);
        assert_eq!(graph.owners().len(), 64 * 48);
        // Центр ячейки принадлежит самой ячейке
        for (id, cell) in graph.iter() {
            assert_eq!(graph.cell_at(cell.center.0, cell.center.1), id);
            for &n in &cell.neighbors {
                assert!(graph.cell(n).neighbors.contains(&id));
            }
        }
    }

    #[test]
    fn voronoi_caps_cell_count_at_pixel_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let graph = jittered_voronoi(4, 4, 1000, &mut rng).unwrap();
        assert_eq!(graph.len(), 16);
    }
}
