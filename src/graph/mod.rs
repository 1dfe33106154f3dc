// src/graph/mod.rs
//! Граф ячеек — модель данных, над которой работают все фазы генерации
//!
//! Ячейки хранятся в арене (`Vec<Cell>`), а все ссылки между ними, включая
//! направление стока, — это индексы [`CellId`]. Растровый индекс `owners`
//! сопоставляет каждой позиции `(x, y)` ячейку-владельца.

pub mod builder;
pub mod cell;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

pub use cell::{Cell, Elevation, Moisture, Temperature, WaterType, UNREACHED_LAKE, UNREACHED_OCEAN};

/// Индекс ячейки в арене графа
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub usize);

impl CellId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct CellGraph {
    pub width: u32,
    pub height: u32,
    cells: Vec<Cell>,
    /// Владелец каждой растровой позиции, индекс `y * width + x`
    owners: Vec<CellId>,
}

impl CellGraph {
    /// Собирает граф из готовых ячеек и растрового индекса и проверяет его.
    pub fn new(
        width: u32,
        height: u32,
        cells: Vec<Cell>,
        owners: Vec<CellId>,
    ) -> Result<Self, GenerationError> {
        let graph = Self {
            width,
            height,
            cells,
            owners,
        };
        graph.validate()?;
        Ok(graph)
    }

    /// Проверяет предусловия: размеры, непустоту, симметрию смежности,
    /// отсутствие изолированных ячеек и корректность растрового индекса.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.cells.is_empty() {
            return Err(GenerationError::EmptyGraph);
        }

        let expected = self.width as usize * self.height as usize;
        if self.owners.len() != expected {
            return Err(GenerationError::RasterSizeMismatch {
                expected,
                actual: self.owners.len(),
            });
        }
        if let Some((index, &cell)) = self
            .owners
            .iter()
            .enumerate()
            .find(|(_, id)| id.index() >= self.cells.len())
        {
            return Err(GenerationError::RasterOwnerOutOfRange { index, cell });
        }

        for (id, cell) in self.iter() {
            if cell.neighbors.is_empty() {
                return Err(GenerationError::IsolatedCell(id));
            }
            for &neighbor in &cell.neighbors {
                let Some(other) = self.cells.get(neighbor.index()) else {
                    return Err(GenerationError::NeighborOutOfRange { cell: id, neighbor });
                };
                if !other.neighbors.contains(&id) {
                    return Err(GenerationError::AsymmetricAdjacency {
                        from: id,
                        to: neighbor,
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.index()]
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn ids(&self) -> impl Iterator<Item = CellId> + use<> {
        (0..self.cells.len()).map(CellId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    /// Ячейка-владелец растровой позиции
    #[must_use]
    pub fn cell_at(&self, x: u32, y: u32) -> CellId {
        self.owners[y as usize * self.width as usize + x as usize]
    }

    #[must_use]
    pub fn owners(&self) -> &[CellId] {
        &self.owners
    }

    pub fn neighbors(&self, id: CellId) -> impl Iterator<Item = &Cell> {
        self.cell(id).neighbors.iter().map(|&n| self.cell(n))
    }

    #[must_use]
    pub fn has_ocean_neighbor(&self, id: CellId) -> bool {
        self.neighbors(id).any(Cell::is_ocean)
    }

    #[must_use]
    pub fn has_lake_neighbor(&self, id: CellId) -> bool {
        self.neighbors(id).any(Cell::is_lake)
    }

    #[must_use]
    pub fn has_river_neighbor(&self, id: CellId) -> bool {
        self.neighbors(id).any(|n| n.river)
    }

    #[must_use]
    pub fn has_settlement_neighbor(&self, id: CellId) -> bool {
        self.neighbors(id).any(|n| n.settlement.is_some())
    }

    /// Доля соседей, уже ставших водой любого вида.
    ///
    /// Соседи без назначенного типа считаются сушей. Изолированные ячейки
    /// отсекаются в [`CellGraph::validate`], так что деления на ноль нет.
    #[must_use]
    pub fn water_to_land_ratio(&self, id: CellId) -> f64 {
        let neighbors = &self.cell(id).neighbors;
        let water = self.neighbors(id).filter(|n| n.is_decided_water()).count();
        water as f64 / neighbors.len() as f64
    }

    #[must_use]
    pub fn count_water(&self, water: WaterType) -> usize {
        self.cells.iter().filter(|c| c.water == Some(water)).count()
    }

    #[must_use]
    pub fn land_cell_count(&self) -> usize {
        self.count_water(WaterType::Land)
    }
}
