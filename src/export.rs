// src/export.rs
//! JSON-снимок аннотированного графа для внешних инструментов

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::graph::{Cell, CellGraph, CellId};

/// Снимок местности: размеры растра и все ячейки с атрибутами
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainSnapshot {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Cell>,
    /// Поселения в порядке арены
    pub settlements: Vec<SettlementEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementEntry {
    pub cell: CellId,
    pub name: String,
    pub center: (u32, u32),
}

impl TerrainSnapshot {
    #[must_use]
    pub fn from_graph(graph: &CellGraph) -> Self {
        let settlements = graph
            .iter()
            .filter_map(|(id, cell)| {
                cell.settlement.as_ref().map(|s| SettlementEntry {
                    cell: id,
                    name: s.name.clone(),
                    center: cell.center,
                })
            })
            .collect();
        Self {
            width: graph.width,
            height: graph.height,
            cells: graph.cells().to_vec(),
            settlements,
        }
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
