// src/error.rs
//! Ошибки генерации и загрузки конфигурации
//!
//! Генератор не имеет восстановимых ошибок во время работы фаз: все ошибки —
//! это нарушения предусловий, которые проверяются один раз до запуска конвейера.

use thiserror::Error;

use crate::graph::CellId;

/// Нарушение предусловий графа ячеек или параметров генерации
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("размеры сетки должны быть положительными, получено {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("граф ячеек пуст")]
    EmptyGraph,

    #[error("ячейка {0} не имеет соседей")]
    IsolatedCell(CellId),

    #[error("смежность несимметрична: {from} ссылается на {to}, но не наоборот")]
    AsymmetricAdjacency { from: CellId, to: CellId },

    #[error("ячейка {cell} ссылается на несуществующего соседа {neighbor}")]
    NeighborOutOfRange { cell: CellId, neighbor: CellId },

    #[error("растровый индекс содержит {actual} позиций, ожидалось {expected}")]
    RasterSizeMismatch { expected: usize, actual: usize },

    #[error("растровая позиция {index} принадлежит несуществующей ячейке {cell}")]
    RasterOwnerOutOfRange { index: usize, cell: CellId },

    #[error("недопустимый параметр `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Ошибка загрузки параметров из файла
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("не удалось прочитать файл конфигурации: {0}")]
    Io(#[from] std::io::Error),

    #[error("некорректный TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] GenerationError),
}

/// Ошибка записи результатов (JSON-снимок или PNG-превью)
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("ошибка сериализации JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ошибка записи изображения: {0}")]
    Image(#[from] image::ImageError),
}
