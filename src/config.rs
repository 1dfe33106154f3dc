// src/config.rs
//! Конфигурация генерации местности
//!
//! Этот модуль определяет все параметры, управляющие генерацией:
//! - Размеры растра и число ячеек разбиения
//! - Какие края карты считаются водой
//! - Модификаторы океанов, озёр и рек
//! - Климатическую модель и модификатор влажности
//! - Плотность поселений и список их названий
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, GenerationError};

/// Модель распределения температуры по широте
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LatitudeModel {
    /// Экватор посередине карты, полюса сверху и снизу
    #[default]
    EquatorOnMiddle,
    /// Холодный север (верх карты), жаркий юг
    ColdNorth,
    /// Холодный юг (низ карты), жаркий север
    ColdSouth,
    /// Умеренная температура по всей карте
    UniformTemperature,
}

/// Края карты, которые считаются водой
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterEdges {
    #[serde(default = "default_true")]
    pub top: bool,
    #[serde(default = "default_true")]
    pub bottom: bool,
    #[serde(default = "default_true")]
    pub left: bool,
    #[serde(default = "default_true")]
    pub right: bool,
}

fn default_true() -> bool {
    true
}

impl WaterEdges {
    /// Все четыре края — вода (остров посреди океана)
    #[must_use]
    pub fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self {
            top: false,
            bottom: false,
            left: false,
            right: false,
        }
    }
}

impl Default for WaterEdges {
    fn default() -> Self {
        Self::all()
    }
}

/// Основные параметры генерации местности
///
/// Полная конфигурация для генерации одной карты. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    #[serde(default)]
    pub seed: u64,

    /// Ширина растра в пикселях
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота растра в пикселях
    #[serde(default = "default_height")]
    pub height: u32,

    /// Число ячеек разбиения
    #[serde(default = "default_cell_count")]
    pub cell_count: usize,

    /// Края карты, помеченные как вода
    #[serde(default)]
    pub water_edges: WaterEdges,

    /// Минимальная доля суши: заливка океана останавливается, как только суши станет меньше
    #[serde(default = "default_land_min_fraction")]
    pub land_min_fraction: f64,

    /// Константа уровня воды: чем больше, тем ниже порог «океанности» на больших картах
    #[serde(default = "default_water_level_constant")]
    pub water_level_constant: f64,

    /// Добавка к числу озёр (может быть отрицательной)
    #[serde(default)]
    pub lake_count_modifier: i32,

    /// Знаменатель убывающего порога роста озера; чем больше, тем крупнее озёра
    #[serde(default = "default_lake_size_limit_modifier")]
    pub lake_size_limit_modifier: f64,

    /// Множитель общей площади озёр относительно их числа
    #[serde(default = "default_total_lake_area_limit_multiplier")]
    pub total_lake_area_limit_multiplier: f64,

    /// Добавка к числу рек (может быть отрицательной)
    #[serde(default)]
    pub river_count_modifier: i32,

    /// Масштаб порогов влажности: `>1.0` → влажнее, `<1.0` → суше
    #[serde(default = "default_moisture_climate_modifier")]
    pub moisture_climate_modifier: f64,

    /// Широтная модель температуры
    #[serde(default)]
    pub latitude_model: LatitudeModel,

    /// Плотность поселений: число поселений на каждые 100 ячеек суши
    #[serde(default = "default_city_modifier")]
    pub city_modifier: f64,

    /// Названия поселений в порядке выдачи
    #[serde(default = "default_settlement_names")]
    pub settlement_names: Vec<String>,
}

impl GenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = 42
    /// width = 800
    /// height = 600
    /// latitude_model = "ColdNorth"
    ///
    /// [water_edges]
    /// top = false
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        params.validate()?;
        Ok(params)
    }

    /// Проверяет диапазоны параметров
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.cell_count == 0 {
            return Err(invalid("cell_count", "должно быть больше нуля"));
        }
        if !(0.0..=1.0).contains(&self.land_min_fraction) {
            return Err(invalid("land_min_fraction", "ожидается значение в [0, 1]"));
        }
        if !self.water_level_constant.is_finite() {
            return Err(invalid("water_level_constant", "должно быть конечным"));
        }
        if !(self.lake_size_limit_modifier > 0.0) {
            return Err(invalid("lake_size_limit_modifier", "должно быть больше нуля"));
        }
        if !(self.total_lake_area_limit_multiplier >= 0.0) {
            return Err(invalid("total_lake_area_limit_multiplier", "не может быть отрицательным"));
        }
        if !(self.moisture_climate_modifier >= 0.0) {
            return Err(invalid("moisture_climate_modifier", "не может быть отрицательным"));
        }
        if !(self.city_modifier >= 0.0) {
            return Err(invalid("city_modifier", "не может быть отрицательным"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: &str) -> GenerationError {
    GenerationError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

fn default_width() -> u32 {
    1024
}
fn default_height() -> u32 {
    768
}
fn default_cell_count() -> usize {
    6000
}
fn default_land_min_fraction() -> f64 {
    0.45
}
fn default_water_level_constant() -> f64 {
    0.05
}
fn default_lake_size_limit_modifier() -> f64 {
    40.0
}
fn default_total_lake_area_limit_multiplier() -> f64 {
    6.0
}
fn default_moisture_climate_modifier() -> f64 {
    1.0
}
fn default_city_modifier() -> f64 {
    1.5
}
fn default_settlement_names() -> Vec<String> {
    [
        "Ashford", "Briarwood", "Coldharbour", "Dunmere", "Eastwatch", "Fallowmere",
        "Greywater", "Highgarden", "Ironhold", "Kingsbridge", "Lowmarsh", "Millbrook",
        "Northreach", "Oakheart", "Pinecrest", "Queensport", "Redcliff", "Saltmarsh",
        "Thornbury", "Umberlee", "Valewood", "Westfold", "Wyvernrest", "Yarrowby",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: default_width(),
            height: default_height(),
            cell_count: default_cell_count(),
            water_edges: WaterEdges::all(),
            land_min_fraction: default_land_min_fraction(),
            water_level_constant: default_water_level_constant(),
            lake_count_modifier: 0,
            lake_size_limit_modifier: default_lake_size_limit_modifier(),
            total_lake_area_limit_multiplier: default_total_lake_area_limit_multiplier(),
            river_count_modifier: 0,
            moisture_climate_modifier: default_moisture_climate_modifier(),
            latitude_model: LatitudeModel::EquatorOnMiddle,
            city_modifier: default_city_modifier(),
            settlement_names: default_settlement_names(),
        }
    }
}
