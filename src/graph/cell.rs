// src/graph/cell.rs
//! Ячейка планарного разбиения и её атрибуты
//!
//! Все дискретные категории (высота, температура, влажность) — упорядоченные
//! перечисления с явным целочисленным представлением. Порядковый номер
//! используется в арифметике порогов, поэтому порядок вариантов менять нельзя.

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::graph::CellId;
use crate::settlement::Settlement;

/// Дистанция до океана у ячейки, которую поиск в ширину не достиг
pub const UNREACHED_OCEAN: i32 = -1;
/// Дистанция до озера у ячейки, которую поиск в ширину не достиг
pub const UNREACHED_LAKE: i32 = 999;

/// Тип водной поверхности ячейки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterType {
    Land,
    Ocean,
    Lake,
    /// Граница карты, помеченная как вода, но ещё не ставшая океаном
    UnspecifiedWater,
}

impl WaterType {
    #[must_use]
    pub fn is_water(self) -> bool {
        self != WaterType::Land
    }
}

/// Высотный пояс. `Water` — начальное значение до фазы рельефа.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Elevation {
    Water = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    MountainPeaks = 4,
}

impl Elevation {
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Температурный пояс, от самого холодного к самому жаркому
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Temperature {
    Frigid = 0,
    Cold = 1,
    Average = 2,
    Hot = 3,
    Scorching = 4,
}

impl Temperature {
    const LEVELS: [Temperature; 5] = [
        Temperature::Frigid,
        Temperature::Cold,
        Temperature::Average,
        Temperature::Hot,
        Temperature::Scorching,
    ];

    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Возвращает пояс по порядковому номеру; `None` за пределами `0..=4`
    #[must_use]
    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::LEVELS.get(i).copied())
    }
}

/// Влажность, от самой сухой к самой влажной.
///
/// `Submerged` зарезервирована за водными ячейками и стоит после `SuperWet`,
/// поэтому реки никогда не «увлажняют» воду.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Moisture {
    SuperDry = 0,
    Dry = 1,
    Normal = 2,
    Wet = 3,
    SuperWet = 4,
    Submerged = 5,
}

impl Moisture {
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Следующий более влажный пояс суши; `SuperWet` и `Submerged` не меняются
    #[must_use]
    pub fn wetter(self) -> Self {
        match self {
            Moisture::SuperDry => Moisture::Dry,
            Moisture::Dry => Moisture::Normal,
            Moisture::Normal => Moisture::Wet,
            Moisture::Wet | Moisture::SuperWet => Moisture::SuperWet,
            Moisture::Submerged => Moisture::Submerged,
        }
    }
}

/// Ячейка разбиения — узел графа местности
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// Центр ячейки в растровых координатах
    pub center: (u32, u32),
    /// Соседи в порядке, заданном построителем графа
    pub neighbors: Vec<CellId>,
    pub water: Option<WaterType>,
    pub elevation: Elevation,
    pub distance_to_ocean: i32,
    pub distance_to_lake: i32,
    pub moisture: Moisture,
    pub temperature: Temperature,
    /// Куда стекает вода; `Some(self)` — сток
    pub drainage_target: Option<CellId>,
    pub river: bool,
    pub biome: Option<Biome>,
    pub settlement: Option<Settlement>,
}

impl Cell {
    #[must_use]
    pub fn new(center: (u32, u32), neighbors: Vec<CellId>) -> Self {
        Self {
            center,
            neighbors,
            water: None,
            elevation: Elevation::Water,
            distance_to_ocean: UNREACHED_OCEAN,
            distance_to_lake: UNREACHED_LAKE,
            moisture: Moisture::SuperDry,
            temperature: Temperature::Average,
            drainage_target: None,
            river: false,
            biome: None,
            settlement: None,
        }
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        self.water == Some(WaterType::Land)
    }

    #[must_use]
    pub fn is_ocean(&self) -> bool {
        self.water == Some(WaterType::Ocean)
    }

    #[must_use]
    pub fn is_lake(&self) -> bool {
        self.water == Some(WaterType::Lake)
    }

    /// Вода любого вида, уже определённая генератором
    #[must_use]
    pub fn is_decided_water(&self) -> bool {
        self.water.is_some_and(WaterType::is_water)
    }

    /// Расстояние до ближайшей воды.
    ///
    /// Недостижимая дистанция до океана игнорируется, иначе отрицательный
    /// маркер превратил бы внутренние карманы суши в «прибрежные».
    #[must_use]
    pub fn distance_to_water(&self) -> i32 {
        if self.distance_to_ocean == UNREACHED_OCEAN {
            self.distance_to_lake
        } else {
            self.distance_to_ocean.min(self.distance_to_lake)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_ordinals_round_trip_within_range() {
        assert_eq!(Temperature::from_ordinal(0), Some(Temperature::Frigid));
        assert_eq!(Temperature::from_ordinal(4), Some(Temperature::Scorching));
        assert_eq!(Temperature::from_ordinal(-1), None);
        assert_eq!(Temperature::from_ordinal(5), None);
    }

    #[test]
    fn wetter_caps_at_super_wet() {
        assert_eq!(Moisture::Wet.wetter(), Moisture::SuperWet);
        assert_eq!(Moisture::SuperWet.wetter(), Moisture::SuperWet);
        assert_eq!(Moisture::Submerged.wetter(), Moisture::Submerged);
        assert_eq!(Moisture::SuperDry.wetter(), Moisture::Dry);
    }

    #[test]
    fn unreached_ocean_distance_falls_back_to_lake() {
        let mut cell = Cell::new((0, 0), vec![]);
        assert_eq!(cell.distance_to_water(), UNREACHED_LAKE);
        cell.distance_to_lake = 4;
        assert_eq!(cell.distance_to_water(), 4);
        cell.distance_to_ocean = 2;
        assert_eq!(cell.distance_to_water(), 2);
    }

    #[test]
    fn elevation_order_matches_ordinals() {
        assert!(Elevation::Water < Elevation::Low);
        assert!(Elevation::High < Elevation::MountainPeaks);
        assert_eq!(Elevation::Medium.ordinal(), 2);
    }
}
