// src/climate.rs
//! Климат: температура по широтной модели и влажность по удалённости от воды
use rand::Rng;

use crate::config::{GenerationParams, LatitudeModel};
use crate::graph::{Cell, CellGraph, Elevation, Moisture, Temperature};

/// Границы поясов от жаркого края (в процентах высоты карты):
/// Scorching, Hot, Average, Cold; всё дальше — Frigid.
const EQUATOR_BANDS: [f64; 4] = [5.0, 18.0, 35.0, 45.0];
const POLAR_BANDS: [f64; 4] = [12.0, 36.0, 70.0, 88.0];

/// Множители порогов влажности: SuperWet, Wet, Normal, Dry
const MOISTURE_STEPS: [f64; 4] = [2.0, 4.0, 10.0, 13.0];

/// Генерирует температуру и влажность для всех ячеек.
///
/// Требует готовых водоёмов и рельефа: температура зависит от высоты, а
/// влажность — от расстояний до океана и озёр.
pub fn generate_climate<R: Rng + ?Sized>(
    graph: &mut CellGraph,
    params: &GenerationParams,
    rng: &mut R,
) {
    let height = graph.height;
    let total = graph.len();

    for id in graph.ids() {
        let jitter = band_jitter(rng);
        let cell = graph.cell_mut(id);
        let base = latitude_temperature(params.latitude_model, cell.center.1, height, jitter);
        cell.temperature = adjust_for_elevation(base, cell.elevation);
        cell.moisture = moisture_for(cell, total, params.moisture_climate_modifier);
    }

    if log::log_enabled!(log::Level::Debug) {
        let frigid = graph
            .cells()
            .iter()
            .filter(|c| c.temperature == Temperature::Frigid)
            .count();
        let wet = graph
            .cells()
            .iter()
            .filter(|c| c.moisture >= Moisture::Wet && c.is_land())
            .count();
        log::debug!("климат: {frigid} ледяных ячеек, {wet} влажных ячеек суши");
    }
    log::info!("климат рассчитан ({:?})", params.latitude_model);
}

/// Случайный множитель границы пояса: от 0.6 до 1.5 с шагом 0.1
fn band_jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    1.0 - 0.1 * f64::from(rng.gen_range(0..10_i32) - 5)
}

/// Температура по широте без учёта высоты.
///
/// `jitter` сдвигает две дальние от жаркой зоны границы поясов, чтобы они
/// не выглядели ровными линиями.
#[must_use]
pub fn latitude_temperature(model: LatitudeModel, y: u32, height: u32, jitter: f64) -> Temperature {
    let y = f64::from(y);
    let height_f = f64::from(height);
    match model {
        LatitudeModel::UniformTemperature => Temperature::Average,
        LatitudeModel::EquatorOnMiddle => {
            let middle = f64::from(height / 2);
            banded((y - middle).abs(), height_f, &EQUATOR_BANDS, jitter)
        }
        // жаркий низ карты
        LatitudeModel::ColdNorth => banded(height_f - y, height_f, &POLAR_BANDS, jitter),
        // жаркий верх карты
        LatitudeModel::ColdSouth => banded(y + 1.0, height_f, &POLAR_BANDS, jitter),
    }
}

fn banded(distance: f64, height: f64, edges: &[f64; 4], jitter: f64) -> Temperature {
    const LEVELS: [Temperature; 4] = [
        Temperature::Scorching,
        Temperature::Hot,
        Temperature::Average,
        Temperature::Cold,
    ];
    let percent = height / 100.0;
    for (i, (&edge, &level)) in edges.iter().zip(LEVELS.iter()).enumerate() {
        let scale = if i >= 2 { jitter } else { 1.0 };
        if distance <= percent * edge * scale {
            return level;
        }
    }
    Temperature::Frigid
}

/// Поправка на высоту: пики всегда ледяные, высокогорье холоднее на два
/// пояса, среднегорье — на один. Без пиков ниже `Cold` не опускаемся.
#[must_use]
pub fn adjust_for_elevation(base: Temperature, elevation: Elevation) -> Temperature {
    if base == Temperature::Frigid || elevation == Elevation::MountainPeaks {
        return Temperature::Frigid;
    }
    let drop = match elevation {
        Elevation::High => 2,
        Elevation::Medium => 1,
        _ => 0,
    };
    let level = (i32::from(base.ordinal()) - drop).max(1);
    Temperature::from_ordinal(level).unwrap_or(Temperature::Cold)
}

/// Влажность ячейки.
///
/// Для суши `d = distance_to_water × temperature_ordinal` сравнивается с
/// порогами `k · sqrt(total) / 80 · modifier`. Жара «высушивает» быстрее,
/// а на ледяных ячейках `d = 0`.
#[must_use]
pub fn moisture_for(cell: &Cell, total_cells: usize, modifier: f64) -> Moisture {
    const LEVELS: [Moisture; 4] = [
        Moisture::SuperWet,
        Moisture::Wet,
        Moisture::Normal,
        Moisture::Dry,
    ];
    if !cell.is_land() {
        return Moisture::Submerged;
    }

    let d = f64::from(cell.distance_to_water()) * f64::from(cell.temperature.ordinal());
    let unit = (total_cells as f64).sqrt() / 80.0 * modifier;
    MOISTURE_STEPS
        .iter()
        .zip(LEVELS)
        .find(|&(&k, _)| d < k * unit)
        .map_or(Moisture::SuperDry, |(_, level)| level)
}
