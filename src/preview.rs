// src/preview.rs
//! Отладочное PNG-превью местности
//!
//! Каждый пиксель окрашивается цветом биома ячейки-владельца, русла рек
//! подкрашиваются синим, поселения рисуются кружками.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

use crate::error::ExportError;
use crate::graph::CellGraph;

const RIVER_TINT: [u8; 3] = [30, 80, 220];
const SETTLEMENT_COLOR: Rgb<u8> = Rgb([200, 30, 30]);
const SETTLEMENT_RADIUS: i32 = 3;

#[must_use]
pub fn render_preview(graph: &CellGraph) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(graph.width, graph.height);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let cell = graph.cell(graph.cell_at(x, y));
        // ячейки без биома (фазы не запускались) остаются чёрными
        let mut color = cell.biome.map_or([0, 0, 0], |b| b.to_rgb());
        if cell.river && cell.is_land() {
            color = blend(color, RIVER_TINT);
        }
        *pixel = Rgb(color);
    }

    for cell in graph.cells() {
        if cell.settlement.is_some() {
            let (x, y) = cell.center;
            draw_filled_circle_mut(
                &mut img,
                (x as i32, y as i32),
                SETTLEMENT_RADIUS,
                SETTLEMENT_COLOR,
            );
        }
    }
    img
}

pub fn save_preview(graph: &CellGraph, path: impl AsRef<Path>) -> Result<(), ExportError> {
    render_preview(graph).save(path)?;
    Ok(())
}

fn blend(base: [u8; 3], tint: [u8; 3]) -> [u8; 3] {
    let mix = |a: u8, b: u8| ((u16::from(a) + u16::from(b)) / 2) as u8;
    [mix(base[0], tint[0]), mix(base[1], tint[1]), mix(base[2], tint[2])]
}
