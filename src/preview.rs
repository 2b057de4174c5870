// src/preview.rs
//! Отладочное превью карты
//!
//! Каждая ячейка рисуется заполненным шестиугольником цвета её местности
//! (вода — синим, глубже — темнее), поверх — реки и дороги отрезками от центра
//! к середине соответствующего ребра. Север сверху.

use image::{ImageBuffer, Rgba};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cell::{HexCell, terrain};
use crate::coordinates::{INNER_RADIUS, OUTER_RADIUS};
use crate::direction::HexDirection;
use crate::error::MapError;
use crate::grid::HexGrid;

pub type PreviewImage = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Минимальный масштаб, при котором вершины гекса не сливаются
pub const MIN_PREVIEW_SCALE: f32 = 0.5;

const RIVER_COLOR: Rgba<u8> = Rgba([40, 90, 200, 255]);
const ROAD_COLOR: Rgba<u8> = Rgba([150, 100, 50, 255]);

/// Вершины шестиугольника относительно центра (вершина сверху)
const CORNERS: [(f32, f32); 6] = [
    (0.0, OUTER_RADIUS),
    (INNER_RADIUS, 0.5 * OUTER_RADIUS),
    (INNER_RADIUS, -0.5 * OUTER_RADIUS),
    (0.0, -OUTER_RADIUS),
    (-INNER_RADIUS, -0.5 * OUTER_RADIUS),
    (-INNER_RADIUS, 0.5 * OUTER_RADIUS),
];

/// Середина ребра в направлении соседа
fn edge_middle(direction: HexDirection) -> (f32, f32) {
    match direction {
        HexDirection::NE => (0.5 * INNER_RADIUS, 0.75 * OUTER_RADIUS),
        HexDirection::E => (INNER_RADIUS, 0.0),
        HexDirection::SE => (0.5 * INNER_RADIUS, -0.75 * OUTER_RADIUS),
        HexDirection::SW => (-0.5 * INNER_RADIUS, -0.75 * OUTER_RADIUS),
        HexDirection::W => (-INNER_RADIUS, 0.0),
        HexDirection::NW => (-0.5 * INNER_RADIUS, 0.75 * OUTER_RADIUS),
    }
}

fn terrain_color(terrain_type: u8) -> [u8; 3] {
    match terrain_type {
        terrain::SAND => [214, 196, 136],
        terrain::GRASS => [96, 160, 64],
        terrain::MUD => [120, 96, 64],
        terrain::STONE => [136, 136, 136],
        terrain::SNOW => [240, 240, 248],
        _ => [255, 0, 255],
    }
}

/// Цвет ячейки: местность, затемнённая по высоте, или вода по глубине
#[must_use]
pub fn cell_color(cell: &HexCell, elevation_maximum: i32) -> Rgba<u8> {
    if cell.is_underwater() {
        let depth = (cell.water_level() - cell.elevation()).clamp(1, 6) as f32;
        let shade = 1.0 - depth * 0.1;
        return Rgba([
            (40.0 * shade) as u8,
            (110.0 * shade) as u8,
            (200.0 * shade) as u8,
            255,
        ]);
    }
    let height = cell.elevation().max(0) as f32 / elevation_maximum.max(1) as f32;
    let shade = 0.7 + 0.3 * height.min(1.0);
    let [r, g, b] = terrain_color(cell.terrain_type_index());
    Rgba([
        (f32::from(r) * shade) as u8,
        (f32::from(g) * shade) as u8,
        (f32::from(b) * shade) as u8,
        255,
    ])
}

/// Размер изображения в пикселях для карты и масштаба
#[must_use]
pub fn preview_size(grid: &HexGrid, scale: f32) -> (u32, u32) {
    let width = (grid.cell_count_x() as f32 + 0.5) * 2.0 * INNER_RADIUS;
    let height = (grid.cell_count_z() as f32 - 1.0) * 1.5 * OUTER_RADIUS + 2.0 * OUTER_RADIUS;
    ((width * scale).ceil() as u32, (height * scale).ceil() as u32)
}

/// Рисует карту; `scale` — пикселей на единицу мира (гекс шириной ~17 единиц)
pub fn render_preview(grid: &HexGrid, scale: f32) -> Result<PreviewImage, MapError> {
    if !scale.is_finite() || scale < MIN_PREVIEW_SCALE {
        return Err(MapError::InvalidConfig(format!(
            "preview scale must be at least {MIN_PREVIEW_SCALE}, got {scale}"
        )));
    }
    let (width, height) = preview_size(grid, scale);
    let mut image = PreviewImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));

    let elevation_maximum = *grid.elevation_range().end();
    #[cfg(feature = "parallel")]
    let colors: Vec<Rgba<u8>> = grid
        .cells()
        .par_iter()
        .map(|c| cell_color(c, elevation_maximum))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let colors: Vec<Rgba<u8>> = grid
        .cells()
        .iter()
        .map(|c| cell_color(c, elevation_maximum))
        .collect();

    let to_pixel = |(x, z): (f32, f32)| -> (f32, f32) {
        (
            (x + INNER_RADIUS) * scale,
            height as f32 - (z + OUTER_RADIUS) * scale,
        )
    };

    for cell in grid.cells() {
        let (cx, cz) = cell.coordinates().world_position();
        let polygon: Vec<Point<i32>> = CORNERS
            .iter()
            .map(|&(dx, dz)| {
                let (px, py) = to_pixel((cx + dx, cz + dz));
                Point::new(px.round() as i32, py.round() as i32)
            })
            .collect();
        draw_polygon_mut(&mut image, &polygon, colors[cell.index()]);
    }

    for cell in grid.cells() {
        let (cx, cz) = cell.coordinates().world_position();
        let center = to_pixel((cx, cz));
        for d in HexDirection::ALL {
            let color = if cell.has_river_through_edge(d) {
                RIVER_COLOR
            } else if cell.has_road_through_edge(d) {
                ROAD_COLOR
            } else {
                continue;
            };
            let (dx, dz) = edge_middle(d);
            draw_line_segment_mut(&mut image, center, to_pixel((cx + dx, cz + dz)), color);
        }
    }
    Ok(image)
}

/// Рисует карту и сохраняет её в PNG
pub fn save_preview(
    grid: &HexGrid,
    scale: f32,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = render_preview(grid, scale)?;
    image.save(path)?;
    Ok(())
}
