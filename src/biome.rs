// src/biome.rs
//! Назначение биомов
//!
//! Температура зависит от широты, высоты над водой и небольшого шума; влажность
//! берётся из климатической симуляции. Обе величины делятся на 4 полосы, и
//! таблица 4×4 даёт тип местности и плотность растительности.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use log::info;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cell::{HexCell, terrain};
use crate::climate::ClimateData;
use crate::config::{HemisphereMode, LandSettings, TemperatureSettings};
use crate::grid::HexGrid;

/// Число каналов шума, из которых генератор выбирает один на карту
pub const TEMPERATURE_JITTER_CHANNELS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Biome {
    pub terrain: u8,
    pub plant: u8,
}

impl Biome {
    const fn new(terrain: u8, plant: u8) -> Self {
        Self { terrain, plant }
    }
}

const TEMPERATURE_BANDS: [f32; 3] = [0.1, 0.3, 0.6];
const MOISTURE_BANDS: [f32; 3] = [0.12, 0.28, 0.85];

/// Строки — температура (от холода к жаре), столбцы — влажность (от сухости к сырости)
const BIOMES: [Biome; 16] = [
    Biome::new(terrain::SAND, 0),
    Biome::new(terrain::SNOW, 0),
    Biome::new(terrain::SNOW, 0),
    Biome::new(terrain::SNOW, 0),
    Biome::new(terrain::SAND, 0),
    Biome::new(terrain::MUD, 0),
    Biome::new(terrain::MUD, 1),
    Biome::new(terrain::MUD, 2),
    Biome::new(terrain::SAND, 0),
    Biome::new(terrain::GRASS, 0),
    Biome::new(terrain::GRASS, 1),
    Biome::new(terrain::GRASS, 2),
    Biome::new(terrain::SAND, 0),
    Biome::new(terrain::GRASS, 1),
    Biome::new(terrain::GRASS, 2),
    Biome::new(terrain::GRASS, 3),
];

fn band(value: f32, bands: &[f32; 3]) -> usize {
    bands.iter().position(|&b| value < b).unwrap_or(bands.len())
}

/// Базовая биома суши по таблице
#[must_use]
pub fn lookup_biome(temperature: f32, moisture: f32) -> Biome {
    BIOMES[band(temperature, &TEMPERATURE_BANDS) * 4 + band(moisture, &MOISTURE_BANDS)]
}

/// Поле температур: широта, высота и шум
pub struct TemperatureField<'a> {
    settings: &'a TemperatureSettings,
    land: &'a LandSettings,
    cell_count_z: usize,
    noise: FastNoiseLite,
}

impl<'a> TemperatureField<'a> {
    #[must_use]
    pub fn new(
        settings: &'a TemperatureSettings,
        land: &'a LandSettings,
        cell_count_z: usize,
        seed: u32,
        jitter_channel: u32,
    ) -> Self {
        let mut noise = FastNoiseLite::new();
        noise.set_seed(Some(seed.wrapping_add(1000 + jitter_channel) as i32));
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        // масштаб задаётся координатами выборки
        noise.set_frequency(Some(1.0));
        Self {
            settings,
            land,
            cell_count_z,
            noise,
        }
    }

    #[must_use]
    pub fn temperature(&self, cell: &HexCell) -> f32 {
        let mut latitude = cell.coordinates().z() as f32 / self.cell_count_z as f32;
        match self.settings.hemisphere {
            HemisphereMode::Both => {
                latitude *= 2.0;
                if latitude > 1.0 {
                    latitude = 2.0 - latitude;
                }
            }
            HemisphereMode::North => latitude = 1.0 - latitude,
            HemisphereMode::South => {}
        }

        let low = self.settings.low_temperature;
        let high = self.settings.high_temperature;
        let mut temperature = low + (high - low) * latitude;

        let water_level = self.land.water_level;
        temperature *= 1.0
            - (cell.view_elevation() - water_level) as f32
                / (self.land.elevation_maximum - water_level + 1) as f32;

        let (x, z) = cell.coordinates().world_position();
        let jitter = (self.noise.get_noise_2d(x * 0.1, z * 0.1) + 1.0) * 0.5;
        temperature + (jitter * 2.0 - 1.0) * self.settings.temperature_jitter
    }

    /// Температуры всех ячеек в порядке индексов
    #[must_use]
    pub fn sample_all(&self, grid: &HexGrid) -> Vec<f32> {
        #[cfg(feature = "parallel")]
        {
            grid.cells().par_iter().map(|c| self.temperature(c)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            grid.cells().iter().map(|c| self.temperature(c)).collect()
        }
    }
}

/// Тип местности под водой: мелководье у берега зависит от крутизны берега
fn underwater_terrain(grid: &HexGrid, cell: &HexCell, water_level: i32, temperature: f32) -> u8 {
    let elevation = cell.elevation();
    let mut terrain_type = if elevation == water_level - 1 {
        let (mut cliffs, mut slopes) = (0, 0);
        for (_, n) in cell.neighbors() {
            let delta = grid.cell(n).elevation() - cell.water_level();
            if delta == 0 {
                slopes += 1;
            } else if delta > 0 {
                cliffs += 1;
            }
        }
        if cliffs + slopes > 3 {
            terrain::GRASS
        } else if cliffs > 0 {
            terrain::STONE
        } else if slopes > 0 {
            terrain::SAND
        } else {
            terrain::GRASS
        }
    } else if elevation >= water_level {
        terrain::GRASS
    } else if elevation < 0 {
        terrain::STONE
    } else {
        terrain::MUD
    };

    if terrain_type == terrain::GRASS && temperature < TEMPERATURE_BANDS[0] {
        terrain_type = terrain::MUD;
    }
    terrain_type
}

/// Назначает тип местности и растительность каждой ячейке.
///
/// Возвращает число ячеек каждого типа местности.
pub fn classify_biomes(
    grid: &mut HexGrid,
    climate: &[ClimateData],
    land: &LandSettings,
    temperatures: &[f32],
) -> [usize; 5] {
    let rock_desert_elevation = land.elevation_maximum - (land.elevation_maximum - land.water_level) / 2;
    let mut histogram = [0usize; 5];

    for index in 0..grid.len() {
        let cell = grid.cell(index);
        let temperature = temperatures[index];

        if cell.is_underwater() {
            let terrain_type = underwater_terrain(grid, cell, land.water_level, temperature);
            grid.set_terrain_type_index(index, terrain_type);
            histogram[usize::from(terrain_type)] += 1;
            continue;
        }

        let mut biome = lookup_biome(temperature, climate[index].moisture);
        if biome.terrain == terrain::SAND {
            if cell.elevation() >= rock_desert_elevation {
                biome.terrain = terrain::STONE;
            }
        } else if cell.elevation() == land.elevation_maximum {
            biome.terrain = terrain::SNOW;
        }

        if biome.terrain == terrain::SNOW {
            biome.plant = 0;
        } else if biome.plant < 3 && cell.has_river() {
            biome.plant += 1;
        }

        grid.set_terrain_type_index(index, biome.terrain);
        grid.set_plant_level(index, biome.plant);
        histogram[usize::from(biome.terrain)] += 1;
    }

    info!(
        "biomes: sand {}, grass {}, mud {}, stone {}, snow {}",
        histogram[0], histogram[1], histogram[2], histogram[3], histogram[4]
    );
    histogram
}
