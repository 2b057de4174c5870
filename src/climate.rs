// src/climate.rs
//! Климатическая симуляция
//!
//! Клеточный автомат над парой буферов (облака, влажность):
//! 1. Над водой влажность равна 1 и облака пополняются испарением;
//!    над сушей в облака испаряется часть влажности почвы.
//! 2. Часть облаков выпадает осадками. Над высокой местностью облака не
//!    помещаются целиком: излишек выпадает принудительно.
//! 3. Облака расходятся к шести соседям, по ветру — в `wind_strength` раз больше.
//! 4. Влажность стекает к более низким соседям и просачивается к соседям той же высоты.
//! 5. Собственная влажность ячейки ложится в следующий буфер с ограничением
//!    единицей. Притоки от ячеек, обработанных позже, добавляются сверх него.
//! 6. Буферы меняются местами.
//!
//! Ровно [`CLIMATE_CYCLES`] циклов, без проверки сходимости.

use log::info;

use crate::config::ClimateSettings;
use crate::grid::HexGrid;

pub const CLIMATE_CYCLES: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClimateData {
    pub clouds: f32,
    pub moisture: f32,
}

/// Прогоняет симуляцию и возвращает итоговое состояние каждой ячейки
#[must_use]
pub fn simulate_climate(
    grid: &HexGrid,
    settings: &ClimateSettings,
    elevation_maximum: i32,
) -> Vec<ClimateData> {
    let initial = ClimateData {
        clouds: 0.0,
        moisture: settings.starting_moisture,
    };
    let mut climate = vec![initial; grid.len()];
    let mut next_climate = vec![ClimateData::default(); grid.len()];

    for _ in 0..CLIMATE_CYCLES {
        for index in 0..grid.len() {
            evolve_climate(grid, settings, elevation_maximum, index, &mut climate, &mut next_climate);
        }
        std::mem::swap(&mut climate, &mut next_climate);
    }

    let mean = climate.iter().map(|c| c.moisture).sum::<f32>() / grid.len() as f32;
    info!("climate simulated over {CLIMATE_CYCLES} cycles, mean moisture {mean:.3}");
    climate
}

fn evolve_climate(
    grid: &HexGrid,
    settings: &ClimateSettings,
    elevation_maximum: i32,
    index: usize,
    climate: &mut [ClimateData],
    next_climate: &mut [ClimateData],
) {
    let cell = grid.cell(index);
    let mut cell_climate = climate[index];

    if cell.is_underwater() {
        cell_climate.moisture = 1.0;
        cell_climate.clouds += settings.evaporation_factor;
    } else {
        let evaporation = cell_climate.moisture * settings.evaporation_factor;
        cell_climate.moisture -= evaporation;
        cell_climate.clouds += evaporation;
    }

    let precipitation = cell_climate.clouds * settings.precipitation_factor;
    cell_climate.clouds -= precipitation;
    cell_climate.moisture += precipitation;

    let cloud_maximum = 1.0 - cell.view_elevation() as f32 / (elevation_maximum as f32 + 1.0);
    if cell_climate.clouds > cloud_maximum {
        cell_climate.moisture += cell_climate.clouds - cloud_maximum;
        cell_climate.clouds = cloud_maximum;
    }

    let main_dispersal_direction = settings.wind_direction.opposite();
    let cloud_dispersal = cell_climate.clouds * (1.0 / (5.0 + settings.wind_strength));
    let runoff = cell_climate.moisture * settings.runoff_factor * (1.0 / 6.0);
    let seepage = cell_climate.moisture * settings.seepage_factor * (1.0 / 6.0);

    for (d, n) in cell.neighbors() {
        let neighbor_climate = &mut next_climate[n];
        if d == main_dispersal_direction {
            neighbor_climate.clouds += cloud_dispersal * settings.wind_strength;
        } else {
            neighbor_climate.clouds += cloud_dispersal;
        }

        let elevation_delta = grid.cell(n).view_elevation() - cell.view_elevation();
        if elevation_delta < 0 {
            cell_climate.moisture -= runoff;
            neighbor_climate.moisture += runoff;
        } else if elevation_delta == 0 {
            cell_climate.moisture -= seepage;
            neighbor_climate.moisture += seepage;
        }
    }

    let next = &mut next_climate[index];
    next.moisture = (next.moisture + cell_climate.moisture).min(1.0);
    climate[index] = ClimateData::default();
}
