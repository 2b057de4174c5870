// src/generator.rs
//! Генерация карты целиком
//!
//! Этапы выполняются строго по порядку, каждый изменяет общую сетку:
//! регионы → суша → эрозия → климат → реки → биомы.
//!
//! Все случайные решения берутся из одного генератора `ChaCha8Rng`, засеянного
//! `config.seed`, поэтому одинаковая конфигурация даёт побитово одинаковую карту.

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::biome::{TEMPERATURE_JITTER_CHANNELS, TemperatureField, classify_biomes};
use crate::climate::simulate_climate;
use crate::config::MapGenConfig;
use crate::erosion::erode_land;
use crate::error::MapError;
use crate::grid::HexGrid;
use crate::land::sculpt_land;
use crate::queue::BucketQueue;
use crate::region::create_regions;
use crate::rivers::carve_rivers;

/// Сводка по сгенерированной карте
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GenerationReport {
    /// Ячеек суши после формирования рельефа
    pub land_cells: usize,
    /// Остаток бюджета суши (0 — доля суши достигнута точно)
    pub land_budget_left: usize,
    pub erodible_before: usize,
    pub erodible_after: usize,
    pub rivers: usize,
    pub river_cells: usize,
    pub river_budget_left: usize,
    pub lakes: usize,
    /// Число ячеек каждого типа местности: песок, трава, грязь, камень, снег
    pub terrain_counts: [usize; 5],
}

/// Генератор карт.
///
/// Хранит очередь заливки между вызовами: для карты того же размера она
/// переиспользуется без новой аллокации.
#[derive(Debug, Default)]
pub struct MapGenerator {
    frontier: Option<BucketQueue>,
}

impl MapGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Генерирует карту по конфигурации.
    ///
    /// Конфигурация, размеры и регионы проверяются до создания сетки; при
    /// ошибке никакая карта не создаётся.
    pub fn generate(
        &mut self,
        config: &MapGenConfig,
    ) -> Result<(HexGrid, GenerationReport), MapError> {
        config.validate()?;
        let mut grid = HexGrid::new(config.cell_count_x, config.cell_count_z, config.wrapping)?;
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(config.seed));
        let land = &config.land;

        let regions = create_regions(
            config.cell_count_x,
            config.cell_count_z,
            config.wrapping,
            land,
            &mut rng,
        )?;
        info!(
            "generating {}x{} map, seed {}, {} regions",
            config.cell_count_x,
            config.cell_count_z,
            config.seed,
            regions.len()
        );

        grid.set_elevation_range(land.elevation_minimum, land.elevation_maximum);
        for index in 0..grid.len() {
            grid.set_water_level(index, land.water_level);
        }

        let frontier = self
            .frontier
            .get_or_insert_with(|| BucketQueue::new(grid.len()));
        if frontier.element_count() != grid.len() {
            *frontier = BucketQueue::new(grid.len());
        }
        let land_outcome = sculpt_land(&mut grid, &regions, land, frontier, &mut rng);
        // следующая карта начинает отсчёт фаз заново
        frontier.reset_phases();

        let erosion = erode_land(&mut grid, land, &mut rng);
        let climate = simulate_climate(&grid, &config.climate, land.elevation_maximum);
        let rivers = carve_rivers(
            &mut grid,
            &climate,
            land_outcome.land_cells,
            land,
            &config.rivers,
            &mut rng,
        );

        let jitter_channel = rng.gen_range(0..TEMPERATURE_JITTER_CHANNELS);
        let field = TemperatureField::new(
            &config.temperature,
            land,
            config.cell_count_z,
            config.seed,
            jitter_channel,
        );
        let temperatures = field.sample_all(&grid);
        let terrain_counts = classify_biomes(&mut grid, &climate, land, &temperatures);

        let report = GenerationReport {
            land_cells: land_outcome.land_cells,
            land_budget_left: land_outcome.budget_left,
            erodible_before: erosion.erodible_before,
            erodible_after: erosion.erodible_after,
            rivers: rivers.rivers,
            river_cells: rivers.river_cells,
            river_budget_left: rivers.budget_left,
            lakes: rivers.lakes,
            terrain_counts,
        };
        info!("map generated: {report:?}");
        Ok((grid, report))
    }
}

/// Генерирует одну карту с новым генератором
pub fn generate_map(config: &MapGenConfig) -> Result<(HexGrid, GenerationReport), MapError> {
    MapGenerator::new().generate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u32) -> MapGenConfig {
        let mut config = MapGenConfig {
            seed,
            cell_count_x: 16,
            cell_count_z: 12,
            ..MapGenConfig::default()
        };
        config.land.chunk_size_min = 5;
        config.land.chunk_size_max = 20;
        config.land.map_border_x = 2;
        config.land.map_border_z = 2;
        config.land.region_border = 2;
        config
    }

    #[test]
    fn invalid_config_is_rejected_before_generation() {
        let mut config = small_config(1);
        config.land.sink_probability = 1.5;
        assert!(matches!(generate_map(&config), Err(MapError::InvalidConfig(_))));

        let config = MapGenConfig {
            cell_count_x: 18,
            ..small_config(1)
        };
        assert_eq!(
            generate_map(&config),
            Err(MapError::UnsupportedMapSize { x: 18, z: 12 })
        );
    }

    #[test]
    fn generator_is_reusable() {
        let mut generator = MapGenerator::new();
        let first = generator.generate(&small_config(7)).unwrap();
        let _ = generator.generate(&small_config(8)).unwrap();
        let again = generator.generate(&small_config(7)).unwrap();
        assert_eq!(first, again);
        assert_eq!(first, generate_map(&small_config(7)).unwrap());
    }

    #[test]
    fn report_matches_grid() {
        let (grid, report) = generate_map(&small_config(3)).unwrap();
        assert_eq!(report.terrain_counts.iter().sum::<usize>(), grid.len());
        let river_cells = grid.cells().iter().filter(|c| c.has_river()).count();
        assert!(river_cells >= report.rivers);
        assert!(report.erodible_after <= report.erodible_before);
    }
}
