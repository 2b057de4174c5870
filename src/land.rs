// src/land.rs
//! Формирование суши
//!
//! Суша растёт «чанками»: из случайной ячейки региона запускается заливка,
//! которая обходит ячейки в порядке удаления от центра (с небольшим случайным
//! дрожанием приоритета) и поднимает или опускает каждую на 1–2 уровня.
//! Каждая ячейка, пересёкшая уровень воды, списывается с бюджета суши или
//! возвращается в него. Подъёмы прекращаются, как только бюджет исчерпан.

use log::{debug, info, warn};
use rand::Rng;

use crate::config::LandSettings;
use crate::grid::HexGrid;
use crate::queue::BucketQueue;
use crate::region::MapRegion;

/// Предел итераций: гарантирует завершение, даже если бюджет недостижим
pub const LAND_ITERATION_GUARD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reshape {
    Raise,
    Sink,
}

/// Итог формирования суши
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandOutcome {
    /// Сколько ячеек суши требовалось
    pub land_budget: usize,
    /// Сколько не удалось поднять за отведённые итерации
    pub budget_left: usize,
    /// Фактическое число ячеек суши
    pub land_cells: usize,
}

/// Поднимает сушу, пока её доля не достигнет `land_percentage`.
///
/// Бюджет округляется до ближайшего целого (половина — вверх).
pub fn sculpt_land<R: Rng>(
    grid: &mut HexGrid,
    regions: &[MapRegion],
    land: &LandSettings,
    frontier: &mut BucketQueue,
    rng: &mut R,
) -> LandOutcome {
    let land_budget = (grid.len() * land.land_percentage as usize + 50) / 100;
    let mut budget = land_budget;

    'guard: for _ in 0..LAND_ITERATION_GUARD {
        if budget == 0 {
            break;
        }
        for region in regions {
            let reshape = if rng.r#gen::<f32>() < land.sink_probability {
                Reshape::Sink
            } else {
                Reshape::Raise
            };
            let chunk_size = rng.gen_range(land.chunk_size_min..=land.chunk_size_max);
            budget = reshape_chunk(grid, frontier, reshape, chunk_size, budget, region, land, rng);
            if reshape == Reshape::Raise && budget == 0 {
                break 'guard;
            }
        }
    }

    if budget > 0 {
        warn!("failed to use up {budget} of {land_budget} land budget");
    }
    let land_cells = grid
        .cells()
        .iter()
        .filter(|c| c.elevation() >= land.water_level)
        .count();
    info!(
        "land sculpted: {land_cells} of {} cells above water level {}",
        grid.len(),
        land.water_level
    );

    LandOutcome {
        land_budget,
        budget_left: budget,
        land_cells,
    }
}

/// Одна заливка: поднимает или опускает до `chunk_size` ячеек вокруг случайного центра
#[allow(clippy::too_many_arguments)]
fn reshape_chunk<R: Rng>(
    grid: &mut HexGrid,
    frontier: &mut BucketQueue,
    reshape: Reshape,
    chunk_size: usize,
    mut budget: usize,
    region: &MapRegion,
    land: &LandSettings,
    rng: &mut R,
) -> usize {
    let phase = frontier.advance_phase(1);
    let (x, z) = region.random_cell(rng);
    let first = x + z * grid.cell_count_x();
    let first_element = frontier.element_mut(first);
    first_element.search_phase = phase;
    first_element.distance = 0;
    first_element.heuristic = 0;
    frontier.enqueue(first);
    let center = grid.cell(first).coordinates();
    let wrap_size = grid.wrap_size();

    let step = if rng.r#gen::<f32>() < land.high_rise_probability {
        2
    } else {
        1
    };
    let water_level = land.water_level;

    let mut size = 0;
    while size < chunk_size && !frontier.is_empty() {
        let current = frontier.dequeue();
        let original = grid.cell(current).elevation();
        match reshape {
            Reshape::Raise => {
                let elevation = original + step;
                if elevation > land.elevation_maximum {
                    continue;
                }
                grid.set_elevation(current, elevation);
                if original < water_level && elevation >= water_level {
                    budget -= 1;
                    if budget == 0 {
                        break;
                    }
                }
            }
            Reshape::Sink => {
                let elevation = original - step;
                if elevation < land.elevation_minimum {
                    continue;
                }
                grid.set_elevation(current, elevation);
                if original >= water_level && elevation < water_level {
                    budget += 1;
                }
            }
        }
        size += 1;

        for (_, neighbor) in grid.cell(current).neighbors() {
            if frontier.element(neighbor).search_phase < phase {
                let distance = grid.cell(neighbor).coordinates().distance_to(center, wrap_size);
                let heuristic = i32::from(rng.r#gen::<f32>() < land.jitter_probability);
                let element = frontier.element_mut(neighbor);
                element.search_phase = phase;
                element.distance = distance;
                element.heuristic = heuristic;
                frontier.enqueue(neighbor);
            }
        }
    }
    frontier.clear();

    debug!("{reshape:?} chunk of {size}/{chunk_size} cells at {center}, budget {budget}");
    budget
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::create_regions;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn settings() -> LandSettings {
        LandSettings {
            chunk_size_min: 10,
            chunk_size_max: 30,
            map_border_x: 2,
            map_border_z: 2,
            region_border: 2,
            ..LandSettings::default()
        }
    }

    fn sculpted(seed: u64, land: &LandSettings) -> (HexGrid, LandOutcome) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = HexGrid::new(32, 24, false).unwrap();
        grid.set_elevation_range(land.elevation_minimum, land.elevation_maximum);
        for i in 0..grid.len() {
            grid.set_water_level(i, land.water_level);
        }
        let regions = create_regions(32, 24, false, land, &mut rng).unwrap();
        let mut frontier = BucketQueue::new(grid.len());
        let outcome = sculpt_land(&mut grid, &regions, land, &mut frontier, &mut rng);
        (grid, outcome)
    }

    #[test]
    fn reaches_land_budget_exactly() {
        let land = settings();
        for seed in 0..4 {
            let (grid, outcome) = sculpted(seed, &land);
            assert_eq!(outcome.land_budget, 384);
            assert_eq!(outcome.budget_left, 0);
            let land_count = grid
                .cells()
                .iter()
                .filter(|c| c.elevation() >= land.water_level)
                .count();
            assert_eq!(land_count, outcome.land_cells);
        }
    }

    #[test]
    fn elevations_stay_within_bounds() {
        let land = LandSettings {
            land_percentage: 80,
            sink_probability: 0.4,
            high_rise_probability: 0.9,
            ..settings()
        };
        let (grid, _) = sculpted(11, &land);
        for cell in grid.cells() {
            assert!((land.elevation_minimum..=land.elevation_maximum).contains(&cell.elevation()));
        }
    }

    #[test]
    fn land_count_is_taken_from_the_grid() {
        // карта изначально суша: бюджет не тратится, а опускания уводят его выше исходного
        let land = LandSettings {
            water_level: 0,
            sink_probability: 0.5,
            ..settings()
        };
        let (grid, outcome) = sculpted(2, &land);
        let land_count = grid.cells().iter().filter(|c| c.elevation() >= 0).count();
        assert!(outcome.budget_left > 0);
        assert_eq!(outcome.land_cells, land_count);
        assert_eq!(outcome.budget_left, outcome.land_budget + grid.len() - land_count);
    }

    #[test]
    fn zero_percent_leaves_the_map_flooded() {
        let land = LandSettings {
            land_percentage: 0,
            ..settings()
        };
        let (grid, outcome) = sculpted(3, &land);
        assert_eq!(outcome.land_cells, 0);
        assert!(grid.cells().iter().all(|c| c.is_underwater()));
    }
}
