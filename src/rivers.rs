// src/rivers.rs
//! Реки и озёра
//!
//! Истоки выбираются из пула, где каждая ячейка суши представлена тем чаще,
//! чем она влажнее и выше. Река — случайное блуждание: из текущей ячейки она
//! течёт к соседу не выше себя, предпочитая спуск и избегая резких поворотов
//! на ровном месте. Встретив чужую реку, она впадает в неё; упершись в низину,
//! разливается озером.

use log::{debug, info, warn};
use rand::Rng;

use crate::climate::ClimateData;
use crate::config::{LandSettings, RiverSettings};
use crate::direction::HexDirection;
use crate::grid::HexGrid;

/// Итог прокладки рек
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiverOutcome {
    pub rivers: usize,
    pub river_cells: usize,
    pub budget_left: usize,
    pub lakes: usize,
}

/// Вес ячейки как истока: влажность, умноженная на относительную высоту над водой
#[must_use]
pub fn origin_weight(moisture: f32, elevation: i32, land: &LandSettings) -> f32 {
    moisture * (elevation - land.water_level) as f32
        / (land.elevation_maximum - land.water_level) as f32
}

/// Пул истоков: ячейка с весом > 0.25 входит один раз, > 0.5 — дважды, > 0.75 — четырежды
fn river_origins(grid: &HexGrid, climate: &[ClimateData], land: &LandSettings) -> Vec<usize> {
    let mut origins = Vec::new();
    for cell in grid.cells() {
        if cell.is_underwater() {
            continue;
        }
        let weight = origin_weight(climate[cell.index()].moisture, cell.elevation(), land);
        if weight > 0.75 {
            origins.push(cell.index());
            origins.push(cell.index());
        }
        if weight > 0.5 {
            origins.push(cell.index());
        }
        if weight > 0.25 {
            origins.push(cell.index());
        }
    }
    origins
}

pub fn carve_rivers<R: Rng>(
    grid: &mut HexGrid,
    climate: &[ClimateData],
    land_cells: usize,
    land: &LandSettings,
    settings: &RiverSettings,
    rng: &mut R,
) -> RiverOutcome {
    let mut origins = river_origins(grid, climate, land);
    let mut budget = (land_cells * settings.river_percentage as usize + 50) / 100;
    let mut outcome = RiverOutcome::default();
    let mut flow_directions = Vec::with_capacity(36);

    while budget > 0 && !origins.is_empty() {
        let origin = origins.swap_remove(rng.gen_range(0..origins.len()));
        if grid.cell(origin).has_river() {
            continue;
        }
        // не начинаем рядом с водой или чужой рекой, чтобы реки не сливались у истока
        let crowded = grid.cell(origin).neighbors().any(|(_, n)| {
            let neighbor = grid.cell(n);
            neighbor.has_river() || neighbor.is_underwater()
        });
        if crowded {
            continue;
        }

        let length = carve_river(
            grid,
            origin,
            settings.extra_lake_probability,
            &mut flow_directions,
            &mut outcome.lakes,
            rng,
        );
        if length > 0 {
            outcome.rivers += 1;
            outcome.river_cells += length;
            debug!("river of length {length} from {}", grid.cell(origin).coordinates());
        }
        budget = budget.saturating_sub(length);
    }

    if budget > 0 {
        warn!("failed to use up river budget, {budget} cells left");
    }
    outcome.budget_left = budget;
    info!(
        "rivers: {} carved over {} cells, {} lakes",
        outcome.rivers, outcome.river_cells, outcome.lakes
    );
    outcome
}

/// Прокладывает одну реку и возвращает её длину в ячейках (0 — исток без стока)
pub(crate) fn carve_river<R: Rng>(
    grid: &mut HexGrid,
    origin: usize,
    extra_lake_probability: f32,
    flow_directions: &mut Vec<HexDirection>,
    lakes: &mut usize,
    rng: &mut R,
) -> usize {
    let mut length = 1;
    let mut cell = origin;
    let mut direction = HexDirection::NE;

    while !grid.cell(cell).is_underwater() {
        let elevation = grid.cell(cell).elevation();
        let mut min_neighbor_elevation = i32::MAX;
        flow_directions.clear();

        for d in HexDirection::ALL {
            let Some(n) = grid.neighbor(cell, d) else {
                continue;
            };
            let neighbor = grid.cell(n);
            min_neighbor_elevation = min_neighbor_elevation.min(neighbor.elevation());

            if n == origin || neighbor.has_incoming_river() {
                continue;
            }
            let delta = neighbor.elevation() - elevation;
            if delta > 0 {
                continue;
            }
            if neighbor.has_outgoing_river() {
                grid.set_outgoing_river(cell, d);
                return length;
            }

            if delta < 0 {
                flow_directions.extend([d, d, d]);
            }
            if length == 1 || (d != direction.next2() && d != direction.previous2()) {
                flow_directions.push(d);
            }
            flow_directions.push(d);
        }

        if flow_directions.is_empty() {
            if length == 1 {
                return 0;
            }
            if min_neighbor_elevation >= elevation {
                grid.set_water_level(cell, min_neighbor_elevation);
                if min_neighbor_elevation == elevation {
                    grid.set_elevation(cell, min_neighbor_elevation - 1);
                }
                *lakes += 1;
            }
            break;
        }

        direction = flow_directions[rng.gen_range(0..flow_directions.len())];
        if !grid.set_outgoing_river(cell, direction) {
            break;
        }
        length += 1;

        if min_neighbor_elevation >= elevation && rng.r#gen::<f32>() < extra_lake_probability {
            grid.set_water_level(cell, elevation);
            grid.set_elevation(cell, elevation - 1);
            *lakes += 1;
        }

        let Some(next) = grid.neighbor(cell, direction) else {
            break;
        };
        cell = next;
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Склон, понижающийся слева направо, с морем в двух правых столбцах
    fn slope() -> HexGrid {
        let mut grid = HexGrid::new(8, 8, false).unwrap();
        grid.set_elevation_range(-2, 8);
        for i in 0..grid.len() {
            let x = (i % 8) as i32;
            grid.set_water_level(i, 3);
            grid.set_elevation(i, 8 - x);
        }
        grid
    }

    fn assert_rivers_consistent(grid: &HexGrid) {
        for cell in grid.cells() {
            if let Some(d) = cell.outgoing_river() {
                let n = grid.neighbor(cell.index(), d).expect("river leaves the map");
                assert_eq!(grid.cell(n).incoming_river(), Some(d.opposite()));
                assert!(cell.is_valid_river_destination(grid.cell(n)));
            }
            if let Some(d) = cell.incoming_river() {
                let n = grid.neighbor(cell.index(), d).expect("river enters from outside");
                assert_eq!(grid.cell(n).outgoing_river(), Some(d.opposite()));
            }
        }
    }

    #[test]
    fn river_runs_downhill_into_the_sea() {
        let mut grid = slope();
        let origin = grid.cell_at_offset(1, 4).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut lakes = 0;
        let length = carve_river(&mut grid, origin, 0.0, &mut Vec::new(), &mut lakes, &mut rng);

        assert!(length >= 2, "length {length}");
        assert_eq!(lakes, 0);
        assert_rivers_consistent(&grid);

        // идём по течению до воды
        let mut cell = origin;
        let mut steps = 1;
        while let Some(d) = grid.cell(cell).outgoing_river() {
            let next = grid.neighbor(cell, d).unwrap();
            assert!(grid.cell(next).elevation() <= grid.cell(cell).elevation());
            cell = next;
            steps += 1;
        }
        assert_eq!(steps, length);
        assert!(grid.cell(cell).is_underwater());
    }

    #[test]
    fn pit_origin_is_discarded() {
        let mut grid = slope();
        let origin = grid.cell_at_offset(3, 3).unwrap();
        grid.set_elevation(origin, 0);
        grid.set_water_level(origin, 0);
        let mut lakes = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let length = carve_river(&mut grid, origin, 0.0, &mut Vec::new(), &mut lakes, &mut rng);
        assert_eq!(length, 0);
        assert!(!grid.cell(origin).has_river());
    }

    #[test]
    fn river_ending_in_a_basin_forms_a_lake() {
        let mut grid = HexGrid::new(8, 8, false).unwrap();
        grid.set_elevation_range(-2, 8);
        for i in 0..grid.len() {
            grid.set_elevation(i, 6);
        }
        let origin = grid.cell_at_offset(3, 3).unwrap();
        let basin = grid.neighbor(origin, HexDirection::E).unwrap();
        grid.set_elevation(origin, 5);
        grid.set_elevation(basin, 4);

        let mut lakes = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let length = carve_river(&mut grid, origin, 0.0, &mut Vec::new(), &mut lakes, &mut rng);
        assert_eq!(length, 2);
        assert_eq!(lakes, 1);
        assert!(grid.cell(basin).is_underwater());
        assert_eq!(grid.cell(origin).outgoing_river(), Some(HexDirection::E));
        assert_rivers_consistent(&grid);
    }

    #[test]
    fn origin_weight_scales_with_height() {
        let land = LandSettings::default();
        assert!((origin_weight(1.0, land.elevation_maximum, &land) - 1.0).abs() < 1e-6);
        assert!(origin_weight(1.0, land.water_level, &land).abs() < 1e-6);
        assert!(origin_weight(0.5, 6, &land) > 0.25);
    }
}
