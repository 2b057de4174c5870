// src/erosion.rs
//! Эрозия обрывов
//!
//! Ячейка считается эродируемой, если хотя бы один сосед ниже неё на 2 и более.
//! Случайная эродируемая ячейка отдаёт один уровень высоты случайному такому
//! соседу, пока число эродируемых ячеек не опустится до
//! `(100 - erosion_percentage)%` от исходного. Материал перемещается, а не
//! исчезает: сумма высот не меняется.
//!
//! Множество эродируемых ячеек обновляется локально (изменившиеся ячейки и их
//! соседи), без повторного обхода всей карты.

use log::info;
use rand::Rng;

use crate::config::LandSettings;
use crate::grid::HexGrid;

/// Итог эрозии
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErosionOutcome {
    pub erodible_before: usize,
    pub erodible_after: usize,
}

/// Множество индексов с O(1) вставкой, удалением и проверкой
#[derive(Debug)]
struct ErodibleSet {
    cells: Vec<usize>,
    position: Vec<Option<usize>>,
}

impl ErodibleSet {
    fn new(cell_count: usize) -> Self {
        Self {
            cells: Vec::new(),
            position: vec![None; cell_count],
        }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn contains(&self, cell: usize) -> bool {
        self.position[cell].is_some()
    }

    fn insert(&mut self, cell: usize) {
        if !self.contains(cell) {
            self.position[cell] = Some(self.cells.len());
            self.cells.push(cell);
        }
    }

    fn remove(&mut self, cell: usize) {
        let Some(slot) = self.position[cell].take() else {
            return;
        };
        self.cells.swap_remove(slot);
        if let Some(&moved) = self.cells.get(slot) {
            self.position[moved] = Some(slot);
        }
    }
}

#[must_use]
pub fn is_erodible(grid: &HexGrid, index: usize) -> bool {
    let erodible_elevation = grid.cell(index).elevation() - 2;
    grid.cell(index)
        .neighbors()
        .any(|(_, n)| grid.cell(n).elevation() <= erodible_elevation)
}

/// Случайный сосед, который ниже ячейки хотя бы на 2
fn erosion_target<R: Rng>(grid: &HexGrid, index: usize, rng: &mut R) -> Option<usize> {
    let erodible_elevation = grid.cell(index).elevation() - 2;
    let candidates: Vec<usize> = grid
        .cell(index)
        .neighbors()
        .map(|(_, n)| n)
        .filter(|&n| grid.cell(n).elevation() <= erodible_elevation)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

pub fn erode_land<R: Rng>(grid: &mut HexGrid, land: &LandSettings, rng: &mut R) -> ErosionOutcome {
    let mut erodible = ErodibleSet::new(grid.len());
    for index in 0..grid.len() {
        if is_erodible(grid, index) {
            erodible.insert(index);
        }
    }
    let erodible_before = erodible.len();
    let target_count = erodible_before * (100 - land.erosion_percentage as usize) / 100;

    while erodible.len() > target_count {
        let cell = erodible.cells[rng.gen_range(0..erodible.len())];
        let Some(target) = erosion_target(grid, cell, rng) else {
            if !is_erodible(grid, cell) {
                erodible.remove(cell);
            }
            continue;
        };

        grid.set_elevation(cell, grid.cell(cell).elevation() - 1);
        grid.set_elevation(target, grid.cell(target).elevation() + 1);

        if !is_erodible(grid, cell) {
            erodible.remove(cell);
        }
        // соседи, для которых опустившаяся ячейка стала обрывом
        let cell_elevation = grid.cell(cell).elevation();
        let newly_erodible: Vec<usize> = grid
            .cell(cell)
            .neighbors()
            .map(|(_, n)| n)
            .filter(|&n| grid.cell(n).elevation() == cell_elevation + 2)
            .collect();
        for n in newly_erodible {
            erodible.insert(n);
        }

        if is_erodible(grid, target) {
            erodible.insert(target);
        }
        // соседи, для которых поднявшаяся ячейка была единственным обрывом
        let target_elevation = grid.cell(target).elevation();
        let no_longer_erodible: Vec<usize> = grid
            .cell(target)
            .neighbors()
            .map(|(_, n)| n)
            .filter(|&n| {
                n != cell
                    && grid.cell(n).elevation() == target_elevation + 1
                    && !is_erodible(grid, n)
            })
            .collect();
        for n in no_longer_erodible {
            erodible.remove(n);
        }
    }

    info!(
        "erosion: {} erodible cells reduced to {} (target {target_count})",
        erodible_before,
        erodible.len()
    );
    ErosionOutcome {
        erodible_before,
        erodible_after: erodible.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rugged_grid(seed: u64) -> HexGrid {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = HexGrid::new(16, 12, false).unwrap();
        grid.set_elevation_range(-2, 8);
        for i in 0..grid.len() {
            grid.set_elevation(i, rng.gen_range(-2..=8));
        }
        grid
    }

    fn elevation_sum(grid: &HexGrid) -> i32 {
        grid.cells().iter().map(|c| c.elevation()).sum()
    }

    #[test]
    fn erosion_conserves_material_and_tracks_membership() {
        for seed in 0..4 {
            let mut grid = rugged_grid(seed);
            let sum = elevation_sum(&grid);
            let land = LandSettings {
                erosion_percentage: 50,
                ..LandSettings::default()
            };
            let mut rng = ChaCha8Rng::seed_from_u64(seed + 100);
            let outcome = erode_land(&mut grid, &land, &mut rng);

            assert_eq!(elevation_sum(&grid), sum);
            assert!(outcome.erodible_after <= outcome.erodible_before / 2);
            let rescanned = (0..grid.len()).filter(|&i| is_erodible(&grid, i)).count();
            assert_eq!(rescanned, outcome.erodible_after, "incremental set drifted");
        }
    }

    #[test]
    fn zero_percent_changes_nothing() {
        let mut grid = rugged_grid(9);
        let before = grid.clone();
        let land = LandSettings {
            erosion_percentage: 0,
            ..LandSettings::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        erode_land(&mut grid, &land, &mut rng);
        assert_eq!(grid, before);
    }

    #[test]
    fn full_erosion_removes_every_cliff() {
        let mut grid = rugged_grid(5);
        let land = LandSettings {
            erosion_percentage: 100,
            ..LandSettings::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let outcome = erode_land(&mut grid, &land, &mut rng);
        assert_eq!(outcome.erodible_after, 0);
        assert!((0..grid.len()).all(|i| !is_erodible(&grid, i)));
    }
}
