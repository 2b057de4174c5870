// src/edit.rs
//! Команды редактора карты
//!
//! Внешний редактор описывает изменение одной ячейки командой и применяет её
//! кистью: ко всем ячейкам в пределах заданного расстояния от центра. Каждая
//! команда сводится к примитивам [`HexGrid`], поэтому реки и дороги остаются
//! согласованными так же, как при генерации.

use serde::{Deserialize, Serialize};

use crate::direction::HexDirection;
use crate::error::MapError;
use crate::grid::HexGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum EditCommand {
    /// Высота приводится к допустимому диапазону карты
    SetElevation(i32),
    SetWaterLevel(i32),
    SetTerrainType(u8),
    SetUrbanLevel(u8),
    SetFarmLevel(u8),
    SetPlantLevel(u8),
    SetSpecialIndex(u8),
    SetWalled(bool),
    RemoveRiver,
    SetOutgoingRiver(HexDirection),
    AddRoad(HexDirection),
    RemoveRoads,
    SetExplored(bool),
}

impl HexGrid {
    /// Применяет команду к одной ячейке.
    ///
    /// Команды, которые не могут быть выполнены (река в гору, дорога через
    /// обрыв), молча ничего не меняют, как и соответствующие примитивы.
    pub fn apply_edit(&mut self, index: usize, command: EditCommand) -> Result<(), MapError> {
        if index >= self.len() {
            return Err(MapError::CellOutOfRange(index));
        }
        match command {
            EditCommand::SetElevation(value) => self.set_elevation(index, value),
            EditCommand::SetWaterLevel(value) => self.set_water_level(index, value),
            EditCommand::SetTerrainType(value) => self.set_terrain_type_index(index, value),
            EditCommand::SetUrbanLevel(value) => self.set_urban_level(index, value),
            EditCommand::SetFarmLevel(value) => self.set_farm_level(index, value),
            EditCommand::SetPlantLevel(value) => self.set_plant_level(index, value),
            EditCommand::SetSpecialIndex(value) => self.set_special_index(index, value),
            EditCommand::SetWalled(walled) => self.set_walled(index, walled),
            EditCommand::RemoveRiver => self.remove_river(index),
            EditCommand::SetOutgoingRiver(direction) => {
                self.set_outgoing_river(index, direction);
            }
            EditCommand::AddRoad(direction) => {
                self.add_road(index, direction);
            }
            EditCommand::RemoveRoads => self.remove_roads(index),
            EditCommand::SetExplored(explored) => self.set_explored(index, explored),
        }
        Ok(())
    }

    /// Ячейки в пределах `size` шагов от `center`, включая сам центр
    #[must_use]
    pub fn cells_within(&self, center: usize, size: usize) -> Vec<usize> {
        let Some(center_cell) = self.get(center) else {
            return Vec::new();
        };
        let center_coordinates = center_cell.coordinates();
        let wrap_size = self.wrap_size();
        self.cells()
            .iter()
            .filter(|cell| cell.coordinates().distance_to(center_coordinates, wrap_size) <= size as i32)
            .map(|cell| cell.index())
            .collect()
    }

    /// Применяет команду ко всем ячейкам кисти радиуса `size`.
    ///
    /// Возвращает число затронутых ячеек.
    pub fn apply_brush(
        &mut self,
        center: usize,
        size: usize,
        command: EditCommand,
    ) -> Result<usize, MapError> {
        if center >= self.len() {
            return Err(MapError::CellOutOfRange(center));
        }
        let cells = self.cells_within(center, size);
        for &index in &cells {
            self.apply_edit(index, command)?;
        }
        Ok(cells.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brush_covers_a_hexagon() {
        let mut grid = HexGrid::new(12, 12, false).unwrap();
        let center = grid.cell_at_offset(6, 6).unwrap();
        assert_eq!(grid.apply_brush(center, 0, EditCommand::SetElevation(2)), Ok(1));
        assert_eq!(grid.apply_brush(center, 1, EditCommand::SetElevation(2)), Ok(7));
        assert_eq!(grid.apply_brush(center, 2, EditCommand::SetElevation(2)), Ok(19));
        let raised = grid.cells().iter().filter(|c| c.elevation() == 2).count();
        assert_eq!(raised, 19);
    }

    #[test]
    fn brush_is_clipped_by_map_edges() {
        let mut grid = HexGrid::new(8, 8, false).unwrap();
        let affected = grid.apply_brush(0, 1, EditCommand::SetWalled(true)).unwrap();
        assert!(affected < 7);
        assert!(grid.cell(0).walled());
    }

    #[test]
    fn elevation_edit_is_clamped() {
        let mut grid = HexGrid::new(4, 4, false).unwrap();
        grid.set_elevation_range(-2, 8);
        grid.apply_edit(5, EditCommand::SetElevation(50)).unwrap();
        assert_eq!(grid.cell(5).elevation(), 8);
    }

    #[test]
    fn negative_water_level_is_raised_to_zero() {
        let mut grid = HexGrid::new(4, 4, false).unwrap();
        grid.apply_edit(5, EditCommand::SetWaterLevel(2)).unwrap();
        assert_eq!(grid.cell(5).water_level(), 2);
        grid.apply_edit(5, EditCommand::SetWaterLevel(-3)).unwrap();
        assert_eq!(grid.cell(5).water_level(), 0);

        grid.apply_brush(5, 1, EditCommand::SetWaterLevel(-1)).unwrap();
        assert!(grid.cells().iter().all(|c| c.water_level() >= 0));
    }

    #[test]
    fn feature_levels_saturate() {
        let mut grid = HexGrid::new(4, 4, false).unwrap();
        grid.apply_edit(5, EditCommand::SetUrbanLevel(9)).unwrap();
        grid.apply_edit(5, EditCommand::SetFarmLevel(2)).unwrap();
        assert_eq!(grid.cell(5).urban_level(), 3);
        assert_eq!(grid.cell(5).farm_level(), 2);
    }

    #[test]
    fn river_and_road_edits_keep_both_sides() {
        let mut grid = HexGrid::new(4, 4, false).unwrap();
        grid.apply_edit(5, EditCommand::SetElevation(1)).unwrap();
        grid.apply_edit(5, EditCommand::SetOutgoingRiver(HexDirection::E)).unwrap();
        assert_eq!(grid.cell(6).incoming_river(), Some(HexDirection::W));

        // дорога через реку не прокладывается
        grid.apply_edit(5, EditCommand::AddRoad(HexDirection::E)).unwrap();
        assert!(!grid.cell(5).has_road_through_edge(HexDirection::E));

        grid.apply_edit(6, EditCommand::RemoveRiver).unwrap();
        assert!(!grid.cell(5).has_river());

        grid.apply_edit(5, EditCommand::AddRoad(HexDirection::E)).unwrap();
        assert!(grid.cell(6).has_road_through_edge(HexDirection::W));
        grid.apply_edit(6, EditCommand::RemoveRoads).unwrap();
        assert!(!grid.cell(5).has_roads());
    }

    #[test]
    fn special_index_is_refused_on_rivers() {
        let mut grid = HexGrid::new(4, 4, false).unwrap();
        grid.apply_edit(5, EditCommand::SetOutgoingRiver(HexDirection::E)).unwrap();
        grid.apply_edit(5, EditCommand::SetSpecialIndex(2)).unwrap();
        assert!(!grid.cell(5).is_special());
        grid.apply_edit(9, EditCommand::SetSpecialIndex(2)).unwrap();
        assert_eq!(grid.cell(9).special_index(), 2);
    }

    #[test]
    fn out_of_range_cell_is_an_error() {
        let mut grid = HexGrid::new(4, 4, false).unwrap();
        assert_eq!(
            grid.apply_edit(16, EditCommand::RemoveRoads),
            Err(MapError::CellOutOfRange(16))
        );
        assert!(grid.apply_brush(99, 1, EditCommand::RemoveRoads).is_err());
    }

    #[test]
    fn commands_read_from_json() {
        let command: EditCommand =
            serde_json::from_str(r#"{"command":"add_road","value":"SE"}"#).unwrap();
        assert_eq!(command, EditCommand::AddRoad(HexDirection::SE));
        let command: EditCommand = serde_json::from_str(r#"{"command":"remove_roads"}"#).unwrap();
        assert_eq!(command, EditCommand::RemoveRoads);
    }
}
