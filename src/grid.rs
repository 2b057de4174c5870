// src/grid.rs
//! Сетка ячеек
//!
//! Плоский массив ячеек с индексом `x + z * cell_count_x`. Каждая ячейка знает
//! индексы шести соседей, поэтому граф не содержит ссылок и циклов владения.
//!
//! Все изменения, затрагивающие соседей, проходят через методы этого типа:
//! - смена высоты или уровня воды перепроверяет реки и удаляет невозможные дороги;
//! - река всегда записывается в обе ячейки (исходящая и входящая);
//! - дорога всегда записывается с обеих сторон ребра.
//!
//! Этими же примитивами пользуются генератор и слой редактирования.

use std::ops::RangeInclusive;

use crate::cell::HexCell;
use crate::coordinates::HexCoordinates;
use crate::direction::HexDirection;
use crate::error::MapError;

/// Ширина чанка в ячейках: размеры карты должны быть ей кратны
pub const CHUNK_SIZE_X: usize = 4;
/// Высота чанка в ячейках
pub const CHUNK_SIZE_Z: usize = 4;

/// Максимальный уровень застройки, ферм и растительности
pub const MAX_FEATURE_LEVEL: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexGrid {
    cell_count_x: usize,
    cell_count_z: usize,
    wrapping: bool,
    elevation_range: RangeInclusive<i32>,
    cells: Vec<HexCell>,
}

impl HexGrid {
    /// Создаёт карту из `x × z` ячеек высоты 0.
    ///
    /// # Ошибки
    /// [`MapError::UnsupportedMapSize`], если размер не кратен размеру чанка.
    pub fn new(x: usize, z: usize, wrapping: bool) -> Result<Self, MapError> {
        if x == 0 || z == 0 || x % CHUNK_SIZE_X != 0 || z % CHUNK_SIZE_Z != 0 {
            return Err(MapError::UnsupportedMapSize { x, z });
        }

        let wrap_size = if wrapping { x as i32 } else { 0 };
        let mut cells = Vec::with_capacity(x * z);
        for row in 0..z {
            for column in 0..x {
                let index = cells.len();
                let coordinates =
                    HexCoordinates::from_offset(column as i32, row as i32, wrap_size);
                let mut cell = HexCell::new(index, coordinates);
                cell.explorable = if wrapping {
                    row > 0 && row < z - 1
                } else {
                    column > 0 && row > 0 && column < x - 1 && row < z - 1
                };
                cells.push(cell);
            }
        }

        let mut grid = Self {
            cell_count_x: x,
            cell_count_z: z,
            wrapping,
            elevation_range: i32::MIN..=i32::MAX,
            cells,
        };
        for index in 0..grid.cells.len() {
            let (column, row) = (index % x, index / x);
            for d in HexDirection::ALL {
                grid.cells[index].neighbors[d.index()] = grid.offset_neighbor(column, row, d);
            }
        }
        Ok(grid)
    }

    /// Сосед по направлению в смещённых координатах (нечётные строки сдвинуты вправо)
    fn offset_neighbor(&self, column: usize, row: usize, direction: HexDirection) -> Option<usize> {
        let shift = (row & 1) as i32;
        let (dx, dz) = match direction {
            HexDirection::E => (1, 0),
            HexDirection::W => (-1, 0),
            HexDirection::NE => (shift, 1),
            HexDirection::SE => (shift, -1),
            HexDirection::NW => (shift - 1, 1),
            HexDirection::SW => (shift - 1, -1),
        };
        self.offset_index(column as i32 + dx, row as i32 + dz)
    }

    fn offset_index(&self, mut x: i32, z: i32) -> Option<usize> {
        if z < 0 || z >= self.cell_count_z as i32 {
            return None;
        }
        if self.wrapping {
            x = x.rem_euclid(self.cell_count_x as i32);
        } else if x < 0 || x >= self.cell_count_x as i32 {
            return None;
        }
        Some(x as usize + z as usize * self.cell_count_x)
    }

    #[must_use]
    pub fn cell_count_x(&self) -> usize {
        self.cell_count_x
    }

    #[must_use]
    pub fn cell_count_z(&self) -> usize {
        self.cell_count_z
    }

    #[must_use]
    pub fn wrapping(&self) -> bool {
        self.wrapping
    }

    /// Ширина зацикливания в ячейках (0 — без зацикливания)
    #[must_use]
    pub fn wrap_size(&self) -> i32 {
        if self.wrapping {
            self.cell_count_x as i32
        } else {
            0
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Ячейка по индексу. Паникует при выходе за пределы карты.
    #[must_use]
    pub fn cell(&self, index: usize) -> &HexCell {
        &self.cells[index]
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HexCell> {
        self.cells.get(index)
    }

    /// Индекс ячейки по смещённым координатам (столбец зацикливается при необходимости)
    #[must_use]
    pub fn cell_at_offset(&self, x: i32, z: i32) -> Option<usize> {
        self.offset_index(x, z)
    }

    #[must_use]
    pub fn cell_at(&self, coordinates: HexCoordinates) -> Option<usize> {
        let (x, z) = coordinates.to_offset();
        self.offset_index(x, z)
    }

    #[must_use]
    pub fn neighbor(&self, index: usize, direction: HexDirection) -> Option<usize> {
        self.cells[index].neighbor(direction)
    }

    /// Расстояние в шагах между двумя ячейками
    #[must_use]
    pub fn distance(&self, from: usize, to: usize) -> i32 {
        self.cells[from]
            .coordinates
            .distance_to(self.cells[to].coordinates, self.wrap_size())
    }

    #[must_use]
    pub fn elevation_range(&self) -> RangeInclusive<i32> {
        self.elevation_range.clone()
    }

    /// Ограничивает допустимые высоты; последующие `set_elevation` приводятся к диапазону
    pub fn set_elevation_range(&mut self, minimum: i32, maximum: i32) {
        self.elevation_range = minimum..=maximum;
    }

    pub fn set_elevation(&mut self, index: usize, value: i32) {
        let value = value.clamp(*self.elevation_range.start(), *self.elevation_range.end());
        if self.cells[index].elevation == value {
            return;
        }
        self.cells[index].elevation = value;
        self.validate_rivers(index);

        for d in HexDirection::ALL {
            if self.cells[index].roads[d.index()] && self.elevation_difference(index, d) > 1 {
                self.set_road(index, d, false);
            }
        }
    }

    /// Уровень воды не бывает отрицательным: меньшие значения приводятся к 0
    pub fn set_water_level(&mut self, index: usize, value: i32) {
        let value = value.max(0);
        if self.cells[index].water_level == value {
            return;
        }
        self.cells[index].water_level = value;
        self.validate_rivers(index);
    }

    fn elevation_difference(&self, index: usize, direction: HexDirection) -> i32 {
        match self.cells[index].neighbor(direction) {
            Some(n) => (self.cells[index].elevation - self.cells[n].elevation).abs(),
            None => 0,
        }
    }

    /// Удаляет реки, которые после изменения высоты или воды потекли бы в гору
    fn validate_rivers(&mut self, index: usize) {
        if let Some(d) = self.cells[index].outgoing_river {
            let valid = self.cells[index]
                .neighbor(d)
                .is_some_and(|n| self.cells[index].is_valid_river_destination(&self.cells[n]));
            if !valid {
                self.remove_outgoing_river(index);
            }
        }
        if let Some(d) = self.cells[index].incoming_river {
            let valid = self.cells[index]
                .neighbor(d)
                .is_some_and(|n| self.cells[n].is_valid_river_destination(&self.cells[index]));
            if !valid {
                self.remove_incoming_river(index);
            }
        }
    }

    /// Направляет реку из ячейки к соседу.
    ///
    /// Возвращает `false`, если соседа нет или течение пошло бы в гору. Прежняя
    /// исходящая река ячейки и прежняя входящая река соседа удаляются, особые
    /// объекты на обеих ячейках и дорога на этом ребре сбрасываются.
    pub fn set_outgoing_river(&mut self, index: usize, direction: HexDirection) -> bool {
        if self.cells[index].outgoing_river == Some(direction) {
            return true;
        }
        let Some(neighbor) = self.cells[index].neighbor(direction) else {
            return false;
        };
        if !self.cells[index].is_valid_river_destination(&self.cells[neighbor]) {
            return false;
        }

        self.remove_outgoing_river(index);
        if self.cells[index].incoming_river == Some(direction) {
            self.remove_incoming_river(index);
        }
        let cell = &mut self.cells[index];
        cell.outgoing_river = Some(direction);
        cell.special_index = 0;

        self.remove_incoming_river(neighbor);
        let target = &mut self.cells[neighbor];
        target.incoming_river = Some(direction.opposite());
        target.special_index = 0;

        self.set_road(index, direction, false);
        true
    }

    pub fn remove_outgoing_river(&mut self, index: usize) {
        let Some(d) = self.cells[index].outgoing_river.take() else {
            return;
        };
        if let Some(n) = self.cells[index].neighbor(d) {
            self.cells[n].incoming_river = None;
        }
    }

    pub fn remove_incoming_river(&mut self, index: usize) {
        let Some(d) = self.cells[index].incoming_river.take() else {
            return;
        };
        if let Some(n) = self.cells[index].neighbor(d) {
            self.cells[n].outgoing_river = None;
        }
    }

    pub fn remove_river(&mut self, index: usize) {
        self.remove_outgoing_river(index);
        self.remove_incoming_river(index);
    }

    /// Прокладывает дорогу через ребро.
    ///
    /// Дорога невозможна через реку, к особому объекту и на перепаде высот больше 1.
    pub fn add_road(&mut self, index: usize, direction: HexDirection) -> bool {
        let cell = &self.cells[index];
        let Some(neighbor) = cell.neighbor(direction) else {
            return false;
        };
        let other = &self.cells[neighbor];
        if cell.has_road_through_edge(direction) {
            return true;
        }
        if cell.has_river_through_edge(direction)
            || cell.is_special()
            || other.is_special()
            || (cell.elevation - other.elevation).abs() > 1
        {
            return false;
        }
        self.set_road(index, direction, true);
        true
    }

    pub fn remove_roads(&mut self, index: usize) {
        for d in HexDirection::ALL {
            if self.cells[index].roads[d.index()] {
                self.set_road(index, d, false);
            }
        }
    }

    fn set_road(&mut self, index: usize, direction: HexDirection, state: bool) {
        self.cells[index].roads[direction.index()] = state;
        if let Some(n) = self.cells[index].neighbor(direction) {
            self.cells[n].roads[direction.opposite().index()] = state;
        }
    }

    /// Особый объект занимает всю ячейку: дороги снимаются, на реке не ставится
    pub fn set_special_index(&mut self, index: usize, value: u8) {
        let cell = &mut self.cells[index];
        if cell.special_index != value && !cell.has_river() {
            cell.special_index = value;
            self.remove_roads(index);
        }
    }

    pub fn set_terrain_type_index(&mut self, index: usize, value: u8) {
        self.cells[index].terrain_type_index = value;
    }

    pub fn set_urban_level(&mut self, index: usize, value: u8) {
        self.cells[index].urban_level = value.min(MAX_FEATURE_LEVEL);
    }

    pub fn set_farm_level(&mut self, index: usize, value: u8) {
        self.cells[index].farm_level = value.min(MAX_FEATURE_LEVEL);
    }

    pub fn set_plant_level(&mut self, index: usize, value: u8) {
        self.cells[index].plant_level = value.min(MAX_FEATURE_LEVEL);
    }

    pub fn set_walled(&mut self, index: usize, walled: bool) {
        self.cells[index].walled = walled;
    }

    pub fn set_explored(&mut self, index: usize, explored: bool) {
        self.cells[index].explored = explored;
    }

    /// Помечает все ячейки исследованными (видимость решает внешний слой)
    pub fn explore_all(&mut self) {
        for cell in &mut self.cells {
            cell.explored = true;
        }
    }
}
