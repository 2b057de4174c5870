// src/cell.rs
//! Ячейка карты
//!
//! Ячейка хранит все атрибуты рельефа и индексы шести соседей в общем массиве
//! [`HexGrid`](crate::grid::HexGrid). Изменение атрибутов, которые затрагивают
//! соседей (реки, дороги, высота), выполняется только через методы сетки, поэтому
//! здесь доступны лишь запросы.

use crate::coordinates::HexCoordinates;
use crate::direction::HexDirection;

/// Тип ребра между двумя ячейками по перепаду высот
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexEdgeType {
    Flat,
    Slope,
    Cliff,
}

impl HexEdgeType {
    #[must_use]
    pub fn between(elevation1: i32, elevation2: i32) -> Self {
        match (elevation1 - elevation2).abs() {
            0 => HexEdgeType::Flat,
            1 => HexEdgeType::Slope,
            _ => HexEdgeType::Cliff,
        }
    }
}

/// Индексы типов местности, которые назначает классификатор биомов
pub mod terrain {
    pub const SAND: u8 = 0;
    pub const GRASS: u8 = 1;
    pub const MUD: u8 = 2;
    pub const STONE: u8 = 3;
    pub const SNOW: u8 = 4;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexCell {
    pub(crate) index: usize,
    pub(crate) coordinates: HexCoordinates,
    /// `None` — край карты
    pub(crate) neighbors: [Option<usize>; 6],
    pub(crate) elevation: i32,
    pub(crate) water_level: i32,
    pub(crate) incoming_river: Option<HexDirection>,
    pub(crate) outgoing_river: Option<HexDirection>,
    pub(crate) roads: [bool; 6],
    pub(crate) terrain_type_index: u8,
    pub(crate) urban_level: u8,
    pub(crate) farm_level: u8,
    pub(crate) plant_level: u8,
    pub(crate) special_index: u8,
    pub(crate) walled: bool,
    pub(crate) explorable: bool,
    pub(crate) explored: bool,
}

impl HexCell {
    pub(crate) fn new(index: usize, coordinates: HexCoordinates) -> Self {
        Self {
            index,
            coordinates,
            neighbors: [None; 6],
            elevation: 0,
            water_level: 0,
            incoming_river: None,
            outgoing_river: None,
            roads: [false; 6],
            terrain_type_index: 0,
            urban_level: 0,
            farm_level: 0,
            plant_level: 0,
            special_index: 0,
            walled: false,
            explorable: false,
            explored: false,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn coordinates(&self) -> HexCoordinates {
        self.coordinates
    }

    #[must_use]
    pub fn neighbor(&self, direction: HexDirection) -> Option<usize> {
        self.neighbors[direction.index()]
    }

    /// Соседи вместе с направлениями, без пропусков на краю карты
    pub fn neighbors(&self) -> impl Iterator<Item = (HexDirection, usize)> + '_ {
        HexDirection::ALL
            .into_iter()
            .filter_map(|d| self.neighbor(d).map(|n| (d, n)))
    }

    #[must_use]
    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    #[must_use]
    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    #[must_use]
    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation
    }

    /// Высота поверхности: уровень воды для затопленной ячейки
    #[must_use]
    pub fn view_elevation(&self) -> i32 {
        self.elevation.max(self.water_level)
    }

    #[must_use]
    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.incoming_river
    }

    #[must_use]
    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.outgoing_river
    }

    #[must_use]
    pub fn has_incoming_river(&self) -> bool {
        self.incoming_river.is_some()
    }

    #[must_use]
    pub fn has_outgoing_river(&self) -> bool {
        self.outgoing_river.is_some()
    }

    #[must_use]
    pub fn has_river(&self) -> bool {
        self.has_incoming_river() || self.has_outgoing_river()
    }

    /// Исток или устье: река только входит или только выходит
    #[must_use]
    pub fn has_river_begin_or_end(&self) -> bool {
        self.has_incoming_river() != self.has_outgoing_river()
    }

    #[must_use]
    pub fn river_begin_or_end_direction(&self) -> Option<HexDirection> {
        if !self.has_river_begin_or_end() {
            return None;
        }
        self.incoming_river.or(self.outgoing_river)
    }

    #[must_use]
    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    /// Река может течь отсюда в `neighbor`, только если течение не идёт в гору.
    /// Исключение: сток из озера, уровень воды которого совпадает с высотой соседа.
    #[must_use]
    pub fn is_valid_river_destination(&self, neighbor: &HexCell) -> bool {
        self.elevation >= neighbor.elevation || self.water_level == neighbor.elevation
    }

    #[must_use]
    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads[direction.index()]
    }

    #[must_use]
    pub fn has_roads(&self) -> bool {
        self.roads.iter().any(|&road| road)
    }

    #[must_use]
    pub fn terrain_type_index(&self) -> u8 {
        self.terrain_type_index
    }

    #[must_use]
    pub fn urban_level(&self) -> u8 {
        self.urban_level
    }

    #[must_use]
    pub fn farm_level(&self) -> u8 {
        self.farm_level
    }

    #[must_use]
    pub fn plant_level(&self) -> u8 {
        self.plant_level
    }

    #[must_use]
    pub fn special_index(&self) -> u8 {
        self.special_index
    }

    #[must_use]
    pub fn is_special(&self) -> bool {
        self.special_index > 0
    }

    #[must_use]
    pub fn walled(&self) -> bool {
        self.walled
    }

    #[must_use]
    pub fn explorable(&self) -> bool {
        self.explorable
    }

    #[must_use]
    pub fn is_explored(&self) -> bool {
        self.explored && self.explorable
    }

    #[must_use]
    pub fn edge_type_to(&self, other: &HexCell) -> HexEdgeType {
        HexEdgeType::between(self.elevation, other.elevation)
    }
}
