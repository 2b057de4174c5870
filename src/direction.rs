// src/direction.rs
//! Шесть направлений вокруг гексагональной ячейки

use serde::{Deserialize, Serialize};

/// Направление на соседа: по часовой стрелке, начиная с северо-востока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    NE,
    E,
    SE,
    SW,
    W,
    NW,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::NE,
        HexDirection::E,
        HexDirection::SE,
        HexDirection::SW,
        HexDirection::W,
        HexDirection::NW,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    #[must_use]
    pub fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Через одно направление против часовой стрелки (резкий поворот)
    #[must_use]
    pub fn previous2(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// Через одно направление по часовой стрелке (резкий поворот)
    #[must_use]
    pub fn next2(self) -> Self {
        Self::from_index(self.index() + 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
        assert_eq!(HexDirection::NE.opposite(), HexDirection::SW);
        assert_eq!(HexDirection::W.opposite(), HexDirection::E);
    }

    #[test]
    fn rotation_wraps_around() {
        assert_eq!(HexDirection::NE.previous(), HexDirection::NW);
        assert_eq!(HexDirection::NW.next(), HexDirection::NE);
        assert_eq!(HexDirection::NE.previous2(), HexDirection::W);
        assert_eq!(HexDirection::SW.next2(), HexDirection::NW);
    }
}
