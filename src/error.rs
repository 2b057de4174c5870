// src/error.rs
//! Ошибки библиотеки

use std::fmt;

/// Ошибки создания карты и применения правок
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Размеры карты не кратны размеру чанка (или равны нулю)
    UnsupportedMapSize { x: usize, z: usize },
    /// Параметр конфигурации вне допустимого диапазона
    InvalidConfig(String),
    /// Индекс ячейки за пределами карты
    CellOutOfRange(usize),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::UnsupportedMapSize { x, z } => {
                write!(f, "unsupported map size {x}x{z}")
            }
            MapError::InvalidConfig(reason) => write!(f, "invalid map config: {reason}"),
            MapError::CellOutOfRange(index) => write!(f, "cell index {index} is out of range"),
        }
    }
}

impl std::error::Error for MapError {}
