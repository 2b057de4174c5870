// src/coordinates.rs
//! Координаты гексагональной сетки
//!
//! Ячейки хранятся построчно в «смещённых» координатах (столбец, строка), а
//! вычисления расстояний ведутся в кубических координатах (x, y, z), где
//! `x + y + z == 0`. Хранятся только x и z, y выводится.
//!
//! При горизонтальном зацикливании (`wrap_size > 0`) координата x
//! перенормализуется так, чтобы смещённый столбец лежал в `[0, wrap_size)`.

use serde::{Deserialize, Serialize};

/// Внешний радиус гекса в условных единицах мира
pub const OUTER_RADIUS: f32 = 10.0;

/// Отношение внутреннего радиуса к внешнему (√3 / 2)
pub const OUTER_TO_INNER: f32 = 0.866_025_4;

/// Внутренний радиус гекса
pub const INNER_RADIUS: f32 = OUTER_RADIUS * OUTER_TO_INNER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoordinates {
    x: i32,
    z: i32,
}

impl HexCoordinates {
    /// Создаёт координаты из кубических x и z с учётом зацикливания
    #[must_use]
    pub fn new(mut x: i32, z: i32, wrap_size: i32) -> Self {
        if wrap_size > 0 {
            let offset_x = x + z / 2;
            if offset_x < 0 {
                x += wrap_size;
            } else if offset_x >= wrap_size {
                x -= wrap_size;
            }
        }
        Self { x, z }
    }

    /// Переводит смещённые координаты (столбец, строка) в кубические
    #[must_use]
    pub fn from_offset(x: i32, z: i32, wrap_size: i32) -> Self {
        Self::new(x - z / 2, z, wrap_size)
    }

    #[must_use]
    pub fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(self) -> i32 {
        -self.x - self.z
    }

    #[must_use]
    pub fn z(self) -> i32 {
        self.z
    }

    /// Обратное преобразование в смещённые координаты
    #[must_use]
    pub fn to_offset(self) -> (i32, i32) {
        (self.x + self.z / 2, self.z)
    }

    /// Расстояние в шагах между двумя гексами.
    ///
    /// При зацикливании учитываются обе копии `other`, сдвинутые на ширину карты.
    #[must_use]
    pub fn distance_to(self, other: HexCoordinates, wrap_size: i32) -> i32 {
        let xy = |other_x: i32| {
            let other_y = -other_x - other.z;
            (self.x - other_x).abs() + (self.y() - other_y).abs()
        };

        let mut distance = xy(other.x);
        if wrap_size > 0 {
            let wrapped = xy(other.x + wrap_size);
            if wrapped < distance {
                distance = wrapped;
            } else {
                let wrapped = xy(other.x - wrap_size);
                if wrapped < distance {
                    distance = wrapped;
                }
            }
        }
        (distance + (self.z - other.z).abs()) / 2
    }

    /// Центр гекса на плоскости мира (x, z)
    #[must_use]
    pub fn world_position(self) -> (f32, f32) {
        let (offset_x, offset_z) = self.to_offset();
        let x = (offset_x as f32 + offset_z as f32 * 0.5 - (offset_z / 2) as f32)
            * (INNER_RADIUS * 2.0);
        let z = offset_z as f32 * (OUTER_RADIUS * 1.5);
        (x, z)
    }
}

impl std::fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y(), self.z)
    }
}
