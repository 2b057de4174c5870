// src/region.rs
//! Разбиение карты на регионы для формирования суши
//!
//! Регион — прямоугольник смещённых координат, внутри которого выбираются
//! центры чанков. Между регионами остаются проливы шириной `2 * region_border`,
//! а от краёв карты — отступы `map_border_x` / `map_border_z`.
//! При зацикливании левый и правый края не являются краями: вместо отступа
//! используется `region_border` (или 0, если регион занимает всю ширину).

use rand::Rng;

use crate::config::LandSettings;
use crate::error::MapError;

/// Прямоугольник `[x_min, x_max) × [z_min, z_max)` в смещённых координатах
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRegion {
    pub x_min: usize,
    pub x_max: usize,
    pub z_min: usize,
    pub z_max: usize,
}

impl MapRegion {
    /// Случайная ячейка региона (столбец, строка)
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> (usize, usize) {
        (
            rng.gen_range(self.x_min..self.x_max),
            rng.gen_range(self.z_min..self.z_max),
        )
    }

    #[must_use]
    pub fn area(&self) -> usize {
        (self.x_max - self.x_min) * (self.z_max - self.z_min)
    }
}

/// Строит 1–4 региона.
///
/// Для двух регионов случайно выбирается вертикальный или горизонтальный разрез,
/// поэтому здесь расходуется одно значение генератора; в остальных случаях — ни одного.
pub fn create_regions<R: Rng>(
    cell_count_x: usize,
    cell_count_z: usize,
    wrapping: bool,
    land: &LandSettings,
    rng: &mut R,
) -> Result<Vec<MapRegion>, MapError> {
    let (cx, cz) = (cell_count_x as i64, cell_count_z as i64);
    let region_border = land.region_border as i64;
    let border_z = land.map_border_z as i64;
    let mut border_x = if wrapping {
        region_border
    } else {
        land.map_border_x as i64
    };

    let mut bounds: Vec<[i64; 4]> = Vec::with_capacity(4);
    match land.region_count {
        2 => {
            if rng.r#gen::<f32>() < 0.5 {
                bounds.push([border_x, cx / 2 - region_border, border_z, cz - border_z]);
                bounds.push([cx / 2 + region_border, cx - border_x, border_z, cz - border_z]);
            } else {
                if wrapping {
                    border_x = 0;
                }
                bounds.push([border_x, cx - border_x, border_z, cz / 2 - region_border]);
                bounds.push([border_x, cx - border_x, cz / 2 + region_border, cz - border_z]);
            }
        }
        3 => {
            bounds.push([border_x, cx / 3 - region_border, border_z, cz - border_z]);
            bounds.push([
                cx / 3 + region_border,
                cx * 2 / 3 - region_border,
                border_z,
                cz - border_z,
            ]);
            bounds.push([cx * 2 / 3 + region_border, cx - border_x, border_z, cz - border_z]);
        }
        4 => {
            bounds.push([border_x, cx / 2 - region_border, border_z, cz / 2 - region_border]);
            bounds.push([cx / 2 + region_border, cx - border_x, border_z, cz / 2 - region_border]);
            bounds.push([cx / 2 + region_border, cx - border_x, cz / 2 + region_border, cz - border_z]);
            bounds.push([border_x, cx / 2 - region_border, cz / 2 + region_border, cz - border_z]);
        }
        _ => {
            if wrapping {
                border_x = 0;
            }
            bounds.push([border_x, cx - border_x, border_z, cz - border_z]);
        }
    }

    bounds
        .into_iter()
        .map(|[x_min, x_max, z_min, z_max]| {
            if x_min < 0 || z_min < 0 || x_min >= x_max || z_min >= z_max {
                return Err(MapError::InvalidConfig(format!(
                    "borders leave an empty region x {x_min}..{x_max}, z {z_min}..{z_max} \
                     on a {cell_count_x}x{cell_count_z} map"
                )));
            }
            Ok(MapRegion {
                x_min: x_min as usize,
                x_max: x_max as usize,
                z_min: z_min as usize,
                z_max: z_max as usize,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn settings(region_count: usize) -> LandSettings {
        LandSettings {
            region_count,
            map_border_x: 2,
            map_border_z: 2,
            region_border: 2,
            ..LandSettings::default()
        }
    }

    fn overlaps(a: &MapRegion, b: &MapRegion) -> bool {
        a.x_min < b.x_max && b.x_min < a.x_max && a.z_min < b.z_max && b.z_min < a.z_max
    }

    #[test]
    fn single_region_respects_borders() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let regions = create_regions(32, 24, false, &settings(1), &mut rng).unwrap();
        assert_eq!(
            regions,
            vec![MapRegion { x_min: 2, x_max: 30, z_min: 2, z_max: 22 }]
        );

        let wrapped = create_regions(32, 24, true, &settings(1), &mut rng).unwrap();
        assert_eq!(wrapped[0].x_min, 0);
        assert_eq!(wrapped[0].x_max, 32);
    }

    #[test]
    fn regions_never_overlap() {
        for count in 1..=4 {
            for seed in 0..8 {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let regions = create_regions(32, 24, false, &settings(count), &mut rng).unwrap();
                assert_eq!(regions.len(), count);
                for (i, a) in regions.iter().enumerate() {
                    assert!(a.area() > 0);
                    for b in &regions[i + 1..] {
                        assert!(!overlaps(a, b), "{a:?} overlaps {b:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn oversized_borders_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let land = LandSettings {
            region_count: 3,
            ..LandSettings::default()
        };
        assert!(matches!(
            create_regions(12, 12, false, &land, &mut rng),
            Err(MapError::InvalidConfig(_))
        ));
    }
}
