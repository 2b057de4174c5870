// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Размеры карты и зацикливание по горизонтали
//! - Формирование суши (регионы, чанки, эрозия)
//! - Климат (испарение, осадки, ветер)
//! - Реки и озёра
//! - Температура и полушария
//!
//! Конфигурация читается из TOML; отсутствующие поля и секции берутся по умолчанию.
//! Значения по умолчанию заданы явными функциями и совпадают с `Default`.

use serde::{Deserialize, Serialize};
use std::fs;

use crate::direction::HexDirection;
use crate::error::MapError;

/// Какое полушарие изображает карта
///
/// Определяет, как широта (номер строки) переводится в температуру.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HemisphereMode {
    /// Экватор посередине, полюса сверху и снизу
    #[default]
    Both,
    /// Полюс сверху, экватор снизу
    North,
    /// Экватор сверху, полюс снизу
    South,
}

/// Настройки формирования суши
///
/// Управляют регионами, размером «чанков» подъёма/опускания и эрозией.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandSettings {
    /// Вероятность того, что соседняя ячейка получит +1 к приоритету (рваные края чанков)
    #[serde(default = "default_jitter_probability")]
    pub jitter_probability: f32,

    /// Минимальный размер чанка в ячейках
    #[serde(default = "default_chunk_size_min")]
    pub chunk_size_min: usize,

    /// Максимальный размер чанка в ячейках
    #[serde(default = "default_chunk_size_max")]
    pub chunk_size_max: usize,

    /// Вероятность подъёма/опускания сразу на 2 уровня вместо 1
    #[serde(default = "default_high_rise_probability")]
    pub high_rise_probability: f32,

    /// Вероятность того, что итерация опустит сушу вместо подъёма
    #[serde(default = "default_sink_probability")]
    pub sink_probability: f32,

    /// Целевая доля суши в процентах
    #[serde(default = "default_land_percentage")]
    pub land_percentage: u32,

    /// Уровень воды, одинаковый для всех ячеек в начале генерации
    #[serde(default = "default_water_level")]
    pub water_level: i32,

    /// Минимальная высота ячейки
    #[serde(default = "default_elevation_minimum")]
    pub elevation_minimum: i32,

    /// Максимальная высота ячейки
    #[serde(default = "default_elevation_maximum")]
    pub elevation_maximum: i32,

    /// Отступ регионов от левого и правого края карты
    #[serde(default = "default_map_border")]
    pub map_border_x: usize,

    /// Отступ регионов от верхнего и нижнего края карты
    #[serde(default = "default_map_border")]
    pub map_border_z: usize,

    /// Полуширина пролива между соседними регионами
    #[serde(default = "default_region_border")]
    pub region_border: usize,

    /// Количество регионов (1–4)
    #[serde(default = "default_region_count")]
    pub region_count: usize,

    /// Доля эродируемых ячеек (в процентах), которая будет сглажена
    #[serde(default = "default_erosion_percentage")]
    pub erosion_percentage: u32,
}

fn default_jitter_probability() -> f32 {
    0.25
}
fn default_chunk_size_min() -> usize {
    30
}
fn default_chunk_size_max() -> usize {
    100
}
fn default_high_rise_probability() -> f32 {
    0.25
}
fn default_sink_probability() -> f32 {
    0.2
}
fn default_land_percentage() -> u32 {
    50
}
fn default_water_level() -> i32 {
    3
}
fn default_elevation_minimum() -> i32 {
    -2
}
fn default_elevation_maximum() -> i32 {
    8
}
fn default_map_border() -> usize {
    5
}
fn default_region_border() -> usize {
    5
}
fn default_region_count() -> usize {
    1
}
fn default_erosion_percentage() -> u32 {
    50
}

impl Default for LandSettings {
    fn default() -> Self {
        Self {
            jitter_probability: 0.25,
            chunk_size_min: 30,
            chunk_size_max: 100,
            high_rise_probability: 0.25,
            sink_probability: 0.2,
            land_percentage: 50,
            water_level: 3,
            elevation_minimum: -2,
            elevation_maximum: 8,
            map_border_x: 5,
            map_border_z: 5,
            region_border: 5,
            region_count: 1,
            erosion_percentage: 50,
        }
    }
}

/// Настройки климатической симуляции
///
/// Влажность и облака переносятся между соседями 40 циклов подряд.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimateSettings {
    /// Начальная влажность каждой ячейки
    #[serde(default = "default_starting_moisture")]
    pub starting_moisture: f32,

    /// Доля влаги, испаряющейся с суши в облака за цикл (и приток облаков над водой)
    #[serde(default = "default_evaporation_factor")]
    pub evaporation_factor: f32,

    /// Доля облаков, выпадающих осадками за цикл
    #[serde(default = "default_precipitation_factor")]
    pub precipitation_factor: f32,

    /// Доля влаги, стекающей к более низкому соседу
    #[serde(default = "default_runoff_factor")]
    pub runoff_factor: f32,

    /// Доля влаги, просачивающейся к соседу той же высоты
    #[serde(default = "default_seepage_factor")]
    pub seepage_factor: f32,

    /// Откуда дует ветер
    #[serde(default = "default_wind_direction")]
    pub wind_direction: HexDirection,

    /// Во сколько раз больше облаков уходит по ветру
    #[serde(default = "default_wind_strength")]
    pub wind_strength: f32,
}

fn default_starting_moisture() -> f32 {
    0.1
}
fn default_evaporation_factor() -> f32 {
    0.5
}
fn default_precipitation_factor() -> f32 {
    0.25
}
fn default_runoff_factor() -> f32 {
    0.25
}
fn default_seepage_factor() -> f32 {
    0.125
}
fn default_wind_direction() -> HexDirection {
    HexDirection::NW
}
fn default_wind_strength() -> f32 {
    4.0
}

impl Default for ClimateSettings {
    fn default() -> Self {
        Self {
            starting_moisture: 0.1,
            evaporation_factor: 0.5,
            precipitation_factor: 0.25,
            runoff_factor: 0.25,
            seepage_factor: 0.125,
            wind_direction: HexDirection::NW,
            wind_strength: 4.0,
        }
    }
}

/// Настройки рек и озёр
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiverSettings {
    /// Суммарная длина рек в процентах от числа ячеек суши
    #[serde(default = "default_river_percentage")]
    pub river_percentage: u32,

    /// Вероятность образования озера в низине посреди течения
    #[serde(default = "default_extra_lake_probability")]
    pub extra_lake_probability: f32,
}

fn default_river_percentage() -> u32 {
    10
}
fn default_extra_lake_probability() -> f32 {
    0.25
}

impl Default for RiverSettings {
    fn default() -> Self {
        Self {
            river_percentage: 10,
            extra_lake_probability: 0.25,
        }
    }
}

/// Настройки температуры
///
/// Температура интерполируется по широте между `low_temperature` (полюс) и
/// `high_temperature` (экватор), падает с высотой и слегка шумит.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemperatureSettings {
    #[serde(default = "default_low_temperature")]
    pub low_temperature: f32,

    #[serde(default = "default_high_temperature")]
    pub high_temperature: f32,

    /// Амплитуда шумового отклонения температуры
    #[serde(default = "default_temperature_jitter")]
    pub temperature_jitter: f32,

    #[serde(default)]
    pub hemisphere: HemisphereMode,
}

fn default_low_temperature() -> f32 {
    0.0
}
fn default_high_temperature() -> f32 {
    1.0
}
fn default_temperature_jitter() -> f32 {
    0.1
}

impl Default for TemperatureSettings {
    fn default() -> Self {
        Self {
            low_temperature: 0.0,
            high_temperature: 1.0,
            temperature_jitter: 0.1,
            hemisphere: HemisphereMode::Both,
        }
    }
}

/// Основные параметры генерации карты
///
/// Полная конфигурация для генерации одной карты. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapGenConfig {
    /// Сид генератора случайных чисел (детерминированная генерация)
    #[serde(default)]
    pub seed: u32,

    /// Ширина карты в ячейках (кратна ширине чанка)
    #[serde(default = "default_cell_count_x")]
    pub cell_count_x: usize,

    /// Высота карты в ячейках (кратна высоте чанка)
    #[serde(default = "default_cell_count_z")]
    pub cell_count_z: usize,

    /// Зацикливание карты по горизонтали
    #[serde(default)]
    pub wrapping: bool,

    #[serde(default)]
    pub land: LandSettings,

    #[serde(default)]
    pub climate: ClimateSettings,

    #[serde(default)]
    pub rivers: RiverSettings,

    #[serde(default)]
    pub temperature: TemperatureSettings,
}

fn default_cell_count_x() -> usize {
    20
}
fn default_cell_count_z() -> usize {
    16
}

impl Default for MapGenConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            cell_count_x: 20,
            cell_count_z: 16,
            wrapping: false,
            land: LandSettings::default(),
            climate: ClimateSettings::default(),
            rivers: RiverSettings::default(),
            temperature: TemperatureSettings::default(),
        }
    }
}

impl MapGenConfig {
    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = 42
    /// cell_count_x = 32
    /// cell_count_z = 24
    ///
    /// [land]
    /// land_percentage = 60
    /// region_count = 2
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Проверяет диапазоны параметров до начала генерации.
    ///
    /// Размеры карты проверяет [`HexGrid::new`](crate::grid::HexGrid::new),
    /// а вместимость регионов — распределитель регионов.
    pub fn validate(&self) -> Result<(), MapError> {
        let land = &self.land;
        let climate = &self.climate;

        let probabilities = [
            ("land.jitter_probability", land.jitter_probability),
            ("land.high_rise_probability", land.high_rise_probability),
            ("land.sink_probability", land.sink_probability),
            ("climate.starting_moisture", climate.starting_moisture),
            ("climate.evaporation_factor", climate.evaporation_factor),
            ("climate.precipitation_factor", climate.precipitation_factor),
            ("climate.runoff_factor", climate.runoff_factor),
            ("climate.seepage_factor", climate.seepage_factor),
            ("rivers.extra_lake_probability", self.rivers.extra_lake_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }

        let percentages = [
            ("land.land_percentage", land.land_percentage),
            ("land.erosion_percentage", land.erosion_percentage),
            ("rivers.river_percentage", self.rivers.river_percentage),
        ];
        for (name, value) in percentages {
            if value > 100 {
                return Err(invalid(format!("{name} must not exceed 100, got {value}")));
            }
        }

        if land.chunk_size_min == 0 || land.chunk_size_min > land.chunk_size_max {
            return Err(invalid(format!(
                "chunk size range {}..={} is empty",
                land.chunk_size_min, land.chunk_size_max
            )));
        }
        if land.elevation_minimum > 0 {
            return Err(invalid(format!(
                "land.elevation_minimum must be at most 0, got {}",
                land.elevation_minimum
            )));
        }
        if land.water_level < 1
            || land.water_level <= land.elevation_minimum
            || land.water_level >= land.elevation_maximum
        {
            return Err(invalid(format!(
                "land.water_level {} must lie strictly between elevation bounds {}..{}",
                land.water_level, land.elevation_minimum, land.elevation_maximum
            )));
        }
        if !(1..=4).contains(&land.region_count) {
            return Err(invalid(format!(
                "land.region_count must be 1..=4, got {}",
                land.region_count
            )));
        }
        if !climate.wind_strength.is_finite() || climate.wind_strength < 0.0 {
            return Err(invalid(format!(
                "climate.wind_strength must be non-negative, got {}",
                climate.wind_strength
            )));
        }
        let temperature = &self.temperature;
        for (name, value) in [
            ("temperature.low_temperature", temperature.low_temperature),
            ("temperature.high_temperature", temperature.high_temperature),
            ("temperature.temperature_jitter", temperature.temperature_jitter),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        Ok(())
    }
}

fn invalid(reason: String) -> MapError {
    MapError::InvalidConfig(reason)
}
