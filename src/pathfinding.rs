// src/pathfinding.rs
//! Поиск пути для отряда
//!
//! Поиск Дейкстры (с эвристикой расстояния, как в A*) по графу ячеек на
//! очереди с корзинами. Стоимость шага:
//! - обрыв непроходим;
//! - дорога стоит 1 и пропускает сквозь стену (ворота);
//! - без дороги переход между ячейкой со стеной и без неё невозможен;
//! - иначе 5 по ровному, 10 по склону плюс уровни застройки, ферм и растительности цели.
//!
//! Ход ограничен скоростью отряда: если шаг не помещается в текущий ход, его
//! стоимость отсчитывается с начала следующего хода.
//!
//! Каждый запрос создаёт собственную очередь, поэтому запросы к одной
//! неизменной карте можно выполнять параллельно.

use log::debug;

use crate::cell::{HexCell, HexEdgeType};
use crate::direction::HexDirection;
use crate::error::MapError;
use crate::grid::HexGrid;
use crate::queue::BucketQueue;

/// Скорость отряда по умолчанию (очков движения за ход)
pub const DEFAULT_SPEED: i32 = 24;

/// Правила перемещения отряда
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementRules {
    speed: i32,
}

impl Default for MovementRules {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
        }
    }
}

impl MovementRules {
    pub fn new(speed: i32) -> Result<Self, MapError> {
        if speed <= 0 {
            return Err(MapError::InvalidConfig(format!(
                "unit speed must be positive, got {speed}"
            )));
        }
        Ok(Self { speed })
    }

    #[must_use]
    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Отряд может остановиться только на исследованной суше
    #[must_use]
    pub fn is_valid_destination(&self, cell: &HexCell) -> bool {
        cell.is_explored() && !cell.is_underwater()
    }

    /// Стоимость шага из `from` в соседа `to` по направлению `direction`; `None` — непроходимо
    #[must_use]
    pub fn move_cost(
        &self,
        from: &HexCell,
        to: &HexCell,
        direction: HexDirection,
    ) -> Option<i32> {
        if !self.is_valid_destination(to) {
            return None;
        }
        let edge_type = from.edge_type_to(to);
        if edge_type == HexEdgeType::Cliff {
            return None;
        }
        if from.has_road_through_edge(direction) {
            return Some(1);
        }
        if from.walled() != to.walled() {
            return None;
        }
        let base = if edge_type == HexEdgeType::Flat { 5 } else { 10 };
        Some(
            base + i32::from(to.urban_level())
                + i32::from(to.farm_level())
                + i32::from(to.plant_level()),
        )
    }

    /// Номер хода, в который отряд доберётся до точки с накопленной стоимостью `distance`
    #[must_use]
    pub fn turn(&self, distance: i32) -> i32 {
        (distance - 1) / self.speed
    }
}

/// Найденный путь
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Ячейки от начальной до конечной включительно
    pub cells: Vec<usize>,
    /// Накопленная стоимость с учётом переноса шагов на следующий ход
    pub cost: i32,
    /// Номер хода, в который отряд придёт в конечную ячейку (0 — текущий ход)
    pub turns: i32,
}

/// Ищет кратчайший путь из `from` в `to`.
///
/// `Ok(None)` — пути нет; это обычный исход, а не ошибка.
pub fn find_path(
    grid: &HexGrid,
    from: usize,
    to: usize,
    rules: &MovementRules,
) -> Result<Option<Path>, MapError> {
    for index in [from, to] {
        if index >= grid.len() {
            return Err(MapError::CellOutOfRange(index));
        }
    }

    let mut frontier = BucketQueue::new(grid.len());
    let phase = frontier.advance_phase(2);
    let start = frontier.element_mut(from);
    start.search_phase = phase;
    start.distance = 0;
    start.heuristic = 0;
    start.path_from = None;
    frontier.enqueue(from);

    while !frontier.is_empty() {
        let current = frontier.dequeue();
        // фаза + 1: ячейка закрыта
        frontier.element_mut(current).search_phase += 1;
        if current == to {
            let path = reconstruct_path(&frontier, from, to, rules);
            debug!(
                "path {from} -> {to}: {} cells, cost {}",
                path.cells.len(),
                path.cost
            );
            return Ok(Some(path));
        }

        let current_distance = frontier.element(current).distance;
        let current_turn = rules.turn(current_distance);
        let current_cell = grid.cell(current);

        for (d, n) in current_cell.neighbors() {
            let neighbor = *frontier.element(n);
            if neighbor.search_phase > phase {
                continue;
            }
            let Some(move_cost) = rules.move_cost(current_cell, grid.cell(n), d) else {
                continue;
            };

            let mut distance = current_distance + move_cost;
            let turn = rules.turn(distance);
            if turn > current_turn {
                distance = turn * rules.speed + move_cost;
            }

            if neighbor.search_phase < phase {
                let heuristic = grid.distance(n, to);
                let element = frontier.element_mut(n);
                element.search_phase = phase;
                element.distance = distance;
                element.heuristic = heuristic;
                element.path_from = Some(current);
                frontier.enqueue(n);
            } else if distance < neighbor.distance {
                let old_priority = neighbor.priority();
                let element = frontier.element_mut(n);
                element.distance = distance;
                element.path_from = Some(current);
                frontier.change(n, old_priority);
            }
        }
    }

    debug!("no path {from} -> {to}");
    Ok(None)
}

fn reconstruct_path(frontier: &BucketQueue, from: usize, to: usize, rules: &MovementRules) -> Path {
    let mut cells = vec![to];
    let mut current = to;
    while current != from {
        match frontier.element(current).path_from {
            Some(previous) => {
                cells.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    cells.reverse();

    let cost = frontier.element(to).distance;
    Path {
        cells,
        cost,
        turns: rules.turn(cost),
    }
}
