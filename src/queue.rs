// src/queue.rs
//! Очередь с приоритетами на «корзинах» (алгоритм Дейкстры по Дайалу)
//!
//! Приоритеты — небольшие неотрицательные целые числа, поэтому вместо кучи
//! используется массив корзин: корзина `p` хранит голову односвязного списка
//! элементов с приоритетом `p`, а ссылка на следующий элемент лежит в самом
//! элементе (`next_with_same_priority`).
//!
//! Очередь владеет массивом элементов — по одному на ячейку карты. Между
//! поисками массив не очищается: каждый поиск получает новую «фазу», и элемент
//! считается посещённым, только если его `search_phase` не меньше текущей.

/// Состояние поиска для одной ячейки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchElement {
    pub distance: i32,
    pub heuristic: i32,
    pub next_with_same_priority: Option<usize>,
    pub search_phase: u32,
    /// Предыдущая ячейка на найденном пути
    pub path_from: Option<usize>,
}

impl SearchElement {
    #[must_use]
    pub fn priority(&self) -> usize {
        let priority = self.distance + self.heuristic;
        assert!(priority >= 0, "negative search priority {priority}");
        priority as usize
    }
}

#[derive(Debug, Clone)]
pub struct BucketQueue {
    elements: Vec<SearchElement>,
    buckets: Vec<Option<usize>>,
    minimum: usize,
    count: usize,
    phase: u32,
}

impl BucketQueue {
    #[must_use]
    pub fn new(element_count: usize) -> Self {
        Self {
            elements: vec![SearchElement::default(); element_count],
            buckets: Vec::new(),
            minimum: usize::MAX,
            count: 0,
            phase: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Число элементов (по одному на ячейку карты)
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn element(&self, index: usize) -> &SearchElement {
        &self.elements[index]
    }

    pub fn element_mut(&mut self, index: usize) -> &mut SearchElement {
        &mut self.elements[index]
    }

    #[must_use]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Начинает новую фазу поиска; всё, что помечено более ранними фазами, устарело
    pub fn advance_phase(&mut self, step: u32) -> u32 {
        self.phase += step;
        self.phase
    }

    /// Сбрасывает метки фаз у всех элементов (после генерации карты)
    pub fn reset_phases(&mut self) {
        for element in &mut self.elements {
            element.search_phase = 0;
        }
        self.phase = 0;
    }

    /// Добавляет элемент с его текущим приоритетом `distance + heuristic`.
    ///
    /// Элемент не должен уже находиться в очереди: для понижения приоритета
    /// есть [`BucketQueue::change`].
    pub fn enqueue(&mut self, index: usize) {
        self.count += 1;
        let priority = self.elements[index].priority();
        if priority < self.minimum {
            self.minimum = priority;
        }
        if priority >= self.buckets.len() {
            self.buckets.resize(priority + 1, None);
        }
        self.elements[index].next_with_same_priority = self.buckets[priority];
        self.buckets[priority] = Some(index);
    }

    /// Извлекает элемент с минимальным приоритетом.
    ///
    /// Вызов на пустой очереди — ошибка программиста.
    pub fn dequeue(&mut self) -> usize {
        assert!(self.count > 0, "dequeue from an empty bucket queue");
        self.count -= 1;
        while self.minimum < self.buckets.len() {
            if let Some(index) = self.buckets[self.minimum] {
                self.buckets[self.minimum] = self.elements[index].next_with_same_priority;
                return index;
            }
            self.minimum += 1;
        }
        unreachable!("bucket queue count out of sync with buckets")
    }

    /// Перемещает элемент, чей приоритет уже понижен, из корзины `old_priority`.
    ///
    /// Элемент обязан находиться в этой корзине.
    pub fn change(&mut self, index: usize, old_priority: usize) {
        let head = self.buckets.get(old_priority).copied().flatten();
        let Some(mut current) = head else {
            panic!("element {index} is not queued at priority {old_priority}");
        };

        let next = self.elements[current].next_with_same_priority;
        if current == index {
            self.buckets[old_priority] = next;
        } else {
            loop {
                let Some(next) = self.elements[current].next_with_same_priority else {
                    panic!("element {index} is not queued at priority {old_priority}");
                };
                if next == index {
                    break;
                }
                current = next;
            }
            self.elements[current].next_with_same_priority =
                self.elements[index].next_with_same_priority;
        }

        self.enqueue(index);
        self.count -= 1;
    }

    /// Очищает очередь, не трогая элементы
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.count = 0;
        self.minimum = usize::MAX;
    }
}
