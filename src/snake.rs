use std::collections::VecDeque;

use Direction::*;
use MoveResult::*;

/// Grid cell, `(x, y)`. Signed so a head stepping off the left or top edge
/// is still representable.
pub type Coords = (i32, i32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Grid { width, height }
    }

    pub fn contains(&self, pos: Coords) -> bool {
        pos.0 >= 0 && pos.1 >= 0 && pos.0 < self.width && pos.1 < self.height
    }

    pub fn center(&self) -> Coords {
        (self.width / 2, self.height / 2)
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn cells(&self) -> impl Iterator<Item = Coords> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }
}

pub enum MoveResult {
    Moved { new_head: Coords, old_tail: Option<Coords> },
    HitWall,
    HitSelf,
}

/// Snake body, head first.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Coords>,
}

impl Snake {
    pub fn new(head: Coords, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();

        let body = (0..size.max(1) as i32)
            .map(|i| (head.0 - dx * i, head.1 - dy * i))
            .collect();
        Snake { body }
    }

    pub fn from_cells(cells: impl IntoIterator<Item = Coords>) -> Self {
        Snake { body: cells.into_iter().collect() }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> impl Iterator<Item = &Coords> + '_ {
        self.body.iter()
    }

    pub fn occupies(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    /// Advances one cell. The tail is checked before it moves, so stepping
    /// onto the current tail cell is a collision.
    pub fn move_step(
        &mut self,
        direction: Direction,
        grid: &Grid,
        grow: impl FnOnce(Coords) -> bool,
    ) -> MoveResult {
        let (dx, dy) = direction.delta();
        let old_head = self.head();
        let new_head = (old_head.0 + dx, old_head.1 + dy);

        if !grid.contains(new_head) {
            return HitWall;
        }
        if self.occupies(new_head) {
            return HitSelf;
        }

        self.body.push_front(new_head);

        if grow(new_head) {
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_tail }
        }
    }
}
