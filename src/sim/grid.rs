//! Cell occupancy field for the whole board
//!
//! The board is `cols x rows` cells, split at `cols / 2` into the left and
//! right colonies. Positions outside the board are permanently dead: neighbour
//! counts never wrap around an edge. The seam between the halves is an
//! ordinary internal boundary (no neutral gap), so the two colonies can touch.

use serde::{Deserialize, Serialize};

use super::state::Side;

/// Offsets of the 8 Moore neighbours, in row-major order
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Count live Moore neighbours of `(col, row)` on a `cols x rows` board.
///
/// `alive` is only ever called with in-bounds indices.
#[inline]
fn moore_count(cols: u32, rows: u32, col: i32, row: i32, alive: impl Fn(usize) -> bool) -> u8 {
    let mut count = 0;
    for (dx, dy) in NEIGHBOR_OFFSETS {
        let (nx, ny) = (col + dx, row + dy);
        if nx < 0 || ny < 0 || nx >= cols as i32 || ny >= rows as i32 {
            continue;
        }
        if alive(ny as usize * cols as usize + nx as usize) {
            count += 1;
        }
    }
    count
}

/// The live board, double-buffered so a generation is always computed from
/// an untouched copy of the previous one.
#[derive(Debug, Clone)]
pub struct Grid {
    cols: u32,
    rows: u32,
    max_health: u8,
    /// Current generation, row-major. 0 = dead, otherwise remaining health.
    cells: Vec<u8>,
    /// Scratch generation written by the life step, then swapped in
    back: Vec<u8>,
}

impl Grid {
    pub fn new(cols: u32, rows: u32, max_health: u8) -> Self {
        let len = cols as usize * rows as usize;
        Self {
            cols,
            rows,
            max_health: max_health.max(1),
            cells: vec![0; len],
            back: vec![0; len],
        }
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn max_health(&self) -> u8 {
        self.max_health
    }

    #[inline]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32
    }

    #[inline]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        self.in_bounds(col, row)
            .then(|| row as usize * self.cols as usize + col as usize)
    }

    /// Which colony a column belongs to
    #[inline]
    pub fn side_of(&self, col: i32) -> Side {
        if col < (self.cols / 2) as i32 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Remaining health of a cell (0 = dead or off-board)
    pub fn health(&self, col: i32, row: i32) -> u8 {
        self.index(col, row).map_or(0, |i| self.cells[i])
    }

    #[inline]
    pub fn is_alive(&self, col: i32, row: i32) -> bool {
        self.health(col, row) > 0
    }

    /// Set a cell alive (full health) or dead.
    ///
    /// Off-board coordinates are ignored; returns whether the write landed.
    pub fn set(&mut self, col: i32, row: i32, alive: bool) -> bool {
        match self.index(col, row) {
            Some(i) => {
                self.cells[i] = if alive { self.max_health } else { 0 };
                true
            }
            None => false,
        }
    }

    /// Take `amount` health off a live cell.
    ///
    /// Returns `(was_hit, was_destroyed)`.
    pub fn damage(&mut self, col: i32, row: i32, amount: u8) -> (bool, bool) {
        let Some(i) = self.index(col, row) else {
            return (false, false);
        };
        if self.cells[i] == 0 {
            return (false, false);
        }
        self.cells[i] = self.cells[i].saturating_sub(amount);
        (true, self.cells[i] == 0)
    }

    /// Live cells among the 8 neighbours; off-board neighbours count as dead
    pub fn count_live_neighbors(&self, col: i32, row: i32) -> u8 {
        moore_count(self.cols, self.rows, col, row, |i| self.cells[i] > 0)
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.back.fill(0);
    }

    /// Number of live cells on the whole board
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&h| h > 0).count()
    }

    /// Immutable copy of the current generation
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            cols: self.cols,
            rows: self.rows,
            cells: self.cells.iter().map(|&h| h > 0).collect(),
        }
    }

    /// Current generation (read) and scratch buffer (write), borrowed together
    pub(crate) fn buffers_mut(&mut self) -> (&[u8], &mut [u8]) {
        (&self.cells, &mut self.back)
    }

    /// Commit the scratch buffer as the current generation
    pub(crate) fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.back);
    }

    /// Build a grid from ASCII rows (`#` alive, `.` dead)
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len()) as u32;
        let mut grid = Self::new(cols, rows.len() as u32, 1);
        for (y, line) in rows.iter().enumerate() {
            assert_eq!(line.len() as u32, cols, "ragged test grid");
            for (x, ch) in line.bytes().enumerate() {
                grid.set(x as i32, y as i32, ch == b'#');
            }
        }
        grid
    }

    /// Render as ASCII rows (`#` alive, `.` dead)
    #[cfg(test)]
    pub(crate) fn to_rows(&self) -> Vec<String> {
        (0..self.rows as i32)
            .map(|y| {
                (0..self.cols as i32)
                    .map(|x| if self.is_alive(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

/// Read-only copy of one generation, handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub cols: u32,
    pub rows: u32,
    /// Row-major occupancy
    pub cells: Vec<bool>,
}

impl GridSnapshot {
    pub fn is_alive(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return false;
        }
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    pub fn count_live_neighbors(&self, col: i32, row: i32) -> u8 {
        moore_count(self.cols, self.rows, col, row, |i| self.cells[i])
    }

    /// Live `(col, row)` positions in row-major order
    pub fn live_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cols = self.cols as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(i, _)| ((i % cols) as i32, (i / cols) as i32))
    }

    /// Live cells in one player's colony
    pub fn population(&self, side: Side) -> usize {
        let half = (self.cols / 2) as i32;
        self.live_cells()
            .filter(|&(col, _)| match side {
                Side::Left => col < half,
                Side::Right => col >= half,
            })
            .count()
    }
}
