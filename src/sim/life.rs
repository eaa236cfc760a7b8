//! Game of Life generation step
//!
//! Each generation is computed entirely from the previous one: the current
//! buffer is only read, the next one is written into the grid's scratch
//! buffer, and the two are swapped once every cell is done.

use super::grid::Grid;

/// Births and deaths produced by one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub births: u32,
    pub deaths: u32,
}

/// Next state of one cell under B3/S23.
///
/// Survivors keep their health, newborns start at `max_health`.
#[inline]
fn next_health(current: u8, neighbors: u8, max_health: u8) -> u8 {
    match (current > 0, neighbors) {
        (true, 2) | (true, 3) => current,
        (false, 3) => max_health,
        _ => 0,
    }
}

/// Advance the grid by one generation.
pub fn step(grid: &mut Grid) -> GenerationStats {
    let cols = grid.cols() as i32;
    let rows = grid.rows() as i32;
    let max_health = grid.max_health();

    // Neighbour counts come from a read-only view of the current generation
    let counts: Vec<u8> = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (col, row)))
        .map(|(col, row)| grid.count_live_neighbors(col, row))
        .collect();

    let mut stats = GenerationStats::default();
    let (current, next) = grid.buffers_mut();
    for ((&now, &neighbors), out) in current.iter().zip(&counts).zip(next.iter_mut()) {
        *out = next_health(now, neighbors, max_health);
        match (now > 0, *out > 0) {
            (false, true) => stats.births += 1,
            (true, false) => stats.deaths += 1,
            _ => {}
        }
    }
    grid.swap_buffers();

    log::debug!("generation: +{} -{}", stats.births, stats.deaths);
    stats
}
