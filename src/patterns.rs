//! Starter colonies players can stamp during placement
//!
//! Offsets are `(col, row)` from the pattern's top-left corner, drawn for the
//! left player. The right player gets them mirrored.

#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(i32, i32)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "block",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Pattern {
        name: "blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "beehive",
        cells: &[(1, 0), (0, 1), (2, 1), (0, 2), (2, 2), (1, 3)],
    },
    Pattern {
        name: "beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "r-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
];

/// Look a pattern up by name (case-insensitive)
pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

impl Pattern {
    /// Width of the bounding box in cells
    pub fn width(&self) -> i32 {
        self.cells.iter().map(|&(c, _)| c + 1).max().unwrap_or(0)
    }

    /// Height of the bounding box in cells
    pub fn height(&self) -> i32 {
        self.cells.iter().map(|&(_, r)| r + 1).max().unwrap_or(0)
    }

    /// Board positions with the top-left corner at `(col, row)`,
    /// optionally mirrored left-to-right within the bounding box
    pub fn placed_at(&self, col: i32, row: i32, mirror: bool) -> Vec<(i32, i32)> {
        let width = self.width();
        self.cells
            .iter()
            .map(|&(c, r)| {
                let c = if mirror { width - 1 - c } else { c };
                (col + c, row + r)
            })
            .collect()
    }
}
