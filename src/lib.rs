//! Life Pong - Pong where each paddle is a Game of Life colony
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, life rule, ball, collisions, round flow)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `scoreboard`: Match score tally and round history
//! - `patterns`: Starter colonies for the placement phase

pub mod error;
pub mod patterns;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use scoreboard::Scoreboard;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 30;

    /// Board dimensions in cells (columns must be even)
    pub const GRID_COLS: u32 = 120;
    pub const GRID_ROWS: u32 = 60;
    /// Cell edge length in pixels
    pub const CELL_SIZE: f32 = 10.0;

    /// Ball defaults (speeds are pixels per tick)
    pub const BALL_RADIUS: f32 = 9.0;
    pub const BALL_BASE_SPEED: f32 = 6.0;
    pub const BALL_MAX_SPEED: f32 = 12.0;
    /// Speed added every `BALL_ACCEL_INTERVAL` active ticks
    pub const BALL_ACCELERATION: f32 = 0.15;
    pub const BALL_ACCEL_INTERVAL: u32 = 60;
    /// Speed added on every cell bounce
    pub const CELL_BOUNCE_BOOST: f32 = 0.15;
    /// Serve angle is drawn from [-SERVE_MAX_ANGLE, SERVE_MAX_ANGLE] radians
    pub const SERVE_MAX_ANGLE: f32 = 0.4;
    /// Gap left between the ball edge and a cell face after a bounce
    pub const CONTACT_SEPARATION: f32 = 1.0;

    /// Placement allowance per player per round
    pub const STARTING_CELLS: u32 = 40;
    /// Columns on each outer edge a player may place into
    pub const PLACEMENT_COLUMNS: u32 = 40;

    /// Hits a cell takes before dying (when cell damage is on)
    pub const CELL_MAX_HEALTH: u8 = 3;

    /// Ball positions kept for trail rendering
    pub const TRAIL_LENGTH: usize = 15;
}

/// Integer cell index containing a pixel coordinate.
///
/// A coordinate exactly on a cell edge belongs to the higher cell.
#[inline]
pub fn pixel_to_cell(px: f32, cell_size: f32) -> i32 {
    (px / cell_size).floor() as i32
}

/// Pixel centre of a cell index along one axis.
#[inline]
pub fn cell_center(index: i32, cell_size: f32) -> f32 {
    (index as f32 + 0.5) * cell_size
}
