//! Simulation tuning
//!
//! Every gameplay constant a match depends on, loadable from a JSON file.
//! Missing fields fall back to the values in `consts`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Board width in cells (even; split in half between players)
    pub grid_cols: u32,
    /// Board height in cells
    pub grid_rows: u32,
    /// Cell edge in pixels
    pub cell_size: f32,

    // === Cadence ===
    /// Nominal ticks per second the frame driver calls `tick` at
    pub tick_rate: u32,
    /// Active ticks between life generations; unset means one per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_interval: Option<u32>,

    // === Ball ===
    pub ball_radius: f32,
    /// Serve speed in pixels per tick
    pub ball_base_speed: f32,
    pub ball_max_speed: f32,
    /// Speed added every `ball_accel_interval` ticks (0 interval disables)
    pub ball_acceleration: f32,
    pub ball_accel_interval: u32,
    /// Speed added on each cell bounce
    pub cell_bounce_boost: f32,
    /// Largest serve angle from horizontal, radians
    pub serve_max_angle: f32,

    // === Placement ===
    /// Cells each player may place per round
    pub starting_cells: u32,
    /// Width of each player's placement zone, from their back wall
    pub placement_columns: u32,

    // === Cells ===
    pub cell_max_health: u8,
    /// Whether ball impacts wear cells down
    pub cell_damage: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_cols: GRID_COLS,
            grid_rows: GRID_ROWS,
            cell_size: CELL_SIZE,

            tick_rate: TICK_RATE,
            generation_interval: None,

            ball_radius: BALL_RADIUS,
            ball_base_speed: BALL_BASE_SPEED,
            ball_max_speed: BALL_MAX_SPEED,
            ball_acceleration: BALL_ACCELERATION,
            ball_accel_interval: BALL_ACCEL_INTERVAL,
            cell_bounce_boost: CELL_BOUNCE_BOOST,
            serve_max_angle: SERVE_MAX_ANGLE,

            starting_cells: STARTING_CELLS,
            placement_columns: PLACEMENT_COLUMNS,

            cell_max_health: CELL_MAX_HEALTH,
            cell_damage: false,
        }
    }
}

impl Settings {
    /// Board width in pixels
    pub fn board_width_px(&self) -> f32 {
        self.grid_cols as f32 * self.cell_size
    }

    /// Board height in pixels
    pub fn board_height_px(&self) -> f32 {
        self.grid_rows as f32 * self.cell_size
    }

    /// Active ticks between life generations, defaulting to the tick rate
    pub fn generation_interval(&self) -> u32 {
        self.generation_interval.unwrap_or(self.tick_rate)
    }

    /// Serve position
    pub fn board_center(&self) -> Vec2 {
        Vec2::new(self.board_width_px(), self.board_height_px()) / 2.0
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        let fail = |reason: &str| -> Result<(), SimError> {
            Err(SimError::InvalidSettings(reason.to_string()))
        };

        if self.grid_cols < 2 || self.grid_cols % 2 != 0 {
            return fail("grid_cols must be even and at least 2");
        }
        if self.grid_rows == 0 {
            return fail("grid_rows must be positive");
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return fail("cell_size must be positive");
        }
        if self.tick_rate == 0 || self.generation_interval() == 0 {
            return fail("tick_rate and generation_interval must be positive");
        }
        if !(self.ball_radius > 0.0 && 2.0 * self.ball_radius < self.board_height_px()) {
            return fail("ball must fit between the walls");
        }
        if !(self.ball_base_speed > 0.0 && self.ball_base_speed <= self.ball_max_speed) {
            return fail("ball speeds must satisfy 0 < base <= max");
        }
        if self.ball_acceleration < 0.0 || self.cell_bounce_boost < 0.0 {
            return fail("speed increments must not be negative");
        }
        if !(0.0..std::f32::consts::FRAC_PI_2).contains(&self.serve_max_angle) {
            return fail("serve_max_angle must be in [0, pi/2)");
        }
        if self.placement_columns == 0 || self.placement_columns > self.grid_cols / 2 {
            return fail("placement_columns must be within one half of the board");
        }
        if self.cell_max_health == 0 {
            return fail("cell_max_health must be positive");
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SimError::SettingsParse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::SettingsParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.generation_interval(), settings.tick_rate);
        assert_eq!(settings.board_width_px(), 1200.0);
        assert_eq!(settings.board_center(), Vec2::new(600.0, 300.0));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "generation_interval": 3, "cell_damage": true }"#).unwrap();
        assert_eq!(settings.generation_interval(), 3);
        assert!(settings.cell_damage);
        assert_eq!(settings.grid_cols, GRID_COLS);
    }

    #[test]
    fn test_generation_interval_follows_tick_rate() {
        let settings = Settings::from_json(r#"{ "tick_rate": 60 }"#).unwrap();
        assert_eq!(settings.generation_interval, None);
        assert_eq!(settings.generation_interval(), 60);

        let settings = Settings {
            tick_rate: 20,
            ..Settings::default()
        };
        assert_eq!(settings.generation_interval(), 20);
        assert!(!settings.to_json().unwrap().contains("generation_interval"));
    }

    #[test]
    fn test_zero_generation_interval_is_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "generation_interval": 0 }"#),
            Err(SimError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_odd_width_is_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "grid_cols": 11 }"#),
            Err(SimError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_bad_json_is_a_parse_error() {
        assert!(matches!(
            Settings::from_json("{ grid_cols: "),
            Err(SimError::SettingsParse(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            ball_max_speed: 20.0,
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json), Ok(settings));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load("/nonexistent/life-pong-settings.json");
        assert_eq!(settings, Settings::default());
    }
}
