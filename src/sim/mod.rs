//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick cadence only, driven from outside
//! - Seeded RNG only
//! - Stable iteration order (column-major contact scan, lowest cell wins ties)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod grid;
pub mod life;
pub mod state;
pub mod tick;

pub use clock::{SimulationClock, TickSchedule};
pub use collision::{CellContact, CellHit, CollisionReport, ContactAxis, Wall};
pub use grid::{Grid, GridSnapshot};
pub use life::GenerationStats;
pub use state::{Ball, BallState, GameEvent, GameState, Player, RoundPhase, Serve, Side};
pub use tick::tick;
