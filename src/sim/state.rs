//! Game state and core simulation types
//!
//! `GameState` owns one match: the board, the ball, both players' placement
//! budgets, the round clock and the seeded RNG used for serves.

use std::fmt;
use std::ops::Range;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SimulationClock;
use super::collision::ContactAxis;
use super::grid::{Grid, GridSnapshot};
use crate::consts::TRAIL_LENGTH;
use crate::error::SimError;
use crate::patterns::Pattern;
use crate::scoreboard::Scoreboard;
use crate::settings::Settings;

/// One half of the board, and the player defending it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player 1, defends the left wall
    Left,
    /// Player 2, defends the right wall
    Right,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Players are placing cells; ball and automaton are frozen
    Placement,
    /// Ball moving, colonies evolving
    Active,
    /// Active round frozen between ticks
    Paused,
    /// Someone scored; waiting for a reset
    RoundOver,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoundPhase::Placement => "placement",
            RoundPhase::Active => "active",
            RoundPhase::Paused => "paused",
            RoundPhase::RoundOver => "round-over",
        })
    }
}

/// Initial direction of a served ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Serve {
    /// Side the ball travels toward
    pub toward: Side,
    /// Angle from horizontal in radians (positive = downward)
    pub angle: f32,
}

impl Serve {
    /// Draw a serve from the RNG: either side, angle in `[-max_angle, max_angle]`
    pub fn random(rng: &mut impl Rng, max_angle: f32) -> Self {
        let max_angle = max_angle.abs();
        let angle = rng.random_range(-max_angle..=max_angle);
        let toward = if rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        Self { toward, angle }
    }

    /// Unit direction vector
    pub fn direction(&self) -> Vec2 {
        let sign = match self.toward {
            Side::Left => -1.0,
            Side::Right => 1.0,
        };
        Vec2::new(sign * self.angle.cos(), self.angle.sin())
    }
}

/// Read-only view of the ball for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub speed: f32,
}

/// The ball. Position and velocity are in pixels and pixels per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Target speed; velocity is renormalised to this after cell bounces
    pub speed: f32,
    /// Recent positions for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Ball {
    /// A stationary ball
    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            speed,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Give the ball its serve velocity at the current target speed
    pub fn launch(&mut self, serve: Serve) {
        self.vel = serve.direction() * self.speed;
    }

    /// Move by one tick of velocity
    pub fn advance(&mut self) {
        self.trail.insert(0, self.pos);
        self.trail.truncate(TRAIL_LENGTH);
        self.pos += self.vel;
    }

    /// Change target speed (clamped to `max`) and rescale velocity to match
    pub fn set_speed(&mut self, speed: f32, max: f32) {
        self.speed = speed.min(max);
        self.vel = self.vel.normalize_or_zero() * self.speed;
    }

    pub fn state(&self) -> BallState {
        BallState {
            pos: self.pos,
            vel: self.vel,
            radius: self.radius,
            speed: self.speed,
        }
    }
}

/// Placement budget for one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub side: Side,
    /// Placement credits left this round
    pub cells_remaining: u32,
    /// Credits granted at the start of each round
    pub budget: u32,
}

impl Player {
    pub fn new(side: Side, budget: u32) -> Self {
        Self {
            side,
            cells_remaining: budget,
            budget,
        }
    }

    pub fn can_place(&self) -> bool {
        self.cells_remaining > 0
    }

    /// Spend one credit
    pub fn spend(&mut self) -> Result<(), SimError> {
        if !self.can_place() {
            return Err(SimError::BudgetExceeded {
                side: self.side,
                budget: self.budget,
            });
        }
        self.cells_remaining -= 1;
        Ok(())
    }

    /// Return one credit, never above the round budget
    pub fn refund(&mut self) {
        self.cells_remaining = (self.cells_remaining + 1).min(self.budget);
    }

    pub fn replenish(&mut self) {
        self.cells_remaining = self.budget;
    }
}

/// Things that happened during a tick, for renderers and audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the top or bottom wall
    WallBounce { pos: Vec2 },
    /// Ball bounced off a live cell
    CellBounce { col: i32, row: i32, axis: ContactAxis },
    /// A cell was killed by ball damage
    CellDestroyed { col: i32, row: i32 },
    /// A life generation ran
    Generation { number: u64, births: u32, deaths: u32 },
    /// Periodic speed-up
    SpeedUp { speed: f32 },
    /// Ball left the board; the round is over
    Scored { scorer: Side, round: u32 },
}

/// Complete state of one match
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) settings: Settings,
    pub(crate) grid: Grid,
    pub(crate) ball: Ball,
    pub(crate) players: [Player; 2],
    pub(crate) clock: SimulationClock,
    pub(crate) scoreboard: Scoreboard,
    /// 1-based round number
    pub(crate) round: u32,
    /// Serve RNG, seeded once per match
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// New match with default settings
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Settings::default())
    }

    /// New match with custom settings
    pub fn with_settings(seed: u64, settings: Settings) -> Result<Self, SimError> {
        settings.validate()?;
        Ok(Self::build(seed, settings))
    }

    fn build(seed: u64, settings: Settings) -> Self {
        let grid = Grid::new(settings.grid_cols, settings.grid_rows, settings.cell_max_health);
        let ball = Ball::new(
            settings.board_center(),
            settings.ball_radius,
            settings.ball_base_speed,
        );
        let players = [
            Player::new(Side::Left, settings.starting_cells),
            Player::new(Side::Right, settings.starting_cells),
        ];
        let clock = SimulationClock::new(settings.tick_rate, settings.generation_interval());
        log::info!("New match with seed {seed}");
        Self {
            settings,
            grid,
            ball,
            players,
            clock,
            scoreboard: Scoreboard::new(),
            round: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> RoundPhase {
        self.clock.phase()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn ball_state(&self) -> BallState {
        self.ball.state()
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Columns a player may place into
    pub fn placement_zone(&self, side: Side) -> Range<i32> {
        let cols = self.settings.grid_cols as i32;
        let width = self.settings.placement_columns as i32;
        match side {
            Side::Left => 0..width,
            Side::Right => cols - width..cols,
        }
    }

    /// Validate a placement request and return the owning side
    fn check_placement(&self, operation: &'static str, col: i32, row: i32) -> Result<Side, SimError> {
        let phase = self.phase();
        if phase != RoundPhase::Placement {
            return Err(SimError::InvalidPhase { operation, phase });
        }
        if !self.grid.in_bounds(col, row) {
            return Err(SimError::OutOfBounds { col, row });
        }
        let side = self.grid.side_of(col);
        if !self.placement_zone(side).contains(&col) {
            return Err(SimError::OutsidePlacementZone { col });
        }
        Ok(side)
    }

    /// Flip a cell during placement.
    ///
    /// Returns whether the cell is alive afterwards. Placing costs one credit
    /// from the owning player; removing refunds it.
    pub fn toggle_cell(&mut self, col: i32, row: i32) -> Result<bool, SimError> {
        let phase = self.phase();
        if phase != RoundPhase::Placement {
            return Err(SimError::InvalidPhase {
                operation: "toggle_cell",
                phase,
            })
            .inspect_err(warn);
        }
        if self.grid.is_alive(col, row) {
            self.remove_cell(col, row).map(|()| false)
        } else {
            self.place_cell(col, row).map(|()| true)
        }
    }

    /// Make a cell alive during placement (no-op if it already is)
    pub fn place_cell(&mut self, col: i32, row: i32) -> Result<(), SimError> {
        let side = self.check_placement("place_cell", col, row).inspect_err(warn)?;
        if self.grid.is_alive(col, row) {
            return Ok(());
        }
        self.players[side.index()].spend().inspect_err(warn)?;
        self.grid.set(col, row, true);
        Ok(())
    }

    /// Kill a cell during placement (no-op if it is already dead)
    pub fn remove_cell(&mut self, col: i32, row: i32) -> Result<(), SimError> {
        let side = self.check_placement("remove_cell", col, row).inspect_err(warn)?;
        if !self.grid.is_alive(col, row) {
            return Ok(());
        }
        self.grid.set(col, row, false);
        self.players[side.index()].refund();
        Ok(())
    }

    /// Stamp a pattern with its top-left corner at `(col, row)`.
    ///
    /// Patterns on the right half are mirrored so they face the ball.
    /// All-or-nothing: either every cell fits in the zone and budget, or
    /// nothing changes. Returns the number of newly placed cells.
    pub fn stamp_pattern(&mut self, pattern: &Pattern, col: i32, row: i32) -> Result<u32, SimError> {
        let side = self.check_placement("stamp_pattern", col, row).inspect_err(warn)?;
        let cells = pattern.placed_at(col, row, side == Side::Right);

        let mut new_cells = 0;
        for &(c, r) in &cells {
            if self.check_placement("stamp_pattern", c, r).inspect_err(warn)? != side {
                return Err(SimError::OutsidePlacementZone { col: c }).inspect_err(warn);
            }
            if !self.grid.is_alive(c, r) {
                new_cells += 1;
            }
        }
        let player = &mut self.players[side.index()];
        if new_cells > player.cells_remaining {
            return Err(SimError::BudgetExceeded {
                side,
                budget: player.budget,
            })
            .inspect_err(warn);
        }
        for (c, r) in cells {
            if !self.grid.is_alive(c, r) {
                player.cells_remaining -= 1;
                self.grid.set(c, r, true);
            }
        }
        Ok(new_cells)
    }

    /// Leave placement and serve with a direction drawn from the match RNG
    pub fn start_round(&mut self) -> Result<(), SimError> {
        let serve = Serve::random(&mut self.rng, self.settings.serve_max_angle);
        self.start_round_with(serve)
    }

    /// Leave placement and serve in a fixed direction
    pub fn start_round_with(&mut self, serve: Serve) -> Result<(), SimError> {
        self.clock.transition(RoundPhase::Active).inspect_err(warn)?;
        self.ball = Ball::new(
            self.settings.board_center(),
            self.settings.ball_radius,
            self.settings.ball_base_speed,
        );
        self.ball.launch(serve);
        let snapshot = self.grid.snapshot();
        log::info!(
            "Round {} started: serve toward {} at {:.2} rad, {} vs {} cells",
            self.round,
            serve.toward,
            serve.angle,
            snapshot.population(Side::Left),
            snapshot.population(Side::Right),
        );
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SimError> {
        self.clock.transition(RoundPhase::Paused).inspect_err(warn)
    }

    pub fn resume(&mut self) -> Result<(), SimError> {
        if self.phase() != RoundPhase::Paused {
            return Err(SimError::InvalidTransition {
                from: self.phase(),
                to: RoundPhase::Active,
            })
            .inspect_err(warn);
        }
        self.clock.transition(RoundPhase::Active).inspect_err(warn)
    }

    /// After a score: clear the board, refill budgets, recentre the ball
    pub fn reset_round(&mut self) -> Result<(), SimError> {
        self.clock.transition(RoundPhase::Placement).inspect_err(warn)?;
        self.grid.clear();
        for player in &mut self.players {
            player.replenish();
        }
        self.ball = Ball::new(
            self.settings.board_center(),
            self.settings.ball_radius,
            self.settings.ball_base_speed,
        );
        self.round += 1;
        log::info!("Round {} placement", self.round);
        Ok(())
    }
}

fn warn(err: &SimError) {
    log::warn!("Rejected: {err}");
}
