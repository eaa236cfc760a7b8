//! Round phase machine and tick cadence
//!
//! Owns the only mutable round-level state: the current phase, the number of
//! active ticks in this round, and how many generations have run.

use serde::{Deserialize, Serialize};

use super::state::RoundPhase;
use crate::error::SimError;

/// Tick counters for the current round, returned after each active tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    /// Active ticks completed this round, including the current one
    pub tick: u64,
    /// Whether a life generation is due on this tick
    pub run_generation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationClock {
    phase: RoundPhase,
    /// Nominal ticks per second, for reporting
    tick_rate: u32,
    /// Run one generation every this many active ticks
    generation_interval: u32,
    ticks: u64,
    generations: u64,
}

impl SimulationClock {
    pub fn new(tick_rate: u32, generation_interval: u32) -> Self {
        Self {
            phase: RoundPhase::Placement,
            tick_rate: tick_rate.max(1),
            generation_interval: generation_interval.max(1),
            ticks: 0,
            generations: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn generations(&self) -> u64 {
        self.generations
    }

    /// Active time elapsed this round, in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.ticks as f32 / self.tick_rate as f32
    }

    /// Move to `to` if the edge exists in the phase machine.
    ///
    /// Placement -> Active -> (Paused <-> Active) -> RoundOver -> Placement
    pub fn transition(&mut self, to: RoundPhase) -> Result<(), SimError> {
        use RoundPhase::*;
        let allowed = matches!(
            (self.phase, to),
            (Placement, Active)
                | (Active, Paused)
                | (Paused, Active)
                | (Active, RoundOver)
                | (RoundOver, Placement)
        );
        if !allowed {
            return Err(SimError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        if to == Placement {
            self.ticks = 0;
            self.generations = 0;
        }
        self.phase = to;
        Ok(())
    }

    /// Count one active tick and report whether a generation is due.
    pub fn advance(&mut self) -> Result<TickSchedule, SimError> {
        if self.phase != RoundPhase::Active {
            return Err(SimError::InvalidPhase {
                operation: "tick",
                phase: self.phase,
            });
        }
        self.ticks += 1;
        Ok(TickSchedule {
            tick: self.ticks,
            run_generation: self.ticks % self.generation_interval as u64 == 0,
        })
    }

    /// Note that a generation ran; returns the new generation count
    pub fn record_generation(&mut self) -> u64 {
        self.generations += 1;
        self.generations
    }
}
