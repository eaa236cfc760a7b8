//! Match scoreboard
//!
//! Points per side plus the most recent rounds, newest first. Lives for the
//! whole match; rounds come and go.

use serde::{Deserialize, Serialize};

use crate::sim::Side;

/// Number of finished rounds kept in the history
pub const MAX_ROUND_HISTORY: usize = 10;

/// Summary of one finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number
    pub round: u32,
    pub winner: Side,
    /// Active ticks the round lasted
    pub ticks: u64,
    /// Life generations run during the round
    pub generations: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub left: u32,
    pub right: u32,
    /// Newest first
    pub rounds: Vec<RoundRecord>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Award the round to `record.winner`; returns their new score
    pub fn record(&mut self, record: RoundRecord) -> u32 {
        let score = match record.winner {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *score += 1;
        let score = *score;

        self.rounds.insert(0, record);
        self.rounds.truncate(MAX_ROUND_HISTORY);
        score
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Side ahead on points, if any
    pub fn leader(&self) -> Option<Side> {
        match self.left.cmp(&self.right) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn last_round(&self) -> Option<&RoundRecord> {
        self.rounds.first()
    }
}
