use std::fmt;

use crate::sim::{RoundPhase, Side};

/// Rejections raised by the simulation core.
///
/// None of these are fatal: the offending request is dropped and the loop
/// carries on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    OutOfBounds { col: i32, row: i32 },
    BudgetExceeded { side: Side, budget: u32 },
    OutsidePlacementZone { col: i32 },
    InvalidPhase { operation: &'static str, phase: RoundPhase },
    InvalidTransition { from: RoundPhase, to: RoundPhase },
    InvalidSettings(String),
    SettingsParse(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { col, row } => {
                write!(f, "cell ({col}, {row}) is outside the board")
            }
            Self::BudgetExceeded { side, budget } => {
                write!(f, "{side} player has used all {budget} placement cells")
            }
            Self::OutsidePlacementZone { col } => {
                write!(f, "column {col} is not inside a placement zone")
            }
            Self::InvalidPhase { operation, phase } => {
                write!(f, "`{operation}` is not allowed during {phase}")
            }
            Self::InvalidTransition { from, to } => {
                write!(f, "cannot move from {from} to {to}")
            }
            Self::InvalidSettings(reason) => write!(f, "invalid settings: {reason}"),
            Self::SettingsParse(reason) => write!(f, "could not parse settings: {reason}"),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::BudgetExceeded {
            side: Side::Left,
            budget: 40,
        };
        assert_eq!(err.to_string(), "left player has used all 40 placement cells");

        let err = SimError::InvalidPhase {
            operation: "tick",
            phase: RoundPhase::Placement,
        };
        assert_eq!(err.to_string(), "`tick` is not allowed during placement");

        let err = SimError::InvalidTransition {
            from: RoundPhase::RoundOver,
            to: RoundPhase::Active,
        };
        assert_eq!(err.to_string(), "cannot move from round-over to active");
    }
}
