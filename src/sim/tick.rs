//! Fixed cadence simulation tick
//!
//! One call = one frame of the active phase: speed-up check, ball advance,
//! collision resolution, then (every K ticks) a life generation. The whole
//! sequence runs to completion before any outside input is applied.

use super::collision;
use super::life;
use super::state::{GameEvent, GameState, RoundPhase};
use crate::error::SimError;
use crate::scoreboard::RoundRecord;

/// Advance the match by one tick.
///
/// Rejected outside the active phase, except while paused where it does
/// nothing. Returns what happened, in order.
pub fn tick(state: &mut GameState) -> Result<Vec<GameEvent>, SimError> {
    if state.phase() == RoundPhase::Paused {
        return Ok(Vec::new());
    }
    let schedule = state
        .clock
        .advance()
        .inspect_err(|e| log::warn!("Rejected: {e}"))?;

    let mut events = Vec::new();
    let settings = &state.settings;

    let interval = settings.ball_accel_interval as u64;
    if interval > 0 && schedule.tick % interval == 0 && state.ball.speed < settings.ball_max_speed {
        state
            .ball
            .set_speed(state.ball.speed + settings.ball_acceleration, settings.ball_max_speed);
        events.push(GameEvent::SpeedUp {
            speed: state.ball.speed,
        });
    }

    state.ball.advance();

    let report = collision::resolve(&mut state.ball, &mut state.grid, settings);
    if let Some(hit) = report.cell {
        if hit.reflected {
            events.push(GameEvent::CellBounce {
                col: hit.contact.col,
                row: hit.contact.row,
                axis: hit.contact.axis,
            });
        }
        if hit.destroyed {
            events.push(GameEvent::CellDestroyed {
                col: hit.contact.col,
                row: hit.contact.row,
            });
        }
    }
    if report.wall.is_some() {
        events.push(GameEvent::WallBounce {
            pos: state.ball.pos,
        });
    }

    if let Some(scorer) = report.scorer {
        state.clock.transition(RoundPhase::RoundOver)?;
        let score = state.scoreboard.record(RoundRecord {
            round: state.round,
            winner: scorer,
            ticks: state.clock.ticks(),
            generations: state.clock.generations(),
        });
        log::info!(
            "Round {} to {} after {} ticks ({} now has {score})",
            state.round,
            scorer,
            state.clock.ticks(),
            scorer,
        );
        events.push(GameEvent::Scored {
            scorer,
            round: state.round,
        });
        return Ok(events);
    }

    if schedule.run_generation {
        let stats = life::step(&mut state.grid);
        let number = state.clock.record_generation();
        events.push(GameEvent::Generation {
            number,
            births: stats.births,
            deaths: stats.deaths,
        });
    }

    Ok(events)
}
