//! Life Pong headless driver
//!
//! Plays a short match with stamped starter colonies and prints the final
//! scoreboard as JSON. Usage: `life-pong [seed] [settings.json]`

use life_pong::patterns;
use life_pong::sim::{GameEvent, GameState, RoundPhase, Side, tick};
use life_pong::{Settings, SimError};

/// Rounds played before stopping
const ROUNDS: u32 = 5;
/// Give up on a round after this many seconds of play
const MAX_ROUND_SECS: u32 = 300;

/// Fill each placement zone with a staggered column of patterns until the
/// budget runs out
fn seed_colonies(state: &mut GameState) {
    let lineup = ["block", "blinker", "beehive", "glider"];
    for side in [Side::Left, Side::Right] {
        let zone = state.placement_zone(side);
        let col = match side {
            Side::Left => zone.end - 6,
            Side::Right => zone.start + 2,
        };
        let mut row = 1;
        for pattern in lineup.iter().filter_map(|name| patterns::find(name)).cycle() {
            if row + pattern.height() > state.grid().rows() as i32 {
                break;
            }
            match state.stamp_pattern(pattern, col, row) {
                Ok(_) => row += pattern.height() + 2,
                Err(SimError::BudgetExceeded { .. }) => break,
                Err(e) => {
                    log::warn!("Skipping {}: {e}", pattern.name);
                    row += pattern.height() + 2;
                }
            }
        }
    }
}

fn play_round(state: &mut GameState) -> Result<Option<Side>, SimError> {
    seed_colonies(state);
    state.start_round()?;

    let max_ticks = MAX_ROUND_SECS * state.settings().tick_rate;
    for _ in 0..max_ticks {
        for event in tick(state)? {
            match event {
                GameEvent::Scored { scorer, .. } => return Ok(Some(scorer)),
                GameEvent::Generation {
                    number,
                    births,
                    deaths,
                } => log::debug!("gen {number}: +{births} -{deaths}"),
                _ => {}
            }
        }
    }
    Ok(None)
}

fn main() {
    env_logger::init();
    log::info!("Life Pong (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x11fe_0a06);
    let settings = args.next().map(Settings::load).unwrap_or_default();

    let mut state = match GameState::with_settings(seed, settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    for _ in 0..ROUNDS {
        match play_round(&mut state) {
            Ok(Some(_)) => {}
            Ok(None) => {
                log::info!("Round {} timed out with no score", state.round());
                break;
            }
            Err(e) => {
                log::error!("Round {} aborted: {e}", state.round());
                break;
            }
        }
        if state.phase() == RoundPhase::RoundOver {
            if let Err(e) = state.reset_round() {
                log::error!("{e}");
                break;
            }
        }
    }

    match serde_json::to_string_pretty(state.scoreboard()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not encode scoreboard: {e}"),
    }
}
