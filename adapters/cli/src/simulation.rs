//! Headless frame loop that wires the session to its systems and presenter.

use std::time::Duration;

use anyhow::{bail, Result};
use oddone_core::{Command, DifficultyTier, Event};
use oddone_presentation::dispatch;
use oddone_session::{self as session, GameSession};
use oddone_system_autoplay::Autoplay;
use oddone_system_countdown::Countdown;

use crate::presenter::{GameSummary, LoggingPresenter};

/// Parameters of a headless run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Simulation {
    pub(crate) games: u32,
    pub(crate) frame: Duration,
    pub(crate) max_frames: u64,
    pub(crate) difficulty: Option<DifficultyTier>,
}

/// Plays the requested number of games and returns their summaries.
///
/// A game still running after `max_frames` frames is stopped.
pub(crate) fn run(
    simulation: Simulation,
    session: &mut GameSession,
    autoplay: &mut Autoplay,
    presenter: &mut LoggingPresenter,
) -> Result<Vec<GameSummary>> {
    let mut countdown = Countdown::new();

    if let Some(tier) = simulation.difficulty {
        let mut events = Vec::new();
        session::apply(session, Command::ConfigureDifficulty { tier }, &mut events);
        dispatch(presenter, &events);
    }

    for game in 0..simulation.games {
        let mut events = Vec::new();
        session::apply(session, Command::Start, &mut events);
        if events.is_empty() {
            bail!("game {} could not start: no field fits the configuration", game + 1);
        }
        dispatch(presenter, &events);

        let mut frames = 0_u64;
        while !is_game_over(&events) {
            if frames >= simulation.max_frames {
                log::warn!("game {} still running after {frames} frames, stopping", game + 1);
                events.clear();
                session::apply(session, Command::Stop, &mut events);
                dispatch(presenter, &events);
                countdown.handle(&events, Duration::ZERO, &mut Vec::new());
                autoplay.handle(&events, Duration::ZERO, &mut Vec::new());
                break;
            }
            frames += 1;

            let mut commands = Vec::new();
            countdown.handle(&events, simulation.frame, &mut commands);
            autoplay.handle(&events, simulation.frame, &mut commands);

            events.clear();
            for command in commands {
                let command = route_pointer(presenter, command);
                session::apply(session, command, &mut events);
            }
            dispatch(presenter, &events);
        }

        if is_game_over(&events) {
            countdown.handle(&events, Duration::ZERO, &mut Vec::new());
            autoplay.handle(&events, Duration::ZERO, &mut Vec::new());
        }
    }

    Ok(presenter.finished().to_vec())
}

fn is_game_over(events: &[Event]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::GameOver { .. }))
}

/// Sends a selection through the on-screen geometry the way a pointer would.
fn route_pointer(presenter: &LoggingPresenter, command: Command) -> Command {
    let Command::SelectCell { position } = command else {
        return command;
    };
    match presenter
        .pointer_for(position)
        .and_then(|point| presenter.cell_under(point))
    {
        Some(position) => Command::SelectCell { position },
        None => command,
    }
}
