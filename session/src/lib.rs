#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state for Odd One Out.
//!
//! The session owns level, score, countdown and the live [`Field`]. It only
//! changes in response to [`Command`] values passed to [`apply`], and every
//! observable change is reported as an [`Event`]; presenters never reach into
//! the session to mutate it.

mod config;

pub use config::{
    SessionConfig, DEFAULT_CORRECT_BONUS, DEFAULT_FIELD_EXTENT, DEFAULT_INCORRECT_PENALTY,
    DEFAULT_SEED, DEFAULT_START_LEVEL, DEFAULT_START_TIME, DEFAULT_TICK_INTERVAL,
};

use oddone_core::{
    CellPosition, Command, DifficultyTier, Event, Field, GameOverReason, PresentationAction,
    RandomSource, SessionPhase, ShapeSet, Sound,
};
use oddone_system_field_layout::{ChaChaSource, FieldLayoutGenerator, FieldRequest};

/// Represents the authoritative Odd One Out session.
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    phase: SessionPhase,
    level: u32,
    score: u32,
    high_score: u32,
    time: f64,
    max_time: f64,
    difficulty: DifficultyTier,
    field_extent: f32,
    shapes: ShapeSet,
    field: Option<Field>,
    games_started: u64,
    generator: FieldLayoutGenerator,
    random: Box<dyn RandomSource>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates an idle session using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Creates an idle session seeded from the configuration.
    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        let random = Box::new(ChaChaSource::new(config.seed));
        Self::with_random_source(config, random)
    }

    /// Creates an idle session that draws every random decision from `random`.
    #[must_use]
    pub fn with_random_source(config: SessionConfig, random: Box<dyn RandomSource>) -> Self {
        Self {
            phase: SessionPhase::Idle,
            level: config.start_level,
            score: 0,
            high_score: 0,
            time: config.start_time,
            max_time: config.start_time,
            difficulty: config.difficulty,
            field_extent: config.field_extent,
            shapes: config.shapes,
            field: None,
            games_started: 0,
            generator: FieldLayoutGenerator::new(),
            random,
            config,
        }
    }

    fn set_level(&mut self, level: u32, out_events: &mut Vec<Event>) {
        self.level = level;
        out_events.push(Event::LevelUpdated { level });
    }

    fn set_score(&mut self, score: u32, out_events: &mut Vec<Event>) {
        self.score = score;
        self.high_score = self.high_score.max(score);
        out_events.push(Event::ScoreUpdated {
            score,
            high_score: self.high_score,
        });
    }

    fn set_time(&mut self, time: f64, out_events: &mut Vec<Event>) {
        self.time = time;
        if time > self.max_time {
            self.max_time = time;
        }
        out_events.push(Event::TimeUpdated {
            time,
            max_time: self.max_time,
        });
    }

    fn field_request(&self, level: u32) -> FieldRequest {
        FieldRequest::new(level, self.field_extent, self.difficulty, self.shapes)
    }

    fn generate_field(&mut self, level: u32) -> Option<Field> {
        let request = self.field_request(level);
        match self.generator.generate(request, self.random.as_mut()) {
            Ok(field) => Some(field),
            Err(error) => {
                log::warn!("field generation for level {level} aborted: {error}");
                None
            }
        }
    }

    fn install_field(&mut self, field: Field, out_events: &mut Vec<Event>) {
        if field.is_rotated() {
            out_events.push(Event::RotationRequested);
        }
        self.field = Some(field.clone());
        out_events.push(Event::FieldGenerated { field });
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        if self.phase == SessionPhase::Playing {
            log::debug!("start ignored, game {} is running", self.games_started);
            return;
        }

        self.random.begin_game(self.games_started);
        let start_level = self.config.start_level;
        let Some(field) = self.generate_field(start_level) else {
            return;
        };

        self.games_started = self.games_started.saturating_add(1);
        self.phase = SessionPhase::Playing;
        self.max_time = self.config.start_time;
        self.set_level(start_level, out_events);
        self.set_score(0, out_events);
        self.set_time(self.config.start_time, out_events);
        self.install_field(field, out_events);
        out_events.push(Event::PresentationActionRequested {
            action: PresentationAction::StartTimer {
                interval: self.config.tick_interval,
            },
        });
        out_events.push(Event::PresentationActionRequested {
            action: PresentationAction::LoopSound {
                sound: Sound::Music,
            },
        });

        log::info!(
            "game {} started on {} difficulty",
            self.games_started,
            self.difficulty
        );
    }

    fn select_cell(&mut self, position: CellPosition, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Playing {
            log::debug!("selection at {position:?} ignored while idle");
            return;
        }
        let Some(field) = self.field.as_ref() else {
            return;
        };
        if !field.contains(position) {
            log::debug!("selection at {position:?} lies outside the field");
            return;
        }

        if position == field.unusual_position() {
            self.on_correct_selection(out_events);
        } else {
            self.on_incorrect_selection(out_events);
        }
    }

    fn on_correct_selection(&mut self, out_events: &mut Vec<Event>) {
        let level = self.level.saturating_add(1);
        self.set_level(level, out_events);
        if let Some(field) = self.generate_field(level) {
            self.install_field(field, out_events);
        }
        self.set_score(self.score.saturating_add(1), out_events);
        self.set_time(self.time + self.config.correct_bonus, out_events);
        out_events.push(Event::PresentationActionRequested {
            action: PresentationAction::PlaySound {
                sound: Sound::Success,
            },
        });
    }

    fn on_incorrect_selection(&mut self, out_events: &mut Vec<Event>) {
        self.set_time(self.time - self.config.incorrect_penalty, out_events);
        out_events.push(Event::PresentationActionRequested {
            action: PresentationAction::PlaySound {
                sound: Sound::Failure,
            },
        });
        self.finish_if_expired(out_events);
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        self.set_time(self.time - self.config.tick_decrement(), out_events);
        self.finish_if_expired(out_events);
    }

    /// Ends the game as soon as the countdown drops strictly below zero.
    fn finish_if_expired(&mut self, out_events: &mut Vec<Event>) {
        if self.time < 0.0 {
            self.finish(GameOverReason::TimedOut, out_events);
        }
    }

    fn stop(&mut self, out_events: &mut Vec<Event>) {
        if self.phase == SessionPhase::Playing {
            self.finish(GameOverReason::Stopped, out_events);
        } else {
            self.reset();
        }
    }

    fn finish(&mut self, reason: GameOverReason, out_events: &mut Vec<Event>) {
        self.phase = SessionPhase::Idle;
        out_events.push(Event::PresentationActionRequested {
            action: PresentationAction::StopAllActions,
        });
        self.field = None;
        out_events.push(Event::FieldCleared);
        out_events.push(Event::GameOver {
            reason,
            score: self.score,
            high_score: self.high_score,
        });

        log::info!(
            "game {} over ({reason:?}) at level {} with score {}, high score {}",
            self.games_started,
            self.level,
            self.score,
            self.high_score
        );
        self.reset();
    }

    fn reset(&mut self) {
        self.level = self.config.start_level;
        self.score = 0;
        self.time = self.config.start_time;
    }
}

/// Applies the provided command to the session, reporting every change.
///
/// Commands that do not make sense in the current phase are ignored without
/// emitting events.
pub fn apply(session: &mut GameSession, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureDifficulty { tier } => {
            session.difficulty = tier;
            out_events.push(Event::DifficultyChanged { tier });
        }
        Command::ConfigureField { extent, shapes } => {
            session.field_extent = extent;
            session.shapes = shapes;
            log::debug!("field extent set to {extent}, renderable shapes {shapes:?}");
        }
        Command::Start => session.start(out_events),
        Command::SelectCell { position } => session.select_cell(position, out_events),
        Command::Tick => session.tick(out_events),
        Command::Stop => session.stop(out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use oddone_core::{CellPosition, DifficultyTier, Field, SessionPhase};

    use super::GameSession;

    /// Immutable copy of the session's scalar state.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct SessionSnapshot {
        /// Lifecycle phase.
        pub phase: SessionPhase,
        /// Current level.
        pub level: u32,
        /// Current score.
        pub score: u32,
        /// Highest score observed during the session's lifetime.
        pub high_score: u32,
        /// Remaining time in seconds.
        pub time: f64,
        /// Largest remaining time observed during the current game.
        pub max_time: f64,
        /// Active difficulty tier.
        pub difficulty: DifficultyTier,
    }

    /// Captures the session's scalar state.
    #[must_use]
    pub fn snapshot(session: &GameSession) -> SessionSnapshot {
        SessionSnapshot {
            phase: session.phase,
            level: session.level,
            score: session.score,
            high_score: session.high_score,
            time: session.time,
            max_time: session.max_time,
            difficulty: session.difficulty,
        }
    }

    /// Lifecycle phase of the session.
    #[must_use]
    pub fn phase(session: &GameSession) -> SessionPhase {
        session.phase
    }

    /// Current level.
    #[must_use]
    pub fn level(session: &GameSession) -> u32 {
        session.level
    }

    /// Current score.
    #[must_use]
    pub fn score(session: &GameSession) -> u32 {
        session.score
    }

    /// Highest score observed during the session's lifetime.
    #[must_use]
    pub fn high_score(session: &GameSession) -> u32 {
        session.high_score
    }

    /// Remaining time in seconds.
    #[must_use]
    pub fn time(session: &GameSession) -> f64 {
        session.time
    }

    /// Largest remaining time observed during the current game.
    #[must_use]
    pub fn max_time(session: &GameSession) -> f64 {
        session.max_time
    }

    /// Active difficulty tier.
    #[must_use]
    pub fn difficulty(session: &GameSession) -> DifficultyTier {
        session.difficulty
    }

    /// Field currently shown, if a game is running.
    #[must_use]
    pub fn field(session: &GameSession) -> Option<&Field> {
        session.field.as_ref()
    }

    /// Position of the cell the player must find, if a game is running.
    #[must_use]
    pub fn unusual_cell(session: &GameSession) -> Option<CellPosition> {
        session.field.as_ref().map(Field::unusual_position)
    }

    /// Number of games started since the session was created.
    #[must_use]
    pub fn games_started(session: &GameSession) -> u64 {
        session.games_started
    }
}
