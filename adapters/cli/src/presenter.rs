//! Presenter that narrates the game through the `log` facade.

use glam::Vec2;
use oddone_core::{CellPosition, DifficultyTier, Field, GameOverReason, PresentationAction};
use oddone_presentation::{time_bar_fraction, Color, FieldPresentation, Presenter};

/// Final figures of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GameSummary {
    pub(crate) reason: GameOverReason,
    pub(crate) level: u32,
    pub(crate) score: u32,
    pub(crate) high_score: u32,
}

/// Headless presenter that logs every notification it receives.
#[derive(Debug, Default)]
pub(crate) struct LoggingPresenter {
    level: u32,
    rotate_next: bool,
    field: Option<FieldPresentation>,
    last_bar: Option<u32>,
    finished: Vec<GameSummary>,
}

impl LoggingPresenter {
    /// Games that ended while this presenter was attached.
    pub(crate) fn finished(&self) -> &[GameSummary] {
        &self.finished
    }

    /// Screen point at the centre of the shape drawn for `position`.
    pub(crate) fn pointer_for(&self, position: CellPosition) -> Option<Vec2> {
        let field = self.field.as_ref()?;
        let origin = field.cell_origin(position)?;
        Some(origin + Vec2::splat(field.cell_extent() / 2.0))
    }

    /// Cell drawn beneath a screen point, if any.
    pub(crate) fn cell_under(&self, point: Vec2) -> Option<CellPosition> {
        self.field.as_ref()?.cell_at(point)
    }
}

impl Presenter for LoggingPresenter {
    fn level_updated(&mut self, level: u32) {
        self.level = level;
        log::debug!("level {level}");
    }

    fn score_updated(&mut self, score: u32, high_score: u32) {
        log::debug!("score {score} (high score {high_score})");
    }

    fn time_updated(&mut self, time: f64, max_time: f64) {
        // one trace line per tenth of the bar
        let bar = (time_bar_fraction(time, max_time) * 10.0).ceil() as u32;
        if self.last_bar != Some(bar) {
            self.last_bar = Some(bar);
            log::trace!(
                "time {time:.2}s [{:<10}]",
                "#".repeat(usize::try_from(bar).unwrap_or(0))
            );
        }
    }

    fn rotation_requested(&mut self) {
        self.rotate_next = true;
    }

    fn field_generated(&mut self, field: &Field) {
        let presentation = FieldPresentation::new(field);
        let rotated = std::mem::take(&mut self.rotate_next);
        let usual = Color::from_hsb(field.colors().usual());
        log::debug!(
            "{0}x{0} field, extent {1:.0}, rotated {2}, unusual at {3:?}, usual rgb ({4:.2}, {5:.2}, {6:.2})",
            field.dimension(),
            presentation.extent(),
            rotated,
            field.unusual_position(),
            usual.red,
            usual.green,
            usual.blue,
        );
        self.field = Some(presentation);
    }

    fn presentation_action_requested(&mut self, action: PresentationAction) {
        match action {
            PresentationAction::PlaySound { sound } => log::trace!("play {sound:?}"),
            PresentationAction::LoopSound { sound } => log::trace!("loop {sound:?}"),
            PresentationAction::StartTimer { interval } => {
                log::debug!("timer armed every {interval:?}");
            }
            PresentationAction::StopAllActions => log::debug!("all actions stopped"),
        }
    }

    fn field_cleared(&mut self) {
        self.field = None;
        self.last_bar = None;
    }

    fn game_over(&mut self, reason: GameOverReason, score: u32, high_score: u32) {
        log::info!("game over ({reason:?}): level {}, score {score}, high score {high_score}", self.level);
        self.finished.push(GameSummary {
            reason,
            level: self.level,
            score,
            high_score,
        });
    }

    fn difficulty_changed(&mut self, tier: DifficultyTier) {
        log::info!("difficulty set to {tier}");
    }
}
