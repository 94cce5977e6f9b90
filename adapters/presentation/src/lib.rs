#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Odd One Out adapters.
//!
//! The session reports every observable change as an [`Event`]. Adapters
//! implement [`Presenter`] for the notifications they care about and feed the
//! session's events through [`dispatch`]. Geometry helpers map pointer input
//! back to cells and size the countdown bar.

use glam::Vec2;
use oddone_core::{
    CellPosition, DifficultyTier, Event, Field, GameOverReason, Hsb, PresentationAction,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Converts a hue/saturation/brightness colour into an opaque RGB color.
    #[must_use]
    pub fn from_hsb(color: Hsb) -> Self {
        let saturation = color.saturation().clamp(0.0, 1.0);
        let brightness = color.brightness().clamp(0.0, 1.0);
        let hue = color.hue().rem_euclid(360.0) / 60.0;

        let chroma = brightness * saturation;
        let secondary = chroma * (1.0 - (hue % 2.0 - 1.0).abs());
        let (red, green, blue) = match hue as u32 {
            0 => (chroma, secondary, 0.0),
            1 => (secondary, chroma, 0.0),
            2 => (0.0, chroma, secondary),
            3 => (0.0, secondary, chroma),
            4 => (secondary, 0.0, chroma),
            _ => (chroma, 0.0, secondary),
        };
        let offset = brightness - chroma;

        Self::new(red + offset, green + offset, blue + offset, 1.0)
    }
}

/// Capability set implemented by adapters that show the game.
///
/// Every notification defaults to a no-op so presenters only implement what
/// they render.
pub trait Presenter {
    /// The level changed.
    fn level_updated(&mut self, _level: u32) {}

    /// The score changed; `high_score` already accounts for it.
    fn score_updated(&mut self, _score: u32, _high_score: u32) {}

    /// The remaining time changed.
    fn time_updated(&mut self, _time: f64, _max_time: f64) {}

    /// The next field should be shown rotated by half a turn.
    fn rotation_requested(&mut self) {}

    /// A new field replaces the one currently shown.
    fn field_generated(&mut self, _field: &Field) {}

    /// The session requests a sound, a repeating timer or a stop of all actions.
    fn presentation_action_requested(&mut self, _action: PresentationAction) {}

    /// The field should be removed from screen.
    fn field_cleared(&mut self) {}

    /// The game ended.
    fn game_over(&mut self, _reason: GameOverReason, _score: u32, _high_score: u32) {}

    /// The difficulty tier changed.
    fn difficulty_changed(&mut self, _tier: DifficultyTier) {}
}

/// Forwards session events to the matching presenter notifications in order.
pub fn dispatch<P>(presenter: &mut P, events: &[Event])
where
    P: Presenter + ?Sized,
{
    for event in events {
        match event {
            Event::DifficultyChanged { tier } => presenter.difficulty_changed(*tier),
            Event::LevelUpdated { level } => presenter.level_updated(*level),
            Event::ScoreUpdated { score, high_score } => {
                presenter.score_updated(*score, *high_score);
            }
            Event::TimeUpdated { time, max_time } => presenter.time_updated(*time, *max_time),
            Event::RotationRequested => presenter.rotation_requested(),
            Event::FieldGenerated { field } => presenter.field_generated(field),
            Event::PresentationActionRequested { action } => {
                presenter.presentation_action_requested(*action);
            }
            Event::FieldCleared => presenter.field_cleared(),
            Event::GameOver {
                reason,
                score,
                high_score,
            } => presenter.game_over(*reason, *score, *high_score),
        }
    }
}

/// Screen geometry of a field, used to hit-test pointer input.
///
/// Points are expressed in field-local units with the origin at the top-left
/// corner of the unrotated field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPresentation {
    dimension: u32,
    cell_pitch: f32,
    cell_extent: f32,
    rotated: bool,
}

impl FieldPresentation {
    /// Captures the geometry of the provided field.
    #[must_use]
    pub fn new(field: &Field) -> Self {
        Self {
            dimension: field.dimension(),
            cell_pitch: field.cell_pitch(),
            cell_extent: field.cell_extent(),
            rotated: field.is_rotated(),
        }
    }

    /// Side length of the whole field.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.cell_pitch * self.dimension as f32
    }

    /// Side length of each drawn shape.
    #[must_use]
    pub const fn cell_extent(&self) -> f32 {
        self.cell_extent
    }

    /// Whether the field is shown rotated by half a turn.
    #[must_use]
    pub const fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// Top-left corner of the drawn shape for a cell, after rotation.
    ///
    /// Returns `None` when the position lies outside the grid.
    #[must_use]
    pub fn cell_origin(&self, position: CellPosition) -> Option<Vec2> {
        if position.column() >= self.dimension || position.row() >= self.dimension {
            return None;
        }

        let origin = Vec2::new(
            position.column() as f32 * self.cell_pitch,
            position.row() as f32 * self.cell_pitch,
        );
        if self.rotated {
            Some(Vec2::splat(self.extent() - self.cell_extent) - origin)
        } else {
            Some(origin)
        }
    }

    /// Maps a point on screen to the cell drawn beneath it.
    ///
    /// Points outside the field, or inside the gutter between shapes, miss.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellPosition> {
        let extent = self.extent();
        if self.dimension == 0
            || self.cell_pitch <= 0.0
            || !point.is_finite()
            || point.x < 0.0
            || point.y < 0.0
            || point.x >= extent
            || point.y >= extent
        {
            return None;
        }

        let local = if self.rotated {
            Vec2::splat(extent) - point
        } else {
            point
        };
        let column = self.axis_cell(local.x)?;
        let row = self.axis_cell(local.y)?;
        Some(CellPosition::new(column, row))
    }

    fn axis_cell(&self, value: f32) -> Option<u32> {
        let index = (value / self.cell_pitch).floor();
        if index < 0.0 || index >= self.dimension as f32 {
            return None;
        }
        let offset = value - index * self.cell_pitch;
        if offset > self.cell_extent {
            return None;
        }
        Some(index as u32)
    }
}

/// Fraction of the countdown bar that should remain filled.
///
/// The result is clamped into `0.0..=1.0`; a non-positive `max_time` yields an
/// empty bar.
#[must_use]
pub fn time_bar_fraction(time: f64, max_time: f64) -> f32 {
    if max_time <= 0.0 || !max_time.is_finite() || time.is_nan() {
        return 0.0;
    }
    (time / max_time).clamp(0.0, 1.0) as f32
}
