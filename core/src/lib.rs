#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Odd One Out engine.
//!
//! This crate defines the message surface that connects presenters, the
//! authoritative game session, and pure systems. Presenters submit
//! [`Command`] values describing player intent and timer ticks, the session
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing every observable change. The session never
//! renders, animates or plays audio itself; it only signals intent through
//! [`PresentationAction`] values carried by events.

use std::{fmt, str::FromStr, time::Duration};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Find the odd one out.";

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Selects the difficulty tier used by subsequent field generations.
    ConfigureDifficulty {
        /// Tier that controls the contrast of the unusual cell.
        tier: DifficultyTier,
    },
    /// Describes the on-screen area and shapes available to generated fields.
    ConfigureField {
        /// Side length of the square field measured in presenter units.
        extent: f32,
        /// Shapes the presenter is able to render.
        shapes: ShapeSet,
    },
    /// Begins a fresh game when the session is idle.
    Start,
    /// Reports that the player tapped the cell at the provided position.
    SelectCell {
        /// Grid position of the tapped cell.
        position: CellPosition,
    },
    /// Advances the countdown by one fixed timer interval.
    Tick,
    /// Ends the running game at the player's request.
    Stop,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new difficulty tier is active.
    DifficultyChanged {
        /// Tier applied to subsequent field generations.
        tier: DifficultyTier,
    },
    /// Reports the level after it changed.
    LevelUpdated {
        /// Current level.
        level: u32,
    },
    /// Reports the score after it changed.
    ScoreUpdated {
        /// Current score.
        score: u32,
        /// Highest score observed during the session's lifetime.
        high_score: u32,
    },
    /// Reports the remaining time after it changed.
    TimeUpdated {
        /// Remaining time in seconds; briefly negative when the game ends.
        time: f64,
        /// Largest remaining time observed during the current game.
        max_time: f64,
    },
    /// Asks the presenter to show the next field rotated by half a turn.
    RotationRequested,
    /// Delivers a freshly generated field that replaces the previous one.
    FieldGenerated {
        /// Complete field description.
        field: Field,
    },
    /// Asks the presenter to run an effect the core does not implement.
    PresentationActionRequested {
        /// Effect to run.
        action: PresentationAction,
    },
    /// Asks the presenter to remove the displayed field.
    FieldCleared,
    /// Announces that the running game ended.
    GameOver {
        /// Why the game ended.
        reason: GameOverReason,
        /// Final score of the game that ended.
        score: u32,
        /// Highest score observed during the session's lifetime.
        high_score: u32,
    },
}

/// Effects the session wants executed by the presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresentationAction {
    /// Plays a one-shot sound effect.
    PlaySound {
        /// Sound to play.
        sound: Sound,
    },
    /// Plays a sound on repeat until every action is stopped.
    LoopSound {
        /// Sound to loop.
        sound: Sound,
    },
    /// Starts the repeating countdown that feeds [`Command::Tick`] back into the session.
    StartTimer {
        /// Simulated time between consecutive ticks.
        interval: Duration,
    },
    /// Cancels every running action, including the countdown.
    StopAllActions,
}

/// Sound effects the session may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    /// Played after the unusual cell was found.
    Success,
    /// Played after a usual cell was tapped.
    Failure,
    /// Background music looped while a game runs.
    Music,
}

/// Reasons a game may end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverReason {
    /// The countdown dropped below zero.
    TimedOut,
    /// The player stopped the game.
    Stopped,
}

/// Lifecycle phase of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No timer running and no field shown.
    #[default]
    Idle,
    /// Timer running, field shown, taps accepted.
    Playing,
}

/// Difficulty tiers controlling how distinct the unusual cell looks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    /// Anyone can spot the unusual cell.
    Children,
    /// Almost everyone can spot the unusual cell.
    Easy,
    /// The unusual cell takes some effort to find.
    #[default]
    Medium,
    /// The unusual cell is very hard to find.
    Hard,
}

impl DifficultyTier {
    /// Every tier ordered from easiest to hardest.
    pub const ALL: [DifficultyTier; 4] = [Self::Children, Self::Easy, Self::Medium, Self::Hard];

    /// Brightness assigned to the unusual cell's colour.
    ///
    /// Values lie in `(0, 1]` and increase with the tier; a brighter unusual
    /// cell sits closer to the usual cells' full brightness.
    #[must_use]
    pub const fn distinctness(self) -> f32 {
        match self {
            Self::Children => 0.6,
            Self::Easy => 0.7,
            Self::Medium => 0.8,
            Self::Hard => 0.9,
        }
    }

    /// Lowercase name used in configuration files and command-line flags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Children => "children",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DifficultyTier {
    type Err = ParseDifficultyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDifficultyError(trimmed.to_owned()))
    }
}

/// Error returned when a difficulty name is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown difficulty `{0}`, expected one of children, easy, medium, hard")]
pub struct ParseDifficultyError(String);

/// Colour expressed as hue, saturation and brightness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsb {
    hue: f32,
    saturation: f32,
    brightness: f32,
}

impl Hsb {
    /// Creates a colour from hue in degrees and saturation/brightness in `0.0..=1.0`.
    #[must_use]
    pub const fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// Hue in degrees within `0.0..360.0`.
    #[must_use]
    pub const fn hue(&self) -> f32 {
        self.hue
    }

    /// Saturation in `0.0..=1.0`.
    #[must_use]
    pub const fn saturation(&self) -> f32 {
        self.saturation
    }

    /// Brightness in `0.0..=1.0`.
    #[must_use]
    pub const fn brightness(&self) -> f32 {
        self.brightness
    }
}

/// The two colours used by a single field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorPair {
    usual: Hsb,
    unusual: Hsb,
}

impl ColorPair {
    /// Brightness shared by every usual cell.
    pub const USUAL_BRIGHTNESS: f32 = 1.0;

    /// Derives the colour pair for a hue/saturation draw and difficulty tier.
    #[must_use]
    pub const fn new(hue: f32, saturation: f32, tier: DifficultyTier) -> Self {
        Self {
            usual: Hsb::new(hue, saturation, Self::USUAL_BRIGHTNESS),
            unusual: Hsb::new(hue, saturation, tier.distinctness()),
        }
    }

    /// Colour applied to every cell except the unusual one.
    #[must_use]
    pub const fn usual(&self) -> Hsb {
        self.usual
    }

    /// Colour applied to the unusual cell.
    #[must_use]
    pub const fn unusual(&self) -> Hsb {
        self.unusual
    }

    /// Selects the colour for a cell based on whether it is the unusual one.
    #[must_use]
    pub const fn color_for(&self, unusual: bool) -> Hsb {
        if unusual {
            self.unusual
        } else {
            self.usual
        }
    }
}

/// Location of a single field cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPosition {
    column: u32,
    row: u32,
}

impl CellPosition {
    /// Creates a new cell position.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Shapes a cell may be drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    /// Square with rounded corners.
    Rounded,
    /// Circle.
    Circle,
    /// Regular hexagon.
    Polygon,
}

impl ShapeType {
    /// Every shape in draw-table order.
    pub const ALL: [ShapeType; 3] = [Self::Rounded, Self::Circle, Self::Polygon];

    /// Lowercase name of the shape, also used as its asset key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rounded => "rounded",
            Self::Circle => "circle",
            Self::Polygon => "polygon",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of shapes the presenter is able to render.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ShapeSet: u8 {
        /// Rounded squares are renderable.
        const ROUNDED = 1;
        /// Circles are renderable.
        const CIRCLE = 1 << 1;
        /// Hexagons are renderable.
        const POLYGON = 1 << 2;
    }
}

impl ShapeSet {
    /// Returns the single-element set for the provided shape.
    #[must_use]
    pub const fn of(shape: ShapeType) -> Self {
        match shape {
            ShapeType::Rounded => Self::ROUNDED,
            ShapeType::Circle => Self::CIRCLE,
            ShapeType::Polygon => Self::POLYGON,
        }
    }

    /// Reports whether the provided shape is renderable.
    #[must_use]
    pub const fn supports(&self, shape: ShapeType) -> bool {
        self.contains(Self::of(shape))
    }
}

impl Default for ShapeSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<ShapeType> for ShapeSet {
    fn from_iter<I: IntoIterator<Item = ShapeType>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, shape| set | Self::of(shape))
    }
}

/// Point expressed in field-local presenter units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    x: f32,
    y: f32,
}

impl FieldPoint {
    /// Creates a point from field-local coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal offset from the field's origin corner.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical offset from the field's origin corner.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// A single grid position within a generated field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: CellPosition,
    shape: ShapeType,
    unusual: bool,
    color: Hsb,
    origin: FieldPoint,
}

impl Cell {
    /// Creates a cell description.
    #[must_use]
    pub const fn new(
        position: CellPosition,
        shape: ShapeType,
        unusual: bool,
        color: Hsb,
        origin: FieldPoint,
    ) -> Self {
        Self {
            position,
            shape,
            unusual,
            color,
            origin,
        }
    }

    /// Grid position of the cell.
    #[must_use]
    pub const fn position(&self) -> CellPosition {
        self.position
    }

    /// Shape used to draw the cell.
    #[must_use]
    pub const fn shape(&self) -> ShapeType {
        self.shape
    }

    /// Whether this is the cell the player must find.
    #[must_use]
    pub const fn is_unusual(&self) -> bool {
        self.unusual
    }

    /// Display colour of the cell.
    #[must_use]
    pub const fn color(&self) -> Hsb {
        self.color
    }

    /// Corner of the cell's slot within the field.
    #[must_use]
    pub const fn origin(&self) -> FieldPoint {
        self.origin
    }
}

/// Complete description of the grid shown for one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    dimension: u32,
    cell_pitch: f32,
    cell_extent: f32,
    colors: ColorPair,
    rotated: bool,
    unusual: CellPosition,
    cells: Vec<Cell>,
}

impl Field {
    /// Assembles a field from fully generated parts.
    ///
    /// `cells` must hold `dimension * dimension` entries in row-major order
    /// with exactly one unusual cell located at `unusual`.
    #[must_use]
    pub fn new(
        dimension: u32,
        cell_pitch: f32,
        cell_extent: f32,
        colors: ColorPair,
        rotated: bool,
        unusual: CellPosition,
        cells: Vec<Cell>,
    ) -> Self {
        debug_assert_eq!(
            cells.len() as u64,
            u64::from(dimension) * u64::from(dimension),
            "field cells must fill the grid"
        );
        Self {
            dimension,
            cell_pitch,
            cell_extent,
            colors,
            rotated,
            unusual,
            cells,
        }
    }

    /// Number of cells along each side of the square grid.
    #[must_use]
    pub const fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Distance between the origins of neighbouring cells.
    #[must_use]
    pub const fn cell_pitch(&self) -> f32 {
        self.cell_pitch
    }

    /// Rendered side length of each cell once the gutter is removed.
    #[must_use]
    pub const fn cell_extent(&self) -> f32 {
        self.cell_extent
    }

    /// Side length of the whole field.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.cell_pitch * self.dimension as f32
    }

    /// Colours used by the field.
    #[must_use]
    pub const fn colors(&self) -> ColorPair {
        self.colors
    }

    /// Whether the presenter should show the field rotated by half a turn.
    #[must_use]
    pub const fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// Position of the cell the player must find.
    #[must_use]
    pub const fn unusual_position(&self) -> CellPosition {
        self.unusual
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: CellPosition) -> bool {
        position.column() < self.dimension && position.row() < self.dimension
    }

    /// Returns the cell at the provided position, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, position: CellPosition) -> Option<&Cell> {
        if !self.contains(position) {
            return None;
        }
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        let width = usize::try_from(self.dimension).ok()?;
        self.cells.get(row * width + column)
    }
}

/// Uniform random draws consumed by field generation.
///
/// Every random decision in the engine goes through this trait so tests can
/// substitute a scripted sequence and replays can reuse a seed.
pub trait RandomSource: fmt::Debug {
    /// Returns a uniformly distributed integer in `0..upper`.
    ///
    /// Callers never pass zero.
    fn next_below(&mut self, upper: u32) -> u32;

    /// Notifies the source that a new game with the provided index begins.
    fn begin_game(&mut self, _game_index: u64) {}
}

/// Reasons a field generation attempt may be aborted.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GenerationError {
    /// The requested level maps to a grid without cells.
    #[error("level {level} produces an empty field")]
    EmptyField {
        /// Level supplied with the request.
        level: u32,
    },
    /// The field extent is zero, negative or not finite.
    #[error("field extent must be positive and finite (received {extent})")]
    InvalidExtent {
        /// Extent supplied with the request.
        extent: f32,
    },
    /// The cell pitch cannot accommodate the gutter between cells.
    #[error("cell pitch {pitch} leaves no room for the {margin} unit gutter")]
    CellTooSmall {
        /// Distance between neighbouring cell origins.
        pitch: f32,
        /// Gutter subtracted from every cell.
        margin: f32,
    },
    /// A chosen shape has no renderable asset.
    #[error("no renderable asset for {shape} shapes")]
    MissingShape {
        /// Shape that could not be resolved.
        shape: ShapeType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn two_by_two() -> Field {
        let colors = ColorPair::new(120.0, 0.7, DifficultyTier::Hard);
        let unusual = CellPosition::new(1, 0);
        let cells = (0..2)
            .flat_map(|row| (0..2).map(move |column| CellPosition::new(column, row)))
            .map(|position| {
                let is_unusual = position == unusual;
                Cell::new(
                    position,
                    ShapeType::Rounded,
                    is_unusual,
                    colors.color_for(is_unusual),
                    FieldPoint::new(position.column() as f32 * 50.0, position.row() as f32 * 50.0),
                )
            })
            .collect();
        Field::new(2, 50.0, 40.0, colors, false, unusual, cells)
    }

    #[test]
    fn distinctness_increases_with_tier() {
        let values: Vec<f32> = DifficultyTier::ALL
            .iter()
            .map(|tier| tier.distinctness())
            .collect();

        assert_eq!(values, vec![0.6, 0.7, 0.8, 0.9]);
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(values.iter().all(|value| *value > 0.0 && *value <= 1.0));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<DifficultyTier>(), Ok(DifficultyTier::Hard));
        assert_eq!(
            " children ".parse::<DifficultyTier>(),
            Ok(DifficultyTier::Children)
        );
        assert!("nightmare".parse::<DifficultyTier>().is_err());
    }

    #[test]
    fn color_pair_shares_hue_and_saturation() {
        let pair = ColorPair::new(200.0, 0.8, DifficultyTier::Easy);

        assert_eq!(pair.usual().hue(), pair.unusual().hue());
        assert_eq!(pair.usual().saturation(), pair.unusual().saturation());
        assert_eq!(pair.usual().brightness(), 1.0);
        assert_eq!(pair.unusual().brightness(), 0.7);
        assert_eq!(pair.color_for(true), pair.unusual());
    }

    #[test]
    fn shape_set_collects_from_iterator() {
        let set: ShapeSet = [ShapeType::Rounded, ShapeType::Polygon].into_iter().collect();

        assert!(set.supports(ShapeType::Rounded));
        assert!(!set.supports(ShapeType::Circle));
        assert!(set.supports(ShapeType::Polygon));
        assert_eq!(ShapeSet::default(), ShapeSet::all());
    }

    #[test]
    fn field_lookup_respects_bounds() {
        let field = two_by_two();

        assert_eq!(field.extent(), 100.0);
        let cell = field.cell(CellPosition::new(1, 0)).expect("inside grid");
        assert!(cell.is_unusual());
        assert_eq!(cell.origin(), FieldPoint::new(50.0, 0.0));
        assert!(field.cell(CellPosition::new(2, 0)).is_none());
        assert!(field.cell(CellPosition::new(0, 2)).is_none());
    }

    #[test]
    fn field_round_trips_through_bincode() {
        assert_round_trip(&two_by_two());
    }
}
