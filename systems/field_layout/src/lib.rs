#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural field generation and difficulty scaling.
//!
//! The generator turns a level, an on-screen extent and a difficulty tier into
//! a complete [`Field`]. Every random decision is drawn from the supplied
//! [`RandomSource`] in a fixed order so scripted sources can reproduce exact
//! layouts:
//!
//! 1. grid dimension, only when the level exceeds [`LINEAR_DIMENSION_LIMIT`];
//! 2. rotation coin, drawn on every call;
//! 3. hue and saturation of the colour pair;
//! 4. unusual column, then unusual row;
//! 5. per row a row coin, and per cell a shape draw once the level passes the
//!    per-cell mixing threshold.

mod palette;
mod random;

pub use palette::sample_color_pair;
pub use random::{derive_game_seed, derive_seed_from_phrase, ChaChaSource, ScriptedSource};

use oddone_core::{
    Cell, CellPosition, DifficultyTier, Field, FieldPoint, GenerationError, RandomSource,
    ShapeSet, ShapeType,
};

/// Gutter removed from every cell so neighbouring shapes never touch.
pub const CELL_MARGIN: f32 = 10.0;

/// Highest level whose grid dimension equals the level itself.
pub const LINEAR_DIMENSION_LIMIT: u32 = 8;

/// Smallest dimension drawn once the level exceeds [`LINEAR_DIMENSION_LIMIT`].
pub const RANDOM_DIMENSION_MIN: u32 = 5;

/// Largest dimension drawn once the level exceeds [`LINEAR_DIMENSION_LIMIT`].
pub const RANDOM_DIMENSION_MAX: u32 = 8;

/// First level at which fields are never rotated.
pub const ROTATION_LEVEL_LIMIT: u32 = 21;

const ROW_MIXING_LEVEL: u32 = 10;
const CELL_MIXING_LEVEL: u32 = 20;
const POLYGON_LEVEL: u32 = 30;

/// Parameters describing the field that should be generated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldRequest {
    /// Level driving dimension and shape mixing.
    pub level: u32,
    /// Side length of the square field in presenter units.
    pub extent: f32,
    /// Tier controlling the unusual cell's contrast.
    pub tier: DifficultyTier,
    /// Shapes the presenter can render.
    pub shapes: ShapeSet,
}

impl FieldRequest {
    /// Creates a new request.
    #[must_use]
    pub const fn new(level: u32, extent: f32, tier: DifficultyTier, shapes: ShapeSet) -> Self {
        Self {
            level,
            extent,
            tier,
            shapes,
        }
    }
}

/// Pure system that lays out a fresh field for each level.
#[derive(Clone, Copy, Debug)]
pub struct FieldLayoutGenerator {
    margin: f32,
}

impl Default for FieldLayoutGenerator {
    fn default() -> Self {
        Self {
            margin: CELL_MARGIN,
        }
    }
}

impl FieldLayoutGenerator {
    /// Creates a generator that uses the default gutter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator that removes a custom gutter from every cell.
    #[must_use]
    pub const fn with_margin(margin: f32) -> Self {
        Self { margin }
    }

    /// Gutter removed from every cell.
    #[must_use]
    pub const fn margin(&self) -> f32 {
        self.margin
    }

    /// Generates a complete field or reports why the attempt was aborted.
    ///
    /// No partially built field is ever returned; callers keep whatever field
    /// they displayed before when an error is reported.
    pub fn generate(
        &self,
        request: FieldRequest,
        random: &mut dyn RandomSource,
    ) -> Result<Field, GenerationError> {
        if !request.extent.is_finite() || request.extent <= 0.0 {
            return Err(GenerationError::InvalidExtent {
                extent: request.extent,
            });
        }
        if request.level == 0 {
            return Err(GenerationError::EmptyField {
                level: request.level,
            });
        }

        let dimension = dimension_for_level(request.level, random);
        let pitch = request.extent / dimension as f32;
        if pitch <= self.margin {
            return Err(GenerationError::CellTooSmall {
                pitch,
                margin: self.margin,
            });
        }

        let rotation_coin = random.next_below(2);
        let rotated = rotation_coin == 0 && request.level < ROTATION_LEVEL_LIMIT;
        let colors = sample_color_pair(request.tier, random);
        let unusual = CellPosition::new(random.next_below(dimension), random.next_below(dimension));

        let capacity = usize::try_from(dimension * dimension).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        for row in 0..dimension {
            let mut shape = row_shape(request.level, random);
            for column in 0..dimension {
                if request.level > CELL_MIXING_LEVEL {
                    shape = cell_shape(request.level, random);
                }
                if !request.shapes.supports(shape) {
                    return Err(GenerationError::MissingShape { shape });
                }

                let position = CellPosition::new(column, row);
                let is_unusual = position == unusual;
                cells.push(Cell::new(
                    position,
                    shape,
                    is_unusual,
                    colors.color_for(is_unusual),
                    FieldPoint::new(column as f32 * pitch, row as f32 * pitch),
                ));
            }
        }

        log::debug!(
            "generated {dimension}x{dimension} field for level {} (rotated: {rotated})",
            request.level
        );

        Ok(Field::new(
            dimension,
            pitch,
            pitch - self.margin,
            colors,
            rotated,
            unusual,
            cells,
        ))
    }
}

/// Resolves the grid dimension for a level.
///
/// Up to [`LINEAR_DIMENSION_LIMIT`] the level is the dimension; beyond it a
/// fresh value in `RANDOM_DIMENSION_MIN..=RANDOM_DIMENSION_MAX` is drawn.
pub fn dimension_for_level(level: u32, random: &mut dyn RandomSource) -> u32 {
    if level > LINEAR_DIMENSION_LIMIT {
        RANDOM_DIMENSION_MIN + random.next_below(RANDOM_DIMENSION_MAX - RANDOM_DIMENSION_MIN + 1)
    } else {
        level
    }
}

fn row_shape(level: u32, random: &mut dyn RandomSource) -> ShapeType {
    let heads = random.next_below(2) == 1;
    if heads && level > ROW_MIXING_LEVEL {
        ShapeType::Circle
    } else {
        ShapeType::Rounded
    }
}

fn cell_shape(level: u32, random: &mut dyn RandomSource) -> ShapeType {
    if level < POLYGON_LEVEL {
        if random.next_below(2) == 0 {
            ShapeType::Rounded
        } else {
            ShapeType::Circle
        }
    } else {
        match random.next_below(3) {
            0 => ShapeType::Rounded,
            1 => ShapeType::Circle,
            _ => ShapeType::Polygon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: f32 = 600.0;

    fn request(level: u32) -> FieldRequest {
        FieldRequest::new(level, EXTENT, DifficultyTier::Medium, ShapeSet::all())
    }

    fn shapes_by_row(field: &Field) -> Vec<Vec<ShapeType>> {
        field
            .cells()
            .chunks(field.dimension() as usize)
            .map(|row| row.iter().map(Cell::shape).collect())
            .collect()
    }

    #[test]
    fn level_two_on_hard_lays_out_scripted_grid() {
        let generator = FieldLayoutGenerator::new();
        let mut random = ScriptedSource::new([1, 90, 5, 1, 0, 0, 1]);
        let request = FieldRequest::new(2, 200.0, DifficultyTier::Hard, ShapeSet::all());

        let field = generator.generate(request, &mut random).expect("valid request");

        assert_eq!(field.dimension(), 2);
        assert_eq!(field.cells().len(), 4);
        assert!(!field.is_rotated());
        assert_eq!(field.unusual_position(), CellPosition::new(1, 0));
        assert_eq!(field.cell_pitch(), 100.0);
        assert_eq!(field.cell_extent(), 90.0);
        assert_eq!(field.colors().usual().hue(), 90.0);
        assert!((field.colors().usual().saturation() - 0.70).abs() < 1e-6);
        assert_eq!(field.colors().unusual().brightness(), 0.9);

        let unusual: Vec<_> = field.cells().iter().filter(|cell| cell.is_unusual()).collect();
        assert_eq!(unusual.len(), 1);
        assert_eq!(unusual[0].position(), CellPosition::new(1, 0));
        assert_eq!(unusual[0].color(), field.colors().unusual());
        assert!(field
            .cells()
            .iter()
            .all(|cell| cell.shape() == ShapeType::Rounded));
        assert_eq!(random.remaining(), 0);
    }

    #[test]
    fn cells_are_laid_out_in_raster_order() {
        let generator = FieldLayoutGenerator::new();
        let mut random = ScriptedSource::new([]);

        let field = generator.generate(request(3), &mut random).expect("valid request");

        for (index, cell) in field.cells().iter().enumerate() {
            let column = (index % 3) as u32;
            let row = (index / 3) as u32;
            assert_eq!(cell.position(), CellPosition::new(column, row));
            assert_eq!(cell.origin(), FieldPoint::new(column as f32 * 200.0, row as f32 * 200.0));
        }
    }

    #[test]
    fn dimension_tracks_level_up_to_eight() {
        let generator = FieldLayoutGenerator::new();
        let mut random = ChaChaSource::new(7);

        for level in 2..=LINEAR_DIMENSION_LIMIT {
            let field = generator.generate(request(level), &mut random).expect("valid");
            assert_eq!(field.dimension(), level);
        }
    }

    #[test]
    fn dimension_is_rerolled_beyond_eight() {
        let generator = FieldLayoutGenerator::new();
        let mut random = ScriptedSource::new([3]);

        let field = generator.generate(request(9), &mut random).expect("valid");

        assert_eq!(field.dimension(), 8);
        let mut random = ScriptedSource::new([0]);
        let field = generator.generate(request(40), &mut random).expect("valid");
        assert_eq!(field.dimension(), 5);
    }

    #[test]
    fn rows_share_one_draw_between_levels_eleven_and_twenty() {
        let generator = FieldLayoutGenerator::new();
        // dimension 5, no rotation, hue, saturation, unusual (0, 0), row coins
        let mut random = ScriptedSource::new([0, 1, 0, 0, 0, 0, 1, 0, 1, 1, 0]);

        let field = generator.generate(request(15), &mut random).expect("valid");

        let rows = shapes_by_row(&field);
        let expected_rows = [
            ShapeType::Circle,
            ShapeType::Rounded,
            ShapeType::Circle,
            ShapeType::Circle,
            ShapeType::Rounded,
        ];
        for (row, expected) in rows.iter().zip(expected_rows) {
            assert!(row.iter().all(|shape| *shape == expected));
        }
    }

    #[test]
    fn row_coin_is_ignored_up_to_level_ten() {
        let generator = FieldLayoutGenerator::new();
        // dimension 5, rotation, hue, saturation, unusual, heads on every row
        let mut random = ScriptedSource::new([0, 1, 0, 0, 0, 0, 1, 1, 1, 1, 1]);

        let field = generator.generate(request(10), &mut random).expect("valid");

        assert!(field
            .cells()
            .iter()
            .all(|cell| cell.shape() == ShapeType::Rounded));
    }

    #[test]
    fn cells_reroll_individually_above_level_twenty() {
        let generator = FieldLayoutGenerator::new();
        let mut draws = vec![0, 1, 0, 0, 0, 0];
        for _ in 0..5 {
            draws.push(1);
            draws.extend([0, 1, 0, 1, 0]);
        }
        let mut random = ScriptedSource::new(draws);

        let field = generator.generate(request(25), &mut random).expect("valid");

        let rows = shapes_by_row(&field);
        for row in rows {
            assert_eq!(
                row,
                vec![
                    ShapeType::Rounded,
                    ShapeType::Circle,
                    ShapeType::Rounded,
                    ShapeType::Circle,
                    ShapeType::Rounded,
                ]
            );
        }
        assert_eq!(random.remaining(), 0);
    }

    #[test]
    fn polygons_join_the_mix_from_level_thirty() {
        let generator = FieldLayoutGenerator::new();
        let mut draws = vec![0, 1, 0, 0, 0, 0];
        for _ in 0..5 {
            draws.push(0);
            draws.extend([2, 1, 0, 2, 2]);
        }
        let mut random = ScriptedSource::new(draws);

        let field = generator.generate(request(35), &mut random).expect("valid");

        let rows = shapes_by_row(&field);
        assert_eq!(
            rows[0],
            vec![
                ShapeType::Polygon,
                ShapeType::Circle,
                ShapeType::Rounded,
                ShapeType::Polygon,
                ShapeType::Polygon,
            ]
        );
    }

    #[test]
    fn rotation_stops_at_level_twenty_one() {
        let generator = FieldLayoutGenerator::new();

        let mut random = ScriptedSource::new([0, 0]);
        let field = generator.generate(request(20), &mut random).expect("valid");
        assert!(field.is_rotated());

        let mut random = ScriptedSource::new([0, 0]);
        let field = generator.generate(request(21), &mut random).expect("valid");
        assert!(!field.is_rotated());
    }

    #[test]
    fn non_positive_extent_is_rejected() {
        let generator = FieldLayoutGenerator::new();
        let mut random = ScriptedSource::new([]);

        for extent in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            let request = FieldRequest::new(2, extent, DifficultyTier::Easy, ShapeSet::all());
            assert!(matches!(
                generator.generate(request, &mut random),
                Err(GenerationError::InvalidExtent { .. })
            ));
        }
    }

    #[test]
    fn cells_without_room_for_the_gutter_are_rejected() {
        let generator = FieldLayoutGenerator::new();
        let mut random = ScriptedSource::new([]);
        let request = FieldRequest::new(4, 40.0, DifficultyTier::Easy, ShapeSet::all());

        let error = generator.generate(request, &mut random).expect_err("pitch of 10");

        assert_eq!(
            error,
            GenerationError::CellTooSmall {
                pitch: 10.0,
                margin: CELL_MARGIN,
            }
        );
    }

    #[test]
    fn custom_margin_shrinks_cells_and_raises_the_size_floor() {
        let generator = FieldLayoutGenerator::with_margin(25.0);
        assert_eq!(generator.margin(), 25.0);
        assert_eq!(FieldLayoutGenerator::new().margin(), CELL_MARGIN);

        let mut random = ScriptedSource::new([]);
        let request = FieldRequest::new(4, 200.0, DifficultyTier::Easy, ShapeSet::all());
        let field = generator.generate(request, &mut random).expect("pitch of 50");
        assert_eq!(field.cell_pitch(), 50.0);
        assert_eq!(field.cell_extent(), 25.0);

        let request = FieldRequest::new(4, 100.0, DifficultyTier::Easy, ShapeSet::all());
        assert_eq!(
            generator.generate(request, &mut random),
            Err(GenerationError::CellTooSmall {
                pitch: 25.0,
                margin: 25.0,
            })
        );
    }

    #[test]
    fn level_zero_is_rejected() {
        let generator = FieldLayoutGenerator::new();
        let mut random = ScriptedSource::new([]);

        assert_eq!(
            generator.generate(request(0), &mut random),
            Err(GenerationError::EmptyField { level: 0 })
        );
    }

    #[test]
    fn unrenderable_shape_aborts_generation() {
        let generator = FieldLayoutGenerator::new();
        let mut random = ScriptedSource::new([0, 1, 0, 0, 0, 0, 0, 1]);
        let request = FieldRequest::new(15, EXTENT, DifficultyTier::Medium, ShapeSet::ROUNDED);

        let error = generator.generate(request, &mut random).expect_err("circle row");

        assert_eq!(
            error,
            GenerationError::MissingShape {
                shape: ShapeType::Circle
            }
        );
    }
}
