use glam::Vec2;
use oddone_core::{
    Cell, CellPosition, ColorPair, Command, DifficultyTier, Event, Field, FieldPoint,
    GameOverReason, PresentationAction, ShapeType,
};
use oddone_presentation::{dispatch, FieldPresentation, Presenter};
use oddone_session::{self as session, query, GameSession};

#[derive(Debug, Default)]
struct RecordingPresenter {
    log: Vec<String>,
}

impl Presenter for RecordingPresenter {
    fn level_updated(&mut self, level: u32) {
        self.log.push(format!("level {level}"));
    }

    fn score_updated(&mut self, score: u32, high_score: u32) {
        self.log.push(format!("score {score}/{high_score}"));
    }

    fn time_updated(&mut self, time: f64, max_time: f64) {
        self.log.push(format!("time {time}/{max_time}"));
    }

    fn field_generated(&mut self, field: &Field) {
        self.log.push(format!("field {}", field.dimension()));
    }

    fn presentation_action_requested(&mut self, action: PresentationAction) {
        self.log.push(format!("action {action:?}"));
    }

    fn field_cleared(&mut self) {
        self.log.push("cleared".to_owned());
    }

    fn game_over(&mut self, reason: GameOverReason, score: u32, high_score: u32) {
        self.log
            .push(format!("game over {reason:?} {score}/{high_score}"));
    }
}

#[derive(Debug, Default)]
struct SilentPresenter;

impl Presenter for SilentPresenter {}

fn field(dimension: u32, pitch: f32, extent: f32, rotated: bool) -> Field {
    let colors = ColorPair::new(120.0, 0.7, DifficultyTier::Medium);
    let unusual = CellPosition::new(0, 0);
    let cells = (0..dimension)
        .flat_map(|row| (0..dimension).map(move |column| CellPosition::new(column, row)))
        .map(|position| {
            let is_unusual = position == unusual;
            Cell::new(
                position,
                ShapeType::Rounded,
                is_unusual,
                colors.color_for(is_unusual),
                FieldPoint::new(
                    position.column() as f32 * pitch,
                    position.row() as f32 * pitch,
                ),
            )
        })
        .collect();
    Field::new(dimension, pitch, extent, colors, rotated, unusual, cells)
}

#[test]
fn dispatch_forwards_session_events_in_order() {
    let mut session = GameSession::new();
    let mut events = Vec::new();
    session::apply(&mut session, Command::Start, &mut events);
    events.retain(|event| *event != Event::RotationRequested);
    let dimension = query::field(&session).expect("game is running").dimension();

    let mut presenter = RecordingPresenter::default();
    dispatch(&mut presenter, &events);

    assert_eq!(
        presenter.log,
        vec![
            "level 2".to_owned(),
            "score 0/0".to_owned(),
            "time 15/15".to_owned(),
            format!("field {dimension}"),
            "action StartTimer { interval: 10ms }".to_owned(),
            "action LoopSound { sound: Music }".to_owned(),
        ]
    );
}

#[test]
fn dispatch_reports_game_over_after_clearing_the_field() {
    let mut session = GameSession::new();
    let mut events = Vec::new();
    session::apply(&mut session, Command::Start, &mut events);
    events.clear();
    session::apply(&mut session, Command::Stop, &mut events);

    let mut presenter = RecordingPresenter::default();
    dispatch(&mut presenter, &events);

    assert_eq!(
        presenter.log,
        vec![
            "action StopAllActions".to_owned(),
            "cleared".to_owned(),
            "game over Stopped 0/0".to_owned(),
        ]
    );
}

#[test]
fn presenters_may_ignore_every_notification() {
    let mut session = GameSession::new();
    let mut events = Vec::new();
    session::apply(&mut session, Command::Start, &mut events);

    let mut presenter = SilentPresenter;
    dispatch(&mut presenter, &events);
    let boxed: &mut dyn Presenter = &mut presenter;
    dispatch(boxed, &events);
}

#[test]
fn hit_test_maps_points_to_cells() {
    let presentation = FieldPresentation::new(&field(3, 100.0, 90.0, false));

    assert_eq!(
        presentation.cell_at(Vec2::new(5.0, 5.0)),
        Some(CellPosition::new(0, 0))
    );
    assert_eq!(
        presentation.cell_at(Vec2::new(250.0, 120.0)),
        Some(CellPosition::new(2, 1))
    );
    assert_eq!(presentation.cell_at(Vec2::new(95.0, 50.0)), None, "gutter");
    assert_eq!(presentation.cell_at(Vec2::new(-1.0, 50.0)), None);
    assert_eq!(presentation.cell_at(Vec2::new(50.0, 300.0)), None);
}

#[test]
fn hit_test_honours_half_turn_rotation() {
    let presentation = FieldPresentation::new(&field(3, 100.0, 90.0, true));

    assert_eq!(
        presentation.cell_at(Vec2::new(295.0, 295.0)),
        Some(CellPosition::new(0, 0))
    );
    assert_eq!(
        presentation.cell_at(Vec2::new(50.0, 150.0)),
        Some(CellPosition::new(2, 1))
    );
    assert_eq!(presentation.cell_at(Vec2::new(205.0, 205.0)), None, "gutter");
}

#[test]
fn cell_origins_round_trip_through_hit_testing() {
    for rotated in [false, true] {
        let presentation = FieldPresentation::new(&field(4, 50.0, 40.0, rotated));
        for row in 0..4 {
            for column in 0..4 {
                let position = CellPosition::new(column, row);
                let origin = presentation.cell_origin(position).expect("inside grid");
                let centre = origin + Vec2::splat(20.0);
                assert_eq!(presentation.cell_at(centre), Some(position));
            }
        }
        assert_eq!(presentation.cell_origin(CellPosition::new(4, 0)), None);
    }
}
