use azul::gesture::{GestureRecorder, Mode, RECT_PADDING_MIN, RECT_PADDING_SIZE, StrokeStyle};
use egui::Pos2;

fn recorder(mode: Mode) -> GestureRecorder {
    let mut rec = GestureRecorder::new();
    rec.set_mode(mode);
    rec
}

#[test]
fn derived_rect_follows_the_padding_formula() {
    let points = [
        Pos2::new(37.0, 81.0),
        Pos2::new(12.5, 40.0),
        Pos2::new(90.0, 60.0),
        Pos2::new(55.0, 110.0),
    ];
    let mut rec = recorder(Mode::Cropping);
    rec.begin(points[0]);
    for p in &points[1..] {
        rec.motion(*p);
    }
    let outcome = rec.end(points[3]).unwrap();

    let (min_x, max_x) = (12.5, 90.0);
    let (min_y, max_y) = (40.0, 110.0);
    assert_eq!(outcome.rect.min.x, min_x - RECT_PADDING_MIN);
    assert_eq!(outcome.rect.min.y, min_y - RECT_PADDING_MIN);
    assert_eq!(outcome.rect.width(), (max_x - min_x) + RECT_PADDING_SIZE);
    assert_eq!(outcome.rect.height(), (max_y - min_y) + RECT_PADDING_SIZE);
    // Equivalent corner form: min-10 to max+15.
    assert_eq!(outcome.rect.max.x, max_x + 15.0);
    assert_eq!(outcome.rect.max.y, max_y + 15.0);
}

#[test]
fn worked_example_from_the_formula() {
    // (10,10) -> (50,10) -> (50,60): extrema x in [10,50], y in [10,60].
    let mut rec = recorder(Mode::Outlining);
    rec.begin(Pos2::new(10.0, 10.0));
    rec.motion(Pos2::new(50.0, 10.0));
    rec.motion(Pos2::new(50.0, 60.0));
    let outcome = rec.end(Pos2::new(50.0, 60.0)).unwrap();
    assert_eq!(outcome.rect.min, Pos2::new(0.0, 0.0));
    assert_eq!(outcome.rect.width(), 65.0);
    assert_eq!(outcome.rect.height(), 75.0);
    assert!(outcome.merge);
}

#[test]
fn degenerate_tap_still_yields_a_rect() {
    let mut rec = recorder(Mode::Cropping);
    rec.begin(Pos2::new(100.0, 200.0));
    let outcome = rec.end(Pos2::new(100.0, 200.0)).unwrap();
    assert_eq!(outcome.rect.min, Pos2::new(90.0, 190.0));
    assert_eq!(outcome.rect.width(), RECT_PADDING_SIZE);
    assert_eq!(outcome.rect.height(), RECT_PADDING_SIZE);
    assert!(!outcome.merge);
    // The closing segment was still drawn.
    assert!(!rec.overlay().is_empty());
}

#[test]
fn overlay_is_empty_immediately_after_begin() {
    let mut rec = recorder(Mode::Outlining);
    rec.begin(Pos2::new(0.0, 0.0));
    rec.motion(Pos2::new(10.0, 10.0));
    rec.motion(Pos2::new(20.0, 5.0));
    rec.end(Pos2::new(20.0, 5.0));
    assert!(!rec.overlay().is_empty());

    rec.begin(Pos2::new(50.0, 50.0));
    assert!(rec.overlay().is_empty());
}

#[test]
fn extrema_reset_between_gestures() {
    let mut rec = recorder(Mode::Cropping);
    rec.begin(Pos2::new(0.0, 0.0));
    rec.motion(Pos2::new(500.0, 500.0));
    rec.end(Pos2::new(500.0, 500.0));

    rec.begin(Pos2::new(100.0, 100.0));
    let outcome = rec.end(Pos2::new(110.0, 110.0)).unwrap();
    // The first gesture's 500s must not leak into the new extrema.
    assert_eq!(outcome.rect.max.x, 110.0 + 15.0);
    assert_eq!(outcome.rect.min.x, 100.0 - 10.0);
}

#[test]
fn modes_are_mutually_exclusive() {
    let mut rec = GestureRecorder::new();
    for target in [
        Mode::Cropping,
        Mode::Outlining,
        Mode::Cropping,
        Mode::Idle,
        Mode::Outlining,
    ] {
        rec.set_mode(target);
        let cropping = rec.mode() == Mode::Cropping;
        let outlining = rec.mode() == Mode::Outlining;
        assert!(!(cropping && outlining));
    }
}

#[test]
fn segments_carry_the_mode_style() {
    let mut rec = recorder(Mode::Cropping);
    rec.begin(Pos2::new(0.0, 0.0));
    let segment = rec.motion(Pos2::new(5.0, 5.0)).unwrap();
    assert_eq!(segment.style, StrokeStyle::CROP);

    let mut rec = recorder(Mode::Outlining);
    rec.begin(Pos2::new(0.0, 0.0));
    let segment = rec.motion(Pos2::new(5.0, 5.0)).unwrap();
    assert_eq!(segment.style, StrokeStyle::OUTLINE);
}

#[test]
fn merge_is_requested_only_in_outline_mode() {
    let mut rec = recorder(Mode::Cropping);
    rec.begin(Pos2::new(0.0, 0.0));
    assert!(!rec.end(Pos2::new(5.0, 5.0)).unwrap().merge);

    let mut rec = recorder(Mode::Outlining);
    rec.begin(Pos2::new(0.0, 0.0));
    assert!(rec.end(Pos2::new(5.0, 5.0)).unwrap().merge);
}
