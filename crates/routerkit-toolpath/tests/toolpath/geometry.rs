use proptest::prelude::*;
use routerkit_core::{GeometryConfig, GeometryError};
use routerkit_toolpath::geometry::{arc_to_points, bulge_to_arc, Arc, Path, Point2};
use std::f64::consts::PI;

fn rectangle(w: f64, h: f64) -> Path {
    Path::new(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(w, 0.0),
            Point2::new(w, h),
            Point2::new(0.0, h),
        ],
        true,
    )
}

fn ring(points: &[(f64, f64)]) -> Path {
    Path::new(points.iter().map(|&(x, y)| Point2::new(x, y)).collect(), true)
}

/// Counter-clockwise U with a 2 wide slot down to y = 2
fn slotted() -> Path {
    ring(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (6.0, 10.0),
        (6.0, 2.0),
        (4.0, 2.0),
        (4.0, 10.0),
        (0.0, 10.0),
    ])
}

/// Two 10 x 10 lobes joined by a 1 wide neck
fn dumbbell() -> Path {
    ring(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 4.5),
        (11.0, 4.5),
        (11.0, 0.0),
        (21.0, 0.0),
        (21.0, 10.0),
        (11.0, 10.0),
        (11.0, 5.5),
        (10.0, 5.5),
        (10.0, 10.0),
        (0.0, 10.0),
    ])
}

#[test]
fn test_miter_offset_closes_narrow_slot() {
    let config = GeometryConfig::default();
    let grown = slotted().offset(1.5, false, &config).unwrap();
    let bounds = grown.bounds().unwrap();
    assert!(bounds.position.is_equal_approx(Point2::new(-1.5, -1.5)));
    assert!(bounds.size.is_equal_approx(Point2::new(13.0, 13.0)));
    assert!((grown.signed_area() - 169.0).abs() < 1e-6);
    // Nothing is left of the slot walls
    for p in grown.points() {
        let on_edge = (p.x + 1.5).abs() < 1e-6
            || (p.x - 11.5).abs() < 1e-6
            || (p.y + 1.5).abs() < 1e-6
            || (p.y - 11.5).abs() < 1e-6;
        assert!(on_edge, "{:?} is inside the grown ring", p);
    }
}

#[test]
fn test_rolling_offset_closes_narrow_slot() {
    let config = GeometryConfig::default();
    let grown = slotted().offset(1.5, true, &config).unwrap();
    let area = grown.signed_area();
    assert!(area > 166.0 && area < 169.0, "area {}", area);
    assert!(grown.points().iter().all(|p| p.y < 3.0 || p.y > 11.0 || p.x < 0.0 || p.x > 10.0));
}

#[test]
fn test_miter_offset_keeps_slot_wider_than_offset() {
    let config = GeometryConfig::default();
    let grown = slotted().offset(0.5, false, &config).unwrap();
    // 11 x 11 minus what is left of the slot, 1 wide and 8 deep
    assert!((grown.signed_area() - (121.0 - 8.0)).abs() < 1e-6);
}

#[test]
fn test_offset_all_keeps_both_lobes() {
    let config = GeometryConfig::default();
    for rolling in [false, true] {
        let loops = dumbbell().offset_all(-1.0, rolling, &config).unwrap();
        assert_eq!(loops.len(), 2);
        let mut lefts: Vec<f64> = loops.iter().map(|l| l.bounds().unwrap().position.x).collect();
        lefts.sort_by(f64::total_cmp);
        assert!((lefts[0] - 1.0).abs() < 1e-6);
        // Rounded lobes bulge a little towards the pinched neck
        assert!(lefts[1] > 11.8 && lefts[1] < 12.0 + 1e-6);
        for lobe in &loops {
            assert!(lobe.signed_area() > 63.9);
        }
    }

    // Mitred lobes are plain squares
    let loops = dumbbell().offset_all(-1.0, false, &config).unwrap();
    for lobe in &loops {
        assert!((lobe.signed_area() - 64.0).abs() < 1e-6);
    }

    // The single-path form keeps one of them
    let single = dumbbell().offset(-1.0, true, &config).unwrap();
    assert!((single.signed_area() - loops[0].signed_area()).abs() < 0.5);
}

#[test]
fn test_offset_round_trip_restores_square() {
    let config = GeometryConfig::default();
    let grown = rectangle(10.0, 10.0).offset(1.5, false, &config).unwrap();
    let restored = grown.offset(-1.5, false, &config).unwrap();
    let bounds = restored.bounds().unwrap();
    assert!(bounds.position.is_equal_approx(Point2::ZERO));
    assert!(bounds.size.is_equal_approx(Point2::new(10.0, 10.0)));
}

#[test]
fn test_walk_reaches_requested_distance() {
    let square = rectangle(10.0, 10.0);
    let waypoints: Vec<_> = square.walk(Point2::new(5.0, -1.0), 12.0).collect();
    let last = waypoints.last().unwrap();
    assert!((last.distance - 17.0).abs() < 1e-9);
    assert!(last.position.is_equal_approx(Point2::new(10.0, 7.0)));
    assert!(waypoints.iter().any(|w| w.index == Some(1)));
}

proptest! {
    #[test]
    fn prop_fit_recovers_sampled_arc(
        cx in -100.0..100.0f64,
        cy in -100.0..100.0f64,
        radius in 1.0..100.0f64,
        start in -PI..PI,
        sweep in 1.0..3.0f64,
        clockwise in any::<bool>(),
    ) {
        let sweep = if clockwise { -sweep } else { sweep };
        let center = Point2::new(cx, cy);
        let points = arc_to_points(center, radius, start, start + sweep, 0.01).unwrap();

        let mut arc = Arc::over(0..points.len());
        arc.fit(&points, 1e-9).unwrap();
        prop_assert!((arc.radius - radius).abs() < radius * 1e-3);
        prop_assert!(arc.position.distance_to(center) < radius * 1e-2);
        prop_assert_eq!(arc.is_clockwise(), clockwise);
        prop_assert!((arc.sweep() - sweep).abs() < 1e-2);
    }

    #[test]
    fn prop_collinear_points_do_not_fit(
        x in -100.0..100.0f64,
        y in -100.0..100.0f64,
        angle in -PI..PI,
        step in 0.5..5.0f64,
        count in 3usize..12,
    ) {
        let origin = Point2::new(x, y);
        let direction = Point2::from_angle(angle) * step;
        let points: Vec<Point2> = (0..count).map(|i| origin + direction * i as f64).collect();

        let mut arc = Arc::over(0..count);
        let result = arc.fit(&points, GeometryConfig::default().degenerate_epsilon);
        let is_degenerate = matches!(result, Err(GeometryError::DegenerateArc { .. }));
        prop_assert!(is_degenerate);
        prop_assert_eq!(arc.radius, 0.0);
        prop_assert!(!arc.is_valid());
    }

    #[test]
    fn prop_bulge_arc_survives_sampling(
        x in -50.0..50.0f64,
        y in -50.0..50.0f64,
        chord in 1.0..50.0f64,
        angle in -PI..PI,
        bulge in prop_oneof![0.2..1.0f64, -1.0..-0.2f64],
    ) {
        let start = Point2::new(x, y);
        let end = start + Point2::from_angle(angle) * chord;
        let arc = bulge_to_arc(start, end, bulge, 1e-7).unwrap();
        prop_assert!(arc.start_point().distance_to(start) < 1e-6);
        prop_assert!(arc.end_point().distance_to(end) < 1e-6);
        prop_assert_eq!(arc.is_clockwise(), bulge < 0.0);

        let points = arc.to_points(0.01).unwrap();
        let mut refit = Arc::over(0..points.len());
        refit.fit(&points, 1e-9).unwrap();
        prop_assert!((refit.radius - arc.radius).abs() < arc.radius * 1e-3);
        prop_assert_eq!(refit.is_clockwise(), arc.is_clockwise());
    }

    #[test]
    fn prop_miter_offset_is_reversible(
        w in 5.0..50.0f64,
        h in 5.0..50.0f64,
        delta in 0.1..2.0f64,
    ) {
        let config = GeometryConfig::default();
        let grown = rectangle(w, h).offset(delta, false, &config).unwrap();
        let bounds = grown.bounds().unwrap();
        prop_assert!(bounds.position.is_equal_approx(Point2::new(-delta, -delta)));
        prop_assert!(bounds.size.is_equal_approx(Point2::new(w + 2.0 * delta, h + 2.0 * delta)));

        let restored = grown.offset(-delta, false, &config).unwrap().bounds().unwrap();
        prop_assert!(restored.position.is_equal_approx(Point2::ZERO));
        prop_assert!(restored.size.is_equal_approx(Point2::new(w, h)));
    }
}
