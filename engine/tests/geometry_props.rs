use std::collections::BTreeSet;
use std::ops::Range;

use inkpad_engine::editors::{rotate_selected_paths, translate_selected_paths};
use inkpad_engine::eraser::{erase_paths_near, erase_partial_paths_near};
use inkpad_engine::geometry::point_in_polygon;
use inkpad_engine::lasso::select_enclosed;
use inkpad_engine::{PathRecord, Point};
use proptest::prelude::*;

fn paths_strategy(
    range: Range<f64>,
    min_points: usize,
) -> impl Strategy<Value = Vec<PathRecord>> {
    let point = (range.clone(), range).prop_map(|(x, y)| Point::new(x, y));
    let path = prop::collection::vec(point, min_points..6).prop_map(PathRecord::from_points);
    prop::collection::vec(path, 0..6)
}

fn all_indices(paths: &[PathRecord]) -> BTreeSet<usize> {
    (0..paths.len()).collect()
}

fn assert_paths_close(a: &[PathRecord], b: &[PathRecord]) -> Result<(), TestCaseError> {
    prop_assert_eq!(a.len(), b.len());
    for (left, right) in a.iter().zip(b) {
        prop_assert_eq!(left.points().len(), right.points().len());
        for (p, q) in left.points().iter().zip(right.points()) {
            prop_assert!((p.x - q.x).abs() < 1e-6, "{:?} vs {:?}", p, q);
            prop_assert!((p.y - q.y).abs() < 1e-6, "{:?} vs {:?}", p, q);
        }
    }
    Ok(())
}

fn square() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(0.0, 100.0),
        Point::new(0.0, 0.0),
    ]
}

proptest! {
    #[test]
    fn translate_then_back_is_identity(
        paths in paths_strategy(-1000.0..1000.0, 0),
        dx in -500.0f64..500.0,
        dy in -500.0f64..500.0,
    ) {
        let indices = all_indices(&paths);
        let there = translate_selected_paths(&paths, &indices, dx, dy);
        let back = translate_selected_paths(&there, &indices, -dx, -dy);
        assert_paths_close(&back, &paths)?;
    }

    #[test]
    fn rotations_compose(
        paths in paths_strategy(-1000.0..1000.0, 0),
        cx in -100.0f64..100.0,
        cy in -100.0f64..100.0,
        first in -360.0f64..360.0,
        second in -360.0f64..360.0,
    ) {
        let indices = all_indices(&paths);
        let center = Point::new(cx, cy);
        let stepped = rotate_selected_paths(
            &rotate_selected_paths(&paths, &indices, center, first),
            &indices,
            center,
            second,
        );
        let direct = rotate_selected_paths(&paths, &indices, center, first + second);
        assert_paths_close(&stepped, &direct)?;
    }

    #[test]
    fn distant_area_erase_changes_nothing(
        paths in paths_strategy(-100.0..100.0, 1),
        radius in 0.5f64..50.0,
    ) {
        prop_assert!(erase_partial_paths_near(&paths, 1000.0, 1000.0, radius).is_none());
    }

    #[test]
    fn area_erase_leaves_nothing_inside_the_disc(
        paths in paths_strategy(-100.0..100.0, 0),
        px in -100.0f64..100.0,
        py in -100.0f64..100.0,
        radius in 1.0f64..40.0,
    ) {
        let Some(kept) = erase_partial_paths_near(&paths, px, py, radius) else {
            return Ok(());
        };
        let center = Point::new(px, py);
        for path in kept.iter().filter(|path| path.points().len() > 1) {
            for point in path.points() {
                prop_assert!(point.dist_sq(center).sqrt() >= radius - 1e-6);
            }
        }
    }

    #[test]
    fn segment_through_center_splits_in_two(
        cx in -100.0f64..100.0,
        cy in -100.0f64..100.0,
        angle in 0.0f64..std::f64::consts::TAU,
        radius in 1.0f64..20.0,
        before in 0.5f64..50.0,
        after in 0.5f64..50.0,
    ) {
        let (sin, cos) = angle.sin_cos();
        let start = Point::new(cx - cos * (radius + before), cy - sin * (radius + before));
        let end = Point::new(cx + cos * (radius + after), cy + sin * (radius + after));
        let paths = vec![PathRecord::from_points(vec![start, end])];
        let kept = erase_partial_paths_near(&paths, cx, cy, radius).expect("segment is hit");
        prop_assert_eq!(kept.len(), 2);
        prop_assert!(kept.iter().all(|path| path.points().len() >= 2));
    }

    #[test]
    fn stroke_erase_is_idempotent(
        paths in paths_strategy(-100.0..100.0, 0),
        px in -100.0f64..100.0,
        py in -100.0f64..100.0,
        threshold in 0.5f64..30.0,
    ) {
        let once = erase_paths_near(&paths, px, py, threshold).unwrap_or_else(|| paths.clone());
        prop_assert!(erase_paths_near(&once, px, py, threshold).is_none());
    }

    #[test]
    fn lasso_takes_exactly_the_enclosed_paths(paths in paths_strategy(-50.0..150.0, 0)) {
        let polygon = square();
        let expected: BTreeSet<usize> = paths
            .iter()
            .enumerate()
            .filter(|(_, path)| {
                !path.points().is_empty()
                    && path
                        .points()
                        .iter()
                        .all(|point| point_in_polygon(point.x, point.y, &polygon))
            })
            .map(|(index, _)| index)
            .collect();
        let selected = select_enclosed(&paths, &polygon)
            .map(|selection| selection.indices)
            .unwrap_or_default();
        prop_assert_eq!(selected, expected);
    }
}
