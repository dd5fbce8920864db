//! Whole-stroke and area erasing.
//!
//! Both return `None` when nothing under the brush changed so the caller can
//! skip rewriting the surface.

use inkpad_shared::{PathRecord, Point};

use crate::geometry::{dist_point_to_seg_sq, line_circle_intersections};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EraserKind {
    /// Remove any path the brush touches.
    Stroke,
    /// Clip paths against the brush disc.
    Area,
}

/// Removes every path with a segment within `threshold` of `(px, py)`.
///
/// Single-point paths are hit when the point itself is within `threshold`.
pub fn erase_paths_near(
    paths: &[PathRecord],
    px: f64,
    py: f64,
    threshold: f64,
) -> Option<Vec<PathRecord>> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return None;
    }
    let threshold_sq = threshold * threshold;
    let mut hit = vec![false; paths.len()];
    let mut any = false;
    for index in (0..paths.len()).rev() {
        if path_touches(paths[index].points(), px, py, threshold_sq) {
            hit[index] = true;
            any = true;
        }
    }
    if !any {
        return None;
    }
    Some(
        paths
            .iter()
            .zip(hit)
            .filter(|(_, hit)| !hit)
            .map(|(path, _)| path.clone())
            .collect(),
    )
}

fn path_touches(points: &[Point], px: f64, py: f64, threshold_sq: f64) -> bool {
    if let [only] = points {
        return only.dist_sq(Point::new(px, py)) <= threshold_sq;
    }
    points.windows(2).any(|pair| {
        dist_point_to_seg_sq(pair[0].x, pair[0].y, pair[1].x, pair[1].y, px, py) <= threshold_sq
    })
}

/// Clips every path against the disc at `(px, py)` with `radius`.
///
/// Each input path yields zero, one, or several surviving sub-paths made of
/// the pieces outside the disc. Paths without points are dropped. A one-point
/// path is dropped only if the point lies inside the disc.
pub fn erase_partial_paths_near(
    paths: &[PathRecord],
    px: f64,
    py: f64,
    radius: f64,
) -> Option<Vec<PathRecord>> {
    if !radius.is_finite() || radius <= 0.0 {
        return None;
    }
    let center = Point::new(px, py);
    let mut changed = false;
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        match clip_path(path.points(), center, radius) {
            Clip::Untouched => out.push(path.clone()),
            Clip::Pieces(pieces) => {
                changed = true;
                out.extend(pieces.into_iter().map(|points| path.with_points(points)));
            }
        }
    }
    if changed {
        Some(out)
    } else {
        None
    }
}

enum Clip {
    Untouched,
    Pieces(Vec<Vec<Point>>),
}

fn clip_path(points: &[Point], center: Point, radius: f64) -> Clip {
    let r_sq = radius * radius;
    let inside = |point: Point| point.dist_sq(center) <= r_sq;
    match points {
        [] => return Clip::Pieces(Vec::new()),
        [only] => {
            if inside(*only) {
                return Clip::Pieces(Vec::new());
            }
            return Clip::Untouched;
        }
        _ => {}
    }

    let mut touched = false;
    let mut pieces = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let ts = line_circle_intersections(a.x, a.y, b.x, b.y, center.x, center.y, radius);
        if ts.is_empty() {
            if !inside(a) && !inside(b) {
                extend_chain(&mut current, a, b);
            } else {
                touched = true;
                flush(&mut current, &mut pieces);
            }
            continue;
        }

        touched = true;
        let mut breaks = Vec::with_capacity(ts.len() + 2);
        breaks.push(0.0);
        breaks.extend(ts);
        breaks.push(1.0);
        for span in breaks.windows(2) {
            let (t0, t1) = (span[0], span[1]);
            if t1 <= t0 {
                continue;
            }
            let mid = a.lerp(b, (t0 + t1) / 2.0);
            if inside(mid) {
                flush(&mut current, &mut pieces);
            } else {
                extend_chain(&mut current, a.lerp(b, t0), a.lerp(b, t1));
            }
        }
    }
    if !touched {
        return Clip::Untouched;
    }
    flush(&mut current, &mut pieces);
    Clip::Pieces(pieces)
}

/// Continues the outside chain with the piece `from..to`; `from` is only
/// written when it starts a new chain, otherwise it equals the chain's tail.
fn extend_chain(current: &mut Vec<Point>, from: Point, to: Point) {
    if current.is_empty() {
        current.push(from);
    }
    current.push(to);
}

fn flush(current: &mut Vec<Point>, pieces: &mut Vec<Vec<Point>>) {
    if current.len() >= 2 {
        pieces.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(points: &[(f64, f64)]) -> PathRecord {
        PathRecord::from_points(points.iter().map(|(x, y)| Point::new(*x, *y)).collect())
    }

    fn assert_close(actual: &[Point], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (point, (x, y)) in actual.iter().zip(expected) {
            assert!(
                (point.x - x).abs() < 1e-9 && (point.y - y).abs() < 1e-9,
                "{actual:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn stroke_erase_removes_touched_paths() {
        let paths = vec![
            path(&[(0.0, 0.0), (10.0, 0.0)]),
            path(&[(0.0, 50.0), (10.0, 50.0)]),
            path(&[(5.0, 3.0), (5.0, 20.0)]),
        ];
        let kept = erase_paths_near(&paths, 5.0, 1.0, 2.5).unwrap();
        assert_eq!(kept, vec![paths[1].clone()]);
    }

    #[test]
    fn stroke_erase_misses_return_none() {
        let paths = vec![path(&[(0.0, 0.0), (10.0, 0.0)])];
        assert!(erase_paths_near(&paths, 50.0, 50.0, 4.0).is_none());
        assert!(erase_paths_near(&paths, 5.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn stroke_erase_hits_dots() {
        let paths = vec![path(&[(3.0, 3.0)]), path(&[])];
        let kept = erase_paths_near(&paths, 4.0, 3.0, 2.0).unwrap();
        assert_eq!(kept, vec![paths[1].clone()]);
    }

    #[test]
    fn area_erase_splits_segment_in_two() {
        let paths = vec![path(&[(0.0, 0.0), (10.0, 0.0)])];
        let out = erase_partial_paths_near(&paths, 5.0, 0.0, 2.0).unwrap();
        assert_eq!(out.len(), 2);
        assert_close(out[0].points(), &[(0.0, 0.0), (3.0, 0.0)]);
        assert_close(out[1].points(), &[(7.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn area_erase_keeps_chain_across_vertices() {
        let paths = vec![path(&[(0.0, 0.0), (4.0, 0.0), (10.0, 0.0), (10.0, 10.0)])];
        let out = erase_partial_paths_near(&paths, 7.0, 0.0, 1.0).unwrap();
        assert_eq!(out.len(), 2);
        assert_close(out[0].points(), &[(0.0, 0.0), (4.0, 0.0), (6.0, 0.0)]);
        assert_close(out[1].points(), &[(8.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    }

    #[test]
    fn area_erase_trims_an_end() {
        let paths = vec![path(&[(0.0, 0.0), (10.0, 0.0)])];
        let out = erase_partial_paths_near(&paths, 10.0, 0.0, 4.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_close(out[0].points(), &[(0.0, 0.0), (6.0, 0.0)]);
    }

    #[test]
    fn area_erase_swallows_inner_path() {
        let paths = vec![
            path(&[(4.0, 0.0), (5.0, 0.5), (6.0, 0.0)]),
            path(&[(0.0, 40.0), (1.0, 40.0)]),
        ];
        let out = erase_partial_paths_near(&paths, 5.0, 0.0, 3.0).unwrap();
        assert_eq!(out, vec![paths[1].clone()]);
    }

    #[test]
    fn area_erase_far_away_is_none() {
        let paths = vec![
            path(&[(0.0, 0.0), (10.0, 0.0)]),
            path(&[(20.0, 20.0)]),
        ];
        assert!(erase_partial_paths_near(&paths, 100.0, 100.0, 5.0).is_none());
    }

    #[test]
    fn area_erase_dots_and_empty_paths() {
        let paths = vec![
            path(&[(1.0, 1.0)]),
            path(&[(30.0, 30.0)]),
            path(&[]),
        ];
        let out = erase_partial_paths_near(&paths, 0.0, 0.0, 2.0).unwrap();
        assert_eq!(out, vec![paths[1].clone()]);
    }

    #[test]
    fn area_erase_keeps_style() {
        let mut record = path(&[(0.0, 0.0), (10.0, 0.0)]);
        record.set_stroke_color("#123456");
        let out = erase_partial_paths_near(&[record], 5.0, 0.0, 2.0).unwrap();
        assert!(out.iter().all(|p| p.stroke_color() == Some("#123456")));
    }

    #[test]
    fn degenerate_radius_does_nothing() {
        let paths = vec![path(&[(0.0, 0.0), (10.0, 0.0)])];
        assert!(erase_partial_paths_near(&paths, 5.0, 0.0, 0.0).is_none());
        assert!(erase_partial_paths_near(&paths, 5.0, 0.0, f64::NAN).is_none());
    }
}
