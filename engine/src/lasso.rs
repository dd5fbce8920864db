use std::collections::BTreeSet;

use inkpad_shared::{BBox, Bounds, PathRecord, Point};

use crate::geometry::{point_in_polygon, polygon_area};

/// Indices into one export plus the box that encloses them.
///
/// Stale as soon as the path list changes; callers recompute or clear it.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub indices: BTreeSet<usize>,
    pub bbox: BBox,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Points traced while lassoing, kept exactly as they arrive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LassoPolygon {
    points: Vec<Point>,
}

impl LassoPolygon {
    pub fn start(point: Point) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Appends the first point, or `None` if fewer than three points were drawn.
    pub fn close(mut self) -> Option<Vec<Point>> {
        if self.points.len() < 3 {
            return None;
        }
        let first = self.points[0];
        self.points.push(first);
        Some(self.points)
    }
}

/// Paths whose every point lies inside `polygon`. Paths without points are
/// never selected.
pub fn select_enclosed(paths: &[PathRecord], polygon: &[Point]) -> Option<Selection> {
    let mut indices = BTreeSet::new();
    let mut bounds = Bounds::empty();
    for (index, path) in paths.iter().enumerate() {
        let points = path.points();
        if points.is_empty() {
            continue;
        }
        if !points
            .iter()
            .all(|point| point_in_polygon(point.x, point.y, polygon))
        {
            continue;
        }
        indices.insert(index);
        for point in points {
            bounds.include(*point);
        }
    }
    let bbox = bounds.to_bbox()?;
    Some(Selection { indices, bbox })
}

/// Closes the traced polygon and selects what it fully encloses.
///
/// Returns `None` when the gesture should leave the selection unchanged:
/// fewer than three points, or an enclosed area under `min_area`.
pub fn finalize_lasso(
    lasso: LassoPolygon,
    paths: &[PathRecord],
    min_area: f64,
) -> Option<LassoResult> {
    let polygon = lasso.close()?;
    if polygon_area(&polygon) < min_area {
        return None;
    }
    Some(LassoResult {
        selection: select_enclosed(paths, &polygon),
    })
}

/// Outcome of a usable lasso: `selection` is `None` when nothing was enclosed.
#[derive(Clone, Debug, PartialEq)]
pub struct LassoResult {
    pub selection: Option<Selection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(points: &[(f64, f64)]) -> PathRecord {
        PathRecord::from_points(points.iter().map(|(x, y)| Point::new(*x, *y)).collect())
    }

    fn square_lasso() -> LassoPolygon {
        let mut lasso = LassoPolygon::start(Point::new(0.0, 0.0));
        lasso.push(Point::new(10.0, 0.0));
        lasso.push(Point::new(10.0, 10.0));
        lasso.push(Point::new(0.0, 10.0));
        lasso
    }

    #[test]
    fn selects_only_fully_enclosed_paths() {
        let paths = vec![
            path(&[(2.0, 2.0), (8.0, 8.0)]),
            path(&[(5.0, 5.0), (15.0, 15.0)]),
        ];
        let result = finalize_lasso(square_lasso(), &paths, 1.0).unwrap();
        let selection = result.selection.unwrap();
        assert_eq!(selection.indices, BTreeSet::from([0]));
        assert_eq!(
            selection.bbox,
            BBox {
                x: 2.0,
                y: 2.0,
                w: 6.0,
                h: 6.0
            }
        );
    }

    #[test]
    fn closing_appends_first_point() {
        let polygon = square_lasso().close().unwrap();
        assert_eq!(polygon.len(), 5);
        assert_eq!(polygon[0], polygon[4]);
    }

    #[test]
    fn short_lasso_is_a_no_op() {
        let mut lasso = LassoPolygon::start(Point::new(0.0, 0.0));
        lasso.push(Point::new(10.0, 10.0));
        let paths = vec![path(&[(1.0, 1.0)])];
        assert!(finalize_lasso(lasso, &paths, 1.0).is_none());
    }

    #[test]
    fn sliver_lasso_is_a_no_op() {
        let mut lasso = LassoPolygon::start(Point::new(0.0, 0.0));
        lasso.push(Point::new(5.0, 0.0));
        lasso.push(Point::new(10.0, 0.0));
        assert!(finalize_lasso(lasso, &[], 1.0).is_none());
    }

    #[test]
    fn empty_canvas_gives_empty_selection() {
        let result = finalize_lasso(square_lasso(), &[], 1.0).unwrap();
        assert!(result.selection.is_none());
    }

    #[test]
    fn empty_paths_are_not_selected() {
        let paths = vec![PathRecord::from_points(Vec::new()), path(&[(3.0, 3.0)])];
        let selection = finalize_lasso(square_lasso(), &paths, 1.0)
            .unwrap()
            .selection
            .unwrap();
        assert_eq!(selection.indices, BTreeSet::from([1]));
    }
}
