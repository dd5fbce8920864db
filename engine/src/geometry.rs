use inkpad_shared::{BBox, Point};

const HORIZONTAL_EDGE_EPSILON: f64 = 1e-12;
const ROOT_DEDUP_EPSILON: f64 = 1e-6;

/// Even-odd ray cast to the right of `(x, y)`.
pub fn point_in_polygon(x: f64, y: f64, polygon: &[Point]) -> bool {
    if polygon.is_empty() {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let pi = polygon[i];
        let pj = polygon[j];
        let crosses = (pi.y > y) != (pj.y > y)
            && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y + HORIZONTAL_EDGE_EPSILON) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Squared distance from C to segment AB.
pub fn dist_point_to_seg_sq(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((cx - ax) * dx + (cy - ay) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let px = ax + t * dx;
    let py = ay + t * dy;
    (cx - px).powi(2) + (cy - py).powi(2)
}

/// Parameters `t` in `[0, 1]` where segment AB meets the circle, ascending.
///
/// Zero-length segments and non-positive radii yield nothing.
pub fn line_circle_intersections(
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
    cx: f64,
    cy: f64,
    r: f64,
) -> Vec<f64> {
    let dx = bx - ax;
    let dy = by - ay;
    let a = dx * dx + dy * dy;
    if a == 0.0 || !r.is_finite() || r <= 0.0 {
        return Vec::new();
    }
    let fx = ax - cx;
    let fy = ay - cy;
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - r * r;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let root = disc.sqrt();
    let mut ts = Vec::with_capacity(2);
    for t in [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)] {
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        if ts
            .iter()
            .any(|seen: &f64| (seen - t).abs() < ROOT_DEDUP_EPSILON)
        {
            continue;
        }
        ts.push(t);
    }
    ts.sort_by(|a, b| a.total_cmp(b));
    ts
}

/// Shoelace area, ignoring orientation.
pub fn polygon_area(polygon: &[Point]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        twice += (polygon[j].x + polygon[i].x) * (polygon[j].y - polygon[i].y);
        j = i;
    }
    (twice / 2.0).abs()
}

pub fn angle_between(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x)
}

pub fn distance(a: Point, b: Point) -> f64 {
    a.dist_sq(b).sqrt()
}

pub fn translate_point(point: Point, dx: f64, dy: f64) -> Point {
    Point::new(point.x + dx, point.y + dy)
}

pub fn scale_point(point: Point, center: Point, factor: f64) -> Point {
    Point::new(
        center.x + (point.x - center.x) * factor,
        center.y + (point.y - center.y) * factor,
    )
}

pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

pub fn hit_square(point: Point, center: Point, size: f64) -> bool {
    let half = size / 2.0;
    point.x >= center.x - half
        && point.x <= center.x + half
        && point.y >= center.y - half
        && point.y <= center.y + half
}

pub fn hit_circle(point: Point, center: Point, radius: f64) -> bool {
    point.dist_sq(center) <= radius * radius
}

/// Where the rotate handle sits for a selection box.
pub fn rotate_handle(bbox: &BBox, offset: f64) -> Point {
    Point::new(bbox.x + bbox.w / 2.0, bbox.y - offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ]
    }

    #[test]
    fn point_in_square() {
        let polygon = square();
        assert!(point_in_polygon(5.0, 5.0, &polygon));
        assert!(point_in_polygon(0.5, 9.5, &polygon));
        assert!(!point_in_polygon(15.0, 5.0, &polygon));
        assert!(!point_in_polygon(-1.0, 5.0, &polygon));
        assert!(!point_in_polygon(5.0, 11.0, &polygon));
    }

    #[test]
    fn point_in_concave_polygon() {
        // U shape open to the top
        let polygon = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 7.0),
            Point::new(7.0, 7.0),
            Point::new(7.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(1.0, 1.0, &polygon));
        assert!(!point_in_polygon(5.0, 3.0, &polygon));
        assert!(point_in_polygon(5.0, 9.0, &polygon));
    }

    #[test]
    fn empty_polygon_contains_nothing() {
        assert!(!point_in_polygon(0.0, 0.0, &[]));
    }

    #[test]
    fn segment_distance() {
        assert_eq!(dist_point_to_seg_sq(0.0, 0.0, 10.0, 0.0, 5.0, 3.0), 9.0);
        // clamps to the nearer endpoint
        assert_eq!(dist_point_to_seg_sq(0.0, 0.0, 10.0, 0.0, 13.0, 4.0), 25.0);
        assert_eq!(dist_point_to_seg_sq(0.0, 0.0, 10.0, 0.0, -3.0, 0.0), 9.0);
        // zero-length segment behaves like a point
        assert_eq!(dist_point_to_seg_sq(1.0, 1.0, 1.0, 1.0, 4.0, 5.0), 25.0);
    }

    #[test]
    fn segment_through_circle_has_two_roots() {
        let ts = line_circle_intersections(0.0, 0.0, 10.0, 0.0, 5.0, 0.0, 2.0);
        assert_eq!(ts.len(), 2);
        assert!((ts[0] - 0.3).abs() < 1e-12);
        assert!((ts[1] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn segment_entering_circle_has_one_root() {
        let ts = line_circle_intersections(0.0, 0.0, 5.0, 0.0, 5.0, 0.0, 2.0);
        assert_eq!(ts.len(), 1);
        assert!((ts[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn tangent_roots_are_deduplicated() {
        let ts = line_circle_intersections(0.0, 2.0, 10.0, 2.0, 5.0, 0.0, 2.0);
        assert_eq!(ts.len(), 1);
        assert!((ts[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn degenerate_intersections() {
        assert!(line_circle_intersections(5.0, 0.0, 5.0, 0.0, 5.0, 0.0, 2.0).is_empty());
        assert!(line_circle_intersections(0.0, 0.0, 10.0, 0.0, 5.0, 0.0, 0.0).is_empty());
        assert!(line_circle_intersections(0.0, 5.0, 10.0, 5.0, 5.0, 0.0, 2.0).is_empty());
        // segment entirely inside the circle never reaches the boundary
        assert!(line_circle_intersections(4.0, 0.0, 6.0, 0.0, 5.0, 0.0, 2.0).is_empty());
    }

    #[test]
    fn area_of_square() {
        assert_eq!(polygon_area(&square()), 100.0);
        assert_eq!(polygon_area(&square()[..2]), 0.0);
    }

    #[test]
    fn rotation_quarter_turn() {
        let p = rotate_point(Point::new(2.0, 0.0), Point::new(0.0, 0.0), 90.0);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn scaling_about_center() {
        let p = scale_point(Point::new(4.0, 4.0), Point::new(2.0, 2.0), 2.0);
        assert_eq!(p, Point::new(6.0, 6.0));
    }
}
