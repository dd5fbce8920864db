mod record;

pub use record::{ExportedPaths, PathRecord, PathShape};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `None` when either coordinate is NaN or infinite.
    pub fn finite(x: f64, y: f64) -> Option<Self> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Self { x, y })
    }

    pub fn lerp(self, to: Point, t: f64) -> Point {
        Point {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    pub fn dist_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Min/max extents accumulated one point at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
        }
    }

    pub fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn to_bbox(self) -> Option<BBox> {
        if self.is_empty() {
            return None;
        }
        Some(BBox {
            x: self.min_x,
            y: self.min_y,
            w: self.max_x - self.min_x,
            h: self.max_y - self.min_y,
        })
    }
}

/// Axis-aligned box in canvas-local pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BBox {
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.w / 2.0,
            y: self.y + self.h / 2.0,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn translated(&self, dx: f64, dy: f64) -> BBox {
        BBox {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w,
            h: self.h,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.x, self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_rejects_nan_and_infinity() {
        assert!(Point::finite(f64::NAN, 0.0).is_none());
        assert!(Point::finite(0.0, f64::INFINITY).is_none());
        assert_eq!(Point::finite(1.0, 2.0), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn bounds_to_bbox() {
        let mut bounds = Bounds::empty();
        assert!(bounds.to_bbox().is_none());
        bounds.include(Point::new(4.0, -2.0));
        bounds.include(Point::new(-1.0, 6.0));
        let bbox = bounds.to_bbox().unwrap();
        assert_eq!(
            bbox,
            BBox {
                x: -1.0,
                y: -2.0,
                w: 5.0,
                h: 8.0
            }
        );
        assert_eq!(bbox.center(), Point::new(1.5, 2.0));
        assert!(bbox.contains(Point::new(0.0, 0.0)));
        assert!(!bbox.contains(Point::new(10.0, 0.0)));
    }

    #[test]
    fn single_point_bounds_is_degenerate_box() {
        let mut bounds = Bounds::empty();
        bounds.include(Point::new(3.0, 3.0));
        let bbox = bounds.to_bbox().unwrap();
        assert_eq!(bbox.w, 0.0);
        assert_eq!(bbox.h, 0.0);
    }
}
