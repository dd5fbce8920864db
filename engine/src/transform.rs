use std::collections::BTreeSet;

use inkpad_shared::{BBox, PathRecord, Point};

use crate::config::EditorConfig;
use crate::editors::{
    compute_selection_bbox, rotate_selected_paths, scale_selected_paths, translate_selected_paths,
};
use crate::geometry::{angle_between, distance, hit_circle, hit_square, rotate_handle};

const MIN_HANDLE_DISTANCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformMode {
    Move,
    Resize,
    Rotate,
}

/// One frame's worth of change to the selected paths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformStep {
    Translate { dx: f64, dy: f64 },
    Scale { center: Point, factor: f64 },
    Rotate { center: Point, degrees: f64 },
}

impl TransformStep {
    pub fn apply(&self, paths: &[PathRecord], indices: &BTreeSet<usize>) -> Vec<PathRecord> {
        match *self {
            TransformStep::Translate { dx, dy } => translate_selected_paths(paths, indices, dx, dy),
            TransformStep::Scale { center, factor } => {
                scale_selected_paths(paths, indices, center, factor)
            }
            TransformStep::Rotate { center, degrees } => {
                rotate_selected_paths(paths, indices, center, degrees)
            }
        }
    }

    /// Box after the step. Translation shifts the cached box; scale and
    /// rotation re-measure the rewritten paths.
    pub fn bbox_after(
        &self,
        bbox: &BBox,
        paths: &[PathRecord],
        indices: &BTreeSet<usize>,
    ) -> Option<BBox> {
        match *self {
            TransformStep::Translate { dx, dy } => Some(bbox.translated(dx, dy)),
            _ => compute_selection_bbox(paths, indices),
        }
    }
}

/// Pointer tracking for a drag, resize, or rotate in progress.
///
/// Every update is relative to the previous frame, so steps compose.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformGesture {
    mode: TransformMode,
    center: Point,
    last: Point,
    last_distance: f64,
    last_angle: f64,
}

impl TransformGesture {
    pub fn begin(mode: TransformMode, bbox: &BBox, pointer: Point) -> Self {
        let center = bbox.center();
        Self {
            mode,
            center,
            last: pointer,
            last_distance: distance(center, pointer),
            last_angle: angle_between(center, pointer),
        }
    }

    pub fn update(&mut self, pointer: Point, config: &EditorConfig) -> Option<TransformStep> {
        match self.mode {
            TransformMode::Move => {
                let dx = pointer.x - self.last.x;
                let dy = pointer.y - self.last.y;
                self.last = pointer;
                if dx == 0.0 && dy == 0.0 {
                    return None;
                }
                Some(TransformStep::Translate { dx, dy })
            }
            TransformMode::Resize => {
                let current = distance(self.center, pointer);
                let previous = self.last_distance;
                self.last_distance = current;
                if previous < MIN_HANDLE_DISTANCE || current < MIN_HANDLE_DISTANCE {
                    return None;
                }
                let factor = config.clamp_scale_step(current / previous);
                if factor == 1.0 {
                    return None;
                }
                Some(TransformStep::Scale {
                    center: self.center,
                    factor,
                })
            }
            TransformMode::Rotate => {
                let current = angle_between(self.center, pointer);
                let delta = wrap_degrees((current - self.last_angle).to_degrees());
                self.last_angle = current;
                if delta == 0.0 {
                    return None;
                }
                Some(TransformStep::Rotate {
                    center: self.center,
                    degrees: delta,
                })
            }
        }
    }
}

/// Maps an angle delta into `(-180, 180]` so crossing the atan2 seam does
/// not spin the selection a full turn.
fn wrap_degrees(degrees: f64) -> f64 {
    let mut wrapped = degrees % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped <= -180.0 {
        wrapped += 360.0;
    }
    wrapped
}

/// Which part of the selection chrome sits under `point`.
pub fn hit_test(bbox: &BBox, point: Point, config: &EditorConfig) -> Option<TransformMode> {
    let handle = config.handle_size;
    if hit_circle(
        point,
        rotate_handle(bbox, config.rotate_handle_offset),
        handle * 0.7,
    ) {
        return Some(TransformMode::Rotate);
    }
    if bbox
        .corners()
        .iter()
        .any(|corner| hit_square(point, *corner, handle))
    {
        return Some(TransformMode::Resize);
    }
    if bbox.contains(point) {
        return Some(TransformMode::Move);
    }
    None
}

/// `Ctrl+Arrow` nudges applied as one discrete step about the box center.
pub fn nudge_step(key: &str, bbox: &BBox, config: &EditorConfig) -> Option<TransformStep> {
    let center = bbox.center();
    match key {
        "ArrowLeft" => Some(TransformStep::Rotate {
            center,
            degrees: -config.rotate_nudge_degrees,
        }),
        "ArrowRight" => Some(TransformStep::Rotate {
            center,
            degrees: config.rotate_nudge_degrees,
        }),
        "ArrowUp" => Some(TransformStep::Scale {
            center,
            factor: config.scale_nudge_up,
        }),
        "ArrowDown" => Some(TransformStep::Scale {
            center,
            factor: config.scale_nudge_down,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BBox {
        BBox {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        }
    }

    #[test]
    fn move_steps_are_frame_relative() {
        let config = EditorConfig::default();
        let mut gesture =
            TransformGesture::begin(TransformMode::Move, &bbox(), Point::new(5.0, 5.0));
        assert_eq!(
            gesture.update(Point::new(7.0, 5.0), &config),
            Some(TransformStep::Translate { dx: 2.0, dy: 0.0 })
        );
        assert_eq!(
            gesture.update(Point::new(8.0, 4.0), &config),
            Some(TransformStep::Translate { dx: 1.0, dy: -1.0 })
        );
        assert_eq!(gesture.update(Point::new(8.0, 4.0), &config), None);
    }

    #[test]
    fn resize_uses_distance_ratio() {
        let config = EditorConfig::default();
        let mut gesture =
            TransformGesture::begin(TransformMode::Resize, &bbox(), Point::new(10.0, 5.0));
        match gesture.update(Point::new(15.0, 5.0), &config) {
            Some(TransformStep::Scale { center, factor }) => {
                assert_eq!(center, Point::new(5.0, 5.0));
                assert!((factor - 2.0).abs() < 1e-12);
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn resize_factor_is_clamped() {
        let config = EditorConfig::default();
        let mut gesture =
            TransformGesture::begin(TransformMode::Resize, &bbox(), Point::new(6.0, 5.0));
        match gesture.update(Point::new(105.0, 5.0), &config) {
            Some(TransformStep::Scale { factor, .. }) => assert_eq!(factor, 5.0),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn resize_from_center_is_ignored() {
        let config = EditorConfig::default();
        let mut gesture =
            TransformGesture::begin(TransformMode::Resize, &bbox(), Point::new(5.0, 5.0));
        assert_eq!(gesture.update(Point::new(9.0, 5.0), &config), None);
        assert!(gesture.update(Point::new(13.0, 5.0), &config).is_some());
    }

    #[test]
    fn rotate_tracks_angle_delta() {
        let config = EditorConfig::default();
        let mut gesture =
            TransformGesture::begin(TransformMode::Rotate, &bbox(), Point::new(10.0, 5.0));
        match gesture.update(Point::new(5.0, 10.0), &config) {
            Some(TransformStep::Rotate { degrees, .. }) => assert!((degrees - 90.0).abs() < 1e-9),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn rotate_across_seam_takes_short_way() {
        let config = EditorConfig::default();
        let mut gesture =
            TransformGesture::begin(TransformMode::Rotate, &bbox(), Point::new(0.0, 5.1));
        match gesture.update(Point::new(0.0, 4.9), &config) {
            Some(TransformStep::Rotate { degrees, .. }) => assert!(degrees.abs() < 10.0),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn hit_test_regions() {
        let config = EditorConfig::default();
        let bbox = BBox {
            x: 0.0,
            y: 0.0,
            w: 40.0,
            h: 40.0,
        };
        assert_eq!(
            hit_test(&bbox, Point::new(20.0, -24.0), &config),
            Some(TransformMode::Rotate)
        );
        assert_eq!(
            hit_test(&bbox, Point::new(40.0, 40.0), &config),
            Some(TransformMode::Resize)
        );
        assert_eq!(
            hit_test(&bbox, Point::new(-3.0, 2.0), &config),
            Some(TransformMode::Resize)
        );
        assert_eq!(
            hit_test(&bbox, Point::new(20.0, 20.0), &config),
            Some(TransformMode::Move)
        );
        assert_eq!(hit_test(&bbox, Point::new(80.0, 80.0), &config), None);
    }

    #[test]
    fn nudges() {
        let config = EditorConfig::default();
        assert_eq!(
            nudge_step("ArrowRight", &bbox(), &config),
            Some(TransformStep::Rotate {
                center: Point::new(5.0, 5.0),
                degrees: 5.0
            })
        );
        assert_eq!(
            nudge_step("ArrowDown", &bbox(), &config),
            Some(TransformStep::Scale {
                center: Point::new(5.0, 5.0),
                factor: 0.9
            })
        );
        assert_eq!(nudge_step("a", &bbox(), &config), None);
    }

    #[test]
    fn translate_shifts_cached_box() {
        let step = TransformStep::Translate { dx: 3.0, dy: -1.0 };
        let moved = step.bbox_after(&bbox(), &[], &BTreeSet::new());
        assert_eq!(
            moved,
            Some(BBox {
                x: 3.0,
                y: -1.0,
                w: 10.0,
                h: 10.0
            })
        );
    }
}
