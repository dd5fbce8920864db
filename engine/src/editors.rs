//! Pure rewrites of a path list restricted to a set of indices.
//!
//! Indices always refer to the export the list came from; paths outside the
//! set pass through untouched.

use std::collections::BTreeSet;

use inkpad_shared::{BBox, Bounds, PathRecord, Point};

use crate::geometry::{rotate_point, scale_point, translate_point};

pub fn apply_transform_to_paths<F>(
    paths: &[PathRecord],
    indices: &BTreeSet<usize>,
    map: F,
) -> Vec<PathRecord>
where
    F: Fn(Point) -> Point,
{
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let mut path = path.clone();
            if indices.contains(&index) {
                path.map_points(&map);
            }
            path
        })
        .collect()
}

pub fn translate_selected_paths(
    paths: &[PathRecord],
    indices: &BTreeSet<usize>,
    dx: f64,
    dy: f64,
) -> Vec<PathRecord> {
    apply_transform_to_paths(paths, indices, |point| translate_point(point, dx, dy))
}

/// `factor` is expected to be clamped by the caller.
pub fn scale_selected_paths(
    paths: &[PathRecord],
    indices: &BTreeSet<usize>,
    center: Point,
    factor: f64,
) -> Vec<PathRecord> {
    apply_transform_to_paths(paths, indices, |point| scale_point(point, center, factor))
}

pub fn rotate_selected_paths(
    paths: &[PathRecord],
    indices: &BTreeSet<usize>,
    center: Point,
    degrees: f64,
) -> Vec<PathRecord> {
    apply_transform_to_paths(paths, indices, |point| rotate_point(point, center, degrees))
}

pub fn recolor_selected_paths(
    paths: &[PathRecord],
    indices: &BTreeSet<usize>,
    color: &str,
) -> Vec<PathRecord> {
    restyle(paths, indices, |path| path.set_stroke_color(color))
}

pub fn restyle_width_selected_paths(
    paths: &[PathRecord],
    indices: &BTreeSet<usize>,
    width: f64,
) -> Vec<PathRecord> {
    restyle(paths, indices, |path| path.set_stroke_width(width))
}

fn restyle<F>(paths: &[PathRecord], indices: &BTreeSet<usize>, apply: F) -> Vec<PathRecord>
where
    F: Fn(&mut PathRecord),
{
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let mut path = path.clone();
            if indices.contains(&index) {
                apply(&mut path);
            }
            path
        })
        .collect()
}

pub fn delete_selected_paths(paths: &[PathRecord], indices: &BTreeSet<usize>) -> Vec<PathRecord> {
    paths
        .iter()
        .enumerate()
        .filter(|(index, _)| !indices.contains(index))
        .map(|(_, path)| path.clone())
        .collect()
}

/// `None` when no selected path has a single point.
pub fn compute_selection_bbox(paths: &[PathRecord], indices: &BTreeSet<usize>) -> Option<BBox> {
    let mut bounds = Bounds::empty();
    for index in indices {
        let Some(path) = paths.get(*index) else {
            continue;
        };
        for point in path.points() {
            bounds.include(*point);
        }
    }
    bounds.to_bbox()
}
