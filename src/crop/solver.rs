// SPDX-License-Identifier: MPL-2.0
//! Constraint solver for the crop rectangle.
//!
//! Every function here is pure and O(1): a proposed mutation goes in, a
//! rectangle satisfying the minimum size, the aspect-ratio lock and the
//! containment rule comes out. The session never publishes anything that did
//! not pass through this module.

use crate::config::EngineSettings;
use crate::domain::{Bounds, Corner, CropRect, ImageDisplayMetrics, OutputSpec, Vector};

/// Everything the solver needs to know about the current session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    /// Region the rectangle must stay inside.
    pub bounds: Bounds,
    /// Locked `width / height`, if any.
    pub aspect_ratio: Option<f32>,
    /// Floor for both edges. Ignored on an axis where the bounds are smaller.
    pub min_size: f32,
}

impl Constraints {
    #[must_use]
    pub fn new(metrics: &ImageDisplayMetrics, spec: &OutputSpec, settings: &EngineSettings) -> Self {
        Self {
            bounds: metrics.crop_bounds(),
            aspect_ratio: spec.locked_ratio(),
            min_size: settings.min_size,
        }
    }
}

/// Clamps a position so `[value, value + extent]` stays in `[min, max_end]`.
fn clamp_position(value: f32, min: f32, max_end: f32, extent: f32) -> f32 {
    let max = max_end - extent;
    if max < min {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Clamps a size to `[min, max]`; the available extent wins when it is
/// smaller than the floor.
fn clamp_size(value: f32, min: f32, max: f32) -> f32 {
    let max = max.max(0.0);
    if max < min {
        max
    } else {
        value.clamp(min, max)
    }
}

/// Solves a size against limits, deriving height from width when locked.
fn solve_size(width: f32, height: f32, max_width: f32, max_height: f32, c: &Constraints) -> (f32, f32) {
    match c.aspect_ratio {
        Some(ratio) => {
            let max_width = max_width.min(max_height * ratio);
            let min_width = c.min_size.max(c.min_size * ratio);
            let width = clamp_size(width, min_width, max_width);
            (width, width / ratio)
        }
        None => (
            clamp_size(width, c.min_size, max_width),
            clamp_size(height, c.min_size, max_height),
        ),
    }
}

/// Translates `start` by `delta`, keeping it inside the bounds. Size is
/// unchanged.
#[must_use]
pub fn solve_move(start: &CropRect, delta: Vector, c: &Constraints) -> CropRect {
    if !(delta.x.is_finite() && delta.y.is_finite()) {
        return *start;
    }
    let moved = start.translated(delta);
    CropRect::new(
        clamp_position(moved.x, c.bounds.left, c.bounds.right, start.width),
        clamp_position(moved.y, c.bounds.top, c.bounds.bottom, start.height),
        start.width,
        start.height,
    )
}

/// Resizes `start` by dragging `corner` by `delta` (already damped).
///
/// The opposite corner stays fixed. Growth on each axis is bounded by the
/// distance from the fixed corner to the image edge in the drag direction;
/// with a locked ratio the horizontal delta drives and the height follows.
#[must_use]
pub fn solve_resize(start: &CropRect, corner: Corner, delta: Vector, c: &Constraints) -> CropRect {
    if !(delta.x.is_finite() && delta.y.is_finite()) {
        return *start;
    }
    let fixed = start.corner(corner.opposite());

    let (width, max_width) = if corner.is_west() {
        (start.width - delta.x, fixed.x - c.bounds.left)
    } else {
        (start.width + delta.x, c.bounds.right - fixed.x)
    };
    let (height, max_height) = if corner.is_north() {
        (start.height - delta.y, fixed.y - c.bounds.top)
    } else {
        (start.height + delta.y, c.bounds.bottom - fixed.y)
    };

    let (width, height) = solve_size(width, height, max_width, max_height, c);

    let x = if corner.is_west() { fixed.x - width } else { fixed.x };
    let y = if corner.is_north() { fixed.y - height } else { fixed.y };
    CropRect::new(x, y, width, height)
}

/// Normalizes an arbitrary rectangle (seeded, rescaled, or stale) into one
/// that satisfies every constraint, keeping its position where possible.
#[must_use]
pub fn fit(rect: &CropRect, c: &Constraints) -> CropRect {
    if !rect.is_finite() {
        return CropRect::new(c.bounds.left, c.bounds.top, 0.0, 0.0);
    }
    let (width, height) = solve_size(
        rect.width,
        rect.height,
        c.bounds.width(),
        c.bounds.height(),
        c,
    );
    CropRect::new(
        clamp_position(rect.x, c.bounds.left, c.bounds.right, width),
        clamp_position(rect.y, c.bounds.top, c.bounds.bottom, height),
        width,
        height,
    )
}

/// The default rectangle of a fresh session: `fraction` of the shorter
/// bounds edge, adjusted to the locked ratio, centered in the bounds.
#[must_use]
pub fn initial_rect(c: &Constraints, fraction: f32) -> CropRect {
    let base = fraction * c.bounds.width().min(c.bounds.height());
    let (width, height) = match c.aspect_ratio {
        Some(ratio) if ratio >= 1.0 => (base, base / ratio),
        Some(ratio) => (base * ratio, base),
        None => (base, base),
    };
    let (width, height) = solve_size(width, height, c.bounds.width(), c.bounds.height(), c);
    CropRect::new(
        c.bounds.left + (c.bounds.width() - width) / 2.0,
        c.bounds.top + (c.bounds.height() - height) / 2.0,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MIN: f32 = 50.0;

    fn constraints(width: f32, height: f32, ratio: Option<f32>) -> Constraints {
        Constraints {
            bounds: Bounds::new(0.0, 0.0, width, height),
            aspect_ratio: ratio,
            min_size: MIN,
        }
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn initial_rect_is_centered_square_on_landscape_image() {
        let c = constraints(400.0, 300.0, Some(1.0));
        let rect = initial_rect(&c, 0.6);
        assert_eq!(rect, CropRect::new(110.0, 60.0, 180.0, 180.0));
    }

    #[test]
    fn initial_rect_adjusts_to_wide_ratio() {
        let c = constraints(800.0, 600.0, Some(2.0));
        let rect = initial_rect(&c, 0.6);
        assert_close(rect.width, 360.0);
        assert_close(rect.height, 180.0);
        assert_close(rect.x, 220.0);
        assert_close(rect.y, 210.0);
    }

    #[test]
    fn initial_rect_adjusts_to_tall_ratio() {
        let c = constraints(600.0, 800.0, Some(0.5));
        let rect = initial_rect(&c, 0.6);
        assert_close(rect.width, 180.0);
        assert_close(rect.height, 360.0);
    }

    #[test]
    fn move_clamps_to_top_left() {
        let c = constraints(400.0, 300.0, None);
        let start = CropRect::new(5.0, 5.0, 100.0, 100.0);
        let moved = solve_move(&start, Vector::new(-20.0, -20.0), &c);
        assert_eq!(moved, CropRect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn move_clamps_to_bottom_right() {
        let c = constraints(400.0, 300.0, None);
        let start = CropRect::new(250.0, 150.0, 100.0, 100.0);
        let moved = solve_move(&start, Vector::new(500.0, 500.0), &c);
        assert_eq!(moved, CropRect::new(300.0, 200.0, 100.0, 100.0));
    }

    #[test]
    fn move_ignores_non_finite_delta() {
        let c = constraints(400.0, 300.0, None);
        let start = CropRect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(solve_move(&start, Vector::new(f32::NAN, 0.0), &c), start);
    }

    #[test]
    fn south_east_resize_keeps_north_west_corner() {
        let c = constraints(1000.0, 1000.0, None);
        let start = CropRect::new(200.0, 200.0, 100.0, 100.0);
        let resized = solve_resize(&start, Corner::SouthEast, Vector::new(40.0, 40.0), &c);
        assert_eq!(resized, CropRect::new(200.0, 200.0, 140.0, 140.0));
    }

    #[test]
    fn north_west_resize_keeps_south_east_corner() {
        let c = constraints(1000.0, 1000.0, None);
        let start = CropRect::new(200.0, 200.0, 100.0, 100.0);
        let resized = solve_resize(&start, Corner::NorthWest, Vector::new(-30.0, -10.0), &c);
        assert_eq!(resized, CropRect::new(170.0, 190.0, 130.0, 110.0));
        assert_eq!(resized.corner(Corner::SouthEast), start.corner(Corner::SouthEast));
    }

    #[test]
    fn resize_never_flips_past_the_fixed_corner() {
        let c = constraints(1000.0, 1000.0, None);
        let start = CropRect::new(200.0, 200.0, 100.0, 100.0);
        let resized = solve_resize(&start, Corner::SouthEast, Vector::new(-500.0, -500.0), &c);
        assert_eq!(resized, CropRect::new(200.0, 200.0, MIN, MIN));
    }

    #[test]
    fn locked_resize_derives_height_from_horizontal_delta() {
        let c = constraints(1000.0, 1000.0, Some(2.0));
        let start = CropRect::new(100.0, 100.0, 200.0, 100.0);
        let resized = solve_resize(&start, Corner::SouthEast, Vector::new(100.0, -80.0), &c);
        assert_close(resized.width, 300.0);
        assert_close(resized.height, 150.0);
    }

    #[test]
    fn locked_resize_is_limited_by_the_tighter_edge() {
        // Fixed corner at (100, 100); 300 px of room horizontally, 100 vertically.
        let c = constraints(400.0, 200.0, Some(1.0));
        let start = CropRect::new(100.0, 100.0, 60.0, 60.0);
        let resized = solve_resize(&start, Corner::SouthEast, Vector::new(500.0, 0.0), &c);
        assert_close(resized.width, 100.0);
        assert_close(resized.height, 100.0);
        assert!(c.bounds.contains_rect(&resized, 1e-3));
    }

    #[test]
    fn west_resize_is_limited_by_left_edge() {
        let c = constraints(400.0, 400.0, None);
        let start = CropRect::new(20.0, 20.0, 100.0, 100.0);
        let resized = solve_resize(&start, Corner::SouthWest, Vector::new(-200.0, 0.0), &c);
        assert_eq!(resized.x, 0.0);
        assert_eq!(resized.width, 120.0);
    }

    #[test]
    fn image_smaller_than_floor_clamps_to_extent() {
        let c = constraints(30.0, 20.0, None);
        let fitted = fit(&CropRect::new(0.0, 0.0, 100.0, 100.0), &c);
        assert_eq!(fitted, CropRect::new(0.0, 0.0, 30.0, 20.0));

        let resized = solve_resize(&fitted, Corner::SouthEast, Vector::new(-10.0, -10.0), &c);
        assert_eq!(resized, fitted);
    }

    #[test]
    fn fit_pulls_oversized_seed_back_inside() {
        let c = constraints(400.0, 300.0, Some(1.0));
        let fitted = fit(&CropRect::new(350.0, 250.0, 500.0, 500.0), &c);
        assert_eq!(fitted, CropRect::new(100.0, 0.0, 300.0, 300.0));
    }

    #[test]
    fn fit_handles_non_finite_input() {
        let c = constraints(400.0, 300.0, None);
        let fitted = fit(&CropRect::new(f32::NAN, 0.0, 10.0, 10.0), &c);
        assert_eq!(fitted.width, 0.0);
    }

    fn corner_strategy() -> impl Strategy<Value = Corner> {
        prop_oneof![
            Just(Corner::NorthWest),
            Just(Corner::NorthEast),
            Just(Corner::SouthWest),
            Just(Corner::SouthEast),
        ]
    }

    proptest! {
        #[test]
        fn moves_stay_inside_bounds(
            width in 60.0f32..2000.0,
            height in 60.0f32..2000.0,
            deltas in prop::collection::vec((-800.0f32..800.0, -800.0f32..800.0), 1..40),
        ) {
            let c = constraints(width, height, None);
            let mut rect = initial_rect(&c, 0.6);
            for (dx, dy) in deltas {
                rect = solve_move(&rect, Vector::new(dx, dy), &c);
                prop_assert!(rect.x >= 0.0 && rect.y >= 0.0);
                prop_assert!(rect.right() <= width + 1e-3);
                prop_assert!(rect.bottom() <= height + 1e-3);
            }
        }

        #[test]
        fn locked_resizes_keep_ratio_floor_and_bounds(
            width in 200.0f32..2000.0,
            height in 200.0f32..2000.0,
            ratio in 0.25f32..4.0,
            steps in prop::collection::vec(
                (corner_strategy(), -400.0f32..400.0, -400.0f32..400.0),
                1..40,
            ),
        ) {
            let c = constraints(width, height, Some(ratio));
            let mut rect = initial_rect(&c, 0.6);
            for (corner, dx, dy) in steps {
                rect = solve_resize(&rect, corner, Vector::new(dx, dy).scaled(0.8), &c);
                prop_assert!((rect.width / rect.height - ratio).abs() < 1e-3);
                prop_assert!(rect.width >= MIN - 1e-3 && rect.height >= MIN - 1e-3);
                prop_assert!(c.bounds.contains_rect(&rect, 1e-2));
            }
        }

        #[test]
        fn free_resizes_respect_floor_under_tiny_deltas(
            corner in corner_strategy(),
            repeats in 1usize..200,
        ) {
            let c = constraints(400.0, 400.0, None);
            let mut rect = CropRect::new(150.0, 150.0, 60.0, 60.0);
            let shrink = match corner {
                Corner::NorthWest => Vector::new(0.5, 0.5),
                Corner::NorthEast => Vector::new(-0.5, 0.5),
                Corner::SouthWest => Vector::new(0.5, -0.5),
                Corner::SouthEast => Vector::new(-0.5, -0.5),
            };
            for _ in 0..repeats {
                rect = solve_resize(&rect, corner, shrink, &c);
                prop_assert!(rect.width >= MIN && rect.height >= MIN);
            }
            let settled = solve_resize(&rect, corner, shrink, &c);
            if rect.width == MIN && rect.height == MIN {
                prop_assert_eq!(settled, rect);
            }
        }
    }
}
