// SPDX-License-Identifier: MPL-2.0
//! Transient state of one pointer gesture.

use super::hit_test::{self, Hit};
use super::pointer::PointerKind;
use super::solver::{self, Constraints};
use crate::config::EngineSettings;
use crate::domain::{Corner, CropRect, Point};

/// What the active gesture does, decided once at gesture start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    /// The gesture started outside the rectangle; moves are ignored.
    Idle,
    Dragging,
    Resizing(Corner),
}

/// Lives from pointer-down to the matching pointer-up and is then dropped.
///
/// The hit test result is cached in `mode` so a gesture cannot switch
/// between moving and resizing half way through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub mode: GestureMode,
    pub anchor: Point,
    pub rect_at_start: CropRect,
    pub pointer: PointerKind,
}

impl GestureState {
    #[must_use]
    pub fn begin(
        anchor: Point,
        pointer: PointerKind,
        rect: CropRect,
        settings: &EngineSettings,
    ) -> Self {
        let tolerance = match pointer {
            PointerKind::Mouse => settings.mouse_hit_tolerance,
            PointerKind::Touch => settings.touch_hit_tolerance,
        };
        let mode = match hit_test::classify(anchor, &rect, tolerance) {
            Hit::Corner(corner) => GestureMode::Resizing(corner),
            Hit::Move => GestureMode::Dragging,
            Hit::None => GestureMode::Idle,
        };
        Self {
            mode,
            anchor,
            rect_at_start: rect,
            pointer,
        }
    }

    /// Solved rectangle for the pointer at `position`, or `None` when the
    /// gesture does not touch the rectangle.
    ///
    /// Always computed from the rectangle at gesture start, so rounding does
    /// not accumulate over a long drag.
    #[must_use]
    pub fn propose(
        &self,
        position: Point,
        constraints: &Constraints,
        settings: &EngineSettings,
    ) -> Option<CropRect> {
        let delta = position.delta_from(self.anchor);
        match self.mode {
            GestureMode::Idle => None,
            GestureMode::Dragging => Some(solver::solve_move(&self.rect_at_start, delta, constraints)),
            GestureMode::Resizing(corner) => Some(solver::solve_resize(
                &self.rect_at_start,
                corner,
                delta.scaled(settings.resize_damping),
                constraints,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bounds;

    fn constraints() -> Constraints {
        Constraints {
            bounds: Bounds::new(0.0, 0.0, 1000.0, 1000.0),
            aspect_ratio: None,
            min_size: 50.0,
        }
    }

    #[test]
    fn resize_applies_damping_but_move_does_not() {
        let settings = EngineSettings::default();
        assert_eq!(settings.resize_damping, 0.8);
        let rect = CropRect::new(200.0, 200.0, 100.0, 100.0);

        let resize = GestureState::begin(Point::new(300.0, 300.0), PointerKind::Mouse, rect, &settings);
        assert_eq!(resize.mode, GestureMode::Resizing(Corner::SouthEast));
        let resized = resize
            .propose(Point::new(350.0, 350.0), &constraints(), &settings)
            .expect("resize proposes");
        assert_eq!(resized, CropRect::new(200.0, 200.0, 140.0, 140.0));

        let drag = GestureState::begin(Point::new(250.0, 250.0), PointerKind::Mouse, rect, &settings);
        assert_eq!(drag.mode, GestureMode::Dragging);
        let moved = drag
            .propose(Point::new(300.0, 300.0), &constraints(), &settings)
            .expect("drag proposes");
        assert_eq!(moved, CropRect::new(250.0, 250.0, 100.0, 100.0));
    }

    #[test]
    fn touch_uses_wider_handle_zone() {
        let settings = EngineSettings::default();
        let rect = CropRect::new(200.0, 200.0, 100.0, 100.0);
        let anchor = Point::new(189.0, 189.0);

        let mouse = GestureState::begin(anchor, PointerKind::Mouse, rect, &settings);
        let touch = GestureState::begin(anchor, PointerKind::Touch, rect, &settings);
        assert_eq!(mouse.mode, GestureMode::Idle);
        assert_eq!(touch.mode, GestureMode::Resizing(Corner::NorthWest));
    }

    #[test]
    fn idle_gesture_proposes_nothing() {
        let settings = EngineSettings::default();
        let rect = CropRect::new(200.0, 200.0, 100.0, 100.0);
        let gesture = GestureState::begin(Point::new(10.0, 10.0), PointerKind::Mouse, rect, &settings);
        assert_eq!(gesture.propose(Point::new(500.0, 500.0), &constraints(), &settings), None);
    }

    #[test]
    fn mode_is_fixed_for_the_whole_gesture() {
        let settings = EngineSettings::default();
        let rect = CropRect::new(200.0, 200.0, 100.0, 100.0);
        let gesture = GestureState::begin(Point::new(250.0, 250.0), PointerKind::Mouse, rect, &settings);
        // Passing over a handle position mid-drag keeps moving.
        let proposed = gesture
            .propose(Point::new(300.0, 300.0), &constraints(), &settings)
            .expect("drag proposes");
        assert_eq!(proposed.width, 100.0);
        assert_eq!(gesture.mode, GestureMode::Dragging);
    }
}
