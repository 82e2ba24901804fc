// SPDX-License-Identifier: MPL-2.0
//! Classifies a pointer position against the crop rectangle.

use crate::domain::{Corner, CropRect, Point};

/// What a gesture starting at a given position would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Resize by dragging this corner.
    Corner(Corner),
    /// Drag the whole rectangle.
    Move,
    /// Outside the rectangle and its handles.
    None,
}

/// Corner handles are tested first, each with a square zone of half-width
/// `tolerance` centered on the corner. Otherwise a point strictly inside the
/// rectangle is a move.
#[must_use]
pub fn classify(pos: Point, rect: &CropRect, tolerance: f32) -> Hit {
    for corner in Corner::ALL {
        let handle = rect.corner(corner);
        if (pos.x - handle.x).abs() <= tolerance && (pos.y - handle.y).abs() <= tolerance {
            return Hit::Corner(corner);
        }
    }

    if rect.contains_strict(pos) {
        Hit::Move
    } else {
        Hit::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> CropRect {
        CropRect::new(50.0, 50.0, 100.0, 100.0)
    }

    #[test]
    fn exact_corners_are_handles() {
        assert_eq!(classify(Point::new(50.0, 50.0), &rect(), 10.0), Hit::Corner(Corner::NorthWest));
        assert_eq!(classify(Point::new(150.0, 50.0), &rect(), 10.0), Hit::Corner(Corner::NorthEast));
        assert_eq!(classify(Point::new(50.0, 150.0), &rect(), 10.0), Hit::Corner(Corner::SouthWest));
        assert_eq!(classify(Point::new(150.0, 150.0), &rect(), 10.0), Hit::Corner(Corner::SouthEast));
    }

    #[test]
    fn handle_zone_is_square_not_round() {
        // (10, 10) away is outside a 10 px circle but inside the square zone.
        assert_eq!(classify(Point::new(160.0, 160.0), &rect(), 10.0), Hit::Corner(Corner::SouthEast));
        assert_eq!(classify(Point::new(161.0, 150.0), &rect(), 10.0), Hit::None);
    }

    #[test]
    fn touch_tolerance_reaches_further() {
        let pos = Point::new(39.0, 39.0);
        assert_eq!(classify(pos, &rect(), 10.0), Hit::None);
        assert_eq!(classify(pos, &rect(), 12.0), Hit::Corner(Corner::NorthWest));
    }

    #[test]
    fn interior_is_move_and_edges_outside_handles_are_none() {
        assert_eq!(classify(Point::new(100.0, 100.0), &rect(), 10.0), Hit::Move);
        assert_eq!(classify(Point::new(100.0, 50.0), &rect(), 10.0), Hit::None);
        assert_eq!(classify(Point::new(10.0, 100.0), &rect(), 10.0), Hit::None);
    }

    #[test]
    fn corner_near_interior_wins_over_move() {
        assert_eq!(classify(Point::new(58.0, 58.0), &rect(), 10.0), Hit::Corner(Corner::NorthWest));
    }
}
