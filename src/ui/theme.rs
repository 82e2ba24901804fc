// SPDX-License-Identifier: MPL-2.0
//! Crop overlay colors.

use crate::ui::design_tokens::{
    opacity,
    palette::{self, BLACK, WHITE},
};
use iced::Color;

/// Color of the darkened overlay outside the crop area.
pub fn crop_overlay_outside_color() -> Color {
    Color {
        a: opacity::OVERLAY_MEDIUM,
        ..BLACK
    }
}

/// Color of the rule-of-thirds grid in the crop overlay.
pub fn crop_overlay_grid_color() -> Color {
    Color {
        a: opacity::OVERLAY_MEDIUM,
        ..WHITE
    }
}

/// Outline of the circular output guide.
pub fn crop_overlay_circle_color() -> Color {
    palette::INFO_500
}

/// Fill color for crop resize handles.
pub fn crop_overlay_handle_color() -> Color {
    WHITE
}

/// Fill color for the handle being dragged.
pub fn crop_overlay_active_handle_color() -> Color {
    palette::INFO_500
}

/// Border color for crop resize handles.
pub fn crop_overlay_handle_border_color() -> Color {
    Color {
        a: 1.0 - opacity::OVERLAY_SUBTLE,
        ..BLACK
    }
}
