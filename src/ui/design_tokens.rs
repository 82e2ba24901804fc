// SPDX-License-Identifier: MPL-2.0
//! Design tokens for the crop overlay.
//!
//! - **Palette**: Base colors
//! - **Opacity**: Standardized opacity levels
//! - **Sizing**: Handle and stroke sizes

use iced::Color;

// ============================================================================
// Color Palette
// ============================================================================

pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    pub const INFO_500: Color = Color::from_rgb(0.392, 0.588, 1.0);
}

// ============================================================================
// Opacity Scale
// ============================================================================

pub mod opacity {
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
}

// ============================================================================
// Sizing Scale
// ============================================================================

pub mod sizing {
    /// Visual size of crop handles (rendered size).
    pub const CROP_HANDLE_SIZE: f32 = 12.0;
    pub const CROP_BORDER_WIDTH: f32 = 2.0;
    pub const CROP_GRID_WIDTH: f32 = 1.0;
}
