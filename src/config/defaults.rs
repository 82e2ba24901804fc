// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Geometry**: Crop rectangle floor and initial placement
//! - **Gestures**: Resize damping and handle hit tolerances
//! - **Output**: Raster size and encoder defaults

// ==========================================================================
// Geometry Defaults
// ==========================================================================

/// Minimum crop rectangle edge, in display pixels.
pub const DEFAULT_MIN_SIZE: f32 = 50.0;

/// Fraction of the shorter display dimension used for the initial crop.
pub const DEFAULT_INITIAL_FRACTION: f32 = 0.6;

/// Smallest accepted initial fraction.
pub const MIN_INITIAL_FRACTION: f32 = 0.1;

/// Largest accepted initial fraction.
pub const MAX_INITIAL_FRACTION: f32 = 1.0;

/// Display sizes below this are treated as a zero-size image.
pub const DEGENERATE_EPSILON: f32 = 0.5;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// Multiplier applied to the raw pointer delta while resizing.
///
/// Move gestures are not damped.
pub const DEFAULT_RESIZE_DAMPING: f32 = 0.8;

/// Half-width of the square corner hit zone for mouse input.
pub const DEFAULT_MOUSE_HIT_TOLERANCE: f32 = 10.0;

/// Half-width of the square corner hit zone for touch input.
pub const DEFAULT_TOUCH_HIT_TOLERANCE: f32 = 12.0;

// ==========================================================================
// Output Defaults
// ==========================================================================

/// Edge length of the square output bitmap.
pub const DEFAULT_OUTPUT_SIZE: u32 = 400;

/// Largest output edge accepted from configuration or the command line.
pub const MAX_OUTPUT_SIZE: u32 = 8192;

/// JPEG quality (1-100) used when the caller does not override it.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Background used to flatten masked pixels for formats without alpha.
pub const DEFAULT_BACKGROUND_RGB: [u8; 3] = [255, 255, 255];

/// Minimum and maximum zoom factors accepted by the display metrics.
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 8.0;
