// SPDX-License-Identifier: MPL-2.0
//! iced surface for the crop engine.

pub mod crop_overlay;
pub mod design_tokens;
pub mod theme;

pub use crop_overlay::{CropOverlay, OverlayInput};
