// SPDX-License-Identifier: MPL-2.0
//! Source media handling for crop sessions.

pub mod image;

// Re-export commonly used types
pub use image::{load, load_image, ImageSource};
