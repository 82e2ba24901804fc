// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core crop types with ZERO external dependencies.
//!
//! This module contains pure value objects shared by the engine, the
//! rasterizer and the overlay. It depends on nothing but `std` and the
//! constants in [`crate::config::defaults`], so the geometry can be tested
//! without a renderer or an image decoder.
//!
//! # Modules
//!
//! - [`geometry`]: Display-space and source-space types ([`CropRect`](geometry::CropRect),
//!   [`Bounds`](geometry::Bounds), [`SourceRect`](geometry::SourceRect),
//!   [`ImageDisplayMetrics`](geometry::ImageDisplayMetrics))
//! - [`output`]: Output description ([`OutputSpec`](output::OutputSpec),
//!   [`OutputEncoding`](output::OutputEncoding), [`Bitmap`](output::Bitmap))

pub mod geometry;
pub mod output;

pub use geometry::{Bounds, CropRect, Corner, ImageDisplayMetrics, Point, SourceRect, Vector};
pub use output::{Bitmap, BitmapFormat, OutputEncoding, OutputFrame, OutputShape, OutputSpec};
