// SPDX-License-Identifier: MPL-2.0
//! Display space <-> source space conversion.

use crate::domain::{CropRect, ImageDisplayMetrics, SourceRect};

/// Maps a display-space crop rectangle to natural image pixels.
///
/// The result is clamped to the image so floating-point overshoot at the
/// boundary never produces an out-of-range region.
#[must_use]
pub fn to_source_rect(rect: &CropRect, metrics: &ImageDisplayMetrics) -> SourceRect {
    let scale_x = metrics.scale_x();
    let scale_y = metrics.scale_y();
    let natural_width = f64::from(metrics.natural_width);
    let natural_height = f64::from(metrics.natural_height);

    let x = (f64::from(rect.x - metrics.offset_x) * scale_x).clamp(0.0, natural_width);
    let y = (f64::from(rect.y - metrics.offset_y) * scale_y).clamp(0.0, natural_height);
    let width = (f64::from(rect.width) * scale_x).clamp(0.0, natural_width - x);
    let height = (f64::from(rect.height) * scale_y).clamp(0.0, natural_height - y);

    SourceRect::new(x, y, width, height)
}

/// Inverse of [`to_source_rect`] (without clamping).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_display_rect(source: &SourceRect, metrics: &ImageDisplayMetrics) -> CropRect {
    let scale_x = metrics.scale_x();
    let scale_y = metrics.scale_y();
    CropRect::new(
        (source.x / scale_x) as f32 + metrics.offset_x,
        (source.y / scale_y) as f32 + metrics.offset_y,
        (source.width / scale_x) as f32,
        (source.height / scale_y) as f32,
    )
}
