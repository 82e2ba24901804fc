// SPDX-License-Identifier: MPL-2.0
//! Draws a source region into the fixed-size output surface and encodes it.
//!
//! Drawing is one affine scale-and-draw through a `tiny_skia` pattern: the
//! selected region is stretched to fill the surface exactly, no letterboxing.
//! A circular output adds a clip mask; the pixel buffer itself stays
//! rectangular.

use crate::domain::{Bitmap, OutputEncoding, OutputShape, OutputSpec, SourceRect};
use crate::error::{Error, Result};
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::codecs::png::PngEncoder;
use image_rs::{Rgb, RgbImage, Rgba, RgbaImage};
use tiny_skia::{
    FillRule, FilterQuality, IntSize, Mask, Paint, PathBuilder, Pattern, Pixmap, Rect, SpreadMode,
    Transform,
};

/// Renders `source` of `image` into an RGBA surface sized by `spec`.
///
/// Pixels outside the circle of a [`OutputShape::Circle`] output have alpha 0.
pub fn rasterize(source: &SourceRect, spec: &OutputSpec, image: &RgbaImage) -> Result<RgbaImage> {
    if source.is_empty() || image.width() == 0 || image.height() == 0 {
        return Err(Error::Encode("empty source region".into()));
    }

    let (width, height) = spec.output_dimensions();
    let source_pixmap = to_pixmap(image)?;
    let mut surface = Pixmap::new(width, height)
        .ok_or_else(|| Error::Encode(format!("cannot allocate {width}x{height} surface")))?;

    let scale_x = f64::from(width) / source.width;
    let scale_y = f64::from(height) / source.height;
    #[allow(clippy::cast_possible_truncation)]
    let pattern_transform = Transform::from_row(
        scale_x as f32,
        0.0,
        0.0,
        scale_y as f32,
        (-source.x * scale_x) as f32,
        (-source.y * scale_y) as f32,
    );

    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.shader = Pattern::new(
        source_pixmap.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Bilinear,
        1.0,
        pattern_transform,
    );

    let mask = match spec.shape {
        OutputShape::Square => None,
        OutputShape::Circle => Some(circle_mask(width, height)?),
    };

    let target = Rect::from_xywh(0.0, 0.0, width as f32, height as f32)
        .ok_or_else(|| Error::Encode("invalid output rectangle".into()))?;
    surface.fill_rect(target, &paint, Transform::identity(), mask.as_ref());

    Ok(from_pixmap(&surface))
}

fn circle_mask(width: u32, height: u32) -> Result<Mask> {
    let mut mask =
        Mask::new(width, height).ok_or_else(|| Error::Encode("cannot allocate mask".into()))?;
    let radius = width.min(height) as f32 / 2.0;
    let path = PathBuilder::from_circle(width as f32 / 2.0, height as f32 / 2.0, radius)
        .ok_or_else(|| Error::Encode("invalid clip circle".into()))?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    Ok(mask)
}

/// Copies straight RGBA into a premultiplied pixmap.
fn to_pixmap(image: &RgbaImage) -> Result<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())
        .ok_or_else(|| Error::Encode("invalid source size".into()))?;
    let mut data = image.as_raw().clone();
    for px in data.chunks_exact_mut(4) {
        let alpha = u16::from(px[3]);
        if alpha < 255 {
            for channel in &mut px[..3] {
                // Rounded (c * a) / 255, always <= 255
                #[allow(clippy::cast_possible_truncation)]
                let premultiplied = ((u16::from(*channel) * alpha + 127) / 255) as u8;
                *channel = premultiplied;
            }
        }
    }
    Pixmap::from_vec(data, size).ok_or_else(|| Error::Encode("invalid source buffer".into()))
}

fn from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    image
}

/// Encodes a rasterized surface.
///
/// JPEG has no alpha, so pixels are composited over `background` first.
pub fn encode(image: &RgbaImage, encoding: OutputEncoding, background: [u8; 3]) -> Result<Bitmap> {
    let mut bytes = Vec::new();
    match encoding {
        OutputEncoding::Jpeg { quality } => {
            let flattened = flatten(image, background);
            let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
            flattened
                .write_with_encoder(encoder)
                .map_err(|e| Error::Encode(e.to_string()))?;
        }
        OutputEncoding::Png => {
            image
                .write_with_encoder(PngEncoder::new(&mut bytes))
                .map_err(|e| Error::Encode(e.to_string()))?;
        }
    }

    Ok(Bitmap {
        width: image.width(),
        height: image.height(),
        format: encoding.format(),
        bytes,
    })
}

fn flatten(image: &RgbaImage, background: [u8; 3]) -> RgbImage {
    let mut flat = RgbImage::new(image.width(), image.height());
    for (dst, src) in flat.pixels_mut().zip(image.pixels()) {
        let alpha = u32::from(src[3]);
        let mut out = [0u8; 3];
        for (i, channel) in out.iter_mut().enumerate() {
            let blended = (u32::from(src[i]) * alpha + u32::from(background[i]) * (255 - alpha) + 127) / 255;
            // Weighted average of two u8 values, always <= 255
            #[allow(clippy::cast_possible_truncation)]
            let blended = blended as u8;
            *channel = blended;
        }
        *dst = Rgb(out);
    }
    flat
}
