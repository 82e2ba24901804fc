// SPDX-License-Identifier: MPL-2.0
//! Output description for a crop session and the encoded result.

use crate::config::{DEFAULT_BACKGROUND_RGB, DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_SIZE};

/// Visual shape of the produced bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputShape {
    #[default]
    Square,
    /// Pixels outside the inscribed circle are masked out.
    Circle,
}

/// Dimensions of the output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFrame {
    /// `output_size x output_size`, whatever the selection's aspect ratio.
    #[default]
    Square,
    /// `output_size x round(output_size / aspect_ratio)` when a ratio is set.
    MatchAspect,
}

/// Encoded format of the output bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    /// Lossy, no alpha: masked pixels are flattened onto a background color.
    Jpeg { quality: u8 },
    Png,
}

impl Default for OutputEncoding {
    fn default() -> Self {
        Self::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl OutputEncoding {
    #[must_use]
    pub fn format(self) -> BitmapFormat {
        match self {
            OutputEncoding::Jpeg { .. } => BitmapFormat::Jpeg,
            OutputEncoding::Png => BitmapFormat::Png,
        }
    }
}

/// Caller-supplied description of the crop result, fixed for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputSpec {
    /// Locked width / height ratio of the selection, if any.
    pub aspect_ratio: Option<f32>,
    pub output_size: u32,
    pub shape: OutputShape,
    pub frame: OutputFrame,
    pub encoding: OutputEncoding,
    /// RGB used behind masked pixels when the encoding has no alpha channel.
    pub background: [u8; 3],
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            aspect_ratio: None,
            output_size: DEFAULT_OUTPUT_SIZE,
            shape: OutputShape::Square,
            frame: OutputFrame::Square,
            encoding: OutputEncoding::default(),
            background: DEFAULT_BACKGROUND_RGB,
        }
    }
}

impl OutputSpec {
    /// Square avatar-style output locked to 1:1.
    #[must_use]
    pub fn square(output_size: u32) -> Self {
        Self {
            aspect_ratio: Some(1.0),
            output_size,
            ..Self::default()
        }
    }

    /// Circular avatar-style output locked to 1:1.
    #[must_use]
    pub fn circle(output_size: u32) -> Self {
        Self {
            shape: OutputShape::Circle,
            ..Self::square(output_size)
        }
    }

    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: Option<f32>) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The configured ratio, ignoring values that cannot drive a resize.
    #[must_use]
    pub fn locked_ratio(&self) -> Option<f32> {
        self.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Width and height of the output surface, each at least one pixel.
    #[must_use]
    pub fn output_dimensions(&self) -> (u32, u32) {
        let width = self.output_size.max(1);
        let height = match (self.frame, self.locked_ratio()) {
            (OutputFrame::MatchAspect, Some(ratio)) => {
                let height = (f64::from(width) / f64::from(ratio)).round().max(1.0);
                // The conditional guarantees the value fits in u32
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let height = if height > f64::from(u32::MAX) {
                    u32::MAX
                } else {
                    height as u32
                };
                height
            }
            _ => width,
        };
        (width, height)
    }
}

/// Format tag of an encoded [`Bitmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapFormat {
    Jpeg,
    Png,
}

impl BitmapFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            BitmapFormat::Jpeg => "jpg",
            BitmapFormat::Png => "png",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            BitmapFormat::Jpeg => "image/jpeg",
            BitmapFormat::Png => "image/png",
        }
    }
}

/// Encoded crop result handed to the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub format: BitmapFormat,
    pub bytes: Vec<u8>,
}
