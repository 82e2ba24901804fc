// SPDX-License-Identifier: MPL-2.0
//! Source image loading and decoding (PNG, JPEG, GIF, WebP, ...).
//!
//! Decoding runs on the blocking pool so the event loop driving gestures is
//! never stalled by a large file.

use crate::error::{Error, Result};
use image_rs::RgbaImage;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the image to crop comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image file on disk.
    File(PathBuf),
    /// Encoded image already in memory (e.g. a freshly selected upload).
    Bytes(Arc<Vec<u8>>),
}

impl ImageSource {
    /// Short description for logs, without dumping the bytes.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::File(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(Arc::new(bytes))
    }
}

/// Reads and decodes `source` into straight RGBA, on the calling thread.
pub fn load_image(source: &ImageSource) -> Result<RgbaImage> {
    let decoded = match source {
        ImageSource::File(path) => {
            let img_bytes = fs::read(path)
                .map_err(|e| Error::ImageLoad(format!("{}: {e}", path.display())))?;
            image_rs::load_from_memory(&img_bytes)
        }
        ImageSource::Bytes(bytes) => image_rs::load_from_memory(bytes),
    }
    .map_err(|e| Error::ImageLoad(e.to_string()))?;

    Ok(decoded.to_rgba8())
}

/// Decodes `source` on tokio's blocking pool.
pub async fn load(source: ImageSource) -> Result<RgbaImage> {
    tokio::task::spawn_blocking(move || load_image(&source))
        .await
        .map_err(|e| Error::ImageLoad(format!("decoder task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{ImageFormat, Rgba};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut cursor = Cursor::new(Vec::new());
        image
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("encode png");
        cursor.into_inner()
    }

    #[test]
    fn load_png_file_returns_expected_dimensions() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = temp_dir.path().join("sample.png");
        fs::write(&image_path, png_bytes(4, 2)).expect("write png");

        let image = load_image(&ImageSource::File(image_path)).expect("load png");
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn load_from_bytes_decodes() {
        let image = load_image(&ImageSource::from(png_bytes(3, 5))).expect("load bytes");
        assert_eq!(image.dimensions(), (3, 5));
    }

    #[test]
    fn missing_file_is_an_image_load_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = load_image(&ImageSource::File(temp_dir.path().join("nope.png")));
        assert!(matches!(result, Err(Error::ImageLoad(_))));
    }

    #[test]
    fn corrupt_bytes_are_an_image_load_error() {
        let result = load_image(&ImageSource::from(b"\x89PNG garbage".to_vec()));
        assert!(matches!(result, Err(Error::ImageLoad(_))));
    }

    #[tokio::test]
    async fn async_load_runs_on_blocking_pool() {
        let image = load(ImageSource::from(png_bytes(8, 8))).await.expect("load");
        assert_eq!(image.dimensions(), (8, 8));
    }

    #[test]
    fn describe_does_not_dump_bytes() {
        assert_eq!(ImageSource::from(vec![1, 2, 3]).describe(), "<3 bytes>");
    }
}
