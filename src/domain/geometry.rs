// SPDX-License-Identifier: MPL-2.0
//! Geometry value objects.
//!
//! Two coordinate spaces are in play:
//! - **display space**: `f32` pixels relative to the top-left corner of the
//!   container the image is shown in;
//! - **source space**: `f64` pixels in the natural resolution of the image.

use crate::config::{MAX_ZOOM, MIN_ZOOM};

/// A position in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset that takes `origin` to `self`.
    #[must_use]
    pub fn delta_from(self, origin: Point) -> Vector {
        Vector::new(self.x - origin.x, self.y - origin.y)
    }
}

/// A displacement in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// One of the four resize handles of the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Corner {
    /// Hit-test order. North-west wins when zones overlap on a tiny rectangle.
    pub const ALL: [Corner; 4] = [
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthWest,
        Corner::SouthEast,
    ];

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Corner::NorthWest => Corner::SouthEast,
            Corner::NorthEast => Corner::SouthWest,
            Corner::SouthWest => Corner::NorthEast,
            Corner::SouthEast => Corner::NorthWest,
        }
    }

    /// Whether dragging this corner grows the rectangle towards the left edge.
    #[must_use]
    pub fn is_west(self) -> bool {
        matches!(self, Corner::NorthWest | Corner::SouthWest)
    }

    /// Whether dragging this corner grows the rectangle towards the top edge.
    #[must_use]
    pub fn is_north(self) -> bool {
        matches!(self, Corner::NorthWest | Corner::NorthEast)
    }
}

/// The crop region, in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::NorthWest => Point::new(self.x, self.y),
            Corner::NorthEast => Point::new(self.right(), self.y),
            Corner::SouthWest => Point::new(self.x, self.bottom()),
            Corner::SouthEast => Point::new(self.right(), self.bottom()),
        }
    }

    /// True when `point` lies strictly inside the rectangle (edges excluded).
    #[must_use]
    pub fn contains_strict(&self, point: Point) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    #[must_use]
    pub fn translated(&self, delta: Vector) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Whether every coordinate is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// An axis-aligned region the crop rectangle must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }

    #[must_use]
    pub fn intersect(&self, other: &Bounds) -> Bounds {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        Bounds {
            left,
            top,
            right: self.right.min(other.right).max(left),
            bottom: self.bottom.min(other.bottom).max(top),
        }
    }

    #[must_use]
    pub fn contains_rect(&self, rect: &CropRect, tolerance: f32) -> bool {
        rect.x >= self.left - tolerance
            && rect.y >= self.top - tolerance
            && rect.right() <= self.right + tolerance
            && rect.bottom() <= self.bottom + tolerance
    }
}

/// A region of the source image, in natural pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// How the source image is laid out inside its container.
///
/// `display_width`/`display_height` are the on-screen size including any
/// zoom factor, so every mapping derived from these metrics stays correct at
/// any zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDisplayMetrics {
    pub natural_width: u32,
    pub natural_height: u32,
    pub display_width: f32,
    pub display_height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub container_width: f32,
    pub container_height: f32,
}

impl ImageDisplayMetrics {
    /// Contain-fits the image in the container, scales it by `zoom` and
    /// centers it.
    ///
    /// Offsets become negative once the zoomed image overflows the container.
    /// A non-finite or non-positive zoom is treated as `1.0`; others are
    /// clamped to `MIN_ZOOM..=MAX_ZOOM`.
    #[must_use]
    pub fn contain(
        natural_width: u32,
        natural_height: u32,
        container_width: f32,
        container_height: f32,
        zoom: f32,
    ) -> Self {
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
        let container_width = container_width.max(0.0);
        let container_height = container_height.max(0.0);

        let (base_width, base_height) = if natural_width == 0
            || natural_height == 0
            || container_width <= 0.0
            || container_height <= 0.0
        {
            (0.0, 0.0)
        } else {
            let img_aspect = natural_width as f32 / natural_height as f32;
            let container_aspect = container_width / container_height;
            if img_aspect > container_aspect {
                // Image is wider - fit to width
                (container_width, container_width / img_aspect)
            } else {
                // Image is taller - fit to height
                (container_height * img_aspect, container_height)
            }
        };

        let display_width = base_width * zoom;
        let display_height = base_height * zoom;

        Self {
            natural_width,
            natural_height,
            display_width,
            display_height,
            offset_x: (container_width - display_width) / 2.0,
            offset_y: (container_height - display_height) / 2.0,
            container_width,
            container_height,
        }
    }

    /// The displayed image rectangle in container coordinates.
    #[must_use]
    pub fn image_bounds(&self) -> Bounds {
        Bounds::new(
            self.offset_x,
            self.offset_y,
            self.offset_x + self.display_width,
            self.offset_y + self.display_height,
        )
    }

    /// Region the crop rectangle may occupy: the visible part of the image.
    #[must_use]
    pub fn crop_bounds(&self) -> Bounds {
        let container = Bounds::new(0.0, 0.0, self.container_width, self.container_height);
        self.image_bounds().intersect(&container)
    }

    /// True when there is no usable area to crop from.
    #[must_use]
    pub fn is_degenerate(&self, epsilon: f32) -> bool {
        let bounds = self.crop_bounds();
        self.natural_width == 0
            || self.natural_height == 0
            || !(self.display_width.is_finite() && self.display_height.is_finite())
            || bounds.width() < epsilon
            || bounds.height() < epsilon
    }

    /// Source pixels per display pixel, horizontally.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        f64::from(self.natural_width) / f64::from(self.display_width)
    }

    /// Source pixels per display pixel, vertically.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        f64::from(self.natural_height) / f64::from(self.display_height)
    }
}
