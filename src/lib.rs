// SPDX-License-Identifier: MPL-2.0
//! `lens_crop` is the crop region engine of an interactive image crop editor.
//!
//! It keeps a crop rectangle valid under mouse and touch gestures, maps it
//! from display space to source pixels, and rasterizes the selection into a
//! fixed-size square or circular bitmap. The [`ui`] module hosts the engine
//! in an iced canvas.

#![doc(html_root_url = "https://docs.rs/lens_crop/0.3.0")]

pub mod config;
pub mod crop;
pub mod domain;
pub mod error;
pub mod media;
pub mod ui;
