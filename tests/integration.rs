// SPDX-License-Identifier: MPL-2.0
use image_rs::{ImageFormat, Rgba, RgbaImage};
use lens_crop::config::{self, Config};
use lens_crop::crop::{Container, CropEngine, PointerEvent, PointerKind, SessionPhase};
use lens_crop::domain::{BitmapFormat, CropRect, OutputSpec, Point};
use lens_crop::media::ImageSource;
use tempfile::tempdir;

fn write_fixture(path: &std::path::Path) {
    let image = RgbaImage::from_fn(320, 240, |x, _| {
        if x < 160 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    image
        .save_with_format(path, ImageFormat::Png)
        .expect("Failed to write fixture image");
}

#[test]
fn test_full_session_from_file() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let input = dir.path().join("input.png");
    write_fixture(&input);

    let mut engine = CropEngine::default();
    let request = engine.start(
        ImageSource::File(input),
        Container::new(320.0, 240.0),
        OutputSpec::circle(128),
        None,
    );
    assert_eq!(engine.phase(), SessionPhase::Loading);

    let handle = engine
        .on_image_loaded(request.run_blocking())
        .expect("Failed to decode fixture")
        .expect("Load belongs to the open session");
    let start = handle.crop_rect.expect("Fixture has a usable area");

    // Drag the selection fully into the left (red) half.
    let grab = start.center();
    engine.handle_pointer(PointerEvent::Start {
        position: grab,
        kind: PointerKind::Touch,
    });
    engine.handle_pointer(PointerEvent::Move(Point::new(grab.x - 500.0, grab.y)));
    engine.handle_pointer(PointerEvent::End);

    let rect = engine.crop_rect().expect("rect");
    assert_eq!(rect.x, 0.0);
    assert_eq!(rect.width, start.width);

    let confirmation = engine
        .confirm()
        .expect("Encoding failed")
        .expect("Session has a rect");
    assert_eq!(confirmation.bitmap.format, BitmapFormat::Jpeg);
    assert_eq!((confirmation.bitmap.width, confirmation.bitmap.height), (128, 128));

    let decoded = image_rs::load_from_memory(&confirmation.bitmap.bytes)
        .expect("Output is a valid JPEG")
        .to_rgb8();
    let center = decoded.get_pixel(64, 64);
    assert!(center[0] > 200 && center[2] < 60, "center is red, got {center:?}");
    let corner = decoded.get_pixel(0, 0);
    assert!(corner.0.iter().all(|c| *c > 230), "corner is background, got {corner:?}");

    // Reopening with the confirmed rect restores the selection.
    let reopened = engine.start_with_image(
        RgbaImage::from_pixel(320, 240, Rgba([0, 0, 0, 255])),
        Container::new(320.0, 240.0),
        OutputSpec::circle(128),
        Some(confirmation.crop_rect),
    );
    assert_eq!(reopened.crop_rect, Some(confirmation.crop_rect));

    dir.close().expect("Failed to close temporary directory");
}

#[test]
fn test_settings_drive_engine() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let custom = Config {
        initial_fraction: Some(0.5),
        ..Config::default()
    };
    config::save_to_path(&custom, &path).expect("Failed to write config file");
    let loaded = config::load_from_path(&path).expect("Failed to load config file");
    assert_eq!(loaded, custom);

    let mut engine = CropEngine::new(loaded.engine_settings());
    let handle = engine.start_with_image(
        RgbaImage::new(400, 400),
        Container::new(400.0, 400.0),
        OutputSpec::square(200),
        None,
    );
    assert_eq!(handle.crop_rect, Some(CropRect::new(100.0, 100.0, 200.0, 200.0)));

    dir.close().expect("Failed to close temporary directory");
}

#[test]
fn test_cancelled_session_produces_nothing() {
    let mut engine = CropEngine::default();
    engine.start_with_image(
        RgbaImage::new(100, 100),
        Container::new(100.0, 100.0),
        OutputSpec::default(),
        None,
    );
    engine.cancel();

    assert_eq!(engine.phase(), SessionPhase::Cancelled);
    assert!(engine.confirm().expect("No error").is_none());
}
