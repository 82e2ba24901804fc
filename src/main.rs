// SPDX-License-Identifier: MPL-2.0
use lens_crop::config::{self, Config};
use lens_crop::crop::{Container, CropEngine};
use lens_crop::domain::{BitmapFormat, CropRect, OutputEncoding, OutputFrame, OutputShape, OutputSpec};
use lens_crop::media::{self, ImageSource};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Crop an image into a square or circular bitmap.

USAGE:
  lens_crop <INPUT> --output <FILE> [OPTIONS]

OPTIONS:
  -o, --output <FILE>       Where to write the bitmap
  --size <N>                Output edge length in pixels
  --ratio <R|free>          Locked width/height ratio (default 1)
  --shape <square|circle>   Output shape (default square)
  --frame <square|match>    Output frame (default square)
  --format <jpeg|png>       Encoding (default from the output extension)
  --quality <Q>             JPEG quality, 1-100
  --rect <x,y,w,h>          Crop rect from a previous run, in display pixels
  --container <WxH>         Display container size (default image size)
  --zoom <Z>                Display zoom factor (default 1)
  --config <PATH>           Settings file to use instead of the default
  -h, --help                Print this help
";

struct Args {
    input: PathBuf,
    output: PathBuf,
    size: Option<u32>,
    ratio: Option<Option<f32>>,
    shape: OutputShape,
    frame: OutputFrame,
    format: Option<Format>,
    quality: Option<u8>,
    rect: Option<CropRect>,
    container: Option<(f32, f32)>,
    zoom: f32,
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq)]
enum Format {
    Jpeg,
    Png,
}

fn parse_shape(value: &str) -> Result<OutputShape, String> {
    match value {
        "square" => Ok(OutputShape::Square),
        "circle" => Ok(OutputShape::Circle),
        other => Err(format!("unknown shape '{other}'")),
    }
}

fn parse_frame(value: &str) -> Result<OutputFrame, String> {
    match value {
        "square" => Ok(OutputFrame::Square),
        "match" => Ok(OutputFrame::MatchAspect),
        other => Err(format!("unknown frame '{other}'")),
    }
}

fn parse_format(value: &str) -> Result<Format, String> {
    match value.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => Ok(Format::Jpeg),
        "png" => Ok(Format::Png),
        other => Err(format!("unknown format '{other}'")),
    }
}

/// Picks the encoding from the output extension, JPEG unless it names PNG.
fn format_for_path(path: &Path) -> Format {
    let png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BitmapFormat::Png.extension()));
    if png {
        Format::Png
    } else {
        Format::Jpeg
    }
}

fn parse_ratio(value: &str) -> Result<Option<f32>, String> {
    if value == "free" {
        return Ok(None);
    }
    let ratio = match value.split_once(':') {
        Some((w, h)) => {
            let w: f32 = w.parse().map_err(|e| format!("invalid ratio: {e}"))?;
            let h: f32 = h.parse().map_err(|e| format!("invalid ratio: {e}"))?;
            w / h
        }
        None => value.parse().map_err(|e| format!("invalid ratio: {e}"))?,
    };
    if ratio.is_finite() && ratio > 0.0 {
        Ok(Some(ratio))
    } else {
        Err(format!("ratio must be positive, got '{value}'"))
    }
}

fn parse_rect(value: &str) -> Result<CropRect, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid rect: {e}"))?;
    match parts.as_slice() {
        [x, y, width, height] => Ok(CropRect::new(*x, *y, *width, *height)),
        _ => Err(format!("rect needs x,y,w,h, got '{value}'")),
    }
}

fn parse_container(value: &str) -> Result<(f32, f32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("container needs WxH, got '{value}'"))?;
    let width = width.parse().map_err(|e| format!("invalid container width: {e}"))?;
    let height = height.parse().map_err(|e| format!("invalid container height: {e}"))?;
    Ok((width, height))
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let parsed = Args {
        output: args.value_from_str(["-o", "--output"])?,
        size: args.opt_value_from_str("--size")?,
        ratio: args.opt_value_from_fn("--ratio", parse_ratio)?,
        shape: args
            .opt_value_from_fn("--shape", parse_shape)?
            .unwrap_or_default(),
        frame: args
            .opt_value_from_fn("--frame", parse_frame)?
            .unwrap_or_default(),
        format: args.opt_value_from_fn("--format", parse_format)?,
        quality: args.opt_value_from_str("--quality")?,
        rect: args.opt_value_from_fn("--rect", parse_rect)?,
        container: args.opt_value_from_fn("--container", parse_container)?,
        zoom: args.opt_value_from_str("--zoom")?.unwrap_or(1.0),
        config: args.opt_value_from_str("--config")?,
        input: args.free_from_str()?,
    };

    let rest: Vec<OsString> = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "ignoring unused arguments");
    }
    Ok(Some(parsed))
}

fn output_spec(args: &Args, config: &Config) -> OutputSpec {
    let size = args
        .size
        .unwrap_or_else(|| config.output_size())
        .clamp(1, config::MAX_OUTPUT_SIZE);
    let base = match args.shape {
        OutputShape::Circle => OutputSpec::circle(size),
        OutputShape::Square => OutputSpec::square(size),
    };
    let format = args.format.unwrap_or_else(|| format_for_path(&args.output));
    let encoding = match format {
        Format::Png => OutputEncoding::Png,
        Format::Jpeg => OutputEncoding::Jpeg {
            quality: args.quality.unwrap_or_else(|| config.jpeg_quality()).clamp(1, 100),
        },
    };

    let spec = OutputSpec {
        frame: args.frame,
        ..base.with_encoding(encoding)
    };
    match (args.shape, args.ratio) {
        // A circle is always inscribed in a square selection.
        (OutputShape::Circle, _) | (_, None) => spec,
        (OutputShape::Square, Some(ratio)) => spec.with_aspect_ratio(ratio),
    }
}

fn run(args: Args) -> lens_crop::error::Result<()> {
    let config = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };

    let image = media::load_image(&ImageSource::File(args.input.clone()))?;
    let (width, height) = args
        .container
        .unwrap_or((image.width() as f32, image.height() as f32));
    let container = Container::new(width, height).with_zoom(args.zoom);
    let spec = output_spec(&args, &config);

    let mut engine = CropEngine::new(config.engine_settings());
    engine.start_with_image(image, container, spec, args.rect);

    let Some(confirmation) = engine.confirm()? else {
        return Err(lens_crop::error::Error::Encode(
            "image has no area to crop".into(),
        ));
    };
    std::fs::write(&args.output, &confirmation.bitmap.bytes)?;

    let rect = confirmation.crop_rect;
    tracing::info!(
        output = %args.output.display(),
        mime = confirmation.bitmap.format.mime_type(),
        "bitmap written"
    );
    println!("{},{},{},{}", rect.x, rect.y, rect.width, rect.height);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("Error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "crop failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_extension_picks_format() {
        assert!(format_for_path(Path::new("avatar.PNG")) == Format::Png);
        assert!(format_for_path(Path::new("avatar.jpg")) == Format::Jpeg);
        assert!(format_for_path(Path::new("avatar")) == Format::Jpeg);
    }

    #[test]
    fn rect_and_ratio_parse() {
        assert_eq!(parse_rect("1,2,3,4"), Ok(CropRect::new(1.0, 2.0, 3.0, 4.0)));
        assert!(parse_rect("1,2,3").is_err());
        assert_eq!(parse_ratio("16:8"), Ok(Some(2.0)));
        assert_eq!(parse_ratio("free"), Ok(None));
        assert!(parse_ratio("0").is_err());
    }
}
