// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    /// The source image could not be read or decoded.
    ///
    /// This is the only failure a crop session surfaces to its caller; the
    /// host is expected to offer a retry.
    ImageLoad(String),
    /// The rasterized crop could not be encoded to the requested format.
    Encode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::ImageLoad(e) => write!(f, "Image Load Error: {}", e),
            Error::Encode(e) => write!(f, "Encode Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        match err {
            image_rs::ImageError::Encoding(e) => Error::Encode(e.to_string()),
            other => Error::ImageLoad(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk full".into());
        assert_eq!(format!("{}", err), "I/O Error: disk full");
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn image_load_error_formats_properly() {
        let err = Error::ImageLoad("truncated".into());
        assert_eq!(format!("{}", err), "Image Load Error: truncated");
    }

    #[test]
    fn from_io_error_maps_to_io_variant() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(msg) if msg.contains("missing")));
    }

    #[test]
    fn decode_failure_maps_to_image_load() {
        let result = image_rs::load_from_memory(b"definitely not an image");
        let err: Error = result.expect_err("garbage must not decode").into();
        assert!(matches!(err, Error::ImageLoad(_)));
    }
}
