use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by the cairo drawer.
///
/// Contract violations by the caller (too few polygon points, too few wavy
/// segments) are not represented here; they panic.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Failed to encode PNG: {0}")]
    Png(#[from] cairo::IoError),

    #[error("Invalid canvas size {width}x{height}")]
    CanvasSize { width: i32, height: i32 },
}

/// Errors raised while loading drawing options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
