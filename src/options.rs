//! Session-wide drawing options and their TOML loader.

use std::{fs, path::Path};

use cairo::{FontSlant, FontWeight};
use log::{debug, info};
use pango::FontDescription;
use serde::Deserialize;

use crate::{colour::DrawColour, error::ConfigError};

/// Default base font size, in molecule units.
pub const DEFAULT_FONT_SIZE: f64 = 0.5;

/// Options fixed for the lifetime of a drawing session.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it changes:
///
/// ```toml
/// font = "Liberation Sans Bold"
/// font_size = 0.6
/// background = { r = 1.0, g = 1.0, b = 0.9 }
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    /// Colour painted by `clear_drawing`.
    pub background: DrawColour,
    /// Pango font description, e.g. `"sans"` or `"DejaVu Serif Italic"`.
    pub font: String,
    /// Base font size in molecule units; glyphs are drawn at this size
    /// times the mapper scale.
    pub font_size: f64,
    /// Line width a new session starts with.
    pub line_width: f64,
    /// Multiply line widths by `scale * 0.02` of the coordinate mapper.
    pub scale_line_width: bool,
    /// Stroke the second half of a wavy line in its second colour.
    pub split_wavy_colours: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            background: DrawColour::WHITE,
            font: String::from("sans"),
            font_size: DEFAULT_FONT_SIZE,
            line_width: 2.0,
            scale_line_width: false,
            split_wavy_colours: false,
        }
    }
}

/// Family, slant and weight for cairo's font selection.
#[derive(Clone, Debug, PartialEq)]
pub struct FontFace {
    pub family: String,
    pub slant: FontSlant,
    pub weight: FontWeight,
}

impl DrawOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Resolve the configured font description into a cairo font face.
    pub fn font_face(&self) -> FontFace {
        let description = FontDescription::from_string(&self.font);
        let family = description
            .family()
            .map(|family| family.to_string())
            .filter(|family| !family.is_empty())
            .unwrap_or_else(|| String::from("sans"));
        let slant = match description.style() {
            pango::Style::Italic => FontSlant::Italic,
            pango::Style::Oblique => FontSlant::Oblique,
            _ => FontSlant::Normal,
        };
        let weight = match description.weight() {
            pango::Weight::Semibold
            | pango::Weight::Bold
            | pango::Weight::Ultrabold
            | pango::Weight::Heavy
            | pango::Weight::Ultraheavy => FontWeight::Bold,
            _ => FontWeight::Normal,
        };
        FontFace {
            family,
            slant,
            weight,
        }
    }
}

/// Load drawing options from `path`, or fall back to defaults when no path
/// is given.
///
/// # Errors
///
/// Returns an error if the explicit path does not exist, cannot be read, or
/// is not valid TOML for [`DrawOptions`].
pub fn load_options(path: Option<impl AsRef<Path>>) -> Result<DrawOptions, ConfigError> {
    let Some(path) = path else {
        debug!("No options file given, using default drawing options");
        return Ok(DrawOptions::default());
    };
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }
    info!(path = path.display().to_string(); "Loading drawing options");
    let content = fs::read_to_string(path)?;
    DrawOptions::from_toml_str(&content)
}
