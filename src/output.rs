//! PNG extraction for a finished drawing.

use std::{fs::File, path::Path};

use log::{debug, error};

use crate::{drawer::CairoDrawer, error::DrawError, transform::CoordinateMapper};

impl<M: CoordinateMapper> CairoDrawer<M> {
    /// Encode the canvas as PNG into memory.
    ///
    /// cairo hands the encoder output over in chunks; each is appended to the
    /// buffer in the order it was emitted.
    pub fn get_drawing_text(&self) -> Result<Vec<u8>, DrawError> {
        let mut png = Vec::new();
        self.surface.write_to_png(&mut png)?;
        debug!(bytes = png.len(); "Encoded drawing as PNG");
        Ok(png)
    }

    /// Encode the canvas as PNG into the file at `path`.
    ///
    /// A failure to create or write the file is logged and otherwise
    /// ignored; callers that need to know check for the file themselves.
    pub fn write_drawing_text(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let written = File::create(path)
            .map_err(cairo::IoError::from)
            .and_then(|mut file| self.surface.write_to_png(&mut file));
        match written {
            Ok(()) => debug!(path = path.display().to_string(); "Wrote PNG file"),
            Err(err) => error!(reason:% = err; "Failed to write PNG file {}", path.display()),
        }
    }
}
