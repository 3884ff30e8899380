use serde::Deserialize;

/// An RGB colour with each channel in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct DrawColour {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl DrawColour {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from 8-bit channel values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    pub(crate) fn apply(&self, ctx: &cairo::Context) {
        ctx.set_source_rgb(self.r, self.g, self.b);
    }
}

impl Default for DrawColour {
    fn default() -> Self {
        Self::BLACK
    }
}
