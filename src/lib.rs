//! Cairo raster backend for 2D molecule diagrams.
//!
//! A layout engine decides what to draw in molecule coordinates; a
//! [`CairoDrawer`] maps those coordinates onto an ARGB32 canvas, strokes and
//! fills the primitives with cairo, estimates label sizes, and hands the
//! finished canvas back as PNG bytes or a PNG file.
//!
//! ```no_run
//! use moldraw_cairo::{Bounds, CairoDrawer, DrawOptions, MolPoint, Transform};
//!
//! # fn main() -> Result<(), moldraw_cairo::DrawError> {
//! let bounds = Bounds { min_x: 0.0, max_x: 2.0, min_y: 0.0, max_y: 1.0 };
//! let transform = Transform::fit(bounds, 300.0, 200.0, 0.05);
//! let mut drawer = CairoDrawer::with_size(300, 200, transform, DrawOptions::default())?;
//! drawer.init_drawing();
//! drawer.clear_drawing()?;
//! drawer.draw_line(MolPoint::new(0.0, 0.0), MolPoint::new(2.0, 1.0))?;
//! drawer.finish_drawing();
//! let _png = drawer.get_drawing_text()?;
//! # Ok(())
//! # }
//! ```

mod colour;
mod drawer;
mod error;
mod geometry;
mod options;
mod output;
mod pen;
mod text;
mod transform;
mod wavy;

pub use colour::DrawColour;
pub use drawer::CairoDrawer;
pub use error::{ConfigError, DrawError};
pub use geometry::{perpendicular, Bounds, CanvasPoint, MolPoint};
pub use options::{load_options, DrawOptions, FontFace};
pub use pen::{DashPattern, PenState};
pub use text::{
    label_glyphs, measure_label, CairoGlyphMetrics, GlyphExtents, GlyphMetrics, LabelSize,
    TextDrawMode,
};
pub use transform::{CoordinateMapper, Transform};
pub use wavy::{even_segment_count, wavy_segments, BezierSegment};
