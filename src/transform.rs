use crate::geometry::{Bounds, CanvasPoint, MolPoint};

/// Maps molecule-space points onto the canvas.
///
/// Implementations must be deterministic; the drawer calls `to_canvas` for
/// every point it hands to cairo.
pub trait CoordinateMapper {
    fn to_canvas(&self, point: MolPoint) -> CanvasPoint;

    /// Canvas pixels per molecule unit.
    fn scale(&self) -> f64 {
        1.0
    }
}

/// Uniform scale-and-translate mapping with the molecule y axis pointing up.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    min_x: f64,
    min_y: f64,
    scale: f64,
    x_offset: f64,
    y_offset: f64,
    height: f64,
}

impl Transform {
    /// Fit `bounds` into a `width` x `height` canvas, leaving `padding` (a
    /// fraction of each canvas dimension) free on every side and centring
    /// the drawing in the remaining space.
    pub fn fit(bounds: Bounds, width: f64, height: f64, padding: f64) -> Self {
        let span_x = bounds.width().abs().max(1.0);
        let span_y = bounds.height().abs().max(1.0);
        let usable = (1.0 - 2.0 * padding).max(0.0);
        let scale = (width * usable / span_x).min(height * usable / span_y);
        Self {
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            scale,
            x_offset: (width - bounds.width() * scale) / 2.0,
            y_offset: (height - bounds.height() * scale) / 2.0,
            height,
        }
    }

    /// Place molecule point `origin` at the bottom-left corner of the canvas
    /// at the given scale.
    pub fn with_scale(origin: MolPoint, scale: f64, height: f64) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            scale,
            x_offset: 0.0,
            y_offset: 0.0,
            height,
        }
    }
}

impl CoordinateMapper for Transform {
    fn to_canvas(&self, point: MolPoint) -> CanvasPoint {
        let x = (point.x - self.min_x) * self.scale + self.x_offset;
        let y = (point.y - self.min_y) * self.scale + self.y_offset;
        CanvasPoint::new(x, self.height - y)
    }

    fn scale(&self) -> f64 {
        self.scale
    }
}
