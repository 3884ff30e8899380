//! Points in the two coordinate spaces a drawing passes through.
//!
//! Layout code works in molecule space ([`MolPoint`]); cairo only ever sees
//! canvas space ([`CanvasPoint`]). The two are separate types so a point can
//! only cross over through a [`CoordinateMapper`](crate::CoordinateMapper).

use std::ops::{Add, Div, Mul, Neg, Sub};

/// A point (or displacement) in the caller's molecule coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MolPoint {
    pub x: f64,
    pub y: f64,
}

/// A point in canvas pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl MolPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or the zero vector for a zero-length input.
    pub fn normalized(self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Self::default();
        }
        Self {
            x: self.x / length,
            y: self.y / length,
        }
    }
}

impl CanvasPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for MolPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for MolPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for MolPoint {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for MolPoint {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for MolPoint {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Unit vector perpendicular to the line from `from` to `to`.
///
/// Rotates `from - to` by a quarter turn, so for a line running along +x the
/// result points along -y. A zero-length line yields the zero vector.
pub fn perpendicular(from: MolPoint, to: MolPoint) -> MolPoint {
    let along = from - to;
    MolPoint::new(-along.y, along.x).normalized()
}

/// Axis-aligned extent of a set of molecule-space points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Smallest box containing every point, or `None` when there are no points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = MolPoint>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let init = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(points.fold(init, |bounds, p| Self {
            min_x: bounds.min_x.min(p.x),
            max_x: bounds.max_x.max(p.x),
            min_y: bounds.min_y.min(p.y),
            max_y: bounds.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
