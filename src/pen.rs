//! Pen state and the guards that put cairo state back after a primitive.

use cairo::{Context, LineCap, LineJoin};

use crate::{colour::DrawColour, options::DEFAULT_FONT_SIZE};

/// Stroke and gap lengths for a dashed line; empty means solid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashPattern(Vec<f64>);

impl DashPattern {
    pub fn new(lengths: impl Into<Vec<f64>>) -> Self {
        Self(lengths.into())
    }

    pub fn solid() -> Self {
        Self::default()
    }

    pub fn is_solid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn lengths(&self) -> &[f64] {
        &self.0
    }

    /// Install the pattern on `ctx` with zero phase.
    pub(crate) fn apply(&self, ctx: &Context) {
        // cairo copies the dash array, so borrowing it for the call is enough.
        ctx.set_dash(&self.0, 0.0);
    }
}

/// The caller-controlled drawing state that changes between primitives.
#[derive(Clone, Debug)]
pub struct PenState {
    pub colour: DrawColour,
    pub line_width: f64,
    pub dash: DashPattern,
    pub fill_polys: bool,
    pub font_size: f64,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            colour: DrawColour::BLACK,
            line_width: 2.0,
            dash: DashPattern::solid(),
            fill_polys: true,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Restores the line cap and join that were active when it was created.
pub(crate) struct LineStyleGuard<'a> {
    ctx: &'a Context,
    cap: LineCap,
    join: LineJoin,
}

impl<'a> LineStyleGuard<'a> {
    pub(crate) fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            cap: ctx.line_cap(),
            join: ctx.line_join(),
        }
    }
}

impl Drop for LineStyleGuard<'_> {
    fn drop(&mut self) {
        self.ctx.set_line_cap(self.cap);
        self.ctx.set_line_join(self.join);
    }
}

/// Puts the cairo font size back to `restore_to` when dropped.
pub(crate) struct FontSizeGuard<'a> {
    ctx: &'a Context,
    restore_to: f64,
}

impl<'a> FontSizeGuard<'a> {
    pub(crate) fn new(ctx: &'a Context, restore_to: f64) -> Self {
        Self { ctx, restore_to }
    }
}

impl Drop for FontSizeGuard<'_> {
    fn drop(&mut self) {
        self.ctx.set_font_size(self.restore_to);
    }
}
