//! Label markup and text size estimation.
//!
//! Labels may carry `<sub>`/`<sup>` markup. Sizes are estimated glyph by
//! glyph from font extents, then corrected by empirical factors so a label's
//! box matches how it looks on the canvas rather than the raw glyph bounds.

use cairo::Context;

use crate::error::DrawError;

/// Width factor applied to sub- and superscript glyphs.
pub const SCRIPT_WIDTH_FACTOR: f64 = 0.75;
/// Height factor applied when a label contains a superscript.
pub const SUPERSCRIPT_HEIGHT_FACTOR: f64 = 1.25;
/// Height factor applied to every label.
pub const LABEL_HEIGHT_FACTOR: f64 = 1.2;

/// How the glyphs following a markup tag are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextDrawMode {
    #[default]
    Normal,
    Subscript,
    Superscript,
}

const MARKUP_TAGS: [(&str, TextDrawMode); 4] = [
    ("<sub>", TextDrawMode::Subscript),
    ("<sup>", TextDrawMode::Superscript),
    ("</sub>", TextDrawMode::Normal),
    ("</sup>", TextDrawMode::Normal),
];

/// Recognise a markup tag at the start of `rest`, returning the mode it
/// switches to and its length in bytes.
fn markup_tag(rest: &str) -> Option<(TextDrawMode, usize)> {
    MARKUP_TAGS
        .iter()
        .find(|(tag, _)| rest.starts_with(*tag))
        .map(|&(tag, mode)| (mode, tag.len()))
}

/// The literal characters of `label`, each with the mode it is drawn in.
///
/// Tags are consumed and produce no characters. A `<` that does not open one
/// of the four known tags is an ordinary character.
pub fn label_glyphs(label: &str) -> Vec<(char, TextDrawMode)> {
    let mut glyphs = Vec::with_capacity(label.len());
    let mut mode = TextDrawMode::Normal;
    let mut index = 0;
    while let Some(c) = label[index..].chars().next() {
        if c == '<' {
            if let Some((next_mode, len)) = markup_tag(&label[index..]) {
                mode = next_mode;
                index += len;
                continue;
            }
        }
        glyphs.push((c, mode));
        index += c.len_utf8();
    }
    glyphs
}

/// Advance width and ink height of a single glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphExtents {
    pub advance: f64,
    pub height: f64,
}

/// Source of per-glyph extents at the current font size.
pub trait GlyphMetrics {
    fn glyph_extents(&self, glyph: char) -> Result<GlyphExtents, DrawError>;
}

/// Glyph extents from cairo's toy text API, at whatever font is selected on
/// the context.
pub struct CairoGlyphMetrics<'a> {
    ctx: &'a Context,
}

impl<'a> CairoGlyphMetrics<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }
}

impl GlyphMetrics for CairoGlyphMetrics<'_> {
    fn glyph_extents(&self, glyph: char) -> Result<GlyphExtents, DrawError> {
        let mut buf = [0u8; 4];
        let extents = self.ctx.text_extents(glyph.encode_utf8(&mut buf))?;
        Ok(GlyphExtents {
            advance: extents.x_advance(),
            height: extents.height(),
        })
    }
}

/// Baseline shift and advance of a glyph drawn in `mode`.
///
/// Scripts sit half a glyph height below or above the baseline (positive
/// shifts go down the canvas) and advance by the narrowed script width.
pub(crate) fn glyph_offset(mode: TextDrawMode, extents: GlyphExtents) -> (f64, f64) {
    match mode {
        TextDrawMode::Normal => (0.0, extents.advance),
        TextDrawMode::Subscript => (0.5 * extents.height, extents.advance * SCRIPT_WIDTH_FACTOR),
        TextDrawMode::Superscript => {
            (-0.5 * extents.height, extents.advance * SCRIPT_WIDTH_FACTOR)
        }
    }
}

/// Estimated width and height of a label.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabelSize {
    pub width: f64,
    pub height: f64,
}

/// Estimate the size of `label` without drawing it.
///
/// Height is the tallest glyph, not a sum. Sub- and superscript glyphs count
/// for three quarters of their advance; a superscript raises the label height
/// by a quarter, and every label height is then scaled by 1.2.
pub fn measure_label<M>(metrics: &M, label: &str) -> Result<LabelSize, DrawError>
where
    M: GlyphMetrics + ?Sized,
{
    let mut size = LabelSize::default();
    let mut had_superscript = false;

    for (glyph, mode) in label_glyphs(label) {
        let extents = metrics.glyph_extents(glyph)?;
        size.height = size.height.max(extents.height);
        size.width += match mode {
            TextDrawMode::Normal => extents.advance,
            TextDrawMode::Subscript => extents.advance * SCRIPT_WIDTH_FACTOR,
            TextDrawMode::Superscript => {
                had_superscript = true;
                extents.advance * SCRIPT_WIDTH_FACTOR
            }
        };
    }

    if had_superscript {
        size.height *= SUPERSCRIPT_HEIGHT_FACTOR;
    }
    size.height *= LABEL_HEIGHT_FACTOR;
    Ok(size)
}
