//! The cairo drawing session.

use cairo::{Context, Format, ImageSurface, LineCap, LineJoin};
use log::debug;

use crate::{
    colour::DrawColour,
    error::DrawError,
    geometry::{CanvasPoint, MolPoint},
    options::DrawOptions,
    pen::{DashPattern, FontSizeGuard, LineStyleGuard, PenState},
    text::{self, CairoGlyphMetrics, GlyphExtents, GlyphMetrics, LabelSize, TextDrawMode},
    transform::{CoordinateMapper, Transform},
    wavy::wavy_segments,
};

/// A period drawn at the normal size looks too light next to other glyphs.
const PERIOD_FONT_SCALE: f64 = 1.5;
/// Font size of sub- and superscript glyphs relative to the base size.
const SCRIPT_FONT_SCALE: f64 = 0.75;
/// Line width multiplier per unit of mapper scale when line widths scale.
const LINE_WIDTH_SCALE: f64 = 0.02;

/// A raster canvas plus the pen state used to draw on it.
///
/// Primitives take molecule-space points and map them through `M` before
/// handing them to cairo; [`draw_char`](Self::draw_char) is the exception and
/// takes a canvas point. One session renders one diagram: call
/// [`init_drawing`](Self::init_drawing) first, issue primitives, then extract
/// the PNG with [`get_drawing_text`](Self::get_drawing_text) or
/// [`write_drawing_text`](Self::write_drawing_text).
pub struct CairoDrawer<M = Transform> {
    pub(crate) surface: ImageSurface,
    ctx: Context,
    mapper: M,
    options: DrawOptions,
    pen: PenState,
}

impl<M: CoordinateMapper> CairoDrawer<M> {
    /// Draw onto an existing image surface.
    pub fn new(surface: ImageSurface, mapper: M, options: DrawOptions) -> Result<Self, DrawError> {
        let ctx = Context::new(&surface)?;
        let pen = PenState {
            line_width: options.line_width,
            font_size: options.font_size,
            ..PenState::default()
        };
        debug!(width = surface.width(), height = surface.height(); "Created drawing session");
        Ok(Self {
            surface,
            ctx,
            mapper,
            options,
            pen,
        })
    }

    /// Allocate a fresh ARGB32 canvas of `width` x `height` pixels.
    pub fn with_size(
        width: i32,
        height: i32,
        mapper: M,
        options: DrawOptions,
    ) -> Result<Self, DrawError> {
        if width <= 0 || height <= 0 {
            return Err(DrawError::CanvasSize { width, height });
        }
        let surface = ImageSurface::create(Format::ARgb32, width, height)?;
        Self::new(surface, mapper, options)
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn set_mapper(&mut self, mapper: M) {
        self.mapper = mapper;
    }

    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    /// Select the configured font and the flat line cap.
    pub fn init_drawing(&mut self) {
        let face = self.options.font_face();
        self.ctx
            .select_font_face(&face.family, face.slant, face.weight);
        self.ctx.set_font_size(self.pen.font_size);
        self.ctx.set_line_cap(LineCap::Butt);
        debug!(family = face.family.as_str(), font_size = self.pen.font_size; "Initialised drawing");
    }

    /// Nothing is buffered by this backend; safe to call at any point.
    pub fn finish_drawing(&mut self) {}

    pub fn colour(&self) -> DrawColour {
        self.pen.colour
    }

    pub fn set_colour(&mut self, colour: DrawColour) {
        self.pen.colour = colour;
        colour.apply(&self.ctx);
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.pen.line_width = width;
    }

    pub fn set_dash(&mut self, dash: DashPattern) {
        self.pen.dash = dash;
    }

    pub fn set_fill_polys(&mut self, fill: bool) {
        self.pen.fill_polys = fill;
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.pen.font_size = size;
    }

    /// Line width in whole canvas pixels.
    pub fn draw_line_width(&self) -> f64 {
        let mut width = self.pen.line_width;
        if self.options.scale_line_width {
            width *= self.mapper.scale() * LINE_WIDTH_SCALE;
        }
        width.max(0.0).trunc()
    }

    /// Base font size converted to canvas pixels.
    pub fn draw_font_size(&self) -> f64 {
        self.pen.font_size * self.mapper.scale()
    }

    fn move_to(&self, point: CanvasPoint) {
        self.ctx.move_to(point.x, point.y);
    }

    fn line_to(&self, point: CanvasPoint) {
        self.ctx.line_to(point.x, point.y);
    }

    /// Stroke a straight line with the current width and dash pattern.
    pub fn draw_line(&mut self, from: MolPoint, to: MolPoint) -> Result<(), DrawError> {
        let start = self.mapper.to_canvas(from);
        let end = self.mapper.to_canvas(to);

        self.ctx.set_line_width(self.draw_line_width());
        self.pen.dash.apply(&self.ctx);

        self.move_to(start);
        self.line_to(end);
        self.ctx.stroke()?;
        Ok(())
    }

    /// Stroke a squiggle of bezier arcs alternating either side of the line.
    ///
    /// Only `colour1` is used unless the session was configured with
    /// `split_wavy_colours`, in which case the second half of the arcs is
    /// stroked in `colour2`. The pen colour is left at the last colour used.
    ///
    /// # Panics
    ///
    /// Panics if `n_segments` is less than 2.
    pub fn draw_wavy_line(
        &mut self,
        from: MolPoint,
        to: MolPoint,
        colour1: DrawColour,
        colour2: DrawColour,
        n_segments: u32,
        vert_offset: f64,
    ) -> Result<(), DrawError> {
        let segments = wavy_segments(from, to, n_segments, vert_offset);
        let split_at = (self.options.split_wavy_colours && colour1 != colour2)
            .then_some(segments.len() / 2);

        self.ctx.set_line_width(self.draw_line_width());
        DashPattern::solid().apply(&self.ctx);
        self.set_colour(colour1);
        self.move_to(self.mapper.to_canvas(from));
        for (i, segment) in segments.iter().enumerate() {
            if split_at == Some(i) {
                self.ctx.stroke()?;
                self.set_colour(colour2);
                self.move_to(self.mapper.to_canvas(segment.start));
            }
            let c1 = self.mapper.to_canvas(segment.control1);
            let c2 = self.mapper.to_canvas(segment.control2);
            let end = self.mapper.to_canvas(segment.end);
            self.ctx.curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
        }
        self.ctx.stroke()?;
        Ok(())
    }

    /// Draw one character with its baseline-left corner at `at`.
    ///
    /// `at` is already in canvas space. A period is drawn half as large
    /// again as other glyphs. The cairo font size is back at the base size
    /// afterwards so label measurement is unaffected.
    pub fn draw_char(&mut self, c: char, at: CanvasPoint) -> Result<(), DrawError> {
        self.show_glyph(c, at, self.pen.font_size)
    }

    fn show_glyph(&self, c: char, at: CanvasPoint, font_size: f64) -> Result<(), DrawError> {
        let _restore = FontSizeGuard::new(&self.ctx, self.pen.font_size);
        let mut size = font_size * self.mapper.scale();
        if c == '.' {
            size *= PERIOD_FONT_SCALE;
        }
        self.ctx.set_font_size(size);

        let mut buf = [0u8; 4];
        self.move_to(at);
        self.ctx.show_text(c.encode_utf8(&mut buf))?;
        self.ctx.stroke()?;
        Ok(())
    }

    /// Outline (and, if the pen fills polygons, fill) the closed shape
    /// through `points`.
    ///
    /// Strokes are solid with flat caps and bevelled joins; the previous cap
    /// and join are restored afterwards.
    ///
    /// # Panics
    ///
    /// Panics if fewer than three points are given.
    pub fn draw_polygon(&mut self, points: &[MolPoint]) -> Result<(), DrawError> {
        assert!(
            points.len() >= 3,
            "must have at least three points, got {}",
            points.len()
        );

        let width = self.draw_line_width();
        let _style = LineStyleGuard::new(&self.ctx);
        self.ctx.set_line_cap(LineCap::Butt);
        self.ctx.set_line_join(LineJoin::Bevel);
        DashPattern::solid().apply(&self.ctx);
        self.ctx.set_line_width(width);

        if let Some((first, rest)) = points.split_first() {
            self.move_to(self.mapper.to_canvas(*first));
            for point in rest {
                self.line_to(self.mapper.to_canvas(*point));
            }
        }

        if self.pen.fill_polys {
            self.ctx.close_path();
            self.ctx.fill_preserve()?;
        }
        self.ctx.stroke()?;
        Ok(())
    }

    pub fn draw_triangle(&mut self, a: MolPoint, b: MolPoint, c: MolPoint) -> Result<(), DrawError> {
        self.draw_polygon(&[a, b, c])
    }

    /// Axis-aligned rectangle with opposite corners `corner1` and `corner2`.
    pub fn draw_rect(&mut self, corner1: MolPoint, corner2: MolPoint) -> Result<(), DrawError> {
        self.draw_polygon(&[
            corner1,
            MolPoint::new(corner2.x, corner1.y),
            corner2,
            MolPoint::new(corner1.x, corner2.y),
        ])
    }

    /// Paint the whole canvas in the configured background colour.
    pub fn clear_drawing(&mut self) -> Result<(), DrawError> {
        self.set_colour(self.options.background);
        self.ctx
            .rectangle(0.0, 0.0, self.width() as f64, self.height() as f64);
        self.ctx.fill()?;
        Ok(())
    }

    /// Estimate the size of `label` at the base font size, honouring
    /// `<sub>`/`<sup>` markup.
    pub fn get_string_size(&self, label: &str) -> Result<LabelSize, DrawError> {
        let _restore = FontSizeGuard::new(&self.ctx, self.pen.font_size);
        self.ctx.set_font_size(self.pen.font_size);
        text::measure_label(&CairoGlyphMetrics::new(&self.ctx), label)
    }

    /// Raw extents of one glyph at the base font size.
    fn glyph_extents(&self, glyph: char) -> Result<GlyphExtents, DrawError> {
        let _restore = FontSizeGuard::new(&self.ctx, self.pen.font_size);
        self.ctx.set_font_size(self.pen.font_size);
        CairoGlyphMetrics::new(&self.ctx).glyph_extents(glyph)
    }

    /// Draw `label` glyph by glyph with its baseline-left corner at `anchor`.
    ///
    /// Sub- and superscripts are drawn smaller, half a glyph height below or
    /// above the baseline, and advance by the same narrowed width that
    /// [`get_string_size`](Self::get_string_size) counts for them.
    pub fn draw_string(&mut self, label: &str, anchor: MolPoint) -> Result<(), DrawError> {
        let scale = self.mapper.scale();
        let mut cursor = self.mapper.to_canvas(anchor);

        for (glyph, mode) in text::label_glyphs(label) {
            let (rise, advance) = text::glyph_offset(mode, self.glyph_extents(glyph)?);
            let font_size = match mode {
                TextDrawMode::Normal => self.pen.font_size,
                TextDrawMode::Subscript | TextDrawMode::Superscript => {
                    self.pen.font_size * SCRIPT_FONT_SCALE
                }
            };
            self.show_glyph(glyph, CanvasPoint::new(cursor.x, cursor.y + rise * scale), font_size)?;
            cursor.x += advance * scale;
        }
        Ok(())
    }

    /// Give up the session and return the canvas it drew on.
    pub fn into_surface(self) -> ImageSurface {
        let Self { surface, ctx, .. } = self;
        drop(ctx);
        surface
    }
}

#[cfg(test)]
mod tests {
    use cairo::{FontSlant, FontWeight};
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::options::DEFAULT_FONT_SIZE;

    /// Molecule units are canvas pixels with y pointing down.
    struct Identity;

    impl CoordinateMapper for Identity {
        fn to_canvas(&self, point: MolPoint) -> CanvasPoint {
            CanvasPoint::new(point.x, point.y)
        }
    }

    struct Doubling;

    impl CoordinateMapper for Doubling {
        fn to_canvas(&self, point: MolPoint) -> CanvasPoint {
            CanvasPoint::new(point.x * 2.0, point.y * 2.0)
        }

        fn scale(&self) -> f64 {
            2.0
        }
    }

    fn drawer() -> CairoDrawer<Identity> {
        let mut drawer = CairoDrawer::with_size(40, 40, Identity, DrawOptions::default()).unwrap();
        drawer.init_drawing();
        drawer
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let err = CairoDrawer::with_size(0, 10, Identity, DrawOptions::default()).err();
        assert!(matches!(
            err,
            Some(DrawError::CanvasSize {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn init_sets_butt_cap_and_base_font_size() {
        let drawer = drawer();
        assert_eq!(drawer.ctx.line_cap(), LineCap::Butt);
        assert_approx_eq!(f64, drawer.ctx.font_matrix().xx(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn finish_without_drawing_is_harmless() {
        let mut drawer = drawer();
        drawer.finish_drawing();
        drawer.finish_drawing();
    }

    #[test]
    fn pen_starts_from_options() {
        let options = DrawOptions {
            line_width: 3.0,
            font_size: 0.5,
            ..DrawOptions::default()
        };
        let drawer = CairoDrawer::with_size(10, 10, Identity, options).unwrap();
        assert_approx_eq!(f64, drawer.pen().line_width, 3.0);
        assert_approx_eq!(f64, drawer.pen().font_size, 0.5);
    }

    #[test]
    fn set_colour_updates_pen_and_source() {
        let mut drawer = drawer();
        let red = DrawColour::new(1.0, 0.0, 0.0);
        drawer.set_colour(red);
        assert_eq!(drawer.colour(), red);
    }

    #[test]
    fn line_width_is_whole_pixels() {
        let mut drawer = drawer();
        drawer.set_line_width(2.7);
        assert_approx_eq!(f64, drawer.draw_line_width(), 2.0);
        drawer.set_line_width(-1.0);
        assert_approx_eq!(f64, drawer.draw_line_width(), 0.0);
    }

    #[test]
    fn scaled_line_width_follows_mapper() {
        let options = DrawOptions {
            scale_line_width: true,
            line_width: 50.0,
            ..DrawOptions::default()
        };
        let drawer = CairoDrawer::with_size(10, 10, Doubling, options).unwrap();
        // 50 * 2 * 0.02
        assert_approx_eq!(f64, drawer.draw_line_width(), 2.0);
    }

    #[test]
    fn draw_font_size_scales_with_mapper() {
        let drawer = CairoDrawer::with_size(10, 10, Doubling, DrawOptions::default()).unwrap();
        assert_approx_eq!(f64, drawer.draw_font_size(), DEFAULT_FONT_SIZE * 2.0);
    }

    #[test]
    fn line_applies_dash_pattern_and_width() {
        let mut drawer = drawer();
        drawer.set_line_width(3.0);
        drawer.set_dash(DashPattern::new(vec![2.0, 1.0]));
        drawer
            .draw_line(MolPoint::new(0.0, 5.0), MolPoint::new(30.0, 5.0))
            .unwrap();
        assert_eq!(drawer.ctx.dash(), (vec![2.0, 1.0], 0.0));
        assert_approx_eq!(f64, drawer.ctx.line_width(), 3.0);

        drawer.set_dash(DashPattern::solid());
        drawer
            .draw_line(MolPoint::new(0.0, 5.0), MolPoint::new(30.0, 5.0))
            .unwrap();
        assert_eq!(drawer.ctx.dash_count(), 0);
    }

    #[test]
    fn wavy_line_clears_dash_and_takes_first_colour() {
        let mut drawer = drawer();
        drawer.set_dash(DashPattern::new(vec![1.0, 1.0]));
        let blue = DrawColour::new(0.0, 0.0, 1.0);
        let green = DrawColour::new(0.0, 1.0, 0.0);
        drawer
            .draw_wavy_line(MolPoint::new(2.0, 20.0), MolPoint::new(38.0, 20.0), blue, green, 5, 3.0)
            .unwrap();
        assert_eq!(drawer.ctx.dash_count(), 0);
        assert_eq!(drawer.colour(), blue);
    }

    #[test]
    fn split_wavy_line_ends_on_second_colour() {
        let options = DrawOptions {
            split_wavy_colours: true,
            ..DrawOptions::default()
        };
        let mut drawer = CairoDrawer::with_size(40, 40, Identity, options).unwrap();
        let blue = DrawColour::new(0.0, 0.0, 1.0);
        let green = DrawColour::new(0.0, 1.0, 0.0);
        drawer
            .draw_wavy_line(MolPoint::new(2.0, 20.0), MolPoint::new(38.0, 20.0), blue, green, 4, 3.0)
            .unwrap();
        assert_eq!(drawer.colour(), green);
    }

    #[test]
    #[should_panic(expected = "too few segments")]
    fn wavy_line_needs_two_segments() {
        let mut drawer = drawer();
        let _ = drawer.draw_wavy_line(
            MolPoint::new(0.0, 0.0),
            MolPoint::new(10.0, 0.0),
            DrawColour::BLACK,
            DrawColour::BLACK,
            1,
            1.0,
        );
    }

    #[test]
    fn polygon_restores_cap_and_join() {
        let mut drawer = drawer();
        drawer.ctx.set_line_cap(LineCap::Round);
        drawer.ctx.set_line_join(LineJoin::Round);
        drawer
            .draw_polygon(&[
                MolPoint::new(5.0, 5.0),
                MolPoint::new(30.0, 5.0),
                MolPoint::new(15.0, 30.0),
            ])
            .unwrap();
        assert_eq!(drawer.ctx.line_cap(), LineCap::Round);
        assert_eq!(drawer.ctx.line_join(), LineJoin::Round);
        assert_eq!(drawer.ctx.dash_count(), 0);
    }

    #[test]
    #[should_panic(expected = "at least three points")]
    fn polygon_needs_three_points() {
        let mut drawer = drawer();
        let _ = drawer.draw_polygon(&[MolPoint::new(0.0, 0.0), MolPoint::new(1.0, 1.0)]);
    }

    #[test]
    fn period_size_does_not_leak_into_measurement() {
        let mut drawer = drawer();
        let before = drawer.get_string_size("A").unwrap();
        drawer.draw_char('.', CanvasPoint::new(10.0, 30.0)).unwrap();
        assert_approx_eq!(f64, drawer.ctx.font_matrix().xx(), DEFAULT_FONT_SIZE);
        let after = drawer.get_string_size("A").unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn empty_label_measures_zero() {
        let drawer = drawer();
        assert_eq!(drawer.get_string_size("").unwrap(), LabelSize::default());
    }

    #[test]
    fn draw_string_restores_font_size() {
        let mut drawer = drawer();
        drawer
            .draw_string("CH<sub>3</sub>.", MolPoint::new(2.0, 30.0))
            .unwrap();
        assert_approx_eq!(f64, drawer.ctx.font_matrix().xx(), DEFAULT_FONT_SIZE);
        assert_approx_eq!(f64, drawer.pen().font_size, DEFAULT_FONT_SIZE);
    }

    /// A white 40x40 session in black with a readable base font size.
    fn text_session(font_size: f64) -> CairoDrawer<Identity> {
        let options = DrawOptions {
            font_size,
            ..DrawOptions::default()
        };
        let mut drawer = CairoDrawer::with_size(40, 40, Identity, options).unwrap();
        drawer.init_drawing();
        drawer.clear_drawing().unwrap();
        drawer.set_colour(DrawColour::BLACK);
        drawer
    }

    fn rendered(drawer: CairoDrawer<Identity>) -> Vec<u8> {
        let mut surface = drawer.into_surface();
        surface.flush();
        let bytes = surface.data().unwrap().to_vec();
        bytes
    }

    /// The same canvas drawn on directly with cairo in black sans.
    fn reference(draw: impl FnOnce(&Context)) -> Vec<u8> {
        let mut surface = ImageSurface::create(Format::ARgb32, 40, 40).unwrap();
        {
            let ctx = Context::new(&surface).unwrap();
            DrawColour::WHITE.apply(&ctx);
            ctx.paint().unwrap();
            DrawColour::BLACK.apply(&ctx);
            ctx.select_font_face("sans", FontSlant::Normal, FontWeight::Normal);
            draw(&ctx);
        }
        surface.flush();
        let bytes = surface.data().unwrap().to_vec();
        bytes
    }

    fn glyph_at(glyph: &str, size: f64, x: f64, y: f64) -> Vec<u8> {
        reference(|ctx| {
            ctx.set_font_size(size);
            ctx.move_to(x, y);
            ctx.show_text(glyph).unwrap();
        })
    }

    #[test]
    fn period_is_drawn_half_as_large_again() {
        let mut drawer = text_session(20.0);
        drawer.draw_char('.', CanvasPoint::new(10.0, 30.0)).unwrap();
        let drawn = rendered(drawer);
        assert!(drawn == glyph_at(".", 30.0, 10.0, 30.0));
        assert!(drawn != glyph_at(".", 20.0, 10.0, 30.0));
    }

    #[test]
    fn other_glyphs_use_the_draw_font_size() {
        let mut drawer = text_session(20.0);
        drawer.draw_char('A', CanvasPoint::new(10.0, 30.0)).unwrap();
        assert!(rendered(drawer) == glyph_at("A", 20.0, 10.0, 30.0));
    }

    #[test]
    fn subscript_sits_half_a_glyph_below_the_baseline() {
        let mut drawer = text_session(20.0);
        drawer
            .draw_string("H<sub>2</sub>", MolPoint::new(2.0, 25.0))
            .unwrap();
        let expected = reference(|ctx| {
            ctx.set_font_size(20.0);
            let h = ctx.text_extents("H").unwrap();
            let two = ctx.text_extents("2").unwrap();
            ctx.move_to(2.0, 25.0);
            ctx.show_text("H").unwrap();
            ctx.set_font_size(15.0);
            ctx.move_to(2.0 + h.x_advance(), 25.0 + 0.5 * two.height());
            ctx.show_text("2").unwrap();
        });
        assert!(rendered(drawer) == expected);
    }
}
