//! Offscreen drawing surface over the CPU rasterizer.
//!
//! A [`Surface`] records draw calls into a `vello_cpu` render context and
//! rasterizes exactly once when [`Surface::finish`] is called, yielding an
//! immutable [`Raster`] (premultiplied RGBA8). Geometry enters as top-level
//! `kurbo` types and is converted to the backend's `kurbo` at this seam only.
//! Paint state is passed in full on every call; there is no push/pop style stack.

use std::sync::Arc;

use kurbo::Point;

use crate::{
    color::Color,
    error::{EmberdeckError, EmberdeckResult},
    text::TextEngine,
};

pub struct Surface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> EmberdeckResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| EmberdeckError::render("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| EmberdeckError::render("surface height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(EmberdeckError::render("surface dimensions must be > 0"));
        }
        Ok(Self {
            width: width_u16,
            height: height_u16,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Flood the whole canvas with a solid color.
    pub fn fill(&mut self, color: Color) {
        self.begin(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_solid_paint(color);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    pub fn fill_rounded_rect(&mut self, center: Point, w: f64, h: f64, radius: f64, color: Color) {
        use kurbo::Shape as _;
        let rect = kurbo::Rect::from_center_size(center, kurbo::Size::new(w, h));
        let path = rect.to_rounded_rect(radius).to_path(0.1);
        self.begin(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_solid_paint(color);
        self.ctx.fill_path(&bezpath_to_cpu(&path));
    }

    pub fn stroke_rounded_rect(
        &mut self,
        center: Point,
        w: f64,
        h: f64,
        radius: f64,
        weight: f64,
        color: Color,
    ) {
        use kurbo::Shape as _;
        if !weight_drawable(weight) {
            return;
        }
        let rect = kurbo::Rect::from_center_size(center, kurbo::Size::new(w, h));
        let path = rect.to_rounded_rect(radius).to_path(0.1);
        self.begin(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_solid_paint(color);
        self.ctx.set_stroke(stroke_style(weight));
        self.ctx.stroke_path(&bezpath_to_cpu(&path));
    }

    pub fn line(&mut self, from: Point, to: Point, weight: f64, color: Color) {
        if !weight_drawable(weight) {
            return;
        }
        let mut path = kurbo::BezPath::new();
        path.move_to(from);
        path.line_to(to);
        self.begin(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_solid_paint(color);
        self.ctx.set_stroke(stroke_style(weight));
        self.ctx.stroke_path(&bezpath_to_cpu(&path));
    }

    /// Stroke a single cubic Bezier from `p0` to `p3`.
    pub fn cubic(
        &mut self,
        p0: Point,
        p1: Point,
        p2: Point,
        p3: Point,
        weight: f64,
        color: Color,
    ) {
        if !weight_drawable(weight) {
            return;
        }
        let mut path = kurbo::BezPath::new();
        path.move_to(p0);
        path.curve_to(p1, p2, p3);
        self.begin(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_solid_paint(color);
        self.ctx.set_stroke(stroke_style(weight));
        self.ctx.stroke_path(&bezpath_to_cpu(&path));
    }

    /// Composite a finished raster with its top-left corner at `offset`.
    pub fn blit(&mut self, raster: &Raster, offset: Point) {
        self.begin(vello_cpu::kurbo::Affine::translate((offset.x, offset.y)));
        self.ctx.set_paint(raster.paint());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(raster.width()),
            f64::from(raster.height()),
        ));
    }

    /// Draw one line of text centered (both axes) on `center`.
    pub fn text_centered(
        &mut self,
        engine: &mut TextEngine,
        text: &str,
        size_px: f32,
        color: Color,
        center: Point,
    ) -> EmberdeckResult<()> {
        let layout = engine.layout(text, size_px, color)?;
        let origin = Point::new(
            center.x - f64::from(layout.full_width()) / 2.0,
            center.y - f64::from(layout.height()) / 2.0,
        );
        self.draw_text_layout(engine, &layout, origin);
        Ok(())
    }

    /// Draw one line of text with its left edge at `anchor.x`, vertically
    /// centered on `anchor.y`.
    pub fn text_left(
        &mut self,
        engine: &mut TextEngine,
        text: &str,
        size_px: f32,
        color: Color,
        anchor: Point,
    ) -> EmberdeckResult<()> {
        let layout = engine.layout(text, size_px, color)?;
        let origin = Point::new(anchor.x, anchor.y - f64::from(layout.height()) / 2.0);
        self.draw_text_layout(engine, &layout, origin);
        Ok(())
    }

    fn draw_text_layout(
        &mut self,
        engine: &TextEngine,
        layout: &parley::Layout<crate::text::TextBrushRgba8>,
        origin: Point,
    ) {
        self.begin(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

        let font = engine.font().clone();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything recorded so far into an immutable raster.
    pub fn finish(mut self) -> Raster {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Raster {
            width: u32::from(self.width),
            height: u32::from(self.height),
            pixmap: Arc::new(pixmap),
        }
    }

    fn begin(&mut self, transform: vello_cpu::kurbo::Affine) {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(transform);
    }

    fn set_solid_paint(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
    }
}

/// Finished render target: premultiplied RGBA8, cheap to clone and share.
#[derive(Clone, Debug)]
pub struct Raster {
    width: u32,
    height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes, row-major, `width * height * 4` long.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

fn weight_drawable(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

fn stroke_style(weight: f64) -> vello_cpu::kurbo::Stroke {
    vello_cpu::kurbo::Stroke::new(weight)
        .with_caps(vello_cpu::kurbo::Cap::Round)
        .with_join(vello_cpu::kurbo::Join::Round)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
