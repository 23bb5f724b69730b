//! Vello-based renderer implementation.

use crate::display::{DisplayList, DrawCommand, build_display_list};
use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, BezPath, Line, Point, Rect, Size, Stroke, Vec2};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use seqdraw_core::hit::HitIndex;
use vello::Scene;

/// Length of an arrowhead along the line.
const ARROW_HEAD_LENGTH: f64 = 10.0;
/// Half width of an arrowhead.
const ARROW_HEAD_HALF_WIDTH: f64 = 5.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering, backed by system fonts.
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Build a scene for raster export: no gesture preview, opaque
    /// background, pixel size scaled by `scale`.
    pub fn build_export_scene(&mut self, ctx: &RenderContext, scale: f64) -> (Scene, Size) {
        let list = build_display_list(&ctx.without_preview());
        self.scene.reset();
        self.paint(&list, Affine::scale(scale));
        let size = Size::new(
            (list.size.width * scale).ceil(),
            (list.size.height * scale).ceil(),
        );
        (std::mem::take(&mut self.scene), size)
    }

    /// Paint a display list into the scene.
    pub fn paint(&mut self, list: &DisplayList, transform: Affine) {
        let bounds = Rect::from_origin_size(Point::ZERO, list.size);
        self.scene
            .fill(Fill::NonZero, transform, Color::from(list.background), None, &bounds);

        for command in &list.commands {
            match command {
                DrawCommand::FillRect { rect, color } => {
                    self.scene
                        .fill(Fill::NonZero, transform, Color::from(*color), None, rect);
                }
                DrawCommand::StrokeRect { rect, color, width } => {
                    self.scene
                        .stroke(&Stroke::new(*width), transform, Color::from(*color), None, rect);
                }
                DrawCommand::Line { line, color, width, dash } => {
                    self.stroke_line(*line, Color::from(*color), *width, *dash, transform);
                }
                DrawCommand::Arrow { line, color, width, dash } => {
                    let color = Color::from(*color);
                    self.stroke_line(*line, color, *width, *dash, transform);
                    self.scene
                        .fill(Fill::NonZero, transform, color, None, &arrow_head(*line));
                }
                DrawCommand::Text { center, text, color, size } => {
                    self.render_text(text, *center, Color::from(*color), *size, transform);
                }
            }
        }
    }

    fn stroke_line(&mut self, line: Line, color: Color, width: f64, dash: Option<[f64; 2]>, transform: Affine) {
        let mut stroke = Stroke::new(width);
        if let Some(pattern) = dash {
            stroke = stroke.with_dashes(0.0, pattern);
        }
        self.scene.stroke(&stroke, transform, color, None, &line);
    }

    /// Lay out a single line of text with Parley and draw it centered.
    fn render_text(&mut self, text: &str, center: Point, color: Color, size: f64, transform: Affine) {
        if text.is_empty() {
            return;
        }
        let brush = Brush::Solid(color);
        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::from("sans-serif")));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let origin = center - Vec2::new(f64::from(layout.width()) / 2.0, f64::from(layout.height()) / 2.0);
        let text_transform = transform * Affine::translate(origin.to_vec2());

        let mut drawn = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                drawn += glyphs.len();

                self.scene
                    .draw_glyphs(run.font())
                    .brush(&brush)
                    .hint(true)
                    .transform(text_transform)
                    .glyph_transform(glyph_xform)
                    .font_size(run.font_size())
                    .normalized_coords(run.normalized_coords())
                    .draw(Fill::NonZero, glyphs.into_iter());
            }
        }

        if drawn == 0 {
            log::warn!("No system font could render {:?}", text);
        }
    }
}

/// Filled triangle at `line.p1` pointing along the line.
fn arrow_head(line: Line) -> BezPath {
    let delta = line.p1 - line.p0;
    let direction = if delta.hypot() > f64::EPSILON {
        delta.normalize()
    } else {
        Vec2::new(1.0, 0.0)
    };
    let normal = Vec2::new(-direction.y, direction.x);
    let tip = line.p1;
    let base = tip - direction * ARROW_HEAD_LENGTH;

    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to(base + normal * ARROW_HEAD_HALF_WIDTH);
    path.line_to(base - normal * ARROW_HEAD_HALF_WIDTH);
    path.close_path();
    path
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> HitIndex {
        let list = build_display_list(ctx);
        self.scene.reset();
        self.paint(&list, ctx.transform());
        list.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqdraw_core::diagram::LineStyle;
    use seqdraw_core::session::EditorSession;

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_returns_hits() {
        let mut renderer = VelloRenderer::new();
        let mut session = EditorSession::new();
        let _ = session.add_actor("A");
        let _ = session.add_actor("B");
        session.add_interaction(1, 2, "", LineStyle::Solid).unwrap();

        let hits = renderer.build_scene(&RenderContext::new(&session));
        assert_eq!(hits.len(), 1);
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_export_scene_size() {
        let mut renderer = VelloRenderer::new();
        let session = EditorSession::new();
        let (_, size) = renderer.build_export_scene(&RenderContext::new(&session), 2.0);
        assert_eq!(size, Size::new(2000.0, 1400.0));
    }

    #[test]
    fn test_context_transform_applies_origin_then_scale() {
        let session = EditorSession::new();
        let ctx = RenderContext::new(&session)
            .with_origin(Vec2::new(10.0, 20.0))
            .with_scale_factor(2.0);
        assert_eq!(ctx.transform() * Point::new(1.0, 1.0), Point::new(22.0, 42.0));
    }

    #[test]
    fn test_arrow_head_points_along_line() {
        let head = arrow_head(Line::new((0.0, 0.0), (100.0, 0.0)));
        let bounds = kurbo::Shape::bounding_box(&head);
        assert_eq!(bounds, Rect::new(90.0, -5.0, 100.0, 5.0));

        let reversed = arrow_head(Line::new((100.0, 0.0), (0.0, 0.0)));
        assert_eq!(kurbo::Shape::bounding_box(&reversed), Rect::new(0.0, -5.0, 10.0, 5.0));
    }
}
