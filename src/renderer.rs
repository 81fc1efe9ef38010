use egui::Pos2;

use crate::stroke::{StrokeStyle, Tool};
use crate::surface::{Composite, Surface};

/// Renders freehand strokes onto a [`Surface`] as the pointer moves.
///
/// Each `extend_stroke` call draws one segment from the stored anchor to the
/// new point and moves the anchor there. Nothing is buffered: the surface
/// always shows the stroke so far.
#[derive(Debug, Default)]
pub struct StrokeRenderer {
    anchor: Option<Pos2>,
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self { anchor: None }
    }

    /// Check whether a stroke is in progress
    pub fn is_drawing(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn anchor(&self) -> Option<Pos2> {
        self.anchor
    }

    /// Start a stroke at `point`. No pixels change yet.
    pub fn begin_stroke(&mut self, point: Pos2) {
        self.anchor = Some(point);
    }

    /// Draw a segment from the anchor to `point` using `style`.
    ///
    /// Ignored when no stroke is in progress.
    pub fn extend_stroke(&mut self, surface: &mut Surface, point: Pos2, style: &StrokeStyle) {
        let Some(anchor) = self.anchor else {
            return;
        };

        let composite = match style.tool {
            Tool::Pen => Composite::SourceOver,
            Tool::Eraser => Composite::DestinationOut,
        };
        surface.stroke_segment(anchor, point, style.line_width() as f32, style.color, composite);
        self.anchor = Some(point);
    }

    /// Finish the stroke.
    ///
    /// Returns `true` exactly once per begun stroke; the caller captures a
    /// history snapshot when it does. Repeated calls (pointer-up followed by
    /// pointer-leave) return `false`.
    #[must_use]
    pub fn end_stroke(&mut self) -> bool {
        self.anchor.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn red_pen(width: u32) -> StrokeStyle {
        StrokeStyle::new(Tool::Pen, Color32::RED, width)
    }

    #[test]
    fn test_begin_does_not_draw() {
        let mut surface = Surface::new(20, 20);
        let mut renderer = StrokeRenderer::new();
        renderer.begin_stroke(Pos2::new(10.0, 10.0));
        assert!(renderer.is_drawing());
        assert!(surface.is_empty());

        renderer.extend_stroke(&mut surface, Pos2::new(15.0, 10.0), &red_pen(3));
        assert!(!surface.is_empty());
        assert_eq!(renderer.anchor(), Some(Pos2::new(15.0, 10.0)));
    }

    #[test]
    fn test_extend_without_begin_is_noop() {
        let mut surface = Surface::new(20, 20);
        let mut renderer = StrokeRenderer::new();
        renderer.extend_stroke(&mut surface, Pos2::new(5.0, 5.0), &red_pen(5));
        assert!(surface.is_empty());
        assert!(!renderer.is_drawing());
    }

    #[test]
    fn test_end_signals_once() {
        let mut renderer = StrokeRenderer::new();
        assert!(!renderer.end_stroke());
        renderer.begin_stroke(Pos2::new(1.0, 1.0));
        assert!(renderer.end_stroke());
        assert!(!renderer.end_stroke());
    }

    #[test]
    fn test_extend_after_end_is_noop() {
        let mut surface = Surface::new(20, 20);
        let mut renderer = StrokeRenderer::new();
        renderer.begin_stroke(Pos2::new(2.0, 2.0));
        let _ = renderer.end_stroke();
        renderer.extend_stroke(&mut surface, Pos2::new(18.0, 18.0), &red_pen(5));
        assert!(surface.is_empty());
    }

    #[test]
    fn test_style_change_mid_stroke_applies_to_next_segment() {
        let mut surface = Surface::new(40, 10);
        let mut renderer = StrokeRenderer::new();
        renderer.begin_stroke(Pos2::new(2.0, 5.0));
        renderer.extend_stroke(&mut surface, Pos2::new(15.0, 5.0), &red_pen(3));
        let blue = StrokeStyle::new(Tool::Pen, Color32::BLUE, 3);
        renderer.extend_stroke(&mut surface, Pos2::new(38.0, 5.0), &blue);

        assert_eq!(surface.pixel(8, 4), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(30, 4), Some([0, 0, 255, 255]));
    }
}
