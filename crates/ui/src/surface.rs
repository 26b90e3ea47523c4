use egui::{Align2, FontId, Pos2};

use barmark_core::render::{Font, Surface};
use barmark_protocol::ThemeToken;

use crate::theme::{self, ThemeMode};

/// [`Surface`] implementation over an egui `Painter`.
///
/// Measurement goes through `layout_no_wrap` galleys; drawing anchors
/// text left/middle, matching the Surface contract (the renderer
/// pre-subtracts half the measured width to center labels).
pub struct EguiSurface<'p> {
    painter: &'p egui::Painter,
    mode: ThemeMode,
}

impl<'p> EguiSurface<'p> {
    pub fn new(painter: &'p egui::Painter, mode: ThemeMode) -> Self {
        Self { painter, mode }
    }
}

impl Surface for EguiSurface<'_> {
    fn measure_text(&mut self, content: &str, font: &Font) -> f64 {
        let galley = self.painter.layout_no_wrap(
            content.to_owned(),
            FontId::proportional(font.size as f32),
            egui::Color32::WHITE,
        );
        f64::from(galley.size().x)
    }

    fn draw_text(&mut self, content: &str, x: f64, y: f64, font: &Font, color: ThemeToken) {
        self.painter.text(
            Pos2::new(x as f32, y as f32),
            Align2::LEFT_CENTER,
            content,
            FontId::proportional(font.size as f32),
            theme::resolve(color, self.mode),
        );
    }
}
