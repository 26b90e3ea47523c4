//! The marker renderer: consumes the resolved-item snapshot computed by
//! the pane view, draws labels through a [`Surface`], and answers
//! hit-test queries against the label geometry it finalized while
//! drawing.

use barmark_protocol::{Rect, SharedStr, ThemeToken, TimeIndex};

use crate::text_width_cache::TextWidthCache;
use crate::time_data::{Timed, VisibleRange};

/// Font descriptor: size in pixels plus family string.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size: f64,
    pub family: String,
}

impl Font {
    pub fn new(size: f64, family: &str) -> Self {
        Self {
            size,
            family: family.to_owned(),
        }
    }

    /// CSS-style descriptor, e.g. `"12px sans-serif"`.
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

/// Drawing target. Implementations measure and draw text with a
/// left-anchored, vertically-centered (middle baseline) contract; the
/// renderer pre-subtracts half the measured width to center labels.
pub trait Surface {
    fn measure_text(&mut self, content: &str, font: &Font) -> f64;
    fn draw_text(&mut self, content: &str, x: f64, y: f64, font: &Font, color: ThemeToken);
}

/// A label with resolved geometry. `x`/`y` are the label's center;
/// `width` is filled lazily at draw time, `height` is the font size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLabel {
    pub content: SharedStr,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ResolvedLabel {
    /// A label whose geometry has not been computed yet.
    pub fn unmeasured(content: SharedStr) -> Self {
        Self {
            content,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    fn bounding_box(&self) -> Rect {
        Rect::centered(self.x, self.y, self.width, self.height)
    }
}

/// One marker or profile, resolved to screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererItem {
    pub time: TimeIndex,
    pub x: f64,
    pub y: f64,
    pub internal_id: u64,
    pub external_id: Option<String>,
    /// Zero or one label for stacked markers (centered on `x`); any
    /// number for the TPO lattice.
    pub labels: Vec<ResolvedLabel>,
}

impl Timed for RendererItem {
    fn time(&self) -> TimeIndex {
        self.time
    }
}

/// The snapshot the pane view computes and lends to the renderer each
/// frame. The item array is rebuilt only on data invalidation; positions
/// are recomputed in place on layout invalidation.
#[derive(Debug, Default)]
pub struct RendererData {
    pub items: Vec<RendererItem>,
    pub visible_range: Option<VisibleRange>,
}

/// Hit-test result: the renderer-assigned id plus the caller's own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub internal_id: u64,
    pub external_id: Option<String>,
}

/// Draws resolved marker labels and hit-tests against them.
///
/// Owns the text-width cache; font parameter changes invalidate it
/// wholesale because cached widths are only valid for the font they
/// were measured under.
#[derive(Debug)]
pub struct MarkerRenderer {
    font: Font,
    cache: TextWidthCache,
}

impl MarkerRenderer {
    pub fn new() -> Self {
        Self {
            // Sentinel so the first set_params always takes effect.
            font: Font::new(-1.0, ""),
            cache: TextWidthCache::new(),
        }
    }

    /// Update font parameters, resetting the width cache when either
    /// differs from the current font.
    pub fn set_params(&mut self, font_size: f64, font_family: &str) {
        if self.font.size != font_size || self.font.family != font_family {
            self.font = Font::new(font_size, font_family);
            self.cache.reset();
        }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Observable cache invalidation state, for tests and diagnostics.
    pub fn cache_generation(&self) -> u64 {
        self.cache.generation()
    }

    /// Draw every visible label, finalizing its width and height in
    /// place first. This is the single point where label geometry
    /// becomes final for hit-testing this frame.
    pub fn draw(&mut self, data: &mut RendererData, surface: &mut dyn Surface) {
        let Some(range) = data.visible_range else {
            return;
        };
        for item in &mut data.items[range.from..range.to] {
            for label in &mut item.labels {
                label.width = self.cache.measure(&label.content, surface, &self.font);
                label.height = self.font.size;
                surface.draw_text(
                    &label.content,
                    label.x - label.width / 2.0,
                    label.y,
                    &self.font,
                    ThemeToken::MarkerText,
                );
            }
        }
    }

    /// First visible item whose label bounding box contains the point.
    /// Markers without a label are never hit-testable.
    pub fn hit_test(&self, data: &RendererData, x: f64, y: f64) -> Option<Hit> {
        let range = data.visible_range?;
        data.items[range.from..range.to]
            .iter()
            .find(|item| item.labels.iter().any(|l| l.bounding_box().contains(x, y)))
            .map(|item| Hit {
                internal_id: item.internal_id,
                external_id: item.external_id.clone(),
            })
    }
}

impl Default for MarkerRenderer {
    fn default() -> Self {
        Self::new()
    }
}
