use std::collections::HashMap;

use crate::render::{Font, Surface};

/// Memoized text-width measurement.
///
/// Keyed by content only — widths are valid solely for the font they
/// were measured under, so the owning renderer must call [`reset`] when
/// font parameters change. `generation` is bumped on every reset so the
/// invalidation is observable. No eviction beyond the full clear: marker
/// counts are small relative to memory.
///
/// [`reset`]: TextWidthCache::reset
#[derive(Debug, Default)]
pub struct TextWidthCache {
    widths: HashMap<String, f64>,
    generation: u64,
}

impl TextWidthCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of `content` under `font`, measuring through `surface` on a
    /// cache miss.
    pub fn measure(&mut self, content: &str, surface: &mut dyn Surface, font: &Font) -> f64 {
        if let Some(width) = self.widths.get(content) {
            return *width;
        }
        let width = surface.measure_text(content, font);
        self.widths.insert(content.to_owned(), width);
        width
    }

    /// Drop every cached width and bump the generation.
    pub fn reset(&mut self) {
        self.widths.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}
