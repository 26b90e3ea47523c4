//! Marker placement: shape metrics derived from bar spacing, the
//! overlap-avoidance stacking pass for above/below/in-bar markers, and
//! the constant-offset letter lattice for TPO profiles.

use barmark_protocol::{Bar, MarkerPosition, TpoProfile};

use crate::chart::PriceScale;
use crate::render::{RendererItem, ResolvedLabel};

const MIN_SHAPE_SIZE: f64 = 12.0;
const MAX_SHAPE_SIZE: f64 = 30.0;
const MIN_SHAPE_MARGIN: f64 = 3.0;

/// Fraction of text height used as padding above/below a label.
pub const TEXT_MARGIN: f64 = 0.1;

/// Horizontal pixel stride between TPO lattice columns.
pub const TPO_COLUMN_WIDTH: f64 = 10.0;

fn ceiled_even(x: f64) -> f64 {
    let c = x.ceil();
    if (c as i64) % 2 != 0 { c + 1.0 } else { c }
}

fn ceiled_odd(x: f64) -> f64 {
    let c = x.ceil();
    if (c as i64) % 2 == 0 { c + 1.0 } else { c }
}

fn size(bar_spacing: f64, coeff: f64) -> f64 {
    ceiled_odd(bar_spacing.clamp(MIN_SHAPE_SIZE, MAX_SHAPE_SIZE) * coeff)
}

/// Marker shape height in pixels for the current zoom level.
pub fn shape_height(bar_spacing: f64) -> f64 {
    ceiled_even(size(bar_spacing, 1.0))
}

/// Minimum gap between a bar and its markers, and between stacked
/// markers on the same side.
pub fn shape_margin(bar_spacing: f64) -> f64 {
    size(bar_spacing, 0.1).max(MIN_SHAPE_MARGIN)
}

/// Vertical space markers may occupy beyond the bar's price range,
/// reserved symmetrically above and below by the price-axis autoscaler.
pub fn auto_scale_margin(bar_spacing: f64) -> f64 {
    shape_height(bar_spacing) * 1.5 + shape_margin(bar_spacing) * 2.0
}

/// Pixel quantities the stacking pass needs, fixed for one pass.
#[derive(Debug, Clone, Copy)]
pub struct ShapeMetrics {
    pub shape_height: f64,
    pub half_height: f64,
    pub shape_margin: f64,
    /// Label height — the current font size.
    pub text_height: f64,
}

impl ShapeMetrics {
    pub fn new(bar_spacing: f64, font_size: f64) -> Self {
        let height = shape_height(bar_spacing);
        Self {
            shape_height: height,
            half_height: height / 2.0,
            shape_margin: shape_margin(bar_spacing),
            text_height: font_size,
        }
    }
}

/// Running pixel distance already consumed on each side of the current
/// bar. Reset at every bar-group boundary so stacking starts over per
/// bar; in-bar markers never touch it.
#[derive(Debug, Clone, Copy)]
pub struct Offsets {
    pub above: f64,
    pub below: f64,
    margin: f64,
}

impl Offsets {
    pub fn new(shape_margin: f64) -> Self {
        Self {
            above: shape_margin,
            below: shape_margin,
            margin: shape_margin,
        }
    }

    pub fn reset(&mut self) {
        self.above = self.margin;
        self.below = self.margin;
    }
}

/// Place one marker against its bar, advancing the side offsets so the
/// next same-side marker on this bar lands strictly farther out.
///
/// Writes `item.y` and, when the marker carries a label, the label's
/// position; label width/height stay untouched (the renderer fills them
/// at draw time).
pub fn place_marker(
    item: &mut RendererItem,
    position: MarkerPosition,
    bar: &Bar,
    price_scale: &dyn PriceScale,
    first_value: f64,
    metrics: &ShapeMetrics,
    offsets: &mut Offsets,
) {
    let half = metrics.half_height;
    let text_height = metrics.text_height;
    match position {
        MarkerPosition::InBar => {
            item.y = price_scale.price_to_y(bar.close, first_value);
            if let Some(label) = item.labels.first_mut() {
                label.x = item.x;
                label.y = item.y + half + metrics.shape_margin + text_height * (0.5 + TEXT_MARGIN);
            }
        }
        MarkerPosition::AboveBar => {
            item.y = price_scale.price_to_y(bar.high, first_value) - half - offsets.above;
            if let Some(label) = item.labels.first_mut() {
                label.x = item.x;
                label.y = item.y - half - text_height * (0.5 + TEXT_MARGIN);
                offsets.above += text_height * (1.0 + 2.0 * TEXT_MARGIN);
            }
            offsets.above += metrics.shape_height + metrics.shape_margin;
        }
        MarkerPosition::BelowBar => {
            item.y = price_scale.price_to_y(bar.low, first_value) + half + offsets.below;
            if let Some(label) = item.labels.first_mut() {
                label.x = item.x;
                label.y = item.y + half + text_height * (0.5 + TEXT_MARGIN);
                offsets.below += text_height * (1.0 + 2.0 * TEXT_MARGIN);
            }
            offsets.below += metrics.shape_height + metrics.shape_margin;
        }
    }
}

/// Fill a TPO profile item's labels on the letter lattice: each entry
/// renders its period letter at a fixed column offset from the bar's x,
/// at the entry's price level. No stacking state involved.
pub fn fill_lattice(
    item: &mut RendererItem,
    profile: &TpoProfile,
    price_scale: &dyn PriceScale,
    first_value: f64,
) {
    item.labels.clear();
    for period in &profile.periods {
        let Some(letter) = &period.letter else {
            continue;
        };
        if letter.is_empty() {
            continue;
        }
        for tpo in &period.tpos {
            let Some(column) = tpo.column else {
                continue;
            };
            item.labels.push(ResolvedLabel {
                content: letter.clone(),
                x: item.x + f64::from(column) * TPO_COLUMN_WIDTH,
                y: price_scale.price_to_y(tpo.price, first_value),
                width: 0.0,
                height: 0.0,
            });
        }
    }
}
