//! Trait seams for the chart services the marker core consumes but does
//! not implement: the time scale, the price scale, and the series data
//! store. Concrete implementations live with the embedding chart (or in
//! test fixtures); everything here is read-only per call.

use barmark_protocol::{Bar, InternalMarker, InternalTpoProfile, TimeIndex};
use serde::{Deserialize, Serialize};

use crate::time_data::IndexRange;

/// Index ↔ pixel-x mapping plus the current zoom level.
pub trait TimeScale {
    /// Pixel x of the center of the bar at `index`.
    fn index_to_x(&self, index: TimeIndex) -> f64;

    /// The contiguous index window currently scrolled into view, or
    /// `None` when the chart has no visible bars.
    fn visible_strict_range(&self) -> Option<IndexRange>;

    /// Pixels per bar.
    fn bar_spacing(&self) -> f64;
}

/// Price ↔ pixel-y mapping.
pub trait PriceScale {
    /// Pixel y for `price`, relative to the series' reference value.
    fn price_to_y(&self, price: f64, first_value: f64) -> f64;
}

/// The underlying bar/series store, including the ingested annotations.
pub trait SeriesData {
    /// Price components at `index`, or `None` when the series has no bar
    /// there. A missing bar skips marker placement for that pass; it does
    /// not abort the pass for other markers.
    fn bar_at(&self, index: TimeIndex) -> Option<Bar>;

    /// Price-scale reference value, or `None` for an empty series.
    fn first_value(&self) -> Option<f64>;

    /// Whether the series is drawn at all. A hidden series renders
    /// nothing and leaves all cached view state untouched.
    fn is_visible(&self) -> bool;

    /// Ingested markers, time-sorted, id-stamped.
    fn markers(&self) -> &[InternalMarker];

    /// Ingested TPO profiles, time-sorted, id-stamped.
    fn profiles(&self) -> &[InternalTpoProfile];
}

/// Font parameters from the chart's layout options. Deserializable so
/// embedders can carry them in their chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Font size in pixels. Doubles as label height.
    pub font_size: f64,
    pub font_family: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            font_family: "sans-serif".to_owned(),
        }
    }
}

/// Everything a pane view needs from its collaborators for one call.
pub struct ChartContext<'a> {
    pub time_scale: &'a dyn TimeScale,
    pub price_scale: &'a dyn PriceScale,
    pub series: &'a dyn SeriesData,
    pub options: &'a LayoutOptions,
}
