use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// Abstract bar index on the chart's time axis. Monotonic across the
/// series; two markers with the same index belong to the same bar.
pub type TimeIndex = i64;

/// Where a marker sits relative to its bar.
///
/// The set is closed on purpose: the stacking algorithm dispatches on it
/// with a total `match`, so an unknown position is unrepresentable once a
/// marker exists. The serde renames are the caller-facing wire spellings;
/// anything else fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerPosition {
    #[serde(rename = "aboveBar")]
    AboveBar,
    #[serde(rename = "belowBar")]
    BelowBar,
    #[serde(rename = "inBar")]
    InBar,
}

/// A caller-supplied annotation attached to one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMarker {
    /// Bar index the marker is anchored to.
    pub time: TimeIndex,
    /// Placement relative to the bar; fixed for the marker's lifetime.
    pub position: MarkerPosition,
    /// Optional label, drawn centered on the marker. Must be non-empty
    /// when present (validated at ingestion).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<SharedStr>,
    /// Opaque caller-facing identity, passed through to hit-test results
    /// verbatim — including absence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// A marker after ingestion, carrying its renderer-facing identity.
///
/// `internal_id` is assigned once from a monotonically increasing counter,
/// is unique within a snapshot, and is never reused while the marker
/// exists. Hit tests report it back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalMarker {
    #[serde(flatten)]
    pub marker: SeriesMarker,
    pub internal_id: u64,
}

/// One price level inside a TPO period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpoEntry {
    pub price: f64,
    /// Horizontal lattice column. Entries without a column are skipped
    /// at layout time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// A group of price levels sharing one display letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TpoPeriod {
    /// Display letter for every entry of the period. Periods without a
    /// letter (or with an empty one) are skipped at layout time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<SharedStr>,
    pub tpos: Vec<TpoEntry>,
}

/// The letter-lattice annotation variant: multiple price levels per time
/// bucket, placed on a fixed column/row grid instead of being dynamically
/// stacked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TpoProfile {
    pub time: TimeIndex,
    pub position: MarkerPosition,
    pub periods: Vec<TpoPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<SharedStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// A TPO profile after ingestion; see [`InternalMarker`] for the identity
/// contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalTpoProfile {
    #[serde(flatten)]
    pub profile: TpoProfile,
    pub internal_id: u64,
}

/// Per-bar price components, as yielded by the series data store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(high: f64, low: f64, close: f64) -> Self {
        Self { high, low, close }
    }

    /// A scalar-valued series point (line, area) maps its single value to
    /// all three components.
    pub fn from_scalar(value: f64) -> Self {
        Self {
            high: value,
            low: value,
            close: value,
        }
    }
}
