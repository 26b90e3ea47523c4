//! JSON ingestion for caller-supplied markers and TPO profiles.
//!
//! Rejection happens here, at the boundary: an unknown `position`
//! spelling or a present-but-empty label never makes it into the store,
//! so the layout pass can dispatch on the closed enum without a
//! fallback arm.

use barmark_protocol::{SeriesMarker, SharedStr, TimeIndex, TpoProfile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid marker JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("marker at index {time} has an empty label")]
    EmptyLabel { time: TimeIndex },
}

/// Parse a JSON array of markers, validating labels.
pub fn parse_markers(data: &[u8]) -> Result<Vec<SeriesMarker>, IngestError> {
    let markers: Vec<SeriesMarker> = serde_json::from_slice(data)?;
    for marker in &markers {
        check_label(marker.time, marker.text.as_ref())?;
    }
    Ok(markers)
}

/// Parse a JSON array of TPO profiles, validating labels.
pub fn parse_profiles(data: &[u8]) -> Result<Vec<TpoProfile>, IngestError> {
    let profiles: Vec<TpoProfile> = serde_json::from_slice(data)?;
    for profile in &profiles {
        check_label(profile.time, profile.text.as_ref())?;
    }
    Ok(profiles)
}

/// A label is optional, but a present label must be non-empty.
pub(crate) fn check_label(time: TimeIndex, text: Option<&SharedStr>) -> Result<(), IngestError> {
    match text {
        Some(t) if t.is_empty() => Err(IngestError::EmptyLabel { time }),
        _ => Ok(()),
    }
}
