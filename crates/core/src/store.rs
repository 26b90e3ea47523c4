//! Marker ingestion store: the in-scope half of the series data store.
//!
//! Stamps every accepted marker/profile with an `internal_id` and keeps
//! them time-sorted so the layout pass can group same-bar annotations by
//! comparing adjacent times.

use barmark_protocol::{
    InternalMarker, InternalTpoProfile, SeriesMarker, TpoProfile,
};

use crate::ingest::{self, IngestError};

/// Holds the ingested annotations for one series.
///
/// `internal_id`s come from a counter that never resets, so ids stay
/// unique across replacements: a rebuilt marker set gets fresh ids and an
/// id observed by the caller (via hit-test) is never recycled onto a
/// different marker.
#[derive(Debug, Default)]
pub struct MarkerStore {
    markers: Vec<InternalMarker>,
    profiles: Vec<InternalTpoProfile>,
    next_id: u64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the marker set. Validates labels, stable-sorts by time
    /// (preserving caller order within a bar), and assigns ids.
    pub fn set_markers(&mut self, mut markers: Vec<SeriesMarker>) -> Result<(), IngestError> {
        for marker in &markers {
            ingest::check_label(marker.time, marker.text.as_ref())?;
        }
        markers.sort_by_key(|m| m.time);
        self.markers = markers
            .into_iter()
            .map(|marker| InternalMarker {
                marker,
                internal_id: self.take_id(),
            })
            .collect();
        Ok(())
    }

    /// Replace the TPO profile set; same contract as [`set_markers`].
    ///
    /// [`set_markers`]: MarkerStore::set_markers
    pub fn set_profiles(&mut self, mut profiles: Vec<TpoProfile>) -> Result<(), IngestError> {
        for profile in &profiles {
            ingest::check_label(profile.time, profile.text.as_ref())?;
        }
        profiles.sort_by_key(|p| p.time);
        self.profiles = profiles
            .into_iter()
            .map(|profile| InternalTpoProfile {
                profile,
                internal_id: self.take_id(),
            })
            .collect();
        Ok(())
    }

    pub fn markers(&self) -> &[InternalMarker] {
        &self.markers
    }

    pub fn profiles(&self) -> &[InternalTpoProfile] {
        &self.profiles
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
