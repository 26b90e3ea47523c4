pub mod marker;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use marker::{
    Bar, InternalMarker, InternalTpoProfile, MarkerPosition, SeriesMarker, TimeIndex, TpoEntry,
    TpoPeriod, TpoProfile,
};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use types::Rect;
