pub mod chart;
pub mod ingest;
pub mod layout;
pub mod render;
pub mod store;
pub mod text_width_cache;
pub mod time_data;
pub mod view;

pub use chart::{ChartContext, LayoutOptions, PriceScale, SeriesData, TimeScale};
pub use ingest::IngestError;
pub use render::{Font, Hit, MarkerRenderer, RendererData, RendererItem, ResolvedLabel, Surface};
pub use store::MarkerStore;
pub use text_width_cache::TextWidthCache;
pub use time_data::{IndexRange, VisibleRange};
pub use view::{AutoScaleMargins, MarkerPaneView, RenderPass, TpoPaneView, UpdateType};
