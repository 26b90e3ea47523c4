//! End-to-end pane view tests: JSON ingestion → store → layout →
//! draw → hit-test, with hand-written collaborator fakes.

use std::collections::BTreeMap;

use barmark_core::chart::{ChartContext, LayoutOptions, PriceScale, SeriesData, TimeScale};
use barmark_core::render::{Font, Surface};
use barmark_core::store::MarkerStore;
use barmark_core::time_data::IndexRange;
use barmark_core::view::{MarkerPaneView, TpoPaneView, UpdateType};
use barmark_core::{ingest, layout};
use barmark_protocol::{Bar, ThemeToken, TimeIndex};

struct LinearTimeScale {
    bar_spacing: f64,
    visible: Option<IndexRange>,
}

impl TimeScale for LinearTimeScale {
    fn index_to_x(&self, index: TimeIndex) -> f64 {
        index as f64 * self.bar_spacing + self.bar_spacing / 2.0
    }

    fn visible_strict_range(&self) -> Option<IndexRange> {
        self.visible
    }

    fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }
}

struct LinearPriceScale {
    max_price: f64,
    px_per_unit: f64,
}

impl PriceScale for LinearPriceScale {
    fn price_to_y(&self, price: f64, _first_value: f64) -> f64 {
        (self.max_price - price) * self.px_per_unit
    }
}

struct TestSeries {
    store: MarkerStore,
    bars: BTreeMap<TimeIndex, Bar>,
    visible: bool,
}

impl TestSeries {
    fn new() -> Self {
        Self {
            store: MarkerStore::new(),
            bars: BTreeMap::new(),
            visible: true,
        }
    }

    fn with_bars(indices: &[(TimeIndex, f64, f64, f64)]) -> Self {
        let mut series = Self::new();
        for &(i, high, low, close) in indices {
            series.bars.insert(i, Bar::new(high, low, close));
        }
        series
    }
}

impl SeriesData for TestSeries {
    fn bar_at(&self, index: TimeIndex) -> Option<Bar> {
        self.bars.get(&index).copied()
    }

    fn first_value(&self) -> Option<f64> {
        self.bars.values().next().map(|b| b.close)
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn markers(&self) -> &[barmark_protocol::InternalMarker] {
        self.store.markers()
    }

    fn profiles(&self) -> &[barmark_protocol::InternalTpoProfile] {
        self.store.profiles()
    }
}

/// Counts measurement calls; width = 6px per character.
struct RecordingSurface {
    measure_calls: usize,
    drawn: Vec<(String, f64, f64)>,
}

impl RecordingSurface {
    fn new() -> Self {
        Self {
            measure_calls: 0,
            drawn: Vec::new(),
        }
    }
}

impl Surface for RecordingSurface {
    fn measure_text(&mut self, content: &str, _font: &Font) -> f64 {
        self.measure_calls += 1;
        content.chars().count() as f64 * 6.0
    }

    fn draw_text(&mut self, content: &str, x: f64, y: f64, _font: &Font, _color: ThemeToken) {
        self.drawn.push((content.to_owned(), x, y));
    }
}

fn context<'a>(
    ts: &'a LinearTimeScale,
    ps: &'a LinearPriceScale,
    series: &'a TestSeries,
    options: &'a LayoutOptions,
) -> ChartContext<'a> {
    ChartContext {
        time_scale: ts,
        price_scale: ps,
        series,
        options,
    }
}

fn default_scales() -> (LinearTimeScale, LinearPriceScale) {
    (
        LinearTimeScale {
            bar_spacing: 10.0,
            visible: Some(IndexRange::new(0, 100)),
        },
        LinearPriceScale {
            max_price: 200.0,
            px_per_unit: 2.0,
        },
    )
}

#[test]
fn ingested_markers_flow_through_to_hit_test() {
    let json = br#"[
        {"time": 5, "position": "aboveBar", "text": "sell", "external_id": "order-7"},
        {"time": 3, "position": "belowBar", "text": "buy"},
        {"time": 8, "position": "inBar"}
    ]"#;
    let markers = ingest::parse_markers(json).expect("valid marker JSON");

    let (ts, ps) = default_scales();
    let mut series = TestSeries::with_bars(&[
        (3, 110.0, 100.0, 105.0),
        (5, 120.0, 108.0, 115.0),
        (8, 125.0, 112.0, 118.0),
    ]);
    series.store.set_markers(markers).expect("markers accepted");
    let options = LayoutOptions::default();

    let mut view = MarkerPaneView::new();
    let mut surface = RecordingSurface::new();

    let mut pass = view
        .renderer(&context(&ts, &ps, &series, &options))
        .expect("render pass");
    pass.draw(&mut surface);

    // Two labels drawn; the unlabeled in-bar marker drew nothing.
    assert_eq!(surface.drawn.len(), 2);

    // Hit the "sell" label dead center and get the caller's id back.
    let sell = pass
        .data()
        .items
        .iter()
        .find(|item| item.external_id.as_deref() == Some("order-7"))
        .expect("sell item present");
    let label = &sell.labels[0];
    let hit = pass.hit_test(label.x, label.y).expect("label hit");
    assert_eq!(hit.internal_id, sell.internal_id);
    assert_eq!(hit.external_id.as_deref(), Some("order-7"));

    // A point far away from every label misses.
    assert!(pass.hit_test(-50.0, -50.0).is_none());
}

#[test]
fn layout_invalidation_reuses_items_data_invalidation_rebuilds() {
    let json = br#"[{"time": 2, "position": "aboveBar", "text": "A"}]"#;
    let markers = ingest::parse_markers(json).expect("valid marker JSON");

    let (ts, ps) = default_scales();
    let mut series = TestSeries::with_bars(&[(2, 110.0, 100.0, 105.0)]);
    series.store.set_markers(markers).expect("markers accepted");
    let options = LayoutOptions::default();

    let mut view = MarkerPaneView::new();
    let first_id = {
        let pass = view
            .renderer(&context(&ts, &ps, &series, &options))
            .expect("render pass");
        pass.data().items[0].internal_id
    };

    // Layout-only invalidation keeps the same item identity.
    view.update(UpdateType::Layout);
    let second_id = {
        let pass = view
            .renderer(&context(&ts, &ps, &series, &options))
            .expect("render pass");
        pass.data().items[0].internal_id
    };
    assert_eq!(first_id, second_id);

    // Replacing the marker set assigns fresh ids.
    let markers = ingest::parse_markers(br#"[{"time": 2, "position": "aboveBar", "text": "B"}]"#)
        .expect("valid marker JSON");
    series.store.set_markers(markers).expect("markers accepted");
    view.update(UpdateType::Data);
    let third_id = {
        let pass = view
            .renderer(&context(&ts, &ps, &series, &options))
            .expect("render pass");
        pass.data().items[0].internal_id
    };
    assert_ne!(first_id, third_id);
}

#[test]
fn font_change_invalidates_label_widths() {
    let json = br#"[{"time": 2, "position": "aboveBar", "text": "A"}]"#;
    let markers = ingest::parse_markers(json).expect("valid marker JSON");

    let (ts, ps) = default_scales();
    let mut series = TestSeries::with_bars(&[(2, 110.0, 100.0, 105.0)]);
    series.store.set_markers(markers).expect("markers accepted");

    let mut view = MarkerPaneView::new();
    let mut surface = RecordingSurface::new();

    let options = LayoutOptions::default();
    let mut pass = view
        .renderer(&context(&ts, &ps, &series, &options))
        .expect("render pass");
    pass.draw(&mut surface);
    drop(pass);
    assert_eq!(surface.measure_calls, 1);

    // Same font: the cached width is served.
    view.update(UpdateType::Layout);
    let mut pass = view
        .renderer(&context(&ts, &ps, &series, &options))
        .expect("render pass");
    pass.draw(&mut surface);
    drop(pass);
    assert_eq!(surface.measure_calls, 1);

    // Font change: previously-seen content must be measured again.
    let bigger = LayoutOptions {
        font_size: 16.0,
        font_family: "sans-serif".to_owned(),
    };
    view.update(UpdateType::Layout);
    let mut pass = view
        .renderer(&context(&ts, &ps, &series, &bigger))
        .expect("render pass");
    pass.draw(&mut surface);
    assert_eq!(surface.measure_calls, 2);
}

#[test]
fn window_plus_one_neighbor_each_side_is_laid_out() {
    let (mut ts, ps) = default_scales();
    ts.visible = Some(IndexRange::new(4, 6));

    let mut series = TestSeries::with_bars(&[
        (0, 108.0, 98.0, 103.0),
        (2, 110.0, 100.0, 105.0),
        (5, 120.0, 108.0, 115.0),
        (9, 125.0, 112.0, 118.0),
        (11, 127.0, 114.0, 120.0),
    ]);
    let markers = ingest::parse_markers(
        br#"[
            {"time": 0, "position": "inBar"},
            {"time": 2, "position": "inBar"},
            {"time": 5, "position": "inBar"},
            {"time": 9, "position": "inBar"},
            {"time": 11, "position": "inBar"}
        ]"#,
    )
    .expect("valid marker JSON");
    series.store.set_markers(markers).expect("markers accepted");
    let options = LayoutOptions::default();

    let mut view = MarkerPaneView::new();
    let pass = view
        .renderer(&context(&ts, &ps, &series, &options))
        .expect("render pass");
    let range = pass.data().visible_range.expect("visible range");
    // Only time=5 is strictly inside 4..=6, but the markers at 2 and 9
    // may poke into the pane, so they get laid out too.
    assert_eq!((range.from, range.to), (1, 4));
    assert_eq!(pass.data().items[1].x, ts.index_to_x(2));
    assert_eq!(pass.data().items[3].x, ts.index_to_x(9));
    // Two or more bars beyond the window stays untouched.
    assert_eq!(pass.data().items[0].x, 0.0);
    assert_eq!(pass.data().items[4].x, 0.0);
}

#[test]
fn empty_series_early_outs_without_error() {
    let (ts, ps) = default_scales();
    let series = TestSeries::new(); // no bars → no first value
    let options = LayoutOptions::default();

    let mut view = MarkerPaneView::new();
    let pass = view
        .renderer(&context(&ts, &ps, &series, &options))
        .expect("render pass");
    assert_eq!(pass.data().visible_range, None);
    assert!(pass.hit_test(0.0, 0.0).is_none());
}

#[test]
fn tpo_lattice_renders_and_hit_tests_letters() {
    let json = br#"[{
        "time": 4,
        "position": "inBar",
        "external_id": "profile-a",
        "periods": [
            {"letter": "A", "tpos": [{"price": 110.0, "column": 0}, {"price": 112.0, "column": 1}]},
            {"letter": "B", "tpos": [{"price": 110.0, "column": 2}]}
        ]
    }]"#;
    let profiles = ingest::parse_profiles(json).expect("valid profile JSON");

    let (ts, ps) = default_scales();
    let mut series = TestSeries::with_bars(&[(4, 120.0, 100.0, 110.0)]);
    series
        .store
        .set_profiles(profiles)
        .expect("profiles accepted");
    let options = LayoutOptions::default();

    let mut view = TpoPaneView::new();
    let mut surface = RecordingSurface::new();
    let mut pass = view
        .renderer(&context(&ts, &ps, &series, &options))
        .expect("render pass");
    pass.draw(&mut surface);

    assert_eq!(surface.drawn.len(), 3);
    let item = &pass.data().items[0];
    assert_eq!(item.labels.len(), 3);

    // Columns step by the fixed lattice stride.
    let base_x = ts.index_to_x(4);
    assert_eq!(item.labels[0].x, base_x);
    assert_eq!(item.labels[1].x, base_x + layout::TPO_COLUMN_WIDTH);
    assert_eq!(item.labels[2].x, base_x + 2.0 * layout::TPO_COLUMN_WIDTH);

    // Letters "A" and "B" share the cache per content, not per entry.
    assert_eq!(surface.measure_calls, 2);

    let hit = pass
        .hit_test(item.labels[2].x, item.labels[2].y)
        .expect("letter hit");
    assert_eq!(hit.external_id.as_deref(), Some("profile-a"));
}

#[test]
fn hidden_series_returns_no_renderer_and_keeps_state() {
    let (ts, ps) = default_scales();
    let mut series = TestSeries::with_bars(&[(2, 110.0, 100.0, 105.0)]);
    let markers = ingest::parse_markers(br#"[{"time": 2, "position": "aboveBar"}]"#)
        .expect("valid marker JSON");
    series.store.set_markers(markers).expect("markers accepted");
    let options = LayoutOptions::default();

    let mut view = MarkerPaneView::new();
    {
        let pass = view
            .renderer(&context(&ts, &ps, &series, &options))
            .expect("render pass");
        assert!(pass.data().visible_range.is_some());
    }

    series.visible = false;
    assert!(view.renderer(&context(&ts, &ps, &series, &options)).is_none());

    // Becoming visible again serves the cached layout.
    series.visible = true;
    let pass = view
        .renderer(&context(&ts, &ps, &series, &options))
        .expect("render pass");
    assert!(pass.data().visible_range.is_some());
}
