use std::collections::BTreeMap;

use eframe::egui;

use barmark_core::chart::{ChartContext, LayoutOptions, PriceScale, SeriesData, TimeScale};
use barmark_core::store::MarkerStore;
use barmark_core::time_data::IndexRange;
use barmark_core::view::{MarkerPaneView, TpoPaneView, UpdateType};
use barmark_protocol::{
    Bar, InternalMarker, InternalTpoProfile, MarkerPosition, SeriesMarker, SharedStr, ThemeToken,
    TimeIndex, TpoEntry, TpoPeriod, TpoProfile,
};

use crate::surface::EguiSurface;
use crate::theme::{self, ThemeMode};

const BAR_SPACING: f64 = 14.0;
const BAR_BODY_FRACTION: f32 = 0.6;

struct DemoTimeScale {
    left: f64,
    first_index: TimeIndex,
    bar_spacing: f64,
    visible: Option<IndexRange>,
}

impl TimeScale for DemoTimeScale {
    fn index_to_x(&self, index: TimeIndex) -> f64 {
        self.left + (index - self.first_index) as f64 * self.bar_spacing + self.bar_spacing / 2.0
    }

    fn visible_strict_range(&self) -> Option<IndexRange> {
        self.visible
    }

    fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }
}

struct DemoPriceScale {
    top: f64,
    height: f64,
    min_price: f64,
    max_price: f64,
}

impl PriceScale for DemoPriceScale {
    fn price_to_y(&self, price: f64, _first_value: f64) -> f64 {
        let span = (self.max_price - self.min_price).max(f64::EPSILON);
        self.top + (self.max_price - price) / span * self.height
    }
}

struct DemoSeries {
    store: MarkerStore,
    bars: BTreeMap<TimeIndex, Bar>,
    visible: bool,
}

impl SeriesData for DemoSeries {
    fn bar_at(&self, index: TimeIndex) -> Option<Bar> {
        self.bars.get(&index).copied()
    }

    fn first_value(&self) -> Option<f64> {
        self.bars.values().next().map(|b| b.close)
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn markers(&self) -> &[InternalMarker] {
        self.store.markers()
    }

    fn profiles(&self) -> &[InternalTpoProfile] {
        self.store.profiles()
    }
}

/// Deterministic synthetic walk — good enough to exercise the layout.
fn synth_bars(count: TimeIndex) -> BTreeMap<TimeIndex, Bar> {
    let mut bars = BTreeMap::new();
    for i in 0..count {
        let t = i as f64;
        let close = 100.0 + 14.0 * (t * 0.11).sin() + 5.0 * (t * 0.53).sin();
        let high = close + 2.0 + 1.5 * (t * 0.91).sin().abs();
        let low = close - 2.0 - 1.5 * (t * 0.67).cos().abs();
        bars.insert(i, Bar::new(high, low, close));
    }
    bars
}

fn synth_markers() -> Vec<SeriesMarker> {
    let mut markers = Vec::new();
    for i in (4..110).step_by(16) {
        markers.push(SeriesMarker {
            time: i,
            position: MarkerPosition::AboveBar,
            text: Some(SharedStr::from("sell")),
            external_id: Some(format!("sell-{i}")),
        });
        markers.push(SeriesMarker {
            time: i + 7,
            position: MarkerPosition::BelowBar,
            text: Some(SharedStr::from("buy")),
            external_id: Some(format!("buy-{}", i + 7)),
        });
    }
    // A stacked trio on one bar to show overlap avoidance.
    for label in ["tp1", "tp2", "tp3"] {
        markers.push(SeriesMarker {
            time: 60,
            position: MarkerPosition::AboveBar,
            text: Some(SharedStr::from(label)),
            external_id: Some(format!("stack-{label}")),
        });
    }
    markers.push(SeriesMarker {
        time: 30,
        position: MarkerPosition::InBar,
        text: Some(SharedStr::from("pivot")),
        external_id: Some("pivot-30".to_owned()),
    });
    markers
}

fn synth_profiles() -> Vec<TpoProfile> {
    let letters = ["A", "B", "C"];
    let mut periods = Vec::new();
    for (col, letter) in letters.iter().enumerate() {
        periods.push(TpoPeriod {
            letter: Some(SharedStr::from(*letter)),
            tpos: (0..4)
                .map(|row| TpoEntry {
                    price: 96.0 + f64::from(row) * 2.0,
                    column: Some(col as u32),
                })
                .collect(),
        });
    }
    vec![TpoProfile {
        time: 90,
        position: MarkerPosition::InBar,
        periods,
        text: None,
        external_id: Some("tpo-90".to_owned()),
    }]
}

/// Demo chart: synthetic OHLC bars with stacked markers and one TPO
/// letter lattice, hover hit-testing shown as a tooltip.
pub struct DemoApp {
    series: DemoSeries,
    marker_view: MarkerPaneView,
    tpo_view: TpoPaneView,
    options: LayoutOptions,
    theme_mode: ThemeMode,
}

impl DemoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut store = MarkerStore::new();
        store.set_markers(synth_markers())?;
        store.set_profiles(synth_profiles())?;

        Ok(Self {
            series: DemoSeries {
                store,
                bars: synth_bars(120),
                visible: true,
            },
            marker_view: MarkerPaneView::new(),
            tpo_view: TpoPaneView::new(),
            options: LayoutOptions::default(),
            theme_mode: ThemeMode::Dark,
        })
    }

    fn draw_bars(
        &self,
        painter: &egui::Painter,
        time_scale: &DemoTimeScale,
        price_scale: &DemoPriceScale,
        range: IndexRange,
    ) {
        let body_width = (time_scale.bar_spacing as f32 * BAR_BODY_FRACTION).max(1.0);
        for index in range.from..=range.to {
            let bar = match self.series.bar_at(index) {
                Some(bar) => bar,
                None => continue,
            };
            let x = time_scale.index_to_x(index) as f32;
            let y_high = price_scale.price_to_y(bar.high, 0.0) as f32;
            let y_low = price_scale.price_to_y(bar.low, 0.0) as f32;
            let y_close = price_scale.price_to_y(bar.close, 0.0) as f32;

            let wick = theme::resolve(ThemeToken::BarWick, self.theme_mode);
            painter.line_segment(
                [egui::pos2(x, y_high), egui::pos2(x, y_low)],
                egui::Stroke::new(1.0, wick),
            );

            let mid = (bar.high + bar.low) / 2.0;
            let token = if bar.close >= mid {
                ThemeToken::BarUp
            } else {
                ThemeToken::BarDown
            };
            let body = egui::Rect::from_center_size(
                egui::pos2(x, y_close),
                egui::vec2(body_width, 3.0),
            );
            painter.rect_filled(body, egui::CornerRadius::ZERO, theme::resolve(token, self.theme_mode));
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("barmark demo");
                ui.separator();
                let dark = self.theme_mode == ThemeMode::Dark;
                if ui.selectable_label(dark, "dark").clicked() {
                    self.theme_mode = ThemeMode::Dark;
                    ctx.set_visuals(egui::Visuals::dark());
                }
                if ui.selectable_label(!dark, "light").clicked() {
                    self.theme_mode = ThemeMode::Light;
                    ctx.set_visuals(egui::Visuals::light());
                }
                ui.separator();
                ui.checkbox(&mut self.series.visible, "series visible");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            let painter = ui.painter_at(rect);
            painter.rect_filled(
                rect,
                egui::CornerRadius::ZERO,
                theme::resolve(ThemeToken::Background, self.theme_mode),
            );

            // Show as many trailing bars as fit the panel width.
            let fitting = (f64::from(rect.width()) / BAR_SPACING).floor() as TimeIndex;
            let last = 119;
            let first = (last + 1 - fitting.clamp(1, 120)).max(0);
            let visible = IndexRange::new(first, last);

            let time_scale = DemoTimeScale {
                left: f64::from(rect.left()),
                first_index: first,
                bar_spacing: BAR_SPACING,
                visible: Some(visible),
            };

            // Price bounds over the visible window, padded by the space
            // the markers ask for.
            let mut min_price = f64::INFINITY;
            let mut max_price = f64::NEG_INFINITY;
            for index in visible.from..=visible.to {
                if let Some(bar) = self.series.bar_at(index) {
                    min_price = min_price.min(bar.low);
                    max_price = max_price.max(bar.high);
                }
            }
            if !min_price.is_finite() {
                return;
            }

            let inner_margin = {
                let ctx_probe = ChartContext {
                    time_scale: &time_scale,
                    price_scale: &DemoPriceScale {
                        top: 0.0,
                        height: 1.0,
                        min_price,
                        max_price,
                    },
                    series: &self.series,
                    options: &self.options,
                };
                self.marker_view
                    .auto_scale_margins(&ctx_probe)
                    .map_or(0.0, |m| m.above)
            };

            let price_scale = DemoPriceScale {
                top: f64::from(rect.top()) + inner_margin,
                height: (f64::from(rect.height()) - 2.0 * inner_margin).max(1.0),
                min_price,
                max_price,
            };

            self.draw_bars(&painter, &time_scale, &price_scale, visible);

            let chart_ctx = ChartContext {
                time_scale: &time_scale,
                price_scale: &price_scale,
                series: &self.series,
                options: &self.options,
            };

            // Scales are rebuilt per frame, so positions are always stale.
            self.marker_view.update(UpdateType::Layout);
            self.tpo_view.update(UpdateType::Layout);

            let hover = ui.input(|i| i.pointer.hover_pos());
            let mut hovered: Option<String> = None;

            if let Some(mut pass) = self.marker_view.renderer(&chart_ctx) {
                let mut surface = EguiSurface::new(&painter, self.theme_mode);
                pass.draw(&mut surface);
                if let Some(pos) = hover {
                    if let Some(hit) = pass.hit_test(f64::from(pos.x), f64::from(pos.y)) {
                        hovered = Some(hit.external_id.unwrap_or_else(|| {
                            format!("marker #{}", hit.internal_id)
                        }));
                    }
                }
            }

            if let Some(mut pass) = self.tpo_view.renderer(&chart_ctx) {
                let mut surface = EguiSurface::new(&painter, self.theme_mode);
                pass.draw(&mut surface);
                if hovered.is_none() {
                    if let Some(pos) = hover {
                        if let Some(hit) = pass.hit_test(f64::from(pos.x), f64::from(pos.y)) {
                            hovered = Some(hit.external_id.unwrap_or_else(|| {
                                format!("profile #{}", hit.internal_id)
                            }));
                        }
                    }
                }
            }

            if let Some(id) = hovered {
                #[allow(deprecated)]
                egui::show_tooltip_at_pointer(
                    ui.ctx(),
                    ui.layer_id(),
                    egui::Id::new("marker_tooltip"),
                    |ui| {
                        ui.label(id);
                    },
                );
            }
        });
    }
}
