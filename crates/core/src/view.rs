//! Pane view controllers: orchestrate invalidation, pull annotations
//! from the series store, run the layout pass, and lend the renderer a
//! fully resolved snapshot for one frame.

use barmark_protocol::{InternalMarker, InternalTpoProfile};

use crate::chart::ChartContext;
use crate::layout::{self, Offsets, ShapeMetrics};
use crate::render::{Hit, MarkerRenderer, RendererData, RendererItem, ResolvedLabel, Surface};
use crate::time_data::visible_timed_values;

/// What changed since the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateType {
    /// The marker/profile set itself changed: the item array is rebuilt
    /// (ids re-pulled from the store) before positions are recomputed.
    Data,
    /// Only view parameters changed: positions are recomputed in place.
    Layout,
}

/// Vertical space to reserve beyond the bar price range so markers fit
/// under automatic price-axis scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScaleMargins {
    pub above: f64,
    pub below: f64,
}

/// One frame's draw/hit-test handle. Borrows the controller's renderer
/// and snapshot, so it cannot outlive the frame — the controller is free
/// to mutate the snapshot again once the pass is dropped.
pub struct RenderPass<'a> {
    renderer: &'a mut MarkerRenderer,
    data: &'a mut RendererData,
}

impl RenderPass<'_> {
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        self.renderer.draw(self.data, surface);
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<Hit> {
        self.renderer.hit_test(self.data, x, y)
    }

    /// Read-only view of the resolved snapshot, mainly for tests.
    pub fn data(&self) -> &RendererData {
        self.data
    }
}

fn rebuild_items<T>(source: &[T], make: impl Fn(&T) -> RendererItem) -> Vec<RendererItem> {
    source.iter().map(make).collect()
}

fn compute_margins(has_annotations: bool, bar_spacing: f64) -> Option<AutoScaleMargins> {
    if !has_annotations {
        return None;
    }
    let margin = layout::auto_scale_margin(bar_spacing);
    Some(AutoScaleMargins {
        above: margin,
        below: margin,
    })
}

/// Controller for dynamically stacked markers (the above/below/in-bar
/// variant with overlap avoidance).
pub struct MarkerPaneView {
    data: RendererData,
    renderer: MarkerRenderer,
    invalidated: bool,
    data_invalidated: bool,
    margins_invalidated: bool,
    auto_scale_margins: Option<AutoScaleMargins>,
}

impl MarkerPaneView {
    pub fn new() -> Self {
        Self {
            data: RendererData::default(),
            renderer: MarkerRenderer::new(),
            invalidated: true,
            data_invalidated: true,
            margins_invalidated: true,
            auto_scale_margins: None,
        }
    }

    pub fn update(&mut self, update: UpdateType) {
        self.invalidated = true;
        self.margins_invalidated = true;
        if update == UpdateType::Data {
            self.data_invalidated = true;
        }
    }

    /// Revalidate if needed and hand out this frame's render pass.
    /// A hidden series renders nothing and leaves cached state alone.
    pub fn renderer(&mut self, ctx: &ChartContext<'_>) -> Option<RenderPass<'_>> {
        if !ctx.series.is_visible() {
            return None;
        }
        if self.invalidated {
            self.make_valid(ctx);
        }
        self.renderer
            .set_params(ctx.options.font_size, &ctx.options.font_family);
        Some(RenderPass {
            renderer: &mut self.renderer,
            data: &mut self.data,
        })
    }

    /// Recomputed only when explicitly marked stale — it depends on bar
    /// spacing, not on per-marker data.
    pub fn auto_scale_margins(&mut self, ctx: &ChartContext<'_>) -> Option<AutoScaleMargins> {
        if self.margins_invalidated {
            self.auto_scale_margins = compute_margins(
                !ctx.series.markers().is_empty(),
                ctx.time_scale.bar_spacing(),
            );
            self.margins_invalidated = false;
        }
        self.auto_scale_margins
    }

    fn make_valid(&mut self, ctx: &ChartContext<'_>) {
        let markers = ctx.series.markers();
        if self.data_invalidated {
            self.data.items = rebuild_items(markers, |m: &InternalMarker| RendererItem {
                time: m.marker.time,
                x: 0.0,
                y: 0.0,
                internal_id: m.internal_id,
                external_id: m.marker.external_id.clone(),
                labels: m
                    .marker
                    .text
                    .iter()
                    .map(|text| ResolvedLabel::unmeasured(text.clone()))
                    .collect(),
            });
            self.data_invalidated = false;
        }

        self.data.visible_range = None;
        let Some(visible_bars) = ctx.time_scale.visible_strict_range() else {
            return;
        };
        let Some(first_value) = ctx.series.first_value() else {
            return;
        };
        if self.data.items.is_empty() {
            return;
        }

        let metrics = ShapeMetrics::new(ctx.time_scale.bar_spacing(), ctx.options.font_size);
        let mut offsets = Offsets::new(metrics.shape_margin);
        let mut prev_time = None;

        // Extended: a marker one bar off-screen may still poke into view.
        let range = visible_timed_values(&self.data.items, visible_bars, true);
        self.data.visible_range = Some(range);

        for index in range.from..range.to {
            let marker = &markers[index];
            if prev_time != Some(marker.marker.time) {
                // New bar: stacking starts over.
                offsets.reset();
                prev_time = Some(marker.marker.time);
            }

            let item = &mut self.data.items[index];
            item.x = ctx.time_scale.index_to_x(marker.marker.time);
            let Some(bar) = ctx.series.bar_at(marker.marker.time) else {
                // No data at this index: keep stale geometry, move on.
                continue;
            };
            layout::place_marker(
                item,
                marker.marker.position,
                &bar,
                ctx.price_scale,
                first_value,
                &metrics,
                &mut offsets,
            );
        }
        self.invalidated = false;
    }
}

impl Default for MarkerPaneView {
    fn default() -> Self {
        Self::new()
    }
}

/// Controller for the TPO letter-lattice variant. Same invalidation
/// machinery as [`MarkerPaneView`], but placement is the fixed
/// column/row grid — no stacking state.
pub struct TpoPaneView {
    data: RendererData,
    renderer: MarkerRenderer,
    invalidated: bool,
    data_invalidated: bool,
    margins_invalidated: bool,
    auto_scale_margins: Option<AutoScaleMargins>,
}

impl TpoPaneView {
    pub fn new() -> Self {
        Self {
            data: RendererData::default(),
            renderer: MarkerRenderer::new(),
            invalidated: true,
            data_invalidated: true,
            margins_invalidated: true,
            auto_scale_margins: None,
        }
    }

    pub fn update(&mut self, update: UpdateType) {
        self.invalidated = true;
        self.margins_invalidated = true;
        if update == UpdateType::Data {
            self.data_invalidated = true;
        }
    }

    pub fn renderer(&mut self, ctx: &ChartContext<'_>) -> Option<RenderPass<'_>> {
        if !ctx.series.is_visible() {
            return None;
        }
        if self.invalidated {
            self.make_valid(ctx);
        }
        self.renderer
            .set_params(ctx.options.font_size, &ctx.options.font_family);
        Some(RenderPass {
            renderer: &mut self.renderer,
            data: &mut self.data,
        })
    }

    pub fn auto_scale_margins(&mut self, ctx: &ChartContext<'_>) -> Option<AutoScaleMargins> {
        if self.margins_invalidated {
            self.auto_scale_margins = compute_margins(
                !ctx.series.profiles().is_empty(),
                ctx.time_scale.bar_spacing(),
            );
            self.margins_invalidated = false;
        }
        self.auto_scale_margins
    }

    fn make_valid(&mut self, ctx: &ChartContext<'_>) {
        let profiles = ctx.series.profiles();
        if self.data_invalidated {
            self.data.items = rebuild_items(profiles, |p: &InternalTpoProfile| RendererItem {
                time: p.profile.time,
                x: 0.0,
                y: 0.0,
                internal_id: p.internal_id,
                external_id: p.profile.external_id.clone(),
                labels: Vec::new(),
            });
            self.data_invalidated = false;
        }

        self.data.visible_range = None;
        let Some(visible_bars) = ctx.time_scale.visible_strict_range() else {
            return;
        };
        let Some(first_value) = ctx.series.first_value() else {
            return;
        };
        if self.data.items.is_empty() {
            return;
        }

        let range = visible_timed_values(&self.data.items, visible_bars, true);
        self.data.visible_range = Some(range);

        for index in range.from..range.to {
            let profile = &profiles[index];
            let item = &mut self.data.items[index];
            item.x = ctx.time_scale.index_to_x(profile.profile.time);
            layout::fill_lattice(item, &profile.profile, ctx.price_scale, first_value);
        }
        self.invalidated = false;
    }
}

impl Default for TpoPaneView {
    fn default() -> Self {
        Self::new()
    }
}
