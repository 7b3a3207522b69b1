//! The renderable surface: one `PlanBoard` per machine-timeline view.
//!
//! Owns the loaded operations, the visible time window, the pan gesture,
//! and a handle to the shared selection store. Everything is synchronous:
//! discrete input events mutate state, `render` emits the scene. Domain
//! invariants are re-clamped after every mutation, so no event sequence
//! can leave a degenerate window behind.

use plantafel_protocol::{Margins, Point, RenderCommand, Viewport};

use crate::gesture::{PanEffect, PanGesture};
use crate::lanes::{render_lane_labels, LaneLayout};
use crate::model::{Operation, TimeBounds, TimeMs};
use crate::selection::{KeyValueStore, Selection, SelectionStore};
use crate::viewport::{
    full_domain, initial_domain, padded_bounds, pan_by, wheel_zoom_factor, zoom_by,
    ViewportDomain,
};
use crate::views::gantt::{render_gantt, HitRegion};
use crate::views::tooltip::{
    anchor_above, anchor_with_flip, tooltip_lines, TooltipAnchor, GANTT_TOOLTIP_OFFSET,
    ROUTING_TOOLTIP_OFFSET,
};
use crate::{axis, views};

/// Toolbar zoom step ("+" / "−" buttons).
const BUTTON_ZOOM_FACTOR: f64 = 1.2;

/// Open tooltip, ready for the host to place.
#[derive(Debug, Clone)]
pub struct TooltipView {
    pub anchor: TooltipAnchor,
    pub lines: Vec<String>,
}

/// One render pass's output.
#[derive(Debug, Default)]
pub struct BoardScene {
    pub commands: Vec<RenderCommand>,
    /// No operations for the active scenario: the caller should present an
    /// informational empty state, not a blank canvas.
    pub no_data: bool,
}

pub struct PlanBoard<S: KeyValueStore> {
    operations: Vec<Operation>,
    bounds: Option<TimeBounds>,
    domain: Option<ViewportDomain>,
    viewport: Viewport,
    margins: Margins,
    gesture: PanGesture,
    show_all_labels: bool,
    store: SelectionStore<S>,
    hits: Vec<HitRegion>,
    tooltip: Option<TooltipView>,
}

impl<S: KeyValueStore> PlanBoard<S> {
    pub fn new(store: SelectionStore<S>) -> Self {
        Self {
            operations: Vec::new(),
            bounds: None,
            domain: None,
            viewport: Viewport::new(1000.0, 600.0),
            margins: Margins::default(),
            gesture: PanGesture::default(),
            show_all_labels: false,
            store,
            hits: Vec::new(),
            tooltip: None,
        }
    }

    /// Shared store handle, for wiring a second view or a scenario switch.
    pub fn store_mut(&mut self) -> &mut SelectionStore<S> {
        &mut self.store
    }

    pub fn domain(&self) -> Option<ViewportDomain> {
        self.domain
    }

    pub fn tooltip(&self) -> Option<&TooltipView> {
        self.tooltip.as_ref()
    }

    pub fn set_show_all_labels(&mut self, show_all: bool) {
        self.show_all_labels = show_all;
    }

    /// Replace the data set (scenario load or filter change). The window
    /// is seeded from the persisted domain when one fits the new bounds,
    /// else from the default two-week policy.
    pub fn load_operations(&mut self, operations: Vec<Operation>) {
        self.bounds = TimeBounds::from_operations(&operations).map(padded_bounds);
        self.operations = operations;
        self.tooltip = None;
        self.hits.clear();
        self.domain = self.bounds.map(|bounds| {
            match self.store.viewport_domain() {
                Some(saved) => saved.clamped(bounds),
                None => initial_domain(bounds),
            }
        });
    }

    /// Resize observation: pixel dimensions only, time domain untouched.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    fn apply_domain(&mut self, domain: ViewportDomain) {
        self.domain = Some(domain);
        self.store.set_viewport_domain(domain);
    }

    /// Continuous wheel zoom, recentred on the instant under the cursor.
    pub fn wheel(&mut self, delta_y: f64, x: f64) {
        let (Some(bounds), Some(domain)) = (self.bounds, self.domain) else {
            return;
        };
        let next = zoom_by(domain, bounds, wheel_zoom_factor(delta_y), self.time_at(x));
        self.apply_domain(next);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_button(BUTTON_ZOOM_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_button(1.0 / BUTTON_ZOOM_FACTOR);
    }

    fn zoom_button(&mut self, factor: f64) {
        let (Some(bounds), Some(domain)) = (self.bounds, self.domain) else {
            return;
        };
        self.apply_domain(zoom_by(domain, bounds, factor, None));
    }

    /// "Start" toolbar action: back to the default initial window.
    pub fn reset_to_default_window(&mut self) {
        let Some(bounds) = self.bounds else { return };
        self.apply_domain(initial_domain(bounds));
    }

    /// "Full" toolbar action: the whole data range.
    pub fn show_full_timeline(&mut self) {
        let Some(bounds) = self.bounds else { return };
        self.apply_domain(full_domain(bounds));
    }

    /// Time at a surface x coordinate, for anchor-aware callers.
    pub fn time_at(&self, x: f64) -> Option<TimeMs> {
        let domain = self.domain?;
        let inner = self.margins.inner_width(&self.viewport);
        let frac = ((x - self.margins.left) / inner).clamp(0.0, 1.0);
        Some(domain.start + frac * domain.span())
    }

    pub fn pointer_down(&mut self, x: f64) {
        if self.gesture.press(x) == PanEffect::Started {
            // A drag suppresses any open tooltip.
            self.tooltip = None;
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        match self.gesture.movement(x) {
            PanEffect::Moved { delta_px } => {
                let (Some(bounds), Some(domain)) = (self.bounds, self.domain) else {
                    return;
                };
                let px_per_ms = self.margins.inner_width(&self.viewport) / domain.span();
                let next = pan_by(domain, bounds, delta_px, px_per_ms);
                self.apply_domain(next);
            }
            PanEffect::None => self.update_hover(x, y),
            _ => {}
        }
    }

    pub fn pointer_up(&mut self) {
        self.gesture.release();
    }

    /// Leaving the drawing surface cancels a drag and closes the tooltip.
    pub fn pointer_left(&mut self) {
        self.gesture.release();
        self.tooltip = None;
    }

    fn update_hover(&mut self, x: f64, y: f64) {
        let p = Point::new(x, y);
        // Last drawn wins, matching paint order.
        let hit = self.hits.iter().rev().find(|h| h.rect.contains(p));
        self.tooltip = hit.and_then(|h| {
            let op = self.operations.iter().find(|o| o.id == h.op_id)?;
            Some(TooltipView {
                anchor: anchor_above(h.rect, GANTT_TOOLTIP_OFFSET),
                lines: tooltip_lines(op),
            })
        });
    }

    /// Click on the surface: when a bar is under the cursor, record the
    /// selection (scenario-keyed, persisted) and return it so the caller
    /// can navigate.
    pub fn click(&mut self, x: f64, y: f64) -> Option<Selection> {
        let p = Point::new(x, y);
        let hit = self.hits.iter().rev().find(|h| h.rect.contains(p))?.clone();
        let selection = Selection {
            order_no: hit.order_no,
            machine_id: hit.machine_id,
            operation_id: hit.op_id,
        };
        self.store.set_selection(selection.clone());
        Some(selection)
    }

    /// Build the scene for the current state, refreshing the hit regions.
    pub fn render(&mut self) -> BoardScene {
        let Some(domain) = self.domain else {
            self.hits.clear();
            return BoardScene {
                commands: Vec::new(),
                no_data: true,
            };
        };

        let layout = LaneLayout::from_operations(
            &self.operations,
            self.margins.top,
            self.margins.inner_height(&self.viewport),
        );
        let selected_order = self
            .store
            .selection()
            .map(|s| s.order_no.clone());

        let mut commands = Vec::new();
        commands.extend(render_lane_labels(&layout, &self.margins, self.show_all_labels));
        // Axis labels sit below the plot area, so the axis draws unclipped.
        commands.extend(axis::render_time_axis(domain, &self.viewport, &self.margins));
        commands.push(RenderCommand::SetClip {
            rect: plot_rect(&self.viewport, &self.margins),
        });
        let scene = render_gantt(
            &self.operations,
            &layout,
            domain,
            &self.viewport,
            &self.margins,
            selected_order.as_deref(),
        );
        commands.extend(scene.commands);
        commands.push(RenderCommand::ClearClip);

        self.hits = scene.hits;
        BoardScene {
            commands,
            no_data: false,
        }
    }
}

fn plot_rect(viewport: &Viewport, margins: &Margins) -> plantafel_protocol::Rect {
    plantafel_protocol::Rect::new(
        margins.left,
        margins.top,
        margins.inner_width(viewport),
        margins.inner_height(viewport),
    )
}

/// Routing-view state for one selected order. Holds only the bounded zoom
/// factor — the rest is derived per render.
#[derive(Debug, Default)]
pub struct RoutingBoard {
    zoom: views::routing::RoutingZoom,
    policy: views::routing::SortPolicy,
}

impl RoutingBoard {
    pub fn zoom(&self) -> views::routing::RoutingZoom {
        self.zoom
    }

    pub fn set_policy(&mut self, policy: views::routing::SortPolicy) {
        self.policy = policy;
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.zoom = self.zoom.wheel(delta_y);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.zoom_out();
    }

    pub fn reset(&mut self) {
        self.zoom = self.zoom.reset();
    }

    pub fn render(&self, operations: &[Operation]) -> views::routing::RoutingScene {
        views::routing::render_routing(operations, self.zoom, self.policy)
    }

    /// Tooltip for the bar under the cursor. Bars sit near the top of the
    /// routing surface, so the anchor flips below the bar when the natural
    /// position would leave the visible area.
    pub fn hover(
        &self,
        scene: &views::routing::RoutingScene,
        operations: &[Operation],
        x: f64,
        y: f64,
    ) -> Option<TooltipView> {
        let p = Point::new(x, y);
        let hit = scene.hits.iter().rev().find(|h| h.rect.contains(p))?;
        let op = operations.iter().find(|o| o.id == hit.op_id)?;
        Some(TooltipView {
            anchor: anchor_with_flip(hit.rect, ROUTING_TOOLTIP_OFFSET),
            lines: tooltip_lines(op),
        })
    }
}
