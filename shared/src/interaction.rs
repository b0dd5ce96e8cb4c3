//! Hover, pin, and legend state for the map, driven by one event stream
//! from pointer, keyboard, and legend controls.
//!
//! A pinned country keeps its tooltip until it is explicitly cleared.
//! Hovering another country while something is pinned shows that country's
//! tooltip transiently; when the pointer or focus moves away the pinned
//! tooltip comes back, anchored at the pinned country's centroid.

use tracing::debug;

use crate::config::TooltipLayout;
use crate::dataset::{RecognitionBundle, RecognitionEntry, RecognitionKind};
use crate::legend::LegendState;
use crate::scene::{Point, ProjectedScene};
use crate::tooltip::{TooltipData, clamp_position, place};
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Pointer moved over the map; `iso` is the country under it, if any.
    PointerMove { iso: Option<String>, point: Point },
    PointerLeave,
    Click { iso: Option<String>, point: Point },
    Escape,
    ToggleLegend(RecognitionKind),
    ListFocus(String),
    ListActivate(String),
    ListBlur,
    ClearPinned,
    /// The scene was rebuilt for a new viewport.
    Reprojected,
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Hovering(String),
    Pinned(String),
    HoveringOtherWhilePinned { hovered: String, pinned: String },
}

/// What the state machine reads but does not own.
#[derive(Debug, Clone, Copy)]
pub struct MapContext<'a> {
    pub bundle: &'a RecognitionBundle,
    pub scene: Option<&'a ProjectedScene>,
    pub layout: &'a TooltipLayout,
}

impl MapContext<'_> {
    fn viewport(&self) -> Viewport {
        self.scene.map(|s| s.viewport).unwrap_or_default()
    }

    fn centroid(&self, iso: &str) -> Option<Point> {
        self.scene.and_then(|s| s.centroid(iso))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    legend: LegendState,
    hovered: Option<String>,
    pinned: Option<String>,
    /// Where the pin was placed; used when no centroid is available.
    pin_point: Option<Point>,
    tooltip: Option<TooltipData>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn legend(&self) -> &LegendState {
        &self.legend
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    pub fn tooltip(&self) -> Option<&TooltipData> {
        self.tooltip.as_ref()
    }

    pub fn phase(&self) -> Phase {
        match (&self.hovered, &self.pinned) {
            (None, None) => Phase::Idle,
            (Some(h), None) => Phase::Hovering(h.clone()),
            (None, Some(p)) => Phase::Pinned(p.clone()),
            (Some(h), Some(p)) if h == p => Phase::Pinned(p.clone()),
            (Some(h), Some(p)) => Phase::HoveringOtherWhilePinned {
                hovered: h.clone(),
                pinned: p.clone(),
            },
        }
    }

    /// Forget everything, including the legend. Safe to call without data.
    pub fn teardown(&mut self) {
        *self = Self::default();
    }

    /// Apply one event. Returns `false` when the event changed nothing.
    pub fn handle(&mut self, event: MapEvent, ctx: &MapContext<'_>) -> bool {
        let before = self.clone();
        match event {
            MapEvent::PointerMove { iso, point } => self.pointer_move(iso.as_deref(), point, ctx),
            MapEvent::PointerLeave => self.release_hover(ctx),
            MapEvent::Click { iso: Some(iso), point } => self.click(&iso, point, ctx),
            MapEvent::Click { iso: None, .. } | MapEvent::Escape | MapEvent::ClearPinned => {
                self.clear_pinned()
            }
            MapEvent::ToggleLegend(kind) => self.toggle_legend(kind, ctx),
            MapEvent::ListFocus(iso) => self.focus(&iso, false, ctx),
            MapEvent::ListActivate(iso) => self.focus(&iso, true, ctx),
            MapEvent::ListBlur => self.release_hover(ctx),
            MapEvent::Reprojected => self.reproject(ctx),
            MapEvent::Teardown => self.teardown(),
        }
        *self != before
    }

    /// Entry for `iso` if it exists and its kind is shown.
    fn active_entry<'b>(&self, iso: &str, ctx: &MapContext<'b>) -> Option<&'b RecognitionEntry> {
        let Some(entry) = ctx.bundle.entries.get(iso) else {
            debug!(iso, "no recognition entry");
            return None;
        };
        self.legend.is_active(entry.recognition).then_some(entry)
    }

    fn pointer_move(&mut self, iso: Option<&str>, point: Point, ctx: &MapContext<'_>) {
        let Some(iso) = iso else {
            self.release_hover(ctx);
            return;
        };
        let Some(entry) = self.active_entry(iso, ctx) else {
            self.release_hover(ctx);
            return;
        };
        self.hovered = Some(iso.to_string());
        if self.pinned.as_deref() == Some(iso) {
            // The pinned tooltip stays put while the pointer wanders over its country.
            if self.tooltip.as_ref().is_none_or(|t| t.iso != iso) {
                self.show_pinned(ctx);
            }
            return;
        }
        let position = place(point, ctx.viewport(), ctx.layout);
        self.tooltip = Some(TooltipData::for_entry(entry, ctx.bundle, position, false));
    }

    fn click(&mut self, iso: &str, point: Point, ctx: &MapContext<'_>) {
        let Some(entry) = self.active_entry(iso, ctx) else {
            return;
        };
        let position = place(point, ctx.viewport(), ctx.layout);
        self.hovered = Some(iso.to_string());
        self.pinned = Some(iso.to_string());
        self.pin_point = Some(position);
        self.tooltip = Some(TooltipData::for_entry(entry, ctx.bundle, position, true));
    }

    fn focus(&mut self, iso: &str, pin: bool, ctx: &MapContext<'_>) {
        let Some(entry) = self.active_entry(iso, ctx) else {
            return;
        };
        let Some(centroid) = ctx.centroid(iso) else {
            debug!(iso, "country has no centroid in the current scene");
            return;
        };
        let position = place(centroid, ctx.viewport(), ctx.layout);
        self.hovered = Some(iso.to_string());
        if pin {
            self.pinned = Some(iso.to_string());
            self.pin_point = Some(position);
        }
        let pinned = self.pinned.as_deref() == Some(iso);
        self.tooltip = Some(TooltipData::for_entry(entry, ctx.bundle, position, pinned));
    }

    /// Hover ends. An active pin gets its tooltip back; otherwise the
    /// tooltip goes away.
    fn release_hover(&mut self, ctx: &MapContext<'_>) {
        self.hovered = None;
        if self.pinned.is_some() {
            self.show_pinned(ctx);
        } else {
            self.tooltip = None;
        }
    }

    fn show_pinned(&mut self, ctx: &MapContext<'_>) {
        let Some(iso) = self.pinned.clone() else {
            return;
        };
        let Some(entry) = ctx.bundle.entries.get(&iso) else {
            self.unpin();
            return;
        };
        let anchor = ctx
            .centroid(&iso)
            .map(|c| place(c, ctx.viewport(), ctx.layout))
            .or(self.pin_point);
        let Some(position) = anchor else {
            self.unpin();
            return;
        };
        self.tooltip = Some(TooltipData::for_entry(entry, ctx.bundle, position, true));
    }

    fn unpin(&mut self) {
        self.pinned = None;
        self.pin_point = None;
        self.tooltip = None;
    }

    fn clear_pinned(&mut self) {
        if self.pinned.take().is_none() {
            return;
        }
        self.pin_point = None;
        // A country still under the pointer keeps an unpinned tooltip.
        match (&self.hovered, self.tooltip.as_mut()) {
            (Some(h), Some(t)) if *h == t.iso => t.pinned = false,
            _ => {
                self.hovered = None;
                self.tooltip = None;
            }
        }
    }

    fn toggle_legend(&mut self, kind: RecognitionKind, ctx: &MapContext<'_>) {
        if !self.legend.toggle(kind) {
            return;
        }
        let inactive = |iso: &Option<String>| {
            iso.as_deref()
                .and_then(|i| ctx.bundle.entries.get(i))
                .is_some_and(|e| !self.legend.is_active(e.recognition))
        };
        if inactive(&self.pinned) {
            self.pinned = None;
            self.pin_point = None;
        }
        if inactive(&self.hovered) {
            self.hovered = None;
        }
        let stale = self
            .tooltip
            .as_ref()
            .is_some_and(|t| !self.legend.is_active(t.recognition));
        if stale {
            self.tooltip = None;
            if self.pinned.is_some() {
                self.show_pinned(ctx);
            }
        }
    }

    fn reproject(&mut self, ctx: &MapContext<'_>) {
        let Some(tooltip) = self.tooltip.as_mut() else {
            return;
        };
        if tooltip.pinned {
            self.show_pinned(ctx);
        } else {
            tooltip.position = clamp_position(tooltip.position, ctx.viewport(), ctx.layout);
        }
    }
}
