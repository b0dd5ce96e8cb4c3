use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use leptos::html;
use leptos::prelude::*;
use recognition_map_shared::scene::ProjectedScene;
use recognition_map_shared::shadow_list::shadow_list;
use recognition_map_shared::{
    InteractionState, LoadError, MapConfig, MapContext, MapEvent, MapHeight, SpatialGrid, Viewport,
};
use wasm_bindgen::JsCast;

use crate::bindings::{EscapeBinding, ResizeBinding};
use crate::flag::flag_data_url;
use crate::legend::Legend;
use crate::loader::{MapData, load_map};
use crate::shadow_list::ShadowList;
use crate::surface::MapSurface;
use crate::tooltip::{TOOLTIP_CARD_ATTR, TooltipCard};

pub(crate) const SR_ONLY: &str = "position: absolute; width: 1px; height: 1px; padding: 0; margin: -1px; overflow: hidden; clip: rect(0, 0, 0, 0); white-space: nowrap; border: 0;";

const HELP_TEXT: &str = "Use the keyboard to tab through the hidden list of countries, then press Enter to pin a tooltip.";
const FALLBACK_OCEAN: &str = "#0b1d2a";
const UNPROJECTABLE_MESSAGE: &str = "Unable to render map: the country geometry has nothing to draw";

static INSTANCE: AtomicUsize = AtomicUsize::new(0);

#[derive(Clone)]
pub(crate) enum MapLoad {
    Loading,
    Ready(Arc<MapData>),
    Failed(String),
}

#[derive(Clone, Copy)]
pub(crate) struct Interaction(pub RwSignal<InteractionState>);
#[derive(Clone, Copy)]
pub(crate) struct Dispatch(pub Callback<MapEvent>);

/// Interactive map of which government each country in the Americas
/// recognizes. Loads its own data on mount.
#[component]
pub fn RecognitionMap(
    #[prop(optional)] config: Option<MapConfig>,
    #[prop(optional)] height: Option<MapHeight>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let mut config = config.unwrap_or_default();
    if let Some(height) = height {
        config.height = height;
    }
    let height_css = config.height.css();
    let config = StoredValue::new(config);
    let pattern_id = format!("recognition-flag-{}", INSTANCE.fetch_add(1, Ordering::Relaxed));

    let load: RwSignal<MapLoad> = RwSignal::new(MapLoad::Loading);
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let scene: RwSignal<Option<Arc<ProjectedScene>>> = RwSignal::new(None);
    let unprojectable = RwSignal::new(false);
    let interaction: RwSignal<InteractionState> = RwSignal::new(InteractionState::new());
    let flag_href: RwSignal<Option<String>> = RwSignal::new(None);
    let grid: StoredValue<SpatialGrid> = StoredValue::new(SpatialGrid::default());
    let resize: StoredValue<Option<ResizeBinding>, LocalStorage> = StoredValue::new_local(None);
    let escape: StoredValue<Option<EscapeBinding>, LocalStorage> = StoredValue::new_local(None);
    let container = NodeRef::<html::Div>::new();

    let dispatch = Callback::new(move |event: MapEvent| {
        let MapLoad::Ready(data) = load.get_untracked() else {
            return;
        };
        let scene = scene.get_untracked();
        config.with_value(|config| {
            let ctx = MapContext {
                bundle: &data.bundle,
                scene: scene.as_deref(),
                layout: &config.tooltip,
            };
            interaction.maybe_update(|state| state.handle(event, &ctx));
        });
    });

    provide_context(Interaction(interaction));
    provide_context(Dispatch(dispatch));

    // Fetch everything once on mount.
    Effect::new(move || {
        let config = config.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            let (next, failure) = load_outcome(load_map(&config).await);
            // `try_set` hands the value back when the map was unmounted while loading.
            if load.try_set(next).is_none()
                && let Some(e) = failure
            {
                web_sys::console::warn_1(&format!("recognition map: {e}").into());
            }
        });
    });

    Effect::new(move || {
        let Some(el) = container.get() else {
            return;
        };
        let delay = config.with_value(|c| c.resize_debounce_ms);
        let binding = ResizeBinding::observe(&el, delay, move |w, h| {
            let next = Viewport::new(w, h);
            if viewport.try_get_untracked() != Some(next) {
                let _ = viewport.try_set(next);
            }
        });
        resize.set_value(binding);
    });

    // Re-project on new data or a new viewport size.
    Effect::new(move || {
        let vp = viewport.get();
        let (ready, next) = load.with(|l| match l {
            MapLoad::Ready(data) => (
                true,
                config.with_value(|c| ProjectedScene::build(&data.geometry, vp, c)),
            ),
            _ => (false, None),
        });
        unprojectable.set(ready && vp.is_measured() && next.is_none());
        grid.set_value(next.as_ref().map(SpatialGrid::build).unwrap_or_default());
        scene.set(next.map(Arc::new));
        dispatch.run(MapEvent::Reprojected);
    });

    // Escape only listens while something is pinned.
    let has_pin = Memo::new(move |_| interaction.with(|s| s.pinned().is_some()));
    Effect::new(move || {
        let binding = if has_pin.get() {
            EscapeBinding::new(move || dispatch.run(MapEvent::Escape))
        } else {
            None
        };
        escape.set_value(binding);
    });

    Effect::new(move || {
        let ready = load.with(|l| matches!(l, MapLoad::Ready(_)));
        let wants_flag = config.with_value(|c| c.special.as_ref().is_some_and(|s| s.flag));
        if !ready || !wants_flag || flag_href.with_untracked(Option::is_some) {
            return;
        }
        match flag_data_url() {
            Ok(url) => flag_href.set(Some(url)),
            Err(e) => web_sys::console::warn_1(&e),
        }
    });

    on_cleanup(move || {
        escape.try_update_value(Option::take);
        resize.try_update_value(Option::take);
        interaction.try_update(InteractionState::teardown);
    });

    let local_point = move |client_x: i32, client_y: i32| -> Option<[f64; 2]> {
        let el = container.get_untracked()?;
        let rect = el.get_bounding_client_rect();
        Some([client_x as f64 - rect.left(), client_y as f64 - rect.top()])
    };
    let hit = move |[x, y]: [f64; 2]| grid.with_value(|g| g.find_at(x, y).map(str::to_string));

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        if within_tooltip_card(ev.target()) {
            return;
        }
        let Some(point) = local_point(ev.client_x(), ev.client_y()) else {
            return;
        };
        dispatch.run(MapEvent::PointerMove {
            iso: hit(point),
            point,
        });
    };
    let on_click = move |ev: web_sys::MouseEvent| {
        if within_tooltip_card(ev.target()) {
            return;
        }
        let Some(point) = local_point(ev.client_x(), ev.client_y()) else {
            return;
        };
        dispatch.run(MapEvent::Click {
            iso: hit(point),
            point,
        });
    };

    let area_style = move || {
        let ocean = load.with(|l| match l {
            MapLoad::Ready(data) => data.bundle.colors.ocean.clone(),
            _ => FALLBACK_OCEAN.to_string(),
        });
        let cursor = if interaction.with(|s| s.hovered().is_some()) {
            "pointer"
        } else {
            "default"
        };
        format!(
            "position: relative; width: 100%; height: {height_css}; overflow: hidden; border-radius: 12px; background: {ocean}; cursor: {cursor};"
        )
    };

    let body = move || match load.get() {
        MapLoad::Loading => status_panel("Loading map\u{2026}", false).into_any(),
        MapLoad::Failed(message) => {
            status_panel(&format!("Unable to render map: {message}"), true).into_any()
        }
        MapLoad::Ready(data) => {
            let pattern_id = pattern_id.clone();
            (move || match scene.get() {
                Some(scene) => view! {
                    <MapSurface
                        data=data.clone()
                        scene=scene
                        flag_href=flag_href
                        pattern_id=pattern_id.clone()
                        config=config
                    />
                }
                .into_any(),
                None if unprojectable.get() => {
                    status_panel(UNPROJECTABLE_MESSAGE, true).into_any()
                }
                None => status_panel("Loading map\u{2026}", false).into_any(),
            })
            .into_any()
        }
    };

    let tooltip = move || match load.get() {
        MapLoad::Ready(data) => {
            let layout = config.with_value(|c| c.tooltip);
            view! { <TooltipCard colors=data.bundle.colors.clone() layout=layout /> }.into_any()
        }
        _ => ().into_any(),
    };

    let overlays = move || match load.get() {
        MapLoad::Ready(data) => {
            let items = shadow_list(&data.bundle.entries);
            view! {
                <Legend colors=data.bundle.colors.clone() />
                <ShadowList items=items />
            }
            .into_any()
        }
        _ => ().into_any(),
    };

    view! {
        <section class=class role="region" aria-label="Diplomatic recognition map" style="position: relative; width: 100%;">
            <div
                node_ref=container
                style=area_style
                on:pointermove=on_pointer_move
                on:pointerleave=move |_| dispatch.run(MapEvent::PointerLeave)
                on:click=on_click
            >
                {body}
                {tooltip}
            </div>
            {overlays}
            <p style="margin: 10px 2px 0; font-size: 13px; color: #94a3b8;">{HELP_TEXT}</p>
            {move || {
                if has_pin.get() {
                    view! {
                        <button
                            type="button"
                            style="margin-top: 6px; padding: 6px 12px; border-radius: 6px; border: 1px solid #334155; background: #1e293b; color: #e2e8f0; cursor: pointer;"
                            on:click=move |_| dispatch.run(MapEvent::ClearPinned)
                        >
                            "Clear pinned tooltip"
                        </button>
                    }
                    .into_any()
                } else {
                    ().into_any()
                }
            }}
        </section>
    }
}

/// The state to publish, plus the error worth logging if it is accepted.
fn load_outcome(result: Result<MapData, LoadError>) -> (MapLoad, Option<LoadError>) {
    match result {
        Ok(data) => (MapLoad::Ready(Arc::new(data)), None),
        Err(e) => (MapLoad::Failed(e.to_string()), Some(e)),
    }
}

fn tooltip_card_selector() -> String {
    format!("[{TOOLTIP_CARD_ATTR}]")
}

/// Events from inside the tooltip card belong to the card, not the map.
fn within_tooltip_card(target: Option<web_sys::EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest(&tooltip_card_selector()).ok().flatten())
        .is_some()
}

fn status_panel(message: &str, error: bool) -> impl IntoView + use<> {
    let (role, color) = if error {
        ("alert", "#fca5a5")
    } else {
        ("status", "#94a3b8")
    };
    view! {
        <div
            role=role
            style=format!("position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; padding: 24px; text-align: center; font-size: 14px; color: {color};")
        >
            {message.to_string()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use recognition_map_shared::{LoadErrorKind, Resource};

    use super::*;

    #[test]
    fn failed_load_carries_message_and_error() {
        let err = LoadError::new(Resource::Geometry, "/data/geo.json", LoadErrorKind::Status(500));
        let (state, failure) = load_outcome(Err(err.clone()));
        match state {
            MapLoad::Failed(message) => assert_eq!(message, err.to_string()),
            _ => panic!("expected a failed load"),
        }
        assert_eq!(failure, Some(err));
    }

    #[test]
    fn card_selector_matches_the_card_marker() {
        assert_eq!(tooltip_card_selector(), "[data-tooltip-card]");
    }
}
