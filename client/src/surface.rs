use std::sync::Arc;

use leptos::prelude::*;
use recognition_map_shared::MapConfig;
use recognition_map_shared::scene::ProjectedScene;
use recognition_map_shared::style::{emphasis, fill_color, highlight_targets};

use crate::loader::MapData;
use crate::map::Interaction;

const GRATICULE_STROKE: &str = "rgba(255,255,255,0.08)";
const HIGHLIGHT_WIDTH: &str = "2.5";

/// One projected frame: graticule, country fills, and the highlight layer.
#[component]
pub(crate) fn MapSurface(
    data: Arc<MapData>,
    scene: Arc<ProjectedScene>,
    flag_href: RwSignal<Option<String>>,
    pattern_id: String,
    config: StoredValue<MapConfig>,
) -> impl IntoView {
    let Interaction(interaction) = expect_context();
    let width = scene.viewport.width;
    let height = scene.viewport.height;
    let colors = &data.bundle.colors;

    let graticule = scene
        .graticule
        .iter()
        .map(|line| view! { <path d=line.path.clone() /> })
        .collect_view();

    let countries = scene
        .countries
        .iter()
        .map(|country| {
            let iso = country.iso.clone();
            let recognition = data.bundle.entries.get(&iso).map(|e| e.recognition);
            let special = config.with_value(|c| c.special_for(&iso).cloned());
            let base_fill = fill_color(recognition, colors, special.as_ref());
            let textured = special.is_some_and(|s| s.flag);
            let pattern_fill = format!("url(#{pattern_id})");
            let fill = move || {
                if textured && flag_href.with(Option::is_some) {
                    pattern_fill.clone()
                } else {
                    base_fill.clone()
                }
            };
            let look = Memo::new(move |_| {
                interaction.with(|s| {
                    emphasis(
                        recognition,
                        s.legend(),
                        s.hovered() == Some(iso.as_str()),
                        s.pinned() == Some(iso.as_str()),
                    )
                })
            });
            view! {
                <path
                    d=country.path.clone()
                    fill=fill
                    stroke=colors.ocean.clone()
                    stroke-linejoin="round"
                    fill-opacity=move || look.get().fill_opacity.to_string()
                    stroke-opacity=move || look.get().outline_opacity.to_string()
                    stroke-width=move || look.get().outline_width.to_string()
                />
            }
        })
        .collect_view();

    let highlight = {
        let scene = scene.clone();
        let stroke = colors.hover_stroke.clone();
        move || {
            interaction.with(|s| {
                highlight_targets(s.hovered(), s.pinned())
                    .into_iter()
                    .filter_map(|iso| scene.country(iso))
                    .map(|c| {
                        view! {
                            <path
                                d=c.path.clone()
                                fill="none"
                                stroke=stroke.clone()
                                stroke-width=HIGHLIGHT_WIDTH
                                stroke-linejoin="round"
                            />
                        }
                    })
                    .collect_view()
            })
        }
    };

    let pattern = move || {
        flag_href.get().map(|href| {
            view! {
                <defs>
                    <pattern
                        id=pattern_id.clone()
                        patternUnits="objectBoundingBox"
                        patternContentUnits="objectBoundingBox"
                        width="1"
                        height="1"
                    >
                        <image href=href width="1" height="1" preserveAspectRatio="none" />
                    </pattern>
                </defs>
            }
        })
    };

    view! {
        <svg
            width=width.to_string()
            height=height.to_string()
            viewBox=format!("0 0 {width} {height}")
            role="img"
            aria-label="Map of diplomatic recognition across the Americas"
            style="display: block;"
        >
            {pattern}
            <g
                fill="none"
                stroke=GRATICULE_STROKE
                stroke-width="0.8"
                stroke-dasharray="2 4"
                pointer-events="none"
                aria-hidden="true"
            >
                {graticule}
            </g>
            <g>{countries}</g>
            <g pointer-events="none">{highlight}</g>
        </svg>
    }
}
