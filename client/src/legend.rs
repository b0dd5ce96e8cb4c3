use leptos::prelude::*;
use recognition_map_shared::colors::with_alpha;
use recognition_map_shared::{MapEvent, RecognitionKind, StyleColors};

use crate::map::{Dispatch, Interaction};

const BUTTON_STYLE: &str = "display: flex; align-items: center; gap: 8px; padding: 4px 10px; border: 0; border-radius: 999px; background: rgba(15,23,42,0.72); color: #e2e8f0; font-size: 12px; cursor: pointer;";

#[component]
pub(crate) fn Legend(colors: StyleColors) -> impl IntoView {
    let Interaction(interaction) = expect_context();
    let Dispatch(dispatch) = expect_context();

    let buttons = RecognitionKind::ALL
        .into_iter()
        .map(|kind| {
            let color = colors.for_kind(kind).to_string();
            let ring = with_alpha(&color, 0.45);
            let active = Memo::new(move |_| interaction.with(|s| s.legend().is_active(kind)));
            view! {
                <button
                    type="button"
                    aria-pressed=move || active.get().to_string()
                    on:click=move |_| dispatch.run(MapEvent::ToggleLegend(kind))
                    style=move || {
                        let opacity = if active.get() { "1" } else { "0.45" };
                        format!("{BUTTON_STYLE} opacity: {opacity};")
                    }
                >
                    <span style=move || {
                        let fill = if active.get() { color.as_str() } else { "transparent" };
                        format!(
                            "width: 10px; height: 10px; border-radius: 3px; border: 1px solid {color}; background: {fill}; box-shadow: 0 0 0 2px {ring};"
                        )
                    }></span>
                    {kind.legend_label()}
                </button>
            }
        })
        .collect_view();

    view! {
        <div
            role="group"
            aria-label="Legend"
            style="position: absolute; top: 12px; left: 12px; display: flex; flex-wrap: wrap; gap: 6px;"
        >
            {buttons}
        </div>
    }
}
