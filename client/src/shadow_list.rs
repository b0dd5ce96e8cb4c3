use leptos::prelude::*;
use recognition_map_shared::MapEvent;
use recognition_map_shared::shadow_list::ShadowListItem;

use crate::map::{Dispatch, Interaction, SR_ONLY};

/// Visually hidden list giving keyboard and screen-reader users a way to
/// reach every country.
#[component]
pub(crate) fn ShadowList(items: Vec<ShadowListItem>) -> impl IntoView {
    let Interaction(interaction) = expect_context();
    let Dispatch(dispatch) = expect_context();

    let rows = items
        .into_iter()
        .map(|item| {
            let label = item.label();
            let focus_iso = item.iso.clone();
            let activate_iso = item.iso.clone();
            let disabled = Memo::new(move |_| interaction.with(|s| item.is_disabled(s.legend())));
            view! {
                <li>
                    <button
                        type="button"
                        disabled=move || disabled.get()
                        on:focus=move |_| dispatch.run(MapEvent::ListFocus(focus_iso.clone()))
                        on:blur=move |_| dispatch.run(MapEvent::ListBlur)
                        on:click=move |_| dispatch.run(MapEvent::ListActivate(activate_iso.clone()))
                    >
                        {label}
                    </button>
                </li>
            }
        })
        .collect_view();

    view! {
        <ul aria-label="Countries" style=SR_ONLY>
            {rows}
        </ul>
    }
}
