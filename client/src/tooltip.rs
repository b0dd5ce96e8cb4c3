use leptos::prelude::*;
use recognition_map_shared::StyleColors;
use recognition_map_shared::colors::with_alpha;
use recognition_map_shared::config::TooltipLayout;
use recognition_map_shared::tooltip::TooltipData;

use crate::map::{Interaction, SR_ONLY};

/// Marks the card so the map's pointer handlers can ignore events on it.
pub(crate) const TOOLTIP_CARD_ATTR: &str = "data-tooltip-card";

/// Floating detail card plus a polite live region announcing it.
#[component]
pub(crate) fn TooltipCard(colors: StyleColors, layout: TooltipLayout) -> impl IntoView {
    let Interaction(interaction) = expect_context();
    let current = Memo::new(move |_| interaction.with(|s| s.tooltip().cloned()));

    let announcement = move || {
        current.with(|t| {
            t.as_ref()
                .map(|t| format!("{}. {}", t.announcement(), t.status()))
                .unwrap_or_default()
        })
    };

    let card = move || {
        let Some(t) = current.get() else {
            return ().into_any();
        };
        card_view(t, &colors, &layout).into_any()
    };

    view! {
        <div role="status" aria-live="polite" style=SR_ONLY>{announcement}</div>
        {card}
    }
}

fn card_view(t: TooltipData, colors: &StyleColors, layout: &TooltipLayout) -> impl IntoView + use<> {
    let accent = colors.for_kind(t.recognition).to_string();
    let glow = with_alpha(&accent, 0.35);
    let [x, y] = t.position;
    let pointer_events = if t.pinned { "auto" } else { "none" };
    let style = format!(
        "position: absolute; left: {x}px; top: {y}px; width: {w}px; max-height: {h}px; overflow: hidden; box-sizing: border-box; padding: 10px 12px; border-radius: 10px; border-left: 4px solid {accent}; background: rgba(15,23,42,0.94); color: #e2e8f0; font-size: 12px; line-height: 1.4; box-shadow: 0 10px 28px {glow}; pointer-events: {pointer_events};",
        w = layout.width,
        h = layout.height,
    );
    let status = t.status();

    view! {
        <div style=style aria-hidden=(!t.pinned).to_string() data-tooltip-card="">
            <div style="font-weight: 600; font-size: 14px; margin-bottom: 2px;">{t.name}</div>
            <div style=format!("color: {accent};")>{status}</div>
            {t.since.map(|since| view! { <div style="color: #94a3b8;">"Since " {since}</div> })}
            {t.last_change_event.map(|event| view! { <div style="color: #cbd5e1;">{event}</div> })}
            {t.citation.map(|c| {
                view! {
                    <a
                        href=c.url
                        target="_blank"
                        rel="noopener noreferrer"
                        style="display: inline-block; margin-top: 4px; color: #93c5fd;"
                    >
                        {c.label}
                    </a>
                }
            })}
        </div>
    }
}
