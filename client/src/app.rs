use leptos::prelude::*;
use recognition_map_shared::MapHeight;
use recognition_map_shared::config::EMBEDDED_MAP_HEIGHT;

use crate::map::RecognitionMap;

/// Page host. Embeds the map at the shorter article height.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <main>
            <h1 style="font-size: 22px; margin: 0 0 6px;">"Who recognizes whom in the Americas"</h1>
            <p style="margin: 0 0 16px; color: #94a3b8; font-size: 14px;">
                "Each country is colored by whether it maintains diplomatic relations with Beijing or with Taipei."
            </p>
            <InteractiveMap />
        </main>
    }
}

/// Article embed of the recognition map with its own default height.
#[component]
pub fn InteractiveMap(#[prop(optional)] height: Option<MapHeight>) -> impl IntoView {
    let height = height.unwrap_or(MapHeight::Px(EMBEDDED_MAP_HEIGHT));
    view! { <RecognitionMap height=height /> }
}
