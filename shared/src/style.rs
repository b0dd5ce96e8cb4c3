use crate::config::SpecialTreatment;
use crate::dataset::{RecognitionKind, StyleColors};
use crate::legend::LegendState;

const ACTIVE_OPACITY: f64 = 0.9;
const EMPHASIZED_OPACITY: f64 = 1.0;
const DIMMED_OPACITY: f64 = 0.15;
const OUTLINE_OPACITY: f64 = 0.35;
const DIMMED_OUTLINE_OPACITY: f64 = 0.08;
const OUTLINE_WIDTH: f64 = 1.6;
const EMPHASIZED_OUTLINE_WIDTH: f64 = 2.2;

/// Base fill for a country: special treatment, then recognition color,
/// then the neutral token for countries without an entry.
pub fn fill_color(
    recognition: Option<RecognitionKind>,
    colors: &StyleColors,
    special: Option<&SpecialTreatment>,
) -> String {
    if let Some(special) = special {
        return special.color.clone();
    }
    match recognition {
        Some(kind) => colors.for_kind(kind).to_string(),
        None => colors.neutral.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emphasis {
    pub fill_opacity: f64,
    pub outline_opacity: f64,
    pub outline_width: f64,
    pub dimmed: bool,
    pub emphasized: bool,
}

/// Opacity and outline for one country given the legend and which
/// countries are hovered and pinned.
pub fn emphasis(
    recognition: Option<RecognitionKind>,
    legend: &LegendState,
    hovered: bool,
    pinned: bool,
) -> Emphasis {
    let active = legend.is_visible(recognition);
    let emphasized = active && (hovered || pinned);
    Emphasis {
        fill_opacity: match (active, emphasized) {
            (false, _) => DIMMED_OPACITY,
            (true, true) => EMPHASIZED_OPACITY,
            (true, false) => ACTIVE_OPACITY,
        },
        outline_opacity: if active {
            OUTLINE_OPACITY
        } else {
            DIMMED_OUTLINE_OPACITY
        },
        outline_width: if emphasized {
            EMPHASIZED_OUTLINE_WIDTH
        } else {
            OUTLINE_WIDTH
        },
        dimmed: !active,
        emphasized,
    }
}

/// Countries the highlight layer outlines. Empty means the layer draws
/// nothing.
pub fn highlight_targets<'a>(hovered: Option<&'a str>, pinned: Option<&'a str>) -> Vec<&'a str> {
    let mut targets = Vec::with_capacity(2);
    targets.extend(pinned);
    if let Some(h) = hovered
        && Some(h) != pinned
    {
        targets.push(h);
    }
    targets
}
