use crate::config::TooltipLayout;
use crate::dataset::{CitationLink, RecognitionBundle, RecognitionEntry, RecognitionKind};
use crate::scene::Point;
use crate::viewport::Viewport;

/// Keep a tooltip-sized box fully inside the viewport, `margin` from every
/// edge. Unmeasured viewports pass the point through.
pub fn clamp_position(point: Point, viewport: Viewport, layout: &TooltipLayout) -> Point {
    if !viewport.is_measured() {
        return point;
    }
    let m = layout.margin;
    [
        (point[0]).min(viewport.width - layout.width).max(m),
        (point[1]).min(viewport.height - layout.height).max(m),
    ]
}

/// Anchor the tooltip just below and right of `point`, then clamp.
pub fn place(point: Point, viewport: Viewport, layout: &TooltipLayout) -> Point {
    if !viewport.is_measured() {
        return point;
    }
    clamp_position([point[0] + layout.margin, point[1] + layout.margin], viewport, layout)
}

/// Human date for the "since" line: full date when known, else the year.
pub fn since_label(entry: &RecognitionEntry) -> Option<String> {
    entry
        .since_date()
        .map(|d| d.format("%b %-d, %Y").to_string())
        .or_else(|| entry.since_year.map(|y| y.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipData {
    pub iso: String,
    pub name: String,
    pub recognition: RecognitionKind,
    pub since: Option<String>,
    pub last_change_event: Option<String>,
    pub citation: Option<CitationLink>,
    pub position: Point,
    pub pinned: bool,
}

impl TooltipData {
    pub fn for_entry(
        entry: &RecognitionEntry,
        bundle: &RecognitionBundle,
        position: Point,
        pinned: bool,
    ) -> Self {
        Self {
            iso: entry.iso_code.clone(),
            name: entry.name.clone(),
            recognition: entry.recognition,
            since: since_label(entry),
            last_change_event: entry.last_change_event.clone(),
            citation: bundle.citation_for(entry),
            position,
            pinned,
        }
    }

    pub fn status(&self) -> &'static str {
        self.recognition.status_sentence()
    }

    /// Announcement for the polite live region.
    pub fn announcement(&self) -> String {
        let mode = if self.pinned { "Pinned" } else { "Hover" };
        format!("{mode} tooltip for {}", self.name)
    }
}
