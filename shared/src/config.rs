//! Map configuration. Every value here has a default matching the published
//! site; embedders override individual fields.

use serde::{Deserialize, Serialize};

pub const DATASET_FILE: &str = "recognition.json";
pub const CITATIONS_FILE: &str = "citations.json";
pub const STYLE_TOKENS_FILE: &str = "style-tokens.json";
pub const GEOMETRY_FILE: &str = "countries-western-hemisphere.geo.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUrls {
    pub dataset: String,
    pub citations: String,
    pub style_tokens: String,
    pub geometry: String,
}

impl ResourceUrls {
    pub fn under(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            dataset: format!("{base}/{DATASET_FILE}"),
            citations: format!("{base}/{CITATIONS_FILE}"),
            style_tokens: format!("{base}/{STYLE_TOKENS_FILE}"),
            geometry: format!("{base}/{GEOMETRY_FILE}"),
        }
    }
}

impl Default for ResourceUrls {
    fn default() -> Self {
        Self::under("/data")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 28.0,
            right: 36.0,
            bottom: 40.0,
            left: 36.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipLayout {
    pub width: f64,
    pub height: f64,
    /// Gap from the anchor point and minimum distance to the viewport edge.
    pub margin: f64,
}

impl Default for TooltipLayout {
    fn default() -> Self {
        Self {
            width: 220.0,
            height: 140.0,
            margin: 14.0,
        }
    }
}

/// Conic equal-area parameters, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub parallels: [f64; 2],
    pub rotate: f64,
    pub center: [f64; 2],
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            parallels: [8.0, 45.0],
            rotate: 96.0,
            center: [0.0, 12.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraticuleSpec {
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub latitude_range: [f64; 2],
    pub longitude_range: [f64; 2],
    /// Sample count along each meridian.
    pub meridian_steps: usize,
    /// Spacing in degrees between samples along each parallel.
    pub parallel_step: f64,
}

impl Default for GraticuleSpec {
    fn default() -> Self {
        Self {
            latitudes: vec![-60.0, -40.0, -20.0, 0.0, 20.0, 40.0, 60.0],
            longitudes: vec![-150.0, -120.0, -90.0, -60.0, -30.0],
            latitude_range: [-65.0, 75.0],
            longitude_range: [-170.0, -25.0],
            meridian_steps: 16,
            parallel_step: 2.5,
        }
    }
}

/// Country drawn with a distinct fill instead of its recognition color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialTreatment {
    pub iso: String,
    pub color: String,
    /// Paint the decorative flag texture over the special color.
    pub flag: bool,
}

impl Default for SpecialTreatment {
    fn default() -> Self {
        Self {
            iso: "USA".to_string(),
            color: "#F4B400".to_string(),
            flag: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapHeight {
    Px(f64),
    Css(String),
}

impl MapHeight {
    pub fn css(&self) -> String {
        match self {
            MapHeight::Px(px) => format!("{px}px"),
            MapHeight::Css(value) => value.clone(),
        }
    }
}

pub const DEFAULT_MAP_HEIGHT: f64 = 520.0;
pub const EMBEDDED_MAP_HEIGHT: f64 = 420.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub urls: ResourceUrls,
    /// GeoJSON property keys tried in order for a feature's ISO code; the
    /// feature id is the last resort.
    pub iso_keys: Vec<String>,
    pub padding: Padding,
    pub tooltip: TooltipLayout,
    pub projection: ProjectionParams,
    pub graticule: GraticuleSpec,
    pub special: Option<SpecialTreatment>,
    pub resize_debounce_ms: u32,
    pub height: MapHeight,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            urls: ResourceUrls::default(),
            iso_keys: vec!["iso_a3".into(), "iso_a2".into(), "iso".into()],
            padding: Padding::default(),
            tooltip: TooltipLayout::default(),
            projection: ProjectionParams::default(),
            graticule: GraticuleSpec::default(),
            special: Some(SpecialTreatment::default()),
            resize_debounce_ms: 150,
            height: MapHeight::Px(DEFAULT_MAP_HEIGHT),
        }
    }
}

impl MapConfig {
    pub fn special_for(&self, iso: &str) -> Option<&SpecialTreatment> {
        self.special.as_ref().filter(|s| s.iso == iso)
    }
}
