use std::collections::HashMap;

use geojson::{GeoJson, Value, feature::Id};
use tracing::debug;

use crate::error::SchemaError;

/// `[longitude, latitude]` in degrees.
pub type LonLat = [f64; 2];

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRings {
    pub exterior: Vec<LonLat>,
    pub holes: Vec<Vec<LonLat>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub iso: String,
    pub name: Option<String>,
    pub polygons: Vec<PolygonRings>,
}

impl CountryShape {
    pub fn points(&self) -> impl Iterator<Item = &LonLat> {
        self.polygons
            .iter()
            .flat_map(|p| std::iter::once(&p.exterior).chain(p.holes.iter()))
            .flatten()
    }
}

/// Country outlines keyed by ISO code. One shape per code; repeated
/// features for the same code are merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryGeometry {
    shapes: Vec<CountryShape>,
}

impl CountryGeometry {
    pub fn parse<S: AsRef<str>>(text: &str, iso_keys: &[S]) -> Result<Self, SchemaError> {
        let geojson = text
            .parse::<GeoJson>()
            .map_err(|e| SchemaError::GeoJson(e.to_string()))?;
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(SchemaError::NotFeatureCollection);
        };

        let mut shapes: Vec<CountryShape> = Vec::new();
        let mut slot: HashMap<String, usize> = HashMap::new();
        let mut unkeyed = 0usize;

        for feature in collection.features {
            let props = feature.properties.as_ref();
            let iso = iso_keys
                .iter()
                .filter_map(|key| props.and_then(|p| p.get(key.as_ref())))
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .find(|s| !s.is_empty() && *s != "-99")
                .map(str::to_string)
                .or_else(|| match &feature.id {
                    Some(Id::String(s)) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                });
            let Some(iso) = iso else {
                unkeyed += 1;
                continue;
            };
            let name = props
                .and_then(|p| p.get("name"))
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let polygons = match feature.geometry.map(|g| g.value) {
                Some(Value::Polygon(rings)) => polygon_from(&rings).into_iter().collect(),
                Some(Value::MultiPolygon(parts)) => {
                    parts.iter().filter_map(|rings| polygon_from(rings)).collect()
                }
                Some(_) => {
                    debug!(%iso, "ignoring non-areal geometry");
                    Vec::new()
                }
                None => Vec::new(),
            };

            match slot.get(&iso) {
                Some(&i) => shapes[i].polygons.extend(polygons),
                None => {
                    slot.insert(iso.clone(), shapes.len());
                    shapes.push(CountryShape {
                        iso,
                        name,
                        polygons,
                    });
                }
            }
        }

        if unkeyed > 0 {
            debug!(unkeyed, "features without an ISO code were skipped");
        }
        if shapes.iter().all(|s| s.points().next().is_none()) {
            return Err(SchemaError::NoFeatures);
        }
        Ok(Self { shapes })
    }

    pub fn shapes(&self) -> &[CountryShape] {
        &self.shapes
    }

    pub fn get(&self, iso: &str) -> Option<&CountryShape> {
        self.shapes.iter().find(|s| s.iso == iso)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl FromIterator<CountryShape> for CountryGeometry {
    fn from_iter<I: IntoIterator<Item = CountryShape>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}

fn ring_from(positions: &[Vec<f64>]) -> Vec<LonLat> {
    positions
        .iter()
        .filter(|p| p.len() >= 2 && p[0].is_finite() && p[1].is_finite())
        .map(|p| [p[0], p[1]])
        .collect()
}

fn polygon_from(rings: &[Vec<Vec<f64>>]) -> Option<PolygonRings> {
    let (exterior, holes) = rings.split_first()?;
    Some(PolygonRings {
        exterior: ring_from(exterior),
        holes: holes.iter().map(|r| ring_from(r)).collect(),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    /// Rough boxes standing in for real outlines.
    pub fn geometry_json() -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "iso_a3": "PRY", "name": "Paraguay" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-62.6, -27.6], [-54.3, -27.6], [-54.3, -19.3], [-62.6, -19.3], [-62.6, -27.6]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "iso_a3": "BRA", "name": "Brazil" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [
                            [[-73.0, -33.0], [-35.0, -33.0], [-35.0, 5.0], [-73.0, 5.0], [-73.0, -33.0]],
                            [[-62.7, -27.7], [-54.2, -27.7], [-54.2, -19.2], [-62.7, -19.2], [-62.7, -27.7]]
                        ]
                    }
                },
                {
                    "type": "Feature",
                    "id": "USA",
                    "properties": { "iso_a3": "-99", "name": "United States" },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[-124.0, 25.0], [-67.0, 25.0], [-67.0, 49.0], [-124.0, 49.0], [-124.0, 25.0]]],
                            [[[-168.0, 54.0], [-141.0, 54.0], [-141.0, 71.0], [-168.0, 71.0], [-168.0, 54.0]]]
                        ]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "iso_a2": "GT", "name": "Guatemala" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-92.2, 13.7], [-88.2, 13.7], [-88.2, 17.8], [-92.2, 17.8], [-92.2, 13.7]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "iso_a3": "CUB", "name": "Cuba" },
                    "geometry": null
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Unclaimed" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-30.0, -10.0], [-29.0, -10.0], [-29.0, -9.0], [-30.0, -10.0]]]
                    }
                }
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::fixtures::geometry_json;
    use super::*;

    const KEYS: [&str; 3] = ["iso_a3", "iso_a2", "iso"];

    #[test]
    fn parses_polygons_multipolygons_and_fallback_ids() {
        let geometry = CountryGeometry::parse(&geometry_json().to_string(), &KEYS).unwrap();
        let isos: Vec<&str> = geometry.shapes().iter().map(|s| s.iso.as_str()).collect();
        assert_eq!(isos, ["PRY", "BRA", "USA", "GT", "CUB"]);

        let brazil = geometry.get("BRA").unwrap();
        assert_eq!(brazil.polygons.len(), 1);
        assert_eq!(brazil.polygons[0].holes.len(), 1);

        let usa = geometry.get("USA").unwrap();
        assert_eq!(usa.polygons.len(), 2);
        assert_eq!(usa.name.as_deref(), Some("United States"));

        assert!(geometry.get("CUB").unwrap().polygons.is_empty());
    }

    #[test]
    fn repeated_features_merge_into_one_shape() {
        let mut doc = geometry_json();
        let extra = json!({
            "type": "Feature",
            "properties": { "iso_a3": "PRY" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-58.0, -26.0], [-57.0, -26.0], [-57.0, -25.0], [-58.0, -26.0]]]
            }
        });
        doc["features"].as_array_mut().unwrap().push(extra);
        let geometry = CountryGeometry::parse(&doc.to_string(), &KEYS).unwrap();
        assert_eq!(geometry.get("PRY").unwrap().polygons.len(), 2);
        assert_eq!(geometry.len(), 5);
    }

    #[test]
    fn rejects_non_collections() {
        let point = json!({ "type": "Point", "coordinates": [0.0, 0.0] });
        assert_eq!(
            CountryGeometry::parse(&point.to_string(), &KEYS).unwrap_err(),
            SchemaError::NotFeatureCollection
        );
        assert!(matches!(
            CountryGeometry::parse("{ not json", &KEYS).unwrap_err(),
            SchemaError::GeoJson(_)
        ));
    }
    #[test]
    fn collections_without_drawable_countries_are_rejected() {
        let empty = json!({ "type": "FeatureCollection", "features": [] });
        assert_eq!(
            CountryGeometry::parse(&empty.to_string(), &KEYS).unwrap_err(),
            SchemaError::NoFeatures
        );

        let mut unusable = geometry_json();
        unusable["features"]
            .as_array_mut()
            .unwrap()
            .retain(|f| f["properties"]["name"] == "Unclaimed" || f["geometry"].is_null());
        assert_eq!(unusable["features"].as_array().unwrap().len(), 2);
        assert_eq!(
            CountryGeometry::parse(&unusable.to_string(), &KEYS).unwrap_err(),
            SchemaError::NoFeatures
        );
    }
}
