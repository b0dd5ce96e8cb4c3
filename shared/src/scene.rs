use std::collections::HashMap;
use std::fmt::Write;

use tracing::debug;

use crate::config::{GraticuleSpec, MapConfig};
use crate::geometry::{CountryGeometry, CountryShape, LonLat};
use crate::projection::ConicEqualArea;
use crate::viewport::{Extent, Viewport};

pub type Point = [f64; 2];

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCountry {
    pub iso: String,
    pub name: Option<String>,
    /// SVG path data.
    pub path: String,
    pub centroid: Point,
    pub bounds: Extent,
    /// Projected rings, exterior and holes alike, for even-odd hit testing.
    pub rings: Vec<Vec<Point>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraticuleAxis {
    Parallel,
    Meridian,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraticuleLine {
    pub axis: GraticuleAxis,
    pub degrees: f64,
    pub path: String,
}

/// Geometry projected for one viewport size. Rebuilt whenever the viewport
/// or the geometry changes; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedScene {
    pub viewport: Viewport,
    pub countries: Vec<ProjectedCountry>,
    pub graticule: Vec<GraticuleLine>,
    index: HashMap<String, usize>,
}

impl ProjectedScene {
    /// `None` while the viewport is unmeasured or nothing in `geometry` has area.
    pub fn build(geometry: &CountryGeometry, viewport: Viewport, config: &MapConfig) -> Option<Self> {
        if !viewport.is_measured() {
            return None;
        }
        let extent = viewport.inner(&config.padding)?;
        let mut projection = ConicEqualArea::new(&config.projection);
        if !projection.fit_extent(extent, geometry) {
            debug!(countries = geometry.len(), "geometry has no extent to fit");
            return None;
        }

        let mut countries = Vec::with_capacity(geometry.len());
        let mut index = HashMap::with_capacity(geometry.len());
        for shape in geometry.shapes() {
            match project_country(shape, &projection) {
                Some(country) => {
                    index.insert(country.iso.clone(), countries.len());
                    countries.push(country);
                }
                None => debug!(iso = %shape.iso, "skipping country without drawable area"),
            }
        }

        Some(Self {
            viewport,
            countries,
            graticule: graticule_lines(&config.graticule, &projection),
            index,
        })
    }

    pub fn country(&self, iso: &str) -> Option<&ProjectedCountry> {
        self.index.get(iso).map(|&i| &self.countries[i])
    }

    pub fn centroid(&self, iso: &str) -> Option<Point> {
        self.country(iso).map(|c| c.centroid)
    }
}

fn project_ring(ring: &[LonLat], projection: &ConicEqualArea) -> Option<Vec<Point>> {
    let mut out: Vec<Point> = Vec::with_capacity(ring.len());
    for &p in ring {
        let q = projection.project(p);
        if !(q[0].is_finite() && q[1].is_finite()) {
            return None;
        }
        if out.last() != Some(&q) {
            out.push(q);
        }
    }
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    (out.len() >= 3).then_some(out)
}

fn project_country(shape: &CountryShape, projection: &ConicEqualArea) -> Option<ProjectedCountry> {
    let mut rings = Vec::new();
    let mut path = String::new();
    let mut bounds = Extent::EMPTY;
    let mut area_sum = 0.0;
    let mut moment = [0.0, 0.0];

    for polygon in &shape.polygons {
        let Some(exterior) = project_ring(&polygon.exterior, projection) else {
            continue;
        };
        let holes: Vec<Vec<Point>> = polygon
            .holes
            .iter()
            .filter_map(|h| project_ring(h, projection))
            .collect();

        for (ring, is_hole) in std::iter::once((exterior, false)).chain(holes.into_iter().map(|h| (h, true))) {
            let (area, m) = ring_moments(&ring);
            // Exterior rings add area, holes subtract, regardless of winding.
            let sign = if is_hole { -area.signum() } else { area.signum() };
            area_sum += sign * area;
            moment[0] += sign * m[0];
            moment[1] += sign * m[1];

            write_ring(&mut path, &ring, true);
            for &p in &ring {
                bounds.include(p);
            }
            rings.push(ring);
        }
    }

    if rings.is_empty() {
        return None;
    }

    let centroid = if area_sum.abs() > 1e-9 {
        [moment[0] / area_sum, moment[1] / area_sum]
    } else {
        mean_point(&rings)
    };

    Some(ProjectedCountry {
        iso: shape.iso.clone(),
        name: shape.name.clone(),
        path,
        centroid,
        bounds,
        rings,
    })
}

/// Signed area and first moment (area times centroid) of a closed ring.
fn ring_moments(ring: &[Point]) -> (f64, [f64; 2]) {
    let mut a = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..ring.len() {
        let [x0, y0] = ring[i];
        let [x1, y1] = ring[(i + 1) % ring.len()];
        let cross = x0 * y1 - x1 * y0;
        a += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    (a / 2.0, [cx / 6.0, cy / 6.0])
}

fn mean_point(rings: &[Vec<Point>]) -> Point {
    let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
    for p in rings.iter().flatten() {
        sx += p[0];
        sy += p[1];
        n += 1;
    }
    [sx / n as f64, sy / n as f64]
}

fn write_ring(out: &mut String, ring: &[Point], close: bool) {
    for (i, [x, y]) in ring.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{cmd}{x:.2},{y:.2}");
    }
    if close {
        out.push('Z');
    }
}

fn graticule_lines(spec: &GraticuleSpec, projection: &ConicEqualArea) -> Vec<GraticuleLine> {
    let [lat_lo, lat_hi] = spec.latitude_range;
    let [lon_lo, lon_hi] = spec.longitude_range;
    let mut lines = Vec::with_capacity(spec.latitudes.len() + spec.longitudes.len());

    let parallel_samples = (((lon_hi - lon_lo) / spec.parallel_step.max(0.1)).ceil() as usize).max(1);
    for &lat in &spec.latitudes {
        let points: Vec<Point> = (0..=parallel_samples)
            .map(|i| lon_lo + (lon_hi - lon_lo) * i as f64 / parallel_samples as f64)
            .map(|lon| projection.project([lon, lat]))
            .collect();
        push_line(&mut lines, GraticuleAxis::Parallel, lat, &points);
    }

    let steps = spec.meridian_steps.max(1);
    for &lon in &spec.longitudes {
        let points: Vec<Point> = (0..=steps)
            .map(|i| lat_lo + (lat_hi - lat_lo) * i as f64 / steps as f64)
            .map(|lat| projection.project([lon, lat]))
            .collect();
        push_line(&mut lines, GraticuleAxis::Meridian, lon, &points);
    }
    lines
}

fn push_line(lines: &mut Vec<GraticuleLine>, axis: GraticuleAxis, degrees: f64, points: &[Point]) {
    if points.len() < 2 || points.iter().any(|p| !(p[0].is_finite() && p[1].is_finite())) {
        return;
    }
    let mut path = String::new();
    write_ring(&mut path, points, false);
    lines.push(GraticuleLine { axis, degrees, path });
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::geometry::fixtures::geometry_json;

    pub const KEYS: [&str; 3] = ["iso_a3", "iso_a2", "iso"];

    pub fn geometry() -> CountryGeometry {
        CountryGeometry::parse(&geometry_json().to_string(), &KEYS).unwrap()
    }

    pub fn scene(width: f64, height: f64) -> ProjectedScene {
        ProjectedScene::build(&geometry(), Viewport::new(width, height), &MapConfig::default()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::geometry::PolygonRings;

    #[test]
    fn unmeasured_viewport_builds_nothing() {
        let config = MapConfig::default();
        assert!(ProjectedScene::build(&geometry(), Viewport::default(), &config).is_none());
        assert!(ProjectedScene::build(&geometry(), Viewport::new(640.0, 0.0), &config).is_none());
    }

    #[test]
    fn every_country_path_stays_inside_the_padded_viewport() {
        let config = MapConfig::default();
        for (w, h) in [(800.0, 520.0), (360.0, 420.0), (1440.0, 300.0)] {
            let scene = scene(w, h);
            let inner = scene.viewport.inner(&config.padding).unwrap();
            for country in &scene.countries {
                assert!(
                    inner.contains_within([country.bounds.x0, country.bounds.y0], 1e-6)
                        && inner.contains_within([country.bounds.x1, country.bounds.y1], 1e-6),
                    "{} escapes {w}x{h}",
                    country.iso
                );
            }
        }
    }

    #[test]
    fn countries_without_area_are_skipped() {
        let scene = scene(800.0, 520.0);
        assert!(scene.country("CUB").is_none());
        assert!(scene.country("PRY").is_some());
        assert_eq!(scene.countries.len(), 4);
    }

    #[test]
    fn centroid_of_box_sits_inside_it() {
        let scene = scene(800.0, 520.0);
        let paraguay = scene.country("PRY").unwrap();
        assert!(paraguay.bounds.contains(paraguay.centroid));
        assert!(paraguay.path.starts_with('M'));
        assert!(paraguay.path.ends_with('Z'));
    }

    #[test]
    fn holes_pull_the_centroid_away() {
        let scene = scene(800.0, 520.0);
        let brazil = scene.country("BRA").unwrap();
        assert_eq!(brazil.rings.len(), 2);
        assert_eq!(brazil.path.matches('M').count(), 2);

        let solid: CountryGeometry = geometry()
            .shapes()
            .iter()
            .cloned()
            .map(|mut s| {
                for p in &mut s.polygons {
                    p.holes.clear();
                }
                s
            })
            .collect();
        let without_hole = ProjectedScene::build(&solid, scene.viewport, &MapConfig::default())
            .unwrap()
            .centroid("BRA")
            .unwrap();
        // The hole sits in the south-west, so the centroid shifts right and up.
        assert!(brazil.centroid[0] > without_hole[0]);
        assert!(brazil.centroid[1] < without_hole[1]);
    }

    #[test]
    fn winding_order_does_not_change_centroid() {
        let ring = vec![[-60.0, -10.0], [-50.0, -10.0], [-50.0, 0.0], [-60.0, 0.0], [-60.0, -10.0]];
        let mut reversed = ring.clone();
        reversed.reverse();
        let shape = |exterior: Vec<LonLat>| CountryShape {
            iso: "XXX".into(),
            name: None,
            polygons: vec![PolygonRings {
                exterior,
                holes: vec![],
            }],
        };
        let config = MapConfig::default();
        let a: CountryGeometry = [shape(ring)].into_iter().collect();
        let b: CountryGeometry = [shape(reversed)].into_iter().collect();
        let sa = ProjectedScene::build(&a, Viewport::new(500.0, 500.0), &config).unwrap();
        let sb = ProjectedScene::build(&b, Viewport::new(500.0, 500.0), &config).unwrap();
        let (ca, cb) = (sa.centroid("XXX").unwrap(), sb.centroid("XXX").unwrap());
        assert!((ca[0] - cb[0]).abs() < 1e-9 && (ca[1] - cb[1]).abs() < 1e-9);
    }

    #[test]
    fn graticule_covers_configured_lines() {
        let scene = scene(800.0, 520.0);
        let spec = GraticuleSpec::default();
        let parallels = scene
            .graticule
            .iter()
            .filter(|l| l.axis == GraticuleAxis::Parallel)
            .count();
        let meridians = scene
            .graticule
            .iter()
            .filter(|l| l.axis == GraticuleAxis::Meridian)
            .count();
        assert_eq!(parallels, spec.latitudes.len());
        assert_eq!(meridians, spec.longitudes.len());
        let meridian = scene
            .graticule
            .iter()
            .find(|l| l.axis == GraticuleAxis::Meridian)
            .unwrap();
        assert_eq!(meridian.path.matches('L').count(), spec.meridian_steps);
        assert!(!meridian.path.ends_with('Z'));
    }
}
