//! Albers-style conic equal-area projection with a longitude rotation,
//! fitted to a screen extent.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::config::ProjectionParams;
use crate::geometry::{CountryGeometry, LonLat};
use crate::viewport::Extent;

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Raw {
    Conic { n: f64, c: f64, r0: f64 },
    /// Parallels symmetric about the equator collapse the cone.
    Cylindrical { cos_phi0: f64 },
}

impl Raw {
    fn new(parallels: [f64; 2]) -> Self {
        let phi0 = parallels[0].to_radians();
        let phi1 = parallels[1].to_radians();
        let sy0 = phi0.sin();
        let n = (sy0 + phi1.sin()) / 2.0;
        if n.abs() < EPSILON {
            return Raw::Cylindrical {
                cos_phi0: phi0.cos(),
            };
        }
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        Raw::Conic {
            n,
            c,
            r0: c.sqrt() / n,
        }
    }

    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        match *self {
            Raw::Conic { n, c, r0 } => {
                let r = (c - 2.0 * n * phi.sin()).max(0.0).sqrt() / n;
                let a = lambda * n;
                [r * a.sin(), r0 - r * a.cos()]
            }
            Raw::Cylindrical { cos_phi0 } => [lambda * cos_phi0, phi.sin() / cos_phi0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicEqualArea {
    raw: Raw,
    rotate: f64,
    /// Raw coordinates of the configured center.
    origin: [f64; 2],
    scale: f64,
    translate: [f64; 2],
}

impl ConicEqualArea {
    pub fn new(params: &ProjectionParams) -> Self {
        let raw = Raw::new(params.parallels);
        let origin = raw.forward(
            params.center[0].to_radians(),
            params.center[1].to_radians().clamp(-FRAC_PI_2, FRAC_PI_2),
        );
        Self {
            raw,
            rotate: params.rotate.to_radians(),
            origin,
            scale: 1.0,
            translate: [0.0, 0.0],
        }
    }

    /// Project `[lon, lat]` degrees to screen pixels (y grows downward).
    pub fn project(&self, [lon, lat]: LonLat) -> [f64; 2] {
        let mut lambda = lon.to_radians() + self.rotate;
        if lambda > PI {
            lambda -= TAU;
        } else if lambda < -PI {
            lambda += TAU;
        }
        let phi = lat.to_radians().clamp(-FRAC_PI_2, FRAC_PI_2);
        let [x, y] = self.raw.forward(lambda, phi);
        [
            self.translate[0] + self.scale * (x - self.origin[0]),
            self.translate[1] - self.scale * (y - self.origin[1]),
        ]
    }

    /// Scale and translate so every point of `geometry` lands inside
    /// `extent`, centered on both axes. Returns `false` and leaves the
    /// projection untouched when there is nothing with area to fit.
    pub fn fit_extent(&mut self, extent: Extent, geometry: &CountryGeometry) -> bool {
        self.fit_points(extent, geometry.shapes().iter().flat_map(|s| s.points()).copied())
    }

    pub fn fit_points(&mut self, extent: Extent, points: impl IntoIterator<Item = LonLat>) -> bool {
        if extent.is_empty() || extent.width() <= 0.0 || extent.height() <= 0.0 {
            return false;
        }
        let unit = Self {
            scale: 1.0,
            translate: [0.0, 0.0],
            ..*self
        };
        let mut bounds = Extent::EMPTY;
        for point in points {
            let p = unit.project(point);
            if p[0].is_finite() && p[1].is_finite() {
                bounds.include(p);
            }
        }
        let (dx, dy) = (bounds.width(), bounds.height());
        if bounds.is_empty() || dx <= 0.0 || dy <= 0.0 {
            return false;
        }
        let k = (extent.width() / dx).min(extent.height() / dy);
        self.scale = k;
        self.translate = [
            extent.x0 + (extent.width() - k * (bounds.x1 + bounds.x0)) / 2.0,
            extent.y0 + (extent.height() - k * (bounds.y1 + bounds.y0)) / 2.0,
        ];
        true
    }
}
