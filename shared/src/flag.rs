//! Geometry of the decorative stars-and-stripes texture. The client paints
//! it into a bitmap that fills the special country's outline.

use std::f64::consts::PI;

pub const FLAG_RED: &str = "#B22234";
pub const FLAG_WHITE: &str = "#FFFFFF";
pub const FLAG_BLUE: &str = "#3C3B6E";

const STRIPES: usize = 13;
const CANTON_STRIPES: usize = 7;
/// Canton width as a share of the fly, per the 1.9:1 federal proportions.
const CANTON_WIDTH: f64 = 0.76 / 1.9;
const STAR_ROWS: usize = 9;
const STAR_COLS: usize = 11;
/// Star outer radius in stripe heights.
const STAR_RADIUS: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlagRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlagLayout {
    pub width: f64,
    pub height: f64,
    pub rects: Vec<FlagRect>,
    /// Closed 10-vertex outlines, filled white.
    pub stars: Vec<[[f64; 2]; 10]>,
}

impl FlagLayout {
    pub fn new(width: f64, height: f64) -> Self {
        let stripe = height / STRIPES as f64;
        let mut rects: Vec<FlagRect> = (0..STRIPES)
            .map(|i| FlagRect {
                x: 0.0,
                y: i as f64 * stripe,
                w: width,
                h: stripe,
                color: if i % 2 == 0 { FLAG_RED } else { FLAG_WHITE },
            })
            .collect();

        let canton_w = width * CANTON_WIDTH;
        let canton_h = stripe * CANTON_STRIPES as f64;
        rects.push(FlagRect {
            x: 0.0,
            y: 0.0,
            w: canton_w,
            h: canton_h,
            color: FLAG_BLUE,
        });

        // Staggered 9x11 lattice; rows alternate six and five stars.
        let dx = canton_w / (STAR_COLS + 1) as f64;
        let dy = canton_h / (STAR_ROWS + 1) as f64;
        let outer = stripe * STAR_RADIUS;
        let mut stars = Vec::with_capacity(50);
        for row in 0..STAR_ROWS {
            for col in 0..STAR_COLS {
                if (row + col) % 2 == 1 {
                    continue;
                }
                let cx = dx * (col + 1) as f64;
                let cy = dy * (row + 1) as f64;
                stars.push(star_points(cx, cy, outer, outer * 0.382));
            }
        }

        Self {
            width,
            height,
            rects,
            stars,
        }
    }
}

/// Five-pointed star with the first point straight up.
pub fn star_points(cx: f64, cy: f64, outer: f64, inner: f64) -> [[f64; 2]; 10] {
    let mut points = [[0.0; 2]; 10];
    for (i, p) in points.iter_mut().enumerate() {
        let r = if i % 2 == 0 { outer } else { inner };
        let angle = -PI / 2.0 + i as f64 * PI / 5.0;
        *p = [cx + r * angle.cos(), cy + r * angle.sin()];
    }
    points
}
