use crate::config::Padding;

/// Measured size of the map container in CSS pixels. Zero until the first
/// resize observation lands.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: if width.is_finite() { width.max(0.0) } else { 0.0 },
            height: if height.is_finite() { height.max(0.0) } else { 0.0 },
        }
    }

    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Drawable box after padding, or `None` if padding eats the whole viewport.
    pub fn inner(&self, padding: &Padding) -> Option<Extent> {
        let extent = Extent {
            x0: padding.left,
            y0: padding.top,
            x1: self.width - padding.right,
            y1: self.height - padding.bottom,
        };
        (extent.width() > 0.0 && extent.height() > 0.0).then_some(extent)
    }
}

/// Axis-aligned box in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Extent {
    pub const EMPTY: Extent = Extent {
        x0: f64::INFINITY,
        y0: f64::INFINITY,
        x1: f64::NEG_INFINITY,
        y1: f64::NEG_INFINITY,
    };

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        !(self.x0 <= self.x1 && self.y0 <= self.y1)
    }

    pub fn include(&mut self, [x, y]: [f64; 2]) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }

    pub fn contains(&self, [x, y]: [f64; 2]) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// `contains` with a tolerance for floating-point slop at the edges.
    pub fn contains_within(&self, [x, y]: [f64; 2], eps: f64) -> bool {
        x >= self.x0 - eps && x <= self.x1 + eps && y >= self.y0 - eps && y <= self.y1 + eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmeasured_until_both_dimensions_positive() {
        assert!(!Viewport::default().is_measured());
        assert!(!Viewport::new(800.0, 0.0).is_measured());
        assert!(!Viewport::new(f64::NAN, 400.0).is_measured());
        assert!(Viewport::new(800.0, 520.0).is_measured());
    }

    #[test]
    fn inner_extent_respects_padding() {
        let inner = Viewport::new(800.0, 520.0).inner(&Padding::default()).unwrap();
        assert_eq!(inner, Extent { x0: 36.0, y0: 28.0, x1: 764.0, y1: 480.0 });
        assert!(Viewport::new(60.0, 60.0).inner(&Padding::default()).is_none());
    }

    #[test]
    fn extent_accumulates_points() {
        let mut extent = Extent::EMPTY;
        assert!(extent.is_empty());
        extent.include([3.0, -1.0]);
        extent.include([-2.0, 4.0]);
        assert_eq!(extent, Extent { x0: -2.0, y0: -1.0, x1: 3.0, y1: 4.0 });
        assert!(extent.contains([0.0, 0.0]));
        assert!(!extent.contains([3.5, 0.0]));
        assert!(extent.contains_within([3.0 + 1e-9, 0.0], 1e-6));
    }
}
