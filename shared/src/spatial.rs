use crate::scene::{Point, ProjectedCountry, ProjectedScene};
use crate::viewport::Extent;

const GRID_COLS: usize = 32;
const GRID_ROWS: usize = 32;

/// Uniform grid over screen space for pointer hit-testing. Each cell lists
/// the countries whose bounding box overlaps it; candidates are confirmed
/// with an even-odd point-in-polygon test. Rebuilt with every scene.
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cells: Vec<Vec<usize>>,
    isos: Vec<String>,
    bounds: Vec<Extent>,
    rings: Vec<Vec<Vec<Point>>>,
    min_x: f64,
    min_y: f64,
    cell_w: f64,
    cell_h: f64,
}

impl SpatialGrid {
    pub fn build(scene: &ProjectedScene) -> Self {
        Self::from_countries(&scene.countries)
    }

    pub fn from_countries(countries: &[ProjectedCountry]) -> Self {
        if countries.is_empty() {
            return Self::default();
        }

        let mut world = Extent::EMPTY;
        for country in countries {
            world.include([country.bounds.x0, country.bounds.y0]);
            world.include([country.bounds.x1, country.bounds.y1]);
        }
        let min_x = world.x0 - 1.0;
        let min_y = world.y0 - 1.0;
        let cell_w = (world.x1 + 1.0 - min_x) / GRID_COLS as f64;
        let cell_h = (world.y1 + 1.0 - min_y) / GRID_ROWS as f64;

        let mut cells = vec![Vec::new(); GRID_COLS * GRID_ROWS];
        for (idx, country) in countries.iter().enumerate() {
            let b = country.bounds;
            let col_start = ((b.x0 - min_x) / cell_w).floor().max(0.0) as usize;
            let col_end = (((b.x1 - min_x) / cell_w).floor() as usize + 1).min(GRID_COLS);
            let row_start = ((b.y0 - min_y) / cell_h).floor().max(0.0) as usize;
            let row_end = (((b.y1 - min_y) / cell_h).floor() as usize + 1).min(GRID_ROWS);
            for row in row_start..row_end {
                for col in col_start..col_end {
                    cells[row * GRID_COLS + col].push(idx);
                }
            }
        }

        Self {
            cells,
            isos: countries.iter().map(|c| c.iso.clone()).collect(),
            bounds: countries.iter().map(|c| c.bounds).collect(),
            rings: countries.iter().map(|c| c.rings.clone()).collect(),
            min_x,
            min_y,
            cell_w,
            cell_h,
        }
    }

    /// The country under a screen point. Later countries win where outlines
    /// overlap, matching paint order.
    pub fn find_at(&self, x: f64, y: f64) -> Option<&str> {
        if self.cells.is_empty() || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let col = ((x - self.min_x) / self.cell_w).floor() as isize;
        let row = ((y - self.min_y) / self.cell_h).floor() as isize;
        if col < 0 || row < 0 || col >= GRID_COLS as isize || row >= GRID_ROWS as isize {
            return None;
        }

        self.cells[row as usize * GRID_COLS + col as usize]
            .iter()
            .rev()
            .copied()
            .find(|&idx| self.bounds[idx].contains([x, y]) && point_in_rings([x, y], &self.rings[idx]))
            .map(|idx| self.isos[idx].as_str())
    }
}

/// Even-odd rule across every ring, so holes read as outside.
pub fn point_in_rings([x, y]: Point, rings: &[Vec<Point>]) -> bool {
    let mut inside = false;
    for ring in rings {
        let n = ring.len();
        let mut j = n.wrapping_sub(1);
        for i in 0..n {
            let [xi, yi] = ring[i];
            let [xj, yj] = ring[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::fixtures::scene;

    #[test]
    fn finds_country_at_centroid() {
        let scene = scene(800.0, 520.0);
        let grid = SpatialGrid::build(&scene);
        for iso in ["PRY", "USA", "GT"] {
            let [x, y] = scene.centroid(iso).unwrap();
            assert_eq!(grid.find_at(x, y), Some(iso));
        }
    }

    #[test]
    fn hole_belongs_to_the_country_inside_it() {
        let scene = scene(800.0, 520.0);
        let grid = SpatialGrid::build(&scene);
        // Paraguay's box sits inside Brazil's hole.
        let [x, y] = scene.centroid("PRY").unwrap();
        assert_ne!(grid.find_at(x, y), Some("BRA"));
        let [bx, by] = scene.centroid("BRA").unwrap();
        assert_eq!(grid.find_at(bx, by), Some("BRA"));
    }

    #[test]
    fn background_and_outside_points_miss() {
        let scene = scene(800.0, 520.0);
        let grid = SpatialGrid::build(&scene);
        assert_eq!(grid.find_at(-50.0, -50.0), None);
        assert_eq!(grid.find_at(f64::NAN, 10.0), None);
        assert_eq!(grid.find_at(2.0, 2.0), None);
        assert_eq!(SpatialGrid::default().find_at(10.0, 10.0), None);
    }

    #[test]
    fn point_in_rings_handles_holes() {
        let outer = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let hole = vec![[3.0, 3.0], [7.0, 3.0], [7.0, 7.0], [3.0, 7.0]];
        let rings = vec![outer, hole];
        assert!(point_in_rings([1.0, 1.0], &rings));
        assert!(!point_in_rings([5.0, 5.0], &rings));
        assert!(!point_in_rings([11.0, 5.0], &rings));
    }
}
