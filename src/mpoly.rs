use clipper2::{One, Path, Paths, Point};

use crate::extent::Extent;
use crate::polyline::V2;

pub type IntPoint = Point<One>;
pub type IntPath = Path<One>;
pub type IntPaths = Paths<One>;

// World coordinates are stored as fixed-point integers (1/1000 of a world unit)
// so clipper2 can operate on them losslessly at that precision.
pub const MPOLY_FIXED_DENOM: f64 = 1_000.0;

/// A polygon with optional holes: the first ring is the exterior, the rest are
/// holes. Filling uses the even-odd rule so ring orientation does not matter.
#[derive(Clone, Debug)]
pub struct MPoly {
    paths: IntPaths,
}

// - callback: Takes the cell x-span (x_end is not inclusive) and row,
//   note that `x_end` will always be greater than `x`.
//
// Rings are in fractional cell space; a cell is filled when its center
// `(ix + 0.5, iy + 0.5)` is inside.
fn fill_rings_at_cell_centers<F: FnMut(usize, usize, usize)>(
    w: usize,
    h: usize,
    rings: &[Vec<[f64; 2]>],
    callback: &mut F,
) {
    let mut x_intersections: Vec<f64> = Vec::new();

    for iy in 0..h {
        let yc = iy as f64 + 0.5;
        x_intersections.clear();

        for ring in rings {
            if ring.len() < 3 {
                continue;
            }

            let last = ring[ring.len() - 1];
            let [mut x0, mut y0] = last;

            for &[x1, y1] in ring {
                if y0 != y1 {
                    let y_min = y0.min(y1);
                    let y_max = y0.max(y1);

                    // Half-open range to avoid double-counting shared vertices.
                    if yc >= y_min && yc < y_max {
                        let t = (yc - y0) / (y1 - y0);
                        x_intersections.push(x0 + t * (x1 - x0));
                    }
                }

                x0 = x1;
                y0 = y1;
            }
        }

        if x_intersections.len() < 2 {
            continue;
        }

        x_intersections.sort_unstable_by(f64::total_cmp);

        for pair in x_intersections.chunks_exact(2) {
            // Cells with center in [xa, xb).
            let xa = (pair[0] - 0.5).ceil().max(0.0);
            let xb = (pair[1] - 0.5).ceil().min(w as f64);
            if xa >= w as f64 {
                break;
            }
            if xa < xb {
                callback(xa as usize, xb as usize, iy);
            }
        }
    }
}

fn to_int_point(v: V2) -> IntPoint {
    IntPoint::from_scaled(
        (v.x * MPOLY_FIXED_DENOM).round() as i64,
        (v.y * MPOLY_FIXED_DENOM).round() as i64,
    )
}

fn to_world(pt: &IntPoint) -> V2 {
    V2::new(
        pt.x_scaled() as f64 / MPOLY_FIXED_DENOM,
        pt.y_scaled() as f64 / MPOLY_FIXED_DENOM,
    )
}

impl MPoly {
    pub fn new(paths: Vec<IntPath>) -> Self {
        Self {
            paths: IntPaths::new(paths),
        }
    }

    /// Builds from world-space rings. Rings with fewer than 3 vertices are dropped.
    pub fn from_rings(rings: &[Vec<V2>]) -> Self {
        let paths = rings
            .iter()
            .filter(|r| r.len() >= 3)
            .map(|r| IntPath::new(r.iter().copied().map(to_int_point).collect()))
            .collect();
        Self::new(paths)
    }

    pub fn paths(&self) -> &IntPaths {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntPath> {
        self.paths.iter()
    }

    /// Ring vertices back in world units.
    pub fn rings(&self) -> Vec<Vec<V2>> {
        self.paths.iter().map(|p| p.iter().map(to_world).collect()).collect()
    }

    pub fn extent(&self) -> Option<Extent> {
        Extent::from_points(
            self.paths
                .iter()
                .flat_map(|p| p.iter().map(to_world))
                .map(|v| (v.x, v.y)),
        )
    }

    /// Drops vertices closer than `epsilon` world units to the simplified outline.
    pub fn simplify(&self, epsilon: f64, is_open: bool) -> Self {
        Self {
            paths: self.paths.simplify(epsilon * MPOLY_FIXED_DENOM, is_open),
        }
    }

    /// Scan-converts the polygon onto a `w` x `h` cell grid. `to_cells` maps
    /// world coordinates into fractional cell space; `callback` receives
    /// `(x_start, x_end, y)` spans of cells whose centers are inside.
    pub fn raster_cells<T, F>(&self, w: usize, h: usize, to_cells: T, mut callback: F)
    where
        T: Fn(f64, f64) -> (f64, f64),
        F: FnMut(usize, usize, usize),
    {
        let rings: Vec<Vec<[f64; 2]>> = self
            .paths
            .iter()
            .map(|p| {
                p.iter()
                    .map(|pt| {
                        let v = to_world(pt);
                        let (cx, cy) = to_cells(v.x, v.y);
                        [cx, cy]
                    })
                    .collect()
            })
            .collect();
        fill_rings_at_cell_centers(w, h, &rings, &mut callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<V2> {
        vec![V2::new(x0, y0), V2::new(x1, y0), V2::new(x1, y1), V2::new(x0, y1)]
    }

    fn filled_cells(mpoly: &MPoly, w: usize, h: usize) -> Vec<Vec<bool>> {
        let mut out = vec![vec![false; w]; h];
        mpoly.raster_cells(w, h, |x, y| (x, y), |x_start, x_end, y| {
            for x in x_start..x_end {
                out[y][x] = true;
            }
        });
        out
    }

    #[test]
    fn fills_cells_with_centers_inside() {
        let mpoly = MPoly::from_rings(&[square(1.0, 1.0, 4.0, 3.0)]);
        let cells = filled_cells(&mpoly, 6, 5);
        for (y, row) in cells.iter().enumerate() {
            for (x, &filled) in row.iter().enumerate() {
                let expect = (1..4).contains(&x) && (1..3).contains(&y);
                assert_eq!(filled, expect, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn holes_are_left_empty() {
        let mpoly = MPoly::from_rings(&[square(0.0, 0.0, 6.0, 6.0), square(2.0, 2.0, 4.0, 4.0)]);
        assert_eq!(mpoly.len(), 2);
        let cells = filled_cells(&mpoly, 6, 6);
        assert!(cells[0][0]);
        assert!(cells[5][5]);
        assert!(!cells[2][2]);
        assert!(!cells[3][3]);
        assert!(cells[1][2]);
    }

    #[test]
    fn raster_clips_when_geometry_outside_grid() {
        let mpoly = MPoly::from_rings(&[square(-10.0, -10.0, 2.0, 20.0)]);
        let cells = filled_cells(&mpoly, 4, 4);
        for row in &cells {
            assert_eq!(row, &vec![true, true, false, false]);
        }
    }

    #[test]
    fn world_round_trip_and_extent() {
        let mpoly = MPoly::from_rings(&[square(0.25, -1.5, 10.125, 3.0), vec![V2::new(0.0, 0.0)]]);
        assert_eq!(mpoly.len(), 1, "degenerate ring dropped");
        assert_eq!(mpoly.rings()[0][2], V2::new(10.125, 3.0));
        let e = mpoly.extent().unwrap();
        assert_eq!(e.x_range(), (0.25, 10.125));
        assert_eq!(e.y_range(), (-1.5, 3.0));
    }

    #[test]
    fn simplify_drops_collinear_vertex() {
        let ring = vec![
            V2::new(0.0, 0.0),
            V2::new(5.0, 0.0),
            V2::new(10.0, 0.0),
            V2::new(10.0, 10.0),
            V2::new(0.0, 10.0),
        ];
        let mpoly = MPoly::from_rings(&[ring]).simplify(0.01, false);
        assert!(!mpoly.is_empty());
        assert_eq!(mpoly.rings()[0].len(), 4);
    }
}
