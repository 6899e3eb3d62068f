use crate::agg::Reduction;
use crate::extent::Extent;
use crate::im::{Im, ValueIm};
use crate::mat3::Mat3;

/// A single-layer raster over a world extent, with named axes.
///
/// Row 0 is the minimum-y row; cell `(ix, iy)` is centered at
/// `(x0 + (ix + 0.5) * cell_w, y0 + (iy + 0.5) * cell_h)`.
#[derive(Debug, Clone)]
pub struct Raster {
    pub extent: Extent,
    pub x_dim: String,
    pub y_dim: String,
    pub vdim: String,
    pub values: ValueIm,
}

/// Result of a nearest-cell lookup: the cell center and its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl Raster {
    pub fn w(&self) -> usize {
        self.values.w
    }

    pub fn h(&self) -> usize {
        self.values.h
    }

    pub fn cell_w(&self) -> f64 {
        self.extent.span_x() / self.w() as f64
    }

    pub fn cell_h(&self) -> f64 {
        self.extent.span_y() / self.h() as f64
    }

    pub fn cell_center(&self, ix: usize, iy: usize) -> (f64, f64) {
        Mat3::cells_to_world(&self.extent, self.w(), self.h())
            .transform_point2(ix as f64 + 0.5, iy as f64 + 0.5)
    }

    /// Index of the cell whose center is nearest to `(x, y)`. Points outside
    /// the extent snap to the edge cells.
    pub fn nearest_cell(&self, x: f64, y: f64) -> (usize, usize) {
        let (cx, cy) = Mat3::world_to_cells(&self.extent, self.w(), self.h()).transform_point2(x, y);
        (nearest_index(cx, self.w()), nearest_index(cy, self.h()))
    }

    /// Nearest-neighbor selection; reports the cell center rather than `(x, y)`.
    pub fn sel_nearest(&self, x: f64, y: f64) -> CellSample {
        let (ix, iy) = self.nearest_cell(x, y);
        let (cx, cy) = self.cell_center(ix, iy);
        let value = self.values.get(ix, iy, 0).copied().unwrap_or(f64::NAN);
        CellSample { x: cx, y: cy, value }
    }
}

fn nearest_index(c: f64, n: usize) -> usize {
    if n == 0 || !c.is_finite() || c <= 0.0 {
        return 0;
    }
    (c.floor() as usize).min(n - 1)
}

/// Per-cell reduction state accumulated while rasterizing a field.
pub struct Canvas<'a, R: Reduction> {
    reduction: &'a R,
    extent: Extent,
    to_cells: Mat3,
    to_world: Mat3,
    states: Im<R::State, 1>,
    hits: Im<u32, 1>,
}

impl<'a, R: Reduction> Canvas<'a, R> {
    pub fn new(extent: Extent, w: usize, h: usize, reduction: &'a R) -> Self {
        Self {
            reduction,
            extent,
            to_cells: Mat3::world_to_cells(&extent, w, h),
            to_world: Mat3::cells_to_world(&extent, w, h),
            states: Im::new(w, h),
            hits: Im::new(w, h),
        }
    }

    pub fn w(&self) -> usize {
        self.states.w
    }

    pub fn h(&self) -> usize {
        self.states.h
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    /// World position to fractional cell coordinates.
    #[inline]
    pub fn to_cells(&self, x: f64, y: f64) -> (f64, f64) {
        self.to_cells.transform_point2(x, y)
    }

    /// World position of the center of cell `(ix, iy)`.
    #[inline]
    pub fn cell_center(&self, ix: usize, iy: usize) -> (f64, f64) {
        self.to_world.transform_point2(ix as f64 + 0.5, iy as f64 + 0.5)
    }

    pub fn world_to_cells(&self) -> Mat3 {
        self.to_cells
    }

    #[inline]
    pub fn add(&mut self, ix: usize, iy: usize, v: f64) {
        if let Some(st) = self.states.get_mut(ix, iy, 0) {
            self.reduction.update(st, v);
            self.hits.arr[iy * self.hits.s + ix] += 1;
        }
    }

    /// Number of cells that received no contribution yet.
    pub fn empty_cells(&self) -> usize {
        self.hits.arr.iter().filter(|&&n| n == 0).count()
    }

    /// Offers every cell that received nothing to `f` (called with the cell
    /// center); a returned value is reduced into that cell.
    pub fn fill_empty<F: FnMut(f64, f64) -> Option<f64>>(&mut self, mut f: F) {
        for iy in 0..self.h() {
            for ix in 0..self.w() {
                if self.hits.arr[iy * self.hits.s + ix] != 0 {
                    continue;
                }
                let (x, y) = self.cell_center(ix, iy);
                if let Some(v) = f(x, y) {
                    self.add(ix, iy, v);
                }
            }
        }
    }

    /// Reduces `v` into the cell containing the world point, if it is inside
    /// the extent. Points on the max edge belong to the last cell.
    pub fn add_at(&mut self, x: f64, y: f64, v: f64) -> bool {
        if !self.extent.contains(x, y) {
            return false;
        }
        let (cx, cy) = self.to_cells(x, y);
        let ix = nearest_index(cx, self.w());
        let iy = nearest_index(cy, self.h());
        self.add(ix, iy, v);
        true
    }

    pub fn finish(self, x_dim: &str, y_dim: &str, vdim: &str) -> Raster {
        let reduction = self.reduction;
        Raster {
            extent: self.extent,
            x_dim: x_dim.to_string(),
            y_dim: y_dim.to_string(),
            vdim: vdim.to_string(),
            values: self.states.map(|st| reduction.finish(&st)),
        }
    }
}
