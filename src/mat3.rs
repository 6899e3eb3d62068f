use crate::extent::Extent;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    // Row-major 3x3 matrix.
    m: [[f64; 3]; 3],
}

impl Mat3 {
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Constructs a homogeneous 3x3 matrix from a 2D affine transform.
    ///
    /// The expected 6-element layout is `[a, b, c, d, e, f]` such that:
    ///
    /// - `x' = a*x + c*y + e`
    /// - `y' = b*x + d*y + f`
    pub fn from_affine2(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            m: [[a, c, e], [b, d, f], [0.0, 0.0, 1.0]],
        }
    }

    /// Maps world coordinates inside `extent` onto fractional cell space of a
    /// `w` x `h` raster: `extent.x0 -> 0.0`, `extent.x1 -> w`, and likewise for y
    /// (row 0 is the minimum y).
    ///
    /// A zero-width axis collapses onto cell coordinate 0.
    pub fn world_to_cells(extent: &Extent, w: usize, h: usize) -> Self {
        let sx = if extent.span_x() > 0.0 { w as f64 / extent.span_x() } else { 0.0 };
        let sy = if extent.span_y() > 0.0 { h as f64 / extent.span_y() } else { 0.0 };
        Self::from_affine2(sx, 0.0, 0.0, sy, 0.0, 0.0).then_translate(-extent.x0 * sx, -extent.y0 * sy)
    }

    /// The inverse of `world_to_cells`: cell space back to world coordinates.
    pub fn cells_to_world(extent: &Extent, w: usize, h: usize) -> Self {
        let sx = if w > 0 { extent.span_x() / w as f64 } else { 0.0 };
        let sy = if h > 0 { extent.span_y() / h as f64 } else { 0.0 };
        Self::from_affine2(sx, 0.0, 0.0, sy, 0.0, 0.0).then_translate(extent.x0, extent.y0)
    }

    /// Applies this transform to a 2D point (implicitly using homogeneous `w=1`).
    #[inline]
    pub fn transform_point2(&self, x: f64, y: f64) -> (f64, f64) {
        let x2 = self.m[0][0] * x + self.m[0][1] * y + self.m[0][2];
        let y2 = self.m[1][0] * x + self.m[1][1] * y + self.m[1][2];
        (x2, y2)
    }

    /// Returns a transform that applies this matrix, then translates by `(tx, ty)`.
    ///
    /// This is equivalent to left-multiplying by a translation matrix `T(tx, ty)`.
    #[inline]
    pub fn then_translate(self, tx: f64, ty: f64) -> Self {
        let mut out = self;
        out.m[0][2] += tx;
        out.m[1][2] += ty;
        out
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_to_cells_maps_extent_corners() {
        let extent = Extent::new((100.0, 200.0), (-50.0, 50.0));
        let m = Mat3::world_to_cells(&extent, 10, 20);
        let close = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9;
        assert!(close(m.transform_point2(100.0, -50.0), (0.0, 0.0)));
        assert!(close(m.transform_point2(200.0, 50.0), (10.0, 20.0)));
        assert!(close(m.transform_point2(150.0, 0.0), (5.0, 10.0)));
    }

    #[test]
    fn cells_to_world_inverts() {
        let extent = Extent::new((0.0, 40.0), (10.0, 30.0));
        let fwd = Mat3::world_to_cells(&extent, 8, 4);
        let inv = Mat3::cells_to_world(&extent, 8, 4);
        let (cx, cy) = fwd.transform_point2(13.0, 27.5);
        let (x, y) = inv.transform_point2(cx, cy);
        assert!((x - 13.0).abs() < 1e-9);
        assert!((y - 27.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_axis_collapses() {
        let extent = Extent::new((5.0, 5.0), (0.0, 10.0));
        let m = Mat3::world_to_cells(&extent, 10, 10);
        let (cx, cy) = m.transform_point2(5.0, 5.0);
        assert_eq!(cx, 0.0);
        assert!((cy - 5.0).abs() < 1e-9);
    }

    #[test]
    fn then_translate_offsets() {
        let m = Mat3::identity().then_translate(2.0, -3.0);
        assert_eq!(m.transform_point2(1.0, 1.0), (3.0, -2.0));
    }
}
