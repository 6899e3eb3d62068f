/// A rectangular range of cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ROI {
    pub l: usize,
    pub t: usize,
    /// Exclusive right bound.
    pub r: usize,
    /// Exclusive bottom bound.
    pub b: usize,
}

impl ROI {
    /// Width of the ROI.
    pub fn w(&self) -> usize {
        self.r.saturating_sub(self.l)
    }

    /// Height of the ROI.
    pub fn h(&self) -> usize {
        self.b.saturating_sub(self.t)
    }

    pub fn is_empty(&self) -> bool {
        self.w() == 0 || self.h() == 0
    }

    /// Cells whose centers can fall inside the fractional cell-space box
    /// `[cx0, cx1] x [cy0, cy1]`, clamped to a `max_w` x `max_h` image.
    ///
    /// A cell `i` has its center at `i + 0.5`, so the covered range is
    /// `ceil(c0 - 0.5) ..= floor(c1 - 0.5)`.
    pub fn from_cell_box(cx0: f64, cy0: f64, cx1: f64, cy1: f64, max_w: usize, max_h: usize) -> ROI {
        fn span(c0: f64, c1: f64, max: usize) -> (usize, usize) {
            if !(c0.is_finite() && c1.is_finite()) || c1 < c0 {
                return (0, 0);
            }
            let lo = (c0 - 0.5).ceil().max(0.0);
            let hi = ((c1 - 0.5).floor() + 1.0).min(max as f64);
            if hi <= lo {
                return (0, 0);
            }
            (lo as usize, hi as usize)
        }

        let (l, r) = span(cx0, cx1, max_w);
        let (t, b) = span(cy0, cy1, max_h);
        ROI { l, t, r, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_box_covers_centers_only() {
        // Centers at 0.5, 1.5, 2.5, 3.5 ... Box [0.6, 3.5] holds 1.5, 2.5, 3.5.
        let roi = ROI::from_cell_box(0.6, 0.0, 3.5, 1.0, 10, 10);
        assert_eq!((roi.l, roi.r), (1, 4));
        assert_eq!((roi.t, roi.b), (0, 1));
        assert_eq!(roi.w(), 3);
        assert_eq!(roi.h(), 1);
    }

    #[test]
    fn cell_box_is_clamped() {
        let roi = ROI::from_cell_box(-5.0, -5.0, 50.0, 50.0, 8, 4);
        assert_eq!(roi, ROI { l: 0, t: 0, r: 8, b: 4 });

        let outside = ROI::from_cell_box(20.0, 20.0, 30.0, 30.0, 8, 4);
        assert!(outside.is_empty());
    }
}
