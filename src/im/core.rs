#[derive(Debug, Clone)]
pub struct Im<T, const N_CH: usize> {
    pub w: usize,
    pub h: usize,
    pub s: usize, // stride in elements (w * N_CH)
    pub arr: Vec<T>,
}

// Constructor
// -----------------------------------------------------------------------------
impl<T: Copy + Default, const N_CH: usize> Im<T, N_CH> {
    pub fn new(w: usize, h: usize) -> Self {
        let s = w * N_CH;
        let arr = vec![T::default(); s * h];
        Self { w, h, s, arr }
    }
}

impl<T: Copy, const N_CH: usize> Im<T, N_CH> {
    pub fn filled(w: usize, h: usize, v: T) -> Self {
        let s = w * N_CH;
        let arr = vec![v; s * h];
        Self { w, h, s, arr }
    }

    /// Builds a new image of the same shape by mapping every element.
    pub fn map<U: Copy, F: FnMut(T) -> U>(&self, mut f: F) -> Im<U, N_CH> {
        Im {
            w: self.w,
            h: self.h,
            s: self.s,
            arr: self.arr.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl<T, const N_CH: usize> Im<T, N_CH> {
    /// Bounds-checked single element access.
    #[inline]
    pub fn get(&self, x: usize, y: usize, ch: usize) -> Option<&T> {
        if x >= self.w || y >= self.h || ch >= N_CH {
            return None;
        }
        self.arr.get(y * self.s + x * N_CH + ch)
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize, ch: usize) -> Option<&mut T> {
        if x >= self.w || y >= self.h || ch >= N_CH {
            return None;
        }
        self.arr.get_mut(y * self.s + x * N_CH + ch)
    }
}

// Value helpers
// -----------------------------------------------------------------------------

impl<const N_CH: usize> Im<f64, N_CH> {
    /// Min and max over the finite elements, `None` when every element is NaN/inf.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.arr
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn count_finite(&self) -> usize {
        self.arr.iter().filter(|v| v.is_finite()).count()
    }
}

/// Single-channel value layer. Empty cells are NaN.
pub type ValueIm = Im<f64, 1>;
pub type Lum16Im = Im<u16, 1>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_new_f64_im() {
        let im = ValueIm::new(3, 2);
        assert_eq!(im.w, 3);
        assert_eq!(im.h, 2);
        assert_eq!(im.s, 3);
        assert_eq!(im.arr.len(), 3 * 2);
        assert!(im.arr.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn get_is_bounds_checked() {
        let mut im = Im::<u16, 2>::new(2, 2);
        *im.get_mut(1, 1, 1).unwrap() = 7;
        assert_eq!(im.get(1, 1, 1), Some(&7));
        assert_eq!(im.arr[im.s + 2 + 1], 7);
        assert!(im.get(2, 0, 0).is_none());
        assert!(im.get(0, 2, 0).is_none());
        assert!(im.get(0, 0, 2).is_none());
    }

    #[test]
    fn finite_range_skips_nan() {
        let mut im = ValueIm::filled(4, 1, f64::NAN);
        assert_eq!(im.finite_range(), None);
        assert_eq!(im.count_finite(), 0);

        im.arr[1] = -2.0;
        im.arr[3] = 5.5;
        assert_eq!(im.finite_range(), Some((-2.0, 5.5)));
        assert_eq!(im.count_finite(), 2);
    }

    #[test]
    fn map_keeps_shape() {
        let im = ValueIm::filled(3, 2, 1.5);
        let out: Im<u16, 1> = im.map(|v| (v * 2.0) as u16);
        assert_eq!((out.w, out.h, out.s), (3, 2, 3));
        assert!(out.arr.iter().all(|&v| v == 3));
    }
}
