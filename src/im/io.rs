use super::core::{Im, Lum16Im, ValueIm};
use image::ImageResult;
use std::path::Path;

fn dim_mismatch_err() -> image::ImageError {
    image::ImageError::Parameter(image::error::ParameterError::from_kind(
        image::error::ParameterErrorKind::DimensionMismatch,
    ))
}

// Value -> luminance packing
// -----------------------------------------------------------------------------

/// Linearly maps finite values onto `1..=u16::MAX`, leaving 0 for NaN cells.
fn values_to_lum16(values: &ValueIm) -> Lum16Im {
    let Some((lo, hi)) = values.finite_range() else {
        return Lum16Im::new(values.w, values.h);
    };
    let span = hi - lo;
    let top = (u16::MAX - 1) as f64;
    values.map(|v| {
        if !v.is_finite() {
            0
        } else if span > 0.0 {
            1 + ((v - lo) / span * top).round() as u16
        } else {
            u16::MAX
        }
    })
}

// PNG I/O
// -----------------------------------------------------------------------------
impl Im<u16, 1> {
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let img = image::ImageBuffer::<image::Luma<u16>, _>::from_raw(
            self.w as u32,
            self.h as u32,
            self.arr.clone(),
        )
        .ok_or_else(dim_mismatch_err)?;

        img.save_with_format(path, image::ImageFormat::Png)
    }
}

impl Im<f64, 1> {
    /// Saves the layer as 16-bit grayscale normalized to its finite range.
    /// Row 0 of the image is the top (max y) row of the raster.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let mut lum = values_to_lum16(self);
        flip_rows(&mut lum);
        lum.save_png(path)
    }
}

fn flip_rows(im: &mut Lum16Im) {
    let s = im.s;
    for y in 0..im.h / 2 {
        let (top, bot) = im.arr.split_at_mut((im.h - 1 - y) * s);
        top[y * s..y * s + s].swap_with_slice(&mut bot[..s]);
    }
}

// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lum16_reserves_zero_for_nan() {
        let mut im = ValueIm::filled(4, 1, f64::NAN);
        im.arr[1] = 10.0;
        im.arr[2] = 20.0;
        im.arr[3] = 15.0;

        let lum = values_to_lum16(&im);
        assert_eq!(lum.arr[0], 0);
        assert_eq!(lum.arr[1], 1);
        assert_eq!(lum.arr[2], u16::MAX);
        assert!(lum.arr[3] > 1 && lum.arr[3] < u16::MAX);
    }

    #[test]
    fn lum16_of_constant_layer_is_saturated() {
        let im = ValueIm::filled(2, 2, 3.0);
        let lum = values_to_lum16(&im);
        assert!(lum.arr.iter().all(|&v| v == u16::MAX));
    }

    #[test]
    fn flip_rows_reverses_row_order() {
        let mut im = Lum16Im::new(2, 3);
        im.arr = vec![1, 1, 2, 2, 3, 3];
        flip_rows(&mut im);
        assert_eq!(im.arr, vec![3, 3, 2, 2, 1, 1]);
    }
}
