//! Value sources that can be rasterized over an arbitrary extent.
//!
//! A field is one of a few concrete source kinds (regular grid, triangle mesh,
//! scattered points, polygons). Each carries ordered named value channels; the
//! first channel is the one sampled by cross sections.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::agg::Reduction;
use crate::error::{Error, Result};
use crate::extent::Extent;
use crate::im::ROI;
use crate::mat3::Mat3;
use crate::mpoly::MPoly;
use crate::polyline::V2;
use crate::raster::{Canvas, Raster};

/// Names of the two coordinate axes of a field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Axes {
    pub x: String,
    pub y: String,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            x: "x".to_string(),
            y: "y".to_string(),
        }
    }
}

// Channels
// -----------------------------------------------------------------------------

/// Ordered named scalar channels, all the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channels {
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl Channels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scalar(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        if let Some(i) = self.index_of(&name) {
            self.values[i] = values;
            return;
        }
        self.names.push(name);
        self.values.push(values);
    }

    /// Vector data is stored as its magnitude, under `"<name> Magnitude"`.
    pub fn push_vector(&mut self, name: &str, u: &[f64], v: &[f64]) -> Result<()> {
        if u.len() != v.len() {
            return Err(Error::invalid(format!(
                "vector channel '{name}' has {} u and {} v components",
                u.len(),
                v.len()
            )));
        }
        let mag = u.iter().zip(v).map(|(a, b)| a.hypot(*b)).collect();
        self.push_scalar(format!("{name} Magnitude"), mag);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<(&str, &[f64])> {
        Some((self.names.first()?.as_str(), self.values.first()?.as_slice()))
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.index_of(name).map(|i| self.values[i].as_slice())
    }

    /// Channel names sorted ascending, for presenting a choice of results.
    pub fn result_labels(&self) -> Vec<String> {
        let mut labels = self.names.clone();
        labels.sort();
        if labels.is_empty() {
            warn!("No results were found in dataset.");
        }
        labels
    }

    /// Moves `name` to the front so it becomes the sampled channel.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let i = self
            .index_of(name)
            .ok_or_else(|| Error::MissingData(format!("no channel named '{name}'")))?;
        let n = self.names.remove(i);
        let v = self.values.remove(i);
        self.names.insert(0, n);
        self.values.insert(0, v);
        Ok(())
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    fn check_len(&self, kind: &str, n: usize) -> Result<()> {
        for (name, vals) in self.names.iter().zip(&self.values) {
            if vals.len() != n {
                return Err(Error::invalid(format!(
                    "{kind} channel '{name}' has {} values, expected {n}",
                    vals.len()
                )));
            }
        }
        Ok(())
    }
}

// FieldSource
// -----------------------------------------------------------------------------

pub trait FieldSource {
    /// Name of the channel cross sections sample, `None` if there is none.
    fn first_value_dimension(&self) -> Option<&str>;

    /// Bounds of the source data, `None` if it has no geometry.
    fn extent(&self) -> Option<Extent>;

    /// Resamples the first value channel onto a `w` x `h` raster covering
    /// `extent`, combining contributions per cell with `reduction`.
    fn rasterize<R: Reduction>(&self, extent: &Extent, w: usize, h: usize, reduction: &R) -> Result<Raster>;
}

fn first_channel<'a>(channels: &'a Channels, kind: &str) -> Result<(&'a str, &'a [f64])> {
    channels
        .first()
        .ok_or_else(|| Error::MissingData(format!("{kind} field has no value dimension")))
}

fn check_raster_dims(w: usize, h: usize) -> Result<()> {
    if w == 0 || h == 0 {
        return Err(Error::invalid(format!("raster dimensions must be non-zero, got {w}x{h}")));
    }
    Ok(())
}

// Grid
// -----------------------------------------------------------------------------

/// A regular source grid. Channel values are row-major with row 0 at `extent.y0`.
#[derive(Debug, Clone)]
pub struct GridField {
    extent: Extent,
    w: usize,
    h: usize,
    axes: Axes,
    channels: Channels,
}

impl GridField {
    pub fn new(extent: Extent, w: usize, h: usize, channels: Channels) -> Result<Self> {
        let grid = Self {
            extent,
            w,
            h,
            axes: Axes::default(),
            channels,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Non-zero dimensions whose product fits in `usize`, and `w * h` values
    /// in every channel.
    pub fn validate(&self) -> Result<()> {
        check_raster_dims(self.w, self.h)?;
        let n = self.w.checked_mul(self.h).ok_or_else(|| {
            Error::invalid(format!("grid dimensions {}x{} overflow", self.w, self.h))
        })?;
        self.channels.check_len("grid", n)
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn channels(&self) -> &Channels {
        &self.channels
    }
}

impl FieldSource for GridField {
    fn first_value_dimension(&self) -> Option<&str> {
        self.channels.first().map(|(name, _)| name)
    }

    fn extent(&self) -> Option<Extent> {
        Some(self.extent)
    }

    fn rasterize<R: Reduction>(&self, extent: &Extent, w: usize, h: usize, reduction: &R) -> Result<Raster> {
        check_raster_dims(w, h)?;
        self.validate()?;
        let (vdim, vals) = first_channel(&self.channels, "grid")?;
        let mut canvas = Canvas::new(*extent, w, h, reduction);

        // Downsampling: every source cell center inside the target extent.
        let to_src = Mat3::world_to_cells(&self.extent, self.w, self.h);
        let from_src = Mat3::cells_to_world(&self.extent, self.w, self.h);
        let (cx0, cy0) = to_src.transform_point2(extent.x0, extent.y0);
        let (cx1, cy1) = to_src.transform_point2(extent.x1, extent.y1);
        let roi = ROI::from_cell_box(cx0, cy0, cx1, cy1, self.w, self.h);
        for iy in roi.t..roi.b {
            for ix in roi.l..roi.r {
                let (x, y) = from_src.transform_point2(ix as f64 + 0.5, iy as f64 + 0.5);
                canvas.add_at(x, y, vals[iy * self.w + ix]);
            }
        }

        // Upsampling: target cells that caught no source center take the
        // nearest source cell, as long as they lie over the source grid.
        let n_empty = canvas.empty_cells();
        if n_empty > 0 {
            canvas.fill_empty(|x, y| {
                if !self.extent.contains(x, y) {
                    return None;
                }
                let (cx, cy) = to_src.transform_point2(x, y);
                let ix = (cx.max(0.0) as usize).min(self.w - 1);
                let iy = (cy.max(0.0) as usize).min(self.h - 1);
                Some(vals[iy * self.w + ix])
            });
        }
        debug!(src_cells = roi.w() * roi.h(), upsampled = n_empty, w, h, "grid rasterized");

        Ok(canvas.finish(&self.axes.x, &self.axes.y, vdim))
    }
}

// Mesh
// -----------------------------------------------------------------------------

/// An unstructured 2D triangle mesh with node-level channels.
#[derive(Debug, Clone)]
pub struct MeshField {
    verts: Vec<V2>,
    tris: Vec<[usize; 3]>,
    axes: Axes,
    channels: Channels,
}

impl MeshField {
    pub fn new(verts: Vec<V2>, tris: Vec<[usize; 3]>, channels: Channels) -> Result<Self> {
        let mesh = Self {
            verts,
            tris,
            axes: Axes::default(),
            channels,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Every triangle must reference existing nodes, and every channel must
    /// have one value per node.
    pub fn validate(&self) -> Result<()> {
        let n = self.verts.len();
        if let Some((ti, tri)) = self.tris.iter().enumerate().find(|(_, t)| t.iter().any(|&v| v >= n)) {
            return Err(Error::InvalidMesh(format!(
                "triangle {ti} {tri:?} references a node outside 0..{n}"
            )));
        }
        self.channels
            .check_len("mesh node", n)
            .map_err(|e| Error::InvalidMesh(e.to_string()))
    }

    pub fn verts(&self) -> &[V2] {
        &self.verts
    }

    pub fn tris(&self) -> &[[usize; 3]] {
        &self.tris
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn channels(&self) -> &Channels {
        &self.channels
    }
}

impl FieldSource for MeshField {
    fn first_value_dimension(&self) -> Option<&str> {
        self.channels.first().map(|(name, _)| name)
    }

    fn extent(&self) -> Option<Extent> {
        Extent::from_points(self.verts.iter().map(|v| (v.x, v.y)))
    }

    fn rasterize<R: Reduction>(&self, extent: &Extent, w: usize, h: usize, reduction: &R) -> Result<Raster> {
        check_raster_dims(w, h)?;
        self.validate()?;
        let (vdim, vals) = first_channel(&self.channels, "mesh")?;
        let mut canvas = Canvas::new(*extent, w, h, reduction);
        let to_cells = canvas.world_to_cells();

        let cell_verts: Vec<(f64, f64)> = self
            .verts
            .iter()
            .map(|v| to_cells.transform_point2(v.x, v.y))
            .collect();

        let mut n_tris = 0usize;
        for &[i0, i1, i2] in &self.tris {
            let (p0, p1, p2) = (cell_verts[i0], cell_verts[i1], cell_verts[i2]);
            let area = (p1.0 - p0.0) * (p2.1 - p0.1) - (p2.0 - p0.0) * (p1.1 - p0.1);
            if area == 0.0 || !area.is_finite() {
                continue;
            }

            let roi = ROI::from_cell_box(
                p0.0.min(p1.0).min(p2.0),
                p0.1.min(p1.1).min(p2.1),
                p0.0.max(p1.0).max(p2.0),
                p0.1.max(p1.1).max(p2.1),
                w,
                h,
            );
            if roi.is_empty() {
                continue;
            }
            n_tris += 1;

            let (v0, v1, v2) = (vals[i0], vals[i1], vals[i2]);
            for iy in roi.t..roi.b {
                let py = iy as f64 + 0.5;
                for ix in roi.l..roi.r {
                    let px = ix as f64 + 0.5;
                    // Barycentric weights of the cell center.
                    let l1 = ((px - p0.0) * (p2.1 - p0.1) - (p2.0 - p0.0) * (py - p0.1)) / area;
                    let l2 = ((p1.0 - p0.0) * (py - p0.1) - (px - p0.0) * (p1.1 - p0.1)) / area;
                    let l0 = 1.0 - l1 - l2;
                    const EPS: f64 = -1e-9;
                    if l0 < EPS || l1 < EPS || l2 < EPS {
                        continue;
                    }
                    canvas.add(ix, iy, l0 * v0 + l1 * v1 + l2 * v2);
                }
            }
        }
        debug!(tris = n_tris, w, h, "mesh rasterized");

        Ok(canvas.finish(&self.axes.x, &self.axes.y, vdim))
    }
}

// Points
// -----------------------------------------------------------------------------

/// Scattered point samples.
#[derive(Debug, Clone)]
pub struct PointField {
    pub points: Vec<V2>,
    pub axes: Axes,
    pub channels: Channels,
}

impl PointField {
    pub fn new(points: Vec<V2>, channels: Channels) -> Result<Self> {
        channels.check_len("point", points.len())?;
        Ok(Self {
            points,
            axes: Axes::default(),
            channels,
        })
    }
}

impl FieldSource for PointField {
    fn first_value_dimension(&self) -> Option<&str> {
        self.channels.first().map(|(name, _)| name)
    }

    fn extent(&self) -> Option<Extent> {
        Extent::from_points(self.points.iter().map(|v| (v.x, v.y)))
    }

    fn rasterize<R: Reduction>(&self, extent: &Extent, w: usize, h: usize, reduction: &R) -> Result<Raster> {
        check_raster_dims(w, h)?;
        let (vdim, vals) = first_channel(&self.channels, "point")?;
        let mut canvas = Canvas::new(*extent, w, h, reduction);
        let mut inside = 0usize;
        for (p, &v) in self.points.iter().zip(vals) {
            if canvas.add_at(p.x, p.y, v) {
                inside += 1;
            }
        }
        debug!(points = inside, w, h, "points rasterized");
        Ok(canvas.finish(&self.axes.x, &self.axes.y, vdim))
    }
}

// Polygons
// -----------------------------------------------------------------------------

/// Polygon features, each carrying one value per channel.
#[derive(Debug, Clone)]
pub struct PolyField {
    pub polys: Vec<MPoly>,
    pub axes: Axes,
    pub channels: Channels,
}

impl PolyField {
    pub fn new(polys: Vec<MPoly>, channels: Channels) -> Result<Self> {
        channels.check_len("polygon", polys.len())?;
        Ok(Self {
            polys,
            axes: Axes::default(),
            channels,
        })
    }

    /// Simplifies every polygon outline with tolerance `epsilon` (world units).
    pub fn simplified(mut self, epsilon: f64) -> Self {
        for p in &mut self.polys {
            *p = p.simplify(epsilon, false);
        }
        self
    }
}

impl FieldSource for PolyField {
    fn first_value_dimension(&self) -> Option<&str> {
        self.channels.first().map(|(name, _)| name)
    }

    fn extent(&self) -> Option<Extent> {
        self.polys
            .iter()
            .filter_map(MPoly::extent)
            .reduce(|a, b| Extent::new((a.x0.min(b.x0), a.x1.max(b.x1)), (a.y0.min(b.y0), a.y1.max(b.y1))))
    }

    fn rasterize<R: Reduction>(&self, extent: &Extent, w: usize, h: usize, reduction: &R) -> Result<Raster> {
        check_raster_dims(w, h)?;
        let (vdim, vals) = first_channel(&self.channels, "polygon")?;
        let mut canvas = Canvas::new(*extent, w, h, reduction);
        let to_cells = canvas.world_to_cells();

        for (mpoly, &v) in self.polys.iter().zip(vals) {
            if mpoly.is_empty() {
                continue;
            }
            mpoly.raster_cells(
                w,
                h,
                |x, y| to_cells.transform_point2(x, y),
                |x_start, x_end, y| {
                    for x in x_start..x_end {
                        canvas.add(x, y, v);
                    }
                },
            );
        }
        debug!(polys = self.polys.len(), w, h, "polygons rasterized");

        Ok(canvas.finish(&self.axes.x, &self.axes.y, vdim))
    }
}

// Field
// -----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Field {
    Grid(GridField),
    Mesh(MeshField),
    Points(PointField),
    Polys(PolyField),
}

impl Field {
    pub fn kind(&self) -> &'static str {
        match self {
            Field::Grid(_) => "grid",
            Field::Mesh(_) => "mesh",
            Field::Points(_) => "points",
            Field::Polys(_) => "polys",
        }
    }

    pub fn channels(&self) -> &Channels {
        match self {
            Field::Grid(f) => &f.channels,
            Field::Mesh(f) => &f.channels,
            Field::Points(f) => &f.channels,
            Field::Polys(f) => &f.channels,
        }
    }

    pub fn channels_mut(&mut self) -> &mut Channels {
        match self {
            Field::Grid(f) => &mut f.channels,
            Field::Mesh(f) => &mut f.channels,
            Field::Points(f) => &mut f.channels,
            Field::Polys(f) => &mut f.channels,
        }
    }

    pub fn axes_mut(&mut self) -> &mut Axes {
        match self {
            Field::Grid(f) => &mut f.axes,
            Field::Mesh(f) => &mut f.axes,
            Field::Points(f) => &mut f.axes,
            Field::Polys(f) => &mut f.axes,
        }
    }
}

impl FieldSource for Field {
    fn first_value_dimension(&self) -> Option<&str> {
        match self {
            Field::Grid(f) => f.first_value_dimension(),
            Field::Mesh(f) => f.first_value_dimension(),
            Field::Points(f) => f.first_value_dimension(),
            Field::Polys(f) => f.first_value_dimension(),
        }
    }

    fn extent(&self) -> Option<Extent> {
        match self {
            Field::Grid(f) => f.extent(),
            Field::Mesh(f) => f.extent(),
            Field::Points(f) => f.extent(),
            Field::Polys(f) => f.extent(),
        }
    }

    fn rasterize<R: Reduction>(&self, extent: &Extent, w: usize, h: usize, reduction: &R) -> Result<Raster> {
        match self {
            Field::Grid(f) => f.rasterize(extent, w, h, reduction),
            Field::Mesh(f) => f.rasterize(extent, w, h, reduction),
            Field::Points(f) => f.rasterize(extent, w, h, reduction),
            Field::Polys(f) => f.rasterize(extent, w, h, reduction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agg::Aggregator;
    use crate::test_helpers::{ramp_grid, square_ring, two_tri_mesh};

    #[test]
    fn channels_keep_insertion_order() {
        let mut ch = Channels::new();
        ch.push_scalar("depth", vec![1.0]);
        ch.push_scalar("speed", vec![2.0]);
        assert_eq!(ch.first().map(|(n, _)| n), Some("depth"));
        assert_eq!(ch.names().collect::<Vec<_>>(), vec!["depth", "speed"]);

        ch.select("speed").unwrap();
        assert_eq!(ch.first().map(|(n, _)| n), Some("speed"));
        assert!(matches!(ch.select("nope"), Err(Error::MissingData(_))));
    }

    #[test]
    fn vector_channels_store_magnitude() {
        let mut ch = Channels::new();
        ch.push_vector("Velocity", &[3.0, 0.0], &[4.0, -2.0]).unwrap();
        assert_eq!(ch.get("Velocity Magnitude"), Some(&[5.0, 2.0][..]));
        assert!(ch.push_vector("Bad", &[1.0], &[]).is_err());
    }

    #[test]
    fn result_labels_are_sorted() {
        let mut ch = Channels::new();
        ch.push_scalar("wse", vec![]);
        ch.push_scalar("Depth", vec![]);
        ch.push_scalar("error", vec![]);
        assert_eq!(ch.result_labels(), vec!["Depth", "error", "wse"]);
        assert!(Channels::new().result_labels().is_empty());
    }

    #[test]
    fn grid_rejects_wrong_channel_length() {
        let mut ch = Channels::new();
        ch.push_scalar("z", vec![0.0; 5]);
        let e = Extent::new((0.0, 2.0), (0.0, 2.0));
        assert!(matches!(GridField::new(e, 2, 2, ch), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn grid_rejects_overflowing_dims() {
        let e = Extent::new((0.0, 1.0), (0.0, 1.0));
        let res = GridField::new(e, usize::MAX / 2 + 1, 3, Channels::new());
        assert!(matches!(res, Err(Error::InvalidArgument(_))));
        let res = GridField::new(e, usize::MAX, 2, Channels::new());
        assert!(matches!(res, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn resized_channel_fails_rasterize_instead_of_panicking() {
        let e = Extent::new((0.0, 4.0), (0.0, 4.0));

        let mut field = Field::Grid(ramp_grid(4, 4, 4.0));
        field.channels_mut().push_scalar("z", vec![1.0]);
        assert!(matches!(field.rasterize(&e, 2, 2, &Aggregator::Mean), Err(Error::InvalidArgument(_))));

        let mut field = Field::Mesh(two_tri_mesh());
        field.channels_mut().push_scalar("z", vec![1.0, 2.0]);
        assert!(matches!(field.rasterize(&e, 2, 2, &Aggregator::Mean), Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn grid_downsamples_with_reduction() {
        // 4x4 source over [0, 4]^2, value = ix.
        let grid = ramp_grid(4, 4, 4.0);
        let e = Extent::new((0.0, 4.0), (0.0, 4.0));

        let r = grid.rasterize(&e, 2, 2, &Aggregator::Mean).unwrap();
        assert_eq!(r.values.arr, vec![0.5, 2.5, 0.5, 2.5]);
        assert_eq!(r.vdim, "z");

        let r = grid.rasterize(&e, 2, 2, &Aggregator::Max).unwrap();
        assert_eq!(r.values.arr, vec![1.0, 3.0, 1.0, 3.0]);

        let r = grid.rasterize(&e, 2, 2, &Aggregator::Count).unwrap();
        assert!(r.values.arr.iter().all(|&v| v == 4.0));
    }

    #[test]
    fn grid_upsamples_by_nearest() {
        let grid = ramp_grid(2, 1, 2.0);
        let e = Extent::new((0.0, 2.0), (0.0, 1.0));
        let r = grid.rasterize(&e, 8, 2, &Aggregator::Mean).unwrap();
        assert_eq!(&r.values.arr[..8], &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn grid_outside_source_is_nan() {
        let grid = ramp_grid(2, 2, 2.0);
        let e = Extent::new((10.0, 20.0), (10.0, 20.0));
        let r = grid.rasterize(&e, 10, 10, &Aggregator::Mean).unwrap();
        assert!(r.values.arr.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn mesh_validate_catches_bad_indices() {
        let mesh = two_tri_mesh();
        assert!(mesh.validate().is_ok());

        let mut bad = mesh.clone();
        bad.tris.push([0, 1, 9]);
        assert!(matches!(bad.validate(), Err(Error::InvalidMesh(_))));

        let mut ch = Channels::new();
        ch.push_scalar("z", vec![0.0; 3]);
        let res = MeshField::new(mesh.verts.clone(), mesh.tris.clone(), ch);
        assert!(matches!(res, Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn mesh_interpolates_linearly() {
        // z = x over the unit-10 square, so every cell center carries its x.
        let mesh = two_tri_mesh();
        let e = Extent::new((0.0, 10.0), (0.0, 10.0));
        let r = mesh.rasterize(&e, 10, 10, &Aggregator::Mean).unwrap();
        for iy in 0..10 {
            for ix in 0..10 {
                let v = r.values.arr[iy * 10 + ix];
                assert!((v - (ix as f64 + 0.5)).abs() < 1e-9, "cell ({ix}, {iy}) = {v}");
            }
        }
    }

    #[test]
    fn mesh_leaves_cells_outside_triangles_empty() {
        let mesh = two_tri_mesh();
        let e = Extent::new((-10.0, 10.0), (0.0, 10.0));
        let r = mesh.rasterize(&e, 2, 1, &Aggregator::Mean).unwrap();
        assert!(r.values.arr[0].is_nan());
        assert!((r.values.arr[1] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn points_bin_into_cells() {
        let mut ch = Channels::new();
        ch.push_scalar("h", vec![1.0, 3.0, 10.0, 99.0]);
        let pts = vec![V2::new(1.0, 1.0), V2::new(2.0, 2.0), V2::new(9.0, 9.0), V2::new(50.0, 50.0)];
        let field = PointField::new(pts, ch).unwrap();
        let e = Extent::new((0.0, 10.0), (0.0, 10.0));
        let r = field.rasterize(&e, 2, 2, &Aggregator::Sum).unwrap();
        assert_eq!(r.values.arr[0], 4.0);
        assert_eq!(r.values.arr[3], 10.0);
        assert!(r.values.arr[1].is_nan());
    }

    #[test]
    fn polys_fill_cells() {
        let mut ch = Channels::new();
        ch.push_scalar("zone", vec![2.0, 6.0]);
        let polys = vec![
            MPoly::from_rings(&[square_ring(0.0, 0.0, 10.0, 10.0)]),
            MPoly::from_rings(&[square_ring(5.0, 0.0, 10.0, 10.0)]),
        ];
        let field = PolyField::new(polys, ch).unwrap();
        let e = Extent::new((0.0, 10.0), (0.0, 10.0));
        let r = field.rasterize(&e, 2, 1, &Aggregator::Mean).unwrap();
        assert_eq!(r.values.arr, vec![2.0, 4.0]);

        let ext = field.extent().unwrap();
        assert_eq!(ext.x_range(), (0.0, 10.0));
    }

    #[test]
    fn field_without_channels_has_no_value_dimension() {
        let field = Field::Points(PointField::new(vec![V2::new(0.0, 0.0)], Channels::new()).unwrap());
        assert_eq!(field.first_value_dimension(), None);
        let e = Extent::new((0.0, 1.0), (0.0, 1.0));
        assert!(matches!(field.rasterize(&e, 1, 1, &Aggregator::Mean), Err(Error::MissingData(_))));
    }

    #[test]
    fn field_dispatches_by_kind() {
        let field = Field::Mesh(two_tri_mesh());
        assert_eq!(field.kind(), "mesh");
        assert_eq!(field.first_value_dimension(), Some("z"));
        assert_eq!(field.extent().unwrap().x_range(), (0.0, 10.0));
    }
}
