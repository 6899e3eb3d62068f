//! Cross sections: sample a field along paths at a fixed arc-length spacing.
//!
//! Each path is walked with [`gen_samples`]; the field is rasterized over the
//! path's bounding extent and every sample point takes the value of its
//! nearest raster cell. The result for one path is a [`Profile`] of
//! distance/value pairs; several paths produce a [`ProfileSet`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::agg::Reduction;
use crate::error::{Error, Result};
use crate::extent::Extent;
use crate::field::FieldSource;
use crate::polyline::LineGeom;
use crate::raster::Raster;

/// Bounds on the working raster size, in cells per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CellBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for CellBounds {
    fn default() -> Self {
        Self { min: 10, max: 500 }
    }
}

impl CellBounds {
    pub fn validate(&self) -> Result<()> {
        if self.min == 0 || self.min > self.max || self.max > MAX_CELLS_PER_AXIS {
            return Err(Error::invalid(format!(
                "cell bounds must satisfy 1 <= min <= max <= {MAX_CELLS_PER_AXIS}, got {}..{}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// `clamp(span / resolution, min, max)`, truncated to whole cells.
    pub fn cells(&self, span: f64, resolution: f64) -> usize {
        let raw = span / resolution;
        let raw = if raw.is_nan() { 0.0 } else { raw };
        raw.min(self.max as f64).max(self.min as f64) as usize
    }
}

/// Upper limit on the number of samples generated along one path.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Upper limit on `CellBounds::max`, in cells per axis.
pub const MAX_CELLS_PER_AXIS: usize = 10_000;

/// Index-aligned sample positions along a path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Samples {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub distances: Vec<f64>,
}

impl Samples {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub distance: f64,
    /// Center of the raster cell the value was taken from.
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Distance/value curve along one path, ordered by non-decreasing distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub vdim: String,
    pub samples: Vec<Sample>,
}

impl Profile {
    pub fn empty(vdim: &str) -> Self {
        Self {
            vdim: vdim.to_string(),
            samples: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The sample whose distance is closest to `distance`; ties go to the
    /// earlier sample.
    pub fn nearest(&self, distance: f64) -> Option<&Sample> {
        if self.samples.is_empty() || distance.is_nan() {
            return None;
        }
        let i = self.samples.partition_point(|s| s.distance < distance);
        if i == 0 {
            return self.samples.first();
        }
        if i == self.samples.len() {
            return self.samples.last();
        }
        let (before, after) = (&self.samples[i - 1], &self.samples[i]);
        if after.distance - distance < distance - before.distance {
            Some(after)
        } else {
            Some(before)
        }
    }
}

/// Per-path results keyed by path index in input order.
pub type ProfileSet = BTreeMap<usize, Result<Profile>>;

/// A marker for the position along one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorPoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// A profile together with the working raster it was read from.
#[derive(Debug, Clone)]
pub struct Section {
    pub profile: Profile,
    /// `None` when the path was too short to bound a raster.
    pub raster: Option<Raster>,
}

/// Sampler configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSection {
    resolution: f64,
    bounds: CellBounds,
}

fn check_resolution(resolution: f64) -> Result<()> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(Error::invalid(format!("resolution must be positive, got {resolution}")));
    }
    Ok(())
}

impl CrossSection {
    pub fn new(resolution: f64) -> Result<Self> {
        check_resolution(resolution)?;
        Ok(Self {
            resolution,
            bounds: CellBounds::default(),
        })
    }

    pub fn with_bounds(mut self, bounds: CellBounds) -> Result<Self> {
        bounds.validate()?;
        self.bounds = bounds;
        Ok(self)
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn bounds(&self) -> CellBounds {
        self.bounds
    }

    /// Working raster size for `extent`.
    pub fn raster_dims(&self, extent: &Extent) -> (usize, usize) {
        (
            self.bounds.cells(extent.span_x(), self.resolution),
            self.bounds.cells(extent.span_y(), self.resolution),
        )
    }

    /// `floor(length / resolution) + 1` evenly spaced points from the start
    /// to the end of `path`, both inclusive. A path shorter than one
    /// resolution step yields only its start point.
    pub fn gen_samples<G: LineGeom + ?Sized>(&self, path: &G) -> Result<Samples> {
        if path.vertex_count() == 0 {
            return Err(Error::invalid("cannot interpolate a path with no vertices"));
        }
        let length = path.length();
        let steps = (length / self.resolution).floor();
        if !steps.is_finite() || steps >= MAX_SAMPLES as f64 {
            return Err(Error::invalid(format!(
                "path of length {length} at resolution {} exceeds {MAX_SAMPLES} samples",
                self.resolution
            )));
        }
        let n = steps as usize;

        let mut out = Samples {
            xs: Vec::with_capacity(n + 1),
            ys: Vec::with_capacity(n + 1),
            distances: Vec::with_capacity(n + 1),
        };
        for i in 0..=n {
            // Linear spacing, with the end pinned to `length` exactly.
            let d = if i == 0 {
                0.0
            } else if i == n {
                length
            } else {
                length * i as f64 / n as f64
            };
            let p = path
                .interpolate(d)
                .ok_or_else(|| Error::invalid("cannot interpolate a path with no vertices"))?;
            out.xs.push(p.x);
            out.ys.push(p.y);
            out.distances.push(d);
        }
        Ok(out)
    }

    /// Samples `field` along `path`, keeping the working raster.
    pub fn section<F, G, R>(&self, field: &F, path: &G, reduction: &R) -> Result<Section>
    where
        F: FieldSource + ?Sized,
        G: LineGeom + ?Sized,
        R: Reduction,
    {
        if path.vertex_count() == 0 {
            return Err(Error::invalid("cannot sample along a path with no vertices"));
        }
        let vdim = field
            .first_value_dimension()
            .ok_or_else(|| Error::MissingData("field has no value dimension".to_string()))?;

        // A point or a single segment can't usefully bound a raster region.
        if path.vertex_count() < 3 {
            debug!(vertices = path.vertex_count(), "degenerate path, empty profile");
            return Ok(Section {
                profile: Profile::empty(vdim),
                raster: None,
            });
        }

        let extent = path
            .extent()
            .ok_or_else(|| Error::invalid("path has no extent"))?;
        let samples = self.gen_samples(path)?;
        let (w, h) = self.raster_dims(&extent);
        let raster = field.rasterize(&extent, w, h, reduction)?;
        debug!(w, h, x_range = ?extent.x_range(), y_range = ?extent.y_range(), "section raster");

        let profile = Profile {
            vdim: vdim.to_string(),
            samples: samples
                .xs
                .iter()
                .zip(&samples.ys)
                .zip(&samples.distances)
                .map(|((&x, &y), &distance)| {
                    let cell = raster.sel_nearest(x, y);
                    Sample {
                        distance,
                        x: cell.x,
                        y: cell.y,
                        value: cell.value,
                    }
                })
                .collect(),
        };
        debug!(samples = profile.len(), "section sampled");

        Ok(Section {
            profile,
            raster: Some(raster),
        })
    }

    pub fn sample_field<F, G, R>(&self, field: &F, path: &G, reduction: &R) -> Result<Profile>
    where
        F: FieldSource + ?Sized,
        G: LineGeom + ?Sized,
        R: Reduction,
    {
        self.section(field, path, reduction).map(|s| s.profile)
    }

    /// One profile per path; a failing path does not stop the others.
    pub fn sample_paths<'a, F, G, R, I>(&self, field: &F, paths: I, reduction: &R) -> ProfileSet
    where
        F: FieldSource + ?Sized,
        G: LineGeom + ?Sized + 'a,
        R: Reduction,
        I: IntoIterator<Item = &'a G>,
    {
        paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| {
                let res = self.sample_field(field, path, reduction);
                if let Err(e) = &res {
                    warn!(path = i, "cross section failed: {e}");
                }
                (i, res)
            })
            .collect()
    }
}

pub fn gen_samples<G: LineGeom + ?Sized>(path: &G, resolution: f64) -> Result<Samples> {
    CrossSection::new(resolution)?.gen_samples(path)
}

pub fn sample_field<F, G, R>(field: &F, path: &G, resolution: f64, reduction: &R) -> Result<Profile>
where
    F: FieldSource + ?Sized,
    G: LineGeom + ?Sized,
    R: Reduction,
{
    CrossSection::new(resolution)?.sample_field(field, path, reduction)
}

pub fn sample_paths<'a, F, G, R, I>(field: &F, paths: I, resolution: f64, reduction: &R) -> ProfileSet
where
    F: FieldSource + ?Sized,
    G: LineGeom + ?Sized + 'a,
    R: Reduction,
    I: IntoIterator<Item = &'a G>,
{
    match CrossSection::new(resolution) {
        Ok(xs) => xs.sample_paths(field, paths, reduction),
        Err(e) => {
            warn!("cross sections skipped: {e}");
            let msg = format!("resolution must be positive, got {resolution}");
            paths
                .into_iter()
                .enumerate()
                .map(|(i, _)| (i, Err(Error::invalid(msg.clone()))))
                .collect()
        }
    }
}

/// Position markers at `distance` along each profile that has data, in path
/// order. Failed and empty profiles are skipped.
pub fn position_indicator(profiles: &ProfileSet, distance: f64) -> Vec<IndicatorPoint> {
    profiles
        .iter()
        .filter_map(|(&index, res)| {
            let s = res.as_ref().ok()?.nearest(distance)?;
            Some(IndicatorPoint { index, x: s.x, y: s.y })
        })
        .collect()
}
