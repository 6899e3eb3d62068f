use serde::Deserialize;
use tracing::debug;

use crate::agg::Aggregator;
use crate::error::{Error, Result};
use crate::extent::Extent;
use crate::field::{Axes, Channels, Field, GridField, MeshField, PointField, PolyField};
use crate::mpoly::MPoly;
use crate::polyline::{Polyline, V2};
use crate::projection::Projection;
use crate::section::{CellBounds, CrossSection};

// Coordinates arrive flattened as [x0, y0, x1, y1, ...].
type FlatVerts = Vec<f64>;

const DEFAULT_RESOLUTION: f64 = 1000.0;

/// A complete cross-section job: the field, the paths to cut it along, and
/// how to sample.
#[derive(Debug, Clone)]
pub struct SectionDesc {
    pub version: u32,
    pub projection: Projection,
    pub resolution: f64,
    pub aggregator: Aggregator,
    pub cell_bounds: CellBounds,
    pub paths: Vec<Polyline>,
    pub field: Field,
}

#[derive(Debug, Clone, Deserialize)]
struct SectionDescRaw {
    version: u32,
    #[serde(default)]
    projection: Projection,
    #[serde(default = "default_resolution")]
    resolution: f64,
    #[serde(default)]
    aggregator: Aggregator,
    #[serde(default)]
    cell_bounds: CellBounds,
    paths: Vec<FlatVerts>,
    field: FieldDesc,
}

fn default_resolution() -> f64 {
    DEFAULT_RESOLUTION
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum FieldDesc {
    Grid {
        x_range: (f64, f64),
        y_range: (f64, f64),
        w: usize,
        h: usize,
        #[serde(flatten)]
        common: FieldCommon,
    },
    Mesh {
        verts: FlatVerts,
        tris: Vec<[usize; 3]>,
        #[serde(flatten)]
        common: FieldCommon,
    },
    Points {
        points: FlatVerts,
        #[serde(flatten)]
        common: FieldCommon,
    },
    Polys {
        polys: Vec<PolyDesc>,
        #[serde(default)]
        simplify: Option<f64>,
        #[serde(flatten)]
        common: FieldCommon,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct FieldCommon {
    #[serde(default)]
    axes: Axes,
    #[serde(default)]
    channels: Vec<ChannelDesc>,
    /// Channel to sample; defaults to the first one listed.
    #[serde(default)]
    value_dim: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolyDesc {
    pub exterior: FlatVerts,
    #[serde(default)]
    pub holes: Vec<FlatVerts>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChannelDesc {
    Vector { name: String, u: Vec<f64>, v: Vec<f64> },
    Scalar { name: String, values: Vec<f64> },
}

fn flat_to_verts(flat: &[f64], what: &str) -> Result<Vec<V2>> {
    if flat.len() % 2 != 0 {
        return Err(Error::invalid(format!(
            "{what} has an odd number of coordinates ({})",
            flat.len()
        )));
    }
    Ok(flat.chunks_exact(2).map(|xy| V2::new(xy[0], xy[1])).collect())
}

pub fn polydesc_to_mpoly(polydesc: &PolyDesc) -> Result<MPoly> {
    let mut rings = Vec::with_capacity(1 + polydesc.holes.len());
    rings.push(flat_to_verts(&polydesc.exterior, "polygon exterior")?);
    for hole in &polydesc.holes {
        rings.push(flat_to_verts(hole, "polygon hole")?);
    }
    Ok(MPoly::from_rings(&rings))
}

fn build_channels(descs: Vec<ChannelDesc>) -> Result<Channels> {
    let mut channels = Channels::new();
    for desc in descs {
        match desc {
            ChannelDesc::Scalar { name, values } => channels.push_scalar(name, values),
            ChannelDesc::Vector { name, u, v } => channels.push_vector(&name, &u, &v)?,
        }
    }
    Ok(channels)
}

impl FieldCommon {
    fn into_parts(self) -> Result<(Axes, Channels)> {
        let mut channels = build_channels(self.channels)?;
        if let Some(name) = &self.value_dim {
            channels.select(name)?;
        }
        Ok((self.axes, channels))
    }
}

impl TryFrom<FieldDesc> for Field {
    type Error = Error;

    fn try_from(desc: FieldDesc) -> Result<Self> {
        let (mut field, axes) = match desc {
            FieldDesc::Grid {
                x_range,
                y_range,
                w,
                h,
                common,
            } => {
                let (axes, channels) = common.into_parts()?;
                let grid = GridField::new(Extent::new(x_range, y_range), w, h, channels)?;
                (Field::Grid(grid), axes)
            }
            FieldDesc::Mesh { verts, tris, common } => {
                let (axes, channels) = common.into_parts()?;
                let verts = flat_to_verts(&verts, "mesh nodes")?;
                (Field::Mesh(MeshField::new(verts, tris, channels)?), axes)
            }
            FieldDesc::Points { points, common } => {
                let (axes, channels) = common.into_parts()?;
                let points = flat_to_verts(&points, "points")?;
                (Field::Points(PointField::new(points, channels)?), axes)
            }
            FieldDesc::Polys {
                polys,
                simplify,
                common,
            } => {
                let (axes, channels) = common.into_parts()?;
                let polys = polys.iter().map(polydesc_to_mpoly).collect::<Result<Vec<_>>>()?;
                let mut field = PolyField::new(polys, channels)?;
                if let Some(eps) = simplify {
                    field = field.simplified(eps);
                }
                (Field::Polys(field), axes)
            }
        };
        *field.axes_mut() = axes;
        Ok(field)
    }
}

impl TryFrom<SectionDescRaw> for SectionDesc {
    type Error = Error;

    fn try_from(raw: SectionDescRaw) -> Result<Self> {
        raw.projection.validate()?;
        raw.cell_bounds.validate()?;
        let paths = raw
            .paths
            .iter()
            .enumerate()
            .map(|(i, flat)| flat_to_verts(flat, &format!("path {i}")).map(Polyline::new))
            .collect::<Result<Vec<_>>>()?;
        let field = Field::try_from(raw.field)?;
        debug!(kind = field.kind(), paths = paths.len(), "section description loaded");

        Ok(Self {
            version: raw.version,
            projection: raw.projection,
            resolution: raw.resolution,
            aggregator: raw.aggregator,
            cell_bounds: raw.cell_bounds,
            paths,
            field,
        })
    }
}

pub fn parse_section_json(json_text: &str) -> Result<SectionDesc> {
    let raw: SectionDescRaw = serde_json::from_str(json_text)?;
    SectionDesc::try_from(raw)
}

impl SectionDesc {
    /// The sampler configured from this description.
    pub fn cross_section(&self) -> Result<CrossSection> {
        CrossSection::new(self.resolution)?.with_bounds(self.cell_bounds)
    }
}
