use serde::Serialize;

use crate::extent::Extent;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct V2 {
    pub x: f64,
    pub y: f64,
}

impl V2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dist(self, other: V2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    #[inline]
    pub fn lerp(self, other: V2, t: f64) -> V2 {
        V2::new(self.x + t * (other.x - self.x), self.y + t * (other.y - self.y))
    }
}

impl From<(f64, f64)> for V2 {
    fn from((x, y): (f64, f64)) -> Self {
        V2::new(x, y)
    }
}

/// Anything that can be walked by arc length.
pub trait LineGeom {
    fn vertex_count(&self) -> usize;

    /// Total arc length. Zero for fewer than two vertices.
    fn length(&self) -> f64;

    /// Position at `distance` along the line, clamped to `[0, length]`.
    /// `None` only when there are no vertices.
    fn interpolate(&self, distance: f64) -> Option<V2>;

    /// `None` only when there are no vertices.
    fn extent(&self) -> Option<Extent>;
}

/// An open polyline in a planar coordinate system.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    verts: Vec<V2>,
    // Cumulative arc length at each vertex, `cum[0] == 0`.
    cum: Vec<f64>,
}

impl Polyline {
    pub fn new(verts: Vec<V2>) -> Self {
        let mut cum = Vec::with_capacity(verts.len());
        let mut acc = 0.0;
        for (i, v) in verts.iter().enumerate() {
            if i > 0 {
                acc += verts[i - 1].dist(*v);
            }
            cum.push(acc);
        }
        Self { verts, cum }
    }

    /// Builds from `[x0, y0, x1, y1, ...]`. A trailing odd coordinate is dropped.
    pub fn from_flat(flat: &[f64]) -> Self {
        Self::new(flat.chunks_exact(2).map(|xy| V2::new(xy[0], xy[1])).collect())
    }

    pub fn verts(&self) -> &[V2] {
        &self.verts
    }

    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }
}

impl LineGeom for Polyline {
    fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    fn length(&self) -> f64 {
        self.cum.last().copied().unwrap_or(0.0)
    }

    fn interpolate(&self, distance: f64) -> Option<V2> {
        let first = *self.verts.first()?;
        let last = *self.verts.last()?;
        let length = self.length();

        if distance.is_nan() || distance <= 0.0 {
            return Some(first);
        }
        if distance >= length {
            return Some(last);
        }

        // First vertex whose cumulative length reaches `distance`; it is >= 1
        // because cum[0] == 0 < distance.
        let i = self.cum.partition_point(|&c| c < distance);
        let (c0, c1) = (self.cum[i - 1], self.cum[i]);
        let seg = c1 - c0;
        if seg <= 0.0 {
            return Some(self.verts[i]);
        }
        Some(self.verts[i - 1].lerp(self.verts[i], (distance - c0) / seg))
    }

    fn extent(&self) -> Option<Extent> {
        Extent::from_points(self.verts.iter().map(|v| (v.x, v.y)))
    }
}
