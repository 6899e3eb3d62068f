use crate::extent::Extent;
use crate::field::{Channels, GridField, MeshField};
use crate::polyline::{Polyline, V2};

/// `w` x `h` grid spanning `[0, span_x]` in x with square cells; channel `z`
/// holds the column index.
pub fn ramp_grid(w: usize, h: usize, span_x: f64) -> GridField {
    let cell = span_x / w as f64;
    let extent = Extent::new((0.0, span_x), (0.0, cell * h as f64));
    let mut ch = Channels::new();
    ch.push_scalar("z", (0..w * h).map(|i| (i % w) as f64).collect());
    GridField::new(extent, w, h, ch).expect("ramp grid is well formed")
}

/// Grid whose `z` channel equals the cell center x coordinate.
pub fn x_valued_grid(w: usize, h: usize, extent: Extent) -> GridField {
    let cell_w = extent.span_x() / w as f64;
    let mut ch = Channels::new();
    ch.push_scalar(
        "z",
        (0..w * h)
            .map(|i| extent.x0 + ((i % w) as f64 + 0.5) * cell_w)
            .collect(),
    );
    GridField::new(extent, w, h, ch).expect("x grid is well formed")
}

/// The square `[0, 10]^2` split along its diagonal, with `z = x` at the nodes.
pub fn two_tri_mesh() -> MeshField {
    let verts = vec![
        V2::new(0.0, 0.0),
        V2::new(10.0, 0.0),
        V2::new(10.0, 10.0),
        V2::new(0.0, 10.0),
    ];
    let mut ch = Channels::new();
    ch.push_scalar("z", verts.iter().map(|v| v.x).collect());
    MeshField::new(verts, vec![[0, 1, 2], [0, 2, 3]], ch).expect("two-triangle mesh is valid")
}

pub fn square_ring(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<V2> {
    vec![V2::new(x0, y0), V2::new(x1, y0), V2::new(x1, y1), V2::new(x0, y1)]
}

pub fn line(coords: &[(f64, f64)]) -> Polyline {
    Polyline::new(coords.iter().copied().map(V2::from).collect())
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}
