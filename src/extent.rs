use serde::Serialize;

/// Axis-aligned bounds in world units, `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Extent {
    pub fn new(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            x0: x_range.0.min(x_range.1),
            x1: x_range.0.max(x_range.1),
            y0: y_range.0.min(y_range.1),
            y1: y_range.0.max(y_range.1),
        }
    }

    /// Bounds of a set of points, `None` when the iterator is empty.
    pub fn from_points<I: IntoIterator<Item = (f64, f64)>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |acc, (x, y)| match acc {
            None => Some(Self { x0: x, x1: x, y0: y, y1: y }),
            Some(e) => Some(Self {
                x0: e.x0.min(x),
                x1: e.x1.max(x),
                y0: e.y0.min(y),
                y1: e.y1.max(y),
            }),
        })
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x0, self.x1)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.y0, self.y1)
    }

    pub fn span_x(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn span_y(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}
