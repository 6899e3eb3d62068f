use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A per-cell reduction used while rasterizing a field.
///
/// `State` is kept per target cell; `finish` turns it into the cell value.
/// Cells that never saw a value should finish as NaN unless the reduction
/// has a natural empty value (e.g. a count of 0).
pub trait Reduction {
    type State: Copy + Default;

    fn update(&self, state: &mut Self::State, v: f64);

    fn finish(&self, state: &Self::State) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    #[default]
    Mean,
    Sum,
    Max,
    Min,
    Count,
    First,
    Last,
}

/// Running statistics that cover every built-in `Aggregator`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStats {
    pub n: u32,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub first: f64,
    pub last: f64,
}

impl Default for CellStats {
    fn default() -> Self {
        Self {
            n: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            first: f64::NAN,
            last: f64::NAN,
        }
    }
}

impl Reduction for Aggregator {
    type State = CellStats;

    #[inline]
    fn update(&self, st: &mut CellStats, v: f64) {
        if !v.is_finite() {
            return;
        }
        if st.n == 0 {
            st.first = v;
        }
        st.n += 1;
        st.sum += v;
        st.min = st.min.min(v);
        st.max = st.max.max(v);
        st.last = v;
    }

    #[inline]
    fn finish(&self, st: &CellStats) -> f64 {
        if st.n == 0 {
            return match self {
                Aggregator::Count => 0.0,
                _ => f64::NAN,
            };
        }
        match self {
            Aggregator::Mean => st.sum / st.n as f64,
            Aggregator::Sum => st.sum,
            Aggregator::Max => st.max,
            Aggregator::Min => st.min,
            Aggregator::Count => st.n as f64,
            Aggregator::First => st.first,
            Aggregator::Last => st.last,
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Aggregator::Mean => "mean",
            Aggregator::Sum => "sum",
            Aggregator::Max => "max",
            Aggregator::Min => "min",
            Aggregator::Count => "count",
            Aggregator::First => "first",
            Aggregator::Last => "last",
        })
    }
}

impl FromStr for Aggregator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Aggregator::Mean),
            "sum" => Ok(Aggregator::Sum),
            "max" => Ok(Aggregator::Max),
            "min" => Ok(Aggregator::Min),
            "count" => Ok(Aggregator::Count),
            "first" => Ok(Aggregator::First),
            "last" => Ok(Aggregator::Last),
            other => Err(Error::invalid(format!("unknown aggregator '{other}'"))),
        }
    }
}
