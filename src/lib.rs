// Library crate root.
//
// This crate is used both as a binary (src/main.rs) and as a library.

pub mod error;
pub mod im;
pub mod extent;
pub mod mat3;
pub mod polyline;
pub mod agg;
pub mod raster;
pub mod mpoly;
pub mod field;
pub mod section;
pub mod projection;
pub mod desc;

#[cfg(test)]
pub mod test_helpers;

pub use agg::{Aggregator, Reduction};
pub use error::{Error, Result};
pub use field::{Field, FieldSource};
pub use polyline::{LineGeom, Polyline};
pub use section::{
    CellBounds, CrossSection, IndicatorPoint, Profile, ProfileSet, Sample, Samples, gen_samples,
    position_indicator, sample_field, sample_paths,
};

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xsection=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
