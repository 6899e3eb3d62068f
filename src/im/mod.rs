pub mod core;
pub use core::{Im, Lum16Im, ValueIm};

pub mod roi;
pub use roi::ROI;

// Optional extras
// -----------------------------------------------------------------------------

#[cfg(feature = "im-io")]
pub mod io;
