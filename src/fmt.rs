//! Logging front-end shared by the library and the firmware.
//!
//! With the `defmt` feature the macros come from `defmt` (RTT on target);
//! otherwise they fall through to the `log` facade, which is silent in host
//! tests unless a logger is installed.

#[allow(unused_imports)]
#[cfg(not(feature = "defmt"))]
pub use log::{debug, error, info, trace, warn};

#[allow(unused_imports)]
#[cfg(feature = "defmt")]
pub use defmt::{debug, error, info, trace, warn};
