//! Raster-Time Profiling
//!
//! Converts the CPU cycles spent in one play call into PAL raster lines,
//! with and without the cycles the VIC-II steals on badlines.

use serde::Serialize;

use crate::constants::{BADLINE_STOLEN_CYCLES, CYCLES_PER_BADLINE, CYCLES_PER_RASTERLINE};

/// Raster usage of one play call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RasterProfile {
    /// CPU cycles consumed by the call
    pub cycles: u64,
    /// Raster lines covered, `ceil(cycles / 63)`
    pub rasterlines: u64,
    /// Badlines crossed, `ceil(cycles / 504)`
    pub badlines: u64,
    /// Raster lines once badline stalls are added, `ceil((badlines * 40 + cycles) / 63)`
    pub rasterlines_with_badlines: u64,
}

impl RasterProfile {
    /// Profile a call that consumed `cycles` CPU cycles
    pub fn from_cycles(cycles: u64) -> Self {
        let badlines = cycles.div_ceil(CYCLES_PER_BADLINE);
        RasterProfile {
            cycles,
            rasterlines: cycles.div_ceil(CYCLES_PER_RASTERLINE),
            badlines,
            rasterlines_with_badlines: (badlines * BADLINE_STOLEN_CYCLES + cycles)
                .div_ceil(CYCLES_PER_RASTERLINE),
        }
    }
}
