//! SID register tracer for C64 music routines
//!
//! Drives a 6502 music routine frame by frame (init once, play every 1/50 s),
//! reads the MOS 6581 SID registers after every play call and turns the raw
//! register state into a compact, diff-style text trace: note names inferred
//! from raw frequencies, retrigger vs. slide detection, waveform/ADSR/pulse
//! changes and filter state.
//!
//! # Building blocks
//! - [`Snapshot`] - per-frame copy of the SID registers (`$D400-$D418`)
//! - [`FrequencyTable`] - 96-entry note table with nearest-note search
//! - [`FrameDecoder`] / [`ActiveDecoder`] - output renderers (note tracking,
//!   raw registers, JSON lines, binary dump)
//! - [`FrameDriver`] - init/play invocation over any [`Machine`]
//!
//! # Quick start
//! ```no_run
//! use sidtrace::{ActiveDecoder, DecoderKind, EntryPoints, FrameDriver, FrequencyTable, Machine, Settings};
//!
//! fn trace<M: Machine>(machine: M) -> sidtrace::Result<()> {
//!     let settings = Settings::default();
//!     let mut decoder = ActiveDecoder::new(
//!         DecoderKind::Notes,
//!         settings.clone(),
//!         FrequencyTable::pal(),
//!         std::io::stdout(),
//!     );
//!     let mut driver = FrameDriver::new(machine, EntryPoints { init: 0x1000, play: 0x1003 });
//!     driver.run_init(0);
//!     driver.run(&mut decoder, settings.total_frames(), settings.first_frame)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod constants;
pub mod decoder;
pub mod driver;
pub mod history;
pub mod machine;
pub mod notes;
pub mod profiling;
pub mod raster;
pub mod registers;
pub mod settings;
pub mod snapshot;

/// Error types for tracing operations
///
/// Only output and configuration failures surface here. Runaway music
/// routines are not errors: the driver logs them and keeps going.
#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    /// IO error while writing the trace or a dump file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a frame for the JSON decoder
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Result type for tracing operations
pub type Result<T> = std::result::Result<T, TraceError>;

// Public API exports
pub use decoder::{ActiveDecoder, DecoderKind, FrameDecoder};
pub use driver::{CallOutcome, EntryPoints, FrameDriver, RunSummary};
pub use history::History;
pub use machine::{CpuRegisters, Machine};
pub use notes::{FrequencyTable, NoteMatch};
pub use profiling::RasterProfile;
pub use settings::{Settings, TimeFormat};
pub use snapshot::{Channel, Filter, Snapshot};
