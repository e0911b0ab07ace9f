//! PSID/RSID loading and the C64 machine behind `sidtrace`.
//!
//! - Parser for the PSID/RSID container (big-endian header, optional
//!   little-endian load address prefix)
//! - NMOS 6510 interpreter including the undocumented opcodes
//! - [`C64Machine`], a flat 64 KiB memory image implementing
//!   [`sidtrace::Machine`]

#![warn(missing_docs)]

pub mod cpu;
pub mod error;
pub mod format;
mod machine;
mod parser;

pub use crate::cpu::{Bus, Mos6510, Status};
pub use crate::error::{PsidError, Result};
pub use crate::format::{PsidFile, PsidHeader, PsidKind};
pub use crate::machine::C64Machine;
pub use crate::parser::{load_psid, load_psid_file};
