//! Error handling for PSID loading.

use thiserror::Error;

/// Convenient result alias for PSID parsing and loading.
pub type Result<T> = std::result::Result<T, PsidError>;

/// Errors that may occur while reading a PSID/RSID file.
#[derive(Debug, Error)]
pub enum PsidError {
    /// File does not start with `PSID` or `RSID`.
    #[error("SID file must start with PSID or RSID, found '{magic}'")]
    InvalidMagic {
        /// The four bytes found instead.
        magic: String,
    },
    /// Buffer too small to contain the requested structure.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// Header data offset points outside the file.
    #[error("data offset 0x{offset:04x} points outside the file")]
    DataOffsetOutOfRange {
        /// Offset stored in the header.
        offset: u16,
    },
    /// Payload would continue past the end of C64 memory.
    #[error("SID data continues past end of C64 memory (${load_address:04X} + {length} bytes)")]
    PayloadTooLarge {
        /// Effective load address.
        load_address: u16,
        /// Payload length in bytes.
        length: usize,
    },
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
