//! Data structures describing parsed PSID/RSID files.

/// Container flavour named by the first four bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsidKind {
    /// `PSID`: player runs in a plain memory image.
    Psid,
    /// `RSID`: tune expects a real C64 environment.
    Rsid,
}

impl PsidKind {
    /// Four-character magic.
    pub fn magic(&self) -> &'static str {
        match self {
            PsidKind::Psid => "PSID",
            PsidKind::Rsid => "RSID",
        }
    }
}

/// PSID header metadata. All words are stored big-endian in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsidHeader {
    /// PSID or RSID.
    pub kind: PsidKind,
    /// Header version (1-4).
    pub version: u16,
    /// File offset of the C64 payload.
    pub data_offset: u16,
    /// Load address as stored in the header (0 means "read from payload").
    pub load_address: u16,
    /// Init routine entry point.
    pub init_address: u16,
    /// Play routine entry point (0 means the tune installs its own IRQ).
    pub play_address: u16,
    /// Number of subtunes.
    pub songs: u16,
    /// One-based default subtune.
    pub start_song: u16,
    /// Per-subtune speed bits (0 = vertical blank, 1 = CIA timer).
    pub speed: u32,
    /// Tune title.
    pub name: String,
    /// Composer.
    pub author: String,
    /// Release/copyright string.
    pub released: String,
    /// Header flags (version 2 and later).
    pub flags: Option<u16>,
}

/// Parsed SID file with its C64 payload.
#[derive(Debug, Clone)]
pub struct PsidFile {
    /// Header metadata.
    pub header: PsidHeader,
    /// Effective load address of `payload`.
    pub load_address: u16,
    /// Bytes copied into C64 memory, without the optional address prefix.
    pub payload: Vec<u8>,
}
