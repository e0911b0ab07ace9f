//! Output decoders
//!
//! A decoder receives every displayed frame's [`Snapshot`] and renders it.
//! [`FrameDecoder`] is the extension point; [`ActiveDecoder`] is the closed
//! set of built-in renderers selected once at startup.

mod dump;
mod json;
mod notes;
mod registers;

pub use dump::{DumpDecoder, DEFAULT_DUMP_FILE};
pub use json::JsonDecoder;
pub use notes::NoteDecoder;
pub use registers::RegisterDecoder;

use std::io::Write;

use crate::notes::FrequencyTable;
use crate::settings::Settings;
use crate::snapshot::Snapshot;
use crate::Result;

/// Light separator between notes.
pub(crate) const NOTE_SEPARATOR: &str = "+-------+---------------------------+---------------------------+---------------------------+---------------+";

/// Heavy separator between patterns.
pub(crate) const PATTERN_SEPARATOR: &str = "+=======+===========================+===========================+===========================+===============+";

/// Renders frames produced by the frame driver.
pub trait FrameDecoder {
    /// Called once before the first frame.
    fn pre_steps(&mut self) -> Result<()>;

    /// Called for every frame at or after the first displayed frame.
    ///
    /// `cycles` is the CPU time the play call for this frame consumed.
    fn process_frame(&mut self, frame: u32, cycles: u64, snapshot: &Snapshot) -> Result<()>;

    /// Called once after the last frame.
    fn post_steps(&mut self) -> Result<()>;
}

/// Built-in decoder selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderKind {
    /// Note-tracking table (mode 0)
    #[default]
    Notes,
    /// Raw register diff table (mode 1)
    Registers,
    /// One JSON object per frame (mode 2)
    Json,
    /// Binary register image per frame (mode 4)
    Dump,
}

impl DecoderKind {
    /// Map a command line mode number; unknown modes fall back to notes.
    pub fn from_mode(mode: u8) -> Self {
        match mode {
            1 => DecoderKind::Registers,
            2 => DecoderKind::Json,
            4 => DecoderKind::Dump,
            0 => DecoderKind::Notes,
            other => {
                log::warn!("unknown output mode {other}, using note tracking");
                DecoderKind::Notes
            }
        }
    }

    /// Whether the decoder writes binary data rather than text.
    pub fn is_binary(&self) -> bool {
        matches!(self, DecoderKind::Dump)
    }
}

/// One of the built-in decoders, chosen once per run.
pub enum ActiveDecoder<W: Write> {
    /// Note tracking
    Notes(NoteDecoder<W>),
    /// Raw registers
    Registers(RegisterDecoder<W>),
    /// JSON lines
    Json(JsonDecoder<W>),
    /// Binary dump
    Dump(DumpDecoder<W>),
}

impl<W: Write> ActiveDecoder<W> {
    /// Build the decoder for `kind` writing to `out`.
    pub fn new(kind: DecoderKind, settings: Settings, table: FrequencyTable, out: W) -> Self {
        match kind {
            DecoderKind::Notes => ActiveDecoder::Notes(NoteDecoder::new(out, settings, table)),
            DecoderKind::Registers => ActiveDecoder::Registers(RegisterDecoder::new(out, settings)),
            DecoderKind::Json => ActiveDecoder::Json(JsonDecoder::new(out, settings)),
            DecoderKind::Dump => ActiveDecoder::Dump(DumpDecoder::new(out)),
        }
    }

    /// Kind of the wrapped decoder.
    pub fn kind(&self) -> DecoderKind {
        match self {
            ActiveDecoder::Notes(_) => DecoderKind::Notes,
            ActiveDecoder::Registers(_) => DecoderKind::Registers,
            ActiveDecoder::Json(_) => DecoderKind::Json,
            ActiveDecoder::Dump(_) => DecoderKind::Dump,
        }
    }

    fn inner(&mut self) -> &mut dyn FrameDecoder {
        match self {
            ActiveDecoder::Notes(decoder) => decoder,
            ActiveDecoder::Registers(decoder) => decoder,
            ActiveDecoder::Json(decoder) => decoder,
            ActiveDecoder::Dump(decoder) => decoder,
        }
    }
}

impl<W: Write> FrameDecoder for ActiveDecoder<W> {
    fn pre_steps(&mut self) -> Result<()> {
        self.inner().pre_steps()
    }

    fn process_frame(&mut self, frame: u32, cycles: u64, snapshot: &Snapshot) -> Result<()> {
        self.inner().process_frame(frame, cycles, snapshot)
    }

    fn post_steps(&mut self) -> Result<()> {
        self.inner().post_steps()
    }
}
