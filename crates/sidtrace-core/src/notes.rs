//! Note Frequency Table
//!
//! 96 SID frequency values (C-0 to B-7) for a PAL machine, plus the
//! nearest-note search used to turn raw oscillator frequencies into notes.

use crate::{Result, TraceError};

/// Number of entries in a frequency table (8 octaves).
pub const NOTE_COUNT: usize = 96;

/// Table index of middle C (`C-4`).
pub const MIDDLE_C: usize = 48;

/// Display names of the 96 notes, `C-0` to `B-7`.
#[rustfmt::skip]
pub const NOTE_NAMES: [&str; NOTE_COUNT] = [
    "C-0", "C#0", "D-0", "D#0", "E-0", "F-0", "F#0", "G-0", "G#0", "A-0", "A#0", "B-0",
    "C-1", "C#1", "D-1", "D#1", "E-1", "F-1", "F#1", "G-1", "G#1", "A-1", "A#1", "B-1",
    "C-2", "C#2", "D-2", "D#2", "E-2", "F-2", "F#2", "G-2", "G#2", "A-2", "A#2", "B-2",
    "C-3", "C#3", "D-3", "D#3", "E-3", "F-3", "F#3", "G-3", "G#3", "A-3", "A#3", "B-3",
    "C-4", "C#4", "D-4", "D#4", "E-4", "F-4", "F#4", "G-4", "G#4", "A-4", "A#4", "B-4",
    "C-5", "C#5", "D-5", "D#5", "E-5", "F-5", "F#5", "G-5", "G#5", "A-5", "A#5", "B-5",
    "C-6", "C#6", "D-6", "D#6", "E-6", "F-6", "F#6", "G-6", "G#6", "A-6", "A#6", "B-6",
    "C-7", "C#7", "D-7", "D#7", "E-7", "F-7", "F#7", "G-7", "G#7", "A-7", "A#7", "B-7",
];

/// Filter passband labels indexed by `($D418 >> 4) & 7`.
pub const FILTER_NAMES: [&str; 8] = ["Off", "Low", "Bnd", "L+B", "Hi ", "L+H", "B+H", "LBH"];

#[rustfmt::skip]
const PAL_FREQ_LO: [u8; NOTE_COUNT] = [
    0x17, 0x27, 0x39, 0x4b, 0x5f, 0x74, 0x8a, 0xa1, 0xba, 0xd4, 0xf0, 0x0e,
    0x2d, 0x4e, 0x71, 0x96, 0xbe, 0xe8, 0x14, 0x43, 0x74, 0xa9, 0xe1, 0x1c,
    0x5a, 0x9c, 0xe2, 0x2d, 0x7c, 0xcf, 0x28, 0x85, 0xe8, 0x52, 0xc1, 0x37,
    0xb4, 0x39, 0xc5, 0x5a, 0xf7, 0x9e, 0x4f, 0x0a, 0xd1, 0xa3, 0x82, 0x6e,
    0x68, 0x71, 0x8a, 0xb3, 0xee, 0x3c, 0x9e, 0x15, 0xa2, 0x46, 0x04, 0xdc,
    0xd0, 0xe2, 0x14, 0x67, 0xdd, 0x79, 0x3c, 0x29, 0x44, 0x8d, 0x08, 0xb8,
    0xa1, 0xc5, 0x28, 0xcd, 0xba, 0xf1, 0x78, 0x53, 0x87, 0x1a, 0x10, 0x71,
    0x42, 0x89, 0x4f, 0x9b, 0x74, 0xe2, 0xf0, 0xa6, 0x0e, 0x33, 0x20, 0xff,
];

#[rustfmt::skip]
const PAL_FREQ_HI: [u8; NOTE_COUNT] = [
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x02,
    0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x03, 0x03, 0x03, 0x03, 0x03, 0x04,
    0x04, 0x04, 0x04, 0x05, 0x05, 0x05, 0x06, 0x06, 0x06, 0x07, 0x07, 0x08,
    0x08, 0x09, 0x09, 0x0a, 0x0a, 0x0b, 0x0c, 0x0d, 0x0d, 0x0e, 0x0f, 0x10,
    0x11, 0x12, 0x13, 0x14, 0x15, 0x17, 0x18, 0x1a, 0x1b, 0x1d, 0x1f, 0x20,
    0x22, 0x24, 0x27, 0x29, 0x2b, 0x2e, 0x31, 0x34, 0x37, 0x3a, 0x3e, 0x41,
    0x45, 0x49, 0x4e, 0x52, 0x57, 0x5c, 0x62, 0x68, 0x6e, 0x75, 0x7c, 0x83,
    0x8b, 0x93, 0x9c, 0xa5, 0xaf, 0xb9, 0xc4, 0xd0, 0xdd, 0xea, 0xf8, 0xff,
];

/// Display name of a note index.
pub fn note_name(note: u8) -> &'static str {
    NOTE_NAMES.get(note as usize).copied().unwrap_or("???")
}

/// Result of a nearest-note search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteMatch {
    /// Index of the winning table entry
    pub note: u8,
    /// Absolute distance to that entry, after the stickiness division
    pub distance: u32,
}

/// Frequency table used for note inference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: [u16; NOTE_COUNT],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::pal()
    }
}

impl FrequencyTable {
    /// The built-in PAL table.
    pub fn pal() -> Self {
        let mut entries = [0u16; NOTE_COUNT];
        for (index, entry) in entries.iter_mut().enumerate() {
            *entry = u16::from_le_bytes([PAL_FREQ_LO[index], PAL_FREQ_HI[index]]);
        }
        Self { entries }
    }

    /// Equal-tempered table anchored at `base_freq` for note `base_note`.
    ///
    /// Bit 7 of `base_note` is ignored, so a displayed code like `$B0` maps to
    /// index `$30` (C-4). Entries saturate at `$FFFF`.
    pub fn calibrated(base_freq: u16, base_note: u8) -> Result<Self> {
        let base = base_note & 0x7F;
        if base as usize >= NOTE_COUNT {
            return Err(TraceError::ConfigError(format!(
                "calibration note ${base_note:02X} is outside the table"
            )));
        }
        if base_freq == 0 {
            return Err(TraceError::ConfigError(
                "calibration frequency must be non-zero".to_string(),
            ));
        }

        let mut entries = [0u16; NOTE_COUNT];
        for (index, entry) in entries.iter_mut().enumerate() {
            let semitones = index as f64 - f64::from(base);
            let value = f64::from(base_freq) * (semitones / 12.0).exp2();
            *entry = value.min(f64::from(u16::MAX)) as u16;
        }
        log::debug!("calibrated frequency table: C-4 = ${:04X}", entries[MIDDLE_C]);
        Ok(Self { entries })
    }

    /// Frequency of `note`.
    pub fn frequency(&self, note: usize) -> u16 {
        self.entries[note]
    }

    /// All entries in note order.
    pub fn entries(&self) -> &[u16; NOTE_COUNT] {
        &self.entries
    }

    /// Find the entry closest to `frequency`.
    ///
    /// The candidate equal to `previous` has its distance divided by
    /// `stickiness` before comparison. Ties keep the lower index.
    pub fn nearest(&self, frequency: u16, previous: Option<u8>, stickiness: u32) -> NoteMatch {
        let stickiness = stickiness.max(1);
        let mut best = NoteMatch {
            note: 0,
            distance: u32::MAX,
        };
        for (index, &entry) in self.entries.iter().enumerate() {
            let mut distance = u32::from(frequency.abs_diff(entry));
            if previous == Some(index as u8) {
                distance /= stickiness;
            }
            if distance < best.distance {
                best = NoteMatch {
                    note: index as u8,
                    distance,
                };
            }
        }
        best
    }
}
