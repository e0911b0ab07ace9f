//! Raw register decoder: one column per SID register.

use std::fmt::Write as _;
use std::io::Write;

use super::FrameDecoder;
use crate::constants::SID_DATA_REGISTERS;
use crate::settings::Settings;
use crate::snapshot::Snapshot;
use crate::Result;

const HEADER: &str = "| Frame | 00 01 02 03 04 05 06 | 07 08 09 10 11 12 13 | 14 15 16 17 18 19 20 | 21 22 23 24 | dt_us |";
const SEPARATOR: &str = "+-------+----+-----------------+----------------------+----------------------+-------------+-------+";

/// Prints changed registers in hex, unchanged ones as `..`, plus the delta time.
pub struct RegisterDecoder<W: Write> {
    out: W,
    settings: Settings,
    previous: [u8; SID_DATA_REGISTERS],
}

impl<W: Write> RegisterDecoder<W> {
    /// Create a decoder writing to `out`.
    pub fn new(out: W, settings: Settings) -> Self {
        Self {
            out,
            settings,
            previous: [0; SID_DATA_REGISTERS],
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameDecoder for RegisterDecoder<W> {
    fn pre_steps(&mut self) -> Result<()> {
        self.previous = [0; SID_DATA_REGISTERS];
        writeln!(self.out, "{HEADER}")?;
        writeln!(self.out, "{SEPARATOR}")?;
        Ok(())
    }

    fn process_frame(&mut self, frame: u32, _cycles: u64, snapshot: &Snapshot) -> Result<()> {
        let time = frame.saturating_sub(self.settings.first_frame);
        let mut line = self.settings.time_format.format_time(time);

        for (index, &value) in snapshot.registers[..SID_DATA_REGISTERS].iter().enumerate() {
            if time == 0 || value != self.previous[index] {
                write!(line, "{value:02X} ").ok();
            } else {
                line.push_str(".. ");
            }
            if matches!(index, 6 | 13 | 20) {
                line.push_str("| ");
            }
            self.previous[index] = value;
        }
        writeln!(line, "|  {:04X} |", snapshot.delta_time()).ok();

        self.out.write_all(line.as_bytes())?;
        Ok(())
    }

    fn post_steps(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
