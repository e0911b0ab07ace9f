//! Note-tracking decoder.

use std::fmt::Write as _;
use std::io::Write;

use super::{FrameDecoder, NOTE_SEPARATOR, PATTERN_SEPARATOR};
use crate::constants::VOICE_COUNT;
use crate::history::History;
use crate::notes::{note_name, FrequencyTable, MIDDLE_C};
use crate::profiling::RasterProfile;
use crate::settings::Settings;
use crate::snapshot::Snapshot;
use crate::Result;

const HEADER: &str = "| Frame | Freq Note/Abs WF ADSR Pul | Freq Note/Abs WF ADSR Pul | Freq Note/Abs WF ADSR Pul | FCut RC Typ V |";
const PROFILE_HEADER: &str = " Cycl RL BL RB |";
const PROFILE_RULE: &str = "---------------+";
const PROFILE_HEAVY_RULE: &str = "===============+";

/// Renders the diff-style note table.
///
/// Every voice cell shows the frequency and inferred note only when they
/// changed since the last displayed line; unchanged fields become dots.
pub struct NoteDecoder<W: Write> {
    out: W,
    settings: Settings,
    table: FrequencyTable,
    history: History,
    counter: u32,
    rows: u32,
}

impl<W: Write> NoteDecoder<W> {
    /// Create a decoder writing to `out`.
    pub fn new(out: W, settings: Settings, table: FrequencyTable) -> Self {
        Self {
            out,
            settings,
            table,
            history: History::new(),
            counter: 0,
            rows: 0,
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Snapshot history as of the last processed frame.
    pub fn history(&self) -> &History {
        &self.history
    }

    fn write_rule(&mut self, heavy: bool) -> Result<()> {
        let (rule, profile_rule) = if heavy {
            (PATTERN_SEPARATOR, PROFILE_HEAVY_RULE)
        } else {
            (NOTE_SEPARATOR, PROFILE_RULE)
        };
        if self.settings.profiling {
            writeln!(self.out, "{rule}{profile_rule}")?;
        } else {
            writeln!(self.out, "{rule}")?;
        }
        Ok(())
    }

    fn render_frame(&mut self, current: &mut Snapshot, time: u32, first: bool, cycles: u64) -> String {
        let mut line = self.settings.time_format.format_time(time);
        let stickiness = self.settings.stickiness_factor();

        for index in 0..VOICE_COUNT {
            let channel = current.channels[index];
            let pre_previous = self.history.pre_previous.channels[index];

            // Gate edge since the last simulated frame restarts note tracking.
            if channel.is_active()
                && channel.waveform_flags().is_gated()
                && (!pre_previous.waveform_flags().is_gated() || !pre_previous.is_active())
            {
                self.history.forget_displayed_note(index);
            }
            let previous = self.history.previous.channels[index];
            current.channels[index].note = pre_previous.note;

            let mut new_note = false;
            if first || previous.note.is_none() || channel.frequency != previous.frequency {
                write!(line, "{:04X} ", channel.frequency).ok();
                if channel.is_active() {
                    let found = self.table.nearest(channel.frequency, previous.note, stickiness);
                    current.channels[index].note = Some(found.note);
                    let code = found.note | 0x80;
                    let name = note_name(found.note);
                    if previous.note != Some(found.note) {
                        if previous.note.is_none() {
                            new_note = self.settings.low_res;
                            write!(line, " {name} {code:02X}  ").ok();
                        } else {
                            write!(line, "({name} {code:02X}) ").ok();
                        }
                    } else {
                        let delta = i32::from(channel.frequency) - i32::from(pre_previous.frequency);
                        if delta > 0 {
                            write!(line, "(+ {delta:04X}) ").ok();
                        } else if delta < 0 {
                            write!(line, "(- {:04X}) ", -delta).ok();
                        } else {
                            line.push_str(" ... ..  ");
                        }
                    }
                } else {
                    line.push_str(" ... ..  ");
                }
            } else {
                line.push_str("....  ... ..  ");
            }

            let show = |changed: bool| first || new_note || changed;
            if show(channel.waveform != previous.waveform) {
                write!(line, "{:02X} ", channel.waveform).ok();
            } else {
                line.push_str(".. ");
            }
            if show(channel.adsr != previous.adsr) {
                write!(line, "{:04X} ", channel.adsr).ok();
            } else {
                line.push_str(".... ");
            }
            if show(channel.pulse_width != previous.pulse_width) {
                write!(line, "{:03X} ", channel.pulse_width).ok();
            } else {
                line.push_str("... ");
            }
            line.push_str("| ");
        }

        let filter = current.filter;
        let shown = self.history.previous.filter;
        if first || filter.cutoff != shown.cutoff {
            write!(line, "{:04X} ", filter.cutoff).ok();
        } else {
            line.push_str(".... ");
        }
        if first || filter.control != shown.control {
            write!(line, "{:02X} ", filter.control).ok();
        } else {
            line.push_str(".. ");
        }
        if first || filter.passband() != shown.passband() {
            write!(line, "{} ", filter.passband_name()).ok();
        } else {
            line.push_str("... ");
        }
        if first || filter.volume() != shown.volume() {
            write!(line, "{:X} ", filter.volume()).ok();
        } else {
            line.push_str(". ");
        }

        if self.settings.profiling {
            let profile = RasterProfile::from_cycles(cycles);
            write!(
                line,
                "| {:4} {:02X} {:02X} {:02X} ",
                profile.cycles,
                profile.rasterlines,
                profile.badlines,
                profile.rasterlines_with_badlines
            )
            .ok();
        }
        line.push_str("|\n");
        line
    }
}

impl<W: Write> FrameDecoder for NoteDecoder<W> {
    fn pre_steps(&mut self) -> Result<()> {
        self.history.reset();
        self.counter = 0;
        self.rows = 0;
        writeln!(
            self.out,
            "Middle C frequency is ${:04X}\n",
            self.table.frequency(MIDDLE_C)
        )?;
        if self.settings.profiling {
            writeln!(self.out, "{HEADER}{PROFILE_HEADER}")?;
        } else {
            writeln!(self.out, "{HEADER}")?;
        }
        self.write_rule(false)
    }

    fn process_frame(&mut self, frame: u32, cycles: u64, snapshot: &Snapshot) -> Result<()> {
        let first_frame = self.settings.first_frame;
        let time = frame.saturating_sub(first_frame);
        let mut current = *snapshot;
        let line = self.render_frame(&mut current, time, frame == first_frame, cycles);

        if self.settings.displays(time) {
            self.out.write_all(line.as_bytes())?;
            self.history.commit_displayed(&current);
        }
        self.history.commit_simulated(&current);

        let spacing = self.settings.spacing;
        if spacing != 0 {
            self.counter += 1;
            if self.counter >= spacing {
                self.counter = 0;
                let pattern_spacing = self.settings.pattern_spacing;
                if pattern_spacing != 0 {
                    self.rows += 1;
                    if self.rows >= pattern_spacing {
                        self.rows = 0;
                        return self.write_rule(true);
                    }
                }
                if self.settings.low_res {
                    self.write_rule(false)?;
                }
            }
        }
        Ok(())
    }

    fn post_steps(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
