//! Command-line argument parsing for the SID tracer.
//!
//! Flags take numeric values (`-l 0`, `-z 1`) so existing invocations keep
//! working. Calibration values are hexadecimal with an optional `$` or `0x`
//! prefix.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use sidtrace::constants::FRAME_RATE_PAL;
use sidtrace::decoder::DEFAULT_DUMP_FILE;
use sidtrace::{DecoderKind, FrequencyTable, Settings, TimeFormat};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "sidtrace")]
#[command(about = "Trace the SID register writes of a C64 music routine")]
#[command(disable_help_flag = true)]
pub struct CliArgs {
    /// Accumulator value on init (subtune number)
    #[arg(short = 'a', default_value_t = 0)]
    pub subtune: u8,

    /// Frequency recalibration: note frequency in hex, 0 = built-in PAL table
    #[arg(short = 'c', default_value = "0", value_parser = parse_hex_u16)]
    pub base_frequency: u16,

    /// Calibration note in absolute notation (80-DF), default middle C
    #[arg(short = 'd', default_value = "B0", value_parser = parse_hex_u8)]
    pub base_note: u8,

    /// First frame to display
    #[arg(short = 'f', default_value_t = 0)]
    pub first_frame: u32,

    /// Low-resolution mode: only display one row per note
    #[arg(short = 'l', default_value_t = 1)]
    pub low_res: u8,

    /// Output mode: 0 notes, 1 registers, 2 JSON lines, 4 binary dump
    #[arg(short = 'm', default_value_t = 0)]
    pub mode: u8,

    /// Note spacing, 0 = none
    #[arg(short = 'n', default_value_t = 0)]
    pub spacing: u32,

    /// Old-note sticky factor; increase for better vibrato display
    #[arg(short = 'o', default_value_t = 1)]
    pub stickiness: u32,

    /// Pattern spacing, 0 = none
    #[arg(short = 'p', default_value_t = 0)]
    pub pattern_spacing: u32,

    /// Display time as minutes:seconds.frame
    #[arg(short = 's', default_value_t = 0)]
    pub time_seconds: u8,

    /// Playback time in seconds
    #[arg(short = 't', default_value_t = 60)]
    pub seconds: u32,

    /// Include CPU cycles and PAL raster time, badline corrected
    #[arg(short = 'z', default_value_t = 0)]
    pub profiling: u8,

    /// Output file for the binary dump mode
    #[arg(long = "dump-file", default_value = DEFAULT_DUMP_FILE)]
    pub dump_file: PathBuf,

    /// Display usage information
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,

    /// PSID/RSID file to trace
    pub sid_file: Option<PathBuf>,
}

impl CliArgs {
    /// Decoder settings described by the flags.
    pub fn settings(&self) -> Settings {
        Settings {
            first_frame: self.first_frame,
            frames: self.seconds.saturating_mul(FRAME_RATE_PAL),
            spacing: self.spacing,
            pattern_spacing: self.pattern_spacing,
            low_res: self.low_res != 0,
            stickiness: self.stickiness,
            profiling: self.profiling != 0,
            time_format: if self.time_seconds != 0 {
                TimeFormat::MinutesSeconds
            } else {
                TimeFormat::Frames
            },
        }
    }

    /// Selected output decoder.
    pub fn decoder_kind(&self) -> DecoderKind {
        DecoderKind::from_mode(self.mode)
    }

    /// Frequency table, recalibrated when `-c` is non-zero.
    pub fn frequency_table(&self) -> sidtrace::Result<FrequencyTable> {
        if self.base_frequency == 0 {
            Ok(FrequencyTable::pal())
        } else {
            FrequencyTable::calibrated(self.base_frequency, self.base_note)
        }
    }
}

fn strip_hex_prefix(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('$')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

fn parse_hex_u16(value: &str) -> Result<u16, String> {
    u16::from_str_radix(strip_hex_prefix(value), 16)
        .map_err(|err| format!("'{value}' is not a 16-bit hex value: {err}"))
}

fn parse_hex_u8(value: &str) -> Result<u8, String> {
    u8::from_str_radix(strip_hex_prefix(value), 16)
        .map_err(|err| format!("'{value}' is not an 8-bit hex value: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("sidtrace").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults_match_documented_values() {
        let args = parse(&["tune.sid"]);
        assert_eq!(args.subtune, 0);
        assert_eq!(args.base_frequency, 0);
        assert_eq!(args.base_note, 0xB0);
        assert_eq!(args.dump_file, PathBuf::from("sidtune.dmp"));
        assert!(!args.help);

        let settings = args.settings();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.total_frames(), 3000);
        assert_eq!(args.decoder_kind(), DecoderKind::Notes);
    }

    #[test]
    fn numeric_flags_map_to_settings() {
        let args = parse(&[
            "-a", "2", "-f", "100", "-l", "0", "-n", "4", "-o", "3", "-p", "2", "-s", "1", "-t",
            "10", "-z", "1", "tune.sid",
        ]);
        assert_eq!(args.subtune, 2);
        let settings = args.settings();
        assert_eq!(settings.first_frame, 100);
        assert_eq!(settings.frames, 500);
        assert_eq!(settings.total_frames(), 600);
        assert!(!settings.low_res);
        assert_eq!(settings.spacing, 4);
        assert_eq!(settings.stickiness, 3);
        assert_eq!(settings.pattern_spacing, 2);
        assert!(settings.profiling);
        assert_eq!(settings.time_format, TimeFormat::MinutesSeconds);
    }

    #[test]
    fn calibration_values_are_hex() {
        let args = parse(&["-c", "1145", "-d", "$b0", "tune.sid"]);
        assert_eq!(args.base_frequency, 0x1145);
        assert_eq!(args.base_note, 0xB0);
        let table = args.frequency_table().expect("valid calibration");
        assert_eq!(table.frequency(48), 0x1145);

        assert_eq!(parse(&["-c", "0x1168", "x.sid"]).base_frequency, 0x1168);
        assert!(CliArgs::try_parse_from(["sidtrace", "-c", "zz", "x.sid"]).is_err());
    }

    #[test]
    fn invalid_calibration_note_is_an_error() {
        let args = parse(&["-c", "1145", "-d", "E0", "tune.sid"]);
        assert!(args.frequency_table().is_err());
    }

    #[test]
    fn help_and_missing_file_parse() {
        let args = parse(&["-h"]);
        assert!(args.help);
        assert!(args.sid_file.is_none());
    }

    #[test]
    fn output_modes() {
        assert_eq!(parse(&["-m", "1", "x.sid"]).decoder_kind(), DecoderKind::Registers);
        assert_eq!(parse(&["-m", "2", "x.sid"]).decoder_kind(), DecoderKind::Json);
        assert_eq!(parse(&["-m", "4", "x.sid"]).decoder_kind(), DecoderKind::Dump);
    }
}
