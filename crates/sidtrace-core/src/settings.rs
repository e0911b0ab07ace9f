//! Output settings shared by the decoders.

use serde::Serialize;

use crate::constants::{FRAMES_PER_MINUTE, FRAME_RATE_PAL};

/// How the time column is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimeFormat {
    /// Frame count, `| %5d | `
    #[default]
    Frames,
    /// Minutes, seconds and frames, `|m:ss.ff| `
    MinutesSeconds,
}

impl TimeFormat {
    /// Render the leading time cell for `time` frames since the first displayed frame.
    pub fn format_time(&self, time: u32) -> String {
        match self {
            TimeFormat::Frames => format!("| {time:5} | "),
            TimeFormat::MinutesSeconds => format!(
                "|{}:{:02}.{:02}| ",
                time / FRAMES_PER_MINUTE,
                (time / FRAME_RATE_PAL) % 60,
                time % FRAME_RATE_PAL
            ),
        }
    }
}

/// Trace settings, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// First frame that is handed to the decoder
    pub first_frame: u32,
    /// Number of frames decoded after `first_frame`
    pub frames: u32,
    /// Note spacing; 0 disables separators and line suppression
    pub spacing: u32,
    /// Separator rows per pattern; 0 disables heavy separators
    pub pattern_spacing: u32,
    /// Only emit every `spacing`-th frame
    pub low_res: bool,
    /// Divisor favouring the previously displayed note
    pub stickiness: u32,
    /// Append raster-time columns
    pub profiling: bool,
    /// Time column format
    pub time_format: TimeFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            first_frame: 0,
            frames: 60 * FRAME_RATE_PAL,
            spacing: 0,
            pattern_spacing: 0,
            low_res: true,
            stickiness: 1,
            profiling: false,
            time_format: TimeFormat::Frames,
        }
    }
}

impl Settings {
    /// Frames the driver simulates: the skipped prefix plus the decoded range.
    pub fn total_frames(&self) -> u32 {
        self.first_frame.saturating_add(self.frames)
    }

    /// Stickiness clamped to at least 1.
    pub fn stickiness_factor(&self) -> u32 {
        self.stickiness.max(1)
    }

    /// Whether the frame at `time` (relative to `first_frame`) is emitted.
    pub fn displays(&self, time: u32) -> bool {
        !self.low_res || self.spacing == 0 || time % self.spacing == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_column_formats() {
        assert_eq!(TimeFormat::Frames.format_time(42), "|    42 | ");
        assert_eq!(TimeFormat::MinutesSeconds.format_time(3175), "|1:03.25| ");
        assert_eq!(TimeFormat::MinutesSeconds.format_time(0), "|0:00.00| ");
    }

    #[test]
    fn defaults_cover_one_minute() {
        let settings = Settings::default();
        assert_eq!(settings.total_frames(), 3000);
        assert!(settings.low_res);
    }

    #[test]
    fn total_includes_skipped_prefix() {
        let settings = Settings {
            first_frame: 100,
            frames: 50,
            ..Settings::default()
        };
        assert_eq!(settings.total_frames(), 150);
    }

    #[test]
    fn stickiness_never_zero() {
        let settings = Settings {
            stickiness: 0,
            ..Settings::default()
        };
        assert_eq!(settings.stickiness_factor(), 1);
    }

    #[test]
    fn spacing_filters_only_in_low_res() {
        let mut settings = Settings {
            spacing: 4,
            ..Settings::default()
        };
        assert!(settings.displays(8));
        assert!(!settings.displays(9));
        settings.low_res = false;
        assert!(settings.displays(9));
        settings.spacing = 0;
        settings.low_res = true;
        assert!(settings.displays(9));
    }
}
