//! JSON-lines decoder: one object per frame.

use std::io::Write;

use serde::Serialize;

use super::FrameDecoder;
use crate::profiling::RasterProfile;
use crate::settings::Settings;
use crate::snapshot::Snapshot;
use crate::Result;

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: u32,
    time: u32,
    cycles: u64,
    delta_time_us: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    raster: Option<RasterProfile>,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
}

/// Serializes every frame's snapshot as a single JSON line.
///
/// Notes are not inferred here; they stay `null`.
pub struct JsonDecoder<W: Write> {
    out: W,
    settings: Settings,
    frames: u32,
}

impl<W: Write> JsonDecoder<W> {
    /// Create a decoder writing to `out`.
    pub fn new(out: W, settings: Settings) -> Self {
        Self {
            out,
            settings,
            frames: 0,
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameDecoder for JsonDecoder<W> {
    fn pre_steps(&mut self) -> Result<()> {
        self.frames = 0;
        Ok(())
    }

    fn process_frame(&mut self, frame: u32, cycles: u64, snapshot: &Snapshot) -> Result<()> {
        let record = FrameRecord {
            frame,
            time: frame.saturating_sub(self.settings.first_frame),
            cycles,
            delta_time_us: snapshot.delta_time(),
            raster: self
                .settings
                .profiling
                .then(|| RasterProfile::from_cycles(cycles)),
            snapshot,
        };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.frames += 1;
        Ok(())
    }

    fn post_steps(&mut self) -> Result<()> {
        self.out.flush()?;
        log::debug!("wrote {} JSON frames", self.frames);
        Ok(())
    }
}
