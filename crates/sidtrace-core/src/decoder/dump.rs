//! Binary dump decoder.
//!
//! Writes the 27-byte raw register image of every frame back to back:
//! `$D400-$D418`, then delta time high and low byte.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::FrameDecoder;
use crate::snapshot::Snapshot;
use crate::Result;

/// Default dump file name.
pub const DEFAULT_DUMP_FILE: &str = "sidtune.dmp";

/// Streams raw register images to a writer.
pub struct DumpDecoder<W: Write> {
    out: W,
    frames: u32,
}

impl DumpDecoder<BufWriter<File>> {
    /// Create (or truncate) `path` and dump into it.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        log::debug!("dumping register frames to {}", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> DumpDecoder<W> {
    /// Dump into `out`.
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Frames written so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameDecoder for DumpDecoder<W> {
    fn pre_steps(&mut self) -> Result<()> {
        self.frames = 0;
        Ok(())
    }

    fn process_frame(&mut self, _frame: u32, _cycles: u64, snapshot: &Snapshot) -> Result<()> {
        self.out.write_all(&snapshot.registers)?;
        self.frames += 1;
        Ok(())
    }

    fn post_steps(&mut self) -> Result<()> {
        self.out.flush()?;
        log::debug!("dumped {} frames", self.frames);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAW_IMAGE_LEN;

    #[test]
    fn writes_raw_image_per_frame() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(DEFAULT_DUMP_FILE);

        let mut snapshot = Snapshot::default();
        snapshot.registers[0] = 0x68;
        snapshot.registers[1] = 0x11;
        snapshot.registers[25] = 0x4E;
        snapshot.registers[26] = 0x20;

        let mut decoder = DumpDecoder::create(&path).expect("create dump");
        decoder.pre_steps().expect("start");
        for frame in 0..3 {
            decoder.process_frame(frame, 0, &snapshot).expect("frame");
        }
        decoder.post_steps().expect("flush");
        assert_eq!(decoder.frames(), 3);
        drop(decoder);

        let bytes = std::fs::read(&path).expect("read dump");
        assert_eq!(bytes.len(), 3 * RAW_IMAGE_LEN);
        assert_eq!(&bytes[..2], &[0x68, 0x11]);
        assert_eq!(&bytes[RAW_IMAGE_LEN - 2..RAW_IMAGE_LEN], &[0x4E, 0x20]);
        assert_eq!(&bytes[RAW_IMAGE_LEN..2 * RAW_IMAGE_LEN], &bytes[..RAW_IMAGE_LEN]);
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join(DEFAULT_DUMP_FILE);
        assert!(matches!(
            DumpDecoder::create(&path),
            Err(crate::TraceError::Io(_))
        ));
    }
}
