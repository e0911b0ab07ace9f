//! PSID/RSID parser producing structured [`PsidFile`] data.

use std::path::Path;

use crate::error::{PsidError, Result};
use crate::format::{PsidFile, PsidHeader, PsidKind};

/// Smallest header a version 1 file can have.
const MIN_HEADER_LEN: usize = 0x76;
/// Width of the name/author/released fields.
const TEXT_FIELD_LEN: usize = 32;
const C64_MEMORY_SIZE: usize = 0x10000;

/// Parse a SID file from raw bytes.
pub fn load_psid(data: &[u8]) -> Result<PsidFile> {
    PsidParser { data }.parse()
}

/// Read and parse a SID file from disk.
pub fn load_psid_file(path: impl AsRef<Path>) -> Result<PsidFile> {
    let data = std::fs::read(path)?;
    load_psid(&data)
}

struct PsidParser<'a> {
    data: &'a [u8],
}

impl<'a> PsidParser<'a> {
    fn parse(&self) -> Result<PsidFile> {
        if self.data.len() < MIN_HEADER_LEN {
            return Err(PsidError::UnexpectedEof);
        }

        let kind = match &self.data[0..4] {
            b"PSID" => PsidKind::Psid,
            b"RSID" => PsidKind::Rsid,
            other => {
                let magic = String::from_utf8_lossy(other).to_string();
                return Err(PsidError::InvalidMagic { magic });
            }
        };

        let version = self.read_u16(4)?;
        let data_offset = self.read_u16(6)?;
        let header = PsidHeader {
            kind,
            version,
            data_offset,
            load_address: self.read_u16(8)?,
            init_address: self.read_u16(10)?,
            play_address: self.read_u16(12)?,
            songs: self.read_u16(14)?,
            start_song: self.read_u16(16)?,
            speed: self.read_u32(18)?,
            name: self.read_text(22)?,
            author: self.read_text(54)?,
            released: self.read_text(86)?,
            flags: if version >= 2 && usize::from(data_offset) >= 0x78 {
                Some(self.read_u16(0x76)?)
            } else {
                None
            },
        };

        let start = usize::from(data_offset);
        if start > self.data.len() {
            return Err(PsidError::DataOffsetOutOfRange {
                offset: data_offset,
            });
        }

        let (load_address, payload) = if header.load_address == 0 {
            self.ensure_range(start, 2)?;
            let address = u16::from_le_bytes([self.data[start], self.data[start + 1]]);
            (address, &self.data[start + 2..])
        } else {
            (header.load_address, &self.data[start..])
        };

        if usize::from(load_address) + payload.len() > C64_MEMORY_SIZE {
            return Err(PsidError::PayloadTooLarge {
                load_address,
                length: payload.len(),
            });
        }

        log::debug!(
            "{} v{} '{}': {} bytes at ${:04X}",
            kind.magic(),
            version,
            header.name,
            payload.len(),
            load_address
        );

        Ok(PsidFile {
            header,
            load_address,
            payload: payload.to_vec(),
        })
    }

    fn read_u16(&self, offset: usize) -> Result<u16> {
        self.ensure_range(offset, 2)?;
        Ok(u16::from_be_bytes([self.data[offset], self.data[offset + 1]]))
    }

    fn read_u32(&self, offset: usize) -> Result<u32> {
        self.ensure_range(offset, 4)?;
        Ok(u32::from_be_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]))
    }

    /// Zero-padded Latin-1 text field.
    fn read_text(&self, offset: usize) -> Result<String> {
        self.ensure_range(offset, TEXT_FIELD_LEN)?;
        let field = &self.data[offset..offset + TEXT_FIELD_LEN];
        let end = field.iter().position(|&b| b == 0).unwrap_or(TEXT_FIELD_LEN);
        Ok(field[..end].iter().map(|&b| char::from(b)).collect())
    }

    fn ensure_range(&self, offset: usize, size: usize) -> Result<()> {
        match offset.checked_add(size) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(PsidError::UnexpectedEof),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(magic: &[u8; 4], version: u16, load: u16) -> Vec<u8> {
        let data_offset: u16 = if version >= 2 { 0x7C } else { 0x76 };
        let mut data = vec![0u8; data_offset as usize];
        data[0..4].copy_from_slice(magic);
        data[4..6].copy_from_slice(&version.to_be_bytes());
        data[6..8].copy_from_slice(&data_offset.to_be_bytes());
        data[8..10].copy_from_slice(&load.to_be_bytes());
        data[10..12].copy_from_slice(&0x1000u16.to_be_bytes());
        data[12..14].copy_from_slice(&0x1003u16.to_be_bytes());
        data[14..16].copy_from_slice(&3u16.to_be_bytes());
        data[16..18].copy_from_slice(&2u16.to_be_bytes());
        data[18..22].copy_from_slice(&1u32.to_be_bytes());
        data[22..22 + 5].copy_from_slice(b"Title");
        data[54..54 + 3].copy_from_slice(b"M\xFCn");
        data[86..86 + 4].copy_from_slice(b"1987");
        if version >= 2 {
            data[0x76..0x78].copy_from_slice(&0x0014u16.to_be_bytes());
        }
        data
    }

    #[test]
    fn header_fields_are_big_endian() {
        let mut data = header(b"PSID", 2, 0x1000);
        data.extend_from_slice(&[0x60, 0x60]);
        let file = load_psid(&data).expect("valid file");
        assert_eq!(file.header.kind, PsidKind::Psid);
        assert_eq!(file.header.version, 2);
        assert_eq!(file.header.init_address, 0x1000);
        assert_eq!(file.header.play_address, 0x1003);
        assert_eq!(file.header.songs, 3);
        assert_eq!(file.header.start_song, 2);
        assert_eq!(file.header.speed, 1);
        assert_eq!(file.header.name, "Title");
        assert_eq!(file.header.author, "Mün");
        assert_eq!(file.header.released, "1987");
        assert_eq!(file.header.flags, Some(0x0014));
        assert_eq!(file.load_address, 0x1000);
        assert_eq!(file.payload, vec![0x60, 0x60]);
    }

    #[test]
    fn zero_load_address_reads_payload_prefix() {
        let mut data = header(b"RSID", 1, 0);
        data.extend_from_slice(&[0x00, 0xC0, 0xEA, 0x60]);
        let file = load_psid(&data).expect("valid file");
        assert_eq!(file.header.kind, PsidKind::Rsid);
        assert_eq!(file.header.flags, None);
        assert_eq!(file.load_address, 0xC000);
        assert_eq!(file.payload, vec![0xEA, 0x60]);
    }

    #[test]
    fn rejects_unknown_magic() {
        let data = header(b"ZXAY", 1, 0x1000);
        assert!(matches!(
            load_psid(&data),
            Err(PsidError::InvalidMagic { magic }) if magic == "ZXAY"
        ));
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(matches!(
            load_psid(b"PSID\x00\x02"),
            Err(PsidError::UnexpectedEof)
        ));
    }

    #[test]
    fn rejects_data_offset_past_end() {
        let mut data = header(b"PSID", 1, 0x1000);
        data[6..8].copy_from_slice(&0x0200u16.to_be_bytes());
        assert!(matches!(
            load_psid(&data),
            Err(PsidError::DataOffsetOutOfRange { offset: 0x0200 })
        ));
    }

    #[test]
    fn rejects_payload_past_end_of_memory() {
        let mut data = header(b"PSID", 1, 0xFFFF);
        data.extend_from_slice(&[0x60, 0x60]);
        assert!(matches!(
            load_psid(&data),
            Err(PsidError::PayloadTooLarge {
                load_address: 0xFFFF,
                length: 2
            })
        ));
    }
}
