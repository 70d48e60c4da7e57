use crate::{RandomiserError, Result};

pub const INES_HEADER_LEN: usize = 0x10;
pub const PRG_LEN: usize = 0x40000;

// Offsets below are all relative to the start of PRG.
pub const MAP_DATA_POINTERS: usize = 0x14300;
pub const NPC_DATA_POINTERS: usize = 0x19201;
pub const CHECKPOINT_TABLE: usize = 0x2ff00;
pub const BOSS_KILL_LOCATIONS: usize = 0x1f95d;
pub const BOSS_KILL_POINTERS: usize = 0x1f96b;
pub const BOSS_KILL_COUNT: usize = 0x0e;
pub const TILESET_ALTERNATES: usize = 0x13e00;
pub const TILE_EFFECTS_BASE: usize = 0x12000;

/// Bank offset added to map-data pointers.
pub const MAP_DATA_BANK: usize = 0xc000;
/// Bank offset added to NPC-data pointers.
pub const NPC_DATA_BANK: usize = 0x10000;
/// Bank offset added to boss-kill data pointers.
pub const BOSS_KILL_BANK: usize = 0x14000;

/// An iNES image split into its header, PRG and whatever follows PRG (CHR).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rom {
    pub header: Vec<u8>,
    pub prg: Vec<u8>,
    pub trailer: Vec<u8>,
}

impl Rom {
    pub fn parse(raw: &[u8]) -> Result<Rom> {
        if raw.len() < INES_HEADER_LEN + PRG_LEN {
            return Err(RandomiserError::Rom(format!(
                "image is {} bytes, expected at least {}",
                raw.len(),
                INES_HEADER_LEN + PRG_LEN
            )));
        }
        if &raw[..4] != b"NES\x1a" {
            return Err(RandomiserError::Rom("missing iNES signature".to_string()));
        }

        Ok(Rom {
            header: raw[..INES_HEADER_LEN].to_vec(),
            prg: raw[INES_HEADER_LEN..INES_HEADER_LEN + PRG_LEN].to_vec(),
            trailer: raw[INES_HEADER_LEN + PRG_LEN..].to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header.len() + self.prg.len() + self.trailer.len());
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.prg);
        out.extend_from_slice(&self.trailer);
        out
    }

    pub fn byte(&self, addr: usize) -> Result<u8> {
        self.prg
            .get(addr)
            .copied()
            .ok_or_else(|| out_of_range(addr, 1))
    }

    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        self.prg
            .get(addr..addr + len)
            .ok_or_else(|| out_of_range(addr, len))
    }

    /// Little-endian word at `addr`.
    pub fn word(&self, addr: usize) -> Result<usize> {
        let bytes = self.slice(addr, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]) as usize)
    }

    /// Fixed-size records starting at `addr`, ending at the first record
    /// whose leading byte is `stop`. The terminator is not included.
    pub fn records_until(&self, addr: usize, stride: usize, stop: u8) -> Result<Vec<&[u8]>> {
        let mut out = Vec::new();
        let mut i = addr;
        while self.byte(i)? != stop {
            out.push(self.slice(i, stride)?);
            i += stride;
        }
        Ok(out)
    }

    pub fn write(&mut self, addr: usize, bytes: &[u8]) -> Result<()> {
        let dst = self
            .prg
            .get_mut(addr..addr + bytes.len())
            .ok_or_else(|| out_of_range(addr, bytes.len()))?;
        dst.copy_from_slice(bytes);
        Ok(())
    }
}

fn out_of_range(addr: usize, len: usize) -> RandomiserError {
    RandomiserError::Rom(format!("read of {len} bytes at ${addr:05x} is outside PRG"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_image() -> Vec<u8> {
        let mut raw = vec![0u8; INES_HEADER_LEN + PRG_LEN + 0x20];
        raw[..4].copy_from_slice(b"NES\x1a");
        raw
    }

    #[test]
    fn parse_splits_header_prg_and_trailer() {
        let mut raw = blank_image();
        raw[INES_HEADER_LEN] = 0x12;
        raw[INES_HEADER_LEN + PRG_LEN] = 0x34;
        let rom = Rom::parse(&raw).unwrap();
        assert_eq!(rom.header.len(), INES_HEADER_LEN);
        assert_eq!(rom.prg[0], 0x12);
        assert_eq!(rom.trailer[0], 0x34);
        assert_eq!(rom.to_bytes(), raw);
    }

    #[test]
    fn rejects_short_or_unsigned_images() {
        assert!(Rom::parse(&[0u8; 32]).is_err());
        let mut raw = blank_image();
        raw[0] = b'X';
        assert!(Rom::parse(&raw).is_err());
    }

    #[test]
    fn records_stop_at_terminator() {
        let mut rom = Rom::parse(&blank_image()).unwrap();
        rom.write(0x100, &[1, 2, 3, 4, 0xff]).unwrap();
        let records = rom.records_until(0x100, 2, 0xff).unwrap();
        assert_eq!(records, vec![&[1u8, 2][..], &[3u8, 4][..]]);
        assert_eq!(rom.word(0x100).unwrap(), 0x0201);
    }
}
