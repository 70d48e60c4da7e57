use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::location::Location;
use crate::rom::{Rom, BOSS_KILL_BANK, BOSS_KILL_COUNT, BOSS_KILL_LOCATIONS, BOSS_KILL_POINTERS};
use crate::Result;

/// Owner of a music byte: a location's bgm, or the "restore music" byte a
/// boss kill plays afterwards (keyed by its PRG address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MusicKey {
    Location(u8),
    BossSlot(usize),
}

/// Dyna's room keeps its own restore byte.
const DYNA: u8 = 0x5f;
/// Nothing is playing after Draygon 2, so the restore byte stays silent.
const DRAYGON_2: u8 = 0xa6;

#[derive(Debug, Clone)]
pub struct MusicTable {
    music: BTreeMap<MusicKey, u8>,
    /// Restore-byte address and the location it belongs to.
    boss_slots: Vec<(usize, u8)>,
}

impl MusicTable {
    pub fn read(rom: &Rom, locations: &[Location]) -> Result<MusicTable> {
        let mut music = BTreeMap::new();
        for location in locations.iter().filter(|l| l.used) {
            music.insert(MusicKey::Location(location.id), location.bgm);
        }
        let mut boss_slots = Vec::new();
        for i in 0..BOSS_KILL_COUNT {
            let pointer = rom.word(BOSS_KILL_POINTERS + 2 * i)?;
            if pointer == 0 {
                continue;
            }
            let addr = pointer + BOSS_KILL_BANK + 3;
            music.insert(MusicKey::BossSlot(addr), rom.byte(addr)?);
            boss_slots.push((addr, rom.byte(BOSS_KILL_LOCATIONS + i)?));
        }
        Ok(MusicTable { music, boss_slots })
    }

    pub fn get(&self, key: MusicKey) -> Option<u8> {
        self.music.get(&key).copied()
    }

    /// Picks up bgm changes made to the locations, moving each affected
    /// boss's restore byte along with its room.
    pub fn sync(&mut self, locations: &[Location]) {
        for location in locations.iter().filter(|l| l.used) {
            let key = MusicKey::Location(location.id);
            if self.get(key) == Some(location.bgm) {
                continue;
            }
            self.music.insert(key, location.bgm);
            if location.id == DYNA {
                continue;
            }
            let restore = if location.id == DRAYGON_2 { 0 } else { location.bgm };
            for &(addr, _) in self.boss_slots.iter().filter(|&&(_, l)| l == location.id) {
                debug!("{}: boss restore music now {restore:02x}", location.label());
                self.music.insert(MusicKey::BossSlot(addr), restore);
            }
        }
    }

    pub fn write(&self, rom: &mut Rom) -> Result<()> {
        for (key, &bgm) in &self.music {
            if let MusicKey::BossSlot(addr) = *key {
                rom.write(addr, &[bgm])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{MapSpec, RomFixture};
    use crate::location::decode_all;

    fn rom() -> Rom {
        let mut fixture = RomFixture::new()
            .location(0x18, MapSpec { bgm: 0x05, ..MapSpec::default() })
            .location(0x5f, MapSpec { bgm: 0x06, ..MapSpec::default() });
        fixture.poke(BOSS_KILL_LOCATIONS + 2, &[0x18]);
        fixture.poke(BOSS_KILL_POINTERS + 4, &[0x00, 0xba]);
        fixture.poke(0x1fa03, &[0x05]);
        fixture.poke(BOSS_KILL_LOCATIONS + 5, &[0x5f]);
        fixture.poke(BOSS_KILL_POINTERS + 10, &[0x20, 0xba]);
        fixture.poke(0x1fa23, &[0x06]);
        fixture.rom()
    }

    #[test]
    fn boss_restore_follows_location_bgm() {
        let mut rom = rom();
        let mut locations = decode_all(&rom).unwrap();
        let mut table = MusicTable::read(&rom, &locations).unwrap();
        assert_eq!(table.get(MusicKey::Location(0x18)), Some(0x05));
        assert_eq!(table.get(MusicKey::BossSlot(0x1fa03)), Some(0x05));

        locations[0x18].bgm = 0x09;
        locations[0x5f].bgm = 0x0a;
        table.sync(&locations);
        table.write(&mut rom).unwrap();
        assert_eq!(rom.byte(0x1fa03).unwrap(), 0x09);
        // dyna keeps its restore byte
        assert_eq!(rom.byte(0x1fa23).unwrap(), 0x06);
        assert_eq!(table.get(MusicKey::Location(0x5f)), Some(0x0a));
    }

    #[test]
    fn unchanged_music_writes_back_verbatim() {
        let original = rom();
        let locations = decode_all(&original).unwrap();
        let mut table = MusicTable::read(&original, &locations).unwrap();
        table.sync(&locations);
        let mut rom = original.clone();
        table.write(&mut rom).unwrap();
        assert_eq!(rom, original);
    }
}
