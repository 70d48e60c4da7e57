use crate::rom::{Rom, TILESET_ALTERNATES, TILE_EFFECTS_BASE};
use crate::Result;

pub const SCREEN_COUNT: usize = 0x200;
pub const TILES_PER_SCREEN: usize = 0xf0;

const TILESET_COUNT: usize = 0x40;
const ALTERNATES_LEN: usize = 0x20;
const EFFECT_PAGES: usize = 0x20;

/// Per-tile terrain bits.
pub mod effects {
    pub const NO_WALK: u8 = 0x02;
    pub const IMPASSABLE: u8 = 0x04;
    pub const BLOCKS_WALKING: u8 = NO_WALK | IMPASSABLE;
    pub const BLOCKS_FLYING: u8 = IMPASSABLE;
}

/// Screen, alternate-tile and terrain tables shared by every location.
#[derive(Debug, Clone)]
pub struct TileData {
    screens: Vec<[u8; TILES_PER_SCREEN]>,
    alternates: Vec<[u8; ALTERNATES_LEN]>,
    effects: Vec<[u8; 0x100]>,
}

impl TileData {
    pub fn load(rom: &Rom) -> Result<TileData> {
        let mut screens = Vec::with_capacity(SCREEN_COUNT);
        for id in 0..SCREEN_COUNT {
            let base = screen_base(id as u16);
            let mut tiles = [0u8; TILES_PER_SCREEN];
            tiles.copy_from_slice(rom.slice(base, TILES_PER_SCREEN)?);
            screens.push(tiles);
        }

        let mut alternates = Vec::with_capacity(TILESET_COUNT);
        for map in 0..TILESET_COUNT {
            let mut table = [0u8; ALTERNATES_LEN];
            table.copy_from_slice(rom.slice(TILESET_ALTERNATES | map << 3, ALTERNATES_LEN)?);
            alternates.push(table);
        }

        let mut effects = Vec::with_capacity(EFFECT_PAGES);
        for page in 0..EFFECT_PAGES {
            let mut table = [0u8; 0x100];
            table.copy_from_slice(rom.slice(TILE_EFFECTS_BASE | page << 8, 0x100)?);
            effects.push(table);
        }

        Ok(TileData { screens, alternates, effects })
    }

    /// Metatile ids for one screen (15 rows of 16).
    pub fn screen(&self, id: u16) -> &[u8; TILES_PER_SCREEN] {
        &self.screens[id as usize % SCREEN_COUNT]
    }

    /// Tile substituted on flagged screens; only the first $20 tiles have one.
    pub fn alternate(&self, tileset: u8, tile: u8) -> u8 {
        if (tile as usize) < ALTERNATES_LEN {
            self.alternates[(tileset & 0x3f) as usize][tile as usize]
        } else {
            tile
        }
    }

    /// Terrain byte for `tile` under the location's tile-effects id.
    pub fn effect(&self, tile_effects: u8, tile: u8) -> u8 {
        self.effects[(tile_effects & 0x1f) as usize][tile as usize]
    }
}

/// Screens above $ff live in a second block starting at $14000.
pub fn screen_base(id: u16) -> usize {
    let page = if id > 0xff { 0x40 + id as usize } else { id as usize };
    page << 8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::RomFixture;

    #[test]
    fn extended_screens_skip_the_tileset_block() {
        assert_eq!(screen_base(0x80), 0x8000);
        assert_eq!(screen_base(0x100), 0x14000);
    }

    #[test]
    fn load_reads_screens_alternates_and_effects() {
        let mut fixture = RomFixture::new();
        fixture.screen(0x101, |tiles| tiles[5] = 0x33);
        fixture.alternate(0x80, 0x03, 0x07);
        fixture.effect(0xb3, 0x03, 0x06);

        let tiles = TileData::load(&fixture.rom()).unwrap();
        assert_eq!(tiles.screen(0x101)[5], 0x33);
        assert_eq!(tiles.alternate(0x80, 0x03), 0x07);
        assert_eq!(tiles.alternate(0x80, 0x40), 0x40);
        assert_eq!(tiles.effect(0xb3, 0x03), 0x06);
    }
}
