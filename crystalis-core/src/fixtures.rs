//! Synthetic ROM images for tests.

use crate::rom::{
    Rom, CHECKPOINT_TABLE, INES_HEADER_LEN, MAP_DATA_BANK, MAP_DATA_POINTERS, NPC_DATA_BANK,
    NPC_DATA_POINTERS, PRG_LEN, TILESET_ALTERNATES, TILE_EFFECTS_BASE,
};
use crate::tiles::{screen_base, TILES_PER_SCREEN};

const MAP_DATA_START: usize = 0x14500;
const NPC_DATA_START: usize = 0x19500;

/// Raw blocks for one location. Screens hold the low byte only; `extended`
/// moves them all to the $100 page.
#[derive(Debug, Clone)]
pub struct MapSpec {
    pub bgm: u8,
    pub screens: Vec<Vec<u8>>,
    pub extended: u8,
    pub tileset: u8,
    pub tile_effects: u8,
    pub entrances: Vec<[u8; 4]>,
    pub exits: Vec<[u8; 4]>,
    /// `None` writes `$80 | pits | entrance count`.
    pub terminator: Option<u8>,
    pub flags: Vec<[u8; 2]>,
    pub pits: Option<Vec<[u8; 4]>>,
    pub npc_header: [u8; 5],
    pub spawns: Option<Vec<[u8; 4]>>,
    pub checkpoint: u8,
}

impl Default for MapSpec {
    fn default() -> MapSpec {
        MapSpec {
            bgm: 0x01,
            screens: vec![vec![0x80]],
            extended: 0,
            tileset: 0x80,
            tile_effects: 0xb3,
            entrances: vec![[0x80, 0x00, 0x40, 0x00]],
            exits: Vec::new(),
            terminator: None,
            flags: Vec::new(),
            pits: None,
            npc_header: [0x00, 0x10, 0x20, 0x50, 0x51],
            spawns: None,
            checkpoint: 0,
        }
    }
}

pub struct RomFixture {
    rom: Rom,
    map_cursor: usize,
    npc_cursor: usize,
}

impl RomFixture {
    pub fn new() -> RomFixture {
        let mut header = vec![0u8; INES_HEADER_LEN];
        header[..4].copy_from_slice(b"NES\x1a");
        RomFixture {
            rom: Rom { header, prg: vec![0; PRG_LEN], trailer: Vec::new() },
            map_cursor: MAP_DATA_START,
            npc_cursor: NPC_DATA_START,
        }
    }

    pub fn rom(&self) -> Rom {
        self.rom.clone()
    }

    pub fn poke(&mut self, addr: usize, bytes: &[u8]) -> &mut RomFixture {
        self.rom.prg[addr..addr + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn screen(&mut self, id: u16, edit: impl FnOnce(&mut [u8])) -> &mut RomFixture {
        let base = screen_base(id);
        edit(&mut self.rom.prg[base..base + TILES_PER_SCREEN]);
        self
    }

    pub fn alternate(&mut self, tileset: u8, tile: u8, alt: u8) -> &mut RomFixture {
        let addr = TILESET_ALTERNATES | ((tileset & 0x3f) as usize) << 3;
        self.poke(addr + tile as usize, &[alt])
    }

    pub fn effect(&mut self, tile_effects: u8, tile: u8, value: u8) -> &mut RomFixture {
        let addr = TILE_EFFECTS_BASE | ((tile_effects & 0x1f) as usize) << 8;
        self.poke(addr + tile as usize, &[value])
    }

    /// Appends a location's blocks to the map and NPC data areas and points
    /// the tables at them.
    pub fn location(mut self, id: u8, spec: MapSpec) -> RomFixture {
        let base = self.map_cursor;
        let header_len = if spec.pits.is_some() { 12 } else { 10 };

        let layout = base + header_len;
        let width = spec.screens[0].len();
        let height = spec.screens.len();
        let mut block = vec![
            spec.bgm,
            (width - 1) as u8,
            (height - 1) as u8,
            0x00,
            spec.extended,
        ];
        block.extend(spec.screens.iter().flatten());

        let graphics = layout + block.len();
        block.extend_from_slice(&[0x01, 0x02, 0x03, spec.tileset, spec.tile_effects, 0x04, 0x05]);

        let entrances = layout + block.len();
        block.extend(spec.entrances.iter().flatten());

        let exits = layout + block.len();
        block.extend(spec.exits.iter().flatten());
        let pit_bit = if spec.pits.is_some() { 0x40 } else { 0 };
        block.push(
            spec.terminator
                .unwrap_or(0x80 | pit_bit | spec.entrances.len() as u8),
        );

        let flags = layout + block.len();
        block.extend(spec.flags.iter().flatten());
        block.push(0xff);

        let mut pointers = vec![layout, graphics, entrances, exits, flags];
        if let Some(pits) = &spec.pits {
            pointers.push(layout + block.len());
            block.extend(pits.iter().flatten());
            block.push(0xff);
        }

        let header: Vec<u8> = pointers
            .iter()
            .flat_map(|&p| ((p - MAP_DATA_BANK) as u16).to_le_bytes())
            .collect();
        self.poke(base, &header);
        self.poke(layout, &block);
        self.map_cursor = layout + block.len();
        let pointer = ((base - MAP_DATA_BANK) as u16).to_le_bytes();
        self.poke(MAP_DATA_POINTERS + 2 * id as usize, &pointer);

        if let Some(spawns) = &spec.spawns {
            let npc = self.npc_cursor;
            let mut block = spec.npc_header.to_vec();
            block.extend(spawns.iter().flatten());
            block.push(0xff);
            self.poke(npc, &block);
            self.npc_cursor = npc + block.len();
            let pointer = ((npc - NPC_DATA_BANK) as u16).to_le_bytes();
            self.poke(NPC_DATA_POINTERS + 2 * id as usize, &pointer);
        }

        self.poke(CHECKPOINT_TABLE | id as usize, &[spec.checkpoint]);
        self
    }
}
