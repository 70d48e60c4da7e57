use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{location_name, LocationConfig};
use crate::rom::{
    Rom, BOSS_KILL_COUNT, BOSS_KILL_LOCATIONS, CHECKPOINT_TABLE, MAP_DATA_BANK, MAP_DATA_POINTERS,
    NPC_DATA_BANK, NPC_DATA_POINTERS,
};
use crate::tables::{Entrance, Exit, Flag, Pit, Spawn, ALWAYS_TRUE_FLAG};
use crate::{RandomiserError, Result};

pub const LOCATION_COUNT: usize = 0x100;

/// Spawn table index of the first spawn; slots are numbered from here.
pub const FIRST_SPAWN_SLOT: u8 = 0x0d;

const LAYOUT_HEADER_LEN: usize = 5;
const GRAPHICS_LEN: usize = 7;
const NPC_HEADER_LEN: usize = 5;

/// Where each block was decoded from and how much room it has.
#[derive(Debug, Clone)]
struct Footprint {
    layout: usize,
    layout_len: usize,
    extended: u8,
    graphics: usize,
    entrances: usize,
    entrance_slots: usize,
    exits: usize,
    exit_slots: usize,
    exit_terminator: u8,
    has_pits: bool,
    flags: usize,
    flag_slots: usize,
    pits: Option<(usize, usize)>,
    npc: Option<(usize, usize)>,
    npc_lead: u8,
    checkpoint_byte: u8,
}

#[derive(Debug, Clone)]
pub struct Location {
    pub id: u8,
    pub name: Option<&'static str>,
    pub used: bool,
    pub config: LocationConfig,

    pub bgm: u8,
    layout_width: u8,
    layout_height: u8,
    pub animation: u8,
    /// Row-major `height x width` grid of screen ids.
    pub screens: Vec<Vec<u16>>,

    pub tile_palettes: [u8; 3],
    pub tileset: u8,
    pub tile_effects: u8,
    pub tile_patterns: [u8; 2],

    pub entrances: Vec<Entrance>,
    pub exits: Vec<Exit>,
    pub flags: Vec<Flag>,
    pub pits: Vec<Pit>,

    pub has_spawn_table: bool,
    pub sprite_palettes: [u8; 2],
    pub sprite_patterns: [u8; 2],
    pub spawns: Vec<Spawn>,

    pub checkpoint: bool,
    pub saveable: bool,

    /// Set once the placement planner has moved monsters here.
    pub monsters_moved: bool,

    footprint: Option<Footprint>,
}

impl Location {
    fn unused(id: u8) -> Location {
        Location {
            id,
            name: location_name(id),
            used: false,
            config: LocationConfig::for_location(id),
            bgm: 0,
            layout_width: 0,
            layout_height: 0,
            animation: 0,
            screens: vec![vec![0]],
            tile_palettes: [0; 3],
            tileset: 0,
            tile_effects: 0,
            tile_patterns: [0; 2],
            entrances: Vec::new(),
            exits: Vec::new(),
            flags: Vec::new(),
            pits: Vec::new(),
            has_spawn_table: false,
            sprite_palettes: [0; 2],
            sprite_patterns: [0; 2],
            spawns: Vec::new(),
            checkpoint: false,
            saveable: false,
            monsters_moved: false,
            footprint: None,
        }
    }

    pub fn decode(rom: &Rom, id: u8) -> Result<Location> {
        let mut location = Location::unused(id);
        let base = rom.word(MAP_DATA_POINTERS + 2 * id as usize)? + MAP_DATA_BANK;
        if base <= MAP_DATA_BANK || location.name.is_none() {
            return Ok(location);
        }
        location.used = true;

        let layout = rom.word(base)? + MAP_DATA_BANK;
        let graphics = rom.word(base + 2)? + MAP_DATA_BANK;
        let entrances = rom.word(base + 4)? + MAP_DATA_BANK;
        let exits = rom.word(base + 6)? + MAP_DATA_BANK;
        let flags = rom.word(base + 8)? + MAP_DATA_BANK;

        let mut has_pits = layout != base + 10;
        let mut entrance_len = exits.saturating_sub(entrances);

        let mut addr = exits;
        while rom.byte(addr)? & 0x80 == 0 {
            location.exits.push(Exit::from_bytes(rom.slice(addr, 4)?));
            addr += 4;
        }
        let exit_terminator = rom.byte(addr)?;
        if exit_terminator != 0xff {
            has_pits = exit_terminator & 0x40 != 0;
            entrance_len = ((exit_terminator & 0x1f) as usize) << 2;
        }

        location.bgm = rom.byte(layout)?;
        location.layout_width = rom.byte(layout + 1)?;
        location.layout_height = rom.byte(layout + 2)?;
        location.animation = rom.byte(layout + 3)?;
        let extended = rom.byte(layout + 4)?;
        let page = if extended != 0 { 0x100 } else { 0 };
        let width = location.width();
        let screens = rom.slice(layout + LAYOUT_HEADER_LEN, width * location.height())?;
        location.screens = screens
            .chunks(width)
            .map(|row| row.iter().map(|&s| s as u16 | page).collect())
            .collect();

        let g = rom.slice(graphics, GRAPHICS_LEN)?;
        location.tile_palettes = [g[0], g[1], g[2]];
        location.tileset = g[3];
        location.tile_effects = g[4];
        location.tile_patterns = [g[5], g[6]];

        let entrance_slots = entrance_len / 4;
        for i in 0..entrance_slots {
            location.entrances.push(Entrance::from_bytes(rom.slice(entrances + 4 * i, 4)?));
        }

        location.flags = rom
            .records_until(flags, 2, 0xff)?
            .into_iter()
            .map(Flag::from_bytes)
            .collect();

        let pits = if has_pits {
            let pits = rom.word(base + 10)? + MAP_DATA_BANK;
            location.pits = rom
                .records_until(pits, 4, 0xff)?
                .into_iter()
                .map(Pit::from_bytes)
                .collect();
            Some((pits, location.pits.len()))
        } else {
            None
        };

        let npc_base = rom.word(NPC_DATA_POINTERS + 2 * id as usize)? + NPC_DATA_BANK;
        let mut npc_lead = 0;
        let npc = if npc_base != NPC_DATA_BANK {
            let header = rom.slice(npc_base, NPC_HEADER_LEN)?;
            npc_lead = header[0];
            location.sprite_palettes = [header[1], header[2]];
            location.sprite_patterns = [header[3], header[4]];
            location.spawns = rom
                .records_until(npc_base + NPC_HEADER_LEN, 4, 0xff)?
                .into_iter()
                .map(Spawn::from_bytes)
                .collect();
            location.has_spawn_table = true;
            Some((npc_base, location.spawns.len()))
        } else {
            None
        };

        let checkpoint_byte = rom.byte(CHECKPOINT_TABLE | id as usize)?;
        location.checkpoint = checkpoint_byte & 0x80 != 0;
        location.saveable = checkpoint_byte & 0x01 != 0;

        location.footprint = Some(Footprint {
            layout,
            layout_len: LAYOUT_HEADER_LEN + width * location.height(),
            extended,
            graphics,
            entrances,
            entrance_slots,
            exits,
            exit_slots: location.exits.len(),
            exit_terminator,
            has_pits,
            flags,
            flag_slots: location.flags.len(),
            pits,
            npc,
            npc_lead,
            checkpoint_byte,
        });
        Ok(location)
    }

    /// Writes every block back over its decoded footprint.
    pub fn encode(&self, rom: &mut Rom) -> Result<()> {
        let Some(fp) = &self.footprint else {
            return Ok(());
        };
        if !self.used {
            return Ok(());
        }

        let page = self.map_plane()?;
        let extended = match (page, fp.extended) {
            (0, _) => 0,
            (_, 0) => 0x80,
            (_, original) => original,
        };
        let mut layout = vec![
            self.bgm,
            self.layout_width,
            self.layout_height,
            self.animation,
            extended,
        ];
        layout.extend(self.screens.iter().flatten().map(|&s| s as u8));
        self.check_fits("layout", layout.len(), fp.layout_len)?;
        rom.write(fp.layout, &layout)?;

        let mut graphics = self.tile_palettes.to_vec();
        graphics.push(self.tileset);
        graphics.push(self.tile_effects);
        graphics.extend_from_slice(&self.tile_patterns);
        rom.write(fp.graphics, &graphics)?;

        // Single-row maps cannot address the bottom half of a screen.
        let single_row = self.height() == 1;

        self.check_fits("entrances", self.entrances.len(), fp.entrance_slots)?;
        for (i, entrance) in self.entrances.iter().enumerate() {
            let mut entrance = *entrance;
            if single_row && entrance.y() > 0xbf {
                entrance.set_y(0xbf);
            }
            rom.write(fp.entrances + 4 * i, &entrance.bytes())?;
        }

        self.check_fits("exits", self.exits.len(), fp.exit_slots)?;
        let mut exits = Vec::with_capacity(self.exits.len() * 4 + 1);
        for exit in &self.exits {
            let mut exit = *exit;
            if single_row && exit.yt() > 0x0c {
                exit.set_yt(0x0c);
            }
            exits.extend_from_slice(&exit.bytes());
        }
        exits.push(self.exit_terminator(fp)?);
        rom.write(fp.exits, &exits)?;

        self.check_fits("flags", self.flags.len(), fp.flag_slots)?;
        let mut flags: Vec<u8> = self.flags.iter().flat_map(|f| f.bytes()).collect();
        flags.push(0xff);
        rom.write(fp.flags, &flags)?;

        match fp.pits {
            Some((addr, slots)) => {
                self.check_fits("pits", self.pits.len(), slots)?;
                let mut pits: Vec<u8> = self.pits.iter().flat_map(|p| p.bytes()).collect();
                pits.push(0xff);
                rom.write(addr, &pits)?;
            }
            None => self.check_fits("pits", self.pits.len(), 0)?,
        }

        match fp.npc {
            Some((addr, slots)) => {
                self.check_fits("spawns", self.spawns.len(), slots)?;
                let mut npc = vec![fp.npc_lead];
                npc.extend_from_slice(&self.sprite_palettes);
                npc.extend_from_slice(&self.sprite_patterns);
                npc.extend(self.spawns.iter().flat_map(|s| s.bytes()));
                npc.push(0xff);
                rom.write(addr, &npc)?;
            }
            None => self.check_fits("spawns", self.spawns.len(), 0)?,
        }

        let checkpoint = (fp.checkpoint_byte & 0x7e)
            | if self.checkpoint { 0x80 } else { 0 }
            | if self.saveable { 0x01 } else { 0 };
        rom.write(CHECKPOINT_TABLE | self.id as usize, &[checkpoint])?;
        Ok(())
    }

    fn exit_terminator(&self, fp: &Footprint) -> Result<u8> {
        // A bare $ff means the header already describes the entrances and
        // pits; keep it as long as that stays true.
        if fp.exit_terminator == 0xff && self.entrances.len() == fp.entrance_slots {
            return Ok(0xff);
        }
        if self.entrances.len() > 0x1f {
            return Err(RandomiserError::Overflow { location: self.id, block: "exit terminator" });
        }
        let pits = if fp.has_pits { 0x40 } else { 0 };
        Ok(0x80 | pits | self.entrances.len() as u8)
    }

    fn check_fits(&self, block: &'static str, len: usize, capacity: usize) -> Result<()> {
        if len > capacity {
            return Err(RandomiserError::Overflow { location: self.id, block });
        }
        Ok(())
    }

    fn layout_error(&self, reason: String) -> RandomiserError {
        RandomiserError::Layout { location: self.id, reason }
    }

    pub fn label(&self) -> String {
        format!("${:02x} {}", self.id, self.name.unwrap_or("?"))
    }

    pub fn width(&self) -> usize {
        self.layout_width as usize + 1
    }

    pub fn height(&self) -> usize {
        self.layout_height as usize + 1
    }

    /// Screen id under a full tile id.
    pub fn screen_at(&self, tile: u16) -> u16 {
        self.screens[(tile >> 12) as usize][((tile >> 8) & 0x0f) as usize]
    }

    /// The single screen page ($000 or $100) every screen lives in.
    pub fn map_plane(&self) -> Result<u16> {
        let pages: BTreeSet<u16> = self.screens.iter().flatten().map(|s| s >> 8).collect();
        match pages.len() {
            1 => Ok(pages.into_iter().next().unwrap_or(0)),
            _ => Err(self.layout_error(format!("non-unique screen page {pages:?}"))),
        }
    }

    pub fn all_screens(&self) -> BTreeSet<u16> {
        self.screens.iter().flatten().copied().collect()
    }

    /// Index into the boss-kill tables, if a boss is fought here.
    pub fn boss_id(&self, rom: &Rom) -> Result<Option<usize>> {
        for i in 0..BOSS_KILL_COUNT {
            if rom.byte(BOSS_KILL_LOCATIONS + i)? == self.id {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    pub fn has_dolphin(&self) -> bool {
        matches!(self.id, 0x60 | 0x64 | 0x68)
    }

    pub fn is_tower(&self) -> bool {
        self.id & 0xf8 == 0x58
    }

    /// Spawn by slot number (the first spawn is slot $0d).
    pub fn spawn(&self, slot: u8) -> Result<&Spawn> {
        let index = (slot as usize).wrapping_sub(FIRST_SPAWN_SLOT as usize);
        self.spawns
            .get(index)
            .ok_or_else(|| self.layout_error(format!("expected spawn ${slot:02x}")))
    }

    pub fn spawn_mut(&mut self, slot: u8) -> Result<&mut Spawn> {
        let id = self.id;
        let index = (slot as usize).wrapping_sub(FIRST_SPAWN_SLOT as usize);
        self.spawns.get_mut(index).ok_or_else(|| RandomiserError::Layout {
            location: id,
            reason: format!("expected spawn ${slot:02x}"),
        })
    }

    pub fn find_or_add_entrance(&mut self, screen: u8, coord: u16) -> usize {
        if let Some(i) = self
            .entrances
            .iter()
            .position(|e| e.screen() == screen && e.coord() == coord)
        {
            return i;
        }
        self.entrances.push(Entrance::at(screen, coord));
        self.entrances.len() - 1
    }

    /// Grows (or with negative amounts shrinks) the screen grid on each
    /// side, shifting everything on the map to match.
    pub fn resize_screens(&mut self, top: i32, left: i32, bottom: i32, right: i32, fill: u16) {
        let old_width = self.width() as i32;
        let old_height = self.height() as i32;
        let new_width = old_width + left + right;
        let new_height = old_height + top + bottom;
        self.screens = (0..new_height)
            .map(|y| {
                let y = y - top;
                (0..new_width)
                    .map(|x| {
                        let x = x - left;
                        if y < 0 || x < 0 || y >= old_height || x >= old_width {
                            fill
                        } else {
                            self.screens[y as usize][x as usize]
                        }
                    })
                    .collect()
            })
            .collect();
        self.layout_width = (new_width - 1) as u8;
        self.layout_height = (new_height - 1) as u8;

        for flag in &mut self.flags {
            flag.set_xs((flag.xs() as i32 + left) as u8);
            flag.set_ys((flag.ys() as i32 + top) as u8);
        }
        for pit in &mut self.pits {
            pit.set_from_xs((pit.from_xs() as i32 + left) as u8);
            pit.set_from_ys((pit.from_ys() as i32 + top) as u8);
        }
        for spawn in &mut self.spawns {
            spawn.set_xt((spawn.xt() as i32 + 16 * left) as u8);
            spawn.set_yt((spawn.yt() as i32 + 16 * top) as u8);
        }
        for exit in &mut self.exits {
            exit.set_xt((exit.xt() as i32 + 16 * left) as u8);
            exit.set_yt((exit.yt() as i32 + 16 * top) as u8);
        }
        for entrance in self.entrances.iter_mut().filter(|e| e.used()) {
            entrance.set_x((entrance.x() as i32 + 256 * left) as u16);
            entrance.set_y((entrance.y() as i32 + 256 * top) as u16);
        }
    }

    /// Pastes a block of screens with its top-left corner at `start` (yx).
    pub fn write_screens_2d(&mut self, start: u8, rows: &[&[ScreenPatch]]) -> Result<()> {
        let x0 = (start & 0x0f) as usize;
        let y0 = (start >> 4) as usize;
        for (dy, row) in rows.iter().enumerate() {
            for (dx, patch) in row.iter().enumerate() {
                let (x, y) = (x0 + dx, y0 + dy);
                let screen = match *patch {
                    ScreenPatch::Keep => continue,
                    ScreenPatch::Screen(screen) => screen,
                    ScreenPatch::Flagged(screen) => {
                        self.flags.push(Flag::new((y << 4 | x) as u8, ALWAYS_TRUE_FLAG));
                        screen
                    }
                };
                let id = self.id;
                let cell = self
                    .screens
                    .get_mut(y)
                    .and_then(|r| r.get_mut(x))
                    .ok_or_else(|| RandomiserError::Layout {
                        location: id,
                        reason: format!("screen ({y}, {x}) is outside the map"),
                    })?;
                *cell = screen;
            }
        }
        Ok(())
    }

    /// Joins two maps through matching doorway screens, adding an
    /// entrance on each side and exits that lead to the other.
    /// A negative position (`!pos`) picks the alternate doorway shape.
    pub fn connect(&mut self, pos: i32, that: &mut Location, that_pos: i32) -> Result<()> {
        let (this_pos, this_alt) = split_doorway(pos);
        let (that_pos, that_alt) = split_doorway(that_pos);
        let (this_entrance, this_exits) = self.doorway(this_pos, this_alt)?;
        let (that_entrance, that_exits) = that.doorway(that_pos, that_alt)?;

        let this_index = self.entrances.len() as u8;
        let that_index = that.entrances.len() as u8;
        self.entrances.push(doorway_entrance(this_pos, this_entrance));
        that.entrances.push(doorway_entrance(that_pos, that_entrance));
        for &tile in this_exits {
            self.exits.push(Exit::new(this_pos, tile, that.id, that_index));
        }
        for &tile in that_exits {
            that.exits.push(Exit::new(that_pos, tile, self.id, this_index));
        }
        Ok(())
    }

    fn doorway(&self, pos: u8, alt: u16) -> Result<(u16, &'static [u8])> {
        let (y, x) = ((pos >> 4) as usize, (pos & 0x0f) as usize);
        let screen = self
            .screens
            .get(y)
            .and_then(|r| r.get(x))
            .copied()
            .ok_or_else(|| self.layout_error(format!("doorway ${pos:02x} is outside the map")))?;
        SCREEN_EXITS
            .iter()
            .find(|&&(s, _, _)| s == alt | screen)
            .map(|&(_, entrance, exits)| (entrance, exits))
            .ok_or_else(|| self.layout_error(format!("screen ${screen:02x} has no doorway shape")))
    }

    pub fn move_screen(&mut self, orig: u8, repl: u8) {
        for spawn in self.spawns.iter_mut().filter(|s| s.screen() == orig) {
            spawn.set_screen(repl);
        }
        for exit in self.exits.iter_mut().filter(|e| e.screen() == orig) {
            exit.set_screen(repl);
        }
        for entrance in self.entrances.iter_mut().filter(|e| e.screen() == orig) {
            entrance.set_screen(repl);
        }
    }

    /// Snapshot of which objects sit on which screen, so several screens can
    /// be swapped around without objects following a later move twice.
    pub fn screen_mover(&self) -> ScreenMover {
        let mut by_screen: BTreeMap<u8, Vec<ObjRef>> = BTreeMap::new();
        for (i, spawn) in self.spawns.iter().enumerate() {
            by_screen.entry(spawn.screen()).or_default().push(ObjRef::Spawn(i));
        }
        for (i, exit) in self.exits.iter().enumerate() {
            by_screen.entry(exit.screen()).or_default().push(ObjRef::Exit(i));
        }
        for (i, entrance) in self.entrances.iter().enumerate() {
            by_screen.entry(entrance.screen()).or_default().push(ObjRef::Entrance(i));
        }
        ScreenMover { by_screen }
    }

    /// Location the exit nearest `entrance` leads to.
    pub fn neighbor_for_entrance(&self, entrance: usize) -> Result<u8> {
        let e = self
            .entrances
            .get(entrance)
            .ok_or_else(|| self.layout_error(format!("no entrance {entrance}")))?;
        self.exits
            .iter()
            .filter(|exit| exit.screen() == e.screen())
            .find(|exit| {
                let dx = (exit.x() as i32 - e.x() as i32).abs();
                let dy = (exit.y() as i32 - e.y() as i32).abs();
                dx < 24 && dy < 24
            })
            .map(|exit| exit.dest())
            .ok_or_else(|| self.layout_error(format!("no exit found near entrance {entrance}")))
    }

    /// Multi-line dump for inspection.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Location {}\n", self.label()));
        if !self.used {
            out.push_str("  unused\n");
            return out;
        }
        out.push_str(&format!(
            "  {}x{} bgm {:02x} animation {:02x} tileset {:02x} effects {:02x}\n",
            self.width(),
            self.height(),
            self.bgm,
            self.animation,
            self.tileset,
            self.tile_effects
        ));
        for row in &self.screens {
            let row: Vec<String> = row.iter().map(|s| format!("{s:03x}")).collect();
            out.push_str(&format!("  | {}\n", row.join(" ")));
        }
        for (i, e) in self.entrances.iter().enumerate() {
            let state = if e.used() { "" } else { " (unused)" };
            out.push_str(&format!("  entrance {i}: ({:04x}, {:04x}){state}\n", e.y(), e.x()));
        }
        for e in &self.exits {
            out.push_str(&format!(
                "  exit {:02x}:{:02x} -> ${:02x}:{}\n",
                e.screen(),
                e.tile(),
                e.dest(),
                e.entrance()
            ));
        }
        for f in &self.flags {
            out.push_str(&format!("  flag {:02x} @ {:03x}\n", f.screen(), f.flag()));
        }
        for p in &self.pits {
            out.push_str(&format!(
                "  pit {:02x} -> ${:02x}:{:02x}\n",
                p.from_screen(),
                p.dest(),
                p.to_screen()
            ));
        }
        if self.has_spawn_table {
            out.push_str(&format!(
                "  sprites pal {:02x} {:02x} pat {:02x} {:02x}\n",
                self.sprite_palettes[0],
                self.sprite_palettes[1],
                self.sprite_patterns[0],
                self.sprite_patterns[1]
            ));
        }
        for (i, s) in self.spawns.iter().enumerate() {
            let [b0, b1, b2, b3] = s.bytes();
            out.push_str(&format!(
                "  slot {:02x}: {b0:02x} {b1:02x} {b2:02x} {b3:02x} {:?}{}\n",
                i + FIRST_SPAWN_SLOT as usize,
                s.kind(),
                if s.used() { "" } else { " (unused)" }
            ));
        }
        if !self.config.forced_slots.is_empty() {
            out.push_str(&format!("  pinned pages {:?}\n", self.config.forced_slots.as_array()));
        }
        out
    }
}

/// One cell of a `write_screens_2d` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPatch {
    Keep,
    Screen(u16),
    /// Screen that also gets an always-on flag, so its alternate tiles show.
    Flagged(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjRef {
    Spawn(usize),
    Exit(usize),
    Entrance(usize),
}

pub struct ScreenMover {
    by_screen: BTreeMap<u8, Vec<ObjRef>>,
}

impl ScreenMover {
    pub fn apply(&self, location: &mut Location, orig: u8, repl: u8) {
        let Some(objs) = self.by_screen.get(&orig) else {
            return;
        };
        for obj in objs {
            match *obj {
                ObjRef::Spawn(i) => location.spawns[i].set_screen(repl),
                ObjRef::Exit(i) => location.exits[i].set_screen(repl),
                ObjRef::Entrance(i) => location.entrances[i].set_screen(repl),
            }
        }
    }
}

fn split_doorway(pos: i32) -> (u8, u16) {
    if pos < 0 {
        ((!pos) as u8, 0x100)
    } else {
        (pos as u8, 0)
    }
}

fn doorway_entrance(pos: u8, entrance: u16) -> Entrance {
    let y = ((pos >> 4) as u16) << 8 | entrance >> 8;
    let x = ((pos & 0x0f) as u16) << 8 | (entrance & 0xff);
    Entrance::new(x, y)
}

/// Doorway screens: (screen, entrance yyxx, exit tiles).
const SCREEN_EXITS: &[(u16, u16, &[u8])] = &[
    (0x015, 0x90a0, &[0x89, 0x8a]),
    (0x019, 0x6090, &[0x58, 0x59]),
    (0x096, 0x4030, &[0x32, 0x33]),
    (0x097, 0xaf30, &[0xb2, 0xb3]),
    (0x098, 0x40d0, &[0x3c, 0x3d]),
    (0x099, 0xafd0, &[0xbc, 0xbd]),
    (0x09a, 0x1f80, &[0x27, 0x28]),
    (0x09e, 0xdf80, &[0xe7, 0xe8]),
    (0x0c1, 0x50a0, &[0x49, 0x4a]),
    (0x0c2, 0x60b0, &[0x5a, 0x5b]),
    (0x19a, 0xd080, &[0xc7, 0xc8]),
];

/// Decodes all 256 locations.
pub fn decode_all(rom: &Rom) -> Result<Vec<Location>> {
    (0..LOCATION_COUNT).map(|id| Location::decode(rom, id as u8)).collect()
}
