//! Cross-location monster shuffle.
//!
//! Every shuffle-eligible monster spawn is pulled into one pool, then each
//! location (in random order) is refilled from the pool subject to the
//! sprite pages and palettes it can load at once.

use std::collections::BTreeMap;

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::constraint::Constraint;
use crate::graphics::GraphicsOracle;
use crate::location::{Location, FIRST_SPAWN_SLOT};
use crate::monsters::{self, FLYERS};
use crate::placement::MonsterPlacer;
use crate::random::Random;
use crate::tables::{Spawn, SpawnKind};
use crate::tiles::TileData;
use crate::{RandomiserError, Result};

/// Flyers are only looked for this far into the pool.
const FLYER_SCAN: usize = 40;

/// Sleeping Kensu leaves a chest behind.
const KENSU_NPCS: [u8; 2] = [0x68, 0x6b];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShuffleOptions {
    pub shuffle_tower_monsters: bool,
    pub shuffle_sprite_palettes: bool,
    /// Let the placement planner move monsters to new tiles.
    pub randomize_maps: bool,
}

/// A monster taken out of a location, with the pages it was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonsterRequirement {
    pub id: u8,
    pub pat: u8,
    pub pal2: Option<u8>,
    pub pal3: Option<u8>,
    pub pattern_bank: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[default]
    Unprocessed,
    Constrained,
    Filling,
    Fixed,
    /// Fixed, but some slots could not be filled and were switched off.
    Disabled,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationReport {
    pub name: String,
    pub phase: Phase,
    pub lines: Vec<String>,
    pub unfilled: usize,
    /// Fixed requirements (chests, npcs, walls) that clashed with the ones
    /// folded before them and were left out.
    pub conflicts: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ShuffleReport {
    pub pre_shuffle_locations: Vec<u8>,
    pub pre_shuffle_monsters: Vec<u8>,
    pub post_shuffle_locations: Vec<u8>,
    pub post_shuffle_monsters: Vec<u8>,
    /// Keyed `$xx` by location id.
    pub locations: BTreeMap<String, LocationReport>,
    /// Monster id to the locations it started in.
    pub start: BTreeMap<String, Vec<String>>,
    /// Monster id to the locations it was placed in.
    pub placed: BTreeMap<String, Vec<String>>,
}

impl ShuffleReport {
    pub fn unfilled(&self) -> usize {
        self.locations.values().map(|l| l.unfilled).sum()
    }

    /// Human-readable spoiler lines.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (key, location) in &self.locations {
            if location.phase == Phase::Unprocessed {
                continue;
            }
            out.push(format!("{key} {} [{:?}]", location.name, location.phase));
            if location.conflicts > 0 {
                out.push(format!("  {} fixed objects left unsatisfied", location.conflicts));
            }
            out.extend(location.lines.iter().cloned());
        }
        for (monster, locations) in &self.placed {
            out.push(format!("monster {monster}: {}", locations.join(" ")));
        }
        out
    }
}

struct PendingLocation {
    id: u8,
    slots: Vec<u8>,
}

pub struct MonsterPool {
    options: ShuffleOptions,
    monsters: Vec<MonsterRequirement>,
    /// Non-flyers already placed once; reused when nothing else fits.
    used: Vec<MonsterRequirement>,
    locations: Vec<PendingLocation>,
    report: ShuffleReport,
}

impl MonsterPool {
    pub fn new(options: ShuffleOptions) -> MonsterPool {
        MonsterPool {
            options,
            monsters: Vec::new(),
            used: Vec::new(),
            locations: Vec::new(),
            report: ShuffleReport::default(),
        }
    }

    /// Takes the location's eligible monsters into the pool and remembers
    /// which slots they leave open.
    pub fn populate(&mut self, location: &Location) {
        let config = &location.config;
        let skip = config.skip
            || (config.tower && !self.options.shuffle_tower_monsters)
            || !location.has_spawn_table;

        let mut found = Vec::new();
        let mut slots = Vec::new();
        if !skip {
            for (i, spawn) in location.spawns.iter().enumerate() {
                if !spawn.used() || !spawn.is_monster() {
                    continue;
                }
                let id = spawn.monster_id();
                let Some(info) = monsters::info(id) else {
                    continue;
                };
                let bank = spawn.pattern_bank();
                found.push(MonsterRequirement {
                    id,
                    pat: location.sprite_patterns[bank as usize],
                    pal2: info.uses_pal2().then_some(location.sprite_palettes[0]),
                    pal3: Some(location.sprite_palettes[1]),
                    pattern_bank: bank,
                });
                self.report
                    .start
                    .entry(format!("{id:02x}"))
                    .or_default()
                    .push(format!("${:02x}", location.id));
                slots.push(FIRST_SPAWN_SLOT + i as u8);
            }
        }
        if found.is_empty() || config.skip {
            slots.clear();
        }
        self.locations.push(PendingLocation { id: location.id, slots });
        self.monsters.extend(found);
    }

    pub fn shuffle<G: GraphicsOracle, R: Random>(
        &mut self,
        locations: &mut [Location],
        tiles: &TileData,
        graphics: &G,
        random: &mut R,
    ) -> Result<()> {
        self.report.pre_shuffle_locations = self.locations.iter().map(|l| l.id).collect();
        self.report.pre_shuffle_monsters = self.monsters.iter().map(|m| m.id).collect();
        random.shuffle(&mut self.locations);
        random.shuffle(&mut self.monsters);
        self.report.post_shuffle_locations = self.locations.iter().map(|l| l.id).collect();
        self.report.post_shuffle_monsters = self.monsters.iter().map(|m| m.id).collect();

        while let Some(pending) = self.locations.pop() {
            let location = locations.get_mut(pending.id as usize).ok_or_else(|| {
                RandomiserError::Layout {
                    location: pending.id,
                    reason: "location was not loaded".to_string(),
                }
            })?;
            let mut report = LocationReport { name: location.label(), ..LocationReport::default() };
            if !location.config.tower {
                self.fill(location, pending.slots, tiles, graphics, random, &mut report)?;
            }
            self.report.locations.insert(format!("${:02x}", pending.id), report);
        }
        Ok(())
    }

    fn fill<G: GraphicsOracle, R: Random>(
        &mut self,
        location: &mut Location,
        slots: Vec<u8>,
        tiles: &TileData,
        graphics: &G,
        random: &mut R,
        report: &mut LocationReport,
    ) -> Result<()> {
        let (constraint, conflicts) = initial_constraint(location, graphics)?;
        report.lines.push(format!("Initial pass: {constraint}"));
        report.conflicts = conflicts;
        report.phase = Phase::Constrained;

        let placer = if location.monsters_moved || (!slots.is_empty() && self.options.randomize_maps) {
            Some(MonsterPlacer::new(location, tiles)?)
        } else {
            None
        };
        let mut filler = Filler {
            flyers: location.config.max_flyers,
            location: &mut *location,
            graphics,
            options: self.options,
            constraint,
            slots,
            classes: BTreeMap::new(),
            placer,
            lines: Vec::new(),
            added: Vec::new(),
        };
        report.phase = Phase::Filling;

        if filler.flyers > 0 && !filler.slots.is_empty() {
            let mut i = 0;
            while i < self.monsters.len().min(FLYER_SCAN) {
                let m = self.monsters[i];
                if FLYERS.contains(&m.id) && filler.try_add(m, random)? {
                    self.monsters.remove(i);
                }
                i += 1;
            }
        }

        let mut i = 0;
        while i < self.monsters.len() && !filler.slots.is_empty() {
            if filler.try_add(self.monsters[i], random)? {
                let m = self.monsters.remove(i);
                if !FLYERS.contains(&m.id) {
                    self.used.push(m);
                }
            } else {
                i += 1;
            }
        }

        let mut i = 0;
        while i < self.used.len() && !filler.slots.is_empty() {
            if filler.try_add(self.used[i], random)? {
                let m = self.used.remove(i);
                self.used.push(m);
            } else {
                i += 1;
            }
        }

        let (constraint, slots, lines, added) = filler.finish();
        report.lines.extend(lines);
        for id in added {
            self.report
                .placed
                .entry(format!("{id:02x}"))
                .or_default()
                .push(format!("${:02x}", location.id));
        }

        constraint.fix(location, random);
        report.phase = Phase::Fixed;

        if !slots.is_empty() {
            error!(
                "Failed to fill location {}: {} remaining",
                location.label(),
                slots.len()
            );
            for &slot in &slots {
                location.spawn_mut(slot)?.disable();
            }
            report.unfilled = slots.len();
            report.phase = Phase::Disabled;
        }

        for i in 0..location.spawns.len() {
            let mut spawn = location.spawns[i];
            graphics.configure(location, &mut spawn)?;
            location.spawns[i] = spawn;
        }
        Ok(())
    }

    pub fn into_report(self) -> ShuffleReport {
        self.report
    }
}

/// Constraint imposed by everything in the location that is not being
/// shuffled, and how many of those requirements could not be met.
fn initial_constraint<G: GraphicsOracle>(
    location: &Location,
    graphics: &G,
) -> Result<(Constraint, usize)> {
    let mut constraint = Constraint::for_location(&location.config.start_slots);
    let mut conflicts = 0;
    let mut require = |constraint: &mut Constraint, c: &Constraint, spawn: &Spawn| {
        if !fold(constraint, c, location, spawn) {
            conflicts += 1;
        }
    };
    for spawn in location.spawns.iter().filter(|s| s.used()) {
        match spawn.kind() {
            SpawnKind::Chest { invisible: false } => {
                let chest = if spawn.id() < 0x70 {
                    Constraint::treasure_chest()
                } else {
                    Constraint::mimic()
                };
                require(&mut constraint, &chest, spawn);
            }
            SpawnKind::Npc | SpawnKind::Boss => {
                let npc = graphics.npc_constraint(location.id, spawn.id())?;
                require(&mut constraint, &npc, spawn);
                if spawn.is_npc() && KENSU_NPCS.contains(&spawn.id()) {
                    require(&mut constraint, &Constraint::kensu_chest(), spawn);
                }
            }
            SpawnKind::Monster if monsters::is_untouched(spawn.monster_id()) => {
                let c = graphics.monster_constraint(location.id, spawn.monster_id());
                require(&mut constraint, &c, spawn);
            }
            _ if spawn.is_shooting_wall(location.id) => {
                require(&mut constraint, &Constraint::shooting_wall(), spawn);
            }
            _ => {}
        }
    }
    Ok((constraint, conflicts))
}

fn fold(constraint: &mut Constraint, c: &Constraint, location: &Location, spawn: &Spawn) -> bool {
    match constraint.try_meet(c, true) {
        Some(meet) => {
            *constraint = meet;
            true
        }
        None => {
            error!(
                "{}: {:?} {:02x} does not fit {constraint}",
                location.label(),
                spawn.kind(),
                spawn.id()
            );
            false
        }
    }
}

/// Per-location state while slots are being filled.
struct Filler<'a, G> {
    location: &'a mut Location,
    graphics: &'a G,
    options: ShuffleOptions,
    constraint: Constraint,
    slots: Vec<u8>,
    flyers: u8,
    /// Class name to the one monster id representing it here.
    classes: BTreeMap<&'static str, u8>,
    placer: Option<MonsterPlacer>,
    lines: Vec<String>,
    added: Vec<u8>,
}

impl<G: GraphicsOracle> Filler<'_, G> {
    fn finish(self) -> (Constraint, Vec<u8>, Vec<String>, Vec<u8>) {
        (self.constraint, self.slots, self.lines, self.added)
    }

    fn try_add<R: Random>(&mut self, m: MonsterRequirement, random: &mut R) -> Result<bool> {
        if self.slots.is_empty() {
            return Ok(false);
        }
        let Some(info) = monsters::info(m.id) else {
            return Ok(false);
        };
        if let Some(class) = info.class {
            if self.classes.get(class).is_some_and(|&rep| rep != m.id) {
                return Ok(false);
            }
        }
        let flyer = info.is_flyer();
        if flyer && self.flyers == 0 {
            return Ok(false);
        }

        let c = self.graphics.monster_constraint(self.location.id, m.id);
        let mut meet = self.constraint.try_meet(&c, false);
        let palettes_bounded = !self.constraint.fixed[2].is_all() && !self.constraint.fixed[3].is_all();
        if meet.is_none() && palettes_bounded && self.options.shuffle_sprite_palettes {
            meet = self.constraint.try_meet(&c, true);
        }
        let Some(meet) = meet else {
            return Ok(false);
        };

        let pos = match &mut self.placer {
            Some(placer) => match placer.place(info, random) {
                Some(pos) => Some(pos),
                None => return Ok(false),
            },
            None => None,
        };

        if flyer {
            self.flyers -= 1;
        }
        self.lines.push(format!("  Adding {:02x}: {meet}", m.id));
        self.constraint = meet;
        if let Some(class) = info.class {
            self.classes.insert(class, m.id);
        }

        let non_flyers = &self.location.config.non_flyers;
        let eligible = if flyer || info.is_moth() {
            self.slots.iter().position(|s| non_flyers.contains_key(s))
        } else {
            self.slots.iter().position(|s| !non_flyers.contains_key(s))
        }
        .unwrap_or(0);
        let slot = self.slots[eligible];
        let nudge = non_flyers.get(&slot).copied();

        let spawn = self.location.spawn_mut(slot)?;
        if flyer {
            // Off-screen; the game drops it in at a random spot.
            spawn.set_yt(0xfd);
            spawn.set_xt(0x7f);
            spawn.set_timed(true);
        } else if let Some(pos) = pos {
            spawn.set_screen((pos >> 8) as u8);
            spawn.set_tile(pos as u8);
        } else if let Some((dy, dx)) = nudge {
            spawn.set_y((spawn.y() as i32 + 16 * dy as i32) as u16);
            spawn.set_x((spawn.x() as i32 + 16 * dx as i32) as u16);
        }
        spawn.set_monster_id(m.id);
        let [b0, b1, b2, b3] = spawn.bytes();
        let line = format!("    slot {slot:02x}: {b0:02x} {b1:02x} {b2:02x} {b3:02x}");
        debug!("{} {}", self.location.label(), line.trim_start());
        self.lines.push(line);

        self.added.push(m.id);
        self.slots.remove(eligible);
        Ok(true)
    }
}

/// Runs the whole monster pass over `locations` (indexed by id).
pub fn shuffle_monsters<G: GraphicsOracle, R: Random>(
    locations: &mut [Location],
    tiles: &TileData,
    graphics: &mut G,
    options: ShuffleOptions,
    random: &mut R,
) -> Result<ShuffleReport> {
    if options.shuffle_sprite_palettes {
        graphics.shuffle_palettes(random);
    }
    let mut pool = MonsterPool::new(options);
    for location in locations.iter().filter(|l| l.used) {
        pool.populate(location);
    }
    info!(
        "Shuffling {} monsters across {} locations",
        pool.monsters.len(),
        pool.locations.iter().filter(|l| !l.slots.is_empty()).count()
    );
    pool.shuffle(locations, tiles, graphics, random)?;
    let report = pool.into_report();
    if report.unfilled() > 0 {
        warn!("{} monster slots left empty", report.unfilled());
    }
    Ok(report)
}
