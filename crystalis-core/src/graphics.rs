use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use crate::constraint::Constraint;
use crate::location::Location;
use crate::monsters::{self, Palettes};
use crate::random::Random;
use crate::tables::Spawn;
use crate::{RandomiserError, Result};

/// What the shuffle needs to know about sprite graphics.
pub trait GraphicsOracle {
    /// Constraint for putting `monster` in `location`, including the coin
    /// sprite when the monster drops gold outside the tower.
    fn monster_constraint(&self, location: u8, monster: u8) -> Constraint;

    fn npc_constraint(&self, location: u8, npc: u8) -> Result<Constraint>;

    /// Sets the spawn's pattern bank to match the location's pages.
    fn configure(&self, location: &Location, spawn: &mut Spawn) -> Result<()>;

    fn shuffle_palettes<R: Random>(&mut self, random: &mut R);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ObjectKey {
    Monster(u8),
    Npc(u8),
}

/// Oracle built from where each object already appears: an object's
/// constraint is the join of the pages and palettes it is seen with.
#[derive(Debug, Clone, Default)]
pub struct Graphics {
    monsters: BTreeMap<u8, Constraint>,
    npcs: BTreeMap<u8, Constraint>,
    all_sprite_palettes: BTreeSet<u8>,
}

/// Monster sprites only draw from the first sprite bank, so the spawn's
/// pattern-bank bit can move them into the second.
const MONSTER_PATTERNS: &[u8] = &[2];
const NPC_PATTERNS: &[u8] = &[2];

impl Graphics {
    /// `locations` must be indexed by location id.
    pub fn build(locations: &[Location]) -> Result<Graphics> {
        let mut seen: BTreeMap<ObjectKey, Vec<(u8, Spawn)>> = BTreeMap::new();
        for location in locations.iter().filter(|l| l.used) {
            for spawn in location.spawns.iter().filter(|s| s.used()) {
                let key = if spawn.is_monster() {
                    ObjectKey::Monster(spawn.monster_id())
                } else if spawn.is_npc() || spawn.is_boss() {
                    ObjectKey::Npc(spawn.id())
                } else {
                    continue;
                };
                seen.entry(key).or_default().push((location.id, *spawn));
            }
        }

        let mut graphics = Graphics::default();
        for (key, spawns) in &seen {
            match *key {
                ObjectKey::Npc(id) => {
                    let mut constraint = graphics.observe(locations, spawns, &[], NPC_PATTERNS)?;
                    // Tornel on Mt Sabre borrows whatever palette is loaded.
                    if id == 0x5f {
                        constraint = constraint.ignore_palette();
                    }
                    graphics.npcs.insert(id, constraint);
                }
                ObjectKey::Monster(id) => {
                    let palettes: &[u8] = match monsters::info(id).map(|m| m.palettes) {
                        Some(Palettes::Both) => &[2, 3],
                        _ => &[3],
                    };
                    let constraint = graphics.observe(locations, spawns, palettes, MONSTER_PATTERNS)?;
                    graphics.monsters.insert(id, constraint);
                }
            }
        }
        debug!(
            "graphics: {} monsters, {} npcs, {} sprite palettes",
            graphics.monsters.len(),
            graphics.npcs.len(),
            graphics.all_sprite_palettes.len()
        );
        Ok(graphics)
    }

    fn observe(
        &mut self,
        locations: &[Location],
        spawns: &[(u8, Spawn)],
        palettes: &[u8],
        patterns: &[u8],
    ) -> Result<Constraint> {
        let shiftable = patterns == [2];
        // One observation per location and shift; the last spawn wins.
        let mut by_location: BTreeMap<(u8, bool), Spawn> = BTreeMap::new();
        for (id, spawn) in spawns {
            by_location.insert((*id, spawn.pattern_bank() != 0 && shiftable), *spawn);
        }

        let mut child: Option<Constraint> = None;
        for ((id, _), spawn) in &by_location {
            let location = locations.get(*id as usize).ok_or_else(|| {
                RandomiserError::Graphics(format!("location ${id:02x} was not loaded"))
            })?;
            for &pal in palettes.iter().filter(|&&p| p > 1) {
                self.all_sprite_palettes
                    .insert(location.sprite_palettes[(pal - 2) as usize]);
            }
            let c = Constraint::from_spawn(
                palettes,
                patterns,
                location.sprite_palettes,
                location.sprite_patterns,
                spawn.pattern_bank(),
                shiftable,
            );
            let mut joined = match child {
                Some(prev) => prev.join(&c)?,
                None => c,
            };
            if !shiftable && spawn.pattern_bank() != 0 {
                joined = joined.shifted();
            }
            child = Some(joined);
        }
        child.ok_or_else(|| RandomiserError::Graphics("object was never spawned".to_string()))
    }

    pub fn all_sprite_palettes(&self) -> &BTreeSet<u8> {
        &self.all_sprite_palettes
    }
}

impl GraphicsOracle for Graphics {
    fn monster_constraint(&self, location: u8, monster: u8) -> Constraint {
        let c = self.monsters.get(&monster).cloned().unwrap_or_else(Constraint::none);
        if location & 0x58 == 0x58 {
            return c;
        }
        if !monsters::info(monster).is_some_and(|m| m.coins) {
            return c;
        }
        c.try_meet(&Constraint::coin(), false).unwrap_or_else(Constraint::none)
    }

    fn npc_constraint(&self, location: u8, npc: u8) -> Result<Constraint> {
        let c = self.npcs.get(&npc).cloned().unwrap_or_else(Constraint::none);
        match (location, npc) {
            (0x1e, 0x60) => c.meet(&Constraint::stom_fight(), false),
            (0xa0, 0xc9) => c.meet(&Constraint::guardian_statue(), false),
            _ => Ok(c),
        }
    }

    fn configure(&self, location: &Location, spawn: &mut Spawn) -> Result<()> {
        if !spawn.used() {
            return Ok(());
        }
        let c = if spawn.is_monster() {
            self.monsters.get(&spawn.monster_id()).cloned()
        } else if spawn.is_npc() {
            self.npcs.get(&spawn.id()).cloned()
        } else if spawn.is_chest() {
            Some(if spawn.id() < 0x70 { Constraint::treasure_chest() } else { Constraint::mimic() })
        } else {
            None
        };
        let Some(c) = c else {
            return Ok(());
        };

        if c.shift == 3 || c.float.len() >= 2 {
            return Err(RandomiserError::Graphics(format!(
                "{}: cannot pick a pattern bank for {c}",
                location.label()
            )));
        }
        match c.float.first() {
            None => spawn.set_pattern_bank(u8::from(c.shift == 2)),
            Some(f) if f.contains(location.sprite_patterns[0]) => spawn.set_pattern_bank(0),
            Some(f) if f.contains(location.sprite_patterns[1]) => spawn.set_pattern_bank(1),
            Some(_) if spawn.is_monster() => warn!(
                "{}: no pattern bank holds monster {:02x}",
                location.label(),
                spawn.monster_id()
            ),
            Some(_) => {}
        }
        Ok(())
    }

    fn shuffle_palettes<R: Random>(&mut self, random: &mut R) {
        let palettes: Vec<u8> = self.all_sprite_palettes.iter().copied().collect();
        for c in self.monsters.values_mut().chain(self.npcs.values_mut()) {
            *c = c.shuffle_palette(random, &palettes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::CSet;
    use crate::fixtures::{MapSpec, RomFixture};
    use crate::location::decode_all;

    fn spec(pages: [u8; 2], pal3: u8, spawns: Vec<[u8; 4]>) -> MapSpec {
        MapSpec {
            npc_header: [0x00, 0x10, pal3, pages[0], pages[1]],
            spawns: Some(spawns),
            ..MapSpec::default()
        }
    }

    fn locations() -> Vec<Location> {
        let rom = RomFixture::new()
            // slime in bank 0 over page $50
            .location(0x14, spec([0x50, 0x60], 0x20, vec![[0x04, 0x08, 0x00, 0x00]]))
            // slime shifted into bank 1 over page $52, plus an npc
            .location(0x15, spec([0x61, 0x52], 0x21, vec![
                [0x04, 0x08, 0x80, 0x00],
                [0x06, 0x08, 0x01, 0x20],
            ]))
            // a soldier using both palettes, inside the tower
            .location(0x58, spec([0x54, 0x55], 0x22, vec![[0x04, 0x08, 0x00, 0x14]]))
            .rom();
        decode_all(&rom).unwrap()
    }

    #[test]
    fn monster_constraint_joins_every_sighting() {
        let graphics = Graphics::build(&locations()).unwrap();
        let slime = &graphics.monsters[&0x50];
        assert_eq!(slime.float, vec![CSet::of(&[0x50, 0x52])]);
        assert_eq!(slime.fixed[3], CSet::of(&[0x20, 0x21]));
        assert!(slime.fixed[2].is_all());

        let soldier = &graphics.monsters[&0x64];
        assert_eq!(soldier.fixed[2], CSet::one(0x10));
        assert_eq!(soldier.fixed[3], CSet::one(0x22));
        assert_eq!(
            graphics.all_sprite_palettes().iter().copied().collect::<Vec<_>>(),
            vec![0x10, 0x20, 0x21, 0x22]
        );
    }

    #[test]
    fn coins_are_added_outside_the_tower() {
        let graphics = Graphics::build(&locations()).unwrap();
        let outside = graphics.monster_constraint(0x14, 0x50);
        // the coin sprite claims a pattern bank
        assert_ne!(outside, graphics.monsters[&0x50]);
        assert_eq!(graphics.monster_constraint(0x58, 0x50), graphics.monsters[&0x50]);
        // unseen monsters cannot go anywhere
        assert_eq!(graphics.monster_constraint(0x58, 0x99), Constraint::none());
    }

    #[test]
    fn npc_overrides() {
        let graphics = Graphics::build(&locations()).unwrap();
        let npc = graphics.npc_constraint(0x15, 0x20).unwrap();
        assert!(npc.fixed[3].is_all());
        assert_eq!(npc.float, vec![CSet::one(0x61)]);
        assert!(graphics.npc_constraint(0x1e, 0x60).is_err());
    }

    #[test]
    fn configure_follows_the_float() {
        let locations = locations();
        let graphics = Graphics::build(&locations).unwrap();
        let loc = &locations[0x15];
        let mut slime = loc.spawns[0];
        slime.set_pattern_bank(0);
        graphics.configure(loc, &mut slime).unwrap();
        assert_eq!(slime.pattern_bank(), 1);

        let mut chest = Spawn::from_bytes(&[0x04, 0x08, 0x02, 0x71]);
        graphics.configure(loc, &mut chest).unwrap();
        assert_eq!(chest.pattern_bank(), 1);
    }

    #[test]
    fn shuffled_palettes_come_from_the_pool() {
        let mut graphics = Graphics::build(&locations()).unwrap();
        let pool = graphics.all_sprite_palettes().clone();
        graphics.shuffle_palettes(&mut crate::random::SeededRandom::new(9));
        match &graphics.monsters[&0x50].fixed[3] {
            CSet::Set(pages) => assert!(!pages.is_empty() && pages.is_subset(&pool)),
            CSet::All => panic!("palette became unbounded"),
        }
    }
}
