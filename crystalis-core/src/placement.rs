use std::collections::BTreeSet;

use log::trace;

use crate::location::Location;
use crate::monsters::{MonsterInfo, Placement};
use crate::random::Random;
use crate::reachability::{neighbors, reachable_tiles};
use crate::tiles::TileData;
use crate::Result;

const SWAMP: u8 = 0x1a;
const SWAMP_PLANT_TILE: u8 = 0xf0;

/// Picks spawn tiles for monsters in one location, keeping them clear of
/// the entrances and of each other.
pub struct MonsterPlacer {
    normal: Vec<u16>,
    moths: Vec<u16>,
    birds: Vec<u16>,
    plants: Vec<u16>,
    /// Used entrances in tile units (x, y).
    entrances: Vec<(i32, i32)>,
    /// Earlier placements: (x, y, clearance).
    placed: Vec<(i32, i32, i32)>,
}

impl MonsterPlacer {
    pub fn new(location: &mut Location, tiles: &TileData) -> Result<MonsterPlacer> {
        location.monsters_moved = true;
        let boss = location.config.boss_screen;
        let reachable = reachable_tiles(location, tiles, false)?;
        let terrain_mask = if location.has_dolphin() { 0x25 } else { 0x27 };

        // Breadth-first distance from the reachable area, in discovery order.
        let mut far: Vec<(u16, u32)> = reachable.keys().map(|&t| (t, 0)).collect();
        let mut seen: BTreeSet<u16> = reachable.keys().copied().collect();
        let mut placer = MonsterPlacer {
            normal: Vec::new(),
            moths: Vec::new(),
            birds: Vec::new(),
            plants: Vec::new(),
            entrances: location
                .entrances
                .iter()
                .filter(|e| e.used())
                .map(|e| ((e.x() >> 4) as i32, (e.y() >> 4) as i32))
                .collect(),
            placed: Vec::new(),
        };

        let mut i = 0;
        while i < far.len() {
            let (t, distance) = far[i];
            i += 1;
            let screen = location.screen_at(t);
            if Some(screen) == boss {
                continue;
            }
            for n in neighbors(t, location.width(), location.height()) {
                if seen.insert(n) {
                    far.push((n, distance + 1));
                }
            }
            if distance == 0 && reachable.get(&t).map_or(true, |e| e & terrain_mask == 0) {
                placer.normal.push(t);
            }
            if location.id == SWAMP {
                if tiles.screen(screen)[(t & 0xff) as usize] == SWAMP_PLANT_TILE {
                    placer.plants.push(t);
                }
            } else if (2..=4).contains(&distance) {
                placer.plants.push(t);
            }
            if (3..=7).contains(&distance) {
                placer.moths.push(t);
            }
            if distance >= 12 {
                placer.birds.push(t);
            }
        }
        trace!(
            "{}: {} normal, {} moth, {} bird, {} plant tiles",
            location.label(),
            placer.normal.len(),
            placer.moths.len(),
            placer.birds.len(),
            placer.plants.len()
        );
        Ok(placer)
    }

    /// Chooses a tile (`screen << 8 | tile`) for `monster`. When every
    /// candidate crowds an earlier placement, the one farthest from its
    /// nearest neighbour is used. A tile already taken is never reused.
    pub fn place<R: Random>(&mut self, monster: &MonsterInfo, random: &mut R) -> Option<u16> {
        let r = monster.clearance();
        let mut pool = match monster.placement {
            Placement::Normal => self.normal.clone(),
            Placement::Moth => self.moths.clone(),
            Placement::Bird => self.birds.clone(),
            Placement::Plant => self.plants.clone(),
        };

        let mut fallback: Option<(i32, i32, i32)> = None;
        let mut result = None;
        'pool: while !pool.is_empty() {
            let pos = pool.remove(random.next_int(pool.len()));
            let x = ((pos & 0xf00) >> 4 | (pos & 0xf)) as i32;
            let y = ((pos & 0xf000) >> 8 | (pos & 0xf0) >> 4) as i32;
            for &(x1, y1) in &self.entrances {
                if (y - y1).pow(2) + (x - x1).pow(2) < (r + 1).pow(2) {
                    continue 'pool;
                }
            }
            let mut crowded = false;
            let mut nearest = i32::MAX;
            for &(x1, y1, r1) in &self.placed {
                let z2 = (y - y1).pow(2) + (x - x1).pow(2);
                if z2 == 0 {
                    continue 'pool;
                }
                crowded |= z2 < (r + r1).pow(2);
                nearest = nearest.min(z2);
            }
            if !crowded {
                result = Some((x, y));
                break;
            }
            if fallback.map_or(true, |(_, _, best)| best < nearest) {
                fallback = Some((x, y, nearest));
            }
        }

        let (x, y) = result.or(fallback.map(|(x, y, _)| (x, y)))?;
        self.placed.push((x, y, r));
        let screen = (y & 0xf0) | (x & 0xf0) >> 4;
        let tile = (y & 0x0f) << 4 | (x & 0x0f);
        Some((screen << 8 | tile) as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{MapSpec, RomFixture};
    use crate::monsters::info;
    use crate::random::SeededRandom;
    use crate::tiles::effects;

    const WALL: u8 = 0x40;

    fn walled_east(id: u8) -> (Location, TileData) {
        let mut fixture = RomFixture::new().location(
            id,
            MapSpec { screens: vec![vec![0x80, 0x81]], ..MapSpec::default() },
        );
        fixture.effect(0xb3, WALL, effects::BLOCKS_WALKING);
        fixture.screen(0x81, |tiles| tiles.fill(WALL));
        let rom = fixture.rom();
        (Location::decode(&rom, id).unwrap(), TileData::load(&rom).unwrap())
    }

    fn tile_xy(pos: u16) -> (i32, i32) {
        let x = ((pos & 0xf00) >> 4 | (pos & 0xf)) as i32;
        let y = ((pos & 0xf000) >> 8 | (pos & 0xf0) >> 4) as i32;
        (x, y)
    }

    #[test]
    fn walkers_keep_clear_of_entrances_and_each_other() {
        let (mut loc, tiles) = walled_east(0x18);
        let mut placer = MonsterPlacer::new(&mut loc, &tiles).unwrap();
        assert!(loc.monsters_moved);

        let slime = info(0x50).unwrap();
        let mut random = SeededRandom::new(3);
        let mut spots = Vec::new();
        for _ in 0..4 {
            let pos = placer.place(slime, &mut random).unwrap();
            assert_eq!(pos >> 8, 0x00, "walker placed behind the wall");
            let (x, y) = tile_xy(pos);
            // entrance is at tile (8, 4)
            assert!((x - 8).pow(2) + (y - 4).pow(2) >= 16);
            spots.push((x, y));
        }
        for (i, a) in spots.iter().enumerate() {
            for b in &spots[i + 1..] {
                assert_ne!(a, b);
                assert!((a.0 - b.0).pow(2) + (a.1 - b.1).pow(2) >= 36);
            }
        }
    }

    #[test]
    fn fliers_use_distance_bands() {
        let (mut loc, tiles) = walled_east(0x18);
        let mut placer = MonsterPlacer::new(&mut loc, &tiles).unwrap();
        let mut random = SeededRandom::new(11);

        let bird = placer.place(info(0x6f).unwrap(), &mut random).unwrap();
        assert_eq!(bird >> 8, 0x01);
        assert!(bird & 0x0f >= 11);

        let moth = placer.place(info(0x7c).unwrap(), &mut random).unwrap();
        assert_eq!(moth >> 8, 0x01);
        assert!((2..=6).contains(&(moth & 0x0f)));

        let plant = placer.place(info(0x5d).unwrap(), &mut random).unwrap();
        assert_eq!(plant >> 8, 0x01);
        assert!((1..=3).contains(&(plant & 0x0f)));
    }

    fn bare_placer(normal: Vec<u16>, placed: Vec<(i32, i32, i32)>) -> MonsterPlacer {
        MonsterPlacer {
            normal,
            moths: Vec::new(),
            birds: Vec::new(),
            plants: Vec::new(),
            entrances: Vec::new(),
            placed,
        }
    }

    #[test]
    fn crowded_tiles_are_never_stacked() {
        let mut placer = bare_placer(vec![0x0044, 0x0045], Vec::new());
        let slime = info(0x50).unwrap();
        let mut random = SeededRandom::new(1);
        let first = placer.place(slime, &mut random).unwrap();
        let second = placer.place(slime, &mut random).unwrap();
        assert_ne!(first, second);
        assert_eq!(placer.place(slime, &mut random), None);
    }

    #[test]
    fn fallback_maximises_distance_to_the_nearest_monster() {
        // slimes already at (0, 0) and (8, 0); x = 4 sits midway
        let slime = info(0x50).unwrap();
        for seed in 0..8 {
            let mut placer =
                bare_placer(vec![0x0003, 0x0004, 0x0005], vec![(0, 0, 3), (8, 0, 3)]);
            let pos = placer.place(slime, &mut SeededRandom::new(seed)).unwrap();
            assert_eq!(pos, 0x0004, "seed {seed}");
        }
    }

    #[test]
    fn open_maps_have_no_bird_space() {
        let rom = RomFixture::new().location(0x18, MapSpec::default()).rom();
        let tiles = TileData::load(&rom).unwrap();
        let mut loc = Location::decode(&rom, 0x18).unwrap();
        let mut placer = MonsterPlacer::new(&mut loc, &tiles).unwrap();
        assert_eq!(placer.place(info(0x6f).unwrap(), &mut SeededRandom::new(1)), None);
    }

    #[test]
    fn boss_screens_are_left_empty() {
        let spec = MapSpec {
            screens: vec![vec![0x91, 0x80]],
            entrances: vec![[0x80, 0x01, 0x40, 0x00]],
            ..MapSpec::default()
        };
        let rom = RomFixture::new().location(0x0a, spec).rom();
        let tiles = TileData::load(&rom).unwrap();
        let mut loc = Location::decode(&rom, 0x0a).unwrap();
        assert_eq!(loc.config.boss_screen, Some(0x91));
        let mut placer = MonsterPlacer::new(&mut loc, &tiles).unwrap();
        let mut random = SeededRandom::new(5);
        for _ in 0..8 {
            let pos = placer.place(info(0x50).unwrap(), &mut random).unwrap();
            assert_eq!(pos >> 8, 0x01);
        }
    }
}
