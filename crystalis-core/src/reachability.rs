use std::collections::{BTreeMap, BTreeSet};

use crate::location::Location;
use crate::tiles::{effects, TileData, TILES_PER_SCREEN};
use crate::Result;

/// Disjoint sets over full tile ids.
#[derive(Debug, Default)]
pub struct UnionFind {
    parent: BTreeMap<u16, u16>,
}

impl UnionFind {
    pub fn new() -> UnionFind {
        UnionFind::default()
    }

    pub fn find(&mut self, x: u16) -> u16 {
        let parent = *self.parent.entry(x).or_insert(x);
        if parent == x {
            return x;
        }
        let root = self.find(parent);
        self.parent.insert(x, root);
        root
    }

    pub fn union(&mut self, a: u16, b: u16) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent.insert(rb, ra);
        }
    }

    /// Members of the set holding `x`; empty if `x` was never unioned.
    pub fn set_of(&mut self, x: u16) -> BTreeSet<u16> {
        if !self.parent.contains_key(&x) {
            return BTreeSet::new();
        }
        let root = self.find(x);
        let keys: Vec<u16> = self.parent.keys().copied().collect();
        keys.into_iter().filter(|&k| self.find(k) == root).collect()
    }
}

/// Tiles a player can reach from any used entrance, mapped to each tile's
/// terrain byte. Maps with the dolphin are always walked as if flying.
pub fn reachable_tiles(
    location: &Location,
    tiles: &TileData,
    fly: bool,
) -> Result<BTreeMap<u16, u8>> {
    location.map_plane()?;
    let fly = fly || location.has_dolphin();
    let mask = if fly { effects::BLOCKS_FLYING } else { effects::BLOCKS_WALKING };
    let exits: BTreeSet<u16> = location.exits.iter().map(|e| e.tile_id()).collect();
    let flagged: BTreeSet<u8> = location.flags.iter().map(|f| f.screen()).collect();

    let mut passable = BTreeSet::new();
    for (y, row) in location.screens.iter().enumerate() {
        for (x, &screen) in row.iter().enumerate() {
            let pos = (y << 4 | x) as u16;
            let screen_tiles = tiles.screen(screen);
            let flagged = flagged.contains(&(pos as u8));
            for t in 0..TILES_PER_SCREEN {
                let tile_id = pos << 8 | t as u16;
                if exits.contains(&tile_id) {
                    continue;
                }
                let mut tile = screen_tiles[t];
                let mut blocked = tiles.effect(location.tile_effects, tile) & mask != 0;
                let alternate = tiles.alternate(location.tileset, tile);
                if flagged && blocked && tile < 0x20 && alternate != tile {
                    tile = alternate;
                    blocked = tiles.effect(location.tile_effects, tile) & mask != 0;
                }
                if !blocked {
                    passable.insert(tile_id);
                }
            }
        }
    }

    let mut uf = UnionFind::new();
    for &t in &passable {
        let right = if t & 0x0f == 0x0f { t.wrapping_add(0xf1) } else { t + 1 };
        if passable.contains(&right) {
            uf.union(t, right);
        }
        let below = if t & 0xf0 == 0xe0 { t.wrapping_add(0xf20) } else { t + 16 };
        if passable.contains(&below) {
            uf.union(t, below);
        }
    }

    let mut out = BTreeMap::new();
    for entrance in location.entrances.iter().filter(|e| e.used()) {
        for t in uf.set_of(entrance.tile_id()) {
            let screen = tiles.screen(location.screen_at(t));
            let effect = tiles.effect(location.tile_effects, screen[(t & 0xff) as usize]);
            out.insert(t, effect);
        }
    }
    Ok(out)
}

/// Orthogonal neighbours of a full tile id inside a `width x height` map,
/// in the order down, up, right, left.
pub fn neighbors(tile: u16, width: usize, height: usize) -> Vec<u16> {
    let mut out = Vec::with_capacity(4);
    let y = tile & 0xf0f0;
    let x = tile & 0x0f0f;
    if (y as usize) < ((height - 1) << 12 | 0xe0) {
        out.push(if tile & 0xf0 == 0xe0 { tile + 0x0f20 } else { tile + 16 });
    }
    if y != 0 {
        out.push(if tile & 0xf0 == 0 { tile - 0x0f20 } else { tile - 16 });
    }
    if (x as usize) < ((width - 1) << 8 | 0x0f) {
        out.push(if tile & 0x0f == 0x0f { tile + 0x00f1 } else { tile + 1 });
    }
    if x != 0 {
        out.push(if tile & 0x0f == 0 { tile - 0x00f1 } else { tile - 1 });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{MapSpec, RomFixture};
    use crate::tables::Flag;

    const WALL: u8 = 0x40;
    const FENCE: u8 = 0x41;
    const WATER: u8 = 0x42;

    /// Two screens side by side; screen $81 is fenced off down its left
    /// column except where the flag opens a gate.
    fn fixture() -> RomFixture {
        let mut fixture = RomFixture::new().location(
            0x18,
            MapSpec { screens: vec![vec![0x80, 0x81]], ..MapSpec::default() },
        );
        fixture.effect(0xb3, WALL, effects::BLOCKS_WALKING);
        fixture.effect(0xb3, FENCE, effects::NO_WALK);
        fixture.effect(0xb3, WATER, effects::NO_WALK | 0x20);
        fixture.effect(0xb3, 0x05, effects::BLOCKS_WALKING);
        fixture.alternate(0x80, 0x05, 0x00);
        fixture.screen(0x81, |tiles| {
            for row in 0..15 {
                tiles[row << 4] = WALL;
            }
            tiles[0x70] = 0x05;
        });
        fixture.screen(0x80, |tiles| tiles[0xe0] = FENCE);
        fixture
    }

    #[test]
    fn walls_split_regions_until_flagged() {
        let fixture = fixture();
        let rom = fixture.rom();
        let tiles = TileData::load(&rom).unwrap();
        let mut loc = Location::decode(&rom, 0x18).unwrap();

        let reachable = reachable_tiles(&loc, &tiles, false).unwrap();
        assert!(reachable.contains_key(&0x0048));
        assert!(!reachable.contains_key(&0x00e0));
        assert!(!reachable.contains_key(&0x0101));
        // fly ignores the no-walk fence but not the wall
        let flying = reachable_tiles(&loc, &tiles, true).unwrap();
        assert!(flying.contains_key(&0x00e0));
        assert!(!flying.contains_key(&0x0101));

        loc.flags.push(Flag::new(0x01, 0x2f0));
        let reachable = reachable_tiles(&loc, &tiles, false).unwrap();
        assert!(reachable.contains_key(&0x0101));
        // the gate tile reports its unflagged terrain
        assert_eq!(reachable[&0x0170], effects::BLOCKS_WALKING);
    }

    #[test]
    fn exits_are_never_reachable() {
        let rom = fixture().rom();
        let tiles = TileData::load(&rom).unwrap();
        let mut loc = Location::decode(&rom, 0x18).unwrap();
        loc.exits.push(crate::tables::Exit::new(0x00, 0x47, 0x14, 0));
        let reachable = reachable_tiles(&loc, &tiles, false).unwrap();
        assert!(!reachable.contains_key(&0x0047));
        assert!(reachable.contains_key(&0x0046));
    }

    #[test]
    fn mixed_pages_are_an_error() {
        let rom = fixture().rom();
        let tiles = TileData::load(&rom).unwrap();
        let mut loc = Location::decode(&rom, 0x18).unwrap();
        loc.screens[0][1] = 0x101;
        assert!(reachable_tiles(&loc, &tiles, false).is_err());
    }

    #[test]
    fn reachable_set_is_closed_under_passable_neighbours() {
        let rom = fixture().rom();
        let tiles = TileData::load(&rom).unwrap();
        let loc = Location::decode(&rom, 0x18).unwrap();
        let reachable = reachable_tiles(&loc, &tiles, false).unwrap();
        for &t in reachable.keys() {
            for n in neighbors(t, loc.width(), loc.height()) {
                let screen = tiles.screen(loc.screen_at(n));
                let effect = tiles.effect(loc.tile_effects, screen[(n & 0xff) as usize]);
                if effect & effects::BLOCKS_WALKING == 0 {
                    assert!(reachable.contains_key(&n), "{n:04x} next to {t:04x}");
                }
            }
        }
    }

    #[test]
    fn neighbors_cross_screen_edges() {
        assert_eq!(neighbors(0x0000, 1, 1), vec![0x0010, 0x0001]);
        assert_eq!(neighbors(0x00ef, 2, 2), vec![0x100f, 0x00df, 0x01e0, 0x00ee]);
        assert_eq!(neighbors(0x1100, 2, 2), vec![0x1110, 0x01e0, 0x1101, 0x100f]);
        assert_eq!(neighbors(0x01ef, 2, 1), vec![0x01df, 0x01ee]);
    }

    #[test]
    fn union_find_merges_sets() {
        let mut uf = UnionFind::new();
        uf.union(1, 2);
        uf.union(3, 4);
        uf.union(2, 4);
        assert_eq!(uf.set_of(1), BTreeSet::from([1, 2, 3, 4]));
        assert!(uf.set_of(9).is_empty());
    }
}
