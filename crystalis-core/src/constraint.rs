//! Sprite pattern/palette page constraints.
//!
//! A location has four sprite pages that monsters compete for: two pattern
//! banks (`pat0`, `pat1`) and two palettes (`pal2`, `pal3`). A constraint
//! tracks which page ids are still possible for each, plus "floating"
//! pattern requirements that may land in either bank.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::catalog::SpriteSlots;
use crate::location::Location;
use crate::random::Random;
use crate::{RandomiserError, Result};

const TREASURE_CHEST_BANKS: &[u8] = &[
    0x5e, 0x5f, 0x60, 0x61, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6a, 0x6c, 0x6d, 0x6e, 0x6f,
    0x70, 0x74, 0x75, 0x76, 0x77,
];

const COIN_BANKS: &[u8] = &[
    0x5e, 0x5f, 0x60, 0x61, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6a, 0x6b, 0x6c, 0x6d,
    0x6e, 0x6f, 0x70, 0x74, 0x75, 0x76, 0x77,
];

/// Set of allowed page ids. An empty `Set` admits nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CSet {
    All,
    Set(BTreeSet<u8>),
}

impl CSet {
    pub fn none() -> CSet {
        CSet::Set(BTreeSet::new())
    }

    pub fn one(page: u8) -> CSet {
        CSet::Set(BTreeSet::from([page]))
    }

    pub fn of(pages: &[u8]) -> CSet {
        CSet::Set(pages.iter().copied().collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CSet::All)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CSet::Set(s) if s.is_empty())
    }

    pub fn contains(&self, page: u8) -> bool {
        match self {
            CSet::All => true,
            CSet::Set(s) => s.contains(&page),
        }
    }

    pub fn intersect(&self, that: &CSet) -> CSet {
        match (self, that) {
            (CSet::All, _) => that.clone(),
            (_, CSet::All) => self.clone(),
            (CSet::Set(a), CSet::Set(b)) => CSet::Set(a.intersection(b).copied().collect()),
        }
    }

    pub fn union(&self, that: &CSet) -> CSet {
        match (self, that) {
            (CSet::All, _) | (_, CSet::All) => CSet::All,
            (CSet::Set(a), CSet::Set(b)) => CSet::Set(a.union(b).copied().collect()),
        }
    }

    fn pages(&self) -> Vec<u8> {
        match self {
            CSet::All => Vec::new(),
            CSet::Set(s) => s.iter().copied().collect(),
        }
    }
}

impl fmt::Display for CSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CSet::All => write!(f, "all"),
            CSet::Set(s) => {
                let pages: Vec<String> = s.iter().map(|p| format!("{p:02x}")).collect();
                write!(f, "[{}]", pages.join(" "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// pat0, pat1, pal2, pal3
    pub fixed: [CSet; 4],
    /// Pattern pages that must appear in one bank or the other.
    pub float: Vec<CSet>,
    /// Bitset of pattern banks that a float has been resolved into.
    pub shift: u8,
}

impl Constraint {
    fn new(fixed: [CSet; 4], float: Vec<CSet>, shift: u8) -> Constraint {
        Constraint { fixed, float, shift }
    }

    pub fn all() -> Constraint {
        Constraint::new([CSet::All, CSet::All, CSet::All, CSet::All], Vec::new(), 0)
    }

    pub fn none() -> Constraint {
        Constraint::new([CSet::none(), CSet::none(), CSet::none(), CSet::none()], Vec::new(), 0)
    }

    pub fn mimic() -> Constraint {
        Constraint::new([CSet::All, CSet::one(0x6c), CSet::All, CSet::All], Vec::new(), 2)
    }

    pub fn treasure_chest() -> Constraint {
        Constraint::new(
            [CSet::All, CSet::All, CSet::All, CSet::All],
            vec![CSet::of(TREASURE_CHEST_BANKS)],
            0,
        )
    }

    pub fn coin() -> Constraint {
        Constraint::new([CSet::of(COIN_BANKS), CSet::All, CSet::All, CSet::All], Vec::new(), 0)
    }

    pub fn stom_fight() -> Constraint {
        Constraint::new([CSet::All, CSet::one(0x4d), CSet::All, CSet::All], Vec::new(), 0)
    }

    pub fn guardian_statue() -> Constraint {
        Constraint::new([CSet::one(0x74), CSet::one(0x62), CSet::All, CSet::All], Vec::new(), 0)
    }

    pub fn shooting_wall() -> Constraint {
        Constraint::new([CSet::one(0x61), CSet::All, CSet::All, CSet::All], Vec::new(), 0)
    }

    /// Sleeping Kensu's chest is drawn at a fixed offset into page $51.
    pub fn kensu_chest() -> Constraint {
        Constraint::new([CSet::one(0x51), CSet::All, CSet::All, CSet::All], Vec::new(), 0)
    }

    /// Starting constraint for a location from its pinned pages.
    pub fn for_location(slots: &SpriteSlots) -> Constraint {
        let fixed = slots.as_array().map(|page| page.map_or(CSet::All, CSet::one));
        Constraint::new(fixed, Vec::new(), 0)
    }

    /// Requirement of a single observed spawn. `patterns` are the sprite
    /// banks (2 or 3) the object draws from and `palettes` the palette
    /// slots (2 or 3). Objects drawing only from bank 2 can be shifted into
    /// bank 3 by the spawn's pattern-bank bit, which makes the page float.
    pub fn from_spawn(
        palettes: &[u8],
        patterns: &[u8],
        sprite_palettes: [u8; 2],
        sprite_patterns: [u8; 2],
        pattern_bank: u8,
        shiftable: bool,
    ) -> Constraint {
        let shiftable = shiftable && patterns == [2];
        let page = |bank: u8, slot: usize| {
            if shiftable || !patterns.contains(&bank) {
                CSet::All
            } else {
                CSet::one(sprite_patterns[slot])
            }
        };
        let palette = |slot: u8| {
            if palettes.contains(&slot) {
                CSet::one(sprite_palettes[(slot - 2) as usize])
            } else {
                CSet::All
            }
        };
        let float = if shiftable {
            vec![CSet::one(sprite_patterns[(pattern_bank & 1) as usize])]
        } else {
            Vec::new()
        };
        Constraint::new([page(2, 0), page(3, 1), palette(2), palette(3)], float, 0)
    }

    pub fn ignore_palette(&self) -> Constraint {
        Constraint::new(
            [self.fixed[0].clone(), self.fixed[1].clone(), CSet::All, CSet::All],
            self.float.clone(),
            self.shift,
        )
    }

    pub fn shifted(&self) -> Constraint {
        Constraint::new(self.fixed.clone(), self.float.clone(), self.shift | 2)
    }

    /// Replaces each bounded palette set with a random handful of
    /// palettes drawn from `used`.
    pub fn shuffle_palette<R: Random>(&self, random: &mut R, used: &[u8]) -> Constraint {
        let mut fixed = self.fixed.clone();
        for slot in fixed.iter_mut().skip(2) {
            if slot.is_all() {
                continue;
            }
            let n = random.next_int(15) + 2;
            let size = 4 - (n - 1).ilog2();
            let mut pages = BTreeSet::new();
            for _ in 0..size {
                if let Some(&page) = random.pick(used) {
                    pages.insert(page);
                }
            }
            *slot = CSet::Set(pages);
        }
        Constraint::new(fixed, self.float.clone(), self.shift)
    }

    /// Union of two observations of the same object.
    pub fn join(&self, that: &Constraint) -> Result<Constraint> {
        if self.float.len() != that.float.len() {
            return Err(RandomiserError::Graphics(format!(
                "incompatible floats: {self} vs {that}"
            )));
        }
        let fixed = [0, 1, 2, 3].map(|i| self.fixed[i].union(&that.fixed[i]));
        let float = self.float.iter().zip(&that.float).map(|(a, b)| a.union(b)).collect();
        Ok(Constraint::new(fixed, float, self.shift | that.shift))
    }

    pub fn meet(&self, that: &Constraint, join_palettes: bool) -> Result<Constraint> {
        self.try_meet(that, join_palettes).ok_or_else(|| {
            RandomiserError::Graphics(format!("could not reconcile {self} with {that}"))
        })
    }

    /// Narrows both constraints together. With `join_palettes`, palette
    /// slots that cannot agree take the union instead of failing.
    pub fn try_meet(&self, that: &Constraint, join_palettes: bool) -> Option<Constraint> {
        let mut shift = self.shift | that.shift;
        let mut fixed = self.fixed.clone();
        for (i, slot) in fixed.iter_mut().enumerate() {
            let mut meet = self.fixed[i].intersect(&that.fixed[i]);
            if meet.is_empty() {
                if !join_palettes || i < 2 {
                    return None;
                }
                meet = self.fixed[i].union(&that.fixed[i]);
            }
            *slot = meet;
        }

        // Overlapping floats merge; disjoint ones each need their own bank.
        let mut float: Vec<CSet> = Vec::new();
        let mut owner: BTreeMap<u8, usize> = BTreeMap::new();
        for s in self.float.iter().chain(&that.float) {
            let pages = s.pages();
            if s.is_all() {
                return None;
            }
            if let Some(prev) = pages.iter().find_map(|p| owner.get(p).copied()) {
                for p in float[prev].pages() {
                    owner.remove(&p);
                }
                float[prev] = float[prev].intersect(s);
                for p in float[prev].pages() {
                    owner.insert(p, prev);
                }
                continue;
            }
            for &p in &pages {
                owner.insert(p, float.len());
            }
            float.push(s.clone());
            if float.len() > 2 {
                return None;
            }
        }

        // Each float must fit in both banks; one that cannot fit a bank
        // pins the other bank to itself.
        let mut i = 0;
        'floats: while i < float.len() {
            for j in 0..2 {
                if float[i].intersect(&fixed[j]).is_empty() {
                    let other = 1 - j;
                    fixed[other] = float[i].intersect(&fixed[other]);
                    shift |= 1 << other;
                    if fixed[other].is_empty() {
                        return None;
                    }
                    float.remove(i);
                    i = 0;
                    continue 'floats;
                }
            }
            i += 1;
        }

        Some(Constraint::new(fixed, float, shift))
    }

    /// Picks concrete pages and writes them into the location's sprite
    /// tables. Unbounded pages keep their current value.
    pub fn fix<R: Random>(&self, location: &mut Location, random: &mut R) {
        let mut fixed = self.fixed.clone();
        if !self.float.is_empty() {
            let x0 = random.next_int(2);
            let x1 = 1 - x0;
            if let Some(f) = self.float.get(x0) {
                fixed[0] = fixed[0].intersect(f);
            }
            if let Some(f) = self.float.get(x1) {
                fixed[1] = fixed[1].intersect(f);
            }
        }
        for (i, slot) in fixed.iter().enumerate() {
            if slot.is_all() {
                continue;
            }
            let Some(&page) = random.pick(&slot.pages()) else {
                continue;
            };
            match i {
                0 | 1 => location.sprite_patterns[i] = page,
                _ => location.sprite_palettes[i - 2] = page,
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [pat0, pat1, pal2, pal3] = &self.fixed;
        write!(f, "pat {pat0} {pat1} pal {pal2} {pal3}")?;
        if !self.float.is_empty() {
            let floats: Vec<String> = self.float.iter().map(|s| s.to_string()).collect();
            write!(f, " float {}", floats.join(" "))?;
        }
        Ok(())
    }
}
