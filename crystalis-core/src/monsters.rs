use serde::Serialize;

/// Where the placement planner may put a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Placement {
    Normal,
    Moth,
    Bird,
    Plant,
}

/// Which of the two assignable sprite palettes a monster draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Palettes {
    Pal3,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonsterInfo {
    pub id: u8,
    pub name: &'static str,
    /// Monsters sharing a class never appear together under different ids.
    pub class: Option<&'static str>,
    pub placement: Placement,
    pub large: bool,
    pub palettes: Palettes,
    pub coins: bool,
}

impl MonsterInfo {
    pub fn clearance(&self) -> i32 {
        if self.large {
            6
        } else {
            3
        }
    }

    pub fn uses_pal2(&self) -> bool {
        self.palettes == Palettes::Both
    }

    pub fn is_flyer(&self) -> bool {
        FLYERS.contains(&self.id)
    }

    pub fn is_moth(&self) -> bool {
        MOTHS_AND_BATS.contains(&self.id)
    }
}

pub const FLYERS: &[u8] = &[0x59, 0x5c, 0x6e, 0x6f, 0x81, 0x8a, 0xa3, 0xc4];
pub const MOTHS_AND_BATS: &[u8] = &[0x55, 0x5d, 0x7c, 0xbc, 0xc1];

const fn m(id: u8, name: &'static str, class: Option<&'static str>) -> MonsterInfo {
    MonsterInfo {
        id,
        name,
        class,
        placement: Placement::Normal,
        large: false,
        palettes: Palettes::Pal3,
        coins: true,
    }
}

const fn placed(info: MonsterInfo, placement: Placement) -> MonsterInfo {
    MonsterInfo { placement, ..info }
}

const fn large(info: MonsterInfo) -> MonsterInfo {
    MonsterInfo { large: true, ..info }
}

const fn both(info: MonsterInfo) -> MonsterInfo {
    MonsterInfo { palettes: Palettes::Both, ..info }
}

const fn no_coins(info: MonsterInfo) -> MonsterInfo {
    MonsterInfo { coins: false, ..info }
}

/// Every shuffle-eligible monster, sorted by id.
const MONSTERS: &[MonsterInfo] = &[
    m(0x4b, "Wraith", Some("wraith")),
    m(0x4f, "Wraith", Some("wraith")),
    m(0x50, "Slime", Some("slime")),
    m(0x51, "Weretiger", None),
    m(0x52, "Slug", Some("jelly")),
    m(0x53, "Poison Slime", Some("slime")),
    m(0x54, "Mud Golem", Some("golem")),
    no_coins(placed(m(0x55, "Bat", None), Placement::Moth)),
    m(0x56, "Wyvern", Some("wyvern")),
    m(0x58, "Axe Wereboar", None),
    placed(m(0x59, "Mosquito", Some("mosquito")), Placement::Bird),
    m(0x5a, "Mushroom", Some("mushroom")),
    m(0x5b, "Pillbug", None),
    placed(m(0x5c, "Mosquito", Some("mosquito")), Placement::Bird),
    no_coins(placed(m(0x5d, "Swamp Dandelion", None), Placement::Plant)),
    m(0x5f, "Large Slime", Some("slime")),
    m(0x60, "Ice Zombie", Some("zombie")),
    m(0x61, "Brain", Some("brain")),
    m(0x62, "Spider", Some("spider")),
    m(0x63, "Wyvern", Some("wyvern")),
    both(m(0x64, "Draygonia Soldier", Some("soldier"))),
    m(0x65, "Ice Plant", Some("entity")),
    m(0x66, "Poison Brain", Some("brain")),
    m(0x67, "Ice Golem", Some("golem")),
    m(0x69, "Large Poison Slime", Some("slime")),
    m(0x6a, "Troll", None),
    m(0x6b, "Poison Jelly", Some("jelly")),
    large(m(0x6c, "Medusa", None)),
    m(0x6d, "Crab", None),
    placed(m(0x6e, "Flying Plant", None), Placement::Moth),
    placed(m(0x6f, "Bird", Some("bird")), Placement::Bird),
    m(0x71, "Poison Mushroom", Some("mushroom")),
    m(0x72, "Poison Plant", Some("entity")),
    m(0x73, "Mimic", None),
    m(0x74, "Paralyzing Spider", Some("spider")),
    m(0x75, "Mutant Fish", None),
    m(0x76, "Jellyfish", None),
    m(0x77, "Kraken", None),
    m(0x78, "Wyvern Mage", Some("wyvern")),
    m(0x79, "Sand Zombie", Some("zombie")),
    m(0x7b, "Shadow", Some("wraith")),
    no_coins(placed(m(0x7c, "Butterfly", None), Placement::Moth)),
    both(m(0x80, "Draygonia Archer", Some("soldier"))),
    placed(m(0x81, "Bomber Bird", Some("bird")), Placement::Bird),
    m(0x82, "Lava Blob", Some("puddle")),
    both(large(m(0x84, "Flail Guy", None))),
    m(0x85, "Beholder", Some("eye")),
    m(0x86, "Salamander", None),
    both(m(0x87, "Burt", None)),
    both(m(0x89, "Ninja", None)),
    placed(m(0x8a, "Devil Bat", None), Placement::Moth),
    m(0x8c, "Shadow", Some("wraith")),
    m(0x91, "Tarantula", None),
    m(0x92, "Skeleton", None),
    m(0x94, "Beholder", Some("eye")),
    both(large(m(0x95, "Flail Knight", None))),
    m(0x96, "Scorpion", None),
    m(0x98, "Sand Blob", Some("puddle")),
    m(0x99, "Mummy", None),
    m(0x9a, "Warlock", None),
    no_coins(m(0xa0, "Robot Sentry", None)),
    no_coins(m(0xa1, "Robot Enforcer", None)),
    no_coins(m(0xa2, "Tower Sentinel", None)),
    no_coins(placed(m(0xa3, "Robocopter", None), Placement::Bird)),
    no_coins(placed(m(0xbc, "Vampire Bat", None), Placement::Moth)),
    no_coins(placed(m(0xc1, "Vampire Bat", None), Placement::Moth)),
    no_coins(placed(m(0xc4, "Mosquito", None), Placement::Bird)),
];

/// Catalogue entry for a shuffle-eligible monster.
pub fn info(id: u8) -> Option<&'static MonsterInfo> {
    MONSTERS.binary_search_by_key(&id, |m| m.id).ok().map(|i| &MONSTERS[i])
}

/// Type-0 spawns outside the catalogue (platforms, statues, bosses) stay
/// where they are and keep whatever pages they need.
pub fn is_untouched(id: u8) -> bool {
    info(id).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_sorted_and_excludes_bosses() {
        assert!(MONSTERS.windows(2).all(|w| w[0].id < w[1].id));
        for boss in [0x57, 0x5e, 0x68, 0x7d, 0x88, 0x8b, 0x90, 0x93, 0x97, 0x9b, 0x9e, 0xa4, 0xa5] {
            assert!(info(boss).is_none(), "boss {boss:02x} is shuffle-eligible");
        }
        // moving platforms and statues
        for id in [0x7e, 0x7f, 0x8d, 0x8e, 0x8f, 0x9c, 0x9d, 0x9f, 0xa6] {
            assert!(is_untouched(id), "{id:02x}");
        }
        assert!(!is_untouched(0x50));
    }

    #[test]
    fn flyers_and_clearance() {
        let mosquito = info(0x59).unwrap();
        assert!(mosquito.is_flyer());
        assert_eq!(mosquito.placement, Placement::Bird);
        assert_eq!(mosquito.clearance(), 3);

        let medusa = info(0x6c).unwrap();
        assert!(!medusa.is_flyer());
        assert_eq!(medusa.clearance(), 6);

        assert!(info(0x5d).unwrap().is_moth());
        assert!(!info(0x55).unwrap().coins);
    }
}
