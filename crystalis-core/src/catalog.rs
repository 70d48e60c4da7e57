use serde::Serialize;
use std::collections::BTreeMap;

/// Display names for every location the game actually uses. A location id
/// missing from this table is treated as unused even if it has map data.
const LOCATION_NAMES: &[(u8, &str)] = &[
    (0x00, "Mezame Shrine"),
    (0x01, "Leaf - Outside Start"),
    (0x02, "Leaf"),
    (0x03, "Valley Of Wind"),
    (0x04, "Sealed Cave 1"),
    (0x05, "Sealed Cave 2"),
    (0x06, "Sealed Cave 6"),
    (0x07, "Sealed Cave 4"),
    (0x08, "Sealed Cave 5"),
    (0x09, "Sealed Cave 3"),
    (0x0a, "Sealed Cave 7"),
    (0x0c, "Sealed Cave 8"),
    (0x0e, "Windmill Cave"),
    (0x0f, "Windmill"),
    (0x10, "Zebu Cave"),
    (0x11, "Mt Sabre West - Cave 1"),
    (0x14, "Cordel Plain West"),
    (0x15, "Cordel Plain East"),
    (0x18, "Brynmaer"),
    (0x19, "Outside Stom House"),
    (0x1a, "Swamp"),
    (0x1b, "Amazones"),
    (0x1c, "Oak"),
    (0x1e, "Stom House"),
    (0x20, "Mt Sabre West - Lower"),
    (0x21, "Mt Sabre West - Upper"),
    (0x22, "Mt Sabre West - Cave 2"),
    (0x23, "Mt Sabre West - Cave 3"),
    (0x24, "Mt Sabre West - Cave 4"),
    (0x25, "Mt Sabre West - Cave 5"),
    (0x26, "Mt Sabre West - Cave 6"),
    (0x27, "Mt Sabre West - Cave 7"),
    (0x28, "Mt Sabre North - Main"),
    (0x29, "Mt Sabre North - Middle"),
    (0x2a, "Mt Sabre North - Cave 2"),
    (0x2b, "Mt Sabre North - Cave 3"),
    (0x2c, "Mt Sabre North - Cave 4"),
    (0x2d, "Mt Sabre North - Cave 5"),
    (0x2e, "Mt Sabre North - Cave 6"),
    (0x2f, "Mt Sabre North - Prison Hall"),
    (0x30, "Mt Sabre North - Left Cell"),
    (0x31, "Mt Sabre North - Left Cell 2"),
    (0x32, "Mt Sabre North - Right Cell"),
    (0x33, "Mt Sabre North - Cave 8"),
    (0x34, "Mt Sabre North - Cave 9"),
    (0x35, "Mt Sabre North - Summit Cave"),
    (0x38, "Mt Sabre North - Cave 1"),
    (0x39, "Mt Sabre North - Cave 7"),
    (0x3c, "Nadare - Inn"),
    (0x3d, "Nadare - Tool Shop"),
    (0x3e, "Nadare - Back Room"),
    (0x40, "Waterfall Valley North"),
    (0x41, "Waterfall Valley South"),
    (0x42, "Lime Tree Valley"),
    (0x43, "Lime Tree Lake"),
    (0x44, "Kirisa Plant Cave 1"),
    (0x45, "Kirisa Plant Cave 2"),
    (0x46, "Kirisa Plant Cave 3"),
    (0x47, "Kirisa Meadow"),
    (0x48, "Fog Lamp Cave 1"),
    (0x49, "Fog Lamp Cave 2"),
    (0x4a, "Fog Lamp Cave 3"),
    (0x4b, "Fog Lamp Cave Dead End"),
    (0x4c, "Fog Lamp Cave 4"),
    (0x4d, "Fog Lamp Cave 5"),
    (0x4e, "Fog Lamp Cave 6"),
    (0x4f, "Fog Lamp Cave 7"),
    (0x50, "Portoa"),
    (0x51, "Portoa - Fisherman Island"),
    (0x52, "Mesia Shrine"),
    (0x54, "Waterfall Cave 1"),
    (0x55, "Waterfall Cave 2"),
    (0x56, "Waterfall Cave 3"),
    (0x57, "Waterfall Cave 4"),
    (0x58, "Tower Entrance"),
    (0x59, "Tower 1"),
    (0x5a, "Tower 2"),
    (0x5b, "Tower 3"),
    (0x5c, "Tower Outside Mesia"),
    (0x5d, "Tower Outside Dyna"),
    (0x5e, "Tower Mesia"),
    (0x5f, "Tower Dyna"),
    (0x60, "Angry Sea"),
    (0x61, "Boat House"),
    (0x62, "Joel Lighthouse"),
    (0x64, "Underground Channel"),
    (0x65, "Zombie Town"),
    (0x68, "Evil Spirit Island 1"),
    (0x69, "Evil Spirit Island 2"),
    (0x6a, "Evil Spirit Island 3"),
    (0x6b, "Evil Spirit Island 4"),
    (0x6c, "Sabera Palace 1"),
    (0x6d, "Sabera Palace 2"),
    (0x6e, "Sabera Palace 3"),
    (0x70, "Joel Secret Passage"),
    (0x71, "Joel"),
    (0x72, "Swan"),
    (0x73, "Swan Gate"),
    (0x78, "Goa Valley"),
    (0x7c, "Mt Hydra"),
    (0x7d, "Mt Hydra - Cave 1"),
    (0x7e, "Mt Hydra - Outside Shyron"),
    (0x7f, "Mt Hydra - Cave 2"),
    (0x80, "Mt Hydra - Cave 3"),
    (0x81, "Mt Hydra - Cave 4"),
    (0x82, "Mt Hydra - Cave 5"),
    (0x83, "Mt Hydra - Cave 6"),
    (0x84, "Mt Hydra - Cave 7"),
    (0x85, "Mt Hydra - Cave 8"),
    (0x86, "Mt Hydra - Cave 9"),
    (0x87, "Mt Hydra - Cave 10"),
    (0x88, "Styx 1"),
    (0x89, "Styx 2"),
    (0x8a, "Styx 3"),
    (0x8c, "Shyron"),
    (0x8e, "Goa"),
    (0x8f, "Goa Fortress Basement"),
    (0x90, "Desert 1"),
    (0x91, "Oasis Cave Main"),
    (0x92, "Desert Cave 1"),
    (0x93, "Sahara"),
    (0x94, "Sahara Outside Cave"),
    (0x95, "Desert Cave 2"),
    (0x96, "Sahara Meadow"),
    (0x98, "Desert 2"),
    (0x9c, "Pyramid - Entrance"),
    (0x9d, "Pyramid - Branch"),
    (0x9e, "Pyramid - Main"),
    (0x9f, "Pyramid - Draygon"),
    (0xa0, "Crypt - Entrance"),
    (0xa1, "Crypt - Hall 1"),
    (0xa2, "Crypt - Branch"),
    (0xa3, "Crypt - Dead End Left"),
    (0xa4, "Crypt - Dead End Right"),
    (0xa5, "Crypt - Hall 2"),
    (0xa6, "Crypt - Draygon 2"),
    (0xa7, "Crypt - Teleporter"),
    (0xa8, "Goa Fortress - Entrance"),
    (0xa9, "Goa Fortress - Kelbesque"),
    (0xaa, "Goa Fortress - Zebu"),
    (0xab, "Goa Fortress - Sabera"),
    (0xac, "Goa Fortress - Tornel"),
    (0xad, "Goa Fortress - Mado 1"),
    (0xae, "Goa Fortress - Mado 2"),
    (0xaf, "Goa Fortress - Mado 3"),
    (0xb0, "Goa Fortress - Karmine 1"),
    (0xb1, "Goa Fortress - Karmine 2"),
    (0xb2, "Goa Fortress - Karmine 3"),
    (0xb3, "Goa Fortress - Karmine 4"),
    (0xb4, "Goa Fortress - Karmine 5"),
    (0xb5, "Goa Fortress - Karmine 6"),
    (0xb6, "Goa Fortress - Karmine 7"),
    (0xb7, "Goa Fortress - Exit"),
    (0xb8, "Oasis Cave - Entrance"),
    (0xb9, "Goa Fortress - Asina"),
    (0xba, "Goa Fortress - Kensu"),
    (0xbb, "Goa - House"),
    (0xbc, "Goa - Inn"),
    (0xbe, "Goa - Tool Shop"),
    (0xbf, "Goa - Tavern"),
    (0xc0, "Leaf - Elder House"),
    (0xc1, "Leaf - Rabbit Hut"),
    (0xc2, "Leaf - Inn"),
    (0xc3, "Leaf - Tool Shop"),
    (0xc4, "Leaf - Armor Shop"),
    (0xc5, "Leaf - Student House"),
    (0xc6, "Brynmaer - Tavern"),
    (0xc7, "Brynmaer - Pawn Shop"),
    (0xc8, "Brynmaer - Inn"),
    (0xc9, "Brynmaer - Armor Shop"),
    (0xcb, "Brynmaer - Item Shop"),
    (0xcd, "Oak - Elder House"),
    (0xce, "Oak - Mother House"),
    (0xcf, "Oak - Tool Shop"),
    (0xd0, "Oak - Inn"),
    (0xd1, "Amazones - Inn"),
    (0xd2, "Amazones - Item Shop"),
    (0xd3, "Amazones - Armor Shop"),
    (0xd4, "Amazones - Elder"),
    (0xd5, "Nadare"),
    (0xd6, "Portoa - Fisherman House"),
    (0xd7, "Portoa Palace - Entrance"),
    (0xd8, "Portoa - Fortune Teller"),
    (0xd9, "Portoa - Pawn Shop"),
    (0xda, "Portoa - Armor Shop"),
    (0xdc, "Portoa - Inn"),
    (0xdd, "Portoa - Tool Shop"),
    (0xde, "Portoa Palace - Left"),
    (0xdf, "Portoa Palace - Throne Room"),
    (0xe0, "Portoa Palace - Right"),
    (0xe1, "Portoa - Asina Room"),
    (0xe2, "Amazones - Elder Downstairs"),
    (0xe3, "Joel - Elder House"),
    (0xe4, "Joel - Shed"),
    (0xe5, "Joel - Tool Shop"),
    (0xe7, "Joel - Inn"),
    (0xe8, "Zombie Town - House"),
    (0xe9, "Zombie Town - House Basement"),
    (0xeb, "Swan - Tool Shop"),
    (0xec, "Swan - Stom Hut"),
    (0xed, "Swan - Inn"),
    (0xee, "Swan - Armor Shop"),
    (0xef, "Swan - Tavern"),
    (0xf0, "Swan - Pawn Shop"),
    (0xf1, "Swan - Dance Hall"),
    (0xf2, "Shyron - Temple"),
    (0xf3, "Shyron - Training Hall"),
    (0xf4, "Shyron - Hospital"),
    (0xf5, "Shyron - Armor Shop"),
    (0xf6, "Shyron - Tool Shop"),
    (0xf7, "Shyron - Inn"),
    (0xf8, "Sahara - Inn"),
    (0xf9, "Sahara - Tool Shop"),
    (0xfa, "Sahara - Elder House"),
    (0xfb, "Sahara - Pawn Shop"),
];

/// Screens holding a boss arena. Monsters are never placed on them.
const BOSS_SCREENS: &[(u8, u16)] = &[
    (0x0a, 0x91),
    (0x1a, 0x7c),
    (0x28, 0xb5),
    (0x6c, 0xfd),
    (0x6e, 0xfd),
    (0xa9, 0x73),
    (0xac, 0x91),
    (0xb6, 0xfd),
    (0xb9, 0x91),
    (0xf2, 0x70),
];

pub fn location_name(id: u8) -> Option<&'static str> {
    LOCATION_NAMES
        .binary_search_by_key(&id, |&(k, _)| k)
        .ok()
        .map(|i| LOCATION_NAMES[i].1)
}

/// Pinned sprite pattern/palette pages. `None` leaves the page free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpriteSlots {
    pub pat0: Option<u8>,
    pub pat1: Option<u8>,
    pub pal2: Option<u8>,
    pub pal3: Option<u8>,
}

impl SpriteSlots {
    const NONE: SpriteSlots = SpriteSlots { pat0: None, pat1: None, pal2: None, pal3: None };

    pub fn as_array(&self) -> [Option<u8>; 4] {
        [self.pat0, self.pat1, self.pal2, self.pal3]
    }

    pub fn is_empty(&self) -> bool {
        self.as_array().iter().all(Option::is_none)
    }
}

/// Per-location monster shuffle settings, attached when the location loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationConfig {
    /// How many flying monsters the shuffle may put here.
    pub max_flyers: u8,
    pub skip: bool,
    /// Tower floors only shuffle when tower shuffling is turned on.
    pub tower: bool,
    /// Pages the map itself needs (windmill blades, dolphin).
    pub start_slots: SpriteSlots,
    /// Pages the vanilla map pins. Kept for reporting; the shuffle starts
    /// from `start_slots` only.
    pub forced_slots: SpriteSlots,
    /// Slots reserved for non-flying spawns, with the (dy, dx) tile nudge
    /// applied when a walker replaces the original occupant.
    pub non_flyers: BTreeMap<u8, (i8, i8)>,
    pub boss_screen: Option<u16>,
}

impl LocationConfig {
    pub fn for_location(id: u8) -> LocationConfig {
        let adjustment = ADJUSTMENTS.iter().find(|a| a.id == id).unwrap_or(&DEFAULT);
        LocationConfig {
            max_flyers: adjustment.max_flyers,
            skip: adjustment.skip,
            tower: adjustment.tower,
            start_slots: start_slots(id),
            forced_slots: adjustment.forced,
            non_flyers: adjustment
                .non_flyers
                .iter()
                .map(|&(slot, dy, dx)| (slot, (dy, dx)))
                .collect(),
            boss_screen: BOSS_SCREENS.iter().find(|&&(loc, _)| loc == id).map(|&(_, s)| s),
        }
    }
}

fn start_slots(id: u8) -> SpriteSlots {
    match id {
        // windmill blades
        0x03 => SpriteSlots { pat1: Some(0x60), pal3: Some(0x20), ..SpriteSlots::NONE },
        // dolphin
        0x60 | 0x64 | 0x68 => SpriteSlots { pat1: Some(0x52), pal3: Some(0x08), ..SpriteSlots::NONE },
        _ => SpriteSlots::NONE,
    }
}

struct Adjustment {
    id: u8,
    max_flyers: u8,
    skip: bool,
    tower: bool,
    forced: SpriteSlots,
    non_flyers: &'static [(u8, i8, i8)],
}

const DEFAULT: Adjustment = Adjustment {
    id: 0,
    max_flyers: 0,
    skip: false,
    tower: false,
    forced: SpriteSlots::NONE,
    non_flyers: &[],
};

const DOLPHIN_PAGES: SpriteSlots =
    SpriteSlots { pat0: None, pat1: Some(0x52), pal2: None, pal3: Some(0x08) };

const ADJUSTMENTS: &[Adjustment] = &[
    Adjustment { id: 0x03, max_flyers: 2, forced: SpriteSlots { pat1: Some(0x60), ..SpriteSlots::NONE }, ..DEFAULT },
    Adjustment { id: 0x07, non_flyers: &[(0x0f, 0, -3), (0x10, -10, 0), (0x11, 0, 4)], ..DEFAULT },
    Adjustment { id: 0x14, max_flyers: 2, ..DEFAULT },
    Adjustment { id: 0x15, max_flyers: 2, ..DEFAULT },
    Adjustment {
        id: 0x1a,
        max_flyers: 2,
        forced: SpriteSlots { pat1: Some(0x4f), pal3: Some(0x23), ..SpriteSlots::NONE },
        non_flyers: &[(0x10, 4, 0), (0x11, 5, 0), (0x12, 4, 0), (0x13, 5, 0), (0x14, 4, 0), (0x15, 4, 0)],
        ..DEFAULT
    },
    // stray blue slime
    Adjustment { id: 0x1b, skip: true, ..DEFAULT },
    Adjustment { id: 0x20, max_flyers: 1, ..DEFAULT },
    Adjustment { id: 0x21, max_flyers: 1, forced: SpriteSlots { pat1: Some(0x50), ..SpriteSlots::NONE }, ..DEFAULT },
    Adjustment { id: 0x27, non_flyers: &[(0x0d, 0, 0x10)], ..DEFAULT },
    Adjustment { id: 0x28, max_flyers: 1, ..DEFAULT },
    Adjustment { id: 0x29, max_flyers: 1, ..DEFAULT },
    Adjustment { id: 0x2b, non_flyers: &[(0x14, 0x20, -8)], ..DEFAULT },
    Adjustment { id: 0x40, max_flyers: 2, non_flyers: &[(0x13, 12, -0x10)], ..DEFAULT },
    Adjustment { id: 0x41, max_flyers: 2, non_flyers: &[(0x15, 0, -6)], ..DEFAULT },
    Adjustment { id: 0x42, max_flyers: 2, non_flyers: &[(0x0d, 0, 8), (0x0e, -8, 8)], ..DEFAULT },
    Adjustment { id: 0x47, max_flyers: 1, non_flyers: &[(0x0d, -8, -8)], ..DEFAULT },
    Adjustment { id: 0x4a, max_flyers: 1, non_flyers: &[(0x0e, 4, 0), (0x0f, 0, -3), (0x10, 0, 4)], ..DEFAULT },
    Adjustment { id: 0x4d, max_flyers: 1, ..DEFAULT },
    Adjustment { id: 0x4e, max_flyers: 1, ..DEFAULT },
    Adjustment { id: 0x57, forced: SpriteSlots { pat1: Some(0x4d), ..SpriteSlots::NONE }, ..DEFAULT },
    Adjustment { id: 0x59, tower: true, ..DEFAULT },
    Adjustment { id: 0x5a, tower: true, ..DEFAULT },
    Adjustment { id: 0x5b, tower: true, ..DEFAULT },
    Adjustment { id: 0x60, max_flyers: 2, skip: true, forced: DOLPHIN_PAGES, ..DEFAULT },
    Adjustment { id: 0x64, skip: true, forced: DOLPHIN_PAGES, ..DEFAULT },
    Adjustment { id: 0x68, skip: true, forced: DOLPHIN_PAGES, ..DEFAULT },
    Adjustment { id: 0x69, max_flyers: 1, non_flyers: &[(0x17, 4, 6)], ..DEFAULT },
    Adjustment { id: 0x6a, max_flyers: 1, non_flyers: &[(0x15, 0, 0x18)], ..DEFAULT },
    Adjustment { id: 0x6c, max_flyers: 1, non_flyers: &[(0x17, 0, 0x18)], ..DEFAULT },
    Adjustment { id: 0x6d, max_flyers: 1, non_flyers: &[(0x11, 0x10, 0), (0x1b, 0, 0), (0x1c, 6, 0)], ..DEFAULT },
    Adjustment { id: 0x78, max_flyers: 1, non_flyers: &[(0x16, -8, -8)], ..DEFAULT },
    Adjustment { id: 0x7c, max_flyers: 1, non_flyers: &[(0x15, -0x27, 0x54)], ..DEFAULT },
    Adjustment { id: 0x84, non_flyers: &[(0x12, 0, -4), (0x13, 0, 4), (0x14, -6, 0), (0x15, 14, 12)], ..DEFAULT },
    Adjustment { id: 0x88, max_flyers: 1, ..DEFAULT },
    Adjustment { id: 0x89, max_flyers: 1, ..DEFAULT },
    Adjustment {
        id: 0x8a,
        max_flyers: 1,
        non_flyers: &[(0x0d, 7, 0), (0x0e, 0, 0), (0x0f, 7, 3), (0x10, 0, 6), (0x11, 11, -0x10)],
        ..DEFAULT
    },
    Adjustment { id: 0x8f, skip: true, ..DEFAULT },
    Adjustment { id: 0x90, max_flyers: 2, non_flyers: &[(0x14, -0x0b, -3), (0x15, 0, 0x10)], ..DEFAULT },
    Adjustment { id: 0x91, max_flyers: 2, non_flyers: &[(0x18, 0, 14), (0x19, 4, -0x10)], ..DEFAULT },
    Adjustment { id: 0x98, max_flyers: 2, non_flyers: &[(0x14, -6, 6), (0x15, 0, -0x10)], ..DEFAULT },
    Adjustment { id: 0x9e, max_flyers: 2, ..DEFAULT },
    Adjustment { id: 0xa2, max_flyers: 1, non_flyers: &[(0x12, 0, 11), (0x13, 6, 0)], ..DEFAULT },
    Adjustment { id: 0xa5, non_flyers: &[(0x17, 6, 6), (0x18, -6, 0), (0x19, -1, -7)], ..DEFAULT },
    // decoy slimes
    Adjustment { id: 0xa6, skip: true, ..DEFAULT },
    Adjustment { id: 0xa8, skip: true, ..DEFAULT },
    Adjustment { id: 0xa9, max_flyers: 2, non_flyers: &[(0x16, 0x1a, -0x10), (0x17, 0, 0x20)], ..DEFAULT },
    Adjustment { id: 0xab, max_flyers: 2, non_flyers: &[(0x0d, 1, 0), (0x0e, 2, -2)], ..DEFAULT },
    Adjustment { id: 0xad, max_flyers: 2, non_flyers: &[(0x18, 0, 8), (0x19, 0, -8)], ..DEFAULT },
    Adjustment { id: 0xaf, non_flyers: &[(0x0d, 0, 0), (0x0e, 0, 0), (0x13, 0x3b, -0x26)], ..DEFAULT },
    Adjustment { id: 0xb4, max_flyers: 2, non_flyers: &[(0x11, 6, 0), (0x12, 0, 6)], ..DEFAULT },
    Adjustment { id: 0xd7, skip: true, ..DEFAULT },
];
