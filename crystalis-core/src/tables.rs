use serde::Serialize;

/// Always-set flag used to force alternate tiles on a screen.
pub const ALWAYS_TRUE_FLAG: u16 = 0x2f0;

/// Spawn records whose leading byte is this value are inactive.
pub const UNUSED_SPAWN: u8 = 0xfe;

fn put(byte: &mut u8, mask: u8, value: u8) {
    *byte = (*byte & !mask) | (value & mask);
}

/// Screen entrance: `xlo xhi ylo yhi`, each hi byte holding the screen
/// nibble and the lo byte the tile/pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entrance {
    data: [u8; 4],
}

impl Entrance {
    pub fn from_bytes(bytes: &[u8]) -> Entrance {
        Entrance { data: [bytes[0], bytes[1], bytes[2], bytes[3]] }
    }

    /// Entrance at the given full pixel coordinates.
    pub fn new(x: u16, y: u16) -> Entrance {
        let [x0, x1] = x.to_le_bytes();
        let [y0, y1] = y.to_le_bytes();
        Entrance { data: [x0, x1, y0, y1] }
    }

    /// Entrance on `screen` (yx) at the 16-bit in-screen `coord` (yyxx).
    pub fn at(screen: u8, coord: u16) -> Entrance {
        let mut entrance = Entrance { data: [0; 4] };
        entrance.set_screen(screen);
        entrance.data[0] = coord as u8;
        entrance.data[2] = (coord >> 8) as u8;
        entrance
    }

    pub fn bytes(&self) -> [u8; 4] {
        self.data
    }

    pub fn x(&self) -> u16 {
        u16::from_le_bytes([self.data[0], self.data[1]])
    }

    pub fn set_x(&mut self, x: u16) {
        [self.data[0], self.data[1]] = x.to_le_bytes();
    }

    pub fn y(&self) -> u16 {
        u16::from_le_bytes([self.data[2], self.data[3]])
    }

    pub fn set_y(&mut self, y: u16) {
        [self.data[2], self.data[3]] = y.to_le_bytes();
    }

    pub fn screen(&self) -> u8 {
        (self.data[3] & 0x0f) << 4 | (self.data[1] & 0x0f)
    }

    pub fn set_screen(&mut self, screen: u8) {
        put(&mut self.data[3], 0x0f, screen >> 4);
        put(&mut self.data[1], 0x0f, screen);
    }

    pub fn tile(&self) -> u8 {
        (self.data[2] & 0xf0) | self.data[0] >> 4
    }

    pub fn coord(&self) -> u16 {
        (self.data[2] as u16) << 8 | self.data[0] as u16
    }

    /// Full tile id (screen << 8 | tile).
    pub fn tile_id(&self) -> u16 {
        (self.screen() as u16) << 8 | self.tile() as u16
    }

    /// Entrances are disabled by pushing x past the last screen column.
    pub fn used(&self) -> bool {
        self.data[1] < 0x08
    }
}

/// Exit tile: `xt yt dest entrance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exit {
    data: [u8; 4],
}

impl Exit {
    pub fn from_bytes(bytes: &[u8]) -> Exit {
        Exit { data: [bytes[0], bytes[1], bytes[2], bytes[3]] }
    }

    pub fn new(screen: u8, tile: u8, dest: u8, entrance: u8) -> Exit {
        let mut exit = Exit { data: [0, 0, dest, entrance] };
        exit.set_screen(screen);
        exit.set_tile(tile);
        exit
    }

    pub fn bytes(&self) -> [u8; 4] {
        self.data
    }

    pub fn xt(&self) -> u8 {
        self.data[0]
    }

    pub fn set_xt(&mut self, xt: u8) {
        self.data[0] = xt;
    }

    pub fn yt(&self) -> u8 {
        self.data[1]
    }

    pub fn set_yt(&mut self, yt: u8) {
        self.data[1] = yt;
    }

    pub fn x(&self) -> u16 {
        (self.data[0] as u16) << 4
    }

    pub fn y(&self) -> u16 {
        (self.data[1] as u16) << 4
    }

    pub fn screen(&self) -> u8 {
        (self.data[1] & 0xf0) | self.data[0] >> 4
    }

    pub fn set_screen(&mut self, screen: u8) {
        put(&mut self.data[1], 0xf0, screen);
        put(&mut self.data[0], 0xf0, screen << 4);
    }

    pub fn tile(&self) -> u8 {
        (self.data[1] & 0x0f) << 4 | (self.data[0] & 0x0f)
    }

    pub fn set_tile(&mut self, tile: u8) {
        put(&mut self.data[1], 0x0f, tile >> 4);
        put(&mut self.data[0], 0x0f, tile);
    }

    pub fn tile_id(&self) -> u16 {
        (self.screen() as u16) << 8 | self.tile() as u16
    }

    pub fn dest(&self) -> u8 {
        self.data[2]
    }

    pub fn entrance(&self) -> u8 {
        self.data[3]
    }

    pub fn is_seamless(&self) -> bool {
        self.data[3] & 0x20 != 0
    }

    /// Exits pointing at location $ff are kept in the table but never taken.
    pub fn disabled(&self) -> bool {
        self.data[2] == 0xff
    }
}

/// Flagged screen: `flag screen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Flag {
    data: [u8; 2],
}

impl Flag {
    pub fn from_bytes(bytes: &[u8]) -> Flag {
        Flag { data: [bytes[0], bytes[1]] }
    }

    /// Flags live in $200..=$2ff; only the low byte is stored.
    pub fn new(screen: u8, flag: u16) -> Flag {
        Flag { data: [flag as u8, screen] }
    }

    pub fn bytes(&self) -> [u8; 2] {
        self.data
    }

    pub fn flag(&self) -> u16 {
        self.data[0] as u16 | 0x200
    }

    pub fn screen(&self) -> u8 {
        self.data[1]
    }

    pub fn xs(&self) -> u8 {
        self.data[1] & 0x07
    }

    pub fn set_xs(&mut self, xs: u8) {
        put(&mut self.data[1], 0x07, xs);
    }

    pub fn ys(&self) -> u8 {
        self.data[1] >> 4
    }

    pub fn set_ys(&mut self, ys: u8) {
        put(&mut self.data[1], 0xf0, ys << 4);
    }
}

/// Pit connection: `dest fromXs|toXs _ fromYs|toYs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pit {
    data: [u8; 4],
}

impl Pit {
    pub fn from_bytes(bytes: &[u8]) -> Pit {
        Pit { data: [bytes[0], bytes[1], bytes[2], bytes[3]] }
    }

    pub fn bytes(&self) -> [u8; 4] {
        self.data
    }

    pub fn dest(&self) -> u8 {
        self.data[0]
    }

    pub fn from_xs(&self) -> u8 {
        (self.data[1] & 0x70) >> 4
    }

    pub fn set_from_xs(&mut self, xs: u8) {
        put(&mut self.data[1], 0x70, xs << 4);
    }

    pub fn from_ys(&self) -> u8 {
        self.data[3] >> 4
    }

    pub fn set_from_ys(&mut self, ys: u8) {
        put(&mut self.data[3], 0xf0, ys << 4);
    }

    pub fn from_screen(&self) -> u8 {
        (self.data[3] & 0xf0) | (self.data[1] & 0x70) >> 4
    }

    pub fn to_screen(&self) -> u8 {
        (self.data[3] & 0x0f) << 4 | (self.data[1] & 0x07)
    }
}

/// What a spawn record spawns, derived from its type and id bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpawnKind {
    Monster,
    Npc,
    Boss,
    /// Includes mimics; the chest contents decide which.
    Chest { invisible: bool },
    Trigger,
    Wall,
    Generic,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WallType {
    Wall,
    Bridge,
}

/// Object spawn: `yt xt|timed type|bank id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spawn {
    data: [u8; 4],
    kind: SpawnKind,
}

impl Spawn {
    pub fn from_bytes(bytes: &[u8]) -> Spawn {
        let data = [bytes[0], bytes[1], bytes[2], bytes[3]];
        Spawn { data, kind: classify(&data) }
    }

    pub fn bytes(&self) -> [u8; 4] {
        self.data
    }

    pub fn kind(&self) -> SpawnKind {
        self.kind
    }

    pub fn used(&self) -> bool {
        self.data[0] != UNUSED_SPAWN
    }

    pub fn y(&self) -> u16 {
        (self.data[0] as u16) << 4
    }

    pub fn set_y(&mut self, y: u16) {
        self.data[0] = (y >> 4) as u8;
    }

    pub fn yt(&self) -> u8 {
        self.data[0]
    }

    pub fn set_yt(&mut self, yt: u8) {
        self.data[0] = yt;
    }

    pub fn x(&self) -> u16 {
        ((self.data[1] & 0x7f) as u16) << 4 | ((self.data[2] & 0x40) as u16) >> 3
    }

    pub fn set_x(&mut self, x: u16) {
        put(&mut self.data[1], 0x7f, (x >> 4) as u8);
        put(&mut self.data[2], 0x40, ((x << 3) & 0x40) as u8);
    }

    pub fn xt(&self) -> u8 {
        self.data[1] & 0x7f
    }

    pub fn set_xt(&mut self, xt: u8) {
        put(&mut self.data[1], 0x7f, xt);
    }

    pub fn timed(&self) -> bool {
        self.data[1] & 0x80 != 0
    }

    pub fn set_timed(&mut self, timed: bool) {
        put(&mut self.data[1], 0x80, if timed { 0x80 } else { 0 });
    }

    pub fn screen(&self) -> u8 {
        (self.data[0] & 0xf0) | (self.data[1] & 0x70) >> 4
    }

    pub fn set_screen(&mut self, screen: u8) {
        put(&mut self.data[0], 0xf0, screen);
        put(&mut self.data[1], 0x70, screen << 4);
    }

    pub fn tile(&self) -> u8 {
        (self.data[0] & 0x0f) << 4 | (self.data[1] & 0x0f)
    }

    pub fn set_tile(&mut self, tile: u8) {
        put(&mut self.data[0], 0x0f, tile >> 4);
        put(&mut self.data[1], 0x0f, tile);
    }

    pub fn spawn_type(&self) -> u8 {
        self.data[2] & 0x07
    }

    pub fn set_type(&mut self, spawn_type: u8) {
        put(&mut self.data[2], 0x07, spawn_type);
        self.kind = classify(&self.data);
    }

    pub fn id(&self) -> u8 {
        self.data[3]
    }

    pub fn set_id(&mut self, id: u8) {
        self.data[3] = id;
        self.kind = classify(&self.data);
    }

    /// Monster object ids are stored shifted down by $50.
    pub fn monster_id(&self) -> u8 {
        self.data[3].wrapping_add(0x50)
    }

    pub fn set_monster_id(&mut self, id: u8) {
        self.set_id(id.wrapping_sub(0x50));
    }

    pub fn pattern_bank(&self) -> u8 {
        self.data[2] >> 7
    }

    pub fn set_pattern_bank(&mut self, bank: u8) {
        put(&mut self.data[2], 0x80, bank << 7);
    }

    pub fn is_monster(&self) -> bool {
        self.kind == SpawnKind::Monster
    }

    pub fn is_npc(&self) -> bool {
        self.kind == SpawnKind::Npc
    }

    pub fn is_boss(&self) -> bool {
        self.kind == SpawnKind::Boss
    }

    pub fn is_chest(&self) -> bool {
        matches!(self.kind, SpawnKind::Chest { .. })
    }

    pub fn is_wall(&self) -> bool {
        self.kind == SpawnKind::Wall
    }

    /// Shooting walls normally carry a flag bit; two fortress maps
    /// hardcode them instead.
    pub fn is_shooting_wall(&self, location_id: u8) -> bool {
        if !self.is_wall() {
            return false;
        }
        if self.data[2] & 0x20 != 0 {
            self.data[2] & 0x10 != 0
        } else {
            location_id == 0x8f || location_id == 0xa8
        }
    }

    pub fn wall_type(&self) -> Option<WallType> {
        if self.spawn_type() != 3 {
            return None;
        }
        let obj = if self.data[2] & 0x20 != 0 { self.data[3] >> 4 } else { self.data[3] };
        match obj {
            2 => Some(WallType::Bridge),
            0..=3 => Some(WallType::Wall),
            _ => None,
        }
    }

    pub fn wall_element(&self) -> Option<u8> {
        self.is_wall().then_some(self.data[3] & 3)
    }

    /// Stamps the record as an inactive placeholder, keeping its slot.
    pub fn disable(&mut self) {
        self.set_x(0);
        self.set_y(0);
        self.set_id(0xb0);
        self.data[0] = UNUSED_SPAWN;
    }
}

fn classify(data: &[u8; 4]) -> SpawnKind {
    let id = data[3];
    match data[2] & 0x07 {
        0 => SpawnKind::Monster,
        1 if id < 0xc0 => SpawnKind::Npc,
        1 => SpawnKind::Boss,
        2 if id < 0x80 => SpawnKind::Chest { invisible: data[2] & 0x20 != 0 },
        2 => SpawnKind::Trigger,
        3 if id < 4 || data[2] & 0x20 != 0 => SpawnKind::Wall,
        4 => SpawnKind::Generic,
        _ => SpawnKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrance_unpacks_screen_and_tile() {
        // x = $0158, y = $02a0
        let entrance = Entrance::from_bytes(&[0x58, 0x01, 0xa0, 0x02]);
        assert_eq!(entrance.screen(), 0x21);
        assert_eq!(entrance.tile(), 0xa5);
        assert_eq!(entrance.coord(), 0xa058);
        assert!(entrance.used());
        assert_eq!(Entrance::at(0x21, 0xa058), entrance);

        let disabled = Entrance::from_bytes(&[0, 0xff, 0, 0]);
        assert!(!disabled.used());
    }

    #[test]
    fn exit_screen_and_tile_are_nibble_interleaved() {
        let exit = Exit::new(0x12, 0x34, 0x05, 0x21);
        assert_eq!(exit.bytes(), [0x24, 0x13, 0x05, 0x21]);
        assert_eq!(exit.screen(), 0x12);
        assert_eq!(exit.tile(), 0x34);
        assert!(exit.is_seamless());
        assert!(Exit::from_bytes(&[0, 0, 0xff, 0]).disabled());
    }

    #[test]
    fn pit_screens() {
        let pit = Pit::from_bytes(&[0x1a, 0x52, 0x00, 0x13]);
        assert_eq!(pit.from_screen(), 0x15);
        assert_eq!(pit.to_screen(), 0x32);
        assert_eq!(pit.dest(), 0x1a);
    }

    #[test]
    fn spawn_classification_follows_type_and_id() {
        assert_eq!(Spawn::from_bytes(&[0x44, 0x08, 0x00, 0x00]).kind(), SpawnKind::Monster);
        assert_eq!(Spawn::from_bytes(&[0x44, 0x08, 0x01, 0x10]).kind(), SpawnKind::Npc);
        assert_eq!(Spawn::from_bytes(&[0x44, 0x08, 0x01, 0xc3]).kind(), SpawnKind::Boss);
        assert_eq!(
            Spawn::from_bytes(&[0x44, 0x08, 0x22, 0x10]).kind(),
            SpawnKind::Chest { invisible: true }
        );
        assert_eq!(Spawn::from_bytes(&[0x44, 0x08, 0x02, 0x90]).kind(), SpawnKind::Trigger);
        assert_eq!(Spawn::from_bytes(&[0x44, 0x08, 0x03, 0x02]).kind(), SpawnKind::Wall);
        assert_eq!(Spawn::from_bytes(&[0x44, 0x08, 0x03, 0x40]).kind(), SpawnKind::Other);
        assert_eq!(Spawn::from_bytes(&[0x44, 0x08, 0x04, 0x40]).kind(), SpawnKind::Generic);

        let mut spawn = Spawn::from_bytes(&[0x44, 0x08, 0x01, 0x10]);
        spawn.set_type(0);
        assert!(spawn.is_monster());
        assert_eq!(spawn.monster_id(), 0x60);
    }

    #[test]
    fn spawn_coordinates_and_screen() {
        let mut spawn = Spawn::from_bytes(&[0x00, 0x00, 0x00, 0x00]);
        spawn.set_screen(0x12);
        spawn.set_tile(0x7a);
        assert_eq!(spawn.bytes(), [0x17, 0x2a, 0x00, 0x00]);
        assert_eq!(spawn.yt(), 0x17);
        assert_eq!(spawn.xt(), 0x2a);

        spawn.set_x(0x1a8);
        assert_eq!(spawn.x(), 0x1a8);
        assert_eq!(spawn.bytes()[2] & 0x40, 0x40);
    }

    #[test]
    fn walls_and_bridges() {
        let bridge = Spawn::from_bytes(&[0x10, 0x10, 0x23, 0x21]);
        assert_eq!(bridge.wall_type(), Some(WallType::Bridge));
        assert_eq!(bridge.wall_element(), Some(1));
        assert!(!bridge.is_shooting_wall(0x00));

        let shooter = Spawn::from_bytes(&[0x10, 0x10, 0x33, 0x01]);
        assert!(shooter.is_shooting_wall(0x00));

        let fortress = Spawn::from_bytes(&[0x10, 0x10, 0x03, 0x01]);
        assert!(!fortress.is_shooting_wall(0x00));
        assert!(fortress.is_shooting_wall(0xa8));
    }

    #[test]
    fn disabled_spawn_keeps_its_slot() {
        let mut spawn = Spawn::from_bytes(&[0x34, 0x56, 0x40, 0x12]);
        spawn.disable();
        assert!(!spawn.used());
        assert_eq!(spawn.id(), 0xb0);
        assert_eq!(spawn.x(), 0);
    }
}
