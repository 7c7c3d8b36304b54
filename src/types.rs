use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" | "w" => Some(Self::Up),
            "down" | "s" => Some(Self::Down),
            "left" | "a" => Some(Self::Left),
            "right" | "d" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Floor variants differ only in how they are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    Wall,
    Floor1,
    Floor2,
    Bank,
    Breach,
    Door,
}

impl Tile {
    pub fn is_floor(self) -> bool {
        matches!(self, Tile::Floor1 | Tile::Floor2)
    }

    pub fn blocks_player(self) -> bool {
        matches!(self, Tile::Wall | Tile::Breach)
    }

    pub fn is_spawnable(self) -> bool {
        !matches!(self, Tile::Wall | Tile::Bank | Tile::Breach)
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor1 => '.',
            Tile::Floor2 => ',',
            Tile::Bank => '$',
            Tile::Breach => '*',
            Tile::Door => '+',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GhostHit {
        slot: usize,
        health: i32,
        energy: i32,
    },
    HitWithoutEnergy {
        slot: usize,
    },
    GhostCaptured {
        slot: usize,
    },
    GhostCleared {
        slot: usize,
    },
    Deposited {
        x: i32,
        y: i32,
        #[serde(rename = "hadGhost")]
        had_ghost: bool,
    },
    BreachSealed {
        x: i32,
        y: i32,
    },
    GhostsRespawned {
        count: usize,
    },
    RespawnOverflow {
        dropped: usize,
    },
    LevelAdvanced {
        level: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub energy: i32,
    #[serde(rename = "maxEnergy")]
    pub max_energy: i32,
    #[serde(rename = "carryingGhost")]
    pub carrying_ghost: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub slot: usize,
    pub x: i32,
    pub y: i32,
    pub health: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub turn: u64,
    pub level: u32,
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<String>,
    pub player: PlayerView,
    /// One entry per roster slot; empty slots stay `null`.
    pub ghosts: Vec<Option<GhostView>>,
    pub events: Vec<GameEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TurnReport {
    pub turn: u64,
    pub level: u32,
    #[serde(rename = "levelAdvanced")]
    pub level_advanced: bool,
    pub events: Vec<GameEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_move_accepts_words_and_wasd() {
        assert_eq!(Direction::parse_move("up"), Some(Direction::Up));
        assert_eq!(Direction::parse_move("w"), Some(Direction::Up));
        assert_eq!(Direction::parse_move("s"), Some(Direction::Down));
        assert_eq!(Direction::parse_move("a"), Some(Direction::Left));
        assert_eq!(Direction::parse_move("d"), Some(Direction::Right));
        assert_eq!(Direction::parse_move("jump"), None);
    }

    #[test]
    fn step_applies_direction_delta() {
        let origin = Vec2::new(5, 5);
        assert_eq!(origin.step(Direction::Up), Vec2::new(5, 4));
        assert_eq!(origin.step(Direction::Down), Vec2::new(5, 6));
        assert_eq!(origin.step(Direction::Left), Vec2::new(4, 5));
        assert_eq!(origin.step(Direction::Right), Vec2::new(6, 5));
    }

    #[test]
    fn tile_rules_match_terrain_kinds() {
        assert!(Tile::Wall.blocks_player());
        assert!(Tile::Breach.blocks_player());
        assert!(!Tile::Door.blocks_player());
        assert!(!Tile::Bank.blocks_player());
        assert!(Tile::Floor2.is_spawnable());
        assert!(Tile::Door.is_spawnable());
        assert!(!Tile::Bank.is_spawnable());
        assert!(!Tile::Breach.is_spawnable());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(GameEvent::BreachSealed { x: 3, y: 4 })
            .expect("event should serialize");
        assert_eq!(json["type"], "breach_sealed");
        assert_eq!(json["x"], 3);
    }
}
