use crate::types::Vec2;

pub const LEVEL_WIDTH: i32 = 35;
pub const LEVEL_HEIGHT: i32 = 18;

pub const ROSTER_CAPACITY: usize = 4;

pub const PLAYER_MAX_ENERGY: i32 = 100;
pub const GHOST_MAX_HEALTH: i32 = 100;
pub const HIT_ENERGY_COST: i32 = 10;
pub const HIT_DAMAGE: i32 = 20;

pub const GHOST_STEP_CHANCE: f32 = 0.4;
/// Ghosts closer than this on both axes treat the player as nearby.
pub const NEAR_PLAYER_RANGE: i32 = 3;
/// Ghosts never step to a row at or beyond this one.
pub const GHOST_MAX_Y_EXCLUSIVE: i32 = LEVEL_HEIGHT - 2;
/// Ghosts never step to a column at or beyond this one.
pub const GHOST_MAX_X_EXCLUSIVE: i32 = LEVEL_WIDTH - 3;

pub const REFERENCE_PLAYER_SPAWN: Vec2 = Vec2 { x: 23, y: 16 };
pub const REFERENCE_GHOST_SPAWNS: [Vec2; 4] = [
    Vec2 { x: 10, y: 10 },
    Vec2 { x: 23, y: 4 },
    Vec2 { x: 25, y: 14 },
    Vec2 { x: 26, y: 6 },
];

pub const BANK_CELL: Vec2 = Vec2 { x: 4, y: 12 };
pub const BREACH_CELLS: [Vec2; 4] = [
    Vec2 { x: 5, y: 3 },
    Vec2 { x: 11, y: 15 },
    Vec2 { x: 27, y: 2 },
    Vec2 { x: 32, y: 15 },
];

/// Chance per turn that the autopilot ignores its target and moves at random.
pub const AUTOPILOT_WANDER_CHANCE: f32 = 0.05;
