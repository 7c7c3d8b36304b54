use super::*;
use crate::constants::{
    GHOST_MAX_X_EXCLUSIVE, GHOST_MAX_Y_EXCLUSIVE, GHOST_STEP_CHANCE, NEAR_PLAYER_RANGE,
};

/// Why a single ghost step did not happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepBlock {
    OutOfBounds,
    Wall,
    DoorNearPlayer,
}

impl<R: RandomSource> GameEngine<R> {
    pub fn move_ghosts(&mut self) {
        for slot in 0..self.ghosts.capacity() {
            self.move_ghost(slot);
        }
    }

    /// One vertical roll then one horizontal roll. Empty slots consume no rolls.
    pub fn move_ghost(&mut self, slot: usize) {
        let Some(start) = self.ghosts.get(slot).map(|ghost| ghost.pos) else {
            return;
        };
        let near = is_within_range(start, self.player.pos, NEAR_PLAYER_RANGE);
        let mut pos = start;

        if self.rng.bool(GHOST_STEP_CHANCE) {
            match self.ghost_step(pos, Direction::Down, near) {
                Ok(next) => pos = next,
                Err(StepBlock::DoorNearPlayer) => {
                    if let Ok(next) = self.ghost_step(pos, Direction::Up, near) {
                        pos = next;
                    }
                }
                Err(_) => {}
            }
        }

        let horizontal = if self.rng.bool(GHOST_STEP_CHANCE) {
            Direction::Right
        } else {
            Direction::Left
        };
        if let Ok(next) = self.ghost_step(pos, horizontal, near) {
            pos = next;
        }

        if let Some(ghost) = self.ghosts.get_mut(slot) {
            ghost.pos = pos;
        }
    }

    fn ghost_step(&self, from: Vec2, dir: Direction, near: bool) -> Result<Vec2, StepBlock> {
        let to = from.step(dir);
        let in_bounds = match dir {
            Direction::Down => to.y < GHOST_MAX_Y_EXCLUSIVE,
            Direction::Up => from.y > 0,
            Direction::Right => to.x < GHOST_MAX_X_EXCLUSIVE,
            Direction::Left => from.x > 0,
        };
        if !in_bounds {
            return Err(StepBlock::OutOfBounds);
        }
        match self.level.tile_or_wall(to) {
            Tile::Wall => Err(StepBlock::Wall),
            Tile::Door if near => Err(StepBlock::DoorNearPlayer),
            _ => Ok(to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRolls;

    const STEP: f32 = 0.1;
    const STAY: f32 = 0.99;

    fn engine_with_rolls(rolls: &[f32]) -> GameEngine<ScriptedRolls> {
        let mut engine = GameEngine::with_rng(
            ScriptedRolls::idle(),
            GameEngineOptions {
                spawn_policy: SpawnPolicy::Reference,
                ..GameEngineOptions::default()
            },
        )
        .expect("reference level builds");
        for roll in rolls {
            engine.rng.push(*roll);
        }
        engine
    }

    fn place_ghost(engine: &mut GameEngine<ScriptedRolls>, pos: Vec2) {
        engine.ghosts.get_mut(0).expect("slot 0").pos = pos;
    }

    fn ghost_pos(engine: &GameEngine<ScriptedRolls>) -> Vec2 {
        engine.ghosts.get(0).expect("slot 0").pos
    }

    #[test]
    fn ghost_near_player_backs_away_from_door() {
        let mut engine = engine_with_rolls(&[STEP, STAY]);
        engine.player.pos = Vec2::new(6, 5);
        place_ghost(&mut engine, Vec2::new(6, 7));

        engine.move_ghost(0);
        assert_eq!(ghost_pos(&engine), Vec2::new(5, 6));
    }

    #[test]
    fn ghost_far_from_player_walks_through_door() {
        let mut engine = engine_with_rolls(&[STEP, STAY]);
        place_ghost(&mut engine, Vec2::new(6, 7));

        engine.move_ghost(0);
        // Down onto the door, then the left step hits the wall at (5,8).
        assert_eq!(ghost_pos(&engine), Vec2::new(6, 8));
    }

    #[test]
    fn ghost_does_not_fall_back_up_when_wall_blocks() {
        let mut engine = engine_with_rolls(&[STEP, STAY]);
        place_ghost(&mut engine, Vec2::new(10, 7));
        engine.level.set_tile(10, 8, Tile::Wall);

        engine.move_ghost(0);
        assert_eq!(ghost_pos(&engine), Vec2::new(9, 7));
    }

    #[test]
    fn ghost_stays_above_bottom_rows() {
        let mut engine = engine_with_rolls(&[STEP, STEP]);
        place_ghost(&mut engine, Vec2::new(12, 15));

        engine.move_ghost(0);
        assert_eq!(ghost_pos(&engine), Vec2::new(13, 15));
    }

    #[test]
    fn ghost_stays_left_of_right_margin() {
        let mut engine = engine_with_rolls(&[STAY, STEP]);
        place_ghost(&mut engine, Vec2::new(31, 5));

        engine.move_ghost(0);
        assert_eq!(ghost_pos(&engine), Vec2::new(31, 5));
    }

    #[test]
    fn horizontal_step_starts_from_vertical_result() {
        let mut engine = engine_with_rolls(&[STEP, STEP]);
        place_ghost(&mut engine, Vec2::new(12, 3));

        engine.move_ghost(0);
        assert_eq!(ghost_pos(&engine), Vec2::new(13, 4));
    }

    #[test]
    fn wall_blocks_horizontal_step() {
        let mut engine = engine_with_rolls(&[STAY, STAY]);
        engine.move_ghost(0);
        assert_eq!(ghost_pos(&engine), Vec2::new(10, 10));
    }

    #[test]
    fn empty_slots_consume_no_rolls() {
        let mut engine = engine_with_rolls(&[STAY, STAY, STAY, STAY]);
        engine.ghosts.clear_slot(1);
        engine.ghosts.clear_slot(2);
        engine.ghosts.clear_slot(3);

        engine.move_ghosts();
        assert_eq!(engine.rng.remaining(), 2);
    }

    #[test]
    fn ghosts_never_enter_walls_or_leave_grid() {
        let mut engine = GameEngine::new(
            99,
            GameEngineOptions {
                spawn_policy: SpawnPolicy::Reference,
                ..GameEngineOptions::default()
            },
        )
        .expect("engine");
        for _ in 0..2_000 {
            engine.move_ghosts();
            for (_, ghost) in engine.ghosts.present() {
                assert_ne!(engine.level.tile_or_wall(ghost.pos), Tile::Wall);
                assert!(ghost.pos.y < GHOST_MAX_Y_EXCLUSIVE);
                assert!(ghost.pos.x < GHOST_MAX_X_EXCLUSIVE);
            }
        }
    }
}
