use tracing::{debug, info};

use crate::constants::{ROSTER_CAPACITY, REFERENCE_GHOST_SPAWNS, REFERENCE_PLAYER_SPAWN};
use crate::entity::{Ghost, GhostRoster, Player};
use crate::error::GameError;
use crate::render::{Frame, Renderer};
use crate::rng::{RandomSource, Rng};
use crate::types::{Direction, GameEvent, Snapshot, Tile, TurnReport, Vec2};
use crate::world::{compute_spawn_candidates, generate_level, Level};

mod autopilot_system;
mod combat_system;
mod ghost_system;
mod spawn_system;
mod utils;

pub use self::spawn_system::place_entities;

use self::utils::{is_within_range, manhattan};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpawnPolicy {
    /// Draw every position from the spawn candidates with the engine rng.
    #[default]
    Random,
    /// Use the fixed reference positions, taken out of the spawn candidates.
    Reference,
}

#[derive(Clone, Debug)]
pub struct GameEngineOptions {
    pub spawn_policy: SpawnPolicy,
    pub roster_capacity: usize,
}

impl Default for GameEngineOptions {
    fn default() -> Self {
        Self {
            spawn_policy: SpawnPolicy::Random,
            roster_capacity: ROSTER_CAPACITY,
        }
    }
}

/// Owns the whole simulation: level grid, player, ghost roster and counters.
#[derive(Clone, Debug)]
pub struct GameEngine<R: RandomSource = Rng> {
    options: GameEngineOptions,
    rng: R,
    level: Level,
    player: Player,
    ghosts: GhostRoster,
    spawn_candidates: Vec<Vec2>,
    events: Vec<GameEvent>,
    level_number: u32,
    turn: u64,
}

impl GameEngine<Rng> {
    pub fn new(seed: u32, options: GameEngineOptions) -> Result<Self, GameError> {
        Self::with_rng(Rng::new(seed), options)
    }
}

impl<R: RandomSource> GameEngine<R> {
    pub fn with_rng(rng: R, options: GameEngineOptions) -> Result<Self, GameError> {
        let capacity = options.roster_capacity;
        let mut engine = Self {
            options,
            rng,
            level: Level::filled(0, 0, Tile::Wall),
            player: Player::new(REFERENCE_PLAYER_SPAWN),
            ghosts: GhostRoster::empty(capacity),
            spawn_candidates: Vec::new(),
            events: Vec::new(),
            level_number: 0,
            turn: 0,
        };
        engine.start_game()?;
        Ok(engine)
    }

    /// Builds level one. Called once by the constructors.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        self.load_level(1)?;
        self.turn = 0;
        self.events.clear();
        info!(
            spawn_policy = ?self.options.spawn_policy,
            ghosts = self.ghosts.present_count(),
            "game started"
        );
        Ok(())
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn ghosts(&self) -> &GhostRoster {
        &self.ghosts
    }

    pub fn ghosts_mut(&mut self) -> &mut GhostRoster {
        &mut self.ghosts
    }

    pub fn spawn_candidates(&self) -> &[Vec2] {
        &self.spawn_candidates
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// One full turn: the player's move followed by the world update.
    pub fn play_turn(
        &mut self,
        dir: Direction,
        renderer: &mut dyn Renderer,
    ) -> Result<TurnReport, GameError> {
        self.move_player(dir);
        self.do_turn(renderer)
    }

    pub fn move_player_up(&mut self) {
        self.move_player(Direction::Up);
    }

    pub fn move_player_down(&mut self) {
        self.move_player(Direction::Down);
    }

    pub fn move_player_left(&mut self) {
        self.move_player(Direction::Left);
    }

    pub fn move_player_right(&mut self) {
        self.move_player(Direction::Right);
    }

    /// Resolves a move request and its side effects, then attacks every ghost
    /// sharing the player's cell. A blocked move still attacks in place.
    pub fn move_player(&mut self, dir: Direction) {
        let target = self.player.pos.step(dir);
        debug_assert!(
            self.level.in_bounds(target.x, target.y),
            "move target outside the grid: {target:?}"
        );

        if !self.level.tile_or_wall(target).blocks_player() {
            self.player.pos = target;
            if self.level.tile_or_wall(target) == Tile::Bank {
                self.player.refill_energy();
                let had_ghost = self.player.deposit_ghost();
                debug!(x = target.x, y = target.y, had_ghost, "deposited at bank");
                self.events.push(GameEvent::Deposited {
                    x: target.x,
                    y: target.y,
                    had_ghost,
                });
            }
        }

        let ahead = self.player.pos.step(dir);
        if self.level.tile_or_wall(ahead) == Tile::Breach && self.player.is_carrying_ghost() {
            self.player.deposit_ghost();
            self.level.set_tile(ahead.x, ahead.y, Tile::Floor2);
            debug!(x = ahead.x, y = ahead.y, "breach sealed");
            self.events.push(GameEvent::BreachSealed {
                x: ahead.x,
                y: ahead.y,
            });
        }

        for slot in 0..self.ghosts.capacity() {
            let collides = self
                .ghosts
                .get(slot)
                .is_some_and(|ghost| ghost.pos == self.player.pos);
            if collides {
                self.hit_ghost(slot);
            }
        }
    }

    /// World update after the player's move: cleanup, ghost movement, render,
    /// then a level advance once every roster slot is empty.
    ///
    /// On a failed advance the turn counter is left as it was and the queued
    /// events carry over into the next report.
    pub fn do_turn(&mut self, renderer: &mut dyn Renderer) -> Result<TurnReport, GameError> {
        let turn = self.turn + 1;
        self.clean_defeated_ghosts();
        self.move_ghosts();
        renderer.render(&self.frame_at(turn));

        let level_advanced = self.ghosts.is_empty();
        if level_advanced {
            self.advance_level(turn)?;
        }

        self.turn = turn;
        Ok(TurnReport {
            turn: self.turn,
            level: self.level_number,
            level_advanced,
            events: std::mem::take(&mut self.events),
        })
    }

    pub fn frame(&self) -> Frame<'_> {
        self.frame_at(self.turn)
    }

    fn frame_at(&self, turn: u64) -> Frame<'_> {
        Frame {
            turn,
            level_number: self.level_number,
            level: &self.level,
            player: &self.player,
            ghosts: &self.ghosts,
            events: &self.events,
        }
    }

    pub fn build_snapshot(&self) -> Snapshot {
        self.frame().snapshot()
    }

    fn advance_level(&mut self, turn: u64) -> Result<(), GameError> {
        let next = self.level_number.saturating_add(1);
        self.load_level(next)?;
        info!(level = next, turn, "level advanced");
        self.events.push(GameEvent::LevelAdvanced { level: next });
        Ok(())
    }

    /// Regenerates the grid and re-places every entity. Nothing is touched on failure.
    fn load_level(&mut self, level_number: u32) -> Result<(), GameError> {
        let level = generate_level();
        let mut candidates = compute_spawn_candidates(&level);
        let (player_spawn, ghost_spawns) = place_entities(
            &mut candidates,
            self.options.spawn_policy,
            self.options.roster_capacity,
            &mut self.rng,
        )?;

        let mut ghosts = GhostRoster::empty(self.options.roster_capacity);
        for spawn in ghost_spawns {
            let placed = ghosts.insert(Ghost::new(spawn));
            debug_assert!(placed.is_ok(), "more ghost spawns than roster slots");
        }

        self.level = level;
        self.spawn_candidates = candidates;
        self.player.reset_at(player_spawn);
        self.ghosts = ghosts;
        self.level_number = level_number;
        Ok(())
    }
}
