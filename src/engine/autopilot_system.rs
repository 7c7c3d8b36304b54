use std::collections::{HashMap, VecDeque};

use super::*;
use crate::constants::{AUTOPILOT_WANDER_CHANCE, BANK_CELL};

impl<R: RandomSource> GameEngine<R> {
    /// Picks a move for unattended play: refill when drained, seal a breach
    /// while carrying, otherwise chase the nearest ghost.
    pub fn choose_autopilot_direction(&mut self) -> Direction {
        if self.rng.bool(AUTOPILOT_WANDER_CHANCE) {
            return self.random_direction();
        }

        let Some(goal) = self.autopilot_goal() else {
            return self.random_direction();
        };
        if goal == self.player.pos {
            return self.attack_in_place_direction();
        }
        match self.path_step(goal) {
            Some(dir) => dir,
            None => self.random_direction(),
        }
    }

    fn autopilot_goal(&self) -> Option<Vec2> {
        let from = self.player.pos;
        if self.player.energy() <= 0 {
            return Some(BANK_CELL);
        }
        if self.player.is_carrying_ghost() {
            let breach = self
                .level
                .cells_of(Tile::Breach)
                .into_iter()
                .min_by_key(|cell| manhattan(from, *cell));
            return breach.or(Some(BANK_CELL));
        }
        self.ghosts
            .present()
            .map(|(_, ghost)| ghost.pos)
            .min_by_key(|pos| manhattan(from, *pos))
    }

    /// A blocked move keeps the player on a shared cell and still attacks.
    fn attack_in_place_direction(&mut self) -> Direction {
        let from = self.player.pos;
        Direction::ALL
            .into_iter()
            .find(|dir| self.level.tile_or_wall(from.step(*dir)) == Tile::Wall)
            .unwrap_or_else(|| self.random_direction())
    }

    /// First move of a shortest walk to `goal`. The goal itself may be a breach.
    fn path_step(&self, goal: Vec2) -> Option<Direction> {
        let start = self.player.pos;
        let mut first_step: HashMap<Vec2, Direction> = HashMap::new();
        let mut queue = VecDeque::new();

        for dir in Direction::ALL {
            let next = start.step(dir);
            if self.autopilot_can_enter(next, goal) {
                first_step.insert(next, dir);
                queue.push_back(next);
            }
        }

        while let Some(cell) = queue.pop_front() {
            let dir = *first_step.get(&cell)?;
            if cell == goal {
                return Some(dir);
            }
            for step in Direction::ALL {
                let next = cell.step(step);
                if next == start || first_step.contains_key(&next) {
                    continue;
                }
                if self.autopilot_can_enter(next, goal) {
                    first_step.insert(next, dir);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn autopilot_can_enter(&self, cell: Vec2, goal: Vec2) -> bool {
        cell == goal || !self.level.tile_or_wall(cell).blocks_player()
    }

    fn random_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.pick_index(Direction::ALL.len())]
    }
}
