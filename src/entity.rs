use crate::constants::{GHOST_MAX_HEALTH, PLAYER_MAX_ENERGY};
use crate::types::{GhostView, PlayerView, Vec2};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: Vec2,
    energy: i32,
    max_energy: i32,
    carrying_ghost: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            energy: PLAYER_MAX_ENERGY,
            max_energy: PLAYER_MAX_ENERGY,
            carrying_ghost: false,
        }
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn max_energy(&self) -> i32 {
        self.max_energy
    }

    /// Adds `delta`, clamped to `0..=max_energy`.
    pub fn change_energy(&mut self, delta: i32) {
        self.energy = self.energy.saturating_add(delta).clamp(0, self.max_energy);
    }

    pub fn set_energy(&mut self, energy: i32) {
        self.energy = energy.clamp(0, self.max_energy);
    }

    pub fn refill_energy(&mut self) {
        self.energy = self.max_energy;
    }

    pub fn is_carrying_ghost(&self) -> bool {
        self.carrying_ghost
    }

    pub fn capture_ghost(&mut self) {
        self.carrying_ghost = true;
    }

    /// Drops the carried ghost; returns whether one was held.
    pub fn deposit_ghost(&mut self) -> bool {
        std::mem::replace(&mut self.carrying_ghost, false)
    }

    /// Resets the player for a fresh level.
    pub fn reset_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.energy = self.max_energy;
        self.carrying_ghost = false;
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            x: self.pos.x,
            y: self.pos.y,
            energy: self.energy,
            max_energy: self.max_energy,
            carrying_ghost: self.carrying_ghost,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ghost {
    pub pos: Vec2,
    health: i32,
    max_health: i32,
}

impl Ghost {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            health: GHOST_MAX_HEALTH,
            max_health: GHOST_MAX_HEALTH,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn change_health(&mut self, delta: i32) {
        self.health = self.health.saturating_add(delta).clamp(0, self.max_health);
    }

    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.max_health);
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

/// Fixed number of ghost slots; `None` marks an empty slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GhostRoster {
    slots: Vec<Option<Ghost>>,
}

impl GhostRoster {
    pub fn empty(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<&Ghost> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Ghost> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    pub fn present(&self) -> impl Iterator<Item = (usize, &Ghost)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, ghost)| ghost.as_ref().map(|ghost| (slot, ghost)))
    }

    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Puts `ghost` in the first free slot, handing it back when the roster is full.
    pub fn insert(&mut self, ghost: Ghost) -> Result<usize, Ghost> {
        match self.slots.iter().position(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(ghost);
                Ok(slot)
            }
            None => Err(ghost),
        }
    }

    pub fn clear_slot(&mut self, slot: usize) -> Option<Ghost> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Empties every slot whose ghost is defeated and returns the freed slot indices.
    pub fn remove_defeated(&mut self) -> Vec<usize> {
        let mut cleared = Vec::new();
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.as_ref().is_some_and(Ghost::is_defeated) {
                *entry = None;
                cleared.push(slot);
            }
        }
        cleared
    }

    pub fn views(&self) -> Vec<Option<GhostView>> {
        self.slots
            .iter()
            .enumerate()
            .map(|(slot, ghost)| {
                ghost.as_ref().map(|ghost| GhostView {
                    slot,
                    x: ghost.pos.x,
                    y: ghost.pos.y,
                    health: ghost.health,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_is_clamped_to_range() {
        let mut player = Player::new(Vec2::new(1, 1));
        player.change_energy(50);
        assert_eq!(player.energy(), PLAYER_MAX_ENERGY);
        player.change_energy(-250);
        assert_eq!(player.energy(), 0);
        player.refill_energy();
        assert_eq!(player.energy(), player.max_energy());
    }

    #[test]
    fn deposit_reports_previous_carry_state() {
        let mut player = Player::new(Vec2::new(1, 1));
        assert!(!player.deposit_ghost());
        player.capture_ghost();
        assert!(player.is_carrying_ghost());
        assert!(player.deposit_ghost());
        assert!(!player.is_carrying_ghost());
    }

    #[test]
    fn reset_restores_energy_and_drops_carry() {
        let mut player = Player::new(Vec2::new(1, 1));
        player.change_energy(-70);
        player.capture_ghost();
        player.reset_at(Vec2::new(4, 4));
        assert_eq!(player.pos, Vec2::new(4, 4));
        assert_eq!(player.energy(), PLAYER_MAX_ENERGY);
        assert!(!player.is_carrying_ghost());
    }

    #[test]
    fn roster_insert_fills_lowest_free_slot_and_refuses_overflow() {
        let mut roster = GhostRoster::empty(2);
        assert!(roster.is_empty());
        assert_eq!(roster.insert(Ghost::new(Vec2::new(1, 1))), Ok(0));
        assert_eq!(roster.insert(Ghost::new(Vec2::new(2, 2))), Ok(1));
        assert!(roster.insert(Ghost::new(Vec2::new(3, 3))).is_err());

        roster.clear_slot(0);
        assert_eq!(roster.insert(Ghost::new(Vec2::new(4, 4))), Ok(0));
        assert_eq!(roster.present_count(), 2);
    }

    #[test]
    fn remove_defeated_only_clears_ghosts_at_zero_health() {
        let mut roster = GhostRoster::empty(3);
        roster.insert(Ghost::new(Vec2::new(1, 1))).expect("free slot");
        roster.insert(Ghost::new(Vec2::new(2, 2))).expect("free slot");
        roster.get_mut(1).expect("ghost in slot 1").change_health(-GHOST_MAX_HEALTH);

        assert_eq!(roster.remove_defeated(), vec![1]);
        assert!(roster.get(0).is_some());
        assert!(roster.get(1).is_none());
        assert_eq!(roster.views().len(), 3);
        assert!(roster.views()[1].is_none());
    }
}
