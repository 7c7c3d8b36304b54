use tracing::warn;

use super::*;
use crate::constants::{HIT_DAMAGE, HIT_ENERGY_COST};

impl<R: RandomSource> GameEngine<R> {
    /// Spends energy to damage the ghost in `slot`, then runs the cleanup pass.
    pub fn hit_ghost(&mut self, slot: usize) {
        let energy = self.player.energy();
        if let Some(ghost) = self.ghosts.get_mut(slot) {
            if energy > 0 {
                self.player.change_energy(-HIT_ENERGY_COST);
                ghost.change_health(-HIT_DAMAGE);
                debug!(
                    slot,
                    health = ghost.health(),
                    energy = self.player.energy(),
                    "ghost hit"
                );
                self.events.push(GameEvent::GhostHit {
                    slot,
                    health: ghost.health(),
                    energy: self.player.energy(),
                });
            } else {
                self.events.push(GameEvent::HitWithoutEnergy { slot });
            }

            if ghost.is_defeated() {
                self.player.capture_ghost();
                debug!(slot, "ghost captured");
                self.events.push(GameEvent::GhostCaptured { slot });
            }
        }

        self.clean_defeated_ghosts();
    }

    /// Empties defeated slots. An emptied roster refills from the breaches
    /// while the player still carries a ghost.
    pub fn clean_defeated_ghosts(&mut self) {
        for slot in self.ghosts.remove_defeated() {
            self.events.push(GameEvent::GhostCleared { slot });
        }

        if self.ghosts.is_empty() && self.player.is_carrying_ghost() {
            self.respawn_from_breaches();
        }
    }

    fn respawn_from_breaches(&mut self) {
        let mut count = 0;
        let mut dropped = 0;
        for breach in self.level.cells_of(Tile::Breach) {
            match self.ghosts.insert(Ghost::new(breach)) {
                Ok(_) => {
                    self.level.set_tile(breach.x, breach.y, Tile::Floor1);
                    count += 1;
                }
                Err(_) => dropped += 1,
            }
        }

        if count > 0 {
            debug!(count, "ghosts respawned from breaches");
            self.events.push(GameEvent::GhostsRespawned { count });
        }
        if dropped > 0 {
            warn!(
                dropped,
                capacity = self.ghosts.capacity(),
                "roster full, breaches left unopened"
            );
            self.events.push(GameEvent::RespawnOverflow { dropped });
        }
    }
}
