use crate::entity::{GhostRoster, Player};
use crate::types::{GameEvent, Snapshot};
use crate::world::Level;

/// Read-only view of the simulation handed to the presentation layer once per turn.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub turn: u64,
    pub level_number: u32,
    pub level: &'a Level,
    pub player: &'a Player,
    pub ghosts: &'a GhostRoster,
    /// Events raised so far in the turn being drawn.
    pub events: &'a [GameEvent],
}

impl Frame<'_> {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            turn: self.turn,
            level: self.level_number,
            width: self.level.width(),
            height: self.level.height(),
            tiles: self.level.to_rows(),
            player: self.player.view(),
            ghosts: self.ghosts.views(),
            events: self.events.to_vec(),
        }
    }

    /// Tile rows with ghosts (`G`) and the player (`@`) drawn on top.
    pub fn ascii(&self) -> Vec<String> {
        let mut rows: Vec<Vec<char>> = self
            .level
            .to_rows()
            .into_iter()
            .map(|row| row.chars().collect())
            .collect();
        for (_, ghost) in self.ghosts.present() {
            if let Some(cell) = rows
                .get_mut(ghost.pos.y as usize)
                .and_then(|row| row.get_mut(ghost.pos.x as usize))
            {
                *cell = 'G';
            }
        }
        if let Some(cell) = rows
            .get_mut(self.player.pos.y as usize)
            .and_then(|row| row.get_mut(self.player.pos.x as usize))
        {
            *cell = '@';
        }
        rows.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Frame<'_>) {}
}

/// Keeps the most recent frame as text with a one-line status header.
#[derive(Clone, Debug, Default)]
pub struct AsciiRenderer {
    pub last_frame: Vec<String>,
}

impl Renderer for AsciiRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        let mut lines = vec![format!(
            "level {} turn {} energy {}/{} carrying {} ghosts {}",
            frame.level_number,
            frame.turn,
            frame.player.energy(),
            frame.player.max_energy(),
            if frame.player.is_carrying_ghost() { "yes" } else { "no" },
            frame.ghosts.present_count(),
        )];
        lines.extend(frame.ascii());
        self.last_frame = lines;
    }
}

#[derive(Clone, Debug, Default)]
pub struct SnapshotRecorder {
    pub snapshots: Vec<Snapshot>,
}

impl SnapshotRecorder {
    pub fn drain(&mut self) -> Vec<Snapshot> {
        std::mem::take(&mut self.snapshots)
    }
}

impl Renderer for SnapshotRecorder {
    fn render(&mut self, frame: &Frame<'_>) {
        self.snapshots.push(frame.snapshot());
    }
}
