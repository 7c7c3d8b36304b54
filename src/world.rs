use std::collections::{HashSet, VecDeque};

use crate::constants::{BANK_CELL, BREACH_CELLS, LEVEL_HEIGHT, LEVEL_WIDTH};
use crate::types::{Tile, Vec2};

/// A rectangular tile grid. Cells are stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Level {
    pub fn filled(width: i32, height: i32, tile: Tile) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![tile; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.tiles.get((y * self.width + x) as usize).copied()
    }

    /// Cells outside the grid read as walls.
    pub fn tile_or_wall(&self, pos: Vec2) -> Tile {
        self.tile(pos.x, pos.y).unwrap_or(Tile::Wall)
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        debug_assert!(self.in_bounds(x, y), "set_tile out of bounds: ({x},{y})");
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = (y * self.width + x) as usize;
        self.tiles[idx] = tile;
    }

    fn fill_row(&mut self, y: i32, xs: std::ops::Range<i32>, tile: Tile) {
        for x in xs {
            self.set_tile(x, y, tile);
        }
    }

    fn fill_column(&mut self, x: i32, ys: std::ops::Range<i32>, tile: Tile) {
        for y in ys {
            self.set_tile(x, y, tile);
        }
    }

    /// Coordinates of every cell holding `tile`, x-major.
    pub fn cells_of(&self, tile: Tile) -> Vec<Vec2> {
        let mut out = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                if self.tile(x, y) == Some(tile) {
                    out.push(Vec2 { x, y });
                }
            }
        }
        out
    }

    pub fn count_of(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.tile_or_wall(Vec2 { x, y }).glyph())
                    .collect::<String>()
            })
            .collect()
    }
}

/// Builds the fixed level template.
pub fn generate_level() -> Level {
    let mut level = Level::filled(LEVEL_WIDTH, LEVEL_HEIGHT, Tile::Floor1);

    level.fill_row(0, 0..LEVEL_WIDTH, Tile::Wall);
    level.fill_row(LEVEL_HEIGHT - 1, 0..LEVEL_WIDTH, Tile::Wall);
    level.fill_column(0, 0..LEVEL_HEIGHT, Tile::Wall);
    level.fill_column(LEVEL_WIDTH - 1, 0..LEVEL_HEIGHT, Tile::Wall);

    // West vault around the bank, entered through two doors.
    level.fill_row(8, 0..9, Tile::Wall);
    level.set_tile(6, 8, Tile::Door);
    level.fill_column(9, 8..16, Tile::Wall);
    level.fill_row(15, 0..10, Tile::Wall);
    level.set_tile(3, 15, Tile::Door);
    level.set_tile(BANK_CELL.x, BANK_CELL.y, Tile::Bank);

    level.fill_column(18, 0..9, Tile::Wall);
    level.fill_row(8, 13..18, Tile::Wall);

    // South-east room.
    level.fill_column(30, 12..17, Tile::Wall);
    level.fill_column(19, 12..17, Tile::Wall);
    level.set_tile(19, 14, Tile::Door);
    level.fill_row(12, 20..30, Tile::Wall);
    level.set_tile(25, 12, Tile::Door);

    for cell in BREACH_CELLS {
        level.set_tile(cell.x, cell.y, Tile::Breach);
    }

    level
}

/// Every cell that can host a freshly placed entity, x-major.
pub fn compute_spawn_candidates(level: &Level) -> Vec<Vec2> {
    let mut out = Vec::new();
    for x in 0..level.width() {
        for y in 0..level.height() {
            if level.tile(x, y).is_some_and(Tile::is_spawnable) {
                out.push(Vec2 { x, y });
            }
        }
    }
    out
}

/// Flood fill over non-wall cells, starting from `start`.
pub fn reachable_cells(level: &Level, start: Vec2) -> HashSet<Vec2> {
    let mut out = HashSet::new();
    if level.tile_or_wall(start) == Tile::Wall {
        return out;
    }

    let mut queue = VecDeque::new();
    out.insert(start);
    queue.push_back(start);

    while let Some(Vec2 { x, y }) = queue.pop_front() {
        for next in [
            Vec2 { x: x - 1, y },
            Vec2 { x: x + 1, y },
            Vec2 { x, y: y - 1 },
            Vec2 { x, y: y + 1 },
        ] {
            if level.tile_or_wall(next) == Tile::Wall {
                continue;
            }
            if out.insert(next) {
                queue.push_back(next);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_cells_are_walls() {
        let level = generate_level();
        for x in 0..level.width() {
            assert_eq!(level.tile(x, 0), Some(Tile::Wall));
            assert_eq!(level.tile(x, level.height() - 1), Some(Tile::Wall));
        }
        for y in 0..level.height() {
            assert_eq!(level.tile(0, y), Some(Tile::Wall));
            assert_eq!(level.tile(level.width() - 1, y), Some(Tile::Wall));
        }
    }

    #[test]
    fn template_has_single_bank_and_doors() {
        let level = generate_level();
        assert_eq!(level.count_of(Tile::Bank), 1);
        assert_eq!(level.cells_of(Tile::Bank), vec![BANK_CELL]);
        assert_eq!(level.count_of(Tile::Door), 4);
        assert_eq!(level.count_of(Tile::Breach), BREACH_CELLS.len());
    }

    #[test]
    fn every_open_cell_and_breach_is_reachable() {
        let level = generate_level();
        let start = compute_spawn_candidates(&level)[0];
        let reachable = reachable_cells(&level, start);

        for breach in level.cells_of(Tile::Breach) {
            assert!(reachable.contains(&breach), "breach unreachable: {breach:?}");
            let has_floor_neighbor = [(-1, 0), (1, 0), (0, -1), (0, 1)].iter().any(|(dx, dy)| {
                level
                    .tile(breach.x + dx, breach.y + dy)
                    .is_some_and(Tile::is_floor)
            });
            assert!(has_floor_neighbor, "breach has no floor neighbour: {breach:?}");
        }
        for candidate in compute_spawn_candidates(&level) {
            assert!(reachable.contains(&candidate), "cell unreachable: {candidate:?}");
        }
        assert!(reachable.contains(&BANK_CELL));
    }

    #[test]
    fn spawn_candidates_skip_wall_bank_and_breach() {
        let level = generate_level();
        let candidates = compute_spawn_candidates(&level);
        assert!(!candidates.is_empty());
        for cell in &candidates {
            let tile = level.tile(cell.x, cell.y).expect("candidate in bounds");
            assert!(tile.is_spawnable(), "bad candidate {cell:?} on {tile:?}");
        }

        let mut sorted = candidates.clone();
        sorted.sort_by_key(|cell| (cell.x, cell.y));
        assert_eq!(sorted, candidates, "scan order must be x-major");
    }

    #[test]
    fn spawn_candidates_are_empty_without_open_terrain() {
        let mut level = Level::filled(4, 3, Tile::Wall);
        level.set_tile(1, 1, Tile::Bank);
        level.set_tile(2, 1, Tile::Breach);
        assert!(compute_spawn_candidates(&level).is_empty());
    }

    #[test]
    fn out_of_bounds_reads_are_walls() {
        let level = generate_level();
        assert_eq!(level.tile(-1, 3), None);
        assert_eq!(level.tile(LEVEL_WIDTH, 3), None);
        assert_eq!(level.tile_or_wall(Vec2::new(3, LEVEL_HEIGHT)), Tile::Wall);
    }

    #[test]
    fn rows_render_glyphs() {
        let level = generate_level();
        let rows = level.to_rows();
        assert_eq!(rows.len(), LEVEL_HEIGHT as usize);
        assert!(rows.iter().all(|row| row.chars().count() == LEVEL_WIDTH as usize));
        assert_eq!(rows[0], "#".repeat(LEVEL_WIDTH as usize));
        assert_eq!(rows[BANK_CELL.y as usize].as_bytes()[BANK_CELL.x as usize], b'$');
    }
}
