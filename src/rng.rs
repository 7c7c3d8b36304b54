use std::collections::VecDeque;

/// Source of uniform rolls in `[0, 1)` driving every random choice the engine makes.
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;

    fn bool(&mut self, probability: f32) -> bool {
        self.next_f32() < probability
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_f32() * len as f32).floor().min((len - 1) as f32) as usize
    }
}

#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl RandomSource for Rng {
    fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        (out as f64 / 4_294_967_296.0) as f32
    }
}

/// Replays a fixed list of rolls, then repeats `fallback` forever.
#[derive(Clone, Debug)]
pub struct ScriptedRolls {
    rolls: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = f32>, fallback: f32) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback,
        }
    }

    /// Every roll lands at 0.99: no vertical step and always a left step attempt.
    pub fn idle() -> Self {
        Self::new([], 0.99)
    }

    pub fn push(&mut self, roll: f32) {
        self.rolls.push_back(roll);
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RandomSource for ScriptedRolls {
    fn next_f32(&mut self) -> f32 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}
