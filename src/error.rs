use thiserror::Error;

/// Failures while (re)building a level. Turn resolution itself cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("ran out of spawn cells: needed {requested}, only {available} left")]
    SpawnExhausted { requested: usize, available: usize },
    #[error("fixed spawn cell ({x},{y}) is not free open terrain")]
    SpawnUnavailable { x: i32, y: i32 },
}
