use thiserror::Error;

use crate::types::Direction;

pub const DEFAULT_TURN_LIMIT: u64 = 500;
pub const MAX_TURN_LIMIT: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown move {token:?} after {parsed} parsed moves")]
    UnknownMove { token: String, parsed: usize },
}

/// Parses a move script into directions.
///
/// Tokens are separated by whitespace or commas. A token is either a full
/// word (`up`, `Down`, ...) or a run of single-letter moves: `U D L R` in
/// upper case or `w a s d` in lower case. Lower-case `u l r` are accepted too,
/// so only `d`/`D` depends on case.
pub fn parse_move_script(raw: &str) -> Result<Vec<Direction>, InputError> {
    let mut moves = Vec::new();
    for token in raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
    {
        if token.len() > 1 {
            if let Some(dir) = Direction::parse_move(&token.to_ascii_lowercase()) {
                moves.push(dir);
                continue;
            }
        }
        for letter in token.chars() {
            match parse_move_letter(letter) {
                Some(dir) => moves.push(dir),
                None => {
                    return Err(InputError::UnknownMove {
                        token: token.to_string(),
                        parsed: moves.len(),
                    })
                }
            }
        }
    }
    Ok(moves)
}

fn parse_move_letter(letter: char) -> Option<Direction> {
    match letter {
        'U' | 'u' | 'W' | 'w' => Some(Direction::Up),
        'D' | 'S' | 's' => Some(Direction::Down),
        'L' | 'l' | 'A' | 'a' => Some(Direction::Left),
        'R' | 'r' | 'd' => Some(Direction::Right),
        _ => None,
    }
}

pub fn normalize_turn_limit(value: Option<u64>) -> u64 {
    value.unwrap_or(DEFAULT_TURN_LIMIT).clamp(1, MAX_TURN_LIMIT)
}

pub fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}
