use super::*;

/// Draws the player spawn and `capacity` ghost spawns out of `candidates`.
///
/// Every chosen cell is removed from `candidates`, so no two entities share a
/// cell. Fails before touching `candidates` when there are not enough cells.
pub fn place_entities<R: RandomSource + ?Sized>(
    candidates: &mut Vec<Vec2>,
    policy: SpawnPolicy,
    capacity: usize,
    rng: &mut R,
) -> Result<(Vec2, Vec<Vec2>), GameError> {
    let requested = capacity + 1;
    if candidates.len() < requested {
        return Err(GameError::SpawnExhausted {
            requested,
            available: candidates.len(),
        });
    }

    match policy {
        SpawnPolicy::Random => {
            let player = take_random(candidates, rng)?;
            let mut ghosts = Vec::with_capacity(capacity);
            for _ in 0..capacity {
                ghosts.push(take_random(candidates, rng)?);
            }
            Ok((player, ghosts))
        }
        SpawnPolicy::Reference => {
            for cell in std::iter::once(&REFERENCE_PLAYER_SPAWN)
                .chain(REFERENCE_GHOST_SPAWNS.iter().take(capacity))
            {
                if !candidates.contains(cell) {
                    return Err(GameError::SpawnUnavailable {
                        x: cell.x,
                        y: cell.y,
                    });
                }
            }

            let player = take_fixed(candidates, REFERENCE_PLAYER_SPAWN)?;
            let mut ghosts = Vec::with_capacity(capacity);
            for cell in REFERENCE_GHOST_SPAWNS.iter().take(capacity) {
                ghosts.push(take_fixed(candidates, *cell)?);
            }
            while ghosts.len() < capacity {
                ghosts.push(take_random(candidates, rng)?);
            }
            Ok((player, ghosts))
        }
    }
}

fn take_random<R: RandomSource + ?Sized>(
    candidates: &mut Vec<Vec2>,
    rng: &mut R,
) -> Result<Vec2, GameError> {
    if candidates.is_empty() {
        return Err(GameError::SpawnExhausted {
            requested: 1,
            available: 0,
        });
    }
    let idx = rng.pick_index(candidates.len());
    Ok(candidates.swap_remove(idx))
}

fn take_fixed(candidates: &mut Vec<Vec2>, cell: Vec2) -> Result<Vec2, GameError> {
    match candidates.iter().position(|candidate| *candidate == cell) {
        Some(idx) => Ok(candidates.remove(idx)),
        None => Err(GameError::SpawnUnavailable {
            x: cell.x,
            y: cell.y,
        }),
    }
}
