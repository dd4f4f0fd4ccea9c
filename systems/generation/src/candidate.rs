//! Random candidate layouts and per-attempt seed derivation.

use rand::{seq::SliceRandom, Rng};
use sha2::{Digest, Sha256};
use yatbbh_core::{
    CellCoord, CompassMask, Emitter, EmitterKind, PuzzleError, Tile, ACCEPTED_CYCLE_LENGTHS,
};
use yatbbh_puzzle::{query, settle, Puzzle};

use crate::{GenerationError, GeneratorConfig};

const RNG_STREAM_ATTEMPT: &str = "yatbbh.generation.attempt";

/// Samples one settled candidate layout.
///
/// Walls go down first, then emitters, each on a uniformly chosen empty tile.
/// Every emitter gets a random kind, a non-empty direction mask, a cycle
/// length from [`ACCEPTED_CYCLE_LENGTHS`], a fire schedule that arms at
/// least once per cycle and a random starting step. The candidate is settled
/// before it is returned so its obstacle field is periodic.
pub fn random_candidate<R: Rng>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Puzzle, GenerationError> {
    let mut puzzle = Puzzle::new(config.width, config.height)?;
    let crowded = GenerationError::Crowded {
        occupied: u64::from(config.walls) + u64::from(config.emitters),
        cells: u64::from(config.width) * u64::from(config.height),
    };

    for _ in 0..config.walls {
        let cell = vacant_cell(&puzzle, rng).ok_or(crowded)?;
        puzzle.place_wall(cell)?;
    }

    for _ in 0..config.emitters {
        let cell = vacant_cell(&puzzle, rng).ok_or(crowded)?;
        puzzle.place_emitter(random_emitter(cell, rng)?)?;
    }

    settle(&mut puzzle);
    Ok(puzzle)
}

fn vacant_cell<R: Rng>(puzzle: &Puzzle, rng: &mut R) -> Option<CellCoord> {
    let vacant: Vec<CellCoord> = query::cells(puzzle)
        .filter(|cell| query::tile(puzzle, *cell) == Some(Tile::Empty))
        .collect();
    vacant.choose(rng).copied()
}

fn random_emitter<R: Rng>(cell: CellCoord, rng: &mut R) -> Result<Emitter, PuzzleError> {
    let kind = EmitterKind::ALL[rng.gen_range(0..EmitterKind::ALL.len())];
    let directions = CompassMask::from_bits(rng.gen_range(1..=u8::MAX));
    let cycle_length = ACCEPTED_CYCLE_LENGTHS[rng.gen_range(0..ACCEPTED_CYCLE_LENGTHS.len())];
    let armed = u8::MAX >> (8 - cycle_length);
    let fire_schedule = rng.gen_range(1..=armed);
    let step = rng.gen_range(0..cycle_length);
    Emitter::new(cell, kind, directions, fire_schedule, cycle_length, step)
}

/// Seed of the random stream used by one generator attempt.
#[must_use]
pub fn attempt_seed(seed: u64, attempt: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(RNG_STREAM_ATTEMPT.as_bytes());
    hasher.update(attempt.to_le_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
