#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic level generation by rejection sampling.
//!
//! Every attempt samples a random settled layout, builds its time-expanded
//! map and runs the distance field from every cell. The cell whose farthest
//! reachable state lies deepest becomes the goal, and that farthest state
//! becomes the spawn. Attempts are independent: each draws from its own
//! seeded stream, so the parallel loop returns the same puzzle for the same
//! seed on any number of threads. Layouts with no reachable goal, or where
//! every goal is already reached at the spawn, are discarded.

mod candidate;
mod config;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use yatbbh_core::{CellCoord, GoalCandidate, PuzzleError, Tile};
use yatbbh_puzzle::{advance_idle, query, Puzzle};
use yatbbh_system_distance_field::DistanceField;
use yatbbh_system_time_map::TimeMap;

pub use candidate::{attempt_seed, random_candidate};
pub use config::{Difficulty, GeneratorConfig, DEFAULT_ATTEMPTS};

/// Failures raised while generating a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The requested grid is empty or too large.
    #[error("grid of {width}x{height} cannot be generated")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// More emitters than a puzzle may hold.
    #[error("{emitters} emitters exceed the puzzle limit")]
    TooManyEmitters {
        /// Requested emitters.
        emitters: u32,
    },
    /// Walls and emitters leave no room for a goal and a spawn.
    #[error("{occupied} walls and emitters leave no room on {cells} cells")]
    Crowded {
        /// Walls plus emitters requested.
        occupied: u64,
        /// Cells in the grid.
        cells: u64,
    },
    /// The configuration asks for zero attempts.
    #[error("at least one attempt is required")]
    NoAttempts,
    /// Building a candidate violated a puzzle invariant.
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
    /// Every sampled candidate was rejected.
    #[error("none of {attempts} candidates had a reachable goal")]
    NoSolvableCandidate {
        /// Attempts that were sampled.
        attempts: u32,
    },
}

/// Puzzle produced by a generator run, ready to play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    /// Puzzle with the goal stamped and the player on the spawn.
    pub puzzle: Puzzle,
    /// Cell holding the goal tile.
    pub goal: CellCoord,
    /// Spawn selected on the candidate before it was advanced to phase zero.
    pub candidate: GoalCandidate,
    /// Index of the winning attempt.
    pub attempt: u32,
}

impl GeneratedPuzzle {
    /// Ticks the shortest solution takes.
    #[must_use]
    pub const fn solution_length(&self) -> u32 {
        self.candidate.ticks
    }
}

#[derive(Clone, Debug)]
struct Evaluation {
    attempt: u32,
    candidate: Puzzle,
    goal: CellCoord,
    best: GoalCandidate,
}

/// Generates the hardest puzzle found across `config.attempts` candidates.
pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<GeneratedPuzzle, GenerationError> {
    config.validate()?;

    let evaluations = (0..config.attempts)
        .into_par_iter()
        .map(|attempt| run_attempt(config, seed, attempt))
        .collect::<Result<Vec<_>, _>>()?;

    let mut winner: Option<Evaluation> = None;
    for evaluation in evaluations.into_iter().flatten() {
        let better = winner
            .as_ref()
            .map_or(true, |current| evaluation.best.ticks > current.best.ticks);
        if better {
            winner = Some(evaluation);
        }
    }

    let Some(winner) = winner else {
        log::warn!(
            "no solvable candidate in {} attempts for seed {}",
            config.attempts,
            seed
        );
        return Err(GenerationError::NoSolvableCandidate {
            attempts: config.attempts,
        });
    };

    let Evaluation {
        attempt,
        mut candidate,
        goal,
        best,
    } = winner;
    advance_idle(&mut candidate, best.start.phase);
    candidate.place_goal(goal)?;
    candidate.place_player(best.start.cell)?;

    log::info!(
        "generated {}x{} puzzle from attempt {}: {} ticks, {} tied spawns",
        config.width,
        config.height,
        attempt,
        best.ticks,
        best.ties
    );
    Ok(GeneratedPuzzle {
        puzzle: candidate,
        goal,
        candidate: best,
        attempt,
    })
}

fn run_attempt(
    config: &GeneratorConfig,
    seed: u64,
    attempt: u32,
) -> Result<Option<Evaluation>, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(attempt_seed(seed, attempt));
    let candidate = random_candidate(config, &mut rng)?;

    let map = match TimeMap::build(&candidate) {
        Ok(map) => map,
        Err(error) => {
            log::debug!("attempt {attempt} rejected: {error}");
            return Ok(None);
        }
    };

    let mut field = DistanceField::default();
    let mut best: Option<(CellCoord, GoalCandidate)> = None;
    for cell in query::cells(&candidate) {
        if query::tile(&candidate, cell) != Some(Tile::Empty) {
            continue;
        }
        field.recompute(&map, cell);
        let Some(found) = field.goal_candidate(&mut rng) else {
            continue;
        };
        let current = best.map_or(0, |(_, goal)| goal.ticks);
        if found.ticks > current {
            best = Some((cell, found));
        }
    }

    let Some((goal, best)) = best else {
        log::debug!("attempt {attempt} rejected: no goal is ever out of reach");
        return Ok(None);
    };
    log::debug!(
        "attempt {attempt}: goal ({}, {}) is {} ticks from the farthest spawn",
        goal.column(),
        goal.row(),
        best.ticks
    );
    Ok(Some(Evaluation {
        attempt,
        candidate,
        goal,
        best,
    }))
}

/// Generates a puzzle with [`DEFAULT_ATTEMPTS`] attempts and no walls.
pub fn generate_puzzle(
    width: u32,
    height: u32,
    emitters: u32,
    seed: u64,
) -> Result<GeneratedPuzzle, GenerationError> {
    generate(&GeneratorConfig::new(width, height, emitters), seed)
}

/// Generates a puzzle with the [`Difficulty::Easy`] preset.
pub fn generate_easy_puzzle(seed: u64) -> Result<GeneratedPuzzle, GenerationError> {
    generate(&Difficulty::Easy.config(), seed)
}

/// Generates a puzzle with the [`Difficulty::Medium`] preset.
pub fn generate_medium_puzzle(seed: u64) -> Result<GeneratedPuzzle, GenerationError> {
    generate(&Difficulty::Medium.config(), seed)
}

/// Generates a puzzle with the [`Difficulty::Hard`] preset.
pub fn generate_hard_puzzle(seed: u64) -> Result<GeneratedPuzzle, GenerationError> {
    generate(&Difficulty::Hard.config(), seed)
}
