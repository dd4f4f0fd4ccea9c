#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turns a distance field into a concrete, kernel-validated move sequence.
//!
//! The walk starts from the player's cell at phase zero and, at every tick,
//! commits the first move in [`PlayerMove::PRIORITY`] order that survives a
//! speculative kernel step and lands one tick closer to the target. The live
//! kernel has the final word: a move the field approves but the kernel kills
//! is never committed.

use yatbbh_core::{
    CellCoord, PhaseCell, PlayerMove, Solution, SolutionTooLong, StepOutcome, MAX_SOLUTION_LENGTH,
};
use yatbbh_puzzle::{query, step, Puzzle};
use yatbbh_system_distance_field::DistanceField;

/// Failures raised while reconstructing a solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReconstructionError {
    /// The puzzle has no player to start from.
    #[error("puzzle has no player to route")]
    MissingPlayer,
    /// The start state cannot reach the target.
    #[error("target is unreachable from ({}, {})", .cell.column(), .cell.row())]
    Unreachable {
        /// Start cell.
        cell: CellCoord,
    },
    /// The player already stands on the target.
    #[error("player already stands on the target at ({}, {})", .cell.column(), .cell.row())]
    DegenerateStart {
        /// Start cell.
        cell: CellCoord,
    },
    /// No move agrees with both the field and the kernel.
    ///
    /// This means the field and the kernel disagree about the obstacle field.
    #[error(
        "no consistent move at step {step} from ({}, {}) in phase {phase}",
        .cell.column(),
        .cell.row()
    )]
    NoConsistentMove {
        /// Index of the move being chosen.
        step: usize,
        /// Cell the player occupied.
        cell: CellCoord,
        /// Phase at that step.
        phase: u32,
    },
    /// The route is longer than a solution may be.
    #[error(transparent)]
    TooLong(#[from] SolutionTooLong),
}

/// Walks from the player's cell to the field's target.
///
/// The returned solution has exactly `ticks_to_target(start, 0)` moves.
pub fn reconstruct(puzzle: &Puzzle, field: &DistanceField) -> Result<Solution, ReconstructionError> {
    let start = query::player(puzzle).ok_or(ReconstructionError::MissingPlayer)?;
    let mut remaining = field
        .ticks_to_target(PhaseCell::new(start, 0))
        .ok_or(ReconstructionError::Unreachable { cell: start })?;
    if remaining == 0 {
        return Err(ReconstructionError::DegenerateStart { cell: start });
    }
    let length = remaining as usize;
    if length > MAX_SOLUTION_LENGTH {
        return Err(SolutionTooLong { length }.into());
    }

    let period = field.period();
    let mut current = puzzle.clone();
    let mut cell = start;
    let mut phase = 0;
    let mut moves = Vec::with_capacity(length);

    while remaining > 0 {
        let next_phase = (phase + 1) % period;
        let chosen = PlayerMove::PRIORITY.into_iter().find_map(|player_move| {
            let mut candidate = current.clone();
            if step(&mut candidate, player_move) == StepOutcome::Death {
                return None;
            }
            let next = query::player(&candidate)?;
            let ticks = field.ticks_to_target(PhaseCell::new(next, next_phase))?;
            (ticks + 1 == remaining).then_some((player_move, candidate, next))
        });

        let Some((player_move, candidate, next)) = chosen else {
            return Err(ReconstructionError::NoConsistentMove {
                step: moves.len(),
                cell,
                phase,
            });
        };

        moves.push(player_move);
        current = candidate;
        cell = next;
        phase = next_phase;
        remaining -= 1;
    }

    log::debug!(
        "reconstructed {} moves from ({}, {})",
        moves.len(),
        start.column(),
        start.row()
    );
    Ok(Solution::new(moves)?)
}
