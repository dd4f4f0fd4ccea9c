#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Solves a puzzle by composing the map builder, the distance field and the
//! path reconstructor.

use yatbbh_core::{PhaseCell, Solution};
use yatbbh_puzzle::{query, Puzzle};
use yatbbh_system_distance_field::DistanceField;
use yatbbh_system_path_reconstruction::{reconstruct, ReconstructionError};
use yatbbh_system_time_map::{MapError, TimeMap};

/// Failures raised while solving a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    /// The puzzle has no goal tile to route to.
    #[error("puzzle has no goal tile")]
    MissingGoal,
    /// The obstacle field could not be modelled.
    #[error(transparent)]
    Map(#[from] MapError),
    /// No valid route could be produced.
    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),
}

/// Everything computed while solving, kept for callers that inspect it.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// Time-expanded map of the puzzle's obstacle field.
    pub map: TimeMap,
    /// Distances to the goal tile.
    pub field: DistanceField,
}

impl Analysis {
    /// Builds the map and the distance field towards the goal tile.
    pub fn of(puzzle: &Puzzle) -> Result<Self, SolveError> {
        let goal = query::goal(puzzle).ok_or(SolveError::MissingGoal)?;
        let map = TimeMap::build(puzzle)?;
        let field = DistanceField::compute(&map, goal);
        Ok(Self { map, field })
    }

    /// Minimum ticks from the player's current cell to the goal.
    #[must_use]
    pub fn ticks_from_player(&self, puzzle: &Puzzle) -> Option<u32> {
        let player = query::player(puzzle)?;
        self.field.ticks_to_target(PhaseCell::new(player, 0))
    }
}

/// Finds a shortest move sequence from the player's cell to the goal.
pub fn solve(puzzle: &Puzzle) -> Result<Solution, SolveError> {
    let analysis = Analysis::of(puzzle)?;
    let solution = reconstruct(puzzle, &analysis.field)?;
    log::debug!(
        "solved {}x{} puzzle over period {} in {} moves",
        analysis.map.width(),
        analysis.map.height(),
        analysis.map.period(),
        solution.len()
    );
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yatbbh_core::CellCoord;

    #[test]
    fn puzzle_without_goal_is_rejected() {
        let mut puzzle = Puzzle::new(3, 3).expect("grid");
        puzzle.place_player(CellCoord::new(0, 0)).expect("player");

        assert_eq!(solve(&puzzle), Err(SolveError::MissingGoal));
    }

    #[test]
    fn analysis_reports_player_distance() {
        let mut puzzle = Puzzle::new(4, 4).expect("grid");
        puzzle.place_goal(CellCoord::new(3, 3)).expect("goal");
        puzzle.place_player(CellCoord::new(0, 1)).expect("player");

        let analysis = Analysis::of(&puzzle).expect("analysis");

        assert_eq!(analysis.ticks_from_player(&puzzle), Some(5));
        assert_eq!(analysis.map.period(), 1);
    }
}
