use yatbbh_core::{
    CellCoord, Compass, CompassMask, Emitter, EmitterKind, PlayerMove, Solution, StepOutcome,
};
use yatbbh_puzzle::{settle, step, Puzzle};
use yatbbh_system_generation::{generate, GeneratorConfig};
use yatbbh_system_path_reconstruction::ReconstructionError;
use yatbbh_system_solver::{solve, Analysis, SolveError};

fn replay(mut puzzle: Puzzle, solution: &Solution) -> Vec<StepOutcome> {
    let mut outcomes = Vec::with_capacity(solution.len());
    for player_move in solution.moves() {
        let outcome = step(&mut puzzle, *player_move);
        outcomes.push(outcome);
        if outcome != StepOutcome::Alive {
            break;
        }
    }
    outcomes
}

fn assert_wins(puzzle: &Puzzle, solution: &Solution) {
    let outcomes = replay(puzzle.clone(), solution);
    assert_eq!(outcomes.len(), solution.len(), "playback stopped early");
    let (last, before) = outcomes.split_last().expect("non-empty solution");
    assert_eq!(*last, StepOutcome::Victory);
    assert!(before.iter().all(|outcome| *outcome == StepOutcome::Alive));
}

#[test]
fn open_grid_is_solved_by_the_manhattan_route() {
    let mut puzzle = Puzzle::new(5, 5).expect("grid");
    puzzle.place_goal(CellCoord::new(4, 2)).expect("goal");
    puzzle.place_player(CellCoord::new(2, 0)).expect("player");

    let solution = solve(&puzzle).expect("solution");

    assert_eq!(solution.len(), 4);
    assert!(!solution.moves().contains(&PlayerMove::Pause));
    assert_wins(&puzzle, &solution);
}

#[test]
fn always_covered_corridor_has_no_solution() {
    let mut puzzle = Puzzle::new(3, 1).expect("corridor");
    puzzle
        .place_emitter(
            Emitter::new(
                CellCoord::new(0, 0),
                EmitterKind::Fixed,
                CompassMask::from_bits(1 << Compass::East.index()),
                0b1,
                1,
                0,
            )
            .expect("emitter"),
        )
        .expect("place");
    settle(&mut puzzle);
    puzzle.place_goal(CellCoord::new(2, 0)).expect("goal");

    let analysis = Analysis::of(&puzzle).expect("analysis");
    assert!(analysis.field.farthest().is_empty());
    assert_eq!(analysis.field.max_ticks(), None);
}

#[test]
fn blocked_route_is_reported_as_unreachable() {
    let mut puzzle = Puzzle::new(4, 1).expect("corridor");
    puzzle.place_wall(CellCoord::new(2, 0)).expect("wall");
    puzzle.place_goal(CellCoord::new(3, 0)).expect("goal");
    puzzle.place_player(CellCoord::new(0, 0)).expect("player");

    assert_eq!(
        solve(&puzzle),
        Err(SolveError::Reconstruction(ReconstructionError::Unreachable {
            cell: CellCoord::new(0, 0)
        }))
    );
}

#[test]
fn crossing_a_stream_needs_timing() {
    let mut puzzle = Puzzle::new(5, 3).expect("grid");
    puzzle
        .place_emitter(
            Emitter::new(
                CellCoord::new(0, 1),
                EmitterKind::Fixed,
                CompassMask::from_bits(1 << Compass::East.index()),
                0b0011,
                4,
                0,
            )
            .expect("emitter"),
        )
        .expect("place");
    settle(&mut puzzle);
    puzzle.place_goal(CellCoord::new(2, 2)).expect("goal");
    puzzle.place_player(CellCoord::new(2, 0)).expect("player");

    let analysis = Analysis::of(&puzzle).expect("analysis");
    let solution = solve(&puzzle).expect("solution");

    assert_eq!(
        Some(solution.len() as u32),
        analysis.ticks_from_player(&puzzle)
    );
    assert_wins(&puzzle, &solution);
}

#[test]
fn generated_puzzles_replay_to_victory() {
    let config = GeneratorConfig {
        attempts: 10,
        ..GeneratorConfig::new(6, 6, 4)
    };

    for seed in 0..6 {
        let generated = generate(&config, seed).expect("generation");

        let solution = solve(&generated.puzzle).expect("generated puzzles are solvable");

        assert_eq!(solution.len(), generated.solution_length() as usize);
        assert_wins(&generated.puzzle, &solution);
    }
}
