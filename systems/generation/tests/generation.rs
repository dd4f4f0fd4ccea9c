use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use yatbbh_core::{CellCoord, PhaseCell, Tile};
use yatbbh_puzzle::query;
use yatbbh_system_distance_field::DistanceField;
use yatbbh_system_generation::{
    attempt_seed, generate, generate_puzzle, random_candidate, GeneratedPuzzle, GenerationError,
    GeneratorConfig,
};
use yatbbh_system_time_map::TimeMap;

fn small_config() -> GeneratorConfig {
    GeneratorConfig {
        attempts: 12,
        ..GeneratorConfig::new(5, 5, 3)
    }
}

fn spawn_ticks(generated: &GeneratedPuzzle) -> Option<u32> {
    let map = TimeMap::build(&generated.puzzle).expect("generated puzzles are settled");
    let field = DistanceField::compute(&map, generated.goal);
    let spawn = query::player(&generated.puzzle)?;
    field.ticks_to_target(PhaseCell::new(spawn, 0))
}

#[test]
fn same_seed_generates_the_same_puzzle() {
    let config = small_config();

    let first = generate(&config, 0x5eed).expect("first run");
    let second = generate(&config, 0x5eed).expect("second run");

    assert_eq!(first, second);
}

#[test]
fn generated_puzzle_has_goal_and_spawn() {
    for seed in 0..4 {
        let generated = generate(&small_config(), seed).expect("generation");
        let puzzle = &generated.puzzle;

        assert_eq!(query::goal(puzzle), Some(generated.goal));
        assert_eq!(query::tile(puzzle, generated.goal), Some(Tile::Goal));
        let spawn = query::player(puzzle).expect("spawn");
        assert_ne!(spawn, generated.goal);
        assert_eq!(spawn, generated.candidate.start.cell);
        assert!(generated.solution_length() > 0);
        assert!(generated.attempt < small_config().attempts);
        assert_eq!(query::emitters(puzzle).len(), 3);
    }
}

#[test]
fn spawn_distance_survives_the_phase_shift() {
    for seed in [1, 7, 99] {
        let generated = generate(&small_config(), seed).expect("generation");

        assert_eq!(spawn_ticks(&generated), Some(generated.solution_length()));
    }
}

#[test]
fn walls_are_placed_on_request() {
    let config = GeneratorConfig {
        walls: 3,
        ..small_config()
    };

    let generated = generate(&config, 21).expect("generation");

    let walls = query::cells(&generated.puzzle)
        .filter(|cell| query::tile(&generated.puzzle, *cell) == Some(Tile::Wall))
        .count();
    assert_eq!(walls, 3);
}

#[test]
fn invalid_configs_fail_before_sampling() {
    assert_eq!(
        generate_puzzle(40, 4, 1, 0),
        Err(GenerationError::InvalidDimensions {
            width: 40,
            height: 4
        })
    );
    assert_eq!(
        generate_puzzle(1, 2, 1, 0),
        Err(GenerationError::Crowded {
            occupied: 1,
            cells: 2
        })
    );
}

#[test]
fn walled_off_corridor_exhausts_every_attempt() {
    let config = GeneratorConfig {
        walls: 1,
        attempts: 1,
        ..GeneratorConfig::new(3, 1, 0)
    };
    let middle = CellCoord::new(1, 0);

    let mut split = 0;
    for seed in 0..30 {
        let mut rng = ChaCha8Rng::seed_from_u64(attempt_seed(seed, 0));
        let candidate = random_candidate(&config, &mut rng).expect("candidate");
        let outcome = generate(&config, seed);

        if query::tile(&candidate, middle) == Some(Tile::Wall) {
            split += 1;
            assert_eq!(
                outcome,
                Err(GenerationError::NoSolvableCandidate { attempts: 1 })
            );
        } else {
            let generated = outcome.expect("two adjacent free cells");
            assert_eq!(generated.solution_length(), 1);
        }
    }

    assert!(split > 0);
}
