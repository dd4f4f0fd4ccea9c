use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use proptest::prelude::*;
use yatbbh_core::{
    CellCoord, CompassMask, Emitter, EmitterKind, Event, PlayerMove, StepOutcome,
    ACCEPTED_CYCLE_LENGTHS,
};
use yatbbh_puzzle::{query, settle, step, step_with_events, Puzzle};

const WIDTH: u32 = 7;
const HEIGHT: u32 = 6;

#[derive(Clone, Debug)]
struct EmitterSeed {
    column: u32,
    row: u32,
    kind: usize,
    directions: u8,
    schedule: u8,
    cycle: usize,
    step: u8,
}

fn emitter_seed() -> impl Strategy<Value = EmitterSeed> {
    (
        0..WIDTH,
        0..HEIGHT,
        0..EmitterKind::ALL.len(),
        any::<u8>(),
        1..=u8::MAX,
        0..ACCEPTED_CYCLE_LENGTHS.len(),
        any::<u8>(),
    )
        .prop_map(
            |(column, row, kind, directions, schedule, cycle, step)| EmitterSeed {
                column,
                row,
                kind,
                directions,
                schedule,
                cycle,
                step,
            },
        )
}

fn player_move() -> impl Strategy<Value = PlayerMove> {
    prop::sample::select(PlayerMove::PRIORITY.to_vec())
}

fn build(seeds: &[EmitterSeed]) -> Puzzle {
    let mut puzzle = Puzzle::new(WIDTH, HEIGHT).expect("grid");
    for seed in seeds {
        let cycle = ACCEPTED_CYCLE_LENGTHS[seed.cycle];
        let emitter = Emitter::new(
            CellCoord::new(seed.column, seed.row),
            EmitterKind::ALL[seed.kind],
            CompassMask::from_bits(seed.directions),
            seed.schedule,
            cycle,
            seed.step % cycle,
        );
        if let Ok(emitter) = emitter {
            let _ = puzzle.place_emitter(emitter);
        }
    }
    settle(&mut puzzle);
    if let Some(cell) = query::cells(&puzzle).find(|cell| puzzle_is_open(&puzzle, *cell)) {
        puzzle.place_player(cell).expect("open cell");
    }
    puzzle
}

fn puzzle_is_open(puzzle: &Puzzle, cell: CellCoord) -> bool {
    query::tile(puzzle, cell).is_some_and(|tile| tile.is_walkable())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    player: Option<CellCoord>,
    outcomes: Vec<StepOutcome>,
    events: Vec<Event>,
    rendered: String,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

fn replay(mut puzzle: Puzzle, moves: &[PlayerMove]) -> ReplayOutcome {
    let mut outcomes = Vec::with_capacity(moves.len());
    let mut events = Vec::new();
    for player_move in moves {
        let outcome = step_with_events(&mut puzzle, *player_move, &mut events);
        outcomes.push(outcome);
        if outcome != StepOutcome::Alive {
            break;
        }
    }
    ReplayOutcome {
        player: query::player(&puzzle),
        outcomes,
        events,
        rendered: puzzle.to_string(),
    }
}

proptest! {
    #[test]
    fn replaying_the_same_moves_is_deterministic(
        seeds in prop::collection::vec(emitter_seed(), 0..6),
        moves in prop::collection::vec(player_move(), 0..40),
    ) {
        let puzzle = build(&seeds);
        let first = replay(puzzle.clone(), &moves);
        let second = replay(puzzle, &moves);

        prop_assert_eq!(first.fingerprint(), second.fingerprint());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn emitters_return_to_their_initial_state_after_one_period(
        seeds in prop::collection::vec(emitter_seed(), 1..6),
    ) {
        let mut puzzle = build(&seeds);
        let _ = puzzle.park_player();
        let initial = query::emitters(&puzzle).to_vec();
        let mut initial_bullets = query::bullets(&puzzle).to_vec();

        for _ in 0..query::period(&puzzle) {
            let _ = step(&mut puzzle, PlayerMove::Pause);
        }

        prop_assert_eq!(query::emitters(&puzzle), initial.as_slice());
        let mut bullets = query::bullets(&puzzle).to_vec();
        bullets.sort();
        initial_bullets.sort();
        prop_assert_eq!(bullets, initial_bullets);
    }

    #[test]
    fn events_do_not_change_the_outcome(
        seeds in prop::collection::vec(emitter_seed(), 0..6),
        moves in prop::collection::vec(player_move(), 1..20),
    ) {
        let mut silent = build(&seeds);
        let mut recorded = silent.clone();
        let mut events = Vec::new();

        for player_move in moves {
            let expected = step(&mut silent, player_move);
            let actual = step_with_events(&mut recorded, player_move, &mut events);
            prop_assert_eq!(expected, actual);
            prop_assert_eq!(&silent, &recorded);
        }
    }
}
