#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates, solves and replays yatbbh puzzles.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use yatbbh_puzzle::query;
use yatbbh_system_generation::{generate, GeneratedPuzzle};
use yatbbh_system_session::{
    apply, query as session_query, GameState, Session, SessionCommand, SessionEvent,
};
use yatbbh_system_solver::solve;
use yatbbh_system_time_map::TimeMap;

use crate::config::{parse_moves, PuzzleArgs};

#[derive(Parser, Debug)]
#[command(name = "yatbbh")]
#[command(about = "Generate and solve bullet-dodging grid puzzles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a puzzle and print it
    Generate {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Also print a shortest solution
        #[arg(long)]
        solve: bool,
    },
    /// Replay a move string on a generated puzzle
    Play {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Moves to play: N, E, S, W, or `.` to wait
        #[arg(long)]
        moves: String,
    },
    /// Print one phase of a generated puzzle's time-expanded map
    DumpMap {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Phase to print, counted from the spawn
        #[arg(long, default_value_t = 0)]
        phase: u32,
    },
}

/// Entry point for the yatbbh command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { puzzle, solve } => run_generate(&puzzle, solve),
        Commands::Play { puzzle, moves } => run_play(&puzzle, &moves),
        Commands::DumpMap { puzzle, phase } => run_dump_map(&puzzle, phase),
    }
}

fn generate_from(args: &PuzzleArgs) -> Result<GeneratedPuzzle> {
    let config = args.resolve()?;
    log::info!(
        "generating {}x{} with {} emitters, {} walls, {} attempts, seed {}",
        config.width,
        config.height,
        config.emitters,
        config.walls,
        config.attempts,
        args.seed
    );
    generate(&config, args.seed).context("puzzle generation failed")
}

fn run_generate(args: &PuzzleArgs, with_solution: bool) -> Result<()> {
    let generated = generate_from(args)?;
    print!("{}", generated.puzzle);
    println!(
        "seed {} attempt {}: {} ticks, period {}, {} equally hard spawns",
        args.seed,
        generated.attempt,
        generated.solution_length(),
        query::period(&generated.puzzle),
        generated.candidate.ties
    );

    if with_solution {
        let solution = solve(&generated.puzzle).context("failed to solve generated puzzle")?;
        println!("solution: {solution}");
    }
    Ok(())
}

fn run_play(args: &PuzzleArgs, moves: &str) -> Result<()> {
    let moves = parse_moves(moves)?;
    let generated = generate_from(args)?;
    let mut session = Session::new(generated.puzzle);
    let mut events = Vec::new();

    for (index, player_move) in moves.into_iter().enumerate() {
        events.clear();
        apply(&mut session, SessionCommand::Move(player_move), &mut events);
        if let Some(SessionEvent::CommandRejected { reason }) = events.last() {
            log::warn!("move {index} ({}) ignored: {reason:?}", player_move.symbol());
            break;
        }
    }

    print!("{}", session_query::puzzle(&session));
    let state = session_query::state(&session);
    let played = session_query::moves(&session).len();
    match state {
        GameState::Victory => println!("victory after {played} moves"),
        GameState::Over => println!("hit after {played} moves"),
        _ => println!("still alive after {played} moves"),
    }
    Ok(())
}

fn run_dump_map(args: &PuzzleArgs, phase: u32) -> Result<()> {
    let generated = generate_from(args)?;
    let map = TimeMap::build(&generated.puzzle).context("failed to build time map")?;
    if phase >= map.period() {
        bail!("phase {phase} is outside the period of {}", map.period());
    }
    print!("{}", map.render_phase(phase));
    Ok(())
}
