#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Play session state machine layered on top of the simulation kernel.
//!
//! A [`Session`] owns the puzzle being played, the pristine copy it resets
//! to and the history of committed moves. All mutation goes through
//! [`apply`], which reports what happened through `out_events`; rejected
//! commands leave the session untouched and emit
//! [`SessionEvent::CommandRejected`].

use yatbbh_core::{Event, PlayerMove, Solution, StepOutcome};
use yatbbh_puzzle::{step, step_with_events, Puzzle};

/// Upper bound on the number of moves a session records.
pub const MAX_MOVES: usize = 4096;

/// Phase of play the session is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameState {
    /// The player is alive and accepts moves.
    #[default]
    Alive,
    /// The player was hit.
    Over,
    /// The player reached the goal.
    Victory,
    /// Play is suspended until resumed.
    Paused,
    /// A solution is being played back from the initial puzzle.
    ShowingSolution,
}

/// Requests understood by [`apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Plays one move.
    Move(PlayerMove),
    /// Takes back the last move.
    Undo,
    /// Replays the last undone move.
    Redo,
    /// Restores the initial puzzle and clears the history.
    Reset,
    /// Suspends live play, or resumes it when already paused.
    TogglePause,
    /// Restarts from the initial puzzle and queues the solution for playback.
    ShowSolution(Solution),
    /// Plays the next move of the queued solution.
    AdvancePlayback,
    /// Abandons playback and returns to the initial puzzle.
    StopPlayback,
}

/// Reasons a command was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The command needs a different game state.
    WrongState {
        /// State the session was in.
        state: GameState,
    },
    /// No move is left to undo.
    NothingToUndo,
    /// No undone move is left to redo.
    NothingToRedo,
    /// The move history reached [`MAX_MOVES`].
    HistoryFull,
}

/// Notifications emitted while applying commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The kernel reported something during a tick.
    Kernel(Event),
    /// A move was played.
    MovePlayed {
        /// Move that was played.
        player_move: PlayerMove,
        /// Kernel verdict for the tick.
        outcome: StepOutcome,
    },
    /// The session switched state.
    StateChanged {
        /// Previous state.
        from: GameState,
        /// New state.
        to: GameState,
    },
    /// The puzzle was rebuilt from the initial copy.
    Rewound {
        /// Moves replayed on top of the initial copy.
        moves: usize,
    },
    /// A command was refused without touching the session.
    CommandRejected {
        /// Why the command was refused.
        reason: RejectReason,
    },
}

#[derive(Clone, Debug)]
struct Playback {
    solution: Solution,
    next: usize,
}

/// Puzzle being played plus everything needed to undo, reset and replay.
#[derive(Clone, Debug)]
pub struct Session {
    initial: Puzzle,
    puzzle: Puzzle,
    state: GameState,
    moves: Vec<PlayerMove>,
    undone: Vec<PlayerMove>,
    playback: Option<Playback>,
}

impl Session {
    /// Starts a session on `puzzle`.
    #[must_use]
    pub fn new(puzzle: Puzzle) -> Self {
        Self {
            initial: puzzle.clone(),
            puzzle,
            state: GameState::Alive,
            moves: Vec::new(),
            undone: Vec::new(),
            playback: None,
        }
    }

    fn set_state(&mut self, to: GameState, out_events: &mut Vec<SessionEvent>) {
        if self.state == to {
            return;
        }
        log::debug!("session state {:?} -> {:?}", self.state, to);
        out_events.push(SessionEvent::StateChanged {
            from: self.state,
            to,
        });
        self.state = to;
    }

    fn play(
        &mut self,
        player_move: PlayerMove,
        out_events: &mut Vec<SessionEvent>,
    ) -> StepOutcome {
        let mut kernel_events = Vec::new();
        let outcome = step_with_events(&mut self.puzzle, player_move, &mut kernel_events);
        out_events.extend(kernel_events.into_iter().map(SessionEvent::Kernel));
        out_events.push(SessionEvent::MovePlayed {
            player_move,
            outcome,
        });
        outcome
    }

    fn commit(&mut self, player_move: PlayerMove, out_events: &mut Vec<SessionEvent>) {
        let outcome = self.play(player_move, out_events);
        self.moves.push(player_move);
        match outcome {
            StepOutcome::Alive => {}
            StepOutcome::Death => self.set_state(GameState::Over, out_events),
            StepOutcome::Victory => self.set_state(GameState::Victory, out_events),
        }
    }

    fn rewind(&mut self, out_events: &mut Vec<SessionEvent>) {
        self.puzzle = self.initial.clone();
        for player_move in &self.moves {
            let _ = step(&mut self.puzzle, *player_move);
        }
        out_events.push(SessionEvent::Rewound {
            moves: self.moves.len(),
        });
    }

    fn finish_playback(&mut self, outcome: StepOutcome, out_events: &mut Vec<SessionEvent>) {
        self.playback = None;
        let state = match outcome {
            StepOutcome::Alive => GameState::Alive,
            StepOutcome::Death => GameState::Over,
            StepOutcome::Victory => GameState::Victory,
        };
        self.set_state(state, out_events);
    }
}

fn reject(reason: RejectReason, out_events: &mut Vec<SessionEvent>) {
    log::trace!("session command rejected: {reason:?}");
    out_events.push(SessionEvent::CommandRejected { reason });
}

/// Applies one command to the session.
pub fn apply(session: &mut Session, command: SessionCommand, out_events: &mut Vec<SessionEvent>) {
    match command {
        SessionCommand::Move(player_move) => {
            if session.state != GameState::Alive {
                return reject(RejectReason::WrongState { state: session.state }, out_events);
            }
            if session.moves.len() >= MAX_MOVES {
                return reject(RejectReason::HistoryFull, out_events);
            }
            session.undone.clear();
            session.commit(player_move, out_events);
        }
        SessionCommand::Undo => {
            if !matches!(
                session.state,
                GameState::Alive | GameState::Over | GameState::Victory
            ) {
                return reject(RejectReason::WrongState { state: session.state }, out_events);
            }
            let Some(player_move) = session.moves.pop() else {
                return reject(RejectReason::NothingToUndo, out_events);
            };
            session.undone.push(player_move);
            session.rewind(out_events);
            session.set_state(GameState::Alive, out_events);
        }
        SessionCommand::Redo => {
            if session.state != GameState::Alive {
                return reject(RejectReason::WrongState { state: session.state }, out_events);
            }
            let Some(player_move) = session.undone.pop() else {
                return reject(RejectReason::NothingToRedo, out_events);
            };
            session.commit(player_move, out_events);
        }
        SessionCommand::Reset => {
            session.moves.clear();
            session.undone.clear();
            session.playback = None;
            session.rewind(out_events);
            session.set_state(GameState::Alive, out_events);
        }
        SessionCommand::TogglePause => match session.state {
            GameState::Paused => session.set_state(GameState::Alive, out_events),
            GameState::Alive => session.set_state(GameState::Paused, out_events),
            state => reject(RejectReason::WrongState { state }, out_events),
        },
        SessionCommand::ShowSolution(solution) => {
            if session.state == GameState::Paused {
                return reject(RejectReason::WrongState { state: session.state }, out_events);
            }
            session.moves.clear();
            session.undone.clear();
            session.rewind(out_events);
            session.playback = Some(Playback { solution, next: 0 });
            session.set_state(GameState::ShowingSolution, out_events);
        }
        SessionCommand::AdvancePlayback => {
            if session.state != GameState::ShowingSolution {
                return reject(RejectReason::WrongState { state: session.state }, out_events);
            }
            let next_move = session
                .playback
                .as_ref()
                .and_then(|playback| playback.solution.moves().get(playback.next).copied());
            let Some(player_move) = next_move else {
                return session.finish_playback(StepOutcome::Alive, out_events);
            };
            let outcome = session.play(player_move, out_events);
            session.moves.push(player_move);
            let exhausted = session.playback.as_mut().map_or(true, |playback| {
                playback.next += 1;
                playback.next >= playback.solution.len()
            });
            if outcome != StepOutcome::Alive || exhausted {
                session.finish_playback(outcome, out_events);
            }
        }
        SessionCommand::StopPlayback => {
            if session.state != GameState::ShowingSolution {
                return reject(RejectReason::WrongState { state: session.state }, out_events);
            }
            session.moves.clear();
            session.playback = None;
            session.rewind(out_events);
            session.set_state(GameState::Alive, out_events);
        }
    }
}

/// Query functions that provide read-only access to the session.
pub mod query {
    use super::{GameState, Session};
    use yatbbh_core::PlayerMove;
    use yatbbh_puzzle::Puzzle;

    /// Current game state.
    #[must_use]
    pub fn state(session: &Session) -> GameState {
        session.state
    }

    /// Puzzle as it stands after the recorded moves.
    #[must_use]
    pub fn puzzle(session: &Session) -> &Puzzle {
        &session.puzzle
    }

    /// Puzzle the session started from.
    #[must_use]
    pub fn initial_puzzle(session: &Session) -> &Puzzle {
        &session.initial
    }

    /// Moves played since the start or the last reset.
    #[must_use]
    pub fn moves(session: &Session) -> &[PlayerMove] {
        &session.moves
    }

    /// Reports whether an undo would succeed.
    #[must_use]
    pub fn can_undo(session: &Session) -> bool {
        !session.moves.is_empty()
            && matches!(
                session.state,
                GameState::Alive | GameState::Over | GameState::Victory
            )
    }

    /// Reports whether a redo would succeed.
    #[must_use]
    pub fn can_redo(session: &Session) -> bool {
        !session.undone.is_empty() && session.state == GameState::Alive
    }

    /// Moves played and total moves of the solution being shown.
    #[must_use]
    pub fn playback_progress(session: &Session) -> Option<(usize, usize)> {
        session
            .playback
            .as_ref()
            .map(|playback| (playback.next, playback.solution.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yatbbh_core::CellCoord;

    fn corridor_session() -> Session {
        let mut puzzle = Puzzle::new(4, 1).expect("corridor");
        puzzle.place_goal(CellCoord::new(3, 0)).expect("goal");
        puzzle.place_player(CellCoord::new(0, 0)).expect("player");
        Session::new(puzzle)
    }

    #[test]
    fn moves_are_refused_once_the_game_is_won() {
        let mut session = corridor_session();
        let mut events = Vec::new();
        for _ in 0..3 {
            apply(&mut session, SessionCommand::Move(PlayerMove::East), &mut events);
        }
        assert_eq!(query::state(&session), GameState::Victory);

        events.clear();
        apply(&mut session, SessionCommand::Move(PlayerMove::West), &mut events);

        assert_eq!(
            events,
            vec![SessionEvent::CommandRejected {
                reason: RejectReason::WrongState {
                    state: GameState::Victory
                }
            }]
        );
        assert_eq!(query::moves(&session).len(), 3);
    }

    #[test]
    fn pause_round_trips_to_the_previous_state() {
        let mut session = corridor_session();
        let mut events = Vec::new();

        apply(&mut session, SessionCommand::TogglePause, &mut events);
        assert_eq!(query::state(&session), GameState::Paused);
        apply(&mut session, SessionCommand::Move(PlayerMove::East), &mut events);
        assert!(query::moves(&session).is_empty());
        apply(&mut session, SessionCommand::TogglePause, &mut events);

        assert_eq!(query::state(&session), GameState::Alive);
    }

    #[test]
    fn history_is_capped() {
        let mut puzzle = Puzzle::new(2, 1).expect("grid");
        puzzle.place_player(CellCoord::new(0, 0)).expect("player");
        let mut session = Session::new(puzzle);
        let mut events = Vec::new();
        for _ in 0..MAX_MOVES {
            apply(&mut session, SessionCommand::Move(PlayerMove::Pause), &mut events);
        }

        events.clear();
        apply(&mut session, SessionCommand::Move(PlayerMove::Pause), &mut events);

        assert_eq!(
            events,
            vec![SessionEvent::CommandRejected {
                reason: RejectReason::HistoryFull
            }]
        );
    }
}
