#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Time-expanded blocking map built by replaying one full emitter period.
//!
//! The map stores, for every padded grid cell and every phase of the period,
//! whether the player may occupy the cell and from which sides it may arrive.
//! Arrival flags encode the pass-through collision rule of the kernel so that
//! searches never have to simulate bullets themselves.

use std::fmt::Write as _;

use yatbbh_core::{Bullet, CellCoord, Direction, PhaseCell, PlayerMove};
use yatbbh_puzzle::{query, step, Puzzle};

const BLOCKED: u8 = 0x01;
const BLOCKED_FROM: [u8; 4] = [0x10, 0x20, 0x40, 0x80];

/// Errors raised while building a time-expanded map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The obstacle field did not repeat after one period.
    ///
    /// Bullets still in flight from before the emitters' steady state make the
    /// wrap-around from the last phase to phase zero unsound.
    #[error("obstacle field does not repeat after {period} ticks; settle the puzzle first")]
    UnsettledField {
        /// Period that was simulated.
        period: u32,
    },
}

/// Blocking flags recorded for one cell at one phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellFlags(u8);

impl CellFlags {
    /// Reports whether the player dies or cannot stand on the cell.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        self.0 & BLOCKED != 0
    }

    /// Reports whether arriving from the neighbour on `side` is lethal.
    #[must_use]
    pub const fn blocks_arrival_from(self, side: Direction) -> bool {
        self.0 & BLOCKED_FROM[side.index()] != 0
    }

    /// Reports whether any arrival flag is set.
    #[must_use]
    pub const fn blocks_any_arrival(self) -> bool {
        self.0 & !BLOCKED != 0
    }
}

/// Grid replicated once per phase, padded by one always-blocked cell per side.
#[derive(Clone, Debug)]
pub struct TimeMap {
    width: u32,
    height: u32,
    period: u32,
    entries: Vec<u8>,
}

impl TimeMap {
    /// Replays the puzzle for one period and records the blocking flags.
    ///
    /// The player is parked on a private copy so it cannot absorb bullets.
    pub fn build(puzzle: &Puzzle) -> Result<Self, MapError> {
        let (width, height) = query::dimensions(puzzle);
        let period = query::period(puzzle);
        let mut map = Self {
            width,
            height,
            period,
            entries: vec![0; padded(width) * padded(height) * period as usize],
        };

        let mut replay = puzzle.clone();
        let _ = replay.park_player();
        let initial_emitters = query::emitters(&replay).to_vec();
        let initial_bullets = sorted_bullets(&replay);

        for phase in 0..period {
            map.stamp_tiles(&replay, phase);
            map.stamp_bullets(query::bullets(&replay), phase);
            let _ = step(&mut replay, PlayerMove::Pause);
        }

        if query::emitters(&replay) != initial_emitters.as_slice()
            || sorted_bullets(&replay) != initial_bullets
        {
            return Err(MapError::UnsettledField { period });
        }

        log::debug!(
            "built {}x{} time map over {} phases, {} slots",
            width,
            height,
            period,
            map.slot_count()
        );
        Ok(map)
    }

    /// Width of the unpadded grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the unpadded grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of phases stored in the map.
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Number of addressable (cell, phase) slots, padding included.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Dense index of a grid state, shared with arrays aligned to this map.
    ///
    /// Returns `None` outside the grid or beyond the period.
    #[must_use]
    pub fn slot(&self, state: PhaseCell) -> Option<usize> {
        if !state.cell.is_within(self.width, self.height) || state.phase >= self.period {
            return None;
        }
        Some(self.padded_slot(state.cell.column() + 1, state.cell.row() + 1, state.phase))
    }

    /// Flags of a grid state; everything outside the grid is blocked.
    #[must_use]
    pub fn flags(&self, state: PhaseCell) -> CellFlags {
        self.slot(state)
            .map_or(CellFlags(BLOCKED), |slot| CellFlags(self.entries[slot]))
    }

    /// Reports whether the player may not occupy `state`.
    #[must_use]
    pub fn is_blocked(&self, state: PhaseCell) -> bool {
        self.flags(state).is_blocked()
    }

    /// Phase immediately before `phase`, wrapping around the period.
    #[must_use]
    pub const fn previous_phase(&self, phase: u32) -> u32 {
        (phase + self.period - 1) % self.period
    }

    /// States one tick earlier from which the player can legally reach `state`.
    ///
    /// Yields the pause predecessor first, then the neighbours on the north,
    /// east, south and west sides. The player on the north neighbour reaches
    /// `state` by moving south, so every side is gated by its own arrival flag.
    pub fn predecessors(
        &self,
        state: PhaseCell,
    ) -> impl Iterator<Item = (PlayerMove, PhaseCell)> + '_ {
        let flags = self.flags(state);
        let previous = self.previous_phase(state.phase);
        let pause = (!flags.is_blocked()).then_some((PlayerMove::Pause, state.cell));

        let sides = Direction::ALL.into_iter().filter_map(move |side| {
            if flags.is_blocked() || flags.blocks_arrival_from(side) {
                return None;
            }
            let neighbour = state.cell.offset(side.compass())?;
            Some((PlayerMove::toward(side.opposite()), neighbour))
        });

        pause
            .into_iter()
            .chain(sides)
            .map(move |(player_move, cell)| (player_move, PhaseCell::new(cell, previous)))
            .filter(move |(_, candidate)| !self.is_blocked(*candidate))
    }

    /// Renders one phase slice, padding included.
    ///
    /// `#` marks blocked cells and `.` open cells. An open cell with a single
    /// lethal arrival side shows an arrow pointing at that side (`^`, `>`,
    /// `v`, `<`); several lethal sides show `+`.
    #[must_use]
    pub fn render_phase(&self, phase: u32) -> String {
        let mut out = String::new();
        if phase >= self.period {
            return out;
        }
        for row in 0..self.height + 2 {
            for column in 0..self.width + 2 {
                let flags = CellFlags(self.entries[self.padded_slot(column, row, phase)]);
                out.push(glyph(flags));
            }
            let _ = writeln!(out);
        }
        out
    }

    fn stamp_tiles(&mut self, puzzle: &Puzzle, phase: u32) {
        for row in 0..self.height + 2 {
            for column in 0..self.width + 2 {
                let on_border =
                    row == 0 || column == 0 || row == self.height + 1 || column == self.width + 1;
                let blocked = on_border
                    || query::tile(puzzle, CellCoord::new(column - 1, row - 1))
                        .map_or(true, |tile| !tile.is_walkable());
                if blocked {
                    let slot = self.padded_slot(column, row, phase);
                    self.entries[slot] |= BLOCKED;
                }
            }
        }
    }

    fn stamp_bullets(&mut self, bullets: &[Bullet], phase: u32) {
        for bullet in bullets {
            let cell = bullet.cell;
            let slot = self.padded_slot(cell.column() + 1, cell.row() + 1, phase);
            self.entries[slot] |= BLOCKED;

            let Some(direction) = bullet.direction.cardinal() else {
                continue;
            };
            let Some(behind) = cell.offset(direction.opposite().compass()) else {
                continue;
            };
            if let Some(slot) = self.slot(PhaseCell::new(behind, phase)) {
                self.entries[slot] |= BLOCKED_FROM[direction.index()];
            }
        }
    }

    fn padded_slot(&self, column: u32, row: u32, phase: u32) -> usize {
        let padded_width = padded(self.width);
        let padded_height = padded(self.height);
        (phase as usize * padded_height + row as usize) * padded_width + column as usize
    }
}

fn glyph(flags: CellFlags) -> char {
    if flags.is_blocked() {
        return '#';
    }
    if !flags.blocks_any_arrival() {
        return '.';
    }
    let mut lethal = Direction::ALL
        .into_iter()
        .filter(|side| flags.blocks_arrival_from(*side));
    match (lethal.next(), lethal.next()) {
        (Some(Direction::North), None) => '^',
        (Some(Direction::East), None) => '>',
        (Some(Direction::South), None) => 'v',
        (Some(Direction::West), None) => '<',
        _ => '+',
    }
}

fn padded(extent: u32) -> usize {
    extent as usize + 2
}

fn sorted_bullets(puzzle: &Puzzle) -> Vec<Bullet> {
    let mut bullets = query::bullets(puzzle).to_vec();
    bullets.sort_unstable();
    bullets
}
