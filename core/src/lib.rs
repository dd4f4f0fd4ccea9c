#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the yatbbh puzzle engine.
//!
//! This crate defines the value types that flow between the simulation
//! kernel, the time-expanded map builder, the distance-field solver, the path
//! reconstructor and the level generator. Nothing in here advances time on its
//! own except [`Emitter::advance`], which encodes the per-tick emitter rule so
//! every consumer agrees on it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported grid width in cells.
pub const MAX_WIDTH: u32 = 32;
/// Largest supported grid height in cells.
pub const MAX_HEIGHT: u32 = 32;
/// Largest number of emitters a single puzzle may contain.
pub const MAX_EMITTERS: usize = 32;
/// Upper bound on bullets in flight.
///
/// Every emitter fires at most one bullet per compass direction per tick and a
/// bullet leaves the grid within `max(width, height)` ticks. Placement keeps
/// that much room free per emitter, so stepping never exceeds this figure.
pub const MAX_BULLETS: usize = MAX_EMITTERS * COMPASS_DIRECTIONS * MAX_WIDTH as usize;
/// Longest solution the reconstructor will emit.
pub const MAX_SOLUTION_LENGTH: usize = 1024;
/// Number of compass directions an emitter can fire along.
pub const COMPASS_DIRECTIONS: usize = 8;
/// Cycle lengths an emitter may use.
///
/// The set is closed under the least common multiple up to 24, keeping the
/// time-expanded map small.
pub const ACCEPTED_CYCLE_LENGTHS: [u8; 6] = [1, 2, 3, 4, 6, 8];

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell reached by moving one step along `compass`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant;
    /// callers are responsible for checking the upper grid bounds.
    #[must_use]
    pub fn offset(self, compass: Compass) -> Option<CellCoord> {
        let (dx, dy) = compass.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(CellCoord::new(column, row))
    }

    /// Reports whether the cell lies inside a `width` by `height` grid.
    #[must_use]
    pub const fn is_within(&self, width: u32, height: u32) -> bool {
        self.column < width && self.row < height
    }
}

/// The eight compass directions bullets travel along.
///
/// Discriminants match the bit positions used by emitter direction masks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Compass {
    /// Toward decreasing row indices.
    North = 0,
    /// Toward decreasing rows and increasing columns.
    NorthEast = 1,
    /// Toward increasing column indices.
    East = 2,
    /// Toward increasing rows and columns.
    SouthEast = 3,
    /// Toward increasing row indices.
    South = 4,
    /// Toward increasing rows and decreasing columns.
    SouthWest = 5,
    /// Toward decreasing column indices.
    West = 6,
    /// Toward decreasing rows and columns.
    NorthWest = 7,
}

impl Compass {
    /// All compass directions in clockwise order starting at north.
    pub const ALL: [Compass; COMPASS_DIRECTIONS] = [
        Compass::North,
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];

    /// Bit index of the direction inside an emitter direction mask.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column and row delta applied by one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::ALL[(self.index() + COMPASS_DIRECTIONS / 2) % COMPASS_DIRECTIONS]
    }

    /// Cardinal counterpart of the direction, if it has one.
    #[must_use]
    pub const fn cardinal(self) -> Option<Direction> {
        match self {
            Self::North => Some(Direction::North),
            Self::East => Some(Direction::East),
            Self::South => Some(Direction::South),
            Self::West => Some(Direction::West),
            _ => None,
        }
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All cardinal directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Dense index in `0..4`, matching the order of [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Compass equivalent of the cardinal direction.
    #[must_use]
    pub const fn compass(self) -> Compass {
        match self {
            Self::North => Compass::North,
            Self::East => Compass::East,
            Self::South => Compass::South,
            Self::West => Compass::West,
        }
    }
}

/// Input accepted by the simulation kernel for a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerMove {
    /// Step one cell north.
    North,
    /// Step one cell east.
    East,
    /// Step one cell south.
    South,
    /// Step one cell west.
    West,
    /// Stay in place for the tick.
    Pause,
}

impl PlayerMove {
    /// Moves in the fixed priority order the path reconstructor tries them.
    pub const PRIORITY: [PlayerMove; 5] = [
        PlayerMove::Pause,
        PlayerMove::North,
        PlayerMove::East,
        PlayerMove::South,
        PlayerMove::West,
    ];

    /// Cardinal direction of the move, or `None` for [`PlayerMove::Pause`].
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::North => Some(Direction::North),
            Self::East => Some(Direction::East),
            Self::South => Some(Direction::South),
            Self::West => Some(Direction::West),
            Self::Pause => None,
        }
    }

    /// Move that travels along the provided cardinal direction.
    #[must_use]
    pub const fn toward(direction: Direction) -> Self {
        match direction {
            Direction::North => Self::North,
            Direction::East => Self::East,
            Direction::South => Self::South,
            Direction::West => Self::West,
        }
    }

    /// Single-character notation used by textual move lists.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'W',
            Self::Pause => '.',
        }
    }

    /// Parses the single-character notation produced by [`PlayerMove::symbol`].
    ///
    /// Lowercase letters are accepted as well.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'N' => Some(Self::North),
            'E' => Some(Self::East),
            'S' => Some(Self::South),
            'W' => Some(Self::West),
            '.' | 'P' => Some(Self::Pause),
            _ => None,
        }
    }
}

/// Result of advancing the simulation by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The player survived and has not reached the goal.
    Alive,
    /// A bullet struck the player.
    Death,
    /// The player stepped onto the goal and survived the tick.
    Victory,
}

/// Kinds of tile composing the puzzle grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Open floor.
    #[default]
    Empty,
    /// Cell occupied by an emitter.
    Emitter,
    /// Solid obstacle.
    Wall,
    /// Cell the player must reach.
    Goal,
}

impl Tile {
    /// Reports whether the player may stand on the tile.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Empty | Self::Goal)
    }

    /// Reports whether a bullet entering the tile is destroyed.
    #[must_use]
    pub const fn stops_bullets(self) -> bool {
        matches!(self, Self::Emitter | Self::Wall)
    }
}

/// Rotation behaviour of an emitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmitterKind {
    /// Keeps firing along the same directions.
    Fixed,
    /// Rotates its direction mask one compass step clockwise per tick.
    Clockwise,
    /// Rotates its direction mask one compass step counter-clockwise per tick.
    CounterClockwise,
}

impl EmitterKind {
    /// All emitter kinds.
    pub const ALL: [EmitterKind; 3] = [
        EmitterKind::Fixed,
        EmitterKind::Clockwise,
        EmitterKind::CounterClockwise,
    ];

    /// Reports whether the direction mask changes every tick.
    #[must_use]
    pub const fn rotates(self) -> bool {
        !matches!(self, Self::Fixed)
    }
}

/// Set of compass directions stored as an eight-bit mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompassMask(u8);

impl CompassMask {
    /// Creates a mask from raw bits, bit `d` standing for `Compass::ALL[d]`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Reports whether the direction is part of the mask.
    #[must_use]
    pub const fn contains(&self, compass: Compass) -> bool {
        self.0 & (1 << compass.index()) != 0
    }

    /// Reports whether no direction is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Mask rotated one compass step clockwise.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        Self(self.0.rotate_left(1))
    }

    /// Mask rotated one compass step counter-clockwise.
    #[must_use]
    pub const fn rotated_counter_clockwise(self) -> Self {
        Self(self.0.rotate_right(1))
    }

    /// Iterates the directions contained in the mask in clockwise order.
    pub fn iter(self) -> impl Iterator<Item = Compass> {
        Compass::ALL
            .into_iter()
            .filter(move |compass| self.contains(*compass))
    }
}

/// Stationary turret that periodically fires bullets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Emitter {
    cell: CellCoord,
    kind: EmitterKind,
    directions: CompassMask,
    fire_schedule: u8,
    cycle_length: u8,
    step: u8,
}

impl Emitter {
    /// Creates an emitter after validating its schedule.
    ///
    /// Schedule bits beyond `cycle_length` are discarded. The remaining
    /// schedule must arm at least one step and `step` must lie inside the
    /// cycle.
    pub fn new(
        cell: CellCoord,
        kind: EmitterKind,
        directions: CompassMask,
        fire_schedule: u8,
        cycle_length: u8,
        step: u8,
    ) -> Result<Self, PuzzleError> {
        if !ACCEPTED_CYCLE_LENGTHS.contains(&cycle_length) {
            return Err(PuzzleError::UnsupportedCycleLength { cycle_length });
        }

        let fire_schedule = fire_schedule & cycle_mask(cycle_length);
        if fire_schedule == 0 {
            return Err(PuzzleError::EmptyFireSchedule { cell });
        }

        if step >= cycle_length {
            return Err(PuzzleError::StepOutsideCycle { step, cycle_length });
        }

        Ok(Self {
            cell,
            kind,
            directions,
            fire_schedule,
            cycle_length,
            step,
        })
    }

    /// Cell occupied by the emitter.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Rotation behaviour of the emitter.
    #[must_use]
    pub const fn kind(&self) -> EmitterKind {
        self.kind
    }

    /// Directions the emitter fires along at its current step.
    #[must_use]
    pub const fn directions(&self) -> CompassMask {
        self.directions
    }

    /// Bit `i` set means the emitter fires when its step index becomes `i`.
    #[must_use]
    pub const fn fire_schedule(&self) -> u8 {
        self.fire_schedule
    }

    /// Number of ticks in one emitter cycle.
    #[must_use]
    pub const fn cycle_length(&self) -> u8 {
        self.cycle_length
    }

    /// Current position within the cycle.
    #[must_use]
    pub const fn step(&self) -> u8 {
        self.step
    }

    /// Number of ticks after which the emitter state repeats exactly.
    #[must_use]
    pub const fn period(&self) -> u32 {
        let cycle = self.cycle_length as u32;
        if self.kind.rotates() {
            lcm(cycle, COMPASS_DIRECTIONS as u32)
        } else {
            cycle
        }
    }

    /// Advances the emitter by one tick.
    ///
    /// Returns the directions to fire along, or an empty mask when the new
    /// step is not armed.
    pub fn advance(&mut self) -> CompassMask {
        self.directions = match self.kind {
            EmitterKind::Fixed => self.directions,
            EmitterKind::Clockwise => self.directions.rotated_clockwise(),
            EmitterKind::CounterClockwise => self.directions.rotated_counter_clockwise(),
        };
        self.step = (self.step + 1) % self.cycle_length;

        if self.fire_schedule & (1 << self.step) != 0 {
            self.directions
        } else {
            CompassMask::default()
        }
    }
}

fn cycle_mask(cycle_length: u8) -> u8 {
    if cycle_length >= 8 {
        u8::MAX
    } else {
        (1u8 << cycle_length) - 1
    }
}

/// Greatest common divisor of two values.
#[must_use]
pub const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

/// Least common multiple of two values; zero if either is zero.
#[must_use]
pub const fn lcm(a: u32, b: u32) -> u32 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// Projectile travelling in a straight line across the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bullet {
    /// Cell the bullet currently occupies.
    pub cell: CellCoord,
    /// Direction the bullet travels every tick.
    pub direction: Compass,
}

impl Bullet {
    /// Creates a bullet at `cell` heading along `direction`.
    #[must_use]
    pub const fn new(cell: CellCoord, direction: Compass) -> Self {
        Self { cell, direction }
    }
}

/// Grid cell paired with a phase of the emitter period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhaseCell {
    /// Location on the puzzle grid.
    pub cell: CellCoord,
    /// Tick index modulo the period.
    pub phase: u32,
}

impl PhaseCell {
    /// Pairs a cell with a phase.
    #[must_use]
    pub const fn new(cell: CellCoord, phase: u32) -> Self {
        Self { cell, phase }
    }
}

/// Hardest start found by one distance-field search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoalCandidate {
    /// Start cell and phase chosen among the farthest states.
    pub start: PhaseCell,
    /// Minimum number of ticks from `start` to the search target.
    pub ticks: u32,
    /// Number of states sharing the farthest distance.
    pub ties: u32,
}

/// Ordered sequence of player moves that leads from the spawn to the goal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    moves: Vec<PlayerMove>,
}

impl Solution {
    /// Wraps a move list, rejecting lists longer than [`MAX_SOLUTION_LENGTH`].
    pub fn new(moves: Vec<PlayerMove>) -> Result<Self, SolutionTooLong> {
        if moves.len() > MAX_SOLUTION_LENGTH {
            return Err(SolutionTooLong { length: moves.len() });
        }
        Ok(Self { moves })
    }

    /// Moves in playback order.
    #[must_use]
    pub fn moves(&self) -> &[PlayerMove] {
        &self.moves
    }

    /// Number of ticks the solution takes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Reports whether the solution contains no moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for player_move in &self.moves {
            write!(f, "{}", player_move.symbol())?;
        }
        Ok(())
    }
}

/// Error returned when a move list exceeds [`MAX_SOLUTION_LENGTH`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("solution of {length} moves exceeds the limit of {}", MAX_SOLUTION_LENGTH)]
pub struct SolutionTooLong {
    /// Length of the rejected move list.
    pub length: usize,
}

/// Records broadcast while the kernel advances a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// The player committed a move to a new cell.
    PlayerMoved {
        /// Cell the player occupied before the tick.
        from: CellCoord,
        /// Cell the player occupies after the tick.
        to: CellCoord,
    },
    /// An emitter spawned bullets this tick.
    EmitterFired {
        /// Cell occupied by the emitter.
        cell: CellCoord,
        /// Directions the new bullets travel along.
        directions: CompassMask,
    },
    /// A bullet survived the tick and moved.
    BulletMoved {
        /// Cell the bullet occupied before moving.
        from: CellCoord,
        /// Cell the bullet occupies after moving.
        to: CellCoord,
        /// Travel direction of the bullet.
        direction: Compass,
    },
    /// A bullet left the grid or struck a wall or emitter.
    BulletExpired {
        /// Last cell the bullet occupied inside the grid.
        from: CellCoord,
        /// Travel direction of the bullet.
        direction: Compass,
    },
    /// A bullet struck the player.
    BulletHitPlayer {
        /// Cell the bullet occupied before moving.
        from: CellCoord,
        /// Travel direction of the bullet.
        direction: Compass,
    },
}

/// Invariant violations detected while constructing a puzzle.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleError {
    /// The grid has a zero dimension or exceeds [`MAX_WIDTH`] by [`MAX_HEIGHT`].
    #[error("grid of {width}x{height} is outside the supported 1x1..={}x{}", MAX_WIDTH, MAX_HEIGHT)]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// More than [`MAX_EMITTERS`] emitters were requested.
    #[error("{count} emitters exceed the limit of {}", MAX_EMITTERS)]
    TooManyEmitters {
        /// Number of emitters requested.
        count: usize,
    },
    /// More than [`MAX_BULLETS`] bullets were requested.
    #[error("{count} bullets exceed the limit of {}", MAX_BULLETS)]
    TooManyBullets {
        /// Number of bullets requested.
        count: usize,
    },
    /// An entity references a cell outside the grid.
    #[error("cell ({}, {}) lies outside the grid", .cell.column(), .cell.row())]
    OutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// Something was placed on a tile that is already taken.
    #[error("cell ({}, {}) is already occupied", .cell.column(), .cell.row())]
    Occupied {
        /// Offending cell.
        cell: CellCoord,
    },
    /// A second goal tile was requested.
    #[error("puzzle already has a goal tile")]
    DuplicateGoal,
    /// The cycle length is not one of [`ACCEPTED_CYCLE_LENGTHS`].
    #[error("cycle length {cycle_length} is not supported")]
    UnsupportedCycleLength {
        /// Requested cycle length.
        cycle_length: u8,
    },
    /// The fire schedule never arms within the cycle.
    #[error("emitter at ({}, {}) never fires", .cell.column(), .cell.row())]
    EmptyFireSchedule {
        /// Cell of the offending emitter.
        cell: CellCoord,
    },
    /// The current step lies outside the cycle.
    #[error("step {step} lies outside a cycle of {cycle_length}")]
    StepOutsideCycle {
        /// Requested step.
        step: u8,
        /// Cycle length of the emitter.
        cycle_length: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn emitter(kind: EmitterKind, directions: u8, schedule: u8, cycle: u8) -> Emitter {
        Emitter::new(
            CellCoord::new(1, 1),
            kind,
            CompassMask::from_bits(directions),
            schedule,
            cycle,
            0,
        )
        .expect("valid emitter")
    }

    #[test]
    fn compass_offsets_stop_at_origin() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.offset(Compass::North), None);
        assert_eq!(origin.offset(Compass::West), None);
        assert_eq!(origin.offset(Compass::SouthEast), Some(CellCoord::new(1, 1)));
    }

    #[test]
    fn compass_opposites_pair_up() {
        for compass in Compass::ALL {
            assert_eq!(compass.opposite().opposite(), compass);
            assert_ne!(compass.opposite(), compass);
        }
        assert_eq!(Compass::NorthEast.opposite(), Compass::SouthWest);
    }

    #[test]
    fn clockwise_rotation_turns_north_into_north_east() {
        let mask = CompassMask::from_bits(1 << Compass::North.index());
        assert!(mask.rotated_clockwise().contains(Compass::NorthEast));
        assert!(mask.rotated_counter_clockwise().contains(Compass::NorthWest));
    }

    #[test]
    fn advance_fires_on_armed_steps_only() {
        let mut fixed = emitter(EmitterKind::Fixed, 0b0000_0100, 0b10, 2);
        assert_eq!(fixed.advance().bits(), 0b0000_0100);
        assert_eq!(fixed.step(), 1);
        assert!(fixed.advance().is_empty());
        assert_eq!(fixed.step(), 0);
    }

    #[test]
    fn rotating_emitter_repeats_after_period() {
        let original = emitter(EmitterKind::CounterClockwise, 0b0001_0011, 0b101, 3);
        assert_eq!(original.period(), 24);

        let mut advanced = original;
        for _ in 0..original.period() {
            let _ = advanced.advance();
        }
        assert_eq!(advanced, original);
    }

    #[test]
    fn emitter_rejects_invalid_schedules() {
        let cell = CellCoord::new(0, 0);
        let mask = CompassMask::from_bits(1);
        assert_eq!(
            Emitter::new(cell, EmitterKind::Fixed, mask, 0b1, 5, 0),
            Err(PuzzleError::UnsupportedCycleLength { cycle_length: 5 })
        );
        assert_eq!(
            Emitter::new(cell, EmitterKind::Fixed, mask, 0b1100, 2, 0),
            Err(PuzzleError::EmptyFireSchedule { cell })
        );
        assert_eq!(
            Emitter::new(cell, EmitterKind::Fixed, mask, 0b1, 2, 2),
            Err(PuzzleError::StepOutsideCycle {
                step: 2,
                cycle_length: 2
            })
        );
    }

    #[test]
    fn lcm_matches_expectation() {
        assert_eq!(lcm(6, 8), 24);
        assert_eq!(lcm(1, 3), 3);
        assert_eq!(lcm(0, 3), 0);
    }

    #[test]
    fn solution_rejects_overlong_move_lists() {
        let moves = vec![PlayerMove::Pause; MAX_SOLUTION_LENGTH + 1];
        assert_eq!(
            Solution::new(moves),
            Err(SolutionTooLong {
                length: MAX_SOLUTION_LENGTH + 1
            })
        );
    }

    #[test]
    fn solution_displays_symbols() {
        let solution = Solution::new(vec![
            PlayerMove::North,
            PlayerMove::Pause,
            PlayerMove::West,
        ])
        .expect("short solution");
        assert_eq!(solution.to_string(), "N.W");
        for symbol in solution.to_string().chars() {
            assert!(PlayerMove::from_symbol(symbol).is_some());
        }
    }

    #[test]
    fn emitter_round_trips_through_bincode() {
        assert_round_trip(&emitter(EmitterKind::Clockwise, 0b1000_0001, 0b1, 1));
    }

    #[test]
    fn solution_round_trips_through_bincode() {
        let solution = Solution::new(vec![PlayerMove::East, PlayerMove::South]).expect("short");
        assert_round_trip(&solution);
    }
}
