#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative puzzle state and the per-tick simulation kernel.
//!
//! A [`Puzzle`] is a small value type: callers clone it whenever they need to
//! look ahead, and [`step`] only ever mutates the value it is handed. Every
//! higher layer (map builder, path reconstructor, generator, session) drives
//! time exclusively through [`step`] so they all agree on what is legal.

mod render;

use yatbbh_core::{
    Bullet, CellCoord, Emitter, Event, PlayerMove, PuzzleError, StepOutcome, Tile,
    COMPASS_DIRECTIONS, MAX_BULLETS, MAX_EMITTERS, MAX_HEIGHT, MAX_WIDTH,
};

/// Complete state of one puzzle: tiles, player, emitters and bullets in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    player: Option<CellCoord>,
    emitters: Vec<Emitter>,
    bullets: Vec<Bullet>,
}

impl Puzzle {
    /// Creates an empty puzzle with no player, emitters or bullets.
    pub fn new(width: u32, height: u32) -> Result<Self, PuzzleError> {
        if width == 0 || height == 0 || width > MAX_WIDTH || height > MAX_HEIGHT {
            return Err(PuzzleError::InvalidDimensions { width, height });
        }

        let cell_count = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| PuzzleError::InvalidDimensions { width, height })?;

        Ok(Self {
            width,
            height,
            tiles: vec![Tile::Empty; cell_count],
            player: None,
            emitters: Vec::new(),
            bullets: Vec::new(),
        })
    }

    /// Turns an empty tile into a wall.
    pub fn place_wall(&mut self, cell: CellCoord) -> Result<(), PuzzleError> {
        let index = self.vacant_index(cell)?;
        self.tiles[index] = Tile::Wall;
        Ok(())
    }

    /// Marks an empty tile as the goal; a puzzle holds at most one.
    pub fn place_goal(&mut self, cell: CellCoord) -> Result<(), PuzzleError> {
        if self.tiles.contains(&Tile::Goal) {
            return Err(PuzzleError::DuplicateGoal);
        }
        let index = self.index(cell).ok_or(PuzzleError::OutOfBounds { cell })?;
        if self.tiles[index] != Tile::Empty {
            return Err(PuzzleError::Occupied { cell });
        }
        self.tiles[index] = Tile::Goal;
        Ok(())
    }

    /// Installs an emitter on an empty tile.
    ///
    /// Fails with [`PuzzleError::TooManyBullets`] when the bullets already
    /// placed leave no room for everything the emitter can have in flight.
    pub fn place_emitter(&mut self, emitter: Emitter) -> Result<(), PuzzleError> {
        if self.emitters.len() >= MAX_EMITTERS {
            return Err(PuzzleError::TooManyEmitters {
                count: self.emitters.len() + 1,
            });
        }
        let count = self.bullets.len() + self.emitter_output(self.emitters.len() + 1);
        if count > MAX_BULLETS {
            return Err(PuzzleError::TooManyBullets { count });
        }
        let index = self.vacant_index(emitter.cell())?;
        self.tiles[index] = Tile::Emitter;
        self.emitters.push(emitter);
        Ok(())
    }

    /// Adds a bullet in flight on a tile that does not stop bullets.
    ///
    /// Room for the output of every installed emitter stays reserved, so at
    /// most `MAX_BULLETS` minus that reserve bullets can be placed by hand.
    pub fn place_bullet(&mut self, bullet: Bullet) -> Result<(), PuzzleError> {
        let count = self.bullets.len() + 1 + self.emitter_output(self.emitters.len());
        if count > MAX_BULLETS {
            return Err(PuzzleError::TooManyBullets { count });
        }
        let index = self
            .index(bullet.cell)
            .ok_or(PuzzleError::OutOfBounds { cell: bullet.cell })?;
        if self.tiles[index].stops_bullets() {
            return Err(PuzzleError::Occupied { cell: bullet.cell });
        }
        self.bullets.push(bullet);
        Ok(())
    }

    /// Puts the player on a walkable tile.
    pub fn place_player(&mut self, cell: CellCoord) -> Result<(), PuzzleError> {
        let index = self.index(cell).ok_or(PuzzleError::OutOfBounds { cell })?;
        if !self.tiles[index].is_walkable() {
            return Err(PuzzleError::Occupied { cell });
        }
        self.player = Some(cell);
        Ok(())
    }

    /// Removes the player from the grid, returning where it stood.
    ///
    /// A parked player neither moves nor collides with bullets.
    pub fn park_player(&mut self) -> Option<CellCoord> {
        self.player.take()
    }

    /// Most bullets `emitters` emitters can have in flight at once.
    ///
    /// Each fires at most one bullet per direction per tick and a bullet
    /// leaves the grid within `max(width, height)` moves.
    fn emitter_output(&self, emitters: usize) -> usize {
        let reach = self.width.max(self.height) as usize;
        emitters * COMPASS_DIRECTIONS * reach
    }

    fn vacant_index(&self, cell: CellCoord) -> Result<usize, PuzzleError> {
        let index = self.index(cell).ok_or(PuzzleError::OutOfBounds { cell })?;
        if self.tiles[index] != Tile::Empty || self.player == Some(cell) {
            return Err(PuzzleError::Occupied { cell });
        }
        Ok(index)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !cell.is_within(self.width, self.height) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }

    fn tile_at(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).map(|index| self.tiles[index])
    }
}

trait EventSink {
    fn record(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn record(&mut self, event: Event) {
        self.push(event);
    }
}

struct Discard;

impl EventSink for Discard {
    fn record(&mut self, _event: Event) {}
}

/// Advances the puzzle by exactly one tick.
pub fn step(puzzle: &mut Puzzle, player_move: PlayerMove) -> StepOutcome {
    advance(puzzle, player_move, &mut Discard)
}

/// Advances the puzzle by one tick, appending what happened to `out_events`.
pub fn step_with_events(
    puzzle: &mut Puzzle,
    player_move: PlayerMove,
    out_events: &mut Vec<Event>,
) -> StepOutcome {
    advance(puzzle, player_move, out_events)
}

fn advance<S: EventSink>(puzzle: &mut Puzzle, player_move: PlayerMove, sink: &mut S) -> StepOutcome {
    let before = puzzle.player;
    let mut outcome = StepOutcome::Alive;

    if let Some(from) = before {
        let to = player_move
            .direction()
            .and_then(|direction| from.offset(direction.compass()))
            .filter(|candidate| puzzle.tile_at(*candidate).is_some_and(Tile::is_walkable))
            .unwrap_or(from);

        if to != from {
            puzzle.player = Some(to);
            sink.record(Event::PlayerMoved { from, to });
        }

        if puzzle.tile_at(to) == Some(Tile::Goal) {
            outcome = StepOutcome::Victory;
        }
    }
    let after = puzzle.player;

    for emitter in &mut puzzle.emitters {
        let fired = emitter.advance();
        if fired.is_empty() {
            continue;
        }
        puzzle
            .bullets
            .extend(fired.iter().map(|direction| Bullet::new(emitter.cell(), direction)));
        sink.record(Event::EmitterFired {
            cell: emitter.cell(),
            directions: fired,
        });
    }
    debug_assert!(puzzle.bullets.len() <= MAX_BULLETS);

    let (width, height) = (puzzle.width, puzzle.height);
    let tiles = &puzzle.tiles;
    let mut struck = false;
    puzzle.bullets.retain_mut(|bullet| {
        let from = bullet.cell;
        let direction = bullet.direction;
        let landing = from
            .offset(direction)
            .filter(|cell| cell.is_within(width, height));

        let Some(to) = landing else {
            sink.record(Event::BulletExpired { from, direction });
            return false;
        };

        let index = to.row() as usize * width as usize + to.column() as usize;
        if tiles[index].stops_bullets() {
            sink.record(Event::BulletExpired { from, direction });
            return false;
        }

        if let (Some(player_before), Some(player_after)) = (before, after) {
            let lands_on_player = to == player_after;
            let swaps_with_player = from == player_after && to == player_before;
            if lands_on_player || swaps_with_player {
                struck = true;
                sink.record(Event::BulletHitPlayer { from, direction });
                return false;
            }
        }

        bullet.cell = to;
        sink.record(Event::BulletMoved {
            from,
            to,
            direction,
        });
        true
    });

    if struck {
        StepOutcome::Death
    } else {
        outcome
    }
}

/// Runs `ticks` pause ticks with the player parked, then restores the player.
pub fn advance_idle(puzzle: &mut Puzzle, ticks: u32) {
    let player = puzzle.park_player();
    for _ in 0..ticks {
        let _ = step(puzzle, PlayerMove::Pause);
    }
    puzzle.player = player;
}

/// Lets the bullet field reach its periodic steady state.
///
/// After `max(width, height)` idle ticks every bullet in flight was fired by
/// the periodic emitter schedule, so the field repeats with
/// [`query::period`].
pub fn settle(puzzle: &mut Puzzle) {
    let ticks = puzzle.width.max(puzzle.height);
    advance_idle(puzzle, ticks);
}

/// Query functions that provide read-only access to the puzzle state.
pub mod query {
    use super::Puzzle;
    use yatbbh_core::{lcm, Bullet, CellCoord, Emitter, Tile};

    /// Width and height of the grid in cells.
    #[must_use]
    pub fn dimensions(puzzle: &Puzzle) -> (u32, u32) {
        (puzzle.width, puzzle.height)
    }

    /// Tile at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn tile(puzzle: &Puzzle, cell: CellCoord) -> Option<Tile> {
        puzzle.tile_at(cell)
    }

    /// Cell occupied by the player, if placed.
    #[must_use]
    pub fn player(puzzle: &Puzzle) -> Option<CellCoord> {
        puzzle.player
    }

    /// Cell holding the goal tile, if any.
    #[must_use]
    pub fn goal(puzzle: &Puzzle) -> Option<CellCoord> {
        let position = puzzle.tiles.iter().position(|tile| *tile == Tile::Goal)?;
        let width = usize::try_from(puzzle.width).ok()?;
        let column = u32::try_from(position % width).ok()?;
        let row = u32::try_from(position / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Emitters in placement order.
    #[must_use]
    pub fn emitters(puzzle: &Puzzle) -> &[Emitter] {
        &puzzle.emitters
    }

    /// Bullets currently in flight. Their order carries no meaning.
    #[must_use]
    pub fn bullets(puzzle: &Puzzle) -> &[Bullet] {
        &puzzle.bullets
    }

    /// Number of ticks after which the whole obstacle field repeats.
    ///
    /// Least common multiple of every emitter's period; one without emitters.
    #[must_use]
    pub fn period(puzzle: &Puzzle) -> u32 {
        puzzle
            .emitters
            .iter()
            .fold(1, |period, emitter| lcm(period, emitter.period()))
    }

    /// Every grid cell in row-major order.
    pub fn cells(puzzle: &Puzzle) -> impl Iterator<Item = CellCoord> {
        let (width, height) = dimensions(puzzle);
        (0..height).flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }
}
