//! Plain-text rendering of a puzzle, one character per cell.

use std::fmt;

use yatbbh_core::{CellCoord, Compass, Tile};

use crate::Puzzle;

impl fmt::Display for Puzzle {
    /// Draws the player as `@`, bullets by their axis of travel and tiles as
    /// `.` (empty), `E` (emitter), `#` (wall) and `G` (goal).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for column in 0..self.width {
                let cell = CellCoord::new(column, row);
                write!(f, "{}", self.glyph(cell))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Puzzle {
    fn glyph(&self, cell: CellCoord) -> char {
        if self.player == Some(cell) {
            return '@';
        }

        if let Some(bullet) = self.bullets.iter().find(|bullet| bullet.cell == cell) {
            return match bullet.direction {
                Compass::North | Compass::South => '|',
                Compass::East | Compass::West => '-',
                Compass::NorthEast | Compass::SouthWest => '/',
                Compass::NorthWest | Compass::SouthEast => '\\',
            };
        }

        match self.tile_at(cell) {
            Some(Tile::Empty) | None => '.',
            Some(Tile::Emitter) => 'E',
            Some(Tile::Wall) => '#',
            Some(Tile::Goal) => 'G',
        }
    }
}

#[cfg(test)]
mod tests {
    use yatbbh_core::{Bullet, CellCoord, Compass};

    use crate::Puzzle;

    #[test]
    fn renders_every_entity_kind() {
        let mut puzzle = Puzzle::new(4, 2).expect("grid");
        puzzle.place_wall(CellCoord::new(0, 0)).expect("wall");
        puzzle.place_goal(CellCoord::new(3, 1)).expect("goal");
        puzzle.place_player(CellCoord::new(1, 0)).expect("player");
        puzzle
            .place_bullet(Bullet::new(CellCoord::new(2, 0), Compass::NorthEast))
            .expect("bullet");

        assert_eq!(puzzle.to_string(), "#@/.\n...G\n");
    }
}
