//! Generator configuration and difficulty presets.

use serde::{Deserialize, Serialize};
use yatbbh_core::{MAX_EMITTERS, MAX_HEIGHT, MAX_WIDTH};

use crate::GenerationError;

/// Number of candidates sampled by every preset.
pub const DEFAULT_ATTEMPTS: u32 = 100;

/// Shape of the puzzles a generator run samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Emitters placed on every candidate.
    pub emitters: u32,
    /// Wall tiles placed before the emitters.
    pub walls: u32,
    /// Candidates sampled before the best one is kept.
    pub attempts: u32,
}

impl GeneratorConfig {
    /// Configuration without walls using [`DEFAULT_ATTEMPTS`].
    #[must_use]
    pub const fn new(width: u32, height: u32, emitters: u32) -> Self {
        Self {
            width,
            height,
            emitters,
            walls: 0,
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    /// Checks the configuration against the puzzle limits.
    ///
    /// Walls and emitters must leave at least two free cells so that a goal
    /// and a spawn can both exist.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width == 0 || self.height == 0 || self.width > MAX_WIDTH || self.height > MAX_HEIGHT
        {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.emitters as usize > MAX_EMITTERS {
            return Err(GenerationError::TooManyEmitters {
                emitters: self.emitters,
            });
        }
        let cells = u64::from(self.width) * u64::from(self.height);
        let occupied = u64::from(self.emitters) + u64::from(self.walls);
        if occupied + 2 > cells {
            return Err(GenerationError::Crowded {
                occupied,
                cells,
            });
        }
        if self.attempts == 0 {
            return Err(GenerationError::NoAttempts);
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Difficulty::Easy.config()
    }
}

/// Named generator presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 5x5 grid with 3 emitters.
    #[default]
    Easy,
    /// 8x8 grid with 6 emitters.
    Medium,
    /// 20x10 grid with 10 emitters.
    Hard,
}

impl Difficulty {
    /// Every preset from easiest to hardest.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Generator configuration of the preset.
    #[must_use]
    pub const fn config(self) -> GeneratorConfig {
        match self {
            Difficulty::Easy => GeneratorConfig::new(5, 5, 3),
            Difficulty::Medium => GeneratorConfig::new(8, 8, 6),
            Difficulty::Hard => GeneratorConfig::new(20, 10, 10),
        }
    }
}
