//! Generator configuration assembled from presets, TOML files and flags.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use yatbbh_core::PlayerMove;
use yatbbh_system_generation::{Difficulty, GeneratorConfig};

/// Preset names accepted on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Preset {
    /// 5x5 grid with 3 emitters.
    #[default]
    Easy,
    /// 8x8 grid with 6 emitters.
    Medium,
    /// 20x10 grid with 10 emitters.
    Hard,
}

impl From<Preset> for Difficulty {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Easy => Difficulty::Easy,
            Preset::Medium => Difficulty::Medium,
            Preset::Hard => Difficulty::Hard,
        }
    }
}

/// Flags shared by every subcommand that needs a generated puzzle.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct PuzzleArgs {
    /// Difficulty preset the other options start from.
    #[arg(long, value_enum, default_value_t = Preset::Easy)]
    pub(crate) preset: Preset,
    /// TOML file with generator settings; replaces the preset.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Grid width in cells.
    #[arg(long)]
    pub(crate) width: Option<u32>,
    /// Grid height in cells.
    #[arg(long)]
    pub(crate) height: Option<u32>,
    /// Emitters per candidate.
    #[arg(long)]
    pub(crate) emitters: Option<u32>,
    /// Walls per candidate.
    #[arg(long)]
    pub(crate) walls: Option<u32>,
    /// Candidates sampled before the best one is kept.
    #[arg(long)]
    pub(crate) attempts: Option<u32>,
    /// Seed driving the generator.
    #[arg(long, default_value_t = 0)]
    pub(crate) seed: u64,
}

impl PuzzleArgs {
    /// Resolves the preset, the optional file and the flag overrides.
    pub(crate) fn resolve(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config at {}", path.display()))?;
                parse_config(&contents)
                    .with_context(|| format!("invalid generator config in {}", path.display()))?
            }
            None => Difficulty::from(self.preset).config(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(emitters) = self.emitters {
            config.emitters = emitters;
        }
        if let Some(walls) = self.walls {
            config.walls = walls;
        }
        if let Some(attempts) = self.attempts {
            config.attempts = attempts;
        }

        config.validate().context("generator config is not usable")?;
        Ok(config)
    }
}

/// Parses generator settings from TOML text.
pub(crate) fn parse_config(contents: &str) -> Result<GeneratorConfig> {
    toml::from_str(contents).context("failed to parse generator config toml")
}

/// Parses a move string such as `"EES.N"`; whitespace is ignored.
pub(crate) fn parse_moves(text: &str) -> Result<Vec<PlayerMove>> {
    text.chars()
        .filter(|symbol| !symbol.is_whitespace())
        .enumerate()
        .map(|(index, symbol)| {
            PlayerMove::from_symbol(symbol).with_context(|| {
                format!("unknown move `{symbol}` at position {index}; expected N, E, S, W or .")
            })
        })
        .collect()
}
