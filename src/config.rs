//! Runtime configuration.
//!
//! Defaults, then `BLOCKFALL_*` environment variables, then command-line
//! flags; later sources win.

use std::env;
use std::path::PathBuf;

use clap::Parser;

use crate::store::FileStore;
use crate::types::DEFAULT_TICK_MS;

/// Log file name inside the data directory
pub const LOG_FILE: &str = "blockfall.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Save game, high scores and log file live here
    pub data_dir: PathBuf,
    /// Fixed piece-sequence seed; `None` derives one from the clock
    pub seed: Option<u64>,
    /// Frame/input poll period
    pub tick_ms: u32,
    pub muted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: FileStore::default_dir(),
            seed: None,
            tick_ms: DEFAULT_TICK_MS,
            muted: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("BLOCKFALL_DATA_DIR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(seed) = lookup("BLOCKFALL_SEED").and_then(|s| s.trim().parse().ok()) {
            config.seed = Some(seed);
        }
        if let Some(tick) = lookup("BLOCKFALL_TICK_MS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&t: &u32| t > 0)
        {
            config.tick_ms = tick;
        }

        config
    }

    /// Overlay command-line flags
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(tick) = cli.tick_ms.filter(|&t| t > 0) {
            self.tick_ms = tick;
        }
        self.muted |= cli.muted;
        self
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

/// Falling-block puzzle game for the terminal
#[derive(Debug, Parser)]
#[command(name = "blockfall", version)]
pub struct Cli {
    /// Directory for the saved game, high scores and log
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Seed for the piece sequence
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frame period in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u32>,

    /// Start with sound off
    #[arg(long)]
    pub muted: bool,
}
