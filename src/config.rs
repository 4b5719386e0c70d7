use serde::{Deserialize, Serialize};
use slog::Logger;
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;

use crate::error::Result;

/// Per-session settings. Every field has a default, so a partial document deserializes fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// When set, 8XY6 and 8XYE shift Vx in place. When clear they shift Vy into Vx, like the
    /// original COSMAC VIP interpreter. Programs disagree on which one they expect.
    pub shift_quirk: bool,

    /// Seed for the CXKK random number generator. None seeds from entropy.
    pub rng_seed: Option<u64>,

    pub log_level: Severity,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shift_quirk: true,
            rng_seed: None,
            log_level: Severity::Info,
        }
    }
}

impl Config {
    /// Build a terminal logger writing to stderr at `log_level`
    pub fn build_logger(&self) -> Result<Logger> {
        let mut builder = TerminalLoggerBuilder::new();
        builder.level(self.log_level);
        builder.destination(Destination::Stderr);

        Ok(builder.build()?)
    }
}
