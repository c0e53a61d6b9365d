use crate::engine::config::EngineConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 17;

/// How the bot picks its move at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Random,
    /// Random capture when one exists, random move otherwise.
    Aggressive,
    Minimax { depth: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub name: String,
    pub description: String,
}

/// Difficulty from 1 ("Single Mind") to 17 ("God Mode").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Level(u8);

impl Default for Level {
    fn default() -> Self {
        Self(MIN_LEVEL)
    }
}

impl From<u8> for Level {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl Level {
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value < MIN_LEVEL {
            Self(MIN_LEVEL)
        } else if value > MAX_LEVEL {
            Self(MAX_LEVEL)
        } else {
            Self(value)
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn strategy(self) -> Strategy {
        match self.0 {
            1 => Strategy::Random,
            2 => Strategy::Aggressive,
            3..=9 => Strategy::Minimax { depth: 2 },
            10..=16 => Strategy::Minimax { depth: 3 },
            _ => Strategy::Minimax { depth: 4 },
        }
    }

    #[must_use]
    pub fn info(self) -> LevelInfo {
        let (name, description) = match self.0 {
            1 => ("Single Mind".to_owned(), "Random & Basic checking"),
            2 => ("Double Mind".to_owned(), "Captures & Defense"),
            3 => ("Triple Mind".to_owned(), "Basic Tactics"),
            4 => ("Quad Mind".to_owned(), "Depth 2 Search"),
            5 => ("Hive Mind (5)".to_owned(), "Depth 2 + Positioning"),
            10 => ("Deep Thought (10)".to_owned(), "Depth 3 Search"),
            17 => ("17 Minds (God Mode)".to_owned(), "Full Depth + Aggressive"),
            n if n < 5 => (format!("{n} Minds"), "Increasing tactical awareness"),
            n if n < 10 => (format!("Hive Mind ({n})"), "Advanced positioning"),
            n => (format!("Neuro-Net ({n})"), "Grandmaster emulation"),
        };
        LevelInfo {
            name,
            description: description.to_owned(),
        }
    }

    #[must_use]
    pub fn think_delay(self, config: &EngineConfig) -> Duration {
        Duration::from_millis(config.think_delay_ms(self.0))
    }
}
