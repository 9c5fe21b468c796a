use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Named difficulty preset, selected before a session starts
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Parameters a session runs with. Fixed from start until the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub goal: u32,
    pub time_limit_secs: u32,
    pub spawn_interval_ms: u64,
}

impl SessionConfig {
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn config(&self) -> SessionConfig {
        match self {
            Difficulty::Easy => SessionConfig {
                goal: 15,
                time_limit_secs: 40,
                spawn_interval_ms: 1200,
            },
            Difficulty::Normal => SessionConfig {
                goal: 20,
                time_limit_secs: 30,
                spawn_interval_ms: 1000,
            },
            Difficulty::Hard => SessionConfig {
                goal: 25,
                time_limit_secs: 25,
                spawn_interval_ms: 750,
            },
        }
    }

    /// Next tier in the easy -> normal -> hard -> easy cycle
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    /// Parse a tier name, falling back to `Normal` (with a warning) when it is unknown
    pub fn resolve_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: GameError| {
            log::warn!("{err}; falling back to {}", Difficulty::default());
            Difficulty::default()
        })
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GameError::InvalidDifficulty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_matches_classic_rules() {
        let cfg = Difficulty::Normal.config();
        assert_eq!(cfg.goal, 20);
        assert_eq!(cfg.time_limit_secs, 30);
        assert_eq!(cfg.spawn_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn harder_tiers_demand_more_in_less_time() {
        let easy = Difficulty::Easy.config();
        let hard = Difficulty::Hard.config();
        assert!(hard.goal > easy.goal);
        assert!(hard.time_limit_secs < easy.time_limit_secs);
        assert!(hard.spawn_interval_ms < easy.spawn_interval_ms);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
    }

    #[test]
    fn unknown_tier_is_invalid() {
        assert_eq!(
            "nightmare".parse::<Difficulty>(),
            Err(GameError::InvalidDifficulty("nightmare".into()))
        );
    }

    #[test]
    fn unknown_tier_falls_back_to_normal() {
        assert_eq!(Difficulty::resolve_or_default("??"), Difficulty::Normal);
        assert_eq!(Difficulty::resolve_or_default("easy"), Difficulty::Easy);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for tier in Difficulty::ALL {
            assert_eq!(tier.to_string().parse::<Difficulty>(), Ok(tier));
        }
    }

    #[test]
    fn next_cycles_through_all_tiers() {
        assert_eq!(Difficulty::Easy.next(), Difficulty::Normal);
        assert_eq!(Difficulty::Normal.next(), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
    }
}
