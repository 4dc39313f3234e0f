use std::path::Path;

use rand::Rng;

use crate::error::ConfigError;
use crate::game::Player;

/// Deepest search a config file may request.
pub const MAX_SEARCH_DEPTH: usize = 8;

/// Named search depths offered to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "shallow")]
    Easy,
    #[default]
    Medium,
    #[serde(alias = "deep")]
    Hard,
}

impl Difficulty {
    /// Search depth in plies.
    pub fn depth(self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 3,
            Difficulty::Hard => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Who makes the first move of each game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstPlayer {
    #[default]
    Random,
    Human,
    Ai,
}

impl FirstPlayer {
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Player {
        match self {
            FirstPlayer::Human => Player::Human,
            FirstPlayer::Ai => Player::Ai,
            FirstPlayer::Random => {
                if rng.random_bool(0.5) {
                    Player::Human
                } else {
                    Player::Ai
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// Overrides the difficulty's depth when set.
    pub depth: Option<usize>,
    /// Seed for tie-breaking; OS entropy when unset.
    pub seed: Option<u64>,
}

impl AiConfig {
    pub fn search_depth(&self) -> usize {
        self.depth.unwrap_or_else(|| self.difficulty.depth())
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub first_player: FirstPlayer,
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub game: GameConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(depth) = self.ai.depth {
            if depth == 0 {
                return Err(ConfigError::Validation("ai.depth must be >= 1".into()));
            }
            if depth > MAX_SEARCH_DEPTH {
                return Err(ConfigError::Validation(format!(
                    "ai.depth must be <= {MAX_SEARCH_DEPTH}"
                )));
            }
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
