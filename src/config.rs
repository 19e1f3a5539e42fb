//! Gameplay tunables, loaded from TOML.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides. Units are terminal cells and ticks.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value is out of its allowed range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Milliseconds between ticks.
    pub tick_ms: u64,
    /// Pause between a cleared level and the next grid starting to move.
    pub level_clear_ticks: u32,
    /// Number of entries kept on the leaderboard.
    pub leaderboard_size: usize,
    pub player: PlayerConfig,
    pub bullets: BulletConfig,
    pub invaders: InvaderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    /// Cells per tick while a direction is held.
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub width: f32,
    pub height: f32,
    pub player_speed: f32,
    pub invader_speed: f32,
    pub max_player_bullets: usize,
    pub max_invader_bullets: usize,
    pub fire_cooldown_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvaderConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub offset_left: f32,
    pub offset_top: f32,
    pub base_rows: u32,
    pub base_cols: u32,
    pub max_rows: u32,
    pub max_cols: u32,
    pub base_speed: f32,
    /// Added per level above 1.
    pub speed_step: f32,
    pub max_speed: f32,
    /// How far the grid descends on each edge bounce.
    pub drop_step: f32,
    /// Chance per tick that some invader fires.
    pub fire_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            level_clear_ticks: 60,
            leaderboard_size: 3,
            player: PlayerConfig::default(),
            bullets: BulletConfig::default(),
            invaders: InvaderConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 5.0,
            height: 1.0,
            speed: 0.8,
        }
    }
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            player_speed: 0.5,
            invader_speed: 0.25,
            max_player_bullets: 3,
            max_invader_bullets: 4,
            fire_cooldown_ticks: 8,
        }
    }
}

impl Default for InvaderConfig {
    fn default() -> Self {
        Self {
            width: 3.0,
            height: 1.0,
            padding: 1.0,
            offset_left: 2.0,
            offset_top: 1.0,
            base_rows: 3,
            base_cols: 5,
            max_rows: 6,
            max_cols: 10,
            base_speed: 0.3,
            speed_step: 0.1,
            max_speed: 1.2,
            drop_step: 1.0,
            fire_chance: 0.02,
        }
    }
}

impl GameConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("player.speed", self.player.speed),
            ("bullets.width", self.bullets.width),
            ("bullets.height", self.bullets.height),
            ("bullets.player_speed", self.bullets.player_speed),
            ("bullets.invader_speed", self.bullets.invader_speed),
            ("invaders.width", self.invaders.width),
            ("invaders.height", self.invaders.height),
            ("invaders.base_speed", self.invaders.base_speed),
            ("invaders.max_speed", self.invaders.max_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }

        let inv = &self.invaders;
        if inv.padding < 0.0 || inv.offset_left < 0.0 || inv.offset_top < 0.0 {
            return Err(ConfigError::Invalid(
                "invaders.padding and offsets must be >= 0".to_string(),
            ));
        }
        if inv.speed_step < 0.0 || inv.drop_step < 0.0 {
            return Err(ConfigError::Invalid(
                "invaders.speed_step and drop_step must be >= 0".to_string(),
            ));
        }
        if inv.base_rows == 0 || inv.base_cols == 0 {
            return Err(ConfigError::Invalid("base grid must be at least 1x1".to_string()));
        }
        if inv.base_rows > inv.max_rows || inv.base_cols > inv.max_cols {
            return Err(ConfigError::Invalid(format!(
                "base grid {}x{} exceeds cap {}x{}",
                inv.base_rows, inv.base_cols, inv.max_rows, inv.max_cols
            )));
        }
        if inv.base_speed > inv.max_speed {
            return Err(ConfigError::Invalid(format!(
                "invaders.base_speed {} exceeds max_speed {}",
                inv.base_speed, inv.max_speed
            )));
        }
        if !(0.0..=1.0).contains(&inv.fire_chance) {
            return Err(ConfigError::Invalid(format!(
                "invaders.fire_chance must be within [0, 1], got {}",
                inv.fire_chance
            )));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be > 0".to_string()));
        }
        if self.leaderboard_size == 0 {
            return Err(ConfigError::Invalid("leaderboard_size must be > 0".to_string()));
        }
        Ok(())
    }
}
