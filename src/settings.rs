//! Game configuration and tuning
//!
//! Everything the simulation used to read from process-wide constants lives
//! in one immutable [`GameConfig`], handed to the session at construction.
//! Can be loaded from JSON; missing fields fall back to the defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while reading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Enemy variants known to the level data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    Crab,
    Pumpkin,
}

impl EnemyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Crab => "Crab",
            EnemyKind::Pumpkin => "Pumpkin",
        }
    }

    /// Parse the `name` field used in enemy placement files
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Crab" => Some(EnemyKind::Crab),
            "Pumpkin" => Some(EnemyKind::Pumpkin),
            _ => None,
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size and timing of one animation sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSpec {
    pub width: i32,
    pub height: i32,
    pub frames: usize,
    pub interval_ms: u64,
}

impl SequenceSpec {
    pub const fn new(width: i32, height: i32, frames: usize, interval_ms: u64) -> Self {
        Self {
            width,
            height,
            frames,
            interval_ms,
        }
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }
}

/// Per-kind enemy tuning (replaces one subclass per enemy type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyProfile {
    /// Horizontal patrol speed (pixels per tick)
    pub move_speed: i32,
    /// Downward acceleration (pixels per tick²)
    pub gravity: i32,
    /// Sprite size, frame count and frame interval
    pub sprite: SequenceSpec,
}

/// Per-level data that used to be hardcoded for the first map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProfile {
    /// Player spawn point (center of the player rectangle)
    pub player_spawn: (i32, i32),
    /// Optional safety clamp: when the player's right edge passes this column
    /// it is pulled back to `right_limit - right_limit_inset`
    #[serde(default)]
    pub right_limit: Option<i32>,
    #[serde(default)]
    pub right_limit_inset: i32,
}

impl Default for LevelProfile {
    fn default() -> Self {
        Self {
            player_spawn: (72, 832),
            right_limit: None,
            right_limit_inset: 0,
        }
    }
}

/// Sprite sequences for everything that isn't an enemy or a map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteTable {
    pub player_idle: SequenceSpec,
    pub player_run: SequenceSpec,
    pub coin: SequenceSpec,
    pub portal: SequenceSpec,
    pub projectile: SequenceSpec,
}

impl Default for SpriteTable {
    fn default() -> Self {
        Self {
            // 32px sheets drawn at 4x
            player_idle: SequenceSpec::new(128, 128, 5, 300),
            player_run: SequenceSpec::new(128, 128, 6, 300),
            // 16px strip at 4x
            coin: SequenceSpec::new(64, 64, 4, 200),
            // 64px sheet at 4x
            portal: SequenceSpec::new(256, 256, 8, 100),
            projectile: SequenceSpec::new(PROJECTILE_SIZE, PROJECTILE_SIZE, 1, 0),
        }
    }
}

/// Immutable game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Viewport / timing ===
    pub screen_width: i32,
    pub screen_height: i32,
    pub fps: u32,
    pub tile_scale: i32,

    // === Player physics ===
    pub gravity: i32,
    pub move_speed: i32,
    pub jump_speed: i32,
    pub max_fall_speed: i32,

    // === Player health ===
    pub player_health: i32,
    pub damage_per_hit: i32,
    pub damage_cooldown_ms: u64,

    // === Projectiles ===
    pub projectile_speed: i32,

    // === Camera ===
    pub camera_lerp: f32,

    // === Progression ===
    pub first_level: u32,
    /// Reaching this index ends the run
    pub final_level: u32,

    pub sprites: SpriteTable,
    pub enemies: BTreeMap<EnemyKind, EnemyProfile>,
    /// Keyed by level id; levels without an entry use `LevelProfile::default()`
    pub levels: BTreeMap<u32, LevelProfile>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut enemies = BTreeMap::new();
        enemies.insert(
            EnemyKind::Crab,
            EnemyProfile {
                move_speed: 2,
                gravity: 2,
                sprite: SequenceSpec::new(128, 128, 2, 300),
            },
        );
        enemies.insert(
            EnemyKind::Pumpkin,
            EnemyProfile {
                move_speed: 3,
                gravity: 2,
                sprite: SequenceSpec::new(64, 64, 2, 300),
            },
        );

        let mut levels = BTreeMap::new();
        levels.insert(
            1,
            LevelProfile {
                player_spawn: (72, 832),
                right_limit: Some(1760),
                right_limit_inset: 20,
            },
        );

        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            fps: FPS,
            tile_scale: TILE_SCALE,

            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_speed: JUMP_SPEED,
            max_fall_speed: MAX_FALL_SPEED,

            player_health: PLAYER_HEALTH,
            damage_per_hit: DAMAGE_PER_HIT,
            damage_cooldown_ms: DAMAGE_COOLDOWN_MS,

            projectile_speed: PROJECTILE_SPEED,

            camera_lerp: CAMERA_LERP,

            first_level: FIRST_LEVEL,
            final_level: FINAL_LEVEL,

            sprites: SpriteTable::default(),
            enemies,
            levels,
        }
    }
}

impl GameConfig {
    /// Parse from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Enemy tuning for a kind; kinds missing from the table use the crab's
    pub fn enemy_profile(&self, kind: EnemyKind) -> EnemyProfile {
        self.enemies
            .get(&kind)
            .or_else(|| self.enemies.get(&EnemyKind::Crab))
            .copied()
            .unwrap_or(EnemyProfile {
                move_speed: 2,
                gravity: self.gravity,
                sprite: SequenceSpec::new(128, 128, 2, 300),
            })
    }

    /// Per-level data, falling back to the default profile
    pub fn level_profile(&self, level_id: u32) -> LevelProfile {
        self.levels.get(&level_id).copied().unwrap_or_default()
    }

    /// Simulation time of a tick count, in milliseconds
    pub fn ticks_to_ms(&self, ticks: u64) -> u64 {
        ticks * 1000 / u64::from(self.fps.max(1))
    }
}
