//! Tile Runner - A tile-based side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, session state)
//! - `level`: Tile map + enemy placement loading
//! - `settings`: Data-driven game tuning

pub mod level;
pub mod settings;
pub mod sim;

pub use level::{LevelError, LevelLoader, LevelSource};
pub use settings::{ConfigError, EnemyProfile, GameConfig, LevelProfile};

/// Game configuration constants (defaults for [`GameConfig`])
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const FPS: u32 = 80;

    /// Viewport dimensions in pixels
    pub const SCREEN_WIDTH: i32 = 1680;
    pub const SCREEN_HEIGHT: i32 = 1050;

    /// World-to-pixel multiplier applied to every tile coordinate
    pub const TILE_SCALE: i32 = 2;

    /// Player movement (pixels per tick)
    pub const GRAVITY: i32 = 2;
    pub const MOVE_SPEED: i32 = 10;
    pub const JUMP_SPEED: i32 = -40;
    pub const MAX_FALL_SPEED: i32 = 20;

    /// Player health and damage
    pub const PLAYER_HEALTH: i32 = 10;
    pub const DAMAGE_PER_HIT: i32 = 3;
    pub const DAMAGE_COOLDOWN_MS: u64 = 1000;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: i32 = 10;
    pub const PROJECTILE_SIZE: i32 = 30;

    /// Camera smoothing factor (fraction of the remaining distance per tick)
    pub const CAMERA_LERP: f32 = 0.1;

    /// First playable level and the index that ends the run
    pub const FIRST_LEVEL: u32 = 1;
    pub const FINAL_LEVEL: u32 = 4;
}
