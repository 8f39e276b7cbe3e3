//! Level construction from on-disk data
//!
//! A level is a Tiled JSON map (platform, coin, portal and hazard layers)
//! plus a side file of enemy placements.

pub mod loader;
pub mod placement;
pub mod tilemap;

use thiserror::Error;

use crate::sim::state::Level;

pub use loader::{LevelLoader, build_level};
pub use placement::{EnemyPlacement, parse_placements};
pub use tilemap::{MapLayer, TileMap};

/// Errors raised while building a level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level asset missing: {path}")]
    AssetMissing { path: String },
    #[error("malformed level data: {0}")]
    MalformedLevelData(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can produce a fresh [`Level`] for a level index
pub trait LevelSource {
    fn load(&self, level_id: u32) -> Result<Level, LevelError>;
}

impl<F> LevelSource for F
where
    F: Fn(u32) -> Result<Level, LevelError>,
{
    fn load(&self, level_id: u32) -> Result<Level, LevelError> {
        self(level_id)
    }
}
