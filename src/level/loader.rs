//! Filesystem level loader
//!
//! Reads `<root>/maps/level{N}.tmj` and `<root>/maps/level{N}_enemies.json`
//! and turns them into a fresh [`Level`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glam::IVec2;

use super::placement::{EnemyPlacement, parse_placements};
use super::tilemap::TileMap;
use super::{LevelError, LevelSource};
use crate::settings::GameConfig;
use crate::sim::geometry::{Rect, StaticGeometry, Tile};
use crate::sim::sprite::{SpriteCatalog, SpriteKey};
use crate::sim::state::{Animated, Enemy, Level, LevelBounds, Player};

/// Layer names understood by the game
const LAYER_PLATFORMS: &str = "Game";
const LAYER_COINS: &str = "Coins";
const LAYER_PORTALS: &str = "Portals";
const LAYER_HAZARDS: &str = "Shipi";

/// Largest accepted level side, in pixels
pub const MAX_LEVEL_PIXELS: i32 = 1 << 24;

/// Loads levels from an asset directory
#[derive(Debug, Clone)]
pub struct LevelLoader {
    root: PathBuf,
    config: GameConfig,
    catalog: SpriteCatalog,
}

impl LevelLoader {
    pub fn new(root: impl Into<PathBuf>, config: GameConfig) -> Self {
        let catalog = SpriteCatalog::from_config(&config);
        Self {
            root: root.into(),
            config,
            catalog,
        }
    }

    pub fn map_path(&self, level_id: u32) -> PathBuf {
        self.root.join("maps").join(format!("level{level_id}.tmj"))
    }

    pub fn enemies_path(&self, level_id: u32) -> PathBuf {
        self.root.join("maps").join(format!("level{level_id}_enemies.json"))
    }
}

impl LevelSource for LevelLoader {
    fn load(&self, level_id: u32) -> Result<Level, LevelError> {
        let map = TileMap::from_json(&read_asset(&self.map_path(level_id))?)?;
        let placements = parse_placements(&read_asset(&self.enemies_path(level_id))?)?;
        let level = build_level(level_id, &map, &placements, &self.config, &self.catalog)?;

        let counts = level.group_counts();
        log::info!(
            "Loaded level {} ({}x{} px): {} platforms, {} hazards, {} enemies, {} coins, {} portals",
            level_id,
            level.width(),
            level.height(),
            counts.platforms,
            counts.hazards,
            counts.enemies,
            counts.coins,
            counts.portals
        );
        Ok(level)
    }
}

fn read_asset(path: &Path) -> Result<String, LevelError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LevelError::AssetMissing {
            path: path.display().to_string(),
        },
        _ => LevelError::Io {
            path: path.display().to_string(),
            source,
        },
    })
}

/// Convert tile-space map data into world-space entities
pub fn build_level(
    level_id: u32,
    map: &TileMap,
    placements: &[EnemyPlacement],
    config: &GameConfig,
    catalog: &SpriteCatalog,
) -> Result<Level, LevelError> {
    let scale = config.tile_scale;
    let tile = IVec2::new(
        scaled_px(map.tilewidth, scale, "tile width")?,
        scaled_px(map.tileheight, scale, "tile height")?,
    );
    let size = IVec2::new(
        scaled_px(map.width, tile.x, "level width")?,
        scaled_px(map.height, tile.y, "level height")?,
    );
    // Every cell and placement lies inside the map, so the products below
    // stay within MAX_LEVEL_PIXELS
    for (i, p) in placements.iter().enumerate() {
        check_placement(map, i, p)?;
    }

    let cell_origin = |x: u32, y: u32| IVec2::new(x as i32, y as i32) * tile;

    let mut platforms = Vec::new();
    let mut hazards = Vec::new();
    let mut coins = Vec::new();
    let mut portals = Vec::new();

    for layer in &map.layers {
        if !layer.is_tile_layer() {
            continue;
        }
        match layer.name.as_str() {
            LAYER_PLATFORMS | LAYER_HAZARDS => {
                let target = if layer.name == LAYER_PLATFORMS {
                    &mut platforms
                } else {
                    &mut hazards
                };
                target.extend(layer.cells().map(|(x, y, gid)| {
                    let origin = cell_origin(x, y);
                    Tile {
                        rect: Rect::new(origin.x, origin.y, tile.x, tile.y),
                        gid,
                    }
                }));
            }
            LAYER_COINS => {
                let size = catalog.size(SpriteKey::Coin);
                coins.extend(layer.cells().map(|(x, y, _)| {
                    let origin = cell_origin(x, y);
                    Animated::new(Rect::new(origin.x, origin.y, size.x, size.y), SpriteKey::Coin, 0)
                }));
            }
            LAYER_PORTALS => {
                // One exit per level
                if let Some((x, y, _)) = layer.cells().next() {
                    let size = catalog.size(SpriteKey::Portal);
                    let origin = cell_origin(x, y);
                    let mut rect = Rect::new(0, 0, size.x, size.y);
                    rect.set_left(origin.x);
                    rect.set_bottom(origin.y);
                    portals.push(Animated::new(rect, SpriteKey::Portal, 0));
                }
            }
            other => log::debug!("Level {}: skipping layer '{}'", level_id, other),
        }
    }

    let enemies = placements
        .iter()
        .map(|p| {
            Enemy::spawn(
                p.kind,
                config.enemy_profile(p.kind),
                p.start * tile,
                p.end * tile,
                0,
            )
        })
        .collect();

    let profile = config.level_profile(level_id);
    let bounds = LevelBounds {
        width: size.x,
        height: size.y,
        right_limit: profile.right_limit,
        right_limit_inset: profile.right_limit_inset,
    };
    let player = Player::new(IVec2::from(profile.player_spawn), config, catalog, 0);
    let total_coins = coins.len() as u32;

    Ok(Level {
        id: level_id,
        bounds,
        geometry: StaticGeometry::new(platforms),
        hazards,
        enemies,
        projectiles: Vec::new(),
        coins,
        portals,
        player,
        total_coins,
    })
}

/// `count * unit` in pixels, rejected when it leaves `0..=MAX_LEVEL_PIXELS`
fn scaled_px(count: u32, unit: i32, what: &str) -> Result<i32, LevelError> {
    i32::try_from(count)
        .ok()
        .and_then(|c| c.checked_mul(unit))
        .filter(|px| (0..=MAX_LEVEL_PIXELS).contains(px))
        .ok_or_else(|| {
            LevelError::MalformedLevelData(format!("{what} of {count} x {unit} px out of range"))
        })
}

/// Placements must start and end on a map column, at or above the map bottom
fn check_placement(map: &TileMap, index: usize, p: &EnemyPlacement) -> Result<(), LevelError> {
    let inside = |pos: IVec2| {
        i64::from(pos.x) < i64::from(map.width) && i64::from(pos.y) <= i64::from(map.height)
    };
    if inside(p.start) && inside(p.end) {
        return Ok(());
    }
    Err(LevelError::MalformedLevelData(format!(
        "enemy {index}: {} -> {} lies outside the {}x{} map",
        p.start, p.end, map.width, map.height
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EnemyKind;

    fn map() -> TileMap {
        TileMap::from_json(
            r#"{
            "width": 4, "height": 3, "tilewidth": 16, "tileheight": 16,
            "layers": [
                { "name": "Game", "type": "tilelayer", "width": 4, "height": 3,
                  "data": [0,0,0,0, 0,0,0,0, 1,1,1,1] },
                { "name": "Coins", "type": "tilelayer", "width": 4, "height": 3,
                  "data": [0,5,5,0, 0,0,0,0, 0,0,0,0] },
                { "name": "Portals", "type": "tilelayer", "width": 4, "height": 3,
                  "data": [0,0,0,0, 0,0,7,7, 0,0,0,0] },
                { "name": "Shipi", "type": "tilelayer", "width": 4, "height": 3,
                  "data": [0,0,0,0, 0,0,0,9, 0,0,0,0] },
                { "name": "Decor", "type": "tilelayer", "width": 4, "height": 3,
                  "data": [3,0,0,0, 0,0,0,0, 0,0,0,0] }
            ]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_pixel_mapping() {
        let config = GameConfig::default();
        let catalog = SpriteCatalog::from_config(&config);
        let placements = [EnemyPlacement {
            kind: EnemyKind::Pumpkin,
            start: IVec2::new(1, 2),
            end: IVec2::new(2, 2),
        }];
        let level = build_level(2, &map(), &placements, &config, &catalog).unwrap();

        assert_eq!(level.width(), 4 * 32);
        assert_eq!(level.height(), 3 * 32);
        assert_eq!(level.geometry.len(), 4);
        assert_eq!(level.geometry.tiles()[1].rect, Rect::new(32, 64, 32, 32));

        assert_eq!(level.total_coins, 2);
        assert_eq!(level.coins[1].rect, Rect::new(64, 0, 64, 64));

        // Only the first portal cell counts
        assert_eq!(level.portals.len(), 1);
        assert_eq!(level.portals[0].rect.left(), 64);
        assert_eq!(level.portals[0].rect.bottom(), 32);

        assert_eq!(level.hazards.len(), 1);
        assert_eq!(level.hazards[0].rect, Rect::new(96, 32, 32, 32));

        let pumpkin = &level.enemies[0];
        assert_eq!(pumpkin.rect.left(), 32);
        assert_eq!(pumpkin.rect.bottom(), 64);
        assert_eq!(pumpkin.right_edge, 64 + 64);

        assert_eq!(level.bounds.right_limit, None);
    }

    #[test]
    fn test_placement_outside_map_is_malformed() {
        let config = GameConfig::default();
        let catalog = SpriteCatalog::from_config(&config);
        for (start, end) in [
            (IVec2::new(100_000_000, 2), IVec2::new(100_000_000, 2)),
            (IVec2::new(1, 2), IVec2::new(4, 2)),
            (IVec2::new(1, 4), IVec2::new(2, 4)),
        ] {
            let placements = [EnemyPlacement {
                kind: EnemyKind::Crab,
                start,
                end,
            }];
            let err = build_level(1, &map(), &placements, &config, &catalog).unwrap_err();
            assert!(matches!(err, LevelError::MalformedLevelData(_)), "{start} -> {end}");
        }
    }

    #[test]
    fn test_oversized_map_is_malformed() {
        let config = GameConfig::default();
        let catalog = SpriteCatalog::from_config(&config);
        let mut huge = map();
        huge.width = u32::MAX;
        let err = build_level(1, &huge, &[], &config, &catalog).unwrap_err();
        assert!(matches!(err, LevelError::MalformedLevelData(_)));

        let mut wide = map();
        wide.width = 300_000_000;
        let err = build_level(1, &wide, &[], &config, &catalog).unwrap_err();
        assert!(matches!(err, LevelError::MalformedLevelData(_)));
    }

    #[test]
    fn test_missing_files_are_asset_missing() {
        let loader = LevelLoader::new("/nonexistent/tile-runner", GameConfig::default());
        match loader.load(1) {
            Err(LevelError::AssetMissing { path }) => assert!(path.ends_with("level1.tmj")),
            other => panic!("expected AssetMissing, got {other:?}"),
        }
    }
}
