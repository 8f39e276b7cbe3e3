//! Tiled JSON map format (the subset the game uses)

use serde::Deserialize;

use super::LevelError;

/// Tiled stores horizontal/vertical/diagonal flip flags in the top bits
pub const GID_MASK: u32 = 0x1FFF_FFFF;

/// A tile map as exported by Tiled (`.tmj`)
#[derive(Debug, Clone, Deserialize)]
pub struct TileMap {
    /// Size in tiles
    pub width: u32,
    pub height: u32,
    /// Tile size in source pixels
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub layers: Vec<MapLayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapLayer {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Row-major gids, 0 for empty (only present on tile layers)
    #[serde(default)]
    pub data: Vec<u32>,
}

impl MapLayer {
    pub fn is_tile_layer(&self) -> bool {
        self.kind == "tilelayer"
    }

    /// Non-empty cells as `(x, y, gid)` in row-major order, flip flags removed
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let width = self.width.max(1);
        self.data.iter().enumerate().filter_map(move |(i, &raw)| {
            let gid = raw & GID_MASK;
            (gid != 0).then(|| (i as u32 % width, i as u32 / width, gid))
        })
    }
}

impl TileMap {
    /// Parse and validate a map document
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let map: TileMap = serde_json::from_str(json)
            .map_err(|e| LevelError::MalformedLevelData(format!("tile map: {e}")))?;
        map.validate()?;
        Ok(map)
    }

    fn validate(&self) -> Result<(), LevelError> {
        if self.tilewidth == 0 || self.tileheight == 0 {
            return Err(LevelError::MalformedLevelData(format!(
                "tile size {}x{} must be positive",
                self.tilewidth, self.tileheight
            )));
        }
        for layer in self.layers.iter().filter(|l| l.is_tile_layer()) {
            if layer.width > self.width || layer.height > self.height {
                return Err(LevelError::MalformedLevelData(format!(
                    "layer '{}' is {}x{}, larger than the {}x{} map",
                    layer.name, layer.width, layer.height, self.width, self.height
                )));
            }
            let expected = layer.width as usize * layer.height as usize;
            if layer.data.len() != expected {
                return Err(LevelError::MalformedLevelData(format!(
                    "layer '{}' has {} cells, expected {}x{}",
                    layer.name,
                    layer.data.len(),
                    layer.width,
                    layer.height
                )));
            }
        }
        Ok(())
    }

    pub fn layer(&self, name: &str) -> Option<&MapLayer> {
        self.layers.iter().find(|l| l.is_tile_layer() && l.name == name)
    }
}
