//! Render-facing snapshots of the session
//!
//! The simulation never draws. A renderer asks the session for a
//! [`DrawItem`] list (already shifted into screen space) and a [`Hud`].

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::sprite::SpriteFrame;
use super::state::Renderable;
use super::tick::SessionMode;

/// One sprite to draw this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawItem {
    pub sprite: SpriteFrame,
    /// World rect minus the rounded camera offset
    pub screen_rect: Rect,
}

impl DrawItem {
    pub fn from_renderable(item: &dyn Renderable, camera: IVec2) -> Self {
        Self {
            sprite: item.sprite(),
            screen_rect: item.rect().offset(-camera),
        }
    }
}

/// Pixel offset the renderer subtracts from world positions
pub fn camera_offset(camera: Vec2) -> IVec2 {
    camera.round().as_ivec2()
}

/// Heads-up display values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub health: i32,
    pub max_health: i32,
    pub score: u32,
    pub total_coins: u32,
    pub level: u32,
    pub mode: SessionMode,
}
