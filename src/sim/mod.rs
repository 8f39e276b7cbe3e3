//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (time is the tick counter)
//! - Stable iteration order (group vectors keep load/spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod geometry;
pub mod interact;
pub mod mask;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod view;

pub use collision::{AxisContact, resolve_horizontal, resolve_point_sampled, resolve_vertical};
pub use geometry::{Rect, StaticGeometry, Tile};
pub use interact::{InteractionReport, portal_unlocked, resolve_interactions};
pub use mask::{Mask, masks_collide};
pub use sprite::{Animation, Facing, SpriteCatalog, SpriteFrame, SpriteKey};
pub use state::{
    Actor, Animated, Coin, Enemy, GroupCounts, Level, LevelBounds, Movement, Player, PlayerIntent,
    Portal, Projectile, Renderable, WorldContext,
};
pub use tick::{Session, SessionMode, TickInput, TickOutcome};
pub use view::{DrawItem, Hud};
