//! Sprite sequences, collision masks and frame-timer animation
//!
//! Image decoding happens outside the simulation. The catalog only knows the
//! size, frame count and interval of every sequence, plus optional masks an
//! asset loader may install. Frames without a mask collide as solid boxes.

use std::borrow::Cow;
use std::collections::HashMap;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::mask::{Mask, masks_collide};
use crate::settings::{EnemyKind, GameConfig, SequenceSpec};

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Unit direction along X
    pub fn sign(&self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }
}

/// Identifies an animation sequence (or a static map tile)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKey {
    PlayerIdle(Facing),
    PlayerRun(Facing),
    Enemy(EnemyKind),
    Coin,
    Portal,
    Projectile,
    /// Map tile by tileset gid
    Tile(u32),
}

/// The image the renderer should draw: a sequence and a frame within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub key: SpriteKey,
    pub frame: usize,
}

/// Catalog entry for one sequence
#[derive(Debug, Clone)]
pub struct Sequence {
    pub size: IVec2,
    pub frames: usize,
    pub interval_ms: u64,
    /// One mask per frame, empty when no image data was supplied
    pub masks: Vec<Mask>,
}

impl Sequence {
    fn from_spec(spec: &SequenceSpec) -> Self {
        Self {
            size: spec.size(),
            frames: spec.frames.max(1),
            interval_ms: spec.interval_ms,
            masks: Vec::new(),
        }
    }
}

/// All sprite sequences known to the simulation
#[derive(Debug, Clone, Default)]
pub struct SpriteCatalog {
    sequences: HashMap<SpriteKey, Sequence>,
}

impl SpriteCatalog {
    /// Build the catalog from configured sizes and timings
    pub fn from_config(config: &GameConfig) -> Self {
        let mut catalog = Self::default();
        let sprites = &config.sprites;
        for facing in [Facing::Left, Facing::Right] {
            catalog.insert(SpriteKey::PlayerIdle(facing), &sprites.player_idle);
            catalog.insert(SpriteKey::PlayerRun(facing), &sprites.player_run);
        }
        catalog.insert(SpriteKey::Coin, &sprites.coin);
        catalog.insert(SpriteKey::Portal, &sprites.portal);
        catalog.insert(SpriteKey::Projectile, &sprites.projectile);
        for kind in [EnemyKind::Crab, EnemyKind::Pumpkin] {
            let profile = config.enemy_profile(kind);
            catalog.insert(SpriteKey::Enemy(kind), &profile.sprite);
        }
        catalog
    }

    pub fn insert(&mut self, key: SpriteKey, spec: &SequenceSpec) {
        self.sequences.insert(key, Sequence::from_spec(spec));
    }

    /// Install decoded frame masks for a sequence.
    ///
    /// Right-facing player frames also fill their left-facing twin with
    /// mirrored masks. Ignored (with a warning) for keys the catalog doesn't
    /// know.
    pub fn set_masks(&mut self, key: SpriteKey, masks: Vec<Mask>) {
        let twin = match key {
            SpriteKey::PlayerIdle(Facing::Right) => Some(SpriteKey::PlayerIdle(Facing::Left)),
            SpriteKey::PlayerRun(Facing::Right) => Some(SpriteKey::PlayerRun(Facing::Left)),
            _ => None,
        };
        if let Some(twin) = twin {
            self.install_masks(twin, masks.iter().map(Mask::flipped_horizontal).collect());
        }
        self.install_masks(key, masks);
    }

    fn install_masks(&mut self, key: SpriteKey, masks: Vec<Mask>) {
        match self.sequences.get_mut(&key) {
            Some(seq) => seq.masks = masks,
            None => log::warn!("No sprite sequence {:?}, masks ignored", key),
        }
    }

    pub fn sequence(&self, key: SpriteKey) -> Option<&Sequence> {
        self.sequences.get(&key)
    }

    /// Size of a sequence's frames (zero for unknown keys)
    pub fn size(&self, key: SpriteKey) -> IVec2 {
        self.sequence(key).map(|s| s.size).unwrap_or(IVec2::ZERO)
    }

    /// Mask of a frame, or a solid box the size of `rect`
    pub fn mask_for(&self, frame: SpriteFrame, rect: &Rect) -> Cow<'_, Mask> {
        self.sequence(frame.key)
            .and_then(|s| s.masks.get(frame.frame))
            .map(Cow::Borrowed)
            .unwrap_or_else(|| Cow::Owned(Mask::solid(rect.w, rect.h)))
    }

    /// Pixel-precise contact between two drawn sprites
    pub fn sprites_collide(
        &self,
        a_rect: &Rect,
        a_frame: SpriteFrame,
        b_rect: &Rect,
        b_frame: SpriteFrame,
    ) -> bool {
        if !a_rect.overlaps(b_rect) {
            return false;
        }
        let a_mask = self.mask_for(a_frame, a_rect);
        let b_mask = self.mask_for(b_frame, b_rect);
        masks_collide(a_rect, &a_mask, b_rect, &b_mask)
    }
}

/// Frame-timer state machine for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    pub key: SpriteKey,
    pub frame: usize,
    pub last_advance_ms: u64,
}

impl Animation {
    pub fn new(key: SpriteKey, now_ms: u64) -> Self {
        Self {
            key,
            frame: 0,
            last_advance_ms: now_ms,
        }
    }

    /// Change the active sequence; a different sequence restarts at frame 0
    pub fn switch(&mut self, key: SpriteKey) {
        if self.key != key {
            self.key = key;
            self.frame = 0;
        }
    }

    /// Advance one frame when more than the interval has passed.
    /// Returns true if the frame changed.
    pub fn update(&mut self, catalog: &SpriteCatalog, now_ms: u64) -> bool {
        let Some(seq) = catalog.sequence(self.key) else {
            return false;
        };
        if now_ms.saturating_sub(self.last_advance_ms) > seq.interval_ms {
            self.frame = (self.frame + 1) % seq.frames;
            self.last_advance_ms = now_ms;
            return seq.frames > 1;
        }
        false
    }

    pub fn current(&self) -> SpriteFrame {
        SpriteFrame {
            key: self.key,
            frame: self.frame,
        }
    }
}
