//! Per-pixel collision masks
//!
//! A mask marks which pixels of a sprite frame are solid. Two entities touch
//! when their rectangles overlap AND at least one pixel is solid in both
//! masks at the same world position.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Alpha values above this count as solid
pub const ALPHA_THRESHOLD: u8 = 127;

/// Row-major solidity bitmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    width: i32,
    height: i32,
    bits: Vec<bool>,
}

impl Mask {
    /// Fully solid mask (what an opaque rectangular frame produces)
    pub fn solid(width: i32, height: i32) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build from 8-bit alpha values (row-major, `width * height` entries).
    /// Missing trailing entries count as transparent.
    pub fn from_alpha(width: i32, height: i32, alpha: &[u8]) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        let len = (width * height) as usize;
        let bits = (0..len)
            .map(|i| alpha.get(i).is_some_and(|&a| a > ALPHA_THRESHOLD))
            .collect();
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    /// Mirror image for left-facing frames
    pub fn flipped_horizontal(&self) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len());
        for y in 0..self.height {
            for x in (0..self.width).rev() {
                bits.push(self.get(x, y));
            }
        }
        Self {
            width: self.width,
            height: self.height,
            bits,
        }
    }

    /// Test overlap with `other` placed at `offset` relative to this mask's origin
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width).min(self.width);
        let y1 = (offset.y + other.height).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return true;
                }
            }
        }
        false
    }
}

/// Mask-precision overlap of two placed sprites.
///
/// Each side is a world rectangle plus its mask; the mask is anchored at the
/// rectangle's top-left corner.
pub fn masks_collide(a_rect: &Rect, a_mask: &Mask, b_rect: &Rect, b_mask: &Mask) -> bool {
    if !a_rect.overlaps(b_rect) {
        return false;
    }
    let offset = IVec2::new(b_rect.x - a_rect.x, b_rect.y - a_rect.y);
    a_mask.overlaps(b_mask, offset)
}
