//! Rectangle geometry and the static platform set
//!
//! Rectangles are integer pixel boxes with a top-left origin:
//! - `right = x + w`, `bottom = y + h` (exclusive edges)
//! - overlap is strict, so touching edges do not collide
//! - zero-area rectangles never collide

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned integer rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: IVec2, size: IVec2) -> Self {
        let mut rect = Self::new(0, 0, size.x, size.y);
        rect.set_center(center);
        rect
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    #[inline]
    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.center_x(), self.center_y())
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.w, self.h)
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn set_center(&mut self, center: IVec2) {
        self.x = center.x - self.w / 2;
        self.y = center.y - self.h / 2;
    }

    pub fn set_center_y(&mut self, center_y: i32) {
        self.y = center_y - self.h / 2;
    }

    /// Midpoints of the four edges
    pub fn mid_top(&self) -> IVec2 {
        IVec2::new(self.center_x(), self.top())
    }

    pub fn mid_bottom(&self) -> IVec2 {
        IVec2::new(self.center_x(), self.bottom())
    }

    pub fn mid_left(&self) -> IVec2 {
        IVec2::new(self.left(), self.center_y())
    }

    pub fn mid_right(&self) -> IVec2 {
        IVec2::new(self.right(), self.center_y())
    }

    /// Translated copy
    pub fn offset(&self, delta: IVec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    /// Strict overlap test (shared edges are not a collision)
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Half-open point containment: left/top edges inside, right/bottom outside
    pub fn contains_point(&self, p: IVec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }
}

/// One map tile turned into a world rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub rect: Rect,
    /// Tileset gid (flip flags already stripped), used as the image reference
    pub gid: u32,
}

/// Immutable set of platform tiles, built once per level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticGeometry {
    tiles: Vec<Tile>,
}

impl StaticGeometry {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rect> + '_ {
        self.tiles.iter().map(|t| &t.rect)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// True if any platform overlaps `rect`
    pub fn any_overlap(&self, rect: &Rect) -> bool {
        self.rects().any(|p| p.overlaps(rect))
    }
}
