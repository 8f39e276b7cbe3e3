//! Collision resolution against static platform geometry
//!
//! Movement is resolved one axis at a time: callers move along X, call
//! [`resolve_horizontal`], then move along Y and call [`resolve_vertical`].
//! Enemies use the coarser [`resolve_point_sampled`] rule instead.

use super::geometry::{Rect, StaticGeometry};

/// Outcome of resolving one axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisContact {
    /// At least one platform was touched
    pub hit: bool,
    /// Moving down and snapped onto a platform top
    pub landed: bool,
}

/// Push `rect` out of every platform it overlaps along X.
///
/// The leading edge snaps to the platform's facing edge in the direction of
/// `vx`; with `vx == 0` nothing is moved. Velocity is zeroed on contact.
pub fn resolve_horizontal(rect: &mut Rect, vx: &mut i32, geometry: &StaticGeometry) -> AxisContact {
    let dir = *vx;
    let mut contact = AxisContact::default();
    for platform in geometry.rects() {
        if !rect.overlaps(platform) {
            continue;
        }
        if dir > 0 {
            rect.set_right(platform.left());
            contact.hit = true;
        } else if dir < 0 {
            rect.set_left(platform.right());
            contact.hit = true;
        }
    }
    if contact.hit {
        *vx = 0;
    }
    contact
}

/// Push `rect` out of every platform it overlaps along Y.
///
/// Falling snaps the bottom onto the platform top (a landing); rising snaps
/// the top under the platform bottom. Any overlap zeroes vertical velocity.
pub fn resolve_vertical(rect: &mut Rect, vy: &mut i32, geometry: &StaticGeometry) -> AxisContact {
    let dir = *vy;
    let mut contact = AxisContact::default();
    for platform in geometry.rects() {
        if !rect.overlaps(platform) {
            continue;
        }
        contact.hit = true;
        if dir > 0 {
            rect.set_bottom(platform.top());
            contact.landed = true;
        } else if dir < 0 {
            rect.set_top(platform.bottom());
        }
    }
    if contact.hit {
        *vy = 0;
    }
    contact
}

/// Coarse enemy collision: sample the four edge midpoints against each
/// platform and snap the matching edge out.
///
/// Returns true if the bottom midpoint found ground.
pub fn resolve_point_sampled(rect: &mut Rect, vy: &mut i32, geometry: &StaticGeometry) -> bool {
    let mut grounded = false;
    for platform in geometry.rects() {
        if platform.contains_point(rect.mid_bottom()) {
            rect.set_bottom(platform.top());
            *vy = 0;
            grounded = true;
        }
        if platform.contains_point(rect.mid_top()) {
            rect.set_top(platform.bottom());
            *vy = 0;
        }
        if platform.contains_point(rect.mid_right()) {
            rect.set_right(platform.left());
        }
        if platform.contains_point(rect.mid_left()) {
            rect.set_left(platform.right());
        }
    }
    grounded
}
