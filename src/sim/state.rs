//! Entities, the per-level entity set, and the actor update contract
//!
//! Every moving thing implements [`Actor`] and is advanced with the same
//! [`WorldContext`]; static tiles are only [`Renderable`].

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::{resolve_horizontal, resolve_point_sampled, resolve_vertical};
use super::geometry::{Rect, StaticGeometry, Tile};
use super::sprite::{Animation, Facing, SpriteCatalog, SpriteFrame, SpriteKey};
use crate::settings::{EnemyKind, EnemyProfile, GameConfig};

/// Pixel extent of a level plus its optional right-side safety clamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBounds {
    pub width: i32,
    pub height: i32,
    pub right_limit: Option<i32>,
    pub right_limit_inset: i32,
}

/// Read-only world handed to every actor during a tick
pub struct WorldContext<'a> {
    pub geometry: &'a StaticGeometry,
    pub config: &'a GameConfig,
    pub catalog: &'a SpriteCatalog,
    pub bounds: LevelBounds,
    /// Visible world area (camera offset + screen size)
    pub viewport: Rect,
    /// Simulation time (derived from the tick counter, never the wall clock)
    pub now_ms: u64,
}

/// Something with a world rectangle and a current image
pub trait Renderable {
    fn rect(&self) -> Rect;
    fn sprite(&self) -> SpriteFrame;
}

/// Something advanced once per simulation tick
pub trait Actor: Renderable {
    fn advance(&mut self, ctx: &WorldContext<'_>);

    /// False once the actor has removed itself from the world
    fn is_alive(&self) -> bool {
        true
    }
}

/// Horizontal movement intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Movement {
    #[default]
    None,
    Left,
    Right,
}

/// Player controls for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerIntent {
    pub movement: Movement,
    pub jump: bool,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub vel: IVec2,
    pub health: i32,
    pub max_health: i32,
    /// Set every tick before vertical resolution, cleared on landing
    pub airborne: bool,
    pub facing: Facing,
    pub animation: Animation,
    /// Time of the last applied hit (`None` until the first one)
    pub last_damage_ms: Option<u64>,
    pub intent: PlayerIntent,
}

impl Player {
    pub fn new(spawn_center: IVec2, config: &GameConfig, catalog: &SpriteCatalog, now_ms: u64) -> Self {
        let key = SpriteKey::PlayerIdle(Facing::Right);
        Self {
            rect: Rect::from_center(spawn_center, catalog.size(key)),
            vel: IVec2::ZERO,
            health: config.player_health,
            max_health: config.player_health,
            airborne: false,
            facing: Facing::Right,
            animation: Animation::new(key, now_ms),
            last_damage_ms: None,
            intent: PlayerIntent::default(),
        }
    }

    /// Start a jump if standing on something
    pub fn jump(&mut self, jump_speed: i32) {
        if !self.airborne {
            self.vel.y = jump_speed;
            self.airborne = true;
        }
    }

    /// Apply one hit unless the previous hit is still within the cooldown.
    /// Returns true if health changed.
    pub fn take_damage(&mut self, now_ms: u64, amount: i32, cooldown_ms: u64) -> bool {
        let ready = match self.last_damage_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > cooldown_ms,
        };
        if ready {
            self.health -= amount;
            self.last_damage_ms = Some(now_ms);
        }
        ready
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    fn apply_movement(&mut self, move_speed: i32) {
        match self.intent.movement {
            Movement::Left => {
                self.vel.x = -move_speed;
                self.facing = Facing::Left;
                self.animation.switch(SpriteKey::PlayerRun(Facing::Left));
            }
            Movement::Right => {
                self.vel.x = move_speed;
                self.facing = Facing::Right;
                self.animation.switch(SpriteKey::PlayerRun(Facing::Right));
            }
            Movement::None => {
                self.vel.x = 0;
                self.animation.switch(SpriteKey::PlayerIdle(self.facing));
            }
        }
    }

    /// Keep the player inside the level
    fn constrain(&mut self, bounds: &LevelBounds) {
        if self.rect.right() > bounds.width {
            self.rect.set_right(bounds.width);
        }
        if self.rect.left() < 0 {
            self.rect.set_left(0);
        }
        if self.rect.bottom() > bounds.height {
            self.rect.set_bottom(bounds.height);
        }
        if self.rect.top() < 0 {
            self.rect.set_top(0);
            self.vel.y = 0;
        }
        if let Some(limit) = bounds.right_limit {
            if self.rect.right() > limit {
                self.rect.set_right(limit - bounds.right_limit_inset);
            }
        }
    }
}

impl Renderable for Player {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteFrame {
        self.animation.current()
    }
}

impl Actor for Player {
    fn advance(&mut self, ctx: &WorldContext<'_>) {
        let config = ctx.config;

        if self.intent.jump {
            self.jump(config.jump_speed);
        }
        self.apply_movement(config.move_speed);

        // X axis
        self.rect.x += self.vel.x;
        resolve_horizontal(&mut self.rect, &mut self.vel.x, ctx.geometry);

        // Y axis
        self.vel.y = (self.vel.y + config.gravity).min(config.max_fall_speed);
        self.rect.y += self.vel.y;
        self.airborne = true;
        let contact = resolve_vertical(&mut self.rect, &mut self.vel.y, ctx.geometry);
        if contact.landed {
            self.airborne = false;
        }

        self.animation.update(ctx.catalog, ctx.now_ms);
        self.constrain(&ctx.bounds);
    }
}

/// A patrolling enemy; kinds differ only by their [`EnemyProfile`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub profile: EnemyProfile,
    pub rect: Rect,
    pub vel: IVec2,
    pub direction: Facing,
    /// Patrol bounds in world pixels (fixed at spawn)
    pub left_edge: i32,
    pub right_edge: i32,
    pub animation: Animation,
}

impl Enemy {
    /// Spawn with the bottom-left corner at `start` and patrol from
    /// `start.x` to `end.x + sprite width`
    pub fn spawn(kind: EnemyKind, profile: EnemyProfile, start: IVec2, end: IVec2, now_ms: u64) -> Self {
        let size = profile.sprite.size();
        let mut rect = Rect::new(0, 0, size.x, size.y);
        rect.set_left(start.x);
        rect.set_bottom(start.y);
        Self {
            kind,
            profile,
            rect,
            vel: IVec2::ZERO,
            direction: Facing::Right,
            left_edge: start.x,
            right_edge: end.x + size.x,
            animation: Animation::new(SpriteKey::Enemy(kind), now_ms),
        }
    }

    /// Reverse at the patrol edges and pick this tick's horizontal speed
    fn patrol(&mut self) {
        match self.direction {
            Facing::Right if self.rect.right() >= self.right_edge => self.direction = Facing::Left,
            Facing::Left if self.rect.left() <= self.left_edge => self.direction = Facing::Right,
            _ => {}
        }
        self.vel.x = self.direction.sign() * self.profile.move_speed;
    }
}

impl Renderable for Enemy {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteFrame {
        self.animation.current()
    }
}

impl Actor for Enemy {
    fn advance(&mut self, ctx: &WorldContext<'_>) {
        self.patrol();
        self.rect.x += self.vel.x;

        self.vel.y = (self.vel.y + self.profile.gravity).min(ctx.config.max_fall_speed);
        self.rect.y += self.vel.y;

        resolve_point_sampled(&mut self.rect, &mut self.vel.y, ctx.geometry);
        self.animation.update(ctx.catalog, ctx.now_ms);
    }
}

/// A fired ball travelling horizontally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub rect: Rect,
    pub direction: Facing,
    pub speed: i32,
    alive: bool,
}

impl Projectile {
    /// Spawn next to the player's leading edge, vertically centered on it
    pub fn fire(player: &Player, config: &GameConfig, catalog: &SpriteCatalog) -> Self {
        let size = catalog.size(SpriteKey::Projectile);
        let mut rect = Rect::new(0, 0, size.x, size.y);
        match player.facing {
            Facing::Right => rect.set_left(player.rect.right()),
            Facing::Left => rect.set_left(player.rect.left() - size.x),
        }
        rect.set_center_y(player.rect.center_y());
        Self {
            rect,
            direction: player.facing,
            speed: config.projectile_speed,
            alive: true,
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Renderable for Projectile {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteFrame {
        SpriteFrame {
            key: SpriteKey::Projectile,
            frame: 0,
        }
    }
}

impl Actor for Projectile {
    fn advance(&mut self, ctx: &WorldContext<'_>) {
        self.rect.x += self.direction.sign() * self.speed;
        // Gone once fully outside the viewport horizontally
        if self.rect.right() < ctx.viewport.left() || self.rect.left() > ctx.viewport.right() {
            self.alive = false;
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Animated pickup or exit: a rectangle plus a looping animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animated {
    pub rect: Rect,
    pub animation: Animation,
}

impl Animated {
    pub fn new(rect: Rect, key: SpriteKey, now_ms: u64) -> Self {
        Self {
            rect,
            animation: Animation::new(key, now_ms),
        }
    }
}

impl Renderable for Animated {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteFrame {
        self.animation.current()
    }
}

impl Actor for Animated {
    fn advance(&mut self, ctx: &WorldContext<'_>) {
        self.animation.update(ctx.catalog, ctx.now_ms);
    }
}

/// Collectible coin
pub type Coin = Animated;
/// Level exit
pub type Portal = Animated;

impl Renderable for Tile {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteFrame {
        SpriteFrame {
            key: SpriteKey::Tile(self.gid),
            frame: 0,
        }
    }
}

/// Entity count per group (used to compare reloads)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupCounts {
    pub platforms: usize,
    pub hazards: usize,
    pub enemies: usize,
    pub projectiles: usize,
    pub coins: usize,
    pub portals: usize,
}

/// Everything that exists in one loaded level
#[derive(Debug, Clone)]
pub struct Level {
    pub id: u32,
    pub bounds: LevelBounds,
    pub geometry: StaticGeometry,
    pub hazards: Vec<Tile>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub coins: Vec<Coin>,
    pub portals: Vec<Portal>,
    pub player: Player,
    /// Coins present at load time (portal unlock threshold)
    pub total_coins: u32,
}

impl Level {
    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    /// Run physics and animation for every actor
    pub fn advance_actors(
        &mut self,
        config: &GameConfig,
        catalog: &SpriteCatalog,
        viewport: Rect,
        now_ms: u64,
    ) {
        let ctx = WorldContext {
            geometry: &self.geometry,
            config,
            catalog,
            bounds: self.bounds,
            viewport,
            now_ms,
        };

        self.player.advance(&ctx);
        for enemy in &mut self.enemies {
            enemy.advance(&ctx);
        }
        for coin in &mut self.coins {
            coin.advance(&ctx);
        }
        for portal in &mut self.portals {
            portal.advance(&ctx);
        }
        for projectile in &mut self.projectiles {
            projectile.advance(&ctx);
        }
        self.projectiles.retain(|p| p.is_alive());
    }

    pub fn group_counts(&self) -> GroupCounts {
        GroupCounts {
            platforms: self.geometry.len(),
            hazards: self.hazards.len(),
            enemies: self.enemies.len(),
            projectiles: self.projectiles.len(),
            coins: self.coins.len(),
            portals: self.portals.len(),
        }
    }

    /// Every entity in draw order (back to front)
    pub fn draw_order(&self) -> Vec<&dyn Renderable> {
        let mut all: Vec<&dyn Renderable> = Vec::new();
        all.extend(self.geometry.tiles().iter().map(|t| t as &dyn Renderable));
        all.extend(self.enemies.iter().map(|e| e as &dyn Renderable));
        all.extend(self.coins.iter().map(|c| c as &dyn Renderable));
        all.extend(self.portals.iter().map(|p| p as &dyn Renderable));
        all.extend(self.hazards.iter().map(|h| h as &dyn Renderable));
        all.push(&self.player);
        all.extend(self.projectiles.iter().map(|p| p as &dyn Renderable));
        all
    }
}
