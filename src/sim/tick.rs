//! Fixed timestep session tick
//!
//! Owns the mode state machine, the current level, score and camera, and
//! advances them deterministically one tick at a time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::interact::{InteractionReport, resolve_interactions};
use super::sprite::SpriteCatalog;
use super::state::{Level, Movement, PlayerIntent, Projectile};
use super::view::{DrawItem, Hud, camera_offset};
use crate::level::{LevelError, LevelSource};
use crate::settings::GameConfig;

/// Input commands for a single tick (deterministic)
///
/// `fire`, `pause` and `start` are edge-triggered: the caller sets them only
/// on the tick the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held movement direction
    pub movement: Movement,
    /// Jump held
    pub jump: bool,
    /// Fire a projectile
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start from the menu / restart after game over
    pub start: bool,
    /// Leave the game
    pub quit: bool,
}

/// Session modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionMode {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
    /// Every level finished
    Completed,
}

/// What a tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub mode: SessionMode,
    /// Interactions resolved this tick (default when nothing was simulated)
    pub report: InteractionReport,
    /// A level was (re)loaded this tick
    pub level_loaded: Option<u32>,
}

/// A running game: one level at a time plus the mode state machine
pub struct Session {
    config: GameConfig,
    catalog: SpriteCatalog,
    source: Box<dyn LevelSource>,
    pub mode: SessionMode,
    pub level_index: u32,
    /// Coins collected on the current level
    pub score: u32,
    /// World-space top-left of the viewport
    pub camera: Vec2,
    /// Simulated ticks (frozen while paused)
    pub time_ticks: u64,
    pub quit_requested: bool,
    level: Option<Level>,
}

impl Session {
    pub fn new(config: GameConfig, source: Box<dyn LevelSource>) -> Self {
        let catalog = SpriteCatalog::from_config(&config);
        Self::with_catalog(config, catalog, source)
    }

    /// Use a catalog with decoded masks installed
    pub fn with_catalog(config: GameConfig, catalog: SpriteCatalog, source: Box<dyn LevelSource>) -> Self {
        let level_index = config.first_level;
        Self {
            config,
            catalog,
            source,
            mode: SessionMode::Menu,
            level_index,
            score: 0,
            camera: Vec2::ZERO,
            time_ticks: 0,
            quit_requested: false,
            level: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Simulation time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.config.ticks_to_ms(self.time_ticks)
    }

    /// Advance the session by one fixed timestep.
    ///
    /// On a level load failure the session keeps its previous state and the
    /// error is returned.
    pub fn tick(&mut self, input: &TickInput) -> Result<TickOutcome, LevelError> {
        let mut outcome = TickOutcome::default();

        if input.quit {
            if !self.quit_requested {
                log::info!("Quit requested");
                self.quit_requested = true;
            }
            outcome.mode = self.mode;
            return Ok(outcome);
        }

        match self.mode {
            SessionMode::Menu | SessionMode::GameOver => {
                if input.start {
                    self.start_level(self.level_index)?;
                    outcome.level_loaded = Some(self.level_index);
                }
            }
            SessionMode::Completed => {}
            SessionMode::Paused => {
                if input.pause {
                    self.set_mode(SessionMode::Playing);
                }
            }
            SessionMode::Playing => {
                if input.pause {
                    self.set_mode(SessionMode::Paused);
                } else {
                    self.step(input, &mut outcome)?;
                }
            }
        }

        outcome.mode = self.mode;
        Ok(outcome)
    }

    /// One simulated tick while playing
    fn step(&mut self, input: &TickInput, outcome: &mut TickOutcome) -> Result<(), LevelError> {
        let viewport = self.viewport();
        let Some(level) = self.level.as_mut() else {
            log::error!("Playing without a level, returning to menu");
            self.set_mode(SessionMode::Menu);
            return Ok(());
        };

        self.time_ticks += 1;
        let now_ms = self.config.ticks_to_ms(self.time_ticks);

        level.player.intent = PlayerIntent {
            movement: input.movement,
            jump: input.jump,
        };
        if input.fire {
            let projectile = Projectile::fire(&level.player, &self.config, &self.catalog);
            log::debug!("Fired projectile {:?} at {:?}", projectile.direction, projectile.rect);
            level.projectiles.push(projectile);
        }

        level.advance_actors(&self.config, &self.catalog, viewport, now_ms);
        let report = resolve_interactions(level, &mut self.score, &self.config, &self.catalog, now_ms);
        outcome.report = report;

        if level.player.is_dead() {
            log::info!("Player died on level {}", self.level_index);
            self.set_mode(SessionMode::GameOver);
            return Ok(());
        }

        if report.portal_reached {
            self.advance_level(outcome)?;
        }

        self.update_camera();
        Ok(())
    }

    /// Move to the next level, or finish the run after the last one
    fn advance_level(&mut self, outcome: &mut TickOutcome) -> Result<(), LevelError> {
        let next = self.level_index + 1;
        if next >= self.config.final_level {
            log::info!("Level {} cleared, run complete", self.level_index);
            self.level_index = next;
            self.set_mode(SessionMode::Completed);
            return Ok(());
        }
        log::info!("Level {} cleared, advancing to {}", self.level_index, next);
        self.start_level(next)?;
        outcome.level_loaded = Some(next);
        Ok(())
    }

    /// Load a fresh level and enter `Playing`; nothing carries over
    fn start_level(&mut self, level_id: u32) -> Result<(), LevelError> {
        let level = self.source.load(level_id).map_err(|e| {
            log::error!("Failed to load level {}: {}", level_id, e);
            e
        })?;
        self.level = Some(level);
        self.level_index = level_id;
        self.score = 0;
        self.camera = Vec2::ZERO;
        self.set_mode(SessionMode::Playing);
        self.update_camera();
        Ok(())
    }

    fn set_mode(&mut self, mode: SessionMode) {
        if self.mode != mode {
            log::info!("Mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Ease the camera toward the player and keep it inside the level
    fn update_camera(&mut self) {
        let Some(level) = &self.level else {
            return;
        };
        let (screen_w, screen_h) = (self.config.screen_width, self.config.screen_height);
        let center = level.player.rect.center();
        let target = Vec2::new(
            (center.x - screen_w / 2) as f32,
            (center.y - screen_h / 2) as f32,
        );
        self.camera += (target - self.camera) * self.config.camera_lerp;

        // Lower bound wins when the level is smaller than the screen
        let max_x = (level.width() - screen_w) as f32;
        let max_y = (level.height() - screen_h) as f32;
        self.camera.x = self.camera.x.min(max_x).max(0.0);
        self.camera.y = self.camera.y.min(max_y).max(0.0);
    }

    /// World area currently on screen
    pub fn viewport(&self) -> Rect {
        let offset = camera_offset(self.camera);
        Rect::new(
            offset.x,
            offset.y,
            self.config.screen_width,
            self.config.screen_height,
        )
    }

    /// Sprites to draw this frame, back to front, in screen space
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let Some(level) = &self.level else {
            return Vec::new();
        };
        let camera = camera_offset(self.camera);
        level
            .draw_order()
            .into_iter()
            .map(|item| DrawItem::from_renderable(item, camera))
            .collect()
    }

    pub fn hud(&self) -> Hud {
        let (health, max_health, total_coins) = match &self.level {
            Some(level) => (level.player.health, level.player.max_health, level.total_coins),
            None => (self.config.player_health, self.config.player_health, 0),
        };
        Hud {
            health,
            max_health,
            score: self.score,
            total_coins,
            level: self.level_index,
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::sim::geometry::{Rect, StaticGeometry, Tile};
    use crate::sim::sprite::SpriteKey;
    use crate::sim::state::{Animated, LevelBounds, Player};

    /// Flat floor at y = 900 across a 4000px level; optional portal on the spawn
    fn test_level(level_id: u32, portal_on_spawn: bool) -> Level {
        let config = GameConfig::default();
        let catalog = SpriteCatalog::from_config(&config);
        let floor = (0..125)
            .map(|i| Tile {
                rect: Rect::new(i * 32, 900, 32, 32),
                gid: 1,
            })
            .collect();
        let player = Player::new(IVec2::new(200, 836), &config, &catalog, 0);
        let mut portals = Vec::new();
        if portal_on_spawn {
            portals.push(Animated::new(Rect::new(100, 700, 256, 256), SpriteKey::Portal, 0));
        }
        Level {
            id: level_id,
            bounds: LevelBounds {
                width: 4000,
                height: 2000,
                right_limit: None,
                right_limit_inset: 0,
            },
            geometry: StaticGeometry::new(floor),
            hazards: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            coins: Vec::new(),
            portals,
            player,
            total_coins: 0,
        }
    }

    fn session(portal_on_spawn: bool) -> Session {
        let source = move |id: u32| -> Result<Level, LevelError> { Ok(test_level(id, portal_on_spawn)) };
        Session::new(GameConfig::default(), Box::new(source))
    }

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_menu_to_playing() {
        let mut session = session(false);
        assert_eq!(session.mode, SessionMode::Menu);

        // Tick without start - should stay in Menu
        session.tick(&TickInput::default()).unwrap();
        assert_eq!(session.mode, SessionMode::Menu);
        assert_eq!(session.time_ticks, 0);

        let outcome = session.tick(&start()).unwrap();
        assert_eq!(outcome.mode, SessionMode::Playing);
        assert_eq!(outcome.level_loaded, Some(1));
        assert!(session.level().is_some());
    }

    #[test]
    fn test_tick_pause() {
        let mut session = session(false);
        session.tick(&start()).unwrap();
        session.tick(&TickInput::default()).unwrap();
        let ticks = session.time_ticks;
        let rect = session.level().unwrap().player.rect;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        session.tick(&pause).unwrap();
        assert_eq!(session.mode, SessionMode::Paused);

        // Paused: neither physics nor the clock advance
        let right = TickInput {
            movement: Movement::Right,
            ..Default::default()
        };
        for _ in 0..10 {
            session.tick(&right).unwrap();
        }
        assert_eq!(session.time_ticks, ticks);
        assert_eq!(session.level().unwrap().player.rect, rect);

        // Unpause
        session.tick(&pause).unwrap();
        assert_eq!(session.mode, SessionMode::Playing);
        session.tick(&right).unwrap();
        assert_eq!(session.time_ticks, ticks + 1);
        assert!(session.level().unwrap().player.rect.x > rect.x);
    }

    #[test]
    fn test_fire_spawns_projectile() {
        let mut session = session(false);
        // Fire is ignored in the menu
        session
            .tick(&TickInput {
                fire: true,
                ..Default::default()
            })
            .unwrap();
        assert!(session.level().is_none());

        session.tick(&start()).unwrap();
        session
            .tick(&TickInput {
                fire: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(session.level().unwrap().projectiles.len(), 1);
    }

    #[test]
    fn test_death_then_restart_reloads_level() {
        let mut session = session(false);
        session.tick(&start()).unwrap();
        session.level.as_mut().unwrap().player.health = 0;

        let outcome = session.tick(&TickInput::default()).unwrap();
        assert_eq!(outcome.mode, SessionMode::GameOver);

        // Game over ignores gameplay input
        session
            .tick(&TickInput {
                movement: Movement::Left,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(session.mode, SessionMode::GameOver);

        let outcome = session.tick(&start()).unwrap();
        assert_eq!(outcome.mode, SessionMode::Playing);
        assert_eq!(outcome.level_loaded, Some(1));
        assert_eq!(session.hud().health, 10);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_portal_advances_then_completes() {
        // Zero coins: any score above 0 / 2 unlocks the portal
        let mut session = session(true);
        session.tick(&start()).unwrap();
        session.score = 1;

        let outcome = session.tick(&TickInput::default()).unwrap();
        assert_eq!(outcome.level_loaded, Some(2));
        assert_eq!(session.level_index, 2);
        assert_eq!(session.score, 0);

        session.score = 1;
        session.tick(&TickInput::default()).unwrap();
        assert_eq!(session.level_index, 3);

        session.score = 1;
        let outcome = session.tick(&TickInput::default()).unwrap();
        assert_eq!(outcome.mode, SessionMode::Completed);
        assert_eq!(session.level_index, 4);

        // The finished run is terminal
        let outcome = session.tick(&start()).unwrap();
        assert_eq!(outcome.mode, SessionMode::Completed);
        assert_eq!(outcome.level_loaded, None);
        assert_eq!(session.level_index, 4);
    }

    #[test]
    fn test_fire_with_scrolled_camera() {
        let mut session = session(false);
        session.tick(&start()).unwrap();
        session.level.as_mut().unwrap().player.rect.set_center(IVec2::new(3000, 836));
        for _ in 0..200 {
            session.tick(&TickInput::default()).unwrap();
        }
        assert!(session.viewport().left() > 2000);

        session
            .tick(&TickInput {
                fire: true,
                ..Default::default()
            })
            .unwrap();
        let level = session.level().unwrap();
        assert_eq!(level.projectiles.len(), 1);
        assert!(level.projectiles[0].rect.left() > 3000);
    }

    #[test]
    fn test_load_failure_keeps_state() {
        let source = |id: u32| -> Result<Level, LevelError> {
            Err(LevelError::AssetMissing {
                path: format!("maps/level{id}.tmj"),
            })
        };
        let mut session = Session::new(GameConfig::default(), Box::new(source));
        let err = session.tick(&start()).unwrap_err();
        assert!(matches!(err, LevelError::AssetMissing { .. }));
        assert_eq!(session.mode, SessionMode::Menu);
        assert!(session.level().is_none());
    }

    #[test]
    fn test_quit_from_any_mode() {
        let quit = TickInput {
            quit: true,
            movement: Movement::Right,
            ..Default::default()
        };
        let mut in_menu = session(false);
        in_menu.tick(&quit).unwrap();
        assert!(in_menu.quit_requested);
        assert_eq!(in_menu.mode, SessionMode::Menu);

        // Quitting mid-level stops the tick before any simulation
        let mut playing = session(false);
        playing.tick(&start()).unwrap();
        playing.tick(&quit).unwrap();
        assert!(playing.quit_requested);
        assert_eq!(playing.time_ticks, 0);
    }

    #[test]
    fn test_camera_eases_and_clamps() {
        let mut session = session(false);
        session.tick(&start()).unwrap();
        // Player near the left edge: target x is negative, clamp holds 0
        assert_eq!(session.camera.x, 0.0);

        session.level.as_mut().unwrap().player.rect.set_center(IVec2::new(3800, 836));
        session.tick(&TickInput::default()).unwrap();
        let first = session.camera.x;
        assert!(first > 0.0);
        for _ in 0..200 {
            session.tick(&TickInput::default()).unwrap();
        }
        // Converges to the right clamp (level 4000 wide, screen 1680)
        assert!(session.camera.x > first);
        assert!(session.camera.x <= (4000 - 1680) as f32);
        assert!((session.camera.x - (4000 - 1680) as f32).abs() < 1.0);
    }

    #[test]
    fn test_draw_list_covers_every_entity() {
        let mut session = session(true);
        assert!(session.draw_list().is_empty());
        session.tick(&start()).unwrap();
        let items = session.draw_list();
        // 125 floor tiles + portal + player
        assert_eq!(items.len(), 127);
        let player = items
            .iter()
            .find(|i| matches!(i.sprite.key, SpriteKey::PlayerIdle(_)))
            .unwrap();
        let world = session.level().unwrap().player.rect;
        assert_eq!(player.screen_rect, world.offset(-camera_offset(session.camera)));
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            start(),
            TickInput {
                movement: Movement::Right,
                jump: true,
                ..Default::default()
            },
            TickInput {
                movement: Movement::Right,
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                movement: Movement::Left,
                ..Default::default()
            },
        ];

        let mut a = session(false);
        let mut b = session(false);
        for input in inputs.iter().cycle().take(200) {
            a.tick(input).unwrap();
            b.tick(input).unwrap();
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.camera, b.camera);
        assert_eq!(a.draw_list(), b.draw_list());
        assert_eq!(a.hud(), b.hud());
    }
}
