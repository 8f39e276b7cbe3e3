//! Cross-group interaction rules
//!
//! Runs once per tick after all actors have moved. Each group pair is
//! compared against a snapshot of that pair's membership taken before any
//! removal, so removals never change the outcome of other comparisons in
//! the same pass.

use super::sprite::SpriteCatalog;
use super::state::{Level, Renderable};
use crate::settings::GameConfig;

/// What happened during one interaction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionReport {
    /// Player health actually went down
    pub damage_taken: bool,
    pub enemies_destroyed: u32,
    pub projectiles_consumed: u32,
    pub coins_collected: u32,
    /// Player touched the portal with enough coins
    pub portal_reached: bool,
}

/// Apply every interaction rule to `level`, adding collected coins to `score`
pub fn resolve_interactions(
    level: &mut Level,
    score: &mut u32,
    config: &GameConfig,
    catalog: &SpriteCatalog,
    now_ms: u64,
) -> InteractionReport {
    let mut report = InteractionReport::default();

    // Player vs enemies and hazards: mask contact, damage is rate limited
    let player_rect = level.player.rect();
    let player_frame = level.player.sprite();
    let touching_enemy = level
        .enemies
        .iter()
        .any(|e| catalog.sprites_collide(&player_rect, player_frame, &e.rect(), e.sprite()));
    let touching_hazard = level
        .hazards
        .iter()
        .any(|h| catalog.sprites_collide(&player_rect, player_frame, &h.rect(), h.sprite()));
    for touching in [touching_enemy, touching_hazard] {
        if touching
            && level
                .player
                .take_damage(now_ms, config.damage_per_hit, config.damage_cooldown_ms)
        {
            report.damage_taken = true;
            log::debug!("Player hit, health now {}", level.player.health);
        }
    }

    // Projectiles vs enemies: each projectile takes the first enemy it overlaps
    let mut dead_projectiles = vec![false; level.projectiles.len()];
    let mut dead_enemies = vec![false; level.enemies.len()];
    for (pi, projectile) in level.projectiles.iter().enumerate() {
        if let Some(ei) = level
            .enemies
            .iter()
            .position(|e| e.rect.overlaps(&projectile.rect))
        {
            dead_projectiles[pi] = true;
            dead_enemies[ei] = true;
        }
    }
    report.enemies_destroyed = dead_enemies.iter().filter(|&&d| d).count() as u32;
    report.projectiles_consumed = dead_projectiles.iter().filter(|&&d| d).count() as u32;
    retain_marked(&mut level.enemies, &dead_enemies);
    retain_marked(&mut level.projectiles, &dead_projectiles);

    // Projectiles vs platforms: platforms are permanent
    let geometry = &level.geometry;
    let before = level.projectiles.len();
    level.projectiles.retain(|p| !geometry.any_overlap(&p.rect));
    report.projectiles_consumed += (before - level.projectiles.len()) as u32;

    // Player vs coins: bounding box, every overlapped coin counts
    let before = level.coins.len();
    level.coins.retain(|c| !c.rect.overlaps(&player_rect));
    report.coins_collected = (before - level.coins.len()) as u32;
    if report.coins_collected > 0 {
        *score += report.coins_collected;
        log::debug!("Collected {} coin(s), score {}", report.coins_collected, score);
    }

    // Player vs portal: unlocked once more than half the coins are collected
    let touching_portal = level
        .portals
        .iter()
        .any(|p| catalog.sprites_collide(&player_rect, player_frame, &p.rect(), p.sprite()));
    report.portal_reached = touching_portal && portal_unlocked(*score, level.total_coins);

    report
}

/// Strictly more than half (integer division) of the level's coins
pub fn portal_unlocked(score: u32, total_coins: u32) -> bool {
    score > total_coins / 2
}

fn retain_marked<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut idx = 0;
    items.retain(|_| {
        let keep = !dead[idx];
        idx += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::settings::EnemyKind;
    use crate::sim::geometry::{Rect, StaticGeometry, Tile};
    use crate::sim::sprite::{Facing, SpriteKey};
    use crate::sim::state::{Animated, Enemy, LevelBounds, Player, Projectile};

    fn setup() -> (GameConfig, SpriteCatalog, Level) {
        let config = GameConfig::default();
        let catalog = SpriteCatalog::from_config(&config);
        let player = Player::new(IVec2::new(500, 500), &config, &catalog, 0);
        let level = Level {
            id: 1,
            bounds: LevelBounds {
                width: 4000,
                height: 2000,
                right_limit: None,
                right_limit_inset: 0,
            },
            geometry: StaticGeometry::new(vec![Tile {
                rect: Rect::new(2000, 0, 32, 2000),
                gid: 1,
            }]),
            hazards: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            coins: Vec::new(),
            portals: Vec::new(),
            player,
            total_coins: 10,
        };
        (config, catalog, level)
    }

    fn crab_at(config: &GameConfig, left: i32, bottom: i32) -> Enemy {
        let profile = config.enemy_profile(EnemyKind::Crab);
        Enemy::spawn(
            EnemyKind::Crab,
            profile,
            IVec2::new(left, bottom),
            IVec2::new(left + 200, bottom),
            0,
        )
    }

    fn ball_at(config: &GameConfig, catalog: &SpriteCatalog, player: &Player, x: i32) -> Projectile {
        let mut ball = Projectile::fire(player, config, catalog);
        ball.rect.set_left(x);
        ball
    }

    #[test]
    fn test_projectile_destroys_one_enemy() {
        let (config, catalog, mut level) = setup();
        // Two enemies stacked on the same spot, one projectile
        level.enemies.push(crab_at(&config, 1000, 600));
        level.enemies.push(crab_at(&config, 1000, 600));
        let ball = ball_at(&config, &catalog, &level.player, 1010);
        level.projectiles.push(ball);

        let mut score = 0;
        let report = resolve_interactions(&mut level, &mut score, &config, &catalog, 0);
        assert_eq!(report.enemies_destroyed, 1);
        assert_eq!(level.enemies.len(), 1);
        assert!(level.projectiles.is_empty());
    }

    #[test]
    fn test_two_projectiles_same_enemy_both_consumed() {
        let (config, catalog, mut level) = setup();
        level.enemies.push(crab_at(&config, 1000, 600));
        let a = ball_at(&config, &catalog, &level.player, 1010);
        let b = ball_at(&config, &catalog, &level.player, 1050);
        level.projectiles.push(a);
        level.projectiles.push(b);

        let mut score = 0;
        let report = resolve_interactions(&mut level, &mut score, &config, &catalog, 0);
        assert_eq!(report.enemies_destroyed, 1);
        assert_eq!(report.projectiles_consumed, 2);
        assert!(level.enemies.is_empty());
        assert!(level.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_vs_platform() {
        let (config, catalog, mut level) = setup();
        let ball = ball_at(&config, &catalog, &level.player, 1990);
        level.projectiles.push(ball);
        let mut score = 0;
        resolve_interactions(&mut level, &mut score, &config, &catalog, 0);
        assert!(level.projectiles.is_empty());
        assert_eq!(level.geometry.len(), 1);
    }

    #[test]
    fn test_enemy_contact_damages_without_removal() {
        let (config, catalog, mut level) = setup();
        let player_rect = level.player.rect;
        level.enemies.push(crab_at(&config, player_rect.left() + 10, player_rect.bottom()));

        let mut score = 0;
        let report = resolve_interactions(&mut level, &mut score, &config, &catalog, 0);
        assert!(report.damage_taken);
        assert_eq!(level.player.health, 7);
        assert_eq!(level.enemies.len(), 1);

        // Still touching 500ms later: cooldown holds
        let report = resolve_interactions(&mut level, &mut score, &config, &catalog, 500);
        assert!(!report.damage_taken);
        assert_eq!(level.player.health, 7);
    }

    #[test]
    fn test_hazard_contact_damages() {
        let (config, catalog, mut level) = setup();
        let center = level.player.rect.center();
        level.hazards.push(Tile {
            rect: Rect::new(center.x, center.y, 32, 32),
            gid: 9,
        });
        let mut score = 0;
        let report = resolve_interactions(&mut level, &mut score, &config, &catalog, 0);
        assert!(report.damage_taken);
        assert_eq!(level.hazards.len(), 1);
    }

    #[test]
    fn test_simultaneous_coins_all_counted() {
        let (config, catalog, mut level) = setup();
        let r = level.player.rect;
        for dx in [0, 40, 80] {
            let coin = Rect::new(r.left() + dx, r.top(), 64, 64);
            level.coins.push(Animated::new(coin, SpriteKey::Coin, 0));
        }
        level.coins.push(Animated::new(Rect::new(3000, 0, 64, 64), SpriteKey::Coin, 0));

        let mut score = 2;
        let report = resolve_interactions(&mut level, &mut score, &config, &catalog, 0);
        assert_eq!(report.coins_collected, 3);
        assert_eq!(score, 5);
        assert_eq!(level.coins.len(), 1);
    }

    #[test]
    fn test_portal_threshold() {
        let (config, catalog, mut level) = setup();
        let r = level.player.rect;
        level
            .portals
            .push(Animated::new(Rect::new(r.left(), r.top(), 256, 256), SpriteKey::Portal, 0));

        let mut score = 5;
        let report = resolve_interactions(&mut level, &mut score, &config, &catalog, 0);
        assert!(!report.portal_reached);
        assert_eq!(level.portals.len(), 1);

        let mut score = 6;
        let report = resolve_interactions(&mut level, &mut score, &config, &catalog, 0);
        assert!(report.portal_reached);
        assert_eq!(level.portals.len(), 1);
    }

    #[test]
    fn test_portal_unlocked_integer_division() {
        assert!(!portal_unlocked(5, 10));
        assert!(portal_unlocked(6, 10));
        assert!(!portal_unlocked(5, 11));
        assert!(portal_unlocked(6, 11));
        assert!(portal_unlocked(1, 0));
        assert!(!portal_unlocked(0, 0));
    }

    #[test]
    fn test_facing_left_fire_position() {
        let (config, catalog, mut level) = setup();
        level.player.facing = Facing::Left;
        let ball = Projectile::fire(&level.player, &config, &catalog);
        assert_eq!(ball.rect.right(), level.player.rect.left());
        assert_eq!(ball.direction, Facing::Left);
    }
}
