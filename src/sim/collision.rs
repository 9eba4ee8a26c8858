//! Collision detection and resolution
//!
//! Bullets, meteors and the kraken are circles. The player is tested as an
//! axis-aligned box against meteor circles, which gives a more forgiving
//! hitbox than the ship's silhouette.
//!
//! Resolution removes entities from the engine's collections and reports
//! what was hit; scoring and effects are the engine's job.

use glam::Vec2;

use super::entities::{Bullet, Kraken, Meteor, Player};
use crate::consts::KRAKEN_HITBOX_SCALE;

/// Circle-circle overlap (touching counts)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let combined = a_radius + b_radius;
    a.distance_squared(b) <= combined * combined
}

/// Does the bullet hit the kraken's (shrunken) hitbox?
pub fn bullet_hits_kraken(bullet: &Bullet, kraken: &Kraken) -> bool {
    circles_overlap(
        kraken.pos,
        kraken.radius * KRAKEN_HITBOX_SCALE,
        bullet.pos,
        bullet.radius,
    )
}

pub fn bullet_hits_meteor(bullet: &Bullet, meteor: &Meteor) -> bool {
    circles_overlap(meteor.pos, meteor.radius, bullet.pos, bullet.radius)
}

/// Box test: horizontal extents overlap and the meteor's bottom has reached
/// the ship's top edge
pub fn meteor_hits_player(meteor: &Meteor, player: &Player) -> bool {
    let overlap_x = (meteor.pos.x - player.pos.x).abs() <= meteor.radius + player.half_width();
    let overlap_y = meteor.pos.y + meteor.radius >= player.top();
    overlap_x && overlap_y
}

/// Something a bullet destroyed this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BulletHit {
    Kraken { pos: Vec2, radius: f32 },
    Meteor { pos: Vec2, radius: f32 },
}

/// Resolve all bullet hits for this tick.
///
/// Bullets are scanned newest first. Each bullet checks the kraken before any
/// meteor, so a bullet overlapping both only ever kills the kraken. Meteors
/// are scanned newest first and the first overlap wins. Hits are returned in
/// resolution order.
pub fn resolve_bullet_hits(
    bullets: &mut Vec<Bullet>,
    meteors: &mut Vec<Meteor>,
    kraken: &mut Option<Kraken>,
) -> Vec<BulletHit> {
    let mut hits = Vec::new();

    let mut bullet_index = bullets.len();
    while bullet_index > 0 {
        bullet_index -= 1;
        let bullet = &bullets[bullet_index];

        let kraken_hit = kraken
            .as_ref()
            .is_some_and(|k| bullet_hits_kraken(bullet, k));
        if kraken_hit {
            if let Some(k) = kraken.take() {
                hits.push(BulletHit::Kraken {
                    pos: k.pos,
                    radius: k.radius,
                });
            }
            bullets.remove(bullet_index);
            continue;
        }

        let target = meteors
            .iter()
            .rposition(|meteor| bullet_hits_meteor(bullet, meteor));
        if let Some(meteor_index) = target {
            let meteor = meteors.remove(meteor_index);
            hits.push(BulletHit::Meteor {
                pos: meteor.pos,
                radius: meteor.radius,
            });
            bullets.remove(bullet_index);
        }
    }

    hits
}

/// Index of the first meteor (in insertion order) touching the player
pub fn first_player_hit(player: &Player, meteors: &[Meteor]) -> Option<usize> {
    meteors.iter().position(|m| meteor_hits_player(m, player))
}

/// One tick of an expanding shockwave ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockwavePulse {
    pub center: Vec2,
    pub radius: f32,
    /// 0..=1 through the wave's lifetime
    pub progress: f32,
}

/// Destroy small meteors inside the ring and shove the rest outward.
///
/// `push_speed` is the full-strength push in pixels per second; it fades
/// linearly with progress. Returns `(position, radius)` of every destroyed
/// meteor, newest first.
pub fn apply_shockwave(
    meteors: &mut Vec<Meteor>,
    pulse: &ShockwavePulse,
    destroy_threshold: f32,
    push_speed: f32,
    dt: f32,
) -> Vec<(Vec2, f32)> {
    let mut destroyed = Vec::new();
    let push = push_speed * (1.0 - pulse.progress);
    let reach_sq = pulse.radius * pulse.radius;

    let mut i = meteors.len();
    while i > 0 {
        i -= 1;
        let offset = meteors[i].pos - pulse.center;
        let dist_sq = offset.length_squared();
        if dist_sq > reach_sq {
            continue;
        }

        if meteors[i].radius <= destroy_threshold {
            let meteor = meteors.remove(i);
            destroyed.push((meteor.pos, meteor.radius));
        } else {
            let dist = dist_sq.sqrt().max(1.0);
            meteors[i].pos += offset / dist * push * dt;
        }
    }

    destroyed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meteor(x: f32, y: f32, radius: f32) -> Meteor {
        Meteor::new(Vec2::new(x, y), radius, 0.0, 0)
    }

    fn bullet(x: f32, y: f32) -> Bullet {
        Bullet::new(Vec2::new(x, y), 5.0, 0.0)
    }

    #[test]
    fn test_bullet_meteor_exact_hit() {
        // distance² = 64 <= 15² = 225
        let mut bullets = vec![bullet(100.0, 100.0)];
        let mut meteors = vec![meteor(100.0, 108.0, 10.0)];
        let mut kraken = None;

        let hits = resolve_bullet_hits(&mut bullets, &mut meteors, &mut kraken);
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0], BulletHit::Meteor { radius, .. } if radius == 10.0));
        assert!(bullets.is_empty());
        assert!(meteors.is_empty());
    }

    #[test]
    fn test_touching_circles_collide() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(15.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(15.1, 0.0), 10.0));
    }

    #[test]
    fn test_kraken_wins_over_meteor() {
        let mut bullets = vec![bullet(100.0, 100.0)];
        let mut meteors = vec![meteor(100.0, 100.0, 10.0)];
        let mut kraken = Some(Kraken::new(Vec2::new(100.0, 100.0), 20.0, 10.0, 1.0));

        let hits = resolve_bullet_hits(&mut bullets, &mut meteors, &mut kraken);
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0], BulletHit::Kraken { .. }));
        assert!(kraken.is_none());
        assert_eq!(meteors.len(), 1);
    }

    #[test]
    fn test_kraken_hitbox_is_tighter() {
        // 20 * 0.8 + 5 = 21 < 23
        let kraken = Kraken::new(Vec2::new(0.0, 0.0), 20.0, 10.0, 1.0);
        assert!(!bullet_hits_kraken(&bullet(23.0, 0.0), &kraken));
        assert!(bullet_hits_kraken(&bullet(21.0, 0.0), &kraken));
    }

    #[test]
    fn test_newest_meteor_taken_first() {
        let mut bullets = vec![bullet(100.0, 100.0)];
        let mut meteors = vec![meteor(100.0, 105.0, 10.0), meteor(100.0, 95.0, 10.0)];
        let mut kraken = None;

        resolve_bullet_hits(&mut bullets, &mut meteors, &mut kraken);
        assert_eq!(meteors.len(), 1);
        assert_eq!(meteors[0].pos.y, 105.0);
    }

    #[test]
    fn test_each_bullet_kills_at_most_one() {
        let mut bullets = vec![bullet(100.0, 100.0), bullet(300.0, 300.0)];
        let mut meteors = vec![meteor(100.0, 100.0, 10.0), meteor(100.0, 101.0, 10.0)];
        let mut kraken = None;

        let hits = resolve_bullet_hits(&mut bullets, &mut meteors, &mut kraken);
        assert_eq!(hits.len(), 1);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pos.x, 300.0);
        assert_eq!(meteors.len(), 1);
    }

    #[test]
    fn test_player_box_test() {
        let player = Player::new(Vec2::new(400.0, 800.0), 48.0, 48.0);
        // player at (200, 728), top at 704, half width 24
        assert!(meteor_hits_player(&meteor(200.0 + 34.0, 694.0, 10.0), &player));
        assert!(!meteor_hits_player(&meteor(200.0 + 34.5, 694.0, 10.0), &player));
        assert!(!meteor_hits_player(&meteor(200.0, 693.0, 10.0), &player));
        // A meteor below the ship still counts; only the top edge is tested
        assert!(meteor_hits_player(&meteor(200.0, 790.0, 10.0), &player));
    }

    #[test]
    fn test_first_player_hit_in_insertion_order() {
        let player = Player::new(Vec2::new(400.0, 800.0), 48.0, 48.0);
        let meteors = vec![
            meteor(50.0, 100.0, 10.0),
            meteor(200.0, 720.0, 10.0),
            meteor(210.0, 720.0, 10.0),
        ];
        assert_eq!(first_player_hit(&player, &meteors), Some(1));
    }

    #[test]
    fn test_shockwave_destroys_small_pushes_large() {
        let mut meteors = vec![meteor(100.0, 0.0, 5.0), meteor(0.0, 100.0, 30.0), meteor(500.0, 0.0, 5.0)];
        let pulse = ShockwavePulse {
            center: Vec2::ZERO,
            radius: 200.0,
            progress: 0.5,
        };

        let destroyed = apply_shockwave(&mut meteors, &pulse, 10.0, 100.0, 0.1);
        assert_eq!(destroyed, vec![(Vec2::new(100.0, 0.0), 5.0)]);
        assert_eq!(meteors.len(), 2);
        // 100 * 0.5 * 0.1 = 5 px straight down (away from center)
        assert!((meteors[0].pos.y - 105.0).abs() < 1e-4);
        assert_eq!(meteors[1].pos, Vec2::new(500.0, 0.0));
    }

    #[test]
    fn test_shockwave_push_at_center_is_finite() {
        let mut meteors = vec![meteor(0.0, 0.0, 30.0)];
        let pulse = ShockwavePulse {
            center: Vec2::ZERO,
            radius: 50.0,
            progress: 0.0,
        };
        apply_shockwave(&mut meteors, &pulse, 10.0, 100.0, 0.1);
        assert!(meteors[0].pos.is_finite());
    }
}
