use dodgecoin_common::{Aabb, NodeId};
use glam::Vec2;
use rand::Rng;

use crate::config::CoinConfig;

/// A coin: waits in place, then flies in a random direction and bounces off
/// walls. Only a moving coin is dangerous.
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    id: NodeId,
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    stationary_left: f32,
}

impl Coin {
    pub fn spawn(position: Vec2, config: &CoinConfig) -> Self {
        Self {
            id: NodeId::new(),
            position,
            size: config.extent(),
            velocity: Vec2::ZERO,
            stationary_left: config.stationary_secs,
        }
    }

    /// Spawn a coin at a random point inside `room`, `margin` away from its edges.
    pub fn spawn_in<R: Rng>(room: Aabb, config: &CoinConfig, rng: &mut R) -> Self {
        let lo = room.min + Vec2::splat(config.spawn_margin);
        let hi = room.max - Vec2::splat(config.spawn_margin);
        let position = Vec2::new(rng.gen_range(lo.x..hi.x), rng.gen_range(lo.y..hi.y));
        Self::spawn(position, config)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != Vec2::ZERO
    }

    /// Advance the coin by `dt` seconds.
    pub fn update<R: Rng>(&mut self, dt: f32, speed: f32, walls: &[Aabb], rng: &mut R) {
        if !self.is_moving() {
            self.stationary_left -= dt;
            if self.stationary_left <= 0.0 {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                self.velocity = Vec2::from_angle(angle) * speed;
                tracing::trace!(coin = %self.id.short(), "coin released");
            }
            return;
        }

        let delta = self.velocity * dt;
        let moved = self.position + Vec2::new(delta.x, 0.0);
        if self.blocked_at(moved, walls) {
            self.velocity.x = -self.velocity.x;
        } else {
            self.position = moved;
        }
        let moved = self.position + Vec2::new(0.0, delta.y);
        if self.blocked_at(moved, walls) {
            self.velocity.y = -self.velocity.y;
        } else {
            self.position = moved;
        }
    }

    pub fn touches(&self, body: &Aabb) -> bool {
        self.bounds().overlaps(body)
    }

    fn blocked_at(&self, position: Vec2, walls: &[Aabb]) -> bool {
        let body = Aabb::from_center_size(position, self.size);
        walls.iter().any(|wall| wall.overlaps(&body))
    }
}
