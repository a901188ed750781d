use dodgecoin_common::Aabb;
use glam::Vec2;

use crate::config::PlayerConfig;

/// The player-controlled body.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    position: Vec2,
    size: Vec2,
    speed: f32,
}

impl Player {
    /// Spawn a player centered on `position`.
    pub fn spawn(position: Vec2, config: &PlayerConfig) -> Self {
        Self {
            position,
            size: config.extent(),
            speed: config.speed,
        }
    }

    /// Center of the body.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    /// Move along `direction` for `dt` seconds.
    ///
    /// The X and Y components are applied one after the other, each rejected
    /// on its own if it would overlap a wall, so the body slides along walls
    /// instead of sticking to them.
    pub fn step(&mut self, direction: Vec2, dt: f32, walls: &[Aabb]) {
        if direction == Vec2::ZERO || dt <= 0.0 {
            return;
        }
        let delta = direction.normalize() * self.speed * dt;

        if delta.x != 0.0 {
            let moved = self.position + Vec2::new(delta.x, 0.0);
            if !self.blocked_at(moved, walls) {
                self.position = moved;
            }
        }
        if delta.y != 0.0 {
            let moved = self.position + Vec2::new(0.0, delta.y);
            if !self.blocked_at(moved, walls) {
                self.position = moved;
            }
        }
    }

    fn blocked_at(&self, position: Vec2, walls: &[Aabb]) -> bool {
        let body = Aabb::from_center_size(position, self.size);
        walls.iter().any(|wall| wall.overlaps(&body))
    }
}
