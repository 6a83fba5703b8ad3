//! Enemies that walk the shared path toward the exit.

use std::sync::Arc;

use tower_defense_core::{EnemySnapshot, EnemyStats, Position, Positioned};

/// Damageable actor following the fixed polyline path.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    position: Position,
    health: u32,
    max_health: u32,
    speed: f64,
    reward: u32,
    damage: u32,
    path_index: usize,
    path: Arc<[Position]>,
}

impl Enemy {
    /// Spawns an enemy on the first waypoint of `path`.
    ///
    /// An empty path places the enemy at the origin, where it has already
    /// reached the end.
    #[must_use]
    pub fn new(stats: EnemyStats, path: Arc<[Position]>) -> Self {
        let position = path.first().copied().unwrap_or_default();
        Self {
            position,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            reward: stats.reward,
            damage: stats.damage,
            path_index: 0,
            path,
        }
    }

    /// Subtracts `amount` from health and reports whether the enemy died.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    /// Advances one tick toward the next waypoint.
    ///
    /// An enemy that would overshoot snaps onto the waypoint instead and the
    /// leftover distance is dropped, so at most one waypoint is consumed per tick.
    pub fn move_along_path(&mut self) {
        let Some(target) = self.path.get(self.path_index + 1).copied() else {
            return;
        };

        let distance = self.position.distance(target);
        if distance <= self.speed {
            self.position = target;
            self.path_index += 1;
            return;
        }

        let step = self.speed / distance;
        let x = self.position.x() + (target.x() - self.position.x()) * step;
        let y = self.position.y() + (target.y() - self.position.y()) * step;
        self.position.set(x, y);
    }

    /// Whether the enemy stands on the final waypoint.
    #[must_use]
    pub fn has_reached_end(&self) -> bool {
        self.path_index + 1 >= self.path.len()
    }

    /// Whether the enemy still has health left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Remaining health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Health at spawn.
    #[must_use]
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Distance covered per tick.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Money granted on death.
    #[must_use]
    pub fn reward(&self) -> u32 {
        self.reward
    }

    /// Lives lost when the enemy escapes.
    #[must_use]
    pub fn damage(&self) -> u32 {
        self.damage
    }

    /// Index of the last waypoint reached.
    #[must_use]
    pub fn path_index(&self) -> usize {
        self.path_index
    }

    /// Waypoints the enemy follows.
    #[must_use]
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Immutable copy of the enemy's observable state.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            reward: self.reward,
            damage: self.damage,
            path_index: self.path_index,
        }
    }
}

impl Positioned for Enemy {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}
