//! Stationary towers, their upgrade ladder and targeting rules.

use std::time::Duration;

use tower_defense_core::{
    GameError, Position, Positioned, TowerKind, TowerSnapshot, MAX_TOWER_LEVEL,
};

use crate::Enemy;

const UPGRADE_DAMAGE_BONUS: u32 = 5;
const UPGRADE_RANGE_BONUS: f64 = 20.0;
const UPGRADE_COOLDOWN_FACTOR: f64 = 0.9;

/// Outcome of a tower firing during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shot {
    /// Index of the primary target within the enemy slice.
    pub target: usize,
    /// Damage dealt to the primary target.
    pub damage: u32,
    /// Number of other enemies caught by splash damage.
    pub splashed: usize,
}

/// Tower placed on the playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    position: Position,
    kind: TowerKind,
    range: f64,
    damage: u32,
    fire_interval: Duration,
    last_fired: Option<Duration>,
    level: u8,
    cost: u32,
}

impl Tower {
    /// Builds a level one tower of `kind` at `position`.
    #[must_use]
    pub fn new(kind: TowerKind, position: Position) -> Self {
        let stats = kind.base_stats();
        Self {
            position,
            kind,
            range: stats.range,
            damage: stats.damage,
            fire_interval: stats.fire_interval,
            last_fired: None,
            level: 1,
            cost: stats.cost,
        }
    }

    /// Whether the cooldown has elapsed at simulation time `now`.
    #[must_use]
    pub fn can_fire(&self, now: Duration) -> bool {
        match self.last_fired {
            None => true,
            Some(fired_at) => now.saturating_sub(fired_at) >= self.fire_interval,
        }
    }

    /// Starts the cooldown at simulation time `now`.
    pub fn fire(&mut self, now: Duration) {
        self.last_fired = Some(now);
    }

    /// Raises the tower one level.
    ///
    /// Each level adds damage and range and shortens the current cooldown by ten
    /// percent, so repeated upgrades compound.
    pub fn upgrade(&mut self) -> Result<u8, GameError> {
        if self.level >= MAX_TOWER_LEVEL {
            return Err(GameError::MaxLevel { level: self.level });
        }

        self.level += 1;
        self.damage = self.damage.saturating_add(UPGRADE_DAMAGE_BONUS);
        self.range += UPGRADE_RANGE_BONUS;
        self.fire_interval = self.fire_interval.mul_f64(UPGRADE_COOLDOWN_FACTOR);
        Ok(self.level)
    }

    /// Price of the next upgrade.
    #[must_use]
    pub fn upgrade_cost(&self) -> u32 {
        self.cost.saturating_mul(u32::from(self.level))
    }

    /// Money refunded when the tower is sold.
    #[must_use]
    pub fn sell_value(&self) -> u32 {
        self.cost.saturating_mul(u32::from(self.level)) / 2
    }

    /// Whether `enemy` lies inside the targeting radius.
    #[must_use]
    pub fn is_in_range(&self, enemy: &Enemy) -> bool {
        self.position.distance_squared(enemy.position()) <= self.range * self.range
    }

    /// Fires at the first living enemy in range, in slice order.
    ///
    /// Targeting follows slice order, with no distance or health priority.
    pub fn update(&mut self, now: Duration, enemies: &mut [Enemy]) -> Option<Shot> {
        if !self.can_fire(now) {
            return None;
        }

        let target = enemies
            .iter()
            .position(|enemy| enemy.is_alive() && self.is_in_range(enemy))?;

        self.fire(now);
        let _ = enemies[target].take_damage(self.damage);

        let splashed = if self.kind.splashes() {
            self.deal_aoe_damage(enemies, target)
        } else {
            0
        };

        Some(Shot {
            target,
            damage: self.damage,
            splashed,
        })
    }

    /// Applies half damage to every living enemy in range except `target`.
    ///
    /// Returns how many enemies were hit.
    pub fn deal_aoe_damage(&self, enemies: &mut [Enemy], target: usize) -> usize {
        let splash = self.damage / 2;
        let mut hits = 0;
        for (index, enemy) in enemies.iter_mut().enumerate() {
            if index == target || !enemy.is_alive() || !self.is_in_range(enemy) {
                continue;
            }
            let _ = enemy.take_damage(splash);
            hits += 1;
        }
        hits
    }

    /// Archetype of the tower.
    #[must_use]
    pub fn kind(&self) -> TowerKind {
        self.kind
    }

    /// Current targeting radius.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Current damage per hit.
    #[must_use]
    pub fn damage(&self) -> u32 {
        self.damage
    }

    /// Current cooldown.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        self.fire_interval
    }

    /// Simulation time of the last shot, if any.
    #[must_use]
    pub fn last_fired(&self) -> Option<Duration> {
        self.last_fired
    }

    /// Current level.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Base price of the archetype.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Immutable copy of the tower's observable state.
    #[must_use]
    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            kind: self.kind,
            position: self.position,
            range: self.range,
            damage: self.damage,
            fire_interval: self.fire_interval,
            level: self.level,
            cost: self.cost,
            upgrade_cost: self.upgrade_cost(),
            sell_value: self.sell_value(),
        }
    }
}

impl Positioned for Tower {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_defense_core::EnemyStats;

    fn enemy_at(x: f64, y: f64) -> Enemy {
        let stats = EnemyStats {
            health: 100,
            speed: 1.0,
            reward: 10,
            damage: 5,
        };
        let path: Arc<[Position]> = Arc::from(vec![Position::new(x, y)]);
        Enemy::new(stats, path)
    }

    #[test]
    fn archetypes_start_at_level_one_with_base_stats() {
        for kind in TowerKind::ALL {
            let tower = Tower::new(kind, Position::new(10.0, 20.0));
            let stats = kind.base_stats();
            assert_eq!(tower.position(), Position::new(10.0, 20.0));
            assert_eq!(tower.kind(), kind);
            assert_eq!(tower.range(), stats.range);
            assert_eq!(tower.damage(), stats.damage);
            assert_eq!(tower.fire_interval(), stats.fire_interval);
            assert_eq!(tower.level(), 1);
            assert_eq!(tower.cost(), stats.cost);
            assert_eq!(tower.last_fired(), None);
        }
    }

    #[test]
    fn cooldown_is_measured_on_the_simulation_clock() {
        let mut tower = Tower::new(TowerKind::Basic, Position::default());
        assert!(tower.can_fire(Duration::ZERO));

        tower.fire(Duration::from_millis(100));
        assert!(!tower.can_fire(Duration::from_millis(100)));
        assert!(!tower.can_fire(Duration::from_millis(1_099)));
        assert!(tower.can_fire(Duration::from_millis(1_100)));
    }

    #[test]
    fn upgrades_compound_until_the_level_cap() {
        let mut tower = Tower::new(TowerKind::Basic, Position::default());

        for expected_level in 2..=MAX_TOWER_LEVEL {
            let damage = tower.damage();
            let range = tower.range();
            let interval = tower.fire_interval();

            assert_eq!(tower.upgrade(), Ok(expected_level));
            assert_eq!(tower.damage(), damage + 5);
            assert_eq!(tower.range(), range + 20.0);
            let expected = interval.as_secs_f64() * 0.9;
            assert!((tower.fire_interval().as_secs_f64() - expected).abs() < 1e-6);
        }

        assert_eq!(tower.upgrade(), Err(GameError::MaxLevel { level: 3 }));
        assert_eq!(tower.level(), 3);
        assert_eq!(tower.damage(), 20);
    }

    #[test]
    fn prices_scale_with_level() {
        let mut tower = Tower::new(TowerKind::Aoe, Position::default());
        assert_eq!(tower.upgrade_cost(), 150);
        assert_eq!(tower.sell_value(), 75);

        let _ = tower.upgrade();
        assert_eq!(tower.upgrade_cost(), 300);
        assert_eq!(tower.sell_value(), 150);

        let _ = tower.upgrade();
        assert_eq!(tower.upgrade_cost(), 450);
        assert_eq!(tower.sell_value(), 225);
    }

    #[test]
    fn sell_value_truncates_odd_halves() {
        let mut tower = Tower::new(TowerKind::Basic, Position::default());
        tower.cost = 51;
        assert_eq!(tower.sell_value(), 25);
    }

    #[test]
    fn range_check_is_inclusive() {
        let tower = Tower::new(TowerKind::Basic, Position::default());
        assert!(tower.is_in_range(&enemy_at(50.0, 0.0)));
        assert!(tower.is_in_range(&enemy_at(60.0, 80.0)));
        assert!(!tower.is_in_range(&enemy_at(150.0, 0.0)));
    }

    #[test]
    fn update_hits_first_enemy_in_range_once_per_cooldown() {
        let mut tower = Tower::new(TowerKind::Basic, Position::default());
        let mut enemies = vec![enemy_at(200.0, 0.0), enemy_at(50.0, 0.0), enemy_at(10.0, 0.0)];

        let shot = tower.update(Duration::ZERO, &mut enemies);
        assert_eq!(
            shot,
            Some(Shot {
                target: 1,
                damage: 10,
                splashed: 0
            })
        );
        assert_eq!(enemies[0].health(), 100);
        assert_eq!(enemies[1].health(), 90);
        assert_eq!(enemies[2].health(), 100);

        assert_eq!(tower.update(Duration::from_millis(500), &mut enemies), None);
        assert_eq!(enemies[1].health(), 90);
    }

    #[test]
    fn update_without_targets_keeps_the_tower_ready() {
        let mut tower = Tower::new(TowerKind::Sniper, Position::default());
        let mut enemies = vec![enemy_at(500.0, 0.0)];

        assert_eq!(tower.update(Duration::ZERO, &mut enemies), None);
        assert!(tower.can_fire(Duration::ZERO));
    }

    #[test]
    fn dead_enemies_are_not_targeted() {
        let mut tower = Tower::new(TowerKind::Basic, Position::default());
        let mut enemies = vec![enemy_at(5.0, 0.0), enemy_at(10.0, 0.0)];
        let _ = enemies[0].take_damage(100);

        let shot = tower.update(Duration::ZERO, &mut enemies);
        assert_eq!(shot.map(|shot| shot.target), Some(1));
    }

    #[test]
    fn aoe_splash_spares_target_and_distant_enemies() {
        let tower = Tower::new(TowerKind::Aoe, Position::default());
        let mut enemies = vec![enemy_at(50.0, 0.0), enemy_at(60.0, 0.0), enemy_at(100.0, 0.0)];

        let hits = tower.deal_aoe_damage(&mut enemies, 0);

        assert_eq!(hits, 1);
        assert_eq!(enemies[0].health(), 100);
        assert_eq!(enemies[1].health(), 100 - 15 / 2);
        assert_eq!(enemies[2].health(), 100);
    }

    #[test]
    fn aoe_update_combines_primary_hit_and_splash() {
        let mut tower = Tower::new(TowerKind::Aoe, Position::default());
        let mut enemies = vec![enemy_at(50.0, 0.0), enemy_at(60.0, 0.0), enemy_at(100.0, 0.0)];

        let shot = tower.update(Duration::ZERO, &mut enemies);

        assert_eq!(
            shot,
            Some(Shot {
                target: 0,
                damage: 15,
                splashed: 1
            })
        );
        assert_eq!(enemies[0].health(), 85);
        assert_eq!(enemies[1].health(), 93);
        assert_eq!(enemies[2].health(), 100);
    }
}
