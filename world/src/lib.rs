#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tower Defense.
//!
//! [`World`] owns every tower and enemy together with the economy. Mutations
//! arrive either as direct method calls or as [`Command`] values routed through
//! [`apply`], which reports outcomes as [`Event`] values. Observers read
//! through the [`query`] functions, which hand out copies rather than live
//! entities. [`SharedWorld`] wraps a world for concurrent access.

mod enemies;
mod shared;
mod towers;

use std::{sync::Arc, time::Duration};

use tower_defense_core::{
    Command, EnemyStats, Event, GameError, GameSnapshot, Position, TowerCosts, TowerKind,
};
use tower_defense_system_wave_generation as wave_generation;
use tracing::{debug, info, trace};

pub use enemies::Enemy;
pub use shared::SharedWorld;
pub use towers::{Shot, Tower};

const DEFAULT_LIVES: u32 = 100;
const DEFAULT_MONEY: u32 = 1000;
const DEFAULT_PATH: [(f64, f64); 8] = [
    (0.0, 300.0),
    (200.0, 300.0),
    (200.0, 100.0),
    (400.0, 100.0),
    (400.0, 500.0),
    (600.0, 500.0),
    (600.0, 300.0),
    (800.0, 300.0),
];

/// Starting conditions for a game session.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Lives the player starts with.
    pub starting_lives: u32,
    /// Money the player starts with.
    pub starting_money: u32,
    /// Purchase prices.
    pub tower_costs: TowerCosts,
    /// Waypoints every enemy follows, fixed for the whole session.
    pub path: Vec<Position>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_lives: DEFAULT_LIVES,
            starting_money: DEFAULT_MONEY,
            tower_costs: TowerCosts::default(),
            path: DEFAULT_PATH
                .iter()
                .map(|(x, y)| Position::new(*x, *y))
                .collect(),
        }
    }
}

/// Represents the authoritative Tower Defense game state.
#[derive(Clone, Debug)]
pub struct World {
    towers: Vec<Tower>,
    enemies: Vec<Enemy>,
    lives: u32,
    money: u32,
    wave: u32,
    paused: bool,
    tower_costs: TowerCosts,
    path: Arc<[Position]>,
    elapsed: Duration,
    game_over_reported: bool,
}

impl World {
    /// Creates a world with the default starting conditions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a world from explicit starting conditions.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            towers: Vec::with_capacity(100),
            enemies: Vec::with_capacity(200),
            lives: config.starting_lives,
            money: config.starting_money,
            wave: 0,
            paused: false,
            tower_costs: config.tower_costs,
            path: config.path.into(),
            elapsed: Duration::ZERO,
            game_over_reported: false,
        }
    }

    /// Buys a tower of `kind` at `(x, y)` and returns its index.
    pub fn add_tower(&mut self, kind: TowerKind, x: f64, y: f64) -> Result<usize, GameError> {
        let cost = self
            .tower_costs
            .get(kind)
            .ok_or_else(|| GameError::UnknownTowerKind {
                name: kind.label().to_owned(),
            })?;
        self.ensure_funds(cost)?;

        self.towers.push(Tower::new(kind, Position::new(x, y)));
        self.money -= cost;
        let index = self.towers.len() - 1;
        debug!(%kind, x, y, cost, index, "tower placed");
        Ok(index)
    }

    /// Adds an already constructed enemy.
    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// Creates an enemy on this world's path from `stats`.
    #[must_use]
    pub fn spawn_enemy(&self, stats: EnemyStats) -> Enemy {
        Enemy::new(stats, Arc::clone(&self.path))
    }

    /// Removes the enemy at `index` by swapping in the last enemy.
    ///
    /// Indices of the remaining enemies are not stable across removals.
    pub fn remove_enemy(&mut self, index: usize) -> Result<Enemy, GameError> {
        self.ensure_enemy_index(index)?;
        Ok(self.enemies.swap_remove(index))
    }

    /// Damages the enemy at `index` and reports whether it died.
    ///
    /// A killed enemy pays out its reward and is swap-removed.
    pub fn damage_enemy(&mut self, index: usize, amount: u32) -> Result<bool, GameError> {
        self.ensure_enemy_index(index)?;
        let enemy = &mut self.enemies[index];
        if !enemy.take_damage(amount) {
            return Ok(false);
        }

        let reward = enemy.reward();
        self.money = self.money.saturating_add(reward);
        let _ = self.enemies.swap_remove(index);
        Ok(true)
    }

    /// Subtracts lives, stopping at zero.
    pub fn lose_life(&mut self, amount: u32) {
        self.lives = self.lives.saturating_sub(amount);
    }

    /// Whether the player ran out of lives.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Advances to the next wave and returns how many enemies spawned.
    pub fn next_wave(&mut self) -> u32 {
        self.wave = self.wave.saturating_add(1);
        self.spawn_wave()
    }

    /// Upgrades the tower at `index` and returns the price paid.
    pub fn upgrade_tower(&mut self, index: usize) -> Result<u32, GameError> {
        self.ensure_tower_index(index)?;
        let cost = self.towers[index].upgrade_cost();
        self.ensure_funds(cost)?;

        let level = self.towers[index].upgrade()?;
        self.money -= cost;
        debug!(index, level, cost, "tower upgraded");
        Ok(cost)
    }

    /// Sells the tower at `index` and returns the refund.
    ///
    /// The last tower takes the sold tower's index.
    pub fn sell_tower(&mut self, index: usize) -> Result<u32, GameError> {
        self.ensure_tower_index(index)?;
        let tower = self.towers.swap_remove(index);
        let refund = tower.sell_value();
        self.money = self.money.saturating_add(refund);
        debug!(index, refund, kind = %tower.kind(), "tower sold");
        Ok(refund)
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Runs one simulation tick covering `dt` of simulated time.
    ///
    /// Towers fire first, then dead enemies pay out, then escaped enemies cost
    /// lives while the rest advance. An empty field starts the next wave. A
    /// paused world ignores the call entirely, including the clock.
    pub fn update(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.paused {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        self.fire_towers(out_events);
        self.collect_dead(out_events);
        self.advance_enemies(out_events);

        if self.enemies.is_empty() {
            self.wave = self.wave.saturating_add(1);
            let spawned = self.spawn_wave();
            out_events.push(Event::WaveStarted {
                wave: self.wave,
                enemies: spawned,
            });
        }
    }

    /// Replaces every tower.
    pub fn set_towers(&mut self, towers: Vec<Tower>) {
        self.towers = towers;
    }

    /// Replaces every enemy.
    pub fn set_enemies(&mut self, enemies: Vec<Enemy>) {
        self.enemies = enemies;
    }

    /// Overwrites the remaining lives.
    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
        if lives > 0 {
            self.game_over_reported = false;
        }
    }

    /// Overwrites the money held.
    pub fn set_money(&mut self, money: u32) {
        self.money = money;
    }

    /// Overwrites the wave counter.
    pub fn set_wave(&mut self, wave: u32) {
        self.wave = wave;
    }

    /// Overwrites the pause flag.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Replaces the purchase price table.
    pub fn set_tower_costs(&mut self, tower_costs: TowerCosts) {
        self.tower_costs = tower_costs;
    }

    fn fire_towers(&mut self, out_events: &mut Vec<Event>) {
        let now = self.elapsed;
        for (index, tower) in self.towers.iter_mut().enumerate() {
            if let Some(shot) = tower.update(now, &mut self.enemies) {
                trace!(tower = index, target = shot.target, damage = shot.damage, "tower fired");
                out_events.push(Event::TowerFired {
                    tower: index,
                    target: shot.target,
                    damage: shot.damage,
                    splashed: shot.splashed,
                });
            }
        }
    }

    fn collect_dead(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.enemies.len() {
            if self.enemies[index].is_alive() {
                index += 1;
                continue;
            }

            let enemy = self.enemies.swap_remove(index);
            self.money = self.money.saturating_add(enemy.reward());
            out_events.push(Event::EnemyKilled {
                reward: enemy.reward(),
            });
        }
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.enemies.len() {
            if !self.enemies[index].has_reached_end() {
                self.enemies[index].move_along_path();
                index += 1;
                continue;
            }

            let enemy = self.enemies.swap_remove(index);
            self.lose_life(enemy.damage());
            out_events.push(Event::EnemyEscaped {
                damage: enemy.damage(),
                lives: self.lives,
            });
        }

        if self.is_game_over() && !self.game_over_reported {
            self.game_over_reported = true;
            info!(wave = self.wave, money = self.money, "game over");
            out_events.push(Event::GameOver {
                wave: self.wave,
                money: self.money,
            });
        }
    }

    fn spawn_wave(&mut self) -> u32 {
        let plan = wave_generation::plan(self.wave);
        for _ in 0..plan.count {
            let enemy = self.spawn_enemy(plan.stats);
            self.enemies.push(enemy);
        }
        debug!(wave = plan.wave, enemies = plan.count, health = plan.stats.health, "wave spawned");
        plan.count
    }

    fn ensure_funds(&self, required: u32) -> Result<(), GameError> {
        if self.money < required {
            return Err(GameError::InsufficientFunds {
                required,
                available: self.money,
            });
        }
        Ok(())
    }

    fn ensure_tower_index(&self, index: usize) -> Result<(), GameError> {
        if index >= self.towers.len() {
            return Err(GameError::InvalidIndex {
                index,
                len: self.towers.len(),
            });
        }
        Ok(())
    }

    fn ensure_enemy_index(&self, index: usize) -> Result<(), GameError> {
        if index >= self.enemies.len() {
            return Err(GameError::InvalidIndex {
                index,
                len: self.enemies.len(),
            });
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, reporting outcomes as events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTower { kind, position } => {
            let price = world.tower_costs.get(kind).unwrap_or_default();
            match world.add_tower(kind, position.x(), position.y()) {
                Ok(index) => out_events.push(Event::TowerPlaced {
                    index,
                    kind,
                    position,
                    cost: price,
                }),
                Err(reason) => out_events.push(Event::TowerPlacementRejected { kind, reason }),
            }
        }
        Command::UpgradeTower { index } => match world.upgrade_tower(index) {
            Ok(cost) => out_events.push(Event::TowerUpgraded {
                index,
                level: world.towers[index].level(),
                cost,
            }),
            Err(reason) => out_events.push(Event::TowerUpgradeRejected { index, reason }),
        },
        Command::SellTower { index } => match world.sell_tower(index) {
            Ok(refund) => out_events.push(Event::TowerSold { index, refund }),
            Err(reason) => out_events.push(Event::TowerSaleRejected { index, reason }),
        },
        Command::TogglePause => {
            let paused = world.toggle_pause();
            out_events.push(Event::PauseToggled { paused });
        }
        Command::NextWave => {
            let enemies = world.next_wave();
            out_events.push(Event::WaveStarted {
                wave: world.wave,
                enemies,
            });
        }
        Command::Tick { dt } => world.update(dt, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
///
/// Collections are returned as copies so callers can never alias live
/// entities across ticks.
pub mod query {
    use std::{sync::Arc, time::Duration};

    use tower_defense_core::{
        EnemySnapshot, GameSnapshot, Position, TowerCosts, TowerSnapshot,
    };

    use super::World;

    /// Snapshots of every tower in stored order.
    #[must_use]
    pub fn towers(world: &World) -> Vec<TowerSnapshot> {
        world.towers.iter().map(super::Tower::snapshot).collect()
    }

    /// Snapshots of every enemy in stored order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        world.enemies.iter().map(super::Enemy::snapshot).collect()
    }

    /// Number of towers standing.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.towers.len()
    }

    /// Number of enemies alive on the field.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Money held.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.money
    }

    /// Current wave number.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Whether the simulation is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Copy of the purchase price table.
    #[must_use]
    pub fn tower_costs(world: &World) -> TowerCosts {
        world.tower_costs.clone()
    }

    /// Shared handle to the immutable enemy path.
    #[must_use]
    pub fn enemy_path(world: &World) -> Arc<[Position]> {
        Arc::clone(&world.path)
    }

    /// Simulated time accumulated by unpaused ticks.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Consistent copy of everything an observer may display.
    #[must_use]
    pub fn snapshot(world: &World) -> GameSnapshot {
        GameSnapshot {
            towers: towers(world),
            enemies: enemies(world),
            path: world.path.to_vec(),
            lives: world.lives,
            money: world.money,
            wave: world.wave,
            paused: world.paused,
            tower_costs: world.tower_costs.clone(),
        }
    }
}

impl World {
    /// Snapshots of every tower in stored order.
    #[must_use]
    pub fn towers(&self) -> Vec<tower_defense_core::TowerSnapshot> {
        query::towers(self)
    }

    /// Snapshots of every enemy in stored order.
    #[must_use]
    pub fn enemies(&self) -> Vec<tower_defense_core::EnemySnapshot> {
        query::enemies(self)
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Money held.
    #[must_use]
    pub fn money(&self) -> u32 {
        self.money
    }

    /// Current wave number.
    #[must_use]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Whether the simulation is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Copy of the purchase price table.
    #[must_use]
    pub fn tower_costs(&self) -> TowerCosts {
        self.tower_costs.clone()
    }

    /// Shared handle to the immutable enemy path.
    #[must_use]
    pub fn enemy_path(&self) -> Arc<[Position]> {
        Arc::clone(&self.path)
    }

    /// Simulated time accumulated by unpaused ticks.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Consistent copy of everything an observer may display.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        query::snapshot(self)
    }
}
