//! Thread-safe handle around a [`World`].

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use tower_defense_core::{
    Command, EnemySnapshot, Event, GameError, GameSnapshot, Position, TowerCosts, TowerKind,
    TowerSnapshot,
};

use crate::{apply, Enemy, World};

/// Cloneable handle that lets input, simulation and rendering threads share
/// one world.
///
/// Mutations take the write lock, reads take the read lock and hand back
/// copies. Commands submitted through [`SharedWorld::submit`] wait in a
/// separate queue until the next [`SharedWorld::tick`].
#[derive(Clone, Debug, Default)]
pub struct SharedWorld {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    world: RwLock<World>,
    pending: Mutex<Vec<Command>>,
}

impl SharedWorld {
    /// Wraps `world` for shared access.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(Inner {
                world: RwLock::new(world),
                pending: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Queues a command for the next tick without touching the world lock.
    pub fn submit(&self, command: Command) {
        self.pending().push(command);
    }

    /// Number of commands waiting for the next tick.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.pending().len()
    }

    /// Applies every queued command and then advances the simulation by `dt`.
    ///
    /// Both happen under one write acquisition. The produced events are
    /// returned in order.
    pub fn tick(&self, dt: Duration) -> Vec<Event> {
        let commands = std::mem::take(&mut *self.pending());
        let mut events = Vec::new();
        let mut world = self.write();
        for command in commands {
            apply(&mut world, command, &mut events);
        }
        world.update(dt, &mut events);
        events
    }

    /// Applies a single command immediately.
    pub fn apply(&self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.write(), command, &mut events);
        events
    }

    /// Runs `f` against the world under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&World) -> T) -> T {
        f(&self.world())
    }

    /// See [`World::add_tower`].
    pub fn add_tower(&self, kind: TowerKind, x: f64, y: f64) -> Result<usize, GameError> {
        self.write().add_tower(kind, x, y)
    }

    /// See [`World::add_enemy`].
    pub fn add_enemy(&self, enemy: Enemy) {
        self.write().add_enemy(enemy);
    }

    /// See [`World::remove_enemy`].
    pub fn remove_enemy(&self, index: usize) -> Result<Enemy, GameError> {
        self.write().remove_enemy(index)
    }

    /// See [`World::damage_enemy`].
    pub fn damage_enemy(&self, index: usize, amount: u32) -> Result<bool, GameError> {
        self.write().damage_enemy(index, amount)
    }

    /// See [`World::lose_life`].
    pub fn lose_life(&self, amount: u32) {
        self.write().lose_life(amount);
    }

    /// See [`World::next_wave`].
    pub fn next_wave(&self) -> u32 {
        self.write().next_wave()
    }

    /// See [`World::upgrade_tower`].
    pub fn upgrade_tower(&self, index: usize) -> Result<u32, GameError> {
        self.write().upgrade_tower(index)
    }

    /// See [`World::sell_tower`].
    pub fn sell_tower(&self, index: usize) -> Result<u32, GameError> {
        self.write().sell_tower(index)
    }

    /// See [`World::toggle_pause`].
    pub fn toggle_pause(&self) -> bool {
        self.write().toggle_pause()
    }

    /// See [`World::update`].
    pub fn update(&self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        self.write().update(dt, &mut events);
        events
    }

    /// See [`World::set_lives`].
    pub fn set_lives(&self, lives: u32) {
        self.write().set_lives(lives);
    }

    /// See [`World::set_money`].
    pub fn set_money(&self, money: u32) {
        self.write().set_money(money);
    }

    /// See [`World::set_wave`].
    pub fn set_wave(&self, wave: u32) {
        self.write().set_wave(wave);
    }

    /// See [`World::set_paused`].
    pub fn set_paused(&self, paused: bool) {
        self.write().set_paused(paused);
    }

    /// See [`World::set_tower_costs`].
    pub fn set_tower_costs(&self, tower_costs: TowerCosts) {
        self.write().set_tower_costs(tower_costs);
    }

    /// See [`World::is_game_over`].
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.world().is_game_over()
    }

    /// See [`World::towers`].
    #[must_use]
    pub fn towers(&self) -> Vec<TowerSnapshot> {
        self.world().towers()
    }

    /// See [`World::enemies`].
    #[must_use]
    pub fn enemies(&self) -> Vec<EnemySnapshot> {
        self.world().enemies()
    }

    /// See [`World::lives`].
    #[must_use]
    pub fn lives(&self) -> u32 {
        self.world().lives()
    }

    /// See [`World::money`].
    #[must_use]
    pub fn money(&self) -> u32 {
        self.world().money()
    }

    /// See [`World::wave`].
    #[must_use]
    pub fn wave(&self) -> u32 {
        self.world().wave()
    }

    /// See [`World::is_paused`].
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.world().is_paused()
    }

    /// See [`World::tower_costs`].
    #[must_use]
    pub fn tower_costs(&self) -> TowerCosts {
        self.world().tower_costs()
    }

    /// See [`World::enemy_path`].
    #[must_use]
    pub fn enemy_path(&self) -> Arc<[Position]> {
        self.world().enemy_path()
    }

    /// See [`World::snapshot`].
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.world().snapshot()
    }

    fn world(&self) -> RwLockReadGuard<'_, World> {
        self.inner
            .world
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, World> {
        self.inner
            .world
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn pending(&self) -> MutexGuard<'_, Vec<Command>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
