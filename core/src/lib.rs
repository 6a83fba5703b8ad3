#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tower Defense engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! fold into their own state. Observers never touch live entities; they read
//! the immutable snapshots defined here.

use std::{collections::BTreeMap, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title painted at the top of every frame.
pub const GAME_TITLE: &str = "Tower Defense";

/// Highest level a tower can reach through upgrades.
pub const MAX_TOWER_LEVEL: u8 = 3;

/// Logical width of the playfield measured in world units.
pub const WORLD_WIDTH: f64 = 800.0;

/// Logical height of the playfield measured in world units.
pub const WORLD_HEIGHT: f64 = 600.0;

/// Point in world space expressed as a floating point pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a new position from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Overwrites both coordinates.
    pub fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_squared(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Position) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Anything that occupies a point on the playfield.
pub trait Positioned {
    /// Current position of the object.
    fn position(&self) -> Position;

    /// Moves the object to `position`.
    fn set_position(&mut self, position: Position);
}

/// Tower archetypes that can be purchased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap all-rounder with a short cooldown.
    Basic,
    /// Long range, heavy single-target hits.
    Sniper,
    /// Short range tower that splashes every nearby enemy.
    Aoe,
}

impl TowerKind {
    /// Every archetype in sidebar order.
    pub const ALL: [TowerKind; 3] = [TowerKind::Basic, TowerKind::Sniper, TowerKind::Aoe];

    /// Base statistics a freshly built tower of this kind starts with.
    #[must_use]
    pub const fn base_stats(self) -> TowerStats {
        match self {
            Self::Basic => TowerStats {
                range: 100.0,
                damage: 10,
                fire_interval: Duration::from_secs(1),
                cost: 50,
            },
            Self::Sniper => TowerStats {
                range: 200.0,
                damage: 30,
                fire_interval: Duration::from_secs(2),
                cost: 100,
            },
            Self::Aoe => TowerStats {
                range: 80.0,
                damage: 15,
                fire_interval: Duration::from_secs(2),
                cost: 150,
            },
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Sniper => "Sniper",
            Self::Aoe => "AOE",
        }
    }

    /// Single character used to draw the tower.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Basic => 'T',
            Self::Sniper => 'S',
            Self::Aoe => 'A',
        }
    }

    /// Whether hits from this kind splash onto neighbouring enemies.
    #[must_use]
    pub const fn splashes(self) -> bool {
        matches!(self, Self::Aoe)
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TowerKind {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" | "1" => Ok(Self::Basic),
            "sniper" | "2" => Ok(Self::Sniper),
            "aoe" | "3" => Ok(Self::Aoe),
            _ => Err(GameError::UnknownTowerKind {
                name: value.to_owned(),
            }),
        }
    }
}

impl TryFrom<u8> for TowerKind {
    type Error = GameError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Basic),
            2 => Ok(Self::Sniper),
            3 => Ok(Self::Aoe),
            _ => Err(GameError::UnknownTowerKind {
                name: code.to_string(),
            }),
        }
    }
}

/// Combat and pricing parameters of a tower archetype.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Targeting radius in world units.
    pub range: f64,
    /// Damage applied to the primary target.
    pub damage: u32,
    /// Minimum time between two shots.
    pub fire_interval: Duration,
    /// Base purchase price.
    pub cost: u32,
}

/// Purchase prices keyed by tower kind.
///
/// A kind missing from the table cannot be bought.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerCosts {
    prices: BTreeMap<TowerKind, u32>,
}

impl TowerCosts {
    /// Creates an empty price table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            prices: BTreeMap::new(),
        }
    }

    /// Price of `kind`, if it is for sale.
    #[must_use]
    pub fn get(&self, kind: TowerKind) -> Option<u32> {
        self.prices.get(&kind).copied()
    }

    /// Sets the price of `kind`, returning the previous price.
    pub fn set(&mut self, kind: TowerKind, price: u32) -> Option<u32> {
        self.prices.insert(kind, price)
    }

    /// Withdraws `kind` from sale, returning its price.
    pub fn remove(&mut self, kind: TowerKind) -> Option<u32> {
        self.prices.remove(&kind)
    }

    /// Number of kinds for sale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether nothing is for sale.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Iterates prices in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (TowerKind, u32)> + '_ {
        self.prices.iter().map(|(kind, price)| (*kind, *price))
    }
}

impl Default for TowerCosts {
    fn default() -> Self {
        Self {
            prices: TowerKind::ALL
                .iter()
                .map(|kind| (*kind, kind.base_stats().cost))
                .collect(),
        }
    }
}

/// Spawn blueprint for a single enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Starting and maximum health.
    pub health: u32,
    /// Distance covered per tick.
    pub speed: f64,
    /// Money granted when the enemy dies.
    pub reward: u32,
    /// Lives lost when the enemy reaches the end of the path.
    pub damage: u32,
}

/// Failures reported by world operations.
///
/// Every failing operation leaves the world untouched.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    /// The requested tower kind is unknown or not for sale.
    #[error("unknown tower kind `{name}`")]
    UnknownTowerKind {
        /// Name or code that failed to resolve.
        name: String,
    },
    /// The player cannot afford the operation.
    #[error("insufficient funds: {required} required, {available} available")]
    InsufficientFunds {
        /// Price of the rejected operation.
        required: u32,
        /// Money held when the operation was attempted.
        available: u32,
    },
    /// An index did not address a live tower or enemy.
    #[error("index {index} out of bounds for collection of length {len}")]
    InvalidIndex {
        /// Index supplied by the caller.
        index: usize,
        /// Collection length at the time of the call.
        len: usize,
    },
    /// The tower is already at the level cap.
    #[error("tower is already at maximum level {level}")]
    MaxLevel {
        /// Level of the tower when the upgrade was attempted.
        level: u8,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Purchases a tower of `kind` at `position`.
    PlaceTower {
        /// Archetype to build.
        kind: TowerKind,
        /// Where the tower stands.
        position: Position,
    },
    /// Upgrades the tower stored at `index`.
    UpgradeTower {
        /// Index into the tower collection.
        index: usize,
    },
    /// Sells the tower stored at `index`.
    SellTower {
        /// Index into the tower collection.
        index: usize,
    },
    /// Flips between the active and paused states.
    TogglePause,
    /// Starts the next wave immediately.
    NextWave,
    /// Runs one simulation tick.
    Tick {
        /// Simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Duration added to the clock.
        dt: Duration,
    },
    /// A tower was purchased.
    TowerPlaced {
        /// Index assigned to the tower.
        index: usize,
        /// Archetype that was built.
        kind: TowerKind,
        /// Where the tower stands.
        position: Position,
        /// Money deducted for the purchase.
        cost: u32,
    },
    /// A purchase was refused.
    TowerPlacementRejected {
        /// Archetype requested.
        kind: TowerKind,
        /// Why the purchase failed.
        reason: GameError,
    },
    /// A tower gained a level.
    TowerUpgraded {
        /// Index of the upgraded tower.
        index: usize,
        /// Level reached.
        level: u8,
        /// Money deducted for the upgrade.
        cost: u32,
    },
    /// An upgrade was refused.
    TowerUpgradeRejected {
        /// Index supplied by the caller.
        index: usize,
        /// Why the upgrade failed.
        reason: GameError,
    },
    /// A tower was sold and removed.
    TowerSold {
        /// Index the tower occupied before removal.
        index: usize,
        /// Money credited for the sale.
        refund: u32,
    },
    /// A sale was refused.
    TowerSaleRejected {
        /// Index supplied by the caller.
        index: usize,
        /// Why the sale failed.
        reason: GameError,
    },
    /// A tower fired at an enemy.
    TowerFired {
        /// Index of the firing tower.
        tower: usize,
        /// Index of the primary target at the time of firing.
        target: usize,
        /// Damage dealt to the primary target.
        damage: u32,
        /// Number of other enemies caught by splash damage.
        splashed: usize,
    },
    /// An enemy died and paid out its reward.
    EnemyKilled {
        /// Money credited.
        reward: u32,
    },
    /// An enemy reached the end of the path.
    EnemyEscaped {
        /// Lives the enemy was worth.
        damage: u32,
        /// Lives remaining afterwards.
        lives: u32,
    },
    /// A new wave spawned.
    WaveStarted {
        /// Wave number after the increment.
        wave: u32,
        /// Number of enemies spawned.
        enemies: u32,
    },
    /// The pause flag changed.
    PauseToggled {
        /// Whether the simulation is now paused.
        paused: bool,
    },
    /// Lives dropped to zero.
    GameOver {
        /// Wave reached.
        wave: u32,
        /// Money held at the end.
        money: u32,
    },
}

/// Immutable representation of a single enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Current position.
    pub position: Position,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Distance covered per tick.
    pub speed: f64,
    /// Money granted on death.
    pub reward: u32,
    /// Lives lost on escape.
    pub damage: u32,
    /// Index of the last waypoint reached.
    pub path_index: usize,
}

/// Immutable representation of a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Archetype.
    pub kind: TowerKind,
    /// Where the tower stands.
    pub position: Position,
    /// Current targeting radius.
    pub range: f64,
    /// Current damage.
    pub damage: u32,
    /// Current cooldown.
    pub fire_interval: Duration,
    /// Current level.
    pub level: u8,
    /// Base price.
    pub cost: u32,
    /// Price of the next upgrade.
    pub upgrade_cost: u32,
    /// Money credited when sold.
    pub sell_value: u32,
}

/// Consistent copy of the whole game state taken under one read lock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Towers in stored order.
    pub towers: Vec<TowerSnapshot>,
    /// Enemies in stored order.
    pub enemies: Vec<EnemySnapshot>,
    /// Waypoints enemies follow.
    pub path: Vec<Position>,
    /// Remaining lives.
    pub lives: u32,
    /// Money held.
    pub money: u32,
    /// Current wave number.
    pub wave: u32,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Purchase prices.
    pub tower_costs: TowerCosts,
}

/// Running totals accumulated over a play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Towers purchased.
    pub towers_built: u32,
    /// Towers sold.
    pub towers_sold: u32,
    /// Successful upgrades.
    pub upgrades: u32,
    /// Shots fired by all towers.
    pub shots_fired: u32,
    /// Enemies killed.
    pub enemies_killed: u32,
    /// Enemies that reached the end of the path.
    pub enemies_escaped: u32,
    /// Lives lost to escaped enemies.
    pub lives_lost: u32,
    /// Money gained from kills and sales.
    pub money_earned: u64,
    /// Money spent on purchases and upgrades.
    pub money_spent: u64,
    /// Waves spawned.
    pub waves_started: u32,
    /// Highest wave number seen.
    pub highest_wave: u32,
}
