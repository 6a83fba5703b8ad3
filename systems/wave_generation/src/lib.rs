#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave generation that scales enemy strength with the wave number.
//!
//! Every enemy in wave `w` shares one blueprint:
//!
//! | stat   | formula          |
//! |--------|------------------|
//! | count  | `2w`             |
//! | health | `50 + 10w`       |
//! | speed  | `1.0 + w / 10.0` |
//! | reward | `10 + w`         |
//! | damage | `1 + w / 5`      |
//!
//! Damage uses integer division, so escaped enemies hurt more every fifth wave.

use tower_defense_core::EnemyStats;

const ENEMIES_PER_WAVE: u32 = 2;
const BASE_HEALTH: u32 = 50;
const HEALTH_PER_WAVE: u32 = 10;
const BASE_SPEED: f64 = 1.0;
const SPEED_DIVISOR: f64 = 10.0;
const BASE_REWARD: u32 = 10;
const BASE_DAMAGE: u32 = 1;
const WAVES_PER_DAMAGE_STEP: u32 = 5;

/// Spawn roster for a single wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavePlan {
    /// Wave number the plan was generated for.
    pub wave: u32,
    /// Number of enemies to spawn.
    pub count: u32,
    /// Blueprint shared by every enemy of the wave.
    pub stats: EnemyStats,
}

/// Builds the roster for `wave`.
#[must_use]
pub fn plan(wave: u32) -> WavePlan {
    WavePlan {
        wave,
        count: wave.saturating_mul(ENEMIES_PER_WAVE),
        stats: enemy_stats(wave),
    }
}

/// Blueprint of a single enemy spawned in `wave`.
#[must_use]
pub fn enemy_stats(wave: u32) -> EnemyStats {
    EnemyStats {
        health: BASE_HEALTH.saturating_add(wave.saturating_mul(HEALTH_PER_WAVE)),
        speed: BASE_SPEED + f64::from(wave) / SPEED_DIVISOR,
        reward: BASE_REWARD.saturating_add(wave),
        damage: BASE_DAMAGE.saturating_add(wave / WAVES_PER_DAMAGE_STEP),
    }
}
