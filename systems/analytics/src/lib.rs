#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that folds world events into session statistics.

use std::time::Duration;

use tower_defense_core::{Event, SessionStats};

/// Pure analytics system accumulating [`SessionStats`] from the event stream.
#[derive(Debug, Default)]
pub struct Analytics {
    stats: SessionStats,
    elapsed: Duration,
}

impl Analytics {
    /// Creates a new analytics system with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics gathered so far.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Simulated time observed through `Event::TimeAdvanced`.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Consumes world events produced since the last call.
    ///
    /// Rejections carry no economic effect and are ignored.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            self.record(event);
        }
    }

    fn record(&mut self, event: &Event) {
        let stats = &mut self.stats;
        match event {
            Event::TimeAdvanced { dt } => {
                self.elapsed = self.elapsed.saturating_add(*dt);
            }
            Event::TowerPlaced { cost, .. } => {
                stats.towers_built = stats.towers_built.saturating_add(1);
                stats.money_spent = stats.money_spent.saturating_add(u64::from(*cost));
            }
            Event::TowerUpgraded { cost, .. } => {
                stats.upgrades = stats.upgrades.saturating_add(1);
                stats.money_spent = stats.money_spent.saturating_add(u64::from(*cost));
            }
            Event::TowerSold { refund, .. } => {
                stats.towers_sold = stats.towers_sold.saturating_add(1);
                stats.money_earned = stats.money_earned.saturating_add(u64::from(*refund));
            }
            Event::TowerFired { .. } => {
                stats.shots_fired = stats.shots_fired.saturating_add(1);
            }
            Event::EnemyKilled { reward } => {
                stats.enemies_killed = stats.enemies_killed.saturating_add(1);
                stats.money_earned = stats.money_earned.saturating_add(u64::from(*reward));
            }
            Event::EnemyEscaped { damage, .. } => {
                stats.enemies_escaped = stats.enemies_escaped.saturating_add(1);
                stats.lives_lost = stats.lives_lost.saturating_add(*damage);
            }
            Event::WaveStarted { wave, .. } => {
                stats.waves_started = stats.waves_started.saturating_add(1);
                stats.highest_wave = stats.highest_wave.max(*wave);
            }
            Event::TowerPlacementRejected { .. }
            | Event::TowerUpgradeRejected { .. }
            | Event::TowerSaleRejected { .. }
            | Event::PauseToggled { .. }
            | Event::GameOver { .. } => {}
        }
    }
}
