#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that stands in for a player by emitting random commands.
//!
//! Each frame the autopilot may upgrade or sell a random tower and may toggle
//! the pause flag. All randomness comes from a seeded ChaCha generator, so a
//! seed fully determines the command stream.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tower_defense_core::Command;

const DEFAULT_ACTION_PROBABILITY: f64 = 0.01;
const DEFAULT_UPGRADE_SHARE: f64 = 0.5;
const DEFAULT_PAUSE_PROBABILITY: f64 = 0.001;

/// Tuning knobs for the simulated player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Seed for the random generator.
    pub seed: u64,
    /// Chance per frame of touching a tower.
    pub action_probability: f64,
    /// Share of tower actions that upgrade rather than sell.
    pub upgrade_share: f64,
    /// Chance per frame of toggling pause.
    pub pause_probability: f64,
}

impl Config {
    /// Creates a configuration with default probabilities.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            action_probability: DEFAULT_ACTION_PROBABILITY,
            upgrade_share: DEFAULT_UPGRADE_SHARE,
            pause_probability: DEFAULT_PAUSE_PROBABILITY,
        }
    }
}

/// Seeded simulated-input system.
#[derive(Clone, Debug)]
pub struct Autopilot {
    config: Config,
    rng: ChaCha8Rng,
}

impl Autopilot {
    /// Creates an autopilot seeded from `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Configuration the autopilot was built with.
    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Decides this frame's input given how many towers stand.
    pub fn handle(&mut self, tower_count: usize, out: &mut Vec<Command>) {
        if self.roll(self.config.action_probability) && tower_count > 0 {
            let index = self.rng.gen_range(0..tower_count);
            if self.roll(self.config.upgrade_share) {
                out.push(Command::UpgradeTower { index });
            } else {
                out.push(Command::SellTower { index });
            }
        }

        if self.roll(self.config.pause_probability) {
            out.push(Command::TogglePause);
        }
    }

    fn roll(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(action: f64, upgrade: f64, pause: f64) -> Config {
        Config {
            action_probability: action,
            upgrade_share: upgrade,
            pause_probability: pause,
            ..Config::new(7)
        }
    }

    #[test]
    fn defaults_are_rare_actions() {
        let config = Config::new(42);
        assert_eq!(config.seed, 42);
        assert_eq!(config.action_probability, 0.01);
        assert_eq!(config.upgrade_share, 0.5);
        assert_eq!(config.pause_probability, 0.001);
    }

    #[test]
    fn silent_autopilot_emits_nothing() {
        let mut autopilot = Autopilot::new(config(0.0, 1.0, 0.0));
        let mut out = Vec::new();
        for _ in 0..1_000 {
            autopilot.handle(5, &mut out);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn no_towers_means_no_tower_commands() {
        let mut autopilot = Autopilot::new(config(1.0, 1.0, 0.0));
        let mut out = Vec::new();
        autopilot.handle(0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn upgrade_share_selects_the_action() {
        let mut upgrader = Autopilot::new(config(1.0, 1.0, 0.0));
        let mut seller = Autopilot::new(config(1.0, 0.0, 0.0));
        let mut upgrades = Vec::new();
        let mut sales = Vec::new();

        for _ in 0..100 {
            upgrader.handle(3, &mut upgrades);
            seller.handle(3, &mut sales);
        }

        assert_eq!(upgrades.len(), 100);
        assert!(upgrades
            .iter()
            .all(|command| matches!(command, Command::UpgradeTower { index } if *index < 3)));
        assert_eq!(sales.len(), 100);
        assert!(sales
            .iter()
            .all(|command| matches!(command, Command::SellTower { index } if *index < 3)));
    }

    #[test]
    fn certain_pause_toggles_every_frame() {
        let mut autopilot = Autopilot::new(config(0.0, 0.5, 1.0));
        let mut out = Vec::new();
        autopilot.handle(2, &mut out);
        autopilot.handle(2, &mut out);
        assert_eq!(out, vec![Command::TogglePause, Command::TogglePause]);
    }

    #[test]
    fn out_of_range_probabilities_are_clamped() {
        let mut autopilot = Autopilot::new(config(2.5, -1.0, -3.0));
        let mut out = Vec::new();
        autopilot.handle(1, &mut out);
        assert_eq!(out, vec![Command::SellTower { index: 0 }]);
    }
}
