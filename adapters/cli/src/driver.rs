//! Frame loop tying the shared world to input, analytics and presentation.

use std::{
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use tower_defense_core::{Command, Position, SessionStats, TowerKind};
use tower_defense_rendering::{RenderingBackend, TextRenderer};
use tower_defense_system_analytics::Analytics;
use tower_defense_system_autopilot::{self as autopilot, Autopilot};
use tower_defense_world::{query, SharedWorld, World};
use tracing::{debug, warn};

const OPENING_TOWERS: [(TowerKind, f64, f64); 2] = [
    (TowerKind::Basic, 210.0, 300.0),
    (TowerKind::Sniper, 300.0, 300.0),
];

/// Knobs for a single session.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Settings {
    pub(crate) tick_rate: u32,
    pub(crate) max_frames: Option<u64>,
    pub(crate) autopilot: Option<autopilot::Config>,
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Outcome {
    pub(crate) wave: u32,
    pub(crate) money: u32,
    pub(crate) frames: u64,
    pub(crate) game_over: bool,
    pub(crate) stats: SessionStats,
}

impl Outcome {
    /// Final line printed once the loop stops.
    pub(crate) fn summary(&self) -> String {
        if self.game_over {
            format!(
                "Game Over! You survived {} waves and earned {} money.",
                self.wave, self.money
            )
        } else {
            format!(
                "Stopped after {} frames at wave {} with {} money.",
                self.frames, self.wave, self.money
            )
        }
    }
}

/// Owns the systems around a [`SharedWorld`] and runs the frame loop.
#[derive(Debug)]
pub(crate) struct Driver {
    shared: SharedWorld,
    autopilot: Option<Autopilot>,
    analytics: Analytics,
    renderer: TextRenderer,
    settings: Settings,
}

impl Driver {
    /// Opens a session on `world` with the starting towers and first wave.
    pub(crate) fn new(world: World, settings: Settings) -> Self {
        let shared = SharedWorld::new(world);
        let mut analytics = Analytics::new();

        for (kind, x, y) in OPENING_TOWERS {
            let events = shared.apply(Command::PlaceTower {
                kind,
                position: Position::new(x, y),
            });
            analytics.handle(&events);
        }
        analytics.handle(&shared.apply(Command::NextWave));

        Self {
            shared,
            autopilot: settings.autopilot.map(Autopilot::new),
            analytics,
            renderer: TextRenderer::new(),
            settings,
        }
    }

    /// Runs until the game is over or the frame cap is reached.
    ///
    /// Without a backend nothing is drawn, the loop never sleeps and every
    /// tick advances by the nominal frame time.
    pub(crate) fn run(
        &mut self,
        mut backend: Option<&mut dyn RenderingBackend>,
    ) -> Result<Outcome> {
        let nominal = Duration::from_secs_f64(1.0 / f64::from(self.settings.tick_rate.max(1)));
        let mut frames = 0;
        let mut last_frame = Instant::now();

        while !self.shared.is_game_over() {
            if self.settings.max_frames.is_some_and(|cap| frames >= cap) {
                break;
            }
            let frame_start = Instant::now();

            self.submit_input();
            let dt = match backend {
                Some(_) => {
                    let dt = frame_start.duration_since(last_frame);
                    last_frame = frame_start;
                    dt
                }
                None => nominal,
            };
            let events = self.shared.tick(dt);
            self.analytics.handle(&events);
            frames += 1;

            if let Some(backend) = backend.as_deref_mut() {
                let snapshot = self.shared.snapshot();
                let frame = self.renderer.render(&snapshot, &self.analytics.stats());
                backend.present(frame)?;
                let spent = frame_start.elapsed();
                if spent > nominal {
                    warn!(?spent, ?nominal, "frame overran its budget");
                }
                thread::sleep(nominal.saturating_sub(spent));
            }
        }

        let outcome = self.shared.read(|world| Outcome {
            wave: query::wave(world),
            money: query::money(world),
            frames,
            game_over: world.is_game_over(),
            stats: self.analytics.stats(),
        });
        debug!(?outcome, "session finished");
        Ok(outcome)
    }

    fn submit_input(&mut self) {
        let Some(autopilot) = self.autopilot.as_mut() else {
            return;
        };
        let mut commands = Vec::new();
        autopilot.handle(self.shared.read(query::tower_count), &mut commands);
        for command in commands {
            self.shared.submit(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defense_rendering::TextFrame;

    fn settings(max_frames: Option<u64>, seed: Option<u64>) -> Settings {
        Settings {
            tick_rate: 60,
            max_frames,
            autopilot: seed.map(autopilot::Config::new),
        }
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<String>,
    }

    impl RenderingBackend for Recorder {
        fn present(&mut self, frame: &TextFrame) -> Result<()> {
            self.frames.push(frame.to_string());
            Ok(())
        }
    }

    #[test]
    fn opening_matches_the_classic_setup() {
        let driver = Driver::new(World::new(), settings(Some(0), None));
        let towers = driver.shared.towers();

        assert_eq!(towers.len(), 2);
        assert_eq!(towers[0].kind, TowerKind::Basic);
        assert_eq!(towers[0].position, Position::new(210.0, 300.0));
        assert_eq!(towers[1].kind, TowerKind::Sniper);
        assert_eq!(towers[1].position, Position::new(300.0, 300.0));
        assert_eq!(driver.shared.money(), 850);
        assert_eq!(driver.shared.wave(), 1);
        assert_eq!(driver.shared.enemies().len(), 2);
    }

    #[test]
    fn frame_cap_stops_a_live_game() {
        let mut driver = Driver::new(World::new(), settings(Some(120), None));
        let outcome = driver.run(None).unwrap();

        assert_eq!(outcome.frames, 120);
        assert!(!outcome.game_over);
        assert_eq!(outcome.stats.towers_built, 2);
        assert_eq!(
            outcome.summary(),
            format!(
                "Stopped after 120 frames at wave {} with {} money.",
                outcome.wave, outcome.money
            )
        );
    }

    #[test]
    fn exhausted_lives_end_the_session() {
        let mut world = World::new();
        world.set_lives(1);
        let mut driver = Driver::new(world, settings(Some(100_000), None));
        driver.shared.lose_life(1);

        let outcome = driver.run(None).unwrap();

        assert!(outcome.game_over);
        assert_eq!(outcome.frames, 0);
        assert_eq!(
            outcome.summary(),
            "Game Over! You survived 1 waves and earned 850 money."
        );
    }

    #[test]
    fn headless_sessions_replay_from_the_seed() {
        let first = Driver::new(World::new(), settings(Some(3_000), Some(11)))
            .run(None)
            .unwrap();
        let second = Driver::new(World::new(), settings(Some(3_000), Some(11)))
            .run(None)
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn backend_receives_one_frame_per_tick() {
        let mut recorder = Recorder::default();
        let mut driver = Driver::new(
            World::new(),
            Settings {
                tick_rate: 1_000,
                max_frames: Some(3),
                autopilot: None,
            },
        );

        let outcome = driver.run(Some(&mut recorder)).unwrap();

        assert_eq!(outcome.frames, 3);
        assert_eq!(recorder.frames.len(), 3);
        assert!(recorder.frames[0].contains("Wave: 1 | Lives: 100 | Money: 850"));
    }
}
