//! Astro Blaster headless runner
//!
//! Plays a session with a simple autopilot and prints the outcome.
//!
//! Usage: `astro-blaster [seed] [tuning.json]`

use astro_blaster::Tuning;
use astro_blaster::sim::{Category, GameEvent, GameState, TickInput, tick};

const FRAME_RATE: f64 = 60.0;
const SESSION_SECONDS: f64 = 120.0;
/// How long the autopilot waits on the game-over screen before tapping
const RESTART_DELAY: f64 = 2.0;

#[derive(Debug, Default)]
struct Summary {
    enemies: usize,
    asteroids: usize,
    hits_taken: usize,
    games: usize,
    best_score: u64,
}

impl Summary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Spawned {
                category: Category::Enemy,
                ..
            } => self.enemies += 1,
            GameEvent::Spawned {
                category: Category::Asteroid,
                ..
            } => self.asteroids += 1,
            GameEvent::DamageFlash { .. } => self.hits_taken += 1,
            GameEvent::GameOver { final_score } => {
                self.games += 1;
                self.best_score = self.best_score.max(*final_score);
            }
            _ => {}
        }
    }
}

/// Steer under the lowest enemy still on screen
fn autopilot_target(state: &GameState) -> Option<f32> {
    state
        .live()
        .filter(|e| e.category() == Category::Enemy && e.pos.y > 0.0)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|e| e.pos.x)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => seed,
            Err(e) => {
                log::error!("Invalid seed {:?}: {}", raw, e);
                std::process::exit(2);
            }
        },
        None => 0xA57E_0001,
    };
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    log::info!("Astro Blaster (headless) starting, seed {}", seed);

    let mut state = match GameState::with_tuning(seed, tuning) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(1);
        }
    };
    let mut summary = Summary::default();
    let mut game_over_at: Option<f64> = None;

    let frames = (SESSION_SECONDS * FRAME_RATE) as u64;
    for frame in 0..frames {
        let now = frame as f64 / FRAME_RATE;

        let tap = game_over_at.is_some_and(|t| now - t >= RESTART_DELAY);
        let input = TickInput {
            target_x: autopilot_target(&state),
            tap,
        };
        tick(&mut state, &input, now);

        for event in state.drain_events() {
            log::debug!("{:.3}s {:?}", now, event);
            summary.record(&event);
            match event {
                GameEvent::GameOver { .. } => game_over_at = Some(now),
                GameEvent::Restarted => game_over_at = None,
                _ => {}
            }
        }
    }

    let snapshot = state.snapshot();
    summary.best_score = summary.best_score.max(snapshot.score);
    println!("{}", snapshot.score_text());
    if let Some(text) = snapshot.final_score_text() {
        println!("{}", text);
    }
    println!(
        "health {} ({:?}), games over {}, best {}",
        snapshot.health, snapshot.health_tier, summary.games, summary.best_score
    );
    println!(
        "spawned {} enemies and {} asteroids, took {} hits",
        summary.enemies, summary.asteroids, summary.hits_taken
    );
}
