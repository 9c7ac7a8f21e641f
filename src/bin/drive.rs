//! Headless autoplay run of the traffic simulation.
//!
//! Owns the periodic timer the library deliberately lacks, drives the
//! engine with a trivial dodge policy, and prints the terminal report.
//! Settings (difficulty, car color, high score) persist in a JSON file
//! in the working directory.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use traffic_escape::{
    Direction, EntityKind, GameEngine, GamePhase, GameSnapshot, JsonFileStore, NullPresenter,
    SettingsStore, KEY_DIFFICULTY, LANE_COUNT,
};

const SETTINGS_FILE: &str = "traffic-escape-settings.json";

/// Ticks before an autoplay run is cut off (a lucky bot can refuel forever).
const MAX_TICKS: u32 = 2000;

fn main() {
    env_logger::init();

    let mut settings = JsonFileStore::open(SETTINGS_FILE);
    if let Some(difficulty) = std::env::args().nth(1) {
        settings.set_string(KEY_DIFFICULTY, &difficulty);
    }

    let mut presenter = NullPresenter::default();
    let mut engine = GameEngine::new(Box::new(settings));

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    engine.start(&mut presenter, seed);

    let interval = Duration::from_millis(engine.stats().tick_interval_ms.max(1));

    for _ in 0..MAX_TICKS {
        thread::sleep(interval);

        let Some(snapshot) = engine.tick(&mut presenter) else {
            break;
        };

        if engine.phase() != GamePhase::Playing {
            break;
        }

        if let Some(direction) = pick_dodge(&snapshot) {
            engine.move_player(direction, &mut presenter);
        }

        if snapshot.elapsed_seconds % 5 == 0 {
            log::info!(
                "t={}s score={} fuel={:.0}% ({:?}) dodged={} entities={}",
                snapshot.elapsed_seconds,
                snapshot.score,
                snapshot.fuel,
                snapshot.fuel_band,
                snapshot.cars_dodged,
                snapshot.entities.len()
            );
        }
    }

    match engine.report() {
        Some(report) => println!(
            "{:?}: score {}, cars dodged {}, best {}",
            report.cause, report.final_score, report.cars_dodged, report.high_score
        ),
        None => println!("run cut off after {} ticks", MAX_TICKS),
    }
}

/// Move away from the nearest enemy bearing down on the player's lane.
fn pick_dodge(snapshot: &GameSnapshot) -> Option<Direction> {
    let threat = |lane: u8| {
        snapshot
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Enemy && e.lane == lane && e.row >= 5)
            .count()
    };

    if threat(snapshot.player_lane) == 0 {
        return None;
    }

    let mut best: Option<(Direction, usize)> = None;
    if snapshot.player_lane > 0 {
        best = Some((Direction::Left, threat(snapshot.player_lane - 1)));
    }
    if snapshot.player_lane < LANE_COUNT - 1 {
        let right = threat(snapshot.player_lane + 1);
        if best.map(|(_, count)| right < count).unwrap_or(true) {
            best = Some((Direction::Right, right));
        }
    }

    best.map(|(direction, _)| direction)
}
