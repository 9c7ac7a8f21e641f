use traffic_escape::{
    lane_offset, CarColor, Difficulty, Direction, Easing, EntityKind, FuelBand, GameConfig,
    GameEngine, GameOverCause, GamePhase, GameSession, MemoryStore, NullPresenter, Presenter,
    TickOutcome, KEY_HIGH_SCORE, LANE_COUNT, PLAYER_ROW,
};

/// Config with both spawn rolls disabled, for staging exact boards.
fn quiet(tick_interval_ms: u64) -> GameConfig {
    GameConfig {
        difficulty: Difficulty::Easy,
        tick_interval_ms,
        enemy_spawn_chance: 0,
        pickup_spawn_chance: 0,
        seed: 7,
    }
}

/// Presenter that records every command for inspection.
#[derive(Debug, Default)]
struct RecordingPresenter {
    placed: Vec<(u32, u8, u8)>,
    removed: Vec<u32>,
    animations: Vec<(f64, u32, Easing)>,
    sprites: Vec<CarColor>,
}

impl Presenter for RecordingPresenter {
    fn set_entity_position(&mut self, id: u32, lane: u8, row: u8) {
        self.placed.push((id, lane, row));
    }

    fn remove_entity(&mut self, id: u32) {
        self.removed.push(id);
    }

    fn animate_player_to(&mut self, offset_x: f64, duration_ms: u32, easing: Easing) {
        self.animations.push((offset_x, duration_ms, easing));
    }

    fn viewport_width(&self) -> f64 {
        300.0
    }

    fn set_car_sprite(&mut self, color: CarColor) {
        self.sprites.push(color);
    }
}

#[test]
fn difficulty_table_sets_interval_and_spawn_chances() {
    let hard = GameConfig::for_difficulty(Difficulty::Hard);
    assert_eq!(hard.tick_interval_ms, 250);
    assert_eq!(hard.enemy_spawn_chance, 5);
    assert_eq!(hard.pickup_spawn_chance, 15);

    let easy = GameConfig::for_difficulty(Difficulty::Easy);
    assert_eq!(easy.tick_interval_ms, 450);
    assert_eq!(easy.enemy_spawn_chance, 10);
    assert_eq!(easy.pickup_spawn_chance, 10);

    let medium = GameConfig::for_difficulty(Difficulty::Medium);
    assert_eq!(medium.tick_interval_ms, 350);
    assert_eq!(medium.enemy_spawn_chance, 8);
    assert_eq!(medium.pickup_spawn_chance, 12);
}

#[test]
fn fuel_and_lane_stay_in_bounds_every_tick() {
    let mut session = GameSession::new(GameConfig::for_difficulty(Difficulty::Hard).with_seed(99));
    let mut presenter = NullPresenter::default();

    for i in 0..400 {
        if i % 3 == 0 {
            session.move_player(Direction::Left, &mut presenter);
        }
        if i % 7 == 0 {
            session.move_player(Direction::Right, &mut presenter);
        }

        let outcome = session.tick(&mut presenter);

        assert!(
            (0.0..=100.0).contains(&session.fuel()),
            "fuel out of bounds: {}",
            session.fuel()
        );
        assert!(session.player_lane() < LANE_COUNT);
        for entity in session.entities() {
            assert!(entity.row <= PLAYER_ROW);
            assert!(entity.lane < LANE_COUNT);
        }

        if outcome != TickOutcome::Continue {
            break;
        }
    }
}

#[test]
fn move_at_road_edge_is_a_noop() {
    let mut session = GameSession::new(quiet(450));
    let mut presenter = NullPresenter::default();

    session.move_player(Direction::Left, &mut presenter);
    assert_eq!(session.player_lane(), 0);

    let offset_before = session.player_offset();
    session.move_player(Direction::Left, &mut presenter);
    assert_eq!(session.player_lane(), 0);
    assert_eq!(session.player_offset(), offset_before);

    session.move_player(Direction::Right, &mut presenter);
    session.move_player(Direction::Right, &mut presenter);
    assert_eq!(session.player_lane(), LANE_COUNT - 1);
    session.move_player(Direction::Right, &mut presenter);
    assert_eq!(session.player_lane(), LANE_COUNT - 1);
}

#[test]
fn enemy_in_player_lane_and_row_collides() {
    let mut session = GameSession::new(quiet(450));
    let mut presenter = NullPresenter::default();

    session.debug_place(EntityKind::Enemy, GameSession::STARTING_LANE, PLAYER_ROW, 3);
    assert_eq!(session.tick(&mut presenter), TickOutcome::Collision);
}

#[test]
fn enemy_in_another_row_or_lane_does_not_collide() {
    let mut session = GameSession::new(quiet(450));
    let mut presenter = NullPresenter::default();

    // Same lane, rows above the player.
    session.debug_place(EntityKind::Enemy, GameSession::STARTING_LANE, 5, 1);
    // Player's row, adjacent lane: 65 px apart at a 300 px viewport.
    session.debug_place(EntityKind::Enemy, 0, PLAYER_ROW, 3);

    assert_eq!(session.tick(&mut presenter), TickOutcome::Continue);
}

#[test]
fn collision_terminates_the_tick_immediately() {
    let mut session = GameSession::new(quiet(450));
    let mut presenter = NullPresenter::default();

    session.debug_set_fuel(50.0);
    session.debug_place(EntityKind::Enemy, GameSession::STARTING_LANE, PLAYER_ROW, 3);
    // Would be collected if the tick ran to completion.
    session.debug_place(EntityKind::Pickup, GameSession::STARTING_LANE, 6, 1);

    assert_eq!(session.tick(&mut presenter), TickOutcome::Collision);
    assert_eq!(session.fuel(), 50.0, "fuel must not decay after a collision");
    assert_eq!(session.cars_dodged(), 0);
}

#[test]
fn score_adds_ten_per_dodge_plus_elapsed_seconds() {
    // Tick 27 at 450 ms puts elapsed time at 12 s.
    let mut session = GameSession::new(quiet(450));
    let mut presenter = NullPresenter::default();

    session.debug_set_cars_dodged(3);
    session.debug_set_tick_counter(26);

    assert_eq!(session.tick(&mut presenter), TickOutcome::Continue);
    assert_eq!(session.elapsed_seconds(), 12);
    assert_eq!(session.score(), 42);
}

#[test]
fn passed_enemy_counts_as_dodged() {
    let mut session = GameSession::new(quiet(450));
    let mut presenter = NullPresenter::default();

    // Off the player's lane, already at the last row, moving every tick.
    session.debug_place(EntityKind::Enemy, 0, PLAYER_ROW, 1);

    assert_eq!(session.tick(&mut presenter), TickOutcome::Continue);
    assert_eq!(session.cars_dodged(), 1);
    assert_eq!(session.score(), 10);
    assert!(session.entities().is_empty());
}

#[test]
fn speed_divisor_gates_enemy_descent() {
    let mut session = GameSession::new(quiet(450));
    let mut presenter = NullPresenter::default();

    session.debug_place(EntityKind::Enemy, 0, 0, 3);
    session.debug_place(EntityKind::Pickup, 2, 0, 1);

    session.tick(&mut presenter);
    session.tick(&mut presenter);
    assert_eq!(session.entities()[0].row, 0, "divisor 3 holds for two ticks");
    assert_eq!(session.entities()[1].row, 2, "pickups fall every tick");

    session.tick(&mut presenter);
    assert_eq!(session.entities()[0].row, 1, "divisor 3 advances on tick 3");
    assert_eq!(session.entities()[1].row, 3);
}

#[test]
fn pickup_restores_fuel_and_scores_twenty() {
    let mut session = GameSession::new(quiet(250));
    let mut presenter = NullPresenter::default();

    session.debug_set_fuel(80.0);
    session.debug_place(EntityKind::Pickup, GameSession::STARTING_LANE, 6, 1);

    assert_eq!(session.tick(&mut presenter), TickOutcome::Continue);
    // 80 + 10, minus one tick of decay (2.0 %/s over 250 ms).
    assert!((session.fuel() - 89.5).abs() < 1e-9);
    assert_eq!(session.score(), 20);
    assert!(session.entities().is_empty(), "collected can is removed");
    assert_eq!(session.cars_dodged(), 0, "pickups are not dodged cars");

    // The bonus survives later recomputes.
    session.tick(&mut presenter);
    assert_eq!(session.score(), 20);
}

#[test]
fn pickup_clamps_fuel_at_one_hundred() {
    let mut session = GameSession::new(quiet(250));
    let mut presenter = NullPresenter::default();

    session.debug_set_fuel(95.0);
    session.debug_place(EntityKind::Pickup, GameSession::STARTING_LANE, 6, 1);

    session.tick(&mut presenter);
    assert!((session.fuel() - 99.5).abs() < 1e-9);
}

#[test]
fn out_of_fuel_fires_exactly_on_the_crossing_tick() {
    // 450 ms ticks drain 0.9% each.
    let mut session = GameSession::new(quiet(450));
    let mut presenter = NullPresenter::default();

    session.debug_set_fuel(1.0);
    assert_eq!(session.tick(&mut presenter), TickOutcome::Continue);
    assert_eq!(session.tick(&mut presenter), TickOutcome::OutOfFuel);
    assert_eq!(session.fuel(), 0.0);
}

#[test]
fn fuel_band_tracks_gauge_thresholds() {
    assert_eq!(FuelBand::for_level(80.0), FuelBand::Ok);
    assert_eq!(FuelBand::for_level(50.0), FuelBand::Low);
    assert_eq!(FuelBand::for_level(30.0), FuelBand::Low);
    assert_eq!(FuelBand::for_level(25.0), FuelBand::Critical);
    assert_eq!(FuelBand::for_level(10.0), FuelBand::Critical);
}

#[test]
fn lane_moves_issue_animation_commands() {
    let mut session = GameSession::new(quiet(450));
    let mut presenter = RecordingPresenter::default();

    session.move_player(Direction::Right, &mut presenter);

    assert_eq!(presenter.animations.len(), 1);
    let (offset, duration_ms, easing) = presenter.animations[0];
    assert!((offset - lane_offset(2, 300.0)).abs() < 1e-9);
    assert_eq!(duration_ms, 200);
    assert_eq!(easing, Easing::CubicOut);
}

#[test]
fn removed_entities_take_their_sprites_down() {
    let mut session = GameSession::new(quiet(450));
    let mut presenter = RecordingPresenter::default();

    let id = session.debug_place(EntityKind::Enemy, 0, PLAYER_ROW, 1);
    session.tick(&mut presenter);

    assert_eq!(presenter.removed, vec![id]);
}

#[test]
fn lane_offsets_are_symmetric_around_center() {
    assert!((lane_offset(0, 300.0) + 65.0).abs() < 1e-9);
    assert_eq!(lane_offset(1, 300.0), 0.0);
    assert!((lane_offset(2, 300.0) - 65.0).abs() < 1e-9);
}

#[test]
fn engine_records_high_score_on_collision() {
    let mut engine = GameEngine::new(Box::new(MemoryStore::new()));
    let mut presenter = RecordingPresenter::default();

    engine.start_with_config(&mut presenter, quiet(250));
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(presenter.sprites, vec![CarColor::Blue]);

    // Land a recompute so the bonus is in the score, then crash.
    let session = engine.debug_session_mut().unwrap();
    session.debug_set_pickup_bonus(50);
    engine.tick(&mut presenter);

    let session = engine.debug_session_mut().unwrap();
    session.debug_place(EntityKind::Enemy, GameSession::STARTING_LANE, PLAYER_ROW, 3);
    engine.tick(&mut presenter);

    assert_eq!(engine.phase(), GamePhase::GameOver);
    assert_eq!(engine.high_score(), 50);
    assert_eq!(engine.settings().get_int(KEY_HIGH_SCORE, 0), 50);

    let report = engine.report().expect("terminal run must produce a report");
    assert_eq!(report.cause, GameOverCause::Collision);
    assert_eq!(report.final_score, 50);
    assert_eq!(report.cars_dodged, 0);
    assert_eq!(report.high_score, 50);
}

#[test]
fn high_score_is_monotonic_across_sessions() {
    let mut engine = GameEngine::new(Box::new(MemoryStore::new()));
    let mut presenter = NullPresenter::default();

    for bonus in [5, 20, 3] {
        engine.start_with_config(&mut presenter, quiet(450));
        let session = engine.debug_session_mut().unwrap();
        session.debug_set_pickup_bonus(bonus);
        session.debug_set_fuel(0.1);
        engine.tick(&mut presenter);
        assert_eq!(engine.phase(), GamePhase::OutOfFuel);
    }

    assert_eq!(engine.high_score(), 20);
    assert_eq!(engine.settings().get_int(KEY_HIGH_SCORE, 0), 20);
    assert_eq!(engine.report().unwrap().high_score, 20);
    assert_eq!(engine.report().unwrap().final_score, 3);
}

#[test]
fn reset_reinitializes_every_mutable_field() {
    let mut engine = GameEngine::new(Box::new(MemoryStore::new()));
    let mut presenter = NullPresenter::default();

    engine.start_with_config(&mut presenter, quiet(450));
    let session = engine.debug_session_mut().unwrap();
    session.debug_set_fuel(0.1);
    engine.tick(&mut presenter);
    assert_eq!(engine.phase(), GamePhase::OutOfFuel);

    engine.reset(&mut presenter, 11);
    assert_eq!(engine.phase(), GamePhase::Playing);

    let snapshot = engine.snapshot().unwrap();
    assert_eq!(snapshot.fuel, GameSession::STARTING_FUEL);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.cars_dodged, 0);
    assert_eq!(snapshot.player_lane, GameSession::STARTING_LANE);
    assert_eq!(snapshot.elapsed_seconds, 0);
    assert!(snapshot.entities.is_empty());
}

#[test]
fn ticks_outside_playing_do_not_advance_the_game() {
    let mut engine = GameEngine::new(Box::new(MemoryStore::new()));
    let mut presenter = NullPresenter::default();

    // Idle: no session, nothing to report.
    assert!(engine.tick(&mut presenter).is_none());

    engine.start_with_config(&mut presenter, quiet(450));
    let session = engine.debug_session_mut().unwrap();
    session.debug_set_fuel(0.1);
    engine.tick(&mut presenter);
    assert_eq!(engine.phase(), GamePhase::OutOfFuel);

    let ticks_before = engine.stats().ticks;
    let snapshot = engine.tick(&mut presenter);
    assert!(snapshot.is_some(), "terminal phases still report state");
    assert_eq!(engine.stats().ticks, ticks_before);
}

#[test]
fn game_over_clears_the_road() {
    let mut engine = GameEngine::new(Box::new(MemoryStore::new()));
    let mut presenter = NullPresenter::default();

    engine.start_with_config(&mut presenter, quiet(450));
    let session = engine.debug_session_mut().unwrap();
    session.debug_place(EntityKind::Enemy, 0, 3, 2);
    session.debug_place(EntityKind::Pickup, 2, 4, 1);
    session.debug_set_fuel(0.1);
    engine.tick(&mut presenter);

    assert_eq!(engine.phase(), GamePhase::OutOfFuel);
    assert!(engine.snapshot().unwrap().entities.is_empty());
}
