use formdrill_core::{
    MemoryStore, Notice, Phase, PracticeMode, SessionConfig, SessionEngine, StorageKeys,
    TierSelector,
};

fn quick_config() -> SessionConfig {
    SessionConfig {
        duration_seconds: 0.05,
        ..SessionConfig::default()
    }
}

#[test]
fn practice_arc_accumulates_rounds_and_streaks() {
    let mut engine = SessionEngine::new(MemoryStore::new(), quick_config(), 1);
    engine.start();

    for _ in 0..3 {
        let completed = engine.tick(0.05);
        assert!(completed.is_some(), "each full cycle completes a round");
    }
    assert_eq!(engine.stats().total_rounds, 3);
    assert_eq!(engine.counters().session_rounds, 3);
    assert_eq!(engine.counters().session_streak, 3);
    assert_eq!(engine.stats().best_streak, 3);
    assert!((engine.stats().total_time - 0.15).abs() < 1e-9);

    engine.skip();
    assert_eq!(engine.counters().session_streak, 0);
    assert_eq!(engine.counters().session_rounds, 3);

    // Streak rebuilds; the best streak stays at its high-water mark until beaten.
    engine.tick(0.05);
    assert_eq!(engine.counters().session_streak, 1);
    assert_eq!(engine.stats().best_streak, 3);
}

#[test]
fn pausing_freezes_the_countdown() {
    let mut engine = SessionEngine::new(MemoryStore::new(), SessionConfig::default(), 2);
    engine.start();
    engine.tick(0.05);
    let frozen = engine.remaining_seconds();

    engine.pause();
    assert_eq!(engine.phase(), Phase::Paused);
    assert!(engine.tick(0.05).is_none());
    assert!((engine.remaining_seconds() - frozen).abs() < f64::EPSILON);
}

#[test]
fn replay_walks_the_bank_round_robin_across_advances() {
    let mut engine = SessionEngine::new(MemoryStore::new(), quick_config(), 3);

    let mut recorded = Vec::new();
    for _ in 0..3 {
        engine.mark_mistake();
        recorded.push(*engine.selection());
        engine.skip();
    }

    let mut config = engine.config().clone();
    config.mode = PracticeMode::RepeatMistakes;
    engine.apply_config(config);

    for expected in &recorded {
        let replayed = engine.skip();
        assert!(replayed.replayed);
        assert_eq!(replayed.shape.id, expected.shape.id);
        assert_eq!(replayed.orientation, expected.orientation);
    }
    // Cursor wrapped: the fourth replay repeats the first record.
    let wrapped = engine.skip();
    assert_eq!(wrapped.shape.id, recorded[0].shape.id);
    assert_eq!(wrapped.orientation, recorded[0].orientation);
}

#[test]
fn replay_of_unknown_shape_falls_back_to_the_default() {
    let store = MemoryStore::new();
    store.seed(
        "shape_trainer_mistakes_v1",
        r#"[{"shapeId":"obelisk","tier":1,"orientation":[0.0,1.0,0.0,0.0]}]"#,
    );
    let config = SessionConfig {
        mode: PracticeMode::RepeatMistakes,
        ..SessionConfig::default()
    };
    let engine = SessionEngine::new(store, config, 4);

    let selection = engine.selection();
    assert!(selection.replayed);
    assert_eq!(selection.shape.id, "cube");
    assert_eq!(selection.orientation.as_array(), [0.0, 1.0, 0.0, 0.0]);
}

#[test]
fn starting_in_repeat_mode_with_nothing_recorded_reverts() {
    let config = SessionConfig {
        mode: PracticeMode::RepeatMistakes,
        ..SessionConfig::default()
    };
    let mut engine = SessionEngine::new(MemoryStore::new(), config, 5);

    assert_eq!(engine.config().mode, PracticeMode::Normal);
    assert!(!engine.selection().replayed);
    assert_eq!(engine.take_notices(), vec![Notice::MistakeBankEmpty]);
}

#[test]
fn fixed_tier_sessions_never_leave_the_tier() {
    let config = SessionConfig {
        duration_seconds: 0.05,
        tier: TierSelector::Tier(1),
        ..SessionConfig::default()
    };
    let mut engine = SessionEngine::new(MemoryStore::new(), config, 6);
    engine.start();
    assert_eq!(engine.selection().shape.tier, 1);
    for _ in 0..12 {
        let selection = engine.tick(0.05).expect("cycle completes");
        assert_eq!(selection.shape.tier, 1);
    }
}

#[test]
fn keep_angle_survives_rounds_until_the_pool_excludes_the_shape() {
    let config = SessionConfig {
        duration_seconds: 0.05,
        keep_angle: true,
        ..SessionConfig::default()
    };
    let mut engine = SessionEngine::new(MemoryStore::new(), config, 7);
    engine.start();
    let kept = engine.selection().shape.id;
    let kept_tier = engine.selection().shape.tier;

    let mut poses = Vec::new();
    for _ in 0..4 {
        let selection = engine.tick(0.05).expect("cycle completes");
        assert_eq!(selection.shape.id, kept);
        poses.push(selection.orientation);
    }
    // Same shape, fresh poses.
    assert!(poses.windows(2).any(|pair| pair[0] != pair[1]));

    // Narrow the pool to a tier that excludes the kept shape.
    let other_tier = if kept_tier == 3 { 1 } else { 3 };
    let mut config = engine.config().clone();
    config.tier = TierSelector::Tier(other_tier);
    engine.apply_config(config);
    let replaced = engine.tick(0.05).expect("cycle completes");
    assert_eq!(replaced.shape.tier, other_tier);
}

#[test]
fn custom_keys_isolate_parallel_sessions() {
    let store = MemoryStore::new();
    let keys_a = StorageKeys {
        stats: "drill_a_stats_v1".to_string(),
        mistakes: "drill_a_mistakes_v1".to_string(),
    };
    let keys_b = StorageKeys {
        stats: "drill_b_stats_v1".to_string(),
        mistakes: "drill_b_mistakes_v1".to_string(),
    };

    let mut first = SessionEngine::with_keys(store.clone(), keys_a.clone(), quick_config(), 8);
    first.start();
    first.tick(0.05);
    first.mark_mistake();

    let second = SessionEngine::with_keys(store, keys_b, quick_config(), 9);
    assert_eq!(second.stats().total_rounds, 0);
    assert_eq!(second.mistake_count(), 0);
}
