//! Integration tests for the engine's update loop

use classic_tetris::core::pieces::rotation_count;
use classic_tetris::engine::{EngineConfig, GameEngine, Randomizer};
use classic_tetris::types::{GameEvent, GameStatus, InputSnapshot};

/// A little over one 60 Hz frame, so every update runs at least one frame
const STEP_MS: u32 = 17;

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn press(f: impl FnOnce(&mut InputSnapshot)) -> InputSnapshot {
    let mut input = InputSnapshot::default();
    f(&mut input);
    input
}

fn started(seed: u32) -> GameEngine<Vec<GameEvent>> {
    let config = EngineConfig {
        seed,
        ..EngineConfig::default()
    };
    let mut engine = GameEngine::with_sink(config, Vec::new());
    engine.update(0, press(|i| i.enter = true));
    engine.update(0, idle());
    engine
}

#[test]
fn test_game_lifecycle() {
    let mut engine = GameEngine::with_sink(EngineConfig::default(), Vec::new());
    assert_eq!(engine.status(), GameStatus::Menu);

    let snap = engine.update(0, press(|i| i.enter = true));
    assert_eq!(snap.status, GameStatus::Playing);
    assert!(snap.current.is_some());
    assert!(snap.next.is_some());
    assert_eq!((snap.score, snap.lines), (0, 0));

    let snap = engine.update(STEP_MS, press(|i| i.pause = true));
    assert_eq!(snap.status, GameStatus::Paused);

    engine.update(STEP_MS, idle());
    let snap = engine.update(STEP_MS, press(|i| i.pause = true));
    assert_eq!(snap.status, GameStatus::Playing);

    let snap = engine.update(STEP_MS, press(|i| i.reset = true));
    assert_eq!(snap.status, GameStatus::Menu);
    assert!(snap.current.is_none());
}

#[test]
fn test_paused_game_does_not_advance() {
    let mut engine = started(3);
    engine.update(0, press(|i| i.pause = true));
    let before = engine.snapshot();

    for _ in 0..200 {
        let snap = engine.update(STEP_MS, press(|i| {
            i.pause = true;
            i.down = true;
            i.left = true;
        }));
        assert_eq!(snap, before);
    }
    assert_eq!(engine.status(), GameStatus::Paused);
}

#[test]
fn test_gravity_moves_piece_down() {
    let mut engine = started(11);
    let y0 = engine.current_piece().unwrap().y;

    // 47 frames at level 0 is not enough for one cell.
    for _ in 0..47 {
        engine.update(STEP_MS, idle());
    }
    assert_eq!(engine.current_piece().unwrap().y, y0);

    // Well past 48 frames but short of 96.
    for _ in 0..20 {
        engine.update(STEP_MS, idle());
    }
    assert_eq!(engine.current_piece().unwrap().y, y0 + 1);
}

#[test]
fn test_das_moves_once_then_repeats_to_wall() {
    let mut engine = started(5);
    let x0 = engine.current_piece().unwrap().x;
    let right = press(|i| i.right = true);

    engine.update(STEP_MS, right);
    assert_eq!(engine.current_piece().unwrap().x, x0 + 1);

    for _ in 0..10 {
        engine.update(STEP_MS, right);
    }
    assert_eq!(engine.current_piece().unwrap().x, x0 + 1);

    for _ in 0..40 {
        engine.update(STEP_MS, right);
    }
    let piece = engine.current_piece().unwrap();
    assert!(piece.x > x0 + 1);
    assert!(!engine.board().is_valid_position(&piece.shifted(1, 0)));
}

#[test]
fn test_tap_between_frames_moves_once() {
    let mut engine = started(5);
    let x0 = engine.current_piece().unwrap().x;
    engine.sink_mut().clear();

    // 7 ms updates: press and release both land before the first frame is due.
    engine.update(7, press(|i| i.left = true));
    for _ in 0..5 {
        engine.update(7, idle());
    }

    assert_eq!(engine.current_piece().unwrap().x, x0 - 1);
    let moves = engine.sink().iter().filter(|e| **e == GameEvent::Move).count();
    assert_eq!(moves, 1);
}

#[test]
fn test_fast_host_held_press_moves_once() {
    let mut engine = started(5);
    let x0 = engine.current_piece().unwrap().x;
    let left = press(|i| i.left = true);

    // 42 ms of holding is two frames, far short of the DAS delay.
    for _ in 0..6 {
        engine.update(7, left);
    }
    assert_eq!(engine.current_piece().unwrap().x, x0 - 1);
}

#[test]
fn test_rotate_is_edge_triggered() {
    let mut engine = started(8);
    let piece = engine.current_piece().unwrap();
    let turns = rotation_count(piece.kind);
    let rotate = press(|i| i.rotate_cw = true);

    // Holding rotate turns the piece once.
    for _ in 0..10 {
        engine.update(STEP_MS, rotate);
    }
    let expected = 1 % turns;
    assert_eq!(engine.current_piece().unwrap().rotation, expected);
    let rotations = engine
        .sink()
        .iter()
        .filter(|e| **e == GameEvent::Rotate)
        .count();
    assert_eq!(rotations, usize::from(turns > 1));
}

#[test]
fn test_hard_drop_via_input() {
    let mut engine = started(21);
    let snap = engine.snapshot();
    let current = snap.current.unwrap();
    let distance = (snap.ghost_y.unwrap() - current.y) as u32;

    let snap = engine.update(STEP_MS, press(|i| i.hard_drop = true));
    assert!(snap.current.is_none());
    assert_eq!(snap.score, distance * 2);
    assert_eq!(snap.filled_cells(), 4);
    assert!(engine.sink().contains(&GameEvent::HardLock));
}

#[test]
fn test_soft_drop_scores_cells_descended() {
    let mut engine = started(9);
    let y0 = engine.current_piece().unwrap().y;

    for _ in 0..30 {
        engine.update(STEP_MS, press(|i| i.down = true));
    }
    let piece = engine.current_piece().unwrap();
    let descended = (piece.y - y0) as u32;
    assert!(descended >= 2, "soft drop too slow: {descended}");
    assert_eq!(engine.score(), descended);
}

#[test]
fn test_same_seed_same_game() {
    let script = |frame: u32| {
        press(|i| {
            i.left = frame % 40 < 10;
            i.right = (20..30).contains(&(frame % 40));
            i.rotate_cw = frame % 7 == 0;
            i.hard_drop = frame % 50 == 25;
        })
    };

    let mut a = started(77);
    let mut b = started(77);
    for frame in 0..2_000 {
        let sa = a.update(STEP_MS, script(frame));
        let sb = b.update(STEP_MS, script(frame));
        assert_eq!(sa, sb, "diverged at frame {frame}");
    }
    assert_eq!(a.sink(), b.sink());
}

#[test]
fn test_stacking_ends_game_and_restart() {
    let mut engine = started(4);
    let drop = press(|i| i.hard_drop = true);

    let mut updates = 0;
    while engine.status() == GameStatus::Playing && updates < 10_000 {
        engine.update(STEP_MS, drop);
        engine.update(STEP_MS, idle());
        updates += 1;
    }

    assert_eq!(engine.status(), GameStatus::GameOver);
    let stats = engine.final_stats().unwrap();
    assert_eq!(stats.score, engine.score());
    assert!(stats.duration_ms > 0);
    assert_eq!(engine.sink().last(), Some(&GameEvent::GameOver));

    // Game over is terminal until enter.
    let frozen = engine.snapshot();
    assert_eq!(engine.update(1_000, idle()), frozen);

    let snap = engine.update(STEP_MS, press(|i| i.enter = true));
    assert_eq!(snap.status, GameStatus::Playing);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.filled_cells(), 0);
    assert!(engine.final_stats().is_none());
}

#[test]
fn test_music_toggle_in_any_status() {
    let mut engine = GameEngine::with_sink(EngineConfig::default(), Vec::new());
    engine.update(0, press(|i| i.music_toggle = true));
    engine.update(0, idle());
    engine.update(0, press(|i| i.music_toggle = true));

    assert_eq!(
        engine.sink().as_slice(),
        &[GameEvent::MusicToggled, GameEvent::MusicToggled]
    );
    assert_eq!(engine.status(), GameStatus::Menu);
}

#[test]
fn test_bag_randomizer_first_seven_distinct() {
    let config = EngineConfig {
        randomizer: Randomizer::Bag,
        seed: 31,
        ..EngineConfig::default()
    };
    let mut engine = GameEngine::with_sink(config, Vec::new());
    engine.update(0, press(|i| i.enter = true));

    let mut seen = Vec::new();
    let drop = press(|i| i.hard_drop = true);
    while seen.len() < 7 {
        if let Some(piece) = engine.current_piece() {
            seen.push(piece.kind);
            engine.update(STEP_MS, drop);
        }
        engine.update(STEP_MS, idle());
    }
    seen.sort_by_key(|kind| kind.index());
    seen.dedup();
    assert_eq!(seen.len(), 7);
}
