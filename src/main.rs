//! Headless soak runner (default binary).
//!
//! Plays whole games against a deterministic pseudo-random input bot and
//! prints one JSON `FinalStats` line per game. Useful for smoke-testing
//! configs and for replaying a seed.
//!
//! ```text
//! classic-tetris [--seed N] [--games N] [--frames N] [--config PATH]
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use classic_tetris::core::SimpleRng;
use classic_tetris::engine::{EngineConfig, GameEngine};
use classic_tetris::types::{FinalStats, GameStatus, InputSnapshot};

/// Milliseconds reported per update; slightly over one 60 Hz frame.
const UPDATE_MS: u32 = 17;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunConfig {
    seed: Option<u32>,
    games: u32,
    /// Per-game update cap; a game still running is cut off here
    max_frames: u32,
    config_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            games: 1,
            max_frames: 60 * 60 * 10,
            config_path: None,
        }
    }
}

fn parse_run_args(args: &[String]) -> Result<RunConfig> {
    let mut cfg = RunConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--seed" | "--games" | "--frames" | "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for {}", flag))?;
                match flag {
                    "--seed" => cfg.seed = Some(parse_number(flag, v)?),
                    "--games" => cfg.games = parse_number(flag, v)?,
                    "--frames" => cfg.max_frames = parse_number(flag, v)?,
                    _ => cfg.config_path = Some(PathBuf::from(v)),
                }
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(cfg)
}

fn parse_number(flag: &str, v: &str) -> Result<u32> {
    v.parse::<u32>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

/// Random button masher: holds a direction for a few frames at a time and
/// taps rotate or hard drop at the start of each hold.
struct InputBot {
    rng: SimpleRng,
    held: InputSnapshot,
    frames_left: u32,
}

impl InputBot {
    fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed ^ 0x9E37_79B9),
            held: InputSnapshot::default(),
            frames_left: 0,
        }
    }

    fn next_input(&mut self) -> InputSnapshot {
        if self.frames_left > 0 {
            self.frames_left -= 1;
            return self.held;
        }

        let dir = self.rng.next_range(10);
        self.held = InputSnapshot {
            left: dir < 3,
            right: (3..6).contains(&dir),
            down: dir == 6,
            ..InputSnapshot::default()
        };
        self.frames_left = 3 + self.rng.next_range(12);

        // Edges only on the first frame of a hold, so every tap is a fresh press.
        InputSnapshot {
            rotate_cw: self.rng.next_range(3) == 0,
            rotate_ccw: self.rng.next_range(8) == 0,
            hard_drop: self.rng.next_range(5) == 0,
            ..self.held
        }
    }
}

fn play_game(engine: &mut GameEngine, bot: &mut InputBot, max_frames: u32) -> FinalStats {
    let enter = InputSnapshot {
        enter: true,
        ..InputSnapshot::default()
    };
    // Back to the menu in case the previous game hit the frame cap.
    engine.reset();
    engine.update(0, InputSnapshot::default());
    engine.update(0, enter);

    for _ in 0..max_frames {
        let snap = engine.update(UPDATE_MS, bot.next_input());
        if snap.status == GameStatus::GameOver {
            break;
        }
    }

    engine.final_stats().unwrap_or_else(|| FinalStats {
        score: engine.score(),
        level: engine.level(),
        lines: engine.lines(),
        duration_ms: engine.played_ms(),
    })
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let run = parse_run_args(&args)?;

    let mut config = match &run.config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = run.seed {
        config.seed = seed;
    }

    let mut engine = GameEngine::new(config);
    let mut bot = InputBot::new(config.seed);
    for _ in 0..run.games {
        let stats = play_game(&mut engine, &mut bot, run.max_frames);
        println!("{}", serde_json::to_string(&stats)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_run_args_uses_defaults() {
        let cfg = parse_run_args(&[]).unwrap();
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn parse_run_args_parses_all_flags() {
        let cfg = parse_run_args(&args(&[
            "--seed", "42", "--games", "3", "--frames", "500", "--config", "tuning.json",
        ]))
        .unwrap();
        assert_eq!(
            cfg,
            RunConfig {
                seed: Some(42),
                games: 3,
                max_frames: 500,
                config_path: Some(PathBuf::from("tuning.json")),
            }
        );
    }

    #[test]
    fn parse_run_args_rejects_bad_input() {
        assert!(parse_run_args(&args(&["--seed"])).is_err());
        assert!(parse_run_args(&args(&["--games", "many"])).is_err());
        assert!(parse_run_args(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn bot_games_are_deterministic() {
        let run = |seed| {
            let config = EngineConfig {
                seed,
                ..EngineConfig::default()
            };
            let mut engine = GameEngine::new(config);
            let mut bot = InputBot::new(seed);
            play_game(&mut engine, &mut bot, 3_000)
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn bot_game_ends_or_hits_frame_cap() {
        let mut engine = GameEngine::new(EngineConfig::default());
        let mut bot = InputBot::new(1);
        let stats = play_game(&mut engine, &mut bot, 20_000);
        assert!(stats.duration_ms > 0);
        assert!(stats.duration_ms <= 20_000 * UPDATE_MS as u64);
    }
}
