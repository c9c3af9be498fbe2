//! Game engine - ties board, generator, scoring and timing together
//!
//! The host calls [`GameEngine::update`] once per animation frame with the
//! elapsed time and the current input. Elapsed time is converted into fixed
//! 60 Hz frames; each frame processes input, then gravity, then lock
//! resolution, and the snapshot is built once at the end.
//!
//! Locking is atomic with respect to play: from the moment a piece locks until
//! the next piece spawns there is no active piece, so neither gravity nor input
//! can act on one. Full rows flash first, are removed after the flash, and the
//! entry delay (ARE) runs before the next spawn.

use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::core::{
    are_frames, try_rotate, AutoShift, Board, FrameClock, GameSnapshot, Gravity, Piece,
    PieceGenerator, Scoring, Shift,
};
use crate::events::{EventSink, NullSink};
use crate::types::{FinalStats, GameEvent, GameStatus, InputSnapshot, PieceKind, FRAME_US};

/// Outcome of a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateResult {
    Rotated,
    /// Target orientation collided; the piece is unchanged
    Rejected,
    /// No active piece to rotate
    NoPiece,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockKind {
    Soft,
    Hard,
}

/// What the playfield is doing inside the `Playing` status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No game running
    Idle,
    Falling(Piece),
    /// Full rows are flashing; they are removed when the countdown ends
    LineClear {
        /// Bit `y` set for each full board row
        rows: u32,
        frames_left: u32,
        entry_frames: u32,
    },
    /// Entry delay before the next piece appears
    Entry { frames_left: u32 },
}

/// Edge-triggered inputs held until a frame runs
#[derive(Debug, Clone, Copy, Default)]
struct Latched {
    /// Last direction pressed since the previous frame
    shift: Option<Shift>,
    rotate_cw: bool,
    rotate_ccw: bool,
    hard_drop: bool,
}

/// Complete simulation for one player
#[derive(Debug)]
pub struct GameEngine<S: EventSink = NullSink> {
    config: EngineConfig,
    board: Board,
    generator: PieceGenerator,
    scoring: Scoring,
    status: GameStatus,
    phase: Phase,
    next: Option<PieceKind>,
    gravity: Gravity,
    auto_shift: AutoShift,
    clock: FrameClock,
    prev_input: InputSnapshot,
    latched: Latched,
    played_us: u64,
    games_started: u32,
    final_stats: Option<FinalStats>,
    sink: S,
}

impl GameEngine<NullSink> {
    /// Create an engine that discards events
    pub fn new(config: EngineConfig) -> Self {
        Self::with_sink(config, NullSink)
    }
}

impl Default for GameEngine<NullSink> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<S: EventSink> GameEngine<S> {
    /// Create an engine reporting to `sink`; starts in the menu
    pub fn with_sink(config: EngineConfig, sink: S) -> Self {
        Self {
            config,
            board: Board::new(),
            generator: PieceGenerator::new(config.randomizer, config.seed),
            scoring: Scoring::new(config.scoring, config.start_level),
            status: GameStatus::Menu,
            phase: Phase::Idle,
            next: None,
            gravity: Gravity::default(),
            auto_shift: AutoShift::default(),
            clock: FrameClock::default(),
            prev_input: InputSnapshot::default(),
            latched: Latched::default(),
            played_us: 0,
            games_started: 0,
            final_stats: None,
            sink,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The piece under player control, if any
    pub fn current_piece(&self) -> Option<Piece> {
        match self.phase {
            Phase::Falling(piece) => Some(piece),
            _ => None,
        }
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.scoring.score()
    }

    pub fn level(&self) -> u32 {
        self.scoring.level()
    }

    pub fn lines(&self) -> u32 {
        self.scoring.lines()
    }

    /// Stats of the last finished game
    pub fn final_stats(&self) -> Option<FinalStats> {
        self.final_stats
    }

    /// Simulated play time of the current game
    pub fn played_ms(&self) -> u64 {
        self.played_us / 1_000
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Clear the board and score, draw the first two pieces and start playing
    pub fn start_game(&mut self) {
        if self.games_started > 0 {
            // Continue the RNG stream so consecutive games differ.
            self.generator = PieceGenerator::new(self.config.randomizer, self.generator.seed());
        }
        self.games_started = self.games_started.wrapping_add(1);

        self.board.clear();
        self.scoring.reset();
        self.reset_timers();
        self.played_us = 0;
        self.final_stats = None;

        let first = self.generator.next_piece();
        self.next = Some(self.generator.next_piece());
        self.status = GameStatus::Playing;
        debug!(game = self.games_started, ?first, "game started");
        self.spawn(first);
    }

    /// Playing -> Paused; everything, including the combo window, freezes
    pub fn pause_game(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
            debug!("game paused");
        }
    }

    /// Paused -> Playing
    pub fn resume_game(&mut self) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
            self.clock.reset();
            debug!("game resumed");
        }
    }

    /// Abandon any game in progress and return to the menu
    pub fn reset(&mut self) {
        self.board.clear();
        self.scoring.reset();
        self.reset_timers();
        self.phase = Phase::Idle;
        self.next = None;
        self.status = GameStatus::Menu;
        self.played_us = 0;
        self.final_stats = None;
        debug!("engine reset");
    }

    fn reset_timers(&mut self) {
        self.gravity.reset();
        self.auto_shift.reset();
        self.clock.reset();
        self.latched = Latched::default();
    }

    /// Advance the simulation by `elapsed_ms` with the given held inputs
    ///
    /// Outside `Playing` nothing advances; only the meta inputs are honored
    /// (pause resumes, enter starts a game, reset returns to the menu).
    pub fn update(&mut self, elapsed_ms: u32, input: InputSnapshot) -> GameSnapshot {
        let pressed = input.pressed_since(&self.prev_input);
        self.prev_input = input;

        if pressed.music_toggle {
            self.emit(GameEvent::MusicToggled);
        }
        if pressed.reset {
            self.reset();
            return self.snapshot();
        }

        match self.status {
            GameStatus::Playing if pressed.pause => {
                self.pause_game();
                return self.snapshot();
            }
            GameStatus::Playing => {}
            GameStatus::Paused => {
                if pressed.pause {
                    self.resume_game();
                }
                return self.snapshot();
            }
            GameStatus::Menu | GameStatus::GameOver => {
                if pressed.enter {
                    self.start_game();
                }
                return self.snapshot();
            }
        }

        if let Some(tap) = Shift::from_held(pressed.left, pressed.right) {
            self.latched.shift = Some(tap);
        }
        self.latched.rotate_cw |= pressed.rotate_cw;
        self.latched.rotate_ccw |= pressed.rotate_ccw;
        self.latched.hard_drop |= pressed.hard_drop;

        let frames = self.clock.advance(elapsed_ms);
        for _ in 0..frames {
            self.step_frame(&input);
            if self.status != GameStatus::Playing {
                break;
            }
        }

        self.snapshot()
    }

    /// Build the read-only view for renderers
    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let current = self.current_piece();
        out.capture_board(&self.board, current.as_ref());
        out.next = self.next;
        out.score = self.scoring.score();
        out.level = self.scoring.level();
        out.lines = self.scoring.lines();
        out.status = self.status;
        out.capture_flash(match self.phase {
            Phase::LineClear { rows, .. } => rows,
            _ => 0,
        });
    }

    /// One 60 Hz frame: input, then gravity, then lock resolution
    fn step_frame(&mut self, input: &InputSnapshot) {
        // Combo window and game time drain by simulated frames only.
        let before_ms = self.played_ms();
        self.played_us += FRAME_US;
        self.scoring.tick((self.played_ms() - before_ms) as u32);

        let edges = std::mem::take(&mut self.latched);
        // DAS charges in every phase, even with no piece to move.
        let shift = self
            .auto_shift
            .step(Shift::from_held(input.left, input.right), &self.config.timing);

        match self.phase {
            Phase::Idle => {}
            Phase::Falling(_) => self.step_falling(shift, edges, input.soft_drop_held()),
            Phase::LineClear {
                rows,
                frames_left,
                entry_frames,
            } => {
                if frames_left <= 1 {
                    self.finish_line_clear(entry_frames);
                } else {
                    self.phase = Phase::LineClear {
                        rows,
                        frames_left: frames_left - 1,
                        entry_frames,
                    };
                }
            }
            Phase::Entry { frames_left } => {
                if frames_left <= 1 {
                    self.spawn_next();
                } else {
                    self.phase = Phase::Entry {
                        frames_left: frames_left - 1,
                    };
                }
            }
        }
    }

    fn step_falling(&mut self, shift: Option<Shift>, edges: Latched, soft_drop: bool) {
        if let Some(dir) = shift {
            self.move_piece(dir.dx());
        }
        // A tap released before this frame ran still moves once.
        if let Some(tap) = edges.shift.filter(|&tap| Some(tap) != shift) {
            self.move_piece(tap.dx());
        }
        if edges.rotate_cw {
            self.rotate(true);
        }
        if edges.rotate_ccw {
            self.rotate(false);
        }
        if edges.hard_drop {
            self.hard_drop();
            return;
        }

        let level = self.scoring.level();
        if self.gravity.step(level, soft_drop, &self.config.timing) {
            self.fall_one(soft_drop);
        }
    }

    /// The falling piece, only while play is live
    fn live_piece(&self) -> Option<Piece> {
        match (self.status, self.phase) {
            (GameStatus::Playing, Phase::Falling(piece)) => Some(piece),
            _ => None,
        }
    }

    /// Shift the active piece horizontally; false if blocked or no piece
    pub fn move_piece(&mut self, dx: i8) -> bool {
        let Some(piece) = self.live_piece() else {
            return false;
        };
        let moved = piece.shifted(dx, 0);
        if !self.board.is_valid_position(&moved) {
            return false;
        }
        self.phase = Phase::Falling(moved);
        self.emit(GameEvent::Move);
        true
    }

    /// Rotate the active piece under the configured rotation policy
    pub fn rotate(&mut self, clockwise: bool) -> RotateResult {
        let Some(piece) = self.live_piece() else {
            return RotateResult::NoPiece;
        };
        let board = &self.board;
        match try_rotate(&piece, clockwise, self.config.rotation, |p| {
            board.is_valid_position(p)
        }) {
            Some(rotated) => {
                self.phase = Phase::Falling(rotated);
                self.emit(GameEvent::Rotate);
                RotateResult::Rotated
            }
            None => RotateResult::Rejected,
        }
    }

    /// Move the active piece down one cell, or lock it if it cannot fall
    ///
    /// With `soft_drop` the descent earns soft drop points. Returns true if
    /// the piece moved.
    fn fall_one(&mut self, soft_drop: bool) -> bool {
        let Some(piece) = self.live_piece() else {
            return false;
        };
        let below = piece.shifted(0, 1);
        if self.board.is_valid_position(&below) {
            self.phase = Phase::Falling(below);
            if soft_drop {
                self.scoring.add_drop_score(1, false);
            }
            true
        } else {
            self.lock(piece, LockKind::Soft);
            false
        }
    }

    /// Player-driven one-cell drop, scored as soft drop
    pub fn soft_drop(&mut self) -> bool {
        self.fall_one(true)
    }

    /// Drop the active piece to the floor and lock it; returns the distance
    pub fn hard_drop(&mut self) -> Option<u8> {
        let piece = self.live_piece()?;
        let distance = self.board.drop_distance(&piece);
        self.scoring.add_drop_score(distance as u32, true);
        self.lock(piece.shifted(0, distance as i8), LockKind::Hard);
        Some(distance)
    }

    /// Merge the piece into the board and start clear resolution
    fn lock(&mut self, piece: Piece, kind: LockKind) {
        self.board.place_piece(&piece);
        self.phase = Phase::Idle;
        self.emit(match kind {
            LockKind::Soft => GameEvent::SoftLock,
            LockKind::Hard => GameEvent::HardLock,
        });

        let entry_frames = are_frames(piece.lowest_row(), &self.config.timing);
        let rows = self.board.full_row_mask();
        if rows == 0 {
            self.scoring.break_combo();
            if self.board.is_game_over() {
                self.game_over();
            } else {
                self.enter_entry_delay(entry_frames);
            }
            return;
        }

        let flash = self.config.timing.line_clear_flash_frames;
        if flash == 0 {
            self.finish_line_clear(entry_frames);
        } else {
            self.phase = Phase::LineClear {
                rows,
                frames_left: flash,
                entry_frames,
            };
        }
    }

    /// Remove the flashed rows, update score and level, then start ARE
    fn finish_line_clear(&mut self, entry_frames: u32) {
        let rows = self.board.clear_lines();
        let outcome = self.scoring.record_clear(rows.len());

        self.emit(GameEvent::LineClear {
            lines: rows.len() as u32,
        });
        if outcome.award.combo >= 2 {
            self.emit(GameEvent::Combo {
                count: outcome.award.combo,
            });
        }
        if outcome.leveled_up() {
            debug!(level = outcome.level_after, "level up");
            self.emit(GameEvent::LevelUp {
                level: outcome.level_after,
            });
        }

        if self.board.is_game_over() {
            self.game_over();
        } else {
            self.enter_entry_delay(entry_frames);
        }
    }

    fn enter_entry_delay(&mut self, frames: u32) {
        if frames == 0 {
            self.spawn_next();
        } else {
            self.phase = Phase::Entry {
                frames_left: frames,
            };
        }
    }

    fn spawn_next(&mut self) {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.generator.next_piece(),
        };
        self.next = Some(self.generator.next_piece());
        self.spawn(kind);
    }

    fn spawn(&mut self, kind: PieceKind) {
        let piece = Piece::spawn(kind);
        if !self.board.is_valid_position(&piece) {
            self.phase = Phase::Idle;
            self.game_over();
            return;
        }
        trace!(?kind, "spawn");
        self.gravity.reset();
        self.phase = Phase::Falling(piece);
    }

    fn game_over(&mut self) {
        self.status = GameStatus::GameOver;
        self.phase = Phase::Idle;
        self.reset_timers();

        let stats = FinalStats {
            score: self.scoring.score(),
            level: self.scoring.level(),
            lines: self.scoring.lines(),
            duration_ms: self.played_ms(),
        };
        self.final_stats = Some(stats);
        info!(
            score = stats.score,
            level = stats.level,
            lines = stats.lines,
            duration_ms = stats.duration_ms,
            "game over"
        );
        self.emit(GameEvent::GameOver);
        self.sink.on_game_over(&stats);
    }

    fn emit(&mut self, event: GameEvent) {
        self.sink.on_event(event);
    }
}
