//! Page session: the unlock store plus whichever engines are mounted
//!
//! The frontend forwards raw input here and calls `frame` once per
//! animation frame. Input is only routed to the game that is currently
//! selected for the current layout.

use glam::Vec2;

use crate::consts::*;
use crate::section::Section;
use crate::settings::Settings;
use crate::sim::{Direction, Effects, Maze, MoveOutcome, ParticleField, ShotOutcome, Shooter};
use crate::unlock::UnlockState;

/// Desktop mini-game choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameKind {
    #[default]
    Shooter,
    Maze,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Shooter => "shooter",
            GameKind::Maze => "maze",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shooter" => Some(GameKind::Shooter),
            "maze" => Some(GameKind::Maze),
            _ => None,
        }
    }

    /// One-line instructions shown under the game title
    pub fn hint(&self) -> &'static str {
        match self {
            GameKind::Shooter => "Aim with your mouse and click to shoot targets.",
            GameKind::Maze => "Use arrow keys to move and collect keys.",
        }
    }
}

/// Hint for the compact layout, where the platform jumper replaces both games
pub const COMPACT_HINT: &str = "Tap a platform to jump and explore.";

/// Short-lived message such as the reset confirmation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Notice {
    pub text: &'static str,
    /// Seconds left on screen
    pub remaining: f32,
}

pub struct Session {
    pub unlocks: UnlockState,
    pub maze: Maze,
    pub background: ParticleField,
    pub effects: Effects,
    game: GameKind,
    compact: bool,
    /// Some only while the shooter is on screen
    shooter: Option<Shooter>,
    arena: Option<Vec2>,
    accumulator: f32,
    animate_background: bool,
    seed: u64,
    /// Shooter mounts so far (each gets its own seed)
    mounts: u64,
    /// Shot outcomes since the last drain
    outcomes: Vec<ShotOutcome>,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let mut session = Self {
            unlocks: UnlockState::new(),
            maze: Maze::default(),
            background: ParticleField::new(
                seed ^ 0x9e37_79b9_7f4a_7c15,
                settings.quality.max_particles(),
                settings.particle_area,
            ),
            effects: Effects::new(seed.rotate_left(17), settings.effective_effects()),
            game: GameKind::default(),
            compact: false,
            shooter: None,
            arena: None,
            accumulator: 0.0,
            animate_background: settings.animate_background(),
            seed,
            mounts: 0,
            outcomes: Vec::new(),
            notice: None,
        };
        session.sync_mounts();
        session
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn shooter(&self) -> Option<&Shooter> {
        self.shooter.as_ref()
    }

    pub fn arena(&self) -> Option<Vec2> {
        self.arena
    }

    /// Instructions for whatever is on screen
    pub fn hint(&self) -> &'static str {
        if self.compact { COMPACT_HINT } else { self.game.hint() }
    }

    /// Message to show right now, if any
    pub fn notice(&self) -> Option<&'static str> {
        self.notice.map(|n| n.text)
    }

    pub fn select_game(&mut self, game: GameKind) {
        if self.game == game {
            return;
        }
        self.game = game;
        log::info!("Switched to {}", game.as_str());
        self.sync_mounts();
    }

    pub fn set_compact_layout(&mut self, compact: bool) {
        if self.compact == compact {
            return;
        }
        self.compact = compact;
        log::info!("Compact layout {}", if compact { "on" } else { "off" });
        self.sync_mounts();
    }

    /// Mount or drop the shooter to match the current game and layout
    fn sync_mounts(&mut self) {
        let wanted = self.game == GameKind::Shooter && !self.compact;
        match (wanted, self.shooter.is_some()) {
            (true, false) => {
                let mut shooter = Shooter::new(self.seed.wrapping_add(self.mounts));
                self.mounts += 1;
                shooter.resize(self.arena);
                shooter.observe(&self.unlocks);
                self.shooter = Some(shooter);
            }
            (false, true) => {
                // In-flight shots go with it
                self.shooter = None;
            }
            _ => {}
        }
    }

    /// Game surface was measured (None when it has no size)
    pub fn resize_arena(&mut self, size: Option<Vec2>) {
        self.arena = size.filter(|s| s.x > 0.0 && s.y > 0.0);
        if let Some(shooter) = &mut self.shooter {
            shooter.resize(self.arena);
        }
    }

    pub fn resize_background(&mut self, size: Vec2) {
        self.background.resize(size);
    }

    /// Arrow key; only the desktop maze listens
    pub fn key_down(&mut self, dir: Direction) -> Option<MoveOutcome> {
        if self.game != GameKind::Maze || self.compact {
            return None;
        }
        Some(self.maze.step(dir, &mut self.unlocks))
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if let Some(shooter) = &mut self.shooter {
            shooter.pointer_move(pos);
        }
    }

    pub fn pointer_leave(&mut self) {
        if let Some(shooter) = &mut self.shooter {
            shooter.pointer_leave();
        }
    }

    /// Click on the game surface; true if a shot was fired
    pub fn click(&mut self, pos: Vec2) -> bool {
        self.shooter.as_mut().is_some_and(|s| s.fire(pos))
    }

    pub fn background_pointer(&mut self, pos: Option<Vec2>) {
        self.background.set_pointer(pos);
    }

    /// Navigation button; locked sections are ignored
    pub fn navigate(&mut self, section: Section) -> bool {
        self.unlocks.set_active(section)
    }

    /// Platform jump in the compact layout
    pub fn tap_platform(&mut self, section: Section) -> bool {
        if !self.compact {
            return false;
        }
        self.unlocks.unlock(section);
        true
    }

    pub fn reset(&mut self) {
        self.unlocks.reset();
        self.maze.reset();
        self.accumulator = 0.0;
        if let Some(shooter) = &mut self.shooter {
            shooter.observe(&self.unlocks);
        }
        self.notice = Some(Notice {
            text: RESET_NOTICE,
            remaining: NOTICE_DURATION,
        });
    }

    /// Advance by a wall-clock delta; returns the number of fixed steps run
    pub fn frame(&mut self, dt: f32) -> u32 {
        if dt.is_finite() {
            self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
            // Notices run on wall-clock time, not simulation time
            if let Some(notice) = &mut self.notice {
                notice.remaining -= dt.max(0.0);
                if notice.remaining <= 0.0 {
                    self.notice = None;
                }
            }
        }

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Drop time we could not catch up on
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// One fixed 60 Hz step
    pub fn step(&mut self) {
        if let Some(shooter) = &mut self.shooter {
            let outcomes = shooter.tick(SIM_DT, &mut self.unlocks, &mut self.effects);
            self.outcomes.extend(outcomes);
        }
        if self.animate_background {
            self.background.tick(SIM_DT);
        }
        self.effects.tick(SIM_DT);
    }

    pub fn drain_outcomes(&mut self) -> Vec<ShotOutcome> {
        std::mem::take(&mut self.outcomes)
    }

    /// Maze player marker colour (follows the active section)
    pub fn player_color(&self) -> [f32; 4] {
        self.unlocks.active().style().color
    }
}
