//! Portfolio Quest - a portfolio page you unlock by playing
//!
//! Core modules:
//! - `section`: The closed set of content sections and their styling
//! - `unlock`: Session-wide unlock state shared by every game
//! - `sim`: Deterministic simulation (maze, shooter, particle field, effects)
//! - `session`: Input routing, game mounting and the fixed-timestep loop
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser listener / animation-frame subscriptions
//! - `joke`: Joke panel state around the remote joke fetch
//! - `settings`: Static, page-provided configuration

pub mod joke;
pub mod platform;
pub mod renderer;
pub mod section;
pub mod session;
pub mod settings;
pub mod sim;
pub mod unlock;

pub use section::{Section, SectionStyle};
pub use session::{GameKind, Session};
pub use settings::{QualityPreset, Settings};
pub use unlock::{UnlockEvent, UnlockState};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Shown after the player resets the game
    pub const RESET_NOTICE: &str = "Game Reset!";
    /// How long a notice stays up (seconds)
    pub const NOTICE_DURATION: f32 = 2.0;

    /// Maze grid side length
    pub const GRID_SIZE: usize = 17;

    /// Target box side (pixels)
    pub const TARGET_SIZE: f32 = 80.0;
    /// Keep freshly spawned targets this far from the arena edge
    pub const TARGET_SPAWN_MARGIN: f32 = 40.0;
    /// Max spawn speed per axis (pixels/s)
    pub const TARGET_MAX_SPEED: f32 = 45.0;
    /// Per-tick velocity multiplier for targets whose section is unlocked
    pub const TARGET_DAMPING: f32 = 0.98;
    /// Knockback added along the shot direction on a hit (pixels/s)
    pub const HIT_IMPULSE: f32 = 150.0;
    /// Hits an unlocked target survives before it shatters
    pub const DESTROY_THRESHOLD: u32 = 4;

    /// Shot collision sampling interval (finer than SIM_DT)
    pub const SHOT_POLL_DT: f32 = 1.0 / 120.0;
    /// How long a projectile lives (seconds)
    pub const SHOT_LIFETIME: f32 = 0.5;
    /// Projectile box (pixels)
    pub const PROJECTILE_WIDTH: f32 = 8.0;
    pub const PROJECTILE_HEIGHT: f32 = 16.0;
    /// Launcher sits this far above the arena floor
    pub const LAUNCH_OFFSET: f32 = 20.0;
    /// Wall impacts are pulled this far inside the arena
    pub const WALL_IMPACT_INSET: f32 = 2.0;

    /// Surface area (px²) per background particle
    pub const PARTICLE_AREA: f32 = 20_000.0;
    /// Max spawn speed per axis (pixels/s)
    pub const PARTICLE_MAX_SPEED: f32 = 15.0;
    pub const PARTICLE_MIN_RADIUS: f32 = 1.0;
    pub const PARTICLE_RADIUS_RANGE: f32 = 1.5;
    /// Pointer repulsion reach (pixels)
    pub const REPULSION_RADIUS: f32 = 100.0;
    /// Velocity change at zero distance, applied once per tick (pixels/s)
    pub const REPULSION_STRENGTH: f32 = 60.0;
    pub const PARTICLE_DAMPING: f32 = 0.98;
    /// Particles closer than this get a connecting line
    pub const LINK_DISTANCE: f32 = 120.0;
}
