//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (targets by section, particles by index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod maze;
pub mod particles;
pub mod shooter;

pub use collision::{Rect, clamp_inside, crosses_boundary, reflect_axis};
pub use effects::{EffectKind, Effects, Spark, VisualEvent};
pub use maze::{Cell, Direction, GridPos, LayoutError, Maze, MazeLayout, MoveOutcome};
pub use particles::{Link, Particle, ParticleField};
pub use shooter::{Projectile, ShotOutcome, Shooter, Target};
