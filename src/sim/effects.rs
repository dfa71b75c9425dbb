//! Transient visual effects (sparks and shatters)
//!
//! Engines only emit `VisualEvent`s. `Effects` turns them into short-lived
//! sparks for the renderer; none of this affects gameplay.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::section::rgb;

/// Maximum live sparks
pub const MAX_SPARKS: usize = 256;

/// Undrained events kept; older ones are dropped first
pub const MAX_PENDING_EMITS: usize = 64;

/// Slate grey used for projectile wall impacts
pub const SHATTER_COLOR: [f32; 4] = rgb(0x94a3b8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Projectile hit the arena wall
    Shatter,
    /// Projectile hit a target
    HitSpark,
    /// Target destroyed
    TargetShatter,
}

/// A one-shot burst request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualEvent {
    pub kind: EffectKind,
    pub origin: Vec2,
    pub color: [f32; 4],
    pub count: u32,
    /// Min/max travel distance (pixels)
    pub spread: (f32, f32),
    /// Seconds
    pub lifetime: f32,
    /// Min/max spark radius (pixels)
    pub radius: (f32, f32),
}

impl VisualEvent {
    pub fn shatter(origin: Vec2) -> Self {
        Self {
            kind: EffectKind::Shatter,
            origin,
            color: SHATTER_COLOR,
            count: 8,
            spread: (20.0, 50.0),
            lifetime: 0.5,
            radius: (3.0, 3.0),
        }
    }

    pub fn hit_spark(origin: Vec2, color: [f32; 4]) -> Self {
        Self {
            kind: EffectKind::HitSpark,
            origin,
            color,
            count: 15,
            spread: (30.0, 70.0),
            lifetime: 0.6,
            radius: (4.0, 4.0),
        }
    }

    pub fn target_shatter(origin: Vec2, color: [f32; 4]) -> Self {
        Self {
            kind: EffectKind::TargetShatter,
            origin,
            color,
            count: 50,
            spread: (60.0, 160.0),
            lifetime: 0.8,
            radius: (1.0, 3.5),
        }
    }
}

/// One spark travelling from `origin` to `origin + offset`
#[derive(Debug, Clone)]
pub struct Spark {
    pub origin: Vec2,
    pub offset: Vec2,
    pub color: [f32; 4],
    pub radius: f32,
    pub age: f32,
    pub lifetime: f32,
}

impl Spark {
    /// Normalized age (0-1)
    pub fn progress(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    /// Current position (ease-out)
    pub fn pos(&self) -> Vec2 {
        let t = 1.0 - self.progress();
        self.origin + self.offset * (1.0 - t * t * t)
    }

    /// Shrinks to nothing
    pub fn current_radius(&self) -> f32 {
        self.radius * (1.0 - self.progress())
    }

    pub fn current_color(&self) -> [f32; 4] {
        let mut c = self.color;
        c[3] *= 1.0 - self.progress();
        c
    }
}

/// Spark system fed by `VisualEvent`s
#[derive(Debug, Clone)]
pub struct Effects {
    enabled: bool,
    pub sparks: Vec<Spark>,
    /// Events emitted since the last drain (kept even when disabled)
    emitted: VecDeque<VisualEvent>,
    rng: Pcg32,
}

impl Effects {
    pub fn new(seed: u64, enabled: bool) -> Self {
        Self {
            enabled,
            sparks: Vec::new(),
            emitted: VecDeque::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.sparks.clear();
        }
    }

    pub fn emit(&mut self, event: VisualEvent) {
        log::trace!("Effect {:?} at {}", event.kind, event.origin);
        if self.emitted.len() == MAX_PENDING_EMITS {
            self.emitted.pop_front();
        }
        self.emitted.push_back(event);

        if !self.enabled {
            return;
        }

        for _ in 0..event.count {
            if self.sparks.len() >= MAX_SPARKS {
                break;
            }
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let (lo, hi) = event.spread;
            let distance = lo + self.rng.random::<f32>() * (hi - lo);
            let (r_lo, r_hi) = event.radius;
            let radius = r_lo + self.rng.random::<f32>() * (r_hi - r_lo);
            self.sparks.push(Spark {
                origin: event.origin,
                offset: Vec2::from_angle(angle) * distance,
                color: event.color,
                radius,
                age: 0.0,
                lifetime: event.lifetime,
            });
        }
    }

    pub fn tick(&mut self, dt: f32) {
        for spark in &mut self.sparks {
            spark.age += dt;
        }
        self.sparks.retain(|s| s.age < s.lifetime);
    }

    pub fn drain_emitted(&mut self) -> Vec<VisualEvent> {
        self.emitted.drain(..).collect()
    }
}
