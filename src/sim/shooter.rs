//! Target shooter: drifting targets, projectiles and hit durability
//!
//! Two loops share this state. `tick` integrates targets once per frame and
//! then samples every in-flight shot at `SHOT_POLL_DT` until it hits a
//! target, hits a wall or expires.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Rect, clamp_inside, crosses_boundary, reflect_axis};
use super::effects::{Effects, VisualEvent};
use crate::consts::*;
use crate::section::Section;
use crate::unlock::UnlockState;

/// A section target bouncing around the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub section: Section,
    /// Top-left corner
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub size: f32,
    /// Successful hits since spawn
    pub hits: u32,
}

impl Target {
    pub fn new(section: Section, pos: Vec2, vel: Vec2) -> Self {
        Self {
            section,
            pos,
            vel,
            size: TARGET_SIZE,
            hits: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Number of crack overlays to draw (unlocked targets only)
    pub fn cracks(&self, unlocked: bool) -> u32 {
        if !unlocked {
            0
        } else if self.hits > 3 {
            2
        } else if self.hits > 1 {
            1
        } else {
            0
        }
    }
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub origin: Vec2,
    /// Unit travel direction
    pub dir: Vec2,
    /// Pixels per second
    pub speed: f32,
    /// Seconds since launch
    pub age: f32,
}

impl Projectile {
    /// Center of the projectile box
    pub fn pos(&self) -> Vec2 {
        self.origin + self.dir * self.speed * self.age.min(SHOT_LIFETIME)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos(), Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT))
    }
}

/// How a shot ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    TargetHit {
        section: Section,
        hits: u32,
        /// Target shattered and left the arena
        destroyed: bool,
        /// This hit unlocked the section
        unlocked: bool,
    },
    /// Crossed the arena edge; impact point pulled inside the arena
    BoundaryHit(Vec2),
    /// Lifetime ran out in open air
    Expired,
}

/// Shooter engine state
#[derive(Debug, Clone)]
pub struct Shooter {
    /// Live targets, sorted by section
    pub targets: Vec<Target>,
    /// Shots still being sampled
    pub shots: Vec<Projectile>,
    /// Last pointer position inside the arena (crosshair)
    pub aim: Option<Vec2>,
    /// None until the surface has been measured
    arena: Option<Vec2>,
    /// Targets must be (re)spawned once the arena is known
    awaiting_spawn: bool,
    /// Last unlock revision this engine reacted to
    seen_revision: Option<u64>,
    rng: Pcg32,
}

impl Shooter {
    pub fn new(seed: u64) -> Self {
        Self {
            targets: Vec::new(),
            shots: Vec::new(),
            aim: None,
            arena: None,
            awaiting_spawn: true,
            seen_revision: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn arena(&self) -> Option<Vec2> {
        self.arena
    }

    /// Arena was measured (or lost its size)
    pub fn resize(&mut self, size: Option<Vec2>) {
        self.arena = size.filter(|s| s.x > 0.0 && s.y > 0.0);
        if self.awaiting_spawn {
            self.spawn_targets();
        }
    }

    /// Where projectiles leave from (bottom-center)
    pub fn launch_point(&self) -> Option<Vec2> {
        self.arena.map(|a| Vec2::new(a.x / 2.0, a.y - LAUNCH_OFFSET))
    }

    pub fn target(&self, section: Section) -> Option<&Target> {
        self.targets.iter().find(|t| t.section == section)
    }

    /// React to unlock changes: a store back at {Home} means a fresh round
    pub fn observe(&mut self, unlocks: &UnlockState) {
        let revision = unlocks.revision();
        if self.seen_revision == Some(revision) {
            return;
        }
        self.seen_revision = Some(revision);
        if unlocks.is_initial() {
            self.regenerate();
        }
    }

    /// Drop every target and shot and spawn a fresh set
    pub fn regenerate(&mut self) {
        self.targets.clear();
        self.shots.clear();
        self.awaiting_spawn = true;
        self.spawn_targets();
    }

    fn spawn_targets(&mut self) {
        let Some(arena) = self.arena else {
            return;
        };

        let span = (arena - Vec2::splat(2.0 * TARGET_SPAWN_MARGIN)).max(Vec2::ZERO);
        let max_pos = (arena - Vec2::splat(TARGET_SIZE)).max(Vec2::ZERO);

        self.targets = Section::LOCKABLE
            .iter()
            .map(|&section| {
                let pos = Vec2::new(
                    self.rng.random::<f32>() * span.x + TARGET_SPAWN_MARGIN,
                    self.rng.random::<f32>() * span.y + TARGET_SPAWN_MARGIN,
                )
                .clamp(Vec2::ZERO, max_pos);
                let vel = Vec2::new(
                    (self.rng.random::<f32>() - 0.5) * 2.0 * TARGET_MAX_SPEED,
                    (self.rng.random::<f32>() - 0.5) * 2.0 * TARGET_MAX_SPEED,
                );
                Target::new(section, pos, vel)
            })
            .collect();
        self.awaiting_spawn = false;

        log::info!("Spawned {} targets in {}x{} arena", self.targets.len(), arena.x, arena.y);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.aim = Some(pos);
    }

    pub fn pointer_leave(&mut self) {
        self.aim = None;
    }

    /// Fire toward `click`. Ignored until the arena has a size.
    pub fn fire(&mut self, click: Vec2) -> bool {
        let (Some(arena), Some(origin)) = (self.arena, self.launch_point()) else {
            return false;
        };

        let dir = (click - origin).try_normalize().unwrap_or(Vec2::NEG_Y);
        // Enough range to cross the whole arena within one lifetime
        let speed = arena.length() / SHOT_LIFETIME;

        self.shots.push(Projectile {
            origin,
            dir,
            speed,
            age: 0.0,
        });
        log::debug!("Shot fired toward {}", click);
        true
    }

    /// Advance one frame: integrate targets, then sample shots
    pub fn tick(
        &mut self,
        dt: f32,
        unlocks: &mut UnlockState,
        effects: &mut Effects,
    ) -> Vec<ShotOutcome> {
        self.observe(unlocks);

        // No geometry yet: nothing to simulate against
        let Some(arena) = self.arena else {
            return Vec::new();
        };

        for target in &mut self.targets {
            target.pos += target.vel * dt;

            let max = arena - Vec2::splat(target.size);
            reflect_axis(&mut target.pos.x, &mut target.vel.x, 0.0, max.x);
            reflect_axis(&mut target.pos.y, &mut target.vel.y, 0.0, max.y);

            if unlocks.is_unlocked(target.section) {
                target.vel *= TARGET_DAMPING;
            }
        }

        let substeps = (dt / SHOT_POLL_DT).round().max(1.0) as u32;
        let step = dt / substeps as f32;

        let mut outcomes = Vec::new();
        let shots = std::mem::take(&mut self.shots);
        let mut live = Vec::with_capacity(shots.len());
        for mut shot in shots {
            match self.advance_shot(&mut shot, step, substeps, arena, unlocks, effects) {
                Some(outcome) => outcomes.push(outcome),
                None => live.push(shot),
            }
        }
        self.shots = live;

        outcomes
    }

    /// Sample one shot `substeps` times; Some once it has resolved
    fn advance_shot(
        &mut self,
        shot: &mut Projectile,
        step: f32,
        substeps: u32,
        arena: Vec2,
        unlocks: &mut UnlockState,
        effects: &mut Effects,
    ) -> Option<ShotOutcome> {
        for _ in 0..substeps {
            shot.age += step;
            let bounds = shot.bounds();

            // Targets are sorted by section, so the first overlap is also
            // the smallest id
            if let Some(index) = self.targets.iter().position(|t| t.bounds().overlaps(&bounds)) {
                return Some(self.resolve_hit(index, shot.dir, unlocks, effects));
            }

            if crosses_boundary(&bounds, arena) {
                let point = clamp_inside(bounds.center(), arena, WALL_IMPACT_INSET);
                effects.emit(VisualEvent::shatter(point));
                return Some(ShotOutcome::BoundaryHit(point));
            }

            if shot.age >= SHOT_LIFETIME {
                return Some(ShotOutcome::Expired);
            }
        }
        None
    }

    fn resolve_hit(
        &mut self,
        index: usize,
        dir: Vec2,
        unlocks: &mut UnlockState,
        effects: &mut Effects,
    ) -> ShotOutcome {
        let target = &mut self.targets[index];
        target.hits += 1;

        let section = target.section;
        let hits = target.hits;
        let center = target.center();
        let color = section.style().color;
        let was_unlocked = unlocks.is_unlocked(section);

        if was_unlocked && hits > DESTROY_THRESHOLD {
            self.targets.remove(index);
            effects.emit(VisualEvent::target_shatter(center, color));
            log::info!("{} target destroyed after {} hits", section, hits);
            return ShotOutcome::TargetHit {
                section,
                hits,
                destroyed: true,
                unlocked: false,
            };
        }

        target.vel += dir * HIT_IMPULSE;
        effects.emit(VisualEvent::hit_spark(center, color));
        if !was_unlocked {
            unlocks.unlock(section);
        }

        ShotOutcome::TargetHit {
            section,
            hits,
            destroyed: false,
            unlocked: !was_unlocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::EffectKind;

    const ARENA: Vec2 = Vec2::new(400.0, 400.0);

    fn mounted(unlocks: &UnlockState) -> Shooter {
        let mut shooter = Shooter::new(42);
        shooter.resize(Some(ARENA));
        shooter.observe(unlocks);
        shooter
    }

    /// Park every target out of the launch lane except `section`, which
    /// sits straight above the launcher
    fn line_up(shooter: &mut Shooter, section: Section) {
        for (i, target) in shooter.targets.iter_mut().enumerate() {
            target.vel = Vec2::ZERO;
            target.pos = if target.section == section {
                Vec2::new(160.0, 100.0)
            } else {
                Vec2::new(if i % 2 == 0 { 10.0 } else { 300.0 }, 10.0 + i as f32 * 90.0)
            };
        }
    }

    fn run_until_resolved(
        shooter: &mut Shooter,
        unlocks: &mut UnlockState,
        fx: &mut Effects,
    ) -> ShotOutcome {
        for _ in 0..120 {
            let outcomes = shooter.tick(SIM_DT, unlocks, fx);
            if let Some(outcome) = outcomes.first() {
                assert_eq!(outcomes.len(), 1);
                return *outcome;
            }
        }
        panic!("shot never resolved");
    }

    #[test]
    fn test_spawn_waits_for_geometry() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, false);
        let mut shooter = Shooter::new(1);

        assert!(shooter.tick(SIM_DT, &mut unlocks, &mut fx).is_empty());
        assert!(shooter.targets.is_empty());
        assert!(!shooter.fire(Vec2::new(10.0, 10.0)));

        shooter.resize(Some(ARENA));
        assert_eq!(shooter.targets.len(), 4);
        let sections: Vec<_> = shooter.targets.iter().map(|t| t.section).collect();
        assert_eq!(sections, Section::LOCKABLE.to_vec());
        for target in &shooter.targets {
            assert_eq!(target.hits, 0);
            assert!(target.pos.x >= 0.0 && target.pos.x <= ARENA.x - TARGET_SIZE);
            assert!(target.pos.y >= 0.0 && target.pos.y <= ARENA.y - TARGET_SIZE);
            assert!(target.vel.x.abs() <= TARGET_MAX_SPEED);
        }
    }

    #[test]
    fn test_wall_bounce() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, false);
        let mut shooter = mounted(&unlocks);
        shooter.targets.truncate(1);
        shooter.targets[0].pos = Vec2::new(ARENA.x - TARGET_SIZE - 0.1, 200.0);
        shooter.targets[0].vel = Vec2::new(30.0, 0.0);

        shooter.tick(SIM_DT, &mut unlocks, &mut fx);

        let target = &shooter.targets[0];
        assert_eq!(target.vel.x, -30.0);
        assert!(target.pos.x <= ARENA.x - TARGET_SIZE);
    }

    #[test]
    fn test_unlocked_target_damped_on_bounce_tick() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, false);
        let mut shooter = mounted(&unlocks);
        unlocks.unlock(Section::About);
        shooter.targets.truncate(1);
        shooter.targets[0].pos = Vec2::new(ARENA.x - TARGET_SIZE - 0.1, 200.0);
        shooter.targets[0].vel = Vec2::new(30.0, 0.0);

        shooter.tick(SIM_DT, &mut unlocks, &mut fx);

        let target = &shooter.targets[0];
        assert!((target.vel.x + 30.0 * TARGET_DAMPING).abs() < 1e-4);
        assert_eq!(target.pos.x, ARENA.x - TARGET_SIZE);
    }

    #[test]
    fn test_unlocked_targets_slow_down() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, false);
        let mut shooter = mounted(&unlocks);
        unlocks.unlock(Section::About);
        for target in &mut shooter.targets {
            target.pos = Vec2::new(150.0, 150.0);
            target.vel = Vec2::new(20.0, -10.0);
        }

        shooter.tick(SIM_DT, &mut unlocks, &mut fx);

        let about = shooter.target(Section::About).unwrap();
        assert!((about.vel.x - 20.0 * TARGET_DAMPING).abs() < 1e-4);
        assert!((about.vel.y + 10.0 * TARGET_DAMPING).abs() < 1e-4);
        // Locked targets keep their speed
        let skills = shooter.target(Section::Skills).unwrap();
        assert_eq!(skills.vel, Vec2::new(20.0, -10.0));
    }

    #[test]
    fn test_first_hit_unlocks() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, true);
        let mut shooter = mounted(&unlocks);
        line_up(&mut shooter, Section::Projects);

        assert!(shooter.fire(Vec2::new(200.0, 140.0)));
        let outcome = run_until_resolved(&mut shooter, &mut unlocks, &mut fx);

        assert_eq!(
            outcome,
            ShotOutcome::TargetHit {
                section: Section::Projects,
                hits: 1,
                destroyed: false,
                unlocked: true,
            }
        );
        assert!(unlocks.is_unlocked(Section::Projects));
        assert_eq!(unlocks.active(), Section::Projects);
        let target = shooter.target(Section::Projects).unwrap();
        assert_eq!(target.hits, 1);
        // Knocked back along the shot (upward)
        assert!(target.vel.y < 0.0);
        assert!(shooter.shots.is_empty());
        assert_eq!(fx.drain_emitted()[0].kind, EffectKind::HitSpark);
    }

    #[test]
    fn test_fifth_hit_destroys_unlocked_target() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, false);
        let mut shooter = mounted(&unlocks);
        unlocks.unlock(Section::Skills);
        let mut others = Vec::new();

        for shot in 1..=5u32 {
            line_up(&mut shooter, Section::Skills);
            others.clear();
            others.extend(shooter.targets.iter().filter(|t| t.section != Section::Skills).cloned());
            shooter.fire(Vec2::new(200.0, 140.0));
            let outcome = run_until_resolved(&mut shooter, &mut unlocks, &mut fx);
            assert_eq!(
                outcome,
                ShotOutcome::TargetHit {
                    section: Section::Skills,
                    hits: shot,
                    destroyed: shot == 5,
                    unlocked: false,
                }
            );
            assert_eq!(shooter.target(Section::Skills).is_none(), shot == 5);
        }

        assert_eq!(shooter.targets.len(), 3);
        // Bystanders are exactly where the last shot found them
        assert_eq!(shooter.targets, others);
        for target in &shooter.targets {
            assert_eq!(target.hits, 0);
            assert_eq!(target.vel, Vec2::ZERO);
        }
        // Destruction never relocks
        assert!(unlocks.is_unlocked(Section::Skills));
    }

    #[test]
    fn test_locked_target_never_destroyed() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, false);
        let mut shooter = mounted(&unlocks);

        // Hit count is high but the section is still locked
        line_up(&mut shooter, Section::About);
        shooter.targets[0].hits = 10;
        shooter.fire(Vec2::new(200.0, 140.0));
        let outcome = run_until_resolved(&mut shooter, &mut unlocks, &mut fx);

        assert!(matches!(
            outcome,
            ShotOutcome::TargetHit { section: Section::About, destroyed: false, unlocked: true, .. }
        ));
        assert_eq!(shooter.targets.len(), 4);
    }

    #[test]
    fn test_simultaneous_overlap_picks_smallest_section() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, false);
        let mut shooter = mounted(&unlocks);
        line_up(&mut shooter, Section::Contact);
        // Stack About exactly on top of Contact
        shooter.targets[0].pos = Vec2::new(160.0, 100.0);

        shooter.fire(Vec2::new(200.0, 140.0));
        let outcome = run_until_resolved(&mut shooter, &mut unlocks, &mut fx);
        assert!(matches!(outcome, ShotOutcome::TargetHit { section: Section::About, .. }));
        assert_eq!(shooter.target(Section::Contact).unwrap().hits, 0);
    }

    #[test]
    fn test_miss_shatters_on_wall() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, true);
        let mut shooter = mounted(&unlocks);
        shooter.targets.clear();

        shooter.fire(Vec2::new(0.0, 0.0));
        let outcome = run_until_resolved(&mut shooter, &mut unlocks, &mut fx);

        let ShotOutcome::BoundaryHit(point) = outcome else {
            panic!("expected a wall hit, got {outcome:?}");
        };
        assert!(point.x >= WALL_IMPACT_INSET && point.x <= ARENA.x - WALL_IMPACT_INSET);
        assert!(point.y >= WALL_IMPACT_INSET && point.y <= ARENA.y - WALL_IMPACT_INSET);
        assert!(unlocks.is_initial());
        let events = fx.drain_emitted();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EffectKind::Shatter);
    }

    #[test]
    fn test_miss_leaves_live_targets_alone() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, false);
        let mut shooter = mounted(&unlocks);
        // Everything parked above the launcher row
        line_up(&mut shooter, Section::Contact);
        shooter.targets[3].pos = Vec2::new(160.0, 200.0);
        let before = shooter.targets.clone();
        assert_eq!(before.len(), 4);

        // Horizontal shot along the launcher row into the right wall
        shooter.fire(Vec2::new(ARENA.x - 1.0, ARENA.y - LAUNCH_OFFSET));
        let outcome = run_until_resolved(&mut shooter, &mut unlocks, &mut fx);

        assert!(matches!(outcome, ShotOutcome::BoundaryHit(p) if p.x > ARENA.x / 2.0));
        assert_eq!(shooter.targets, before);
        assert!(shooter.targets.iter().all(|t| t.hits == 0 && t.vel == Vec2::ZERO));
        assert!(unlocks.is_initial());
        assert_eq!(unlocks.revision(), 0);
    }

    #[test]
    fn test_reset_regenerates_targets() {
        let mut unlocks = UnlockState::new();
        let mut fx = Effects::new(0, false);
        let mut shooter = mounted(&unlocks);
        unlocks.unlock(Section::Contact);
        shooter.targets.pop();
        shooter.targets[0].hits = 3;
        shooter.fire(Vec2::new(10.0, 10.0));
        shooter.tick(SIM_DT, &mut unlocks, &mut fx);
        assert_eq!(shooter.targets.len(), 3);

        unlocks.reset();
        shooter.tick(SIM_DT, &mut unlocks, &mut fx);

        assert_eq!(shooter.targets.len(), 4);
        assert!(shooter.targets.iter().all(|t| t.hits == 0));
        assert!(shooter.shots.is_empty());
    }

    #[test]
    fn test_cracks() {
        let mut target = Target::new(Section::About, Vec2::ZERO, Vec2::ZERO);
        target.hits = 2;
        assert_eq!(target.cracks(false), 0);
        assert_eq!(target.cracks(true), 1);
        target.hits = 4;
        assert_eq!(target.cracks(true), 2);
    }
}
