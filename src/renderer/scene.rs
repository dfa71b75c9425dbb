//! Builds triangle lists from simulation state
//!
//! All output is in scene pixels; `RenderState` maps it to clip space.

use glam::Vec2;

use super::shapes::{circle, line, rect, rect_outline, ring};
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::section::Section;
use crate::session::{GameKind, Session};
use crate::sim::particles::PARTICLE_COLOR;
use crate::sim::{Cell, Effects, GridPos, Maze, ParticleField, Rect, Shooter};
use crate::unlock::UnlockState;

const CIRCLE_SEGMENTS: u32 = 16;
const SPARK_SEGMENTS: u32 = 8;

/// Diagonal cracks in unit-box coordinates
const CRACKS: [(Vec2, Vec2); 2] = [
    (Vec2::new(0.2, 0.1), Vec2::new(0.7, 0.8)),
    (Vec2::new(0.85, 0.2), Vec2::new(0.25, 0.7)),
];

fn with_alpha(mut color: [f32; 4], alpha: f32) -> [f32; 4] {
    color[3] *= alpha;
    color
}

/// Backdrop: proximity links under the particles
pub fn background(field: &ParticleField) -> Vec<Vertex> {
    let links = field.links();
    let mut vertices =
        Vec::with_capacity(links.len() * 6 + field.particles.len() * SPARK_SEGMENTS as usize * 3);

    for link in &links {
        let (a, b) = (field.particles[link.a].pos, field.particles[link.b].pos);
        let color = [PARTICLE_COLOR[0], PARTICLE_COLOR[1], PARTICLE_COLOR[2], link.alpha];
        vertices.extend(line(a, b, 0.5, color));
    }
    for p in &field.particles {
        vertices.extend(circle(p.pos, p.radius, PARTICLE_COLOR, SPARK_SEGMENTS));
    }
    vertices
}

/// Square grid fitted and centred in the arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MazeGeometry {
    pub origin: Vec2,
    pub cell: f32,
}

impl MazeGeometry {
    pub fn fit(arena: Vec2, cells: usize) -> Self {
        let cell = (arena.x.min(arena.y) / cells.max(1) as f32).floor().max(1.0);
        let side = cell * cells as f32;
        Self {
            origin: ((arena - Vec2::splat(side)) / 2.0).max(Vec2::ZERO),
            cell,
        }
    }

    pub fn cell_min(&self, pos: GridPos) -> Vec2 {
        self.origin + Vec2::new(pos.x as f32, pos.y as f32) * self.cell
    }

    pub fn cell_center(&self, pos: GridPos) -> Vec2 {
        self.cell_min(pos) + Vec2::splat(self.cell / 2.0)
    }
}

pub fn maze(maze: &Maze, unlocks: &UnlockState, player_color: [f32; 4], arena: Vec2) -> Vec<Vertex> {
    let geo = MazeGeometry::fit(arena, maze.layout.size());
    let size = Vec2::splat(geo.cell);
    let mut vertices = Vec::with_capacity(GRID_SIZE * GRID_SIZE * 6 + 256);

    for (pos, cell) in maze.layout.cells() {
        let min = geo.cell_min(pos);
        match cell {
            Cell::Wall => vertices.extend(rect(min, size, colors::MAZE_WALL)),
            Cell::Path => vertices.extend(rect(min, size, colors::MAZE_PATH)),
            Cell::Door(section) => {
                let color = if unlocks.is_unlocked(section) {
                    section.style().color
                } else {
                    colors::LOCKED
                };
                vertices.extend(rect(min, size, color));
            }
            Cell::Key(section) => {
                vertices.extend(rect(min, size, colors::MAZE_PATH));
                // Collected keys disappear
                if !unlocks.is_unlocked(section) {
                    vertices.extend(circle(
                        geo.cell_center(pos),
                        geo.cell * 0.3,
                        section.style().color,
                        CIRCLE_SEGMENTS,
                    ));
                }
            }
        }
    }

    vertices.extend(circle(
        geo.cell_center(maze.player),
        geo.cell * 0.38,
        player_color,
        CIRCLE_SEGMENTS,
    ));
    vertices
}

pub fn shooter(shooter: &Shooter, unlocks: &UnlockState) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for target in &shooter.targets {
        let unlocked = unlocks.is_unlocked(target.section);
        let color = target.section.style().color;
        let fill = if unlocked {
            with_alpha(color, 0.35)
        } else {
            with_alpha(colors::LOCKED, 0.6)
        };
        vertices.extend(rect(target.pos, Vec2::splat(target.size), fill));
        vertices.extend(rect_outline(target.pos, Vec2::splat(target.size), 2.0, color));

        for &(from, to) in CRACKS.iter().take(target.cracks(unlocked) as usize) {
            let (a, b) = (target.pos + from * target.size, target.pos + to * target.size);
            vertices.extend(line(a, b, 2.0, colors::CRACK));
        }
    }

    for shot in &shooter.shots {
        let b = shot.bounds();
        vertices.extend(rect(b.min, b.size, colors::PROJECTILE));
    }

    if let Some(launch) = shooter.launch_point() {
        vertices.extend(circle(launch, 8.0, colors::LAUNCHER, CIRCLE_SEGMENTS));
    }

    if let Some(aim) = shooter.aim {
        vertices.extend(ring(aim, 9.0, 11.0, colors::CROSSHAIR, CIRCLE_SEGMENTS));
        for arm in [Vec2::new(16.0, 0.0), Vec2::new(0.0, 16.0)] {
            vertices.extend(line(aim - arm, aim + arm, 1.5, colors::CROSSHAIR));
        }
    }

    vertices
}

pub fn sparks(effects: &Effects) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(effects.sparks.len() * SPARK_SEGMENTS as usize * 3);
    for spark in &effects.sparks {
        vertices.extend(circle(
            spark.pos(),
            spark.current_radius(),
            spark.current_color(),
            SPARK_SEGMENTS,
        ));
    }
    vertices
}

/// Platform slab for `section`, anchored at its normalised position
pub fn platform_rect(section: Section, arena: Vec2) -> Rect {
    let (x, y) = section.style().platform;
    Rect::from_center(Vec2::new(x, y) * arena, Vec2::new(arena.x * 0.2, 24.0))
}

/// Platform under a tap, if any
pub fn platform_at(point: Vec2, arena: Vec2) -> Option<Section> {
    Section::ALL.into_iter().find(|&s| {
        let r = platform_rect(s, arena);
        point.cmpge(r.min).all() && point.cmple(r.max()).all()
    })
}

/// Jumper platforms for the compact layout
pub fn platforms(unlocks: &UnlockState, arena: Vec2) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for section in Section::ALL {
        let style = section.style();
        let r = platform_rect(section, arena);
        let color = if unlocks.is_unlocked(section) {
            style.color
        } else {
            colors::LOCKED
        };
        vertices.extend(rect(r.min, r.size, color));
        if unlocks.active() == section {
            let marker = Vec2::new(r.center().x, r.min.y - 12.0);
            vertices.extend(circle(marker, 10.0, style.color, CIRCLE_SEGMENTS));
        }
    }
    vertices
}

/// Whatever the game surface currently shows
pub fn game(session: &Session) -> Vec<Vertex> {
    let Some(arena) = session.arena() else {
        return Vec::new();
    };

    let mut vertices = if session.is_compact() {
        platforms(&session.unlocks, arena)
    } else {
        match (session.game(), session.shooter()) {
            (GameKind::Maze, _) => {
                maze(&session.maze, &session.unlocks, session.player_color(), arena)
            }
            (GameKind::Shooter, Some(s)) => shooter(s, &session.unlocks),
            (GameKind::Shooter, None) => Vec::new(),
        }
    };
    vertices.extend(sparks(&session.effects));
    vertices
}
