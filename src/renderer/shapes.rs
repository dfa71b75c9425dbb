//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in surface pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let (s1, c1) = ((i as f32 / segments as f32) * 2.0 * PI).sin_cos();
        let (s2, c2) = (((i + 1) as f32 / segments as f32) * 2.0 * PI).sin_cos();

        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        quad(&mut vertices, [inner1, outer1, inner2, outer2], color);
    }

    vertices
}

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        [min, Vec2::new(max.x, min.y), Vec2::new(min.x, max.y), max],
        color,
    );
    vertices
}

/// Rectangle outline `thickness` pixels wide, drawn inside the box
pub fn rect_outline(min: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(min, Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + size.y - t), Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + t), Vec2::new(t, size.y - 2.0 * t), color));
    vertices.extend(rect(
        Vec2::new(min.x + size.x - t, min.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    ));
    vertices
}

/// Line segment as a quad; degenerate segments produce nothing
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let Some(dir) = (to - from).try_normalize() else {
        return Vec::new();
    };
    let perp = dir.perp() * (width / 2.0);

    let mut vertices = Vec::with_capacity(6);
    quad(&mut vertices, [from + perp, from - perp, to + perp, to - perp], color);
    vertices
}

/// Two triangles over corners `[a0, a1, b0, b1]`
fn quad(out: &mut Vec<Vertex>, [a0, a1, b0, b1]: [Vec2; 4], color: [f32; 4]) {
    out.push(Vertex::new(a0.x, a0.y, color));
    out.push(Vertex::new(a1.x, a1.y, color));
    out.push(Vertex::new(b0.x, b0.y, color));

    out.push(Vertex::new(b0.x, b0.y, color));
    out.push(Vertex::new(a1.x, a1.y, color));
    out.push(Vertex::new(b1.x, b1.y, color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        assert_eq!(circle(Vec2::ZERO, 5.0, [1.0; 4], 12).len(), 36);
        assert_eq!(ring(Vec2::ZERO, 4.0, 5.0, [1.0; 4], 12).len(), 72);
        assert_eq!(rect(Vec2::ZERO, Vec2::ONE, [1.0; 4]).len(), 6);
        assert_eq!(rect_outline(Vec2::ZERO, Vec2::splat(10.0), 1.0, [1.0; 4]).len(), 24);
    }

    #[test]
    fn test_line() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, [1.0; 4]).is_empty());

        let v = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, [1.0; 4]);
        assert_eq!(v.len(), 6);
        for vertex in &v {
            assert!((vertex.position[1].abs() - 1.0).abs() < 1e-6);
        }
    }
}
