//! Geometry generation for scene models
//!
//! Every model is drawn as the camera-facing faces of its world bounding
//! box. Faces are emitted in clip space so the GPU clips anything behind
//! the camera.

use glam::{Mat4, Vec3};

use super::vertex::{Vertex, colors};
use crate::game::{GamePhase, Scene};
use crate::sim::Aabb;

/// Ground plane extent (x from, x to, z from, z to)
const GROUND_EXTENT: [f32; 4] = [-40.0, 160.0, -60.0, 60.0];

/// Brightness per face: -x, +x, -y, +y, -z, +z
const FACE_SHADE: [f32; 6] = [0.8, 0.7, 0.5, 1.0, 0.6, 0.65];

fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
    [color[0] * factor, color[1] * factor, color[2] * factor, color[3]]
}

fn tint(color: [f32; 4], tint: [f32; 4]) -> [f32; 4] {
    [
        color[0] * tint[0],
        color[1] * tint[1],
        color[2] * tint[2],
        color[3] * tint[3],
    ]
}

/// Two triangles for a quad (corners in order around the edge)
fn quad(corners: [Vec3; 4], view_proj: &Mat4, color: [f32; 4]) -> [Vertex; 6] {
    let v = corners.map(|c| Vertex::new((*view_proj * c.extend(1.0)).to_array(), color));
    [v[0], v[1], v[2], v[0], v[2], v[3]]
}

/// Faces of `bounds` visible from `eye`
pub fn box_faces(bounds: &Aabb, eye: Vec3, view_proj: &Mat4, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(18);
    if bounds.is_empty() {
        return vertices;
    }

    for axis in 0..3 {
        let (plane, face) = if eye[axis] < bounds.min[axis] {
            (bounds.min[axis], axis * 2)
        } else if eye[axis] > bounds.max[axis] {
            (bounds.max[axis], axis * 2 + 1)
        } else {
            continue;
        };

        // The two axes spanning the face
        let u = (axis + 1) % 3;
        let w = (axis + 2) % 3;
        let corner = |a: f32, b: f32| {
            let mut p = Vec3::ZERO;
            p[axis] = plane;
            p[u] = a;
            p[w] = b;
            p
        };
        let (u0, u1) = (bounds.min[u], bounds.max[u]);
        let (w0, w1) = (bounds.min[w], bounds.max[w]);

        vertices.extend(quad(
            [corner(u0, w0), corner(u1, w0), corner(u1, w1), corner(u0, w1)],
            view_proj,
            shade(color, FACE_SHADE[face]),
        ));
    }
    vertices
}

/// Ground plane at y = 0
pub fn ground(view_proj: &Mat4, color: [f32; 4]) -> [Vertex; 6] {
    let [x0, x1, z0, z1] = GROUND_EXTENT;
    quad(
        [
            Vec3::new(x0, 0.0, z0),
            Vec3::new(x1, 0.0, z0),
            Vec3::new(x1, 0.0, z1),
            Vec3::new(x0, 0.0, z1),
        ],
        view_proj,
        color,
    )
}

/// Full frame: ground, then models from far to near
pub fn scene_vertices(scene: &Scene<'_>, aspect: f32) -> Vec<Vertex> {
    let camera = scene.camera;
    let view_proj = camera.view_proj(aspect);
    let phase_tint = match scene.phase {
        GamePhase::Paused => colors::PAUSED_TINT,
        GamePhase::Over => colors::GAME_OVER_TINT,
        GamePhase::NotStarted | GamePhase::Running => [1.0; 4],
    };

    let mut boxes: Vec<(Aabb, [f32; 4])> = scene
        .models
        .iter()
        .map(|m| (m.world_bounds(), m.color))
        .collect();
    boxes.sort_by(|a, b| {
        let da = a.0.center().distance_squared(camera.eye);
        let db = b.0.center().distance_squared(camera.eye);
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut vertices = Vec::with_capacity(6 + boxes.len() * 18);
    vertices.extend(ground(&view_proj, tint(colors::GROUND, phase_tint)));
    for (bounds, color) in &boxes {
        vertices.extend(box_faces(bounds, camera.eye, &view_proj, tint(*color, phase_tint)));
    }
    vertices
}
