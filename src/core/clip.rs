//! Sutherland-Hodgman triangle clipping in homogeneous clip space.
//!
//! Clipping runs before the perspective divide, so near-zero `w`
//! values never reach the division in the rasterizer. Every varying is
//! interpolated by the same parameter `t` as the position, which keeps
//! color/UV/normal/world-position consistent at cut edges.

use crate::core::pipeline::Interpolatable;
use nalgebra::Vector4;

/// Inside-test tolerance. Points sitting exactly on a plane count as
/// inside so shared edges between adjacent triangles stay watertight.
const PLANE_EPS: f32 = 1e-6;

/// The six frustum half-spaces as (axis index, sign), meaning
/// `sign * p[axis] <= p.w`. Axis 2 covers far (+1) and near (-1).
const PLANES: [(usize, f32); 6] = [
    (0, 1.0),  // right:  +x <= w
    (0, -1.0), // left:   -x <= w
    (1, 1.0),  // top:    +y <= w
    (1, -1.0), // bottom: -y <= w
    (2, 1.0),  // far:    +z <= w
    (2, -1.0), // near:   -z <= w
];

/// Clips a triangle against all six frustum planes.
///
/// Returns the resulting convex polygon as an ordered vertex list:
/// empty or fewer than 3 entries when the triangle is fully outside,
/// up to 9 vertices when several planes cut it. Callers triangulate
/// the polygon as a fan from vertex 0.
pub fn clip_triangle<V: Interpolatable>(
    clip_coords: &[Vector4<f32>; 3],
    varyings: &[V; 3],
) -> Vec<(Vector4<f32>, V)> {
    // Double-buffered vertex lists; 16 slots cover the worst case
    // without reallocating mid-clip.
    let mut polygon: Vec<(Vector4<f32>, V)> = Vec::with_capacity(16);
    let mut scratch: Vec<(Vector4<f32>, V)> = Vec::with_capacity(16);

    for i in 0..3 {
        polygon.push((clip_coords[i], varyings[i]));
    }

    for &(axis, sign) in &PLANES {
        if polygon.is_empty() {
            return polygon;
        }
        clip_polygon_against_plane(&polygon, &mut scratch, axis, sign);
        std::mem::swap(&mut polygon, &mut scratch);
    }

    polygon
}

/// One pass of the edge walk against a single plane. `output` is
/// cleared before writing.
fn clip_polygon_against_plane<V: Interpolatable>(
    input: &[(Vector4<f32>, V)],
    output: &mut Vec<(Vector4<f32>, V)>,
    axis: usize,
    sign: f32,
) {
    output.clear();
    if input.is_empty() {
        return;
    }

    let is_inside = |p: &Vector4<f32>| sign * p[axis] <= p.w + PLANE_EPS;

    let mut prev = input[input.len() - 1];
    let mut prev_inside = is_inside(&prev.0);

    for curr in input {
        let curr_inside = is_inside(&curr.0);

        if curr_inside {
            if !prev_inside {
                // Entering: emit the intersection, then the endpoint.
                if let Some(inter) = intersect_edge_plane(prev, *curr, axis, sign) {
                    output.push(inter);
                }
            }
            output.push(*curr);
        } else if prev_inside {
            // Exiting: emit only the intersection.
            if let Some(inter) = intersect_edge_plane(prev, *curr, axis, sign) {
                output.push(inter);
            }
        }

        prev = *curr;
        prev_inside = curr_inside;
    }
}

/// Intersection of the edge (a, b) with the plane `sign * p[axis] = w`.
///
/// The parameter comes from the plane equation algebraically, not from
/// any projected geometry, and interpolates position and varying alike.
#[inline(always)]
fn intersect_edge_plane<V: Interpolatable>(
    a: (Vector4<f32>, V),
    b: (Vector4<f32>, V),
    axis: usize,
    sign: f32,
) -> Option<(Vector4<f32>, V)> {
    let ac = a.0[axis];
    let bc = b.0[axis];
    let aw = a.0.w;
    let bw = b.0.w;

    // Signed-distance difference of the two endpoints to the plane.
    let denom = sign * (bc - ac) - (bw - aw);
    if denom.abs() < 1e-9 {
        return None;
    }

    let t = ((aw - sign * ac) / denom).clamp(0.0, 1.0);
    if !t.is_finite() {
        return None;
    }

    let pos = a.0 + (b.0 - a.0) * t;
    let vary = a.1 * (1.0 - t) + b.1 * t;
    Some((pos, vary))
}
