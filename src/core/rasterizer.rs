use crate::core::clip::clip_triangle;
use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, is_inside_triangle, perspective_correct_barycentric,
};
use crate::core::math::transform::{apply_perspective_division, ndc_depth_to_buffer, ndc_to_screen};
use crate::core::pipeline::{Interpolatable, Shader};
use crate::pipeline::shadow::ShadowMap;
use log::trace;
use nalgebra::{Point2, Vector4};
use rayon::prelude::*;

/// Triangles whose best of face-normal and averaged-vertex-normal dot
/// with the view direction falls below this are culled as backfacing.
/// Lenient enough that silhouette triangles at grazing angles survive;
/// wireframe mode disables culling entirely.
const CULL_THRESHOLD: f32 = -0.7;

/// Slope-scaled depth bias factor, proportional to `1 - N.V`.
const DEPTH_BIAS_SCALE: f32 = 1e-5;

/// Barycentric distance from an edge below which a pixel counts as
/// part of the wireframe.
const WIREFRAME_EDGE_THRESHOLD: f32 = 0.02;

/// Scan-converts clipped triangles into a [`FrameBuffer`].
pub struct Rasterizer {
    pub wireframe: bool,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self { wireframe: false }
    }

    /// Rasterizes one triangle given clip-space positions and varyings.
    ///
    /// Order of operations: world-space backface cull, Sutherland-
    /// Hodgman clipping against the six frustum planes, fan
    /// triangulation of the clipped polygon, then per-fan-triangle
    /// scan conversion with perspective-correct interpolation, depth
    /// testing and fragment shading.
    pub fn draw_triangle<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
        shadow: Option<&ShadowMap>,
    ) {
        // Facing ratio feeds the slope-scaled depth bias; 1.0 (no bias
        // slope) when the varying carries no world-space data.
        let mut facing_ratio = 1.0;

        if let (Some(p0), Some(p1), Some(p2), Some(camera)) = (
            varyings[0].world_pos(),
            varyings[1].world_pos(),
            varyings[2].world_pos(),
            shader.camera_position(),
        ) {
            let center = nalgebra::Point3::from((p0.coords + p1.coords + p2.coords) / 3.0);
            let view_dir = (camera - center).normalize();

            let face_normal = (p1 - p0).cross(&(p2 - p0)).normalize();
            let face_dot = face_normal.dot(&view_dir);

            // A face normal alone misclassifies strongly curved
            // low-poly silhouettes, so take the better of the face
            // normal and the averaged vertex normal.
            let best_dot = match (
                varyings[0].world_normal(),
                varyings[1].world_normal(),
                varyings[2].world_normal(),
            ) {
                (Some(n0), Some(n1), Some(n2)) => {
                    let avg = (n0.normalize() + n1.normalize() + n2.normalize()).normalize();
                    face_dot.max(avg.dot(&view_dir))
                }
                _ => face_dot,
            };

            if !self.wireframe && best_dot < CULL_THRESHOLD {
                trace!("triangle culled as backfacing (dot {best_dot:.3})");
                return;
            }
            facing_ratio = face_dot;
        }

        let polygon = clip_triangle(clip_coords, varyings);
        if polygon.len() < 3 {
            trace!("triangle clipped away ({} vertices left)", polygon.len());
            return;
        }

        let v0 = polygon[0];
        for i in 1..polygon.len() - 1 {
            let v1 = polygon[i];
            let v2 = polygon[i + 1];
            self.scan_convert(
                framebuffer,
                shader,
                &[v0.0, v1.0, v2.0],
                &[v0.1, v1.1, v2.1],
                shadow,
                facing_ratio,
            );
        }
    }

    /// Rasterizes a triangle already known to lie inside the frustum.
    fn scan_convert<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
        shadow: Option<&ShadowMap>,
        facing_ratio: f32,
    ) {
        let width = framebuffer.width as f32;
        let height = framebuffer.height as f32;

        // Perspective division and viewport transform. Clipping already
        // removed geometry at the camera plane, the guard is belt and
        // suspenders against float drift.
        let mut screen = [Point2::origin(); 3];
        let mut ndc_z = [0.0f32; 3];
        let mut w_values = [0.0f32; 3];

        for i in 0..3 {
            if clip_coords[i].w.abs() < 1e-6 {
                return;
            }
            let ndc = apply_perspective_division(&clip_coords[i]);
            screen[i] = ndc_to_screen(ndc.x, ndc.y, width, height);
            ndc_z[i] = ndc.z;
            w_values[i] = clip_coords[i].w;
        }

        // Integer bounding box clamped to the buffer.
        let min_x = screen[0].x.min(screen[1].x).min(screen[2].x).floor() as i32;
        let min_y = screen[0].y.min(screen[1].y).min(screen[2].y).floor() as i32;
        let max_x = screen[0].x.max(screen[1].x).max(screen[2].x).ceil() as i32;
        let max_y = screen[0].y.max(screen[1].y).max(screen[2].y).ceil() as i32;

        if max_x < 0 || max_y < 0 || min_x >= framebuffer.width as i32 || min_y >= framebuffer.height as i32
        {
            return;
        }

        let start_x = min_x.max(0) as usize;
        let end_x = max_x.min(framebuffer.width as i32 - 1) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = max_y.min(framebuffer.height as i32 - 1) as usize;

        let depth_bias = DEPTH_BIAS_SCALE * (1.0 - facing_ratio);

        // Row-parallel pixel loop. Depth CAS plus striped color locks
        // keep each pixel's read-modify-write atomic per index.
        (start_y..=end_y).into_par_iter().for_each(|y| {
            for x in start_x..=end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                let Some(bary) =
                    barycentric_coordinates(pixel_center, screen[0], screen[1], screen[2])
                else {
                    // Degenerate screen-space triangle: expected
                    // geometry, skip silently.
                    continue;
                };
                if !is_inside_triangle(bary) {
                    continue;
                }

                if self.wireframe
                    && bary.x > WIREFRAME_EDGE_THRESHOLD
                    && bary.y > WIREFRAME_EDGE_THRESHOLD
                    && bary.z > WIREFRAME_EDGE_THRESHOLD
                {
                    continue;
                }

                let Some(corrected) = perspective_correct_barycentric(
                    bary,
                    w_values[0],
                    w_values[1],
                    w_values[2],
                ) else {
                    continue;
                };

                // Perspective-correct NDC depth, remapped to [0, 1]
                // and pushed slightly toward the camera on grazing
                // surfaces to fight self-shadow acne.
                let z = corrected.x * ndc_z[0] + corrected.y * ndc_z[1] + corrected.z * ndc_z[2];
                let depth = ndc_depth_to_buffer(z) - depth_bias;

                if framebuffer.depth_test_and_update(x, y, depth) {
                    let varying = varyings[0] * corrected.x
                        + varyings[1] * corrected.y
                        + varyings[2] * corrected.z;

                    let shadow_factor = match (shadow, varying.world_pos()) {
                        (Some(map), Some(world_pos)) => map.factor(&world_pos),
                        _ => 1.0,
                    };

                    let color = shader.fragment(varying, shadow_factor);
                    framebuffer.set_pixel(x, y, color);
                }
            }
        });
    }
}
