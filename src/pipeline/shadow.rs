use crate::core::framebuffer::FrameBuffer;
use crate::core::math::transform::TransformFactory;
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};

/// Sampling parameters for the shadow subsystem.
#[derive(Debug, Clone, Copy)]
pub struct ShadowSettings {
    /// Side length of the square shadow map in texels.
    pub size: usize,
    /// Half-extent of the orthographic light volume in world units.
    pub extent: f32,
    /// Depth comparison bias against self-shadow acne.
    pub bias: f32,
    /// PCF window radius in texels (radius 2 samples a 5x5 window).
    pub pcf_radius: i32,
    /// Maximum darkening a fully occluded sample applies.
    pub strength: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            size: 512,
            extent: 10.0,
            bias: 0.005,
            pcf_radius: 2,
            strength: 0.7,
        }
    }
}

/// Builds the light-space view-projection matrix: a `look_at` from the
/// light position toward the origin plus an orthographic volume.
///
/// The up vector switches to Z when the light looks almost straight
/// down (or up), where Y would make the view basis degenerate.
pub fn light_view_projection(light_pos: &Point3<f32>, settings: &ShadowSettings) -> Matrix4<f32> {
    let dir = (Point3::origin() - light_pos).normalize();
    let up = if dir.y.abs() > 0.99 {
        Vector3::z()
    } else {
        Vector3::y()
    };

    let view = TransformFactory::view(light_pos, &Point3::origin(), &up);
    let e = settings.extent;
    let projection = TransformFactory::orthographic(-e, e, -e, e, 0.1, 100.0);

    projection * view
}

/// A light-space depth buffer plus everything needed to sample it from
/// a world position.
pub struct ShadowMap {
    depth: Vec<f32>,
    size: usize,
    light_matrix: Matrix4<f32>,
    bias: f32,
    pcf_radius: i32,
    strength: f32,
}

impl ShadowMap {
    /// Extracts the depth plane of a finished depth-only pass.
    pub fn from_depth_pass(
        framebuffer: &FrameBuffer,
        light_matrix: Matrix4<f32>,
        settings: &ShadowSettings,
    ) -> Self {
        debug_assert_eq!(framebuffer.width, framebuffer.height);
        debug!(
            "shadow map extracted ({}x{} texels)",
            framebuffer.width, framebuffer.height
        );
        Self {
            depth: framebuffer.depth_plane(),
            size: framebuffer.width,
            light_matrix,
            bias: settings.bias,
            pcf_radius: settings.pcf_radius,
            strength: settings.strength,
        }
    }

    pub fn light_matrix(&self) -> &Matrix4<f32> {
        &self.light_matrix
    }

    /// Shadow visibility at a world position, in [0.5, 1.0].
    ///
    /// 1.0 means fully lit. Positions outside the light frustum (UV
    /// outside the unit square or beyond far depth) are defined as
    /// fully lit: missing coverage never darkens. Inside, a PCF window
    /// counts occluded texels and the occluded fraction scales the
    /// darkening, clamped so shadows never go fully black.
    pub fn factor(&self, world_pos: &Point3<f32>) -> f32 {
        let clip = self.light_matrix * world_pos.to_homogeneous();
        if clip.w.abs() < 1e-6 {
            return 1.0;
        }
        let ndc = clip / clip.w;

        let u = ndc.x * 0.5 + 0.5;
        let v = 1.0 - (ndc.y * 0.5 + 0.5);
        let depth = ndc.z * 0.5 + 0.5;

        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) || depth > 1.0 {
            return 1.0;
        }

        let x = (u * self.size as f32) as i32;
        let y = (v * self.size as f32) as i32;

        let mut occluded = 0u32;
        let mut sampled = 0u32;
        for dy in -self.pcf_radius..=self.pcf_radius {
            for dx in -self.pcf_radius..=self.pcf_radius {
                let sx = x + dx;
                let sy = y + dy;
                if sx < 0 || sy < 0 || sx >= self.size as i32 || sy >= self.size as i32 {
                    continue;
                }
                sampled += 1;
                let stored = self.depth[sy as usize * self.size + sx as usize];
                if stored < depth - self.bias {
                    occluded += 1;
                }
            }
        }

        if sampled == 0 {
            return 1.0;
        }

        let fraction = occluded as f32 / sampled as f32;
        (1.0 - fraction * self.strength).max(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::framebuffer::FrameBuffer;
    use crate::core::color::Rgba;

    fn settings() -> ShadowSettings {
        ShadowSettings {
            size: 8,
            extent: 10.0,
            bias: 0.005,
            pcf_radius: 1,
            strength: 0.7,
        }
    }

    fn empty_map() -> ShadowMap {
        let mut fb = FrameBuffer::new(8, 8);
        fb.clear(Rgba::BLACK);
        let s = settings();
        let matrix = light_view_projection(&Point3::new(0.0, 10.0, 0.0), &s);
        ShadowMap::from_depth_pass(&fb, matrix, &s)
    }

    #[test]
    fn outside_the_light_frustum_is_fully_lit() {
        let map = empty_map();
        // Far outside the 10-unit orthographic extent.
        assert_eq!(map.factor(&Point3::new(500.0, 0.0, 0.0)), 1.0);
    }

    #[test]
    fn empty_map_never_darkens() {
        let map = empty_map();
        // Inside the frustum but nothing was rendered: every stored
        // depth is the far sentinel, so no texel can occlude.
        assert_eq!(map.factor(&Point3::new(0.0, 0.0, 0.0)), 1.0);
    }

    #[test]
    fn full_occlusion_clamps_at_half_light() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.clear(Rgba::BLACK);
        // Pretend every texel saw a caster very close to the light.
        for y in 0..8 {
            for x in 0..8 {
                fb.depth_test_and_update(x, y, 0.01);
            }
        }
        let s = ShadowSettings {
            strength: 0.9,
            ..settings()
        };
        let matrix = light_view_projection(&Point3::new(0.0, 10.0, 0.0), &s);
        let map = ShadowMap::from_depth_pass(&fb, matrix, &s);

        // 1 - 1.0 * 0.9 would be 0.1, but the floor holds at 0.5.
        assert_eq!(map.factor(&Point3::new(0.0, 0.0, 0.0)), 0.5);
    }

    #[test]
    fn vertical_light_still_builds_a_valid_matrix() {
        let s = settings();
        let m = light_view_projection(&Point3::new(0.0, 10.0, 0.0), &s);
        assert!(m.iter().all(|c| c.is_finite()));
    }
}
