use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

//=================================
// Transform matrix factory
//=================================

/// Factory for the transformation matrices the pipeline needs.
/// Right-handed throughout; the camera looks down -Z in view space.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    pub fn translation(t: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, t.x,
            0.0, 1.0, 0.0, t.y,
            0.0, 0.0, 1.0, t.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn scaling(s: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            s.x, 0.0, 0.0, 0.0,
            0.0, s.y, 0.0, 0.0,
            0.0, 0.0, s.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// View matrix (look-at): world space -> camera space.
    pub fn view(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        let z_axis = (eye - target).normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis);

        let rotation = Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, 0.0,
            y_axis.x, y_axis.y, y_axis.z, 0.0,
            z_axis.x, z_axis.y, z_axis.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        );

        rotation * Self::translation(&-eye.coords)
    }

    /// Perspective projection mapping the view frustum to NDC [-1, 1].
    pub fn perspective(fov_y_rad: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let f = 1.0 / (fov_y_rad / 2.0).tan();
        let nf = 1.0 / (near - far);

        Matrix4::new(
            f / aspect_ratio, 0.0, 0.0,               0.0,
            0.0,              f,   0.0,               0.0,
            0.0,              0.0, (far + near) * nf, 2.0 * far * near * nf,
            0.0,              0.0, -1.0,              0.0,
        )
    }

    /// Orthographic projection, used by the shadow pass light camera.
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (near - far);

        Matrix4::new(
            2.0 * rl, 0.0,      0.0,      -(right + left) * rl,
            0.0,      2.0 * tb, 0.0,      -(top + bottom) * tb,
            0.0,      0.0,      2.0 * nf, (far + near) * nf,
            0.0,      0.0,      0.0,      1.0,
        )
    }
}

//=================================
// Per-vertex transform steps
//=================================

/// Perspective division: clip space -> NDC. The caller guards against
/// near-zero w (clipping against the near plane makes that safe).
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        Point3::new(clip.x / w, clip.y / w, clip.z / w)
    } else {
        Point3::origin()
    }
}

/// Viewport transform: NDC xy -> pixel coordinates. NDC +Y is up,
/// screen +Y is down.
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - ndc_y) * 0.5 * height,
    )
}

/// Remaps NDC z in [-1, 1] to depth-buffer range, clamped strictly
/// inside (0, 1) so a valid fragment always beats the cleared far
/// sentinel and never underflows the near side.
#[inline]
pub fn ndc_depth_to_buffer(ndc_z: f32) -> f32 {
    (ndc_z * 0.5 + 0.5).clamp(0.0001, 0.9999)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_maps_ndc_corners() {
        let p = ndc_to_screen(-1.0, 1.0, 800.0, 600.0);
        assert!((p.x, p.y) == (0.0, 0.0));
        let p = ndc_to_screen(1.0, -1.0, 800.0, 600.0);
        assert!((p.x, p.y) == (800.0, 600.0));
        let p = ndc_to_screen(0.0, 0.0, 800.0, 600.0);
        assert!((p.x, p.y) == (400.0, 300.0));
    }

    #[test]
    fn depth_remap_stays_inside_unit_range() {
        assert!((ndc_depth_to_buffer(0.0) - 0.5).abs() < 1e-6);
        assert!(ndc_depth_to_buffer(-1.5) >= 0.0001);
        assert!(ndc_depth_to_buffer(1.5) <= 0.9999);
    }

    #[test]
    fn clip_transform_round_trips_model_position() {
        let model = TransformFactory::translation(&Vector3::new(0.3, -1.0, 2.0))
            * TransformFactory::rotation_y(0.7);
        let view = TransformFactory::view(
            &Point3::new(0.5, 1.5, 5.0),
            &Point3::origin(),
            &Vector3::y(),
        );
        let projection = TransformFactory::perspective(60f32.to_radians(), 4.0 / 3.0, 0.1, 100.0);
        let mvp = projection * view * model;

        let p_model = Point3::new(0.25, -0.4, 0.6);
        let clip = mvp * p_model.to_homogeneous();

        let inv = mvp.try_inverse().expect("mvp invertible");
        let back = inv * clip;
        let recovered = Point3::new(back.x / back.w, back.y / back.w, back.z / back.w);

        assert!((recovered - p_model).norm() < 1e-4);
    }

    #[test]
    fn look_at_places_eye_at_view_origin() {
        let eye = Point3::new(3.0, 2.0, 1.0);
        let view = TransformFactory::view(&eye, &Point3::origin(), &Vector3::y());
        let v = view * eye.to_homogeneous();
        assert!(v.xyz().norm() < 1e-5);
    }
}
