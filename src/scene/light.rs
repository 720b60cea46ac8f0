use crate::core::color::Rgba;
use nalgebra::{Point3, Vector3};

/// A light source in the scene.
#[derive(Debug, Clone)]
pub enum Light {
    /// Infinitely distant light with parallel rays (e.g. the sun).
    Directional {
        /// Direction the light travels.
        direction: Vector3<f32>,
        color: Rgba,
        intensity: f32,
    },
    /// Radiates in all directions from a position, falling off
    /// quadratically and reaching zero at `range`.
    Point {
        position: Point3<f32>,
        color: Rgba,
        intensity: f32,
        range: f32,
    },
    /// Point light restricted to a cone around `direction`.
    Spot {
        position: Point3<f32>,
        direction: Vector3<f32>,
        color: Rgba,
        intensity: f32,
        range: f32,
        /// Cone half-angle in radians.
        angle: f32,
    },
}

impl Light {
    pub fn directional(direction: Vector3<f32>, color: Rgba, intensity: f32) -> Self {
        Self::Directional {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    pub fn point(position: Point3<f32>, color: Rgba, intensity: f32, range: f32) -> Self {
        Self::Point {
            position,
            color,
            intensity,
            range,
        }
    }

    pub fn spot(
        position: Point3<f32>,
        direction: Vector3<f32>,
        color: Rgba,
        intensity: f32,
        range: f32,
        angle: f32,
    ) -> Self {
        Self::Spot {
            position,
            direction: direction.normalize(),
            color,
            intensity,
            range,
            angle,
        }
    }

    /// Unit vector FROM the surface point TO the light.
    pub fn direction_to(&self, surface: &Point3<f32>) -> Vector3<f32> {
        match self {
            Light::Directional { direction, .. } => -direction,
            Light::Point { position, .. } | Light::Spot { position, .. } => {
                (position - surface).normalize()
            }
        }
    }

    /// Attenuation at the surface point.
    ///
    /// Directional lights do not attenuate. Point and spot lights use
    /// `(1 - d/range)^2`, zero once `d > range`; spot lights
    /// additionally scale by `cos^4` of the angle to the cone axis and
    /// are zero outside the half-angle.
    pub fn attenuation(&self, surface: &Point3<f32>) -> f32 {
        match self {
            Light::Directional { .. } => 1.0,

            Light::Point { position, range, .. } => {
                distance_attenuation((position - surface).norm(), *range)
            }

            Light::Spot {
                position,
                direction,
                range,
                angle,
                ..
            } => {
                let to_surface = position - surface;
                let distance = to_surface.norm();
                let light_dir = to_surface.normalize();

                let cos_angle = -light_dir.dot(&direction.normalize());
                let spot_factor = if cos_angle > angle.cos() {
                    cos_angle.max(0.0).powi(4)
                } else {
                    0.0
                };

                spot_factor * distance_attenuation(distance, *range)
            }
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            Light::Directional { color, .. }
            | Light::Point { color, .. }
            | Light::Spot { color, .. } => *color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Spot { intensity, .. } => *intensity,
        }
    }

    /// Position used as the shadow caster origin. Directional lights
    /// have none; the shadow pass places a virtual caster instead.
    pub fn position(&self) -> Option<Point3<f32>> {
        match self {
            Light::Directional { .. } => None,
            Light::Point { position, .. } | Light::Spot { position, .. } => Some(*position),
        }
    }
}

fn distance_attenuation(distance: f32, range: f32) -> f32 {
    if distance > range {
        0.0
    } else {
        let att = 1.0 - distance / range;
        att * att
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_never_attenuates() {
        let light = Light::directional(Vector3::new(0.0, -1.0, 0.0), Rgba::WHITE, 1.0);
        assert_eq!(light.attenuation(&Point3::new(0.0, -5000.0, 0.0)), 1.0);
        let dir = light.direction_to(&Point3::origin());
        assert!((dir - Vector3::y()).norm() < 1e-6);
    }

    #[test]
    fn point_attenuation_is_quadratic_and_zero_past_range() {
        let light = Light::point(Point3::new(0.0, 10.0, 0.0), Rgba::WHITE, 1.0, 10.0);
        // At the light: full strength.
        assert!((light.attenuation(&Point3::new(0.0, 10.0, 0.0)) - 1.0).abs() < 1e-6);
        // Halfway: (1 - 0.5)^2 = 0.25.
        assert!((light.attenuation(&Point3::new(0.0, 5.0, 0.0)) - 0.25).abs() < 1e-6);
        // Beyond the range: nothing.
        assert_eq!(light.attenuation(&Point3::new(0.0, -1.0, 0.0)), 0.0);
    }

    #[test]
    fn spot_is_dark_outside_the_cone() {
        let light = Light::spot(
            Point3::new(0.0, 5.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Rgba::WHITE,
            1.0,
            20.0,
            0.3,
        );
        // Straight below the light, on-axis: lit.
        assert!(light.attenuation(&Point3::origin()) > 0.0);
        // Far off-axis: outside the half-angle.
        assert_eq!(light.attenuation(&Point3::new(30.0, 4.0, 0.0)), 0.0);
    }
}
