use nalgebra::Vector4;
use std::ops::{Add, Mul};

/// Packed 8-bit RGBA color.
///
/// All shading arithmetic happens channel-wise in `f32`, clamps to
/// [0, 255] and truncates back to `u8`. For interpolation across a
/// triangle the channels are carried as continuous values (see
/// [`Rgba::to_vec`]) and rounded only when the fragment is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color (alpha = 255).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Packs as ARGB, matching the framebuffer layout.
    pub const fn to_u32(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub const fn from_u32(packed: u32) -> Self {
        Self {
            a: ((packed >> 24) & 0xFF) as u8,
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// Continuous channel representation in 0..255 units, used as the
    /// interpolation form inside varyings.
    pub fn to_vec(self) -> Vector4<f32> {
        Vector4::new(self.r as f32, self.g as f32, self.b as f32, self.a as f32)
    }

    /// Rounds continuous channels back to 8 bits, clamping to [0, 255].
    ///
    /// Rounding (not truncating) matters: barycentric weights sum to 1
    /// only within float error, so a flat-colored surface would
    /// otherwise flicker between 254 and 255.
    pub fn from_vec(v: Vector4<f32>) -> Self {
        Self {
            r: v.x.clamp(0.0, 255.0).round() as u8,
            g: v.y.clamp(0.0, 255.0).round() as u8,
            b: v.z.clamp(0.0, 255.0).round() as u8,
            a: v.w.clamp(0.0, 255.0).round() as u8,
        }
    }

    /// Tints this color by a light color: `(c * l) / 255` per channel.
    pub fn modulate(self, light: Rgba) -> Self {
        Self {
            r: ((self.r as f32 * light.r as f32) / 255.0).min(255.0) as u8,
            g: ((self.g as f32 * light.g as f32) / 255.0).min(255.0) as u8,
            b: ((self.b as f32 * light.b as f32) / 255.0).min(255.0) as u8,
            a: self.a,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

/// Scales the RGB channels, clamped to [0, 255]. Alpha is preserved.
impl Mul<f32> for Rgba {
    type Output = Rgba;

    fn mul(self, scalar: f32) -> Rgba {
        Rgba {
            r: (self.r as f32 * scalar).clamp(0.0, 255.0) as u8,
            g: (self.g as f32 * scalar).clamp(0.0, 255.0) as u8,
            b: (self.b as f32 * scalar).clamp(0.0, 255.0) as u8,
            a: self.a,
        }
    }
}

/// Saturating channel-wise add. Alpha comes from the left operand.
impl Add for Rgba {
    type Output = Rgba;

    fn add(self, other: Rgba) -> Rgba {
        Rgba {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
            a: self.a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_round_trip() {
        let c = Rgba::new(12, 200, 34, 77);
        assert_eq!(Rgba::from_u32(c.to_u32()), c);
    }

    #[test]
    fn scale_clamps_and_truncates() {
        let c = Rgba::rgb(200, 100, 40);
        assert_eq!(c * 0.25, Rgba::rgb(50, 25, 10));
        assert_eq!(c * 2.0, Rgba::rgb(255, 200, 80));
        assert_eq!((c * 2.0).a, 255);
    }

    #[test]
    fn add_saturates() {
        let c = Rgba::rgb(200, 200, 200) + Rgba::rgb(100, 10, 56);
        assert_eq!(c, Rgba::rgb(255, 210, 255));
    }

    #[test]
    fn modulate_normalizes_by_255() {
        let c = Rgba::rgb(100, 200, 0);
        assert_eq!(c.modulate(Rgba::WHITE), c);
        assert_eq!(c.modulate(Rgba::BLACK), Rgba::rgb(0, 0, 0));
        assert_eq!(c.modulate(Rgba::rgb(127, 127, 127)), Rgba::rgb(49, 99, 0));
    }

    #[test]
    fn vec_form_clamps_and_rounds() {
        let v = Vector4::new(-4.0, 300.0, 128.9, 255.0);
        assert_eq!(Rgba::from_vec(v), Rgba::rgb(0, 255, 129));
        let near_white = Vector4::new(254.99998, 255.00001, 255.0, 255.0);
        assert_eq!(Rgba::from_vec(near_white), Rgba::WHITE);
    }
}
