use crate::core::color::Rgba;
use image::GenericImageView;
use log::info;
use nalgebra::Vector4;
use std::path::Path;

/// A 2D bitmap sampled with bilinear filtering and wraparound
/// addressing. Available as an attribute source; the fixed shader set
/// does not require one.
#[derive(Debug, Clone)]
pub struct Texture {
    pixels: Vec<Rgba>,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img =
            image::open(path_ref).map_err(|e| format!("failed to load texture: {e}"))?;

        let (width, height) = img.dimensions();
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for (_, _, p) in img.pixels() {
            pixels.push(Rgba::new(p[0], p[1], p[2], p[3]));
        }

        info!("loaded texture {:?} ({}x{})", path_ref, width, height);
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Texture from raw pixels, row-major. Used by tests and
    /// procedural sources.
    pub fn from_pixels(pixels: Vec<Rgba>, width: u32, height: u32) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bilinear sample at UV in [0, 1] with repeat wrapping outside.
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        // Repeat addressing: fract() then shift negatives up.
        let u = u.fract();
        let v = v.fract();
        let u = if u < 0.0 { 1.0 + u } else { u };
        let v = if v < 0.0 { 1.0 + v } else { v };

        // Pixel centers sit at half-texel offsets.
        let x = u * self.width as f32 - 0.5;
        let y = (1.0 - v) * self.height as f32 - 0.5;

        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let wx = x - x.floor();
        let wy = y - y.floor();

        let c00 = self.texel_wrapped(x0, y0).to_vec();
        let c10 = self.texel_wrapped(x0 + 1, y0).to_vec();
        let c01 = self.texel_wrapped(x0, y0 + 1).to_vec();
        let c11 = self.texel_wrapped(x0 + 1, y0 + 1).to_vec();

        let top = c00 * (1.0 - wx) + c10 * wx;
        let bottom = c01 * (1.0 - wx) + c11 * wx;
        let blended: Vector4<f32> = top * (1.0 - wy) + bottom * wy;

        Rgba::from_vec(blended)
    }

    fn texel_wrapped(&self, x: i32, y: i32) -> Rgba {
        let w = self.width as i32;
        let h = self.height as i32;
        // Euclidean modulo so negative coordinates wrap upward.
        let x = ((x % w) + w) % w;
        let y = ((y % h) + h) % h;
        self.pixels[(y * w + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        let b = Rgba::BLACK;
        let w = Rgba::WHITE;
        Texture::from_pixels(vec![b, w, w, b], 2, 2)
    }

    #[test]
    fn texel_centers_sample_exactly() {
        let tex = checker();
        // v = 0.75 maps to the top row (v is flipped).
        assert_eq!(tex.sample(0.25, 0.75), Rgba::BLACK);
        assert_eq!(tex.sample(0.75, 0.75), Rgba::WHITE);
    }

    #[test]
    fn midpoints_blend_bilinearly() {
        let tex = checker();
        let c = tex.sample(0.5, 0.5);
        assert_eq!(c.r, 128);
        assert_eq!(c.g, 128);
        assert_eq!(c.b, 128);
    }

    #[test]
    fn uv_wraps_around() {
        let tex = checker();
        assert_eq!(tex.sample(1.25, 0.75), tex.sample(0.25, 0.75));
        assert_eq!(tex.sample(-0.75, 0.75), tex.sample(0.25, 0.75));
    }
}
