use image::ImageBuffer;
use std::path::Path;

/// Saves a packed ARGB buffer to a PNG file. Alpha is dropped: the
/// framebuffer renders opaque frames.
pub fn save_buffer_to_image(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: &str,
) -> Result<(), String> {
    if buffer.len() != width * height {
        return Err(format!(
            "buffer size {} does not match {}x{}",
            buffer.len(),
            width,
            height
        ));
    }

    let mut img_buf = ImageBuffer::new(width as u32, height as u32);

    for (x, y, pixel) in img_buf.enumerate_pixels_mut() {
        let color_u32 = buffer[(y as usize) * width + (x as usize)];

        let r = ((color_u32 >> 16) & 0xFF) as u8;
        let g = ((color_u32 >> 8) & 0xFF) as u8;
        let b = (color_u32 & 0xFF) as u8;

        *pixel = image::Rgb([r, g, b]);
    }

    img_buf
        .save(Path::new(path))
        .map_err(|e| format!("Failed to save image to '{}': {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_buffer_size_is_an_error() {
        let buffer = vec![0u32; 7];
        assert!(save_buffer_to_image(&buffer, 4, 4, "/tmp/out.png").is_err());
    }
}
