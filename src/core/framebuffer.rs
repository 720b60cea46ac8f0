use crate::core::color::Rgba;
use std::cell::UnsafeCell;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Depth value every pixel is reset to by `clear`. The viewport
/// transform clamps fragment depth strictly below this, so a cleared
/// pixel always loses the depth test to real geometry.
pub const DEPTH_FAR: f32 = 1.0;

/// A 2D color + depth target.
///
/// Thread-safe for parallel rasterization: the depth test is an atomic
/// CAS on the f32 bits, and color writes go through a striped lock pool.
/// Every access is bounds-checked; out-of-range writes are no-ops.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    /// Packed ARGB color values. Interior mutability so shared borrows
    /// can write during the parallel pixel loop; guarded by `locks`.
    color: UnsafeCell<Vec<u32>>,

    /// Normalized depth in [0, 1], stored as f32 bits.
    depth: Vec<AtomicU32>,

    /// Striped locks protecting color writes. Pixel index modulo the
    /// pool size selects the lock.
    locks: Vec<Mutex<()>>,
}

// Safety: depth is atomic and every color write holds the stripe lock
// for its pixel index.
unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        let far_bits = DEPTH_FAR.to_bits();

        let mut depth = Vec::with_capacity(size);
        for _ in 0..size {
            depth.push(AtomicU32::new(far_bits));
        }

        let lock_count = 1024.min(size.max(1));
        let mut locks = Vec::with_capacity(lock_count);
        for _ in 0..lock_count {
            locks.push(Mutex::new(()));
        }

        Self {
            width,
            height,
            color: UnsafeCell::new(vec![Rgba::BLACK.to_u32(); size]),
            depth,
            locks,
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Resets every pixel to `color` and every depth sample to the far
    /// sentinel. Requires exclusive access; runs between frames.
    pub fn clear(&mut self, color: Rgba) {
        let packed = color.to_u32();
        self.color.get_mut().fill(packed);

        let far_bits = DEPTH_FAR.to_bits();
        for d in &self.depth {
            d.store(far_bits, Ordering::Relaxed);
        }
    }

    /// Strict less-than depth test with atomic update.
    ///
    /// Returns true (and stores `new_depth`) only if the fragment is
    /// strictly closer than the current value, so per-pixel depth is
    /// monotonically non-increasing within a frame.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        let new_bits = new_depth.to_bits();
        let atomic = &self.depth[idx];

        let mut current_bits = atomic.load(Ordering::Relaxed);
        loop {
            if new_depth >= f32::from_bits(current_bits) {
                return false;
            }
            match atomic.compare_exchange_weak(
                current_bits,
                new_bits,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated) => current_bits = updated,
            }
        }
    }

    /// Thread-safe color write. Call only after a passed depth test.
    #[inline]
    pub fn set_pixel(&self, x: usize, y: usize, color: Rgba) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        let lock_idx = idx % self.locks.len();
        let _guard = self.locks[lock_idx].lock().unwrap();

        // Safe: the stripe lock serializes writes to this index.
        unsafe {
            let buffer = &mut *self.color.get();
            buffer[idx] = color.to_u32();
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if !self.in_bounds(x, y) {
            return None;
        }
        // Reads happen after rendering completes, when no writer is live.
        let buffer = unsafe { &*self.color.get() };
        Some(Rgba::from_u32(buffer[self.index(x, y)]))
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(f32::from_bits(
            self.depth[self.index(x, y)].load(Ordering::Relaxed),
        ))
    }

    /// Snapshot of the depth plane, row-major. Used to lift a completed
    /// shadow pass out of its framebuffer.
    pub fn depth_plane(&self) -> Vec<f32> {
        self.depth
            .iter()
            .map(|d| f32::from_bits(d.load(Ordering::Relaxed)))
            .collect()
    }

    /// Snapshot of the packed color plane, row-major.
    pub fn color_plane(&self) -> Vec<u32> {
        let buffer = unsafe { &*self.color.get() };
        buffer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_color_and_depth() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.set_pixel(1, 1, Rgba::rgb(9, 9, 9));
        fb.depth_test_and_update(1, 1, 0.3);

        fb.clear(Rgba::rgb(10, 20, 30));
        assert_eq!(fb.pixel(1, 1), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(fb.depth_at(1, 1), Some(DEPTH_FAR));
    }

    #[test]
    fn depth_is_monotonically_non_increasing() {
        let fb = FrameBuffer::new(2, 2);
        assert!(fb.depth_test_and_update(0, 0, 0.8));
        assert!(fb.depth_test_and_update(0, 0, 0.5));
        // Farther and equal fragments must not win.
        assert!(!fb.depth_test_and_update(0, 0, 0.7));
        assert!(!fb.depth_test_and_update(0, 0, 0.5));
        assert_eq!(fb.depth_at(0, 0), Some(0.5));
    }

    #[test]
    fn set_pixel_is_visible_through_pixel() {
        let fb = FrameBuffer::new(3, 3);
        fb.set_pixel(2, 1, Rgba::rgb(7, 8, 9));
        assert_eq!(fb.pixel(2, 1), Some(Rgba::rgb(7, 8, 9)));
        assert_eq!(fb.pixel(0, 0), Some(Rgba::BLACK));
    }

    #[test]
    fn out_of_bounds_writes_are_noops() {
        let fb = FrameBuffer::new(2, 2);
        assert!(!fb.depth_test_and_update(5, 0, 0.1));
        fb.set_pixel(2, 2, Rgba::WHITE);
        assert_eq!(fb.pixel(2, 2), None);
        assert_eq!(fb.depth_at(9, 9), None);
    }
}
