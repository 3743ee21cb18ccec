// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A shareable bitmap of premultiplied RGBA8 pixels.

use crate::peniko::color::PremulRgba8;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// A bitmap of premultiplied RGBA8 values.
///
/// Cloning a `Bitmap` creates another handle to the same pixels, which is how a fill
/// scheduled on a worker thread gets access to its destination. Each pixel is stored
/// in its own atomic word, so concurrent writes are memory-safe, but no ordering is
/// guaranteed between fills that write to the same bitmap at the same time.
#[derive(Debug, Clone)]
pub struct Bitmap {
    /// Width of the bitmap in pixels.
    width: u16,
    /// Height of the bitmap in pixels.
    height: u16,
    /// Pixels in row-major order, packed with [`pack`].
    pixels: Arc<[AtomicU32]>,
}

impl Bitmap {
    /// Create a new bitmap with the given width and height in pixels.
    ///
    /// All pixels are initialized to transparent black.
    pub fn new(width: u16, height: u16) -> Self {
        let len = usize::from(width) * usize::from(height);
        let pixels = (0..len).map(|_| AtomicU32::new(0)).collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Return the width of the bitmap.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Return the height of the bitmap.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whether `self` and `other` are handles to the same pixels.
    pub fn shares_pixels_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Return the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u16, y: u16) -> PremulRgba8 {
        unpack(self.row(y)[usize::from(x)].load(Ordering::Relaxed))
    }

    /// Set the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn set_pixel(&self, x: u16, y: u16, value: PremulRgba8) {
        self.row(y)[usize::from(x)].store(pack(value), Ordering::Relaxed);
    }

    /// Return the packed pixels of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn row(&self, y: u16) -> &[AtomicU32] {
        assert!(y < self.height, "row {y} is out of bounds");
        let width = usize::from(self.width);
        let start = usize::from(y) * width;
        &self.pixels[start..start + width]
    }

    /// Set every pixel to `value`.
    pub fn clear(&self, value: PremulRgba8) {
        let packed = pack(value);
        for pixel in self.pixels.iter() {
            pixel.store(packed, Ordering::Relaxed);
        }
    }

    /// Copy the current pixels out of the bitmap, in row-major order.
    pub fn snapshot(&self) -> Vec<PremulRgba8> {
        self.pixels
            .iter()
            .map(|p| unpack(p.load(Ordering::Relaxed)))
            .collect()
    }

    /// Copy the current pixels out of the bitmap as `r, g, b, a` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Packed words are little-endian `r, g, b, a`, so `to_le` fixes the byte order
        // in memory on every target.
        let words: Vec<u32> = self
            .pixels
            .iter()
            .map(|p| p.load(Ordering::Relaxed).to_le())
            .collect();
        bytemuck::cast_slice(&words).to_vec()
    }
}

/// Pack a pixel into the word stored in a [`Bitmap`].
#[inline(always)]
pub fn pack(value: PremulRgba8) -> u32 {
    u32::from_le_bytes([value.r, value.g, value.b, value.a])
}

/// Unpack a word stored in a [`Bitmap`].
#[inline(always)]
pub fn unpack(value: u32) -> PremulRgba8 {
    let [r, g, b, a] = value.to_le_bytes();
    PremulRgba8 { r, g, b, a }
}
