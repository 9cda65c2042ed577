//! Fixed-size stereo frame buffer
//!
//! Storage for one I2S write: `FRAMES` interleaved L/R pairs, allocated
//! once (usually as a `static` or on the task stack) and overwritten in
//! place every cycle.

use crate::config::CHANNELS;

/// Audio frame buffer with static size
pub struct FrameBuffer<const FRAMES: usize> {
    frames: [[i16; CHANNELS]; FRAMES],
}

impl<const FRAMES: usize> FrameBuffer<FRAMES> {
    /// Create a silent buffer
    pub const fn new() -> Self {
        Self {
            frames: [[0i16; CHANNELS]; FRAMES],
        }
    }

    /// Number of stereo frames
    #[inline]
    pub const fn len(&self) -> usize {
        FRAMES
    }

    /// Check if buffer holds no frames
    #[inline]
    pub const fn is_empty(&self) -> bool {
        FRAMES == 0
    }

    /// Stereo frames as `[L, R]` pairs
    #[inline]
    pub fn frames(&self) -> &[[i16; CHANNELS]] {
        &self.frames
    }

    /// Interleaved samples `[L0, R0, L1, R1, ...]`, length `FRAMES * 2`
    #[inline]
    pub fn samples(&self) -> &[i16] {
        self.frames.as_flattened()
    }

    /// Mutable interleaved samples, for the synthesizer to fill
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [i16] {
        self.frames.as_flattened_mut()
    }

    /// Raw bytes of the interleaved samples, native endianness
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        sample_bytes(self.samples())
    }

    /// Fill with silence
    #[inline]
    pub fn clear(&mut self) {
        self.samples_mut().fill(0);
    }
}

impl<const FRAMES: usize> Default for FrameBuffer<FRAMES> {
    fn default() -> Self {
        Self::new()
    }
}

/// View 16-bit samples as bytes for a DMA write
///
/// ESP32 is little-endian, which is the sample order the I2S peripheral
/// shifts out.
#[inline]
pub fn sample_bytes(samples: &[i16]) -> &[u8] {
    bytemuck::cast_slice(samples)
}
