//! Hardware Abstraction Layer for the I2S sine generator.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Synthesis stays in `audio`, HAL is just I/O.

pub mod i2s;

pub use i2s::{I2sPinConfig, I2S_PINS};

#[cfg(target_os = "espidf")]
pub use i2s::I2sSink;

/// Destination for interleaved 16-bit stereo samples.
///
/// `write` hands over one buffer and returns how many samples the sink
/// accepted. It may block; the timeout policy belongs to the implementation.
pub trait AudioSink {
    type Error: core::fmt::Debug;

    fn write(&mut self, samples: &[i16]) -> Result<usize, Self::Error>;
}

impl<S: AudioSink + ?Sized> AudioSink for &mut S {
    type Error = S::Error;

    #[inline]
    fn write(&mut self, samples: &[i16]) -> Result<usize, Self::Error> {
        (**self).write(samples)
    }
}
