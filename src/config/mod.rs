//! Module: config
//!
//! Purpose: Tone configuration for the I2S sine generator.
//!
//! Architecture:
//! - Table and frame sizes are compile-time constants (they size static storage)
//! - Tone parameters live in [`ToneConfig`], with [`CONFIG`] as the firmware default
//! - [`ToneConfig::validate`] runs once at startup, before the output loop
//!
//! Safety: RT-safe. Plain constants, nothing mutable.

use crate::error::ConfigError;

/// Waveform table length (entries per sine period)
pub const TABLE_SIZE: usize = 256;

/// Stereo frames per I2S write
pub const FRAMES_PER_BUFFER: usize = 128;

/// Output channels (mono tone duplicated to L/R)
pub const CHANNELS: usize = 2;

/// Tone parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneConfig {
    /// Tone frequency in Hz
    pub tone_hz: f32,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Peak quantized amplitude (1..=32767)
    pub peak_amplitude: i16,
}

/// Firmware defaults: A4 at CD rate, peak leaves ~1.3 dB headroom
pub const CONFIG: ToneConfig = ToneConfig {
    tone_hz: 440.0,
    sample_rate: 44_100,
    peak_amplitude: 28_000,
};

impl Default for ToneConfig {
    fn default() -> Self {
        CONFIG
    }
}

impl ToneConfig {
    /// Phase advance per frame for a table of `table_len` entries
    ///
    /// increment = table_len × tone_hz / sample_rate
    #[inline]
    pub fn increment(&self, table_len: usize) -> f32 {
        crate::audio::synth::phase_increment(table_len, self.tone_hz, self.sample_rate)
    }

    /// Check the configuration against a table and return the phase increment
    ///
    /// The synthesizer wraps its accumulator with a single subtraction per
    /// frame, so the increment must not exceed the table length. Tones at or
    /// above Nyquist are rejected as well.
    pub fn validate(&self, table_len: usize) -> Result<f32, ConfigError> {
        if table_len == 0 {
            return Err(ConfigError::EmptyTable);
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        if !self.tone_hz.is_finite() || self.tone_hz <= 0.0 {
            return Err(ConfigError::InvalidFrequency);
        }
        if self.peak_amplitude <= 0 {
            return Err(ConfigError::InvalidAmplitude);
        }
        if self.tone_hz >= self.sample_rate as f32 / 2.0 {
            return Err(ConfigError::AboveNyquist);
        }

        let increment = self.increment(table_len);
        if increment > table_len as f32 {
            return Err(ConfigError::IncrementTooLarge);
        }

        Ok(increment)
    }
}
