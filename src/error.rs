//! Configuration error types

/// Startup configuration error with code and message
///
/// Raised before the output loop starts. A tone configuration that fails
/// validation never reaches the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// C01: Waveform table has no entries
    EmptyTable,
    /// C02: Peak amplitude is zero or negative
    InvalidAmplitude,
    /// C03: Sample rate is zero
    InvalidSampleRate,
    /// C04: Tone frequency is zero, negative, or not finite
    InvalidFrequency,
    /// C05: Tone frequency is at or above half the sample rate
    AboveNyquist,
    /// C06: Phase increment exceeds the table length
    IncrementTooLarge,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTable => "C01",
            Self::InvalidAmplitude => "C02",
            Self::InvalidSampleRate => "C03",
            Self::InvalidFrequency => "C04",
            Self::AboveNyquist => "C05",
            Self::IncrementTooLarge => "C06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::EmptyTable => "empty waveform table",
            Self::InvalidAmplitude => "peak amplitude must be positive",
            Self::InvalidSampleRate => "sample rate must be positive",
            Self::InvalidFrequency => "invalid tone frequency",
            Self::AboveNyquist => "tone frequency above Nyquist",
            Self::IncrementTooLarge => "phase increment exceeds table length",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl core::error::Error for ConfigError {}
