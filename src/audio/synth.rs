//! Tone synthesizer with floating-point phase accumulator
//!
//! Walks the sine table with a fractional read position and writes the
//! mono tone into both channels of an interleaved stereo buffer.
//!
//! Lookup is truncating (nearest lower index, no interpolation). At high
//! increments this adds a small amount of aliasing, which is acceptable
//! for a single test tone.

use crate::config::ToneConfig;
use crate::error::ConfigError;

/// Phase advance per frame
///
/// increment = table_len × tone_hz / sample_rate
#[inline]
pub fn phase_increment(table_len: usize, tone_hz: f32, sample_rate: u32) -> f32 {
    if sample_rate == 0 {
        return 0.0;
    }
    (table_len as f32 * tone_hz) / sample_rate as f32
}

/// Bring a phase back into `[0, len)`
///
/// One subtraction covers every valid increment. Anything still out of
/// range falls back to a modulo so the following table read stays in bounds.
#[inline]
fn wrap_phase(phase: f32, len: f32) -> f32 {
    let mut phase = phase;
    if phase >= len {
        phase -= len;
        if phase >= len {
            phase %= len;
        }
    }
    phase
}

/// Fill an interleaved stereo buffer from the table
///
/// `out` is `[L0, R0, L1, R1, ...]`; frame count is `out.len() / 2` and a
/// trailing odd sample is left untouched. Returns the advanced phase, to be
/// passed to the next call.
///
/// Precondition: `increment <= table.len()`. The returned phase is then
/// always in `[0, table.len())`.
///
/// An empty table or a buffer shorter than one frame leaves `out` unchanged
/// and returns `phase` as given.
pub fn synthesize_frame(table: &[i16], phase: f32, increment: f32, out: &mut [i16]) -> f32 {
    if table.is_empty() || out.len() < 2 {
        return phase;
    }

    let len = table.len() as f32;
    debug_assert!(
        increment <= len,
        "phase increment {} exceeds table length {}",
        increment,
        len
    );

    let mut phase = phase;
    for frame in out.chunks_exact_mut(2) {
        phase = wrap_phase(phase, len);

        // floor() for non-negative phase; len is exact in f32 so idx < table.len()
        let idx = phase as usize;
        let sample = table[idx];

        frame[0] = sample; // L
        frame[1] = sample; // R

        phase += increment;
    }

    wrap_phase(phase, len)
}

/// Sine tone generator
///
/// Owns the phase accumulator for one table. The accumulator persists across
/// [`fill`](Self::fill) calls, so consecutive buffers join without a phase jump.
#[derive(Debug, Clone)]
pub struct ToneSynth<'t> {
    /// Waveform table (one period)
    table: &'t [i16],
    /// Read position into the table, in [0, table.len())
    phase: f32,
    /// Phase advance per frame
    increment: f32,
}

impl<'t> ToneSynth<'t> {
    /// Create a generator for `config`, validating it against the table
    pub fn new(table: &'t [i16], config: &ToneConfig) -> Result<Self, ConfigError> {
        let increment = config.validate(table.len())?;
        Ok(Self {
            table,
            phase: 0.0,
            increment,
        })
    }

    /// Create a generator with a raw phase increment
    ///
    /// # Errors
    /// * [`ConfigError::EmptyTable`] for an empty table
    /// * [`ConfigError::IncrementTooLarge`] if the increment is negative,
    ///   not finite, or larger than the table
    pub fn with_increment(table: &'t [i16], increment: f32) -> Result<Self, ConfigError> {
        if table.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        if !increment.is_finite() || increment < 0.0 || increment > table.len() as f32 {
            return Err(ConfigError::IncrementTooLarge);
        }
        Ok(Self {
            table,
            phase: 0.0,
            increment,
        })
    }

    /// Fill `out` with the next interleaved stereo frames
    #[inline]
    pub fn fill(&mut self, out: &mut [i16]) {
        self.phase = synthesize_frame(self.table, self.phase, self.increment, out);
    }

    /// Current read position
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Phase advance per frame
    #[inline]
    pub fn increment(&self) -> f32 {
        self.increment
    }

    /// Table this generator reads from
    #[inline]
    pub fn table(&self) -> &'t [i16] {
        self.table
    }

    /// Move the read position (wrapped into the table)
    pub fn set_phase(&mut self, phase: f32) {
        let phase = if phase.is_finite() { phase.max(0.0) } else { 0.0 };
        self.phase = wrap_phase(phase, self.table.len() as f32);
    }

    /// Restart from phase zero
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_phase_single_step() {
        assert_eq!(wrap_phase(257.0, 256.0), 1.0);
        assert_eq!(wrap_phase(255.5, 256.0), 255.5);
        assert_eq!(wrap_phase(256.0, 256.0), 0.0);
    }

    #[test]
    fn test_wrap_phase_falls_back_to_modulo() {
        assert_eq!(wrap_phase(1000.0, 256.0), 1000.0 % 256.0);
    }
}
