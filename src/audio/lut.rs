//! Sine wave lookup table
//!
//! One full cycle of a sine, quantized to i16 for direct use with I2S.
//! Built by a `const fn`, so the default table lives in flash as a `static`.

use core::ops::Index;

use crate::config::{CONFIG, TABLE_SIZE};
use crate::error::ConfigError;

/// Quantized sine table covering 0 to 2π
///
/// Entry `i` is `trunc(sin(2π·i/N) × peak)`. For N = 256:
/// index 0 = 0°, 64 = 90°, 128 = 180°, 192 = 270°.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveTable<const N: usize> {
    samples: [i16; N],
}

impl<const N: usize> WaveTable<N> {
    /// Build the table for one period at the given peak amplitude
    ///
    /// Rounds toward zero, so `|entry| <= peak` for every entry.
    ///
    /// # Errors
    /// * [`ConfigError::EmptyTable`] if `N == 0`
    /// * [`ConfigError::InvalidAmplitude`] if `peak <= 0`
    pub const fn build(peak: i16) -> Result<Self, ConfigError> {
        if N == 0 {
            return Err(ConfigError::EmptyTable);
        }
        if peak <= 0 {
            return Err(ConfigError::InvalidAmplitude);
        }

        let mut samples = [0i16; N];
        let mut i = 0;
        while i < N {
            let angle = (i as f64) * core::f64::consts::TAU / (N as f64);
            samples[i] = (const_sin(angle) * peak as f64) as i16;
            i += 1;
        }

        Ok(Self { samples })
    }

    /// Number of entries (one period)
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// True only for the degenerate zero-length table type
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Table entries as a slice
    #[inline]
    pub const fn as_slice(&self) -> &[i16] {
        &self.samples
    }

    /// Entry at `idx`, or `None` past the end
    #[inline]
    pub fn get(&self, idx: usize) -> Option<i16> {
        self.samples.get(idx).copied()
    }

    /// Largest absolute entry in the table
    pub fn peak(&self) -> i16 {
        self.samples
            .iter()
            .map(|s| s.saturating_abs())
            .max()
            .unwrap_or(0)
    }
}

impl<const N: usize> Index<usize> for WaveTable<N> {
    type Output = i16;

    #[inline]
    fn index(&self, idx: usize) -> &i16 {
        &self.samples[idx]
    }
}

impl<const N: usize> AsRef<[i16]> for WaveTable<N> {
    fn as_ref(&self) -> &[i16] {
        &self.samples
    }
}

/// Default sine table: 256 entries, peak 28000
pub static SINE_TABLE: WaveTable<TABLE_SIZE> = match WaveTable::build(CONFIG.peak_amplitude) {
    Ok(table) => table,
    Err(_) => panic!("default sine table configuration is invalid"),
};

/// Const-compatible sine approximation using Taylor series
///
/// Folds the angle into [-π/2, π/2] first; the 13th-order polynomial there
/// is accurate to ~1e-8, far below one i16 quantization step.
const fn const_sin(x: f64) -> f64 {
    use core::f64::consts::{FRAC_PI_2, PI, TAU};

    // Normalize to [-π, π]
    let mut x = x;
    while x > PI {
        x -= TAU;
    }
    while x < -PI {
        x += TAU;
    }

    // sin(π - x) = sin(x)
    if x > FRAC_PI_2 {
        x = PI - x;
    } else if x < -FRAC_PI_2 {
        x = -PI - x;
    }

    // Horner form of x - x³/3! + x⁵/5! - ... + x¹³/13!
    let x2 = x * x;
    x * (1.0
        - x2 / 6.0
            * (1.0
                - x2 / 20.0
                    * (1.0
                        - x2 / 42.0
                            * (1.0 - x2 / 72.0 * (1.0 - x2 / 110.0 * (1.0 - x2 / 156.0))))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_sin_matches_libm() {
        let mut max_err = 0.0f64;
        for i in 0..1000 {
            let x = (i as f64) * core::f64::consts::TAU / 1000.0;
            max_err = max_err.max((const_sin(x) - x.sin()).abs());
        }
        assert!(max_err < 1e-7, "max error {}", max_err);
    }

    #[test]
    fn test_const_sin_negative_and_large_angles() {
        for &x in &[-3.0f64, -1.0, 7.0, 13.5, -20.0] {
            assert!((const_sin(x) - x.sin()).abs() < 1e-7, "x={}", x);
        }
    }
}
