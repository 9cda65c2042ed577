//! Sine lookup table tests

use i2s_sine::audio::lut::{WaveTable, SINE_TABLE};
use i2s_sine::{ConfigError, CONFIG, TABLE_SIZE};

/// trunc(peak × sin(2π·i/N)) computed with libm
fn reference(i: usize, n: usize, peak: i16) -> i16 {
    let phase = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
    (phase.sin() * peak as f64) as i16
}

#[test]
fn test_table_size() {
    assert_eq!(SINE_TABLE.len(), TABLE_SIZE);
    assert_eq!(SINE_TABLE.as_slice().len(), 256);
    assert!(!SINE_TABLE.is_empty());
}

#[test]
fn test_table_matches_sine_within_one_unit() {
    for i in 0..TABLE_SIZE {
        let expected = reference(i, TABLE_SIZE, CONFIG.peak_amplitude) as i32;
        let actual = SINE_TABLE[i] as i32;
        assert!(
            (actual - expected).abs() <= 1,
            "table[{}] = {}, expected {}",
            i,
            actual,
            expected
        );
    }
}

#[test]
fn test_table_zero_crossings() {
    assert_eq!(SINE_TABLE[0], 0);
    // Half period, within quantization error of 0
    assert!(SINE_TABLE[TABLE_SIZE / 2].abs() <= 1);
}

#[test]
fn test_table_quarter_periods() {
    assert!((SINE_TABLE[64] as i32 - 28_000).abs() <= 1, "table[64] = {}", SINE_TABLE[64]);
    assert!((SINE_TABLE[192] as i32 + 28_000).abs() <= 1, "table[192] = {}", SINE_TABLE[192]);
}

#[test]
fn test_table_odd_symmetry() {
    for i in 1..TABLE_SIZE {
        let sum = SINE_TABLE[i] as i32 + SINE_TABLE[TABLE_SIZE - i] as i32;
        assert!(sum.abs() <= 1, "table[{}] + table[{}] = {}", i, TABLE_SIZE - i, sum);
    }
}

#[test]
fn test_table_never_exceeds_peak() {
    assert!(SINE_TABLE.peak() <= CONFIG.peak_amplitude);
    assert!(SINE_TABLE.peak() >= CONFIG.peak_amplitude - 1);
}

#[test]
fn test_build_is_deterministic() {
    let a = WaveTable::<256>::build(28_000).unwrap();
    let b = WaveTable::<256>::build(28_000).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, SINE_TABLE);
}

#[test]
fn test_build_odd_sizes_and_full_scale() {
    let table = WaveTable::<7>::build(i16::MAX).unwrap();
    for i in 0..7 {
        let diff = table[i] as i32 - reference(i, 7, i16::MAX) as i32;
        assert!(diff.abs() <= 1, "entry {} off by {}", i, diff);
    }

    let single = WaveTable::<1>::build(1000).unwrap();
    assert_eq!(single.as_slice(), &[0]);
}

#[test]
fn test_build_rejects_bad_input() {
    assert_eq!(WaveTable::<0>::build(1000), Err(ConfigError::EmptyTable));
    assert_eq!(WaveTable::<16>::build(0), Err(ConfigError::InvalidAmplitude));
    assert_eq!(WaveTable::<16>::build(-5), Err(ConfigError::InvalidAmplitude));
}

#[test]
fn test_table_get_out_of_range() {
    assert_eq!(SINE_TABLE.get(0), Some(0));
    assert_eq!(SINE_TABLE.get(TABLE_SIZE), None);
}

#[test]
fn test_table_buildable_in_const_context() {
    const SMALL: WaveTable<4> = match WaveTable::build(100) {
        Ok(t) => t,
        Err(_) => panic!("bad table"),
    };
    assert_eq!(SMALL.as_slice(), &[0, 100, 0, -100]);
}
