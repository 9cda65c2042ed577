//! Fault state for the tone output loop.
//!
//! A failed or short I2S write latches a fault. The output loop stops
//! feeding the sink while the fault is active; a glitching DAC is worse
//! than a silent one.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes indicating why output stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// The sink rejected a buffer (driver error or timeout).
    SinkWrite = 1,

    /// The sink accepted fewer samples than the buffer holds.
    /// Data: number of samples accepted.
    ShortWrite = 2,

    /// Startup configuration was rejected.
    Config = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::SinkWrite,
            2 => FaultCode::ShortWrite,
            3 => FaultCode::Config,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault state.
///
/// Raised by [`TonePlayer`](crate::player::TonePlayer), checked by the
/// firmware loop before each write.
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// loop {
///     if FAULT.is_active() {
///         backoff();
///         FAULT.clear();
///         continue;
///     }
///     let _ = player.step(now_us(), &FAULT, &LOG_STREAM);
/// }
/// ```
pub struct FaultState {
    active: AtomicBool,
    code: AtomicU8,
    /// Meaning depends on the code (samples accepted, driver error code).
    data: AtomicU32,
    /// Total faults since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(FaultCode::None as u8),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Latch a fault and bump the counter.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Last fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear the active flag. The counter is kept for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_latch_and_clear() {
        let fault = FaultState::new();
        assert!(!fault.is_active());
        assert_eq!(fault.code(), FaultCode::None);

        fault.set(FaultCode::ShortWrite, 128);
        assert_eq!(
            fault.snapshot(),
            FaultSnapshot {
                active: true,
                code: FaultCode::ShortWrite,
                data: 128,
                count: 1,
            }
        );

        fault.clear();
        assert!(!fault.is_active());
        assert_eq!(fault.count(), 1);
    }

    #[test]
    fn test_fault_code_roundtrip() {
        for code in [
            FaultCode::None,
            FaultCode::SinkWrite,
            FaultCode::ShortWrite,
            FaultCode::Config,
        ] {
            assert_eq!(FaultCode::from_u8(code as u8), code);
        }
        assert_eq!(FaultCode::from_u8(200), FaultCode::None);
    }
}
