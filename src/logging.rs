//! RT-safe logging for the tone output loop.
//!
//! ```text
//! Output loop            LogStream            UART drain
//! ───────────            ─────────            ──────────
//!
//! rt_warn!() ─────────▶ [L0][L1][L2] ──────▶ UART1 TX
//! non-blocking            lock-free           between writes
//! ```
//!
//! # Rules
//!
//! - The output loop never blocks on logging; `push` drops when the ring is full
//! - Formatting goes into a fixed stack buffer, no allocation
//! - Dropped messages are counted and reported by the drain

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Log ring size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: i64,
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text.
    ///
    /// A multi-byte character cut by truncation is dropped; the valid
    /// prefix is kept.
    pub fn message(&self) -> &str {
        let bytes = &self.msg[..self.len as usize];
        match core::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Ring slot: the entry plus a sequence number saying whose turn it is.
///
/// `seq == pos` means free for the producer claiming `pos`;
/// `seq == pos + 1` means published and ready for the consumer at `pos`.
struct Slot {
    seq: AtomicU32,
    entry: UnsafeCell<LogEntry>,
}

impl Slot {
    const EMPTY: Self = Self {
        seq: AtomicU32::new(0),
        entry: UnsafeCell::new(LogEntry::EMPTY),
    };
}

/// Lock-free bounded log ring.
///
/// Any number of tasks may push (slots are claimed with a CAS on
/// `write_idx`) and drain (claimed with a CAS on `read_idx`). A slot is
/// handed from producer to consumer through its sequence number, so a
/// claimed but unpublished slot is never read.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    slots: [Slot; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: a slot's entry is only written by the producer that won the CAS
// for its position while `seq == pos`, and only read by the consumer that
// won the CAS for `pos` after the Release store of `seq = pos + 1`. The
// slot returns to producers with a Release store of `seq = pos + N`.
unsafe impl<const N: usize> Sync for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");
        assert!(N >= 2, "Log buffer needs at least 2 entries");
        assert!(N <= i32::MAX as usize, "Log buffer too large");

        let mut slots = [Slot::EMPTY; N];
        let mut i = 0;
        while i < N {
            slots[i].seq = AtomicU32::new(i as u32);
            i += 1;
        }

        Self {
            slots,
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry (never blocks, safe from several tasks).
    ///
    /// Messages longer than [`MAX_MSG_LEN`] are truncated. Returns `false`
    /// if the ring was full and the message was dropped.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        let mut pos = self.write_idx.load(Ordering::Relaxed);

        let slot = loop {
            let slot = &self.slots[(pos as usize) & Self::MASK];
            let seq = slot.seq.load(Ordering::Acquire);
            let diff = seq.wrapping_sub(pos) as i32;

            if diff == 0 {
                match self.write_idx.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break slot,
                    Err(current) => pos = current,
                }
            } else if diff < 0 {
                // Slot still holds an entry from the previous lap
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            } else {
                pos = self.write_idx.load(Ordering::Relaxed);
            }
        };

        let len = msg.len().min(MAX_MSG_LEN);

        // SAFETY: this producer owns the slot until seq is published below.
        unsafe {
            let entry = &mut *slot.entry.get();
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);
        }

        slot.seq.store(pos.wrapping_add(1), Ordering::Release);
        true
    }

    /// Take the oldest published entry, or `None` if there is none.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let mut pos = self.read_idx.load(Ordering::Relaxed);

        loop {
            let slot = &self.slots[(pos as usize) & Self::MASK];
            let seq = slot.seq.load(Ordering::Acquire);
            let diff = seq.wrapping_sub(pos.wrapping_add(1)) as i32;

            if diff == 0 {
                match self.read_idx.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // SAFETY: published by its producer, claimed by us.
                        let entry = unsafe { *slot.entry.get() };
                        slot.seq.store(pos.wrapping_add(N as u32), Ordering::Release);
                        return Some(entry);
                    }
                    Err(current) => pos = current,
                }
            } else if diff < 0 {
                // Empty, or the producer has not published yet
                return None;
            } else {
                pos = self.read_idx.load(Ordering::Relaxed);
            }
        }
    }

    /// Messages dropped since the last [`reset_dropped`](Self::reset_dropped).
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() != 0
    }

    /// Entries claimed by producers and not yet drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Relaxed);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Global log stream for the firmware.
pub static LOG_STREAM: LogStream = LogStream::new();

/// Format a message into a buffer, truncating at the buffer end.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl Write for BufWriter<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let room = self.buf.len() - self.pos;
            if s.len() <= room {
                self.buf[self.pos..self.pos + s.len()].copy_from_slice(s.as_bytes());
                self.pos += s.len();
                return Ok(());
            }

            // Cut on a char boundary, then stop formatting
            let mut to_write = room;
            while !s.is_char_boundary(to_write) {
                to_write -= 1;
            }
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&s.as_bytes()[..to_write]);
            self.pos += to_write;
            Err(core::fmt::Error)
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// RT-safe log macro.
///
/// ```ignore
/// rt_log!(LogLevel::Warn, LOG_STREAM, now_us, "short write: {} of {}", n, len);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len])
    }};
}

/// RT-safe error log.
#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe warning log.
#[macro_export]
macro_rules! rt_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe info log.
#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe debug log.
#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_truncates_at_buffer_end() {
        let mut buf = [0u8; 8];
        let len = format_to_buffer(&mut buf, format_args!("phase={:.3}", 12.5f32));
        assert_eq!(len, 8);
        assert_eq!(&buf[..len], b"phase=12");
    }

    #[test]
    fn test_push_truncates_long_message() {
        let stream = LogStream::<4>::new();
        let long = [b'x'; MAX_MSG_LEN + 20];
        assert!(stream.push(0, LogLevel::Debug, &long));
        let entry = stream.drain().unwrap();
        assert_eq!(entry.len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_format_truncates_on_char_boundary() {
        let mut buf = [0u8; 5];
        let len = format_to_buffer(&mut buf, format_args!("a\u{e9}{}x", "\u{20ac}"));
        assert_eq!(&buf[..len], "a\u{e9}".as_bytes());

        let mut buf = [0u8; 4];
        let len = format_to_buffer(&mut buf, format_args!("{}{}", "\u{e9}\u{e9}\u{e9}", "ok"));
        assert_eq!(&buf[..len], "\u{e9}\u{e9}".as_bytes());
    }

    #[test]
    fn test_message_keeps_valid_prefix_of_split_char() {
        let stream = LogStream::<4>::new();
        let mut text = String::from("x");
        for _ in 0..60 {
            text.push('\u{e9}');
        }
        assert!(stream.push(0, LogLevel::Info, text.as_bytes()));

        let entry = stream.drain().unwrap();
        assert_eq!(entry.len as usize, MAX_MSG_LEN);
        assert_eq!(entry.message().len(), MAX_MSG_LEN - 1);
        assert!(entry.message().starts_with("x\u{e9}"));
        assert_eq!(entry.message().chars().count(), 1 + (MAX_MSG_LEN - 2) / 2);
    }

    #[test]
    fn test_message_with_no_valid_prefix_is_empty() {
        let mut entry = LogEntry::default();
        entry.msg[0] = 0xC3;
        entry.len = 1;
        assert_eq!(entry.message(), "");
    }
}
