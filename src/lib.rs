//! # ESP32 I2S Sine
//!
//! Fixed-frequency sine tone streamed to an I2S DAC.
//!
//! ## Architecture
//!
//! ```text
//! SINE_TABLE ──▶ ToneSynth ──▶ FrameBuffer ──▶ AudioSink (I2S)
//!  (static)     (phase acc)    (128 frames)     blocking write
//! ```
//!
//! - The table is built once, at compile time, and only read afterwards
//! - The phase accumulator is owned by the synthesizer and threaded through
//!   every [`synthesize_frame`] call
//! - The frame buffer is reused every cycle; nothing allocates in the loop

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod config;
pub mod error;
pub mod fault;
pub mod hal;
pub mod logging;
pub mod player;
pub mod uart_logger;

pub use audio::{synthesize_frame, FrameBuffer, ToneSynth, WaveTable, SINE_TABLE};
pub use config::{ToneConfig, CONFIG, FRAMES_PER_BUFFER, TABLE_SIZE};
pub use error::ConfigError;
pub use fault::{FaultCode, FaultState};
pub use hal::AudioSink;
pub use logging::{LogStream, LOG_STREAM};
pub use player::TonePlayer;
