//! Audio subsystem for the I2S sine tone
//!
//! Architecture:
//! - Sine table: 256 entries, built at compile time
//! - Synthesizer: float phase accumulator, truncating table lookup
//! - Frame buffer: 128 stereo frames per I2S write, reused every cycle
//! - Output: I2S standard mode, 16-bit stereo @ 44.1 kHz

pub mod frame;
pub mod lut;
pub mod synth;

pub use frame::{sample_bytes, FrameBuffer};
pub use lut::{WaveTable, SINE_TABLE};
pub use synth::{phase_increment, synthesize_frame, ToneSynth};
