//! Tone output loop.
//!
//! One [`TonePlayer::step`] is one output cycle:
//! synthesize a frame buffer, hand it to the sink, account for it.
//!
//! # Rules
//!
//! - The frame buffer is owned by the player and overwritten every cycle
//! - A sink error or short write raises a FAULT and is logged, never panics
//! - The phase keeps advancing across faults, so output resumes in phase

use crate::audio::{FrameBuffer, ToneSynth};
use crate::config::FRAMES_PER_BUFFER;
use crate::fault::{FaultCode, FaultState};
use crate::hal::AudioSink;
use crate::logging::LogStream;

/// Drives a [`ToneSynth`] into an [`AudioSink`], one buffer per step.
///
/// # Example
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// let synth = ToneSynth::new(SINE_TABLE.as_slice(), &CONFIG)?;
/// let mut player: TonePlayer<_> = TonePlayer::new(synth, i2s_sink);
///
/// loop {
///     if let Err(code) = player.step(now_us(), &FAULT, &LOG_STREAM) {
///         // sink failed, back off before the next write
///     }
/// }
/// ```
pub struct TonePlayer<'t, S, const FRAMES: usize = FRAMES_PER_BUFFER> {
    synth: ToneSynth<'t>,
    sink: S,
    buffer: FrameBuffer<FRAMES>,
    frames_rendered: u64,
    buffers_written: u64,
}

impl<'t, S: AudioSink, const FRAMES: usize> TonePlayer<'t, S, FRAMES> {
    pub fn new(synth: ToneSynth<'t>, sink: S) -> Self {
        Self {
            synth,
            sink,
            buffer: FrameBuffer::new(),
            frames_rendered: 0,
            buffers_written: 0,
        }
    }

    /// Run one output cycle.
    ///
    /// Returns the number of samples the sink accepted.
    ///
    /// # Errors
    /// * [`FaultCode::SinkWrite`] if the sink returned an error
    ///   (fault data: samples offered)
    /// * [`FaultCode::ShortWrite`] if it accepted less than the whole buffer
    ///   (fault data: samples accepted)
    pub fn step<const L: usize>(
        &mut self,
        now_us: i64,
        fault: &FaultState,
        log: &LogStream<L>,
    ) -> Result<usize, FaultCode> {
        self.synth.fill(self.buffer.samples_mut());
        self.frames_rendered += FRAMES as u64;

        let offered = self.buffer.samples().len();
        match self.sink.write(self.buffer.samples()) {
            Ok(accepted) if accepted >= offered => {
                self.buffers_written += 1;
                Ok(accepted)
            }
            Ok(accepted) => {
                fault.set(FaultCode::ShortWrite, accepted as u32);
                crate::rt_warn!(log, now_us, "short write: {} of {} samples", accepted, offered);
                Err(FaultCode::ShortWrite)
            }
            Err(e) => {
                fault.set(FaultCode::SinkWrite, offered as u32);
                crate::rt_error!(log, now_us, "sink write failed: {:?}", e);
                Err(FaultCode::SinkWrite)
            }
        }
    }

    /// Last buffer handed to the sink.
    #[inline]
    pub fn buffer(&self) -> &FrameBuffer<FRAMES> {
        &self.buffer
    }

    #[inline]
    pub fn synth(&self) -> &ToneSynth<'t> {
        &self.synth
    }

    #[inline]
    pub fn synth_mut(&mut self) -> &mut ToneSynth<'t> {
        &mut self.synth
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Frames synthesized since creation (including failed writes).
    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Buffers the sink accepted in full.
    #[inline]
    pub fn buffers_written(&self) -> u64 {
        self.buffers_written
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
