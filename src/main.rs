//! ESP32 I2S Sine - Main entry point
//!
//! On the ESP32:
//! 1. Initialize UART1 logging
//! 2. Validate the tone configuration
//! 3. Configure I2S0 in standard mode (BCLK 26, WS 25, DOUT 22)
//! 4. Loop forever: synthesize 128 frames, blocking write, drain logs
//!
//! On a host build the same player renders into a WAV file instead.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::i2s::{I2sDriver, I2sTx};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::UartTxDriver;
    use esp_idf_svc::sys as esp_idf_sys;

    use i2s_sine::hal::i2s::{philips_16bit_stereo, I2sSink, I2S_PINS};
    use i2s_sine::uart_logger::{drain_to_uart, init_uart_logger, UartLoggerConfig};
    use i2s_sine::{
        rt_error, rt_info, FaultCode, FaultState, ToneSynth, TonePlayer, CONFIG, LOG_STREAM,
        SINE_TABLE,
    };

    static FAULT_STATE: FaultState = FaultState::new();

    /// Ticks to wait after a fault before writing again.
    const FAULT_BACKOFF_TICKS: u32 = 100;

    fn timestamp_us() -> i64 {
        unsafe { esp_idf_sys::esp_timer_get_time() }
    }

    fn delay_ticks(ticks: u32) {
        unsafe {
            esp_idf_sys::vTaskDelay(ticks);
        }
    }

    /// Stop for good, keep flushing logs.
    fn halt(uart: &mut UartTxDriver<'_>) -> ! {
        loop {
            drain_to_uart(uart, &LOG_STREAM);
            delay_ticks(1000);
        }
    }

    #[no_mangle]
    fn main() {
        // Initialize ESP-IDF
        esp_idf_sys::link_patches();

        let Ok(peripherals) = Peripherals::take() else {
            // Nothing to report to without peripherals
            loop {
                delay_ticks(1000);
            }
        };
        let pins = peripherals.pins;

        let Ok(mut uart) = init_uart_logger(
            peripherals.uart1,
            pins.gpio17,
            &UartLoggerConfig::default(),
        ) else {
            loop {
                delay_ticks(1000);
            }
        };

        rt_info!(LOG_STREAM, timestamp_us(), "{}", env!("VERSION_STRING"));

        let synth = match ToneSynth::new(SINE_TABLE.as_slice(), &CONFIG) {
            Ok(synth) => synth,
            Err(e) => {
                FAULT_STATE.set(FaultCode::Config, 0);
                rt_error!(LOG_STREAM, timestamp_us(), "config rejected: {}", e);
                halt(&mut uart);
            }
        };

        // The typed pins handed to the driver must be the ones I2S_PINS reports
        const _: () = assert!(
            I2S_PINS.bclk == 26 && I2S_PINS.ws == 25 && I2S_PINS.dout == 22,
            "I2S_PINS out of sync with the driver pins"
        );

        let i2s_config = philips_16bit_stereo(CONFIG.sample_rate);
        let sink = I2sDriver::<I2sTx>::new_std_tx(
            peripherals.i2s0,
            &i2s_config,
            pins.gpio26,
            pins.gpio22,
            Option::<AnyIOPin>::None,
            pins.gpio25,
        )
        .and_then(I2sSink::new);

        let sink = match sink {
            Ok(sink) => sink,
            Err(e) => {
                rt_error!(LOG_STREAM, timestamp_us(), "I2S init failed: {:?}", e);
                halt(&mut uart);
            }
        };

        rt_info!(
            LOG_STREAM,
            timestamp_us(),
            "tone {} Hz @ {} Hz, inc {:.4}, BCLK={} WS={} DOUT={}",
            CONFIG.tone_hz,
            CONFIG.sample_rate,
            synth.increment(),
            I2S_PINS.bclk,
            I2S_PINS.ws,
            I2S_PINS.dout
        );
        drain_to_uart(&mut uart, &LOG_STREAM);

        let mut player: TonePlayer<'_, _> = TonePlayer::new(synth, sink);

        loop {
            if FAULT_STATE.is_active() {
                drain_to_uart(&mut uart, &LOG_STREAM);
                delay_ticks(FAULT_BACKOFF_TICKS);
                FAULT_STATE.clear();
                continue;
            }

            // Blocks until DMA has room for the buffer. A failed step has
            // latched the fault; the backoff branch drains its log.
            if player.step(timestamp_us(), &FAULT_STATE, &LOG_STREAM).is_err() {
                continue;
            }

            drain_to_uart(&mut uart, &LOG_STREAM);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod bounce {
    use std::io::{Seek, Write};
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use hound::{SampleFormat, WavSpec, WavWriter};

    use i2s_sine::config::CHANNELS;
    use i2s_sine::uart_logger::format_log_entry;
    use i2s_sine::{
        AudioSink, FaultState, LogStream, ToneConfig, ToneSynth, TonePlayer, CONFIG,
        FRAMES_PER_BUFFER, SINE_TABLE,
    };

    /// Render the I2S sine tone to a WAV file
    #[derive(Parser, Debug)]
    #[command(name = "sine-tone", version = env!("VERSION_STRING"))]
    pub struct Args {
        /// Output WAV path
        #[arg(short, long, default_value = "tone.wav")]
        pub output: PathBuf,

        /// Duration in seconds (rounded up to whole buffers)
        #[arg(short, long, default_value_t = 2.0, value_parser = parse_seconds)]
        pub seconds: f32,

        /// Tone frequency in Hz
        #[arg(short, long, default_value_t = CONFIG.tone_hz)]
        pub frequency: f32,

        /// Sample rate in Hz
        #[arg(short = 'r', long, default_value_t = CONFIG.sample_rate)]
        pub sample_rate: u32,
    }

    /// Longest render accepted on the command line (one hour).
    const MAX_SECONDS: f32 = 3600.0;

    /// Parse `--seconds`: finite, non-negative, at most [`MAX_SECONDS`].
    fn parse_seconds(arg: &str) -> Result<f32, String> {
        let seconds: f32 = arg
            .parse()
            .map_err(|e| format!("`{arg}` is not a number: {e}"))?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(format!("`{arg}` must be a finite, non-negative duration"));
        }
        if seconds > MAX_SECONDS {
            return Err(format!("`{arg}` exceeds the {MAX_SECONDS} s limit"));
        }
        Ok(seconds)
    }

    /// WAV file standing in for the I2S peripheral.
    pub struct WavSink<W: Write + Seek> {
        writer: WavWriter<W>,
    }

    impl<W: Write + Seek> WavSink<W> {
        pub fn new(inner: W, sample_rate: u32) -> Result<Self, hound::Error> {
            let spec = WavSpec {
                channels: CHANNELS as u16,
                sample_rate,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            };
            Ok(Self {
                writer: WavWriter::new(inner, spec)?,
            })
        }

        /// Patch the header sizes and flush.
        pub fn finalize(self) -> Result<(), hound::Error> {
            self.writer.finalize()
        }
    }

    impl<W: Write + Seek> AudioSink for WavSink<W> {
        type Error = hound::Error;

        fn write(&mut self, samples: &[i16]) -> Result<usize, hound::Error> {
            for &sample in samples {
                self.writer.write_sample(sample)?;
            }
            Ok(samples.len())
        }
    }

    /// Render `buffers` whole buffers into `sink`. Returns frames written.
    pub fn render<S: AudioSink>(
        config: &ToneConfig,
        sink: S,
        buffers: u64,
    ) -> anyhow::Result<(u64, S)> {
        let synth = ToneSynth::new(SINE_TABLE.as_slice(), config)
            .context("invalid tone configuration")?;
        let mut player: TonePlayer<'_, S> = TonePlayer::new(synth, sink);

        let fault = FaultState::new();
        let log: LogStream<16> = LogStream::new();
        let frame_period_us = 1_000_000.0 / config.sample_rate as f64;

        for _ in 0..buffers {
            let now_us = (player.frames_rendered() as f64 * frame_period_us) as i64;
            let result = player.step(now_us, &fault, &log);

            let mut line = [0u8; 160];
            while let Some(entry) = log.drain() {
                let len = format_log_entry(&entry, &mut line);
                eprint!("{}", String::from_utf8_lossy(&line[..len]));
            }

            if let Err(code) = result {
                anyhow::bail!("output fault {:?} (data {})", code, fault.data());
            }
        }

        Ok((player.frames_rendered(), player.into_sink()))
    }

    /// Whole buffers needed to cover `seconds` of audio.
    pub fn buffers_for(seconds: f32, sample_rate: u32) -> u64 {
        let frames = (seconds.max(0.0) as f64 * sample_rate as f64).ceil() as u64;
        frames.div_ceil(FRAMES_PER_BUFFER as u64)
    }

    pub fn run(args: Args) -> anyhow::Result<()> {
        let config = ToneConfig {
            tone_hz: args.frequency,
            sample_rate: args.sample_rate,
            ..CONFIG
        };

        let file = std::fs::File::create(&args.output)
            .with_context(|| format!("creating {}", args.output.display()))?;
        let sink = WavSink::new(std::io::BufWriter::new(file), config.sample_rate)?;

        let buffers = buffers_for(args.seconds, config.sample_rate);
        let (frames, sink) = render(&config, sink, buffers)?;
        sink.finalize()?;

        println!(
            "{}: {} Hz tone, {} frames @ {} Hz -> {}",
            env!("VERSION_STRING"),
            config.tone_hz,
            frames,
            config.sample_rate,
            args.output.display()
        );
        Ok(())
    }

}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    bounce::run(bounce::Args::parse())
}
