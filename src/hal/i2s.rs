//! I2S output for the sine tone.
//!
//! Standard (Philips) mode, 16-bit stereo, TX only.
//!
//! ```text
//! ESP32 GPIO26 ──▶ BCLK
//! ESP32 GPIO25 ──▶ LRCLK / WS
//! ESP32 GPIO22 ──▶ DIN (DAC)
//! ```

/// I2S pin assignment (GPIO numbers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2sPinConfig {
    /// Bit clock
    pub bclk: u8,
    /// Word select (left/right clock)
    pub ws: u8,
    /// Serial data out to the DAC
    pub dout: u8,
    /// Serial data in (unused, TX only)
    pub din: Option<u8>,
}

/// Default wiring for an external I2S DAC (PCM5102, MAX98357A).
pub const I2S_PINS: I2sPinConfig = I2sPinConfig {
    bclk: 26,
    ws: 25,
    dout: 22,
    din: None,
};

#[cfg(target_os = "espidf")]
pub use esp::{philips_16bit_stereo, I2sSink};

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::delay::BLOCK;
    use esp_idf_svc::hal::i2s::config::{DataBitWidth, StdConfig};
    use esp_idf_svc::hal::i2s::{I2sDriver, I2sTx};
    use esp_idf_svc::sys::{EspError, TickType_t};

    use crate::audio::frame::sample_bytes;
    use crate::hal::AudioSink;

    /// Standard-mode config: Philips framing, 16-bit slots, stereo.
    pub fn philips_16bit_stereo(sample_rate: u32) -> StdConfig {
        StdConfig::philips(sample_rate, DataBitWidth::Bits16)
    }

    /// Blocking I2S sink.
    ///
    /// Each write waits up to `timeout` ticks for DMA space; the default
    /// waits forever.
    pub struct I2sSink<'d> {
        driver: I2sDriver<'d, I2sTx>,
        timeout: TickType_t,
    }

    impl<'d> I2sSink<'d> {
        /// Take a configured TX driver and enable the channel.
        pub fn new(mut driver: I2sDriver<'d, I2sTx>) -> Result<Self, EspError> {
            driver.tx_enable()?;
            Ok(Self {
                driver,
                timeout: BLOCK,
            })
        }

        /// Bound each write to `timeout` ticks.
        pub fn with_timeout(mut self, timeout: TickType_t) -> Self {
            self.timeout = timeout;
            self
        }
    }

    impl AudioSink for I2sSink<'_> {
        type Error = EspError;

        fn write(&mut self, samples: &[i16]) -> Result<usize, EspError> {
            let written = self.driver.write(sample_bytes(samples), self.timeout)?;
            Ok(written / core::mem::size_of::<i16>())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pins_match_firmware_wiring() {
        // main.rs hands gpio26/gpio25/gpio22 to the driver
        assert_eq!((I2S_PINS.bclk, I2S_PINS.ws, I2S_PINS.dout), (26, 25, 22));
        assert_eq!(I2S_PINS.din, None);
    }
}
