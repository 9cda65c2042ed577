//! UART log output.
//!
//! Drains a [`LogStream`] to UART1 TX between I2S writes.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32 GPIO17 (U1 TX) ──────▶ USB-UART RX
//!                              └─▶ PC Serial Monitor
//! ```

use crate::logging::{format_to_buffer, LogEntry};

#[cfg(target_os = "espidf")]
use crate::logging::LogStream;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// UART configuration for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            tx_pin: 17, // GPIO17 - UART1 TX, clear of the I2S pins
        }
    }
}

/// Format a log entry as `[timestamp_us] LEVEL: message\n`.
///
/// Returns the number of bytes written (truncated to `buf`).
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!(
            "[{:10}] {}: {}\n",
            entry.timestamp_us,
            entry.level.as_str(),
            entry.message()
        ),
    )
}

/// Initialize UART1 TX-only for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Write every pending entry to UART, then report drops.
///
/// Returns the number of entries written.
#[cfg(target_os = "espidf")]
pub fn drain_to_uart<const N: usize>(uart: &mut UartTxDriver<'_>, stream: &LogStream<N>) -> usize {
    let mut format_buf = [0u8; 160];
    let mut written = 0;

    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut format_buf);
        let _ = uart.write(&format_buf[..len]);
        written += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let len = format_to_buffer(
            &mut format_buf,
            format_args!("[WARN] Dropped {} log entries\n", dropped),
        );
        let _ = uart.write(&format_buf[..len]);
        stream.reset_dropped();
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MAX_MSG_LEN};

    fn entry(timestamp_us: i64, level: LogLevel, text: &[u8]) -> LogEntry {
        let mut msg = [0u8; MAX_MSG_LEN];
        msg[..text.len()].copy_from_slice(text);
        LogEntry {
            timestamp_us,
            level,
            len: text.len() as u8,
            msg,
        }
    }

    #[test]
    fn test_default_config_avoids_i2s_pins() {
        let config = UartLoggerConfig::default();
        let pins = crate::hal::I2S_PINS;
        assert_eq!(config.baud_rate, 115_200);
        assert!(![pins.bclk, pins.ws, pins.dout].contains(&config.tx_pin));
    }

    #[test]
    fn test_format_log_entry() {
        let mut buf = [0u8; 160];
        let len = format_log_entry(&entry(1_234_567, LogLevel::Info, b"I2S started"), &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] INFO: I2S started\n");
    }

    #[test]
    fn test_format_respects_entry_len() {
        let mut e = entry(999, LogLevel::Error, b"SINK12345X");
        e.len = 5;

        let mut buf = [0u8; 160];
        let len = format_log_entry(&e, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("SINK1"));
        assert!(!formatted.contains('X'));
    }
}
