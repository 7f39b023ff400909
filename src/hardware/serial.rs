use async_trait::async_trait;
use crate::error::{PlayerError, PlayerResult};
use crate::hardware::line_sink::{LineSink, SinkResult};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio_serial::{
    ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortBuilderExt, StopBits,
};
use tracing::{debug, info, warn};

/// Default baud rate for log playback
pub const DEFAULT_BAUD: u32 = 4800;

/// How the serial device is opened for a run
#[derive(Debug, Clone, PartialEq)]
pub struct SerialSettings {
    /// Device path (COMn on Windows, /dev/tty* elsewhere)
    pub device: String,
    pub baud: u32,
    /// Upper bound on a single blocked write
    pub write_timeout: Duration,
}

impl SerialSettings {
    pub fn new(device: impl Into<String>, baud: u32) -> Self {
        Self {
            device: device.into(),
            baud,
            write_timeout: Duration::from_millis(3000),
        }
    }
}

/// Build the device path for a 1-based port number
pub fn device_path(port: u32) -> String {
    if cfg!(windows) {
        format!("COM{}", port)
    } else {
        format!("/dev/ttyS{}", port.saturating_sub(1))
    }
}

/// Serial port sink
///
/// Opened once per run: 8 data bits, one stop bit, no parity, XON/XOFF
/// software flow control, DTR and RTS asserted. There is no reconnect.
pub struct SerialSink {
    device: String,
    port: tokio_serial::SerialStream,
}

impl SerialSink {
    /// Open and configure the serial device
    pub fn open(settings: &SerialSettings) -> PlayerResult<Self> {
        info!("Opening serial port {} at {} baud", settings.device, settings.baud);

        let open_error = |reason: String| PlayerError::PortOpen {
            device: settings.device.clone(),
            reason,
        };

        let mut port = tokio_serial::new(&settings.device, settings.baud)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::Software)
            .timeout(settings.write_timeout)
            .open_native_async()
            .map_err(|e| open_error(e.to_string()))?;

        if let Err(e) = port.clear(ClearBuffer::All) {
            warn!("Failed to purge buffers on {}: {}", settings.device, e);
        }
        port.write_data_terminal_ready(true)
            .map_err(|e| open_error(format!("failed to assert DTR: {}", e)))?;
        port.write_request_to_send(true)
            .map_err(|e| open_error(format!("failed to assert RTS: {}", e)))?;

        debug!("Serial port {} configured", settings.device);
        Ok(Self {
            device: settings.device.clone(),
            port,
        })
    }

    /// List serial ports present on this machine
    pub fn available_ports() -> Vec<String> {
        match tokio_serial::available_ports() {
            Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
            Err(e) => {
                warn!("Failed to enumerate serial ports: {}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl LineSink for SerialSink {
    async fn send_line(&mut self, line: &[u8]) -> SinkResult<()> {
        AsyncWriteExt::write_all(&mut self.port, line).await?;
        AsyncWriteExt::flush(&mut self.port).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_path_from_port_number() {
        if cfg!(windows) {
            assert_eq!(device_path(1), "COM1");
            assert_eq!(device_path(12), "COM12");
        } else {
            assert_eq!(device_path(1), "/dev/ttyS0");
            assert_eq!(device_path(3), "/dev/ttyS2");
            assert_eq!(device_path(0), "/dev/ttyS0");
        }
    }

    #[test]
    fn test_serial_settings_defaults() {
        let settings = SerialSettings::new("COM4", DEFAULT_BAUD);
        assert_eq!(settings.device, "COM4");
        assert_eq!(settings.baud, 4800);
        assert_eq!(settings.write_timeout, Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn test_open_missing_device_fails() {
        let settings = SerialSettings::new("/definitely/not/a/serial/port", DEFAULT_BAUD);
        let err = SerialSink::open(&settings).err().unwrap();
        assert!(matches!(err, PlayerError::PortOpen { .. }));
        assert!(err.to_string().starts_with("Unable to open /definitely/not/a/serial/port"));
    }
}
