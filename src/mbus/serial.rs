//! # M-Bus Serial Transport
//!
//! This module defines the transport seam the exchange orchestrator drives
//! ([`MBusPort`]) and its production implementation over a serial port
//! ([`SerialMBusPort`]). The trait mirrors what a half-duplex M-Bus link
//! actually offers: open, write, read-what-is-buffered, and a receive
//! buffer that can be discarded between exchanges.

use crate::error::MBusError;
use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPort, SerialPortBuilderExt};

/// Transport contract consumed by the exchange orchestrator.
///
/// At most one outstanding write/read pair at a time; `read` returns
/// whatever is currently buffered rather than blocking for an exact count.
#[async_trait]
pub trait MBusPort: Send {
    /// Opens the underlying port. Idempotent when already open.
    async fn open(&mut self) -> Result<(), MBusError>;

    /// Whether the port is currently open.
    fn is_open(&self) -> bool;

    /// Number of received bytes waiting to be read.
    fn bytes_available(&self) -> usize;

    /// Transmits `data` and flushes it onto the wire.
    async fn write(&mut self, data: &[u8]) -> Result<(), MBusError>;

    /// Reads currently buffered bytes into `buf`, returning the count.
    /// Read-side failures are plain I/O errors; the orchestrator decides
    /// how to classify them.
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Discards any unread received bytes.
    async fn clear_receive_buffer(&mut self) -> Result<(), MBusError>;
}

/// Configuration for the serial connection.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baudrate: u32,
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baudrate: 2400,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Serial-port transport for M-Bus masters, 8 data bits / even parity /
/// one stop bit as the standard prescribes. The port is opened lazily on
/// first use.
pub struct SerialMBusPort {
    port_name: String,
    config: SerialConfig,
    stream: Option<tokio_serial::SerialStream>,
}

impl SerialMBusPort {
    /// Creates a transport for `port_name` (e.g. "/dev/ttyUSB0" on Linux,
    /// "COM3" on Windows) with default 2400 baud settings.
    pub fn new(port_name: &str) -> Self {
        Self::with_config(port_name, SerialConfig::default())
    }

    /// Creates a transport with custom serial settings.
    pub fn with_config(port_name: &str, config: SerialConfig) -> Self {
        SerialMBusPort {
            port_name: port_name.to_string(),
            config,
            stream: None,
        }
    }
}

#[async_trait]
impl MBusPort for SerialMBusPort {
    async fn open(&mut self) -> Result<(), MBusError> {
        if self.stream.is_some() {
            return Ok(());
        }
        let stream = tokio_serial::new(&self.port_name, self.config.baudrate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::Even)
            .timeout(self.config.timeout)
            .open_native_async()
            .map_err(|e| MBusError::SerialPortError(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn bytes_available(&self) -> usize {
        self.stream
            .as_ref()
            .and_then(|s| s.bytes_to_read().ok())
            .unwrap_or(0) as usize
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), MBusError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| MBusError::SerialPortError("port not open".to_string()))?;
        stream
            .write_all(data)
            .await
            .map_err(|e| MBusError::SerialPortError(e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| MBusError::SerialPortError(e.to_string()))
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stream.as_mut() {
            Some(stream) => stream.read(buf).await,
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "port not open")),
        }
    }

    async fn clear_receive_buffer(&mut self) -> Result<(), MBusError> {
        if let Some(stream) = self.stream.as_ref() {
            stream
                .clear(tokio_serial::ClearBuffer::Input)
                .map_err(|e| MBusError::SerialPortError(e.to_string()))?;
        }
        Ok(())
    }
}
