//! Mock transport for testing
//!
//! This module provides a mock [`MBusPort`] that can be used to test the
//! exchange orchestration without requiring actual hardware. Responses are
//! scripted per exchange, transmitted telegrams are captured per write,
//! and read/write errors can be injected.

use crate::mbus::serial::MBusPort;
use crate::error::MBusError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

/// Mock port that simulates one half-duplex bus endpoint.
#[derive(Clone, Default)]
pub struct MockMBusPort {
    /// Telegrams written to the port, one entry per write
    tx_frames: Arc<Mutex<Vec<Vec<u8>>>>,
    /// Scripted responses, consumed one per read
    rx_responses: Arc<Mutex<VecDeque<Vec<u8>>>>,
    /// Simulated read-side error
    next_read_error: Arc<Mutex<Option<io::Error>>>,
    /// Simulated write-side error
    next_write_error: Arc<Mutex<Option<io::Error>>>,
    /// When set, reads block forever so the caller's timeout fires
    silent: Arc<Mutex<bool>>,
    open: Arc<Mutex<bool>>,
    clear_count: Arc<Mutex<u32>>,
}

impl MockMBusPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a raw response for the next unanswered exchange.
    pub fn queue_response(&self, data: &[u8]) {
        self.rx_responses.lock().unwrap().push_back(data.to_vec());
    }

    /// Scripts a single-byte acknowledgment response.
    pub fn queue_ack(&self) {
        self.queue_response(&[0xE5]);
    }

    /// Scripts an empty read (device absent).
    pub fn queue_empty(&self) {
        self.queue_response(&[]);
    }

    /// Makes subsequent reads hang until the caller's timeout expires.
    pub fn set_silent(&self, silent: bool) {
        *self.silent.lock().unwrap() = silent;
    }

    /// Injects an error for the next read.
    pub fn set_next_read_error(&self, error: io::Error) {
        *self.next_read_error.lock().unwrap() = Some(error);
    }

    /// Injects an error for the next write.
    pub fn set_next_write_error(&self, error: io::Error) {
        *self.next_write_error.lock().unwrap() = Some(error);
    }

    /// All telegrams written so far, in transmit order.
    pub fn tx_frames(&self) -> Vec<Vec<u8>> {
        self.tx_frames.lock().unwrap().clone()
    }

    /// Number of times the receive buffer was discarded.
    pub fn clear_count(&self) -> u32 {
        *self.clear_count.lock().unwrap()
    }
}

#[async_trait]
impl MBusPort for MockMBusPort {
    async fn open(&mut self) -> Result<(), MBusError> {
        *self.open.lock().unwrap() = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        *self.open.lock().unwrap()
    }

    fn bytes_available(&self) -> usize {
        self.rx_responses
            .lock()
            .unwrap()
            .front()
            .map(Vec::len)
            .unwrap_or(0)
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), MBusError> {
        if let Some(error) = self.next_write_error.lock().unwrap().take() {
            return Err(MBusError::SerialPortError(error.to_string()));
        }
        self.tx_frames.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let silent = *self.silent.lock().unwrap();
        if silent {
            std::future::pending::<()>().await;
        }
        if let Some(error) = self.next_read_error.lock().unwrap().take() {
            return Err(error);
        }
        let response = self.rx_responses.lock().unwrap().pop_front();
        match response {
            Some(data) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            None => Ok(0),
        }
    }

    async fn clear_receive_buffer(&mut self) -> Result<(), MBusError> {
        *self.clear_count.lock().unwrap() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_capture() {
        let mut port = MockMBusPort::new();
        port.write(&[0x10, 0x5B, 0x01, 0x5C, 0x16]).await.unwrap();
        assert_eq!(port.tx_frames(), vec![vec![0x10, 0x5B, 0x01, 0x5C, 0x16]]);
    }

    #[tokio::test]
    async fn test_scripted_responses_in_order() {
        let mut port = MockMBusPort::new();
        port.queue_ack();
        port.queue_response(&[0x68, 0x03]);

        let mut buf = [0u8; 16];
        assert_eq!(port.read(&mut buf).await.unwrap(), 1);
        assert_eq!(buf[0], 0xE5);
        assert_eq!(port.read(&mut buf).await.unwrap(), 2);
        assert_eq!(&buf[..2], &[0x68, 0x03]);
        // queue drained
        assert_eq!(port.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_read_error_injection() {
        let mut port = MockMBusPort::new();
        port.set_next_read_error(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));
        let mut buf = [0u8; 16];
        assert!(port.read(&mut buf).await.is_err());
        // error is one-shot
        assert_eq!(port.read(&mut buf).await.unwrap(), 0);
    }
}
