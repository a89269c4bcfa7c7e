//! # M-Bus Exchange Orchestration
//!
//! [`MBusMaster`] drives the request/transmit/await/classify sequence for
//! one physical bus segment. It owns the transport and the FCB handshake
//! state; methods take `&mut self` because the bus is half-duplex and an
//! exchange must fully complete before the next one starts. To poll
//! several devices over one bus from concurrent tasks, share the master
//! behind an `Arc<tokio::sync::Mutex<_>>`.

use crate::constants::{
    MBUS_DEFAULT_READ_TIMEOUT, MBUS_DEFAULT_SETTLE_DELAY, MBUS_RX_BUFFER_SIZE,
};
use crate::error::MBusError;
use crate::logging::{log_debug, log_frame_hex};
use crate::mbus::handshake::FcbState;
use crate::mbus::serial::MBusPort;
use crate::mbus::telegram::{classify_response, ControlCode, ExchangeResult, Telegram};
use std::time::Duration;

/// Master endpoint for one M-Bus segment.
pub struct MBusMaster<P: MBusPort> {
    port: P,
    fcb: FcbState,
    settle_delay: Duration,
    read_timeout: Duration,
}

impl<P: MBusPort> MBusMaster<P> {
    /// Creates a master over `port` with the standard timing: a 2 s settle
    /// pause after transmit and a 1 s bound on the read step.
    pub fn new(port: P) -> Self {
        Self::with_timing(port, MBUS_DEFAULT_SETTLE_DELAY, MBUS_DEFAULT_READ_TIMEOUT)
    }

    /// Creates a master with custom settle delay and read timeout.
    pub fn with_timing(port: P, settle_delay: Duration, read_timeout: Duration) -> Self {
        MBusMaster {
            port,
            fcb: FcbState::new(),
            settle_delay,
            read_timeout,
        }
    }

    /// Sends SND_NKE to reset the slave at `address`. A reachable slave
    /// answers with an acknowledgment.
    pub async fn initialize_client(&mut self, address: u8) -> Result<ExchangeResult, MBusError> {
        let code = ControlCode::InitializeClient;
        let telegram = Telegram::short(code.with_fcb(self.fcb.peek_bit(code)), address);
        self.fcb.advance(code);
        self.exchange(&telegram).await
    }

    /// Sends a fixed-payload SND_UD command with the given control
    /// information byte.
    pub async fn send_control(
        &mut self,
        address: u8,
        control_info: u8,
    ) -> Result<ExchangeResult, MBusError> {
        let code = ControlCode::SendUserData;
        let telegram = Telegram::control(code.with_fcb(self.fcb.peek_bit(code)), address, control_info);
        self.fcb.advance(code);
        self.exchange(&telegram).await
    }

    /// Sends a variable-payload SND_UD command. Payloads over 252 bytes
    /// are rejected before any bus traffic happens.
    pub async fn send_long_telegram(
        &mut self,
        address: u8,
        control_info: u8,
        payload: &[u8],
    ) -> Result<ExchangeResult, MBusError> {
        let code = ControlCode::SendUserData;
        let telegram = Telegram::long(
            code.with_fcb(self.fcb.peek_bit(code)),
            address,
            control_info,
            payload,
        )?;
        self.fcb.advance(code);
        self.exchange(&telegram).await
    }

    /// Requests class 1 (alarm) user data from the slave at `address`.
    pub async fn request_user_data1(&mut self, address: u8) -> Result<ExchangeResult, MBusError> {
        self.request(ControlCode::RequestUserData1, address).await
    }

    /// Requests class 2 (metering) user data from the slave at `address`.
    pub async fn request_user_data2(&mut self, address: u8) -> Result<ExchangeResult, MBusError> {
        self.request(ControlCode::RequestUserData2, address).await
    }

    async fn request(
        &mut self,
        code: ControlCode,
        address: u8,
    ) -> Result<ExchangeResult, MBusError> {
        let telegram = Telegram::short(code.with_fcb(self.fcb.peek_bit(code)), address);
        self.fcb.advance(code);
        self.exchange(&telegram).await
    }

    /// One full exchange: transmit, settle, bounded read, classify.
    ///
    /// Open and write failures are real errors; a timeout, an empty read,
    /// or a read-side wire fault all classify as [`ExchangeResult::NoResponse`]
    /// because the caller handles every "no usable reply" the same way.
    async fn exchange(&mut self, telegram: &Telegram) -> Result<ExchangeResult, MBusError> {
        if !self.port.is_open() {
            self.port.open().await?;
        }
        // bytes left over from an abandoned exchange would desynchronize
        // framing of this one
        self.port.clear_receive_buffer().await?;

        log_frame_hex("TX", telegram.as_bytes());
        self.port.write(telegram.as_bytes()).await?;

        tokio::time::sleep(self.settle_delay).await;
        log_debug(&format!(
            "{} bytes buffered after settle",
            self.port.bytes_available()
        ));

        let mut buf = vec![0u8; MBUS_RX_BUFFER_SIZE];
        let n = match tokio::time::timeout(self.read_timeout, self.port.read(&mut buf)).await {
            Err(_) => return Ok(ExchangeResult::NoResponse),
            Ok(Err(_)) => return Ok(ExchangeResult::NoResponse),
            Ok(Ok(n)) => n,
        };

        let result = classify_response(&buf[..n]);
        if let ExchangeResult::Data(bytes) = &result {
            log_frame_hex("RX", bytes);
        }
        Ok(result)
    }

    /// Read access to the handshake state, mainly for diagnostics.
    pub fn fcb_state(&self) -> &FcbState {
        &self.fcb
    }

    /// Gives back the underlying transport.
    pub fn into_port(self) -> P {
        self.port
    }
}
