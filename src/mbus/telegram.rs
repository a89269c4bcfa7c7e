//! # M-Bus Telegram Framing
//!
//! This module builds the four telegram shapes a master emits or receives
//! on the wire: the single-byte acknowledgment, the 5-byte short frame,
//! the 9-byte control frame, and the variable-length long frame. Each
//! telegram owns its serialized byte buffer; layout and checksum are fixed
//! at construction and never change afterwards.
//!
//! The checksum is the additive modulo-256 sum over control byte, address,
//! control information, and payload. Start, length, and stop bytes are
//! never part of it.

use crate::constants::{
    MBUS_CONTROL_MASK_FCB, MBUS_CONTROL_MASK_REQ_UD1, MBUS_CONTROL_MASK_REQ_UD2,
    MBUS_CONTROL_MASK_RSP_UD, MBUS_CONTROL_MASK_SND_NKE, MBUS_CONTROL_MASK_SND_UD,
    MBUS_FRAME_ACK, MBUS_FRAME_LONG_START, MBUS_FRAME_SHORT_START, MBUS_FRAME_STOP,
    MBUS_MAX_LONG_PAYLOAD,
};
use crate::error::MBusError;
use bytes::{BufMut, BytesMut};

/// The base command carried in a telegram's control byte.
///
/// Exactly one base code is active per telegram; the frame count bit (FCB)
/// is orthogonal and ORed in by the constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    /// SND_NKE: reset the addressed slave (0x40)
    InitializeClient,
    /// SND_UD: send user data to the slave (0x53/0x73)
    SendUserData,
    /// REQ_UD1: request class 1 user data (0x5A/0x7A)
    RequestUserData1,
    /// REQ_UD2: request class 2 user data (0x5B/0x7B)
    RequestUserData2,
    /// RSP_UD: slave response carrying user data (0x08/0x18/0x28/0x38)
    ResponseUserData,
}

impl ControlCode {
    /// The control byte without any FCB/FCV flags.
    pub const fn base(self) -> u8 {
        match self {
            ControlCode::InitializeClient => MBUS_CONTROL_MASK_SND_NKE,
            ControlCode::SendUserData => MBUS_CONTROL_MASK_SND_UD,
            ControlCode::RequestUserData1 => MBUS_CONTROL_MASK_REQ_UD1,
            ControlCode::RequestUserData2 => MBUS_CONTROL_MASK_REQ_UD2,
            ControlCode::ResponseUserData => MBUS_CONTROL_MASK_RSP_UD,
        }
    }

    /// The control byte with the frame count bit applied.
    ///
    /// SND_NKE is always sent plain; slaves ignore FCB on it.
    pub fn with_fcb(self, fcb: bool) -> u8 {
        match self {
            ControlCode::InitializeClient => self.base(),
            _ if fcb => self.base() | MBUS_CONTROL_MASK_FCB,
            _ => self.base(),
        }
    }
}

/// Additive checksum over a byte range, truncated to one byte.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// One complete framed message, start byte(s) through stop byte.
///
/// Variants own their serialized buffers; a telegram is created once per
/// exchange, serialized, and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Telegram {
    /// Acknowledgment, the single byte 0xE5
    Ack,
    /// 5-byte request frame
    Short([u8; 5]),
    /// 9-byte fixed-payload command frame
    Control([u8; 9]),
    /// 9+N byte variable-payload command frame
    Long(BytesMut),
}

impl Telegram {
    /// Builds a short frame: `10 C A cs(C,A) 16`.
    pub fn short(control: u8, address: u8) -> Self {
        let mut data = [0u8; 5];
        data[0] = MBUS_FRAME_SHORT_START;
        data[1] = control;
        data[2] = address;
        data[3] = checksum(&data[1..3]);
        data[4] = MBUS_FRAME_STOP;
        Telegram::Short(data)
    }

    /// Builds a control frame: `68 03 03 68 C A CI cs(C,A,CI) 16`.
    pub fn control(control: u8, address: u8, control_info: u8) -> Self {
        let mut data = [0u8; 9];
        data[0] = MBUS_FRAME_LONG_START;
        data[1] = 0x03;
        data[2] = data[1]; // length field is transmitted twice
        data[3] = MBUS_FRAME_LONG_START;
        data[4] = control;
        data[5] = address;
        data[6] = control_info;
        data[7] = checksum(&data[4..7]);
        data[8] = MBUS_FRAME_STOP;
        Telegram::Control(data)
    }

    /// Builds a long frame carrying `payload` after the control information
    /// byte. Payloads over 252 bytes do not fit the 8-bit length field and
    /// are rejected.
    pub fn long(
        control: u8,
        address: u8,
        control_info: u8,
        payload: &[u8],
    ) -> Result<Self, MBusError> {
        if payload.len() > MBUS_MAX_LONG_PAYLOAD {
            return Err(MBusError::PayloadTooLarge(payload.len()));
        }

        let length = payload.len() as u8 + 3;
        let mut data = BytesMut::with_capacity(9 + payload.len());
        data.put_u8(MBUS_FRAME_LONG_START);
        data.put_u8(length);
        data.put_u8(length); // duplicated
        data.put_u8(MBUS_FRAME_LONG_START);
        data.put_u8(control);
        data.put_u8(address);
        data.put_u8(control_info);
        data.put_slice(payload);
        let cs = checksum(&data[4..]);
        data.put_u8(cs);
        data.put_u8(MBUS_FRAME_STOP);
        Ok(Telegram::Long(data))
    }

    /// The serialized wire bytes of this telegram.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Telegram::Ack => std::slice::from_ref(&MBUS_FRAME_ACK),
            Telegram::Short(data) => data,
            Telegram::Control(data) => data,
            Telegram::Long(data) => data,
        }
    }
}

/// Outcome of one request/response exchange on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeResult {
    /// Timeout or empty read; the caller decides whether to retry.
    NoResponse,
    /// The slave acknowledged with 0xE5.
    Ack,
    /// A data-carrying response; record boundaries are device-specific.
    Data(Vec<u8>),
}

/// Classifies a raw response buffer read off the wire.
///
/// Anything that is neither empty nor an acknowledgment is handed back
/// unmodified as data; slicing records out of it is the caller's job.
pub fn classify_response(buffer: &[u8]) -> ExchangeResult {
    match buffer.first() {
        None => ExchangeResult::NoResponse,
        Some(&MBUS_FRAME_ACK) => ExchangeResult::Ack,
        Some(_) => ExchangeResult::Data(buffer.to_vec()),
    }
}

/// Checks that a response starts with a recognized frame byte
/// (ACK, short start, or long start).
pub fn verify_lead_byte(response: &[u8]) -> Result<(), MBusError> {
    match response.first() {
        Some(&MBUS_FRAME_ACK) | Some(&MBUS_FRAME_SHORT_START) | Some(&MBUS_FRAME_LONG_START) => {
            Ok(())
        }
        Some(&other) => Err(MBusError::MalformedFrame(other)),
        None => Ok(()),
    }
}
