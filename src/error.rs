//! # M-Bus Error Handling
//!
//! This module defines the MBusError enum, which represents the different error
//! types that can occur in the mbus-master crate.

use thiserror::Error;

/// Represents the different error types that can occur in the M-Bus master.
#[derive(Debug, Error)]
pub enum MBusError {
    /// Indicates an error related to the serial port communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// Indicates a long telegram payload that does not fit the 8-bit length field.
    #[error("Payload too large for long telegram: {0} bytes (max 252)")]
    PayloadTooLarge(usize),

    /// Indicates a response that does not start with a recognized frame byte.
    #[error("Malformed frame: unrecognized lead byte 0x{0:02X}")]
    MalformedFrame(u8),

    /// Indicates a DIF data nibble with no implemented decoding.
    #[error("Unsupported encoding for DIF 0x{0:02X}")]
    UnsupportedEncoding(u8),

    /// Indicates a date/time record with out-of-range calendar fields.
    #[error("Malformed date/time record")]
    MalformedDateTime,

    /// Indicates a value slice shorter than its DIF-implied width.
    #[error("Premature end of data")]
    PrematureEndAtData,

    /// Indicates an invalid hexadecimal string was provided.
    #[error("Invalid hexadecimal string")]
    InvalidHexString,
}
