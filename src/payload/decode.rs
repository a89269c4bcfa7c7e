//! # M-Bus Record Decoding
//!
//! This module turns the raw bytes of one M-Bus record — a DIF byte, a VIF
//! byte, and the value bytes that follow — into a typed value. Only the low
//! nibble of the DIF selects the wire shape; the high nibble (function and
//! storage-number bits) is not interpreted here.
//!
//! Wire shapes:
//! - little-endian two's-complement integers of 1, 2, 3, 4, 6, or 8 bytes
//!   (the 1-byte form is unsigned),
//! - packed BCD of 2 to 12 digits, accumulated as raw bytes with the last
//!   wire byte most significant,
//! - the three compound date/time layouts CP16, CP32, and CP48, where an
//!   all-zero value means "unset".

use crate::constants::MBUS_DATA_RECORD_DIF_MASK_DATA;
use crate::error::MBusError;
use chrono::{NaiveDate, NaiveDateTime};
use nom::number::complete::be_u8;
use nom::sequence::tuple;

/// VIF marking a CP16 date record
const VIF_DATE: u8 = 0x6C;
/// VIF marking a CP32/CP48 date-and-time record
const VIF_DATE_TIME: u8 = 0x6D;

/// A decoded record value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MBusValue {
    /// DIF declared no data
    Empty,
    /// Integer value and the wire width it was read from
    Integer { value: i64, size: usize },
    /// Packed BCD value and its digit count
    Bcd { value: u64, digits: usize },
    /// Calendar value; `None` when the record was all zeroes (unset)
    DateTime(Option<MBusDateTime>),
}

/// Calendar value carried by a date/time record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MBusDateTime {
    /// CP16: date only
    Date(NaiveDate),
    /// CP32/CP48: date and time (CP32 has no seconds field; it reads as 0)
    DateTime(NaiveDateTime),
}

/// Decodes one record value from its DIF, VIF, and value bytes.
///
/// `data` may extend past the value (device layers hand in open-ended
/// slices into a response buffer); only the DIF-implied width is read.
pub fn decode(dif: u8, vif: u8, data: &[u8]) -> Result<MBusValue, MBusError> {
    match dif & MBUS_DATA_RECORD_DIF_MASK_DATA {
        0x00 => Ok(MBusValue::Empty),
        0x01 => {
            let byte = data.first().ok_or(MBusError::PrematureEndAtData)?;
            Ok(MBusValue::Integer {
                value: i64::from(*byte),
                size: 1,
            })
        }
        0x02 => match vif {
            VIF_DATE => decode_date_time(data, 2),
            _ => decode_integer(data, 2),
        },
        0x03 => decode_integer(data, 3),
        0x04 => match vif {
            VIF_DATE_TIME => decode_date_time(data, 4),
            _ => decode_integer(data, 4),
        },
        0x06 => match vif {
            VIF_DATE_TIME => decode_date_time(data, 6),
            _ => decode_integer(data, 6),
        },
        0x07 => decode_integer(data, 8),
        0x09 => decode_bcd(data, 1, 2),
        0x0A => decode_bcd(data, 2, 4),
        0x0B => decode_bcd(data, 3, 6),
        0x0C => decode_bcd(data, 4, 8),
        // 12-digit BCD occupies the 8-byte slot
        0x0E => decode_bcd(data, 8, 12),
        // 0x05 (32-bit real) and the remaining nibbles have no decoding
        other => Err(MBusError::UnsupportedEncoding(other)),
    }
}

/// Decodes a record laid out as `[DIF, VIF, value bytes...]`.
pub fn decode_record(record: &[u8]) -> Result<MBusValue, MBusError> {
    let (data, (dif, vif)) = tuple((be_u8, be_u8))(record)
        .map_err(|_: nom::Err<nom::error::Error<&[u8]>>| MBusError::PrematureEndAtData)?;
    decode(dif, vif, data)
}

/// Little-endian two's-complement decode.
///
/// A set top bit in the most significant wire byte marks a negative value:
/// every byte is complemented, the magnitude reassembled, then negated and
/// decremented. This walk handles the odd widths (3 and 6 bytes) the same
/// as the power-of-two ones.
fn decode_integer(data: &[u8], length: usize) -> Result<MBusValue, MBusError> {
    let bytes = data.get(..length).ok_or(MBusError::PrematureEndAtData)?;
    let negative = bytes[length - 1] & 0x80 != 0;

    let mut value: i64 = 0;
    for &byte in bytes.iter().rev() {
        let byte = if negative { byte ^ 0xFF } else { byte };
        value = (value << 8) | i64::from(byte);
    }
    if negative {
        value = -value - 1;
    }

    Ok(MBusValue::Integer {
        value,
        size: length,
    })
}

/// Packed-BCD decode: the bytes are accumulated as-is, last wire byte most
/// significant. No digit-by-digit translation happens; device tables were
/// calibrated against this packing.
fn decode_bcd(data: &[u8], length: usize, digits: usize) -> Result<MBusValue, MBusError> {
    let bytes = data.get(..length).ok_or(MBusError::PrematureEndAtData)?;
    let value = bytes
        .iter()
        .rev()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Ok(MBusValue::Bcd { value, digits })
}

/// Compound date/time decode for the three layouts, selected by width.
/// An all-zero value is the meters' "unset" marker and decodes to `None`.
fn decode_date_time(data: &[u8], length: usize) -> Result<MBusValue, MBusError> {
    let bytes = data.get(..length).ok_or(MBusError::PrematureEndAtData)?;
    if bytes.iter().all(|b| *b == 0) {
        return Ok(MBusValue::DateTime(None));
    }

    let value = match length {
        // Type G, CP16: date only
        2 => MBusDateTime::Date(unpack_date(bytes[0], bytes[1])?),
        // Type F, CP32: date and time without seconds
        4 => {
            let date = unpack_date(bytes[2], bytes[3])?;
            let hour = u32::from(bytes[1] & 0x1F);
            let minute = u32::from(bytes[0] & 0x3F);
            let time = date
                .and_hms_opt(hour, minute, 0)
                .ok_or(MBusError::MalformedDateTime)?;
            MBusDateTime::DateTime(time)
        }
        // Type I, CP48: date and time with seconds
        6 => {
            let date = unpack_date(bytes[3], bytes[4])?;
            let hour = u32::from(bytes[2] & 0x1F);
            let minute = u32::from(bytes[1] & 0x3F);
            let second = u32::from(bytes[0] & 0x3F);
            let time = date
                .and_hms_opt(hour, minute, second)
                .ok_or(MBusError::MalformedDateTime)?;
            MBusDateTime::DateTime(time)
        }
        _ => unreachable!("date/time widths are fixed by the DIF dispatch"),
    };

    Ok(MBusValue::DateTime(Some(value)))
}

/// Unpacks the shared year/month/day bit layout from its two bytes:
/// three year bits ride in the day byte, four more in the month byte.
fn unpack_date(day_byte: u8, month_byte: u8) -> Result<NaiveDate, MBusError> {
    let year = 2000 + i32::from(((day_byte & 0xE0) >> 5) | ((month_byte & 0xF0) >> 1));
    let month = u32::from(month_byte & 0x0F);
    let day = u32::from(day_byte & 0x1F);
    NaiveDate::from_ymd_opt(year, month, day).ok_or(MBusError::MalformedDateTime)
}
