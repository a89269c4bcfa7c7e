//! M-Bus Protocol Constants
//!
//! This module defines constants used in the M-Bus master implementation,
//! based on the EN 13757 standard.

use std::time::Duration;

/// Start byte for short frames
pub const MBUS_FRAME_SHORT_START: u8 = 0x10;

/// Start byte for control and long frames (doubled around the length pair)
pub const MBUS_FRAME_LONG_START: u8 = 0x68;

/// Stop byte for all frame kinds
pub const MBUS_FRAME_STOP: u8 = 0x16;

/// Single-byte acknowledgment frame
pub const MBUS_FRAME_ACK: u8 = 0xE5;

// Control masks (full control bytes for common commands)
pub const MBUS_CONTROL_MASK_SND_NKE: u8 = 0x40;
pub const MBUS_CONTROL_MASK_SND_UD: u8 = 0x53; // includes DIR M2S
pub const MBUS_CONTROL_MASK_REQ_UD1: u8 = 0x5A; // includes DIR M2S
pub const MBUS_CONTROL_MASK_REQ_UD2: u8 = 0x5B; // includes DIR M2S
pub const MBUS_CONTROL_MASK_RSP_UD: u8 = 0x08; // S2M response

// Control flag bits
pub const MBUS_CONTROL_MASK_FCB: u8 = 0x20;
pub const MBUS_CONTROL_MASK_FCV: u8 = 0x10;
pub const MBUS_CONTROL_MASK_DIR_M2S: u8 = 0x40;

/// DIF (Data Information Field) mask for the data-shape nibble
pub const MBUS_DATA_RECORD_DIF_MASK_DATA: u8 = 0x0F;

/// Broadcast address answered by every slave on the segment
pub const MBUS_ADDRESS_BROADCAST: u8 = 254;

/// Largest payload a long frame can carry; the length byte is
/// payload + 3 and must fit in 8 bits.
pub const MBUS_MAX_LONG_PAYLOAD: usize = 252;

/// Receive buffer size for one response telegram
pub const MBUS_RX_BUFFER_SIZE: usize = 1024;

/// Pause between transmit and read, giving the slave time to answer
pub const MBUS_DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Bound on the read step of an exchange
pub const MBUS_DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
