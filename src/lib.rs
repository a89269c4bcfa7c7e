//! # mbus-master - A Rust Crate for Master-Side M-Bus Communication
//!
//! The mbus-master crate implements the master side of the M-Bus
//! (Meter-Bus, EN 13757) protocol used to poll utility meters — energy,
//! water, heat — over a shared serial bus.
//!
//! ## Features
//!
//! - Build and serialize the four telegram shapes (ACK, short, control,
//!   long) with byte-exact framing and checksums
//! - Drive the alternating Frame Count Bit handshake per bus segment
//! - Orchestrate request/response exchanges over a serial port and
//!   classify replies (acknowledgment, data, no response)
//! - Decode DIF/VIF-tagged record values: integers of 1-8 bytes, packed
//!   BCD of 2-12 digits, and the CP16/CP32/CP48 date/time layouts
//! - Run device drivers on a periodic refresh schedule
//!
//! ## Usage
//!
//! ```no_run
//! use mbus_master::{ExchangeResult, MBusMaster, SerialMBusPort};
//!
//! # async fn poll() -> Result<(), mbus_master::MBusError> {
//! let port = SerialMBusPort::new("/dev/ttyUSB0");
//! let mut master = MBusMaster::new(port);
//!
//! master.initialize_client(0x02).await?;
//! if let ExchangeResult::Data(telegram) = master.request_user_data2(0x02).await? {
//!     // slice records out of `telegram` at the device's offsets,
//!     // then decode them
//!     let value = mbus_master::decode_record(&telegram[19..])?;
//!     println!("{value:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod error;
pub mod logging;
pub mod mbus;
pub mod payload;

pub use crate::error::MBusError;
pub use crate::logging::{init_logger, log_info};

// Core protocol types
pub use mbus::{
    ControlCode, ExchangeResult, FcbState, MBusDevice, MBusMaster, MBusPort, Monitor,
    SerialConfig, SerialMBusPort, Telegram,
};
pub use payload::{decode, decode_record, MBusDateTime, MBusValue};
