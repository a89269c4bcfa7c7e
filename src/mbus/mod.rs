//! The mbus module contains the components responsible for the core M-Bus
//! master protocol: telegram framing, the FCB handshake, exchange
//! orchestration, and the serial transport seam.

pub mod device;
pub mod handshake;
pub mod master;
pub mod serial;
pub mod serial_mock;
pub mod telegram;

pub use device::{MBusDevice, Monitor};
pub use handshake::FcbState;
pub use master::MBusMaster;
pub use serial::{MBusPort, SerialConfig, SerialMBusPort};
pub use telegram::{ControlCode, ExchangeResult, Telegram};
