//! The payload module contains the components responsible for decoding
//! record values out of M-Bus response telegrams.

pub mod decode;

pub use decode::{decode, decode_record, MBusDateTime, MBusValue};
