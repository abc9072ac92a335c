//! NDN TLV wire encoding.
//!
//! Only the subset needed to write and read back a certificate record.

pub mod codec;
pub mod types;

pub use codec::{TlvReader, TlvWriter};
