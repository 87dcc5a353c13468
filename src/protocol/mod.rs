//! Redis Serialization Protocol (RESP2) codec.
//!
//! Five value shapes travel on the wire: simple strings, errors, integers,
//! bulk strings and arrays. Bulk strings and arrays each have a null form.
//! This module knows nothing about commands beyond turning a frame into an
//! argument list.

pub mod command;
pub mod resp;

pub use command::to_command;
pub use resp::*;
