pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod metrics;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod telemetry;

pub use commands::CommandTable;
pub use error::{AppError, CommandError, ProtocolError, Result};
pub use protocol::{RespParser, RespValue};
pub use server::{Handler, Server};
pub use storage::{MemoryStore, StoreError};
