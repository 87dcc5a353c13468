//! Networking: the per-connection loop and the accept loop.

pub mod handler;
pub mod listener;

pub use handler::Handler;
pub use listener::Server;
