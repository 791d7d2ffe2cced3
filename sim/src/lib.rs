//! Simulated Elite robot controller.
//!
//! Speaks the same newline-delimited JSON-RPC envelope as the real controller
//! on port 8055, answering from an in-memory [`SimState`]. Used by the client's
//! integration tests and for trying the client without hardware.

mod controller;
mod server;

pub use controller::*;
pub use server::{serve, SimController};
