// src/core/mod.rs

//! The central module containing the core logic and data structures of windbridge.

pub mod bindings;
pub mod errors;
pub mod protocol;
pub mod sensor;

pub use bindings::PropertyTable;
pub use errors::BridgeError;
pub use protocol::{LineFrameCodec, PropertyUpdate};
