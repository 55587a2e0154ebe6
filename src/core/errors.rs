// src/core/errors.rs

//! Defines the primary error type for the entire application.

use thiserror::Error;

/// The main error enum, representing all possible failures within the bridge.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line exceeds maximum length ({0} bytes buffered without a delimiter)")]
    LineTooLong(usize),

    #[error("Property value is not a number: {0:?}")]
    InvalidValue(String),
}
