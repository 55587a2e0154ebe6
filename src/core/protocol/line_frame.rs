// src/core/protocol/line_frame.rs

//! Implements the line-reassembly `Decoder` used over the property stream.
//!
//! The wire protocol has no framing beyond newlines, and TCP is free to split
//! or merge writes, so the decoder accumulates bytes in the caller's buffer
//! and only ever yields complete, delimiter-terminated lines. Any partial
//! line stays buffered until its `\n` arrives.

use crate::core::BridgeError;
use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

/// Upper bound on how many bytes may accumulate without a delimiter.
/// A well-behaved property server emits short lines; anything beyond this
/// is a protocol violation and the connection is torn down.
const MAX_LINE_LEN: usize = 64 * 1024;

/// A `tokio_util::codec` decoder that turns an arbitrary byte stream into
/// discrete text lines: newline-delimited, delimiter stripped, surrounding
/// whitespace (including any `\r`) trimmed.
#[derive(Debug, Default)]
pub struct LineFrameCodec;

impl Decoder for LineFrameCodec {
    type Item = String;
    type Error = BridgeError;

    /// Yields the next complete line, or `Ok(None)` when the buffer holds at
    /// most a partial line. The buffer is only advanced past complete lines.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match src.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                let line = String::from_utf8_lossy(&src[..pos]).trim().to_string();
                src.advance(pos + 1);
                Ok(Some(line))
            }
            None if src.len() > MAX_LINE_LEN => Err(BridgeError::LineTooLong(src.len())),
            None => Ok(None),
        }
    }
}
