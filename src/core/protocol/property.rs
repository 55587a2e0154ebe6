// src/core/protocol/property.rs

//! Parses one decoded line of the property stream.
//!
//! Notification format: `Property <name> <type> <value>`, where `<value>` is
//! the free-form remainder of the line and may itself contain whitespace
//! (compound values). Lines that are not property notifications, or that
//! carry fewer than four fields, are simply not updates.

use crate::core::BridgeError;

/// The leading token (including its trailing space) of every property
/// notification. Matching is case-sensitive.
const PROPERTY_PREFIX: &str = "Property ";

/// The server-side sentinel for "no current value". Updates carrying it are
/// recognized but intentionally never dispatched.
pub const NULL_VALUE: &str = "(null)";

/// One decoded property notification. Ephemeral: produced per parsed line
/// and discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyUpdate {
    pub name: String,
    pub type_tag: String,
    pub raw_value: String,
}

impl PropertyUpdate {
    /// True when the server reported no current value for this property.
    pub fn is_null(&self) -> bool {
        self.raw_value == NULL_VALUE
    }

    /// Parses the raw value as a number for dispatch to a sensor file.
    pub fn numeric_value(&self) -> Result<f64, BridgeError> {
        self.raw_value
            .parse()
            .map_err(|_| BridgeError::InvalidValue(self.raw_value.clone()))
    }
}

/// Decodes one trimmed line into a `PropertyUpdate`, or `None` when the line
/// is not a well-formed property notification. Rejection is silent: the
/// server is free to emit lines the client does not understand.
pub fn parse_line(line: &str) -> Option<PropertyUpdate> {
    let rest = line.strip_prefix(PROPERTY_PREFIX)?;
    let (name, rest) = next_field(rest)?;
    let (type_tag, rest) = next_field(rest)?;
    let raw_value = rest.trim_start();
    if raw_value.is_empty() {
        return None;
    }
    Some(PropertyUpdate {
        name: name.to_string(),
        type_tag: type_tag.to_string(),
        raw_value: raw_value.to_string(),
    })
}

/// Pops one whitespace-delimited field, tolerating runs of whitespace between
/// fields. Returns `None` when no further field follows the popped one,
/// which rejects short lines without inspecting them further.
fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace)?;
    Some((&s[..end], &s[end..]))
}
