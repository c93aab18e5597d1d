//! Store identifier validation
//!
//! Stores mint 24-character hex identifiers. A malformed identifier is a
//! caller error, never a not-found.

use crate::constants::ENTITY_ID_HEX_LEN;
use crate::error::{Error, Result};

/// Check that `id` is a 24-character hex identifier
pub fn validate_entity_id(id: &str) -> Result<()> {
    if id.len() != ENTITY_ID_HEX_LEN || !id.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::invalid_argument(format!(
            "ID must be a {ENTITY_ID_HEX_LEN}-character hex identifier, got '{id}'"
        )));
    }
    Ok(())
}
