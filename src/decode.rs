//! Boundary to external structured-text decoders
//!
//! The engine itself never parses raw text; a decoder resolves a path
//! directly against a text payload and reports whether anything was there.

use crate::accessor::{Accessor, Options};
use crate::error::AccessError;
use crate::value::Value;

/// Resolves a path against raw structured text.
pub trait TextDecoder {
    /// Return the value at `path` inside `text`, or `None` when the text is
    /// not decodable or the path matches nothing.
    fn decode_get(&self, text: &str, path: &str) -> Result<Option<Value>, AccessError>;
}

/// A JSON-backed [`TextDecoder`]: decodes the whole payload with serde_json
/// and resolves the path with an internal engine.
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    accessor: Accessor,
}

impl JsonDecoder {
    /// A decoder resolving paths with the given engine options.
    pub fn new(options: Options) -> Self {
        Self {
            accessor: Accessor::new(options),
        }
    }
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl TextDecoder for JsonDecoder {
    fn decode_get(&self, text: &str, path: &str) -> Result<Option<Value>, AccessError> {
        let Ok(parsed) = serde_json::from_str::<serde_json::Value>(text) else {
            return Ok(None);
        };
        let value = Value::from(parsed);
        match self.accessor.get(&value, path) {
            Ok(found) => Ok(Some(found)),
            Err(AccessError::NotFound) => Ok(None),
            Err(other) => Err(other),
        }
    }
}
