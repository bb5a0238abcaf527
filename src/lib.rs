//! Parser for an indentation-based YAML subset, producing values in the JSON
//! data model: null, booleans, 64-bit integers and floats, strings, arrays,
//! and insertion-ordered objects.
//!
//! The accepted notation covers block-style mappings and sequences, `#`
//! comments (quote-aware within a line), single- and double-quoted scalars,
//! numeric base literals (`0x`/`0o`/`0b`), the special float forms `.inf`,
//! `-.inf` and `.nan`, and embedded JSON-style flow arrays/objects that may
//! span multiple physical lines. Anchors, aliases, tags, multi-document
//! streams, and block scalars are not supported.
//!
//! ```
//! let value = serde_yamlite::parse_str("name: demo\nports:\n  - 80\n  - 443\n").unwrap();
//! assert_eq!(value["name"].as_str(), Some("demo"));
//! assert_eq!(value["ports"][1].as_i64(), Some(443));
//! ```

mod decode;
pub mod error;
pub mod value;

use std::io::Read;

use serde::de::DeserializeOwned;

pub use crate::error::{Error, Result};
pub use crate::value::Value;

/// Parse a document into a [`Value`] tree.
pub fn parse_str(input: &str) -> Result<Value> {
    decode::document_from_str(input)
}

/// Parse a document from a reader into a [`Value`] tree.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Value> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse_str(&buf)
}

/// Parse a document and deserialize it into `T`.
///
/// Non-finite floats have no JSON spelling and reach the deserializer as
/// null on this path.
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    let value = parse_str(input)?;
    serde_json::from_value(value.into()).map_err(Error::Deserialize)
}

/// Parse a document from a reader and deserialize it into `T`.
pub fn from_reader<T: DeserializeOwned, R: Read>(mut reader: R) -> Result<T> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    from_str(&buf)
}
