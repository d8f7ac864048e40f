//! Stable definition ids derived from fully-qualified type names.
//!
//! The id is the name-based (version 3) UUID of the lowercase hex SHA-256
//! digest of the type name, so every implementation sharing this scheme
//! produces the same `$defs` keys.
//!
//! ```rust
//! use fschema::definition_id;
//!
//! let first = definition_id("shop::Person");
//! let second = definition_id("shop::Person");
//! assert_eq!(first, second);
//! assert_eq!(first.len(), 36);
//! ```

use md5::Md5;
use sha2::{Digest, Sha256};
use uuid::Builder;

pub fn definition_id(type_name: &str) -> String {
    let type_digest = hex::encode(Sha256::digest(type_name.as_bytes()));
    let name_digest: [u8; 16] = Md5::digest(type_digest.as_bytes()).into();
    Builder::from_md5_bytes(name_digest).into_uuid().to_string()
}
