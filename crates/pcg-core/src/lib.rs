#![deny(missing_docs)]
#![doc = "Shared building blocks for the coupling-configuration generator: the structured error taxonomy, canonical JSON/YAML helpers and stable number formatting."]

pub mod canonical;
pub mod errors;
pub mod number;

pub use canonical::{
    from_yaml_str, stable_hash_bytes, stable_hash_string, to_canonical_json_bytes,
};
pub use errors::{ErrorInfo, PcgError};
pub use number::format_real;
