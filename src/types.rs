//! Re-exported types from external crates for convenience.
//!
//! These types are commonly used in this SDK and are re-exported here
//! so users don't need to add these dependencies to their `Cargo.toml`.

/// Content identifier. CIDs produced by this SDK are CIDv1, `dag-cbor`, `sha2-256`
/// and display in `base32` (`bafyrei...`). Parsing also accepts CIDv0 (`Qm...`) and
/// other multibase forms.
pub use cid::Cid;
/// Date and time types for timestamps and calendar dates in documents.
pub use chrono::{DateTime, NaiveDate, Utc};
/// Arbitrary precision decimal type for settlement prices and scales.
pub use rust_decimal::Decimal;
/// Macro for creating [`Decimal`] literals at compile time.
///
/// # Example
/// ```
/// use afp_client_sdk::types::dec;
/// let fallback_fsp = dec!(100.5);
/// ```
pub use rust_decimal_macros::dec;
/// Secret string used for the block store API key.
pub use secrecy::SecretString;
