//! Content-addressed extended metadata.
//!
//! A prediction-market product points at four auxiliary documents: its outcome space,
//! outcome point, oracle configuration and oracle fallback. This module encodes them as
//! `dag-cbor` blocks, links them from a single root block together with the CIDs of the
//! schemas they conform to, and moves the result to and from an IPFS block store as a
//! CAR archive.
//!
//! # Upload
//!
//! 1. Every document is validated and encoded ([`codec`]).
//! 2. The root block linking the four components is assembled ([`dag`]).
//! 3. All five blocks are imported as one archive ([`car`], [`BlockStore::import`]).
//! 4. The root CID reported by the store must equal the local one.
//!
//! # Download
//!
//! 1. The root block is fetched and decoded.
//! 2. Every link's schema CID is resolved through the [`SchemaRegistry`].
//! 3. The four component blocks are fetched, decoded, validated and checked against
//!    their CIDs.
//!
//! # Example
//!
//! ```no_run
//! use afp_client_sdk::ipfs::{Client, Config};
//! # use afp_client_sdk::ipfs::types::ExtendedMetadata;
//!
//! # async fn example(metadata: ExtendedMetadata) -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("http://localhost:5001", &Config::default())?;
//!
//! let cid = client.upload_extended_metadata(&metadata).await?;
//! let downloaded = client.download_extended_metadata(&cid).await?;
//! assert_eq!(downloaded, metadata);
//! # Ok(())
//! # }
//! ```

pub mod car;
mod client;
pub mod codec;
pub mod dag;
pub mod registry;
pub mod store;
pub mod types;

pub use client::{
    Client, Config, DEFAULT_IPFS_API_URL, IPFS_API_KEY_VAR, IPFS_API_URL_VAR,
};
pub use registry::{DocumentKind, Family, SchemaRegistry};
pub use store::{BlockStore, HttpBlockStore, MemoryBlockStore};
