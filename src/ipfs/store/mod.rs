//! Block stores that extended metadata is uploaded to and fetched from.

mod http;
mod memory;

use async_trait::async_trait;
use cid::Cid;
pub use http::HttpBlockStore;
pub use memory::MemoryBlockStore;

use super::car::Archive;
use crate::Result;

/// A content-addressed block store.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Imports every block of `archive`, pins its root and returns the root CID the store
    /// reports.
    async fn import(&self, archive: &Archive) -> Result<Cid>;

    /// Returns the raw bytes of the block addressed by `cid`.
    async fn get_block(&self, cid: &Cid) -> Result<Vec<u8>>;
}
