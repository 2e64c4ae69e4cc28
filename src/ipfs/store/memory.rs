use async_trait::async_trait;
use cid::Cid;
use dashmap::DashMap;
use reqwest::{Method, StatusCode};

use super::BlockStore;
use crate::Result;
use crate::error::Error;
use crate::ipfs::car::Archive;
use crate::ipfs::codec;

/// An in-process block store.
///
/// Imports go through the same CAR serialization as uploads to a remote store, and every
/// imported block is checked against its CID. Tests can tamper with the stored content
/// through [`MemoryBlockStore::insert`] and [`MemoryBlockStore::remove`].
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: DashMap<Cid, Vec<u8>>,
    fetches: DashMap<Cid, usize>,
}

impl MemoryBlockStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `cid` without checking that it hashes to `cid`, returning the
    /// bytes it replaced.
    pub fn insert(&self, cid: Cid, data: Vec<u8>) -> Option<Vec<u8>> {
        self.blocks.insert(cid, data)
    }

    pub fn remove(&self, cid: &Cid) -> Option<Vec<u8>> {
        self.blocks.remove(cid).map(|(_, data)| data)
    }

    #[must_use]
    pub fn contains(&self, cid: &Cid) -> bool {
        self.blocks.contains_key(cid)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// How many times `cid` was requested through [`BlockStore::get_block`].
    #[must_use]
    pub fn fetch_count(&self, cid: &Cid) -> usize {
        self.fetches.get(cid).map_or(0, |count| *count)
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn import(&self, archive: &Archive) -> Result<Cid> {
        let archive = Archive::from_bytes(&archive.to_bytes().await?).await?;
        let root = archive
            .root()
            .copied()
            .ok_or_else(|| Error::unexpected_response("archive declares no root"))?;

        for block in archive.blocks() {
            codec::verify(&block.cid, &block.data)?;
        }
        for block in archive.into_blocks() {
            self.blocks.insert(block.cid, block.data);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(root = %root, blocks = self.blocks.len(), "imported archive");

        Ok(root)
    }

    async fn get_block(&self, cid: &Cid) -> Result<Vec<u8>> {
        *self.fetches.entry(*cid).or_insert(0) += 1;

        self.blocks.get(cid).map(|data| data.clone()).ok_or_else(|| {
            Error::status(
                StatusCode::NOT_FOUND,
                Method::POST,
                "/api/v0/block/get".to_owned(),
                format!("block {cid} not found"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;
    use crate::ipfs::codec::Block;

    #[tokio::test]
    async fn import_should_index_every_block() -> anyhow::Result<()> {
        let blocks = vec![codec::encode(&"root")?, codec::encode(&"child")?];
        let archive = Archive::new(blocks.clone())?;
        let store = MemoryBlockStore::new();

        let root = store.import(&archive).await?;

        assert_eq!(root, blocks[0].cid);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_block(&blocks[1].cid).await?, blocks[1].data);
        assert_eq!(store.fetch_count(&blocks[1].cid), 1);
        assert_eq!(store.fetch_count(&blocks[0].cid), 0);
        Ok(())
    }

    #[tokio::test]
    async fn import_should_reject_mislabeled_blocks() -> anyhow::Result<()> {
        let genuine = codec::encode(&"genuine")?;
        let archive = Archive::new(vec![Block::new(genuine.cid, b"forged".to_vec())])?;
        let store = MemoryBlockStore::new();

        let err = store.import(&archive).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Integrity);
        assert!(store.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn missing_block_should_be_not_found() -> anyhow::Result<()> {
        let block = codec::encode(&"absent")?;
        let store = MemoryBlockStore::new();

        let err = store.get_block(&block.cid).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Transport);
        assert!(err.to_string().contains("404"), "unexpected message: {err}");
        assert_eq!(store.fetch_count(&block.cid), 1);
        Ok(())
    }
}
