//! [CARv1](https://ipld.io/specs/transport/car/carv1/) archives.
//!
//! An archive is a `dag-cbor` header `{roots, version: 1}` followed by one
//! length-prefixed frame per block, each holding the binary CID and the block bytes.
//! Framing is delegated to `iroh-car`.

use std::fmt;

use cid::Cid;
use iroh_car::{CarHeader, CarReader, CarWriter};

use super::codec::Block;
use crate::Result;
use crate::error::{Error, Kind};

/// Content type of a CAR archive upload.
pub const CAR_CONTENT_TYPE: &str = "application/vnd.ipld.car";

/// An ordered set of blocks with a single root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    roots: Vec<Cid>,
    blocks: Vec<Block>,
}

impl Archive {
    /// Builds an archive whose root is the first of `blocks`.
    pub fn new(blocks: Vec<Block>) -> Result<Self> {
        let root = blocks
            .first()
            .map(|block| block.cid)
            .ok_or_else(|| Error::validation("an archive needs at least one block"))?;

        Ok(Self {
            roots: vec![root],
            blocks,
        })
    }

    /// The first root declared in the header.
    #[must_use]
    pub fn root(&self) -> Option<&Cid> {
        self.roots.first()
    }

    #[must_use]
    pub fn roots(&self) -> &[Cid] {
        &self.roots
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[must_use]
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Serializes the archive.
    pub async fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = CarWriter::new(CarHeader::new_v1(self.roots.clone()), Vec::new());
        for block in &self.blocks {
            writer
                .write(block.cid, &block.data)
                .await
                .map_err(|e| Error::with_source(Kind::Internal, e))?;
        }

        writer
            .finish()
            .await
            .map_err(|e| Error::with_source(Kind::Internal, e))
    }

    /// Parses a serialized archive. Block bytes are not checked against their CIDs.
    pub async fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = CarReader::new(bytes).await.map_err(malformed)?;
        let roots = reader.header().roots().to_vec();
        if roots.is_empty() {
            return Err(malformed("header declares no roots"));
        }

        let mut blocks = Vec::new();
        while let Some((cid, data)) = reader.next_block().await.map_err(malformed)? {
            blocks.push(Block::new(cid, data));
        }

        Ok(Self { roots, blocks })
    }
}

fn malformed<E: fmt::Display>(e: E) -> Error {
    Error::unexpected_response(format!("malformed CAR archive: {e}"))
}
