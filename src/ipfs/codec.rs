//! Canonical encoding of documents into content-addressed blocks.
//!
//! A document is first lowered into an [`Ipld`] tree, which fixes map key order, and
//! then serialized with `dag-cbor`. The block's CID is a CIDv1 over the `sha2-256`
//! digest of those bytes, so equal documents always produce equal CIDs.

use cid::Cid;
use cid::multihash::Multihash;
use ipld_core::ipld::Ipld;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest as _, Sha256};

use crate::Result;
use crate::error::{Error, Kind};

/// Multicodec code of `dag-cbor`
pub const DAG_CBOR: u64 = 0x71;
/// Multicodec code of `dag-json`
pub const DAG_JSON: u64 = 0x0129;
/// Multihash code of `sha2-256`
pub const SHA2_256: u64 = 0x12;

/// Encoded bytes together with the CID that addresses them.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub cid: Cid,
    pub data: Vec<u8>,
}

impl Block {
    /// Wraps `data` without checking that it hashes to `cid`.
    #[must_use]
    pub fn new(cid: Cid, data: Vec<u8>) -> Self {
        Self { cid, data }
    }
}

/// Returns the canonical IPLD tree of `value`.
pub fn canonical<T: Serialize>(value: &T) -> Result<Ipld> {
    Ok(ipld_core::serde::to_ipld(value)?)
}

/// Encodes `value` as a `dag-cbor` block.
pub fn encode<T: Serialize>(value: &T) -> Result<Block> {
    let tree = canonical(value)?;
    let data = serde_ipld_dagcbor::to_vec(&tree)?;
    let cid = cid_of(DAG_CBOR, &data)?;

    Ok(Block { cid, data })
}

/// Returns the CIDv1 with content codec `codec` over the `sha2-256` digest of `data`.
pub fn cid_of(codec: u64, data: &[u8]) -> Result<Cid> {
    Ok(Cid::new_v1(codec, sha2_256(data)?))
}

fn sha2_256(data: &[u8]) -> Result<Multihash<64>> {
    Multihash::wrap(SHA2_256, &Sha256::digest(data))
        .map_err(|e| Error::with_source(Kind::Internal, e))
}

/// Fails with [`Kind::UnsupportedCodec`] unless `cid` names a codec this module decodes.
pub fn ensure_supported(cid: &Cid) -> Result<()> {
    match cid.codec() {
        DAG_CBOR | DAG_JSON => Ok(()),
        other => Err(Error::unsupported_codec(*cid, other)),
    }
}

/// Decodes `data` with the codec named by `cid`.
///
/// Bytes that do not deserialize into `T` are a [`Kind::Validation`] error.
pub fn decode<T: DeserializeOwned>(cid: &Cid, data: &[u8]) -> Result<T> {
    match cid.codec() {
        DAG_CBOR => serde_ipld_dagcbor::from_slice(data)
            .map_err(|e| Error::with_source(Kind::Validation, e)),
        DAG_JSON => serde_ipld_dagjson::from_slice(data)
            .map_err(|e| Error::with_source(Kind::Validation, e)),
        other => Err(Error::unsupported_codec(*cid, other)),
    }
}

/// Checks that `data` hashes to the digest carried by `cid`.
///
/// Only `sha2-256` CIDs can be verified; other hash functions are a
/// [`Kind::UnsupportedCodec`] error.
pub fn verify(cid: &Cid, data: &[u8]) -> Result<()> {
    let code = cid.hash().code();
    if code != SHA2_256 {
        return Err(Error::unsupported_codec(*cid, code));
    }

    let digest = sha2_256(data)?;
    if &digest != cid.hash() {
        return Err(Error::cid_mismatch(Cid::new_v1(cid.codec(), digest), *cid));
    }
    Ok(())
}
