//! The root document linking the four extended metadata components.

use cid::Cid;
use serde::{Deserialize, Serialize};

use super::codec::{self, Block};
use super::registry::{DocumentKind, Family, SchemaRegistry};
use super::types::{ExtendedMetadata, OracleFallback, PinnedDocument as _};
use crate::Result;
use crate::error::Error;

/// Points at one component document and the schema it conforms to.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentLink {
    pub data: Cid,
    pub schema: Cid,
}

impl ComponentLink {
    #[must_use]
    pub fn new(data: Cid, schema: Cid) -> Self {
        Self { data, schema }
    }
}

/// The root block of an extended metadata upload. Its CID is the extended metadata CID.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtendedMetadataDag {
    pub outcome_space: ComponentLink,
    pub outcome_point: ComponentLink,
    pub oracle_config: ComponentLink,
    pub oracle_fallback: ComponentLink,
}

/// A component link whose schema has been resolved to a document kind.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLink {
    pub data: Cid,
    pub kind: DocumentKind,
}

/// Resolved links in slot order.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDag {
    pub outcome_space: ResolvedLink,
    pub outcome_point: ResolvedLink,
    pub oracle_config: ResolvedLink,
    pub oracle_fallback: ResolvedLink,
}

impl ExtendedMetadataDag {
    /// Resolves every link's schema through `registry`.
    ///
    /// Nothing is fetched. A schema missing from the registry is a
    /// [`Kind::UnknownSchema`](crate::error::Kind::UnknownSchema) error, a schema of
    /// another family than its slot is a [`Kind::Validation`](crate::error::Kind::Validation)
    /// error and a data CID with an undecodable codec is a
    /// [`Kind::UnsupportedCodec`](crate::error::Kind::UnsupportedCodec) error.
    pub fn resolve(&self, registry: &SchemaRegistry) -> Result<ResolvedDag> {
        Ok(ResolvedDag {
            outcome_space: resolve_link(&self.outcome_space, Family::OutcomeSpace, registry)?,
            outcome_point: resolve_link(&self.outcome_point, Family::OutcomePoint, registry)?,
            oracle_config: resolve_link(&self.oracle_config, Family::OracleConfig, registry)?,
            oracle_fallback: resolve_link(
                &self.oracle_fallback,
                Family::OracleFallback,
                registry,
            )?,
        })
    }
}

fn resolve_link(
    link: &ComponentLink,
    slot: Family,
    registry: &SchemaRegistry,
) -> Result<ResolvedLink> {
    let kind = registry.resolve(&link.schema)?;
    if kind.family() != slot {
        return Err(Error::validation(format!(
            "{slot} link declares schema {} of {kind}, a {} document",
            link.schema,
            kind.family()
        )));
    }
    codec::ensure_supported(&link.data)?;

    Ok(ResolvedLink {
        data: link.data,
        kind,
    })
}

/// Encodes the four components of `metadata` and the root linking them.
///
/// The root block comes first, followed by the outcome space, outcome point, oracle
/// configuration and oracle fallback blocks.
pub fn assemble(metadata: &ExtendedMetadata, registry: &SchemaRegistry) -> Result<Vec<Block>> {
    let (outcome_space, outcome_space_block) = link(
        &metadata.outcome_space,
        metadata.outcome_space.kind(),
        registry,
    )?;
    let (outcome_point, outcome_point_block) = link(
        &metadata.outcome_point,
        metadata.outcome_point.kind(),
        registry,
    )?;
    let (oracle_config, oracle_config_block) = link(
        &metadata.oracle_config,
        metadata.oracle_config.kind(),
        registry,
    )?;
    let (oracle_fallback, oracle_fallback_block) =
        link(&metadata.oracle_fallback, OracleFallback::KIND, registry)?;

    let root = codec::encode(&ExtendedMetadataDag {
        outcome_space,
        outcome_point,
        oracle_config,
        oracle_fallback,
    })?;

    Ok(vec![
        root,
        outcome_space_block,
        outcome_point_block,
        oracle_config_block,
        oracle_fallback_block,
    ])
}

fn link<T: Serialize>(
    document: &T,
    kind: DocumentKind,
    registry: &SchemaRegistry,
) -> Result<(ComponentLink, Block)> {
    let schema = registry
        .schema_cid(kind)
        .copied()
        .ok_or_else(|| Error::configuration(format!("{kind} is not registered")))?;
    let block = codec::encode(document)?;

    Ok((ComponentLink::new(block.cid, schema), block))
}
