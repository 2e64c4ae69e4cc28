//! Mapping between pinned schema CIDs and the document types they identify.

use std::collections::HashMap;

use cid::Cid;
use strum_macros::Display;

use super::codec::{self, DAG_CBOR, SHA2_256};
use super::types::{
    BaseOracleConfig, BaseOutcomePoint, BaseOutcomeSpace, Document, EventOutcomePoint,
    OracleFallback, PinnedDocument, Prototype1OracleConfig, ScalarOutcomeSpace,
    TimeSeriesOutcomePoint, TimeSeriesOutcomeSpace,
};
use crate::Result;
use crate::error::Error;

/// Every document type the SDK can encode and decode.
///
/// Each kind is pinned to the CID of its JSON schema in `afp-product-schemas` v0.2.0.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DocumentKind {
    OutcomeSpace,
    OutcomeSpaceScalar,
    OutcomeSpaceTimeSeries,
    OutcomePoint,
    OutcomePointEvent,
    OutcomePointTimeSeries,
    OracleConfig,
    OracleConfigPrototype1,
    OracleFallback,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 9] = [
        Self::OutcomeSpace,
        Self::OutcomeSpaceScalar,
        Self::OutcomeSpaceTimeSeries,
        Self::OutcomePoint,
        Self::OutcomePointEvent,
        Self::OutcomePointTimeSeries,
        Self::OracleConfig,
        Self::OracleConfigPrototype1,
        Self::OracleFallback,
    ];

    /// String form of the schema CID this kind is pinned to.
    #[must_use]
    pub const fn pinned_schema_cid(self) -> &'static str {
        match self {
            Self::OutcomeSpace => "bafyreicheoypx6synljushh7mq2572iyhlolf4nake2p5dwobgnj3r5eua",
            Self::OutcomeSpaceScalar => {
                "bafyreihn3oiaxffe4e2w7pwtreadpw3obfd7gqlogbcxm56jc2hzfvco74"
            }
            Self::OutcomeSpaceTimeSeries => {
                "bafyreid35a67db4sqh4fs6boddyt2xvscbqy6nqvsp5jjur56qhkw4ixre"
            }
            Self::OutcomePoint => "bafyreibnfg6nq74dvpkre5rakkccij7iadp5rxpim7omsatjnrpmj3y7v4",
            Self::OutcomePointEvent => {
                "bafyreihur3dzwhja6uxsbcw6eeoj3xmmc4e3zkmyzpot5v5dleevxe5zam"
            }
            Self::OutcomePointTimeSeries => {
                "bafyreidzs7okcpqiss6ztftltyptqwnw5e5opsy5yntospekjha4kpykaa"
            }
            Self::OracleConfig => "bafyreifcec2km7hxwq6oqzjlspni2mgipetjb7pqtaewh2efislzoctboi",
            Self::OracleConfigPrototype1 => {
                "bafyreiaw34o6l3rmatabzbds2i2myazdw2yolevcpsoyd2i2g3ms7wa2eq"
            }
            Self::OracleFallback => "bafyreicgr6dfo5yduixjkcifghiulskfegwojvuwodtouvivl362zndhxe",
        }
    }

    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::OutcomeSpace | Self::OutcomeSpaceScalar | Self::OutcomeSpaceTimeSeries => {
                Family::OutcomeSpace
            }
            Self::OutcomePoint | Self::OutcomePointEvent | Self::OutcomePointTimeSeries => {
                Family::OutcomePoint
            }
            Self::OracleConfig | Self::OracleConfigPrototype1 => Family::OracleConfig,
            Self::OracleFallback => Family::OracleFallback,
        }
    }

    /// Decodes `data` as a document of this kind and validates it.
    ///
    /// Bytes that do not decode as this kind, or that violate its constraints, are a
    /// [`Kind::Validation`](crate::error::Kind::Validation) error. Whether `data` hashes to
    /// `cid` is not checked here; see [`codec::verify`].
    pub fn decode(self, cid: &Cid, data: &[u8]) -> Result<Document> {
        let document = match self {
            Self::OutcomeSpace => {
                Document::OutcomeSpace(decode_document::<BaseOutcomeSpace>(cid, data)?.into())
            }
            Self::OutcomeSpaceScalar => {
                Document::OutcomeSpace(decode_document::<ScalarOutcomeSpace>(cid, data)?.into())
            }
            Self::OutcomeSpaceTimeSeries => Document::OutcomeSpace(
                decode_document::<TimeSeriesOutcomeSpace>(cid, data)?.into(),
            ),
            Self::OutcomePoint => {
                Document::OutcomePoint(decode_document::<BaseOutcomePoint>(cid, data)?.into())
            }
            Self::OutcomePointEvent => {
                Document::OutcomePoint(decode_document::<EventOutcomePoint>(cid, data)?.into())
            }
            Self::OutcomePointTimeSeries => Document::OutcomePoint(
                decode_document::<TimeSeriesOutcomePoint>(cid, data)?.into(),
            ),
            Self::OracleConfig => {
                Document::OracleConfig(decode_document::<BaseOracleConfig>(cid, data)?.into())
            }
            Self::OracleConfigPrototype1 => Document::OracleConfig(
                decode_document::<Prototype1OracleConfig>(cid, data)?.into(),
            ),
            Self::OracleFallback => {
                Document::OracleFallback(decode_document::<OracleFallback>(cid, data)?)
            }
        };
        Ok(document)
    }
}

fn decode_document<T: PinnedDocument>(cid: &Cid, data: &[u8]) -> Result<T> {
    let document: T = codec::decode(cid, data)?;
    document.validate()?;
    Ok(document)
}

/// The slot of the extended metadata a document kind belongs to.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Family {
    OutcomeSpace,
    OutcomePoint,
    OracleConfig,
    OracleFallback,
}

/// Immutable lookup between schema CIDs and [`DocumentKind`]s.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    kinds: HashMap<Cid, DocumentKind>,
    schemas: HashMap<DocumentKind, Cid>,
}

impl SchemaRegistry {
    /// Builds the registry over every [`DocumentKind`].
    pub fn new() -> Result<Self> {
        Self::from_kinds(&DocumentKind::ALL)
    }

    /// Builds the registry over `kinds` only.
    ///
    /// Fails if a pinned schema CID is not a CIDv1 with the `dag-cbor` codec and a
    /// `sha2-256` hash, or if two entries share a schema CID.
    pub fn from_kinds(kinds: &[DocumentKind]) -> Result<Self> {
        let mut registry = Self {
            kinds: HashMap::with_capacity(kinds.len()),
            schemas: HashMap::with_capacity(kinds.len()),
        };

        for &kind in kinds {
            let schema = parse_pinned(kind)?;
            if let Some(existing) = registry.kinds.insert(schema, kind) {
                return Err(Error::configuration(format!(
                    "schema CID {schema} is registered for both {existing} and {kind}"
                )));
            }
            registry.schemas.insert(kind, schema);
        }

        Ok(registry)
    }

    /// Returns the document kind identified by `schema`.
    pub fn resolve(&self, schema: &Cid) -> Result<DocumentKind> {
        self.kinds
            .get(schema)
            .copied()
            .ok_or_else(|| Error::unknown_schema(*schema))
    }

    /// Returns the schema CID of `kind`, if `kind` is registered.
    #[must_use]
    pub fn schema_cid(&self, kind: DocumentKind) -> Option<&Cid> {
        self.schemas.get(&kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

fn parse_pinned(kind: DocumentKind) -> Result<Cid> {
    let raw = kind.pinned_schema_cid();
    let cid = Cid::try_from(raw).map_err(|e| {
        Error::configuration(format!("pinned schema CID {raw} of {kind} does not parse: {e}"))
    })?;

    if cid.version() != cid::Version::V1
        || cid.codec() != DAG_CBOR
        || cid.hash().code() != SHA2_256
    {
        return Err(Error::configuration(format!(
            "pinned schema CID {raw} of {kind} is not a dag-cbor/sha2-256 CIDv1"
        )));
    }

    Ok(cid)
}
