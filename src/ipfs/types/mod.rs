//! Extended metadata documents.
//!
//! Every concrete document type is pinned to one schema CID through its
//! [`DocumentKind`]. Related types are grouped into families ([`OutcomeSpace`],
//! [`OutcomePoint`], [`OracleConfig`] and [`OracleFallback`]); each slot of
//! [`ExtendedMetadata`] accepts any member of its family.
//!
//! All documents reject unknown fields, so bytes belonging to one document type never
//! decode as another.

mod api_spec;
mod oracle;
mod outcome_point;
mod outcome_space;

pub use api_spec::{
    ApiSpec, ApiStandard, AuthParamLocation, DateFormatType, GenericApiSpec, JsonPathApiSpec,
    PageLimit, SpecVariant,
};
use bon::Builder;
pub use oracle::{BaseOracleConfig, OracleConfig, OracleFallback, Prototype1OracleConfig};
pub use outcome_point::{
    BaseOutcomePoint, EventOutcomePoint, Observation, OutcomePoint, TimeSeriesOutcomePoint,
};
pub use outcome_space::{
    BaseCase, BaseOutcomeSpace, EdgeCase, Frequency, OutcomeSpace, ScalarOutcomeSpace,
    TimeSeriesOutcomeSpace,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::registry::{DocumentKind, Family};
use crate::Result;
use crate::error::Error;

/// Longest URL accepted in any document.
pub const MAX_URL_LENGTH: usize = 2083;

/// A document type whose schema is pinned to a fixed CID.
pub trait PinnedDocument: Serialize + DeserializeOwned {
    /// The kind naming this type's schema.
    const KIND: DocumentKind;

    /// Checks the constraints that the type system does not express.
    fn validate(&self) -> Result<()>;
}

/// A decoded document of any registered kind, grouped by family.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    OutcomeSpace(OutcomeSpace),
    OutcomePoint(OutcomePoint),
    OracleConfig(OracleConfig),
    OracleFallback(OracleFallback),
}

impl Document {
    #[must_use]
    pub fn family(&self) -> Family {
        match self {
            Self::OutcomeSpace(_) => Family::OutcomeSpace,
            Self::OutcomePoint(_) => Family::OutcomePoint,
            Self::OracleConfig(_) => Family::OracleConfig,
            Self::OracleFallback(_) => Family::OracleFallback,
        }
    }

    fn wrong_family(&self, expected: Family) -> Error {
        Error::validation(format!(
            "expected {expected} document, decoded {} document",
            self.family()
        ))
    }
}

impl TryFrom<Document> for OutcomeSpace {
    type Error = Error;

    fn try_from(document: Document) -> Result<Self> {
        match document {
            Document::OutcomeSpace(inner) => Ok(inner),
            other => Err(other.wrong_family(Family::OutcomeSpace)),
        }
    }
}

impl TryFrom<Document> for OutcomePoint {
    type Error = Error;

    fn try_from(document: Document) -> Result<Self> {
        match document {
            Document::OutcomePoint(inner) => Ok(inner),
            other => Err(other.wrong_family(Family::OutcomePoint)),
        }
    }
}

impl TryFrom<Document> for OracleConfig {
    type Error = Error;

    fn try_from(document: Document) -> Result<Self> {
        match document {
            Document::OracleConfig(inner) => Ok(inner),
            other => Err(other.wrong_family(Family::OracleConfig)),
        }
    }
}

impl TryFrom<Document> for OracleFallback {
    type Error = Error;

    fn try_from(document: Document) -> Result<Self> {
        match document {
            Document::OracleFallback(inner) => Ok(inner),
            other => Err(other.wrong_family(Family::OracleFallback)),
        }
    }
}

/// The fully resolved, typed extended metadata of a prediction-market product.
///
/// # Example
///
/// ```
/// use afp_client_sdk::ipfs::types::{
///     BaseCase, BaseOracleConfig, ExtendedMetadata, EventOutcomePoint, BaseOutcomeSpace,
///     OracleFallback,
/// };
/// use afp_client_sdk::types::{DateTime, Utc, dec};
///
/// let metadata = ExtendedMetadata::builder()
///     .outcome_space(
///         BaseOutcomeSpace::builder()
///             .fsp_type("binary")
///             .description("Will it rain in Berlin on 2025-06-01?")
///             .base_case(BaseCase::builder().condition("it rains").fsp_resolution("1").build())
///             .build(),
///     )
///     .outcome_point(EventOutcomePoint::builder().fsp_type("binary").outcome("rain").build())
///     .oracle_config(BaseOracleConfig::builder().description("Weather oracle").build())
///     .oracle_fallback(
///         OracleFallback::builder()
///             .fallback_time(DateTime::<Utc>::UNIX_EPOCH)
///             .fallback_fsp(dec!(0))
///             .build(),
///     )
///     .build();
///
/// metadata.validate().expect("valid metadata");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
pub struct ExtendedMetadata {
    #[builder(into)]
    pub outcome_space: OutcomeSpace,
    #[builder(into)]
    pub outcome_point: OutcomePoint,
    #[builder(into)]
    pub oracle_config: OracleConfig,
    pub oracle_fallback: OracleFallback,
}

impl ExtendedMetadata {
    /// Validates all four documents.
    pub fn validate(&self) -> Result<()> {
        self.outcome_space.validate()?;
        self.outcome_point.validate()?;
        self.oracle_config.validate()?;
        self.oracle_fallback.validate()
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_url(field: &str, value: &str) -> Result<()> {
    require_non_empty(field, value)?;
    if value.len() > MAX_URL_LENGTH {
        return Err(Error::validation(format!(
            "{field} must be at most {MAX_URL_LENGTH} characters"
        )));
    }
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| Error::validation(format!("{field} is not a valid URL: {e}")))
}
