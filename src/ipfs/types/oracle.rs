use bon::Builder;
use chrono::{DateTime, Datelike as _, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::{ApiSpec, PinnedDocument, require_non_empty, require_url};
use crate::Result;
use crate::error::Error;
use crate::ipfs::registry::DocumentKind;
use crate::serde_helpers::{CanonicalDecimal, IsoDateTime};

const MAX_FALLBACK_YEAR: i32 = 9999;

/// Describes the oracle that submits the final settlement price.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct BaseOracleConfig {
    pub description: String,
    pub project_url: Option<String>,
}

impl PinnedDocument for BaseOracleConfig {
    const KIND: DocumentKind = DocumentKind::OracleConfig;

    fn validate(&self) -> Result<()> {
        require_non_empty("description", &self.description)?;
        match &self.project_url {
            Some(url) => require_url("project_url", url),
            None => Ok(()),
        }
    }
}

/// Oracle configuration that also tells the oracle how to evaluate the settlement value.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct Prototype1OracleConfig {
    pub description: String,
    pub project_url: Option<String>,
    #[builder(into)]
    pub evaluation_api_spec: ApiSpec,
}

impl PinnedDocument for Prototype1OracleConfig {
    const KIND: DocumentKind = DocumentKind::OracleConfigPrototype1;

    fn validate(&self) -> Result<()> {
        require_non_empty("description", &self.description)?;
        if let Some(url) = &self.project_url {
            require_url("project_url", url)?;
        }
        self.evaluation_api_spec.validate()
    }
}

/// Any document of the oracle configuration family.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OracleConfig {
    Base(BaseOracleConfig),
    Prototype1(Prototype1OracleConfig),
}

impl OracleConfig {
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Base(_) => BaseOracleConfig::KIND,
            Self::Prototype1(_) => Prototype1OracleConfig::KIND,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Base(inner) => &inner.description,
            Self::Prototype1(inner) => &inner.description,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Base(inner) => inner.validate(),
            Self::Prototype1(inner) => inner.validate(),
        }
    }
}

impl From<BaseOracleConfig> for OracleConfig {
    fn from(inner: BaseOracleConfig) -> Self {
        Self::Base(inner)
    }
}

impl From<Prototype1OracleConfig> for OracleConfig {
    fn from(inner: Prototype1OracleConfig) -> Self {
        Self::Prototype1(inner)
    }
}

/// The settlement price used when the oracle has not submitted one by `fallback_time`.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(deny_unknown_fields)]
pub struct OracleFallback {
    #[serde_as(as = "IsoDateTime")]
    pub fallback_time: DateTime<Utc>,
    #[serde_as(as = "CanonicalDecimal")]
    pub fallback_fsp: Decimal,
}

impl PinnedDocument for OracleFallback {
    const KIND: DocumentKind = DocumentKind::OracleFallback;

    /// `fallback_time` must lie between the UNIX epoch and the end of year 9999 and
    /// carry whole seconds, the range its `YYYY-MM-DDTHH:MM:SSZ` encoding represents.
    fn validate(&self) -> Result<()> {
        if self.fallback_time < DateTime::<Utc>::UNIX_EPOCH {
            return Err(Error::validation(format!(
                "fallback_time {} precedes the UNIX epoch",
                self.fallback_time
            )));
        }
        if self.fallback_time.year() > MAX_FALLBACK_YEAR {
            return Err(Error::validation(format!(
                "fallback_time {} is after the year {MAX_FALLBACK_YEAR}",
                self.fallback_time
            )));
        }
        if self.fallback_time.timestamp_subsec_nanos() != 0 {
            return Err(Error::validation(format!(
                "fallback_time {} has a fractional second",
                self.fallback_time
            )));
        }
        Ok(())
    }
}
