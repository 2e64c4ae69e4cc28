use bon::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::{ApiSpec, PinnedDocument, require_non_empty, require_url};
use crate::Result;
use crate::ipfs::registry::DocumentKind;

/// How the final settlement price is determined when no edge case applies.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct BaseCase {
    pub condition: String,
    pub fsp_resolution: String,
}

/// A condition under which the final settlement price is resolved differently.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct EdgeCase {
    pub condition: String,
    pub fsp_resolution: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

fn validate_cases(base_case: &BaseCase, edge_cases: &[EdgeCase]) -> Result<()> {
    require_non_empty("base_case.condition", &base_case.condition)?;
    require_non_empty("base_case.fsp_resolution", &base_case.fsp_resolution)?;
    for edge_case in edge_cases {
        require_non_empty("edge_cases.condition", &edge_case.condition)?;
        require_non_empty("edge_cases.fsp_resolution", &edge_case.fsp_resolution)?;
    }
    Ok(())
}

/// The generic outcome space of a product.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct BaseOutcomeSpace {
    pub fsp_type: String,
    pub description: String,
    pub base_case: BaseCase,
    #[builder(default)]
    pub edge_cases: Vec<EdgeCase>,
}

impl PinnedDocument for BaseOutcomeSpace {
    const KIND: DocumentKind = DocumentKind::OutcomeSpace;

    fn validate(&self) -> Result<()> {
        require_non_empty("fsp_type", &self.fsp_type)?;
        require_non_empty("description", &self.description)?;
        validate_cases(&self.base_case, &self.edge_cases)
    }
}

/// An outcome space settled against a scalar value published by an external source.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct ScalarOutcomeSpace {
    pub fsp_type: String,
    pub description: String,
    pub base_case: BaseCase,
    #[builder(default)]
    pub edge_cases: Vec<EdgeCase>,
    pub units: String,
    pub source_name: String,
    pub source_uri: String,
}

impl PinnedDocument for ScalarOutcomeSpace {
    const KIND: DocumentKind = DocumentKind::OutcomeSpaceScalar;

    fn validate(&self) -> Result<()> {
        require_non_empty("fsp_type", &self.fsp_type)?;
        require_non_empty("description", &self.description)?;
        validate_cases(&self.base_case, &self.edge_cases)?;
        require_non_empty("units", &self.units)?;
        require_non_empty("source_name", &self.source_name)?;
        require_url("source_uri", &self.source_uri)
    }
}

/// A scalar outcome space whose source publishes a time series at a fixed frequency.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct TimeSeriesOutcomeSpace {
    pub fsp_type: String,
    pub description: String,
    pub base_case: BaseCase,
    #[builder(default)]
    pub edge_cases: Vec<EdgeCase>,
    pub units: String,
    pub source_name: String,
    pub source_uri: String,
    pub frequency: Frequency,
    #[builder(into)]
    pub history_api_spec: Option<ApiSpec>,
}

impl PinnedDocument for TimeSeriesOutcomeSpace {
    const KIND: DocumentKind = DocumentKind::OutcomeSpaceTimeSeries;

    fn validate(&self) -> Result<()> {
        require_non_empty("fsp_type", &self.fsp_type)?;
        require_non_empty("description", &self.description)?;
        validate_cases(&self.base_case, &self.edge_cases)?;
        require_non_empty("units", &self.units)?;
        require_non_empty("source_name", &self.source_name)?;
        require_url("source_uri", &self.source_uri)?;
        match &self.history_api_spec {
            Some(spec) => spec.validate(),
            None => Ok(()),
        }
    }
}

/// Any document of the outcome space family.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutcomeSpace {
    Base(BaseOutcomeSpace),
    Scalar(ScalarOutcomeSpace),
    TimeSeries(TimeSeriesOutcomeSpace),
}

impl OutcomeSpace {
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Base(_) => BaseOutcomeSpace::KIND,
            Self::Scalar(_) => ScalarOutcomeSpace::KIND,
            Self::TimeSeries(_) => TimeSeriesOutcomeSpace::KIND,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Base(inner) => &inner.description,
            Self::Scalar(inner) => &inner.description,
            Self::TimeSeries(inner) => &inner.description,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Base(inner) => inner.validate(),
            Self::Scalar(inner) => inner.validate(),
            Self::TimeSeries(inner) => inner.validate(),
        }
    }
}

impl From<BaseOutcomeSpace> for OutcomeSpace {
    fn from(inner: BaseOutcomeSpace) -> Self {
        Self::Base(inner)
    }
}

impl From<ScalarOutcomeSpace> for OutcomeSpace {
    fn from(inner: ScalarOutcomeSpace) -> Self {
        Self::Scalar(inner)
    }
}

impl From<TimeSeriesOutcomeSpace> for OutcomeSpace {
    fn from(inner: TimeSeriesOutcomeSpace) -> Self {
        Self::TimeSeries(inner)
    }
}
