use bon::Builder;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PinnedDocument, require_non_empty};
use crate::Result;
use crate::error::Error;
use crate::ipfs::registry::DocumentKind;

/// The generic outcome point of a product.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct BaseOutcomePoint {
    pub fsp_type: String,
}

impl PinnedDocument for BaseOutcomePoint {
    const KIND: DocumentKind = DocumentKind::OutcomePoint;

    fn validate(&self) -> Result<()> {
        require_non_empty("fsp_type", &self.fsp_type)
    }
}

/// The outcome of an event that the product settles on.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct EventOutcomePoint {
    pub fsp_type: String,
    pub outcome: String,
}

impl PinnedDocument for EventOutcomePoint {
    const KIND: DocumentKind = DocumentKind::OutcomePointEvent;

    fn validate(&self) -> Result<()> {
        require_non_empty("fsp_type", &self.fsp_type)?;
        require_non_empty("outcome", &self.outcome)
    }
}

/// The observation of a time series that the product settles on.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(deny_unknown_fields)]
pub struct Observation {
    /// The period the observed value refers to
    pub reference_date: NaiveDate,
    /// When the source publishes the value, if known in advance
    pub release_date: Option<NaiveDate>,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct TimeSeriesOutcomePoint {
    pub fsp_type: String,
    pub observation: Observation,
}

impl PinnedDocument for TimeSeriesOutcomePoint {
    const KIND: DocumentKind = DocumentKind::OutcomePointTimeSeries;

    fn validate(&self) -> Result<()> {
        require_non_empty("fsp_type", &self.fsp_type)?;
        match self.observation.release_date {
            Some(release_date) if release_date < self.observation.reference_date => {
                Err(Error::validation(format!(
                    "observation.release_date {release_date} precedes reference_date {}",
                    self.observation.reference_date
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Any document of the outcome point family.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutcomePoint {
    Base(BaseOutcomePoint),
    Event(EventOutcomePoint),
    TimeSeries(TimeSeriesOutcomePoint),
}

impl OutcomePoint {
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Base(_) => BaseOutcomePoint::KIND,
            Self::Event(_) => EventOutcomePoint::KIND,
            Self::TimeSeries(_) => TimeSeriesOutcomePoint::KIND,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Base(inner) => inner.validate(),
            Self::Event(inner) => inner.validate(),
            Self::TimeSeries(inner) => inner.validate(),
        }
    }
}

impl From<BaseOutcomePoint> for OutcomePoint {
    fn from(inner: BaseOutcomePoint) -> Self {
        Self::Base(inner)
    }
}

impl From<EventOutcomePoint> for OutcomePoint {
    fn from(inner: EventOutcomePoint) -> Self {
        Self::Event(inner)
    }
}

impl From<TimeSeriesOutcomePoint> for OutcomePoint {
    fn from(inner: TimeSeriesOutcomePoint) -> Self {
        Self::TimeSeries(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn observation_should_serialize_iso_dates() {
        let point = TimeSeriesOutcomePoint::builder()
            .fsp_type("scalar")
            .observation(
                Observation::builder()
                    .reference_date(date(2024, 1, 1))
                    .release_date(date(2024, 1, 2))
                    .build(),
            )
            .build();

        let json = serde_json::to_value(&point).expect("serialization failed");

        assert_eq!(
            json,
            serde_json::json!({
                "fsp_type": "scalar",
                "observation": {
                    "reference_date": "2024-01-01",
                    "release_date": "2024-01-02"
                }
            })
        );
    }

    #[test]
    fn release_before_reference_should_fail() {
        let point = TimeSeriesOutcomePoint::builder()
            .fsp_type("scalar")
            .observation(
                Observation::builder()
                    .reference_date(date(2024, 1, 2))
                    .release_date(date(2024, 1, 1))
                    .build(),
            )
            .build();

        let err = point.validate().unwrap_err();

        assert_eq!(err.kind(), Kind::Validation);
    }

    #[test]
    fn event_without_outcome_should_fail() {
        let point = EventOutcomePoint::builder().fsp_type("binary").outcome("").build();

        point.validate().unwrap_err();
    }

    #[test]
    fn base_should_reject_event_fields() {
        let json = serde_json::json!({ "fsp_type": "binary", "outcome": "yes" });

        serde_json::from_value::<BaseOutcomePoint>(json).unwrap_err();
    }
}
