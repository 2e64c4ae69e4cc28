use std::collections::BTreeMap;

use bon::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use strum_macros::Display;

use super::{require_non_empty, require_url};
use crate::Result;
use crate::error::Error;
use crate::serde_helpers::CanonicalDecimal;

const DEFAULT_MAX_PAGES: u32 = 10;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ApiStandard {
    #[serde(rename = "JSONPath")]
    #[strum(serialize = "JSONPath")]
    JsonPath,
    #[serde(rename = "GraphQL")]
    #[strum(serialize = "GraphQL")]
    GraphQl,
}

/// What the described API returns.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SpecVariant {
    /// Historical values of the underlying
    UnderlyingHistory,
    /// The final settlement value of the product
    ProductFsv,
}

#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthParamLocation {
    Query,
    Header,
    #[default]
    None,
}

#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DateFormatType {
    #[default]
    Iso8601,
    UnixTimestamp,
    Custom,
}

/// Most pages fetched from a paginated API. Encoded as the bare count, or `null` when
/// unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageLimit(Option<u32>);

impl PageLimit {
    pub const UNLIMITED: Self = Self(None);

    #[must_use]
    pub const fn pages(pages: u32) -> Self {
        Self(Some(pages))
    }

    #[must_use]
    pub const fn get(self) -> Option<u32> {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self::pages(DEFAULT_MAX_PAGES)
    }
}

impl From<u32> for PageLimit {
    fn from(pages: u32) -> Self {
        Self::pages(pages)
    }
}

fn default_timestamp_scale() -> Decimal {
    Decimal::ONE
}

fn default_timezone() -> String {
    "UTC".to_owned()
}

/// An HTTP API whose responses are navigated with JSONPath expressions.
///
/// Omitted optional settings take their defaults when decoded: no authentication,
/// ISO 8601 dates, at most 10 pages, a timestamp scale of 1 and the UTC timezone.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct JsonPathApiSpec {
    pub standard: ApiStandard,
    pub spec_variant: SpecVariant,
    pub url: String,
    pub date_path: String,
    pub value_path: String,
    #[serde(default)]
    #[builder(default)]
    pub auth_param_location: AuthParamLocation,
    #[serde(default)]
    pub auth_param_name: Option<String>,
    #[serde(default)]
    pub auth_param_prefix: Option<String>,
    #[serde(default)]
    pub continuation_token_param: Option<String>,
    #[serde(default)]
    pub continuation_token_path: Option<String>,
    #[serde(default)]
    pub date_format_custom: Option<String>,
    #[serde(default)]
    #[builder(default)]
    pub date_format_type: DateFormatType,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    #[builder(default, into)]
    pub max_pages: PageLimit,
    #[serde_as(as = "CanonicalDecimal")]
    #[serde(default = "default_timestamp_scale")]
    #[builder(default = default_timestamp_scale())]
    pub timestamp_scale: Decimal,
    #[serde(default = "default_timezone")]
    #[builder(default = default_timezone())]
    pub timezone: String,
}

impl JsonPathApiSpec {
    pub fn validate(&self) -> Result<()> {
        require_url("url", &self.url)?;
        require_non_empty("date_path", &self.date_path)?;
        require_non_empty("value_path", &self.value_path)?;
        require_non_empty("timezone", &self.timezone)?;

        if self.auth_param_location != AuthParamLocation::None
            && self.auth_param_name.as_deref().is_none_or(str::is_empty)
        {
            return Err(Error::validation(format!(
                "auth_param_name is required when auth_param_location is {}",
                self.auth_param_location
            )));
        }
        if self.date_format_type == DateFormatType::Custom
            && self.date_format_custom.as_deref().is_none_or(str::is_empty)
        {
            return Err(Error::validation(
                "date_format_custom is required when date_format_type is custom",
            ));
        }
        if self.max_pages.get() == Some(0) {
            return Err(Error::validation("max_pages must be at least 1"));
        }
        if self.timestamp_scale < Decimal::ONE {
            return Err(Error::validation(format!(
                "timestamp_scale must be at least 1, got {}",
                self.timestamp_scale
            )));
        }
        Ok(())
    }
}

/// An API described only by its standard and variant.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(deny_unknown_fields)]
pub struct GenericApiSpec {
    pub standard: ApiStandard,
    pub spec_variant: SpecVariant,
}

/// Describes an external API that serves historical or settlement values.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiSpec {
    JsonPath(Box<JsonPathApiSpec>),
    Generic(GenericApiSpec),
}

impl ApiSpec {
    #[must_use]
    pub fn standard(&self) -> ApiStandard {
        match self {
            Self::JsonPath(inner) => inner.standard,
            Self::Generic(inner) => inner.standard,
        }
    }

    #[must_use]
    pub fn spec_variant(&self) -> SpecVariant {
        match self {
            Self::JsonPath(inner) => inner.spec_variant,
            Self::Generic(inner) => inner.spec_variant,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::JsonPath(inner) => inner.validate(),
            Self::Generic(_) => Ok(()),
        }
    }
}

impl From<JsonPathApiSpec> for ApiSpec {
    fn from(inner: JsonPathApiSpec) -> Self {
        Self::JsonPath(Box::new(inner))
    }
}

impl From<GenericApiSpec> for ApiSpec {
    fn from(inner: GenericApiSpec) -> Self {
        Self::Generic(inner)
    }
}
