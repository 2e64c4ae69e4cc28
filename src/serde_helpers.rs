//! Serde helpers for canonical document encoding and for reading block store responses.
//!
//! Documents are content-addressed, so every value has to serialize to exactly one
//! representation. Decimals and timestamps are therefore rendered as stable strings
//! through the `serde_as` adapters below instead of their default serde forms.
//!
//! When the `tracing` feature is enabled, JSON responses are also checked for unknown
//! fields, which are logged to help detect block store API changes.

use std::fmt;
use std::str::FromStr as _;

use chrono::{DateTime, Datelike as _, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::de::{self, DeserializeOwned};
use serde::ser;
use serde::{Deserialize as _, Deserializer, Serializer};
use serde_json::Value;

/// A `serde_as` type that renders a [`Decimal`] as its normalized string, so that
/// `1.50` and `1.5` encode to the same bytes.
///
/// Integers and floats are also accepted on deserialization, as written by producers that
/// store these fields as plain numbers. They are re-encoded as strings.
///
/// Use with `#[serde_as(as = "CanonicalDecimal")]`.
pub struct CanonicalDecimal;

impl serde_with::SerializeAs<Decimal> for CanonicalDecimal {
    fn serialize_as<S>(source: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&source.normalize())
    }
}

impl<'de> serde_with::DeserializeAs<'de, Decimal> for CanonicalDecimal {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

struct DecimalVisitor;

impl de::Visitor<'_> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a decimal string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Decimal, E> {
        Decimal::from_str(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<Decimal, E> {
        Decimal::try_from_i128_with_scale(v, 0).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Decimal, E> {
        Decimal::try_from(v).map_err(E::custom)
    }
}

/// A `serde_as` type that renders a UTC timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Timestamps with a fractional second or outside the years 0000 to 9999 have no such
/// form and fail to serialize. Any RFC 3339 timestamp is accepted on deserialization and
/// converted to UTC.
pub struct IsoDateTime;

impl serde_with::SerializeAs<DateTime<Utc>> for IsoDateTime {
    fn serialize_as<S>(
        source: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if !(0..=9999).contains(&source.year()) || source.timestamp_subsec_nanos() != 0 {
            return Err(ser::Error::custom(format!(
                "{source} has no YYYY-MM-DDTHH:MM:SSZ form"
            )));
        }
        serializer.serialize_str(&source.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl<'de> serde_with::DeserializeAs<'de, DateTime<Utc>> for IsoDateTime {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

/// Deserialize a JSON response, logging any fields the target type does not capture.
///
/// Unknown fields never fail deserialization; they are reported with `tracing::warn!`
/// together with the name of the target type.
#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    use std::any::type_name;

    tracing::trace!(type_name = %type_name::<T>(), json = %value, "deserializing JSON");

    let mut unknown_paths: Vec<String> = Vec::new();
    let raw = value.to_string();

    let result: T = serde_ignored::deserialize(value, |path| {
        unknown_paths.push(path.to_string());
    })
    .inspect_err(|_| {
        let jd = &mut serde_json::Deserializer::from_str(&raw);
        if let Err(path_err) = serde_path_to_error::deserialize::<_, T>(jd) {
            tracing::error!(
                type_name = %type_name::<T>(),
                path = %path_err.path(),
                error = %path_err.inner(),
                "deserialization failed"
            );
        }
    })?;

    for path in unknown_paths {
        tracing::warn!(
            type_name = %type_name::<T>(),
            field = %path,
            "unknown field in block store response"
        );
    }

    Ok(result)
}

/// Pass-through deserialization when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    Ok(serde_json::from_value(value)?)
}
