#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Deeply nested uses in sub-modules are falsely flagged as being unused"
)]

use afp_client_sdk::ipfs::codec::{self, Block};
use afp_client_sdk::ipfs::dag::{self, ExtendedMetadataDag};
use afp_client_sdk::ipfs::types::{
    ApiStandard, BaseCase, BaseOracleConfig, BaseOutcomeSpace, EdgeCase, EventOutcomePoint,
    ExtendedMetadata, Frequency, JsonPathApiSpec, Observation, OracleFallback,
    Prototype1OracleConfig, SpecVariant, TimeSeriesOutcomePoint, TimeSeriesOutcomeSpace,
};
use afp_client_sdk::ipfs::{Client, MemoryBlockStore, SchemaRegistry};
use afp_client_sdk::types::{DateTime, NaiveDate, Utc, dec};
use chrono::TimeZone as _;

pub const API_KEY: &str = "test-api-key";
pub const IMPORT_PATH: &str = "/api/v0/dag/import";
pub const BLOCK_GET_PATH: &str = "/api/v0/block/get";

#[must_use]
pub fn fallback_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
}

#[must_use]
pub fn api_spec(variant: SpecVariant) -> JsonPathApiSpec {
    JsonPathApiSpec::builder()
        .standard(ApiStandard::JsonPath)
        .spec_variant(variant)
        .url("https://api.example.com/cpi")
        .date_path("$.observations[*].date")
        .value_path("$.observations[*].value")
        .build()
}

/// Extended metadata of a monthly CPI product using the time series and prototype kinds.
#[must_use]
pub fn time_series_metadata() -> ExtendedMetadata {
    ExtendedMetadata::builder()
        .outcome_space(
            TimeSeriesOutcomeSpace::builder()
                .fsp_type("scalar")
                .description("US CPI year-over-year change")
                .base_case(
                    BaseCase::builder()
                        .condition("the value is published")
                        .fsp_resolution("the published value")
                        .build(),
                )
                .edge_cases(vec![
                    EdgeCase::builder()
                        .condition("the value is revised")
                        .fsp_resolution("the first published value")
                        .build(),
                ])
                .units("percent")
                .source_name("Bureau of Labor Statistics")
                .source_uri("https://www.bls.gov/cpi/")
                .frequency(Frequency::Monthly)
                .history_api_spec(api_spec(SpecVariant::UnderlyingHistory))
                .build(),
        )
        .outcome_point(
            TimeSeriesOutcomePoint::builder()
                .fsp_type("scalar")
                .observation(
                    Observation::builder()
                        .reference_date(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
                        .release_date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
                        .build(),
                )
                .build(),
        )
        .oracle_config(
            Prototype1OracleConfig::builder()
                .description("CPI oracle")
                .project_url("https://example.com/oracle")
                .evaluation_api_spec(api_spec(SpecVariant::ProductFsv))
                .build(),
        )
        .oracle_fallback(
            OracleFallback::builder()
                .fallback_time(fallback_time())
                .fallback_fsp(dec!(2.5))
                .build(),
        )
        .build()
}

/// Extended metadata of a binary event product using the base kinds.
#[must_use]
pub fn event_metadata() -> ExtendedMetadata {
    ExtendedMetadata::builder()
        .outcome_space(
            BaseOutcomeSpace::builder()
                .fsp_type("binary")
                .description("Will it rain in Berlin on 2025-06-01?")
                .base_case(
                    BaseCase::builder()
                        .condition("rain is recorded")
                        .fsp_resolution("1")
                        .build(),
                )
                .build(),
        )
        .outcome_point(
            EventOutcomePoint::builder()
                .fsp_type("binary")
                .outcome("rain")
                .build(),
        )
        .oracle_config(
            BaseOracleConfig::builder()
                .description("Weather oracle")
                .build(),
        )
        .oracle_fallback(
            OracleFallback::builder()
                .fallback_time(fallback_time())
                .fallback_fsp(dec!(0))
                .build(),
        )
        .build()
}

/// Root block first, then the four components.
#[must_use]
pub fn assemble(metadata: &ExtendedMetadata) -> Vec<Block> {
    dag::assemble(metadata, &SchemaRegistry::new().unwrap()).unwrap()
}

#[must_use]
pub fn decode_root(root: &Block) -> ExtendedMetadataDag {
    codec::decode(&root.cid, &root.data).unwrap()
}

pub fn memory_client() -> anyhow::Result<Client<MemoryBlockStore>> {
    Ok(Client::with_store(MemoryBlockStore::new())?)
}

#[must_use]
pub fn import_response(cid: &str) -> String {
    format!("{{\"Root\":{{\"Cid\":{{\"/\":\"{cid}\"}},\"PinErrorMsg\":\"\"}}}}\n")
}
