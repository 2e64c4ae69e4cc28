//! Uploads a sample product's extended metadata and downloads it again.
//!
//! Without `AFP_IPFS_API_URL` the round trip runs against an in-memory block store.
//! Point it at a Kubo RPC API to pin the blocks for real:
//! ```sh
//! RUST_LOG=debug,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example extended_metadata --features tracing
//! ```
//!
//! ```sh
//! AFP_IPFS_API_URL=http://localhost:5001 RUST_LOG=debug cargo run --example extended_metadata --features tracing
//! ```

use afp_client_sdk::ipfs::types::{
    ApiStandard, BaseCase, EdgeCase, ExtendedMetadata, Frequency, JsonPathApiSpec, Observation,
    OracleFallback, Prototype1OracleConfig, SpecVariant, TimeSeriesOutcomePoint,
    TimeSeriesOutcomeSpace,
};
use afp_client_sdk::ipfs::{BlockStore, Client, IPFS_API_URL_VAR, MemoryBlockStore};
use afp_client_sdk::types::{DateTime, NaiveDate, Utc, dec};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let metadata = metadata()?;

    if std::env::var(IPFS_API_URL_VAR).is_ok() {
        run(&Client::from_env()?, &metadata).await
    } else {
        info!("{IPFS_API_URL_VAR} is unset, using an in-memory block store");
        run(&Client::with_store(MemoryBlockStore::new())?, &metadata).await
    }
}

async fn run<S: BlockStore>(client: &Client<S>, metadata: &ExtendedMetadata) -> anyhow::Result<()> {
    let cid = client.upload_extended_metadata(metadata).await?;
    info!(%cid, "uploaded extended metadata");

    let downloaded = client.download_extended_metadata(&cid).await?;
    info!(
        outcome_space = %downloaded.outcome_space.kind(),
        outcome_point = %downloaded.outcome_point.kind(),
        oracle_config = %downloaded.oracle_config.kind(),
        fallback_fsp = %downloaded.oracle_fallback.fallback_fsp,
        "downloaded extended metadata"
    );

    if downloaded != *metadata {
        warn!("downloaded metadata differs from the uploaded one");
    }

    Ok(())
}

fn api_spec(variant: SpecVariant) -> JsonPathApiSpec {
    JsonPathApiSpec::builder()
        .standard(ApiStandard::JsonPath)
        .spec_variant(variant)
        .url("https://api.stlouisfed.org/fred/series/observations")
        .date_path("$.observations[*].date")
        .value_path("$.observations[*].value")
        .build()
}

fn metadata() -> anyhow::Result<ExtendedMetadata> {
    let reference_date =
        NaiveDate::from_ymd_opt(2025, 9, 1).ok_or_else(|| anyhow::anyhow!("invalid date"))?;
    let fallback_time = DateTime::<Utc>::from_timestamp(1_762_000_000, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid timestamp"))?;

    Ok(ExtendedMetadata::builder()
        .outcome_space(
            TimeSeriesOutcomeSpace::builder()
                .fsp_type("scalar")
                .description("US CPI year-over-year change for September 2025")
                .base_case(
                    BaseCase::builder()
                        .condition("the September 2025 value is published")
                        .fsp_resolution("the published value in percent")
                        .build(),
                )
                .edge_cases(vec![
                    EdgeCase::builder()
                        .condition("the value is not published before the fallback time")
                        .fsp_resolution("the fallback settlement price")
                        .build(),
                ])
                .units("percent")
                .source_name("FRED")
                .source_uri("https://fred.stlouisfed.org/series/CPIAUCSL")
                .frequency(Frequency::Monthly)
                .history_api_spec(api_spec(SpecVariant::UnderlyingHistory))
                .build(),
        )
        .outcome_point(
            TimeSeriesOutcomePoint::builder()
                .fsp_type("scalar")
                .observation(Observation::builder().reference_date(reference_date).build())
                .build(),
        )
        .oracle_config(
            Prototype1OracleConfig::builder()
                .description("Reads the published CPI value from FRED")
                .evaluation_api_spec(api_spec(SpecVariant::ProductFsv))
                .build(),
        )
        .oracle_fallback(
            OracleFallback::builder()
                .fallback_time(fallback_time)
                .fallback_fsp(dec!(3.0))
                .build(),
        )
        .build())
}
