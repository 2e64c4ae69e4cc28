#![allow(
    clippy::unwrap_used,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]

//! End-to-end tests of the extended metadata pipeline against an in-memory block store.

pub mod common;

mod round_trip {
    use afp_client_sdk::error::Kind;
    use afp_client_sdk::ipfs::codec::{DAG_CBOR, SHA2_256};
    use afp_client_sdk::ipfs::types::{OracleConfig, OutcomePoint, OutcomeSpace};
    use afp_client_sdk::types::Utc;
    use chrono::{Duration, TimeZone as _};

    use crate::common::{event_metadata, memory_client, time_series_metadata};

    #[tokio::test]
    async fn time_series_metadata_should_round_trip() -> anyhow::Result<()> {
        let client = memory_client()?;
        let metadata = time_series_metadata();

        let cid = client.upload_extended_metadata(&metadata).await?;
        let downloaded = client.download_extended_metadata(&cid).await?;

        assert_eq!(downloaded, metadata);
        assert!(matches!(downloaded.outcome_space, OutcomeSpace::TimeSeries(_)));
        assert!(matches!(downloaded.outcome_point, OutcomePoint::TimeSeries(_)));
        assert!(matches!(downloaded.oracle_config, OracleConfig::Prototype1(_)));
        assert_eq!(client.store().len(), 5);

        Ok(())
    }

    #[tokio::test]
    async fn event_metadata_should_round_trip() -> anyhow::Result<()> {
        let client = memory_client()?;
        let metadata = event_metadata();

        let cid = client.upload_extended_metadata(&metadata).await?;
        let downloaded = client.download_extended_metadata(&cid).await?;

        assert_eq!(downloaded, metadata);
        assert_eq!(downloaded.oracle_config.description(), "Weather oracle");

        Ok(())
    }

    #[tokio::test]
    async fn upload_should_be_deterministic() -> anyhow::Result<()> {
        let first = memory_client()?
            .upload_extended_metadata(&time_series_metadata())
            .await?;
        let second = memory_client()?
            .upload_extended_metadata(&time_series_metadata())
            .await?;

        assert_eq!(first, second);
        assert_eq!(first.codec(), DAG_CBOR);
        assert_eq!(first.hash().code(), SHA2_256);
        assert!(first.to_string().starts_with("bafyrei"), "unexpected CID {first}");

        Ok(())
    }

    #[tokio::test]
    async fn different_metadata_should_have_different_roots() -> anyhow::Result<()> {
        let client = memory_client()?;

        let first = client.upload_extended_metadata(&time_series_metadata()).await?;
        let second = client.upload_extended_metadata(&event_metadata()).await?;

        assert_ne!(first, second);

        Ok(())
    }

    #[tokio::test]
    async fn last_representable_fallback_time_should_round_trip() -> anyhow::Result<()> {
        let client = memory_client()?;
        let mut metadata = event_metadata();
        metadata.oracle_fallback.fallback_time = Utc
            .with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
            .single()
            .unwrap();

        let cid = client.upload_extended_metadata(&metadata).await?;
        let downloaded = client.download_extended_metadata(&cid).await?;

        assert_eq!(downloaded, metadata);

        Ok(())
    }

    #[tokio::test]
    async fn unrepresentable_fallback_time_should_not_upload() -> anyhow::Result<()> {
        let client = memory_client()?;
        let mut far_future = event_metadata();
        far_future.oracle_fallback.fallback_time = Utc
            .with_ymd_and_hms(10000, 1, 1, 0, 0, 0)
            .single()
            .unwrap();
        let mut fractional = event_metadata();
        fractional.oracle_fallback.fallback_time += Duration::milliseconds(250);

        for metadata in [far_future, fractional] {
            let err = client.upload_extended_metadata(&metadata).await.unwrap_err();

            assert_eq!(err.kind(), Kind::Validation);
        }
        assert!(client.store().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn download_should_fetch_each_block_once() -> anyhow::Result<()> {
        let client = memory_client()?;
        let cid = client.upload_extended_metadata(&time_series_metadata()).await?;

        client.download_extended_metadata(&cid).await?;

        assert_eq!(client.store().fetch_count(&cid), 1);
        let blocks = crate::common::assemble(&time_series_metadata());
        for block in &blocks[1..] {
            assert_eq!(client.store().fetch_count(&block.cid), 1);
        }

        Ok(())
    }
}

mod tampering {
    use afp_client_sdk::error::Kind;
    use afp_client_sdk::ipfs::codec::{self, DAG_JSON};
    use afp_client_sdk::ipfs::dag::ComponentLink;
    use afp_client_sdk::ipfs::types::EventOutcomePoint;

    use crate::common::{assemble, decode_root, event_metadata, memory_client, time_series_metadata};

    #[tokio::test]
    async fn foreign_document_should_fail_validation() -> anyhow::Result<()> {
        let client = memory_client()?;
        let metadata = time_series_metadata();
        let blocks = assemble(&metadata);
        let cid = client.upload_extended_metadata(&metadata).await?;

        // outcome space CID now serves the oracle config document
        client.store().insert(blocks[1].cid, blocks[3].data.clone());

        let err = client.download_extended_metadata(&cid).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Validation);

        Ok(())
    }

    #[tokio::test]
    async fn altered_document_should_fail_integrity() -> anyhow::Result<()> {
        let client = memory_client()?;
        let metadata = event_metadata();
        let blocks = assemble(&metadata);
        let cid = client.upload_extended_metadata(&metadata).await?;

        let forged = codec::encode(
            &EventOutcomePoint::builder()
                .fsp_type("binary")
                .outcome("sunshine")
                .build(),
        )?;
        client.store().insert(blocks[2].cid, forged.data);

        let err = client.download_extended_metadata(&cid).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Integrity);

        Ok(())
    }

    #[tokio::test]
    async fn altered_root_should_fail_integrity() -> anyhow::Result<()> {
        let client = memory_client()?;
        let metadata = event_metadata();
        let cid = client.upload_extended_metadata(&metadata).await?;

        let other = assemble(&time_series_metadata());
        client.store().insert(cid, other[0].data.clone());

        let err = client.download_extended_metadata(&cid).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Integrity);

        Ok(())
    }

    #[tokio::test]
    async fn swapped_links_should_fail_validation() -> anyhow::Result<()> {
        let client = memory_client()?;
        let blocks = assemble(&time_series_metadata());
        for block in &blocks {
            client.store().insert(block.cid, block.data.clone());
        }

        let mut dag = decode_root(&blocks[0]);
        std::mem::swap(&mut dag.outcome_point, &mut dag.oracle_fallback);
        let root = codec::encode(&dag)?;
        client.store().insert(root.cid, root.data);

        let err = client.download_extended_metadata(&root.cid).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Validation);
        for block in &blocks[1..] {
            assert_eq!(client.store().fetch_count(&block.cid), 0);
        }

        Ok(())
    }

    #[tokio::test]
    async fn unknown_schema_should_not_fetch_components() -> anyhow::Result<()> {
        let client = memory_client()?;
        let blocks = assemble(&event_metadata());
        for block in &blocks {
            client.store().insert(block.cid, block.data.clone());
        }

        let unknown = codec::encode(&"unpinned schema")?.cid;
        let mut dag = decode_root(&blocks[0]);
        dag.outcome_space = ComponentLink::new(dag.outcome_space.data, unknown);
        let root = codec::encode(&dag)?;
        client.store().insert(root.cid, root.data);

        let err = client.download_extended_metadata(&root.cid).await.unwrap_err();

        assert_eq!(err.kind(), Kind::UnknownSchema);
        for block in &blocks[1..] {
            assert_eq!(client.store().fetch_count(&block.cid), 0);
        }

        Ok(())
    }

    #[tokio::test]
    async fn missing_component_should_be_transport_error() -> anyhow::Result<()> {
        let client = memory_client()?;
        let metadata = event_metadata();
        let blocks = assemble(&metadata);
        let cid = client.upload_extended_metadata(&metadata).await?;

        client.store().remove(&blocks[4].cid);

        let err = client.download_extended_metadata(&cid).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Transport);

        Ok(())
    }

    #[tokio::test]
    async fn dag_json_root_should_download() -> anyhow::Result<()> {
        let client = memory_client()?;
        let metadata = event_metadata();
        let blocks = assemble(&metadata);
        for block in &blocks[1..] {
            client.store().insert(block.cid, block.data.clone());
        }

        let data = serde_ipld_dagjson::to_vec(&decode_root(&blocks[0])).expect("encodable root");
        let cid = codec::cid_of(DAG_JSON, &data)?;
        client.store().insert(cid, data);

        let downloaded = client.download_extended_metadata(&cid).await?;

        assert_eq!(downloaded, metadata);

        Ok(())
    }
}
