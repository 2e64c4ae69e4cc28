use std::time::Duration;

use bon::Builder;
use cid::Cid;
use secrecy::SecretString;

use super::car::Archive;
use super::codec;
use super::dag::{self, ExtendedMetadataDag, ResolvedLink};
use super::registry::SchemaRegistry;
use super::store::{BlockStore, HttpBlockStore};
use super::types::{Document, ExtendedMetadata};
use crate::Result;
use crate::error::Error;

/// Environment variable holding the block store API URL
pub const IPFS_API_URL_VAR: &str = "AFP_IPFS_API_URL";
/// Environment variable holding the block store API key
pub const IPFS_API_KEY_VAR: &str = "AFP_IPFS_API_KEY";
/// API URL used by [`Client::from_env`] when [`IPFS_API_URL_VAR`] is unset
pub const DEFAULT_IPFS_API_URL: &str = "http://localhost:5001";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`HttpBlockStore`]
#[derive(Clone, Debug, Builder)]
pub struct Config {
    /// Timeout of every request. The default is thirty (30) seconds.
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,
    /// Sent as a bearer token when present.
    #[builder(into)]
    api_key: Option<SecretString>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }
}

/// Uploads and downloads extended metadata.
///
/// Uploads are checked by comparing the root CID the store reports with the locally
/// computed one. Downloads check every block they fetch against the CID it was requested
/// by, after decoding and validating it.
///
/// # Example
///
/// ```no_run
/// use afp_client_sdk::ipfs::Client;
/// use afp_client_sdk::types::Cid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::from_env()?;
///
/// let cid: Cid = "bafyreicgr6dfo5yduixjkcifghiulskfegwojvuwodtouvivl362zndhxe".parse()?;
/// let metadata = client.download_extended_metadata(&cid).await?;
/// println!("{}", metadata.outcome_space.description());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client<S = HttpBlockStore> {
    store: S,
    registry: SchemaRegistry,
}

impl Client<HttpBlockStore> {
    /// Creates a client for the HTTP API at `host`.
    pub fn new(host: &str, config: &Config) -> Result<Self> {
        Self::with_store(HttpBlockStore::new(host, config)?)
    }

    /// Creates a client from [`IPFS_API_URL_VAR`] and [`IPFS_API_KEY_VAR`].
    pub fn from_env() -> Result<Self> {
        let host =
            std::env::var(IPFS_API_URL_VAR).unwrap_or_else(|_| DEFAULT_IPFS_API_URL.to_owned());
        let api_key = std::env::var(IPFS_API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty());

        let config = Config::builder().maybe_api_key(api_key).build();
        Self::new(&host, &config)
    }
}

impl<S: BlockStore> Client<S> {
    /// Creates a client over `store` with the registry of every pinned document kind.
    pub fn with_store(store: S) -> Result<Self> {
        Ok(Self {
            store,
            registry: SchemaRegistry::new()?,
        })
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validates `metadata`, uploads it as a single archive and returns its root CID.
    ///
    /// Fails with [`Kind::Integrity`](crate::error::Kind::Integrity) when the store reports
    /// a root other than the one computed locally.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub async fn upload_extended_metadata(&self, metadata: &ExtendedMetadata) -> Result<Cid> {
        metadata.validate()?;

        let archive = Archive::new(dag::assemble(metadata, &self.registry)?)?;
        let expected = archive
            .root()
            .copied()
            .ok_or_else(|| Error::validation("assembled archive has no root"))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            root = %expected,
            blocks = archive.blocks().len(),
            "uploading extended metadata"
        );

        let actual = self.store.import(&archive).await?;
        if actual != expected {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                expected = %expected,
                actual = %actual,
                "block store reported another root"
            );

            return Err(Error::cid_mismatch(expected, actual));
        }

        Ok(actual)
    }

    /// Fetches, decodes and validates the extended metadata rooted at `cid`.
    ///
    /// Every schema is resolved before any component is fetched, so an unknown schema
    /// fails after a single request. Components are fetched concurrently.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(cid = %cid))
    )]
    pub async fn download_extended_metadata(&self, cid: &Cid) -> Result<ExtendedMetadata> {
        codec::ensure_supported(cid)?;

        let data = self.store.get_block(cid).await?;
        let root: ExtendedMetadataDag = codec::decode(cid, &data)?;
        codec::verify(cid, &data)?;

        let links = root.resolve(&self.registry)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            outcome_space = %links.outcome_space.kind,
            outcome_point = %links.outcome_point.kind,
            oracle_config = %links.oracle_config.kind,
            "resolved component schemas"
        );

        let (outcome_space, outcome_point, oracle_config, oracle_fallback) = futures::try_join!(
            self.fetch(links.outcome_space),
            self.fetch(links.outcome_point),
            self.fetch(links.oracle_config),
            self.fetch(links.oracle_fallback),
        )?;

        Ok(ExtendedMetadata {
            outcome_space: outcome_space.try_into()?,
            outcome_point: outcome_point.try_into()?,
            oracle_config: oracle_config.try_into()?,
            oracle_fallback: oracle_fallback.try_into()?,
        })
    }

    async fn fetch(&self, link: ResolvedLink) -> Result<Document> {
        let data = self.store.get_block(&link.data).await?;
        let document = link.kind.decode(&link.data, &data)?;
        codec::verify(&link.data, &data)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_should_default_to_thirty_seconds() {
        let config = Config::default();

        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.api_key().is_none());
    }

    #[test]
    fn config_should_not_print_api_key() {
        let config = Config::builder()
            .api_key("super-secret".to_owned())
            .timeout(Duration::from_secs(5))
            .build();

        let debug = format!("{config:?}");

        assert!(!debug.contains("super-secret"), "API key leaked: {debug}");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
