use async_trait::async_trait;
use cid::Cid;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use secrecy::ExposeSecret as _;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::BlockStore;
use crate::Result;
use crate::error::Error;
use crate::ipfs::Config;
use crate::ipfs::car::{Archive, CAR_CONTENT_TYPE};
use crate::serde_helpers;

const IMPORT_PATH: &str = "api/v0/dag/import";
const BLOCK_GET_PATH: &str = "api/v0/block/get";
const ARCHIVE_FILE_NAME: &str = "extended-metadata.car";

#[derive(Debug, Deserialize)]
struct ImportResponse {
    #[serde(rename = "Root")]
    root: ImportedRoot,
}

#[derive(Debug, Deserialize)]
struct ImportedRoot {
    #[serde(rename = "Cid")]
    cid: Link,
    #[serde(rename = "PinErrorMsg", default)]
    pin_error_msg: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "/")]
    cid: String,
}

/// A block store reached through the Kubo-compatible HTTP RPC API.
///
/// # Example
///
/// ```no_run
/// use afp_client_sdk::ipfs::{Config, HttpBlockStore};
///
/// let store = HttpBlockStore::new("http://localhost:5001", &Config::default()).unwrap();
/// assert_eq!(store.host().as_str(), "http://localhost:5001/");
/// ```
#[derive(Clone, Debug)]
pub struct HttpBlockStore {
    host: Url,
    client: ReqwestClient,
    config: Config,
}

impl HttpBlockStore {
    /// Creates a store for the API at `host`.
    ///
    /// Every request carries `Authorization: Bearer <api_key>` when the config has a key.
    pub fn new(host: &str, config: &Config) -> Result<Self> {
        let mut host = Url::parse(host)?;
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("afp_client_sdk"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        if let Some(api_key) = config.api_key() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        Ok(Self {
            host,
            client,
            config: config.clone(),
        })
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }
}

#[async_trait]
impl BlockStore for HttpBlockStore {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(root = ?archive.root()))
    )]
    async fn import(&self, archive: &Archive) -> Result<Cid> {
        let part = Part::bytes(archive.to_bytes().await?)
            .file_name(ARCHIVE_FILE_NAME)
            .mime_str(CAR_CONTENT_TYPE)?;
        let request = self
            .client
            .request(Method::POST, self.host.join(IMPORT_PATH)?)
            .query(&[("pin-roots", "true")])
            .multipart(Form::new().part("file", part))
            .timeout(self.config.timeout())
            .build()?;
        let path = request.url().path().to_owned();

        let response = crate::execute(&self.client, request).await?;
        let status_code = response.status();
        let body = crate::read_body(response, &Method::POST, &path, Some(self.config.timeout()))
            .await?;

        parse_import_response(&body, status_code, &path)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(cid = %cid))
    )]
    async fn get_block(&self, cid: &Cid) -> Result<Vec<u8>> {
        let request = self
            .client
            .request(Method::POST, self.host.join(BLOCK_GET_PATH)?)
            .query(&[("arg", cid.to_string())])
            .timeout(self.config.timeout())
            .build()?;
        let path = request.url().path().to_owned();

        let response = crate::execute(&self.client, request).await?;
        crate::read_body(response, &Method::POST, &path, Some(self.config.timeout())).await
    }
}

/// Parses a `dag/import` response. Streaming servers send one JSON object per line;
/// the first non-empty line describes the imported root.
fn parse_import_response(body: &[u8], status_code: StatusCode, path: &str) -> Result<Cid> {
    let body = std::str::from_utf8(body)
        .map_err(|e| Error::unexpected_response(format!("dag import body is not UTF-8: {e}")))?;
    let line = body
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| Error::unexpected_response("empty dag import response"))?;

    let value: Value = serde_json::from_str(line)?;
    let response: ImportResponse = serde_helpers::deserialize_with_warnings(value)?;

    if !response.root.pin_error_msg.is_empty() {
        return Err(Error::status(
            status_code,
            Method::POST,
            path.to_owned(),
            format!("failed to pin root: {}", response.root.pin_error_msg),
        ));
    }

    Cid::try_from(response.root.cid.cid.as_str()).map_err(|e| {
        Error::unexpected_response(format!(
            "invalid root CID {:?} in dag import response: {e}",
            response.root.cid.cid
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    const ROOT: &str = "bafyreicgr6dfo5yduixjkcifghiulskfegwojvuwodtouvivl362zndhxe";
    const PATH: &str = "/api/v0/dag/import";

    #[test]
    fn parse_import_response_should_read_first_line() {
        let root = format!("{{\"Root\":{{\"Cid\":{{\"/\":\"{ROOT}\"}},\"PinErrorMsg\":\"\"}}}}");
        let body = format!("\n{root}\n{{\"Stats\":{{\"BlockCount\":5}}}}\n");

        let cid = parse_import_response(body.as_bytes(), StatusCode::OK, PATH)
            .expect("valid response");

        assert_eq!(cid.to_string(), ROOT);
    }

    #[test]
    fn pin_error_should_be_transport_error() {
        let body = format!(
            "{{\"Root\":{{\"Cid\":{{\"/\":\"{ROOT}\"}},\"PinErrorMsg\":\"pin failed\"}}}}"
        );

        let err = parse_import_response(body.as_bytes(), StatusCode::OK, PATH).unwrap_err();

        assert_eq!(err.kind(), Kind::Transport);
        assert!(err.to_string().contains("pin failed"), "unexpected message: {err}");
    }

    #[test]
    fn invalid_cid_should_be_format_error() {
        let body = r#"{"Root":{"Cid":{"/":"not-a-cid"},"PinErrorMsg":""}}"#;

        let err = parse_import_response(body.as_bytes(), StatusCode::OK, PATH).unwrap_err();

        assert_eq!(err.kind(), Kind::TransportFormat);
    }

    #[test]
    fn empty_body_should_be_format_error() {
        let err = parse_import_response(b"\n\n", StatusCode::OK, PATH).unwrap_err();

        assert_eq!(err.kind(), Kind::TransportFormat);
    }

    #[test]
    fn new_should_append_trailing_slash() {
        let store = HttpBlockStore::new("http://localhost:5001/ipfs", &Config::default())
            .expect("valid host");

        assert_eq!(store.host().as_str(), "http://localhost:5001/ipfs/");
        assert_eq!(
            store.host().join(IMPORT_PATH).expect("valid path").as_str(),
            "http://localhost:5001/ipfs/api/v0/dag/import"
        );
    }

    #[test]
    fn invalid_host_should_be_configuration_error() {
        let err = HttpBlockStore::new("not a url", &Config::default()).unwrap_err();

        assert_eq!(err.kind(), Kind::Configuration);
    }
}
