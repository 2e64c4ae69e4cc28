#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod error;
pub mod ipfs;
pub(crate) mod serde_helpers;
pub mod types;

use std::time::Duration;

use reqwest::{Method, Request, Response};

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Executes `request`, turning timeouts and non-successful statuses into errors.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
pub(crate) async fn execute(client: &reqwest::Client, request: Request) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();
    let timeout = request.timeout().copied();

    let response = client
        .execute(request)
        .await
        .map_err(|e| transport_error(e, &method, &path, timeout))?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    Ok(response)
}

/// Reads the whole body of a successful response.
pub(crate) async fn read_body(
    response: Response,
    method: &Method,
    path: &str,
    timeout: Option<Duration>,
) -> Result<Vec<u8>> {
    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(e, method, path, timeout))?;
    Ok(body.to_vec())
}

fn transport_error(
    e: reqwest::Error,
    method: &Method,
    path: &str,
    timeout: Option<Duration>,
) -> Error {
    if e.is_timeout() {
        #[cfg(feature = "tracing")]
        tracing::warn!(method = %method, path = %path, "API request timed out");

        Error::timeout(method.clone(), path.to_owned(), timeout)
    } else {
        e.into()
    }
}
