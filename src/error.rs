use std::backtrace::Backtrace;
use std::collections::TryReserveError;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use cid::Cid;
/// HTTP method type, re-exported for use with error inspection.
pub use reqwest::Method;
/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;
use reqwest::header;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Network failure, timeout or non-successful HTTP call against the block store
    Transport,
    /// The block store answered with a body that does not have the expected shape
    TransportFormat,
    /// A block's content codec (or hash function) is not one this client can decode
    UnsupportedCodec,
    /// A component link declares a schema CID that is not in the schema registry
    UnknownSchema,
    /// Decoded bytes do not satisfy the structural constraints of the resolved document type
    Validation,
    /// A locally computed CID disagrees with a CID reported or requested remotely
    Integrity,
    /// Invalid client or registry configuration
    Configuration,
    /// Internal error from dependencies
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    /// Whether this is a [`Kind::Transport`] error caused by the request timing out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.downcast_ref::<Timeout>().is_some()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Configuration {
            reason: message.into(),
        }
        .into()
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            message: message.into(),
        }
        .into()
    }

    #[must_use]
    pub fn timeout(method: Method, path: String, after: Option<Duration>) -> Self {
        Timeout {
            method,
            path,
            after,
        }
        .into()
    }

    pub fn unexpected_response<S: Into<String>>(message: S) -> Self {
        UnexpectedResponse {
            message: message.into(),
        }
        .into()
    }

    #[must_use]
    pub fn unsupported_codec(cid: Cid, code: u64) -> Self {
        UnsupportedCodec { cid, code }.into()
    }

    #[must_use]
    pub fn unknown_schema(schema: Cid) -> Self {
        UnknownSchema { schema }.into()
    }

    #[must_use]
    pub fn cid_mismatch(expected: Cid, actual: Cid) -> Self {
        CidMismatch { expected, actual }.into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

impl StdError for Status {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Timeout {
    pub method: Method,
    pub path: String,
    /// The request timeout that elapsed, when one was set on the request
    pub after: Option<Duration>,
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.after {
            Some(after) => write!(
                f,
                "{} call to {} timed out after {}ms",
                self.method,
                self.path,
                after.as_millis()
            ),
            None => write!(f, "{} call to {} timed out", self.method, self.path),
        }
    }
}

impl StdError for Timeout {}

#[non_exhaustive]
#[derive(Debug)]
pub struct UnexpectedResponse {
    pub message: String,
}

impl fmt::Display for UnexpectedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected block store response: {}", self.message)
    }
}

impl StdError for UnexpectedResponse {}

#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedCodec {
    pub cid: Cid,
    /// The multicodec (or multihash) code that could not be handled
    pub code: u64,
}

impl fmt::Display for UnsupportedCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported codec 0x{:x} in {}", self.code, self.cid)
    }
}

impl StdError for UnsupportedCodec {}

#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct UnknownSchema {
    pub schema: Cid,
}

impl fmt::Display for UnknownSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported schema CID {}", self.schema)
    }
}

impl StdError for UnknownSchema {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct CidMismatch {
    /// The CID computed locally from the content
    pub expected: Cid,
    /// The CID reported by, or requested from, the block store
    pub actual: Cid,
}

impl fmt::Display for CidMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mismatch between computed CID {} and remote CID {}",
            self.expected, self.actual
        )
    }
}

impl StdError for CidMismatch {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Configuration {
    pub reason: String,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "misconfigured: {}", self.reason)
    }
}

impl StdError for Configuration {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Error::with_source(Kind::Internal, e)
        } else {
            Error::with_source(Kind::Transport, e)
        }
    }
}

impl From<header::InvalidHeaderValue> for Error {
    fn from(e: header::InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Configuration, e)
    }
}

/// JSON is only ever read from block store responses, so a JSON failure is a format error.
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::TransportFormat, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Configuration, e)
    }
}

impl From<serde_ipld_dagcbor::EncodeError<TryReserveError>> for Error {
    fn from(e: serde_ipld_dagcbor::EncodeError<TryReserveError>) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<ipld_core::serde::SerdeError> for Error {
    fn from(e: ipld_core::serde::SerdeError) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Configuration> for Error {
    fn from(err: Configuration) -> Self {
        Error::with_source(Kind::Configuration, err)
    }
}

impl From<Status> for Error {
    fn from(err: Status) -> Self {
        Error::with_source(Kind::Transport, err)
    }
}

impl From<Timeout> for Error {
    fn from(err: Timeout) -> Self {
        Error::with_source(Kind::Transport, err)
    }
}

impl From<UnexpectedResponse> for Error {
    fn from(err: UnexpectedResponse) -> Self {
        Error::with_source(Kind::TransportFormat, err)
    }
}

impl From<UnsupportedCodec> for Error {
    fn from(err: UnsupportedCodec) -> Self {
        Error::with_source(Kind::UnsupportedCodec, err)
    }
}

impl From<UnknownSchema> for Error {
    fn from(err: UnknownSchema) -> Self {
        Error::with_source(Kind::UnknownSchema, err)
    }
}

impl From<CidMismatch> for Error {
    fn from(err: CidMismatch) -> Self {
        Error::with_source(Kind::Integrity, err)
    }
}
