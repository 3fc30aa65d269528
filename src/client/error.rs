//! Error type for the Twitter client

use super::Format;
use crate::config::ConfigError;
use reqwest::StatusCode;
use serde::Deserialize;
use std::{borrow::Cow, fmt, io};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Io error")]
    Io(#[from] io::Error),

    #[error("reqwest error")]
    Reqwest(#[from] reqwest::Error),

    #[error("json error")]
    Json(#[from] serde_json::Error),

    #[error("config error")]
    Config(#[from] ConfigError),

    #[error("`{0}`")]
    Message(Cow<'static, str>),

    #[error("Unknown data format '{0}'")]
    UnknownFormat(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("{0}")]
    Http(Box<TwitterHttpError>),
}

impl Error {
    /// Returns the HTTP error if this error was caused by Twitter answering with a non-2xx
    /// status.
    pub fn http(&self) -> Option<&TwitterHttpError> {
        match self {
            Error::Http(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<&'static str> for Error {
    fn from(error: &'static str) -> Self {
        Error::Message(error.into())
    }
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Message(error.into())
    }
}

impl From<TwitterHttpError> for Error {
    fn from(error: TwitterHttpError) -> Self {
        Error::Http(Box::new(error))
    }
}

/// Raised when Twitter answers a request with a non-success status.
///
/// Carries everything needed to reproduce the failing call: the path that was requested, the
/// data format, the parameters that were sent and the raw body of the response.
#[derive(Debug)]
pub struct TwitterHttpError {
    status: StatusCode,
    uri: String,
    format: Format,
    params: Vec<(String, String)>,
    response_data: Vec<u8>,
}

impl TwitterHttpError {
    pub(crate) fn new(
        status: StatusCode,
        uri: String,
        format: Format,
        params: Vec<(String, String)>,
        response_data: Vec<u8>,
    ) -> Self {
        Self {
            status,
            uri,
            format,
            params,
            response_data,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Raw body of the error response
    pub fn response_data(&self) -> &[u8] {
        &self.response_data
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// Decode the `{"errors": [...]}` payload Twitter attaches to most failures.
    ///
    /// Returns an empty list when the body is not in that shape (XML responses, proxies
    /// answering with html, etc.).
    pub fn api_errors(&self) -> Vec<TwitterApiError> {
        serde_json::from_slice::<TwitterErrorResponse>(&self.response_data)
            .map(|r| r.errors)
            .unwrap_or_default()
    }
}

impl fmt::Display for TwitterHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dot = if self.format.extension().is_empty() {
            ""
        } else {
            "."
        };

        write!(
            f,
            "Twitter sent status {} for URL: {}{}{} using parameters: ({:?})\ndetails: {}",
            self.status.as_u16(),
            self.uri,
            dot,
            self.format.extension(),
            self.params,
            String::from_utf8_lossy(&self.response_data),
        )
    }
}

impl std::error::Error for TwitterHttpError {}

// Twitter Error Responses
// https://developer.twitter.com/en/support/twitter-api/error-troubleshooting
#[derive(Debug, Deserialize)]
struct TwitterErrorResponse {
    #[serde(default)]
    errors: Vec<TwitterApiError>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TwitterApiError {
    pub code: Option<i64>,
    pub message: String,
}
