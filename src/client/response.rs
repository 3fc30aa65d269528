use crate::client::{rate_limit::Rate, Result};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::ops::Deref;

/// Decoded body of a Twitter response
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Parsed json, used when the client is configured with `Format::Json`
    Json(serde_json::Value),
    /// Unparsed xml or text
    Text(String),
    /// Binary image payload, eg. when fetching a profile banner
    Image {
        content_type: String,
        bytes: Vec<u8>,
    },
    /// Any other payload that isn't valid utf-8
    Bytes(Vec<u8>),
}

impl Body {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&[u8]> {
        match self {
            Body::Image { bytes, .. } => Some(bytes),
            _ => None,
        }
    }

    /// Raw bytes of a non-utf-8 body or of an image
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes(bytes) | Body::Image { bytes, .. } => Some(bytes),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Response from a Twitter request.
///
/// Derefs to the decoded body so it can be used like the value itself, while still giving
/// access to the response headers and the rate limit fields Twitter attaches to every reply.
#[derive(Debug)]
pub struct Response<T = Body> {
    rate: Rate,
    headers: HeaderMap,
    body: T,
}

impl<T> Response<T> {
    pub(crate) fn new(headers: HeaderMap, body: T) -> Self {
        Self {
            rate: Rate::from_headers(&headers),
            headers,
            body,
        }
    }

    pub fn body(&self) -> &T {
        &self.body
    }

    pub fn into_body(self) -> T {
        self.body
    }

    /// Headers of the http response. Lookups are case-insensitive: `response.headers().get("h")`
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn rate(&self) -> &Rate {
        &self.rate
    }

    /// Remaining requests in the current rate-limit window
    pub fn rate_limit_remaining(&self) -> u64 {
        self.rate.remaining
    }

    /// The rate limit ceiling for that given request
    pub fn rate_limit_limit(&self) -> u64 {
        self.rate.limit
    }

    /// Time in UTC epoch seconds when the rate limit will reset
    pub fn rate_limit_reset(&self) -> i64 {
        self.rate.reset
    }

    pub fn into_parts(self) -> (Rate, HeaderMap, T) {
        (self.rate, self.headers, self.body)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Response<U> {
        Response {
            rate: self.rate,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

impl Response<Body> {
    /// Deserialize a json body into a typed value, keeping the headers around.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<Response<T>> {
        let (rate, headers, body) = self.into_parts();

        let value = body
            .into_json()
            .ok_or("response body is not json; was the client configured with Format::Json?")?;

        Ok(Response {
            rate,
            headers,
            body: serde_json::from_value(value)?,
        })
    }
}

impl<T> Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.body
    }
}
