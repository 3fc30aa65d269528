//! Request authorization.
//!
//! Every request the client sends is passed through an [`Auth`] implementation which may add an
//! `Authorization` header. User-context calls are signed with [`OAuth`], app-only calls can use a
//! [`Bearer`] token, and [`NoAuth`] sends requests anonymously.

mod oauth;
mod token_file;

pub use oauth::OAuth;
pub use token_file::{read_token_file, write_token_file};

use crate::client::Result;
use reqwest::Method;
use std::fmt;
use url::Url;

pub trait Auth: fmt::Debug + Send + Sync {
    /// Compute the `Authorization` header value for a request, if any.
    ///
    /// `url` is the request url without its query string and `params` holds every query and
    /// form-encoded body parameter that will be sent. Json bodies are not part of `params`.
    fn authorization(
        &self,
        method: &Method,
        url: &Url,
        params: &[(String, String)],
    ) -> Result<Option<String>>;
}

/// Sends requests without any credentials
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuth;

impl Auth for NoAuth {
    fn authorization(
        &self,
        _method: &Method,
        _url: &Url,
        _params: &[(String, String)],
    ) -> Result<Option<String>> {
        Ok(None)
    }
}

/// OAuth2 app-only authentication with a bearer token
#[derive(Clone)]
pub struct Bearer {
    token: String,
}

impl Bearer {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for Bearer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bearer").finish()
    }
}

impl Auth for Bearer {
    fn authorization(
        &self,
        _method: &Method,
        _url: &Url,
        _params: &[(String, String)],
    ) -> Result<Option<String>> {
        Ok(Some(format!("Bearer {}", self.token)))
    }
}
