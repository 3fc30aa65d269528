use crate::auth::{Auth, NoAuth};
use log::debug;
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client as ReqwestClient, Proxy, StatusCode,
};
use std::time::Duration;

mod actions;
mod call;
mod error;
mod format;
mod media;
mod rate_limit;
mod response;


pub use actions::{is_post_action, POST_ACTIONS};
pub use call::{CallArgs, TwitterCall};
pub use error::{Error, Result, TwitterApiError, TwitterHttpError};
pub use format::Format;
pub use media::{Media, MediaClient};
pub use rate_limit::{Rate, RateLimitClient, RateLimitContext, RateLimitStatus};
pub use response::{Body, Response};

// Constants
const DEFAULT_DOMAIN: &str = "api.twitter.com";
const DEFAULT_API_VERSION: &str = "1.1";
const UPLOAD_DOMAIN: &str = "upload.twitter.com";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const HEADER_RATE_LIMIT: &str = "x-rate-limit-limit";
const HEADER_RATE_REMAINING: &str = "x-rate-limit-remaining";
const HEADER_RATE_RESET: &str = "x-rate-limit-reset";

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

#[derive(Debug)]
pub struct ClientBuilder {
    auth: Option<Box<dyn Auth>>,
    format: Format,
    domain: Option<String>,
    upload_domain: Option<String>,
    secure: bool,
    // `None` picks a version based on the domain, `Some(None)` disables the version prefix
    api_version: Option<Option<String>>,
    headers: Vec<(String, String)>,
    proxies: Vec<(String, String)>,
    default_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            auth: None,
            format: Format::default(),
            domain: None,
            upload_domain: None,
            secure: true,
            api_version: None,
            headers: Vec::new(),
            proxies: Vec::new(),
            default_timeout: None,
            user_agent: None,
        }
    }

    /// Credentials used to authorize every request. Requests are sent anonymously if unset.
    pub fn auth<A: Auth + 'static>(mut self, auth: A) -> Self {
        self.auth = Some(Box::new(auth));
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Domain to connect to, `api.twitter.com` by default
    pub fn domain<S: Into<String>>(mut self, domain: S) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Domain media is uploaded to, `upload.twitter.com` by default
    pub fn upload_domain<S: Into<String>>(mut self, upload_domain: S) -> Self {
        self.upload_domain = Some(upload_domain.into());
        self
    }

    /// Connect with plain HTTP instead of HTTPS when `false`
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Version prefixed to every path. Defaults to `1.1` for `api.twitter.com` and to no prefix
    /// for any other domain.
    pub fn api_version<S: Into<String>>(mut self, api_version: S) -> Self {
        self.api_version = Some(Some(api_version.into()));
        self
    }

    pub fn no_api_version(mut self) -> Self {
        self.api_version = Some(None);
        self
    }

    /// Extra header sent with every request
    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Route requests for `scheme` ("http" or "https") through `proxy_url`. Any other scheme
    /// proxies all traffic.
    pub fn proxy<K: Into<String>, V: Into<String>>(mut self, scheme: K, proxy_url: V) -> Self {
        self.proxies.push((scheme.into(), proxy_url.into()));
        self
    }

    /// Timeout applied to calls that don't set their own
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<Client> {
        let domain = self.domain.unwrap_or_else(|| DEFAULT_DOMAIN.to_owned());
        let upload_domain = self
            .upload_domain
            .unwrap_or_else(|| UPLOAD_DOMAIN.to_owned());
        let user_agent = self.user_agent.unwrap_or_else(|| USER_AGENT.to_owned());

        let api_version = match self.api_version {
            Some(api_version) => api_version,
            None if domain == DEFAULT_DOMAIN => Some(DEFAULT_API_VERSION.to_owned()),
            None => None,
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let mut client_builder = ReqwestClient::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .default_headers(headers);

        for (scheme, proxy_url) in &self.proxies {
            let proxy = match scheme.as_str() {
                "http" => Proxy::http(proxy_url.as_str())?,
                "https" => Proxy::https(proxy_url.as_str())?,
                _ => Proxy::all(proxy_url.as_str())?,
            };
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder.build()?;

        Ok(Client {
            auth: self.auth.unwrap_or_else(|| Box::new(NoAuth)),
            format: self.format,
            domain,
            upload_domain,
            secure: self.secure,
            api_version,
            default_timeout: self.default_timeout,
            client,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The minimalist Twitter API client.
///
/// Endpoints are not modeled individually. Instead a call is assembled from path segments and
/// invoked with arguments:
///
/// ```no_run
/// # async fn run() -> chirpy::Result<()> {
/// use chirpy::{CallArgs, Client, OAuth};
///
/// let twitter = Client::builder()
///     .auth(OAuth::new("token", "token_secret", "consumer_key", "consumer_secret"))
///     .build()?;
///
/// // GET https://api.twitter.com/1.1/statuses/home_timeline.json
/// let timeline = twitter.attr("statuses").attr("home_timeline").invoke(CallArgs::new()).await?;
///
/// // POST https://api.twitter.com/1.1/statuses/update.json
/// twitter
///     .call("statuses.update")
///     .invoke(CallArgs::new().param("status", "Hello from rust"))
///     .await?;
///
/// // GET https://api.twitter.com/1.1/lists/members.json, inserting data with `arg`
/// twitter.arg("lists").attr("members").invoke(CallArgs::new().param("slug", "rad")).await?;
/// # drop(timeline);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    /// Credentials used to authorize requests
    auth: Box<dyn Auth>,

    format: Format,

    /// Domain API requests are sent to
    domain: String,

    /// Domain media uploads are sent to
    upload_domain: String,

    secure: bool,

    /// Prefix of every call chain, eg. "1.1"
    api_version: Option<String>,

    default_timeout: Option<Duration>,

    /// Client used to make http requests
    client: ReqwestClient,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// The empty call chain, holding only the api version prefix
    pub fn root(&self) -> TwitterCall<'_> {
        TwitterCall::new(self, self.api_version.iter().cloned().collect())
    }

    /// Start a call chain with a single endpoint name, eg. `client.attr("statuses")`
    pub fn attr(&self, name: &str) -> TwitterCall<'_> {
        self.root().attr(name)
    }

    /// Start a call chain with an arbitrary value, eg. a user's screen name
    pub fn arg<V: ToString>(&self, value: V) -> TwitterCall<'_> {
        self.root().arg(value)
    }

    /// Start a call chain from a dotted or slashed path, eg. `client.call("statuses.update")`.
    ///
    /// Both '.' and '/' separate segments; use `attr` or `arg` for a segment containing a dot.
    pub fn call(&self, path: &str) -> TwitterCall<'_> {
        self.root().call(path)
    }

    pub fn media(&self) -> MediaClient {
        MediaClient::new(self)
    }

    pub fn rate_limit(&self) -> RateLimitClient {
        RateLimitClient::new(self)
    }

    fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    // http[s]://{domain}/{uri}[.{format}]
    fn url_for(&self, domain: &str, uri: &str, format: Format) -> String {
        let dot = if format.extension().is_empty() {
            ""
        } else {
            "."
        };

        format!(
            "{}://{}/{}{}{}",
            self.scheme(),
            domain,
            uri,
            dot,
            format.extension()
        )
    }

    // Turn a non-success status into a `TwitterHttpError` carrying the response body.
    async fn check_response(
        &self,
        response: reqwest::Response,
        uri: &str,
        format: Format,
        params: &[(String, String)],
    ) -> Result<reqwest::Response> {
        debug!("Twitter Response: {:#?}", response);

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;
        Err(TwitterHttpError::new(
            status,
            uri.to_owned(),
            format,
            params.to_vec(),
            body.to_vec(),
        )
        .into())
    }

    // Decode a response according to its status, content type and the configured format.
    async fn handle_response(
        &self,
        response: reqwest::Response,
        uri: &str,
        params: &[(String, String)],
    ) -> Result<Response> {
        let response = self
            .check_response(response, uri, self.format, params)
            .await?;
        let headers = response.headers().clone();

        // No content, report an empty object
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Response::new(
                headers,
                Body::Json(serde_json::Value::Object(Default::default())),
            ));
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        if let Some(content_type) =
            content_type.filter(|ct| IMAGE_CONTENT_TYPES.contains(&ct.as_str()))
        {
            let bytes = response.bytes().await?.to_vec();
            return Ok(Response::new(
                headers,
                Body::Image {
                    content_type,
                    bytes,
                },
            ));
        }

        let body = match self.format {
            Format::Json => {
                let payload = response.bytes().await?;
                Body::Json(serde_json::from_slice(&payload)?)
            }
            Format::Xml | Format::None => {
                let payload = response.bytes().await?.to_vec();
                match String::from_utf8(payload) {
                    Ok(text) => Body::Text(text),
                    Err(e) => Body::Bytes(e.into_bytes()),
                }
            }
        };

        Ok(Response::new(headers, body))
    }
}

#[cfg(test)]
mod builder_test {
    use super::{Client, Format};

    #[test]
    fn default_api_version() {
        let client = Client::builder().build().unwrap();
        assert_eq!(client.domain(), "api.twitter.com");
        assert_eq!(client.api_version(), Some("1.1"));
        assert_eq!(client.format(), Format::Json);
        assert!(client.is_secure());

        let client = Client::builder()
            .domain("search.twitter.com")
            .build()
            .unwrap();
        assert_eq!(client.api_version(), None);

        let client = Client::builder()
            .domain("search.twitter.com")
            .api_version("2")
            .build()
            .unwrap();
        assert_eq!(client.api_version(), Some("2"));

        let client = Client::builder().no_api_version().build().unwrap();
        assert_eq!(client.api_version(), None);
    }

    #[test]
    fn urls() {
        let client = Client::builder().build().unwrap();
        assert_eq!(
            client.url_for("api.twitter.com", "1.1/statuses/update", Format::Json),
            "https://api.twitter.com/1.1/statuses/update.json"
        );

        let client = Client::builder().secure(false).build().unwrap();
        assert_eq!(
            client.url_for("api.twitter.com", "1.1/statuses/update", Format::None),
            "http://api.twitter.com/1.1/statuses/update"
        );
    }

    #[test]
    fn invalid_header() {
        let err = Client::builder()
            .header("bad header", "value")
            .build()
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid header: bad header"));
    }
}
