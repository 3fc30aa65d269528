//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Twitter API docs: https://developer.twitter.com/en/docs/authentication/oauth-1-0a/creating-a-signature

use super::Auth;
use crate::client::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::trace;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::RngCore;
use reqwest::Method;
use std::fmt;
use url::Url;

/// Everything except the RFC 3986 unreserved characters: ALPHA / DIGIT / "-" / "." / "_" / "~"
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// OAuth 1.0a credentials of a user and the application acting on their behalf
#[derive(Clone)]
pub struct OAuth {
    token: String,
    token_secret: String,
    consumer_key: String,
    consumer_secret: String,
}

impl OAuth {
    /// Create an authenticator. `token` and `token_secret` come out of the oauth dance (or a
    /// token file), `consumer_key` and `consumer_secret` identify the application.
    pub fn new<S: Into<String>>(
        token: S,
        token_secret: S,
        consumer_key: S,
        consumer_secret: S,
    ) -> Self {
        Self {
            token: token.into(),
            token_secret: token_secret.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    fn sign_with(
        &self,
        method: &Method,
        url: &Url,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp),
        ];
        if !self.token.is_empty() {
            oauth_params.push(("oauth_token", self.token.as_str()));
        }
        oauth_params.push(("oauth_version", OAUTH_VERSION));

        let base_string = signature_base_string(method, url, &oauth_params, params);
        trace!("oauth signature base string: {}", base_string);

        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.token_secret)
        );
        let signature = BASE64.encode(hmacsha1::hmac_sha1(
            signing_key.as_bytes(),
            base_string.as_bytes(),
        ));

        let header = oauth_params
            .iter()
            .copied()
            .chain(std::iter::once(("oauth_signature", signature.as_str())))
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        format!("OAuth {}", header)
    }
}

impl fmt::Debug for OAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth")
            .field("token", &self.token)
            .field("consumer_key", &self.consumer_key)
            .finish()
    }
}

impl Auth for OAuth {
    fn authorization(
        &self,
        method: &Method,
        url: &Url,
        params: &[(String, String)],
    ) -> Result<Option<String>> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let nonce = generate_nonce();

        Ok(Some(self.sign_with(method, url, params, &nonce, &timestamp)))
    }
}

fn signature_base_string(
    method: &Method,
    url: &Url,
    oauth_params: &[(&str, &str)],
    params: &[(String, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(
            params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        percent_encode(&base_url(url)),
        percent_encode(&param_string)
    )
}

// scheme://host[:port]/path with the query and fragment dropped. `Url` already lowercases the
// scheme and host and leaves out default ports.
fn base_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    }
}

fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod test {
    use super::{
        base_url, generate_nonce, percent_encode, signature_base_string, Auth, OAuth,
        OAUTH_VERSION, SIGNATURE_METHOD,
    };
    use reqwest::Method;
    use url::Url;

    // Example request from Twitter's "Creating a signature" guide
    const CONSUMER_KEY: &str = "xvz1evFS4wEEPTGEFPHBog";
    const CONSUMER_SECRET: &str = "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw";
    const TOKEN: &str = "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb";
    const TOKEN_SECRET: &str = "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE";
    const NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const TIMESTAMP: &str = "1318622958";

    fn example() -> (Url, Vec<(String, String)>) {
        let url = Url::parse("https://api.twitter.com/1.1/statuses/update.json").unwrap();
        let params = vec![
            (
                "status".to_owned(),
                "Hello Ladies + Gentlemen, a signed OAuth request!".to_owned(),
            ),
            ("include_entities".to_owned(), "true".to_owned()),
        ];
        (url, params)
    }

    #[test]
    fn encoding() {
        assert_eq!(percent_encode("hello world"), "hello%20world");
        assert_eq!(percent_encode("foo=bar&baz"), "foo%3Dbar%26baz");
        assert_eq!(percent_encode("test-value_123.txt~"), "test-value_123.txt~");
        assert_eq!(percent_encode("Dogs, Cats & Mice"), "Dogs%2C%20Cats%20%26%20Mice");
        assert_eq!(percent_encode("☃"), "%E2%98%83");
    }

    #[test]
    fn base_urls() {
        let url = Url::parse("HTTPS://API.Twitter.com:443/1.1/search/tweets.json?q=a#x").unwrap();
        assert_eq!(base_url(&url), "https://api.twitter.com/1.1/search/tweets.json");

        let url = Url::parse("http://127.0.0.1:8080/1.1/statuses/update.json").unwrap();
        assert_eq!(base_url(&url), "http://127.0.0.1:8080/1.1/statuses/update.json");
    }

    #[test]
    fn base_string() {
        let (url, params) = example();
        let oauth_params = [
            ("oauth_consumer_key", CONSUMER_KEY),
            ("oauth_nonce", NONCE),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", TIMESTAMP),
            ("oauth_token", TOKEN),
            ("oauth_version", OAUTH_VERSION),
        ];

        let expected = "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&\
            include_entities%3Dtrue%26\
            oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26\
            oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26\
            oauth_signature_method%3DHMAC-SHA1%26\
            oauth_timestamp%3D1318622958%26\
            oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26\
            oauth_version%3D1.0%26\
            status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521";

        assert_eq!(
            signature_base_string(&Method::POST, &url, &oauth_params, &params),
            expected
        );
    }

    #[test]
    fn signature() {
        let (url, params) = example();
        let oauth = OAuth::new(TOKEN, TOKEN_SECRET, CONSUMER_KEY, CONSUMER_SECRET);

        let header = oauth.sign_with(&Method::POST, &url, &params, NONCE, TIMESTAMP);
        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.contains("oauth_token=\"370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb\""));
    }

    #[test]
    fn fresh_nonce_per_request() {
        let (url, params) = example();
        let oauth = OAuth::new(TOKEN, TOKEN_SECRET, CONSUMER_KEY, CONSUMER_SECRET);

        let first = oauth.authorization(&Method::GET, &url, &params).unwrap().unwrap();
        let second = oauth.authorization(&Method::GET, &url, &params).unwrap().unwrap();
        assert_ne!(first, second);

        let nonce = generate_nonce();
        assert_eq!(nonce.len(), 32);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_hides_secrets() {
        let oauth = OAuth::new(TOKEN, TOKEN_SECRET, CONSUMER_KEY, CONSUMER_SECRET);
        let debug = format!("{:?}", oauth);
        assert!(!debug.contains(TOKEN_SECRET));
        assert!(!debug.contains(CONSUMER_SECRET));
    }
}
