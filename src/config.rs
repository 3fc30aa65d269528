use crate::{
    auth::{read_token_file, Bearer, OAuth},
    client::{ClientBuilder, Format, Result},
};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error")]
    Io(#[from] io::Error),
    #[error("toml parsing error")]
    De(#[from] toml::de::Error),
}

/// Client settings, usually read from a `chirpy.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub domain: Option<String>,
    pub upload_domain: Option<String>,
    pub format: Option<Format>,
    pub secure: Option<bool>,
    /// An empty string disables the version prefix
    pub api_version: Option<String>,
    /// Default request timeout in seconds
    pub timeout: Option<u64>,

    pub oauth: Option<OAuthConfig>,
    pub bearer_token: Option<String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Proxy urls keyed by scheme
    #[serde(default)]
    pub proxies: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OAuthConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: Option<String>,
    pub token_secret: Option<String>,
    /// File holding the token and token secret, as written by `write_token_file`
    pub token_file: Option<PathBuf>,
}

impl OAuthConfig {
    fn to_oauth(&self) -> Result<OAuth> {
        let (token, token_secret) = match (&self.token, &self.token_secret, &self.token_file) {
            (Some(token), Some(token_secret), _) => (token.clone(), token_secret.clone()),
            (_, _, Some(token_file)) => read_token_file(token_file)?,
            _ => {
                return Err(
                    "oauth config needs either `token` and `token-secret` or a `token-file`".into(),
                )
            }
        };

        Ok(OAuth::new(
            token,
            token_secret,
            self.consumer_key.clone(),
            self.consumer_secret.clone(),
        ))
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Translate these settings into a `ClientBuilder`, loading credentials along the way
    pub fn client_builder(&self) -> Result<ClientBuilder> {
        let mut builder = ClientBuilder::new();

        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.as_str());
        }
        if let Some(upload_domain) = &self.upload_domain {
            builder = builder.upload_domain(upload_domain.as_str());
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if let Some(secure) = self.secure {
            builder = builder.secure(secure);
        }
        match self.api_version.as_deref() {
            Some("") => builder = builder.no_api_version(),
            Some(api_version) => builder = builder.api_version(api_version),
            None => {}
        }
        if let Some(timeout) = self.timeout {
            builder = builder.default_timeout(Duration::from_secs(timeout));
        }

        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        for (scheme, proxy_url) in &self.proxies {
            builder = builder.proxy(scheme.as_str(), proxy_url.as_str());
        }

        if let Some(oauth) = &self.oauth {
            builder = builder.auth(oauth.to_oauth()?);
        } else if let Some(bearer_token) = &self.bearer_token {
            builder = builder.auth(Bearer::new(bearer_token.as_str()));
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod test {
    use super::Config;
    use crate::{auth::write_token_file, client::Format};

    #[test]
    fn parse() {
        const CONFIG: &str = r#"
            domain = "api.example.com"
            format = "xml"
            secure = false
            api-version = "1.1"
            timeout = 10

            [oauth]
            consumer-key = "ck"
            consumer-secret = "cs"
            token = "t"
            token-secret = "ts"

            [headers]
            X-Client-Name = "chirpy"

            [proxies]
            https = "http://10.10.1.10:1080"
        "#;

        let config = Config::from_toml(CONFIG).unwrap();
        assert_eq!(config.domain.as_deref(), Some("api.example.com"));
        assert_eq!(config.format, Some(Format::Xml));
        assert_eq!(config.timeout, Some(10));
        assert_eq!(config.headers["X-Client-Name"], "chirpy");
        assert_eq!(config.proxies["https"], "http://10.10.1.10:1080");

        let client = config.client_builder().unwrap().build().unwrap();
        assert_eq!(client.domain(), "api.example.com");
        assert_eq!(client.api_version(), Some("1.1"));
        assert_eq!(client.format(), Format::Xml);
        assert!(!client.is_secure());
    }

    #[test]
    fn defaults() {
        let config = Config::from_toml("").unwrap();
        let client = config.client_builder().unwrap().build().unwrap();
        assert_eq!(client.domain(), "api.twitter.com");
        assert_eq!(client.api_version(), Some("1.1"));
        assert_eq!(client.format(), Format::Json);

        let config = Config::from_toml("api-version = \"\"").unwrap();
        let client = config.client_builder().unwrap().build().unwrap();
        assert_eq!(client.api_version(), None);
    }

    #[test]
    fn bad_format() {
        assert!(Config::from_toml("format = \"yaml\"").is_err());
    }

    #[test]
    fn token_file() {
        let dir = tempfile::tempdir().unwrap();
        let token_file = dir.path().join("oauth");
        write_token_file(&token_file, "t", "ts").unwrap();

        let config = Config::from_toml(&format!(
            "[oauth]\nconsumer-key = \"ck\"\nconsumer-secret = \"cs\"\ntoken-file = {:?}\n",
            token_file.to_str().unwrap()
        ))
        .unwrap();
        assert!(config.client_builder().is_ok());

        let config = Config::from_toml("[oauth]\nconsumer-key = \"ck\"\nconsumer-secret = \"cs\"\n")
            .unwrap();
        assert!(config.client_builder().is_err());
    }
}
