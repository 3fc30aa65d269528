use crate::client::{
    CallArgs, Client, Format, Response, Result, HEADER_RATE_LIMIT, HEADER_RATE_REMAINING,
    HEADER_RATE_RESET,
};
use chrono::{offset::LocalResult, DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Rate limit information attached to every response
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Rate {
    /// The rate limit ceiling for the endpoint that was called
    pub limit: u64,
    /// Remaining requests in the current window
    pub remaining: u64,
    /// Time in UTC epoch seconds when the window resets
    pub reset: i64,
}

impl Rate {
    // Missing or malformed headers are reported as 0
    pub(super) fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let mut rate = Self::default();

        if let Some(limit) = headers
            .get(HEADER_RATE_LIMIT)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
        {
            rate.limit = limit;
        };

        if let Some(remaining) = headers
            .get(HEADER_RATE_REMAINING)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
        {
            rate.remaining = remaining;
        };

        if let Some(reset) = headers
            .get(HEADER_RATE_RESET)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
        {
            rate.reset = reset;
        };

        rate
    }

    /// The reset time as a UTC timestamp, `None` if Twitter didn't report one.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        if self.reset == 0 {
            return None;
        }

        match Utc.timestamp_opt(self.reset, 0) {
            LocalResult::Single(datetime) => Some(datetime),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RateLimitContext {
    pub access_token: Option<String>,
    pub application: Option<String>,
}

/// Result of `application/rate_limit_status`
#[derive(Debug, Deserialize)]
pub struct RateLimitStatus {
    pub rate_limit_context: Option<RateLimitContext>,

    // Keyed by resource family ("statuses", "users", ...) and then by endpoint
    // ("/statuses/home_timeline").
    pub resources: HashMap<String, HashMap<String, Rate>>,
}

impl RateLimitStatus {
    /// Look up the limits for a single endpoint, eg. `/statuses/home_timeline`
    pub fn endpoint(&self, endpoint: &str) -> Option<&Rate> {
        self.resources
            .values()
            .find_map(|endpoints| endpoints.get(endpoint))
    }
}

/// `RateLimitClient` handles communication with the rate limit related methods of the Twitter
/// API.
///
/// Twitter API docs: https://developer.twitter.com/en/docs/twitter-api/v1/developer-utilities/rate-limit-status/api-reference/get-application-rate_limit_status
pub struct RateLimitClient<'a> {
    inner: &'a Client,
}

impl<'a> RateLimitClient<'a> {
    pub(super) fn new(client: &'a Client) -> Self {
        Self { inner: client }
    }

    /// Query the current rate limits of this client's credentials.
    ///
    /// `resources` limits the answer to the given resource families, eg. `["statuses",
    /// "users"]`. Pass an empty slice to get everything.
    pub async fn get(&self, resources: &[&str]) -> Result<Response<RateLimitStatus>> {
        if self.inner.format() != Format::Json {
            return Err("rate limit status can only be decoded from the json format".into());
        }

        let mut args = CallArgs::new();
        if !resources.is_empty() {
            args = args.param("resources", resources.join(","));
        }

        self.inner
            .call("application/rate_limit_status")
            .invoke(args)
            .await?
            .deserialize()
    }
}

#[cfg(test)]
mod test {
    use super::{Rate, RateLimitStatus, HEADER_RATE_LIMIT, HEADER_RATE_REMAINING, HEADER_RATE_RESET};
    use reqwest::header::HeaderMap;

    #[test]
    fn rate() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_RATE_LIMIT, "15".parse().unwrap());
        headers.insert(HEADER_RATE_REMAINING, "12".parse().unwrap());
        headers.insert(HEADER_RATE_RESET, "1372700873".parse().unwrap());

        let r = Rate::from_headers(&headers);
        assert_eq!(r.limit, 15);
        assert_eq!(r.remaining, 12);
        assert_eq!(r.reset, 1372700873);
        assert_eq!(r.reset_at().unwrap().timestamp(), 1372700873);
    }

    #[test]
    fn rate_defaults_to_zero() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_RATE_LIMIT, "lots".parse().unwrap());

        let r = Rate::from_headers(&headers);
        assert_eq!(r, Rate::default());
        assert!(r.reset_at().is_none());
    }

    #[test]
    fn rate_limit_status() {
        const STATUS_JSON: &str = r#"
            {
                "rate_limit_context": {
                    "access_token": "786491-24zE39NUezJ8UTmOGOtLhgyLgCkPyY4dAcx6NA6sDKw"
                },
                "resources": {
                    "statuses": {
                        "/statuses/home_timeline": {
                            "limit": 15,
                            "remaining": 15,
                            "reset": 1403602426
                        },
                        "/statuses/user_timeline": {
                            "limit": 180,
                            "remaining": 179,
                            "reset": 1403602426
                        }
                    },
                    "users": {
                        "/users/lookup": {
                            "limit": 180,
                            "remaining": 180,
                            "reset": 1403602426
                        }
                    }
                }
            }
        "#;

        let status: RateLimitStatus = serde_json::from_str(STATUS_JSON).unwrap();
        let timeline = status.endpoint("/statuses/user_timeline").unwrap();
        assert_eq!(timeline.limit, 180);
        assert_eq!(timeline.remaining, 179);
        assert!(status.endpoint("/users/lookup").is_some());
        assert!(status.endpoint("/friends/ids").is_none());
    }
}
