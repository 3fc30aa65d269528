//! Minimalist client for Twitter's REST API
//! https://developer.twitter.com/en/docs/twitter-api/v1
//!
//! Endpoints are reached by building a call chain (`client.attr("statuses").attr("update")`)
//! which maps onto the url path `/1.1/statuses/update.json`. Responses are decoded json (or raw
//! xml/text, or image bytes) that carry the response headers and rate limit fields.

pub mod auth;
pub mod client;
mod config;

pub use auth::{read_token_file, write_token_file, Auth, Bearer, NoAuth, OAuth};
pub use client::{
    Body, CallArgs, Client, ClientBuilder, Error, Format, Media, Rate, Response, Result,
    TwitterCall, TwitterHttpError,
};
pub use config::{Config, ConfigError, OAuthConfig};
