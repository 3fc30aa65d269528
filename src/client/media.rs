use crate::client::{CallArgs, Client, Format, Response, Result};
use log::debug;
use reqwest::{
    header,
    multipart::{Form, Part},
    Method,
};
use serde::Deserialize;
use std::{fs, path::Path};
use url::Url;

/// A media file to attach to a status
#[derive(Clone, Debug)]
pub struct Media {
    bytes: Vec<u8>,
    file_name: Option<String>,
    mime_type: Option<String>,
}

impl Media {
    pub fn new<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
            mime_type: None,
        }
    }

    /// Read a media file from disk, naming it after the file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let media = Self::new(fs::read(path)?);

        Ok(match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => media.file_name(name),
            None => media,
        })
    }

    pub fn file_name<S: Into<String>>(mut self, file_name: S) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn mime_type<S: Into<String>>(mut self, mime_type: S) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    fn into_part(self) -> Result<Part> {
        let mut part = Part::bytes(self.bytes);
        if let Some(file_name) = self.file_name {
            part = part.file_name(file_name);
        }
        if let Some(mime_type) = self.mime_type {
            part = part.mime_str(&mime_type)?;
        }
        Ok(part)
    }
}

#[derive(Debug, Deserialize)]
struct MediaUpload {
    media_id: Option<u64>,
    media_id_string: Option<String>,
}

impl MediaUpload {
    fn id(self) -> Option<String> {
        let MediaUpload {
            media_id,
            media_id_string,
        } = self;
        media_id_string.or_else(|| media_id.map(|id| id.to_string()))
    }
}

/// `MediaClient` handles uploading media and attaching it to statuses.
///
/// Twitter API docs: https://developer.twitter.com/en/docs/twitter-api/v1/media/upload-media/overview
pub struct MediaClient<'a> {
    inner: &'a Client,
}

impl<'a> MediaClient<'a> {
    pub(super) fn new(client: &'a Client) -> Self {
        Self { inner: client }
    }

    /// Upload `media` and return the media id Twitter assigned to it.
    ///
    /// Twitter API docs: https://developer.twitter.com/en/docs/twitter-api/v1/media/upload-media/api-reference/post-media-upload
    pub async fn upload(&self, media: Media, args: &CallArgs) -> Result<String> {
        let media_url = self
            .inner
            .url_for(&self.inner.upload_domain, "1.1/media/upload", Format::Json);
        let url =
            Url::parse(&media_url).map_err(|e| format!("invalid url '{}': {}", media_url, e))?;

        // Multipart bodies are not part of the oauth signature
        let authorization = self.inner.auth.authorization(&Method::POST, &url, &[])?;

        debug!("Twitter Request: POST {}", url);

        let mut builder = self
            .inner
            .client
            .post(url)
            .multipart(Form::new().part("media", media.into_part()?));
        if let Some(timeout) = args.timeout_or(self.inner.default_timeout) {
            builder = builder.timeout(timeout);
        }
        if let Some(authorization) = authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }

        let response = builder.send().await?;
        let response = self
            .inner
            .check_response(response, &media_url, Format::None, args.params())
            .await?;

        response
            .json::<MediaUpload>()
            .await?
            .id()
            .ok_or_else(|| "media upload response did not contain a media id".into())
    }

    /// Upload `media` and post a status with it attached.
    ///
    /// Any media ids already present in `args` are kept, the new upload is appended.
    pub async fn update_with_media(
        &self,
        status: &str,
        media: Media,
        args: CallArgs,
    ) -> Result<Response> {
        let media_id = self.upload(media, &args).await?;

        let media_ids = match args.get("media_ids") {
            Some(ids) if !ids.is_empty() => format!("{},{}", ids, media_id),
            _ => media_id,
        };

        let args = args
            .param("status", status)
            .param("media_ids", media_ids)
            .method(Method::POST);

        self.inner
            .attr("statuses")
            .attr("update")
            .invoke(args)
            .await
    }
}
