use crate::client::{
    actions::is_post_action, Client, Response, Result, CONTENT_TYPE_JSON,
};
use log::debug;
use reqwest::{header, Method};
use std::{iter::FromIterator, time::Duration};
use url::Url;

/// Arguments of a single call.
///
/// Named parameters are sent as query or form parameters, except for those whose name matches
/// a segment of the call chain: those replace the segment instead. The remaining fields control
/// how the request is made.
#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    params: Vec<(String, String)>,
    method: Option<Method>,
    timeout: Option<Duration>,
    json: Option<serde_json::Value>,
    id: Option<String>,
    cgi_id: Option<String>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named parameter, replacing any earlier value for `name`
    pub fn param<K: Into<String>, V: ToString>(mut self, name: K, value: V) -> Self {
        let name = name.into();
        let value = value.to_string();

        match self.params.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// Force the http method instead of deriving it from the call
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Timeout for this call only, overriding the client's default
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send `body` as the json request body. Makes the call a POST unless a method is set.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Id appended as the last path segment, eg. `statuses/show/{id}`
    pub fn id<V: ToString>(mut self, id: V) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Id sent as the `id` query/form parameter instead of as a path segment
    pub fn cgi_id<V: ToString>(mut self, id: V) -> Self {
        self.cgi_id = Some(id.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub(crate) fn timeout_or(&self, default: Option<Duration>) -> Option<Duration> {
        self.timeout.or(default)
    }

    fn take(&mut self, name: &str) -> Option<String> {
        let idx = self.params.iter().position(|(k, _)| k == name)?;
        Some(self.params.remove(idx).1)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for CallArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CallArgs::new(), |args, (k, v)| args.param(k, v))
    }
}

/// A call chain bound to a client.
///
/// Each `attr`/`arg` returns a new call with the chain extended by one segment; the original is
/// left untouched so a common prefix can be shared between calls.
#[derive(Clone, Debug)]
pub struct TwitterCall<'a> {
    inner: &'a Client,
    uriparts: Vec<String>,
}

impl<'a> TwitterCall<'a> {
    pub(super) fn new(client: &'a Client, uriparts: Vec<String>) -> Self {
        Self {
            inner: client,
            uriparts,
        }
    }

    /// Extend the chain with an endpoint name
    pub fn attr(&self, name: &str) -> TwitterCall<'a> {
        self.extend(name.to_owned())
    }

    /// Extend the chain with an arbitrary value, eg. `client.arg("tamtar").arg("things-that-are-rad")`
    pub fn arg<V: ToString>(&self, value: V) -> TwitterCall<'a> {
        self.extend(value.to_string())
    }

    /// Extend the chain with every segment of a dotted or slashed path.
    ///
    /// Every '.' starts a new segment, so a list slug like `rust.lang` has to go through `arg`.
    pub fn call(&self, path: &str) -> TwitterCall<'a> {
        let mut uriparts = self.uriparts.clone();
        uriparts.extend(
            path.split(|c: char| c == '.' || c == '/')
                .filter(|part| !part.is_empty())
                .map(str::to_owned),
        );
        Self::new(self.inner, uriparts)
    }

    pub fn uriparts(&self) -> &[String] {
        &self.uriparts
    }

    /// The chain joined with '/', without any substitution
    pub fn path(&self) -> String {
        self.uriparts.join("/")
    }

    fn extend(&self, part: String) -> TwitterCall<'a> {
        let mut uriparts = self.uriparts.clone();
        uriparts.push(part);
        Self::new(self.inner, uriparts)
    }

    /// Send the request described by this chain and `args` and decode the response.
    pub async fn invoke(&self, args: CallArgs) -> Result<Response> {
        let request = self.prepare(args);

        let url = self.inner.url_for(&self.inner.domain, &request.uri, self.inner.format);
        let url = Url::parse(&url).map_err(|e| format!("invalid url '{}': {}", url, e))?;

        let signed_params: Vec<(String, String)> = request
            .query
            .iter()
            .chain(request.form.iter())
            .cloned()
            .collect();
        let authorization = self
            .inner
            .auth
            .authorization(&request.method, &url, &signed_params)?;

        debug!("Twitter Request: {} {}", request.method, url);

        let mut builder = self.inner.client.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(json) = &request.json {
            builder = builder
                .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
                .body(serde_json::to_vec(json)?);
        } else if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(authorization) = authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }

        let response = builder.send().await?;

        self.inner
            .handle_response(response, &request.uri, &request.params)
            .await
    }

    // Resolve the chain and arguments into everything needed to build the http request.
    fn prepare(&self, mut args: CallArgs) -> PreparedCall {
        // Segments matching a parameter name are replaced by the parameter's value
        let uriparts: Vec<String> = self
            .uriparts
            .iter()
            .map(|part| args.take(part).unwrap_or_else(|| part.clone()))
            .collect();
        let mut uri = uriparts.join("/");

        let timeout = args.timeout_or(self.inner.default_timeout);
        let CallArgs {
            mut params,
            method,
            json,
            id,
            cgi_id,
            ..
        } = args;

        let method = method.unwrap_or_else(|| {
            if json.is_some() || is_post_action(&uri) {
                Method::POST
            } else {
                Method::GET
            }
        });

        // GET and DELETE never carry a body
        let json = json.filter(|_| method != Method::GET && method != Method::DELETE);

        // With no segment to fill in, the id goes at the end
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            uri.push('/');
            uri.push_str(&id);
        }

        if let Some(cgi_id) = cgi_id.filter(|id| !id.is_empty()) {
            match params.iter_mut().find(|(k, _)| k == "id") {
                Some(entry) => entry.1 = cgi_id,
                None => params.push(("id".to_owned(), cgi_id)),
            }
        }

        // GET/DELETE carry everything in the query string. A json body takes the place of the
        // form, leaving the parameters in the query string.
        let (query, form) = if json.is_some() {
            (params.clone(), Vec::new())
        } else if method == Method::POST {
            (Vec::new(), params.clone())
        } else if method == Method::PUT {
            (params.clone(), params.clone())
        } else {
            (params.clone(), Vec::new())
        };

        PreparedCall {
            uri,
            method,
            timeout,
            json,
            params,
            query,
            form,
        }
    }
}

#[derive(Debug)]
struct PreparedCall {
    /// Path relative to the domain, without the format extension
    uri: String,
    method: Method,
    timeout: Option<Duration>,
    json: Option<serde_json::Value>,
    /// Parameters left after path substitution
    params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
}
