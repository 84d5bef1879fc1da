// Admin API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, credential headers, body
// kind detection and uniform error extraction. Domain endpoints (widgets,
// categories) live in sibling modules as inherent methods.

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::AuthHeaders;
use crate::error::{Error, fallback_message};
use crate::payload::{MultipartPayload, RequestBody};
use crate::transport::TransportConfig;

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Everything about a request except its path.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Extra headers, applied after the credential headers.
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }
}

/// HTTP client for the platform's admin REST API.
///
/// Every method returns the parsed JSON body on success; envelope
/// interpretation belongs to [`crate::envelope`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: AuthHeaders,
}

impl ApiClient {
    /// Build a client from a base URL such as `https://church.example/api/admin`.
    pub fn new(base_url: &str, auth: AuthHeaders, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, auth)
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str, auth: AuthHeaders) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Credential headers, for installing or clearing the session token.
    pub fn auth(&self) -> &AuthHeaders {
        &self.auth
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a server-relative path onto the base URL.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Core request ─────────────────────────────────────────────────

    /// Send a request and return the parsed JSON body.
    ///
    /// JSON bodies carry `Content-Type: application/json`; multipart bodies
    /// let the transport set the boundary. Non-2xx responses become
    /// [`Error::Http`]; a missing response becomes [`Error::Network`].
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!(method = %options.method, %url, "request");

        let mut builder = self.http.request(options.method, url);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        builder = self.auth.apply(builder)?;
        builder = match options.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(payload) => {
                trace!(
                    fields = payload.fields().len(),
                    files = payload.files().len(),
                    "multipart body"
                );
                builder.multipart(payload.into_form()?)
            }
        };
        if !options.headers.is_empty() {
            builder = builder.headers(options.headers);
        }

        let resp = builder.send().await.map_err(Error::Network)?;
        handle_response(resp).await
    }

    // ── Method-fixed helpers ─────────────────────────────────────────

    /// `GET {path}` with query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, Error> {
        let mut options = RequestOptions::new(Method::GET);
        for (k, v) in query {
            options = options.query(*k, v.clone());
        }
        self.request(path, options).await
    }

    /// `GET {collection}?page={page}` plus extra filters.
    pub async fn list(
        &self,
        collection: &str,
        page: u32,
        filters: &[(&str, String)],
    ) -> Result<Value, Error> {
        let mut query = Vec::with_capacity(filters.len() + 1);
        query.push(("page", page.to_string()));
        query.extend(filters.iter().cloned());
        self.get(collection, &query).await
    }

    /// `POST {collection}` with a JSON or multipart body.
    pub async fn create(&self, collection: &str, body: RequestBody) -> Result<Value, Error> {
        self.request(collection, RequestOptions::new(Method::POST).body(body))
            .await
    }

    /// Update a record.
    ///
    /// JSON bodies go out as `PUT {collection}/{id}`. Multipart bodies go out
    /// as `POST {collection}/{id}` with `_method=PUT`, since the backend only
    /// parses multipart on POST.
    pub async fn update(&self, collection: &str, id: &str, body: RequestBody) -> Result<Value, Error> {
        let path = format!("{}/{id}", collection.trim_end_matches('/'));
        let options = match body {
            RequestBody::Multipart(payload) => RequestOptions::new(Method::POST)
                .body(payload.with_method_override("PUT")),
            other => RequestOptions::new(Method::PUT).body(other),
        };
        self.request(&path, options).await
    }

    /// `DELETE {collection}/{id}`.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<Value, Error> {
        let path = format!("{}/{id}", collection.trim_end_matches('/'));
        self.request(&path, RequestOptions::new(Method::DELETE))
            .await
    }

    /// Status-style partial update: `PATCH {collection}/{id}/{action}`.
    pub async fn action(
        &self,
        collection: &str,
        id: &str,
        action: &str,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let path = format!("{}/{id}/{action}", collection.trim_end_matches('/'));
        let mut options = RequestOptions::new(Method::PATCH);
        if let Some(body) = body {
            options = options.body(body);
        }
        self.request(&path, options).await
    }

    /// `POST {path}` with a multipart payload.
    pub async fn upload(&self, path: &str, payload: MultipartPayload) -> Result<Value, Error> {
        self.request(path, RequestOptions::new(Method::POST).body(payload))
            .await
    }

    /// `PUT {path}` with a JSON body.
    pub async fn put_json(&self, path: &str, body: Value) -> Result<Value, Error> {
        self.request(path, RequestOptions::new(Method::PUT).body(body))
            .await
    }
}

/// Ensure the base URL ends with `/` so relative joins append.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Network)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback_message(status.as_u16()));
        return Err(Error::Http {
            status: status.as_u16(),
            message,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}
