//! Convenience layer for issuing one-off HTTP requests.
//!
//! [`RequestHelper`] turns a method, a URL string, an optional body and
//! caller-supplied query/header maps into an [`HttpRequest`] and sends it
//! through an [`HttpClient`]. The response is returned untouched.

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use http::Method;
use serde::Serialize;

use super::http::{CONTENT_TYPE_JSON, CONTENT_TYPE_JSON_PATCH};
use super::{
    Headers, HttpClient, HttpError, HttpRequest, HttpResponse, Params, TransportClient,
    TransportConfig,
};

/// Username/password pair sent as an `Authorization: Basic` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// User name
    pub username: String,
    /// Password
    pub password: String,
}

impl BasicAuth {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Encodes the credentials as an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the encoded value is not a valid header.
    pub fn header_value(&self) -> Result<HeaderValue, HttpError> {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut value = HeaderValue::from_str(&format!("Basic {token}"))
            .map_err(|e| HttpError::invalid(format!("invalid basic credentials: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Issues GET/DELETE/POST/PUT/PATCH requests through an [`HttpClient`].
///
/// With the default [`TransportClient`], every call builds a fresh
/// client from the configured [`TransportConfig`].
///
/// # Example
///
/// ```no_run
/// use status_hook::webhook::{Params, RequestHelper};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let helper = RequestHelper::plain();
/// let params = Params::from([("page".to_string(), "2".to_string())]);
/// let response = helper.get("http://localhost:8080/items", Some(&params), None).await?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestHelper<H = TransportClient> {
    client: H,
    auth: Option<BasicAuth>,
}

impl RequestHelper<TransportClient> {
    /// Helper using the given transport settings.
    #[must_use]
    pub const fn new(transport: TransportConfig) -> Self {
        Self::with_client(TransportClient::new(transport))
    }

    /// Helper with the default timeout that skips certificate verification.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(TransportConfig::default())
    }

    /// Helper with the default timeout that validates servers against a CA bundle.
    #[must_use]
    pub fn with_ca_bundle(ca_path: impl Into<PathBuf>) -> Self {
        Self::new(TransportConfig::default().with_ca_bundle(ca_path))
    }
}

impl<H> RequestHelper<H> {
    /// Helper sending through an arbitrary client.
    #[must_use]
    pub const fn with_client(client: H) -> Self {
        Self { client, auth: None }
    }

    /// Attaches basic credentials to every request.
    #[must_use]
    pub fn with_basic_auth(mut self, auth: BasicAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }
}

impl<H: HttpClient> RequestHelper<H> {
    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be built or the exchange fails.
    pub async fn get(
        &self,
        url: &str,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<HttpResponse, HttpError> {
        self.send_raw(Method::GET, url, None, params, headers).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be built or the exchange fails.
    pub async fn delete(
        &self,
        url: &str,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<HttpResponse, HttpError> {
        self.send_raw(Method::DELETE, url, None, params, headers).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Serialization`] if `body` cannot be encoded,
    /// otherwise as [`RequestHelper::send_raw`].
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: Option<&T>,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<HttpResponse, HttpError> {
        let body = encode_json(body)?;
        self.send_raw(Method::POST, url, body, params, headers).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Serialization`] if `body` cannot be encoded,
    /// otherwise as [`RequestHelper::send_raw`].
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: Option<&T>,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<HttpResponse, HttpError> {
        let body = encode_json(body)?;
        self.send_raw(Method::PUT, url, body, params, headers).await
    }

    /// Sends a PATCH request with a JSON body (`application/json-patch+json`).
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Serialization`] if `body` cannot be encoded,
    /// otherwise as [`RequestHelper::send_raw`].
    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: Option<&T>,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<HttpResponse, HttpError> {
        let body = encode_json(body)?;
        self.send_raw(Method::PATCH, url, body, params, headers).await
    }

    /// Sends a request whose body is already encoded.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] for a malformed URL or header,
    /// and whatever the client reports for the exchange itself.
    pub async fn send_raw(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<HttpResponse, HttpError> {
        let mut request = build_request(method, url, body, params, headers)?;
        if let Some(auth) = &self.auth {
            request.headers.append(AUTHORIZATION, auth.header_value()?);
        }
        self.client.request(request).await
    }
}

/// Returns true for methods that carry a JSON body.
#[must_use]
pub fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

/// Parses a method name such as `"PUT"`.
///
/// # Errors
///
/// Returns [`HttpError::InvalidRequest`] for an empty or malformed name.
pub fn parse_method(name: &str) -> Result<Method, HttpError> {
    if name.trim().is_empty() {
        return Err(HttpError::invalid("HTTP method is required"));
    }
    name.trim()
        .to_ascii_uppercase()
        .parse::<Method>()
        .map_err(|e| HttpError::invalid(format!("invalid HTTP method '{name}': {e}")))
}

/// Encodes an optional body as JSON.
///
/// # Errors
///
/// Returns [`HttpError::Serialization`] if the value cannot be encoded.
pub fn encode_json<T: Serialize + ?Sized>(body: Option<&T>) -> Result<Option<Vec<u8>>, HttpError> {
    body.map(serde_json::to_vec)
        .transpose()
        .map_err(HttpError::Serialization)
}

/// Builds the request sent by [`RequestHelper`].
///
/// - Body-bearing methods (POST, PUT, PATCH) get a JSON content type;
///   other methods never carry a body.
/// - Every entry of `params` is appended to the URL's query string.
/// - Every entry of `headers` is added, after the content type.
///
/// # Errors
///
/// Returns [`HttpError::InvalidRequest`] if the URL or a header does not parse.
pub fn build_request(
    method: Method,
    url: &str,
    body: Option<Vec<u8>>,
    params: Option<&Params>,
    headers: Option<&Headers>,
) -> Result<HttpRequest, HttpError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| HttpError::invalid(format!("invalid URL '{url}': {e}")))?;

    let mut request = HttpRequest::new(method, parsed);

    if carries_body(&request.method) {
        let content_type = if request.method == Method::PATCH {
            CONTENT_TYPE_JSON_PATCH
        } else {
            CONTENT_TYPE_JSON
        };
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        request.body = body;
    }

    if let Some(params) = params.filter(|p| !p.is_empty()) {
        let mut pairs = request.url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }

    for (name, value) in headers.into_iter().flatten() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| HttpError::invalid(format!("invalid header name '{name}': {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| HttpError::invalid(format!("invalid value for header '{name}': {e}")))?;
        request.headers.append(header_name, header_value);
    }

    Ok(request)
}
