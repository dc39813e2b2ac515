//! Production HTTP client implementations using reqwest.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, TransportConfig};

/// HTTP client wrapping a single `reqwest::Client`.
///
/// This is a thin wrapper that implements the [`HttpClient`] trait.
/// Reusing one instance shares reqwest's connection pool across requests.
///
/// # Example
///
/// ```no_run
/// use status_hook::webhook::{HttpClient, HttpRequest, ReqwestClient, TransportConfig};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::from_transport(&TransportConfig::default())?;
/// let url = Url::parse("https://api.example.com/hook")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates an HTTP client with reqwest's default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    /// Creates an HTTP client configured with the given transport settings.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the transport cannot be built
    /// (for example an unreadable CA bundle).
    pub fn from_transport(transport: &TransportConfig) -> Result<Self, HttpError> {
        transport.build_client().map(Self::from_client)
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        tracing::debug!(method = %req.method, url = %req.url, "Sending HTTP request");

        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(map_send_error)?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

fn map_send_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::invalid(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}

/// HTTP client that builds a fresh transport for every request.
///
/// No connection is reused between calls, so there is no shared
/// state between concurrent requests beyond the immutable settings.
#[derive(Debug, Clone, Default)]
pub struct TransportClient {
    transport: TransportConfig,
}

impl TransportClient {
    /// Creates a client that uses `transport` for each request.
    #[must_use]
    pub const fn new(transport: TransportConfig) -> Self {
        Self { transport }
    }

    /// Returns the transport settings.
    #[must_use]
    pub const fn transport(&self) -> &TransportConfig {
        &self.transport
    }
}

impl HttpClient for TransportClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let client = ReqwestClient::from_transport(&self.transport)?;
        client.request(req).await
    }
}
