use crate::config::ClientConfig;
use crate::http::{error::HttpError, request::HttpRequest, response::HttpResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for HTTP backends that handle the actual network communication
///
/// A backend returns `Err` only for transport failures. Any response that
/// arrives, whatever its status, is returned as `Ok` so the coupler can
/// inspect it.
///
/// # Examples
///
/// ```
/// use restfault::http::{HttpBackend, HttpRequest, HttpResponse, HttpError};
/// use async_trait::async_trait;
///
/// struct LoggingBackend<B: HttpBackend> {
///     inner: B,
/// }
///
/// #[async_trait]
/// impl<B: HttpBackend + Send + Sync> HttpBackend for LoggingBackend<B> {
///     async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
///         println!("Sending request to: {}", req.url);
///         let response = self.inner.send(req).await?;
///         println!("Received response with status: {}", response.status);
///         Ok(response)
///     }
/// }
/// ```
#[async_trait]
pub trait HttpBackend {
    /// Send an HTTP request and return the buffered response
    async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Backend performing real requests with reqwest
///
/// Holds one `reqwest::Client`, so connections are pooled across requests.
#[derive(Clone, Debug)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| HttpError::Other(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut request_builder = self
            .client
            .request(req.method.clone(), &req.url)
            .headers(req.headers.clone());
        if let Some(ref body) = req.body {
            request_builder = request_builder.body(body.clone());
        }
        let resp = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(e.to_string())
            } else {
                HttpError::Network(e.to_string())
            }
        })?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp
            .text()
            .await
            .map_err(|e| HttpError::Body(e.to_string()))?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
