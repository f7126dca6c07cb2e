use crate::config::ClientConfig;
use crate::couple::{couple, Exchange};
use crate::error::Error;
use crate::http::{
    backend::HttpBackend, request::HttpRequest, request::RequestBody, response::HttpResponse,
};
use ::http::header::ACCEPT;
use ::http::{HeaderValue, Method};
use std::sync::Arc;
use tracing::debug;

/// HTTP client generic over backend
///
/// Every call goes through [`couple`], so the result is either the response
/// or a classified [`Error`]; callers never inspect raw error statuses.
///
/// # Examples
///
/// ```
/// use restfault::http::{Client, ReqwestBackend};
/// use restfault::ClientConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig {
///     base_url: Some("https://api.example.com/v4".to_string()),
///     ..ClientConfig::default()
/// };
/// let client = Client::with_config(ReqwestBackend::new(&config)?, config);
///
/// match client.get("/profile").await {
///     Ok(response) => println!("{}", response.body),
///     Err(err) => eprintln!("{err}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client<B: HttpBackend + Send + Sync> {
    pub backend: B,
    pub config: ClientConfig,
}

impl<B: HttpBackend + Send + Sync> Client<B> {
    /// Constructs a new Client with default config
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ClientConfig::default())
    }

    pub fn with_config(backend: B, config: ClientConfig) -> Self {
        Self { backend, config }
    }

    /// Sends a request and couples the outcome
    ///
    /// The configured `Accept` is added when the request declares none, and
    /// the declared value is what the response's Content-Type is checked
    /// against.
    pub async fn send(&self, req: &HttpRequest) -> Result<Arc<HttpResponse>, Error> {
        let mut req = req.clone();
        if !req.headers.contains_key(ACCEPT) {
            if let Ok(accept) = HeaderValue::from_str(&self.config.accept) {
                req.headers.insert(ACCEPT, accept);
            }
        }

        debug!(method = %req.method, url = %req.url, "sending request");
        let accept = req.accept().to_string();
        let result = self
            .backend
            .send(&req)
            .await
            .map(|response| Exchange::new(accept, response));
        couple(result)
    }

    pub async fn get(&self, path: &str) -> Result<Arc<HttpResponse>, Error> {
        self.request(Method::GET, path, None).await
    }

    pub async fn delete(&self, path: &str) -> Result<Arc<HttpResponse>, Error> {
        self.request(Method::DELETE, path, None).await
    }

    pub async fn post(&self, path: &str, body: RequestBody) -> Result<Arc<HttpResponse>, Error> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: RequestBody) -> Result<Arc<HttpResponse>, Error> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: RequestBody) -> Result<Arc<HttpResponse>, Error> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<Arc<HttpResponse>, Error> {
        let mut builder = HttpRequest::builder(self.config.resolve_url(path), method);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        self.send(&builder.build()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, Sentinel};
    use crate::http::HttpError;
    use ::http::{HeaderMap, StatusCode};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio_test::block_on;

    struct MockBackend {
        pub last_request: Mutex<Option<HttpRequest>>,
        pub response: HttpResponse,
        pub error: Option<HttpError>,
    }

    impl MockBackend {
        fn replying(status: u16, content_type: &'static str, body: &str) -> Arc<Self> {
            let mut headers = HeaderMap::new();
            headers.insert("content-type", HeaderValue::from_static(content_type));
            Arc::new(Self {
                last_request: Mutex::new(None),
                response: HttpResponse {
                    status,
                    headers,
                    body: body.to_string(),
                },
                error: None,
            })
        }

        fn failing(error: HttpError) -> Arc<Self> {
            Arc::new(Self {
                last_request: Mutex::new(None),
                response: HttpResponse {
                    status: 200,
                    headers: HeaderMap::new(),
                    body: String::new(),
                },
                error: Some(error),
            })
        }

        fn sent(&self) -> HttpRequest {
            self.last_request
                .lock()
                .unwrap()
                .clone()
                .expect("Test: Request was sent")
        }
    }

    #[async_trait]
    impl HttpBackend for MockBackend {
        async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
            *self.last_request.lock().unwrap() = Some(req.clone());
            match self.error {
                Some(ref err) => Err(err.clone()),
                None => Ok(self.response.clone()),
            }
        }
    }

    // Lets a test keep a handle on the backend after the client takes ownership
    #[async_trait]
    impl HttpBackend for Arc<MockBackend> {
        async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
            self.as_ref().send(req).await
        }
    }

    #[test]
    fn test_send_sets_default_accept() {
        let backend = MockBackend::replying(200, "application/json", r#"{"id":1}"#);
        let client = Client::new(backend.clone());
        let req = HttpRequest::new("http://example.com", Method::GET, None, HeaderMap::new());

        let response = block_on(client.send(&req)).expect("Test: Success");
        assert_eq!(response.body, r#"{"id":1}"#);
        assert_eq!(backend.sent().accept(), "application/json");
    }

    #[test]
    fn test_send_keeps_declared_accept() {
        let backend = MockBackend::replying(400, "text/plain", "nope");
        let client = Client::new(backend.clone());
        let req = HttpRequest::builder("http://example.com", Method::GET)
            .accept("text/plain")
            .build();

        // Declared text/plain matches, and a plain text body has no reasons
        assert!(block_on(client.send(&req)).is_ok());
        assert_eq!(backend.sent().accept(), "text/plain");
    }

    #[test]
    fn test_send_couples_structured_error() {
        let backend = MockBackend::replying(
            400,
            "application/json",
            r#"{"errors":[{"reason":"must not be blank","field":"label"},{"reason":"b"}]}"#,
        );
        let client = Client::new(backend);

        let err = block_on(client.get("http://example.com/instances")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Status(StatusCode::BAD_REQUEST));
        assert_eq!(err.message(), "[label] must not be blank; b");
        assert_eq!(err.response().map(|r| r.status), Some(400));
    }

    #[test]
    fn test_send_couples_bad_gateway() {
        let backend = MockBackend::replying(502, "text/html", "<html>Bad Gateway</html>");
        let client = Client::new(backend);

        let err = block_on(client.get("http://example.com")).unwrap_err();
        assert_eq!(err.to_string(), "[502] Bad Gateway");
    }

    #[test]
    fn test_send_couples_transport_error() {
        let backend = MockBackend::failing(HttpError::Timeout("30s elapsed".to_string()));
        let client = Client::new(backend);

        let err = block_on(client.get("http://example.com")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Sentinel(Sentinel::FromError));
        assert!(err.message().contains("30s elapsed"));
    }

    #[test]
    fn test_helpers_resolve_against_base_url() {
        let backend = MockBackend::replying(201, "application/json", "{}");
        let config = ClientConfig {
            base_url: Some("https://api.example.com/v4".to_string()),
            ..ClientConfig::default()
        };
        let client = Client::with_config(backend.clone(), config);
        let body = RequestBody::json(&serde_json::json!({"label": "web-1"})).unwrap();

        block_on(client.post("/instances", body)).expect("Test: Success");
        let sent = backend.sent();
        assert_eq!(sent.url, "https://api.example.com/v4/instances");
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.body.as_deref(), Some(r#"{"label":"web-1"}"#));
        assert_eq!(sent.headers.get("content-type").unwrap(), "application/json");
    }
}
