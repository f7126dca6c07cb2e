use crate::http::error::HttpError;
use crate::KeyValuePairs;
use ::http::header::{ACCEPT, CONTENT_TYPE};
use ::http::{HeaderMap, HeaderName, HeaderValue, Method};

/// Request bodies, each of which sets its own Content-Type when missing
///
/// # Examples
///
/// ```
/// use restfault::http::RequestBody;
///
/// let json_body = RequestBody::json(&serde_json::json!({"label": "web-1"}))?;
/// let form_body = RequestBody::form(vec![("label".to_string(), "web-1".to_string())]);
/// let text_body = RequestBody::text("hello".to_string());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// `application/json`
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`
    Form(KeyValuePairs),
    /// `text/plain`
    Text(String),
}

impl RequestBody {
    /// Create a JSON body from any serializable type
    pub fn json<T: serde::Serialize>(data: &T) -> Result<Self, HttpError> {
        let value = serde_json::to_value(data)
            .map_err(|e| HttpError::Other(format!("Failed to serialize JSON: {e}")))?;
        Ok(RequestBody::Json(value))
    }

    pub fn form(data: KeyValuePairs) -> Self {
        RequestBody::Form(data)
    }

    pub fn text(data: String) -> Self {
        RequestBody::Text(data)
    }

    /// Serialize the body to its wire form, setting Content-Type if absent
    pub fn serialize(&self, headers: &mut HeaderMap) -> String {
        match self {
            RequestBody::Json(value) => {
                Self::ensure_content_type(headers, "application/json");
                value.to_string()
            }
            RequestBody::Form(data) => {
                Self::ensure_content_type(headers, "application/x-www-form-urlencoded");
                data.iter()
                    .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            }
            RequestBody::Text(text) => {
                Self::ensure_content_type(headers, "text/plain");
                text.clone()
            }
        }
    }

    fn ensure_content_type(headers: &mut HeaderMap, content_type: &'static str) {
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }
}

/// Fluent builder for [`HttpRequest`]
///
/// Invalid header names or values are skipped.
///
/// # Examples
///
/// ```
/// use restfault::http::{HttpRequest, RequestBody};
/// use http::Method;
///
/// let request = HttpRequest::builder("https://api.example.com/v4/instances", Method::POST)
///     .header("Authorization", "Bearer token123")
///     .accept("application/json")
///     .body(RequestBody::json(&serde_json::json!({"label": "web-1"}))?)
///     .build();
///
/// assert_eq!(request.accept(), "application/json");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RequestBuilder {
    url: String,
    method: Method,
    headers: HeaderMap,
    body: Option<RequestBody>,
}

impl RequestBuilder {
    pub fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Add a header to the request, replacing any previous value
    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            key.as_ref().parse::<HeaderName>(),
            value.as_ref().parse::<HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add multiple headers to the request
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Add headers from `(name, value)` pairs
    pub fn headers_from_vec(self, headers: KeyValuePairs) -> Self {
        headers
            .into_iter()
            .fold(self, |builder, (key, value)| builder.header(key, value))
    }

    /// Declare the representation the caller accepts
    pub fn accept(self, content_type: impl AsRef<str>) -> Self {
        self.header(ACCEPT.as_str(), content_type)
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes the body and produces the final request
    pub fn build(self) -> HttpRequest {
        let mut headers = self.headers;
        let body = self.body.map(|b| b.serialize(&mut headers));

        HttpRequest {
            url: self.url,
            method: self.method,
            body,
            headers,
        }
    }
}

/// An HTTP request ready to hand to a backend
#[derive(Debug, PartialEq, Clone)]
pub struct HttpRequest {
    /// Target URL for the request
    pub url: String,
    /// HTTP method to use
    pub method: Method,
    /// Optional request body
    pub body: Option<String>,
    /// HTTP headers to send
    pub headers: HeaderMap,
}

impl HttpRequest {
    pub fn new(url: &str, method: Method, body: Option<String>, headers: HeaderMap) -> Self {
        Self {
            url: url.to_string(),
            method,
            body,
            headers,
        }
    }

    pub fn builder(url: impl Into<String>, method: Method) -> RequestBuilder {
        RequestBuilder::new(url, method)
    }

    /// The declared `Accept` header, or an empty string when there is none
    pub fn accept(&self) -> &str {
        self.headers
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }
}
