use crate::couple::ErrorPayload;
use crate::error::ApiErrorSet;
use crate::http::error::HttpError;
use ::http::HeaderMap;

/// A fully buffered HTTP response
///
/// The body is read before the response reaches the coupler, so an error that
/// keeps a handle to it holds no connection open.
///
/// # Examples
///
/// ```
/// use restfault::HttpResponse;
/// use http::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("content-type", "application/json".parse().unwrap());
///
/// let response = HttpResponse {
///     status: 400,
///     headers,
///     body: r#"{"errors":[{"reason":"Invalid label","field":"label"}]}"#.to_string(),
/// };
///
/// assert!(response.is_client_error());
/// assert!(response.error_payload().is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as string
    pub body: String,
}

impl HttpResponse {
    /// Returns true if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the response status indicates a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Returns true if the response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Returns true if the response status indicates any error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Returns the Content-Type header value, if present
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
    }

    /// Returns true if the Content-Type header names a JSON representation
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("application/json") || ct.contains("text/json"))
            .unwrap_or(false)
    }

    /// Parse the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_str(&self.body)
            .map_err(|e| HttpError::Body(format!("Failed to parse JSON response: {e}")))
    }

    /// Get the response body as a string reference
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decodes the structured error body of an error-status response
    ///
    /// Returns `None` below 400. From 400 up a payload is always present: the
    /// parsed [`ApiErrorSet`] when the body is JSON of that shape, otherwise
    /// [`ErrorPayload::Unrecognized`].
    pub fn error_payload(&self) -> Option<ErrorPayload> {
        if !self.is_error() {
            return None;
        }
        if !self.is_json() {
            return Some(ErrorPayload::Unrecognized);
        }
        Some(match self.json::<ApiErrorSet>() {
            Ok(set) => ErrorPayload::Api(set),
            Err(_) => ErrorPayload::Unrecognized,
        })
    }
}
