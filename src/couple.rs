//! Decides whether a completed HTTP exchange succeeded
//!
//! [`couple`] takes the result of one request attempt and either hands back
//! the response or produces a classified [`Error`]. The branches are checked
//! in this order, and each one is terminal:
//!
//! 1. transport failure
//! 2. no error payload (success)
//! 3. `502` with an HTML body (gateway failure)
//! 4. content type other than the one the request accepted
//! 5. structured error with at least one reason

use crate::error::{ApiErrorSet, Error, Input};
use crate::http::HttpResponse;
use ::http::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

/// What the transport decoded from an error-status response body
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// The body parsed as a structured API error
    Api(ApiErrorSet),
    /// The body was not a structured API error
    Unrecognized,
}

/// A completed exchange: the response and what was decoded from it
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// `Accept` header the request declared, empty when it declared none
    pub accept: String,
    pub response: Arc<HttpResponse>,
    /// Present only when the response carried an error status
    pub payload: Option<ErrorPayload>,
}

impl Exchange {
    /// Builds an exchange, decoding the error payload from the response
    pub fn new(accept: impl Into<String>, response: HttpResponse) -> Self {
        let payload = response.error_payload();
        Self {
            accept: accept.into(),
            response: Arc::new(response),
            payload,
        }
    }
}

/// Couples a transport result with the API's error conventions
///
/// A transport error always wins. Otherwise the response passes through
/// unless it carries an error payload that fails content negotiation or
/// lists at least one reason.
///
/// # Examples
///
/// ```
/// use restfault::{couple, Exchange, HttpError, HttpResponse};
/// use http::HeaderMap;
///
/// let ok = HttpResponse { status: 200, headers: HeaderMap::new(), body: "{}".to_string() };
/// let result = couple(Ok::<_, HttpError>(Exchange::new("application/json", ok)));
/// assert!(result.is_ok());
///
/// let failed = couple(Err::<Exchange, _>(HttpError::Network("refused".to_string())));
/// assert_eq!(failed.unwrap_err().code().as_u16(), 2);
/// ```
pub fn couple<E: Into<Input>>(result: Result<Exchange, E>) -> Result<Arc<HttpResponse>, Error> {
    let exchange = match result {
        Ok(exchange) => exchange,
        Err(err) => {
            let err = Error::new(err);
            debug!(code = %err.code(), "transport failure: {}", err.message());
            return Err(err);
        }
    };

    let payload = match &exchange.payload {
        Some(payload) => payload,
        None => return Ok(exchange.response),
    };

    let response = &exchange.response;
    let expected = exchange.accept.as_str();
    let actual = response.content_type().unwrap_or("");

    if response.status == StatusCode::BAD_GATEWAY.as_u16() && actual == "text/html" {
        warn!("upstream gateway failure, response body is an HTML error page");
        return Err(bad_gateway().with_response(Arc::clone(response)));
    }

    if actual != expected {
        debug!(status = response.status, expected, actual, "content type mismatch");
        let message = format!(
            "unexpected Content-Type: expected {expected}, received {actual}; response body: {}",
            response.text()
        );
        return Err(Error::status(response.status, message).with_response(Arc::clone(response)));
    }

    let reasons = match payload {
        ErrorPayload::Api(set) => set.len(),
        ErrorPayload::Unrecognized => 0,
    };

    // TODO: confirm with the upstream service that an error status with an
    // empty or unreadable error body is meant to count as success.
    if reasons == 0 {
        return Ok(exchange.response);
    }

    debug!(status = response.status, reasons, "structured API error");
    Err(Error::new(exchange))
}

fn bad_gateway() -> Error {
    let status = StatusCode::BAD_GATEWAY;
    Error::status(
        status.as_u16(),
        status.canonical_reason().unwrap_or("Bad Gateway"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiErrorReason, ErrorCode, Sentinel};
    use crate::http::HttpError;
    use ::http::{HeaderMap, HeaderValue};

    const JSON: &str = "application/json";

    fn response(status: u16, content_type: Option<&'static str>, body: &str) -> HttpResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert("content-type", HeaderValue::from_static(ct));
        }
        HttpResponse {
            status,
            headers,
            body: body.to_string(),
        }
    }

    fn exchange(resp: HttpResponse, payload: Option<ErrorPayload>) -> Result<Exchange, HttpError> {
        Ok(Exchange {
            accept: JSON.to_string(),
            response: Arc::new(resp),
            payload,
        })
    }

    fn reasons() -> ErrorPayload {
        ErrorPayload::Api(ApiErrorSet::new(vec![
            ApiErrorReason::new("a").with_field("f"),
            ApiErrorReason::new("b"),
        ]))
    }

    #[test]
    fn test_transport_error_wins() {
        let result = couple(Err::<Exchange, _>(HttpError::Network("connection refused".to_string())));
        let err = result.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Sentinel(Sentinel::FromError));
        assert!(err.message().contains("connection refused"));
        assert!(err.response().is_none());
    }

    #[test]
    fn test_transport_error_from_string() {
        let err = couple(Err::<Exchange, _>("dial tcp: timeout")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Sentinel(Sentinel::FromString));
        assert_eq!(err.message(), "dial tcp: timeout");
    }

    #[test]
    fn test_no_payload_is_success() {
        let resp = response(200, Some(JSON), r#"{"id":1}"#);
        let ok = couple(exchange(resp.clone(), None)).expect("Test: Success");
        assert_eq!(*ok, resp);
    }

    #[test]
    fn test_no_payload_ignores_content_type() {
        let resp = response(200, Some("text/plain"), "hello");
        assert!(couple(exchange(resp, None)).is_ok());
    }

    #[test]
    fn test_bad_gateway_html() {
        let resp = response(502, Some("text/html"), "<html>502</html>");
        let err = couple(exchange(resp, Some(ErrorPayload::Unrecognized))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Status(StatusCode::BAD_GATEWAY));
        assert_eq!(err.message(), "Bad Gateway");
    }

    #[test]
    fn test_bad_gateway_requires_exact_html() {
        let resp = response(502, Some("text/html; charset=utf-8"), "<html>502</html>");
        let err = couple(exchange(resp, Some(ErrorPayload::Unrecognized))).unwrap_err();
        assert_eq!(err.code().as_u16(), 502);
        assert!(err.message().contains("unexpected Content-Type"));
    }

    #[test]
    fn test_bad_gateway_json_goes_through_reasons() {
        let resp = response(502, Some(JSON), "{}");
        let err = couple(exchange(resp, Some(reasons()))).unwrap_err();
        assert_eq!(err.code().as_u16(), 502);
        assert_eq!(err.message(), "[f] a; b");
    }

    #[test]
    fn test_content_type_mismatch() {
        let resp = response(503, Some("text/plain"), "service unavailable");
        let err = couple(exchange(resp, Some(ErrorPayload::Unrecognized))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(err.message().contains(JSON));
        assert!(err.message().contains("text/plain"));
        assert!(err.message().contains("service unavailable"));
        assert_eq!(err.response().map(|r| r.status), Some(503));
    }

    #[test]
    fn test_missing_content_type_is_mismatch() {
        let resp = response(400, None, "");
        let err = couple(exchange(resp, Some(reasons()))).unwrap_err();
        assert_eq!(err.code().as_u16(), 400);
        assert!(err.message().contains("unexpected Content-Type"));
    }

    #[test]
    fn test_empty_reasons_is_success() {
        let resp = response(400, Some(JSON), r#"{"errors":[]}"#);
        let payload = Some(ErrorPayload::Api(ApiErrorSet::default()));
        let ok = couple(exchange(resp.clone(), payload)).expect("Test: Success");
        assert_eq!(*ok, resp);
    }

    #[test]
    fn test_unrecognized_payload_is_success() {
        let resp = response(404, Some(JSON), r#"{"detail":"gone"}"#);
        assert!(couple(exchange(resp, Some(ErrorPayload::Unrecognized))).is_ok());
    }

    #[test]
    fn test_structured_error() {
        let resp = response(400, Some(JSON), "");
        let err = couple(exchange(resp, Some(reasons()))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Status(StatusCode::BAD_REQUEST));
        assert_eq!(err.message(), "[f] a; b");
        assert_eq!(err.response().map(|r| r.status), Some(400));
    }

    #[test]
    fn test_exchange_new_decodes_payload() {
        let resp = response(
            422,
            Some(JSON),
            r#"{"errors":[{"reason":"must not be blank","field":"label"}]}"#,
        );
        let err = couple(Ok::<_, HttpError>(Exchange::new(JSON, resp))).unwrap_err();
        assert_eq!(err.to_string(), "[422] [label] must not be blank");
    }
}
