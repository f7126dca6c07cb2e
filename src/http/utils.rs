use crate::http::error::HttpError;
use ::http::Method;

/// Parse a method name, case-insensitively
///
/// # Examples
///
/// ```
/// use restfault::http::parse_method;
/// use http::Method;
///
/// assert_eq!(parse_method("GET").unwrap(), Method::GET);
/// assert_eq!(parse_method("patch").unwrap(), Method::PATCH);
/// ```
pub fn parse_method(s: &str) -> Result<Method, HttpError> {
    match s.to_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "PATCH" => Ok(Method::PATCH),
        "HEAD" => Ok(Method::HEAD),
        "OPTIONS" => Ok(Method::OPTIONS),
        _ => Err(HttpError::UnsupportedMethod(s.to_string())),
    }
}

/// Whether requests with this method carry a body
pub fn method_has_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}
