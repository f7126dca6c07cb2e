//! Uniform error type and the classifier that produces it
//!
//! Every failure the client reports, whether it came from the transport, the
//! upstream API, or calling code, is normalized into [`Error`]. The code of an
//! `Error` is either an HTTP status taken from a response or a [`Sentinel`]
//! naming which classification rule produced it.

pub mod api;
pub mod app;

use crate::couple::{ErrorPayload, Exchange};
use crate::http::HttpError;
use crate::http::HttpResponse;
use ::http::StatusCode;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

pub use api::{ApiErrorReason, ApiErrorSet};
pub use app::{AppError, CliError, ConfigError};

/// Reserved codes recording which rule classified an error that has no
/// HTTP status of its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// Input of an unsupported shape, or an error response without a body
    Unsupported = 0,
    /// Built from a plain string
    FromString = 1,
    /// Built from an error value
    FromError = 2,
    /// Built from a `Display` value
    FromStringer = 3,
}

impl Sentinel {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            Sentinel::Unsupported => "unsupported",
            Sentinel::FromString => "from-string",
            Sentinel::FromError => "from-error",
            Sentinel::FromStringer => "from-stringer",
        }
    }
}

/// Code carried by an [`Error`]
///
/// Sentinels and HTTP statuses are distinct variants, so `FromError` (2)
/// never compares equal to any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Sentinel(Sentinel),
    Status(StatusCode),
}

impl ErrorCode {
    /// Maps a raw response status to a code. Values outside the valid status
    /// range fall back to [`Sentinel::Unsupported`].
    pub fn from_status(status: u16) -> Self {
        match StatusCode::from_u16(status) {
            Ok(status) => ErrorCode::Status(status),
            Err(_) => ErrorCode::Sentinel(Sentinel::Unsupported),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            ErrorCode::Sentinel(s) => s.as_u16(),
            ErrorCode::Status(s) => s.as_u16(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ErrorCode::Status(s) => Some(*s),
            ErrorCode::Sentinel(_) => None,
        }
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            ErrorCode::Sentinel(s) => Some(*s),
            ErrorCode::Status(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.as_u16())
    }
}

/// The uniform error record
///
/// Displays as `[<code>] <message>` with the code padded to three digits.
///
/// # Examples
///
/// ```
/// use restfault::{Error, ErrorCode, Sentinel};
///
/// let err = Error::new("boom");
/// assert_eq!(err.code(), ErrorCode::Sentinel(Sentinel::FromString));
/// assert_eq!(err.message(), "boom");
/// assert_eq!(err.to_string(), "[001] boom");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    response: Option<Arc<HttpResponse>>,
}

impl Error {
    /// Classifies any accepted input into an `Error`
    ///
    /// See [`Input`] for the accepted shapes and the order they are checked in.
    pub fn new(input: impl Into<Input>) -> Self {
        match input.into() {
            Input::Classified(err) => err,
            Input::Exchange(exchange) => Self::from_exchange(exchange),
            Input::Error(err) => Self::sentinel(Sentinel::FromError, err.to_string()),
            Input::String(s) => Self::sentinel(Sentinel::FromString, s),
            Input::Stringer(s) => Self::sentinel(Sentinel::FromStringer, s),
            Input::Unsupported(type_name) => Self::sentinel(
                Sentinel::Unsupported,
                format!("unsupported error input type: {type_name}"),
            ),
        }
    }

    pub fn sentinel(sentinel: Sentinel, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Sentinel(sentinel),
            message: message.into(),
            response: None,
        }
    }

    /// Builds an error coded with a response status
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(mut self, response: Arc<HttpResponse>) -> Self {
        self.response = Some(response);
        self
    }

    fn from_exchange(exchange: Exchange) -> Self {
        match exchange.payload {
            Some(ErrorPayload::Api(set)) => {
                Self::status(exchange.response.status, set.to_string())
                    .with_response(exchange.response)
            }
            _ => Self::sentinel(
                Sentinel::Unsupported,
                "unexpected error response, no structured error found",
            ),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The response this error was derived from, if any
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

/// Classifies an optional input; absence stays absence
///
/// # Examples
///
/// ```
/// use restfault::{classify, Input};
///
/// assert!(classify(None::<Input>).is_none());
/// assert_eq!(classify(Some("boom")).map(|e| e.to_string()), Some("[001] boom".to_string()));
/// ```
pub fn classify<I: Into<Input>>(input: Option<I>) -> Option<Error> {
    input.map(|input| Error::new(input))
}

/// The closed set of shapes [`Error::new`] accepts
///
/// Variants are checked in declaration order. A value with more than one
/// capability is converted into the earliest matching variant: every error
/// type implementing `From` here lands in `Error`, even though it is also
/// `Display`.
#[derive(Debug)]
pub enum Input {
    /// Already classified, passed through unchanged
    Classified(Error),
    /// A completed exchange with its decoded error payload
    Exchange(Exchange),
    /// Any error value; its message is kept
    Error(Box<dyn std::error::Error + Send + Sync>),
    /// A plain string, kept verbatim
    String(String),
    /// The rendering of a `Display` value
    Stringer(String),
    /// Anything else, identified by type name
    Unsupported(&'static str),
}

impl Input {
    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Input::Error(Box::new(err))
    }

    pub fn stringer<D: fmt::Display + ?Sized>(value: &D) -> Self {
        Input::Stringer(value.to_string())
    }

    pub fn unsupported<T: ?Sized>() -> Self {
        Input::Unsupported(type_name::<T>())
    }
}

impl From<Error> for Input {
    fn from(err: Error) -> Self {
        Input::Classified(err)
    }
}

impl From<Exchange> for Input {
    fn from(exchange: Exchange) -> Self {
        Input::Exchange(exchange)
    }
}

impl From<HttpError> for Input {
    fn from(err: HttpError) -> Self {
        Input::error(err)
    }
}

impl From<std::io::Error> for Input {
    fn from(err: std::io::Error) -> Self {
        Input::error(err)
    }
}

impl From<serde_json::Error> for Input {
    fn from(err: serde_json::Error) -> Self {
        Input::error(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Input {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Input::Error(err)
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::String(s)
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::String(s.to_string())
    }
}
