//! Error normalization for HTTP API clients
//!
//! Failures of every kind are turned into one [`Error`] carrying a code and a
//! printable message:
//!
//! - [`Error::new`] and [`classify`] normalize arbitrary inputs, see [`Input`]
//! - [`couple`] decides whether a completed exchange succeeded
//! - [`http::Client`] sends requests through an [`http::HttpBackend`] and
//!   couples every outcome
//!
//! ```
//! use restfault::{couple, ErrorCode, Exchange, HttpError, HttpResponse};
//! use http::{HeaderMap, HeaderValue, StatusCode};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("content-type", HeaderValue::from_static("application/json"));
//! let response = HttpResponse {
//!     status: 400,
//!     headers,
//!     body: r#"{"errors":[{"reason":"must not be blank","field":"label"}]}"#.to_string(),
//! };
//!
//! let err = couple(Ok::<_, HttpError>(Exchange::new("application/json", response))).unwrap_err();
//! assert_eq!(err.code(), ErrorCode::Status(StatusCode::BAD_REQUEST));
//! assert_eq!(err.to_string(), "[400] [label] must not be blank");
//! ```

pub mod config;
pub mod couple;
pub mod error;
pub mod http;
pub mod logging;
pub mod printer;

pub use config::ClientConfig;
pub use couple::{couple, ErrorPayload, Exchange};
pub use error::{
    classify, ApiErrorReason, ApiErrorSet, AppError, CliError, ConfigError, Error, ErrorCode,
    Input, Sentinel,
};
pub use crate::http::{HttpError, HttpResponse};

use clap::Parser;
use crate::http::{method_has_body, parse_method, Client, HttpRequest, RequestBody, ReqwestBackend};
use indicatif::{ProgressBar, ProgressStyle};
use printer::print_outcome;
use std::future::Future;
use std::time::Duration;

/// Ordered `(key, value)` pairs, as given on the command line
pub type KeyValuePairs = Vec<(String, String)>;

pub type HeaderDataTuple = (KeyValuePairs, KeyValuePairs);

#[derive(Parser, Debug)]
#[command(name = "restfault")]
#[command(author, version, about = "Send one API request and report its outcome as a uniform error")]
pub struct Cli {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS)
    pub method: String,
    /// Absolute URL, or a path resolved against the configured base_url
    pub url: String,
    /// Headers and body data (key:value or key=value)
    #[arg(value_parser, trailing_var_arg = true)]
    pub params: Vec<String>,
    /// YAML config file
    #[arg(long)]
    pub config: Option<String>,
    /// Override the Accept header declared by the request
    #[arg(long)]
    pub accept: Option<String>,
    /// Send body data form-encoded instead of as JSON
    #[arg(long)]
    pub form: bool,
    /// Print response headers too
    #[arg(short, long)]
    pub verbose: bool,
}

/// clap leaves flags given after the URL in the trailing params
const FORM_FLAG: &str = "--form";

/// Splits parameters into headers (`key:value`) and body data (`key=value`)
pub fn validate_params(params: &[String]) -> Result<HeaderDataTuple, CliError> {
    let mut headers = Vec::new();
    let mut data = Vec::new();

    for param in params {
        if param == FORM_FLAG {
            continue;
        }

        if let Some((k, v)) = param.split_once(':') {
            let key = k.trim();
            if key.is_empty() || key.contains(' ') {
                return Err(CliError::InvalidParam(param.clone()));
            }
            headers.push((key.to_string(), v.trim().to_string()));
        } else if let Some((k, v)) = param.split_once('=') {
            let key = k.trim();
            if key.is_empty() {
                return Err(CliError::InvalidParam(param.clone()));
            }
            data.push((key.to_string(), v.trim().to_string()));
        } else {
            return Err(CliError::InvalidParam(param.clone()));
        }
    }

    Ok((headers, data))
}

/// Validates a URL, resolving paths against `base_url` and adding a scheme if missing
pub fn validate_url(url: &str, config: &ClientConfig) -> Result<String, CliError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(CliError::InvalidUrl("URL cannot be empty".to_string()));
    }

    if url.starts_with('/') && config.base_url.is_some() {
        return Ok(config.resolve_url(url));
    }

    let url_with_scheme = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    };

    let host = url_with_scheme
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    if !host.contains('.') {
        return Err(CliError::InvalidUrl(url.to_string()));
    }

    Ok(url_with_scheme)
}

/// Builds the request described by the CLI arguments
pub fn build_request(cli: &Cli, config: &ClientConfig) -> Result<HttpRequest, CliError> {
    let method =
        parse_method(&cli.method).map_err(|_| CliError::UnsupportedMethod(cli.method.clone()))?;
    let url = validate_url(&cli.url, config)?;
    let (headers, data) = validate_params(&cli.params)?;
    let form = cli.form || cli.params.iter().any(|p| p == FORM_FLAG);

    let mut builder = HttpRequest::builder(url, method.clone()).headers_from_vec(headers);
    if let Some(accept) = &cli.accept {
        builder = builder.accept(accept);
    }
    if method_has_body(&method) && !data.is_empty() {
        let body = if form {
            RequestBody::form(data)
        } else {
            RequestBody::Json(json_fields(data)?)
        };
        builder = builder.body(body);
    }
    Ok(builder.build())
}

/// Builds a JSON object in command line order; a key may appear only once
fn json_fields(data: KeyValuePairs) -> Result<serde_json::Value, CliError> {
    let mut fields = serde_json::Map::with_capacity(data.len());
    for (key, value) in data {
        if fields.contains_key(&key) {
            return Err(CliError::InvalidParam(format!("{key}={value}")));
        }
        fields.insert(key, serde_json::Value::String(value));
    }
    Ok(serde_json::Value::Object(fields))
}

/// Loads the config file if given, then applies environment overrides
pub fn load_config(path: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let config = match path {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    config.apply_env()
}

/// Drives a future while showing a spinner with `message`
pub async fn run_with_spinner<F: Future>(message: &str, fut: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    match ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner} {msg}")
    {
        Ok(style) => pb.set_style(style),
        Err(_) => pb.set_style(ProgressStyle::default_spinner()),
    }

    let output = fut.await;
    pb.finish_and_clear();
    output
}

/// Runs the request described by `cli` and prints the coupled outcome
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(cli.config.as_deref())?;
    let req = build_request(&cli, &config)?;
    let backend = ReqwestBackend::new(&config).map_err(|e| AppError::Runtime(e.to_string()))?;
    let client = Client::with_config(backend, config);

    let message = format!("{} {}", req.method, req.url);
    let outcome = run_with_spinner(&message, client.send(&req)).await;
    print_outcome(&outcome, cli.verbose);
    outcome.map(|_| ()).map_err(AppError::from)
}
