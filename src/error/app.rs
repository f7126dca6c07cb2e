use std::fmt;

use super::Error;

/// Top-level error for the restfault command line front end
#[derive(Debug, Clone)]
pub enum AppError {
    /// The request itself failed, as classified by the coupler
    Request(Error),
    /// CLI argument parsing errors
    Cli(CliError),
    /// Configuration errors
    Config(ConfigError),
    /// Runtime/system errors
    Runtime(String),
}

/// CLI argument parsing and validation errors
#[derive(Debug, Clone)]
pub enum CliError {
    /// Invalid URL format
    InvalidUrl(String),
    /// Parameter that is neither `key:value` nor `key=value`
    InvalidParam(String),
    /// Unsupported method
    UnsupportedMethod(String),
}

/// Configuration related errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Config file not found or unreadable
    FileNotFound(String),
    /// Invalid YAML content
    InvalidYaml(String),
    /// A field or environment override holds an unusable value
    InvalidValue { key: String, value: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Request(err) => write!(f, "{err}"),
            AppError::Cli(err) => write!(f, "{err}"),
            AppError::Config(err) => write!(f, "{err}"),
            AppError::Runtime(msg) => write!(f, "Runtime error: {msg}"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidUrl(url) => {
                write!(f, "Invalid URL '{url}'. URLs must include a host, optionally prefixed by http:// or https://")
            }
            CliError::InvalidParam(param) => {
                write!(f, "Invalid parameter '{param}'. Use 'key:value' for headers or 'key=value' for body data")
            }
            CliError::UnsupportedMethod(method) => {
                write!(f, "Unsupported HTTP method: '{method}'. Supported methods: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Config file not found: '{path}'")
            }
            ConfigError::InvalidYaml(msg) => {
                write!(f, "Invalid YAML in config file: {msg}")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value '{value}' for '{key}'")
            }
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CliError {}
impl std::error::Error for ConfigError {}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::Request(err)
    }
}

impl From<CliError> for AppError {
    fn from(err: CliError) -> Self {
        AppError::Cli(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::InvalidYaml(err.to_string())
    }
}

impl AppError {
    /// Provides a helpful suggestion for how to fix the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            AppError::Cli(CliError::InvalidUrl(_)) => {
                Some("Example: restfault get https://api.example.com/v4/profile")
            }
            AppError::Cli(CliError::InvalidParam(_)) => {
                Some("Example: Authorization:Bearer123 label=web-1")
            }
            AppError::Config(ConfigError::FileNotFound(_)) => {
                Some("Pass --config with the path to a YAML file, or omit it to use defaults")
            }
            AppError::Request(err) if err.code().as_u16() == 502 => {
                Some("The upstream API did not answer; try again later")
            }
            _ => None,
        }
    }
}
