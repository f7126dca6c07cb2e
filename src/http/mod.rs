pub mod backend;
pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod utils;

pub use backend::{HttpBackend, ReqwestBackend};
pub use client::Client;
pub use error::HttpError;
pub use request::{HttpRequest, RequestBody, RequestBuilder};
pub use response::HttpResponse;
pub use utils::{method_has_body, parse_method};
