//! A configurable wrapper around an asynchronous HTTP client.
//!
//! [`RequestWrapper`] decorates a transport with ordered pre-request hooks,
//! endpoint validators and endpoint modifiers, all registered at runtime
//! through fluent setters. The transport itself is a swappable
//! [`MessageHandler`]; the built-in [`NullHandler`] echoes requests back
//! without any network I/O, which keeps tests and offline runs cheap.
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]

mod logger;

pub mod http_handler;
pub mod wrapper;

pub use http_handler::null_handler::NullHandler;
pub use http_handler::request_common::{
    HTTPRequestMethod, HandlerResponse, MessageHandler, OutgoingRequest, RequestError,
};
pub use wrapper::{RequestWrapper, WrapperError};
