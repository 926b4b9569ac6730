pub use reqwest;

pub mod http_client;
pub mod null_handler;
pub mod request_common;
