use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::fmt;
use strum_macros::Display;

/// HTTP methods the wrapper dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HTTPRequestMethod {
    #[strum(serialize = "GET")]
    Get,
    #[strum(serialize = "POST")]
    Post,
}

/// A fully resolved request handed to a [`MessageHandler`].
///
/// The URL is absolute (base URL already joined with the endpoint path) and
/// the header map is a snapshot of the wrapper's default headers at dispatch
/// time. The [`Display`](fmt::Display) rendering is also the canned response
/// body of the null handler.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    method: HTTPRequestMethod,
    url: String,
    headers: HeaderMap,
    body: Option<String>,
}

impl OutgoingRequest {
    pub fn new(
        method: HTTPRequestMethod,
        url: String,
        headers: HeaderMap,
        body: Option<String>,
    ) -> Self {
        Self { method, url, headers, body }
    }

    pub fn method(&self) -> HTTPRequestMethod { self.method }
    pub fn url(&self) -> &str { &self.url }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> Option<&str> { self.body.as_deref() }
}

impl fmt::Display for OutgoingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method: {}, RequestUri: '{}', Headers: {{", self.method, self.url)?;
        for (name, value) in &self.headers {
            write!(f, " {name}: {};", value.to_str().unwrap_or("<binary>"))?;
        }
        write!(f, " }}")?;
        match &self.body {
            Some(body) => write!(f, ", Body: {body}"),
            None => Ok(()),
        }
    }
}

/// What a [`MessageHandler`] produces: the raw status code and body text.
/// The wrapper never inspects the status; callers get the body verbatim.
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    status: u16,
    body: String,
}

impl HandlerResponse {
    pub fn new(status: u16, body: String) -> Self { Self { status, body } }

    pub fn status(&self) -> u16 { self.status }
    pub fn body(&self) -> &str { &self.body }
    pub fn into_body(self) -> String { self.body }
}

/// The injectable transport boundary.
///
/// Implementations take a resolved [`OutgoingRequest`] and asynchronously
/// produce a [`HandlerResponse`] or a [`RequestError`]. The default
/// implementation rides on `reqwest`; test doubles such as
/// [`NullHandler`](super::null_handler::NullHandler) never touch the network.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn send_request(
        &self,
        request: OutgoingRequest,
    ) -> Result<HandlerResponse, RequestError>;
}

/// Transport-level failure classification.
#[derive(Debug, Display)]
pub enum RequestError {
    NoConnection,
    Timeout,
    FailedRequest,
    Unknown,
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            RequestError::Timeout
        } else if value.is_connect() {
            RequestError::NoConnection
        } else if value.is_request() || value.is_builder() {
            RequestError::FailedRequest
        } else {
            RequestError::Unknown
        }
    }
}
