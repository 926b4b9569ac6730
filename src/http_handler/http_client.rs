use super::request_common::{
    HTTPRequestMethod, HandlerResponse, MessageHandler, OutgoingRequest, RequestError,
};
use async_trait::async_trait;

/// A simple wrapper around `reqwest::Client` used as the default message
/// handler when no custom handler is installed.
///
/// The underlying client is built once with the timeout the wrapper was
/// configured with at build time; the wrapper rebuilds the whole handler
/// when its handler configuration changes.
#[derive(Debug)]
pub(crate) struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
}

impl HTTPClient {
    /// Constructs a new `HTTPClient` with the given request timeout.
    ///
    /// # Arguments
    /// * `timeout_s` – Request timeout in seconds, applied to every request
    ///   sent through this client.
    ///
    /// # Returns
    /// A configured `HTTPClient`, or a [`RequestError`] if the underlying
    /// client cannot be built.
    pub(crate) fn new(timeout_s: u64) -> Result<HTTPClient, RequestError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_s))
            .build()?;
        Ok(HTTPClient { client })
    }
}

#[async_trait]
impl MessageHandler for HTTPClient {
    async fn send_request(
        &self,
        request: OutgoingRequest,
    ) -> Result<HandlerResponse, RequestError> {
        let mut builder = match request.method() {
            HTTPRequestMethod::Get => self.client.get(request.url()),
            HTTPRequestMethod::Post => self.client.post(request.url()),
        };
        builder = builder.headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }
        let response = builder.send().await?;
        // Non-success statuses are not an error at this layer, the body is
        // handed back to the caller either way.
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HandlerResponse::new(status, body))
    }
}
