use super::request_common::{HandlerResponse, MessageHandler, OutgoingRequest, RequestError};
use async_trait::async_trait;

/// A message handler that never performs network I/O.
///
/// Every request succeeds with status 200 and a body equal to the textual
/// rendering of the outgoing request, so callers can assert on exactly what
/// would have gone over the wire. Installed via
/// [`RequestWrapper::set_null_handler`](crate::wrapper::RequestWrapper::set_null_handler).
#[derive(Debug, Default)]
pub struct NullHandler;

impl NullHandler {
    pub fn new() -> Self { Self }
}

#[async_trait]
impl MessageHandler for NullHandler {
    async fn send_request(
        &self,
        request: OutgoingRequest,
    ) -> Result<HandlerResponse, RequestError> {
        Ok(HandlerResponse::new(200, request.to_string()))
    }
}
