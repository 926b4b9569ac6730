use super::{RequestWrapper, WrapperError};
use crate::http_handler::request_common::{
    HandlerResponse, MessageHandler, OutgoingRequest, RequestError,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use std::sync::{Arc, Mutex};

/// Message handler that records every request it is handed, mirroring the
/// null handler's echo response.
#[derive(Default)]
struct RecordingHandler {
    requests: Mutex<Vec<OutgoingRequest>>,
}

impl RecordingHandler {
    fn recorded(&self) -> Vec<OutgoingRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageHandler for RecordingHandler {
    async fn send_request(
        &self,
        request: OutgoingRequest,
    ) -> Result<HandlerResponse, RequestError> {
        let body = request.to_string();
        self.requests.lock().unwrap().push(request);
        Ok(HandlerResponse::new(200, body))
    }
}

#[tokio::test]
async fn null_handler_echoes_get_request() {
    let mut wrapper = RequestWrapper::new("http://www.testurl.com");
    wrapper.set_timeout(20000).set_null_handler();

    let body = wrapper.get("bloop").await.unwrap();
    assert!(body.contains("GET"));
    assert!(body.contains("bloop"));
}

#[tokio::test]
async fn null_handler_echoes_post_request() {
    let mut wrapper = RequestWrapper::new("http://example.com");
    wrapper.set_null_handler();

    let body = wrapper.post("data", "{}").await.unwrap();
    assert!(body.contains("POST"));
    assert!(body.contains("data"));
    assert!(body.contains("{}"));
}

#[tokio::test]
async fn validators_gate_requests() {
    let mut wrapper = RequestWrapper::new("http://example.com");
    wrapper.set_null_handler().end_point_validator(|endpoint| endpoint.contains("bloop"));

    assert!(wrapper.get("bloop").await.is_ok());

    let rejected = wrapper.get("bleep").await;
    match rejected {
        Err(WrapperError::InvalidEndpoint(endpoint)) => assert_eq!(endpoint, "bleep"),
        other => panic!("expected InvalidEndpoint, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_endpoint_never_reaches_transport() {
    let handler = Arc::new(RecordingHandler::default());
    let mut wrapper = RequestWrapper::new("http://example.com");
    wrapper.set_message_handler(Arc::clone(&handler) as Arc<dyn MessageHandler>);
    wrapper.end_point_validator(|_| false);

    assert!(wrapper.get("anything").await.is_err());
    assert!(handler.recorded().is_empty());
}

#[tokio::test]
async fn empty_validator_set_is_vacuously_valid() {
    let mut wrapper = RequestWrapper::new("http://example.com");
    wrapper
        .end_point_validator(|_| false)
        .clear_end_point_validator()
        .set_null_handler();

    assert!(wrapper.get("whatever").await.is_ok());
}

#[tokio::test]
async fn pre_requests_run_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let first = Arc::clone(&order);
    let second = Arc::clone(&order);

    let mut wrapper = RequestWrapper::new("http://example.com");
    wrapper
        .set_null_handler()
        .add_pre_request(move |_| first.lock().unwrap().push(1))
        .add_pre_request(move |_| second.lock().unwrap().push(2));

    wrapper.get("bloop").await.unwrap();
    wrapper.get("bloop").await.unwrap();
    assert_eq!(*order.lock().unwrap(), vec![1, 2, 1, 2]);
}

#[tokio::test]
async fn pre_request_headers_reach_the_current_call() {
    let handler = Arc::new(RecordingHandler::default());
    let mut wrapper = RequestWrapper::new("http://example.com");
    wrapper.set_message_handler(Arc::clone(&handler) as Arc<dyn MessageHandler>);
    wrapper.add_pre_request(|w| {
        w.default_headers_mut().clear();
        w.default_headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/x-www-form-urlencoded"));
        w.default_headers_mut().insert("X-WSSE", HeaderValue::from_static("blah"));
    });

    wrapper.get("bloop").await.unwrap();

    let recorded = handler.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        recorded[0].headers().get(ACCEPT).unwrap(),
        "application/x-www-form-urlencoded"
    );
    assert_eq!(recorded[0].headers().get("X-WSSE").unwrap(), "blah");
}

#[tokio::test]
async fn clear_pre_request_removes_hooks() {
    let count = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&count);

    let mut wrapper = RequestWrapper::new("http://example.com");
    wrapper
        .set_null_handler()
        .add_pre_request(move |_| *counter.lock().unwrap() += 1);

    wrapper.get("bloop").await.unwrap();
    wrapper.clear_pre_request();
    wrapper.get("bloop").await.unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
}

#[tokio::test]
async fn handler_swap_invalidates_cached_client() {
    let handler = Arc::new(RecordingHandler::default());
    let mut wrapper = RequestWrapper::new("http://example.com");

    wrapper.set_null_handler();
    wrapper.get("bloop").await.unwrap();
    assert!(handler.recorded().is_empty());

    // The next call must go through the freshly installed handler, not the
    // cached null handler.
    wrapper.set_message_handler(Arc::clone(&handler) as Arc<dyn MessageHandler>);
    wrapper.get("bleep").await.unwrap();
    assert_eq!(handler.recorded().len(), 1);

    wrapper.set_null_handler();
    wrapper.get("bloop").await.unwrap();
    assert_eq!(handler.recorded().len(), 1);
}

#[tokio::test]
async fn endpoint_modifiers_rewrite_outgoing_path() {
    let handler = Arc::new(RecordingHandler::default());
    let mut wrapper = RequestWrapper::new("http://api.census.gov");
    wrapper.set_message_handler(Arc::clone(&handler) as Arc<dyn MessageHandler>);
    wrapper
        .end_point_validator(|endpoint| !endpoint.contains("key="))
        .end_point_modifier(|path| format!("{path}&key=abc"))
        .end_point_modifier(|path| format!("{path}&cached=false"));

    wrapper.get("data/2015/acs1?get=NAME").await.unwrap();

    let recorded = handler.recorded();
    assert_eq!(
        recorded[0].url(),
        "http://api.census.gov/data/2015/acs1?get=NAME&key=abc&cached=false"
    );
}

#[tokio::test]
async fn clear_end_point_modifier_stops_rewrites() {
    let handler = Arc::new(RecordingHandler::default());
    let mut wrapper = RequestWrapper::new("http://example.com");
    wrapper.set_message_handler(Arc::clone(&handler) as Arc<dyn MessageHandler>);
    wrapper.end_point_modifier(|path| format!("{path}?key=abc")).clear_end_point_modifier();

    wrapper.get("bloop").await.unwrap();
    assert_eq!(handler.recorded()[0].url(), "http://example.com/bloop");
}

#[test]
fn stub_operations_report_unimplemented() {
    let mut wrapper = RequestWrapper::new("http://example.com");

    let scheduled = wrapper.schedule_get("bloop").unwrap_err();
    assert_eq!(scheduled.to_string(), "schedule get not implemented");

    let executed = wrapper.execute_tasks().unwrap_err();
    assert_eq!(executed.to_string(), "execute tasks not implemented");
}

#[test]
fn fluent_setters_chain() {
    let mut wrapper = RequestWrapper::new("http://www.testurl.com");
    wrapper
        .add_pre_request(|_| {})
        .set_timeout(20000)
        .set_null_handler()
        .end_point_validator(|_| true)
        .end_point_modifier(|path| path)
        .reset_handler();

    assert_eq!(wrapper.base_url(), "http://www.testurl.com");
    assert_eq!(wrapper.timeout(), 20000);
}

#[test]
fn default_timeout_is_2000_seconds() {
    let wrapper = RequestWrapper::new("http://example.com");
    assert_eq!(wrapper.timeout(), 2000);
}

#[tokio::test]
async fn base_url_and_endpoint_join_with_single_slash() {
    let handler = Arc::new(RecordingHandler::default());
    let mut wrapper = RequestWrapper::new("http://example.com/");
    wrapper.set_message_handler(Arc::clone(&handler) as Arc<dyn MessageHandler>);

    wrapper.get("/bloop").await.unwrap();
    assert_eq!(handler.recorded()[0].url(), "http://example.com/bloop");
}

#[tokio::test]
async fn echo_body_renders_request_display() {
    let mut wrapper = RequestWrapper::new("http://example.com");
    wrapper.set_null_handler();
    wrapper.default_headers_mut().insert("X-WSSE", HeaderValue::from_static("blah"));

    let body = wrapper.post("data", "{\"a\":1}").await.unwrap();
    assert_eq!(
        body,
        "Method: POST, RequestUri: 'http://example.com/data', \
         Headers: { x-wsse: blah; }, Body: {\"a\":1}"
    );
}
