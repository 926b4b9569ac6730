//! The request wrapper: fluent configuration around an injectable transport.

#[cfg(test)]
mod tests;

use crate::event;
use crate::http_handler::http_client::HTTPClient;
use crate::http_handler::null_handler::NullHandler;
use crate::http_handler::request_common::{
    HTTPRequestMethod, MessageHandler, OutgoingRequest, RequestError,
};
use reqwest::header::HeaderMap;
use std::fmt;
use std::sync::Arc;

/// Default request timeout in seconds for a freshly constructed wrapper.
const DEFAULT_TIMEOUT_S: u64 = 2000;

/// A callback run before every dispatch, handed the wrapper itself so it can
/// mutate shared request state such as [`RequestWrapper::default_headers_mut`].
pub type PreRequestHook = Box<dyn FnMut(&mut RequestWrapper) + Send>;
/// A predicate gating whether a request to a given endpoint may proceed.
pub type EndpointValidator = Box<dyn Fn(&str) -> bool + Send>;
/// A transform rewriting the outgoing endpoint path before dispatch.
pub type EndpointModifier = Box<dyn Fn(String) -> String + Send>;

/// Decorates an HTTP transport with runtime-registered hooks, validators and
/// modifiers, all configured through fluent setters returning `&mut Self`.
///
/// The transport actually used for dispatch is cached and only rebuilt when
/// the handler configuration changed since the last build, so consecutive
/// calls reuse one client.
pub struct RequestWrapper {
    /// Base URL prepended to every endpoint path, fixed at construction.
    base_url: String,
    timeout_s: u64,
    /// Headers attached to every outgoing request; the shared state
    /// pre-request hooks typically mutate.
    default_headers: HeaderMap,
    pre_requests: Vec<PreRequestHook>,
    endpoint_validators: Vec<EndpointValidator>,
    endpoint_modifiers: Vec<EndpointModifier>,
    /// Configured custom handler; `None` falls back to the `reqwest` client.
    message_handler: Option<Arc<dyn MessageHandler>>,
    changed_handler: bool,
    /// The handler dispatch actually goes through, built lazily.
    client: Option<Arc<dyn MessageHandler>>,
}

impl RequestWrapper {
    /// Constructs a wrapper for the given base URL.
    ///
    /// The URL format is not checked here; a malformed base URL surfaces as
    /// a transport error on the first call that reaches the network.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: String::from(base_url),
            timeout_s: DEFAULT_TIMEOUT_S,
            default_headers: HeaderMap::new(),
            pre_requests: Vec::new(),
            endpoint_validators: Vec::new(),
            endpoint_modifiers: Vec::new(),
            message_handler: None,
            changed_handler: true,
            client: None,
        }
    }

    /// Issues a GET to `base_url` joined with `endpoint` and returns the
    /// response body text, regardless of the response status code.
    ///
    /// Sequence per call: resolve the (possibly rebuilt) transport client,
    /// run every endpoint validator, run every pre-request hook, apply the
    /// endpoint modifiers, dispatch.
    ///
    /// # Errors
    /// [`WrapperError::InvalidEndpoint`] if any validator rejects
    /// `endpoint`; [`WrapperError::Transport`] on any transport failure.
    pub async fn get(&mut self, endpoint: &str) -> Result<String, WrapperError> {
        self.send(HTTPRequestMethod::Get, endpoint, None).await
    }

    /// Issues a POST with `body` as the raw request payload; otherwise
    /// identical to [`get`](Self::get).
    ///
    /// # Errors
    /// Same as [`get`](Self::get).
    pub async fn post(&mut self, endpoint: &str, body: &str) -> Result<String, WrapperError> {
        self.send(HTTPRequestMethod::Post, endpoint, Some(body.to_string())).await
    }

    /// Reserved for future request batching.
    ///
    /// # Errors
    /// Always [`WrapperError::NotImplemented`].
    pub fn schedule_get(&mut self, _endpoint: &str) -> Result<usize, WrapperError> {
        Err(WrapperError::NotImplemented("schedule get not implemented"))
    }

    /// Reserved for future execution of scheduled requests.
    ///
    /// # Errors
    /// Always [`WrapperError::NotImplemented`].
    pub fn execute_tasks(&mut self) -> Result<bool, WrapperError> {
        Err(WrapperError::NotImplemented("execute tasks not implemented"))
    }

    /// Appends a hook run before every dispatch, in registration order.
    pub fn add_pre_request<F>(&mut self, hook: F) -> &mut Self
    where F: FnMut(&mut RequestWrapper) + Send + 'static {
        self.pre_requests.push(Box::new(hook));
        self
    }

    /// Removes all registered pre-request hooks.
    pub fn clear_pre_request(&mut self) -> &mut Self {
        self.pre_requests.clear();
        self
    }

    /// Appends an endpoint validator. A request is rejected if any
    /// registered validator returns `false` for its endpoint path.
    pub fn end_point_validator<F>(&mut self, validator: F) -> &mut Self
    where F: Fn(&str) -> bool + Send + 'static {
        self.endpoint_validators.push(Box::new(validator));
        self
    }

    /// Removes all registered endpoint validators.
    pub fn clear_end_point_validator(&mut self) -> &mut Self {
        self.endpoint_validators.clear();
        self
    }

    /// Appends an endpoint modifier. Modifiers rewrite the outgoing path in
    /// registration order after validation, e.g. to append an API key.
    pub fn end_point_modifier<F>(&mut self, modifier: F) -> &mut Self
    where F: Fn(String) -> String + Send + 'static {
        self.endpoint_modifiers.push(Box::new(modifier));
        self
    }

    /// Removes all registered endpoint modifiers.
    pub fn clear_end_point_modifier(&mut self) -> &mut Self {
        self.endpoint_modifiers.clear();
        self
    }

    /// Sets the timeout used by the next built transport client. An already
    /// built client keeps its old timeout until a handler change (or first
    /// use) forces a rebuild.
    pub fn set_timeout(&mut self, seconds: u64) -> &mut Self {
        self.timeout_s = seconds;
        self
    }

    /// Installs a custom message handler and marks the cached client dirty,
    /// so the next call dispatches through `handler`.
    pub fn set_message_handler(&mut self, handler: Arc<dyn MessageHandler>) -> &mut Self {
        self.message_handler = Some(handler);
        self.changed_handler = true;
        self
    }

    /// Installs the built-in [`NullHandler`], short-circuiting all network
    /// I/O with canned echo responses.
    pub fn set_null_handler(&mut self) -> &mut Self {
        self.set_message_handler(Arc::new(NullHandler::new()))
    }

    /// Clears any custom handler; the next call rebuilds the default
    /// `reqwest` transport.
    pub fn reset_handler(&mut self) -> &mut Self {
        self.message_handler = None;
        self.changed_handler = true;
        self
    }

    /// The base URL the wrapper was constructed with.
    pub fn base_url(&self) -> &str { &self.base_url }

    /// The currently configured timeout in seconds.
    pub fn timeout(&self) -> u64 { self.timeout_s }

    /// The headers attached to every outgoing request.
    pub fn default_headers(&self) -> &HeaderMap { &self.default_headers }

    /// Mutable access to the shared default headers; the surface
    /// pre-request hooks use to inject auth tokens and the like.
    pub fn default_headers_mut(&mut self) -> &mut HeaderMap { &mut self.default_headers }

    async fn send(
        &mut self,
        method: HTTPRequestMethod,
        endpoint: &str,
        body: Option<String>,
    ) -> Result<String, WrapperError> {
        let client = self.check_and_reset_client()?;
        self.run_endpoint_validators(endpoint)?;
        self.run_pre_requests();
        let path = self.apply_endpoint_modifiers(endpoint);
        let request = OutgoingRequest::new(
            method,
            self.full_url(&path),
            self.default_headers.clone(),
            body,
        );
        event!("dispatching {} {}", method, request.url());
        let response = client.send_request(request).await?;
        Ok(response.into_body())
    }

    /// Resolves the transport client for the next dispatch, rebuilding it
    /// only when it has never been built or the handler changed since the
    /// last build.
    fn check_and_reset_client(&mut self) -> Result<Arc<dyn MessageHandler>, WrapperError> {
        match (&self.client, self.changed_handler) {
            (Some(client), false) => Ok(Arc::clone(client)),
            _ => {
                let built: Arc<dyn MessageHandler> = match &self.message_handler {
                    Some(handler) => Arc::clone(handler),
                    None => {
                        event!("building default transport (timeout {}s)", self.timeout_s);
                        Arc::new(HTTPClient::new(self.timeout_s)?)
                    }
                };
                self.client = Some(Arc::clone(&built));
                self.changed_handler = false;
                Ok(built)
            }
        }
    }

    fn run_endpoint_validators(&self, endpoint: &str) -> Result<(), WrapperError> {
        if self.endpoint_validators.iter().any(|validator| !validator(endpoint)) {
            return Err(WrapperError::InvalidEndpoint(endpoint.to_string()));
        }
        Ok(())
    }

    fn run_pre_requests(&mut self) {
        // The list is detached while running so each hook can take the
        // wrapper mutably. Hooks registered by a running hook land behind
        // the existing ones and only fire on the next call.
        let mut hooks = std::mem::take(&mut self.pre_requests);
        for hook in &mut hooks {
            hook(self);
        }
        let added = std::mem::take(&mut self.pre_requests);
        hooks.extend(added);
        self.pre_requests = hooks;
    }

    fn apply_endpoint_modifiers(&self, endpoint: &str) -> String {
        self.endpoint_modifiers
            .iter()
            .fold(endpoint.to_string(), |path, modifier| modifier(path))
    }

    fn full_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

/// Errors surfaced by [`RequestWrapper`] operations.
#[derive(Debug)]
pub enum WrapperError {
    /// A registered endpoint validator rejected the requested path.
    InvalidEndpoint(String),
    /// The operation is an intentionally unfinished placeholder.
    NotImplemented(&'static str),
    /// The underlying transport failed; forwarded without interpretation.
    Transport(RequestError),
}

impl fmt::Display for WrapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapperError::InvalidEndpoint(endpoint) => write!(f, "invalid endpoint: {endpoint}"),
            WrapperError::NotImplemented(what) => write!(f, "{what}"),
            WrapperError::Transport(source) => write!(f, "transport failed: {source}"),
        }
    }
}

impl std::error::Error for WrapperError {}

impl From<RequestError> for WrapperError {
    fn from(value: RequestError) -> Self { WrapperError::Transport(value) }
}
