//! Framework-neutral HTTP contract.
//!
//! Controllers and middleware are written against [`HttpRequest`],
//! [`HttpResponse`], [`Handler`] and [`Middleware`]; a [`ServerAdapter`]
//! binds them to a concrete engine. [`actix::ActixServerAdapter`] is the
//! production engine.
//!
//! A request runs through the global middleware, then the route's own
//! middleware, then the handler. Each middleware receives a [`Next`]
//! continuation and decides whether to call it. Errors returned anywhere in
//! the chain are rendered through [`crate::inbound::http::error`]; panics are
//! caught and rendered as a generic internal error.

pub mod actix;

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use serde_json::Value;
use tracing::error;

use crate::domain::Error;
use crate::inbound::http::error::write_error;

/// HTTP methods a route may be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine-independent view of an incoming request.
///
/// Header names are stored lower-cased. `body` is `Value::Null` when no body
/// was sent or its content type is not parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path plus query string as received.
    pub url: String,
    pub path: String,
    pub body: Value,
    /// Path parameters captured from `:name` segments.
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    /// Username attached by the authentication middleware.
    pub auth_user: Option<String>,
}

impl HttpRequest {
    /// Minimal request for `method` and `path`; other fields are empty.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            method,
            url: path.clone(),
            path,
            body: Value::Null,
            params: HashMap::new(),
            query: HashMap::new(),
            headers: HashMap::new(),
            auth_user: None,
        }
    }

    /// Builder-style header insertion; the name is lower-cased.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Builder-style path parameter insertion.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Builder-style body replacement.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Path parameter lookup.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Body written by a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

/// Engine-independent response writer.
///
/// `status` and `header` chain; `json` and `send` finish the response. The
/// status defaults to 200. Header names are unique ignoring case, so
/// `header` and `set_header` both replace an earlier value.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Option<ResponseBody>,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl HttpResponse {
    /// Fresh response with status 200 and no body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status code.
    pub fn status(&mut self, code: u16) -> &mut Self {
        self.status = code;
        self
    }

    /// Set a header; same as [`HttpResponse::set_header`].
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.set_header(name, value)
    }

    /// Replace any header with the same name, ignoring case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Finish with a JSON body.
    pub fn json(&mut self, body: Value) {
        self.body = Some(ResponseBody::Json(body));
    }

    /// Finish with a plain-text body.
    pub fn send(&mut self, body: impl Into<String>) {
        self.body = Some(ResponseBody::Text(body.into()));
    }

    /// Whether `json` or `send` has been called.
    pub fn is_sent(&self) -> bool {
        self.body.is_some()
    }

    /// Current status code.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        self.headers.as_slice()
    }

    /// First header value matching `name`, ignoring case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body, if one was written.
    pub fn body(&self) -> Option<&ResponseBody> {
        self.body.as_ref()
    }

    /// JSON body, if the response finished with one.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Some(ResponseBody::Json(value)) => Some(value),
            _ => None,
        }
    }
}

/// Terminal request handler.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle the request by writing to `res`. Returning `Err` renders the
    /// error envelope for the error's code.
    async fn handle(&self, req: &mut HttpRequest, res: &mut HttpResponse) -> Result<(), Error>;
}

/// Request interceptor with a continuation.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Inspect or modify the exchange; call `next.run` to continue the chain
    /// or finish `res` to short-circuit it.
    async fn handle(
        &self,
        req: &mut HttpRequest,
        res: &mut HttpResponse,
        next: Next<'_>,
    ) -> Result<(), Error>;
}

/// Remainder of a middleware chain.
pub struct Next<'a> {
    middleware: &'a [Arc<dyn Middleware>],
    handler: &'a dyn Handler,
}

impl<'a> Next<'a> {
    /// Chain over `middleware` ending in `handler`.
    pub fn new(middleware: &'a [Arc<dyn Middleware>], handler: &'a dyn Handler) -> Self {
        Self {
            middleware,
            handler,
        }
    }

    /// Run the next middleware, or the handler once none remain.
    pub async fn run(self, req: &mut HttpRequest, res: &mut HttpResponse) -> Result<(), Error> {
        match self.middleware.split_first() {
            Some((first, rest)) => {
                first
                    .handle(req, res, Next::new(rest, self.handler))
                    .await
            }
            None => self.handler.handle(req, res).await,
        }
    }
}

/// A route binding.
#[derive(Clone)]
pub struct RouteDefinition {
    pub method: HttpMethod,
    /// Path pattern using `:name` for parameters, e.g. `/users/:id`.
    pub path: String,
    pub handler: Arc<dyn Handler>,
    /// Route-specific middleware, run after global middleware, in order.
    pub middleware: Vec<Arc<dyn Middleware>>,
}

impl RouteDefinition {
    /// Route without route-specific middleware.
    pub fn new(method: HttpMethod, path: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        Self {
            method,
            path: path.into(),
            handler,
            middleware: Vec::new(),
        }
    }

    /// Append route-specific middleware.
    #[must_use]
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Prefix the path, e.g. `/api` + `/users` → `/api/users`.
    #[must_use]
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.path = format!("{}{}", prefix.trim_end_matches('/'), self.path);
        self
    }
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// Fully resolved middleware chain for one route.
#[derive(Clone)]
pub struct Pipeline {
    middleware: Vec<Arc<dyn Middleware>>,
    handler: Arc<dyn Handler>,
}

impl Pipeline {
    /// Chain `global` then `route` middleware in front of `handler`.
    pub fn new(
        global: &[Arc<dyn Middleware>],
        route: &[Arc<dyn Middleware>],
        handler: Arc<dyn Handler>,
    ) -> Self {
        let middleware = global.iter().chain(route).cloned().collect();
        Self {
            middleware,
            handler,
        }
    }

    /// Run the chain, rendering returned errors and caught panics.
    ///
    /// A chain that finishes without writing a body yields an internal
    /// error response.
    pub async fn dispatch(&self, req: &mut HttpRequest, res: &mut HttpResponse) {
        let next = Next::new(&self.middleware, self.handler.as_ref());
        let outcome = AssertUnwindSafe(next.run(req, res)).catch_unwind().await;
        match outcome {
            Ok(Ok(())) if res.is_sent() => {}
            Ok(Ok(())) => {
                error!(method = %req.method, path = %req.path, "handler finished without a response");
                write_error(res, &Error::internal("handler produced no response"));
            }
            Ok(Err(err)) => write_error(res, &err),
            Err(_) => {
                error!(method = %req.method, path = %req.path, "handler panicked");
                *res = HttpResponse::new();
                write_error(res, &Error::internal("handler panicked"));
            }
        }
    }
}

/// Failures raised by server adapters.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// `start` was called on a running adapter.
    #[error("server is already running")]
    AlreadyStarted,
}

/// Binds neutral routes to an HTTP engine.
#[async_trait(?Send)]
pub trait ServerAdapter {
    /// Register a route. Routes added after `start` take effect on the next
    /// start.
    fn add_route(&mut self, route: RouteDefinition);

    /// Register middleware that runs before every route's own middleware.
    fn add_middleware(&mut self, middleware: Arc<dyn Middleware>);

    /// Bind `addr` and begin serving; returns the bound address, which
    /// differs from `addr` when port 0 was requested.
    async fn start(&mut self, addr: &str) -> Result<SocketAddr, AdapterError>;

    /// Stop accepting connections and drain in-flight requests. A no-op when
    /// the server is not running.
    async fn stop(&mut self);
}
