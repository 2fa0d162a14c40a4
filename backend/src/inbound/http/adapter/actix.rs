//! actix-web engine for the neutral HTTP contract.
//!
//! Each [`RouteDefinition`] becomes an actix resource whose handler converts
//! the actix request into an [`HttpRequest`], runs the route's [`Pipeline`]
//! and converts the resulting [`HttpResponse`] back. Requests that match no
//! route, including a known path with an unregistered method, get a JSON 404
//! after passing through the global middleware, so they still carry a trace
//! identifier.

use std::collections::BTreeMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::{Method, StatusCode};
use actix_web::{App, HttpServer, web};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::form_urlencoded;

use super::{
    AdapterError, Handler, HttpMethod, HttpRequest, HttpResponse, Middleware, Pipeline,
    ResponseBody, RouteDefinition, ServerAdapter,
};
use crate::domain::Error;

/// Default request body limit in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 256 * 1024;

/// Tuning for [`ActixServerAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Parse `application/json` bodies into [`HttpRequest::body`].
    pub parse_json: bool,
    /// Parse `application/x-www-form-urlencoded` bodies into a JSON object
    /// of strings.
    pub parse_urlencoded: bool,
    /// Maximum accepted body size in bytes.
    pub body_limit: usize,
    /// Seconds in-flight requests may take to finish after `stop`.
    pub shutdown_timeout_secs: u64,
    /// Worker count; actix picks one per core when unset.
    pub workers: Option<usize>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            parse_json: true,
            parse_urlencoded: true,
            body_limit: DEFAULT_BODY_LIMIT,
            shutdown_timeout_secs: 30,
            workers: None,
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
        }
    }
}

impl TryFrom<&Method> for HttpMethod {
    type Error = ();

    fn try_from(value: &Method) -> Result<Self, Self::Error> {
        match value.as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            _ => Err(()),
        }
    }
}

/// Translate `/users/:id` into actix's `/users/{id}`.
pub fn to_actix_path(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

struct RejectRequest(Error);

#[async_trait]
impl Handler for RejectRequest {
    async fn handle(&self, _req: &mut HttpRequest, _res: &mut HttpResponse) -> Result<(), Error> {
        Err(self.0.clone())
    }
}

struct RouteNotFound;

#[async_trait]
impl Handler for RouteNotFound {
    async fn handle(&self, req: &mut HttpRequest, _res: &mut HttpResponse) -> Result<(), Error> {
        Err(Error::not_found(format!(
            "Route {} {} not found",
            req.method, req.path
        )))
    }
}

/// Route table in a form actix can mount; cheap to clone per worker.
///
/// Use [`ActixRoutes::configure`] with `App::configure` to mount the routes
/// into an in-process `actix_web::test` service.
#[derive(Clone)]
pub struct ActixRoutes {
    config: AdapterConfig,
    global: Arc<[Arc<dyn Middleware>]>,
    resources: Arc<BTreeMap<String, Vec<(HttpMethod, Arc<Pipeline>)>>>,
}

impl ActixRoutes {
    /// Resolve `routes` against the `global` middleware.
    pub fn new(
        config: AdapterConfig,
        global: &[Arc<dyn Middleware>],
        routes: &[RouteDefinition],
    ) -> Self {
        let mut resources: BTreeMap<String, Vec<(HttpMethod, Arc<Pipeline>)>> = BTreeMap::new();
        for route in routes {
            let pipeline = Pipeline::new(global, &route.middleware, route.handler.clone());
            resources
                .entry(to_actix_path(&route.path))
                .or_default()
                .push((route.method, Arc::new(pipeline)));
        }
        Self {
            config,
            global: global.iter().cloned().collect(),
            resources: Arc::new(resources),
        }
    }

    /// Mount every route plus the JSON not-found fallback.
    ///
    /// A known path requested with an unregistered method gets the same
    /// fallback, so it is traced and answered with the error envelope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::PayloadConfig::new(self.config.body_limit));
        for (path, methods) in self.resources.iter() {
            let fallback = self.clone();
            let mut resource = web::resource(path.as_str()).default_service(web::to(
                move |req: actix_web::HttpRequest, body: web::Bytes| {
                    let routes = fallback.clone();
                    async move { routes.not_found(&req, &body).await }
                },
            ));
            for (method, pipeline) in methods {
                let routes = self.clone();
                let pipeline = pipeline.clone();
                let method = *method;
                resource = resource.route(web::method(method.into()).to(
                    move |req: actix_web::HttpRequest, body: web::Bytes| {
                        let routes = routes.clone();
                        let pipeline = pipeline.clone();
                        async move { routes.serve(method, &pipeline, &req, &body).await }
                    },
                ));
            }
            cfg.service(resource);
        }

        let routes = self.clone();
        cfg.default_service(web::to(
            move |req: actix_web::HttpRequest, body: web::Bytes| {
                let routes = routes.clone();
                async move { routes.not_found(&req, &body).await }
            },
        ));
    }

    async fn serve(
        &self,
        method: HttpMethod,
        pipeline: &Pipeline,
        req: &actix_web::HttpRequest,
        body: &[u8],
    ) -> actix_web::HttpResponse {
        let mut request = self.to_neutral(method, req);
        let mut response = HttpResponse::new();
        match self.parse_body(req, body) {
            Ok(parsed) => {
                request.body = parsed;
                pipeline.dispatch(&mut request, &mut response).await;
            }
            Err(err) => {
                let reject = Pipeline::new(&self.global, &[], Arc::new(RejectRequest(err)));
                reject.dispatch(&mut request, &mut response).await;
            }
        }
        to_actix(&response)
    }

    async fn not_found(&self, req: &actix_web::HttpRequest, body: &[u8]) -> actix_web::HttpResponse {
        let method = HttpMethod::try_from(req.method()).unwrap_or(HttpMethod::Get);
        debug!(method = %req.method(), path = %req.path(), "no route matched");
        self.serve(
            method,
            &Pipeline::new(&self.global, &[], Arc::new(RouteNotFound)),
            req,
            body,
        )
        .await
    }

    fn to_neutral(&self, method: HttpMethod, req: &actix_web::HttpRequest) -> HttpRequest {
        let mut request = HttpRequest::new(method, req.path());
        request.url = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path().to_owned(), |pq| pq.as_str().to_owned());
        request.params = req
            .match_info()
            .iter()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect();
        request.query = form_urlencoded::parse(req.query_string().as_bytes())
            .into_owned()
            .collect();
        for (name, value) in req.headers() {
            match value.to_str() {
                Ok(value) => {
                    request
                        .headers
                        .insert(name.as_str().to_ascii_lowercase(), value.to_owned());
                }
                Err(_) => debug!(header = %name, "skipping non-ASCII header value"),
            }
        }
        request
    }

    fn parse_body(&self, req: &actix_web::HttpRequest, body: &[u8]) -> Result<Value, Error> {
        if body.is_empty() {
            return Ok(Value::Null);
        }
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match content_type.as_str() {
            "application/json" if self.config.parse_json => serde_json::from_slice(body)
                .map_err(|err| {
                    debug!(error = %err, "rejecting malformed JSON body");
                    Error::validation("Malformed JSON body")
                }),
            "application/x-www-form-urlencoded" if self.config.parse_urlencoded => {
                let fields: Map<String, Value> = form_urlencoded::parse(body)
                    .into_owned()
                    .map(|(name, value)| (name, Value::String(value)))
                    .collect();
                Ok(Value::Object(fields))
            }
            _ => Ok(Value::Null),
        }
    }
}

fn to_actix(response: &HttpResponse) -> actix_web::HttpResponse {
    let status = StatusCode::from_u16(response.status_code()).unwrap_or_else(|_| {
        warn!(status = response.status_code(), "invalid status code; sending 500");
        StatusCode::INTERNAL_SERVER_ERROR
    });
    let mut builder = actix_web::HttpResponse::build(status);
    for (name, value) in response.headers() {
        builder.append_header((name.as_str(), value.as_str()));
    }
    match response.body() {
        Some(ResponseBody::Json(value)) => builder.json(value),
        Some(ResponseBody::Text(text)) => builder
            .content_type("text/plain; charset=utf-8")
            .body(text.clone()),
        None => builder.finish(),
    }
}

struct Running {
    handle: ServerHandle,
    task: JoinHandle<std::io::Result<()>>,
}

/// [`ServerAdapter`] backed by `actix_web::HttpServer`.
///
/// Must be started from within an actix system or a tokio `LocalSet`, as
/// the server future is spawned locally.
pub struct ActixServerAdapter {
    config: AdapterConfig,
    routes: Vec<RouteDefinition>,
    middleware: Vec<Arc<dyn Middleware>>,
    running: Option<Running>,
}

impl Default for ActixServerAdapter {
    fn default() -> Self {
        Self::new(AdapterConfig::default())
    }
}

impl ActixServerAdapter {
    /// Adapter with no routes or middleware.
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            config,
            routes: Vec::new(),
            middleware: Vec::new(),
            running: None,
        }
    }

    /// Snapshot of the current route table for mounting in an actix `App`.
    pub fn routes(&self) -> ActixRoutes {
        ActixRoutes::new(self.config.clone(), &self.middleware, &self.routes)
    }

    /// Registered routes in registration order.
    pub fn route_definitions(&self) -> &[RouteDefinition] {
        self.routes.as_slice()
    }

    /// Whether the listener is currently running.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

#[async_trait(?Send)]
impl ServerAdapter for ActixServerAdapter {
    fn add_route(&mut self, route: RouteDefinition) {
        debug!(method = %route.method, path = %route.path, "registering route");
        self.routes.push(route);
    }

    fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    async fn start(&mut self, addr: &str) -> Result<SocketAddr, AdapterError> {
        if self.running.is_some() {
            return Err(AdapterError::AlreadyStarted);
        }
        let bind_error = |source| AdapterError::Bind {
            addr: addr.to_owned(),
            source,
        };

        let listener = TcpListener::bind(addr).map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let routes = self.routes();
        let mut server = HttpServer::new(move || App::new().configure(|cfg| routes.configure(cfg)))
            .disable_signals()
            .shutdown_timeout(self.config.shutdown_timeout_secs);
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }
        let server = server.listen(listener).map_err(bind_error)?.run();
        let handle = server.handle();
        let task = actix_web::rt::spawn(server);

        info!(addr = %local_addr, routes = self.routes.len(), "HTTP server listening");
        self.running = Some(Running { handle, task });
        Ok(local_addr)
    }

    async fn stop(&mut self) {
        let Some(Running { handle, task }) = self.running.take() else {
            return;
        };
        handle.stop(true).await;
        match task.await {
            Ok(Ok(())) => info!("HTTP server stopped"),
            Ok(Err(err)) => warn!(error = %err, "HTTP server exited with an error"),
            Err(err) => warn!(error = %err, "HTTP server task failed"),
        }
    }
}
