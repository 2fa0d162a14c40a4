//! Service metadata and OpenAPI document controllers.
//!
//! ```text
//! GET /
//! GET /api-docs/openapi.json
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::doc::ApiDoc;
use crate::domain::Error;
use crate::inbound::http::adapter::{Handler, HttpRequest, HttpResponse};

/// Path serving the OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Well-known endpoint paths advertised by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Endpoints {
    #[schema(example = "/api/health")]
    pub health: String,
    #[schema(example = "/api/users")]
    pub users: String,
    #[schema(example = "/api-docs/openapi.json")]
    pub openapi: String,
}

/// Response body for `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ServiceInfo {
    #[schema(example = "Sprint Zero API")]
    pub message: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    pub endpoints: Endpoints,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            message: "Sprint Zero API".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            endpoints: Endpoints {
                health: "/api/health".to_owned(),
                users: "/api/users".to_owned(),
                openapi: OPENAPI_PATH.to_owned(),
            },
        }
    }
}

/// Serves [`ServiceInfo`].
#[derive(Debug, Clone, Default)]
pub struct RootHandler {
    info: ServiceInfo,
}

impl RootHandler {
    pub fn new(info: ServiceInfo) -> Self {
        Self { info }
    }
}

#[async_trait]
impl Handler for RootHandler {
    async fn handle(&self, _req: &mut HttpRequest, res: &mut HttpResponse) -> Result<(), Error> {
        root(self, res)
    }
}

/// Describe the service and its main endpoints.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service metadata", body = ServiceInfo)),
    tags = ["general"],
    operation_id = "root",
    security([])
)]
pub fn root(handler: &RootHandler, res: &mut HttpResponse) -> Result<(), Error> {
    let body = serde_json::to_value(&handler.info)
        .map_err(|err| Error::internal(format!("failed to serialise service info: {err}")))?;
    res.status(200).json(body);
    Ok(())
}

/// Serves the generated OpenAPI document as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiHandler;

#[async_trait]
impl Handler for OpenApiHandler {
    async fn handle(&self, _req: &mut HttpRequest, res: &mut HttpResponse) -> Result<(), Error> {
        let body = serde_json::to_value(ApiDoc::openapi())
            .map_err(|err| Error::internal(format!("failed to serialise OpenAPI document: {err}")))?;
        res.status(200).json(body);
        Ok(())
    }
}
