//! Route tables for the HTTP surface.
//!
//! | Method | Path                     | Auth  |
//! |--------|--------------------------|-------|
//! | GET    | `/`                      | none  |
//! | GET    | `/api-docs/openapi.json` | none  |
//! | GET    | `/api/health`            | none  |
//! | POST   | `/api/users`             | Basic |
//! | GET    | `/api/users/:id`         | Basic |

use std::sync::Arc;

use crate::application::{CheckHealth, CreateUser, GetUser};
use crate::inbound::http::adapter::{HttpMethod, Middleware, RouteDefinition};
use crate::inbound::http::health::HealthHandler;
use crate::inbound::http::root::{OPENAPI_PATH, OpenApiHandler, RootHandler, ServiceInfo};
use crate::inbound::http::users::{CreateUserHandler, GetUserHandler};

/// Prefix shared by the JSON API routes.
pub const API_PREFIX: &str = "/api";

/// User routes, each guarded by `auth`.
pub fn user_routes(
    create: Arc<dyn CreateUser>,
    get: Arc<dyn GetUser>,
    auth: Arc<dyn Middleware>,
) -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::new(
            HttpMethod::Post,
            "/users",
            Arc::new(CreateUserHandler::new(create)),
        )
        .with_middleware(auth.clone())
        .prefixed(API_PREFIX),
        RouteDefinition::new(
            HttpMethod::Get,
            "/users/:id",
            Arc::new(GetUserHandler::new(get)),
        )
        .with_middleware(auth)
        .prefixed(API_PREFIX),
    ]
}

/// Public health route.
pub fn health_routes(check: Arc<dyn CheckHealth>) -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::new(
            HttpMethod::Get,
            "/health",
            Arc::new(HealthHandler::new(check)),
        )
        .prefixed(API_PREFIX),
    ]
}

/// Service metadata and OpenAPI document routes.
pub fn root_routes(info: ServiceInfo) -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::new(HttpMethod::Get, "/", Arc::new(RootHandler::new(info))),
        RouteDefinition::new(HttpMethod::Get, OPENAPI_PATH, Arc::new(OpenApiHandler)),
    ]
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::application::{MockCheckHealth, MockCreateUser, MockGetUser};
    use crate::inbound::http::middleware::RequestTrace;
    use rstest::rstest;

    fn summary(routes: &[RouteDefinition]) -> Vec<(HttpMethod, &str, usize)> {
        routes
            .iter()
            .map(|route| (route.method, route.path.as_str(), route.middleware.len()))
            .collect()
    }

    #[rstest]
    fn user_routes_are_prefixed_and_guarded() {
        let routes = user_routes(
            Arc::new(MockCreateUser::new()),
            Arc::new(MockGetUser::new()),
            Arc::new(RequestTrace),
        );
        assert_eq!(
            summary(&routes),
            [
                (HttpMethod::Post, "/api/users", 1),
                (HttpMethod::Get, "/api/users/:id", 1),
            ]
        );
    }

    #[rstest]
    fn health_and_root_routes_are_public() {
        let mut routes = health_routes(Arc::new(MockCheckHealth::new()));
        routes.extend(root_routes(ServiceInfo::default()));
        assert_eq!(
            summary(&routes),
            [
                (HttpMethod::Get, "/api/health", 0),
                (HttpMethod::Get, "/", 0),
                (HttpMethod::Get, OPENAPI_PATH, 0),
            ]
        );
    }
}
