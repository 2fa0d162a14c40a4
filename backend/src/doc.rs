//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every controller operation in the inbound layer
//! - **Schemas**: domain type wrappers from
//!   [`crate::inbound::http::schemas`] plus the HTTP DTOs
//! - **Security**: HTTP Basic authentication
//!
//! The document is served at `GET /api-docs/openapi.json` and exported via
//! `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::root::{Endpoints, ServiceInfo};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, HealthCheckSchema, HealthStatusSchema, SystemHealthSchema, UserSchema,
};
use crate::inbound::http::users::{CreateUserBody, CreatedUser};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the HTTP Basic security scheme.
pub const BASIC_AUTH_SCHEME: &str = "BasicAuth";

/// Enrich the generated document with the HTTP Basic security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BASIC_AUTH_SCHEME,
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Sprint Zero API",
        description = "User management and health endpoints for the service template."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::root::root,
        crate::inbound::http::health::health,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
    ),
    components(schemas(
        ErrorEnvelope,
        ErrorCodeSchema,
        UserSchema,
        CreateUserBody,
        CreatedUser,
        HealthStatusSchema,
        HealthCheckSchema,
        SystemHealthSchema,
        ServiceInfo,
        Endpoints
    )),
    tags(
        (name = "general", description = "Service metadata"),
        (name = "users", description = "Operations related to users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const USER_SCHEMA_NAME: &str = "crate.domain.User";
    const HEALTH_SCHEMA_NAME: &str = "crate.domain.SystemHealth";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_envelope_schema_has_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let envelope = schemas.get("ErrorEnvelope").expect("ErrorEnvelope schema");

        for field in ["error", "message", "timestamp", "traceId"] {
            assert_object_schema_has_field(envelope, field);
        }
    }

    #[test]
    fn domain_schemas_are_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        let user = schemas.get(USER_SCHEMA_NAME).expect("User schema");
        for field in ["id", "email", "name"] {
            assert_object_schema_has_field(user, field);
        }
        let health = schemas.get(HEALTH_SCHEMA_NAME).expect("SystemHealth schema");
        assert_object_schema_has_field(health, "checks");
    }

    #[test]
    fn basic_auth_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key(BASIC_AUTH_SCHEME));
    }

    #[test]
    fn user_operations_require_basic_auth() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("document serialises");
        assert_eq!(
            json["paths"]["/api/users"]["post"]["security"],
            serde_json::json!([{ BASIC_AUTH_SCHEME: [] }])
        );
        assert!(json["paths"]["/api/health"]["get"].is_object());
    }
}
