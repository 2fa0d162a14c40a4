//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their corresponding
//! domain types but live in the inbound adapter layer where framework
//! concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "ValidationError")]
    Validation,
    /// The resource already exists.
    #[schema(rename = "ConflictError")]
    Conflict,
    /// The requested resource does not exist.
    #[schema(rename = "NotFoundError")]
    NotFound,
    /// Authentication failed or is missing.
    #[schema(rename = "UnauthorizedError")]
    Unauthorized,
    /// An unexpected error occurred on the server.
    #[schema(rename = "InternalServerError")]
    Internal,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Stable user identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Normalised, lower-case email address.
    #[schema(example = "ada@example.com")]
    email: String,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::HealthStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::HealthStatus)]
pub enum HealthStatusSchema {
    #[schema(rename = "healthy")]
    Healthy,
    #[schema(rename = "degraded")]
    Degraded,
    #[schema(rename = "unhealthy")]
    Unhealthy,
}

/// OpenAPI schema for [`crate::domain::HealthCheck`].
#[derive(ToSchema)]
#[schema(as = crate::domain::HealthCheck)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct HealthCheckSchema {
    /// Probe name.
    #[schema(example = "memory")]
    name: String,
    status: HealthStatusSchema,
    /// Probe detail text.
    #[schema(example = "Memory: 42MB/512MB")]
    message: Option<String>,
    /// RFC 3339 instant the probe ran.
    #[schema(format = DateTime)]
    timestamp: String,
}

/// OpenAPI schema for [`crate::domain::SystemHealth`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SystemHealth)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SystemHealthSchema {
    status: HealthStatusSchema,
    checks: Vec<HealthCheckSchema>,
    /// RFC 3339 instant the report was assembled.
    #[schema(format = DateTime)]
    timestamp: String,
}
