//! User controllers.
//!
//! ```text
//! POST /api/users {"email":"ada@example.com","name":"Ada"}
//! GET  /api/users/:id
//! ```
//!
//! Controllers only check that required fields are present; every other
//! rule belongs to the use cases, whose errors are rendered by their
//! [`ErrorCode`](crate::domain::ErrorCode).

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;

use crate::application::{CreateUser, CreateUserRequest, GetUser};
use crate::domain::Error;
use crate::inbound::http::adapter::{Handler, HttpRequest, HttpResponse};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::schemas::UserSchema;

/// Collection path for users, used to build `Location` headers.
pub const USERS_PATH: &str = "/api/users";

/// Request body for `POST /api/users`.
///
/// Example JSON:
/// `{"email":"ada@example.com","name":"Ada Lovelace"}`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateUserBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Caller-chosen identifier; generated when omitted.
    pub id: Option<String>,
}

/// Response body for `POST /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CreatedUser {
    pub id: String,
    /// Path of the created resource.
    #[schema(example = "/api/users/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub location: String,
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Binds [`create_user`] to a [`CreateUser`] use case.
#[derive(Clone)]
pub struct CreateUserHandler {
    use_case: Arc<dyn CreateUser>,
}

impl CreateUserHandler {
    pub fn new(use_case: Arc<dyn CreateUser>) -> Self {
        Self { use_case }
    }
}

#[async_trait]
impl Handler for CreateUserHandler {
    async fn handle(&self, req: &mut HttpRequest, res: &mut HttpResponse) -> Result<(), Error> {
        create_user(self, req, res).await
    }
}

/// Create a user.
///
/// Responds `201 Created` with a `Location` header and `{id, location}`.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "User created", body = CreatedUser,
            headers(("Location" = String, description = "Path of the new user"))),
        (status = 400, description = "Missing or invalid fields", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credentials", body = ErrorEnvelope),
        (status = 409, description = "Identifier or email already in use", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security(("BasicAuth" = []))
)]
pub async fn create_user(
    handler: &CreateUserHandler,
    req: &HttpRequest,
    res: &mut HttpResponse,
) -> Result<(), Error> {
    let (Some(email), Some(name)) = (
        non_empty_str(&req.body, "email"),
        non_empty_str(&req.body, "name"),
    ) else {
        return Err(Error::validation("Email and name are required"));
    };

    let request = CreateUserRequest {
        email: email.to_owned(),
        name: name.to_owned(),
        id: req.body.get("id").and_then(Value::as_str).map(str::to_owned),
    };
    let id = handler.use_case.execute(request).await?;

    let location = format!("{USERS_PATH}/{id}");
    info!(user_id = %id, created_by = ?req.auth_user, "user created");
    let body = serde_json::to_value(CreatedUser {
        id: id.to_string(),
        location: location.clone(),
    })
    .map_err(|err| Error::internal(format!("failed to serialise created user: {err}")))?;
    res.status(201).header("Location", location).json(body);
    Ok(())
}

/// Binds [`get_user`] to a [`GetUser`] use case.
#[derive(Clone)]
pub struct GetUserHandler {
    use_case: Arc<dyn GetUser>,
}

impl GetUserHandler {
    pub fn new(use_case: Arc<dyn GetUser>) -> Self {
        Self { use_case }
    }
}

#[async_trait]
impl Handler for GetUserHandler {
    async fn handle(&self, req: &mut HttpRequest, res: &mut HttpResponse) -> Result<(), Error> {
        get_user(self, req, res).await
    }
}

/// Fetch a user by identifier.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = UserSchema),
        (status = 400, description = "Missing or blank identifier", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credentials", body = ErrorEnvelope),
        (status = 404, description = "No such user", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("BasicAuth" = []))
)]
pub async fn get_user(
    handler: &GetUserHandler,
    req: &HttpRequest,
    res: &mut HttpResponse,
) -> Result<(), Error> {
    let Some(id) = req.param("id").filter(|id| !id.is_empty()) else {
        return Err(Error::validation("User ID is required"));
    };

    let user = handler.use_case.execute(id).await?;
    let body = serde_json::to_value(&user)
        .map_err(|err| Error::internal(format!("failed to serialise user: {err}")))?;
    res.status(200).json(body);
    Ok(())
}
