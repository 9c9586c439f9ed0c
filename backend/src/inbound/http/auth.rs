//! Auth API handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"alice","password":"secret"}
//! POST /api/v1/login    {"username":"alice","password":"secret"}
//! GET  /api/v1/me
//! POST /api/v1/logout
//! ```
//!
//! Field-level rejections are `422` with `{"errors":[...]}`; infrastructure
//! failures use the shared [`Error`] envelope.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{AuthOutcome, Credentials, Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::CookieSession;
use crate::inbound::http::state::HttpState;

/// Body shared by `register` and `login`.
#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "secret", format = Password)]
    pub password: String,
}

impl From<CredentialsRequest> for Credentials {
    fn from(value: CredentialsRequest) -> Self {
        Credentials::new(value.username, value.password)
    }
}

fn outcome_response(outcome: AuthOutcome, success: StatusCode) -> HttpResponse {
    let status = match outcome {
        AuthOutcome::User(_) => success,
        AuthOutcome::Errors(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    HttpResponse::build(status).json(outcome)
}

/// Create an account.
///
/// Does not log the caller in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User created", body = AuthOutcome),
        (status = 400, description = "Malformed body", body = Error),
        (status = 422, description = "Rejected credentials", body = AuthOutcome),
        (status = 503, description = "Dependency unavailable; retry", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::from(payload.into_inner());
    let outcome = state.auth.register(&credentials).await?;
    Ok(outcome_response(outcome, StatusCode::CREATED))
}

/// Authenticate and bind the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (
            status = 200,
            description = "Login success",
            body = AuthOutcome,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Malformed body", body = Error),
        (status = 422, description = "Rejected credentials", body = AuthOutcome),
        (status = 503, description = "Dependency unavailable; retry", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: CookieSession,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::from(payload.into_inner());
    let outcome = state.auth.login(&credentials, &session).await?;
    Ok(outcome_response(outcome, StatusCode::OK))
}

/// Current user, or `null` when the caller has no live session.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user or null", body = Option<User>),
        (status = 503, description = "Dependency unavailable; retry", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: CookieSession,
) -> ApiResult<web::Json<Option<User>>> {
    let user = state.auth.me(&session).await?;
    Ok(web::Json(user))
}

/// Revoke the session. Succeeds without a session too.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 503, description = "Dependency unavailable; retry", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: CookieSession,
) -> ApiResult<HttpResponse> {
    state.auth.logout(&session).await?;
    Ok(HttpResponse::NoContent().finish())
}
