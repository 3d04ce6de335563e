use axum::{
    extract::{rejection::JsonRejection, Extension},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domains::auth::actions::{
    login, register, LoginInput, LoginResult, RegisterInput, RegisterResult,
};
use crate::domains::auth::models::User;
use crate::kernel::ServerDeps;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
}

async fn register_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    input: Result<Json<RegisterInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = input?;

    match register(input, &deps).await? {
        RegisterResult::Registered { token, user } => Ok(Json(json!({
            "message": "User created",
            "token": token,
            "user": user,
        }))),
        RegisterResult::Invalid(message) => Err(ApiError::Validation(message)),
        RegisterResult::EmailTaken => Err(ApiError::validation(
            "An account with this email already exists",
        )),
    }
}

async fn login_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    input: Result<Json<LoginInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = input?;

    match login(input, &deps).await? {
        LoginResult::LoggedIn { token, user } => Ok(Json(json!({ "token": token, "user": user }))),
        LoginResult::InvalidCredentials => Err(ApiError::validation("Invalid email or password")),
    }
}

async fn me_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    auth: AuthUser,
) -> ApiResult<Json<Value>> {
    let user = User::find_by_id(auth.user_id, &deps.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(json!({ "user": user })))
}
