//! Login action

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::domains::auth::models::User;
use crate::domains::auth::password::verify_password;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub enum LoginResult {
    LoggedIn { token: String, user: User },
    /// Unknown email and wrong password are indistinguishable to the caller
    InvalidCredentials,
}

#[instrument(skip(input, deps), fields(email = ?input.email))]
pub async fn login(input: LoginInput, deps: &ServerDeps) -> Result<LoginResult> {
    let (Some(email), Some(password)) = (input.email.as_deref(), input.password.as_deref()) else {
        return Ok(LoginResult::InvalidCredentials);
    };

    let Some(user) = User::find_by_email(email, &deps.db_pool).await? else {
        warn!("Login for unknown email");
        return Ok(LoginResult::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        warn!(user_id = %user.id, "Login with wrong password");
        return Ok(LoginResult::InvalidCredentials);
    }

    let token = deps.jwt_service.create_token(user.id, user.role)?;
    info!(user_id = %user.id, "User logged in");

    Ok(LoginResult::LoggedIn { token, user })
}
