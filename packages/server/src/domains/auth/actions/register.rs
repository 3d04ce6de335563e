//! Register action

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::common::{is_unique_violation, non_blank};
use crate::domains::auth::models::{NewUser, Role, User, UserLocation};
use crate::domains::auth::password::hash_password;
use crate::domains::organization::models::{Category, Format};
use crate::kernel::ServerDeps;

/// Registration payload. Everything is optional here so that missing fields
/// produce a readable message instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub category: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub location: Option<UserLocation>,
}

pub enum RegisterResult {
    Registered { token: String, user: User },
    Invalid(String),
    EmailTaken,
}

/// Check required fields and parse tags. Students skip the organization details.
///
/// The inner `Err` is a message for the caller; the outer one is a hashing failure.
fn validate(
    input: &RegisterInput,
    password_hash: impl FnOnce(&str) -> Result<String>,
) -> Result<Result<NewUser, String>> {
    let location = input.location.clone().unwrap_or_default();
    let (Some(name), Some(email), Some(password), Some(role), Some(_), Some(_)) = (
        non_blank(input.name.as_deref()),
        non_blank(input.email.as_deref()),
        input.password.as_deref().filter(|p| !p.is_empty()),
        non_blank(input.role.as_deref()),
        non_blank(location.city.as_deref()),
        non_blank(location.country.as_deref()),
    ) else {
        return Ok(Err("Missing required fields".to_string()));
    };

    let Ok(role) = role.parse::<Role>() else {
        return Ok(Err(format!("Invalid role: {}", role)));
    };

    let (category, format, description) = if role.is_student() {
        (None, None, None)
    } else {
        let (Some(category), Some(format), Some(description)) = (
            non_blank(input.category.as_deref()),
            non_blank(input.format.as_deref()),
            non_blank(input.description.as_deref()),
        ) else {
            return Ok(Err("Missing organization details".to_string()));
        };
        let category = match category.parse::<Category>() {
            Ok(c) => c,
            Err(e) => return Ok(Err(e.to_string())),
        };
        let format = match format.parse::<Format>() {
            Ok(f) => f,
            Err(e) => return Ok(Err(e.to_string())),
        };
        (Some(category), Some(format), Some(description.to_string()))
    };

    Ok(Ok(NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash(password)?,
        role,
        category,
        format,
        description,
        location,
    }))
}

/// Create an account and sign the user in.
#[instrument(skip(input, deps), fields(email = ?input.email, role = ?input.role))]
pub async fn register(input: RegisterInput, deps: &ServerDeps) -> Result<RegisterResult> {
    let new_user = match validate(&input, hash_password)? {
        Ok(new_user) => new_user,
        Err(message) => return Ok(RegisterResult::Invalid(message)),
    };

    if User::find_by_email(&new_user.email, &deps.db_pool)
        .await?
        .is_some()
    {
        return Ok(RegisterResult::EmailTaken);
    }

    let user = match User::insert(&new_user, &deps.db_pool).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => return Ok(RegisterResult::EmailTaken),
        Err(e) => return Err(e),
    };

    let token = deps.jwt_service.create_token(user.id, user.role)?;
    info!(user_id = %user.id, "User registered");

    Ok(RegisterResult::Registered { token, user })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_hash(password: &str) -> Result<String> {
        Ok(format!("hashed:{}", password))
    }

    fn student() -> RegisterInput {
        RegisterInput {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            password: Some("secret".to_string()),
            role: Some("student".to_string()),
            location: Some(UserLocation {
                city: Some("Toronto".to_string()),
                state: None,
                country: Some("Canada".to_string()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_student_needs_no_organization_details() {
        let new_user = validate(&student(), fake_hash).unwrap().unwrap();

        assert_eq!(new_user.role, Role::Student);
        assert_eq!(new_user.password_hash, "hashed:secret");
        assert!(new_user.category.is_none());
    }

    #[test]
    fn test_missing_country_is_rejected() {
        let mut input = student();
        input.location.as_mut().unwrap().country = Some(" ".to_string());

        let err = validate(&input, fake_hash).unwrap().unwrap_err();
        assert_eq!(err, "Missing required fields");
    }

    #[test]
    fn test_organization_role_requires_details() {
        let mut input = student();
        input.role = Some("nonprofit".to_string());
        input.category = Some("stem".to_string());

        let err = validate(&input, fake_hash).unwrap().unwrap_err();
        assert_eq!(err, "Missing organization details");

        input.format = Some("hybrid".to_string());
        input.description = Some("Robotics for teens".to_string());
        let new_user = validate(&input, fake_hash).unwrap().unwrap();
        assert_eq!(new_user.category, Some(Category::Stem));
        assert_eq!(new_user.format, Some(Format::Hybrid));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let mut input = student();
        input.role = Some("admin".to_string());

        let err = validate(&input, fake_hash).unwrap().unwrap_err();
        assert!(err.contains("admin"));
    }
}
