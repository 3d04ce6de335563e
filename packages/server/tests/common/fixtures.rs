//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use credimap_core::common::Coordinates;
use credimap_core::domains::auth::models::{NewUser, Role, User, UserLocation};
use credimap_core::domains::auth::JwtService;
use credimap_core::domains::organization::models::{
    Category, Format, NewOrganization, Organization, OrganizationLocation, SubmittedBy,
};
use sqlx::PgPool;

/// Create a user with a placeholder password hash and return it with a token
pub async fn create_test_user(
    pool: &PgPool,
    jwt: &JwtService,
    email: &str,
    role: Role,
) -> Result<(User, String)> {
    let user = User::insert(
        &NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role,
            category: None,
            format: None,
            description: None,
            location: UserLocation {
                city: Some("Toronto".to_string()),
                state: Some("ON".to_string()),
                country: Some("Canada".to_string()),
            },
        },
        pool,
    )
    .await?;
    let token = jwt.create_token(user.id, user.role)?;
    Ok((user, token))
}

/// Create an organization with the given location parts
pub async fn create_test_org(
    pool: &PgPool,
    name: &str,
    city: Option<&str>,
    state: Option<&str>,
    country: Option<&str>,
    coordinates: Option<Coordinates>,
) -> Result<Organization> {
    Organization::insert(
        &NewOrganization {
            name: name.to_string(),
            category: Category::Stem,
            format: Format::InPerson,
            description: "Robotics club".to_string(),
            website: None,
            instagram: String::new(),
            linkedin: String::new(),
            linktree: String::new(),
            tiktok: String::new(),
            location: OrganizationLocation {
                city: city.map(String::from),
                state: state.map(String::from),
                country: country.map(String::from),
                coordinates,
            },
            submitted_by: SubmittedBy::default(),
        },
        pool,
    )
    .await
}

pub async fn create_toronto_org(pool: &PgPool, name: &str) -> Result<Organization> {
    create_test_org(pool, name, Some("Toronto"), Some("ON"), Some("Canada"), None).await
}

