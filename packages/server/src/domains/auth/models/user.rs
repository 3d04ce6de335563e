use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::UserId;
use crate::domains::organization::models::{Category, Format};

/// Account role. Everything except `Student` represents an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Nonprofit,
    Company,
    Youthorg,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Nonprofit => "nonprofit",
            Self::Company => "company",
            Self::Youthorg => "youthorg",
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Self::Student)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "nonprofit" => Ok(Self::Nonprofit),
            "company" => Ok(Self::Company),
            "youthorg" => Ok(Self::Youthorg),
            other => Err(anyhow!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Account holder. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub category: Option<Category>,
    pub format: Option<Format>,
    pub description: Option<String>,
    pub location: UserLocation,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub category: Option<Category>,
    pub format: Option<Format>,
    pub description: Option<String>,
    pub location: UserLocation,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    category: Option<String>,
    format: Option<String>,
    description: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        let role = row
            .role
            .parse()
            .with_context(|| format!("user {} has a bad role", row.id))?;
        let category = row
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .with_context(|| format!("user {} has a bad category", row.id))?;
        let format = row
            .format
            .as_deref()
            .map(str::parse::<Format>)
            .transpose()
            .with_context(|| format!("user {} has a bad format", row.id))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            category,
            format,
            description: row.description,
            location: UserLocation {
                city: row.city,
                state: row.state,
                country: row.country,
            },
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(Self::try_from).transpose()
    }

    /// Find user by email, ignoring case
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let row =
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
                .bind(email.trim())
                .fetch_optional(pool)
                .await?;
        row.map(Self::try_from).transpose()
    }

    pub async fn insert(input: &NewUser, pool: &PgPool) -> Result<Self> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (
                id, name, email, password_hash, role,
                category, format, description, city, state, country
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(UserId::new())
        .bind(input.name.trim())
        .bind(input.email.trim())
        .bind(&input.password_hash)
        .bind(input.role.as_str())
        .bind(input.category.map(|c| c.as_str()))
        .bind(input.format.map(|f| f.as_str()))
        .bind(&input.description)
        .bind(&input.location.city)
        .bind(&input.location.state)
        .bind(&input.location.country)
        .fetch_one(pool)
        .await?;
        Self::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("Student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("youthorg".parse::<Role>().unwrap(), Role::Youthorg);
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Nonprofit.to_string(), "nonprofit");
        assert!(Role::Student.is_student());
        assert!(!Role::Company.is_student());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            id: UserId::new(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Student,
            category: None,
            format: None,
            description: None,
            location: UserLocation::default(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "student");
        assert_eq!(json["email"], "ada@example.com");
    }
}
