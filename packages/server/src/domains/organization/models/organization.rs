use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{Coordinates, OrganizationId, UserId};
use crate::domains::geocoding::build_location_query;
use crate::domains::organization::models::{Category, Format};

/// Organization listed in the directory and placed on the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub category: Category,
    pub format: Format,
    pub description: String,
    pub website: Option<String>,
    pub instagram: String,
    pub linkedin: String,
    pub linktree: String,
    pub tiktok: String,
    pub location: OrganizationLocation,
    pub submitted_by: SubmittedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Free-text location plus the geocoded point, if any.
///
/// `coordinates == None` means "not yet geocoded".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl OrganizationLocation {
    /// Provider query for this location, e.g. `"Toronto, ON, Canada"`.
    pub fn query(&self) -> Option<String> {
        build_location_query(
            self.city.as_deref(),
            self.state.as_deref(),
            self.country.as_deref(),
        )
    }

    pub fn has_location_fields(&self) -> bool {
        self.query().is_some()
    }

    /// Missing coordinates and something to geocode them from.
    pub fn needs_geocoding(&self) -> bool {
        self.coordinates.is_none() && self.has_location_fields()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmittedBy {
    pub name: Option<String>,
    pub user_id: Option<UserId>,
}

/// Input for inserting a new organization
#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub category: Category,
    pub format: Format,
    pub description: String,
    pub website: Option<String>,
    pub instagram: String,
    pub linkedin: String,
    pub linktree: String,
    pub tiktok: String,
    pub location: OrganizationLocation,
    pub submitted_by: SubmittedBy,
}

/// Equality/substring filters for the directory listing
#[derive(Debug, Clone, Default)]
pub struct OrganizationListFilter {
    pub category: Option<Category>,
    pub format: Option<Format>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: OrganizationId,
    name: String,
    category: String,
    format: String,
    description: String,
    website: Option<String>,
    instagram: String,
    linkedin: String,
    linktree: String,
    tiktok: String,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    longitude: Option<f64>,
    latitude: Option<f64>,
    submitted_by_name: Option<String>,
    submitted_by_user_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = anyhow::Error;

    fn try_from(row: OrganizationRow) -> Result<Self> {
        let category = row
            .category
            .parse()
            .with_context(|| format!("organization {} has a bad category", row.id))?;
        let format = row
            .format
            .parse()
            .with_context(|| format!("organization {} has a bad format", row.id))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            category,
            format,
            description: row.description,
            website: row.website,
            instagram: row.instagram,
            linkedin: row.linkedin,
            linktree: row.linktree,
            tiktok: row.tiktok,
            location: OrganizationLocation {
                city: row.city,
                state: row.state,
                country: row.country,
                coordinates: Coordinates::from_columns(row.longitude, row.latitude),
            },
            submitted_by: SubmittedBy {
                name: row.submitted_by_name,
                user_id: row.submitted_by_user_id,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn from_rows(rows: Vec<OrganizationRow>) -> Result<Vec<Organization>> {
    rows.into_iter().map(Organization::try_from).collect()
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Organization {
    pub async fn find_by_id(id: OrganizationId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, OrganizationRow>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(Self::try_from).transpose()
    }

    /// Find organization by name, ignoring case
    pub async fn find_by_name_insensitive(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            "SELECT * FROM organizations WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name.trim())
        .fetch_optional(pool)
        .await?;
        row.map(Self::try_from).transpose()
    }

    /// Directory listing, newest first
    pub async fn list(filter: &OrganizationListFilter, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT * FROM organizations
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR format = $2)
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.format.map(|f| f.as_str()))
        .bind(filter.search.as_deref())
        .fetch_all(pool)
        .await?;
        from_rows(rows)
    }

    /// Organizations without coordinates that have at least one location field.
    ///
    /// Both halves of the condition must hold.
    pub async fn find_needing_geocode(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT * FROM organizations
            WHERE (longitude IS NULL OR latitude IS NULL)
              AND (
                    NULLIF(TRIM(city), '') IS NOT NULL
                 OR NULLIF(TRIM(state), '') IS NOT NULL
                 OR NULLIF(TRIM(country), '') IS NOT NULL
              )
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;
        from_rows(rows)
    }

    /// Insert new organization
    pub async fn insert(input: &NewOrganization, pool: &PgPool) -> Result<Self> {
        let coordinates = input.location.coordinates;
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO organizations (
                id, name, category, format, description, website,
                instagram, linkedin, linktree, tiktok,
                city, state, country, longitude, latitude,
                submitted_by_name, submitted_by_user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(OrganizationId::new())
        .bind(input.name.trim())
        .bind(input.category.as_str())
        .bind(input.format.as_str())
        .bind(&input.description)
        .bind(&input.website)
        .bind(&input.instagram)
        .bind(&input.linkedin)
        .bind(&input.linktree)
        .bind(&input.tiktok)
        .bind(&input.location.city)
        .bind(&input.location.state)
        .bind(&input.location.country)
        .bind(coordinates.map(|c| c.longitude()))
        .bind(coordinates.map(|c| c.latitude()))
        .bind(&input.submitted_by.name)
        .bind(input.submitted_by.user_id)
        .fetch_one(pool)
        .await?;
        Self::try_from(row)
    }

    /// Store geocoded coordinates. Returns `None` if the organization is gone.
    ///
    /// Plain overwrite: a concurrent writer's coordinates are replaced.
    pub async fn set_coordinates(
        id: OrganizationId,
        coordinates: Coordinates,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            UPDATE organizations
            SET longitude = $2, latitude = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(coordinates.longitude())
        .bind(coordinates.latitude())
        .fetch_optional(pool)
        .await?;
        row.map(Self::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(city: Option<&str>, state: Option<&str>, country: Option<&str>) -> OrganizationLocation {
        OrganizationLocation {
            city: city.map(String::from),
            state: state.map(String::from),
            country: country.map(String::from),
            coordinates: None,
        }
    }

    #[test]
    fn test_query_joins_present_parts_in_order() {
        let loc = location(Some("Toronto"), None, Some("Canada"));
        assert_eq!(loc.query().as_deref(), Some("Toronto, Canada"));
    }

    #[test]
    fn test_blank_fields_do_not_count_as_location() {
        let loc = location(Some("  "), Some(""), None);
        assert!(!loc.has_location_fields());
        assert!(!loc.needs_geocoding());
    }

    #[test]
    fn test_needs_geocoding_only_without_coordinates() {
        let mut loc = location(Some("Toronto"), None, None);
        assert!(loc.needs_geocoding());

        loc.coordinates = Some(Coordinates::new(-79.3832, 43.6532).unwrap());
        assert!(!loc.needs_geocoding());
    }
}
