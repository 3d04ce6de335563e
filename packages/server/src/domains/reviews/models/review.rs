use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{OrganizationId, ReviewId, UserId};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A student's rating of an organization
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub organization_id: OrganizationId,
    pub reviewer_id: UserId,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review as shown on an organization page
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrganizationReview {
    pub id: ReviewId,
    pub reviewer_id: UserId,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review as shown on a student's profile
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentReview {
    pub org_name: String,
    pub rating: i32,
    pub text: Option<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Review {
    pub async fn insert(
        organization_id: OrganizationId,
        reviewer_id: UserId,
        rating: i32,
        comment: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, organization_id, reviewer_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(ReviewId::new())
        .bind(organization_id)
        .bind(reviewer_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(pool)
        .await?;
        Ok(review)
    }

    /// Reviews of one organization with reviewer names, newest first
    pub async fn find_for_organization(
        organization_id: OrganizationId,
        pool: &PgPool,
    ) -> Result<Vec<OrganizationReview>> {
        let reviews = sqlx::query_as::<_, OrganizationReview>(
            r#"
            SELECT r.id, r.reviewer_id, u.name AS reviewer_name,
                   r.rating, r.comment, r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.reviewer_id
            WHERE r.organization_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }

    /// Reviews written by one user, newest first
    pub async fn find_by_reviewer(reviewer_id: UserId, pool: &PgPool) -> Result<Vec<StudentReview>> {
        let reviews = sqlx::query_as::<_, StudentReview>(
            r#"
            SELECT o.name AS org_name, r.rating, r.comment AS text
            FROM reviews r
            JOIN organizations o ON o.id = r.organization_id
            WHERE r.reviewer_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(reviewer_id)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }

    /// Mean rating, 0 when the organization has no reviews
    pub async fn average_for_organization(
        organization_id: OrganizationId,
        pool: &PgPool,
    ) -> Result<f64> {
        let average = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(AVG(rating)::float8, 0) FROM reviews WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(pool)
        .await?;
        Ok(average)
    }
}
