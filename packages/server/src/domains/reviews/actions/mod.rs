//! Review actions

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::common::{non_blank, OrganizationId, UserId};
use crate::domains::auth::models::User;
use crate::domains::organization::models::Organization;
use crate::domains::reviews::models::{Review, MAX_RATING, MIN_RATING};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewInput {
    /// Accepted as any JSON number so 4.5 is rejected as a rating, not as malformed JSON
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

pub enum CreateReviewResult {
    Created(Review),
    InvalidRating,
    OrganizationNotFound,
    ReviewerNotFound,
}

/// Whole number in 1..=5
pub fn validate_rating(rating: Option<f64>) -> Option<i32> {
    let rating = rating?;
    if rating.fract() != 0.0 {
        return None;
    }
    let min = f64::from(MIN_RATING);
    let max = f64::from(MAX_RATING);
    (min..=max).contains(&rating).then_some(rating as i32)
}

/// Rate an organization. Nothing is written unless every check passes.
#[instrument(skip(input, deps), fields(rating = ?input.rating))]
pub async fn create_review(
    organization_id: OrganizationId,
    reviewer_id: UserId,
    input: ReviewInput,
    deps: &ServerDeps,
) -> Result<CreateReviewResult> {
    let pool = &deps.db_pool;

    let Some(rating) = validate_rating(input.rating) else {
        return Ok(CreateReviewResult::InvalidRating);
    };
    if User::find_by_id(reviewer_id, pool).await?.is_none() {
        return Ok(CreateReviewResult::ReviewerNotFound);
    }
    if Organization::find_by_id(organization_id, pool).await?.is_none() {
        return Ok(CreateReviewResult::OrganizationNotFound);
    }

    let comment = non_blank(input.comment.as_deref());
    let review = Review::insert(organization_id, reviewer_id, rating, comment, pool).await?;
    info!(review_id = %review.id, %organization_id, %reviewer_id, "Review submitted");

    Ok(CreateReviewResult::Created(review))
}
