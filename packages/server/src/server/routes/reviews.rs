use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::common::{OrganizationId, UserId};
use crate::domains::reviews::actions::{create_review, CreateReviewResult, ReviewInput};
use crate::domains::reviews::models::{OrganizationReview, Review, StudentReview};
use crate::kernel::ServerDeps;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(student_reviews_handler))
        .route(
            "/orgs/:org_id",
            get(organization_reviews_handler).post(create_review_handler),
        )
        .route("/orgs/:org_id/average", get(average_handler))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentReviewsQuery {
    student_id: Option<String>,
}

async fn student_reviews_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    query: Result<Query<StudentReviewsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<StudentReview>>> {
    let Query(query) = query?;
    let student_id = query
        .student_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::validation("studentId is required"))?;
    let student_id = UserId::parse(student_id.trim())
        .map_err(|_| ApiError::validation("studentId is not a valid id"))?;

    Ok(Json(Review::find_by_reviewer(student_id, &deps.db_pool).await?))
}

async fn organization_reviews_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    org_id: Result<Path<OrganizationId>, PathRejection>,
) -> ApiResult<Json<Vec<OrganizationReview>>> {
    let Path(org_id) = org_id?;
    Ok(Json(Review::find_for_organization(org_id, &deps.db_pool).await?))
}

async fn average_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    org_id: Result<Path<OrganizationId>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(org_id) = org_id?;
    let average = Review::average_for_organization(org_id, &deps.db_pool).await?;
    Ok(Json(json!({ "average": average })))
}

async fn create_review_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    user: AuthUser,
    org_id: Result<Path<OrganizationId>, PathRejection>,
    input: Result<Json<ReviewInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Path(org_id) = org_id?;
    let Json(input) = input?;

    match create_review(org_id, user.user_id, input, &deps).await? {
        CreateReviewResult::Created(review) => Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Review submitted successfully", "review": review })),
        )),
        CreateReviewResult::InvalidRating => Err(ApiError::validation("Invalid rating")),
        CreateReviewResult::ReviewerNotFound => Err(ApiError::not_found("User not found")),
        CreateReviewResult::OrganizationNotFound => {
            Err(ApiError::not_found("Organization not found"))
        }
    }
}
