use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, rejection::QueryRejection},
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::common::OrganizationId;
use crate::domains::map::MapView;
use crate::domains::organization::actions::{
    geocode_all_organizations, geocode_organization, get_organization_detail,
    list_organizations, organization_map, submit_organization, GeocodeOrganizationResult,
    ListOrganizationsQuery, MapQuery, OrganizationDetail, SubmitOrganizationInput,
    SubmitOrganizationResult,
};
use crate::domains::organization::models::Organization;
use crate::kernel::ServerDeps;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_handler))
        .route("/map", get(map_handler))
        .route("/submit", post(submit_handler))
        .route("/geocode-all", post(geocode_all_handler))
        .route("/:id", get(detail_handler))
        .route("/:id/geocode", post(geocode_handler))
}

async fn list_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    query: Result<Query<ListOrganizationsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Organization>>> {
    let Query(query) = query?;
    Ok(Json(list_organizations(query, &deps).await?))
}

async fn detail_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    id: Result<Path<OrganizationId>, PathRejection>,
) -> ApiResult<Json<OrganizationDetail>> {
    let Path(id) = id?;
    get_organization_detail(id, &deps)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Organization not found"))
}

async fn map_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    query: Result<Query<MapQuery>, QueryRejection>,
) -> ApiResult<Json<MapView>> {
    let Query(query) = query?;
    Ok(Json(organization_map(query, &deps).await?))
}

async fn submit_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    user: AuthUser,
    input: Result<Json<SubmitOrganizationInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(input) = input?;

    match submit_organization(input, user.user_id, &deps).await? {
        SubmitOrganizationResult::Submitted(org) => Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Organization submitted successfully!", "org": org })),
        )),
        SubmitOrganizationResult::Invalid(message) => Err(ApiError::Validation(message)),
        SubmitOrganizationResult::DuplicateName => Err(ApiError::validation(
            "An organization with this name already exists",
        )),
    }
}

async fn geocode_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    id: Result<Path<OrganizationId>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;

    match geocode_organization(id, &deps).await? {
        GeocodeOrganizationResult::Geocoded(org) => {
            Ok(Json(json!({ "message": "Geocoded successfully", "org": org })))
        }
        GeocodeOrganizationResult::NotFound => Err(ApiError::not_found("Organization not found")),
        GeocodeOrganizationResult::NoLocation => Err(ApiError::not_found(
            "Organization has no location data",
        )),
        GeocodeOrganizationResult::NotGeocoded => {
            Err(ApiError::not_found("Could not geocode location"))
        }
    }
}

async fn geocode_all_handler(Extension(deps): Extension<Arc<ServerDeps>>) -> ApiResult<Json<Value>> {
    let results = geocode_all_organizations(&deps).await?;
    Ok(Json(json!({ "message": "Batch geocoding complete", "results": results })))
}
