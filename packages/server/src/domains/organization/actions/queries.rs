//! Organization query actions
//!
//! Read operations behind the directory, detail page and map.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::common::{non_blank, OrganizationId};
use crate::domains::map::{build_map_view, MapFilter, MapView, MIN_ZOOM};
use crate::domains::organization::models::{
    Category, Format, Organization, OrganizationListFilter,
};
use crate::domains::reviews::models::{OrganizationReview, Review};
use crate::kernel::ServerDeps;

/// Raw directory query string; tags are parsed here
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListOrganizationsQuery {
    pub category: Option<String>,
    pub format: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapQuery {
    pub category: Option<String>,
    pub format: Option<String>,
    pub city: Option<String>,
    pub zoom: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationDetail {
    #[serde(flatten)]
    pub organization: Organization,
    pub reviews: Vec<OrganizationReview>,
    pub average_rating: f64,
}

/// Directory listing, newest first.
///
/// A category or format that names no known tag matches nothing.
pub async fn list_organizations(
    query: ListOrganizationsQuery,
    deps: &ServerDeps,
) -> Result<Vec<Organization>> {
    let mut filter = OrganizationListFilter {
        search: non_blank(query.search.as_deref()).map(String::from),
        ..Default::default()
    };
    if let Some(category) = non_blank(query.category.as_deref()) {
        let Ok(category) = category.parse::<Category>() else {
            return Ok(Vec::new());
        };
        filter.category = Some(category);
    }
    if let Some(format) = non_blank(query.format.as_deref()) {
        let Ok(format) = format.parse::<Format>() else {
            return Ok(Vec::new());
        };
        filter.format = Some(format);
    }

    let orgs = Organization::list(&filter, &deps.db_pool).await?;
    let located = orgs.iter().filter(|o| o.location.coordinates.is_some()).count();
    info!(count = orgs.len(), located, "Listed organizations");
    Ok(orgs)
}

pub async fn get_organization_detail(
    id: OrganizationId,
    deps: &ServerDeps,
) -> Result<Option<OrganizationDetail>> {
    let pool = &deps.db_pool;
    let Some(organization) = Organization::find_by_id(id, pool).await? else {
        return Ok(None);
    };

    let reviews = Review::find_for_organization(id, pool).await?;
    let average_rating = Review::average_for_organization(id, pool).await?;

    Ok(Some(OrganizationDetail {
        organization,
        reviews,
        average_rating,
    }))
}

/// Pins for every organization matching the map filters, laid out for `zoom`
pub async fn organization_map(query: MapQuery, deps: &ServerDeps) -> Result<MapView> {
    let orgs = Organization::list(&OrganizationListFilter::default(), &deps.db_pool).await?;

    let filter = MapFilter {
        category: query.category,
        format: query.format,
        city: query.city,
    };
    let view = build_map_view(&orgs, &filter, query.zoom.unwrap_or(MIN_ZOOM));
    debug!(pins = view.pins.len(), "Built organization map");
    Ok(view)
}
