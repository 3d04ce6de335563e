//! Geocoding actions behind the single-record and batch endpoints

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::common::OrganizationId;
use crate::domains::geocoding::{BatchGeocodeReport, Resolution};
use crate::domains::organization::models::Organization;
use crate::kernel::ServerDeps;

pub enum GeocodeOrganizationResult {
    Geocoded(Organization),
    NotFound,
    NoLocation,
    NotGeocoded,
}

/// Geocode one organization now, replacing any coordinates it already has.
#[instrument(skip(deps))]
pub async fn geocode_organization(
    id: OrganizationId,
    deps: &ServerDeps,
) -> Result<GeocodeOrganizationResult> {
    let Some(org) = deps.organizations.find_by_id(id).await? else {
        return Ok(GeocodeOrganizationResult::NotFound);
    };

    let result = match deps.location_resolver().geocode_now(&org).await? {
        Resolution::Geocoded(updated) | Resolution::AlreadyGeocoded(updated) => {
            GeocodeOrganizationResult::Geocoded(updated)
        }
        Resolution::NoLocation => GeocodeOrganizationResult::NoLocation,
        Resolution::NotGeocoded => GeocodeOrganizationResult::NotGeocoded,
    };
    Ok(result)
}

/// Geocode everything missing coordinates. Stops early on server shutdown.
///
/// The run lives on its own task, so dropping the caller (a client hanging
/// up) does not cut it short. Runs are serialized: a second caller waits for
/// the first to finish and then only sees what is still missing.
pub async fn geocode_all_organizations(deps: &ServerDeps) -> Result<BatchGeocodeReport> {
    let deps = deps.clone();
    let run = tokio::spawn(async move {
        let _running = deps.batch_lock().lock_owned().await;
        info!("Starting batch geocoding");
        deps.batch_geocoder().geocode_all(&deps.shutdown).await
    });

    run.await.context("Batch geocoding task panicked")?
}
