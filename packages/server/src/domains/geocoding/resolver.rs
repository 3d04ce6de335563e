use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domains::organization::models::Organization;
use crate::kernel::{BaseGeocoder, BaseOrganizationStore};

/// Outcome of resolving one organization's location.
///
/// Provider failures are a variant, not an error, so callers iterating many
/// records can carry on.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Coordinates found and persisted; carries the stored record
    Geocoded(Organization),
    /// Coordinates were already present; nothing was looked up
    AlreadyGeocoded(Organization),
    /// No city, state or country to geocode from
    NoLocation,
    /// Provider had no usable answer; coordinates left unset
    NotGeocoded,
}

/// Decides when an organization needs geocoding and performs it
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn BaseGeocoder>,
    store: Arc<dyn BaseOrganizationStore>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn BaseGeocoder>, store: Arc<dyn BaseOrganizationStore>) -> Self {
        Self { geocoder, store }
    }

    /// Geocode only if coordinates are missing and a location field is set.
    pub async fn resolve(&self, org: &Organization) -> Result<Resolution> {
        if org.location.coordinates.is_some() {
            return Ok(Resolution::AlreadyGeocoded(org.clone()));
        }
        self.geocode_now(org).await
    }

    /// Geocode regardless of existing coordinates, overwriting them on success.
    ///
    /// Errors are persistence failures only.
    #[instrument(skip(self, org), fields(org_id = %org.id, org_name = %org.name))]
    pub async fn geocode_now(&self, org: &Organization) -> Result<Resolution> {
        let location = &org.location;
        if !location.has_location_fields() {
            debug!("No location fields; skipping geocode");
            return Ok(Resolution::NoLocation);
        }

        let Some(coordinates) = self
            .geocoder
            .geocode(
                location.city.as_deref(),
                location.state.as_deref(),
                location.country.as_deref(),
            )
            .await
        else {
            return Ok(Resolution::NotGeocoded);
        };

        // A record deleted mid-flight has nothing left to geocode
        match self.store.set_coordinates(org.id, coordinates).await? {
            Some(updated) => Ok(Resolution::Geocoded(updated)),
            None => Ok(Resolution::NotGeocoded),
        }
    }
}
