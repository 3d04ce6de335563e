// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The geocoding pipeline (resolver, batch job) is written against these so it
// can run with mock providers and an in-memory store in tests.
//
// Naming convention: Base* for trait names (e.g., BaseGeocoder)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{Coordinates, OrganizationId};
use crate::domains::organization::models::Organization;

// =============================================================================
// Geocoder Trait (Infrastructure - external geocoding provider)
// =============================================================================

#[async_trait]
pub trait BaseGeocoder: Send + Sync {
    /// Resolve a free-text location to `[lon, lat]`.
    ///
    /// Best-effort: every failure (no parts, no match, timeout, transport or
    /// parse error) is `None`, never an error.
    async fn geocode(
        &self,
        city: Option<&str>,
        state: Option<&str>,
        country: Option<&str>,
    ) -> Option<Coordinates>;
}

// =============================================================================
// Organization Store Trait (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait BaseOrganizationStore: Send + Sync {
    async fn find_by_id(&self, id: OrganizationId) -> Result<Option<Organization>>;

    /// Organizations without coordinates that have a city, state or country.
    async fn find_needing_geocode(&self) -> Result<Vec<Organization>>;

    /// Persist coordinates; `None` if the organization no longer exists.
    async fn set_coordinates(
        &self,
        id: OrganizationId,
        coordinates: Coordinates,
    ) -> Result<Option<Organization>>;
}
