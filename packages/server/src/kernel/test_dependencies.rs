// TestDependencies - mock implementations for testing
//
// Provides a scripted geocoder and an in-memory organization store that can
// be injected into the resolver, the batch job and ServerDeps.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{BaseGeocoder, BaseOrganizationStore};
use crate::common::{Coordinates, OrganizationId};
use crate::domains::geocoding::build_location_query;
use crate::domains::organization::models::{
    Category, Format, Organization, OrganizationLocation, SubmittedBy,
};

// =============================================================================
// Mock Geocoder
// =============================================================================

/// Answers from a fixed query → coordinates table; unknown queries miss.
pub struct MockGeocoder {
    results: HashMap<String, Coordinates>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self {
            results: HashMap::new(),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `query` (as built by `build_location_query`) with `coordinates`
    pub fn with_result(mut self, query: &str, coordinates: Coordinates) -> Self {
        self.results.insert(query.to_string(), coordinates);
        self
    }

    /// Every query that reached the "provider", in call order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseGeocoder for MockGeocoder {
    async fn geocode(
        &self,
        city: Option<&str>,
        state: Option<&str>,
        country: Option<&str>,
    ) -> Option<Coordinates> {
        let query = build_location_query(city, state, country)?;
        self.queries.lock().unwrap().push(query.clone());
        self.results.get(&query).copied()
    }
}

// =============================================================================
// In-memory Organization Store
// =============================================================================

pub struct InMemoryOrganizationStore {
    organizations: Mutex<Vec<Organization>>,
    failing_writes: HashSet<OrganizationId>,
}

impl InMemoryOrganizationStore {
    pub fn new() -> Self {
        Self::with_organizations(Vec::new())
    }

    pub fn with_organizations(organizations: Vec<Organization>) -> Self {
        Self {
            organizations: Mutex::new(organizations),
            failing_writes: HashSet::new(),
        }
    }

    /// Make `set_coordinates` fail for this organization
    pub fn failing_writes_for(mut self, id: OrganizationId) -> Self {
        self.failing_writes.insert(id);
        self
    }

    pub fn get(&self, id: OrganizationId) -> Option<Organization> {
        self.organizations
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }
}

impl Default for InMemoryOrganizationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseOrganizationStore for InMemoryOrganizationStore {
    async fn find_by_id(&self, id: OrganizationId) -> Result<Option<Organization>> {
        Ok(self.get(id))
    }

    async fn find_needing_geocode(&self) -> Result<Vec<Organization>> {
        Ok(self
            .organizations
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.location.needs_geocoding())
            .cloned()
            .collect())
    }

    async fn set_coordinates(
        &self,
        id: OrganizationId,
        coordinates: Coordinates,
    ) -> Result<Option<Organization>> {
        if self.failing_writes.contains(&id) {
            return Err(anyhow!("write failed for organization {}", id));
        }

        let mut organizations = self.organizations.lock().unwrap();
        let Some(org) = organizations.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        org.location.coordinates = Some(coordinates);
        org.updated_at = Utc::now();
        Ok(Some(org.clone()))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Organization with the given location parts and no coordinates
pub fn test_organization(
    name: &str,
    city: Option<&str>,
    state: Option<&str>,
    country: Option<&str>,
) -> Organization {
    let now = Utc::now();
    Organization {
        id: OrganizationId::new(),
        name: name.to_string(),
        category: Category::Stem,
        format: Format::Remote,
        description: String::new(),
        website: None,
        instagram: String::new(),
        linkedin: String::new(),
        linktree: String::new(),
        tiktok: String::new(),
        location: OrganizationLocation {
            city: city.map(String::from),
            state: state.map(String::from),
            country: country.map(String::from),
            coordinates: None,
        },
        submitted_by: SubmittedBy::default(),
        created_at: now,
        updated_at: now,
    }
}
