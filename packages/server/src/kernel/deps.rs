//! Server dependencies (using traits for testability)
//!
//! `ServerDeps` is the single dependency container handed to actions and HTTP
//! handlers. It is built once in `main` from [`Config`](crate::Config); no
//! service reads the environment on its own.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::common::{Coordinates, OrganizationId};
use crate::domains::auth::JwtService;
use crate::domains::geocoding::{BatchGeocoder, LocationResolver, NominatimGeocoder};
use crate::domains::organization::models::Organization;
use crate::kernel::{BaseGeocoder, BaseOrganizationStore};
use crate::Config;

// =============================================================================
// Postgres adapter (implements BaseOrganizationStore trait)
// =============================================================================

/// Wrapper around the pool that implements BaseOrganizationStore via the
/// `Organization` model queries
pub struct PgOrganizationStore(pub PgPool);

impl PgOrganizationStore {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }
}

#[async_trait]
impl BaseOrganizationStore for PgOrganizationStore {
    async fn find_by_id(&self, id: OrganizationId) -> Result<Option<Organization>> {
        Organization::find_by_id(id, &self.0).await
    }

    async fn find_needing_geocode(&self) -> Result<Vec<Organization>> {
        Organization::find_needing_geocode(&self.0).await
    }

    async fn set_coordinates(
        &self,
        id: OrganizationId,
        coordinates: Coordinates,
    ) -> Result<Option<Organization>> {
        Organization::set_coordinates(id, coordinates, &self.0).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub geocoder: Arc<dyn BaseGeocoder>,
    pub organizations: Arc<dyn BaseOrganizationStore>,
    pub jwt_service: Arc<JwtService>,
    /// Pause between provider calls in a batch run
    pub geocode_batch_delay: Duration,
    /// Fired on shutdown; long-running jobs stop between records
    pub shutdown: CancellationToken,
    /// Held for the length of a batch geocode run; shared by clones
    batch_lock: Arc<Mutex<()>>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        geocoder: Arc<dyn BaseGeocoder>,
        organizations: Arc<dyn BaseOrganizationStore>,
        jwt_service: Arc<JwtService>,
        geocode_batch_delay: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            db_pool,
            geocoder,
            organizations,
            jwt_service,
            geocode_batch_delay,
            shutdown,
            batch_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Wire production services from configuration
    pub fn from_config(
        db_pool: PgPool,
        config: &Config,
        shutdown: CancellationToken,
    ) -> Result<Self> {
        let geocoder = NominatimGeocoder::new(&config.geocoder)?;
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_issuer.clone());

        Ok(Self::new(
            db_pool.clone(),
            Arc::new(geocoder),
            Arc::new(PgOrganizationStore::new(db_pool)),
            Arc::new(jwt_service),
            config.geocoder.batch_delay,
            shutdown,
        ))
    }

    pub fn location_resolver(&self) -> LocationResolver {
        LocationResolver::new(self.geocoder.clone(), self.organizations.clone())
    }

    /// Only one batch run talks to the provider at a time
    pub fn batch_lock(&self) -> Arc<Mutex<()>> {
        self.batch_lock.clone()
    }

    pub fn batch_geocoder(&self) -> BatchGeocoder {
        BatchGeocoder::new(
            self.location_resolver(),
            self.organizations.clone(),
            self.geocode_batch_delay,
        )
    }
}
