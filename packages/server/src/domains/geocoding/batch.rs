//! Batch geocoding of every organization that is missing coordinates.
//!
//! Records are processed one at a time with a fixed pause between provider
//! calls; free-tier Nominatim allows roughly one request per second. A bad
//! record is written into the report and the run moves on.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::common::Coordinates;
use crate::domains::geocoding::{LocationResolver, Resolution};
use crate::domains::organization::models::Organization;
use crate::kernel::BaseOrganizationStore;

/// Summary of one batch run. Built in memory, never stored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchGeocodeReport {
    /// Organizations selected for geocoding
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub details: Vec<BatchGeocodeDetail>,
    /// Run stopped early; `details` covers only the processed records
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchGeocodeDetail {
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub status: DetailStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetailStatus {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "failed - could not geocode")]
    CouldNotGeocode,
    #[serde(rename = "error")]
    Error,
}

impl BatchGeocodeReport {
    fn record(&mut self, detail: BatchGeocodeDetail) {
        match detail.status {
            DetailStatus::Success => self.success += 1,
            DetailStatus::CouldNotGeocode | DetailStatus::Error => self.failed += 1,
        }
        self.details.push(detail);
    }
}

/// Drives the [`LocationResolver`] across all organizations lacking coordinates
pub struct BatchGeocoder {
    resolver: LocationResolver,
    store: Arc<dyn BaseOrganizationStore>,
    delay: Duration,
}

impl BatchGeocoder {
    pub fn new(
        resolver: LocationResolver,
        store: Arc<dyn BaseOrganizationStore>,
        delay: Duration,
    ) -> Self {
        Self {
            resolver,
            store,
            delay,
        }
    }

    /// Geocode every selected organization, strictly in sequence.
    ///
    /// Only the initial selection query can fail the run. `cancel` is checked
    /// before each record and while pausing between records.
    #[instrument(skip_all)]
    pub async fn geocode_all(&self, cancel: &CancellationToken) -> Result<BatchGeocodeReport> {
        let orgs = self.store.find_needing_geocode().await?;
        info!(count = orgs.len(), "Found organizations to geocode");

        let mut report = BatchGeocodeReport {
            total: orgs.len(),
            ..Default::default()
        };

        for (index, org) in orgs.iter().enumerate() {
            if index > 0 && !self.pause(cancel).await {
                report.cancelled = true;
                break;
            }
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let detail = self.process(org).await;
            report.record(detail);
        }

        if report.cancelled {
            warn!(
                processed = report.details.len(),
                total = report.total,
                "Batch geocoding cancelled"
            );
        }
        info!(
            total = report.total,
            success = report.success,
            failed = report.failed,
            "Batch geocoding complete"
        );
        Ok(report)
    }

    /// Rate-limit pause. Returns false if cancelled while waiting.
    async fn pause(&self, cancel: &CancellationToken) -> bool {
        if self.delay.is_zero() {
            return true;
        }
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.delay) => true,
        }
    }

    async fn process(&self, org: &Organization) -> BatchGeocodeDetail {
        let location = org.location.query().unwrap_or_default();
        let mut detail = BatchGeocodeDetail {
            name: org.name.clone(),
            location,
            coordinates: None,
            status: DetailStatus::CouldNotGeocode,
            error: None,
        };

        match self.resolver.resolve(org).await {
            Ok(Resolution::Geocoded(updated)) | Ok(Resolution::AlreadyGeocoded(updated)) => {
                detail.coordinates = updated.location.coordinates;
                detail.status = DetailStatus::Success;
            }
            Ok(Resolution::NotGeocoded) | Ok(Resolution::NoLocation) => {
                warn!(org_id = %org.id, location = %detail.location, "Could not geocode");
            }
            Err(e) => {
                error!(org_id = %org.id, error = ?e, "Error geocoding organization");
                detail.status = DetailStatus::Error;
                detail.error = Some(format!("{:#}", e));
            }
        }

        detail
    }
}
