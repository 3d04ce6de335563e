//! Organization domain actions - business logic functions
//!
//! Actions are async functions called directly from the HTTP handlers.
//! They do the work and return final data types.

mod geocode;
mod queries;
mod submit;

pub use geocode::{geocode_all_organizations, geocode_organization, GeocodeOrganizationResult};
pub use queries::{
    get_organization_detail, list_organizations, organization_map, ListOrganizationsQuery,
    MapQuery, OrganizationDetail,
};
pub use submit::{
    submit_organization, LocationInput, SubmitOrganizationInput, SubmitOrganizationResult,
};
