//! Typed ID definitions for all domain entities.

pub use super::id::Id;

/// Marker type for directory organizations.
pub struct Organization;

/// Marker type for accounts (students and organization owners).
pub struct User;

/// Marker type for reviews.
pub struct Review;

pub type OrganizationId = Id<Organization>;

pub type UserId = Id<User>;

pub type ReviewId = Id<Review>;
