//! Submit organization action

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::common::{is_unique_violation, non_blank, UserId};
use crate::domains::organization::models::{
    Category, Format, NewOrganization, Organization, OrganizationLocation, SubmittedBy,
    UnknownTag,
};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationInput {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrganizationInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub linktree: Option<String>,
    pub tiktok: Option<String>,
    pub location: Option<LocationInput>,
    pub submitter_name: Option<String>,
}

pub enum SubmitOrganizationResult {
    Submitted(Organization),
    Invalid(String),
    DuplicateName,
}

fn owned(value: Option<&str>) -> Option<String> {
    non_blank(value).map(String::from)
}

/// Required fields and tag parsing; coordinates are filled in later
fn to_new_organization(
    input: &SubmitOrganizationInput,
    submitted_by: UserId,
) -> Result<NewOrganization, String> {
    let (Some(name), Some(category), Some(format)) = (
        non_blank(input.name.as_deref()),
        non_blank(input.category.as_deref()),
        non_blank(input.format.as_deref()),
    ) else {
        return Err("Missing required fields".to_string());
    };
    let category: Category = category.parse().map_err(|e: UnknownTag| e.to_string())?;
    let format: Format = format.parse().map_err(|e: UnknownTag| e.to_string())?;

    let location = input.location.clone().unwrap_or_default();
    let social = |value: &Option<String>| owned(value.as_deref()).unwrap_or_default();

    Ok(NewOrganization {
        name: name.to_string(),
        category,
        format,
        description: owned(input.description.as_deref()).unwrap_or_default(),
        website: owned(input.website.as_deref()),
        instagram: social(&input.instagram),
        linkedin: social(&input.linkedin),
        linktree: social(&input.linktree),
        tiktok: social(&input.tiktok),
        location: OrganizationLocation {
            city: owned(location.city.as_deref()),
            state: owned(location.state.as_deref()),
            country: owned(location.country.as_deref()),
            coordinates: None,
        },
        submitted_by: SubmittedBy {
            name: owned(input.submitter_name.as_deref()),
            user_id: Some(submitted_by),
        },
    })
}

/// Add an organization to the directory.
///
/// Geocoding happens before the insert and is best-effort: a miss stores the
/// organization without coordinates for a later batch run.
#[instrument(skip(input, deps), fields(name = ?input.name, %submitted_by))]
pub async fn submit_organization(
    input: SubmitOrganizationInput,
    submitted_by: UserId,
    deps: &ServerDeps,
) -> Result<SubmitOrganizationResult> {
    let mut new_org = match to_new_organization(&input, submitted_by) {
        Ok(new_org) => new_org,
        Err(message) => return Ok(SubmitOrganizationResult::Invalid(message)),
    };

    if Organization::find_by_name_insensitive(&new_org.name, &deps.db_pool)
        .await?
        .is_some()
    {
        return Ok(SubmitOrganizationResult::DuplicateName);
    }

    let location = &new_org.location;
    let coordinates = if location.has_location_fields() {
        deps.geocoder
            .geocode(
                location.city.as_deref(),
                location.state.as_deref(),
                location.country.as_deref(),
            )
            .await
    } else {
        None
    };
    new_org.location.coordinates = coordinates;

    let org = match Organization::insert(&new_org, &deps.db_pool).await {
        Ok(org) => org,
        Err(e) if is_unique_violation(&e) => return Ok(SubmitOrganizationResult::DuplicateName),
        Err(e) => return Err(e),
    };

    info!(
        org_id = %org.id,
        geocoded = org.location.coordinates.is_some(),
        "Organization submitted"
    );
    Ok(SubmitOrganizationResult::Submitted(org))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SubmitOrganizationInput {
        serde_json::from_value(serde_json::json!({
            "name": "  Code Club ",
            "category": "computer science",
            "format": "in-person",
            "instagram": "@codeclub",
            "location": { "city": "Toronto", "state": " ", "country": "Canada" },
            "submitterName": "Ada"
        }))
        .unwrap()
    }

    #[test]
    fn test_maps_input_to_new_organization() {
        let submitter = UserId::new();

        let new_org = to_new_organization(&input(), submitter).unwrap();

        assert_eq!(new_org.name, "Code Club");
        assert_eq!(new_org.category, Category::ComputerScience);
        assert_eq!(new_org.format, Format::InPerson);
        assert_eq!(new_org.instagram, "@codeclub");
        assert_eq!(new_org.tiktok, "");
        assert_eq!(new_org.location.state, None);
        assert_eq!(new_org.location.query().as_deref(), Some("Toronto, Canada"));
        assert_eq!(new_org.submitted_by.name.as_deref(), Some("Ada"));
        assert_eq!(new_org.submitted_by.user_id, Some(submitter));
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let mut input = input();
        input.name = None;

        let err = to_new_organization(&input, UserId::new()).unwrap_err();
        assert_eq!(err, "Missing required fields");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut input = input();
        input.category = Some("Alchemy".to_string());

        let err = to_new_organization(&input, UserId::new()).unwrap_err();
        assert!(err.contains("Alchemy"));
    }
}
