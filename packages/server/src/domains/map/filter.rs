use crate::common::{non_blank, Coordinates};
use crate::domains::organization::models::Organization;

/// Map filter selections. `None` or blank means "any".
#[derive(Debug, Clone, Default)]
pub struct MapFilter {
    pub category: Option<String>,
    pub format: Option<String>,
    /// Matched exactly, including case
    pub city: Option<String>,
}

/// An organization that can be drawn, paired with its stored coordinates
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub org: &'a Organization,
    pub coordinates: Coordinates,
}

impl MapFilter {
    pub fn matches(&self, org: &Organization) -> bool {
        let category_ok = non_blank(self.category.as_deref())
            .map_or(true, |c| org.category.as_str().eq_ignore_ascii_case(c));
        let format_ok = non_blank(self.format.as_deref())
            .map_or(true, |f| org.format.as_str().eq_ignore_ascii_case(f));
        let city_ok = self
            .city
            .as_deref()
            .filter(|c| !c.is_empty())
            .map_or(true, |c| org.location.city.as_deref() == Some(c));

        category_ok && format_ok && city_ok
    }

    /// Organizations that pass every selection and have coordinates, in input order
    pub fn apply<'a>(&self, organizations: &'a [Organization]) -> Vec<Located<'a>> {
        organizations
            .iter()
            .filter(|org| self.matches(org))
            .filter_map(|org| {
                org.location
                    .coordinates
                    .map(|coordinates| Located { org, coordinates })
            })
            .collect()
    }
}

/// Distinct non-empty cities, sorted, for the city dropdown
pub fn distinct_cities(organizations: &[Organization]) -> Vec<String> {
    let mut cities: Vec<String> = organizations
        .iter()
        .filter_map(|org| org.location.city.as_deref())
        .filter(|city| !city.trim().is_empty())
        .map(String::from)
        .collect();
    cities.sort();
    cities.dedup();
    cities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::organization::models::{Category, Format};
    use crate::kernel::test_dependencies::test_organization;

    fn located_org(name: &str, city: &str, category: Category, format: Format) -> Organization {
        let mut org = test_organization(name, Some(city), None, None);
        org.category = category;
        org.format = format;
        org.location.coordinates = Some(Coordinates::new(-79.3832, 43.6532).unwrap());
        org
    }

    fn names(located: &[Located<'_>]) -> Vec<String> {
        located.iter().map(|l| l.org.name.clone()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything_located_in_order() {
        let mut unplaced = test_organization("Unplaced", Some("Toronto"), None, None);
        unplaced.location.coordinates = None;
        let orgs = vec![
            located_org("First", "Toronto", Category::Arts, Format::Remote),
            unplaced,
            located_org("Second", "Boston", Category::Law, Format::Hybrid),
        ];

        let located = MapFilter::default().apply(&orgs);

        assert_eq!(names(&located), vec!["First", "Second"]);
    }

    #[test]
    fn test_category_and_format_ignore_case() {
        let orgs = vec![
            located_org("Code Club", "Toronto", Category::ComputerScience, Format::InPerson),
            located_org("Art Lab", "Toronto", Category::Arts, Format::InPerson),
        ];
        let filter = MapFilter {
            category: Some("computer science".to_string()),
            format: Some("IN-PERSON".to_string()),
            city: None,
        };

        assert_eq!(names(&filter.apply(&orgs)), vec!["Code Club"]);
    }

    #[test]
    fn test_city_match_is_case_sensitive() {
        let orgs = vec![located_org("A", "Toronto", Category::Arts, Format::Remote)];

        let exact = MapFilter {
            city: Some("Toronto".to_string()),
            ..Default::default()
        };
        let lower = MapFilter {
            city: Some("toronto".to_string()),
            ..Default::default()
        };

        assert_eq!(exact.apply(&orgs).len(), 1);
        assert!(lower.apply(&orgs).is_empty());
    }

    #[test]
    fn test_blank_selections_impose_nothing() {
        let orgs = vec![located_org("A", "Paris", Category::Physics, Format::Hybrid)];
        let filter = MapFilter {
            category: Some(String::new()),
            format: Some("  ".to_string()),
            city: Some(String::new()),
        };

        assert_eq!(filter.apply(&orgs).len(), 1);
    }

    #[test]
    fn test_distinct_cities_sorted() {
        let orgs = vec![
            test_organization("A", Some("Toronto"), None, None),
            test_organization("B", Some("Boston"), None, None),
            test_organization("C", Some("Toronto"), None, None),
            test_organization("D", None, None, Some("France")),
        ];

        assert_eq!(distinct_cities(&orgs), vec!["Boston", "Toronto"]);
    }
}
