use serde::Serialize;
use tracing::debug;

use crate::common::{Coordinates, OrganizationId};
use crate::domains::map::{cluster, distinct_cities, layout, ClusterKey, MapFilter};
use crate::domains::organization::models::{Category, Format, Organization};

#[derive(Debug, Clone, Serialize)]
pub struct MapPin {
    pub id: OrganizationId,
    pub name: String,
    pub category: Category,
    pub format: Format,
    pub city: Option<String>,
    pub cluster_key: ClusterKey,
    pub coordinates: Coordinates,
    pub display_coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub pins: Vec<MapPin>,
    /// Every known city, regardless of the current selection
    pub cities: Vec<String>,
}

/// Filter, cluster and lay out `organizations` for one map render
pub fn build_map_view(organizations: &[Organization], filter: &MapFilter, zoom: f64) -> MapView {
    let clusters = cluster(filter.apply(organizations));
    debug!(clusters = clusters.len(), zoom, "Laying out map");

    let pins = clusters
        .iter()
        .flat_map(|c| layout(c, zoom))
        .map(|pin| {
            let org = pin.located.org;
            MapPin {
                id: org.id,
                name: org.name.clone(),
                category: org.category,
                format: org.format,
                city: org.location.city.clone(),
                cluster_key: pin.cluster_key,
                coordinates: pin.located.coordinates,
                display_coordinates: pin.display,
            }
        })
        .collect();

    MapView {
        pins,
        cities: distinct_cities(organizations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::test_organization;

    #[test]
    fn test_view_pins_follow_cluster_order() {
        let mut a = test_organization("A", Some("Toronto"), None, None);
        a.location.coordinates = Some(Coordinates::new(-79.3832, 43.6532).unwrap());
        let mut b = test_organization("B", Some("Paris"), None, None);
        b.location.coordinates = Some(Coordinates::new(2.3514, 48.8575).unwrap());
        let c = test_organization("C", Some("Atlantis"), None, None);
        let mut d = test_organization("D", Some("Toronto"), None, None);
        d.location.coordinates = Some(Coordinates::new(-79.40, 43.70).unwrap());

        let view = build_map_view(&[a, b, c, d], &MapFilter::default(), 1.0);

        let names: Vec<&str> = view.pins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "D", "B"]);
        assert_eq!(view.cities, vec!["Atlantis", "Paris", "Toronto"]);

        let json = serde_json::to_value(&view.pins[0]).unwrap();
        assert_eq!(json["cluster_key"], serde_json::json!([-79.5, 43.5]));
        assert_eq!(json["coordinates"], serde_json::json!([-79.3832, 43.6532]));
    }
}
