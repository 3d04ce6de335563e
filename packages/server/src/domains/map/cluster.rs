//! Grouping of nearby pins and the circular spread used to draw them.
//!
//! Grouping depends only on coordinates; layout depends on the zoom level, so
//! a zoom change re-runs [`layout`] over the same clusters.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::domains::map::Located;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 8.0;

/// Cell on a half-degree grid, stored as whole half-degree steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterKey {
    lon_steps: i64,
    lat_steps: i64,
}

impl ClusterKey {
    /// `round(x * 2) / 2` per axis, rounding half away from zero
    pub fn for_point(longitude: f64, latitude: f64) -> Self {
        Self {
            lon_steps: (longitude * 2.0).round() as i64,
            lat_steps: (latitude * 2.0).round() as i64,
        }
    }

    pub fn longitude(&self) -> f64 {
        self.lon_steps as f64 / 2.0
    }

    pub fn latitude(&self) -> f64 {
        self.lat_steps as f64 / 2.0
    }
}

impl Serialize for ClusterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.longitude(), self.latitude()].serialize(serializer)
    }
}

#[derive(Debug, Clone)]
pub struct Cluster<'a> {
    pub key: ClusterKey,
    pub members: Vec<Located<'a>>,
}

/// Partition by grid cell. Clusters come out in first-seen order, members in
/// input order.
pub fn cluster(located: Vec<Located<'_>>) -> Vec<Cluster<'_>> {
    let mut clusters: Vec<Cluster<'_>> = Vec::new();
    let mut index: HashMap<ClusterKey, usize> = HashMap::new();

    for item in located {
        let key = ClusterKey::for_point(item.coordinates.longitude(), item.coordinates.latitude());
        match index.get(&key) {
            Some(&i) => clusters[i].members.push(item),
            None => {
                index.insert(key, clusters.len());
                clusters.push(Cluster {
                    key,
                    members: vec![item],
                });
            }
        }
    }

    clusters
}

/// Clamp to the map's zoom range; non-finite input falls back to the minimum
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        MIN_ZOOM
    }
}

pub fn spread_radius(zoom: f64) -> f64 {
    1.0 + 0.1 * clamp_zoom(zoom)
}

/// Angle of member `index` when `count` members share a circle
pub fn member_angle(index: usize, count: usize) -> f64 {
    index as f64 / count as f64 * TAU
}

#[derive(Debug, Clone, Copy)]
pub struct PlacedPin<'a> {
    pub located: Located<'a>,
    pub cluster_key: ClusterKey,
    /// Where the pin is drawn; may fall outside valid coordinate ranges
    pub display: [f64; 2],
}

/// Spread members on a circle around the first member's exact position.
///
/// Single-member clusters are offset as well.
pub fn layout<'a>(cluster: &Cluster<'a>, zoom: f64) -> Vec<PlacedPin<'a>> {
    let Some(first) = cluster.members.first() else {
        return Vec::new();
    };
    let anchor = first.coordinates;
    let radius = spread_radius(zoom);
    let count = cluster.members.len();

    cluster
        .members
        .iter()
        .enumerate()
        .map(|(i, located)| {
            let angle = member_angle(i, count);
            PlacedPin {
                located: *located,
                cluster_key: cluster.key,
                display: [
                    anchor.longitude() + angle.cos() * radius,
                    anchor.latitude() + angle.sin() * radius,
                ],
            }
        })
        .collect()
}
