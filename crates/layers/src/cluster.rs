//! Render-time grouping of nearby markers.
//!
//! Markers are projected to Web-Mercator world pixels at the current zoom and
//! grouped greedily in input order: a marker joins the first cluster whose
//! seed lies within `radius_px`, otherwise it seeds a new cluster. A grid of
//! `radius_px` cells keeps the neighbour search local.

use std::collections::{BTreeSet, HashMap};

use foundation::math::{LatLng, project_px, px_distance};
use scene::supplier::{SupplierId, Tier};
use serde::Serialize;

use crate::markers::Marker;
use crate::symbology::cluster_radius_px;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClusterConfig {
    pub radius_px: f64,
    /// Deepest zoom the camera can reach; clusters that are still tight there
    /// only expand by activation.
    pub max_zoom: u8,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius_px: 50.0,
            max_zoom: 18,
        }
    }
}

/// Membership-derived cluster identity, stable across renders.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClusterKey(String);

impl ClusterKey {
    pub fn from_members<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a SupplierId>,
    {
        let mut ids: Vec<&str> = members.into_iter().map(SupplierId::as_str).collect();
        ids.sort_unstable();
        ClusterKey(ids.join("|"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerCluster {
    pub key: ClusterKey,
    /// Mean member position.
    pub position: LatLng,
    pub members: Vec<Marker>,
    /// Most frequent tier, ties resolved upstream first.
    pub dominant_tier: Tier,
    /// Zoom at which the members separate; `None` if they never do before
    /// the max zoom.
    pub expand_zoom: Option<u8>,
    pub badge_radius_px: f32,
}

impl MarkerCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MarkerItem {
    Single(Marker),
    Cluster(MarkerCluster),
}

impl MarkerItem {
    pub fn supplier_ids(&self) -> Vec<&SupplierId> {
        match self {
            MarkerItem::Single(m) => vec![&m.supplier_id],
            MarkerItem::Cluster(c) => c.members.iter().map(|m| &m.supplier_id).collect(),
        }
    }
}

/// Groups `markers` for display at `zoom`.
///
/// Clusters whose key is in `spread` are emitted as individual markers.
/// Output order follows the first member of each group.
pub fn cluster_markers(
    markers: &[Marker],
    zoom: u8,
    config: &ClusterConfig,
    spread: &BTreeSet<ClusterKey>,
) -> Vec<MarkerItem> {
    let groups = group_indices(markers, zoom, config.radius_px);

    let mut out = Vec::with_capacity(groups.len());
    for group in groups {
        if group.len() == 1 {
            out.push(MarkerItem::Single(markers[group[0]].clone()));
            continue;
        }

        let members: Vec<Marker> = group.iter().map(|&i| markers[i].clone()).collect();
        let key = ClusterKey::from_members(members.iter().map(|m| &m.supplier_id));
        if spread.contains(&key) {
            out.extend(members.into_iter().map(MarkerItem::Single));
            continue;
        }

        out.push(MarkerItem::Cluster(MarkerCluster {
            key,
            position: mean_position(&members),
            dominant_tier: dominant_tier(&members),
            expand_zoom: expand_zoom(&members, zoom, config),
            badge_radius_px: cluster_radius_px(members.len()),
            members,
        }));
    }
    out
}

fn group_indices(markers: &[Marker], zoom: u8, radius_px: f64) -> Vec<Vec<usize>> {
    let zoom = f64::from(zoom);
    let cell_px = radius_px.max(1.0);

    let mut seeds: Vec<[f64; 2]> = Vec::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();

    for (i, marker) in markers.iter().enumerate() {
        let px = project_px(marker.position, zoom);
        let (cx, cy) = cell_of(px, cell_px);

        let mut joined: Option<usize> = None;
        for ny in cy - 1..=cy + 1 {
            for nx in cx - 1..=cx + 1 {
                let Some(candidates) = grid.get(&(nx, ny)) else {
                    continue;
                };
                for &g in candidates {
                    if px_distance(seeds[g], px) <= radius_px && joined.is_none_or(|j| g < j) {
                        joined = Some(g);
                    }
                }
            }
        }

        match joined {
            Some(g) => groups[g].push(i),
            None => {
                let g = groups.len();
                seeds.push(px);
                groups.push(vec![i]);
                grid.entry((cx, cy)).or_default().push(g);
            }
        }
    }

    groups
}

fn cell_of(px: [f64; 2], cell_px: f64) -> (i64, i64) {
    // World pixels stay below 256 * 2^18 at max zoom, well inside i64.
    ((px[0] / cell_px).floor() as i64, (px[1] / cell_px).floor() as i64)
}

/// Smallest zoom above `zoom` at which some member lies outside the radius
/// around the seed (the first member).
fn expand_zoom(members: &[Marker], zoom: u8, config: &ClusterConfig) -> Option<u8> {
    let seed = members.first()?.position;
    (zoom.saturating_add(1)..=config.max_zoom).find(|&z| {
        let z = f64::from(z);
        let seed_px = project_px(seed, z);
        members
            .iter()
            .any(|m| px_distance(seed_px, project_px(m.position, z)) > config.radius_px)
    })
}

fn mean_position(members: &[Marker]) -> LatLng {
    let n = members.len().max(1) as f64;
    let (lat, lng) = members
        .iter()
        .fold((0.0, 0.0), |(lat, lng), m| (lat + m.position.lat, lng + m.position.lng));
    LatLng::new(lat / n, lng / n)
}

fn dominant_tier(members: &[Marker]) -> Tier {
    let mut best = Tier::RawMaterial;
    let mut best_count = 0usize;
    for tier in Tier::JOURNEY_ORDER {
        let count = members.iter().filter(|m| m.tier == tier).count();
        if count > best_count {
            best = tier;
            best_count = count;
        }
    }
    best
}
