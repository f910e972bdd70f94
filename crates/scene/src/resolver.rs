use foundation::math::LatLng;
use serde::Serialize;

use crate::supplier::{SupplierId, SupplierLocation, Tier};

/// Reference locations cycled through when no supplier carries coordinates.
///
/// Real cities, so the demo map frames something plausible.
pub const PLACEHOLDER_CYCLE: [LatLng; 6] = [
    LatLng::new(23.0225, 72.5714),  // Ahmedabad
    LatLng::new(31.2304, 121.4737), // Shanghai
    LatLng::new(41.1579, -8.6291),  // Porto
    LatLng::new(52.5200, 13.4050),  // Berlin
    LatLng::new(-23.5505, -46.6333), // Sao Paulo
    LatLng::new(40.7128, -74.0060), // New York
];

/// A supplier ready to be drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPoint {
    pub supplier_id: SupplierId,
    pub lat: f64,
    pub lng: f64,
    pub tier: Tier,
}

impl RenderPoint {
    pub fn new(supplier_id: SupplierId, position: LatLng, tier: Tier) -> Self {
        Self {
            supplier_id,
            lat: position.lat,
            lng: position.lng,
            tier,
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPoints {
    pub points: Vec<RenderPoint>,
    /// Set when `points` carry demo coordinates; callers must flag them as such.
    pub using_placeholders: bool,
}

impl ResolvedPoints {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: &SupplierId) -> Option<&RenderPoint> {
        self.points.iter().find(|p| &p.supplier_id == id)
    }
}

/// Resolves suppliers to render points, preserving input order.
///
/// Suppliers without usable coordinates are dropped. When none of a
/// non-empty input has coordinates, every supplier gets a placeholder from
/// [`PLACEHOLDER_CYCLE`] by index instead.
pub fn resolve(suppliers: &[SupplierLocation]) -> ResolvedPoints {
    let points: Vec<RenderPoint> = suppliers
        .iter()
        .filter_map(|s| {
            s.coordinates()
                .map(|p| RenderPoint::new(s.id.clone(), p, s.tier))
        })
        .collect();

    if !points.is_empty() || suppliers.is_empty() {
        return ResolvedPoints {
            points,
            using_placeholders: false,
        };
    }

    let points = suppliers
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let p = PLACEHOLDER_CYCLE[i % PLACEHOLDER_CYCLE.len()];
            RenderPoint::new(s.id.clone(), p, s.tier)
        })
        .collect();

    ResolvedPoints {
        points,
        using_placeholders: true,
    }
}
