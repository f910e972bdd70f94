use std::collections::HashMap;

use foundation::math::LatLng;
use scene::resolver::ResolvedPoints;
use scene::supplier::{SupplierId, SupplierLocation, Tier};
use serde::Serialize;

use crate::symbology::{MarkerStyle, tier_style};

/// Cross-reference from a marker to the supplier's row in the journey view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyLink {
    pub supplier_id: SupplierId,
    /// Element id to scroll to and highlight, `supplier-<id>`.
    pub anchor: String,
}

impl JourneyLink {
    pub fn new(supplier_id: SupplierId) -> Self {
        let anchor = supplier_id.journey_anchor();
        Self {
            supplier_id,
            anchor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPopup {
    pub name: String,
    pub tier_label: &'static str,
    pub location: String,
    pub certificate_count: u32,
    pub link: JourneyLink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub supplier_id: SupplierId,
    pub position: LatLng,
    pub tier: Tier,
    pub style: MarkerStyle,
    pub popup: MarkerPopup,
}

impl Marker {
    /// What a click on this marker hands to the journey view.
    pub fn activate(&self) -> JourneyLink {
        self.popup.link.clone()
    }
}

/// Builds one marker per resolved point, in point order.
///
/// Points whose supplier is missing from `suppliers` are skipped.
pub fn build_markers(resolved: &ResolvedPoints, suppliers: &[SupplierLocation]) -> Vec<Marker> {
    let by_id: HashMap<&SupplierId, &SupplierLocation> =
        suppliers.iter().map(|s| (&s.id, s)).collect();

    resolved
        .points
        .iter()
        .filter_map(|p| {
            let supplier = by_id.get(&p.supplier_id)?;
            Some(Marker {
                supplier_id: p.supplier_id.clone(),
                position: p.position(),
                tier: p.tier,
                style: tier_style(p.tier),
                popup: MarkerPopup {
                    name: supplier.name.clone(),
                    tier_label: p.tier.label(),
                    location: supplier.location.clone(),
                    certificate_count: supplier.certificate_count,
                    link: JourneyLink::new(p.supplier_id.clone()),
                },
            })
        })
        .collect()
}
