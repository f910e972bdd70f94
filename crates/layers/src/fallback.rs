use scene::supplier::{SupplierId, SupplierLocation, Tier};
use serde::Serialize;

use crate::symbology::tier_style;

/// One row of the simplified supplier list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackEntry {
    pub supplier_id: SupplierId,
    pub name: String,
    pub tier_label: &'static str,
    pub location: String,
    pub certificate_count: u32,
    pub anchor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackGroup {
    pub tier: Tier,
    pub label: &'static str,
    pub color_hex: &'static str,
    pub entries: Vec<FallbackEntry>,
}

/// Map-free rendering of the supplier chain, grouped by tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackList {
    pub groups: Vec<FallbackGroup>,
}

impl FallbackList {
    /// Groups suppliers upstream first (raw material, manufacturing, final
    /// assembly), keeping input order inside each group. Empty tiers are
    /// omitted. Coordinates are not needed.
    pub fn build(suppliers: &[SupplierLocation]) -> Self {
        let groups = Tier::JOURNEY_ORDER
            .iter()
            .filter_map(|&tier| {
                let entries: Vec<FallbackEntry> = suppliers
                    .iter()
                    .filter(|s| s.tier == tier)
                    .map(|s| FallbackEntry {
                        supplier_id: s.id.clone(),
                        name: s.name.clone(),
                        tier_label: tier.label(),
                        location: s.location.clone(),
                        certificate_count: s.certificate_count,
                        anchor: s.id.journey_anchor(),
                    })
                    .collect();
                if entries.is_empty() {
                    return None;
                }
                Some(FallbackGroup {
                    tier,
                    label: tier.label(),
                    color_hex: tier_style(tier).color_hex,
                    entries,
                })
            })
            .collect();

        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
