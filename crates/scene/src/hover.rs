use serde::{Deserialize, Serialize};

use crate::supplier::SupplierId;

/// Hover notification exchanged between the journey view and map views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverEvent {
    pub supplier_id: SupplierId,
    /// `true` when the pointer enters the supplier's row, `false` on leave.
    pub entering: bool,
}

impl HoverEvent {
    pub fn enter(id: impl Into<String>) -> Self {
        Self {
            supplier_id: SupplierId::new(id),
            entering: true,
        }
    }

    pub fn leave(id: impl Into<String>) -> Self {
        Self {
            supplier_id: SupplierId::new(id),
            entering: false,
        }
    }
}
