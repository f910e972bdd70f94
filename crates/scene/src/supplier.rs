use std::fmt;

use foundation::math::LatLng;
use serde::{Deserialize, Serialize};

/// Caller-assigned supplier identity, stable for the session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(pub String);

impl SupplierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Element id of this supplier's row in the journey view.
    pub fn journey_anchor(&self) -> String {
        format!("supplier-{}", self.0)
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SupplierId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Position in the supply chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    /// Final assembly, closest to the consumer.
    FinalAssembly,
    Manufacturing,
    /// Raw material, furthest upstream.
    RawMaterial,
}

impl Tier {
    /// Upstream first, the order the journey is told in.
    pub const JOURNEY_ORDER: [Tier; 3] =
        [Tier::RawMaterial, Tier::Manufacturing, Tier::FinalAssembly];

    pub fn number(self) -> u8 {
        match self {
            Tier::FinalAssembly => 1,
            Tier::Manufacturing => 2,
            Tier::RawMaterial => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::FinalAssembly => "Final Assembly",
            Tier::Manufacturing => "Manufacturing",
            Tier::RawMaterial => "Raw Material",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTier(pub u8);

impl fmt::Display for InvalidTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid supplier tier {} (expected 1, 2 or 3)", self.0)
    }
}

impl std::error::Error for InvalidTier {}

impl TryFrom<u8> for Tier {
    type Error = InvalidTier;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Tier::FinalAssembly),
            2 => Ok(Tier::Manufacturing),
            3 => Ok(Tier::RawMaterial),
            other => Err(InvalidTier(other)),
        }
    }
}

impl From<Tier> for u8 {
    fn from(t: Tier) -> u8 {
        t.number()
    }
}

/// One supplier record as delivered by the data-fetching layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierLocation {
    pub id: SupplierId,
    pub name: String,
    pub tier: Tier,
    /// Free-text location, e.g. "Porto, Portugal".
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub certificate_count: u32,
}

impl SupplierLocation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: SupplierId::new(id),
            name: name.into(),
            tier,
            location: String::new(),
            latitude: None,
            longitude: None,
            certificate_count: 0,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    pub fn located_in(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_certificates(mut self, count: u32) -> Self {
        self.certificate_count = count;
        self
    }

    /// Usable coordinates, if both parts are present, finite and in range.
    pub fn coordinates(&self) -> Option<LatLng> {
        LatLng::from_parts(self.latitude, self.longitude)
    }
}
