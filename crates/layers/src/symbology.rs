use scene::supplier::Tier;
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    /// Linear RGBA.
    pub color: [f32; 4],
    /// CSS hex color for DOM-based hosts.
    pub color_hex: &'static str,
    pub radius_px: f32,
    /// Short glyph drawn inside the marker.
    pub glyph: &'static str,
}

impl MarkerStyle {
    pub const fn new(
        color: [f32; 4],
        color_hex: &'static str,
        radius_px: f32,
        glyph: &'static str,
    ) -> Self {
        Self {
            color,
            color_hex,
            radius_px,
            glyph,
        }
    }
}

const RAW_MATERIAL: MarkerStyle =
    MarkerStyle::new([0.086, 0.639, 0.290, 1.0], "#16a34a", 10.0, "3");
const MANUFACTURING: MarkerStyle =
    MarkerStyle::new([0.145, 0.388, 0.922, 1.0], "#2563eb", 10.0, "2");
const FINAL_ASSEMBLY: MarkerStyle =
    MarkerStyle::new([0.576, 0.200, 0.918, 1.0], "#9333ea", 12.0, "1");

/// Marker style for a supply-chain tier.
pub fn tier_style(tier: Tier) -> MarkerStyle {
    match tier {
        Tier::RawMaterial => RAW_MATERIAL,
        Tier::Manufacturing => MANUFACTURING,
        Tier::FinalAssembly => FINAL_ASSEMBLY,
    }
}

/// Cluster badge radius, growing with member count.
pub fn cluster_radius_px(count: usize) -> f32 {
    match count {
        0..=9 => 16.0,
        10..=99 => 20.0,
        _ => 24.0,
    }
}
