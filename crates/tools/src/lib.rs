//! Offline rendering of a supplier map, for demos and smoke tests.

use std::fmt;
use std::fs;
use std::path::Path;

use foundation::time::Millis;
use layers::markers::JourneyLink;
use scene::hover::HoverEvent;
use scene::supplier::{SupplierId, SupplierLocation};
use serde::Serialize;
use tracing::{debug, info};
use viewport::{ConfigError, InitError, MapConfig, MapDeps, MapViewport, MountOutcome, ViewState};

#[derive(Debug)]
pub enum ToolError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(ConfigError),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::Io(err) => write!(f, "I/O error: {err}"),
            ToolError::Json(err) => write!(f, "supplier JSON error: {err}"),
            ToolError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::Io(err) => Some(err),
            ToolError::Json(err) => Some(err),
            ToolError::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ToolError {
    fn from(err: ConfigError) -> Self {
        ToolError::Config(err)
    }
}

/// How the simulated host drives the map before reporting.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    /// Report the surface initialization as failed.
    pub fail_init: bool,
    /// Manual zoom applied once the map is ready.
    pub zoom: Option<u8>,
    /// Journey row hovered once the map is ready.
    pub hover: Option<String>,
    /// Marker clicked once the map is ready.
    pub click: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub supplier_count: usize,
    pub view: ViewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journey_link: Option<JourneyLink>,
}

pub fn load_suppliers(path: impl AsRef<Path>) -> Result<Vec<SupplierLocation>, ToolError> {
    let payload = fs::read_to_string(path.as_ref()).map_err(ToolError::Io)?;
    parse_suppliers(&payload)
}

pub fn parse_suppliers(payload: &str) -> Result<Vec<SupplierLocation>, ToolError> {
    serde_json::from_str(payload).map_err(ToolError::Json)
}

/// Config from an explicit path, or defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<MapConfig, ToolError> {
    match path {
        Some(p) => Ok(MapConfig::load(p)?),
        None => Ok(MapConfig::default()),
    }
}

/// Mounts a map, drives it through `scenario` and reports the final view.
pub fn render(
    suppliers: Vec<SupplierLocation>,
    config: MapConfig,
    deps: MapDeps,
    scenario: &Scenario,
) -> Result<Report, ToolError> {
    let supplier_count = suppliers.len();
    let hover_bus = deps.hover.clone();
    let mut map = MapViewport::mount(suppliers, deps, config, Millis::ZERO)?;

    if let MountOutcome::BeginInit(ticket) = map.load_now() {
        let result = if scenario.fail_init {
            Err(InitError::Surface("initialization disabled by --fail-init".to_string()))
        } else {
            Ok(())
        };
        let outcome = map.complete_init(ticket, result);
        debug!(?outcome, "surface initialization settled");
    }

    let mut journey_link = None;
    if matches!(map.view(), ViewState::Map(_)) {
        if let Some(zoom) = scenario.zoom {
            map.set_zoom(zoom);
        }
        if let Some(id) = &scenario.hover {
            hover_bus.publish(HoverEvent::enter(id.as_str()));
        }
        if let Some(id) = &scenario.click {
            journey_link = map.activate_marker(&SupplierId::new(id.as_str()));
        }
    }

    let view = map.view();
    info!(suppliers = supplier_count, view = view.name(), "rendered supplier map");
    map.teardown();

    Ok(Report {
        supplier_count,
        view,
        journey_link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SUPPLIERS: &str = r#"[
        {"id": "1", "name": "Farm", "tier": 3, "location": "Gujarat", "latitude": 22.3, "longitude": 72.6, "certificateCount": 1},
        {"id": "2", "name": "Mill", "tier": 2, "location": "Izmir", "latitude": 38.42, "longitude": 27.14},
        {"id": "3", "name": "Plant", "tier": 1, "location": "Porto", "latitude": null, "longitude": null}
    ]"#;

    #[test]
    fn renders_map_for_valid_input() {
        let suppliers = parse_suppliers(SUPPLIERS).expect("parse");
        let report = render(
            suppliers,
            MapConfig::default(),
            MapDeps::isolated(),
            &Scenario::default(),
        )
        .expect("render");
        assert_eq!(report.supplier_count, 3);
        let ViewState::Map(scene) = &report.view else {
            panic!("expected map view");
        };
        let shown: usize = scene.items.iter().map(|i| i.supplier_ids().len()).sum();
        assert_eq!(shown, 2);
    }

    #[test]
    fn fail_init_renders_fallback_list() {
        let suppliers = parse_suppliers(SUPPLIERS).expect("parse");
        let scenario = Scenario {
            fail_init: true,
            ..Scenario::default()
        };
        let report = render(suppliers, MapConfig::default(), MapDeps::isolated(), &scenario)
            .expect("render");
        let ViewState::Fallback(fb) = &report.view else {
            panic!("expected fallback view");
        };
        assert_eq!(fb.list.len(), 3);
    }

    #[test]
    fn hover_and_click_are_applied() {
        let suppliers = parse_suppliers(SUPPLIERS).expect("parse");
        let scenario = Scenario {
            hover: Some("2".to_string()),
            click: Some("1".to_string()),
            ..Scenario::default()
        };
        let report = render(suppliers, MapConfig::default(), MapDeps::isolated(), &scenario)
            .expect("render");
        let ViewState::Map(scene) = &report.view else {
            panic!("expected map view");
        };
        assert_eq!(scene.frame.center.lat, 38.42);
        assert_eq!(
            report.journey_link.map(|l| l.anchor),
            Some("supplier-1".to_string())
        );
    }

    #[test]
    fn malformed_suppliers_are_reported() {
        let err = parse_suppliers(r#"[{"id": "1"}]"#).expect_err("missing fields");
        assert!(matches!(err, ToolError::Json(_)));
        assert!(err.to_string().starts_with("supplier JSON error"));
    }

    #[test]
    fn invalid_config_is_reported_with_source() {
        use std::error::Error;

        let suppliers = parse_suppliers(SUPPLIERS).expect("parse");
        let config = MapConfig {
            min_zoom: 12,
            max_zoom: 3,
            ..MapConfig::default()
        };
        let err = render(suppliers, config, MapDeps::isolated(), &Scenario::default())
            .expect_err("inverted zoom range");
        assert!(matches!(err, ToolError::Config(ConfigError::Invalid(_))));
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_config_defaults() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config, MapConfig::default());
    }
}
