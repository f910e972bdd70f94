use std::collections::BTreeSet;

use foundation::ids::InstanceId;
use foundation::math::LatLng;
use foundation::time::Millis;
use layers::cluster::{ClusterKey, MarkerItem, cluster_markers};
use layers::fallback::FallbackList;
use layers::markers::{JourneyLink, Marker, build_markers};
use scene::camera::CameraFrame;
use scene::resolver::{ResolvedPoints, resolve};
use scene::supplier::{SupplierId, SupplierLocation};
use scene::visibility::ScreenRect;
use tracing::{debug, trace};

use crate::camera::SharedCamera;
use crate::config::MapConfig;
use crate::degradation::DegradationState;
use crate::error::{ConfigError, InitError};
use crate::hover::{HoverBus, HoverSubscription, shared_hover_bus};
use crate::mount::{DeferredMountController, InitTicket, MountOutcome, MountState};
use crate::view::{FALLBACK_NOTICE, FallbackView, LoadingView, MapScene, ViewState};

/// Collaborators shared between map instances.
#[derive(Debug, Clone)]
pub struct MapDeps {
    pub degradation: DegradationState,
    pub hover: HoverBus,
}

impl MapDeps {
    /// Fresh, isolated collaborators.
    pub fn isolated() -> Self {
        Self {
            degradation: DegradationState::new(),
            hover: HoverBus::new(),
        }
    }

    /// The process-wide collaborators.
    pub fn process() -> Self {
        Self {
            degradation: DegradationState::process(),
            hover: shared_hover_bus(),
        }
    }
}

/// One rendered supplier map.
///
/// Composes coordinate resolution, camera framing, marker clustering, the
/// deferred mount lifecycle and hover following. The host drives it and
/// renders whatever [`MapViewport::view`] returns.
#[derive(Debug)]
pub struct MapViewport {
    config: MapConfig,
    deps: MapDeps,
    mount: DeferredMountController,
    suppliers: Vec<SupplierLocation>,
    resolved: ResolvedPoints,
    markers: Vec<Marker>,
    camera: SharedCamera,
    /// Clusters spread in place, valid only at `spread_zoom`.
    spread: BTreeSet<ClusterKey>,
    spread_zoom: Option<u8>,
    hover_sub: Option<HoverSubscription>,
}

impl MapViewport {
    /// Mounts a map. Fails only if `config` does not validate.
    pub fn mount(
        suppliers: Vec<SupplierLocation>,
        deps: MapDeps,
        config: MapConfig,
        now: Millis,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let id = InstanceId::next();
        let mount = DeferredMountController::new(id, deps.degradation.clone(), &config, now);
        let camera = SharedCamera::new(config.frame_limits(), config.follow_min_zoom);
        let mut viewport = Self {
            config,
            deps,
            mount,
            suppliers: Vec::new(),
            resolved: ResolvedPoints::default(),
            markers: Vec::new(),
            camera,
            spread: BTreeSet::new(),
            spread_zoom: None,
            hover_sub: None,
        };
        viewport.set_suppliers(suppliers);
        debug!(instance = %id, state = ?viewport.mount.state(), "map mounted");
        Ok(viewport)
    }

    pub fn id(&self) -> InstanceId {
        self.mount.instance()
    }

    pub fn state(&self) -> MountState {
        self.mount.state()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn resolved(&self) -> &ResolvedPoints {
        &self.resolved
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn camera(&self) -> CameraFrame {
        self.camera.frame()
    }

    pub fn pending_init(&self) -> Option<InitTicket> {
        self.mount.in_flight()
    }

    pub fn wants_visibility(&self) -> bool {
        self.mount.wants_visibility()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.mount.next_deadline()
    }

    pub fn is_following_hover(&self) -> bool {
        self.hover_sub.is_some()
    }

    /// Replaces the supplier list; reframes unless the camera is overridden.
    pub fn set_suppliers(&mut self, suppliers: Vec<SupplierLocation>) {
        self.resolved = resolve(&suppliers);
        self.markers = build_markers(&self.resolved, &suppliers);
        self.suppliers = suppliers;
        self.spread.clear();
        self.spread_zoom = None;
        self.camera.set_points(&self.resolved);
        trace!(
            instance = %self.id(),
            points = self.resolved.points.len(),
            placeholders = self.resolved.using_placeholders,
            "suppliers resolved"
        );
    }

    pub fn on_visibility(&mut self, region: &ScreenRect, viewport: &ScreenRect) -> MountOutcome {
        let outcome = self.mount.on_visibility(region, viewport);
        self.apply(outcome)
    }

    pub fn on_visibility_signal(&mut self, near: bool) -> MountOutcome {
        let outcome = self.mount.on_visibility_signal(near);
        self.apply(outcome)
    }

    pub fn load_now(&mut self) -> MountOutcome {
        let outcome = self.mount.load_now();
        self.apply(outcome)
    }

    pub fn tick(&mut self, now: Millis) -> MountOutcome {
        let outcome = self.mount.tick(now);
        self.apply(outcome)
    }

    pub fn complete_init(
        &mut self,
        ticket: InitTicket,
        result: Result<(), InitError>,
    ) -> MountOutcome {
        let outcome = self.mount.complete_init(ticket, result);
        self.apply(outcome)
    }

    pub fn report_runtime_error(&mut self, err: InitError) -> MountOutcome {
        let outcome = self.mount.report_runtime_error(err);
        self.apply(outcome)
    }

    /// The fallback notice's retry action.
    pub fn retry(&mut self, now: Millis) -> MountOutcome {
        let outcome = self.mount.retry(now);
        self.apply(outcome)
    }

    /// Unmount. Later results, timers and hover events have no effect.
    pub fn teardown(&mut self) {
        self.mount.teardown();
        self.hover_sub = None;
    }

    pub fn fit_to_points(&mut self) -> CameraFrame {
        self.camera.fit_to_points()
    }

    pub fn pan_to(&mut self, center: LatLng) {
        self.camera.pan_to(center);
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.camera.set_zoom(zoom);
    }

    /// Marker click: the journey cross-reference for `id`, if it has a marker.
    pub fn activate_marker(&self, id: &SupplierId) -> Option<JourneyLink> {
        self.markers
            .iter()
            .find(|m| &m.supplier_id == id)
            .map(Marker::activate)
    }

    /// Cluster click: zooms to where the cluster separates, or spreads it in
    /// place if it never separates within the zoom range. A spread lasts
    /// until the zoom changes.
    ///
    /// Returns `false` if no such cluster is currently shown.
    pub fn activate_cluster(&mut self, key: &ClusterKey) -> bool {
        let items = self.items();
        let Some(cluster) = items.iter().find_map(|item| match item {
            MarkerItem::Cluster(c) if &c.key == key => Some(c),
            _ => None,
        }) else {
            return false;
        };

        match cluster.expand_zoom {
            Some(zoom) => self.camera.focus(cluster.position, zoom),
            None => {
                let zoom = self.camera.frame().zoom;
                if self.spread_zoom != Some(zoom) {
                    self.spread.clear();
                    self.spread_zoom = Some(zoom);
                }
                self.spread.insert(key.clone());
            }
        }
        true
    }

    /// Markers grouped for the current camera zoom.
    pub fn items(&self) -> Vec<MarkerItem> {
        let zoom = self.camera.frame().zoom;
        let no_spread = BTreeSet::new();
        let spread = if self.spread_zoom == Some(zoom) {
            &self.spread
        } else {
            &no_spread
        };
        cluster_markers(&self.markers, zoom, &self.config.cluster_config(), spread)
    }

    pub fn view(&self) -> ViewState {
        if self.suppliers.is_empty() {
            return ViewState::Empty;
        }

        match self.mount.state() {
            MountState::NotVisible => ViewState::Loading(LoadingView { deferred: true }),
            MountState::Loading => ViewState::Loading(LoadingView { deferred: false }),
            MountState::Ready => ViewState::Map(MapScene {
                frame: self.camera.frame(),
                items: self.items(),
                using_placeholders: self.resolved.using_placeholders,
            }),
            MountState::Errored | MountState::SimplifiedFallback => {
                ViewState::Fallback(FallbackView {
                    notice: FALLBACK_NOTICE.to_string(),
                    error: self.mount.last_error().map(ToString::to_string),
                    list: FallbackList::build(&self.suppliers),
                    can_retry: !self.mount.is_torn_down(),
                })
            }
        }
    }

    fn apply(&mut self, outcome: MountOutcome) -> MountOutcome {
        match &outcome {
            MountOutcome::Ready => self.follow_hover(),
            MountOutcome::Degraded(_) | MountOutcome::RetryScheduled => self.hover_sub = None,
            _ => {}
        }
        outcome
    }

    fn follow_hover(&mut self) {
        let camera = self.camera.clone();
        let instance = self.id();
        self.hover_sub = Some(self.deps.hover.subscribe(move |event| {
            if camera.follow(event) {
                trace!(%instance, supplier = %event.supplier_id, "camera following hover");
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::hover::HoverEvent;
    use pretty_assertions::assert_eq;
    use scene::supplier::Tier;

    fn suppliers() -> Vec<SupplierLocation> {
        vec![
            SupplierLocation::new("farm", "Cotton Farm", Tier::RawMaterial)
                .located_in("Gujarat, India")
                .at(22.3, 72.6)
                .with_certificates(2),
            SupplierLocation::new("mill", "Spinning Mill", Tier::Manufacturing)
                .located_in("Izmir, Turkey")
                .at(38.42, 27.14),
            SupplierLocation::new("plant", "Assembly", Tier::FinalAssembly)
                .located_in("Porto, Portugal")
                .at(41.15, -8.63),
        ]
    }

    fn ready(deps: &MapDeps) -> MapViewport {
        let mut m = MapViewport::mount(suppliers(), deps.clone(), MapConfig::default(), Millis(0))
            .expect("valid config");
        let MountOutcome::BeginInit(t) = m.load_now() else {
            panic!("expected init");
        };
        assert_eq!(m.complete_init(t, Ok(())), MountOutcome::Ready);
        m
    }

    #[test]
    fn view_follows_lifecycle() {
        let deps = MapDeps::isolated();
        let mut m = MapViewport::mount(suppliers(), deps, MapConfig::default(), Millis(0))
            .expect("valid config");
        assert_eq!(m.view(), ViewState::Loading(LoadingView { deferred: true }));

        let MountOutcome::BeginInit(t) = m.tick(Millis(3_000)) else {
            panic!("expected init");
        };
        assert_eq!(m.view(), ViewState::Loading(LoadingView { deferred: false }));

        m.complete_init(t, Ok(()));
        let ViewState::Map(scene) = m.view() else {
            panic!("expected map");
        };
        assert!(!scene.using_placeholders);
        assert_eq!(scene.frame, m.camera());
        let shown: usize = scene.items.iter().map(|i| i.supplier_ids().len()).sum();
        assert_eq!(shown, 3);
    }

    #[test]
    fn empty_suppliers_show_empty_state() {
        let m = MapViewport::mount(Vec::new(), MapDeps::isolated(), MapConfig::default(), Millis(0))
            .expect("valid config");
        assert_eq!(m.view(), ViewState::Empty);
    }

    #[test]
    fn placeholders_are_flagged_in_map_scene() {
        let deps = MapDeps::isolated();
        let bare = vec![
            SupplierLocation::new("a", "A", Tier::RawMaterial),
            SupplierLocation::new("b", "B", Tier::FinalAssembly),
        ];
        let mut m = MapViewport::mount(bare, deps, MapConfig::default(), Millis(0))
            .expect("valid config");
        let MountOutcome::BeginInit(t) = m.load_now() else {
            panic!("expected init");
        };
        m.complete_init(t, Ok(()));
        let ViewState::Map(scene) = m.view() else {
            panic!("expected map");
        };
        assert!(scene.using_placeholders);
    }

    #[test]
    fn failure_shows_fallback_list_with_retry() {
        let deps = MapDeps::isolated();
        let mut m = MapViewport::mount(suppliers(), deps, MapConfig::default(), Millis(0))
            .expect("valid config");
        let MountOutcome::BeginInit(t) = m.load_now() else {
            panic!("expected init");
        };
        m.complete_init(t, Err(InitError::Surface("no webgl".into())));

        let ViewState::Fallback(fb) = m.view() else {
            panic!("expected fallback");
        };
        assert!(fb.can_retry);
        assert_eq!(fb.list.len(), 3);
        assert_eq!(fb.error.as_deref(), Some("map surface failed to initialize: no webgl"));
        assert_eq!(fb.list.groups[0].entries[0].name, "Cotton Farm");
    }

    #[test]
    fn hover_follow_only_while_ready() {
        let deps = MapDeps::isolated();
        let mut m = ready(&deps);
        assert!(m.is_following_hover());
        assert_eq!(deps.hover.subscriber_count(), 1);

        deps.hover.publish(HoverEvent::enter("mill"));
        assert_eq!(m.camera().center, LatLng::new(38.42, 27.14));
        assert!(m.camera().zoom >= 6);

        m.report_runtime_error(InitError::Runtime("lost".into()));
        assert_eq!(deps.hover.subscriber_count(), 0);
        let before = m.camera();
        deps.hover.publish(HoverEvent::enter("farm"));
        assert_eq!(m.camera(), before);
    }

    #[test]
    fn marker_activation_links_to_journey_row() {
        let m = ready(&MapDeps::isolated());
        let link = m.activate_marker(&SupplierId::new("plant")).expect("marker");
        assert_eq!(link.anchor, "supplier-plant");
        assert!(m.activate_marker(&SupplierId::new("ghost")).is_none());
    }

    #[test]
    fn cluster_activation_zooms_or_spreads() {
        let deps = MapDeps::isolated();
        let close = vec![
            SupplierLocation::new("a", "A", Tier::RawMaterial).at(41.15, -8.63),
            SupplierLocation::new("b", "B", Tier::RawMaterial).at(41.25, -8.50),
            SupplierLocation::new("c", "C", Tier::Manufacturing).at(10.0, 10.0),
            SupplierLocation::new("d", "D", Tier::FinalAssembly).at(10.0, 10.0),
        ];
        let mut m = MapViewport::mount(close, deps, MapConfig::default(), Millis(0))
            .expect("valid config");
        let MountOutcome::BeginInit(t) = m.load_now() else {
            panic!("expected init");
        };
        m.complete_init(t, Ok(()));
        m.set_zoom(3);

        let porto = ClusterKey::from_members([&SupplierId::new("a"), &SupplierId::new("b")]);
        assert!(m.activate_cluster(&porto));
        assert!(m.camera().zoom > 3);
        assert!(m.has_single(&SupplierId::new("a")));

        m.set_zoom(3);
        m.pan_to(LatLng::new(10.0, 10.0));
        let twins = ClusterKey::from_members([&SupplierId::new("c"), &SupplierId::new("d")]);
        assert!(m.activate_cluster(&twins));
        assert_eq!(m.camera().zoom, 3);
        assert!(m.has_single(&SupplierId::new("c")));
        assert!(m.has_single(&SupplierId::new("d")));

        assert!(!m.activate_cluster(&twins));
    }

    #[test]
    fn spread_cluster_regroups_after_zoom_change() {
        let twins = vec![
            SupplierLocation::new("c", "C", Tier::Manufacturing).at(10.0, 10.0),
            SupplierLocation::new("d", "D", Tier::FinalAssembly).at(10.0, 10.0),
        ];
        let mut m = MapViewport::mount(twins, MapDeps::isolated(), MapConfig::default(), Millis(0))
            .expect("valid config");
        let MountOutcome::BeginInit(t) = m.load_now() else {
            panic!("expected init");
        };
        m.complete_init(t, Ok(()));
        m.set_zoom(5);

        let key = ClusterKey::from_members([&SupplierId::new("c"), &SupplierId::new("d")]);
        assert!(m.activate_cluster(&key));
        assert!(m.has_single(&SupplierId::new("c")));

        m.set_zoom(4);
        assert!(!m.has_single(&SupplierId::new("c")));
        assert!(m.activate_cluster(&key));

        m.set_zoom(5);
        assert!(!m.has_single(&SupplierId::new("c")));
    }

    #[test]
    fn mount_rejects_inverted_zoom_range() {
        let config = MapConfig {
            min_zoom: 10,
            max_zoom: 4,
            ..MapConfig::default()
        };
        let err = MapViewport::mount(suppliers(), MapDeps::isolated(), config, Millis(0))
            .expect_err("inverted range");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn manual_camera_holds_until_fit() {
        let mut m = ready(&MapDeps::isolated());
        let fitted = m.camera();
        m.pan_to(LatLng::new(0.0, 0.0));
        m.set_suppliers(suppliers()[..1].to_vec());
        assert_eq!(m.camera().center, LatLng::new(0.0, 0.0));
        let refit = m.fit_to_points();
        assert_eq!(refit, CameraFrame::new(LatLng::new(22.3, 72.6), 8));
        assert_ne!(refit, fitted);
    }

    impl MapViewport {
        fn has_single(&self, id: &SupplierId) -> bool {
            self.items()
                .iter()
                .any(|i| matches!(i, MarkerItem::Single(m) if &m.supplier_id == id))
        }
    }
}
