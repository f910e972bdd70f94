use layers::cluster::MarkerItem;
use layers::fallback::FallbackList;
use scene::camera::CameraFrame;
use serde::Serialize;

/// The single visual branch a map instance shows at any moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ViewState {
    Loading(LoadingView),
    /// No supplier records at all; distinct from the error branch.
    Empty,
    Map(MapScene),
    Fallback(FallbackView),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading(_) => "loading",
            ViewState::Empty => "empty",
            ViewState::Map(_) => "map",
            ViewState::Fallback(_) => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingView {
    /// Waiting for visibility; the host may offer "load now".
    pub deferred: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapScene {
    pub frame: CameraFrame,
    pub items: Vec<MarkerItem>,
    /// Markers sit on demo coordinates; the host must say so.
    pub using_placeholders: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackView {
    pub notice: String,
    pub error: Option<String>,
    pub list: FallbackList,
    pub can_retry: bool,
}

pub const FALLBACK_NOTICE: &str =
    "Interactive map unavailable. Showing supplier locations as a list.";
