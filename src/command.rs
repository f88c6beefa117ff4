//! Builder calls recorded as data, one JSON object per call.
//!
//! A journal line names the call in `op` and carries its arguments by wire name:
//!
//! ```json
//! {"op": "addLayer", "id": "quakes", "type": "circle", "source": "quakes"}
//! {"op": "addControl", "kind": "zoom", "placement": {"position": "top-left"}}
//! {"op": "setZoom", "zoom": 4}
//! ```

use crate::{
    builder::MapBuilder,
    control::{ControlKind, Placement},
    operations::{
        controls::{DeleteDrawnShape, HideDrawControls, RemoveControl, ShowDrawControls, ToggleControl},
        export::DownloadMapImage,
        layers::{
            AddLayer, HideLayer, Layer, SetLayoutProperty, SetPaintProperty, ShowLayer, ToggleClustering,
        },
        panels::{
            AddControlGroup, AddControlPanel, AddControlToPanel, RemoveControlFromPanel,
            RemoveControlGroup,
        },
        routes::{AnimateRoute, PauseRoute, RemoveRoute, Route},
        sources::{FeatureServerSource, ImageSource, Source, UpdateSourceData},
        view::{LatLngGrid, SelectTiles, SetBounds, SetZoom, ToggleLatLngGrid},
    },
    target::MapTarget,
};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MapCommand {
    AddSource(Source),
    AddFeatureServerSource(FeatureServerSource),
    AddImageSource(ImageSource),
    UpdateSourceData(UpdateSourceData),
    AddLayer(Layer),
    HideLayer(HideLayer),
    ShowLayer(ShowLayer),
    SetSelectedTiles(SelectTiles),
    ToggleClustering(ToggleClustering),
    #[serde(rename = "setPaintProp")]
    SetPaintProperty(SetPaintProperty),
    #[serde(rename = "setLayoutProp")]
    SetLayoutProperty(SetLayoutProperty),
    AddLatLngGrid(LatLngGrid),
    ToggleLatLngGrid(ToggleLatLngGrid),
    #[serde(rename = "setMapZoom")]
    SetZoom(SetZoom),
    #[serde(rename = "setMapBounds")]
    SetBounds(SetBounds),
    /// Any control kind, standalone or redirected into a panel.
    AddControl {
        kind: ControlKind,
        #[serde(default = "empty_options")]
        options: Value,
        #[serde(default)]
        placement: Placement,
    },
    RemoveControl(RemoveControl),
    /// Remove a standalone control by kind; per-layer kinds need `layerId`.
    RemoveControlOfKind {
        kind: ControlKind,
        #[serde(default)]
        layer_id: Option<String>,
    },
    ToggleControl(ToggleControl),
    DeleteDrawnShape(DeleteDrawnShape),
    HideDrawControls(HideDrawControls),
    ShowDrawControls(ShowDrawControls),
    AddControlPanel(AddControlPanel),
    AddControlGroup(AddControlGroup),
    RemoveControlGroup(RemoveControlGroup),
    AddControlToPanel(AddControlToPanel),
    RemoveControlFromPanel(RemoveControlFromPanel),
    AddRoute(Route),
    AnimateRoute(AnimateRoute),
    PauseRoute(PauseRoute),
    RemoveRoute(RemoveRoute),
    DownloadMapImage(DownloadMapImage),
}

fn empty_options() -> Value {
    Value::Object(Map::new())
}

impl MapCommand {
    /// Replay the call onto a pending or live map.
    pub fn apply<M: MapTarget + ?Sized>(self, map: &mut M) {
        match self {
            Self::AddSource(op) => map.dispatch(op),
            Self::AddFeatureServerSource(op) => map.dispatch(op),
            Self::AddImageSource(op) => map.dispatch(op),
            Self::UpdateSourceData(op) => map.dispatch(op),
            Self::AddLayer(layer) => map.dispatch(AddLayer { layer }),
            Self::HideLayer(op) => map.dispatch(op),
            Self::ShowLayer(op) => map.dispatch(op),
            Self::SetSelectedTiles(op) => map.dispatch(op),
            Self::ToggleClustering(op) => map.dispatch(op),
            Self::SetPaintProperty(op) => map.dispatch(op),
            Self::SetLayoutProperty(op) => map.dispatch(op),
            Self::AddLatLngGrid(op) => map.dispatch(op),
            Self::ToggleLatLngGrid(op) => map.dispatch(op),
            Self::SetZoom(op) => map.dispatch(op),
            Self::SetBounds(op) => map.dispatch(op),
            Self::AddControl {
                kind,
                options,
                placement,
            } => map.add_control_value(kind, options, placement),
            Self::RemoveControl(op) => map.dispatch(op),
            Self::RemoveControlOfKind { kind, layer_id } => {
                map.remove_control_of_kind(kind, layer_id.as_deref())
            }
            Self::ToggleControl(op) => map.dispatch(op),
            Self::DeleteDrawnShape(op) => map.dispatch(op),
            Self::HideDrawControls(op) => map.dispatch(op),
            Self::ShowDrawControls(op) => map.dispatch(op),
            Self::AddControlPanel(op) => map.dispatch(op),
            Self::AddControlGroup(op) => map.dispatch(op),
            Self::RemoveControlGroup(op) => map.dispatch(op),
            Self::AddControlToPanel(op) => map.dispatch(op),
            Self::RemoveControlFromPanel(op) => map.dispatch(op),
            Self::AddRoute(op) => map.dispatch(op),
            Self::AnimateRoute(op) => map.dispatch(op),
            Self::PauseRoute(op) => map.dispatch(op),
            Self::RemoveRoute(op) => map.dispatch(op),
            Self::DownloadMapImage(op) => map.dispatch(op),
        };
    }
}
