//! Declarative description of a map before its first render.

use crate::{
    control::{ControlDescriptor, ControlKind, Placement},
    operations::{
        layers::Layer,
        panels::{ControlPanel, PanelEntry, PanelOptions},
        routes::Route,
        sources::{FeatureServerSource, Source},
        view::{LatLngGrid, SetBounds},
    },
};
use log::{debug, warn};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

/// A slot that keeps the first value written to it.
///
/// Later writes are ignored and reported through the return value of
/// [`SetOnce::set`], so callers decide how loudly to drop them.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SetOnce<T>(Option<T>);

impl<T> Default for SetOnce<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> SetOnce<T> {
    /// Store `value` unless the slot is already taken. Returns whether it was stored.
    pub fn set(&mut self, value: T) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(value);
        true
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.0.as_mut()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }
}

/// Options the map is constructed with.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            style: "https://demotiles.maplibre.org/style.json".to_string(),
            center: None,
            zoom: None,
            pitch: None,
            bearing: None,
        }
    }
}

/// Everything the browser runtime needs to paint a map for the first time.
///
/// Owned by a single call chain and consumed once when the widget payload is
/// rendered.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingConfig {
    pub map_options: MapOptions,
    pub sources: Vec<Source>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feature_server_sources: Vec<FeatureServerSource>,
    pub layers: Vec<Layer>,
    #[serde(serialize_with = "panels_by_id")]
    pub control_panels: Vec<ControlPanel>,
    #[serde(skip_serializing_if = "SetOnce::is_unset")]
    pub zoom_control: SetOnce<ControlDescriptor>,
    #[serde(skip_serializing_if = "SetOnce::is_unset")]
    pub cursor_controls: SetOnce<ControlDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_control: Option<ControlDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_controls: Vec<ControlDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_control: Option<ControlDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_control: Option<ControlDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_selector_control: Option<ControlDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_selector_control: Option<ControlDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cluster_toggle_controls: Vec<ControlDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub visibility_toggle_controls: Vec<ControlDescriptor>,
    /// Every control above plus panel-attached ones, in declaration order.
    pub controls: Vec<ControlDescriptor>,
    #[serde(skip_serializing_if = "SetOnce::is_unset")]
    pub lat_lng_grid: SetOnce<LatLngGrid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_tile_layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_zoom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_bounds: Option<SetBounds>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

fn panels_by_id<S: Serializer>(panels: &[ControlPanel], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(panels.len()))?;
    for panel in panels {
        map.serialize_entry(&panel.panel_id, panel)?;
    }
    map.end()
}

impl PendingConfig {
    pub fn new(map_options: MapOptions) -> Self {
        Self {
            map_options,
            ..Default::default()
        }
    }

    pub fn source(&self, source_id: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.source_id == source_id)
    }

    pub fn source_mut(&mut self, source_id: &str) -> Option<&mut Source> {
        self.sources.iter_mut().find(|s| s.source_id == source_id)
    }

    /// Add a source, replacing one with the same id in place.
    pub fn upsert_source(&mut self, source: Source) {
        match self.source_mut(&source.source_id) {
            Some(existing) => {
                debug!("replacing source {}", source.source_id);
                *existing = source;
            }
            None => self.sources.push(source),
        }
    }

    pub fn layer(&self, layer_id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    pub fn layer_mut(&mut self, layer_id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == layer_id)
    }

    /// Append a layer; a layer with an id already declared replaces it in place.
    pub fn upsert_layer(&mut self, layer: Layer) {
        match self.layer_mut(&layer.id) {
            Some(existing) => {
                warn!("layer {} declared twice, keeping the later one", layer.id);
                *existing = layer;
            }
            None => self.layers.push(layer),
        }
    }

    pub fn panel(&self, panel_id: &str) -> Option<&ControlPanel> {
        self.control_panels.iter().find(|p| p.panel_id == panel_id)
    }

    /// Return the panel with `panel_id`, creating it from `options` (or the
    /// defaults) when absent. An existing panel keeps its metadata and entries.
    pub fn upsert_panel(
        &mut self,
        panel_id: &str,
        options: Option<PanelOptions>,
    ) -> &mut ControlPanel {
        let index = match self
            .control_panels
            .iter()
            .position(|p| p.panel_id == panel_id)
        {
            Some(index) => index,
            None => {
                debug!("creating control panel {panel_id}");
                self.control_panels.push(ControlPanel {
                    panel_id: panel_id.to_string(),
                    options: options.unwrap_or_default(),
                });
                self.control_panels.len() - 1
            }
        };
        &mut self.control_panels[index]
    }

    /// Append a group or control to a panel, creating the panel if needed.
    pub fn add_panel_entry(&mut self, panel_id: &str, entry: PanelEntry) {
        if let PanelEntry::Control(control) = &entry {
            self.mirror_control(ControlDescriptor {
                kind: control.control_type,
                placement: Placement::Panel {
                    panel_id: panel_id.to_string(),
                    panel_title: control.panel_title.clone(),
                    group_id: control.group_id.clone(),
                },
                options: control.control_options.clone(),
            });
        }
        self.upsert_panel(panel_id, None)
            .options
            .panel_controls
            .push(entry);
    }

    /// Record a corner-positioned control in the slot of its kind.
    ///
    /// Zoom and cursor controls keep the first declaration; other singleton
    /// kinds keep the latest; per-layer and custom controls are keyed by their
    /// layer or control id. Returns whether the control was recorded.
    pub fn add_standalone_control(&mut self, control: ControlDescriptor) -> bool {
        let stored = match control.kind {
            ControlKind::Zoom => self.zoom_control.set(control.clone()),
            ControlKind::Cursor => self.cursor_controls.set(control.clone()),
            ControlKind::Draw => replace(&mut self.draw_control, control.clone()),
            ControlKind::Timeline => replace(&mut self.timeline_control, control.clone()),
            ControlKind::Speed => replace(&mut self.speed_control, control.clone()),
            ControlKind::TileSelector => replace(&mut self.tile_selector_control, control.clone()),
            ControlKind::LayerSelector => {
                replace(&mut self.layer_selector_control, control.clone())
            }
            ControlKind::Custom => upsert_keyed(&mut self.custom_controls, control.clone()),
            ControlKind::ClusterToggle => {
                upsert_keyed(&mut self.cluster_toggle_controls, control.clone())
            }
            ControlKind::VisibilityToggle => {
                upsert_keyed(&mut self.visibility_toggle_controls, control.clone())
            }
            ControlKind::Group => {
                warn!("control groups live in panels, ignoring standalone group");
                false
            }
        };

        if stored {
            self.mirror_control(control);
        } else {
            warn!(
                "{} control already declared for this map, ignoring",
                control.kind
            );
        }

        stored
    }

    fn mirror_control(&mut self, control: ControlDescriptor) {
        let existing = self.controls.iter_mut().find(|c| {
            c.kind == control.kind
                && c.key() == control.key()
                && c.placement.panel_id() == control.placement.panel_id()
                && c.placement.panel_id().is_none()
        });

        match existing {
            Some(existing) => *existing = control,
            None => self.controls.push(control),
        }
    }
}

fn replace(slot: &mut Option<ControlDescriptor>, control: ControlDescriptor) -> bool {
    if slot.is_some() {
        debug!("replacing {} control", control.kind);
    }
    *slot = Some(control);
    true
}

fn upsert_keyed(slots: &mut Vec<ControlDescriptor>, control: ControlDescriptor) -> bool {
    match slots.iter_mut().find(|c| c.key() == control.key()) {
        Some(existing) => *existing = control,
        None => slots.push(control),
    }
    true
}
