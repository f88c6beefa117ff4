use crate::{config_tree::PendingConfig, target::MapOperation};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_valid::Validate;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerType {
    Fill,
    Line,
    Circle,
    Symbol,
    Heatmap,
    FillExtrusion,
    Raster,
    Hillshade,
    Background,
}

/// A style layer. Rendering order follows declaration order unless
/// `before_id` names a layer to insert in front of; the browser resolves it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[validate(min_length = 1)]
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        default,
        rename = "source-layer",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_layer: Option<String>,
    #[serde(default)]
    pub paint: Map<String, Value>,
    #[serde(default)]
    pub layout: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_column: Option<String>,
    #[serde(default)]
    pub can_cluster: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clustered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(minimum = 0.0)]
    #[validate(maximum = 24.0)]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(minimum = 0.0)]
    #[validate(maximum = 24.0)]
    pub maxzoom: Option<f64>,
}

impl Layer {
    pub fn new(id: impl Into<String>, layer_type: LayerType, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layer_type,
            source: Some(source.into()),
            source_layer: None,
            paint: Map::new(),
            layout: Map::new(),
            popup_column: None,
            hover_column: None,
            can_cluster: false,
            clustered: None,
            filter: None,
            before_id: None,
            minzoom: None,
            maxzoom: None,
        }
    }

    pub fn paint(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.paint.insert(property.to_string(), value.into());
        self
    }

    pub fn layout(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.layout.insert(property.to_string(), value.into());
        self
    }

    pub fn source_layer(mut self, source_layer: impl Into<String>) -> Self {
        self.source_layer = Some(source_layer.into());
        self
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn before(mut self, layer_id: impl Into<String>) -> Self {
        self.before_id = Some(layer_id.into());
        self
    }

    pub fn popup(mut self, column: impl Into<String>) -> Self {
        self.popup_column = Some(column.into());
        self
    }

    pub fn hover(mut self, column: impl Into<String>) -> Self {
        self.hover_column = Some(column.into());
        self
    }

    pub fn clusterable(mut self) -> Self {
        self.can_cluster = true;
        self
    }

    pub fn zoom_range(mut self, minzoom: f64, maxzoom: f64) -> Self {
        self.minzoom = Some(minzoom);
        self.maxzoom = Some(maxzoom);
        self
    }
}

/// Layer declaration as an operation. The layer travels under `layer` so its
/// own `id` cannot shadow the target map id.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
pub struct AddLayer {
    #[validate]
    pub layer: Layer,
}

impl MapOperation for AddLayer {
    fn message(&self) -> &'static str {
        "addLayer"
    }

    fn apply(self, config: &mut PendingConfig) {
        config.upsert_layer(self.layer);
    }
}

fn with_layer(config: &mut PendingConfig, layer_id: &str, f: impl FnOnce(&mut Layer)) {
    match config.layer_mut(layer_id) {
        Some(layer) => f(layer),
        None => warn!("layer {layer_id} not declared yet, ignoring"),
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HideLayer {
    #[validate(min_length = 1)]
    pub layer_id: String,
}

impl MapOperation for HideLayer {
    fn message(&self) -> &'static str {
        "hideLayer"
    }

    fn apply(self, config: &mut PendingConfig) {
        with_layer(config, &self.layer_id, |layer| {
            layer.layout.insert("visibility".to_string(), "none".into());
        });
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShowLayer {
    #[validate(min_length = 1)]
    pub layer_id: String,
}

impl MapOperation for ShowLayer {
    fn message(&self) -> &'static str {
        "showLayer"
    }

    fn apply(self, config: &mut PendingConfig) {
        with_layer(config, &self.layer_id, |layer| {
            layer
                .layout
                .insert("visibility".to_string(), "visible".into());
        });
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleClustering {
    #[validate(min_length = 1)]
    pub layer_id: String,
    pub enabled: bool,
}

impl MapOperation for ToggleClustering {
    fn message(&self) -> &'static str {
        "toggleClustering"
    }

    fn apply(self, config: &mut PendingConfig) {
        with_layer(config, &self.layer_id, |layer| {
            if !layer.can_cluster {
                warn!("layer {} was not declared clusterable", layer.id);
            }
            layer.clustered = Some(self.enabled);
        });
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetPaintProperty {
    #[validate(min_length = 1)]
    pub layer_id: String,
    #[validate(min_length = 1)]
    pub property: String,
    pub value: Value,
}

impl MapOperation for SetPaintProperty {
    fn message(&self) -> &'static str {
        "setPaintProp"
    }

    fn apply(self, config: &mut PendingConfig) {
        let Self {
            layer_id,
            property,
            value,
        } = self;
        with_layer(config, &layer_id, |layer| {
            layer.paint.insert(property, value);
        });
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetLayoutProperty {
    #[validate(min_length = 1)]
    pub layer_id: String,
    #[validate(min_length = 1)]
    pub property: String,
    pub value: Value,
}

impl MapOperation for SetLayoutProperty {
    fn message(&self) -> &'static str {
        "setLayoutProp"
    }

    fn apply(self, config: &mut PendingConfig) {
        let Self {
            layer_id,
            property,
            value,
        } = self;
        with_layer(config, &layer_id, |layer| {
            layer.layout.insert(property, value);
        });
    }
}
