//! Control kinds, placement and per-kind option payloads.
//!
//! [`ControlKind`] is the registry every control builder goes through: it
//! names the message that adds a standalone control, the id the browser
//! runtime gives the control, and where the control lands when the caller
//! leaves the position unset.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_valid::Validate;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKind {
    Zoom,
    Cursor,
    Draw,
    Custom,
    Timeline,
    Speed,
    TileSelector,
    LayerSelector,
    ClusterToggle,
    VisibilityToggle,
    Group,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zoom => "zoom",
            Self::Cursor => "cursor",
            Self::Draw => "draw",
            Self::Custom => "custom",
            Self::Timeline => "timeline",
            Self::Speed => "speed",
            Self::TileSelector => "tile-selector",
            Self::LayerSelector => "layer-selector",
            Self::ClusterToggle => "cluster-toggle",
            Self::VisibilityToggle => "visibility-toggle",
            Self::Group => "group",
        }
    }

    /// Message that adds a standalone control of this kind to a live map.
    pub fn add_message(&self) -> &'static str {
        match self {
            Self::Zoom => "addZoomControl",
            Self::Cursor => "addCursorCoordsControl",
            Self::Draw => "addDraw",
            Self::Custom => "addCustomControl",
            Self::Timeline => "addTimelineControlStandalone",
            Self::Speed => "addSpeedControlStandalone",
            Self::TileSelector => "addTileSelectorControlStandalone",
            Self::LayerSelector => "addLayerSelectorControlStandalone",
            Self::ClusterToggle => "addClusterToggleControl",
            Self::VisibilityToggle => "addVisibilityToggleControl",
            Self::Group => "addControlGroup",
        }
    }

    pub fn default_position(&self) -> Position {
        match self {
            Self::Zoom | Self::TileSelector | Self::LayerSelector => Position::TopRight,
            Self::Draw | Self::Custom => Position::TopLeft,
            Self::Cursor | Self::Group => Position::BottomLeft,
            Self::Timeline | Self::Speed | Self::ClusterToggle | Self::VisibilityToggle => {
                Position::BottomRight
            }
        }
    }

    /// Whether the synthesized id of this kind embeds a layer id.
    pub fn is_per_layer(&self) -> bool {
        matches!(self, Self::ClusterToggle | Self::VisibilityToggle)
    }

    /// Id the browser runtime assigns to a standalone control of this kind.
    ///
    /// Custom controls and groups carry caller-chosen ids, so there is nothing
    /// to synthesize for them. Per-layer kinds need `layer_id`.
    pub fn control_id(&self, map_id: &str, layer_id: Option<&str>) -> Option<String> {
        let id = match self {
            Self::Zoom => format!("zoom-control-{map_id}"),
            Self::Cursor => format!("cursor-coords-{map_id}"),
            Self::Draw => format!("draw-control-{map_id}"),
            Self::Timeline => format!("timeline-control-container-{map_id}"),
            Self::Speed => format!("speed-control-{map_id}"),
            Self::TileSelector => format!("tile-selector-{map_id}"),
            Self::LayerSelector => format!("layer-selector-{map_id}"),
            Self::ClusterToggle => format!("cluster-toggle-{}-{map_id}", layer_id?),
            Self::VisibilityToggle => format!("visibility-toggle-{}-{map_id}", layer_id?),
            Self::Custom | Self::Group => return None,
        };
        Some(id)
    }
}

impl std::fmt::Display for ControlKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopRight,
    #[default]
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// Where a control is shown: in a map corner, or inside a control panel.
///
/// Panel-attached controls ignore any position. When decoding, a blank
/// `panelId` counts as standalone and keeps the given `position`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(
    untagged,
    rename_all_fields = "camelCase",
    from = "PlacementFields"
)]
pub enum Placement {
    Panel {
        panel_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        panel_title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_id: Option<String>,
    },
    Standalone {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacementFields {
    #[serde(default)]
    panel_id: Option<String>,
    #[serde(default)]
    panel_title: Option<String>,
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    position: Option<Position>,
}

impl From<PlacementFields> for Placement {
    fn from(fields: PlacementFields) -> Self {
        match fields.panel_id {
            Some(panel_id) if !panel_id.trim().is_empty() => Self::Panel {
                panel_id,
                panel_title: fields.panel_title,
                group_id: fields.group_id,
            },
            _ => Self::Standalone {
                position: fields.position,
            },
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::Standalone { position: None }
    }
}

impl Placement {
    pub fn at(position: Position) -> Self {
        Self::Standalone {
            position: Some(position),
        }
    }

    pub fn panel(panel_id: impl Into<String>) -> Self {
        Self::Panel {
            panel_id: panel_id.into(),
            panel_title: None,
            group_id: None,
        }
    }

    /// Section title shown above the control inside its panel.
    pub fn titled(self, title: impl Into<String>) -> Self {
        match self {
            Self::Panel {
                panel_id, group_id, ..
            } => Self::Panel {
                panel_id,
                panel_title: Some(title.into()),
                group_id,
            },
            standalone => standalone,
        }
    }

    pub fn in_group(self, group: impl Into<String>) -> Self {
        match self {
            Self::Panel {
                panel_id,
                panel_title,
                ..
            } => Self::Panel {
                panel_id,
                panel_title,
                group_id: Some(group.into()),
            },
            standalone => standalone,
        }
    }

    /// Panel id this placement attaches to, if any. A blank panel id counts
    /// as standalone.
    pub fn panel_id(&self) -> Option<&str> {
        match self {
            Self::Panel { panel_id, .. } if !panel_id.trim().is_empty() => Some(panel_id),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Standalone { position } => *position,
            Self::Panel { .. } => None,
        }
    }
}

/// A control as recorded in a pending map configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ControlDescriptor {
    #[serde(rename = "type")]
    pub kind: ControlKind,
    #[serde(flatten)]
    pub placement: Placement,
    pub options: Value,
}

impl ControlDescriptor {
    /// Distinguishes controls of the same kind that may coexist on one map.
    pub fn key(&self) -> Option<&str> {
        let field = match self.kind {
            ControlKind::ClusterToggle | ControlKind::VisibilityToggle => "layerId",
            ControlKind::Custom => "controlId",
            _ => return None,
        };
        self.options.get(field).and_then(Value::as_str)
    }
}

/// Option payload of one control kind.
pub trait ControlOptions: Serialize + Validate {
    const KIND: ControlKind;
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomControlOptions {
    pub show_compass: bool,
    pub show_zoom: bool,
    pub visualize_pitch: bool,
}

impl Default for ZoomControlOptions {
    fn default() -> Self {
        Self {
            show_compass: true,
            show_zoom: true,
            visualize_pitch: false,
        }
    }
}

impl ControlOptions for ZoomControlOptions {
    const KIND: ControlKind = ControlKind::Zoom;
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorControlOptions {
    #[validate(maximum = 12)]
    pub decimals: u8,
}

impl Default for CursorControlOptions {
    fn default() -> Self {
        Self { decimals: 4 }
    }
}

impl ControlOptions for CursorControlOptions {
    const KIND: ControlKind = ControlKind::Cursor;
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    Point,
    LineString,
    Polygon,
    Trash,
    CombineFeatures,
    UncombineFeatures,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawControlOptions {
    #[validate(min_items = 1)]
    pub modes: Vec<DrawMode>,
    pub freehand: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_colour: Option<String>,
}

impl Default for DrawControlOptions {
    fn default() -> Self {
        Self {
            modes: vec![
                DrawMode::Point,
                DrawMode::LineString,
                DrawMode::Polygon,
                DrawMode::Trash,
            ],
            freehand: false,
            fill_colour: None,
        }
    }
}

impl ControlOptions for DrawControlOptions {
    const KIND: ControlKind = ControlKind::Draw;
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomControlOptions {
    #[validate(min_length = 1)]
    pub control_id: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl ControlOptions for CustomControlOptions {
    const KIND: ControlKind = ControlKind::Custom;
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineControlOptions {
    #[validate(min_items = 1)]
    pub layer_ids: Vec<String>,
    #[validate(min_length = 1)]
    pub time_column: String,
    pub start: f64,
    pub end: f64,
    #[validate(exclusive_minimum = 0.0)]
    pub step: f64,
    #[validate(minimum = 1)]
    pub interval_ms: u64,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
}

impl Default for TimelineControlOptions {
    fn default() -> Self {
        Self {
            layer_ids: Vec::new(),
            time_column: String::new(),
            start: 0.0,
            end: 1.0,
            step: 1.0,
            interval_ms: 1000,
            autoplay: false,
            loop_playback: true,
        }
    }
}

impl ControlOptions for TimelineControlOptions {
    const KIND: ControlKind = ControlKind::Timeline;
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeedControlOptions {
    #[validate(exclusive_minimum = 0.0)]
    pub min: f64,
    pub max: f64,
    #[validate(exclusive_minimum = 0.0)]
    pub step: f64,
    pub value: f64,
}

impl Default for SpeedControlOptions {
    fn default() -> Self {
        Self {
            min: 0.25,
            max: 4.0,
            step: 0.25,
            value: 1.0,
        }
    }
}

impl ControlOptions for SpeedControlOptions {
    const KIND: ControlKind = ControlKind::Speed;
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TileSelectorOptions {
    #[validate(min_items = 1)]
    pub tiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

impl ControlOptions for TileSelectorOptions {
    const KIND: ControlKind = ControlKind::TileSelector;
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LayerSelectorOptions {
    #[validate(min_items = 1)]
    pub layer_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl ControlOptions for LayerSelectorOptions {
    const KIND: ControlKind = ControlKind::LayerSelector;
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClusterToggleOptions {
    #[validate(min_length = 1)]
    pub layer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub initially_clustered: bool,
}

impl ControlOptions for ClusterToggleOptions {
    const KIND: ControlKind = ControlKind::ClusterToggle;
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityToggleOptions {
    #[validate(min_length = 1)]
    pub layer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "visible_by_default")]
    pub initially_visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl ControlOptions for VisibilityToggleOptions {
    const KIND: ControlKind = ControlKind::VisibilityToggle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod control_id {
        use super::*;

        #[test]
        fn map_level_kinds_follow_the_runtime_naming() {
            let cases = [
                (ControlKind::Zoom, "zoom-control-map1"),
                (ControlKind::Cursor, "cursor-coords-map1"),
                (ControlKind::Draw, "draw-control-map1"),
                (ControlKind::Timeline, "timeline-control-container-map1"),
                (ControlKind::Speed, "speed-control-map1"),
                (ControlKind::TileSelector, "tile-selector-map1"),
                (ControlKind::LayerSelector, "layer-selector-map1"),
            ];

            for (kind, expected) in cases {
                assert_eq!(kind.control_id("map1", None).as_deref(), Some(expected));
            }
        }

        #[test]
        fn per_layer_kinds_embed_the_layer_id() {
            assert_eq!(
                ControlKind::ClusterToggle
                    .control_id("map1", Some("quakes"))
                    .as_deref(),
                Some("cluster-toggle-quakes-map1")
            );
            assert_eq!(
                ControlKind::VisibilityToggle
                    .control_id("map1", Some("quakes"))
                    .as_deref(),
                Some("visibility-toggle-quakes-map1")
            );
        }

        #[test]
        fn per_layer_kinds_without_layer_have_no_id() {
            assert_eq!(ControlKind::ClusterToggle.control_id("map1", None), None);
        }

        #[test]
        fn custom_and_group_have_no_synthesized_id() {
            assert_eq!(ControlKind::Custom.control_id("map1", None), None);
            assert_eq!(ControlKind::Group.control_id("map1", None), None);
        }
    }

    mod placement {
        use super::*;

        #[test]
        fn blank_panel_id_counts_as_standalone() {
            assert_eq!(Placement::panel("  ").panel_id(), None);
            assert_eq!(Placement::panel("layers").panel_id(), Some("layers"));
        }

        #[test]
        fn panel_placement_ignores_position() {
            let placement: Placement =
                serde_json::from_value(json!({"panelId": "p1", "position": "top-left"}))
                    .unwrap();

            assert_eq!(placement, Placement::panel("p1"));
            assert_eq!(placement.position(), None);
        }

        #[test]
        fn blank_panel_id_keeps_position_when_decoded() {
            let placement: Placement =
                serde_json::from_value(json!({"panelId": " ", "position": "top-left"}))
                    .unwrap();

            assert_eq!(placement, Placement::at(Position::TopLeft));
            assert_eq!(placement.position(), Some(Position::TopLeft));
        }

        #[test]
        fn empty_object_is_standalone_without_position() {
            let placement: Placement = serde_json::from_value(json!({})).unwrap();

            assert_eq!(placement, Placement::default());
        }

        #[test]
        fn standalone_placement_deserializes_position() {
            let placement: Placement =
                serde_json::from_value(json!({"position": "top-right"})).unwrap();

            assert_eq!(placement, Placement::at(Position::TopRight));
        }

        #[test]
        fn titled_and_grouped_panel_serializes_camel_case() {
            let placement = Placement::panel("p1").titled("Layers").in_group("g1");

            assert_eq!(
                serde_json::to_value(&placement).unwrap(),
                json!({"panelId": "p1", "panelTitle": "Layers", "groupId": "g1"})
            );
        }
    }

    #[test]
    fn descriptor_key_uses_layer_for_toggles() {
        let descriptor = ControlDescriptor {
            kind: ControlKind::VisibilityToggle,
            placement: Placement::default(),
            options: json!({"layerId": "roads"}),
        };

        assert_eq!(descriptor.key(), Some("roads"));
    }

    #[test]
    fn option_structs_validate() {
        assert!(ClusterToggleOptions::default().validate().is_err());
        assert!(ZoomControlOptions::default().validate().is_ok());
        assert!(
            SpeedControlOptions {
                step: 0.0,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
    }
}
