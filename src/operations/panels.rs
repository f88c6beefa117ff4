//! Control panels: containers holding groups and controls in declaration order.

use crate::{
    config_tree::PendingConfig,
    control::{ControlKind, Direction, Position},
    target::{MapOperation, live_only},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_valid::Validate;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelOptions {
    pub title: Option<String>,
    pub position: Position,
    pub collapsible: bool,
    pub collapsed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub panel_controls: Vec<PanelEntry>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            title: None,
            position: Position::BottomLeft,
            collapsible: true,
            collapsed: false,
            direction: None,
            panel_controls: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPanel {
    pub panel_id: String,
    pub options: PanelOptions,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PanelEntry {
    Group(GroupDescriptor),
    Control(PanelControl),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GroupDescriptor {
    #[validate(min_length = 1)]
    pub group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub collapsible: bool,
    #[serde(default)]
    pub collapsed: bool,
}

impl Default for GroupDescriptor {
    fn default() -> Self {
        Self {
            group_id: String::new(),
            title: None,
            collapsible: true,
            collapsed: false,
        }
    }
}

/// A control attached to a panel. The options are passed through untouched.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PanelControl {
    pub control_type: ControlKind,
    pub control_options: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddControlPanel {
    #[validate(min_length = 1)]
    pub panel_id: String,
    #[serde(default)]
    pub options: PanelOptions,
}

impl MapOperation for AddControlPanel {
    fn message(&self) -> &'static str {
        "addControlPanel"
    }

    fn apply(self, config: &mut PendingConfig) {
        config.upsert_panel(&self.panel_id, Some(self.options));
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddControlGroup {
    #[validate(min_length = 1)]
    pub panel_id: String,
    #[serde(flatten)]
    #[validate]
    pub group: GroupDescriptor,
}

impl MapOperation for AddControlGroup {
    fn message(&self) -> &'static str {
        "addControlGroup"
    }

    fn apply(self, config: &mut PendingConfig) {
        config.add_panel_entry(&self.panel_id, PanelEntry::Group(self.group));
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddControlToPanel {
    #[validate(min_length = 1)]
    pub panel_id: String,
    #[serde(flatten)]
    pub control: PanelControl,
}

impl MapOperation for AddControlToPanel {
    fn message(&self) -> &'static str {
        "addControlToPanel"
    }

    fn apply(self, config: &mut PendingConfig) {
        config.add_panel_entry(&self.panel_id, PanelEntry::Control(self.control));
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveControlGroup {
    #[validate(min_length = 1)]
    pub panel_id: String,
    #[validate(min_length = 1)]
    pub group_id: String,
}

impl MapOperation for RemoveControlGroup {
    fn message(&self) -> &'static str {
        "removeControlGroup"
    }

    fn apply(self, _config: &mut PendingConfig) {
        live_only(self.message());
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveControlFromPanel {
    #[validate(min_length = 1)]
    pub panel_id: String,
    #[validate(min_length = 1)]
    pub control_id: String,
}

impl MapOperation for RemoveControlFromPanel {
    fn message(&self) -> &'static str {
        "removeControlFromPanel"
    }

    fn apply(self, _config: &mut PendingConfig) {
        live_only(self.message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_panel_twice_keeps_accumulated_controls() {
        let mut config = PendingConfig::default();

        AddControlPanel {
            panel_id: "p1".to_string(),
            options: PanelOptions {
                title: Some("Layers".to_string()),
                ..Default::default()
            },
        }
        .apply(&mut config);
        AddControlGroup {
            panel_id: "p1".to_string(),
            group: GroupDescriptor {
                group_id: "g1".to_string(),
                ..Default::default()
            },
        }
        .apply(&mut config);
        AddControlToPanel {
            panel_id: "p1".to_string(),
            control: PanelControl {
                control_type: ControlKind::VisibilityToggle,
                control_options: json!({"layerId": "roads"}),
                panel_title: None,
                group_id: Some("g1".to_string()),
            },
        }
        .apply(&mut config);
        AddControlPanel {
            panel_id: "p1".to_string(),
            options: PanelOptions::default(),
        }
        .apply(&mut config);

        let panel = config.panel("p1").unwrap();
        assert_eq!(panel.options.title.as_deref(), Some("Layers"));
        assert_eq!(panel.options.panel_controls.len(), 2);
    }

    #[test]
    fn group_for_missing_panel_creates_it() {
        let mut config = PendingConfig::default();

        AddControlGroup {
            panel_id: "auto".to_string(),
            group: GroupDescriptor {
                group_id: "g1".to_string(),
                ..Default::default()
            },
        }
        .apply(&mut config);

        let panel = config.panel("auto").unwrap();
        assert_eq!(panel.options.position, Position::BottomLeft);
        assert!(panel.options.collapsible);
    }

    #[test]
    fn removals_leave_pending_config_untouched() {
        let mut config = PendingConfig::default();
        config.upsert_panel("p1", None);
        let before = config.clone();

        RemoveControlGroup {
            panel_id: "p1".to_string(),
            group_id: "g1".to_string(),
        }
        .apply(&mut config);

        assert_eq!(config, before);
    }

    #[test]
    fn panel_entries_are_tagged() {
        let entry = PanelEntry::Group(GroupDescriptor {
            group_id: "g1".to_string(),
            title: Some("Basemaps".to_string()),
            ..Default::default()
        });

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "type": "group",
                "groupId": "g1",
                "title": "Basemaps",
                "collapsible": true,
                "collapsed": false,
            })
        );
    }

    #[test]
    fn add_control_to_panel_flattens_control() {
        let operation = AddControlToPanel {
            panel_id: "p1".to_string(),
            control: PanelControl {
                control_type: ControlKind::Speed,
                control_options: json!({"value": 1.0}),
                panel_title: Some("Playback".to_string()),
                group_id: None,
            },
        };

        assert_eq!(
            serde_json::to_value(&operation).unwrap(),
            json!({
                "panelId": "p1",
                "controlType": "speed",
                "controlOptions": {"value": 1.0},
                "panelTitle": "Playback",
            })
        );
    }
}
