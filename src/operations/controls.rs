use crate::{
    config_tree::PendingConfig,
    control::{ControlDescriptor, ControlKind, Placement, Position},
    target::{MapOperation, live_only},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_valid::Validate;

/// A control placed in a map corner. On the wire the kind's options are
/// flattened next to `position`; the message name comes from the kind.
#[derive(Clone, Debug, PartialEq, Serialize, Validate)]
pub struct AddStandaloneControl {
    #[serde(skip)]
    pub kind: ControlKind,
    pub position: Position,
    #[serde(flatten)]
    pub options: Value,
}

impl MapOperation for AddStandaloneControl {
    fn message(&self) -> &'static str {
        self.kind.add_message()
    }

    fn apply(self, config: &mut PendingConfig) {
        config.add_standalone_control(ControlDescriptor {
            kind: self.kind,
            placement: Placement::at(self.position),
            options: self.options,
        });
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveControl {
    #[validate(min_length = 1)]
    pub control_id: String,
}

impl MapOperation for RemoveControl {
    fn message(&self) -> &'static str {
        "removeControl"
    }

    fn apply(self, _config: &mut PendingConfig) {
        live_only(self.message());
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleControl {
    #[validate(min_length = 1)]
    pub control_id: String,
    pub visible: bool,
}

impl MapOperation for ToggleControl {
    fn message(&self) -> &'static str {
        "toggleControl"
    }

    fn apply(self, _config: &mut PendingConfig) {
        live_only(self.message());
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDrawnShape {
    #[validate(min_length = 1)]
    pub shape_id: String,
}

impl MapOperation for DeleteDrawnShape {
    fn message(&self) -> &'static str {
        "deleteDrawnShape"
    }

    fn apply(self, _config: &mut PendingConfig) {
        live_only(self.message());
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
pub struct HideDrawControls {}

impl MapOperation for HideDrawControls {
    fn message(&self) -> &'static str {
        "hideDrawControls"
    }

    fn apply(self, _config: &mut PendingConfig) {
        live_only(self.message());
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
pub struct ShowDrawControls {}

impl MapOperation for ShowDrawControls {
    fn message(&self) -> &'static str {
        "showDrawControls"
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
    fn standalone_control_flattens_options() {
        let operation = AddStandaloneControl {
            kind: ControlKind::Cursor,
            position: Position::BottomLeft,
            options: json!({"decimals": 4}),
        };

        assert_eq!(operation.message(), "addCursorCoordsControl");
        assert_eq!(
            serde_json::to_value(&operation).unwrap(),
            json!({"position": "bottom-left", "decimals": 4})
        );
    }

    #[test]
    fn standalone_control_lands_in_its_slot() {
        let mut config = PendingConfig::default();

        AddStandaloneControl {
            kind: ControlKind::Draw,
            position: Position::TopLeft,
            options: json!({"modes": ["polygon"]}),
        }
        .apply(&mut config);

        let draw = config.draw_control.as_ref().unwrap();
        assert_eq!(draw.placement, Placement::at(Position::TopLeft));
        assert_eq!(config.controls, vec![draw.clone()]);
    }

    #[test]
    fn live_only_operations_do_not_touch_pending_config() {
        let mut config = PendingConfig::default();

        RemoveControl {
            control_id: "zoom-control-map1".to_string(),
        }
        .apply(&mut config);
        HideDrawControls {}.apply(&mut config);
        DeleteDrawnShape {
            shape_id: "abc".to_string(),
        }
        .apply(&mut config);

        assert_eq!(config, PendingConfig::default());
    }
}
