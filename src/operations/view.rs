use crate::{config_tree::PendingConfig, target::MapOperation};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// Graticule drawn over the map.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct LatLngGrid {
    #[validate(exclusive_minimum = 0.0)]
    #[validate(maximum = 90.0)]
    pub spacing: f64,
    pub colour: String,
    #[validate(exclusive_minimum = 0.0)]
    pub width: f64,
    #[validate(minimum = 0.0)]
    #[validate(maximum = 1.0)]
    pub opacity: f64,
    pub labels: bool,
    pub visible: bool,
}

impl Default for LatLngGrid {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            colour: "#888888".to_string(),
            width: 1.0,
            opacity: 0.6,
            labels: true,
            visible: true,
        }
    }
}

impl MapOperation for LatLngGrid {
    fn message(&self) -> &'static str {
        "addLatLngGrid"
    }

    fn apply(self, config: &mut PendingConfig) {
        if !config.lat_lng_grid.set(self) {
            warn!("lat/lng grid already declared for this map, ignoring");
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
pub struct ToggleLatLngGrid {
    pub visible: bool,
}

impl MapOperation for ToggleLatLngGrid {
    fn message(&self) -> &'static str {
        "toggleLatLngGrid"
    }

    fn apply(self, config: &mut PendingConfig) {
        match config.lat_lng_grid.get_mut() {
            Some(grid) => grid.visible = self.visible,
            None => warn!("no lat/lng grid declared, ignoring toggle"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
pub struct SetZoom {
    #[validate(minimum = 0.0)]
    #[validate(maximum = 24.0)]
    pub zoom: f64,
}

impl MapOperation for SetZoom {
    fn message(&self) -> &'static str {
        "setMapZoom"
    }

    fn apply(self, config: &mut PendingConfig) {
        config.set_zoom = Some(self.zoom);
    }
}

/// Fit the view to `[west, south, east, north]`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetBounds {
    pub bounds: [f64; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(minimum = 0.0)]
    pub padding: Option<f64>,
    #[serde(default)]
    pub animate: bool,
}

impl MapOperation for SetBounds {
    fn message(&self) -> &'static str {
        "setMapBounds"
    }

    fn apply(self, config: &mut PendingConfig) {
        config.set_bounds = Some(self);
    }
}

/// Switch the basemap tiles shown by the tile selector.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
pub struct SelectTiles {
    #[validate(min_length = 1)]
    pub tiles: String,
}

impl MapOperation for SelectTiles {
    fn message(&self) -> &'static str {
        "setSelectedTiles"
    }

    fn apply(self, config: &mut PendingConfig) {
        config.initial_tile_layer = Some(self.tiles);
    }
}
