//! Animated routes: a line the browser can trace over time.

use crate::{
    config_tree::PendingConfig,
    target::{MapOperation, live_only},
};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[validate(min_length = 1)]
    pub route_id: String,
    /// `[lng, lat]` pairs in travel order.
    #[validate(min_items = 2)]
    pub coordinates: Vec<[f64; 2]>,
    #[serde(default = "default_colour")]
    pub colour: String,
    #[serde(default = "default_width")]
    #[validate(exclusive_minimum = 0.0)]
    pub width: f64,
    #[serde(default = "default_duration_ms")]
    #[validate(minimum = 1)]
    pub duration_ms: u64,
    #[serde(default, rename = "loop")]
    pub loop_animation: bool,
    #[serde(default)]
    pub autoplay: bool,
}

fn default_colour() -> String {
    "#e4572e".to_string()
}

fn default_width() -> f64 {
    3.0
}

fn default_duration_ms() -> u64 {
    10_000
}

impl Route {
    pub fn new(route_id: impl Into<String>, coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            route_id: route_id.into(),
            coordinates,
            colour: default_colour(),
            width: default_width(),
            duration_ms: default_duration_ms(),
            loop_animation: false,
            autoplay: false,
        }
    }
}

impl MapOperation for Route {
    fn message(&self) -> &'static str {
        "addRoute"
    }

    fn apply(self, config: &mut PendingConfig) {
        match config
            .routes
            .iter_mut()
            .find(|r| r.route_id == self.route_id)
        {
            Some(existing) => *existing = self,
            None => config.routes.push(self),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnimateRoute {
    #[validate(min_length = 1)]
    pub route_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(minimum = 1)]
    pub duration_ms: Option<u64>,
    #[serde(default, rename = "loop")]
    pub loop_animation: bool,
}

impl MapOperation for AnimateRoute {
    fn message(&self) -> &'static str {
        "animateRoute"
    }

    /// A pending route starts animating as soon as the map is rendered.
    fn apply(self, config: &mut PendingConfig) {
        match config
            .routes
            .iter_mut()
            .find(|r| r.route_id == self.route_id)
        {
            Some(route) => {
                route.autoplay = true;
                route.loop_animation = self.loop_animation;
                if let Some(duration_ms) = self.duration_ms {
                    route.duration_ms = duration_ms;
                }
            }
            None => warn!("cannot animate unknown route {}", self.route_id),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PauseRoute {
    #[validate(min_length = 1)]
    pub route_id: String,
}

impl MapOperation for PauseRoute {
    fn message(&self) -> &'static str {
        "pauseRoute"
    }

    fn apply(self, _config: &mut PendingConfig) {
        live_only(self.message());
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRoute {
    #[validate(min_length = 1)]
    pub route_id: String,
}

impl MapOperation for RemoveRoute {
    fn message(&self) -> &'static str {
        "removeRoute"
    }

    fn apply(self, _config: &mut PendingConfig) {
        live_only(self.message());
    }
}
