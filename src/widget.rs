//! Maps that have not been rendered yet.

use crate::{
    config_tree::{MapOptions, PendingConfig},
    target::{MapTarget, Target},
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{io::Write, path::Path};
use uuid::Uuid;

/// A map under construction. Builder calls accumulate into its
/// [`PendingConfig`] until [`MapWidget::into_payload`] hands it to the widget
/// runtime for first render.
#[derive(Clone, Debug)]
pub struct MapWidget {
    element_id: String,
    width: Option<String>,
    height: Option<String>,
    config: PendingConfig,
}

impl MapWidget {
    pub fn new(map_options: MapOptions) -> Self {
        Self::with_id(format!("map-{}", Uuid::new_v4()), map_options)
    }

    pub fn with_id(element_id: impl Into<String>, map_options: MapOptions) -> Self {
        Self {
            element_id: element_id.into(),
            width: None,
            height: None,
            config: PendingConfig::new(map_options),
        }
    }

    /// CSS sizes, e.g. `100%` or `400px`.
    pub fn sized(mut self, width: impl Into<String>, height: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self.height = Some(height.into());
        self
    }

    pub fn config(&self) -> &PendingConfig {
        &self.config
    }

    pub fn into_payload(self) -> WidgetPayload {
        WidgetPayload {
            x: self.config,
            width: self.width,
            height: self.height,
            element_id: self.element_id,
        }
    }
}

impl MapTarget for MapWidget {
    fn map_id(&self) -> &str {
        &self.element_id
    }

    fn target(&mut self) -> Target<'_> {
        Target::Pending(&mut self.config)
    }
}

/// What the widget runtime needs for first render.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPayload {
    pub x: PendingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    pub element_id: String,
}

impl WidgetPayload {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to serialize widget payload")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .context(format!("failed to create widget payload file: {path:?}"))?;

        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)
            .context(format!("failed to write widget payload: {path:?}"))?;

        writer
            .flush()
            .context(format!("failed to flush widget payload: {path:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = MapWidget::new(MapOptions::default());
        let b = MapWidget::new(MapOptions::default());

        assert!(a.map_id().starts_with("map-"));
        assert_ne!(a.map_id(), b.map_id());
    }

    #[test]
    fn payload_carries_size_and_element_id() {
        let payload = MapWidget::with_id("map1", MapOptions::default())
            .sized("100%", "400px")
            .into_payload();

        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(value["elementId"], "map1");
        assert_eq!(value["width"], "100%");
        assert_eq!(value["height"], "400px");
        assert_eq!(
            value["x"]["mapOptions"]["style"],
            "https://demotiles.maplibre.org/style.json"
        );
        assert_eq!(value["x"]["layers"], serde_json::json!([]));
    }
}
