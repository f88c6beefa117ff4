use crate::{
    config_tree::PendingConfig,
    feature::GeoJsonData,
    target::MapOperation,
};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use serde_valid::Validate;

/// Source specification as understood by the map library (`type`, `data`,
/// `tiles`, ...). Kept as an open map since every source type has its own keys.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SourceOptions(Map<String, Value>);

impl SourceOptions {
    pub fn geojson(data: GeoJsonData) -> Self {
        Self::default()
            .with("type", "geojson")
            .with("data", data.to_value())
    }

    pub fn vector(url: impl Into<String>) -> Self {
        Self::default()
            .with("type", "vector")
            .with("url", url.into())
    }

    pub fn vector_tiles(tiles: Vec<String>) -> Self {
        Self::default().with("type", "vector").with("tiles", tiles)
    }

    pub fn raster(tiles: Vec<String>, tile_size: u32) -> Self {
        Self::default()
            .with("type", "raster")
            .with("tiles", tiles)
            .with("tileSize", tile_size)
    }

    /// Cluster points of a GeoJSON source.
    pub fn clustered(self, radius: u32, max_zoom: u32) -> Self {
        self.with("cluster", true)
            .with("clusterRadius", radius)
            .with("clusterMaxZoom", max_zoom)
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[validate(min_length = 1)]
    pub source_id: String,
    pub source_options: SourceOptions,
}

impl Source {
    pub fn new(source_id: impl Into<String>, source_options: SourceOptions) -> Self {
        Self {
            source_id: source_id.into(),
            source_options,
        }
    }
}

impl MapOperation for Source {
    fn message(&self) -> &'static str {
        "addMapSource"
    }

    fn apply(self, config: &mut PendingConfig) {
        config.upsert_source(self);
    }
}

/// Features fetched by the browser from an ArcGIS feature server.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeatureServerSource {
    #[validate(min_length = 1)]
    pub source_id: String,
    #[validate(min_length = 1)]
    pub url: String,
    #[serde(default)]
    pub source_options: SourceOptions,
}

impl MapOperation for FeatureServerSource {
    fn message(&self) -> &'static str {
        "addFeatureServerSource"
    }

    fn apply(self, config: &mut PendingConfig) {
        match config
            .feature_server_sources
            .iter_mut()
            .find(|s| s.source_id == self.source_id)
        {
            Some(existing) => *existing = self,
            None => config.feature_server_sources.push(self),
        }
    }
}

/// A georeferenced image; corners run top-left, top-right, bottom-right,
/// bottom-left as `[lng, lat]`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    #[validate(min_length = 1)]
    pub source_id: String,
    #[validate(min_length = 1)]
    pub url: String,
    pub coordinates: [[f64; 2]; 4],
}

impl MapOperation for ImageSource {
    fn message(&self) -> &'static str {
        "addImageSource"
    }

    fn apply(self, config: &mut PendingConfig) {
        let options = SourceOptions::default()
            .with("type", "image")
            .with("url", self.url)
            .with("coordinates", json!(self.coordinates));
        config.upsert_source(Source::new(self.source_id, options));
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSourceData {
    #[validate(min_length = 1)]
    pub source_id: String,
    pub data: GeoJsonData,
}

impl MapOperation for UpdateSourceData {
    fn message(&self) -> &'static str {
        "updateSourceData"
    }

    fn apply(self, config: &mut PendingConfig) {
        match config.source_mut(&self.source_id) {
            Some(source) => {
                source
                    .source_options
                    .0
                    .insert("data".to_string(), self.data.to_value());
            }
            None => warn!("cannot update data of unknown source {}", self.source_id),
        }
    }
}
