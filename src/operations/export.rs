use crate::{
    config_tree::PendingConfig,
    target::{MapOperation, live_only},
};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

/// Ask the browser to save the current canvas as an image.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadMapImage {
    #[validate(min_length = 1)]
    pub filename: String,
    #[serde(default)]
    pub format: ImageFormat,
}

impl MapOperation for DownloadMapImage {
    fn message(&self) -> &'static str {
        "downloadMapImage"
    }

    fn apply(self, _config: &mut PendingConfig) {
        live_only(self.message());
    }
}
