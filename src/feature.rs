//! GeoJSON adapters: normalising source data on the way out, decoding
//! clicked features and drawn shapes on the way back in.

use crate::error::MapError;
use log::debug;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};

const GEOMETRY_TYPES: [&str; 7] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
];

/// GeoJSON handed to a source: either inline data or a URL the browser fetches.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "Value")]
pub enum GeoJsonData {
    Inline(Value),
    Url(String),
}

impl GeoJsonData {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Inline data, normalised to a `FeatureCollection`.
    pub fn inline(value: Value) -> Result<Self, MapError> {
        to_feature_collection(value).map(Self::Inline)
    }

    /// GeoJSON text or a URL.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let text = text.trim();

        if text.starts_with('{') || text.starts_with('[') {
            let value: Value = serde_json::from_str(text)
                .map_err(|e| MapError::invalid_input(format!("GeoJSON parse error: {e}")))?;
            return Self::inline(value);
        }

        if text.starts_with("http://") || text.starts_with("https://") || text.starts_with('/') {
            return Ok(Self::url(text));
        }

        Err(MapError::invalid_input(format!(
            "neither GeoJSON nor a URL: {text:.40}"
        )))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Inline(value) => value.clone(),
            Self::Url(url) => Value::String(url.clone()),
        }
    }
}

impl TryFrom<Value> for GeoJsonData {
    type Error = MapError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Self::parse(&text),
            value => Self::inline(value),
        }
    }
}

impl Serialize for GeoJsonData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Inline(value) => value.serialize(serializer),
            Self::Url(url) => serializer.serialize_str(url),
        }
    }
}

fn type_of(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

/// Coerce a geometry, feature, feature array or feature collection into a
/// `FeatureCollection`.
pub fn to_feature_collection(value: Value) -> Result<Value, MapError> {
    match value {
        Value::Array(features) => {
            if let Some(index) = features.iter().position(|f| type_of(f) != Some("Feature")) {
                return Err(MapError::invalid_input(format!(
                    "element {index} is not a GeoJSON feature"
                )));
            }
            Ok(json!({"type": "FeatureCollection", "features": features}))
        }
        Value::Object(_) => match type_of(&value) {
            Some("FeatureCollection") => {
                if value.get("features").is_some_and(Value::is_array) {
                    Ok(value)
                } else {
                    Err(MapError::invalid_input(
                        "FeatureCollection without a features array",
                    ))
                }
            }
            Some("Feature") => Ok(json!({"type": "FeatureCollection", "features": [value]})),
            Some(ty) if GEOMETRY_TYPES.contains(&ty) => Ok(json!({
                "type": "FeatureCollection",
                "features": [{"type": "Feature", "geometry": value, "properties": {}}],
            })),
            Some(ty) => Err(MapError::invalid_input(format!(
                "unexpected GeoJSON type: {ty}"
            ))),
            None => Err(MapError::invalid_input("GeoJSON object without a type")),
        },
        other => Err(MapError::invalid_input(format!(
            "expected GeoJSON object, got {other}"
        ))),
    }
}

/// A decoded feature: geometry plus properties.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// A feature the user clicked, with the layer it was rendered by.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickedFeature {
    pub layer_id: Option<String>,
    #[serde(flatten)]
    pub feature: Feature,
}

fn geometry_of(object: &Map<String, Value>) -> Result<Value, MapError> {
    let geometry = object
        .get("geometry")
        .ok_or_else(|| MapError::MalformedFeaturePayload {
            reason: "missing geometry".to_string(),
        })?;

    match type_of(geometry) {
        Some(ty) if GEOMETRY_TYPES.contains(&ty) => Ok(geometry.clone()),
        _ => Err(MapError::MalformedFeaturePayload {
            reason: format!("not a geometry: {geometry}"),
        }),
    }
}

fn properties_of(object: &Map<String, Value>) -> Map<String, Value> {
    object
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Decode a click event record `{layerId, properties, geometry, time}`.
///
/// `time` only forces the browser to report repeated clicks on the same
/// feature and is dropped. Null, empty or malformed records yield `None`.
pub fn parse_clicked_feature(raw: Option<&Value>) -> Option<ClickedFeature> {
    let object = match raw {
        Some(Value::Object(object)) if !object.is_empty() => object,
        _ => return None,
    };

    let geometry = geometry_of(object)
        .map_err(|e| debug!("ignoring clicked feature: {e}"))
        .ok()?;

    Some(ClickedFeature {
        layer_id: object
            .get("layerId")
            .and_then(Value::as_str)
            .map(str::to_string),
        feature: Feature {
            id: object.get("id").cloned(),
            geometry,
            properties: properties_of(object),
        },
    })
}

/// Decode a drawn shape sent as serialized GeoJSON feature text.
///
/// The feature's top-level `id` is kept so the shape can later be deleted by
/// id. Empty or malformed input yields `None`.
pub fn parse_drawn_shape(json: &str) -> Option<Feature> {
    if json.trim().is_empty() {
        return None;
    }

    let value: Value = serde_json::from_str(json)
        .map_err(|e| debug!("ignoring drawn shape: {e}"))
        .ok()?;

    let object = value.as_object()?;
    if type_of(&value) != Some("Feature") {
        debug!("ignoring drawn shape: not a Feature");
        return None;
    }

    let geometry = geometry_of(object)
        .map_err(|e| debug!("ignoring drawn shape: {e}"))
        .ok()?;

    Some(Feature {
        id: object.get("id").cloned(),
        geometry,
        properties: properties_of(object),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalise {
        use super::*;

        #[test]
        fn geometry_is_wrapped_into_collection() {
            let value = to_feature_collection(json!({"type": "Point", "coordinates": [1, 2]}))
                .unwrap();

            assert_eq!(value["type"], "FeatureCollection");
            assert_eq!(value["features"][0]["geometry"]["type"], "Point");
            assert_eq!(value["features"][0]["properties"], json!({}));
        }

        #[test]
        fn feature_array_is_wrapped_into_collection() {
            let feature = json!({"type": "Feature", "geometry": null, "properties": {}});

            let value = to_feature_collection(json!([feature.clone()])).unwrap();

            assert_eq!(value["features"], json!([feature]));
        }

        #[test]
        fn collection_passes_through() {
            let collection = json!({"type": "FeatureCollection", "features": []});

            assert_eq!(
                to_feature_collection(collection.clone()).unwrap(),
                collection
            );
        }

        #[test]
        fn unknown_types_are_rejected() {
            assert!(to_feature_collection(json!({"type": "Topology"})).is_err());
            assert!(to_feature_collection(json!(42)).is_err());
            assert!(to_feature_collection(json!([{"type": "Point"}])).is_err());
        }

        #[test]
        fn text_is_parsed_or_treated_as_url() {
            assert_eq!(
                GeoJsonData::parse("https://example.com/quakes.geojson").unwrap(),
                GeoJsonData::url("https://example.com/quakes.geojson")
            );
            assert!(matches!(
                GeoJsonData::parse(r#"{"type": "Point", "coordinates": [0, 0]}"#).unwrap(),
                GeoJsonData::Inline(_)
            ));
            assert!(GeoJsonData::parse("not geojson").is_err());
        }

        #[test]
        fn deserializing_normalises() {
            let data: GeoJsonData =
                serde_json::from_value(json!({"type": "Point", "coordinates": [0, 0]})).unwrap();

            assert_eq!(data.to_value()["type"], "FeatureCollection");
        }
    }

    mod clicked_feature {
        use super::*;

        #[test]
        fn null_and_empty_yield_none() {
            assert_eq!(parse_clicked_feature(None), None);
            assert_eq!(parse_clicked_feature(Some(&Value::Null)), None);
            assert_eq!(parse_clicked_feature(Some(&json!({}))), None);
        }

        #[test]
        fn malformed_geometry_yields_none() {
            let raw = json!({"layerId": "quakes", "geometry": {"coordinates": [0, 0]}});

            assert_eq!(parse_clicked_feature(Some(&raw)), None);
        }

        #[test]
        fn decodes_layer_geometry_and_properties() {
            let raw = json!({
                "layerId": "quakes",
                "properties": {"mag": 4.5},
                "geometry": {"type": "Point", "coordinates": [174.7, -36.8]},
                "time": 1712345678,
            });

            let clicked = parse_clicked_feature(Some(&raw)).unwrap();

            assert_eq!(clicked.layer_id.as_deref(), Some("quakes"));
            assert_eq!(clicked.feature.geometry["type"], "Point");
            assert_eq!(clicked.feature.properties["mag"], 4.5);
            assert!(!clicked.feature.properties.contains_key("time"));
        }
    }

    mod drawn_shape {
        use super::*;

        #[test]
        fn empty_input_yields_none() {
            assert_eq!(parse_drawn_shape(""), None);
            assert_eq!(parse_drawn_shape("   "), None);
        }

        #[test]
        fn invalid_json_yields_none() {
            assert_eq!(parse_drawn_shape("{not json"), None);
            assert_eq!(parse_drawn_shape(r#"{"type": "Point"}"#), None);
        }

        #[test]
        fn keeps_top_level_id() {
            let shape = parse_drawn_shape(
                r#"{"id": "a1b2", "type": "Feature", "properties": {},
                    "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}"#,
            )
            .unwrap();

            assert_eq!(shape.id, Some(json!("a1b2")));
            assert_eq!(shape.geometry["type"], "Polygon");
        }
    }
}
