//! Visualization parameters persisted in a URL query string
//!
//! The parameters are serialized as JSON, base64-encoded and stored under
//! the `pointCloudParameters` query key, next to whatever other pairs the
//! query already carries.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use imagecloud_core::{Error, PointCloudParameters, Result};
use serde::{Deserialize, Serialize};

/// Query key holding the encoded parameters
pub const QUERY_KEY: &str = "pointCloudParameters";

/// User-facing knobs of the point cloud view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationParameters {
    pub color_threshold: f32,
    pub depth_threshold: f32,
    pub point_size: f32,
    pub depth_scale: f32,
    pub use_orthographic: bool,
    /// Index of the stats panel shown by the viewer
    pub stats_type: u32,
}

impl Default for VisualizationParameters {
    fn default() -> Self {
        let parameters = PointCloudParameters::default();
        Self {
            color_threshold: parameters.color_threshold,
            depth_threshold: parameters.depth_threshold,
            point_size: parameters.point_size,
            depth_scale: parameters.depth_scale,
            use_orthographic: false,
            stats_type: 0,
        }
    }
}

/// Wire form, where any field may be missing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct EncodedParameters {
    color_threshold: Option<f32>,
    depth_threshold: Option<f32>,
    point_size: Option<f32>,
    depth_scale: Option<f32>,
    use_orthographic: Option<bool>,
    stats_type: Option<u32>,
}

fn non_zero(value: Option<f32>, fallback: f32) -> f32 {
    value.filter(|v| *v != 0.0).unwrap_or(fallback)
}

impl VisualizationParameters {
    /// Base64 of the JSON form
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(self).map_err(|e| Error::InvalidData(e.to_string()))?;
        Ok(STANDARD.encode(json))
    }

    /// Decode a base64 JSON value, filling gaps from `fallback`
    ///
    /// Missing numeric fields and numeric fields equal to 0 keep the
    /// fallback value. `use_orthographic` is taken whenever present.
    pub fn decode(encoded: &str, fallback: &VisualizationParameters) -> Result<Self> {
        let json = STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::ParameterDecode(format!("invalid base64: {}", e)))?;
        let raw: EncodedParameters =
            serde_json::from_slice(&json).map_err(|e| Error::ParameterDecode(format!("invalid JSON: {}", e)))?;

        Ok(Self {
            color_threshold: non_zero(raw.color_threshold, fallback.color_threshold),
            depth_threshold: non_zero(raw.depth_threshold, fallback.depth_threshold),
            point_size: non_zero(raw.point_size, fallback.point_size),
            depth_scale: non_zero(raw.depth_scale, fallback.depth_scale),
            use_orthographic: raw.use_orthographic.unwrap_or(fallback.use_orthographic),
            stats_type: raw.stats_type.filter(|v| *v != 0).unwrap_or(fallback.stats_type),
        })
    }

    /// Read the parameters from a query string
    ///
    /// Returns `Ok(None)` when the query has no parameters key.
    pub fn try_from_query(query: &str, fallback: &VisualizationParameters) -> Result<Option<Self>> {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == QUERY_KEY)
            .map(|(_, value)| Self::decode(&value, fallback))
            .transpose()
    }

    /// Read the parameters from a query string, falling back on any problem
    ///
    /// Decode failures are logged and yield a copy of `fallback`.
    pub fn from_query(query: &str, fallback: &VisualizationParameters) -> Self {
        match Self::try_from_query(query, fallback) {
            Ok(Some(parameters)) => parameters,
            Ok(None) => fallback.clone(),
            Err(e) => {
                log::error!("Error parsing {}: {}", QUERY_KEY, e);
                fallback.clone()
            }
        }
    }

    /// Store the parameters in `query`, keeping its other pairs in order
    ///
    /// The first existing parameters pair is replaced and any duplicates are
    /// removed; without one the pair is appended.
    pub fn to_query(&self, query: &str) -> Result<String> {
        let encoded = self.encode()?;
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut written = false;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == QUERY_KEY {
                if !written {
                    serializer.append_pair(QUERY_KEY, &encoded);
                    written = true;
                }
            } else {
                serializer.append_pair(&key, &value);
            }
        }
        if !written {
            serializer.append_pair(QUERY_KEY, &encoded);
        }

        Ok(serializer.finish())
    }

    /// Construction parameters matching these settings
    pub fn point_cloud_parameters(&self) -> PointCloudParameters {
        PointCloudParameters {
            color_threshold: self.color_threshold,
            depth_threshold: self.depth_threshold,
            depth_scale: self.depth_scale,
            point_size: self.point_size,
            ..PointCloudParameters::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom() -> VisualizationParameters {
        VisualizationParameters {
            color_threshold: 0.25,
            depth_threshold: 0.125,
            point_size: 0.02,
            depth_scale: 3.0,
            use_orthographic: true,
            stats_type: 2,
        }
    }

    #[test]
    fn test_query_round_trip_keeps_other_pairs() {
        let query = custom().to_query("?frame=12&mode=depth").unwrap();

        assert!(query.starts_with("frame=12&mode=depth&pointCloudParameters="));
        let decoded = VisualizationParameters::from_query(&query, &VisualizationParameters::default());
        assert_eq!(decoded, custom());
    }

    #[test]
    fn test_to_query_replaces_existing_value() {
        let first = VisualizationParameters::default().to_query("a=1").unwrap();
        let second = custom().to_query(&first).unwrap();

        assert_eq!(second.matches(QUERY_KEY).count(), 1);
        assert!(second.starts_with("a=1&"));
        assert_eq!(
            VisualizationParameters::from_query(&second, &VisualizationParameters::default()),
            custom()
        );
    }

    #[test]
    fn test_missing_key_returns_fallback() {
        let fallback = custom();
        assert_eq!(VisualizationParameters::from_query("x=1", &fallback), fallback);
        assert_eq!(VisualizationParameters::try_from_query("", &fallback).unwrap(), None);
    }

    #[test]
    fn test_garbage_returns_fallback() {
        let fallback = custom();
        let query = format!("{}=%%%not-base64", QUERY_KEY);

        assert!(matches!(
            VisualizationParameters::try_from_query(&query, &fallback),
            Err(Error::ParameterDecode(_))
        ));
        assert_eq!(VisualizationParameters::from_query(&query, &fallback), fallback);
    }

    #[test]
    fn test_invalid_json_returns_fallback() {
        let encoded = STANDARD.encode("{not json");
        let result = VisualizationParameters::decode(&encoded, &custom());
        assert!(matches!(result, Err(Error::ParameterDecode(_))));
    }

    #[test]
    fn test_zero_and_missing_fields_keep_fallback() {
        let encoded = STANDARD.encode(r#"{"colorThreshold": 0, "pointSize": 0.5, "useOrthographic": false}"#);
        let decoded = VisualizationParameters::decode(&encoded, &custom()).unwrap();

        assert_eq!(decoded.color_threshold, 0.25);
        assert_eq!(decoded.point_size, 0.5);
        assert_eq!(decoded.depth_scale, 3.0);
        assert!(!decoded.use_orthographic);
        assert_eq!(decoded.stats_type, 2);
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = serde_json::to_value(custom()).unwrap();
        assert_eq!(json["useOrthographic"], true);
        assert_eq!(json["statsType"], 2);
        assert!(json.get("colorThreshold").is_some());
    }

    #[test]
    fn test_point_cloud_parameters() {
        let parameters = custom().point_cloud_parameters();
        assert_eq!(parameters.color_threshold, 0.25);
        assert_eq!(parameters.depth_scale, 3.0);
        assert_eq!(parameters.point_size, 0.02);
    }
}
