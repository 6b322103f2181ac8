use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::{DatasetError, ValueDataset};

/// Color settings supplied with each render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Low end of the color ramp.
    #[serde(rename = "colorRamp1")]
    pub color_ramp1: String,
    /// High end of the color ramp.
    #[serde(rename = "colorRamp2")]
    pub color_ramp2: String,
    /// Fill for regions without a value; the widget default applies when absent.
    #[serde(rename = "naColor", default, skip_serializing_if = "Option::is_none")]
    pub na_color: Option<String>,
}

/// `{ data, settings }` payload of the render entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub data: ValueDataset,
    pub settings: RenderSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    Json(String),
    MissingField(&'static str),
    Dataset(DatasetError),
    Settings(String),
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsError::Json(msg) => write!(f, "render options JSON parse error: {msg}"),
            OptionsError::MissingField(name) => write!(f, "render options missing {name:?}"),
            OptionsError::Dataset(e) => write!(f, "render options data: {e}"),
            OptionsError::Settings(msg) => write!(f, "render options settings: {msg}"),
        }
    }
}

impl std::error::Error for OptionsError {}

impl RenderOptions {
    pub fn from_json_str(payload: &str) -> Result<Self, OptionsError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| OptionsError::Json(e.to_string()))?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, OptionsError> {
        let data = value.get("data").ok_or(OptionsError::MissingField("data"))?;
        let settings = value
            .get("settings")
            .ok_or(OptionsError::MissingField("settings"))?;

        let data = ValueDataset::from_json_value(data).map_err(OptionsError::Dataset)?;
        let settings = RenderSettings::deserialize(settings)
            .map_err(|e| OptionsError::Settings(e.to_string()))?;
        Ok(Self { data, settings })
    }
}

#[cfg(test)]
mod tests {
    use super::{OptionsError, RenderOptions};

    #[test]
    fn parses_data_and_settings() {
        let opts = RenderOptions::from_json_str(
            r##"{"data": {"id": ["A", "B"], "val": [0, 10]},
                "settings": {"colorRamp1": "#000000", "colorRamp2": "#ffffff"}}"##,
        )
        .expect("parse");
        assert_eq!(opts.data.len(), 2);
        assert_eq!(opts.settings.color_ramp1, "#000000");
        assert_eq!(opts.settings.color_ramp2, "#ffffff");
        assert!(opts.settings.na_color.is_none());
    }

    #[test]
    fn reads_optional_na_color() {
        let opts = RenderOptions::from_json_str(
            r#"{"data": [], "settings": {"colorRamp1": "red", "colorRamp2": "blue", "naColor": "grey"}}"#,
        )
        .expect("parse");
        assert_eq!(opts.settings.na_color.as_deref(), Some("grey"));
    }

    #[test]
    fn reports_missing_sections() {
        let err = RenderOptions::from_json_str(r#"{"data": []}"#).unwrap_err();
        assert_eq!(err, OptionsError::MissingField("settings"));

        let err = RenderOptions::from_json_str(r#"{"data": [], "settings": {"colorRamp1": "red"}}"#)
            .unwrap_err();
        assert!(matches!(err, OptionsError::Settings(_)));
    }
}
