use formats::DuplicatePolicy;
use foundation::math::fmod_turn_deg;
use layers::{Color, ColorSpace};
use runtime::RedrawPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happens to latitude while dragging.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatitudePolicy {
    /// Latitude wraps like longitude; the globe may turn upside down.
    #[default]
    Free,
    /// Latitude stays within [-90, 90].
    Clamp,
}

impl LatitudePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Some(LatitudePolicy::Free),
            "clamp" | "clamped" => Some(LatitudePolicy::Clamp),
            _ => None,
        }
    }

    pub fn apply(self, latitude: f64) -> f64 {
        match self {
            LatitudePolicy::Free => fmod_turn_deg(latitude),
            LatitudePolicy::Clamp => latitude.clamp(-90.0, 90.0),
        }
    }
}

/// Per-instance widget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    /// Degrees of rotation per pixel of pointer movement.
    pub sensitivity: f64,
    /// Fraction of the viewport the fitted geometry may fill.
    pub margin_ratio: f64,
    /// Rotation applied before fitting, and the rotation after every render call.
    pub initial_rotation: [f64; 3],
    pub latitude: LatitudePolicy,
    pub duplicate_ids: DuplicatePolicy,
    pub color_space: ColorSpace,
    /// Fill for features without a value.
    pub no_data_color: String,
    pub redraw: RedrawPolicy,
    /// Fraction digits written in path data.
    pub path_digits: usize,
    /// Topology object to decode; `None` picks `countries` or the only object.
    pub object_name: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.25,
            margin_ratio: 0.9,
            initial_rotation: [90.0, 0.0, 0.0],
            latitude: LatitudePolicy::Free,
            duplicate_ids: DuplicatePolicy::Last,
            color_space: ColorSpace::Rgb,
            no_data_color: "#cccccc".to_string(),
            redraw: RedrawPolicy::Immediate,
            path_digits: 3,
            object_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Json(String),
    UnknownKey(String),
    InvalidValue { key: String, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "config JSON parse error: {msg}"),
            ConfigError::UnknownKey(key) => write!(f, "unknown config key {key:?}"),
            ConfigError::InvalidValue { key, reason } => {
                write!(f, "invalid value for {key:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

const SENSITIVITY_RANGE: (f64, f64) = (0.01, 10.0);
const MARGIN_RANGE: (f64, f64) = (0.05, 1.0);
const MAX_PATH_DIGITS: usize = 6;

impl WidgetConfig {
    /// Parse a possibly partial JSON object; missing keys keep their defaults.
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: WidgetConfig =
            serde_json::from_str(payload).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.sensitivity = clamp_finite("sensitivity", self.sensitivity, SENSITIVITY_RANGE)?;
        self.margin_ratio = clamp_finite("margin_ratio", self.margin_ratio, MARGIN_RANGE)?;
        self.path_digits = self.path_digits.min(MAX_PATH_DIGITS);
        if self.initial_rotation.iter().any(|v| !v.is_finite()) {
            return Err(invalid("initial_rotation", "angles must be finite"));
        }
        Color::parse(&self.no_data_color)
            .map_err(|e| invalid("no_data_color", &e.to_string()))?;
        Ok(self)
    }

    /// Update one setting. Numbers are clamped to their valid range.
    pub fn set(&mut self, key: &str, value: &Value) -> Result<(), ConfigError> {
        match key {
            "sensitivity" => {
                self.sensitivity = clamp_finite(key, number(key, value)?, SENSITIVITY_RANGE)?
            }
            "margin_ratio" => {
                self.margin_ratio = clamp_finite(key, number(key, value)?, MARGIN_RANGE)?
            }
            "initial_rotation" => {
                let angles: Vec<f64> = value
                    .as_array()
                    .map(|a| a.iter().filter_map(Value::as_f64).collect())
                    .unwrap_or_default();
                if angles.len() < 2 || angles.len() > 3 || angles.iter().any(|v| !v.is_finite()) {
                    return Err(invalid(key, "expected [longitude, latitude, roll?]"));
                }
                self.initial_rotation = [angles[0], angles[1], angles.get(2).copied().unwrap_or(0.0)];
            }
            "latitude" => {
                self.latitude = LatitudePolicy::from_str(text(key, value)?)
                    .ok_or_else(|| invalid(key, "expected free or clamp"))?
            }
            "duplicate_ids" => {
                self.duplicate_ids = DuplicatePolicy::from_str(text(key, value)?)
                    .ok_or_else(|| invalid(key, "expected last, first, sum or mean"))?
            }
            "color_space" => {
                self.color_space = ColorSpace::from_str(text(key, value)?)
                    .ok_or_else(|| invalid(key, "expected rgb or hcl"))?
            }
            "no_data_color" => {
                let s = text(key, value)?;
                Color::parse(s).map_err(|e| invalid(key, &e.to_string()))?;
                self.no_data_color = s.to_string();
            }
            "redraw" => {
                self.redraw = RedrawPolicy::from_str(text(key, value)?)
                    .ok_or_else(|| invalid(key, "expected immediate or coalesced"))?
            }
            "path_digits" => {
                let v = number(key, value)?;
                if !v.is_finite() {
                    return Err(invalid(key, "must be finite"));
                }
                self.path_digits = v.round().clamp(0.0, MAX_PATH_DIGITS as f64) as usize;
            }
            "object_name" => {
                self.object_name = match value {
                    Value::Null => None,
                    _ => Some(text(key, value)?.to_string()),
                }
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn number(key: &str, value: &Value) -> Result<f64, ConfigError> {
    value.as_f64().ok_or_else(|| invalid(key, "expected a number"))
}

fn text<'a>(key: &str, value: &'a Value) -> Result<&'a str, ConfigError> {
    value.as_str().ok_or_else(|| invalid(key, "expected a string"))
}

fn clamp_finite(key: &str, v: f64, (lo, hi): (f64, f64)) -> Result<f64, ConfigError> {
    if !v.is_finite() {
        return Err(invalid(key, "must be finite"));
    }
    Ok(v.clamp(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LatitudePolicy, WidgetConfig};
    use formats::DuplicatePolicy;
    use runtime::RedrawPolicy;
    use serde_json::json;

    #[test]
    fn defaults_match_reference_widget() {
        let c = WidgetConfig::default();
        assert_eq!(c.sensitivity, 0.25);
        assert_eq!(c.margin_ratio, 0.9);
        assert_eq!(c.initial_rotation, [90.0, 0.0, 0.0]);
        assert_eq!(c.latitude, LatitudePolicy::Free);
        assert_eq!(c.redraw, RedrawPolicy::Immediate);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = WidgetConfig::from_json_str(r#"{"sensitivity": 0.5, "duplicate_ids": "mean"}"#)
            .expect("parse");
        assert_eq!(c.sensitivity, 0.5);
        assert_eq!(c.duplicate_ids, DuplicatePolicy::Mean);
        assert_eq!(c.margin_ratio, 0.9);

        let err = WidgetConfig::from_json_str(r#"{"bogus": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        let err = WidgetConfig::from_json_str(r#"{"no_data_color": "nope"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn set_clamps_and_validates() {
        let mut c = WidgetConfig::default();
        c.set("sensitivity", &json!(100.0)).expect("set");
        assert_eq!(c.sensitivity, 10.0);
        c.set("margin_ratio", &json!(0.0)).expect("set");
        assert_eq!(c.margin_ratio, 0.05);
        c.set("path_digits", &json!(12)).expect("set");
        assert_eq!(c.path_digits, 6);
        c.set("latitude", &json!("clamp")).expect("set");
        assert_eq!(c.latitude, LatitudePolicy::Clamp);
        c.set("initial_rotation", &json!([10, 20])).expect("set");
        assert_eq!(c.initial_rotation, [10.0, 20.0, 0.0]);
        c.set("object_name", &json!("land")).expect("set");
        assert_eq!(c.object_name.as_deref(), Some("land"));

        assert_eq!(
            c.set("zoom", &json!(1)),
            Err(ConfigError::UnknownKey("zoom".to_string()))
        );
        assert!(c.set("sensitivity", &json!("fast")).is_err());
        assert!(c.set("no_data_color", &json!("#12")).is_err());
        assert_eq!(c.no_data_color, "#cccccc");
    }

    #[test]
    fn latitude_policies() {
        assert_eq!(LatitudePolicy::Free.apply(450.0), 90.0);
        assert_eq!(LatitudePolicy::Free.apply(-100.0), -100.0);
        assert_eq!(LatitudePolicy::Clamp.apply(-100.0), -90.0);
    }
}
