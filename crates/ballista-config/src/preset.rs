//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

/// A stored control value.
///
/// Floats and choice indices are numbers, toggles are booleans, and choices
/// may also be given by option name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    /// A toggle.
    Bool(bool),
    /// A float or choice index.
    Number(f64),
    /// A choice option by name.
    Text(String),
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Number(f64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Settings for one effect, stored as TOML.
///
/// Controls left out of `params` take their defaults when the preset is
/// applied.
///
/// # TOML Format
///
/// ```toml
/// name = "Vocal Leveler"
/// description = "Smooth 3:1 levelling for vocals"
/// effect = "compressor"
///
/// [params]
/// threshold = -24.0
/// ratio = 3.0
/// knee = 6.0
/// stereo_link = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Registry id of the effect the preset is for.
    pub effect: String,

    /// Control values by key.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

impl Preset {
    /// Create an empty preset for `effect`.
    pub fn new(name: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            effect: effect.into(),
            params: BTreeMap::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set one control value.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get a stored value.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_builder() {
        let preset = Preset::new("Glue", "compressor")
            .with_description("Bus glue")
            .with_param("threshold", -18.0)
            .with_param("stereo_link", true);

        assert_eq!(preset.effect, "compressor");
        assert_eq!(preset.description.as_deref(), Some("Bus glue"));
        assert_eq!(preset.get("threshold"), Some(&ParamValue::Number(-18.0)));
        assert_eq!(preset.get("stereo_link"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn test_preset_from_toml() {
        let toml = r#"
name = "Dirt"
effect = "distortion"

[params]
drive = 24
shape = "tanh"
auto_gain = false
"#;

        let preset = Preset::from_toml(toml).unwrap();
        assert_eq!(preset.name, "Dirt");
        assert!(preset.description.is_none());
        assert_eq!(preset.get("drive"), Some(&ParamValue::Number(24.0)));
        assert_eq!(preset.get("shape"), Some(&ParamValue::Text("tanh".to_string())));
        assert_eq!(preset.get("auto_gain"), Some(&ParamValue::Bool(false)));
    }

    #[test]
    fn test_preset_roundtrip() {
        let original = Preset::new("Roundtrip", "delay")
            .with_description("Testing serialization")
            .with_param("time", 120.5)
            .with_param("filter", true);

        let toml = original.to_toml().unwrap();
        assert!(toml.contains("effect = \"delay\""));
        assert!(toml.contains("[params]"));

        let parsed = Preset::from_toml(&toml).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_missing_effect_is_an_error() {
        let err = Preset::from_toml("name = \"Nothing\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_minimal_toml() {
        let preset = Preset::from_toml("name = \"Bare\"\neffect = \"gain\"").unwrap();
        assert!(preset.params.is_empty());
    }
}
