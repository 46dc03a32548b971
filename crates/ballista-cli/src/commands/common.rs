//! Shared CLI helpers used across multiple commands.

use ballista_config::{ConfigError, Preset, get_factory_preset};
use std::path::Path;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Load a preset by factory name or file path.
///
/// Factory presets are tried first, by id or display name.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    let path = Path::new(name);
    if path.exists() {
        return Ok(Preset::load(path)?);
    }

    Err(ConfigError::PresetNotFound(name.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("threshold=-18").unwrap(),
            ("threshold".to_string(), "-18".to_string())
        );
        assert_eq!(
            parse_key_val("shape = tanh").unwrap(),
            ("shape".to_string(), "tanh".to_string())
        );
        assert!(parse_key_val("threshold").is_err());
        assert!(parse_key_val("=3").is_err());
    }

    #[test]
    fn test_load_factory_preset() {
        assert_eq!(load_preset("plate").unwrap().effect, "reverb");
        assert!(load_preset("no_such_preset_anywhere").is_err());
    }
}
