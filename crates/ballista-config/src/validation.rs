//! Preset and parameter validation.
//!
//! Every check runs against the effect's descriptor table from the registry,
//! so names, kinds and ranges have a single source.
//!
//! # Example
//!
//! ```rust
//! use ballista_config::{Preset, validate_preset};
//! use ballista_registry::EffectRegistry;
//!
//! let registry = EffectRegistry::new();
//! let preset = Preset::new("Loud", "limiter").with_param("ceiling", -40.0);
//! assert!(validate_preset(&preset, &registry).is_err());
//! ```

use ballista_core::{CrossoverFrequencies, ParamDescriptor, ParamKind};
use ballista_registry::{EffectDescriptor, EffectRegistry};
use thiserror::Error;

use crate::edit::crossover_keys;
use crate::preset::{ParamValue, Preset};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown effect id.
    #[error("unknown effect type: {0}")]
    UnknownEffect(String),

    /// Unknown parameter name.
    #[error("unknown parameter '{param}' for effect '{effect}'")]
    UnknownParameter {
        /// Effect id.
        effect: String,
        /// The unrecognized key.
        param: String,
    },

    /// Wrong kind of value, e.g. a boolean for a float control.
    #[error("parameter '{param}' expects {expected}, got {got}")]
    TypeMismatch {
        /// Name of the parameter.
        param: String,
        /// What the control takes.
        expected: &'static str,
        /// What was given.
        got: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// NaN or infinite value.
    #[error("parameter '{param}' is not a finite number")]
    NonFinite {
        /// Name of the parameter.
        param: String,
    },

    /// Choice value that names no option.
    #[error("'{value}' is not an option of '{param}' (options: {options})")]
    InvalidChoice {
        /// Name of the parameter.
        param: String,
        /// The rejected value.
        value: String,
        /// Comma-separated option names.
        options: String,
    },

    /// Crossover frequencies out of order.
    #[error(
        "crossovers {low} / {mid} / {high} Hz must satisfy low < 0.8 x mid and high > 1.25 x mid"
    )]
    CrossoverOrder {
        /// Low split in Hz.
        low: f32,
        /// Mid split in Hz.
        mid: f32,
        /// High split in Hz.
        high: f32,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn mismatch(desc: &ParamDescriptor, expected: &'static str, got: &ParamValue) -> ValidationError {
    ValidationError::TypeMismatch {
        param: desc.name.to_string(),
        expected,
        got: got.to_string(),
    }
}

fn invalid_choice(desc: &ParamDescriptor, options: &[&str], value: String) -> ValidationError {
    ValidationError::InvalidChoice {
        param: desc.name.to_string(),
        value,
        options: options.join(", "),
    }
}

/// Turn a stored value into the plain number the parameter store takes.
///
/// Floats must be finite and in range, toggles must be booleans, and choices
/// take a whole index or an option name (case-insensitive).
pub fn resolve_value(desc: &ParamDescriptor, value: &ParamValue) -> ValidationResult<f32> {
    match (desc.kind, value) {
        (ParamKind::Float, ParamValue::Number(n)) => {
            let v = *n as f32;
            if !v.is_finite() {
                return Err(ValidationError::NonFinite {
                    param: desc.name.to_string(),
                });
            }
            if v < desc.min || v > desc.max {
                return Err(ValidationError::OutOfRange {
                    param: desc.name.to_string(),
                    value: v,
                    min: desc.min,
                    max: desc.max,
                });
            }
            Ok(v)
        }
        (ParamKind::Float, other) => Err(mismatch(desc, "a number", other)),

        (ParamKind::Toggle, ParamValue::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        (ParamKind::Toggle, other) => Err(mismatch(desc, "true or false", other)),

        (ParamKind::Choice(options), ParamValue::Number(n)) => {
            if !n.is_finite() {
                return Err(ValidationError::NonFinite {
                    param: desc.name.to_string(),
                });
            }
            if n.fract() == 0.0 && *n >= 0.0 && (*n as usize) < options.len() {
                Ok(*n as f32)
            } else {
                Err(invalid_choice(desc, options, n.to_string()))
            }
        }
        (ParamKind::Choice(options), ParamValue::Text(s)) => options
            .iter()
            .position(|o| o.eq_ignore_ascii_case(s))
            .map(|i| i as f32)
            .ok_or_else(|| invalid_choice(desc, options, s.clone())),
        (ParamKind::Choice(_), other) => Err(mismatch(desc, "an option name or index", other)),
    }
}

/// Parse a command-line style value (`-18`, `on`, `tanh`) for a parameter.
pub fn parse_param_value(desc: &ParamDescriptor, text: &str) -> ValidationResult<f32> {
    let text = text.trim();
    let value = match text.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => ParamValue::Bool(true),
        "false" | "off" | "no" => ParamValue::Bool(false),
        "1" if desc.kind == ParamKind::Toggle => ParamValue::Bool(true),
        "0" if desc.kind == ParamKind::Toggle => ParamValue::Bool(false),
        _ => match text.parse::<f64>() {
            Ok(n) => ParamValue::Number(n),
            Err(_) => ParamValue::Text(text.to_string()),
        },
    };
    resolve_value(desc, &value)
}

/// Validate one named value for an effect.
pub fn validate_param(
    effect: &EffectDescriptor,
    name: &str,
    value: &ParamValue,
) -> ValidationResult<f32> {
    let desc = effect
        .param(name)
        .ok_or_else(|| ValidationError::UnknownParameter {
            effect: effect.id.to_string(),
            param: name.to_string(),
        })?;
    resolve_value(desc, value)
}

/// Validate a preset against the registry.
///
/// All problems are collected; more than one is reported as
/// [`ValidationError::Multiple`]. For effects with crossovers the three
/// frequencies, with defaults for any left out, must already be in order.
pub fn validate_preset(preset: &Preset, registry: &EffectRegistry) -> ValidationResult<()> {
    let effect = registry
        .get(&preset.effect)
        .ok_or_else(|| ValidationError::UnknownEffect(preset.effect.clone()))?;

    let mut errors = Vec::new();
    for (name, value) in &preset.params {
        if let Err(e) = validate_param(effect, name, value) {
            errors.push(e);
        }
    }

    if errors.is_empty()
        && let Some(keys) = crossover_keys(effect.id)
    {
        let freq = |key: &str| {
            let desc = effect.param(key);
            preset
                .get(key)
                .and_then(|v| desc.and_then(|d| resolve_value(d, v).ok()))
                .or_else(|| desc.map(|d| d.default))
                .unwrap_or(f32::NAN)
        };
        let f = CrossoverFrequencies {
            low: freq(keys[0]),
            mid: freq(keys[1]),
            high: freq(keys[2]),
        };
        if !f.is_valid() {
            errors.push(ValidationError::CrossoverOrder {
                low: f.low,
                mid: f.mid,
                high: f.high,
            });
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
