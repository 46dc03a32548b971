//! Presets, validation and parameter write-back for ballista effects.
//!
//! This is the host side of the control surface: it owns everything that
//! writes parameter values, while the processors only read them.
//!
//! # Features
//!
//! - **Presets**: one effect's settings as TOML ([`Preset`])
//! - **Validation**: names, kinds and ranges checked against the registry
//! - **Write-back**: [`apply_edit`] keeps multiband crossovers in order
//! - **Factory presets**: a built-in starting point for every effect
//!
//! # Example
//!
//! ```rust
//! use ballista_config::{Preset, apply_preset};
//! use ballista_core::ParamStore;
//! use ballista_registry::EffectRegistry;
//!
//! let registry = EffectRegistry::new();
//! let preset = Preset::from_toml(
//!     r#"
//! name = "Slap"
//! effect = "delay"
//!
//! [params]
//! time = 110.0
//! feedback = 10.0
//! "#,
//! )
//! .unwrap();
//!
//! let store = ParamStore::new(registry.get("delay").unwrap().params);
//! apply_preset(&preset, &store, &registry).unwrap();
//! assert_eq!(store.get("time"), Some(110.0));
//! ```

mod edit;
mod error;
mod preset;

/// Preset and parameter validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use edit::{apply_edit, apply_preset};
pub use error::ConfigError;
pub use factory_presets::{factory_preset_names, factory_presets, get_factory_preset};
pub use preset::{ParamValue, Preset};
pub use validation::{
    ValidationError, ValidationResult, parse_param_value, resolve_value, validate_param,
    validate_preset,
};

/// Re-export commonly used types from ballista-registry
pub use ballista_registry::{EffectCategory, EffectDescriptor, EffectRegistry};
