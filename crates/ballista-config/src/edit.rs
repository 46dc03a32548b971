//! Host write-back: applying presets and single edits to a parameter store.
//!
//! The processors only read controls. Anything that changes a stored value in
//! response to another one, such as keeping the multiband crossovers in order,
//! happens here on the host side.

use ballista_core::{Crossover, CrossoverFrequencies, ParamStore, validate_crossovers};
use ballista_registry::EffectRegistry;

use crate::error::ConfigError;
use crate::preset::Preset;
use crate::validation::{resolve_value, validate_preset};

const MULTIBAND_CROSSOVERS: [&str; 3] = ["low_freq", "mid_freq", "high_freq"];

/// Crossover keys (low, mid, high) of an effect, if it has any.
pub(crate) fn crossover_keys(effect_id: &str) -> Option<[&'static str; 3]> {
    (effect_id == "multiband").then_some(MULTIBAND_CROSSOVERS)
}

fn edited_crossover(keys: [&str; 3], name: &str) -> Option<Crossover> {
    match keys.iter().position(|k| *k == name)? {
        0 => Some(Crossover::Low),
        1 => Some(Crossover::Mid),
        _ => Some(Crossover::High),
    }
}

fn read(store: &ParamStore, effect_id: &str, name: &str) -> Result<f32, ConfigError> {
    store.get(name).ok_or_else(|| ConfigError::UnknownParameter {
        effect: effect_id.to_string(),
        param: name.to_string(),
    })
}

/// Write one edited control to `store`, returning the value stored.
///
/// The value is clamped to the control's range. Editing a multiband
/// crossover corrects the three frequencies with [`validate_crossovers`] and
/// writes all of them back, so the store never holds an out-of-order set.
///
/// # Example
///
/// ```rust
/// use ballista_config::apply_edit;
/// use ballista_core::ParamStore;
/// use ballista_registry::EffectRegistry;
///
/// let registry = EffectRegistry::new();
/// let store = ParamStore::new(registry.get("multiband").unwrap().params);
/// let low = apply_edit(&store, "multiband", "low_freq", 950.0).unwrap();
/// assert!(low < 800.0);
/// assert_eq!(store.get("low_freq"), Some(low));
/// ```
pub fn apply_edit(
    store: &ParamStore,
    effect_id: &str,
    name: &str,
    value: f32,
) -> Result<f32, ConfigError> {
    if let Some(keys) = crossover_keys(effect_id)
        && let Some(edited) = edited_crossover(keys, name)
    {
        return apply_crossover_edit(store, effect_id, keys, edited, name, value);
    }

    if !store.set(name, value) {
        return Err(ConfigError::UnknownParameter {
            effect: effect_id.to_string(),
            param: name.to_string(),
        });
    }
    read(store, effect_id, name)
}

fn apply_crossover_edit(
    store: &ParamStore,
    effect_id: &str,
    keys: [&'static str; 3],
    edited: Crossover,
    name: &str,
    value: f32,
) -> Result<f32, ConfigError> {
    // Clamp the edit to its own range first.
    store.set(name, value);
    let candidate = CrossoverFrequencies {
        low: read(store, effect_id, keys[0])?,
        mid: read(store, effect_id, keys[1])?,
        high: read(store, effect_id, keys[2])?,
    };

    let fixed = validate_crossovers(candidate, edited);
    if fixed != candidate {
        tracing::info!(
            param = name,
            requested = value,
            low = fixed.low,
            mid = fixed.mid,
            high = fixed.high,
            "crossover edit corrected"
        );
    }

    for (key, freq) in keys.iter().zip([fixed.low, fixed.mid, fixed.high]) {
        store.set(key, freq);
    }
    read(store, effect_id, name)
}

/// Validate `preset` and load it into `store`.
///
/// The store must have been built from the preset effect's control table.
/// Controls the preset leaves out go back to their defaults, so applying a
/// preset always yields the same state.
pub fn apply_preset(
    preset: &Preset,
    store: &ParamStore,
    registry: &EffectRegistry,
) -> Result<(), ConfigError> {
    validate_preset(preset, registry)?;
    let effect = registry
        .get(&preset.effect)
        .ok_or_else(|| ConfigError::UnknownEffect(preset.effect.clone()))?;

    store.reset_to_defaults();
    for (name, value) in &preset.params {
        let desc = effect
            .param(name)
            .ok_or_else(|| ConfigError::UnknownParameter {
                effect: preset.effect.clone(),
                param: name.clone(),
            })?;
        // Validated presets already hold an ordered crossover set, so the
        // values go in directly rather than through the edit correction.
        let v = resolve_value(desc, value)?;
        if !store.set(name, v) {
            return Err(ConfigError::UnknownParameter {
                effect: preset.effect.clone(),
                param: name.clone(),
            });
        }
    }

    tracing::debug!(preset = %preset.name, effect = %preset.effect, "preset applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballista_core::find_param;

    fn multiband_store() -> ParamStore {
        let registry = EffectRegistry::new();
        ParamStore::new(registry.get("multiband").unwrap().params)
    }

    fn crossovers(store: &ParamStore) -> CrossoverFrequencies {
        CrossoverFrequencies {
            low: store.get("low_freq").unwrap(),
            mid: store.get("mid_freq").unwrap(),
            high: store.get("high_freq").unwrap(),
        }
    }

    #[test]
    fn test_plain_edit_clamps() {
        let registry = EffectRegistry::new();
        let store = ParamStore::new(registry.get("compressor").unwrap().params);
        assert_eq!(apply_edit(&store, "compressor", "ratio", 40.0).unwrap(), 16.0);
        assert!(matches!(
            apply_edit(&store, "compressor", "drive", 1.0),
            Err(ConfigError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn test_valid_crossover_edit_is_kept() {
        let store = multiband_store();
        assert_eq!(apply_edit(&store, "multiband", "high_freq", 8000.0).unwrap(), 8000.0);
        assert_eq!(crossovers(&store).high, 8000.0);
    }

    #[test]
    fn test_low_edit_is_pulled_below_mid() {
        let store = multiband_store();
        let low = apply_edit(&store, "multiband", "low_freq", 950.0).unwrap();
        let f = crossovers(&store);
        assert!(f.is_valid());
        assert_eq!(f.low, low);
        assert!(low > 799.0);
        assert_eq!(f.mid, 1000.0);
    }

    #[test]
    fn test_high_edit_is_pushed_above_mid() {
        let store = multiband_store();
        apply_edit(&store, "multiband", "high_freq", 600.0).unwrap();
        let f = crossovers(&store);
        assert!(f.is_valid());
        assert!(f.high < 1251.0);
    }

    #[test]
    fn test_mid_edit_moves_between_neighbours() {
        let store = multiband_store();
        apply_edit(&store, "multiband", "mid_freq", 5000.0).unwrap();
        let f = crossovers(&store);
        assert!(f.is_valid());
        assert!(f.mid <= 4800.0);
        assert_eq!((f.low, f.high), (120.0, 6000.0));
    }

    #[test]
    fn test_sequence_of_edits_stays_ordered() {
        let store = multiband_store();
        let edits = [
            ("mid_freq", 100.0),
            ("low_freq", 1000.0),
            ("high_freq", 500.0),
            ("mid_freq", 5000.0),
            ("high_freq", 16000.0),
            ("low_freq", 20.0),
        ];
        for (name, value) in edits {
            apply_edit(&store, "multiband", name, value).unwrap();
            assert!(crossovers(&store).is_valid(), "after {name} = {value}");
        }
    }

    #[test]
    fn test_apply_preset_resets_unlisted_controls() {
        let registry = EffectRegistry::new();
        let store = ParamStore::new(registry.get("distortion").unwrap().params);
        store.set("output", -12.0);

        let preset = Preset::new("Fold", "distortion")
            .with_param("shape", "foldback")
            .with_param("auto_gain", false);
        apply_preset(&preset, &store, &registry).unwrap();

        assert_eq!(store.get("shape"), Some(3.0));
        assert_eq!(store.get("auto_gain"), Some(0.0));
        let output = find_param(store.descriptors(), "output").unwrap();
        assert_eq!(store.get("output"), Some(output.default));
    }

    #[test]
    fn test_apply_preset_rejects_invalid() {
        let registry = EffectRegistry::new();
        let store = ParamStore::new(registry.get("gate").unwrap().params);
        let preset = Preset::new("Broken", "gate").with_param("hold", -5.0);
        assert!(matches!(
            apply_preset(&preset, &store, &registry),
            Err(ConfigError::Validation(_))
        ));
    }
}
