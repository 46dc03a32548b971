//! Integration tests for preset files and the host edit path.

use ballista_config::{
    ConfigError, EffectRegistry, ParamValue, Preset, apply_edit, apply_preset, factory_presets,
    get_factory_preset, validate_preset,
};
use ballista_core::{CrossoverFrequencies, ParamStore};
use tempfile::tempdir;

#[test]
fn save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("presets").join("bus.toml");

    let preset = Preset::new("Bus", "compressor")
        .with_description("Saved from a test")
        .with_param("threshold", -22.5)
        .with_param("sidechain_hpf", true);
    preset.save(&path).unwrap();
    assert!(path.exists());

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);
}

#[test]
fn load_missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    match Preset::load(&path) {
        Err(ConfigError::ReadFile { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected ReadFile, got {other:?}"),
    }
}

#[test]
fn load_malformed_file_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "name = \"x\"\neffect = [1, 2").unwrap();
    assert!(matches!(Preset::load(&path), Err(ConfigError::TomlParse(_))));
}

#[test]
fn every_factory_preset_applies_to_its_effect() {
    let registry = EffectRegistry::new();

    for preset in factory_presets() {
        let desc = registry.get(&preset.effect).unwrap();
        let store = ParamStore::new(desc.params);
        apply_preset(&preset, &store, &registry).unwrap();

        for (name, value) in &preset.params {
            let stored = store.get(name).unwrap();
            if let ParamValue::Number(n) = value {
                assert_eq!(stored, *n as f32, "{}: {}", preset.name, name);
            }
        }
    }
}

#[test]
fn multiband_preset_then_edits_keep_order() {
    let registry = EffectRegistry::new();
    let preset = get_factory_preset("mastering_multiband").unwrap();
    let store = ParamStore::new(registry.get("multiband").unwrap().params);
    apply_preset(&preset, &store, &registry).unwrap();

    for (name, value) in [("low_freq", 1000.0), ("high_freq", 900.0), ("mid_freq", 100.0)] {
        apply_edit(&store, "multiband", name, value).unwrap();
        let f = CrossoverFrequencies {
            low: store.get("low_freq").unwrap(),
            mid: store.get("mid_freq").unwrap(),
            high: store.get("high_freq").unwrap(),
        };
        assert!(f.is_valid(), "after {name}: {f:?}");
    }
}

#[test]
fn edited_preset_survives_serialization() {
    let registry = EffectRegistry::new();
    let mut preset = get_factory_preset("fuzz").unwrap();
    preset.params.insert("shape".into(), ParamValue::Number(1.0));

    let reparsed = Preset::from_toml(&preset.to_toml().unwrap()).unwrap();
    assert_eq!(validate_preset(&reparsed, &registry), Ok(()));
    assert_eq!(reparsed.get("shape"), Some(&ParamValue::Number(1.0)));
}
