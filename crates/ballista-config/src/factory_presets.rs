//! Factory presets bundled with the library.
//!
//! These are embedded at compile time and always available without external
//! files.

use crate::Preset;

/// TOML content for factory presets, keyed by internal name.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("vocal_leveler", VOCAL_LEVELER),
    ("drum_bus", DRUM_BUS),
    ("noise_gate", NOISE_GATE),
    ("master_limiter", MASTER_LIMITER),
    ("soft_clip", SOFT_CLIP),
    ("de_ess", DE_ESS),
    ("mastering_multiband", MASTERING_MULTIBAND),
    ("air_eq", AIR_EQ),
    ("warm_tilt", WARM_TILT),
    ("fuzz", FUZZ),
    ("tape_echo", TAPE_ECHO),
    ("plate", PLATE),
    ("mono_check", MONO_CHECK),
];

const VOCAL_LEVELER: &str = r#"
name = "Vocal Leveler"
description = "Smooth 3:1 levelling with a soft knee"
effect = "compressor"

[params]
threshold = -24.0
ratio = 3.0
attack = 15.0
release = 120.0
makeup = 4.0
knee = 6.0
"#;

const DRUM_BUS: &str = r#"
name = "Drum Bus"
description = "Parallel squash that ignores the kick"
effect = "compressor"

[params]
threshold = -30.0
ratio = 8.0
attack = 2.0
release = 60.0
makeup = 8.0
sidechain_hpf = true
sidechain_freq = 150.0
mix = 40.0
"#;

const NOISE_GATE: &str = r#"
name = "Noise Gate"
description = "Tight gate with a short hold for drums and amps"
effect = "gate"

[params]
threshold = -45.0
ratio = 80.0
attack = 0.5
hold = 30.0
release = 80.0
"#;

const MASTER_LIMITER: &str = r#"
name = "Master Limiter"
description = "Transparent peak control at -1 dBFS"
effect = "limiter"

[params]
threshold = -4.0
ceiling = -1.0
release = 80.0
"#;

const SOFT_CLIP: &str = r#"
name = "Clip To Zero"
description = "Shave peaks 3 dB and bring the level back up"
effect = "clipper"

[params]
threshold = -3.0
ceiling = -0.1
auto_gain = true
"#;

const DE_ESS: &str = r#"
name = "De-ess"
description = "Tame sibilance above 6.5 kHz"
effect = "deesser"

[params]
threshold = -35.0
ratio = 6.0
frequency = 6500.0
attack = 0.5
release = 50.0
"#;

const MASTERING_MULTIBAND: &str = r#"
name = "Mastering Multiband"
description = "Gentle four-band control with a firm low end"
effect = "multiband"

[params]
low_freq = 100.0
mid_freq = 1200.0
high_freq = 7000.0
b1_threshold = -20.0
b1_ratio = 3.0
b1_attack = 30.0
b1_release = 200.0
b2_threshold = -18.0
b2_ratio = 2.0
b3_threshold = -18.0
b3_ratio = 2.0
b4_threshold = -22.0
b4_ratio = 2.5
b4_attack = 5.0
"#;

const AIR_EQ: &str = r#"
name = "Air"
description = "Clean up the lows and open the top"
effect = "equalizer"

[params]
hpf = true
hpf_freq = 60.0
hpf_slope = "24 dB/oct"
low_mid_freq = 350.0
low_mid_gain = -2.0
low_mid_q = 1.4
high_shelf_freq = 10000.0
high_shelf_gain = 3.0
"#;

const WARM_TILT: &str = r#"
name = "Warm Tilt"
description = "Darken slightly around 1.5 kHz"
effect = "tilt_eq"

[params]
tilt = -3.0
pivot = 1500.0
"#;

const FUZZ: &str = r#"
name = "Fuzz"
description = "Hard-clipped fuzz with the fizz rolled off"
effect = "distortion"

[params]
drive = 36.0
shape = "hard"
lowcut = 120.0
tone = 4500.0
output = -6.0
"#;

const TAPE_ECHO: &str = r#"
name = "Tape Echo"
description = "Dark, wobbly repeats with gentle saturation"
effect = "delay"

[params]
time = 380.0
feedback = 55.0
width = 8.0
drive = 35.0
filter = true
lowcut = 150.0
highcut = 3500.0
mod_rate = 0.6
mod_depth = 30.0
mix = 30.0
"#;

const PLATE: &str = r#"
name = "Plate"
description = "Bright, dense plate for vocals and snare"
effect = "reverb"

[params]
size = 70.0
damping = 25.0
predelay = 25.0
lowcut = 200.0
highcut = 14000.0
mix = 25.0
"#;

const MONO_CHECK: &str = r#"
name = "Mono Check"
description = "Fold to mono to check compatibility"
effect = "gain"

[params]
width = 0.0
"#;

/// Get all factory presets.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(name, toml)| match Preset::from_toml(toml) {
            Ok(preset) => Some(preset),
            Err(e) => {
                tracing::error!(preset = name, error = %e, "factory preset failed to parse");
                None
            }
        })
        .collect()
}

/// Get a factory preset by internal name or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use ballista_config::get_factory_preset;
///
/// let preset = get_factory_preset("Tape Echo").unwrap();
/// assert_eq!(preset.effect, "delay");
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(name))
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Get the internal names of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}
