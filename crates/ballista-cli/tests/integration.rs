//! Integration tests for the `ballista` binary.

use ballista_core::StereoSamples;
use ballista_io::{WavSpec, read_wav, write_wav};
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn ballista_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ballista"))
}

fn write_tone(path: &Path, amplitude: f32, frames: usize) {
    let samples: Vec<f32> = (0..frames)
        .map(|i| amplitude * (i as f32 * 2.0 * std::f32::consts::PI * 220.0 / 48000.0).sin())
        .collect();
    write_wav(path, &StereoSamples::from_mono(samples), WavSpec::default()).unwrap();
}

#[test]
fn cli_effects_lists_all_effects() {
    let output = ballista_bin().arg("effects").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Available Effects"));
    for id in ballista_registry::EffectRegistry::new().ids() {
        assert!(stdout.contains(id), "listing should contain '{id}'");
    }
}

#[test]
fn cli_effects_detail_shows_parameters() {
    let output = ballista_bin().args(["effects", "multiband"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Parameters"));
    assert!(stdout.contains("low_freq"));
    assert!(stdout.contains("b4_makeup"));
}

#[test]
fn cli_effects_unknown_fails() {
    let output = ballista_bin().args(["effects", "flanger"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_presets_lists_factory_presets() {
    let output = ballista_bin().arg("presets").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mastering_multiband"));
    assert!(stdout.contains("tape_echo"));

    let output = ballista_bin()
        .args(["presets", "--effect", "gate"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("noise_gate"));
    assert!(!stdout.contains("tape_echo"));
}

#[test]
fn cli_process_applies_gain() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_tone(&input, 0.5, 4800);

    let status = ballista_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--effect", "gain", "--param", "gain=-6"])
        .status()
        .unwrap();
    assert!(status.success());

    let (dry, _) = read_wav(&input).unwrap();
    let (wet, spec) = read_wav(&output).unwrap();
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(wet.len(), dry.len());
    let ratio = wet.peak() / dry.peak();
    assert!((ratio - 0.501).abs() < 0.01, "ratio {ratio}");
}

#[test]
fn cli_process_with_preset_reports_reduction() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_tone(&input, 0.9, 9600);

    let out = ballista_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--preset", "master_limiter", "--bit-depth", "24"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Max gain reduction"), "{stdout}");

    let (wet, spec) = read_wav(&output).unwrap();
    assert_eq!(spec.bits_per_sample, 24);
    assert!(wet.peak() <= ballista_core::db_to_linear(-1.0) + 1e-3);
}

#[test]
fn cli_process_rejects_unknown_parameter() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.wav");
    write_tone(&input, 0.5, 480);

    let status = ballista_bin()
        .arg("process")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .args(["--effect", "compressor", "--param", "drive=3"])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cli_process_corrects_crossover_edit() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.wav");
    write_tone(&input, 0.5, 480);

    let out = ballista_bin()
        .arg("process")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .args(["--effect", "multiband", "--param", "low_freq=5000"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("adjusted"));
}

#[test]
fn cli_process_without_effect_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.wav");
    write_tone(&input, 0.5, 480);

    let status = ballista_bin()
        .arg("process")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .status()
        .unwrap();
    assert!(!status.success());
}
