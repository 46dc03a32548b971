//! File-based effect processing command.

use crate::commands::common::{load_preset, parse_key_val};
use ballista_config::{apply_edit, apply_preset, parse_param_value};
use ballista_core::{ParamStore, ProcessSpec, Processor, StereoSamples, linear_to_db};
use ballista_io::{WavSpec, read_wav, write_wav};
use ballista_registry::EffectRegistry;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Effect to apply (see `ballista effects`)
    #[arg(short, long)]
    effect: Option<String>,

    /// Preset to start from: a factory preset name or a TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Effect parameters applied after the preset (e.g., "threshold=-18")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("Block size must be at least 1");
    }
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("Unsupported bit depth {} (use 16, 24 or 32)", args.bit_depth);
    }

    let registry = EffectRegistry::new();
    let preset = args.preset.as_deref().map(load_preset).transpose()?;

    let effect_id = match (&args.effect, &preset) {
        (Some(id), Some(p)) if !id.eq_ignore_ascii_case(&p.effect) => anyhow::bail!(
            "Preset '{}' is for '{}', not '{}'",
            p.name,
            p.effect,
            id
        ),
        (Some(id), _) => id.to_ascii_lowercase(),
        (None, Some(p)) => p.effect.clone(),
        (None, None) => anyhow::bail!("No effect specified. Use --effect or --preset"),
    };

    let desc = registry.get(&effect_id).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown effect: {}. Use 'ballista effects' to list effects.",
            effect_id
        )
    })?;
    let mut effect = registry
        .create(&effect_id)
        .ok_or_else(|| anyhow::anyhow!("Unknown effect: {}", effect_id))?;

    // Build the control state: preset first, then individual edits.
    let store = ParamStore::new(desc.params);
    if let Some(preset) = &preset {
        println!("Loading preset: {}", preset.name);
        apply_preset(preset, &store, &registry)?;
    }
    for (name, text) in &args.param {
        let param = desc
            .param(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown parameter '{}' for {}", name, desc.id))?;
        let value = parse_param_value(param, text)?;
        let stored = apply_edit(&store, desc.id, name, value)?;
        if stored != value {
            println!(
                "  {} adjusted to {}",
                param.label,
                param.format_value(stored)
            );
        }
    }

    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav(&args.input)?;
    println!(
        "  {} frames, {} Hz, {:.2}s",
        samples.len(),
        spec.sample_rate,
        samples.len() as f64 / f64::from(spec.sample_rate.max(1))
    );

    effect.prepare(ProcessSpec::stereo(f64::from(spec.sample_rate), args.block_size));
    tracing::debug!(effect = desc.id, block_size = args.block_size, "rendering");

    println!("Processing with {}...", desc.name);
    let input_peak = samples.peak();
    let max_reduction = render(effect.as_mut(), &store, &mut samples, args.block_size)?;
    let output_peak = samples.peak();

    println!("\nStats:");
    println!("  Input:  Peak {:.1} dB", linear_to_db(input_peak));
    println!("  Output: Peak {:.1} dB", linear_to_db(output_peak));
    if !max_reduction.is_empty() {
        println!("  Max gain reduction:");
        for (i, reduction) in max_reduction.iter().enumerate() {
            println!("    {:10} {:.1} dB", meter_label(i, max_reduction.len()), reduction);
        }
    }

    let out_spec = WavSpec {
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &samples, out_spec)?;
    println!("Done!");

    Ok(())
}

/// Process `samples` in place, returning the largest reading of each meter.
fn render(
    effect: &mut (dyn Processor + Send),
    store: &ParamStore,
    samples: &mut StereoSamples,
    block_size: usize,
) -> anyhow::Result<Vec<f32>> {
    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut max_reduction = vec![0.0_f32; effect.meter_count()];
    for block in samples.blocks_mut(block_size) {
        let len = block.len();
        effect.process(store, block);
        for (max, &m) in max_reduction.iter_mut().zip(effect.meters()) {
            *max = max.max(m);
        }
        pb.inc(len as u64);
    }
    pb.finish_with_message("done");

    Ok(max_reduction)
}

/// Name of meter `index` out of `count`: one per channel, band-major when
/// there are more than two.
fn meter_label(index: usize, count: usize) -> String {
    let channel = if index % 2 == 0 { "L" } else { "R" };
    if count <= 2 {
        channel.to_string()
    } else {
        format!("band {} {}", index / 2 + 1, channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_labels() {
        assert_eq!(meter_label(1, 2), "R");
        assert_eq!(meter_label(0, 8), "band 1 L");
        assert_eq!(meter_label(7, 8), "band 4 R");
    }

    #[test]
    fn test_render_reports_reduction() {
        let registry = EffectRegistry::new();
        let mut fx = registry.create("limiter").unwrap();
        fx.prepare(ProcessSpec::stereo(48000.0, 256));
        let store = ParamStore::new(fx.params());
        store.set("threshold", -12.0);

        let mut samples = StereoSamples::from_mono(vec![0.9; 4800]);
        let max = render(fx.as_mut(), &store, &mut samples, 256).unwrap();
        assert_eq!(max.len(), 2);
        assert!(max[0] > 1.0, "{max:?}");
        assert!(samples.left.iter().all(|x| x.is_finite()));
    }
}
