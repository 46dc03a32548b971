//! Factory preset listing.

use ballista_config::{factory_preset_names, get_factory_preset};
use clap::Args;

#[derive(Args)]
pub struct PresetsArgs {
    /// Only list presets for this effect
    #[arg(short, long)]
    effect: Option<String>,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    println!("Factory Presets");
    println!("===============");
    println!();

    let mut shown = 0;
    for id in factory_preset_names() {
        let Some(preset) = get_factory_preset(id) else {
            continue;
        };
        if let Some(effect) = &args.effect
            && !preset.effect.eq_ignore_ascii_case(effect)
        {
            continue;
        }
        println!(
            "  {:20} {:12} {}",
            id,
            preset.effect,
            preset.description.as_deref().unwrap_or("")
        );
        shown += 1;
    }

    if shown == 0 {
        println!("  (none)");
    }
    println!();
    println!("Use 'ballista process in.wav out.wav --preset <name>' to apply one.");
    Ok(())
}
