//! Effect listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use ballista_core::{ParamDescriptor, ParamKind};
use ballista_registry::{EffectCategory, EffectRegistry};
use clap::Args;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    let registry = EffectRegistry::new();

    let Some(id) = &args.effect else {
        println!("Available Effects");
        println!("=================");

        for category in EffectCategory::ALL {
            let effects = registry.effects_in_category(category);
            if effects.is_empty() {
                continue;
            }
            println!();
            println!("{}:", category.name());
            for effect in effects {
                println!("  {:12} - {}", effect.id, effect.description);
            }
        }

        println!();
        println!("Use 'ballista effects <id>' for detailed parameter info.");
        return Ok(());
    };

    let effect = registry
        .get(&id.to_ascii_lowercase())
        .ok_or_else(|| anyhow::anyhow!("Unknown effect: {}", id))?;

    println!("{} ({})", effect.name, effect.id);
    println!("{}", "=".repeat(effect.name.len() + effect.id.len() + 3));
    println!();
    println!("{}", effect.description);
    println!();

    println!("Parameters:");
    println!();
    println!(
        "  {:16}  {:24}  {:12}  {}",
        "Name", "Label", "Default", "Range"
    );
    println!(
        "  {:16}  {:24}  {:12}  {}",
        "----", "-----", "-------", "-----"
    );
    for param in effect.params {
        println!(
            "  {:16}  {:24}  {:12}  {}",
            param.name,
            param.label,
            param.format_value(param.default),
            describe_range(param)
        );
    }

    if effect.meter_count > 0 {
        println!();
        println!("Reports gain reduction on {} meter(s).", effect.meter_count);
    }

    println!();
    println!("Example usage:");
    println!();
    let example: Vec<String> = effect
        .params
        .iter()
        .take(2)
        .map(|p| format!("{}={}", p.name, p.default))
        .collect();
    println!(
        "  ballista process input.wav output.wav --effect {} --param {}",
        effect.id,
        example.join(" --param ")
    );

    Ok(())
}

fn describe_range(param: &ParamDescriptor) -> String {
    match param.kind {
        ParamKind::Toggle => "on / off".to_string(),
        ParamKind::Choice(options) => options.join(" | "),
        ParamKind::Float => format!(
            "{} to {}",
            param.format_value(param.min),
            param.format_value(param.max)
        ),
    }
}
