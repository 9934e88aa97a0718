//! Derives a representative map color for each Minecraft biome from its block
//! textures, then nudges similar biomes apart so they stay distinguishable.

mod args;
mod biome;
mod biome_definitions;
mod bresenham;
mod color_sample;
mod colors;
mod error;
mod hull;
mod optimizer;
mod plot;
mod registry;
mod report;
#[cfg(test)]
mod test_utilities;
mod texture;
mod variants;

use args::{validate_args, Args};
use clap::{CommandFactory, Parser};
use colored::*;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use optimizer::{optimize, OptimizerConfig};
use registry::BiomeRegistry;
use variants::VariantSpec;

fn init_logging(debug: bool) {
    let level: LevelFilter = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Runs the whole pipeline and returns the report. Nothing is printed to
/// stdout here, so a failure in any step leaves it empty.
fn run(args: &Args) -> Result<String> {
    eprintln!("{} Sampling biome textures...", "[1/4]".bold());
    let mut registry: BiomeRegistry = BiomeRegistry::load(&args.definitions, &args.asset_dir)?;
    if registry.is_empty() {
        log::warn!("No biomes defined in {}", args.definitions.display());
    }

    eprintln!("{} Deriving variants...", "[2/4]".bold());
    let variants: Vec<VariantSpec> = match (&args.variants, args.no_variants) {
        (_, true) => Vec::new(),
        (Some(path), false) => variants::read_variants(path)?,
        (None, false) => variants::builtin_variants(),
    };
    registry.derive_variants(&variants)?;
    log::info!("{} biomes after deriving {} variants", registry.len(), variants.len());

    eprintln!("{} Separating colors...", "[3/4]".bold());
    let config = OptimizerConfig {
        step: args.step,
        ..Default::default()
    };
    let optimize_pb: ProgressBar = ProgressBar::new(args.iterations as u64);
    optimize_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:45}] {pos}/{len} steps ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );

    let summaries = optimize(&mut registry, args.iterations, &config, |_, summary| {
        if args.debug {
            optimize_pb.set_message(format!("({} pinned)", summary.rejected));
        }
        optimize_pb.inc(1);
    });
    optimize_pb.finish_and_clear();
    let moves: usize = summaries.iter().map(|s| s.accepted).sum();
    log::info!("Ran {} steps, {} accepted moves", summaries.len(), moves);

    for (name, biome) in registry.iter() {
        log::debug!(
            "{} (id {}): {}D region, moved {} times",
            name,
            biome.id(),
            biome.hull().dimension(),
            biome.history().len()
        );
    }

    eprintln!("{} Reporting...", "[4/4]".bold());
    if let Some(ref plot_path) = args.plot {
        plot::save_plot(&registry, plot_path)?;
    }

    Ok(report::format_report(&registry))
}

fn main() {
    // Without arguments just explain how to call the tool
    if std::env::args().len() <= 1 {
        let _ = Args::command().print_help();
        println!();
        return;
    }

    let args: Args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = validate_args(&args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }

    match run(&args) {
        Ok(report) => println!("{report}"),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }

    eprintln!("{}", "Done!".green().bold());
}
