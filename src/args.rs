use crate::optimizer::DEFAULT_STEP;
use clap::Parser;
use std::path::PathBuf;

/// Derive distinguishable biome map colors from block textures
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Directory containing the block texture PNGs
    #[arg(value_name = "BLOCK_ASSET_DIR")]
    pub asset_dir: PathBuf,

    /// Number of repulsion steps to run
    #[arg(value_name = "OPTIMIZATION_STEPS")]
    pub iterations: u32,

    /// Biome definition file
    #[arg(long, env = "BIOME_DEFINITIONS", default_value = "biome_blocks.txt")]
    pub definitions: PathBuf,

    /// Variant table (`name source id delta` per line) replacing the built-in one (optional)
    #[arg(long, conflicts_with = "no_variants")]
    pub variants: Option<PathBuf>,

    /// Skip derived biome variants
    #[arg(long)]
    pub no_variants: bool,

    /// Largest perceptual distance any biome moves per step
    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: f64,

    /// Write a PNG plot of the final colors and their paths (optional)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Enable debug logging (optional)
    #[arg(long)]
    pub debug: bool,
}

/// Checks the parts of the arguments clap cannot.
pub fn validate_args(args: &Args) -> Result<(), String> {
    if !args.asset_dir.exists() {
        return Err(format!(
            "Asset directory does not exist: {}",
            args.asset_dir.display()
        ));
    }
    if !args.asset_dir.is_dir() {
        return Err(format!(
            "Asset path is not a directory: {}",
            args.asset_dir.display()
        ));
    }
    if !args.definitions.is_file() {
        return Err(format!(
            "Definition file not found: {}",
            args.definitions.display()
        ));
    }
    if let Some(ref variants) = args.variants {
        if !variants.is_file() {
            return Err(format!("Variant file not found: {}", variants.display()));
        }
    }
    if let Some(ref plot) = args.plot {
        let is_png: bool = plot
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if !is_png {
            return Err(format!("Plot must be a .png file: {}", plot.display()));
        }
        let parent = plot.parent().filter(|p| !p.as_os_str().is_empty());
        if parent.is_some_and(|p| !p.is_dir()) {
            return Err(format!(
                "Plot directory does not exist: {}",
                plot.display()
            ));
        }
    }
    if !(args.step.is_finite() && args.step > 0.0) {
        return Err(format!("Step must be a positive number, got {}", args.step));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::write_definitions;

    #[test]
    fn test_positionals_and_defaults() {
        let args = Args::parse_from(["biome-colors", "assets", "250"]);
        assert_eq!(args.asset_dir, PathBuf::from("assets"));
        assert_eq!(args.iterations, 250);
        assert_eq!(args.step, DEFAULT_STEP);
        assert!(args.variants.is_none());
        assert!(!args.no_variants);
        assert!(!args.debug);
        assert!(args.plot.is_none());
    }

    #[test]
    fn test_required_positionals() {
        assert!(Args::try_parse_from(["biome-colors", "assets"]).is_err());
        assert!(Args::try_parse_from(["biome-colors", "assets", "-3"]).is_err());
        assert!(Args::try_parse_from(["biome-colors", "assets", "many"]).is_err());
    }

    #[test]
    fn test_variant_flags_conflict() {
        let cmd = [
            "biome-colors",
            "assets",
            "10",
            "--variants",
            "variants.txt",
            "--no-variants",
        ];
        assert!(Args::try_parse_from(cmd).is_err());
    }

    #[test]
    fn test_validate_args() {
        let tmpdir = tempfile::tempdir().unwrap();
        let tmp_path = tmpdir.path().to_str().unwrap();
        let definitions = write_definitions(tmpdir.path(), "plains\n1\ngrass_block_top.png\n");
        let definitions = definitions.to_str().unwrap();

        let args = Args::parse_from(["biome-colors", tmp_path, "5", "--definitions", definitions]);
        assert!(validate_args(&args).is_ok());

        let args = Args::parse_from(["biome-colors", "/nonexistent/path", "5", "--definitions", definitions]);
        assert!(validate_args(&args).unwrap_err().contains("does not exist"));

        let args = Args::parse_from(["biome-colors", definitions, "5", "--definitions", definitions]);
        assert!(validate_args(&args).unwrap_err().contains("not a directory"));

        let args = Args::parse_from([
            "biome-colors",
            tmp_path,
            "5",
            "--definitions",
            "/nonexistent/biome_blocks.txt",
        ]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from([
            "biome-colors",
            tmp_path,
            "5",
            "--definitions",
            definitions,
            "--step",
            "0",
        ]);
        assert!(validate_args(&args).unwrap_err().contains("Step"));
    }

    #[test]
    fn test_validate_plot_path() {
        let tmpdir = tempfile::tempdir().unwrap();
        let tmp_path = tmpdir.path().to_str().unwrap();
        let definitions = write_definitions(tmpdir.path(), "plains\n1\ngrass_block_top.png\n");
        let definitions = definitions.to_str().unwrap();
        let with_plot = |plot: &str| {
            Args::parse_from(["biome-colors", tmp_path, "5", "--definitions", definitions, "--plot", plot])
        };

        let good = tmpdir.path().join("biomes.PNG");
        assert!(validate_args(&with_plot(good.to_str().unwrap())).is_ok());
        assert!(validate_args(&with_plot("biomes.png")).is_ok());

        let wrong_ext = tmpdir.path().join("biomes.txt");
        assert!(validate_args(&with_plot(wrong_ext.to_str().unwrap()))
            .unwrap_err()
            .contains(".png"));

        let no_dir = tmpdir.path().join("missing").join("biomes.png");
        assert!(validate_args(&with_plot(no_dir.to_str().unwrap()))
            .unwrap_err()
            .contains("directory"));
    }
}
