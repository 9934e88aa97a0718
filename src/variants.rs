//! Derived biome variants.
//!
//! Some biomes reuse the block palette of another biome and only differ in
//! game by terrain height. Sampling textures cannot tell them apart, so they
//! are derived from their parent with a lightness offset instead.

use crate::error::{BiomeColorError, Result};
use std::fs;
use std::path::Path;

pub const HILLS: f64 = -0.075;
pub const MODIFIED: f64 = 0.075;

#[derive(Clone, Debug, PartialEq)]
pub struct VariantSpec {
    pub name: String,
    pub source: String,
    pub id: i32,
    pub delta: f64,
}

impl VariantSpec {
    pub fn new(name: &str, source: &str, id: i32, delta: f64) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            id,
            delta,
        }
    }
}

// tall_birch_forest = birch_forest+128 and old_growth_birch_forest is the
// newer name for it, so its hills derive from old_growth_birch_forest.
// Likewise windswept_savanna is the former shattered_savanna.
const BUILTIN_VARIANTS: &[(&str, &str, i32, f64)] = &[
    ("snowy_mountains", "snowy_plains", 13, HILLS),
    ("desert_hills", "desert", 17, HILLS),
    ("wooded_hills", "forest", 18, HILLS),
    ("taiga_hills", "taiga", 19, HILLS),
    ("jungle_hills", "jungle", 22, HILLS),
    ("birch_forest_hills", "birch_forest", 28, HILLS),
    ("snowy_taiga_hills", "snowy_taiga", 31, HILLS),
    ("giant_tree_taiga_hills", "old_growth_pine_taiga", 33, HILLS),
    ("savanna_plateau", "savanna", 36, MODIFIED),
    ("desert_lakes", "desert", 130, MODIFIED),
    ("taiga_mountains", "taiga", 133, HILLS * 2.0),
    ("swamp_hills", "swamp", 134, HILLS),
    ("modified_jungle", "jungle", 149, MODIFIED),
    ("modified_jungle_edge", "sparse_jungle", 151, MODIFIED),
    ("tall_birch_hills", "old_growth_birch_forest", 156, HILLS),
    ("dark_forest_hills", "dark_forest", 157, HILLS),
    ("snowy_taiga_mountains", "snowy_taiga", 158, HILLS),
    ("giant_spruce_taiga_hills", "old_growth_spruce_taiga", 161, HILLS),
    ("modified_gravelly_mountains", "windswept_gravelly_hills", 162, MODIFIED),
    ("modified_wooded_badlands_plateau", "wooded_badlands", 166, MODIFIED),
    ("modified_badlands_plateau", "badlands_plateau", 167, MODIFIED),
    ("bamboo_jungle_hills", "bamboo_jungle", 169, HILLS),
    ("shattered_savanna_plateau", "windswept_savanna", 164, MODIFIED),
];

/// The variant table for vanilla biome definitions, in derivation order.
pub fn builtin_variants() -> Vec<VariantSpec> {
    BUILTIN_VARIANTS
        .iter()
        .map(|&(name, source, id, delta)| VariantSpec::new(name, source, id, delta))
        .collect()
}

pub fn read_variants(path: &Path) -> Result<Vec<VariantSpec>> {
    let text: String = fs::read_to_string(path).map_err(|source| BiomeColorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_variants(&text)
}

/// One `name source id delta` entry per line; blank lines and `#` comments are skipped.
pub fn parse_variants(text: &str) -> Result<Vec<VariantSpec>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_variant_line)
        .collect()
}

fn parse_variant_line(line: &str) -> Result<VariantSpec> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [name, source, id, delta] = fields[..] else {
        return Err(BiomeColorError::malformed(
            line,
            "expected 'name source id delta'",
        ));
    };

    let id: i32 = id
        .parse()
        .map_err(|_| BiomeColorError::malformed(name, format!("invalid id '{id}'")))?;
    let delta: f64 = delta
        .parse()
        .ok()
        .filter(|d: &f64| d.is_finite())
        .ok_or_else(|| BiomeColorError::malformed(name, format!("invalid delta '{delta}'")))?;

    Ok(VariantSpec::new(name, source, id, delta))
}
