//! Parser for the biome definition file and the texture tint table.
//!
//! The file is a list of blank-line separated records:
//!
//! ```text
//! plains
//! 1
//! G#91bd59
//! F#77ab2f
//! grass_block_top.png
//! 0.5 short_grass.png
//! ```
//!
//! The first line names the biome, the second is its numeric id, the rest are
//! tint declarations (`G#`, `H#`, `F#`, `W#`) or texture references with an
//! optional leading weight.

use crate::colors::{hex_to_unit_rgb, rgb_tuple_to_unit, RGBTuple};
use crate::error::{BiomeColorError, Result};
use fnv::FnvHashMap;
use glam::DVec3;
use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;

/// Biome-level tint declared in a definition record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TintKind {
    /// `G#rrggbb`
    Grass,
    /// `H#rrggbb`, blended in for swamp-style two-tone grass
    SecondaryGrass,
    /// `F#rrggbb`
    Foliage,
    /// `W#rrggbb`
    Water,
}

impl TintKind {
    fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'G' => Some(Self::Grass),
            'H' => Some(Self::SecondaryGrass),
            'F' => Some(Self::Foliage),
            'W' => Some(Self::Water),
            _ => None,
        }
    }
}

/// How a texture picks up its tint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TintRule {
    Grass,
    Foliage,
    Water,
    Fixed(RGBTuple),
}

static TINT_RULES: Lazy<FnvHashMap<&'static str, TintRule>> = Lazy::new(|| {
    let mut rules: FnvHashMap<&'static str, TintRule> = FnvHashMap::default();
    for name in [
        "grass_block_top.png",
        "short_grass.png",
        "tall_grass_top.png",
        "fern.png",
        "large_fern_top.png",
    ] {
        rules.insert(name, TintRule::Grass);
    }
    for name in [
        "oak_leaves.png",
        "jungle_leaves.png",
        "acacia_leaves.png",
        "dark_oak_leaves.png",
        "mangrove_leaves.png",
        "vine.png",
    ] {
        rules.insert(name, TintRule::Foliage);
    }
    rules.insert("water_overlay.png", TintRule::Water);
    // These ignore the biome colormap in game
    rules.insert("birch_leaves.png", TintRule::Fixed((0x80, 0xa7, 0x55)));
    rules.insert("spruce_leaves.png", TintRule::Fixed((0x61, 0x99, 0x61)));
    rules.insert("lily_pad.png", TintRule::Fixed((0x20, 0x80, 0x30)));
    rules
});

pub fn tint_rule(texture: &str) -> Option<TintRule> {
    TINT_RULES.get(texture).copied()
}

/// The tints declared by one biome record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BiomeTints {
    pub grass: Option<DVec3>,
    pub secondary_grass: Option<DVec3>,
    pub foliage: Option<DVec3>,
    pub water: Option<DVec3>,
}

impl BiomeTints {
    fn set(&mut self, kind: TintKind, rgb: DVec3) {
        let slot: &mut Option<DVec3> = match kind {
            TintKind::Grass => &mut self.grass,
            TintKind::SecondaryGrass => &mut self.secondary_grass,
            TintKind::Foliage => &mut self.foliage,
            TintKind::Water => &mut self.water,
        };
        *slot = Some(rgb);
    }

    /// Tint for a texture under `rule`, `None` when it stays untinted.
    pub fn for_rule(&self, rule: TintRule) -> Option<DVec3> {
        match rule {
            TintRule::Grass => self.grass,
            TintRule::Foliage => self.foliage,
            TintRule::Water => self.water,
            TintRule::Fixed(rgb) => Some(rgb_tuple_to_unit(rgb)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureRef {
    pub name: String,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BiomeRecord {
    pub name: String,
    pub id: i32,
    pub tints: BiomeTints,
    pub textures: Vec<TextureRef>,
}

pub fn read_definitions(path: &Path) -> Result<Vec<BiomeRecord>> {
    let text: String = fs::read_to_string(path).map_err(|source| BiomeColorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_definitions(&text)
}

pub fn parse_definitions(text: &str) -> Result<Vec<BiomeRecord>> {
    let mut records: Vec<BiomeRecord> = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    // A missing trailing blank line still closes the last record
    for line in text.lines().chain(std::iter::once("")) {
        let line: &str = line.trim();
        if !line.is_empty() {
            block.push(line);
            continue;
        }
        if !block.is_empty() {
            records.push(parse_record(&block)?);
            block.clear();
        }
    }

    Ok(records)
}

fn parse_record(lines: &[&str]) -> Result<BiomeRecord> {
    let name: &str = lines[0];
    let id_line: &str = lines
        .get(1)
        .copied()
        .ok_or_else(|| BiomeColorError::malformed(name, "missing numeric id"))?;
    let id: i32 = id_line
        .parse()
        .map_err(|_| BiomeColorError::malformed(name, format!("invalid id '{id_line}'")))?;

    let mut tints = BiomeTints::default();
    let mut textures: Vec<TextureRef> = Vec::new();

    for line in &lines[2..] {
        if let Some((kind, hex)) = split_tint(line) {
            let rgb: DVec3 = hex_to_unit_rgb(hex)
                .ok_or_else(|| BiomeColorError::malformed(name, format!("invalid tint '{line}'")))?;
            tints.set(kind, rgb);
        } else {
            textures.push(parse_texture_ref(name, line)?);
        }
    }

    Ok(BiomeRecord {
        name: name.to_string(),
        id,
        tints,
        textures,
    })
}

/// `G#rrggbb` -> (Grass, "#rrggbb")
fn split_tint(line: &str) -> Option<(TintKind, &str)> {
    let mut chars = line.chars();
    let kind: TintKind = TintKind::from_prefix(chars.next()?)?;
    if chars.next()? != '#' {
        return None;
    }
    Some((kind, &line[1..]))
}

fn parse_texture_ref(biome: &str, line: &str) -> Result<TextureRef> {
    let Some((weight, texture)) = line.split_once(' ') else {
        return Ok(TextureRef {
            name: line.to_string(),
            weight: 1.0,
        });
    };

    let weight: f64 = weight
        .parse()
        .ok()
        .filter(|w: &f64| w.is_finite() && *w >= 0.0)
        .ok_or_else(|| BiomeColorError::malformed(biome, format!("invalid weight in '{line}'")))?;
    let texture: &str = texture.trim();
    if texture.is_empty() {
        return Err(BiomeColorError::malformed(
            biome,
            format!("missing texture in '{line}'"),
        ));
    }

    Ok(TextureRef {
        name: texture.to_string(),
        weight,
    })
}
