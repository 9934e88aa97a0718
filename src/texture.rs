//! Texture loading: reads a block texture and reduces it to weighted colors.

use crate::color_sample::ColorSample;
use crate::error::{BiomeColorError, Result};
use fnv::FnvHashMap;
use image::RgbaImage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Animated textures stack frames vertically; only the first tile is sampled.
pub const TILE_SIZE: u32 = 16;

/// Distinct colors of a texture tile with their pixel counts.
#[derive(Clone, Debug, PartialEq)]
pub struct TexturePalette {
    /// `(pixel_count, rgba)` in ascending RGBA order.
    pub colors: Vec<(u32, [u8; 4])>,
}

impl TexturePalette {
    pub fn from_image(image: &RgbaImage) -> Self {
        let width: u32 = image.width().min(TILE_SIZE);
        let height: u32 = image.height().min(TILE_SIZE);

        let mut counts: BTreeMap<[u8; 4], u32> = BTreeMap::new();
        for y in 0..height {
            for x in 0..width {
                *counts.entry(image.get_pixel(x, y).0).or_insert(0) += 1;
            }
        }

        Self {
            colors: counts.into_iter().map(|(rgba, n)| (n, rgba)).collect(),
        }
    }

    /// Converts the palette into weighted samples.
    ///
    /// Fully transparent pixels are dropped, except on foliage where they are
    /// re-emitted as black: leaf gaps render near-black in game because of
    /// lighting.
    pub fn samples(&self, weight: f64, foliage: bool) -> Vec<ColorSample> {
        let mut samples: Vec<ColorSample> = self
            .colors
            .iter()
            .filter(|(_, rgba)| rgba[3] != 0)
            .map(|&(n, [r, g, b, _])| ColorSample::from_pixels(n, (r, g, b), weight))
            .collect();

        if foliage {
            samples.extend(
                self.colors
                    .iter()
                    .filter(|(_, rgba)| rgba[3] == 0)
                    .map(|&(n, _)| ColorSample::from_pixels(n, (0, 0, 0), weight)),
            );
        }

        samples
    }
}

/// Transparent pixels count as black for any texture whose name mentions leaves.
pub fn is_foliage_texture(name: &str) -> bool {
    name.contains("leaves")
}

pub fn load_texture(path: &Path) -> Result<TexturePalette> {
    let image = image::open(path).map_err(|e| BiomeColorError::AssetNotFound {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(TexturePalette::from_image(&image.to_rgba8()))
}

/// Decodes each texture at most once per registry build.
pub struct TextureCache {
    asset_dir: PathBuf,
    palettes: FnvHashMap<String, TexturePalette>,
}

impl TextureCache {
    pub fn new(asset_dir: &Path) -> Self {
        Self {
            asset_dir: asset_dir.to_path_buf(),
            palettes: FnvHashMap::default(),
        }
    }

    pub fn get(&mut self, name: &str) -> Result<&TexturePalette> {
        if !self.palettes.contains_key(name) {
            let palette = load_texture(&self.asset_dir.join(name))?;
            log::debug!("Loaded {} ({} colors)", name, palette.colors.len());
            self.palettes.insert(name.to_string(), palette);
        }
        Ok(&self.palettes[name])
    }

    /// Weighted samples for a texture referenced from a biome definition.
    pub fn samples(&mut self, name: &str, weight: f64) -> Result<Vec<ColorSample>> {
        let foliage: bool = is_foliage_texture(name);
        Ok(self.get(name)?.samples(weight, foliage))
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }
}
