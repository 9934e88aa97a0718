use crate::biome_definitions::{tint_rule, BiomeRecord, TintRule};
use crate::color_sample::ColorSample;
use crate::error::{BiomeColorError, Result};
use crate::hull::ConvexHull;
use crate::texture::TextureCache;
use fnv::FnvHashSet;
use glam::DVec3;

/// A biome's perceptual color together with the region it may move in.
#[derive(Clone, Debug)]
pub struct Biome {
    id: i32,
    color: DVec3,
    hull: ConvexHull,
    history: Vec<DVec3>,
}

impl Biome {
    /// A biome at `color` confined to the hull of `points`.
    pub fn new(name: &str, id: i32, color: DVec3, points: Vec<DVec3>) -> Result<Self> {
        let hull: ConvexHull =
            ConvexHull::new(points).ok_or_else(|| BiomeColorError::EmptyBiome(name.to_string()))?;
        Ok(Self {
            id,
            color,
            hull,
            history: Vec::new(),
        })
    }

    /// Weighted mean of the samples, confined to the hull of their distinct colors.
    pub fn from_samples(name: &str, id: i32, samples: &[ColorSample]) -> Result<Self> {
        let mut total = DVec3::ZERO;
        let mut weight: f64 = 0.0;
        let mut seen: FnvHashSet<[u64; 3]> = FnvHashSet::default();
        let mut points: Vec<DVec3> = Vec::new();

        for sample in samples {
            total += sample.perceptual() * sample.weight();
            weight += sample.weight();

            let col: DVec3 = sample.perceptual();
            if seen.insert([col.x.to_bits(), col.y.to_bits(), col.z.to_bits()]) {
                points.push(col);
            }
        }

        if weight <= 0.0 {
            return Err(BiomeColorError::EmptyBiome(name.to_string()));
        }
        Self::new(name, id, total / weight, points)
    }

    /// Samples every texture of a definition record with its tints applied.
    pub fn build(record: &BiomeRecord, textures: &mut TextureCache) -> Result<Self> {
        let mut samples: Vec<ColorSample> = Vec::new();

        for texture in &record.textures {
            let colors: Vec<ColorSample> = textures.samples(&texture.name, texture.weight)?;
            let rule: Option<TintRule> = tint_rule(&texture.name);

            if let (Some(TintRule::Grass), Some(secondary)) = (rule, record.tints.secondary_grass) {
                samples.extend(colors.iter().map(|c| c.modified(secondary).scaled(0.5)));
            }

            match rule.and_then(|rule| record.tints.for_rule(rule)) {
                Some(tint) => samples.extend(colors.iter().map(|c| c.modified(tint))),
                None => samples.extend(colors),
            }
        }

        let biome: Biome = Self::from_samples(&record.name, record.id, &samples)?;
        log::debug!(
            "Built {} (id {}) from {} samples, {} hull points",
            record.name,
            record.id,
            samples.len(),
            biome.hull.points().len()
        );
        Ok(biome)
    }

    /// A sibling biome with the same palette rendered at another light level.
    /// Lightness is shifted additively; the chroma axes are untouched.
    pub fn create_variant(&self, id: i32, dlight: f64) -> Self {
        let offset = DVec3::new(dlight, 0.0, 0.0);
        Self {
            id,
            color: self.color + offset,
            hull: self.hull.translated(offset),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn color(&self) -> DVec3 {
        self.color
    }

    pub fn hull(&self) -> &ConvexHull {
        &self.hull
    }

    /// Colors this biome held before each accepted optimizer move.
    pub fn history(&self) -> &[DVec3] {
        &self.history
    }

    /// Moves to `target` if it stays inside the hull. Returns whether it moved.
    /// A biome whose hull is a single point is pinned.
    pub fn try_move(&mut self, target: DVec3) -> bool {
        if self.hull.dimension() == 0 || target == self.color || !self.hull.contains(target) {
            return false;
        }
        self.history.push(self.color);
        self.color = target;
        true
    }
}
