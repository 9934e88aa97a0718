use crate::biome::Biome;
use crate::biome_definitions::{read_definitions, BiomeRecord};
use crate::error::{BiomeColorError, Result};
use crate::texture::TextureCache;
use crate::variants::VariantSpec;
use std::collections::btree_map::{self, BTreeMap};
use std::path::Path;

/// All biomes by name, iterated in name order.
#[derive(Clone, Debug, Default)]
pub struct BiomeRegistry {
    biomes: BTreeMap<String, Biome>,
}

impl BiomeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the definition file and samples every biome's textures.
    pub fn load(definitions: &Path, asset_dir: &Path) -> Result<Self> {
        let records: Vec<BiomeRecord> = read_definitions(definitions)?;
        let mut textures = TextureCache::new(asset_dir);
        let registry: BiomeRegistry = Self::from_records(&records, &mut textures)?;
        log::info!(
            "Loaded {} biomes from {} textures",
            registry.len(),
            textures.len()
        );
        Ok(registry)
    }

    pub fn from_records(records: &[BiomeRecord], textures: &mut TextureCache) -> Result<Self> {
        let mut registry = Self::new();
        for record in records {
            let biome: Biome = Biome::build(record, textures)?;
            registry.insert(&record.name, biome)?;
        }
        Ok(registry)
    }

    /// Rejects duplicate names.
    pub fn insert(&mut self, name: &str, biome: Biome) -> Result<()> {
        match self.biomes.entry(name.to_string()) {
            btree_map::Entry::Occupied(_) => {
                Err(BiomeColorError::malformed(name, "biome defined twice"))
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(biome);
                Ok(())
            }
        }
    }

    /// Adds derived variants in table order. A variant may use an earlier
    /// variant as its source, never a later one.
    pub fn derive_variants(&mut self, variants: &[VariantSpec]) -> Result<()> {
        for variant in variants {
            let source: &Biome =
                self.get(&variant.source)
                    .ok_or_else(|| BiomeColorError::UnknownSourceBiome {
                        variant: variant.name.clone(),
                        source_name: variant.source.clone(),
                    })?;
            let derived: Biome = source.create_variant(variant.id, variant.delta);
            self.insert(&variant.name, derived)?;
            log::debug!(
                "Derived {} from {} (lightness {:+})",
                variant.name,
                variant.source,
                variant.delta
            );
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Biome> {
        self.biomes.get(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Biome> {
        self.biomes.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, Biome> {
        self.biomes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome_definitions::parse_definitions;
    use crate::test_utilities::{write_definitions, write_solid_texture};
    use crate::variants::HILLS;

    fn two_biome_assets() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_solid_texture(dir.path(), "sand.png", (219, 207, 163));
        write_solid_texture(dir.path(), "snow.png", (249, 254, 254));
        dir
    }

    #[test]
    fn test_load_from_files() {
        let dir = two_biome_assets();
        let definitions = write_definitions(
            dir.path(),
            "desert\n2\nsand.png\n\nsnowy_plains\n12\nsnow.png\n",
        );
        let registry = BiomeRegistry::load(&definitions, dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("desert").unwrap().id(), 2);
        let names: Vec<&String> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["desert", "snowy_plains"]);
    }

    #[test]
    fn test_missing_definition_file() {
        let dir = two_biome_assets();
        assert!(matches!(
            BiomeRegistry::load(&dir.path().join("missing.txt"), dir.path()),
            Err(BiomeColorError::Io { .. })
        ));
    }

    #[test]
    fn test_missing_texture_aborts() {
        let dir = two_biome_assets();
        let records = parse_definitions("desert\n2\nsand.png\nred_sand.png\n").unwrap();
        let mut textures = TextureCache::new(dir.path());
        assert!(matches!(
            BiomeRegistry::from_records(&records, &mut textures),
            Err(BiomeColorError::AssetNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let dir = two_biome_assets();
        let records = parse_definitions("desert\n2\nsand.png\n\ndesert\n3\nsand.png\n").unwrap();
        let mut textures = TextureCache::new(dir.path());
        assert!(matches!(
            BiomeRegistry::from_records(&records, &mut textures),
            Err(BiomeColorError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn test_derive_variants_in_order() {
        let dir = two_biome_assets();
        let records = parse_definitions("desert\n2\nsand.png\n").unwrap();
        let mut textures = TextureCache::new(dir.path());
        let mut registry = BiomeRegistry::from_records(&records, &mut textures).unwrap();

        registry
            .derive_variants(&[
                VariantSpec::new("desert_hills", "desert", 17, HILLS),
                VariantSpec::new("desert_peaks", "desert_hills", 99, HILLS),
            ])
            .unwrap();

        let desert = registry.get("desert").unwrap().color();
        let peaks = registry.get("desert_peaks").unwrap();
        assert_eq!(peaks.id(), 99);
        assert!((peaks.color().x - (desert.x + 2.0 * HILLS)).abs() < 1e-12);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_unknown_source_biome() {
        let mut registry = BiomeRegistry::new();
        let err = registry
            .derive_variants(&[VariantSpec::new("jungle_hills", "jungle", 22, HILLS)])
            .unwrap_err();
        assert!(matches!(err, BiomeColorError::UnknownSourceBiome { .. }));
        assert!(err.to_string().contains("jungle_hills"));
    }
}
