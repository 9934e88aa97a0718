use crate::colors::perceptual_to_hex;
use crate::registry::BiomeRegistry;
use itertools::Itertools;

/// One `<name> <#rrggbb>` line per biome, sorted by name.
pub fn format_report(registry: &BiomeRegistry) -> String {
    registry
        .iter()
        .map(|(name, biome)| format!("{} {}", name, perceptual_to_hex(biome.color())))
        .join("\n")
}
