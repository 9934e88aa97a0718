//! Repulsive gradient steps that push similar biome colors apart.
//!
//! Every biome is pushed away from every other with a force that falls off
//! with the inverse squared perceptual distance. Lightness differences are
//! weighted more heavily since they read more clearly on a map. A move is only
//! taken if the new color stays within the convex hull of the biome's own
//! texture colors; a biome stuck on its hull boundary keeps repelling others.

use crate::registry::BiomeRegistry;
use glam::DVec3;

pub const DEFAULT_STEP: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimizerConfig {
    /// Multiplier on the squared lightness difference.
    pub lightness_weight: f64,
    /// Added to the squared distance so coincident colors stay finite.
    pub epsilon: f64,
    /// Distance moved per iteration by the most strongly repelled biome.
    pub step: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            lightness_weight: 2.0,
            epsilon: 1e-6,
            step: DEFAULT_STEP,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IterationSummary {
    pub accepted: usize,
    pub rejected: usize,
    /// Scale applied to every force this iteration, 0 when nothing moved.
    pub step: f64,
}

/// Net repulsion on `colors[index]` from all other colors.
pub fn gradient(colors: &[DVec3], index: usize, config: &OptimizerConfig) -> DVec3 {
    let col: DVec3 = colors[index];
    colors
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != index)
        .map(|(_, other)| {
            let d: DVec3 = col - *other;
            let w: f64 = config.lightness_weight * d.x * d.x + d.y * d.y + d.z * d.z + config.epsilon;
            d / w
        })
        .sum()
}

/// Runs one iteration. All forces are computed from the colors at the start
/// of the iteration before any biome moves, so biome order does not matter.
pub fn optimize_step(registry: &mut BiomeRegistry, config: &OptimizerConfig) -> IterationSummary {
    let colors: Vec<DVec3> = registry.iter().map(|(_, biome)| biome.color()).collect();
    let forces: Vec<DVec3> = (0..colors.len())
        .map(|i| gradient(&colors, i, config))
        .collect();

    let strongest: f64 = forces.iter().map(|f| f.length()).fold(0.0, f64::max);
    if strongest <= 0.0 || !strongest.is_finite() {
        return IterationSummary::default();
    }
    let step: f64 = config.step / strongest;

    let mut summary = IterationSummary {
        step,
        ..Default::default()
    };
    for ((_, biome), force) in registry.iter_mut().zip(forces) {
        if biome.try_move(biome.color() + force * step) {
            summary.accepted += 1;
        } else {
            summary.rejected += 1;
        }
    }
    summary
}

/// Runs a fixed number of iterations; there is no convergence check.
/// `on_step` sees the 1-based iteration number and its summary.
pub fn optimize<F>(
    registry: &mut BiomeRegistry,
    iterations: u32,
    config: &OptimizerConfig,
    mut on_step: F,
) -> Vec<IterationSummary>
where
    F: FnMut(u32, &IterationSummary),
{
    (1..=iterations)
        .map(|i| {
            let summary: IterationSummary = optimize_step(registry, config);
            log::debug!(
                "Iteration {}: {} moved, {} pinned, scale {:.3e}",
                i,
                summary.accepted,
                summary.rejected,
                summary.step
            );
            on_step(i, &summary);
            summary
        })
        .collect()
}
