// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region selection and point sampling.

use rand::RngCore;
use tracing::{trace, warn};

use crate::avoid::clip;
use crate::geometry::IntRect;
use crate::region::{Region, Regions};

/// A source of uniformly distributed values in `[0, 1)`.
///
/// Every [`rand::RngCore`] is a source, so a seeded [`rand::rngs::StdRng`] gives reproducible
/// placements. [`SequenceSource`] replays fixed values for tests.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        rand::Rng::r#gen::<f64>(self)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    next: usize,
}

impl SequenceSource {
    /// A source yielding `values` in order, then starting over.
    ///
    /// An empty list always yields `0.0`.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// How a placement picks one of the four regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionPolicy {
    /// Every call picks one of the four regions with equal probability.
    #[default]
    Random,
    /// Calls cycle through [`Region::ALL`], so any four consecutive calls use each region
    /// exactly once. Avoids the clustering pure randomness shows over many labels.
    RoundRobin,
}

/// Scale a unit value onto `0..len`, never reaching `len`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The unit value is in [0, 1) and len is small and positive."
)]
fn scaled(unit: f64, len: usize) -> usize {
    ((unit * len as f64) as usize).min(len - 1)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "The product is bounded by the extent, which fits in i32."
)]
fn offset_within(unit: f64, extent: i32) -> i32 {
    ((unit * f64::from(extent)).floor() as i32).clamp(0, extent - 1)
}

/// Outcome of one placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Region the point was drawn from.
    pub region: Region,
    /// Horizontal offset from the container's left edge.
    pub x: i32,
    /// Vertical offset from the container's top edge.
    pub y: i32,
    /// The clipped region was empty and the point fell back to the container origin.
    pub degenerate: bool,
}

/// Picks regions according to a [`SelectionPolicy`] and draws points inside them.
#[derive(Clone, Debug, Default)]
pub struct Sampler {
    policy: SelectionPolicy,
    calls: u64,
    degenerate: u64,
}

impl Sampler {
    /// A sampler using `policy`.
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            calls: 0,
            degenerate: 0,
        }
    }

    /// The active selection policy.
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Number of placements that fell back to the container origin.
    pub fn degenerate_placements(&self) -> u64 {
        self.degenerate
    }

    /// Number of regions selected so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Pick the next region.
    ///
    /// Round-robin selection depends only on the call count, never on `rng`.
    pub fn select(&mut self, rng: &mut impl RandomSource) -> Region {
        let index = match self.policy {
            SelectionPolicy::Random => scaled(rng.next_unit(), Region::ALL.len()),
            #[allow(
                clippy::cast_possible_truncation,
                reason = "The remainder is below 4."
            )]
            SelectionPolicy::RoundRobin => (self.calls % Region::ALL.len() as u64) as usize,
        };
        self.calls += 1;
        Region::ALL[index]
    }

    /// Select a region, clip it against `obstacles`, and draw a point inside it.
    ///
    /// The returned offsets are relative to `container`'s origin. When the clipped region has
    /// no area the placement degrades to the origin itself and the degenerate counter grows.
    pub fn sample(
        &mut self,
        regions: &Regions,
        container: IntRect,
        obstacles: &[IntRect],
        inset: i32,
        rng: &mut impl RandomSource,
    ) -> Placement {
        let region = self.select(rng);
        let area = clip(regions.get(region), obstacles, inset);
        if area.is_empty() {
            self.degenerate += 1;
            warn!(
                ?region,
                ?area,
                count = self.degenerate,
                "region empty after clipping; placing at container origin"
            );
            return Placement {
                region,
                x: 0,
                y: 0,
                degenerate: true,
            };
        }

        let x = area.left + offset_within(rng.next_unit(), area.width());
        let y = area.top + offset_within(rng.next_unit(), area.height());
        trace!(?region, x, y, "sampled point");
        Placement {
            region,
            x: x - container.left,
            y: y - container.top,
            degenerate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{Margins, partition};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scenario_regions() -> (IntRect, Regions) {
        let container = IntRect::new(0, 0, 300, 500);
        let focal = IntRect::new(100, 0, 200, 50);
        (container, partition(container, focal, Margins::uniform(16)))
    }

    #[test]
    fn half_unit_lands_mid_region() {
        let container = IntRect::new(0, 0, 300, 500);
        let regions = partition(container, IntRect::new(116, 0, 300, 50), Margins::new(0, 16));
        assert_eq!(regions.get(Region::Left), IntRect::new(0, 16, 116, 484));

        // First value selects Left (0.1 * 4 = 0), then x and y.
        let mut rng = SequenceSource::new([0.1, 0.5, 0.5]);
        let mut sampler = Sampler::new(SelectionPolicy::Random);
        let p = sampler.sample(&regions, container, &[], 0, &mut rng);
        assert_eq!(p.region, Region::Left);
        assert_eq!(p.x, 58);
        assert_eq!(p.y, 16 + 234);
    }

    #[test]
    fn width_100_from_16_gives_66() {
        let area = IntRect::new(16, 16, 116, 484);
        assert_eq!(area.left + offset_within(0.5, area.width()), 66);
        assert_eq!(offset_within(0.0, area.width()), 0);
        assert_eq!(offset_within(0.999_999, area.width()), 99);
    }

    #[test]
    fn offsets_are_relative_to_container_origin() {
        let container = IntRect::new(100, 200, 400, 700);
        let focal = IntRect::new(200, 200, 300, 250);
        let regions = partition(container, focal, Margins::uniform(16));
        let mut rng = SequenceSource::new([0.3, 0.0, 0.0]);
        let mut sampler = Sampler::new(SelectionPolicy::Random);
        let p = sampler.sample(&regions, container, &[], 0, &mut rng);
        assert_eq!(p.region, Region::Below);
        assert_eq!((p.x, p.y), (16, 50 + 16));
    }

    #[test]
    fn round_robin_visits_each_region_once_per_cycle() {
        let mut sampler = Sampler::new(SelectionPolicy::RoundRobin);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..3 {
            let cycle: Vec<Region> = (0..4).map(|_| sampler.select(&mut rng)).collect();
            assert_eq!(cycle, Region::ALL);
        }
        assert_eq!(sampler.calls(), 12);
        assert_eq!(sampler.policy(), SelectionPolicy::RoundRobin);
    }

    #[test]
    fn round_robin_ignores_random_values() {
        let mut a = Sampler::new(SelectionPolicy::RoundRobin);
        let mut b = Sampler::new(SelectionPolicy::RoundRobin);
        let mut zeros = SequenceSource::new([0.0]);
        let mut nines = SequenceSource::new([0.9]);
        for _ in 0..7 {
            assert_eq!(a.select(&mut zeros), b.select(&mut nines));
        }
    }

    #[test]
    fn empty_region_falls_back_to_origin_and_counts() {
        let (container, regions) = scenario_regions();
        // 0.9 selects Above, which has no height in this layout.
        let mut rng = SequenceSource::new([0.9]);
        let mut sampler = Sampler::new(SelectionPolicy::Random);
        let p = sampler.sample(&regions, container, &[], 16, &mut rng);
        assert_eq!(p.region, Region::Above);
        assert!(p.degenerate);
        assert_eq!((p.x, p.y), (0, 0));
        assert_eq!(sampler.degenerate_placements(), 1);
    }

    #[test]
    fn sampled_y_avoids_footer_obstacle() {
        let (container, regions) = scenario_regions();
        let footer = IntRect::new(0, 400, 300, 420);
        let mut rng = StdRng::seed_from_u64(7);
        let mut sampler = Sampler::new(SelectionPolicy::Random);
        for _ in 0..500 {
            let p = sampler.sample(&regions, container, &[footer], 16, &mut rng);
            if p.degenerate {
                continue;
            }
            assert!(p.y < 400 - 16, "y {} reaches into the footer", p.y);
            assert!(!(400..420).contains(&p.y));
            assert!(container.contains(p.x, p.y));
        }
        // Above is empty in this layout, so some placements degrade.
        assert!(sampler.degenerate_placements() > 0);
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let (container, regions) = scenario_regions();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut sampler = Sampler::new(SelectionPolicy::Random);
            (0..20)
                .map(|_| sampler.sample(&regions, container, &[], 0, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
    }
}
