// Poisson Perturbation Generator: seedable operator chaos
// Fires random perturbations at both systems with Poisson-distributed arrivals

use oct_engine::{Perturbation, Variant};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Mix of perturbation kinds: 40% adversarial, 35% poisoning, 25% bombardment.
/// Resets are left to explicit schedules.
const KIND_CDF: [f64; 3] = [0.40, 0.75, 1.00];
const KINDS: [Perturbation; 3] = [
    Perturbation::Adversarial,
    Perturbation::Poisoning,
    Perturbation::Bombardment,
];

pub struct ChaosGenerator {
    rng: ChaCha8Rng,
    pub fired_count: u32,
    pub kind_counts: [u32; 3],
}

impl ChaosGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng, fired_count: 0, kind_counts: [0; 3] }
    }

    /// Perturbations to apply before the next tick. `lambda` is the expected
    /// number per tick across both systems.
    pub fn generate_tick(&mut self, lambda: f64) -> Vec<(Variant, Perturbation)> {
        if lambda <= 0.0 {
            return Vec::new();
        }

        let n = poisson_sample(&mut self.rng, lambda);
        let mut fired = Vec::with_capacity(n as usize);
        for _ in 0..n {
            let variant = if self.rng.gen::<f64>() < 0.5 { Variant::Substrate } else { Variant::Analogue };
            let kind = select_kind(&mut self.rng);
            self.kind_counts[kind] += 1;
            fired.push((variant, KINDS[kind]));
            self.fired_count += 1;
        }
        fired
    }
}

/// Poisson sampling via Knuth algorithm.
/// For λ < 30, uses direct method. For larger λ, uses normal approximation.
fn poisson_sample(rng: &mut ChaCha8Rng, lambda: f64) -> u32 {
    if lambda < 30.0 {
        let l = (-lambda).exp();
        let mut k: u32 = 0;
        let mut p: f64 = 1.0;
        loop {
            k += 1;
            p *= rng.gen::<f64>();
            if p <= l {
                return k - 1;
            }
        }
    } else {
        let u1: f64 = rng.gen();
        let u2: f64 = rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        let result = lambda + lambda.sqrt() * z;
        result.round().max(0.0) as u32
    }
}

fn select_kind(rng: &mut ChaCha8Rng) -> usize {
    let r: f64 = rng.gen();
    KIND_CDF.iter().position(|&cdf| r < cdf).unwrap_or(KIND_CDF.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_poisson_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let lambda = 0.3;
        let n = 20000;
        let sum: u64 = (0..n).map(|_| poisson_sample(&mut rng, lambda) as u64).sum();
        let mean = sum as f64 / n as f64;
        assert!((mean - lambda).abs() < 0.03, "Poisson mean {} far from λ={}", mean, lambda);
    }

    #[test]
    fn test_kind_distribution() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 10000;
        let mut counts = [0u32; 3];
        for _ in 0..n {
            counts[select_kind(&mut rng)] += 1;
        }
        let pcts: Vec<f64> = counts.iter().map(|&c| c as f64 / n as f64 * 100.0).collect();
        assert!((pcts[0] - 40.0).abs() < 3.0, "adversarial: {:.1}%", pcts[0]);
        assert!((pcts[1] - 35.0).abs() < 3.0, "poisoning: {:.1}%", pcts[1]);
        assert!((pcts[2] - 25.0).abs() < 3.0, "bombardment: {:.1}%", pcts[2]);
    }

    #[test]
    fn test_zero_rate_fires_nothing() {
        let mut chaos = ChaosGenerator::new(ChaCha8Rng::seed_from_u64(1));
        for _ in 0..100 {
            assert!(chaos.generate_tick(0.0).is_empty());
        }
        assert_eq!(chaos.fired_count, 0);
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let mut a = ChaosGenerator::new(ChaCha8Rng::seed_from_u64(7));
        let mut b = ChaosGenerator::new(ChaCha8Rng::seed_from_u64(7));
        for _ in 0..200 {
            assert_eq!(a.generate_tick(0.5), b.generate_tick(0.5));
        }
        assert_eq!(a.kind_counts.iter().sum::<u32>(), a.fired_count);
    }
}
