//! Particle swarm over the continuous relaxation `[0, 1]^n`.

use super::{evaluate_points, mean, require_features};
use super::{OptimizerResult, StopSignal, SubsetObjective, SubsetOptimizer, TracePoint};
use crate::encoding::decode_continuous;
use crate::error::{FeatselError, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// PSO parameters. Coefficient defaults follow SPSO 2011.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsoConfig {
    /// Particle count; `None` picks `10 + floor(2 * sqrt(n))`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swarm_size: Option<usize>,
    /// Iterations after the initial evaluation.
    pub max_iter: usize,
    /// Inertia weight.
    pub inertia: f64,
    /// Attraction to the personal best.
    pub cognitive: f64,
    /// Attraction to the swarm best.
    pub social: f64,
    /// Velocity bound per coordinate.
    pub v_max: f64,
    /// Random seed.
    pub seed: u64,
}

impl Default for PsoConfig {
    fn default() -> Self {
        let ln2 = std::f64::consts::LN_2;
        Self {
            swarm_size: None,
            max_iter: 15,
            inertia: 1.0 / (2.0 * ln2),
            cognitive: 0.5 + ln2,
            social: 0.5 + ln2,
            v_max: 0.5,
            seed: 42,
        }
    }
}

impl PsoConfig {
    #[must_use]
    pub fn with_swarm_size(mut self, size: usize) -> Self {
        self.swarm_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Swarm size used for an `n`-dimensional search.
    #[must_use]
    pub fn resolved_swarm_size(&self, n: usize) -> usize {
        self.swarm_size
            .unwrap_or_else(|| 10 + (2.0 * (n as f64).sqrt()).floor() as usize)
    }

    /// Checks ranges.
    ///
    /// # Errors
    ///
    /// Returns [`FeatselError::ConfigurationError`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.swarm_size {
            if size == 0 {
                return Err(FeatselError::config("pso.swarm_size", size, ">= 1"));
            }
        }
        if self.max_iter == 0 {
            return Err(FeatselError::config("pso.max_iter", self.max_iter, ">= 1"));
        }
        for (name, c) in [
            ("pso.inertia", self.inertia),
            ("pso.cognitive", self.cognitive),
            ("pso.social", self.social),
        ] {
            if !c.is_finite() || c < 0.0 {
                return Err(FeatselError::config(name, c, "finite and >= 0"));
            }
        }
        if !(self.v_max > 0.0 && self.v_max <= 1.0) {
            return Err(FeatselError::config("pso.v_max", self.v_max, "in (0, 1]"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    best_position: Vec<f64>,
    best_value: f64,
}

/// Global-best particle swarm.
///
/// Particles minimize the negated fitness of their decoded position.
/// Positions are clamped to the unit box and the velocity of a clamped
/// coordinate is zeroed. Particles of one iteration are scored in
/// parallel.
#[derive(Debug, Clone)]
pub struct ParticleSwarm {
    config: PsoConfig,
}

impl ParticleSwarm {
    #[must_use]
    pub fn new(config: PsoConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PsoConfig {
        &self.config
    }

    fn step(&self, particle: &mut Particle, global_best: &[f64], rng: &mut impl Rng) {
        let PsoConfig {
            inertia,
            cognitive,
            social,
            v_max,
            ..
        } = self.config;
        for d in 0..particle.position.len() {
            let r1: f64 = rng.gen();
            let r2: f64 = rng.gen();
            let x = particle.position[d];
            let v = inertia * particle.velocity[d]
                + cognitive * r1 * (particle.best_position[d] - x)
                + social * r2 * (global_best[d] - x);
            let v = v.clamp(-v_max, v_max);

            let moved = x + v;
            if (0.0..=1.0).contains(&moved) {
                particle.position[d] = moved;
                particle.velocity[d] = v;
            } else {
                particle.position[d] = moved.clamp(0.0, 1.0);
                particle.velocity[d] = 0.0;
            }
        }
    }
}

impl SubsetOptimizer for ParticleSwarm {
    fn name(&self) -> &'static str {
        "PSO"
    }

    fn optimize(
        &mut self,
        objective: &dyn SubsetObjective,
        stop: &StopSignal,
    ) -> Result<OptimizerResult> {
        self.config.validate()?;
        let dim = require_features(objective)?;
        let swarm_size = self.config.resolved_swarm_size(dim);
        let v_max = self.config.v_max;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        tracing::info!(
            swarm = swarm_size,
            max_iter = self.config.max_iter,
            features = dim,
            "PSO started"
        );

        let positions: Vec<Vec<f64>> = (0..swarm_size)
            .map(|_| (0..dim).map(|_| rng.gen::<f64>()).collect())
            .collect();
        let values = evaluate_points(objective, stop, &positions)?;
        let mut evaluations = swarm_size;

        let mut swarm: Vec<Particle> = positions
            .into_iter()
            .zip(&values)
            .map(|(position, &value)| Particle {
                velocity: (0..dim).map(|_| rng.gen_range(-v_max..=v_max)).collect(),
                best_position: position.clone(),
                best_value: value,
                position,
            })
            .collect();

        let (mut global_best, mut global_value) = best_of(&swarm);
        let mut trace = vec![TracePoint {
            iteration: 0,
            mean: -mean(&values),
            best: -global_value,
        }];

        for iteration in 1..=self.config.max_iter {
            for particle in &mut swarm {
                self.step(particle, &global_best, &mut rng);
            }
            let positions: Vec<Vec<f64>> = swarm.iter().map(|p| p.position.clone()).collect();
            let values = evaluate_points(objective, stop, &positions)?;
            evaluations += swarm_size;

            for (particle, &value) in swarm.iter_mut().zip(&values) {
                if value < particle.best_value {
                    particle.best_value = value;
                    particle.best_position.clone_from(&particle.position);
                }
            }
            (global_best, global_value) = best_of(&swarm);

            trace.push(TracePoint {
                iteration,
                mean: -mean(&values),
                best: -global_value,
            });
            tracing::debug!(
                iteration,
                mean = -mean(&values),
                best = -global_value,
                "PSO iteration"
            );
        }

        let mask = decode_continuous(&global_best);
        let score = -global_value;
        tracing::info!(score, selected = mask.count(), evaluations, "PSO finished");
        Ok(OptimizerResult {
            optimizer: self.name().to_string(),
            mask,
            score,
            evaluations,
            iterations: self.config.max_iter,
            trace,
            population: Vec::new(),
        })
    }
}

/// Personal best with the lowest value; ties go to the first particle.
fn best_of(swarm: &[Particle]) -> (Vec<f64>, f64) {
    let mut best = &swarm[0];
    for particle in &swarm[1..] {
        if particle.best_value < best.best_value {
            best = particle;
        }
    }
    (best.best_position.clone(), best.best_value)
}
