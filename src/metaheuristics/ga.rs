//! Genetic algorithm over bit strings.

use super::{argmax, evaluate_masks, mean, require_features};
use super::{OptimizerResult, StopSignal, SubsetObjective, SubsetOptimizer, TracePoint};
use crate::encoding::{encode_ga, FeatureMask};
use crate::error::{FeatselError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// GA parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generation cap.
    pub max_iter: usize,
    /// Per-bit flip probability.
    pub mutation_prob: f64,
    /// Probability a parent pair is recombined.
    pub crossover_prob: f64,
    /// Generations without improvement before stopping early.
    pub patience: usize,
    /// Best individuals copied unchanged into the next generation; at least one.
    pub elitism: usize,
    /// Random seed.
    pub seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 15,
            max_iter: 15,
            mutation_prob: 0.1,
            crossover_prob: 0.8,
            patience: 5,
            elitism: 1,
            seed: 42,
        }
    }
}

impl GaConfig {
    #[must_use]
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    #[must_use]
    pub fn with_mutation_prob(mut self, prob: f64) -> Self {
        self.mutation_prob = prob;
        self
    }

    #[must_use]
    pub fn with_crossover_prob(mut self, prob: f64) -> Self {
        self.crossover_prob = prob;
        self
    }

    #[must_use]
    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks ranges.
    ///
    /// # Errors
    ///
    /// Returns [`FeatselError::ConfigurationError`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(FeatselError::config(
                "ga.population_size",
                self.population_size,
                ">= 2",
            ));
        }
        if self.max_iter == 0 {
            return Err(FeatselError::config("ga.max_iter", self.max_iter, ">= 1"));
        }
        if self.patience == 0 {
            return Err(FeatselError::config("ga.patience", self.patience, ">= 1"));
        }
        for (name, p) in [
            ("ga.mutation_prob", self.mutation_prob),
            ("ga.crossover_prob", self.crossover_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(FeatselError::config(name, p, "in [0, 1]"));
            }
        }
        if self.elitism == 0 {
            return Err(FeatselError::config("ga.elitism", 0, ">= 1"));
        }
        if self.elitism >= self.population_size {
            return Err(FeatselError::config(
                "ga.elitism",
                self.elitism,
                format!("< population_size ({})", self.population_size),
            ));
        }
        Ok(())
    }
}

/// Generational GA with elitism and early stopping.
///
/// Parents are drawn with probability proportional to fitness (uniformly
/// when every fitness is zero). Each pair is recombined at one random cut
/// point with probability `crossover_prob`, then every bit of each child
/// flips with probability `mutation_prob`. Offspring are scored in
/// parallel. Elites keep their recorded fitness, so the generation best
/// never decreases.
#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    config: GaConfig,
    population: Vec<Vec<bool>>,
    fitness: Vec<f64>,
}

impl GeneticAlgorithm {
    #[must_use]
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            population: Vec::new(),
            fitness: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Current population, empty before the first run.
    #[must_use]
    pub fn population(&self) -> &[Vec<bool>] {
        &self.population
    }

    fn select_parent(&self, weights: Option<&WeightedIndex<f64>>, rng: &mut impl Rng) -> usize {
        match weights {
            Some(dist) => dist.sample(rng),
            None => rng.gen_range(0..self.population.len()),
        }
    }

    fn single_point_crossover(
        p1: &[bool],
        p2: &[bool],
        rng: &mut impl Rng,
    ) -> (Vec<bool>, Vec<bool>) {
        let dim = p1.len();
        if dim < 2 {
            return (p1.to_vec(), p2.to_vec());
        }
        let cut = rng.gen_range(1..dim);
        let mut c1 = p1[..cut].to_vec();
        c1.extend_from_slice(&p2[cut..]);
        let mut c2 = p2[..cut].to_vec();
        c2.extend_from_slice(&p1[cut..]);
        (c1, c2)
    }

    fn mutate(&self, bits: &mut [bool], rng: &mut impl Rng) {
        for bit in bits.iter_mut() {
            if rng.gen::<f64>() < self.config.mutation_prob {
                *bit = !*bit;
            }
        }
    }

    fn breed(&self, n_children: usize, rng: &mut impl Rng) -> Vec<Vec<bool>> {
        let weights = WeightedIndex::new(self.fitness.iter().map(|&f| f.max(0.0))).ok();
        let mut children = Vec::with_capacity(n_children + 1);
        while children.len() < n_children {
            let p1 = self.select_parent(weights.as_ref(), rng);
            let p2 = self.select_parent(weights.as_ref(), rng);

            let (mut c1, mut c2) = if rng.gen::<f64>() < self.config.crossover_prob {
                Self::single_point_crossover(&self.population[p1], &self.population[p2], rng)
            } else {
                (self.population[p1].clone(), self.population[p2].clone())
            };
            self.mutate(&mut c1, rng);
            self.mutate(&mut c2, rng);

            children.push(c1);
            if children.len() < n_children {
                children.push(c2);
            }
        }
        children
    }
}

impl SubsetOptimizer for GeneticAlgorithm {
    fn name(&self) -> &'static str {
        "GA"
    }

    fn optimize(
        &mut self,
        objective: &dyn SubsetObjective,
        stop: &StopSignal,
    ) -> Result<OptimizerResult> {
        self.config.validate()?;
        let dim = require_features(objective)?;
        let pop_size = self.config.population_size;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        tracing::info!(
            population = pop_size,
            max_iter = self.config.max_iter,
            features = dim,
            "GA started"
        );

        self.population = (0..pop_size)
            .map(|_| (0..dim).map(|_| rng.gen::<bool>()).collect())
            .collect();
        let masks: Vec<FeatureMask> = self.population.iter().map(|b| encode_ga(b)).collect();
        self.fitness = evaluate_masks(objective, stop, &masks)?;
        let mut evaluations = pop_size;

        let mut best_idx = argmax(&self.fitness);
        let mut best_bits = self.population[best_idx].clone();
        let mut best_score = self.fitness[best_idx];
        let mut trace = vec![TracePoint {
            iteration: 0,
            mean: mean(&self.fitness),
            best: best_score,
        }];

        let mut stale = 0;
        let mut generation = 0;
        while generation < self.config.max_iter && stale < self.config.patience {
            generation += 1;

            let mut ranked: Vec<usize> = (0..pop_size).collect();
            ranked.sort_by(|&a, &b| self.fitness[b].total_cmp(&self.fitness[a]));
            let elites: Vec<usize> = ranked.into_iter().take(self.config.elitism).collect();

            let children = self.breed(pop_size - elites.len(), &mut rng);
            let masks: Vec<FeatureMask> = children.iter().map(|b| encode_ga(b)).collect();
            let child_fitness = evaluate_masks(objective, stop, &masks)?;
            evaluations += children.len();

            let mut next = Vec::with_capacity(pop_size);
            let mut next_fitness = Vec::with_capacity(pop_size);
            for &i in &elites {
                next.push(self.population[i].clone());
                next_fitness.push(self.fitness[i]);
            }
            next.extend(children);
            next_fitness.extend(child_fitness);
            self.population = next;
            self.fitness = next_fitness;

            best_idx = argmax(&self.fitness);
            let generation_best = self.fitness[best_idx];
            if generation_best > best_score {
                best_score = generation_best;
                best_bits = self.population[best_idx].clone();
                stale = 0;
            } else {
                stale += 1;
            }

            trace.push(TracePoint {
                iteration: generation,
                mean: mean(&self.fitness),
                best: generation_best,
            });
            tracing::debug!(
                generation,
                mean = mean(&self.fitness),
                best = generation_best,
                stale,
                "GA generation"
            );
        }

        let mask = encode_ga(&best_bits);
        tracing::info!(
            score = best_score,
            selected = mask.count(),
            evaluations,
            generations = generation,
            "GA finished"
        );
        Ok(OptimizerResult {
            optimizer: self.name().to_string(),
            mask,
            score: best_score,
            evaluations,
            iterations: generation,
            trace,
            population: self.population.iter().map(|b| encode_ga(b)).collect(),
        })
    }
}
