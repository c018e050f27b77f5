//! Simulated IBD expression data.
//!
//! Everything here is synthetic and seeded: the same seed always produces the
//! same dataset. It backs unit and integration tests, the demo server when no
//! dataset file is configured, and the `ibdseq-analysis` dry runs. Nothing in
//! this crate should be mistaken for real measurements.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use ibdseq_common::catalog::{Catalog, ModelSpec, Species};
use ibdseq_common::error::Result;
use ibdseq_stats::dataset::{AnalysisDataset, DatasetSource, ExpressionTable, ModelDataset, Sample};
use ibdseq_stats::differential::PathwayObservation;
use ibdseq_stats::scorer::TargetEvidence;

pub const DEFAULT_SEED: u64 = 42;

/// Samples drawn per model.
pub const SAMPLES_PER_MODEL: usize = 8;

/// Seeded generator. Per-gene disease effects are drawn once and shared by
/// every model, so simulated mouse models correlate with the human cohorts.
pub struct FixtureGenerator {
    rng: StdRng,
    signature: BTreeMap<String, f64>,
    baseline: BTreeMap<String, f64>,
}

impl FixtureGenerator {
    pub fn new(seed: u64, genes: &[String]) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut signature = BTreeMap::new();
        let mut baseline = BTreeMap::new();
        for gene in genes {
            signature.insert(gene.clone(), standard_normal(&mut rng) * 1.5);
            baseline.insert(gene.clone(), (4.0 + standard_normal(&mut rng)).exp());
        }
        Self { rng, signature, baseline }
    }

    /// Log-normal counts for one model. Conditions are assigned at random,
    /// with the first two samples pinned so both conditions are present.
    pub fn model_dataset(&mut self, spec: &ModelSpec, num_samples: usize) -> ModelDataset {
        let num_samples = num_samples.max(2);
        let samples: Vec<Sample> = (0..num_samples)
            .map(|i| {
                let disease = match i {
                    0 => false,
                    1 => true,
                    _ => self.rng.gen_bool(0.5),
                };
                let condition = if disease { &spec.disease_condition } else { &spec.control_condition };
                Sample {
                    id: format!("{}_S{:02}", spec.id, i + 1),
                    condition: condition.clone(),
                }
            })
            .collect();

        // Human cohorts follow the signature closely; mouse models only partly.
        let fidelity = match spec.species {
            Species::Human => 0.9,
            Species::Mouse => self.rng.gen_range(0.3..0.8),
        };

        let mut expression = BTreeMap::new();
        for (gene, base) in &self.baseline {
            let effect = fidelity * self.signature[gene] + (1.0 - fidelity) * standard_normal(&mut self.rng);
            let values = samples
                .iter()
                .map(|s| {
                    let shift = if s.condition == spec.disease_condition { effect } else { 0.0 };
                    let noise = 0.2 * standard_normal(&mut self.rng);
                    base * (shift * std::f64::consts::LN_2 + noise).exp()
                })
                .collect();
            expression.insert(gene.clone(), values);
        }

        ModelDataset { model: spec.id.clone(), samples, expression }
    }

    /// Small p-values for genes whose shared effect is large.
    pub fn pvalues(&mut self, genes: &[String]) -> BTreeMap<String, f64> {
        genes
            .iter()
            .map(|g| {
                let strong = self.signature.get(g).is_some_and(|e| e.abs() > 1.0);
                let p = if strong { self.rng.gen_range(1e-6..0.02) } else { self.rng.gen_range(0.05..1.0) };
                (g.clone(), p)
            })
            .collect()
    }

    pub fn pathway_observations(&mut self, pathways: &[String]) -> Vec<PathwayObservation> {
        pathways
            .iter()
            .map(|name| PathwayObservation {
                pathway: name.clone(),
                pvalue: self.rng.gen_range(1e-5..0.2),
                gene_count: self.rng.gen_range(10..120),
                enrichment_score: self.rng.gen_range(1.0..4.0),
            })
            .collect()
    }

    /// Evidence for a random subset of candidate genes.
    pub fn target_evidence(&mut self, genes: &[String], count: usize) -> Vec<TargetEvidence> {
        let mut picked: Vec<&String> = genes.iter().collect();
        picked.shuffle(&mut self.rng);
        picked.truncate(count);
        picked.sort();
        picked
            .into_iter()
            .map(|g| TargetEvidence {
                gene: g.clone(),
                differential_expression_score: self.rng.gen_range(0.4..1.0),
                pathway_relevance_score: self.rng.gen_range(0.4..1.0),
                conservation_score: self.rng.gen_range(0.5..1.0),
                druggability_score: self.rng.gen_range(0.2..1.0),
            })
            .collect()
    }

    /// A full dataset covering every catalog model.
    pub fn analysis_dataset(&mut self, catalog: &Catalog) -> AnalysisDataset {
        let mut dataset = AnalysisDataset::default();
        for spec in &catalog.models {
            let model = self.model_dataset(spec, SAMPLES_PER_MODEL);
            let genes: Vec<String> = model.expression.keys().cloned().collect();
            dataset.de_pvalues.insert(spec.id.clone(), self.pvalues(&genes));
            dataset
                .pathways
                .insert(spec.id.clone(), self.pathway_observations(&catalog.pathways));
            dataset.models.push(model);
        }
        dataset.target_evidence = self.target_evidence(&catalog.genes, 10);
        dataset
    }

    /// Reference and observed condition-mean tables. Observed values are the
    /// reference perturbed by up to `noise` (relative).
    pub fn fold_change_tables(&mut self, models: &[ModelSpec], noise: f64) -> (ExpressionTable, ExpressionTable) {
        let mut reference = ExpressionTable::new();
        let mut observed = ExpressionTable::new();
        let genes: Vec<String> = self.baseline.keys().cloned().collect();
        for gene in &genes {
            for spec in models {
                let control = self.baseline[gene];
                let disease = control * (self.signature[gene] * std::f64::consts::LN_2).exp();
                for (condition, value) in [(&spec.control_condition, control), (&spec.disease_condition, disease)] {
                    let jitter = 1.0 + self.rng.gen_range(-noise..=noise);
                    insert(&mut reference, gene, &spec.id, condition, value);
                    insert(&mut observed, gene, &spec.id, condition, value * jitter);
                }
            }
        }
        (reference, observed)
    }
}

fn insert(table: &mut ExpressionTable, gene: &str, model: &str, condition: &str, value: f64) {
    table
        .entry(gene.to_string())
        .or_default()
        .entry(model.to_string())
        .or_default()
        .insert(condition.to_string(), value);
}

/// Box–Muller transform over two uniform draws.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

// ── Source ────────────────────────────────────────────────────────────────────

/// [`DatasetSource`] that simulates a dataset from a catalog and a seed.
pub struct FixtureDatasetSource {
    catalog: Catalog,
    seed: u64,
}

impl FixtureDatasetSource {
    pub fn new(catalog: Catalog, seed: u64) -> Self {
        Self { catalog, seed }
    }
}

impl Default for FixtureDatasetSource {
    fn default() -> Self {
        Self::new(Catalog::default(), DEFAULT_SEED)
    }
}

impl DatasetSource for FixtureDatasetSource {
    fn describe(&self) -> String {
        format!("simulated fixtures (seed {})", self.seed)
    }

    fn load(&self) -> Result<AnalysisDataset> {
        let mut generator = FixtureGenerator::new(self.seed, &self.catalog.genes);
        let dataset = generator.analysis_dataset(&self.catalog);
        dataset.validate()?;
        Ok(dataset)
    }
}

/// Shorthand for tests: the default catalog simulated with `seed`.
pub fn sample_dataset(seed: u64) -> AnalysisDataset {
    let catalog = Catalog::default();
    FixtureGenerator::new(seed, &catalog.genes).analysis_dataset(&catalog)
}
