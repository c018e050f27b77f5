//! Batch analysis: writes every summarizer table as CSV.
//!
//! Run with: cargo run -p ibdseq-web --bin ibdseq-analysis -- --output-dir results

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use ibdseq_common::catalog::Catalog;
use ibdseq_stats::comparison::compare_models;
use ibdseq_stats::concordance::fold_change_concordance;
use ibdseq_stats::correlation::compute_correlation_matrix;
use ibdseq_stats::dataset::{condition_mean_samples, AnalysisDataset, ExpressionTable};
use ibdseq_stats::differential::rank_pathways;
use ibdseq_stats::export::{write_concordance, write_correlation_matrix, write_pca, write_records};
use ibdseq_stats::pca::compute_pca_projection;
use ibdseq_stats::scorer::rank_targets;
use ibdseq_stats::volcano::volcano_points;
use ibdseq_test_utils::FixtureGenerator;
use ibdseq_web::config::Config;
use ibdseq_web::setup::{dataset_source, init_tracing, load_catalog};

#[derive(Parser, Debug)]
#[command(name = "ibdseq-analysis", version, about = "Export IBD RNA-Seq summary tables")]
struct Cli {
    /// Directory the CSV and JSON files are written to
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,

    /// Config file (overrides IBDSEQ_CONFIG)
    #[arg(long, env = "IBDSEQ_CONFIG")]
    config: Option<PathBuf>,

    /// Principal components to export
    #[arg(long, default_value_t = 2)]
    components: usize,

    /// Reference condition means (gene → model → condition → value, JSON)
    /// checked against the dataset. Simulated tables are used when omitted.
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Relative noise of the simulated observed table
    #[arg(long, default_value_t = 0.1)]
    noise: f64,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    let catalog = load_catalog(&config)?;
    let source = dataset_source(&config, &catalog);
    info!("Loading dataset from {}", source.describe());
    let dataset = source.load()?;

    std::fs::create_dir_all(&cli.output_dir)?;
    let out = cli.output_dir.as_path();

    export_per_model(out, &catalog, &dataset)?;

    let matrix = compute_correlation_matrix(&dataset.expression_by_model())?;
    write_correlation_matrix(&out.join("model_correlation_matrix.csv"), &matrix)?;

    let samples = condition_mean_samples(&dataset.models)?;
    let projection = compute_pca_projection(&samples, cli.components)?;
    write_pca(&out.join("pca_analysis.csv"), &projection)?;
    info!(
        "PCA explained variance ratio: {:?}",
        projection.explained_variance_ratio
    );

    let scores = compare_models(
        &catalog,
        &dataset,
        &config.scoring.reference_model,
        &config.scoring.similarity,
    )?;
    write_records(&out.join("mouse_model_human_comparison.csv"), &scores)?;

    let targets = rank_targets(&dataset.target_evidence, &config.scoring.targets)?;
    write_records(&out.join("potential_targets.csv"), &targets)?;

    let (reference, observed) = concordance_tables(&cli, &catalog, &dataset, config.data.seed)?;
    match fold_change_concordance(&reference, &observed, &catalog.models) {
        Ok(report) => {
            info!(
                "Concordance over {} pairs: direction accuracy {:.3}, pearson {:.3}",
                report.pairs, report.direction_accuracy, report.pearson
            );
            write_concordance(&out.join("concordance.json"), &report)?;
        }
        Err(e) => warn!("Skipping concordance report: {e}"),
    }

    info!("Analysis written to {}", out.display());
    Ok(())
}

/// DE, volcano and pathway tables for every model with data.
fn export_per_model(out: &Path, catalog: &Catalog, dataset: &AnalysisDataset) -> anyhow::Result<()> {
    for spec in &catalog.models {
        if dataset.model(&spec.id).is_none() {
            warn!("No expression data for {}; skipping", spec.id);
            continue;
        }
        let name = spec.comparison_name();
        let records = dataset.differential_expression_for(spec)?;
        write_records(&out.join(format!("{name}_differential_expression.csv")), &records)?;
        write_records(&out.join(format!("{name}_volcano_data.csv")), &volcano_points(&records)?)?;

        if let Some(obs) = dataset.pathways.get(&spec.id) {
            write_records(&out.join(format!("{name}_pathway_analysis.csv")), &rank_pathways(obs)?)?;
        }
        info!("{name}: {} genes", records.len());
    }
    Ok(())
}

fn concordance_tables(
    cli: &Cli,
    catalog: &Catalog,
    dataset: &AnalysisDataset,
    seed: u64,
) -> anyhow::Result<(ExpressionTable, ExpressionTable)> {
    match &cli.reference {
        Some(path) => {
            let reference: ExpressionTable = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            Ok((reference, dataset.condition_mean_table()?))
        }
        None => {
            warn!("No --reference table given; concordance is computed on SIMULATED tables");
            let mut generator = FixtureGenerator::new(seed, &catalog.genes);
            Ok(generator.fold_change_tables(&catalog.models, cli.noise.abs()))
        }
    }
}
