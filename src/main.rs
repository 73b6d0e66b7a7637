use anyhow::{Context, Result};
use churn_drift::{BatchGenerator, DriftConfig, DriftReport};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Once;

static LOGGER: Once = Once::new();

/// Generate drifted churn batches for monitoring pipeline tests.
/// With no flags: data/telco_churn.csv -> scripts/data_streams, 10 x 700 rows.
#[derive(Parser, Debug)]
#[command(name = "churn-drift", version)]
struct Cli {
    /// Project root the default and relative paths resolve against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source CSV
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory (wiped and recreated)
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    batches: Option<usize>,

    #[arg(long)]
    batch_size: Option<usize>,

    /// Seed for reproducible batches
    #[arg(long)]
    seed: Option<u64>,

    /// Fail instead of wiping an existing output directory
    #[arg(long)]
    no_overwrite: bool,

    /// Write the run report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .format_timestamp_secs()
            .format_target(false)
            .init();
    });
}

fn build_config(cli: &Cli) -> Result<DriftConfig> {
    let mut config = match &cli.config {
        Some(path) => DriftConfig::from_json_file(path)?,
        None => DriftConfig::default(),
    };

    if let Some(input) = &cli.input {
        config.input_path = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if let Some(batches) = cli.batches {
        config.num_batches = batches;
    }
    if let Some(size) = cli.batch_size {
        config.batch_size = size;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.no_overwrite {
        config.overwrite = false;
    }

    config.resolve_paths(&cli.root);
    Ok(config)
}

fn print_report(report: &DriftReport) {
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("🌊 Drift batches generated");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for batch in &report.batches {
        let scale = batch
            .numeric_scale()
            .map(|f| format!("x{:.2}", f))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  batch {:>2}: {} rows, scale {}, relabeled {}",
            batch.index,
            batch.rows,
            scale,
            batch.relabeled()
        );
    }
    println!("\n✓ {}", report.summary());
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let generator = BatchGenerator::new(config).context("Invalid drift configuration")?;
    let report = generator.generate(&mut rng).with_context(|| {
        format!(
            "Drift injection failed for {}",
            generator.config().input_path.display()
        )
    })?;

    print_report(&report);

    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("✓ Report written to {}", path.display());
    }

    Ok(())
}
