//! Campaign Forecast — AI-assisted marketing campaign outcome analysis.
//!
//! Trains a random forest on a (synthetic) campaign dataset, predicts the
//! outcome for the campaign described on the command line, and prints the
//! analysis report as JSON.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use forecast_core::config::AppConfig;
use forecast_core::types::CampaignInput;
use forecast_engine::{DatasetSynthesizer, PredictionService, ReportAssembler};

#[derive(Parser, Debug)]
#[command(name = "campaign-forecast")]
#[command(about = "Predicts marketing campaign outcomes with a random-forest classifier")]
#[command(version)]
struct Cli {
    /// Campaign budget in currency units (documented range: 1000-100000)
    #[arg(long, default_value_t = 10_000.0)]
    budget: f64,

    /// Marketing channel (digital_ads, social_media, tv, radio, email)
    #[arg(long, default_value = "digital_ads")]
    channel: String,

    /// Target audience age band (18-24, 25-34, 35-44, 45-54, 55+)
    #[arg(long, default_value = "25-34")]
    audience: String,

    /// Campaign duration in days (documented range: 7-90)
    #[arg(long, default_value_t = 30)]
    duration: u32,

    /// Market condition (normal, pandemic_crisis, economic_crisis)
    #[arg(long, default_value = "normal")]
    market_condition: String,

    /// Random seed (overrides config)
    #[arg(long, env = "CAMPAIGN_FORECAST__MODEL__RANDOM_SEED")]
    seed: Option<u64>,

    /// Number of trees in the forest (overrides config)
    #[arg(long, env = "CAMPAIGN_FORECAST__MODEL__TREE_COUNT")]
    trees: Option<usize>,

    /// Synthesized dataset size (overrides config)
    #[arg(long, env = "CAMPAIGN_FORECAST__SYNTHESIS__DATASET_SIZE")]
    dataset_size: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_forecast=info,forecast_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(seed) = cli.seed {
        config.model.random_seed = seed;
    }
    if let Some(trees) = cli.trees {
        config.model.tree_count = trees;
    }
    if let Some(size) = cli.dataset_size {
        config.synthesis.dataset_size = size;
    }
    config.validate()?;

    info!(
        trees = config.model.tree_count,
        seed = config.model.random_seed,
        dataset_size = config.synthesis.dataset_size,
        "Configuration loaded"
    );

    let mut rng = StdRng::seed_from_u64(config.model.random_seed);
    let records = DatasetSynthesizer::new(&config.synthesis).generate(&mut rng);

    let mut service = PredictionService::new(&config.model);
    service.train(&records, &mut rng)?;

    let input = CampaignInput {
        budget: cli.budget,
        channel: cli.channel,
        audience: cli.audience,
        duration_days: cli.duration,
        market_condition: cli.market_condition,
    };

    let result = service.predict_for(&input)?;
    info!(outcome = result.outcome.as_str(), accuracy = result.accuracy, "Campaign scored");

    let report = ReportAssembler::assemble(&input, &result);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
