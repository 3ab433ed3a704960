//! Synthetic campaign dataset generation, used when no historical data
//! source is supplied.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use forecast_core::config::SynthesisConfig;
use forecast_core::types::CampaignRecord;

/// Initial domain of marketing channels.
pub const CHANNELS: [&str; 5] = ["digital_ads", "social_media", "tv", "radio", "email"];

/// Initial domain of audience age bands.
pub const AUDIENCES: [&str; 5] = ["18-24", "25-34", "35-44", "45-54", "55+"];

/// Initial domain of macro market conditions.
pub const MARKET_CONDITIONS: [&str; 3] = ["normal", "pandemic_crisis", "economic_crisis"];

/// Produces labeled campaign records by sampling each field independently
/// and uniformly from its domain.
///
/// The success label is sampled independently of the features, so the
/// synthesized data carries no genuine signal — it stands in for real
/// historical outcomes, which callers wanting predictive validity must
/// supply instead.
pub struct DatasetSynthesizer {
    config: SynthesisConfig,
}

impl DatasetSynthesizer {
    pub fn new(config: &SynthesisConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate `dataset_size` records from the configured bounds.
    pub fn generate(&self, rng: &mut StdRng) -> Vec<CampaignRecord> {
        let records: Vec<CampaignRecord> = (0..self.config.dataset_size)
            .map(|_| self.sample_record(rng))
            .collect();

        debug!(rows = records.len(), "Synthesized campaign dataset");
        records
    }

    fn sample_record(&self, rng: &mut StdRng) -> CampaignRecord {
        CampaignRecord {
            budget: rng
                .gen_range(self.config.budget_min..self.config.budget_max)
                .round(),
            channel: CHANNELS[rng.gen_range(0..CHANNELS.len())].to_string(),
            audience: AUDIENCES[rng.gen_range(0..AUDIENCES.len())].to_string(),
            duration_days: rng.gen_range(self.config.duration_min..self.config.duration_max),
            market_condition: MARKET_CONDITIONS[rng.gen_range(0..MARKET_CONDITIONS.len())]
                .to_string(),
            success: rng.gen_bool(0.5),
        }
    }
}
