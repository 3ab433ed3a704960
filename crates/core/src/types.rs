use serde::{Deserialize, Serialize};

/// Fixed feature column order fed to the classifier.
pub const FEATURE_COLUMNS: [&str; 5] = [
    "budget",
    "channel",
    "audience",
    "duration",
    "market_condition",
];

/// One historical marketing campaign with its observed outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub budget: f64,
    pub channel: String,
    pub audience: String,
    pub duration_days: u32,
    pub market_condition: String,
    pub success: bool,
}

/// A campaign to score, as handed over by the input-collection surface.
/// Numeric bounds are validated by the caller; categorical values may be
/// outside the training vocabulary and are absorbed at prediction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignInput {
    pub budget: f64,
    pub channel: String,
    pub audience: String,
    pub duration_days: u32,
    pub market_condition: String,
}

/// Predicted outcome of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn from_label(success: bool) -> Self {
        if success {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

/// Contribution of one input feature to the ensemble's split decisions,
/// normalized so that all scores sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportanceEntry {
    pub feature: String,
    pub score: f64,
}

/// Output of a single prediction: the voted label, the test-partition
/// accuracy of the trained ensemble, and the ranked importances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub outcome: Outcome,
    pub accuracy: f64,
    pub importances: Vec<FeatureImportanceEntry>,
}
