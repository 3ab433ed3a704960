//! Campaign outcome forecasting engine — categorical encoding, synthetic
//! dataset generation, random-forest training, feature-importance ranking,
//! single-campaign prediction and report assembly.

pub mod encoder;
pub mod forest;
pub mod ranking;
pub mod report;
pub mod service;
pub mod synthesizer;

pub use encoder::CategoryEncoder;
pub use forest::OutcomeForest;
pub use ranking::rank_importances;
pub use report::{CampaignReport, ReportAssembler};
pub use service::PredictionService;
pub use synthesizer::DatasetSynthesizer;
