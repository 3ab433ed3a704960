//! Prediction service — orchestrates encoding, the train/test split,
//! forest training and single-campaign prediction.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::info;

use forecast_core::config::ModelConfig;
use forecast_core::error::{ForecastError, ForecastResult};
use forecast_core::types::{
    CampaignInput, CampaignRecord, FeatureImportanceEntry, Outcome, PredictionResult,
    FEATURE_COLUMNS,
};

use crate::encoder::CategoryEncoder;
use crate::forest::OutcomeForest;
use crate::ranking::rank_importances;

/// Owns the per-field encoders, the trained forest, and the evaluation
/// results. Encoders and forest are single-writer during [`train`]
/// (and encoder growth during [`predict_for`]); a multi-threaded host
/// must serialize those calls externally.
///
/// [`train`]: PredictionService::train
/// [`predict_for`]: PredictionService::predict_for
pub struct PredictionService {
    config: ModelConfig,
    channel_encoder: CategoryEncoder,
    audience_encoder: CategoryEncoder,
    market_encoder: CategoryEncoder,
    forest: OutcomeForest,
    accuracy: Option<f64>,
    importances: Vec<FeatureImportanceEntry>,
}

impl PredictionService {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            config: config.clone(),
            channel_encoder: CategoryEncoder::new("channel"),
            audience_encoder: CategoryEncoder::new("audience"),
            market_encoder: CategoryEncoder::new("market_condition"),
            forest: OutcomeForest::new(config.tree_count, config.max_depth),
            accuracy: None,
            importances: Vec::new(),
        }
    }

    /// Fit the encoders over the dataset, split it into train/test
    /// partitions with a seeded shuffle, train the forest on the training
    /// partition and evaluate accuracy on the held-out one.
    pub fn train(&mut self, records: &[CampaignRecord], rng: &mut StdRng) -> ForecastResult<()> {
        if records.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "{} records; at least 2 required for a train/test split",
                records.len()
            )));
        }

        self.channel_encoder.fit(records.iter().map(|r| &r.channel));
        self.audience_encoder
            .fit(records.iter().map(|r| &r.audience));
        self.market_encoder
            .fit(records.iter().map(|r| &r.market_condition));

        let (x, y) = self.encode_dataset(records)?;

        let n = records.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);

        let n_test = ((n as f64 * self.config.test_fraction).round() as usize).clamp(1, n - 1);
        let (test_idx, train_idx) = order.split_at(n_test);

        let (x_train, y_train) = take_rows(&x, &y, train_idx);
        let (x_test, y_test) = take_rows(&x, &y, test_idx);

        self.forest.fit(&x_train, &y_train, rng)?;
        let accuracy = self.forest.evaluate(&x_test, &y_test)?;
        let scores = self.forest.feature_importances()?;

        self.accuracy = Some(accuracy);
        self.importances = rank_importances(&FEATURE_COLUMNS, &scores);

        info!(
            rows = n,
            train = train_idx.len(),
            test = test_idx.len(),
            accuracy = accuracy,
            "Model trained"
        );
        Ok(())
    }

    /// Predict the outcome for one new campaign.
    ///
    /// Each categorical field goes through `ensure` then `encode`, so a
    /// previously unseen category value never aborts the pipeline: it is
    /// absorbed into the vocabulary instead.
    pub fn predict_for(&mut self, input: &CampaignInput) -> ForecastResult<PredictionResult> {
        if !self.forest.is_trained() {
            return Err(ForecastError::NotTrained);
        }

        self.channel_encoder.ensure(&input.channel);
        self.audience_encoder.ensure(&input.audience);
        self.market_encoder.ensure(&input.market_condition);

        let row = Array1::from_vec(vec![
            input.budget,
            self.channel_encoder.encode(&input.channel)? as f64,
            self.audience_encoder.encode(&input.audience)? as f64,
            f64::from(input.duration_days),
            self.market_encoder.encode(&input.market_condition)? as f64,
        ]);

        let success = self.forest.predict(row.view())?;
        let accuracy = self.accuracy.ok_or(ForecastError::NotTrained)?;

        Ok(PredictionResult {
            outcome: Outcome::from_label(success),
            accuracy,
            importances: self.importances.clone(),
        })
    }

    /// Test-partition accuracy of the trained forest.
    pub fn accuracy(&self) -> ForecastResult<f64> {
        self.accuracy.ok_or(ForecastError::NotTrained)
    }

    /// Ranked importances computed at training time.
    pub fn importances(&self) -> &[FeatureImportanceEntry] {
        &self.importances
    }

    pub fn channel_encoder(&self) -> &CategoryEncoder {
        &self.channel_encoder
    }

    pub fn audience_encoder(&self) -> &CategoryEncoder {
        &self.audience_encoder
    }

    pub fn market_encoder(&self) -> &CategoryEncoder {
        &self.market_encoder
    }

    /// Encode all records into the fixed column order
    /// {budget, channel, audience, duration, market_condition}.
    fn encode_dataset(
        &self,
        records: &[CampaignRecord],
    ) -> ForecastResult<(Array2<f64>, Vec<bool>)> {
        let n = records.len();
        let mut data = Vec::with_capacity(n * FEATURE_COLUMNS.len());
        let mut labels = Vec::with_capacity(n);

        for record in records {
            data.push(record.budget);
            data.push(self.channel_encoder.encode(&record.channel)? as f64);
            data.push(self.audience_encoder.encode(&record.audience)? as f64);
            data.push(f64::from(record.duration_days));
            data.push(self.market_encoder.encode(&record.market_condition)? as f64);
            labels.push(record.success);
        }

        let x = Array2::from_shape_vec((n, FEATURE_COLUMNS.len()), data)
            .map_err(|e| ForecastError::Internal(e.into()))?;
        Ok((x, labels))
    }
}

fn take_rows(x: &Array2<f64>, y: &[bool], indices: &[usize]) -> (Array2<f64>, Vec<bool>) {
    let n_cols = x.ncols();
    let mut data = Vec::with_capacity(indices.len() * n_cols);
    let mut labels = Vec::with_capacity(indices.len());
    for &i in indices {
        data.extend(x.row(i).iter().copied());
        labels.push(y[i]);
    }
    let matrix = Array2::from_shape_vec((indices.len(), n_cols), data)
        .expect("row subset has consistent shape");
    (matrix, labels)
}
