//! Integration test for the full train/predict/report flow, end to end
//! over a synthesized dataset.

use rand::rngs::StdRng;
use rand::SeedableRng;

use forecast_core::config::AppConfig;
use forecast_core::types::{CampaignInput, Outcome};
use forecast_engine::{DatasetSynthesizer, PredictionService, ReportAssembler};
use forecast_engine::synthesizer::{AUDIENCES, CHANNELS, MARKET_CONDITIONS};

fn run_pipeline(seed: u64, input: &CampaignInput) -> (f64, Outcome, Vec<(String, f64)>) {
    let mut config = AppConfig::default();
    config.model.random_seed = seed;
    config.validate().expect("default config is valid");

    let mut rng = StdRng::seed_from_u64(seed);
    let records = DatasetSynthesizer::new(&config.synthesis).generate(&mut rng);

    let mut service = PredictionService::new(&config.model);
    service.train(&records, &mut rng).expect("training succeeds");

    let result = service.predict_for(input).expect("prediction succeeds");
    let importances = result
        .importances
        .iter()
        .map(|e| (e.feature.clone(), e.score))
        .collect();
    (result.accuracy, result.outcome, importances)
}

fn sample_input() -> CampaignInput {
    CampaignInput {
        budget: 20_000.0,
        channel: CHANNELS[1].to_string(),
        audience: AUDIENCES[2].to_string(),
        duration_days: 28,
        market_condition: MARKET_CONDITIONS[0].to_string(),
    }
}

#[test]
fn same_seed_reproduces_run_bit_for_bit() {
    let input = sample_input();
    let (acc_a, outcome_a, imp_a) = run_pipeline(42, &input);
    let (acc_b, outcome_b, imp_b) = run_pipeline(42, &input);

    assert_eq!(acc_a, acc_b);
    assert_eq!(outcome_a, outcome_b);
    assert_eq!(imp_a, imp_b);
}

#[test]
fn different_seeds_produce_different_models() {
    let input = sample_input();
    // Compare a handful of seeds against the baseline; at least one must
    // diverge in accuracy or importance ranking.
    let baseline = run_pipeline(42, &input);
    let diverged = [43u64, 44, 45].iter().any(|&seed| {
        let other = run_pipeline(seed, &input);
        other.0 != baseline.0 || other.2 != baseline.2
    });
    assert!(diverged, "three alternative seeds all reproduced seed 42");
}

#[test]
fn unseen_category_is_absorbed_not_rejected() {
    let mut config = AppConfig::default();
    let mut rng = StdRng::seed_from_u64(config.model.random_seed);
    let records = DatasetSynthesizer::new(&config.synthesis).generate(&mut rng);

    config.model.tree_count = 50;
    let mut service = PredictionService::new(&config.model);
    service.train(&records, &mut rng).unwrap();

    let channels_before = service.channel_encoder().len();
    let mut input = sample_input();
    input.channel = "street_posters".to_string();

    let result = service.predict_for(&input).expect("unseen channel must not abort");
    assert_eq!(service.channel_encoder().len(), channels_before + 1);
    assert!(matches!(result.outcome, Outcome::Success | Outcome::Failure));
    assert_eq!(result.importances.len(), 5);

    let report = ReportAssembler::assemble(&input, &result);
    assert_eq!(report.campaign.channel, "street_posters");
    assert_eq!(report.importances.len(), 5);
}

#[test]
fn accuracy_stays_in_unit_interval_across_seeds() {
    let input = sample_input();
    for seed in [1u64, 9, 42, 1234] {
        let (accuracy, _, importances) = run_pipeline(seed, &input);
        assert!((0.0..=1.0).contains(&accuracy), "seed {seed}: {accuracy}");
        let sum: f64 = importances.iter().map(|(_, s)| s).sum();
        assert!((sum - 1.0).abs() < 1e-6, "seed {seed}: importances sum {sum}");
    }
}
