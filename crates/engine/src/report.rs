//! Report assembly — turns a prediction into a presentation-ready bundle.
//! Formatting/localization of the final narrative is downstream's job;
//! this only fixes the structured contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use forecast_core::types::{CampaignInput, Outcome, PredictionResult};

/// Structured analysis report for one scored campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignReport {
    pub report_id: Uuid,
    /// Echo of the scored campaign's attributes.
    pub campaign: CampaignInput,
    pub outcome: Outcome,
    pub accuracy: f64,
    /// Accuracy as a percentage string, two decimal places.
    pub accuracy_display: String,
    pub importances: Vec<ReportImportance>,
    pub summary: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// One ranked feature with its score rendered to two decimal places.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportImportance {
    pub feature: String,
    pub score: f64,
    pub score_display: String,
}

/// Pure transformation from a [`PredictionResult`] (plus the original
/// input) into a [`CampaignReport`].
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn assemble(input: &CampaignInput, result: &PredictionResult) -> CampaignReport {
        let importances: Vec<ReportImportance> = result
            .importances
            .iter()
            .map(|entry| ReportImportance {
                feature: entry.feature.clone(),
                score: entry.score,
                score_display: format!("{:.2}", entry.score),
            })
            .collect();

        let verdict = match result.outcome {
            Outcome::Success => "likely to succeed",
            Outcome::Failure => "at risk of failing",
        };

        let mut summary = vec![
            format!(
                "Based on the configured budget ({:.0}) and the `{}` channel, the campaign outcome was analyzed.",
                input.budget, input.channel
            ),
            format!(
                "The `{}` audience plays a central role, together with the planned duration of {} days.",
                input.audience, input.duration_days
            ),
            format!(
                "Current market conditions (`{}`) were taken into account and can noticeably affect performance.",
                input.market_condition
            ),
            format!("Predicted outcome: the campaign is {verdict}."),
            format!(
                "Model accuracy on held-out data: {:.2}%.",
                result.accuracy * 100.0
            ),
        ];
        for entry in &importances {
            summary.push(format!(
                "Feature `{}` influence on success: {}.",
                entry.feature, entry.score_display
            ));
        }

        CampaignReport {
            report_id: Uuid::new_v4(),
            campaign: input.clone(),
            outcome: result.outcome,
            accuracy: result.accuracy,
            accuracy_display: format!("{:.2}%", result.accuracy * 100.0),
            importances,
            summary,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::types::FeatureImportanceEntry;

    fn sample_result() -> PredictionResult {
        PredictionResult {
            outcome: Outcome::Success,
            accuracy: 0.575,
            importances: vec![
                FeatureImportanceEntry {
                    feature: "budget".into(),
                    score: 0.4051,
                },
                FeatureImportanceEntry {
                    feature: "duration".into(),
                    score: 0.2049,
                },
            ],
        }
    }

    fn sample_input() -> CampaignInput {
        CampaignInput {
            budget: 15_000.0,
            channel: "social_media".into(),
            audience: "25-34".into(),
            duration_days: 21,
            market_condition: "normal".into(),
        }
    }

    #[test]
    fn test_scores_rendered_to_two_decimals() {
        let report = ReportAssembler::assemble(&sample_input(), &sample_result());
        assert_eq!(report.importances[0].score_display, "0.41");
        assert_eq!(report.importances[1].score_display, "0.20");
        assert_eq!(report.accuracy_display, "57.50%");
    }

    #[test]
    fn test_echoes_input_and_outcome() {
        let input = sample_input();
        let report = ReportAssembler::assemble(&input, &sample_result());
        assert_eq!(report.campaign.channel, input.channel);
        assert_eq!(report.campaign.duration_days, input.duration_days);
        assert_eq!(report.outcome, Outcome::Success);
        assert!((report.accuracy - 0.575).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_covers_inputs_and_features() {
        let report = ReportAssembler::assemble(&sample_input(), &sample_result());
        let text = report.summary.join("\n");
        assert!(text.contains("social_media"));
        assert!(text.contains("25-34"));
        assert!(text.contains("21 days"));
        assert!(text.contains("budget"));
        assert!(text.contains("57.50%"));
    }

    #[test]
    fn test_report_serializes() {
        let report = ReportAssembler::assemble(&sample_input(), &sample_result());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"outcome\":\"success\""));
    }
}
