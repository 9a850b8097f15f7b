use chrono::NaiveDate;
use daetrip::completion::{Completion, CompletionError, TextCompletion};
use daetrip::config::AppConfig;
use daetrip::dataset::Dataset;
use daetrip::error::AppError;
use daetrip::recommendation::RecommendationService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the configured data set and wires it into a recommendation service.
pub(crate) fn load_service(config: &AppConfig) -> Result<RecommendationService, AppError> {
    let dataset = Dataset::load(&config.data)?;
    Ok(dataset.into_service()?)
}

/// Offline stand-in for a chat-completion backend.
///
/// Answers a survey prompt by scoring the `(Response: N)` values it contains and naming the
/// traveler type and its configured sites, so the consult flow can run without a network.
pub(crate) struct OfflineAdvisor {
    service: Arc<RecommendationService>,
}

impl OfflineAdvisor {
    pub(crate) fn new(service: Arc<RecommendationService>) -> Self {
        Self { service }
    }
}

impl TextCompletion for OfflineAdvisor {
    fn complete(&self, prompt: &str) -> Result<Completion, CompletionError> {
        let responses = prompt_responses(prompt);
        let score = self
            .service
            .score(responses)
            .map_err(|err| CompletionError::Unavailable(err.to_string()))?;

        let sites = self
            .service
            .plan()
            .profile(score.winner.as_str())
            .map(|profile| profile.sites.join(", "))
            .unwrap_or_default();
        let text = format!(
            "Your answers point to a {} traveler (score {:.1}). In Daejeon, start with {}.",
            score.winner,
            score.winning_score(),
            sites
        );
        let total_tokens = (prompt.split_whitespace().count() + text.split_whitespace().count()) as u64;

        Ok(Completion { text, total_tokens })
    }
}

fn prompt_responses(prompt: &str) -> Vec<u8> {
    prompt
        .lines()
        .filter_map(|line| line.trim_end().strip_suffix(')'))
        .filter_map(|line| line.rsplit_once("(Response: "))
        .filter_map(|(_, value)| value.trim().parse::<u8>().ok())
        .collect()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
