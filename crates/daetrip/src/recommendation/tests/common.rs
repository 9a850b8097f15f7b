use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::catalog::SiteCatalog;
use crate::completion::{Completion, CompletionError, TextCompletion};
use crate::geo::Coordinate;
use crate::itinerary::{NodeId, RoadNetwork, RoutingGraph};
use crate::recommendation::{RecommendationPlan, RecommendationService};
use crate::survey::SurveyDefinition;

/// Answers that score Tech-savvy 2.2 and both other types 0.3.
pub(super) const TECH_ANSWERS: [u8; 7] = [5, 1, 1, 5, 1, 1, 5];

/// Neutral answers tie Community-focused and Practical Leisure Seeker at 0.9.
pub(super) const NEUTRAL_ANSWERS: [u8; 7] = [3; 7];

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 3).expect("valid date")
}

pub(super) fn service() -> RecommendationService {
    match RecommendationService::daejeon() {
        Ok(service) => service,
        Err(error) => panic!("built-in data is consistent: {error}"),
    }
}

/// One road node on each Daejeon site. The Science Museum and Expo Park are linked;
/// O-World is isolated.
pub(super) fn daejeon_roads() -> RoadNetwork {
    let catalog = SiteCatalog::daejeon();
    let mut roads = RoadNetwork::default();
    for (index, site) in catalog.sites().iter().enumerate() {
        roads
            .insert_node(NodeId(index as u64 + 1), site.coordinate())
            .expect("node");
    }

    let node_for = |name: &str| {
        let position = catalog.require(name).expect("site").coordinate();
        roads_nearest(&roads, position)
    };
    let museum = node_for("National Science Museum");
    let expo = node_for("Daejeon Expo Park");
    roads.connect(museum, expo, None, false).expect("edge");
    roads
}

fn roads_nearest(roads: &RoadNetwork, position: Coordinate) -> NodeId {
    roads.nearest_node(position).expect("network has nodes")
}

pub(super) fn routed_service() -> RecommendationService {
    let roads: Arc<dyn RoutingGraph> = Arc::new(daejeon_roads());
    match RecommendationService::new(
        Arc::new(SurveyDefinition::daejeon()),
        Arc::new(SiteCatalog::daejeon()),
        Arc::new(RecommendationPlan::daejeon()),
        Some(roads),
    ) {
        Ok(service) => service,
        Err(error) => panic!("built-in data is consistent: {error}"),
    }
}

/// Completion backend that replays canned replies and records the prompts it saw.
pub(super) struct ScriptedModel {
    replies: Mutex<Vec<Completion>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub(super) fn new(replies: &[(&str, u64)]) -> Self {
        let mut replies: Vec<Completion> = replies
            .iter()
            .map(|(text, total_tokens)| Completion {
                text: text.to_string(),
                total_tokens: *total_tokens,
            })
            .collect();
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

impl TextCompletion for ScriptedModel {
    fn complete(&self, prompt: &str) -> Result<Completion, CompletionError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        self.replies
            .lock()
            .expect("reply mutex poisoned")
            .pop()
            .ok_or_else(|| CompletionError::Unavailable("no scripted reply left".to_string()))
    }
}

pub(super) fn site_names(value: &Value) -> Vec<String> {
    value["sites"]
        .as_array()
        .expect("sites array")
        .iter()
        .map(|site| site["name"].as_str().expect("site name").to_string())
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
