use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::service::{Recommendation, RecommendationService, TextRecommendation};
use crate::error::AppError;
use crate::itinerary::Itinerary;
use crate::survey::{SurveyScore, TravelerCategory, MAX_RESPONSE, MIN_RESPONSE};

/// Router builder exposing survey, recommendation and itinerary endpoints.
pub fn recommendation_router(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route("/api/v1/survey", get(survey_handler))
        .route("/api/v1/survey/score", post(score_handler))
        .route("/api/v1/recommendations", post(recommend_handler))
        .route("/api/v1/recommendations/text", post(text_handler))
        .route("/api/v1/itinerary", post(itinerary_handler))
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub(crate) struct SurveyView {
    pub(crate) questions: Vec<String>,
    pub(crate) categories: Vec<TravelerCategory>,
    pub(crate) min_response: u8,
    pub(crate) max_response: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SurveyAnswers {
    pub(crate) responses: Vec<u8>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextRequest {
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItineraryRequest {
    pub(crate) sites: Vec<String>,
}

fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) async fn survey_handler(
    State(service): State<Arc<RecommendationService>>,
) -> Json<SurveyView> {
    let survey = service.survey();
    Json(SurveyView {
        questions: survey.questions().to_vec(),
        categories: survey.weights().categories().collect(),
        min_response: MIN_RESPONSE,
        max_response: MAX_RESPONSE,
    })
}

pub(crate) async fn score_handler(
    State(service): State<Arc<RecommendationService>>,
    Json(answers): Json<SurveyAnswers>,
) -> Result<Json<SurveyScore>, AppError> {
    Ok(Json(service.score(answers.responses)?))
}

pub(crate) async fn recommend_handler(
    State(service): State<Arc<RecommendationService>>,
    Json(answers): Json<SurveyAnswers>,
) -> Result<Json<Recommendation>, AppError> {
    let today = today_or_local(answers.today);
    Ok(Json(service.recommend(answers.responses, today)?))
}

pub(crate) async fn text_handler(
    State(service): State<Arc<RecommendationService>>,
    Json(request): Json<TextRequest>,
) -> Result<Json<TextRecommendation>, AppError> {
    let today = today_or_local(request.today);
    Ok(Json(service.recommend_from_text(&request.text, today)?))
}

pub(crate) async fn itinerary_handler(
    State(service): State<Arc<RecommendationService>>,
    Json(request): Json<ItineraryRequest>,
) -> Result<Json<Itinerary>, AppError> {
    Ok(Json(service.plan_route(&request.sites)?))
}
