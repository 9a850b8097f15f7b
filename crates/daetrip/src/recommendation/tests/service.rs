use super::common::*;
use crate::catalog::{CatalogError, SiteCatalog};
use crate::completion::ChatSession;
use crate::itinerary::ItineraryError;
use crate::recommendation::{
    CategoryProfile, RecommendationError, RecommendationPlan, RecommendationService,
};
use crate::survey::{SurveyDefinition, SurveyError};
use std::collections::BTreeMap;
use std::sync::Arc;

fn names(itinerary: &crate::itinerary::Itinerary) -> Vec<&str> {
    itinerary.site_names().collect()
}

#[test]
fn recommend_resolves_the_winning_type_into_an_itinerary() {
    let service = service();
    let recommendation = service
        .recommend(TECH_ANSWERS.to_vec(), today())
        .expect("recommendation");

    assert_eq!(recommendation.traveler_type.as_str(), "Tech-savvy");
    assert_eq!(recommendation.scores["Tech-savvy"], 2.2);
    assert_eq!(
        names(&recommendation.itinerary),
        vec!["National Science Museum", "Daejeon Expo Park", "Daejeon O-World"]
    );
    assert!(recommendation.itinerary.segments().is_empty());

    let map = &recommendation.map;
    assert_eq!(map.style, "Citrus");
    assert_eq!(map.radius_m, 4_000);
    assert_eq!(map.center, recommendation.itinerary.centroid());
    assert!((map.center.lat - 36.345_933).abs() < 1e-5);
    assert!((map.center.lon - 127.386).abs() < 1e-5);
    assert_eq!(map.title, "DaeTRIP for Daejeon, South Korea, 2024-05-03");
}

#[test]
fn tied_scores_pick_the_alphabetically_first_type() {
    let recommendation = service()
        .recommend(NEUTRAL_ANSWERS.to_vec(), today())
        .expect("recommendation");

    assert_eq!(recommendation.traveler_type.as_str(), "Community-focused");
    assert_eq!(recommendation.map.style, "Flannel");
    assert_eq!(
        names(&recommendation.itinerary),
        vec!["Ppuri Park", "Daejeon Museum of Art", "Hanbat Arboretum"]
    );
}

#[test]
fn road_network_routes_what_it_can() {
    let service = routed_service();
    assert!(service.has_routing());

    let recommendation = service
        .recommend(TECH_ANSWERS.to_vec(), today())
        .expect("recommendation");
    let segments = recommendation.itinerary.segments();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].from, "National Science Museum");
    assert_eq!(segments[0].to, "Daejeon Expo Park");
    assert!(segments[0].has_path());
    assert_eq!(segments[1].to, "Daejeon O-World");
    assert!(!segments[1].has_path());
}

#[test]
fn invalid_answers_are_input_errors() {
    let service = service();

    let error = service
        .recommend(vec![5, 5, 5], today())
        .expect_err("too few answers");
    assert!(matches!(
        error,
        RecommendationError::Survey(SurveyError::ResponseCount {
            expected: 7,
            found: 3
        })
    ));
    assert!(error.is_input_error());

    let error = service
        .score(vec![5, 5, 5, 5, 5, 5, 0])
        .expect_err("zero is out of range");
    assert!(matches!(
        error,
        RecommendationError::Survey(SurveyError::ResponseOutOfRange { index: 6, value: 0 })
    ));
}

#[test]
fn plan_route_keeps_the_selected_order() {
    let service = service();
    let selection = vec![
        "Gyejoksan Mountain".to_string(),
        "Ppuri Park".to_string(),
        "Daejeon Expo Park".to_string(),
    ];

    let itinerary = service.plan_route(&selection).expect("itinerary");
    assert_eq!(
        names(&itinerary),
        vec!["Gyejoksan Mountain", "Ppuri Park", "Daejeon Expo Park"]
    );
}

#[test]
fn plan_route_rejects_unknown_and_empty_selections() {
    let service = service();

    let error = service
        .plan_route(&["Ppuri Park".to_string(), "Seoul Tower".to_string()])
        .expect_err("unknown site");
    assert!(matches!(
        &error,
        RecommendationError::Catalog(CatalogError::UnknownSite(name)) if name == "Seoul Tower"
    ));
    assert!(error.is_input_error());

    let error = service.plan_route(&[]).expect_err("empty selection");
    assert!(matches!(
        error,
        RecommendationError::Itinerary(ItineraryError::EmptySelection)
    ));
}

#[test]
fn recommend_from_text_extracts_type_and_sites() {
    let service = service();
    let text = "You come across as a Community-focused traveler. Start at Ppuri Park, \
                then unwind at Hanbat Arboretum. Skip Lotte World this time.";

    let parsed = service.recommend_from_text(text, today()).expect("parsed");

    assert_eq!(
        parsed.traveler_type.as_ref().map(|c| c.as_str()),
        Some("Community-focused")
    );
    let itinerary = parsed.itinerary.as_ref().expect("sites mentioned");
    assert_eq!(names(itinerary), vec!["Ppuri Park", "Hanbat Arboretum"]);
    assert_eq!(parsed.map.as_ref().map(|map| map.style.as_str()), Some("Flannel"));
}

#[test]
fn recommend_from_text_without_sites_has_no_itinerary() {
    let parsed = service()
        .recommend_from_text("You seem Tech-savvy, but I have no suggestions.", today())
        .expect("parsed");

    assert_eq!(
        parsed.traveler_type.as_ref().map(|c| c.as_str()),
        Some("Tech-savvy")
    );
    assert!(parsed.itinerary.is_none());
    assert!(parsed.map.is_none());
}

#[test]
fn consult_sends_the_survey_prompt_and_parses_the_reply() {
    let service = service();
    let model = ScriptedModel::new(&[(
        "Practical Leisure Seeker. Relax at Yuseong Hot Springs, then walk Gyejoksan Mountain.",
        321,
    )]);
    let mut session = ChatSession::new();

    let parsed = service
        .consult(&mut session, &model, TECH_ANSWERS.to_vec(), today())
        .expect("consultation");

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(
        "1. I prefer travel experiences that incorporate technology and efficiency. (Response: 5)"
    ));

    assert_eq!(session.history().len(), 2);
    assert_eq!(session.token_count(), 321);
    assert_eq!(
        parsed.traveler_type.as_ref().map(|c| c.as_str()),
        Some("Practical Leisure Seeker")
    );
    let itinerary = parsed.itinerary.expect("sites mentioned");
    assert_eq!(
        names(&itinerary),
        vec!["Yuseong Hot Springs", "Gyejoksan Mountain"]
    );
}

#[test]
fn consult_propagates_completion_failures() {
    let service = service();
    let model = ScriptedModel::new(&[]);
    let mut session = ChatSession::new();

    let error = service
        .consult(&mut session, &model, TECH_ANSWERS.to_vec(), today())
        .expect_err("no reply");
    assert!(matches!(error, RecommendationError::Completion(_)));
    assert!(!error.is_input_error());
    assert!(session.history().is_empty());
}

#[test]
fn construction_requires_a_profile_for_every_traveler_type() {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        "Tech-savvy".to_string(),
        CategoryProfile {
            sites: vec!["National Science Museum".to_string()],
            map_style: "Citrus".to_string(),
            radius_m: 4_000,
        },
    );

    let result = RecommendationService::new(
        Arc::new(SurveyDefinition::daejeon()),
        Arc::new(SiteCatalog::daejeon()),
        Arc::new(RecommendationPlan::new(profiles)),
        None,
    );

    match result {
        Err(RecommendationError::MissingProfile(category)) => {
            assert_eq!(category, "Community-focused")
        }
        Err(other) => panic!("expected missing profile, got {other:?}"),
        Ok(_) => panic!("plan without every traveler type was accepted"),
    }
}

#[test]
fn construction_rejects_profiles_naming_unknown_sites() {
    let mut plan = RecommendationPlan::daejeon();
    let json = serde_json::to_value(&plan).expect("serialize");
    let mut profiles: BTreeMap<String, CategoryProfile> =
        serde_json::from_value(json).expect("profiles");
    if let Some(profile) = profiles.get_mut("Tech-savvy") {
        profile.sites.push("Seoul Tower".to_string());
    }
    plan = RecommendationPlan::new(profiles);

    let result = RecommendationService::new(
        Arc::new(SurveyDefinition::daejeon()),
        Arc::new(SiteCatalog::daejeon()),
        Arc::new(plan),
        None,
    );

    assert!(matches!(
        result,
        Err(RecommendationError::Catalog(CatalogError::UnknownSite(ref name))) if name == "Seoul Tower"
    ));
}
