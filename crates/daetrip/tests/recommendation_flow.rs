use chrono::NaiveDate;
use daetrip::catalog::{extract_mentions, resolve, SiteAssignments};
use daetrip::itinerary::{build, ItineraryError, NodeId, RoadNetwork};
use daetrip::render::{GeoJsonRenderer, ItineraryRenderer};
use daetrip::survey::{score, CategoryWeights};
use daetrip::{RecommendationService, Site, SiteCatalog, SurveyDefinition, SurveyResponse};

fn survey_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 3).expect("valid survey date")
}

#[test]
fn every_category_is_scored_and_exactly_one_wins() {
    let survey = SurveyDefinition::daejeon();

    for answers in [[1u8; 7], [5; 7], [2, 4, 1, 5, 3, 2, 4], [5, 5, 1, 1, 3, 5, 2]] {
        let responses = survey.response(answers.to_vec()).expect("valid answers");
        let result = survey.score(&responses).expect("scored");

        assert_eq!(result.scores.len(), 3);
        let best = result
            .scores
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.winning_score(), best);
    }
}

#[test]
fn dominant_weights_win_with_top_answers() {
    let weights = CategoryWeights::new([
        ("Culture", vec![0.1, 0.1, 0.1]),
        ("Nightlife", vec![0.3, 0.2, 0.4]),
        ("Nature", vec![0.0, 0.1, 0.2]),
    ])
    .expect("weights");
    let responses = SurveyResponse::new(vec![5, 5, 5]).expect("answers");

    let result = score(&responses, &weights).expect("scored");
    assert_eq!(result.winner.as_str(), "Nightlife");
    assert_eq!(result.scores["Nightlife"], 4.5);
}

#[test]
fn free_text_mentions_follow_the_text() {
    let known = ["National Science Museum", "Ppuri Park", "Gyejoksan Mountain"];
    let mentions = extract_mentions("Visit the National Science Museum and then Ppuri Park", known);
    assert_eq!(mentions, vec!["National Science Museum", "Ppuri Park"]);
}

#[test]
fn centroid_is_order_independent_and_order_is_kept() {
    let a = Site::new("A", 0.0, 0.0);
    let b = Site::new("B", 0.0, 2.0);
    let c = Site::new("C", 2.0, 0.0);

    let orders = [
        vec![a.clone(), b.clone(), c.clone()],
        vec![c.clone(), a.clone(), b.clone()],
        vec![b, c, a],
    ];
    for sites in orders {
        let expected: Vec<String> = sites.iter().map(|site| site.name.clone()).collect();
        let itinerary = build(sites, None).expect("itinerary");

        let centroid = itinerary.centroid();
        assert!((centroid.lat - 0.667).abs() < 1e-3);
        assert!((centroid.lon - 0.667).abs() < 1e-3);
        let names: Vec<String> = itinerary.site_names().map(str::to_string).collect();
        assert_eq!(names, expected);
    }
}

#[test]
fn empty_selection_is_an_error() {
    assert_eq!(
        build(Vec::new(), None).expect_err("empty"),
        ItineraryError::EmptySelection
    );
}

#[test]
fn one_broken_leg_does_not_hide_the_good_one() {
    let stops = vec![
        Site::new("Ppuri Park", 36.3414, 127.3938),
        Site::new("Daejeon Museum of Art", 36.3519, 127.3891),
        Site::new("Hanbat Arboretum", 36.3058, 127.3381),
    ];

    let mut roads = RoadNetwork::default();
    for (id, stop) in stops.iter().enumerate() {
        roads
            .insert_node(NodeId(id as u64), stop.coordinate())
            .expect("node");
    }
    roads
        .connect(NodeId(0), NodeId(1), None, false)
        .expect("edge");

    let itinerary = build(stops, Some(&roads)).expect("itinerary");
    let with_path: Vec<bool> = itinerary
        .segments()
        .iter()
        .map(|segment| segment.path.is_some())
        .collect();
    assert_eq!(with_path, vec![true, false]);
}

#[test]
fn catalog_lookup_uses_configured_lists() {
    let survey = SurveyDefinition::daejeon();
    let catalog = SiteCatalog::daejeon();
    let assignments = SiteAssignments::new([(
        "Practical Leisure Seeker",
        vec!["Gyejoksan Mountain", "Yuseong Hot Springs"],
    )]);
    assignments.validate(&catalog).expect("all sites known");

    let category = survey
        .weights()
        .category("Practical Leisure Seeker")
        .expect("configured type");
    let sites = resolve(&category, &assignments, &catalog).expect("resolved");
    let names: Vec<&str> = sites.iter().map(|site| site.name.as_str()).collect();
    assert_eq!(names, vec!["Gyejoksan Mountain", "Yuseong Hot Springs"]);
}

#[test]
fn survey_to_geojson_end_to_end() {
    let service = RecommendationService::daejeon().expect("built-in data");
    let recommendation = service
        .recommend(vec![1, 2, 5, 1, 5, 2, 3], survey_date())
        .expect("recommendation");

    assert_eq!(
        recommendation.traveler_type.as_str(),
        "Practical Leisure Seeker"
    );

    let collection = GeoJsonRenderer.render(&recommendation.itinerary, Some(&recommendation.map));
    let features = collection["features"].as_array().expect("features");
    assert_eq!(features.len(), 4);
    assert_eq!(collection["properties"]["style"], "Peach");
}
