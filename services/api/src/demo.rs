use crate::infra::{load_service, parse_date, OfflineAdvisor};
use chrono::{Local, NaiveDate};
use clap::Args;
use daetrip::completion::ChatSession;
use daetrip::config::AppConfig;
use daetrip::error::AppError;
use daetrip::itinerary::Itinerary;
use daetrip::recommendation::{MapView, RecommendationService};
use daetrip::render::{GeoJsonRenderer, ItineraryRenderer};
use daetrip::survey::SurveyScore;
use daetrip::telemetry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEMO_RESPONSES: [u8; 7] = [4, 2, 5, 1, 3, 2, 4];

#[derive(Args, Debug)]
pub(crate) struct SurveyScoreArgs {
    /// Comma-separated answers, one per question (1-5)
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) responses: Vec<u8>,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Comma-separated answers, one per question (1-5)
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) responses: Vec<u8>,
    /// Date printed in the map title (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Write the itinerary as GeoJSON to this path
    #[arg(long)]
    pub(crate) geojson: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RouteArgs {
    /// Site to visit; repeat in visiting order
    #[arg(long = "site", required = true)]
    pub(crate) sites: Vec<String>,
    /// Write the itinerary as GeoJSON to this path
    #[arg(long)]
    pub(crate) geojson: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Comma-separated answers (defaults to a sample traveler)
    #[arg(long, value_delimiter = ',')]
    pub(crate) responses: Vec<u8>,
    /// Date printed in the map title (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn load_cli_service() -> Result<RecommendationService, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    load_service(&config)
}

pub(crate) fn run_survey_questions() -> Result<(), AppError> {
    let service = load_cli_service()?;
    let survey = service.survey();

    println!("DaeTRIP welcome survey (answer each from 1 to 5)");
    for (index, question) in survey.questions().iter().enumerate() {
        println!("{}. {}", index + 1, question);
    }
    let categories: Vec<String> = survey
        .weights()
        .categories()
        .map(|category| category.to_string())
        .collect();
    println!("\nTraveler types: {}", categories.join(", "));
    Ok(())
}

pub(crate) fn run_survey_score(args: SurveyScoreArgs) -> Result<(), AppError> {
    let service = load_cli_service()?;
    let score = service.score(args.responses)?;
    render_scores(&score);
    Ok(())
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        responses,
        today,
        geojson,
    } = args;

    let service = load_cli_service()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let recommendation = service.recommend(responses, today)?;

    println!("Hello, {} traveler!", recommendation.traveler_type);
    render_scores(&SurveyScore {
        scores: recommendation.scores.clone(),
        winner: recommendation.traveler_type.clone(),
    });
    render_map(&recommendation.map);
    render_itinerary(&recommendation.itinerary);

    if let Some(path) = geojson {
        write_geojson(&path, &recommendation.itinerary, Some(&recommendation.map))?;
    }
    Ok(())
}

pub(crate) fn run_route(args: RouteArgs) -> Result<(), AppError> {
    let service = load_cli_service()?;
    let itinerary = service.plan_route(&args.sites)?;

    if !service.has_routing() {
        println!("No road network configured; showing stops and centroid only.");
    }
    render_itinerary(&itinerary);

    if let Some(path) = args.geojson {
        write_geojson(&path, &itinerary, None)?;
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { responses, today } = args;
    let responses = if responses.is_empty() {
        DEMO_RESPONSES.to_vec()
    } else {
        responses
    };
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let service = Arc::new(load_cli_service()?);

    println!("DaeTRIP demo");
    println!("\nSurvey answers");
    for (question, response) in service.survey().questions().iter().zip(&responses) {
        println!("- {} -> {}", question, response);
    }

    let recommendation = service.recommend(responses.clone(), today)?;
    println!("\nScored traveler type: {}", recommendation.traveler_type);
    render_scores(&SurveyScore {
        scores: recommendation.scores.clone(),
        winner: recommendation.traveler_type.clone(),
    });
    render_map(&recommendation.map);
    render_itinerary(&recommendation.itinerary);

    println!("\nAdvisor conversation (offline completion backend)");
    let advisor = OfflineAdvisor::new(service.clone());
    let mut session = ChatSession::new();
    let parsed = service.consult(&mut session, &advisor, responses, today)?;
    if let Some(reply) = session.last_reply() {
        println!("> {}", reply);
    }
    println!("Tokens used this session: {}", session.token_count());

    match (&parsed.traveler_type, &parsed.itinerary) {
        (Some(traveler_type), Some(itinerary)) => {
            let stops: Vec<&str> = itinerary.site_names().collect();
            println!(
                "Parsed reply: {} traveler, stops {}",
                traveler_type,
                stops.join(" -> ")
            );
        }
        _ => println!("Parsed reply: no traveler type or sites recognized"),
    }

    Ok(())
}

fn render_scores(score: &SurveyScore) {
    println!("\nScores");
    for (category, value) in &score.scores {
        let marker = if category == score.winner.as_str() {
            " (winner)"
        } else {
            ""
        };
        println!("- {}: {:.1}{}", category, value, marker);
    }
}

fn render_map(map: &MapView) {
    println!("\nMap: {}", map.title);
    println!(
        "- style {} | radius {} m | center {:.4}, {:.4}",
        map.style, map.radius_m, map.center.lat, map.center.lon
    );
}

fn render_itinerary(itinerary: &Itinerary) {
    let centroid = itinerary.centroid();
    println!("\nItinerary");
    for (index, site) in itinerary.sites().iter().enumerate() {
        match &site.description {
            Some(description) => println!("{}. {} - {}", index + 1, site.name, description),
            None => println!("{}. {}", index + 1, site.name),
        }
    }
    println!("Centroid: {:.4}, {:.4}", centroid.lat, centroid.lon);

    for segment in itinerary.segments() {
        match &segment.path {
            Some(path) => println!(
                "- {} -> {}: {} nodes, {:.0} m",
                segment.from,
                segment.to,
                path.nodes.len(),
                path.length_m()
            ),
            None => println!("- {} -> {}: no road path found", segment.from, segment.to),
        }
    }
}

fn write_geojson(path: &Path, itinerary: &Itinerary, map: Option<&MapView>) -> Result<(), AppError> {
    let collection = GeoJsonRenderer.render(itinerary, map);
    let body = serde_json::to_string_pretty(&collection)?;
    std::fs::write(path, body)?;
    println!("\nGeoJSON written to {}", path.display());
    Ok(())
}
