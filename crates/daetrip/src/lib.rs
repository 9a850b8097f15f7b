pub mod catalog;
pub mod completion;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod itinerary;
pub mod recommendation;
pub mod render;
pub mod survey;
pub mod telemetry;

pub use catalog::{Site, SiteCatalog};
pub use geo::Coordinate;
pub use itinerary::{Itinerary, RoutingGraph};
pub use recommendation::{RecommendationPlan, RecommendationService};
pub use survey::{SurveyDefinition, SurveyResponse, TravelerCategory};
