//! Survey-to-itinerary recommendation flow and its HTTP surface.

pub mod plan;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use plan::{CategoryProfile, MapView, RecommendationPlan, DEFAULT_RADIUS_M};
pub use router::recommendation_router;
pub use service::{
    Recommendation, RecommendationError, RecommendationService, TextRecommendation,
};
