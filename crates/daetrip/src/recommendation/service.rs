use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::plan::{MapView, RecommendationPlan};
use crate::catalog::{self, CatalogError, SiteAssignments, SiteCatalog};
use crate::completion::{
    survey_prompt, CategoryMatcher, ChatSession, CompletionError, TextCompletion,
};
use crate::itinerary::{self, Itinerary, ItineraryError, RoutingGraph};
use crate::survey::{SurveyDefinition, SurveyError, SurveyScore, TravelerCategory};

/// Survey outcome resolved into an itinerary and map framing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub traveler_type: TravelerCategory,
    pub scores: BTreeMap<String, f64>,
    pub itinerary: Itinerary,
    pub map: MapView,
}

/// What could be recovered from free text such as a model reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRecommendation {
    pub traveler_type: Option<TravelerCategory>,
    pub itinerary: Option<Itinerary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapView>,
}

/// Service composing the survey scorer, site lookup and itinerary builder over loaded data.
pub struct RecommendationService {
    survey: Arc<SurveyDefinition>,
    catalog: Arc<SiteCatalog>,
    plan: Arc<RecommendationPlan>,
    assignments: SiteAssignments,
    matcher: CategoryMatcher,
    roads: Option<Arc<dyn RoutingGraph>>,
}

impl RecommendationService {
    /// Checks that every traveler type has a profile and every profile site is in the catalog.
    pub fn new(
        survey: Arc<SurveyDefinition>,
        catalog: Arc<SiteCatalog>,
        plan: Arc<RecommendationPlan>,
        roads: Option<Arc<dyn RoutingGraph>>,
    ) -> Result<Self, RecommendationError> {
        if let Some(missing) = survey
            .weights()
            .categories()
            .find(|category| plan.profile(category.as_str()).is_none())
        {
            return Err(RecommendationError::MissingProfile(missing.to_string()));
        }

        let assignments = plan.assignments();
        assignments.validate(&catalog)?;
        let matcher = CategoryMatcher::new(survey.weights())?;

        info!(
            questions = survey.questions().len(),
            categories = survey.weights().len(),
            sites = catalog.len(),
            routing = roads.is_some(),
            "recommendation service ready"
        );

        Ok(Self {
            survey,
            catalog,
            plan,
            assignments,
            matcher,
            roads,
        })
    }

    /// Built-in Daejeon survey, catalog and plan without a road network.
    pub fn daejeon() -> Result<Self, RecommendationError> {
        Self::new(
            Arc::new(SurveyDefinition::daejeon()),
            Arc::new(SiteCatalog::daejeon()),
            Arc::new(RecommendationPlan::daejeon()),
            None,
        )
    }

    pub fn survey(&self) -> &SurveyDefinition {
        &self.survey
    }

    pub fn catalog(&self) -> &SiteCatalog {
        &self.catalog
    }

    pub fn plan(&self) -> &RecommendationPlan {
        &self.plan
    }

    pub fn has_routing(&self) -> bool {
        self.roads.is_some()
    }

    pub fn score(&self, responses: Vec<u8>) -> Result<SurveyScore, RecommendationError> {
        let responses = self.survey.response(responses)?;
        Ok(self.survey.score(&responses)?)
    }

    /// Scores the survey and resolves the winning traveler type into an itinerary.
    pub fn recommend(
        &self,
        responses: Vec<u8>,
        today: NaiveDate,
    ) -> Result<Recommendation, RecommendationError> {
        let SurveyScore { scores, winner } = self.score(responses)?;
        let sites = catalog::resolve(&winner, &self.assignments, &self.catalog)?;
        let itinerary = itinerary::build(sites, self.transport())?;
        let map = self.map_view(&winner, &itinerary, today)?;

        Ok(Recommendation {
            traveler_type: winner,
            scores,
            itinerary,
            map,
        })
    }

    /// Routes through user-selected sites in the given order.
    pub fn plan_route(&self, site_names: &[String]) -> Result<Itinerary, RecommendationError> {
        let sites = site_names
            .iter()
            .map(|name| self.catalog.require(name).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(itinerary::build(sites, self.transport())?)
    }

    /// Extracts the traveler type and mentioned sites from free text.
    ///
    /// Text that names no catalog site yields no itinerary rather than an error.
    pub fn recommend_from_text(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<TextRecommendation, RecommendationError> {
        let traveler_type = self.matcher.find(text);
        let sites = self.catalog.mentioned_in(text);
        debug!(
            traveler_type = ?traveler_type.as_ref().map(TravelerCategory::as_str),
            sites = sites.len(),
            "parsed recommendation text"
        );

        let itinerary = if sites.is_empty() {
            None
        } else {
            Some(itinerary::build(sites, self.transport())?)
        };

        let map = match (&traveler_type, &itinerary) {
            (Some(category), Some(itinerary)) => Some(self.map_view(category, itinerary, today)?),
            _ => None,
        };

        Ok(TextRecommendation {
            traveler_type,
            itinerary,
            map,
        })
    }

    /// Prompt sent to a completion backend for the given answers.
    pub fn prompt(&self, responses: Vec<u8>) -> Result<String, RecommendationError> {
        let responses = self.survey.response(responses)?;
        Ok(survey_prompt(&self.survey, &responses))
    }

    /// Asks `model` to analyse the answers and parses its reply into a recommendation.
    pub fn consult(
        &self,
        session: &mut ChatSession,
        model: &dyn TextCompletion,
        responses: Vec<u8>,
        today: NaiveDate,
    ) -> Result<TextRecommendation, RecommendationError> {
        let prompt = self.prompt(responses)?;
        let reply = session.ask(model, &prompt)?.message.clone();
        self.recommend_from_text(&reply, today)
    }

    fn transport(&self) -> Option<&dyn RoutingGraph> {
        self.roads.as_deref()
    }

    fn map_view(
        &self,
        category: &TravelerCategory,
        itinerary: &Itinerary,
        today: NaiveDate,
    ) -> Result<MapView, RecommendationError> {
        let profile = self
            .plan
            .profile(category.as_str())
            .ok_or_else(|| RecommendationError::MissingProfile(category.to_string()))?;
        Ok(MapView::new(itinerary.centroid(), profile, today))
    }
}

/// Error raised by the recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error(transparent)]
    Survey(#[from] SurveyError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Itinerary(#[from] ItineraryError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error("no recommendation profile is configured for traveler type '{0}'")]
    MissingProfile(String),
    #[error("traveler type labels do not form a valid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl RecommendationError {
    /// True when the caller's input, not the loaded configuration, caused the failure.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RecommendationError::Survey(
                SurveyError::ResponseOutOfRange { .. } | SurveyError::ResponseCount { .. }
            ) | RecommendationError::Catalog(CatalogError::UnknownSite(_))
                | RecommendationError::Itinerary(ItineraryError::EmptySelection)
        )
    }
}
