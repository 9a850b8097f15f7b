//! Loads the survey, catalog, plan and optional road network named in [`DataConfig`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::catalog::{CatalogLoadError, SiteCatalog};
use crate::config::{DataConfig, RoadNetworkPaths};
use crate::itinerary::{RoadNetwork, RoadNetworkError, RoutingGraph};
use crate::recommendation::{RecommendationError, RecommendationPlan, RecommendationService};
use crate::survey::SurveyDefinition;

#[derive(Debug)]
pub enum DataLoadError {
    Survey {
        path: PathBuf,
        source: serde_json::Error,
    },
    Catalog {
        path: PathBuf,
        source: CatalogLoadError,
    },
    Plan {
        path: PathBuf,
        source: serde_json::Error,
    },
    RoadNetwork {
        paths: RoadNetworkPaths,
        source: RoadNetworkError,
    },
}

impl fmt::Display for DataLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLoadError::Survey { path, source } => {
                write!(f, "survey definition {}: {}", path.display(), source)
            }
            DataLoadError::Catalog { path, source } => {
                write!(f, "site catalog {}: {}", path.display(), source)
            }
            DataLoadError::Plan { path, source } => {
                write!(f, "recommendation plan {}: {}", path.display(), source)
            }
            DataLoadError::RoadNetwork { paths, source } => write!(
                f,
                "road network {} / {}: {}",
                paths.nodes_csv.display(),
                paths.edges_csv.display(),
                source
            ),
        }
    }
}

impl std::error::Error for DataLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataLoadError::Survey { source, .. } | DataLoadError::Plan { source, .. } => {
                Some(source)
            }
            DataLoadError::Catalog { source, .. } => Some(source),
            DataLoadError::RoadNetwork { source, .. } => Some(source),
        }
    }
}

/// Everything the recommendation service needs, loaded once at start-up.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub survey: Arc<SurveyDefinition>,
    pub catalog: Arc<SiteCatalog>,
    pub plan: Arc<RecommendationPlan>,
    pub roads: Option<Arc<RoadNetwork>>,
}

impl Dataset {
    pub fn daejeon() -> Self {
        Self {
            survey: Arc::new(SurveyDefinition::daejeon()),
            catalog: Arc::new(SiteCatalog::daejeon()),
            plan: Arc::new(RecommendationPlan::daejeon()),
            roads: None,
        }
    }

    /// Loads each configured source; unset sources use the built-in Daejeon data.
    pub fn load(config: &DataConfig) -> Result<Self, DataLoadError> {
        let survey = match &config.survey_json {
            Some(path) => SurveyDefinition::from_path(path).map_err(|source| {
                DataLoadError::Survey {
                    path: path.clone(),
                    source,
                }
            })?,
            None => SurveyDefinition::daejeon(),
        };

        let catalog = match &config.catalog_csv {
            Some(path) => SiteCatalog::from_path(path).map_err(|source| DataLoadError::Catalog {
                path: path.clone(),
                source,
            })?,
            None => SiteCatalog::daejeon(),
        };

        let plan = match &config.plan_json {
            Some(path) => {
                RecommendationPlan::from_path(path).map_err(|source| DataLoadError::Plan {
                    path: path.clone(),
                    source,
                })?
            }
            None => RecommendationPlan::daejeon(),
        };

        let roads = match &config.road_network {
            Some(paths) => Some(load_roads(paths)?),
            None => None,
        };

        info!(
            survey = source_label(config.survey_json.as_deref()),
            catalog = source_label(config.catalog_csv.as_deref()),
            plan = source_label(config.plan_json.as_deref()),
            road_nodes = roads.as_ref().map_or(0, |roads| roads.node_count()),
            "loaded recommendation data"
        );

        Ok(Self {
            survey: Arc::new(survey),
            catalog: Arc::new(catalog),
            plan: Arc::new(plan),
            roads: roads.map(Arc::new),
        })
    }

    pub fn into_service(self) -> Result<RecommendationService, RecommendationError> {
        let roads = self.roads.map(|roads| roads as Arc<dyn RoutingGraph>);
        RecommendationService::new(self.survey, self.catalog, self.plan, roads)
    }
}

fn load_roads(paths: &RoadNetworkPaths) -> Result<RoadNetwork, DataLoadError> {
    RoadNetwork::from_csv_paths(&paths.nodes_csv, &paths.edges_csv).map_err(|source| {
        DataLoadError::RoadNetwork {
            paths: paths.clone(),
            source,
        }
    })
}

fn source_label(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in".to_string())
}
