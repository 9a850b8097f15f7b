//! Static site catalog and the lookups that turn traveler types or free text into sites.

mod assignments;
mod blueprint;
mod mentions;
mod parser;

pub use assignments::{resolve, SiteAssignments};
pub use mentions::extract_mentions;

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Lookup and validation failures for sites and per-category site lists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("no site list is configured for traveler type '{0}'")]
    UnknownCategory(String),
    #[error("site '{0}' is not in the catalog")]
    UnknownSite(String),
    #[error("site '{0}' appears more than once in the catalog")]
    DuplicateSite(String),
    #[error("catalog rows must name their site")]
    BlankSiteName,
    #[error("site '{name}' has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinate { name: String, lat: f64, lon: f64 },
}

#[derive(Debug)]
pub enum CatalogLoadError {
    Io(std::io::Error),
    Csv(csv::Error),
    Catalog(CatalogError),
}

impl std::fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogLoadError::Io(err) => write!(f, "failed to read site catalog: {}", err),
            CatalogLoadError::Csv(err) => write!(f, "invalid site catalog CSV data: {}", err),
            CatalogLoadError::Catalog(err) => write!(f, "site catalog rejected: {}", err),
        }
    }
}

impl std::error::Error for CatalogLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogLoadError::Io(err) => Some(err),
            CatalogLoadError::Csv(err) => Some(err),
            CatalogLoadError::Catalog(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogLoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogLoadError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<CatalogError> for CatalogLoadError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

/// Named location with coordinates and optional visitor-facing details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl Site {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            description: None,
            rating: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Read-only catalog keyed by unique site name, kept in load order.
#[derive(Debug, Clone, Default)]
pub struct SiteCatalog {
    sites: Vec<Site>,
    index: HashMap<String, usize>,
}

impl SiteCatalog {
    pub fn new(sites: Vec<Site>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(sites.len());

        for (position, site) in sites.iter().enumerate() {
            if site.name.trim().is_empty() {
                return Err(CatalogError::BlankSiteName);
            }
            if !site.coordinate().is_valid() {
                return Err(CatalogError::InvalidCoordinate {
                    name: site.name.clone(),
                    lat: site.lat,
                    lon: site.lon,
                });
            }
            if index.insert(site.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateSite(site.name.clone()));
            }
        }

        Ok(Self { sites, index })
    }

    /// The eight Daejeon landmarks used by the traveler-type recommendations.
    pub fn daejeon() -> Self {
        let sites = blueprint::daejeon_sites();
        let index = sites
            .iter()
            .enumerate()
            .map(|(position, site)| (site.name.clone(), position))
            .collect();
        Self { sites, index }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogLoadError> {
        let sites = parser::parse_sites(reader)?;
        let catalog = Self::new(sites)?;
        debug!(sites = catalog.len(), "loaded site catalog");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&Site> {
        self.index.get(name).map(|position| &self.sites[*position])
    }

    pub fn require(&self, name: &str) -> Result<&Site, CatalogError> {
        self.get(name)
            .ok_or_else(|| CatalogError::UnknownSite(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sites.iter().map(|site| site.name.as_str())
    }

    /// Sites whose names appear verbatim in `text`, in order of first mention.
    pub fn mentioned_in(&self, text: &str) -> Vec<Site> {
        extract_mentions(text, self.names())
            .iter()
            .filter_map(|name| self.get(name).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
