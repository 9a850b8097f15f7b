use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::SiteAssignments;
use crate::geo::Coordinate;

pub const DEFAULT_RADIUS_M: u32 = 4_000;

fn default_radius() -> u32 {
    DEFAULT_RADIUS_M
}

/// Sites and map presentation configured for one traveler type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub sites: Vec<String>,
    pub map_style: String,
    #[serde(default = "default_radius")]
    pub radius_m: u32,
}

impl CategoryProfile {
    fn new(sites: &[&str], map_style: &str) -> Self {
        Self {
            sites: sites.iter().map(|site| site.to_string()).collect(),
            map_style: map_style.to_string(),
            radius_m: DEFAULT_RADIUS_M,
        }
    }
}

/// Traveler type name to its [`CategoryProfile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationPlan {
    profiles: BTreeMap<String, CategoryProfile>,
}

impl RecommendationPlan {
    pub fn new(profiles: BTreeMap<String, CategoryProfile>) -> Self {
        Self { profiles }
    }

    /// Site lists and map styles for the three Daejeon traveler types.
    pub fn daejeon() -> Self {
        let profiles = [
            (
                "Tech-savvy",
                CategoryProfile::new(
                    &["National Science Museum", "Daejeon Expo Park", "Daejeon O-World"],
                    "Citrus",
                ),
            ),
            (
                "Community-focused",
                CategoryProfile::new(
                    &["Ppuri Park", "Daejeon Museum of Art", "Hanbat Arboretum"],
                    "Flannel",
                ),
            ),
            (
                "Practical Leisure Seeker",
                CategoryProfile::new(
                    &["Yuseong Hot Springs", "Gyejoksan Mountain", "Hanbat Arboretum"],
                    "Peach",
                ),
            ),
        ]
        .into_iter()
        .map(|(name, profile)| (name.to_string(), profile))
        .collect();

        Self { profiles }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, serde_json::Error> {
        let file = std::fs::File::open(path).map_err(serde_json::Error::io)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn profile(&self, category: &str) -> Option<&CategoryProfile> {
        self.profiles.get(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Per-category site lists, in the shape the catalog lookup consumes.
    pub fn assignments(&self) -> SiteAssignments {
        SiteAssignments::new(
            self.profiles
                .iter()
                .map(|(category, profile)| (category.as_str(), profile.sites.clone())),
        )
    }
}

/// Map framing handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub radius_m: u32,
    pub style: String,
    pub title: String,
}

impl MapView {
    pub fn new(center: Coordinate, profile: &CategoryProfile, today: NaiveDate) -> Self {
        Self {
            center,
            radius_m: profile.radius_m,
            style: profile.map_style.clone(),
            title: format!("DaeTRIP for Daejeon, South Korea, {}", today.format("%Y-%m-%d")),
        }
    }
}
