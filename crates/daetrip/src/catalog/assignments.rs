use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CatalogError, Site, SiteCatalog};
use crate::survey::TravelerCategory;

/// Ordered site names configured for each traveler type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteAssignments {
    lists: BTreeMap<String, Vec<String>>,
}

impl SiteAssignments {
    pub fn new<I, C, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<S>)>,
        C: Into<String>,
        S: Into<String>,
    {
        Self {
            lists: lists
                .into_iter()
                .map(|(category, sites)| {
                    (category.into(), sites.into_iter().map(Into::into).collect())
                })
                .collect(),
        }
    }

    pub fn sites_for(&self, category: &str) -> Option<&[String]> {
        self.lists.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    /// Fails on the first configured name the catalog does not contain.
    pub fn validate(&self, catalog: &SiteCatalog) -> Result<(), CatalogError> {
        for names in self.lists.values() {
            if let Some(missing) = names.iter().find(|name| !catalog.contains(name)) {
                return Err(CatalogError::UnknownSite(missing.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Looks up the configured site list for `category`, in configured order.
pub fn resolve(
    category: &TravelerCategory,
    assignments: &SiteAssignments,
    catalog: &SiteCatalog,
) -> Result<Vec<Site>, CatalogError> {
    let names = assignments
        .sites_for(category.as_str())
        .ok_or_else(|| CatalogError::UnknownCategory(category.to_string()))?;

    let sites = names
        .iter()
        .map(|name| catalog.require(name).cloned())
        .collect::<Result<Vec<_>, _>>()?;

    debug!(%category, sites = sites.len(), "resolved traveler type to sites");
    Ok(sites)
}
