use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::SurveyError;

/// Traveler-type label drawn from the closed set configured in [`CategoryWeights`].
///
/// Values are only handed out by the weight table itself (scoring or label lookup),
/// so every `TravelerCategory` in circulation names a configured category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TravelerCategory(String);

impl TravelerCategory {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TravelerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-category weight vectors, one weight per survey question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<f64>>", into = "BTreeMap<String, Vec<f64>>")]
pub struct CategoryWeights {
    pub(super) vectors: BTreeMap<String, Vec<f64>>,
    pub(super) question_count: usize,
}

impl CategoryWeights {
    /// Validates that at least one category exists, that every vector has the same
    /// length, and that every weight is finite.
    pub fn new<I, S>(vectors: I) -> Result<Self, SurveyError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (name, weights) in vectors {
            let name = name.into();
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(SurveyError::BlankCategory);
            }
            if table.insert(trimmed.to_string(), weights).is_some() {
                return Err(SurveyError::DuplicateCategory(trimmed.to_string()));
            }
        }

        let mut entries = table.iter();
        let Some((_, first)) = entries.next() else {
            return Err(SurveyError::NoCategories);
        };
        let question_count = first.len();

        for (category, weights) in &table {
            if weights.len() != question_count {
                return Err(SurveyError::WeightLengthMismatch {
                    category: category.clone(),
                    expected: question_count,
                    found: weights.len(),
                });
            }
            if let Some(index) = weights.iter().position(|weight| !weight.is_finite()) {
                return Err(SurveyError::NonFiniteWeight {
                    category: category.clone(),
                    index,
                });
            }
        }

        Ok(Self {
            vectors: table,
            question_count,
        })
    }

    /// Number of questions each vector covers.
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Categories in lexicographic order.
    pub fn categories(&self) -> impl Iterator<Item = TravelerCategory> + '_ {
        self.vectors.keys().map(TravelerCategory::new)
    }

    /// Looks a label up in the configured set. Matching is exact.
    pub fn category(&self, label: &str) -> Option<TravelerCategory> {
        self.vectors
            .get_key_value(label)
            .map(|(name, _)| TravelerCategory::new(name.as_str()))
    }

    pub fn vector(&self, category: &TravelerCategory) -> Option<&[f64]> {
        self.vectors.get(category.as_str()).map(Vec::as_slice)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.vectors
            .iter()
            .map(|(name, weights)| (name.as_str(), weights.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Vec<f64>>> for CategoryWeights {
    type Error = SurveyError;

    fn try_from(value: BTreeMap<String, Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryWeights> for BTreeMap<String, Vec<f64>> {
    fn from(value: CategoryWeights) -> Self {
        value.vectors
    }
}
