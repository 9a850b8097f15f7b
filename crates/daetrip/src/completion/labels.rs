use regex::Regex;

use crate::survey::{CategoryWeights, TravelerCategory};

/// Finds configured traveler-type labels in free text such as a model reply.
#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    pattern: Regex,
    weights: CategoryWeights,
}

impl CategoryMatcher {
    pub fn new(weights: &CategoryWeights) -> Result<Self, regex::Error> {
        let mut labels: Vec<TravelerCategory> = weights.categories().collect();
        // Longest first so the alternation prefers "Tech-savvy Explorer" over "Tech-savvy".
        labels.sort_by(|left, right| {
            right
                .as_str()
                .len()
                .cmp(&left.as_str().len())
                .then_with(|| left.cmp(right))
        });

        let alternation = labels
            .iter()
            .map(|label| regex::escape(label.as_str()))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            pattern: Regex::new(&alternation)?,
            weights: weights.clone(),
        })
    }

    /// First configured label mentioned in `text`. Matching is exact and case-sensitive.
    pub fn find(&self, text: &str) -> Option<TravelerCategory> {
        self.pattern
            .find(text)
            .and_then(|found| self.weights.category(found.as_str()))
    }
}
