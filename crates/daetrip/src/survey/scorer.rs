use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::{CategoryWeights, SurveyError, SurveyResponse, TravelerCategory};

/// Per-category affinity scores and the winning traveler type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyScore {
    pub scores: BTreeMap<String, f64>,
    pub winner: TravelerCategory,
}

impl SurveyScore {
    pub fn winning_score(&self) -> f64 {
        self.scores
            .get(self.winner.as_str())
            .copied()
            .unwrap_or_default()
    }
}

/// Scores each category as the dot product of the answers and its weight vector.
///
/// Scores are rounded to one decimal, half away from zero (`0.25` becomes `0.3`).
/// The winner is the highest rounded score; equal scores go to the lexicographically
/// smallest category name.
pub fn score(
    responses: &SurveyResponse,
    weights: &CategoryWeights,
) -> Result<SurveyScore, SurveyError> {
    let mut scores = BTreeMap::new();
    let mut best: Option<(&str, f64)> = None;

    // Categories iterate in name order, so a strict comparison keeps the smallest name on ties.
    for (category, vector) in weights.iter() {
        if vector.len() != responses.len() {
            return Err(SurveyError::WeightLengthMismatch {
                category: category.to_string(),
                expected: responses.len(),
                found: vector.len(),
            });
        }

        let raw: f64 = responses
            .values()
            .iter()
            .zip(vector)
            .map(|(response, weight)| f64::from(*response) * weight)
            .sum();
        let rounded = round_one_decimal(raw);
        scores.insert(category.to_string(), rounded);

        match best {
            Some((_, best_score)) if rounded <= best_score => {}
            _ => best = Some((category, rounded)),
        }
    }

    let (winner, winning_score) = best.ok_or(SurveyError::NoCategories)?;
    debug!(%winner, winning_score, "scored traveler survey");

    Ok(SurveyScore {
        winner: TravelerCategory::new(winner),
        scores,
    })
}

/// Raw scores are snapped to millionths before rounding so that float error in the dot
/// product cannot push a decimal half (`-0.05`) to the wrong side.
const SNAP_UNITS: f64 = 1_000_000.0;
const UNITS_PER_TENTH: i64 = 100_000;

fn round_one_decimal(value: f64) -> f64 {
    let units = (value * SNAP_UNITS).round() as i64;
    let tenths = units.signum() * ((units.abs() + UNITS_PER_TENTH / 2) / UNITS_PER_TENTH);
    // Integer tenths never produce a signed zero.
    tenths as f64 / 10.0
}
