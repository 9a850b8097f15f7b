//! Likert travel-preference survey and traveler-type scoring.

mod blueprint;
mod scorer;
mod weights;

pub use scorer::{score, SurveyScore};
pub use weights::{CategoryWeights, TravelerCategory};

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

pub const MIN_RESPONSE: u8 = 1;
pub const MAX_RESPONSE: u8 = 5;

/// Validation and configuration errors raised while building or scoring a survey.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("response {value} for question {} is outside 1..=5", .index + 1)]
    ResponseOutOfRange { index: usize, value: u8 },
    #[error("expected {expected} responses, received {found}")]
    ResponseCount { expected: usize, found: usize },
    #[error("weight vector for '{category}' has {found} entries, expected {expected}")]
    WeightLengthMismatch {
        category: String,
        expected: usize,
        found: usize,
    },
    #[error("weight {index} for '{category}' is not a finite number")]
    NonFiniteWeight { category: String, index: usize },
    #[error("weight table defines no traveler categories")]
    NoCategories,
    #[error("traveler category '{0}' is defined more than once")]
    DuplicateCategory(String),
    #[error("traveler category names must not be blank")]
    BlankCategory,
    #[error("survey defines no questions")]
    NoQuestions,
}

/// Ordered Likert answers, one per question, each within `1..=5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct SurveyResponse(Vec<u8>);

impl SurveyResponse {
    pub fn new(values: Vec<u8>) -> Result<Self, SurveyError> {
        if let Some((index, value)) = values
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !(MIN_RESPONSE..=MAX_RESPONSE).contains(value))
        {
            return Err(SurveyError::ResponseOutOfRange { index, value });
        }

        Ok(Self(values))
    }

    pub fn values(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<u8>> for SurveyResponse {
    type Error = SurveyError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SurveyResponse> for Vec<u8> {
    fn from(value: SurveyResponse) -> Self {
        value.0
    }
}

/// Question set plus the weight table that classifies its answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSurveyDefinition", into = "RawSurveyDefinition")]
pub struct SurveyDefinition {
    questions: Vec<String>,
    weights: CategoryWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSurveyDefinition {
    questions: Vec<String>,
    weights: CategoryWeights,
}

impl SurveyDefinition {
    pub fn new(questions: Vec<String>, weights: CategoryWeights) -> Result<Self, SurveyError> {
        if questions.is_empty() {
            return Err(SurveyError::NoQuestions);
        }

        if let Some((category, vector)) = weights
            .iter()
            .find(|(_, vector)| vector.len() != questions.len())
        {
            return Err(SurveyError::WeightLengthMismatch {
                category: category.to_string(),
                expected: questions.len(),
                found: vector.len(),
            });
        }

        Ok(Self { questions, weights })
    }

    /// The seven-question Daejeon traveler survey.
    pub fn daejeon() -> Self {
        blueprint::daejeon_survey()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, serde_json::Error> {
        let file = std::fs::File::open(path).map_err(serde_json::Error::io)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    /// Validates raw answers against this question set.
    pub fn response(&self, values: Vec<u8>) -> Result<SurveyResponse, SurveyError> {
        let response = SurveyResponse::new(values)?;
        self.check_length(&response)?;
        Ok(response)
    }

    pub fn score(&self, response: &SurveyResponse) -> Result<SurveyScore, SurveyError> {
        self.check_length(response)?;
        score(response, &self.weights)
    }

    fn check_length(&self, response: &SurveyResponse) -> Result<(), SurveyError> {
        if response.len() != self.questions.len() {
            return Err(SurveyError::ResponseCount {
                expected: self.questions.len(),
                found: response.len(),
            });
        }
        Ok(())
    }
}

impl TryFrom<RawSurveyDefinition> for SurveyDefinition {
    type Error = SurveyError;

    fn try_from(value: RawSurveyDefinition) -> Result<Self, Self::Error> {
        Self::new(value.questions, value.weights)
    }
}

impl From<SurveyDefinition> for RawSurveyDefinition {
    fn from(value: SurveyDefinition) -> Self {
        Self {
            questions: value.questions,
            weights: value.weights,
        }
    }
}
