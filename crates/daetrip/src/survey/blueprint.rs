use super::{CategoryWeights, SurveyDefinition};

const DAEJEON_QUESTIONS: [&str; 7] = [
    "I prefer travel experiences that incorporate technology and efficiency.",
    "I enjoy participating in local events and engaging with the community when traveling.",
    "I seek practical and convenient leisure activities during my travels.",
    "I am open to trying new and adventurous activities during my trips.",
    "I prioritize comfort and relaxation over exploring new places.",
    "I value cultural immersion and learning about local traditions.",
    "I am willing to splurge on high-end accommodations and dining experiences.",
];

pub(super) fn daejeon_survey() -> SurveyDefinition {
    let weights = CategoryWeights {
        vectors: [
            (
                "Tech-savvy".to_string(),
                vec![0.20, -0.10, -0.05, 0.15, -0.10, -0.05, 0.15],
            ),
            (
                "Community-focused".to_string(),
                vec![-0.10, 0.20, -0.05, 0.05, -0.05, 0.20, 0.05],
            ),
            (
                "Practical Leisure Seeker".to_string(),
                vec![-0.05, -0.05, 0.20, -0.10, 0.20, -0.05, 0.15],
            ),
        ]
        .into_iter()
        .collect(),
        question_count: DAEJEON_QUESTIONS.len(),
    };

    SurveyDefinition {
        questions: DAEJEON_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        weights,
    }
}
