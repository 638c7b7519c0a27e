use serde::{Deserialize, Serialize};

/// Mentor record as loaded from the mentor survey export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mentor {
    pub id: String,
    #[serde(rename = "levelOfStudies", default)]
    pub level_of_studies: String,
    /// Zero when the source value could not be parsed
    #[serde(rename = "birthYear", default)]
    pub birth_year: i32,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub city: String,
    #[serde(rename = "germanLevel", default)]
    pub german_level: String,
    #[serde(rename = "englishLevel", default)]
    pub english_level: String,
    #[serde(rename = "otherLanguages", default)]
    pub other_languages: String,
}

/// Mentee record as loaded from the mentee survey export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mentee {
    pub id: String,
    /// Zero when the source value could not be parsed
    #[serde(rename = "birthYear", default)]
    pub birth_year: i32,
    #[serde(rename = "desiredGender", default)]
    pub desired_gender: String,
    #[serde(rename = "englishLevel", default)]
    pub english_level: String,
    #[serde(rename = "otherLanguages", default)]
    pub other_languages: String,
    #[serde(default)]
    pub gender: String,
    #[serde(rename = "germanLevel", default)]
    pub german_level: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(rename = "levelOfStudies", default)]
    pub level_of_studies: String,
    #[serde(default)]
    pub city: String,
}

/// Review status of a candidate match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// The individual factors that make up a pairwise distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    Age,
    Gender,
    Language,
    City,
    StudyLevel,
    Nationality,
}

impl Criterion {
    /// Label shown next to the score breakdown
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::Age => "Age Difference",
            Criterion::Gender => "Gender Preference",
            Criterion::Language => "Language Compatibility",
            Criterion::City => "Location",
            Criterion::StudyLevel => "Academic Level",
            Criterion::Nationality => "Nationality",
        }
    }
}

/// One line of the score breakdown for a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReason {
    pub criterion: Criterion,
    /// Display name of the criterion, e.g. "Age Difference"
    pub label: String,
    pub weight: f64,
    /// `weight * criterion distance`
    pub contribution: f64,
    pub explanation: String,
}

/// Scored mentor/mentee candidate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    #[serde(rename = "menteeId")]
    pub mentee_id: String,
    /// `1 - distance`
    pub score: f64,
    /// Weighted sum of the criterion distances, lower is better
    pub distance: f64,
    /// Distance min-max normalized across the batch and inverted, 1.0 is best
    #[serde(rename = "normalizedScore")]
    pub normalized_score: f64,
    pub reasons: Vec<MatchReason>,
    pub status: MatchStatus,
}

impl Match {
    pub fn is_pair(&self, mentor_id: &str, mentee_id: &str) -> bool {
        self.mentor_id == mentor_id && self.mentee_id == mentee_id
    }
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub age: f64,
    pub gender: f64,
    pub language: f64,
    pub city: f64,
    pub study_level: f64,
    pub nationality: f64,
}

impl ScoringWeights {
    /// Upper bound of a pairwise distance under these weights
    pub fn total(&self) -> f64 {
        self.age + self.gender + self.language + self.city + self.study_level + self.nationality
    }

    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Age => self.age,
            Criterion::Gender => self.gender,
            Criterion::Language => self.language,
            Criterion::City => self.city,
            Criterion::StudyLevel => self.study_level,
            Criterion::Nationality => self.nationality,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            age: 0.30,
            gender: 0.20,
            language: 0.50,
            city: 0.15,
            study_level: 0.15,
            nationality: 1.00,
        }
    }
}
