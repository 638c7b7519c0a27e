use crate::core::normalize::{language_rank, study_rank, MAX_LANGUAGE_RANK};
use crate::models::{Criterion, MatchReason, Mentee, Mentor, ScoringWeights};

/// Birth-year gap at which the age criterion saturates
const MAX_AGE_GAP_YEARS: f64 = 30.0;

/// Study-level gap at which the academic criterion saturates
const MAX_STUDY_GAP: f64 = 4.0;

/// Desired-gender value meaning "no preference"
const NO_GENDER_PREFERENCE: &str = "doesn't matter";

/// Per-criterion distances, each in [0, 1], 0 being a perfect fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionDistances {
    pub age: f64,
    pub gender: f64,
    pub language: f64,
    pub city: f64,
    pub study_level: f64,
    pub nationality: f64,
}

impl CriterionDistances {
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Age => self.age,
            Criterion::Gender => self.gender,
            Criterion::Language => self.language,
            Criterion::City => self.city,
            Criterion::StudyLevel => self.study_level,
            Criterion::Nationality => self.nationality,
        }
    }

    /// Weighted sum, in [0, weights.total()]
    pub fn weighted_sum(&self, weights: &ScoringWeights) -> f64 {
        CRITERIA
            .iter()
            .map(|c| weights.weight(*c) * self.get(*c))
            .sum()
    }
}

/// Fixed breakdown order
pub const CRITERIA: [Criterion; 6] = [
    Criterion::Age,
    Criterion::Gender,
    Criterion::Language,
    Criterion::City,
    Criterion::StudyLevel,
    Criterion::Nationality,
];

/// Scored pair before batch normalization
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub distances: CriterionDistances,
    pub distance: f64,
    pub reasons: Vec<MatchReason>,
}

/// Score one mentor/mentee pair.
///
/// Distance formula:
/// distance = (
///     age * 0.30 +           # birth-year gap / 30, capped
///     gender * 0.20 +        # desired gender mismatch
///     language * 0.50 +      # best of German/English rank gap / 6
///     city * 0.15 +          # different city
///     study_level * 0.15 +   # mentor below mentee, gap / 4, capped
///     nationality * 1.00     # different nationality
/// )
///
/// Never fails: unknown labels rank 0 and blank strings simply compare.
pub fn score_pair(mentor: &Mentor, mentee: &Mentee, weights: &ScoringWeights) -> PairScore {
    let distances = criterion_distances(mentor, mentee);
    let distance = distances.weighted_sum(weights);

    let reasons = CRITERIA
        .iter()
        .map(|&criterion| MatchReason {
            criterion,
            label: criterion.label().to_string(),
            weight: weights.weight(criterion),
            contribution: weights.weight(criterion) * distances.get(criterion),
            explanation: explain(criterion, mentor, mentee, &distances),
        })
        .collect();

    PairScore {
        distances,
        distance,
        reasons,
    }
}

pub fn criterion_distances(mentor: &Mentor, mentee: &Mentee) -> CriterionDistances {
    CriterionDistances {
        age: age_distance(mentor.birth_year, mentee.birth_year),
        gender: gender_distance(&mentor.gender, &mentee.desired_gender),
        language: language_distance(mentor, mentee),
        city: mismatch(&mentor.city, &mentee.city),
        study_level: study_distance(&mentor.level_of_studies, &mentee.level_of_studies),
        nationality: mismatch(&mentor.nationality, &mentee.nationality),
    }
}

#[inline]
fn age_distance(mentor_year: i32, mentee_year: i32) -> f64 {
    let gap = (mentor_year as f64 - mentee_year as f64).abs();
    (gap / MAX_AGE_GAP_YEARS).min(1.0)
}

#[inline]
fn has_gender_preference(desired: &str) -> bool {
    !desired
        .trim()
        .replace('\u{2019}', "'")
        .eq_ignore_ascii_case(NO_GENDER_PREFERENCE)
}

#[inline]
fn gender_distance(mentor_gender: &str, desired: &str) -> f64 {
    if !has_gender_preference(desired) {
        return 0.0;
    }
    mismatch(mentor_gender, desired)
}

/// The better-matching of the two languages wins
#[inline]
fn language_distance(mentor: &Mentor, mentee: &Mentee) -> f64 {
    let german = language_rank(&mentor.german_level).abs_diff(language_rank(&mentee.german_level));
    let english =
        language_rank(&mentor.english_level).abs_diff(language_rank(&mentee.english_level));

    (german.min(english) as f64 / MAX_LANGUAGE_RANK as f64).min(1.0)
}

/// Only mentors below the mentee's level are penalized
#[inline]
fn study_distance(mentor_level: &str, mentee_level: &str) -> f64 {
    let mentor_rank = study_rank(mentor_level);
    let mentee_rank = study_rank(mentee_level);

    if mentor_rank >= mentee_rank {
        return 0.0;
    }
    ((mentee_rank - mentor_rank) as f64 / MAX_STUDY_GAP).min(1.0)
}

#[inline]
fn mismatch(a: &str, b: &str) -> f64 {
    if a.to_lowercase() == b.to_lowercase() {
        0.0
    } else {
        1.0
    }
}

fn year_label(year: i32) -> String {
    if year == 0 {
        "unknown".to_string()
    } else {
        year.to_string()
    }
}

fn explain(
    criterion: Criterion,
    mentor: &Mentor,
    mentee: &Mentee,
    distances: &CriterionDistances,
) -> String {
    match criterion {
        Criterion::Age => format!(
            "Age difference: {} years ({} / {})",
            mentor.birth_year.abs_diff(mentee.birth_year),
            year_label(mentor.birth_year),
            year_label(mentee.birth_year)
        ),
        Criterion::Gender => {
            if distances.gender == 0.0 {
                "Preferred gender matched / no gender preference".to_string()
            } else {
                "Gender preference mismatch".to_string()
            }
        }
        Criterion::Language => format!(
            "Language levels - German: {}/{}, English: {}/{}",
            mentor.german_level, mentee.german_level, mentor.english_level, mentee.english_level
        ),
        Criterion::City => {
            if distances.city == 0.0 {
                format!("Same city: {}", mentor.city)
            } else {
                format!("Different cities: {} / {}", mentor.city, mentee.city)
            }
        }
        Criterion::StudyLevel => format!(
            "Study levels: {} | {}",
            mentor.level_of_studies, mentee.level_of_studies
        ),
        Criterion::Nationality => {
            if distances.nationality == 0.0 {
                format!("Same nationality: {}", mentor.nationality)
            } else {
                "Different nationalities".to_string()
            }
        }
    }
}
