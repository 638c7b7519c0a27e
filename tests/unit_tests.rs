// Unit tests for Mentor Match

use mentor_match::core::{
    filters::passes_exclusion_criteria,
    normalize::{language_rank, study_rank},
    scoring::score_pair,
};
use mentor_match::models::{
    Condition, ExclusionCriterion, Mentee, Mentor, MentorAttribute, ScoringWeights,
};

fn reference_mentor() -> Mentor {
    Mentor {
        id: "M1".to_string(),
        birth_year: 1990,
        gender: "male".to_string(),
        german_level: "C1".to_string(),
        english_level: "B2".to_string(),
        nationality: "DE".to_string(),
        city: "Berlin".to_string(),
        level_of_studies: "Master".to_string(),
        ..Default::default()
    }
}

fn reference_mentee() -> Mentee {
    Mentee {
        id: "N1".to_string(),
        birth_year: 1998,
        desired_gender: "doesn't matter".to_string(),
        german_level: "B1".to_string(),
        english_level: "B2".to_string(),
        nationality: "DE".to_string(),
        city: "Berlin".to_string(),
        level_of_studies: "Bachelor".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_normalizers_are_total() {
    for label in ["", "   ", "??", "c3", "Native speaker"] {
        assert_eq!(language_rank(label), 0);
        assert_eq!(study_rank(label), 0);
    }
    assert_eq!(language_rank("Proficient"), 6);
    assert_eq!(study_rank("PostDoc"), 4);
}

#[test]
fn test_reference_scenario_distance() {
    let score = score_pair(&reference_mentor(), &reference_mentee(), &ScoringWeights::default());

    assert!((score.distance - 0.08).abs() < 1e-9, "distance was {}", score.distance);
    assert!((1.0 - score.distance - 0.92).abs() < 1e-9);
}

#[test]
fn test_distance_always_within_bounds() {
    let weights = ScoringWeights::default();
    let years = [0, 1950, 1975, 1990, 2005];
    let levels = ["", "A1", "B2", "C2", "native"];
    let studies = ["", "Bachelor", "Master", "Professor"];

    for &mentor_year in &years {
        for &mentee_year in &years {
            for (i, level) in levels.iter().enumerate() {
                for study in &studies {
                    let mentor = Mentor {
                        id: "M".to_string(),
                        birth_year: mentor_year,
                        german_level: level.to_string(),
                        english_level: levels[(i + 2) % levels.len()].to_string(),
                        level_of_studies: study.to_string(),
                        gender: "female".to_string(),
                        ..Default::default()
                    };
                    let mentee = Mentee {
                        id: "N".to_string(),
                        birth_year: mentee_year,
                        german_level: levels[(i + 1) % levels.len()].to_string(),
                        english_level: level.to_string(),
                        level_of_studies: studies[(i + 1) % studies.len()].to_string(),
                        desired_gender: "male".to_string(),
                        nationality: "PL".to_string(),
                        ..Default::default()
                    };

                    let score = score_pair(&mentor, &mentee, &weights);
                    assert!(score.distance >= 0.0 && score.distance <= 2.45 + 1e-9);
                    let weighted = score.distances.weighted_sum(&weights);
                    assert!((weighted - score.distance).abs() < 1e-12);
                    let contributions: f64 = score.reasons.iter().map(|r| r.contribution).sum();
                    assert!((contributions - score.distance).abs() < 1e-9);
                }
            }
        }
    }
}

#[test]
fn test_mentor_id_rule_excludes_only_named_mentor() {
    let criteria = vec![ExclusionCriterion::new(
        "N1",
        MentorAttribute::MentorId,
        Condition::NotEquals,
        "M1",
    )
    .unwrap()];
    let mut other = reference_mentor();
    other.id = "M2".to_string();

    assert!(!passes_exclusion_criteria(&reference_mentor(), &reference_mentee(), &criteria));
    assert!(passes_exclusion_criteria(&other, &reference_mentee(), &criteria));
}

#[test]
fn test_numeric_rule_on_text_attribute_fails_closed() {
    for condition in [Condition::AtLeast, Condition::AtMost] {
        let criteria = vec![
            ExclusionCriterion::new("N1", MentorAttribute::Nationality, condition, "5").unwrap(),
        ];
        assert!(!passes_exclusion_criteria(&reference_mentor(), &reference_mentee(), &criteria));
    }
}

#[test]
fn test_criterion_built_from_form_names() {
    let criterion = ExclusionCriterion::parse("N1", "Level ofStudies", "equals", "master").unwrap();
    assert_eq!(criterion.attribute, MentorAttribute::LevelOfStudies);
    assert!(passes_exclusion_criteria(&reference_mentor(), &reference_mentee(), &[criterion]));

    assert!(ExclusionCriterion::parse("N1", "favouriteColour", "equals", "red").is_err());
    assert!(ExclusionCriterion::parse("N1", "city", "greater_than", "1").is_err());
}
