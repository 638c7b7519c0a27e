use crate::models::{Condition, ExclusionCriterion, Mentee, Mentor, MentorAttribute};

/// Lower-cased mentor value an exclusion criterion compares against
pub fn mentor_value(mentor: &Mentor, attribute: MentorAttribute) -> String {
    let value = match attribute {
        MentorAttribute::MentorId => return mentor.id.to_lowercase(),
        MentorAttribute::Gender => &mentor.gender,
        MentorAttribute::Nationality => &mentor.nationality,
        MentorAttribute::City => &mentor.city,
        MentorAttribute::LevelOfStudies => &mentor.level_of_studies,
        MentorAttribute::GermanLevel => &mentor.german_level,
        MentorAttribute::EnglishLevel => &mentor.english_level,
        MentorAttribute::BirthYear => return mentor.birth_year.to_string(),
    };
    value.to_lowercase()
}

/// Parse as a number. Blank input reads as 0; non-numeric text becomes NaN
/// so that every ordered comparison against it is false.
#[inline]
fn numeric(value: &str) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        return 0.0;
    }
    value.parse::<f64>().unwrap_or(f64::NAN)
}

/// Whether the mentor satisfies one criterion
#[inline]
pub fn criterion_holds(mentor: &Mentor, criterion: &ExclusionCriterion) -> bool {
    let actual = mentor_value(mentor, criterion.attribute);
    let expected = criterion.value.to_lowercase();

    match criterion.condition {
        Condition::Equals => actual == expected,
        Condition::NotEquals => actual != expected,
        Condition::AtLeast => numeric(&actual) >= numeric(&expected),
        Condition::AtMost => numeric(&actual) <= numeric(&expected),
    }
}

/// Check whether a mentor/mentee pair may be scored at all.
///
/// Every criterion scoped to this mentee is a required condition on the
/// mentor; the first one that does not hold excludes the pair. Pairs whose
/// mentee has no criteria always pass.
#[inline]
pub fn passes_exclusion_criteria(
    mentor: &Mentor,
    mentee: &Mentee,
    criteria: &[ExclusionCriterion],
) -> bool {
    criteria
        .iter()
        .filter(|criterion| criterion.mentee_id == mentee.id)
        .all(|criterion| criterion_holds(mentor, criterion))
}
