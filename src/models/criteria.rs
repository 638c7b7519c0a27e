use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building an exclusion criterion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriterionError {
    #[error("unknown mentor attribute: {0}")]
    UnknownAttribute(String),

    #[error("unknown condition: {0}")]
    UnknownCondition(String),

    #[error("criterion field must not be empty: {0}")]
    EmptyField(&'static str),
}

/// Mentor fields an exclusion criterion can inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum MentorAttribute {
    MentorId,
    Gender,
    Nationality,
    City,
    LevelOfStudies,
    GermanLevel,
    EnglishLevel,
    BirthYear,
}

impl MentorAttribute {
    pub const ALL: [MentorAttribute; 8] = [
        MentorAttribute::MentorId,
        MentorAttribute::Gender,
        MentorAttribute::Nationality,
        MentorAttribute::City,
        MentorAttribute::LevelOfStudies,
        MentorAttribute::GermanLevel,
        MentorAttribute::EnglishLevel,
        MentorAttribute::BirthYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MentorAttribute::MentorId => "mentorId",
            MentorAttribute::Gender => "gender",
            MentorAttribute::Nationality => "nationality",
            MentorAttribute::City => "city",
            MentorAttribute::LevelOfStudies => "levelOfStudies",
            MentorAttribute::GermanLevel => "germanLevel",
            MentorAttribute::EnglishLevel => "englishLevel",
            MentorAttribute::BirthYear => "birthYear",
        }
    }
}

impl fmt::Display for MentorAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the camelCase field name as well as the labels the criteria form
/// shows ("MentorId", "Level ofStudies", "Birth year"): case, spaces and
/// underscores are ignored.
impl FromStr for MentorAttribute {
    type Err = CriterionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        MentorAttribute::ALL
            .into_iter()
            .find(|attribute| attribute.as_str().to_lowercase() == key)
            .ok_or_else(|| CriterionError::UnknownAttribute(s.to_string()))
    }
}

impl TryFrom<String> for MentorAttribute {
    type Error = CriterionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How the mentor value is compared against the criterion value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Condition {
    Equals,
    NotEquals,
    AtLeast,
    AtMost,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Equals => "equals",
            Condition::NotEquals => "not_equals",
            Condition::AtLeast => "at_least",
            Condition::AtMost => "at_most",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = CriterionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "equals" => Ok(Condition::Equals),
            "not_equals" => Ok(Condition::NotEquals),
            "at_least" => Ok(Condition::AtLeast),
            "at_most" => Ok(Condition::AtMost),
            _ => Err(CriterionError::UnknownCondition(s.to_string())),
        }
    }
}

impl TryFrom<String> for Condition {
    type Error = CriterionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A required condition on a mentor attribute, scoped to one mentee.
///
/// A pair is only scored when every criterion for its mentee holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCriterion")]
pub struct ExclusionCriterion {
    #[serde(rename = "menteeId")]
    pub mentee_id: String,
    pub attribute: MentorAttribute,
    pub condition: Condition,
    pub value: String,
}

impl ExclusionCriterion {
    pub fn new(
        mentee_id: impl Into<String>,
        attribute: MentorAttribute,
        condition: Condition,
        value: impl Into<String>,
    ) -> Result<Self, CriterionError> {
        let mentee_id = mentee_id.into();
        let value = value.into();

        if mentee_id.trim().is_empty() {
            return Err(CriterionError::EmptyField("menteeId"));
        }
        if value.trim().is_empty() {
            return Err(CriterionError::EmptyField("value"));
        }

        Ok(Self {
            mentee_id,
            attribute,
            condition,
            value,
        })
    }

    /// Build a criterion from the untyped names a form submits
    pub fn parse(
        mentee_id: &str,
        attribute: &str,
        condition: &str,
        value: &str,
    ) -> Result<Self, CriterionError> {
        Self::new(mentee_id, attribute.parse()?, condition.parse()?, value)
    }
}

#[derive(Deserialize)]
struct RawCriterion {
    #[serde(rename = "menteeId")]
    mentee_id: String,
    attribute: MentorAttribute,
    condition: Condition,
    value: String,
}

impl TryFrom<RawCriterion> for ExclusionCriterion {
    type Error = CriterionError;

    fn try_from(raw: RawCriterion) -> Result<Self, Self::Error> {
        ExclusionCriterion::new(raw.mentee_id, raw.attribute, raw.condition, raw.value)
    }
}
