use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{ExclusionCriterion, MatchStatus};

/// Request to open a review session from two survey exports
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "mentors_csv", rename = "mentorsCsv")]
    pub mentors_csv: String,
    #[validate(length(min = 1))]
    #[serde(alias = "mentees_csv", rename = "menteesCsv")]
    pub mentees_csv: String,
    #[serde(default)]
    pub criteria: Vec<ExclusionCriterion>,
}

/// Request to swap a session's exclusion criteria
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceCriteriaRequest {
    #[serde(default)]
    pub criteria: Vec<ExclusionCriterion>,
}

/// Approve / reject (or reset) one match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetStatusRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "mentor_id", rename = "mentorId")]
    pub mentor_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "mentee_id", rename = "menteeId")]
    pub mentee_id: String,
    pub status: MatchStatus,
}

/// Query string for the match list
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchesQuery {
    #[serde(rename = "mentorId")]
    pub mentor_id: Option<String>,
    #[serde(rename = "menteeId")]
    pub mentee_id: Option<String>,
    #[validate(range(min = 1, max = 10000))]
    pub limit: Option<usize>,
}

impl MatchesQuery {
    /// Whether the caller asked for a filtered top-N view
    pub fn is_filtered(&self) -> bool {
        self.mentor_id.is_some() || self.mentee_id.is_some() || self.limit.is_some()
    }
}
