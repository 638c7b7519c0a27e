use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{Assignment, SessionSummary};
use crate::models::domain::Match;

/// Response for session create / lookup endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
    pub summary: SessionSummary,
}

/// Response for the match list endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
    pub total_results: usize,
}

/// Optimal pairing plus the review state layered over it
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResponse {
    /// mentorId -> menteeId, fixed for the session
    pub assignment: Assignment,
    /// Recommended pairs still awaiting review
    pub pending: Vec<Match>,
    pub approved: Vec<Match>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub sessions: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
