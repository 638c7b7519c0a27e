// Model exports
pub mod criteria;
pub mod domain;
pub mod requests;
pub mod responses;

pub use criteria::{Condition, CriterionError, ExclusionCriterion, MentorAttribute};
pub use domain::{Criterion, Match, MatchReason, MatchStatus, Mentee, Mentor, ScoringWeights};
pub use requests::{CreateSessionRequest, MatchesQuery, ReplaceCriteriaRequest, SetStatusRequest};
pub use responses::{
    AssignmentResponse, ErrorResponse, HealthResponse, MatchesResponse, SessionResponse,
};
