// Core algorithm exports
pub mod assignment;
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod scoring;
pub mod session;

pub use assignment::{solve, AssignmentError, CostMatrix, Solution};
pub use filters::{criterion_holds, passes_exclusion_criteria};
pub use matcher::{
    normalize_scores, top_matches, MatchFilter, MatchResult, Matcher, DEFAULT_TOP_MATCHES,
};
pub use normalize::{language_rank, study_rank};
pub use scoring::{score_pair, CriterionDistances, PairScore};
pub use session::{Assignment, AssignmentState, MatchingSession, SessionError, SessionSummary};
