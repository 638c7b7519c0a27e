//! Mentor Match - pairing service for mentoring programmes
//!
//! This library provides the matching engine: pairwise compatibility scoring
//! between mentors and mentees, rule-based exclusions, batch normalization and
//! a globally optimal one-to-one assignment that stays fixed while a reviewer
//! approves or rejects the recommended pairs.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{score_pair, solve, CostMatrix, Matcher, MatchingSession};
pub use crate::models::{ExclusionCriterion, Match, MatchStatus, Mentee, Mentor, ScoringWeights};
