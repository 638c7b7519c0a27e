use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::core::assignment::{solve, CostMatrix};
use crate::core::matcher::{MatchResult, Matcher};
use crate::models::{ExclusionCriterion, Match, MatchStatus, Mentee, Mentor, ScoringWeights};

/// Cost of a mentor/mentee cell with no match (pair excluded by a criterion)
const UNMATCHED_COST: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no match for mentor {mentor_id} and mentee {mentee_id}")]
    MatchNotFound { mentor_id: String, mentee_id: String },

    #[error("{0} is already part of an approved pair")]
    AlreadyPaired(String),
}

/// Globally optimal mentor -> mentee pairing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Assignment {
    pairs: BTreeMap<String, String>,
}

impl Assignment {
    pub fn mentee_for(&self, mentor_id: &str) -> Option<&str> {
        self.pairs.get(mentor_id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(m, n)| (m.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// The optimal pairing is solved once, on first request, and then held for
/// the rest of the review. Approvals are applied by filtering that pairing,
/// never by solving again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentState {
    Uninitialized,
    Solved,
}

/// Counts shown alongside a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    #[serde(rename = "mentorCount")]
    pub mentor_count: usize,
    #[serde(rename = "menteeCount")]
    pub mentee_count: usize,
    #[serde(rename = "matchCount")]
    pub match_count: usize,
    #[serde(rename = "excludedCount")]
    pub excluded_count: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending: usize,
    pub solved: bool,
}

/// Review session over one uploaded dataset.
///
/// Owns the scored match set, the once-computed optimal assignment and the
/// review statuses. Statuses only change through [`MatchingSession::set_status`].
#[derive(Debug, Clone)]
pub struct MatchingSession {
    mentors: Vec<Mentor>,
    mentees: Vec<Mentee>,
    criteria: Vec<ExclusionCriterion>,
    matcher: Matcher,
    matches: Vec<Match>,
    index: HashMap<(String, String), usize>,
    excluded: usize,
    /// `None` until first solved
    assignment: Option<Assignment>,
}

/// Keep the first participant for each id; later duplicates are dropped
fn dedup_by_id<T>(items: Vec<T>, kind: &str, id: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let first = seen.insert(id(item).to_string());
            if !first {
                tracing::warn!("Dropping duplicate {} id {}", kind, id(item));
            }
            first
        })
        .collect()
}

impl MatchingSession {
    pub fn new(
        mentors: Vec<Mentor>,
        mentees: Vec<Mentee>,
        criteria: Vec<ExclusionCriterion>,
        weights: ScoringWeights,
    ) -> Self {
        let mut session = Self {
            mentors: dedup_by_id(mentors, "mentor", |m| m.id.as_str()),
            mentees: dedup_by_id(mentees, "mentee", |m| m.id.as_str()),
            criteria,
            matcher: Matcher::new(weights),
            matches: Vec::new(),
            index: HashMap::new(),
            excluded: 0,
            assignment: None,
        };
        session.rebuild();
        session
    }

    fn rebuild(&mut self) {
        let MatchResult {
            matches, excluded, ..
        } = self
            .matcher
            .build_matches(&self.mentors, &self.mentees, &self.criteria);

        self.index = matches
            .iter()
            .enumerate()
            .map(|(i, m)| ((m.mentor_id.clone(), m.mentee_id.clone()), i))
            .collect();
        self.matches = matches;
        self.excluded = excluded;
        self.assignment = None;
    }

    /// Swap the exclusion criteria. The match set is rebuilt from scratch,
    /// every status returns to pending and the assignment must be solved again.
    pub fn replace_criteria(&mut self, criteria: Vec<ExclusionCriterion>) {
        self.criteria = criteria;
        self.rebuild();
        tracing::info!(
            "Criteria replaced ({} rules), {} matches rebuilt",
            self.criteria.len(),
            self.matches.len()
        );
    }

    pub fn mentors(&self) -> &[Mentor] {
        &self.mentors
    }

    pub fn mentees(&self) -> &[Mentee] {
        &self.mentees
    }

    pub fn criteria(&self) -> &[ExclusionCriterion] {
        &self.criteria
    }

    /// All scored matches, best normalized score first
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn find_match(&self, mentor_id: &str, mentee_id: &str) -> Option<&Match> {
        self.index
            .get(&(mentor_id.to_string(), mentee_id.to_string()))
            .map(|&i| &self.matches[i])
    }

    pub fn state(&self) -> AssignmentState {
        if self.assignment.is_some() {
            AssignmentState::Solved
        } else {
            AssignmentState::Uninitialized
        }
    }

    /// The optimal assignment, solved against the complete mentor and mentee
    /// sets on the first call and returned unchanged afterwards.
    pub fn assignment(&mut self) -> &Assignment {
        let assignment = match self.assignment.take() {
            Some(assignment) => assignment,
            None => {
                let assignment = self.solve_assignment();
                tracing::info!(
                    "Optimal assignment solved: {} pairs for {} mentors / {} mentees",
                    assignment.len(),
                    self.mentors.len(),
                    self.mentees.len()
                );
                assignment
            }
        };

        self.assignment.insert(assignment)
    }

    /// Cell (i, j) is `1 - normalizedScore` of the (mentor i, mentee j) match,
    /// or 1 when the pair was excluded.
    pub fn cost_matrix(&self) -> CostMatrix {
        CostMatrix::from_fn(
            self.mentors.len(),
            self.mentees.len(),
            UNMATCHED_COST,
            |i, j| {
                self.find_match(&self.mentors[i].id, &self.mentees[j].id)
                    .map(|m| 1.0 - m.normalized_score)
                    .unwrap_or(UNMATCHED_COST)
            },
        )
    }

    fn solve_assignment(&self) -> Assignment {
        let solution = solve(&self.cost_matrix());
        let pairs = solution
            .pairs()
            .map(|(i, j)| (self.mentors[i].id.clone(), self.mentees[j].id.clone()))
            .collect();

        Assignment { pairs }
    }

    /// Ids of every participant in an approved pair
    pub fn approved_ids(&self) -> HashSet<&str> {
        self.approved_pairs()
            .flat_map(|m| [m.mentor_id.as_str(), m.mentee_id.as_str()])
            .collect()
    }

    pub fn approved_pairs(&self) -> impl Iterator<Item = &Match> {
        self.matches
            .iter()
            .filter(|m| m.status == MatchStatus::Approved)
    }

    /// The recommended pairs still awaiting review.
    ///
    /// Starts from the fixed optimal assignment and drops pairs where either
    /// side is already approved, pairs that were rejected, and pairs that
    /// have no match because a criterion excluded them.
    pub fn pending_pairs(&mut self) -> Vec<Match> {
        self.assignment();
        let approved = self.approved_ids();

        self.assignment
            .iter()
            .flat_map(|assignment| assignment.iter())
            .filter(|(mentor_id, mentee_id)| {
                !approved.contains(mentor_id) && !approved.contains(mentee_id)
            })
            .filter_map(|(mentor_id, mentee_id)| self.find_match(mentor_id, mentee_id))
            .filter(|m| m.status == MatchStatus::Pending)
            .cloned()
            .collect()
    }

    /// Change the review status of one match.
    ///
    /// Approving is refused when either participant already belongs to a
    /// different approved pair.
    pub fn set_status(
        &mut self,
        mentor_id: &str,
        mentee_id: &str,
        status: MatchStatus,
    ) -> Result<&Match, SessionError> {
        let idx = *self
            .index
            .get(&(mentor_id.to_string(), mentee_id.to_string()))
            .ok_or_else(|| SessionError::MatchNotFound {
                mentor_id: mentor_id.to_string(),
                mentee_id: mentee_id.to_string(),
            })?;

        if status == MatchStatus::Approved {
            if let Some(other) = self.approved_pairs().find(|m| {
                !m.is_pair(mentor_id, mentee_id)
                    && (m.mentor_id == mentor_id || m.mentee_id == mentee_id)
            }) {
                let taken = if other.mentor_id == mentor_id {
                    mentor_id
                } else {
                    mentee_id
                };
                return Err(SessionError::AlreadyPaired(taken.to_string()));
            }
        }

        self.matches[idx].status = status;
        tracing::debug!("Match {} -> {} marked {:?}", mentor_id, mentee_id, status);

        Ok(&self.matches[idx])
    }

    pub fn approve(&mut self, mentor_id: &str, mentee_id: &str) -> Result<&Match, SessionError> {
        self.set_status(mentor_id, mentee_id, MatchStatus::Approved)
    }

    pub fn reject(&mut self, mentor_id: &str, mentee_id: &str) -> Result<&Match, SessionError> {
        self.set_status(mentor_id, mentee_id, MatchStatus::Rejected)
    }

    pub fn summary(&self) -> SessionSummary {
        let count = |status: MatchStatus| {
            self.matches
                .iter()
                .filter(|m| m.status == status)
                .count()
        };

        SessionSummary {
            mentor_count: self.mentors.len(),
            mentee_count: self.mentees.len(),
            match_count: self.matches.len(),
            excluded_count: self.excluded,
            approved: count(MatchStatus::Approved),
            rejected: count(MatchStatus::Rejected),
            pending: count(MatchStatus::Pending),
            solved: self.assignment.is_some(),
        }
    }
}
