use crate::core::{filters::passes_exclusion_criteria, scoring::score_pair};
use crate::models::{ExclusionCriterion, Match, MatchStatus, Mentee, Mentor, ScoringWeights};

/// Default number of entries returned by [`top_matches`]
pub const DEFAULT_TOP_MATCHES: usize = 3;

/// Result of one scoring pass over the full mentor x mentee cross-product
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Scored pairs, best normalized score first
    pub matches: Vec<Match>,
    /// Number of pairs considered (mentors x mentees)
    pub total_candidates: usize,
    /// Number of pairs dropped by exclusion criteria
    pub excluded: usize,
}

/// Builds the candidate match set
///
/// # Pipeline Stages
/// 1. Exclusion criteria filter
/// 2. Pairwise scoring
/// 3. Min-max normalization across the batch
/// 4. Ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score every mentor/mentee pair that survives the exclusion criteria.
    ///
    /// Excluded pairs produce no `Match` at all. Re-running on the same input
    /// yields identical distances, scores and order.
    pub fn build_matches(
        &self,
        mentors: &[Mentor],
        mentees: &[Mentee],
        criteria: &[ExclusionCriterion],
    ) -> MatchResult {
        let total_candidates = mentors.len() * mentees.len();

        let mut matches: Vec<Match> = mentors
            .iter()
            .flat_map(|mentor| mentees.iter().map(move |mentee| (mentor, mentee)))
            // Stage 1: Exclusion criteria
            .filter(|(mentor, mentee)| passes_exclusion_criteria(mentor, mentee, criteria))
            // Stage 2: Scoring
            .map(|(mentor, mentee)| {
                let pair = score_pair(mentor, mentee, &self.weights);

                Match {
                    mentor_id: mentor.id.clone(),
                    mentee_id: mentee.id.clone(),
                    score: 1.0 - pair.distance,
                    distance: pair.distance,
                    normalized_score: 0.0,
                    reasons: pair.reasons,
                    status: MatchStatus::Pending,
                }
            })
            .collect();

        let excluded = total_candidates - matches.len();

        // Stage 3: Normalization
        normalize_scores(&mut matches);

        // Stage 4: Sort by normalized score (descending)
        matches.sort_by(|a, b| b.normalized_score.total_cmp(&a.normalized_score));

        tracing::debug!(
            "Scored {} of {} candidate pairs ({} excluded)",
            matches.len(),
            total_candidates,
            excluded
        );

        MatchResult {
            matches,
            total_candidates,
            excluded,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Min-max normalize distances across the batch and invert them, so the best
/// pair scores 1.0 and the worst 0.0. When every distance is equal the range
/// is taken as 1 and every pair scores 1.0.
pub fn normalize_scores(matches: &mut [Match]) {
    if matches.is_empty() {
        return;
    }

    let (min_dist, max_dist) = matches
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
            (lo.min(m.distance), hi.max(m.distance))
        });

    let range = if max_dist - min_dist > 0.0 {
        max_dist - min_dist
    } else {
        1.0
    };

    for m in matches.iter_mut() {
        m.normalized_score = 1.0 - (m.distance - min_dist) / range;
    }
}

/// Which side of a match [`top_matches`] filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFilter<'a> {
    All,
    ByMentor(&'a str),
    ByMentee(&'a str),
}

impl<'a> MatchFilter<'a> {
    /// Mentor id wins when both are given
    pub fn from_ids(mentor_id: Option<&'a str>, mentee_id: Option<&'a str>) -> Self {
        match (mentor_id, mentee_id) {
            (Some(id), _) => MatchFilter::ByMentor(id),
            (None, Some(id)) => MatchFilter::ByMentee(id),
            (None, None) => MatchFilter::All,
        }
    }

    fn accepts(&self, m: &Match) -> bool {
        match self {
            MatchFilter::All => true,
            MatchFilter::ByMentor(id) => m.mentor_id == *id,
            MatchFilter::ByMentee(id) => m.mentee_id == *id,
        }
    }
}

/// First `limit` matches of an already ranked list that pass the filter
pub fn top_matches<'m>(
    matches: &'m [Match],
    filter: MatchFilter<'_>,
    limit: usize,
) -> Vec<&'m Match> {
    matches
        .iter()
        .filter(|m| filter.accepts(m))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, MentorAttribute};

    fn create_mentor(id: &str, birth_year: i32, city: &str) -> Mentor {
        Mentor {
            id: id.to_string(),
            birth_year,
            gender: "female".to_string(),
            nationality: "DE".to_string(),
            city: city.to_string(),
            german_level: "C2".to_string(),
            english_level: "B2".to_string(),
            level_of_studies: "Master".to_string(),
            ..Default::default()
        }
    }

    fn create_mentee(id: &str, birth_year: i32) -> Mentee {
        Mentee {
            id: id.to_string(),
            birth_year,
            desired_gender: "doesn't matter".to_string(),
            nationality: "DE".to_string(),
            city: "Berlin".to_string(),
            german_level: "C2".to_string(),
            english_level: "B2".to_string(),
            level_of_studies: "Bachelor".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_matches_cross_product() {
        let matcher = Matcher::with_default_weights();
        let mentors = vec![
            create_mentor("M1", 1990, "Berlin"),
            create_mentor("M2", 1970, "Munich"),
        ];
        let mentees = vec![create_mentee("N1", 1998), create_mentee("N2", 2000)];

        let result = matcher.build_matches(&mentors, &mentees, &[]);

        assert_eq!(result.matches.len(), 4);
        assert_eq!(result.total_candidates, 4);
        assert_eq!(result.excluded, 0);
        assert!(result.matches.iter().all(|m| m.status == MatchStatus::Pending));
    }

    #[test]
    fn test_matches_sorted_and_normalized() {
        let matcher = Matcher::with_default_weights();
        let mentors = vec![
            create_mentor("M1", 1990, "Berlin"),
            create_mentor("M2", 1960, "Munich"),
        ];
        let mentees = vec![create_mentee("N1", 1998)];

        let result = matcher.build_matches(&mentors, &mentees, &[]);

        assert_eq!(result.matches[0].mentor_id, "M1");
        assert_eq!(result.matches[0].normalized_score, 1.0);
        assert_eq!(result.matches[1].normalized_score, 0.0);
        for m in &result.matches {
            assert!((m.score - (1.0 - m.distance)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_uniform_distances_normalize_to_one() {
        let matcher = Matcher::with_default_weights();
        let mentors = vec![
            create_mentor("M1", 1990, "Berlin"),
            create_mentor("M2", 1990, "Berlin"),
        ];
        let mentees = vec![create_mentee("N1", 1990)];

        let result = matcher.build_matches(&mentors, &mentees, &[]);

        assert!(result.matches.iter().all(|m| m.normalized_score == 1.0));
    }

    #[test]
    fn test_empty_inputs() {
        let matcher = Matcher::with_default_weights();
        let result = matcher.build_matches(&[create_mentor("M1", 1990, "Berlin")], &[], &[]);

        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 0);
    }

    #[test]
    fn test_excluded_pairs_produce_no_match() {
        let matcher = Matcher::with_default_weights();
        let mentors = vec![
            create_mentor("M1", 1990, "Berlin"),
            create_mentor("M2", 1980, "Berlin"),
        ];
        let mentees = vec![create_mentee("N1", 1998)];
        let criteria = vec![ExclusionCriterion::new(
            "N1",
            MentorAttribute::MentorId,
            Condition::NotEquals,
            "M1",
        )
        .unwrap()];

        let result = matcher.build_matches(&mentors, &mentees, &criteria);

        assert_eq!(result.excluded, 1);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].mentor_id, "M2");
    }

    #[test]
    fn test_top_matches_filters() {
        let matcher = Matcher::with_default_weights();
        let mentors = vec![
            create_mentor("M1", 1990, "Berlin"),
            create_mentor("M2", 1980, "Berlin"),
            create_mentor("M3", 1970, "Munich"),
        ];
        let mentees = vec![create_mentee("N1", 1998), create_mentee("N2", 1985)];
        let result = matcher.build_matches(&mentors, &mentees, &[]);

        let by_mentor = top_matches(
            &result.matches,
            MatchFilter::ByMentor("M2"),
            DEFAULT_TOP_MATCHES,
        );
        assert_eq!(by_mentor.len(), 2);
        assert!(by_mentor.iter().all(|m| m.mentor_id == "M2"));

        let by_mentee = top_matches(&result.matches, MatchFilter::from_ids(None, Some("N2")), 2);
        assert_eq!(by_mentee.len(), 2);
        assert!(by_mentee[0].normalized_score >= by_mentee[1].normalized_score);

        let all = top_matches(&result.matches, MatchFilter::All, 4);
        assert_eq!(all.len(), 4);
    }
}
