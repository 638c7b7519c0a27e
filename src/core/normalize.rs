/// Highest language proficiency rank (C2 / native)
pub const MAX_LANGUAGE_RANK: u8 = 6;

/// Highest academic level rank (Professor)
pub const MAX_STUDY_RANK: u8 = 5;

const LANGUAGE_LEVELS: &[(&str, u8)] = &[
    ("a1", 1),
    ("a2", 2),
    ("b1", 3),
    ("b2", 4),
    ("c1", 5),
    ("c2", 6),
    ("beginner", 1),
    ("elementary", 2),
    ("intermediate", 3),
    ("upper intermediate", 4),
    ("advanced", 5),
    ("proficient", 6),
    ("native", 6),
    ("muttersprache / native language", 6),
];

const STUDY_LEVELS: &[(&str, u8)] = &[
    ("other", 0),
    ("bachelor", 1),
    ("master", 2),
    ("phd", 3),
    ("doktorat / phd", 3),
    ("postdoc", 4),
    ("professor", 5),
];

#[inline]
fn lookup(table: &[(&str, u8)], label: &str) -> u8 {
    let key = label.trim().to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, rank)| *rank)
        .unwrap_or(0)
}

/// Rank a language proficiency label (CEFR or descriptive) on a 0-6 scale.
/// Unknown or empty labels rank 0.
pub fn language_rank(label: &str) -> u8 {
    lookup(LANGUAGE_LEVELS, label)
}

/// Rank an academic level label on a 0-5 scale. Unknown or empty labels rank 0.
pub fn study_rank(label: &str) -> u8 {
    lookup(STUDY_LEVELS, label)
}
