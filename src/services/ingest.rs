use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use thiserror::Error;

use crate::models::{Mentee, Mentor};

/// Errors that can occur while reading a survey export
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Column positions in the mentor export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MentorColumns {
    pub id: usize,
    pub level_of_studies: usize,
    pub birth_year: usize,
    pub gender: usize,
    pub nationality: usize,
    pub city: usize,
    pub german_level: usize,
    pub english_level: usize,
    pub other_languages: usize,
}

impl Default for MentorColumns {
    fn default() -> Self {
        Self {
            id: 0,
            level_of_studies: 1,
            birth_year: 5,
            gender: 6,
            nationality: 8,
            city: 9,
            german_level: 10,
            english_level: 11,
            other_languages: 13,
        }
    }
}

/// Column positions in the mentee export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MenteeColumns {
    pub id: usize,
    pub birth_year: usize,
    pub desired_gender: usize,
    pub english_level: usize,
    pub other_languages: usize,
    pub gender: usize,
    pub german_level: usize,
    pub nationality: usize,
    pub level_of_studies: usize,
    pub city: usize,
}

impl Default for MenteeColumns {
    fn default() -> Self {
        Self {
            id: 0,
            birth_year: 1,
            desired_gender: 4,
            english_level: 5,
            other_languages: 12,
            gender: 13,
            german_level: 14,
            nationality: 18,
            level_of_studies: 20,
            city: 25,
        }
    }
}

/// Positional row access; missing cells read as empty
struct Row(csv::StringRecord);

impl Row {
    fn text(&self, col: usize) -> String {
        self.0.get(col).unwrap_or_default().to_string()
    }

    fn year(&self, col: usize) -> i32 {
        parse_year(self.0.get(col).unwrap_or_default())
    }
}

/// Leading integer of a cell ("1990", "1990 (approx.)"); 0 when there is none
fn parse_year(cell: &str) -> i32 {
    let cell = cell.trim();
    let end = cell
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(cell.len());

    cell[..end].parse().unwrap_or(0)
}

/// Read data rows: the first row is a header and is discarded
fn read_rows<R: Read>(reader: R) -> Result<Vec<Row>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records().skip(1) {
        rows.push(Row(record?));
    }
    Ok(rows)
}

/// Participant ids must be unique within one export
fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), IngestError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(IngestError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Parse the mentor export. Rows without an id are dropped; a repeated id is
/// an error.
pub fn parse_mentors<R: Read>(
    reader: R,
    columns: &MentorColumns,
) -> Result<Vec<Mentor>, IngestError> {
    let mentors: Vec<Mentor> = read_rows(reader)?
        .into_iter()
        .map(|row| Mentor {
            id: row.text(columns.id),
            level_of_studies: row.text(columns.level_of_studies),
            birth_year: row.year(columns.birth_year),
            gender: row.text(columns.gender),
            nationality: row.text(columns.nationality),
            city: row.text(columns.city),
            german_level: row.text(columns.german_level),
            english_level: row.text(columns.english_level),
            other_languages: row.text(columns.other_languages),
        })
        .filter(|mentor| !mentor.id.is_empty())
        .collect();
    ensure_unique("mentor", mentors.iter().map(|m| m.id.as_str()))?;

    tracing::debug!("Parsed {} mentors", mentors.len());
    Ok(mentors)
}

/// Parse the mentee export. Rows without an id are dropped; a repeated id is
/// an error.
pub fn parse_mentees<R: Read>(
    reader: R,
    columns: &MenteeColumns,
) -> Result<Vec<Mentee>, IngestError> {
    let mentees: Vec<Mentee> = read_rows(reader)?
        .into_iter()
        .map(|row| Mentee {
            id: row.text(columns.id),
            birth_year: row.year(columns.birth_year),
            desired_gender: row.text(columns.desired_gender),
            english_level: row.text(columns.english_level),
            other_languages: row.text(columns.other_languages),
            gender: row.text(columns.gender),
            german_level: row.text(columns.german_level),
            nationality: row.text(columns.nationality),
            level_of_studies: row.text(columns.level_of_studies),
            city: row.text(columns.city),
        })
        .filter(|mentee| !mentee.id.is_empty())
        .collect();
    ensure_unique("mentee", mentees.iter().map(|m| m.id.as_str()))?;

    tracing::debug!("Parsed {} mentees", mentees.len());
    Ok(mentees)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENTORS: &str = "\
ID,Studies,a,b,c,Birth year,Gender,d,Nationality,City,German,English,e,Other
M1,Master,,,,1990,male,,DE,Berlin,C1,B2,,French
,Bachelor,,,,1991,female,,FR,Paris,A1,C2,,
M2,PhD,,,,n/a,female,,IT,Rome,B1,C1
";

    #[test]
    fn test_parse_mentors() {
        let mentors = parse_mentors(MENTORS.as_bytes(), &MentorColumns::default()).unwrap();

        assert_eq!(mentors.len(), 2);
        assert_eq!(mentors[0].id, "M1");
        assert_eq!(mentors[0].level_of_studies, "Master");
        assert_eq!(mentors[0].birth_year, 1990);
        assert_eq!(mentors[0].german_level, "C1");
        assert_eq!(mentors[0].other_languages, "French");

        // Unparseable year and a short row
        assert_eq!(mentors[1].id, "M2");
        assert_eq!(mentors[1].birth_year, 0);
        assert_eq!(mentors[1].english_level, "C1");
        assert_eq!(mentors[1].other_languages, "");
    }

    #[test]
    fn test_parse_mentees() {
        let mut row = vec![""; 26];
        row[0] = "N1";
        row[1] = "1998";
        row[4] = "doesn't matter";
        row[5] = "B2";
        row[14] = "B1";
        row[18] = "DE";
        row[20] = "Bachelor";
        row[25] = "Berlin";
        let csv = format!("header\n{}\n", row.join(","));

        let mentees = parse_mentees(csv.as_bytes(), &MenteeColumns::default()).unwrap();

        assert_eq!(mentees.len(), 1);
        let mentee = &mentees[0];
        assert_eq!(mentee.id, "N1");
        assert_eq!(mentee.birth_year, 1998);
        assert_eq!(mentee.desired_gender, "doesn't matter");
        assert_eq!(mentee.german_level, "B1");
        assert_eq!(mentee.city, "Berlin");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mentors = "header\nM1,Master\nM2,PhD\nM1,Bachelor\n";
        let err = parse_mentors(mentors.as_bytes(), &MentorColumns::default()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::DuplicateId { kind: "mentor", ref id } if id == "M1"
        ));

        let mentees = "header\nN1,1998\nN1,1999\n";
        let err = parse_mentees(mentees.as_bytes(), &MenteeColumns::default()).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate mentee id: N1");
    }

    #[test]
    fn test_header_only_is_empty() {
        let mentees = parse_mentees("id,year\n".as_bytes(), &MenteeColumns::default()).unwrap();
        assert!(mentees.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let bytes: &[u8] = b"id\nM1,\xff\xfe\n";
        assert!(parse_mentors(bytes, &MentorColumns::default()).is_err());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1990"), 1990);
        assert_eq!(parse_year(" 1985 (approx.)"), 1985);
        assert_eq!(parse_year("unknown"), 0);
        assert_eq!(parse_year(""), 0);
    }
}
