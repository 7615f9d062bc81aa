//! The complete set of people seen in a run.

use crate::record::CanonicalRow;
use std::collections::BTreeSet;

/// Sorted, deduplicated person identities.
///
/// Built once from the unfiltered canonical rows and used as the row index
/// of every reindexed report, so people without rows in a filtered subset
/// still get an explicit row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    people: Vec<String>,
}

impl Roster {
    /// Ordinal (case-sensitive) ordering, as `String`'s `Ord` provides.
    pub fn build(rows: &[CanonicalRow]) -> Self {
        let people: BTreeSet<&str> = rows.iter().map(|r| r.full_name.as_str()).collect();
        Self {
            people: people.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let people: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self {
            people: people.into_iter().collect(),
        }
    }

    pub fn people(&self) -> &[String] {
        &self.people
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.people.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn contains(&self, person: &str) -> bool {
        self.people
            .binary_search_by(|p| p.as_str().cmp(person))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(first: &str, last: &str) -> CanonicalRow {
        CanonicalRow::new(
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            first,
            last,
            "Dev",
            "General",
            1.0,
            None,
        )
    }

    #[test]
    fn test_build_dedupes_and_sorts() {
        let rows = vec![
            row("carol", "White"),
            row("Bob", "Jones"),
            row("Alice", "Smith"),
            row("Bob", "Jones"),
        ];
        let roster = Roster::build(&rows);

        // Ordinal: uppercase sorts before lowercase
        assert_eq!(
            roster.people(),
            &["Alice Smith", "Bob Jones", "carol White"]
        );
        assert_eq!(roster.len(), 3);
        assert!(roster.contains("Bob Jones"));
        assert!(!roster.contains("bob jones"));
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::build(&[]);
        assert!(roster.is_empty());
        assert_eq!(roster.iter().count(), 0);
    }
}
