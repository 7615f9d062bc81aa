//! Person-by-period report matrices.
//!
//! A [`ReportMatrix`] is produced by [`ReportMatrix::pivot`] from an aggregated
//! map, optionally forced onto the full [`Roster`] with
//! [`ReportMatrix::reindex`], and finally rendered by the sink.

use crate::aggregate::MISSING;
use crate::period::{Month, Period};
use crate::roster::Roster;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Header label of the person column.
pub const PERSON_COLUMN: &str = "Full Name";

/// A sortable column key with a header label.
pub trait ColumnKey: Clone + Ord {
    fn label(&self) -> String;
}

impl ColumnKey for NaiveDate {
    fn label(&self) -> String {
        Period::label(self)
    }
}

impl ColumnKey for Month {
    fn label(&self) -> String {
        Period::label(self)
    }
}

/// A cell type with an "no data" value and a textual rendering.
pub trait CellValue: Clone + PartialEq {
    /// Value for a cell with no input rows: 0 for hours, "" for notes.
    fn empty() -> Self;

    fn render(&self) -> String;
}

impl CellValue for f64 {
    fn empty() -> Self {
        0.0
    }

    /// At most two decimals, trailing zeros trimmed. Never prints `-0`.
    fn render(&self) -> String {
        let rounded = (self * 100.0).round() / 100.0;
        if rounded == 0.0 {
            return "0".to_string();
        }
        format!("{rounded}")
    }
}

impl CellValue for usize {
    fn empty() -> Self {
        0
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl CellValue for String {
    fn empty() -> Self {
        String::new()
    }

    fn render(&self) -> String {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow<V> {
    pub person: String,
    pub cells: Vec<V>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportMatrix<C, V> {
    columns: Vec<C>,
    rows: Vec<MatrixRow<V>>,
}

impl<C: ColumnKey, V: CellValue> ReportMatrix<C, V> {
    pub fn new(columns: Vec<C>, rows: Vec<MatrixRow<V>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.cells.len() == columns.len()));
        Self { columns, rows }
    }

    /// Reshape an aggregated map into a matrix.
    ///
    /// Rows are the distinct people present in `cells` (not the roster),
    /// columns are the distinct periods present, both ascending. A
    /// `(person, period)` pair absent from the map gets [`CellValue::empty`].
    pub fn pivot(cells: BTreeMap<(String, C), V>) -> Self {
        let columns: Vec<C> = cells
            .keys()
            .map(|(_, column)| column.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let positions: BTreeMap<&C, usize> =
            columns.iter().enumerate().map(|(i, c)| (c, i)).collect();

        let mut by_person: BTreeMap<String, Vec<V>> = BTreeMap::new();
        for ((person, column), value) in cells {
            let position = positions[&column];
            let row = by_person
                .entry(person)
                .or_insert_with(|| vec![V::empty(); columns.len()]);
            row[position] = value;
        }

        let rows = by_person
            .into_iter()
            .map(|(person, cells)| MatrixRow { person, cells })
            .collect();

        Self { columns, rows }
    }

    /// Force the row index to exactly `roster`, in roster order.
    ///
    /// People missing from this matrix get a row of empty cells; existing rows
    /// are copied unchanged. Columns are never added or removed.
    pub fn reindex(&self, roster: &Roster) -> Self {
        let existing: HashMap<&str, &MatrixRow<V>> = self
            .rows
            .iter()
            .map(|r| (r.person.as_str(), r))
            .collect();

        let rows = roster
            .iter()
            .map(|person| match existing.get(person) {
                Some(row) => (*row).clone(),
                None => MatrixRow {
                    person: person.to_string(),
                    cells: vec![V::empty(); self.columns.len()],
                },
            })
            .collect();

        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Keep only rows for which `predicate` holds on the row's cells.
    pub fn retain_rows<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&[V]) -> bool,
    {
        self.rows.retain(|row| predicate(&row.cells));
        self
    }

    pub fn columns(&self) -> &[C] {
        &self.columns
    }

    pub fn rows(&self) -> &[MatrixRow<V>] {
        &self.rows
    }

    pub fn people(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.person.as_str())
    }

    pub fn row(&self, person: &str) -> Option<&MatrixRow<V>> {
        self.rows.iter().find(|r| r.person == person)
    }

    /// Cell for `person` in `column`, if both exist.
    pub fn get(&self, person: &str, column: &C) -> Option<&V> {
        let index = self.columns.binary_search(column).ok()?;
        self.row(person).map(|r| &r.cells[index])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `Full Name` followed by one label per column.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(PERSON_COLUMN.to_string())
            .chain(self.columns.iter().map(ColumnKey::label))
            .collect()
    }

    /// Each row rendered as text, person first.
    pub fn rendered_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|row| {
            std::iter::once(row.person.clone())
                .chain(row.cells.iter().map(CellValue::render))
                .collect()
        })
    }
}

impl<C: ColumnKey> ReportMatrix<C, String> {
    /// Keep only people with at least one [`MISSING`] cell.
    pub fn missing_only(self) -> Self {
        self.retain_rows(|cells| cells.iter().any(|c| c == MISSING))
    }
}
