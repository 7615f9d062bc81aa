//! Report driver: builds every report from shared canonical rows and routes
//! each one to the sink.

use crate::aggregate::{
    aggregate, sum_hours, BucketColumn, BucketReducer, HoursReducer, NoteCountReducer,
    NotesReducer,
};
use crate::classify::Classifier;
use crate::config::RollupConfig;
use crate::error::{ErrorCode, Result, RollupError};
use crate::matrix::{CellValue, ColumnKey, ReportMatrix};
use crate::normalize::normalize;
use crate::period::Month;
use crate::record::CanonicalRow;
use crate::roster::Roster;
use crate::sink::{CsvDirSink, TableSink};
use crate::source::read_records;
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub type WeeklyHours = ReportMatrix<NaiveDate, f64>;
pub type WeeklyNotes = ReportMatrix<NaiveDate, String>;
pub type WeeklyCounts = ReportMatrix<NaiveDate, usize>;
pub type MonthlyHours = ReportMatrix<BucketColumn<Month>, f64>;

/// Every file the driver can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Clean,
    TotalHours,
    WorkHours,
    SredHours,
    MissingEpics,
    Epics,
    EpicCounts,
    MonthlyHours,
}

impl ReportKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Clean => "clean-report.csv",
            Self::TotalHours => "total-hours.csv",
            Self::WorkHours => "work-hours.csv",
            Self::SredHours => "sred-hours.csv",
            Self::MissingEpics => "missing-epics.csv",
            Self::Epics => "epics.csv",
            Self::EpicCounts => "epic-counts.csv",
            Self::MonthlyHours => "monthly-hours.csv",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name().trim_end_matches(".csv"))
    }
}

/// All report matrices of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSet {
    pub total_hours: WeeklyHours,
    pub work_hours: WeeklyHours,
    pub sred_hours: WeeklyHours,
    pub missing_epics: WeeklyNotes,
    pub epics: WeeklyNotes,
    pub epic_counts: WeeklyCounts,
    pub monthly_hours: Option<MonthlyHours>,
}

/// Run-level scalar statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub total_hours: f64,
    pub qualifying_hours: f64,
    pub people: usize,
    pub rows: usize,
    pub skipped_rows: usize,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total hours: {}", self.total_hours.render())?;
        writeln!(f, "SR&ED hours: {}", self.qualifying_hours.render())?;
        write!(f, "People: {}", self.people)?;
        if self.skipped_rows > 0 {
            write!(f, "\nSkipped rows: {}", self.skipped_rows)?;
        }
        Ok(())
    }
}

/// Weekly hours over `rows`, reindexed against the roster.
pub fn hours_report<'a, I>(rows: I, roster: &Roster) -> WeeklyHours
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    ReportMatrix::pivot(aggregate::<NaiveDate, _, _>(rows, &HoursReducer)).reindex(roster)
}

/// Weekly epics over `rows`, reindexed against the roster.
pub fn epics_report<'a, I>(rows: I, roster: &Roster) -> WeeklyNotes
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    ReportMatrix::pivot(aggregate::<NaiveDate, _, _>(rows, &NotesReducer)).reindex(roster)
}

/// Distinct epics per week over `rows`, reindexed against the roster.
pub fn epic_counts_report<'a, I>(rows: I, roster: &Roster) -> WeeklyCounts
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    ReportMatrix::pivot(aggregate::<NaiveDate, _, _>(rows, &NoteCountReducer)).reindex(roster)
}

/// People with at least one week of rows but no notes. Not reindexed.
pub fn missing_epics_report<'a, I>(rows: I) -> WeeklyNotes
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    ReportMatrix::pivot(aggregate::<NaiveDate, _, _>(rows, &NotesReducer)).missing_only()
}

/// Monthly bucket sums, reindexed against the roster.
pub fn monthly_report<'a, I>(rows: I, roster: &Roster, reducer: &BucketReducer) -> MonthlyHours
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    let sums = aggregate::<Month, _, _>(rows, reducer);
    ReportMatrix::pivot(reducer.flatten(sums)).reindex(roster)
}

/// Build every report from the canonical rows.
pub fn build_reports(
    rows: &[CanonicalRow],
    roster: &Roster,
    classifier: &Classifier,
    monthly: Option<&BucketReducer>,
) -> ReportSet {
    let work = classifier.work_subset(rows);
    let qualifying = classifier.qualifying_subset(rows);
    debug!(
        "Subsets: {} rows, {} work, {} qualifying",
        rows.len(),
        work.len(),
        qualifying.len()
    );

    let set = ReportSet {
        total_hours: hours_report(rows, roster),
        work_hours: hours_report(work.iter().copied(), roster),
        sred_hours: hours_report(qualifying.iter().copied(), roster),
        missing_epics: missing_epics_report(qualifying.iter().copied()),
        epics: epics_report(qualifying.iter().copied(), roster),
        epic_counts: epic_counts_report(qualifying.iter().copied(), roster),
        monthly_hours: monthly.map(|reducer| monthly_report(rows, roster, reducer)),
    };

    debug!(
        "Built reports: {} weeks, {} people missing epics",
        set.total_hours.columns().len(),
        set.missing_epics.rows().len()
    );
    set
}

/// Scalar statistics over the canonical rows.
pub fn compute_stats(rows: &[CanonicalRow], roster: &Roster, classifier: &Classifier) -> RunStats {
    RunStats {
        total_hours: sum_hours(rows),
        qualifying_hours: sum_hours(rows.iter().filter(|r| classifier.is_qualifying(r))),
        people: roster.len(),
        rows: rows.len(),
        skipped_rows: 0,
    }
}

fn write_matrix<C: ColumnKey, V: CellValue>(
    sink: &dyn TableSink,
    kind: ReportKind,
    matrix: &ReportMatrix<C, V>,
) -> Result<PathBuf> {
    let rows: Vec<Vec<String>> = matrix.rendered_rows().collect();
    sink.write_table(kind.file_name(), &matrix.header(), &rows)
}

/// Write the canonical table and every report.
///
/// A failed write does not stop the remaining ones; all failures are
/// reported together afterwards.
pub fn write_reports(
    sink: &dyn TableSink,
    rows: &[CanonicalRow],
    set: &ReportSet,
) -> Result<Vec<PathBuf>> {
    let mut results = vec![
        (ReportKind::Clean, sink.write_rows(ReportKind::Clean.file_name(), rows)),
        (
            ReportKind::TotalHours,
            write_matrix(sink, ReportKind::TotalHours, &set.total_hours),
        ),
        (
            ReportKind::WorkHours,
            write_matrix(sink, ReportKind::WorkHours, &set.work_hours),
        ),
        (
            ReportKind::SredHours,
            write_matrix(sink, ReportKind::SredHours, &set.sred_hours),
        ),
        (
            ReportKind::MissingEpics,
            write_matrix(sink, ReportKind::MissingEpics, &set.missing_epics),
        ),
        (
            ReportKind::Epics,
            write_matrix(sink, ReportKind::Epics, &set.epics),
        ),
        (
            ReportKind::EpicCounts,
            write_matrix(sink, ReportKind::EpicCounts, &set.epic_counts),
        ),
    ];
    if let Some(monthly) = &set.monthly_hours {
        results.push((
            ReportKind::MonthlyHours,
            write_matrix(sink, ReportKind::MonthlyHours, monthly),
        ));
    }

    let mut written = Vec::new();
    let mut failures = Vec::new();
    for (kind, result) in results {
        match result {
            Ok(path) => written.push(path),
            Err(e) => {
                warn!("Failed to write {}: {}", kind, e);
                failures.push(format!("{kind}: {e}"));
            }
        }
    }

    if failures.is_empty() {
        Ok(written)
    } else {
        Err(RollupError::sink_write(
            ErrorCode::SINK_WRITE_FAILED,
            format!(
                "{} of {} reports failed ({})",
                failures.len(),
                failures.len() + written.len(),
                failures.join("; ")
            ),
            None,
        ))
    }
}

/// Paths and switches for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub monthly: bool,
}

impl RunOptions {
    /// Fill absent paths from the configured defaults.
    pub fn resolve(
        config: &RollupConfig,
        input: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        monthly: bool,
    ) -> Self {
        Self {
            input: input.unwrap_or_else(|| config.default_input.clone()),
            output_dir: output_dir.unwrap_or_else(|| config.default_output_dir.clone()),
            monthly,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub stats: RunStats,
    pub written: Vec<PathBuf>,
}

/// Read, normalize, build and write every report.
pub fn run(config: &RollupConfig, options: &RunOptions) -> Result<RunSummary> {
    let records = read_records(&options.input, config)?;
    let normalized = normalize(&records, config)?;
    let rows = normalized.rows;

    let roster = Roster::build(&rows);
    let classifier = Classifier::from_config(config);
    info!(
        "{} canonical rows, {} people",
        rows.len(),
        roster.len()
    );

    let reducer = options
        .monthly
        .then(|| BucketReducer::from_config(config));
    let set = build_reports(&rows, &roster, &classifier, reducer.as_ref());

    let sink = CsvDirSink::new(&options.output_dir);
    let written = write_reports(&sink, &rows, &set)?;
    info!(
        "Wrote {} files to {}",
        written.len(),
        options.output_dir.display()
    );

    let stats = RunStats {
        skipped_rows: normalized.skipped,
        ..compute_stats(&rows, &roster, &classifier)
    };
    Ok(RunSummary { stats, written })
}
