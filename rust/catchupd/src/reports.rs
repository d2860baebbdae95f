use crate::billing::{tier_for, Tier};
use crate::db::{JoinedCatchUpRow, Store};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const ALL_CATCHUPS_FILENAME: &str = "all_catchups_monthly_report.csv";
pub const STUDENT_NOT_FOUND: &str = "Student not found.";

#[derive(Debug, Clone)]
pub struct ReportError {
    pub code: &'static str,
    pub message: String,
}

impl ReportError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ReportError {
    fn from(e: anyhow::Error) -> Self {
        Self::new("db_query_failed", format!("{e:#}"))
    }
}

/// A catch-up numbered within its student's history, with its billing tier.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChargeRecord {
    pub catchup_no: usize,
    pub date: String,
    pub lesson_missed: Option<String>,
    pub charge: Tier,
}

/// `[student_name, date, student_id, lesson_missed]` as served by `/catchups/all`.
pub type MonthlyEntry = (String, String, i64, Option<String>);

#[derive(Debug, Clone)]
pub struct MonthGroup {
    /// Display title such as `March 2024`.
    pub title: String,
    pub entries: Vec<JoinedCatchUpRow>,
}

impl MonthGroup {
    /// Pairs each entry with its tier, counting catch-ups per student inside
    /// this month only.
    pub fn tiered(&self) -> Vec<(&JoinedCatchUpRow, Tier)> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        self.entries
            .iter()
            .map(|row| {
                let count = seen.entry(row.student_name.as_str()).or_insert(0);
                *count += 1;
                (row, tier_for(*count))
            })
            .collect()
    }
}

/// Numbers a student's catch-ups in recording order. `None` when no student
/// has this name.
pub fn student_report(store: &Store, name: &str) -> anyhow::Result<Option<Vec<ChargeRecord>>> {
    let Some(student_id) = store.find_student_by_name(name)? else {
        return Ok(None);
    };
    let rows = store.list_catchups_for_student(student_id)?;
    Ok(Some(
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| ChargeRecord {
                catchup_no: i + 1,
                date: row.date,
                lesson_missed: row.lesson_missed,
                charge: tier_for(i + 1),
            })
            .collect(),
    ))
}

/// Splits date-ordered rows into `YYYY-MM` groups, in the order each month
/// first appears.
pub fn group_by_month(
    rows: Vec<JoinedCatchUpRow>,
) -> Result<IndexMap<String, MonthGroup>, ReportError> {
    let mut groups: IndexMap<String, MonthGroup> = IndexMap::new();
    for row in rows {
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT).map_err(|e| {
            ReportError::new(
                "bad_date",
                format!("catch-up date {:?} is not YYYY-MM-DD: {}", row.date, e),
            )
        })?;
        let key = date.format("%Y-%m").to_string();
        groups
            .entry(key)
            .or_insert_with(|| MonthGroup {
                title: date.format("%B %Y").to_string(),
                entries: Vec::new(),
            })
            .entries
            .push(row);
    }
    Ok(groups)
}

pub fn monthly_report(store: &Store) -> Result<IndexMap<String, MonthGroup>, ReportError> {
    group_by_month(store.list_all_catchups_joined()?)
}

pub fn monthly_entries(
    groups: IndexMap<String, MonthGroup>,
) -> IndexMap<String, Vec<MonthlyEntry>> {
    groups
        .into_iter()
        .map(|(key, group)| {
            let entries = group
                .entries
                .into_iter()
                .map(|r| (r.student_name, r.date, r.student_id, r.lesson_missed))
                .collect();
            (key, entries)
        })
        .collect()
}

pub fn student_csv_filename(name: &str) -> String {
    format!("catchups_report_{}.csv", name.replace(' ', "_"))
}

pub fn student_csv(name: &str, records: &[ChargeRecord]) -> String {
    let mut out = String::new();
    let title = format!("Catch-up Tracker Report for {}", name);
    push_row(&mut out, &[title.as_str()]);
    push_row(&mut out, &["Catch-up Number", "Date", "Lesson Missed", "Status"]);
    for r in records {
        let number = r.catchup_no.to_string();
        push_row(
            &mut out,
            &[
                number.as_str(),
                r.date.as_str(),
                r.lesson_missed.as_deref().unwrap_or(""),
                r.charge.as_str(),
            ],
        );
    }
    out
}

pub fn monthly_csv(groups: &IndexMap<String, MonthGroup>) -> String {
    let mut out = String::new();
    push_row(&mut out, &["Catch-up Tracker - Full Report"]);
    push_row(&mut out, &[]);
    for group in groups.values() {
        let title = format!("Month: {}", group.title);
        push_row(&mut out, &[title.as_str()]);
        push_row(
            &mut out,
            &["Student Name", "Catch-up Date", "Lesson Missed", "Status"],
        );
        for (row, tier) in group.tiered() {
            push_row(
                &mut out,
                &[
                    row.student_name.as_str(),
                    row.date.as_str(),
                    row.lesson_missed.as_deref().unwrap_or(""),
                    tier.as_str(),
                ],
            );
        }
        push_row(&mut out, &[]);
    }
    out
}

fn push_row(out: &mut String, fields: &[&str]) {
    let line = fields
        .iter()
        .map(|f| csv_quote(f))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
