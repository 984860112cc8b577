//! Terminal renderings of the graveyard for `view` and `list`.

use std::fmt::Write;

use super::format::date_text;
use crate::obituary::ObituaryRecord;

/// Printed instead of an empty table or listing.
pub const EMPTY_MESSAGE: &str = "The graveyard is empty. No code has been mourned yet.";

const CAUSE_WIDTH: usize = 48;

fn lived(record: &ObituaryRecord) -> String {
    format!("{} — {}", date_text(record.born), date_text(record.died))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "obituary"
    } else {
        "obituaries"
    }
}

/// Full rendering of every record, narrative included.
#[must_use]
pub fn render_pretty(records: &[ObituaryRecord]) -> String {
    if records.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "\u{1faa6} {}", record.path);
        let _ = write!(out, "   Lived:          {}", lived(record));
        match record.lifespan_days() {
            Some(days) => {
                let _ = writeln!(out, " ({days} days)");
            }
            None => out.push('\n'),
        }
        let _ = writeln!(out, "   Cause of death: {}", record.cause);
        if !record.last_words.is_empty() {
            let _ = writeln!(out, "   Last words:     \"{}\"", record.last_words);
        }
        if !record.survivors.is_empty() {
            let _ = writeln!(out, "   Survived by:    {}", record.survivors.join(", "));
        }
        out.push('\n');
        for line in record.narrative.lines() {
            if line.trim().is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "      {line}");
            }
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{} {}.", records.len(), plural(records.len()));
    out
}

/// One row per record: file, lifespan and cause.
#[must_use]
pub fn render_table(records: &[ObituaryRecord]) -> String {
    if records.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let rows: Vec<(String, String, String)> = records
        .iter()
        .map(|r| (r.path.clone(), lived(r), truncate(&r.cause, CAUSE_WIDTH)))
        .collect();

    let file_width = rows.iter().map(|r| r.0.chars().count()).max().unwrap_or(4).max(4);
    let lived_width = rows.iter().map(|r| r.1.chars().count()).max().unwrap_or(5).max(5);

    let mut out = String::new();
    let _ = writeln!(out, "{:<file_width$}  {:<lived_width$}  CAUSE", "FILE", "LIVED");
    let _ = writeln!(out, "{:-<file_width$}  {:-<lived_width$}  {:-<5}", "", "", "");
    for (file, lived, cause) in &rows {
        let _ = writeln!(out, "{file:<file_width$}  {lived:<lived_width$}  {cause}");
    }
    let _ = writeln!(out, "\n{} {} total.", rows.len(), plural(rows.len()));
    out
}
