//! Block grammar of the graveyard log.
//!
//! ```text
//! # GRAVEYARD.md
//! *Here lie the fallen code, remembered but no longer needed.*
//! ---
//! ## <path>
//! **Lived:** <born> — <died>
//! **Cause of death:** <cause>
//! **Last words:** "<last words>"
//! **Survived by:** <a>, <b>        (only when there are survivors)
//!
//! > <narrative>
//!
//! ---
//! ```
//!
//! Records follow the header oldest first, each closed by a `---` line.
//! Unknown dates render as `unknown`.

use std::path::Path;

use chrono::NaiveDate;

use crate::error::ObituaryError;
use crate::obituary::ObituaryRecord;

/// Fixed header written when the log is created.
pub const HEADER: &str =
    "# GRAVEYARD.md\n*Here lie the fallen code, remembered but no longer needed.*\n---\n";
/// Line closing the header and every record.
pub const SEPARATOR: &str = "---";
/// Placeholder for absent dates and causes.
pub const UNKNOWN: &str = "unknown";

const HEADER_NAME: &str = "GRAVEYARD.md";
const LIVED: &str = "**Lived:**";
const CAUSE: &str = "**Cause of death:**";
const LAST_WORDS: &str = "**Last words:**";
const SURVIVED_BY: &str = "**Survived by:**";

/// Renders an optional date, substituting the placeholder.
pub(crate) fn date_text(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| UNKNOWN.to_string(), |d| d.to_string())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// Collapses a single-line field so it cannot break the block structure.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Serializes one record as a log block, including its closing separator.
#[must_use]
pub fn format_record(record: &ObituaryRecord) -> String {
    let mut block = format!(
        "## {}\n{LIVED} {} — {}\n{CAUSE} {}\n{LAST_WORDS} \"{}\"\n",
        single_line(&record.path),
        date_text(record.born),
        date_text(record.died),
        single_line(&record.cause),
        single_line(&record.last_words),
    );
    if !record.survivors.is_empty() {
        let names: Vec<String> = record.survivors.iter().map(|s| single_line(s)).collect();
        block.push_str(&format!("{SURVIVED_BY} {}\n", names.join(", ")));
    }

    block.push('\n');
    let mut lines = record.narrative.lines().peekable();
    if lines.peek().is_none() {
        block.push_str(">\n");
    }
    for line in lines {
        if line.trim().is_empty() {
            block.push_str(">\n");
        } else {
            block.push_str("> ");
            block.push_str(line);
            block.push('\n');
        }
    }
    block.push('\n');
    block.push_str(SEPARATOR);
    block.push('\n');
    block
}

/// Text to write before a new block so it lands after a separator on a
/// fresh line, whatever state the existing log is in.
#[must_use]
pub fn continuation(existing: &str) -> String {
    if existing.trim().is_empty() {
        return HEADER.to_string();
    }
    let mut prefix = String::new();
    if !existing.ends_with('\n') {
        prefix.push('\n');
    }
    let last = existing.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or_default();
    if last.trim_end() != SEPARATOR {
        prefix.push_str(SEPARATOR);
        prefix.push('\n');
    }
    prefix
}

fn is_separator(line: &str) -> bool {
    line.trim_end() == SEPARATOR
}

fn parse_error(path: &Path, line: usize, reason: &str) -> ObituaryError {
    ObituaryError::LogParse { path: path.to_path_buf(), line, reason: reason.to_string() }
}

/// Parses a whole log. `path` is only used in error messages.
///
/// # Errors
///
/// Returns [`ObituaryError::LogParse`] when the header is missing, the
/// header is not closed by a separator, or a record does not start with a
/// `## <path>` heading.
pub fn parse(text: &str, path: &Path) -> Result<Vec<ObituaryRecord>, ObituaryError> {
    // (1-based line number, line)
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    let header = lines.by_ref().find(|(_, l)| !l.trim().is_empty());
    match header {
        Some((_, line)) if line.starts_with("# ") && line.contains(HEADER_NAME) => {}
        Some((n, _)) => return Err(parse_error(path, n, "missing `# GRAVEYARD.md` header")),
        None => return Err(parse_error(path, 1, "missing `# GRAVEYARD.md` header")),
    }

    if !lines.by_ref().any(|(_, l)| is_separator(l)) {
        return Err(parse_error(path, text.lines().count(), "header is not closed by `---`"));
    }

    let mut records = Vec::new();
    let mut chunk: Vec<(usize, &str)> = Vec::new();
    for (n, line) in lines {
        if is_separator(line) {
            if let Some(record) = parse_block(&chunk, path)? {
                records.push(record);
            }
            chunk.clear();
        } else {
            chunk.push((n, line));
        }
    }
    if let Some(record) = parse_block(&chunk, path)? {
        records.push(record);
    }
    Ok(records)
}

fn parse_block(chunk: &[(usize, &str)], path: &Path) -> Result<Option<ObituaryRecord>, ObituaryError> {
    let mut body = chunk.iter().skip_while(|(_, l)| l.trim().is_empty());
    let Some(&(n, heading)) = body.next() else {
        return Ok(None);
    };
    let Some(name) = heading.strip_prefix("## ") else {
        return Err(parse_error(path, n, "expected `## <path>` heading"));
    };

    let mut record = ObituaryRecord {
        path: name.trim().to_string(),
        born: None,
        died: None,
        cause: UNKNOWN.to_string(),
        last_words: String::new(),
        narrative: String::new(),
        survivors: Vec::new(),
    };
    let mut narrative: Vec<&str> = Vec::new();

    for &(_, line) in body {
        if let Some(value) = line.strip_prefix(LIVED) {
            let (born, died) = value.split_once('—').unwrap_or((value, ""));
            record.born = parse_date(born);
            record.died = parse_date(died);
        } else if let Some(value) = line.strip_prefix(CAUSE) {
            let cause = value.trim();
            if !cause.is_empty() {
                record.cause = cause.to_string();
            }
        } else if let Some(value) = line.strip_prefix(LAST_WORDS) {
            record.last_words = unquote_last_words(value.trim());
        } else if let Some(value) = line.strip_prefix(SURVIVED_BY) {
            record.survivors = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        } else if let Some(quoted) = line.strip_prefix('>') {
            narrative.push(quoted.strip_prefix(' ').unwrap_or(quoted));
        }
    }

    record.narrative = narrative.join("\n").trim().to_string();
    Ok(Some(record))
}

/// Strips the quoting around last words. Older logs wrapped them in
/// backticks with a trailing ellipsis.
fn unquote_last_words(value: &str) -> String {
    let (value, legacy) = match value.strip_prefix('`').and_then(|v| v.strip_suffix('`')) {
        Some(inner) => (inner, true),
        None => (value, false),
    };
    let value = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')).unwrap_or(value);
    let value = if legacy { value.strip_suffix("...").unwrap_or(value) } else { value };
    value.to_string()
}
