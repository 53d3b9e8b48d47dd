//! Memcheck log analysis.
//!
//! Everything here is a pure function of the log text. Nothing fails on
//! unexpected content: a missing marker yields the `"0 bytes"` sentinel or an
//! empty excerpt list.

use serde::{Deserialize, Serialize};

/// Prefix memcheck puts in front of every diagnostic line (`==1234==`).
pub const RECORD_DELIMITER: &str = "==";

/// Returned by [`extract_leak_figure`] when the category never appears.
pub const NO_LEAK_FIGURE: &str = "0 bytes";

pub const STILL_REACHABLE_MARKER: &str = "still reachable in loss record";
pub const ERROR_SUMMARY_MARKER: &str = "ERROR SUMMARY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeakCategory {
    DefinitelyLost,
    IndirectlyLost,
    PossiblyLost,
}

impl LeakCategory {
    pub const ALL: [LeakCategory; 3] = [
        LeakCategory::DefinitelyLost,
        LeakCategory::IndirectlyLost,
        LeakCategory::PossiblyLost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LeakCategory::DefinitelyLost => "definitely lost",
            LeakCategory::IndirectlyLost => "indirectly lost",
            LeakCategory::PossiblyLost => "possibly lost",
        }
    }
}

/// Substrings that disqualify an excerpt.
///
/// The defaults filter out noise from GNU readline, which the shell under test
/// links for interactive input and which never frees its history buffers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilters {
    pub still_reachable_denylist: Vec<String>,
    pub error_denylist: Vec<String>,
}

impl Default for ReportFilters {
    fn default() -> Self {
        Self {
            still_reachable_denylist: vec!["libreadline.so".to_string()],
            error_denylist: vec!["readline".to_string()],
        }
    }
}

impl ReportFilters {
    /// Filters taken from the global configuration.
    pub fn from_config() -> Self {
        Self {
            still_reachable_denylist: crate::config::still_reachable_denylist(),
            error_denylist: crate::config::error_denylist(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakSummary {
    pub definitely_lost: String,
    pub indirectly_lost: String,
    pub possibly_lost: String,
}

/// Structured view of one memcheck log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValgrindReport {
    pub summary: LeakSummary,
    pub still_reachable: Vec<String>,
    pub filtered_errors: Vec<String>,
}

impl ValgrindReport {
    pub fn parse(content: &str, filters: &ReportFilters) -> Self {
        Self {
            summary: LeakSummary {
                definitely_lost: extract_leak_figure(content, LeakCategory::DefinitelyLost),
                indirectly_lost: extract_leak_figure(content, LeakCategory::IndirectlyLost),
                possibly_lost: extract_leak_figure(content, LeakCategory::PossiblyLost),
            },
            still_reachable: extract_still_reachable_blocks(
                content,
                &filters.still_reachable_denylist,
            ),
            filtered_errors: extract_non_benign_error_blocks(content, &filters.error_denylist),
        }
    }
}

/// Amount reported for `category` on the first line that mentions it.
///
/// The line is split on `:` and the first token after the first colon is
/// returned (`"   definitely lost: 72 bytes in 3 blocks"` gives `"72"`).
/// Lines mentioning the label without a colon, or with nothing after it,
/// are skipped.
pub fn extract_leak_figure(content: &str, category: LeakCategory) -> String {
    let label = category.label();
    for line in content.lines() {
        if !line.contains(label) {
            continue;
        }
        let figure = line
            .split(':')
            .nth(1)
            .and_then(|segment| segment.split_whitespace().next());
        if let Some(figure) = figure {
            return figure.to_string();
        }
    }
    NO_LEAK_FIGURE.to_string()
}

/// "still reachable" loss records that don't touch a denylisted library.
///
/// An excerpt opens on a line containing [`STILL_REACHABLE_MARKER`] and
/// closes at the next line starting with [`RECORD_DELIMITER`]. The closing
/// line is not part of the excerpt. An excerpt still open at end of log is
/// kept.
pub fn extract_still_reachable_blocks(content: &str, denylist: &[String]) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in content.lines() {
        if line.contains(STILL_REACHABLE_MARKER) {
            if let Some(done) = current.take() {
                push_unless_denied(&mut blocks, &done, denylist);
            }
            current = Some(vec![line]);
        } else if line.starts_with(RECORD_DELIMITER) {
            if let Some(done) = current.take() {
                push_unless_denied(&mut blocks, &done, denylist);
            }
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some(done) = current {
        push_unless_denied(&mut blocks, &done, denylist);
    }

    blocks
}

/// Diagnostic excerpts before the `ERROR SUMMARY` line.
///
/// Every line containing [`RECORD_DELIMITER`] starts a new excerpt. Nothing
/// at or after the summary line is looked at.
pub fn extract_non_benign_error_blocks(content: &str, denylist: &[String]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    let mut capturing = false;

    for line in content.lines() {
        if line.contains(ERROR_SUMMARY_MARKER) {
            break;
        }
        if line.contains(RECORD_DELIMITER) {
            if capturing && !buffer.is_empty() {
                push_unless_denied(&mut errors, &buffer, denylist);
            }
            buffer.clear();
            capturing = true;
        }
        if capturing {
            buffer.push(line);
        }
    }

    if capturing && !buffer.is_empty() {
        push_unless_denied(&mut errors, &buffer, denylist);
    }

    errors
}

/// First `ERROR SUMMARY` line, if the log got that far.
pub fn error_summary_line(content: &str) -> Option<&str> {
    content
        .lines()
        .find(|line| line.contains(ERROR_SUMMARY_MARKER))
}

fn push_unless_denied(out: &mut Vec<String>, lines: &[&str], denylist: &[String]) {
    let denied = lines
        .iter()
        .any(|line| denylist.iter().any(|needle| line.contains(needle.as_str())));
    if !denied {
        out.push(lines.join("\n"));
    }
}
