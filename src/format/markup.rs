//! Inline markup reduction
//!
//! Turns one line of provider output into styled runs: leading `#` heading
//! markers are stripped, `**bold**` spans become bold runs, and stray `*`/`#`
//! characters are dropped everywhere.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static HEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s+").expect("valid regex"));
static BOLD_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));

/// A piece of text with uniform styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Reduce a line to ordered (text, bold) runs. Empty runs are omitted.
pub fn reduce_line(line: &str) -> Vec<Run> {
    let line = HEADING_MARKER.replace(line, "");
    let mut runs = Vec::new();
    let mut cursor = 0;

    for caps in BOLD_SPAN.captures_iter(&line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_run(&mut runs, &line[cursor..whole.start()], false);
        push_run(&mut runs, inner.as_str(), true);
        cursor = whole.end();
    }
    push_run(&mut runs, &line[cursor..], false);

    runs
}

fn push_run(runs: &mut Vec<Run>, raw: &str, bold: bool) {
    let text: String = raw.chars().filter(|c| *c != '*' && *c != '#').collect();
    if !text.is_empty() {
        runs.push(if bold { Run::bold(text) } else { Run::plain(text) });
    }
}
