//! Cleanup passes applied to converter output.
//!
//! Each pass is `&str -> String`; the order matters because link resolution
//! expects tags to be gone and blank-line collapsing expects trailing
//! whitespace to be gone.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(?:\s[^>]*)?/?>").expect("tag regex"));

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]]*)\]\(([^)\s]+)\)").expect("link regex"));

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run regex"));

pub(crate) fn run_pipeline(text: &str, base_url: Option<&Url>) -> String {
    let mut result = strip_leftover_html(text);
    result = resolve_links(&result, base_url);
    result = trim_line_ends(&result);
    result = collapse_blank_lines(&result);
    result.trim().to_string()
}

/// Drop any tag the converter passed through, keeping its inner text.
/// Fenced code is left alone.
fn strip_leftover_html(text: &str) -> String {
    let mut in_fence = false;
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                return line.to_string();
            }
            if in_fence {
                line.to_string()
            } else {
                TAG_RE.replace_all(line, "").into_owned()
            }
        })
        .collect();
    lines.join("\n")
}

/// Rewrite relative link targets as absolute URLs. Images, anchors and
/// non-HTTP schemes are kept as written.
fn resolve_links(text: &str, base_url: Option<&Url>) -> String {
    let Some(base) = base_url else {
        return text.to_string();
    };

    LINK_RE
        .replace_all(text, |caps: &Captures| {
            let (bang, label, href) = (&caps[1], &caps[2], &caps[3]);
            if !bang.is_empty() || href.starts_with('#') || has_scheme(href) {
                return caps[0].to_string();
            }
            match base.join(href) {
                Ok(resolved) => format!("[{label}]({resolved})"),
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn has_scheme(href: &str) -> bool {
    Url::parse(href).is_ok()
}

fn trim_line_ends(text: &str) -> String {
    text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
}

/// At most one blank line between blocks.
fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n\n").into_owned()
}
