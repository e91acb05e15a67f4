//! Markdown rule-file reader.
//!
//! A rule is any line that, after leading whitespace is trimmed, starts with
//! `"- "`. In section mode rules are also grouped under the nearest preceding
//! `"## "` heading; rules above the first heading appear only in the flat list.
//!
//! [`customers`] reads the customer registry, another line-oriented markdown
//! document.

pub mod customers;

pub use customers::{Customer, parse_customers, read_customers};

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use docdesk_shared::Result;

const RULE_PREFIX: &str = "- ";
const SECTION_PREFIX: &str = "## ";

/// Rules grouped under one `## ` heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSection {
    pub title: String,
    pub rules: Vec<String>,
}

/// Parsed contents of one rule file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFile {
    /// Every rule in file order.
    pub rules: Vec<String>,
    /// Present only when section grouping was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<RuleSection>>,
    /// Path the rules were read from.
    pub source: String,
}

/// Read the rule file at `path`.
///
/// Fails with `NotFound` when the file is absent.
#[instrument(skip_all, fields(path = %path.display(), sections = sections))]
pub fn read_rule_file(path: &Path, sections: bool) -> Result<RuleFile> {
    let content = docdesk_document::read_text(path)?;
    let mut parsed = parse_rules(&content, sections);
    parsed.source = path.display().to_string();

    debug!(
        rules = parsed.rules.len(),
        sections = parsed.sections.as_ref().map_or(0, Vec::len),
        "rule file parsed"
    );
    Ok(parsed)
}

/// Parse rule-file text. `source` is left empty.
pub fn parse_rules(content: &str, sections: bool) -> RuleFile {
    let mut rules = Vec::new();
    let mut grouped: Vec<RuleSection> = Vec::new();

    for line in content.lines() {
        let line = line.trim_start();

        if let Some(title) = line.strip_prefix(SECTION_PREFIX) {
            grouped.push(RuleSection {
                title: title.trim().to_string(),
                rules: Vec::new(),
            });
            continue;
        }

        let Some(rule) = line.strip_prefix(RULE_PREFIX) else {
            continue;
        };
        let rule = rule.trim_end().to_string();
        if let Some(section) = grouped.last_mut() {
            section.rules.push(rule.clone());
        }
        rules.push(rule);
    }

    RuleFile {
        rules,
        sections: sections.then_some(grouped),
        source: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdesk_shared::DocdeskError;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    #[test]
    fn flat_mode_lists_rules_in_order() {
        let file = read_rule_file(&fixture_path("rules/frontend.md"), false).unwrap();
        assert_eq!(
            file.rules,
            [
                "Use design-system components before writing custom ones.",
                "Prefer `Button` over raw `<button>` elements.",
                "Keep icon-only buttons labelled with `aria-label`.",
                "Call endpoints through the generated client.",
                "Handle 4xx responses with a user-visible message.",
            ]
        );
        assert!(file.sections.is_none());
        assert!(file.source.ends_with("frontend.md"));
    }

    #[test]
    fn section_mode_groups_under_nearest_heading() {
        let file = read_rule_file(&fixture_path("rules/frontend.md"), true).unwrap();
        let sections = file.sections.expect("sections requested");

        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Components", "API usage", "Empty section"]);
        assert_eq!(sections[0].rules.len(), 2);
        assert_eq!(sections[1].rules[0], "Call endpoints through the generated client.");
        assert!(sections[2].rules.is_empty());
        // Preamble rules stay in the flat list only.
        assert_eq!(file.rules.len(), 5);
    }

    #[test]
    fn deeper_headings_do_not_open_sections() {
        let file = parse_rules("## Top\n### Nested\n- kept under top\n", true);
        let sections = file.sections.unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].rules, ["kept under top"]);
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let file = parse_rules("- one\r\n- two\r\n", false);
        assert_eq!(file.rules, ["one", "two"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rule_file(&dir.path().join("absent.md"), false).unwrap_err();
        assert!(matches!(err, DocdeskError::NotFound { .. }));
    }

    #[test]
    fn sections_are_omitted_from_json_unless_requested() {
        let json = serde_json::to_value(parse_rules("- a", false)).unwrap();
        assert!(json.get("sections").is_none());
        let json = serde_json::to_value(parse_rules("## S\n- a", true)).unwrap();
        assert_eq!(json["sections"][0]["title"], "S");
    }
}
