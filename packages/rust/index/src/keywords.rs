//! Keyword extraction and endpoint recommendation for feature descriptions.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use docdesk_shared::EndpointSummary;

use crate::api::ApiSpecIndex;

/// Words too common to say anything about a feature.
pub const STOP_WORDS: [&str; 14] = [
    "a", "an", "the", "to", "and", "or", "of", "in", "for", "with", "on", "at", "by", "from",
];

/// Upper bound on keyword-derived suggestions.
pub const MAX_SUGGESTIONS: usize = 10;

/// Lower-cased whitespace tokens of `text`, minus stop words and tokens of
/// two characters or fewer. Order and duplicates are kept.
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > 2 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// An explicitly requested `"METHOD /path"` endpoint and what it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEndpoint {
    /// The request string as supplied.
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Endpoints and tags relevant to a feature description.
#[derive(Debug, Clone, Default)]
pub struct Recommendation {
    /// Keywords the suggestions were derived from.
    pub keywords: Vec<String>,
    /// Keyword matches, deduplicated, first-seen order, at most [`MAX_SUGGESTIONS`].
    pub suggested_endpoints: Vec<EndpointSummary>,
    /// Union of the tags on the suggested endpoints.
    pub relevant_tags: BTreeSet<String>,
    /// One entry per explicitly requested endpoint.
    pub specific_endpoints: Vec<ResolvedEndpoint>,
}

/// Correlate a free-text feature description with the API specification.
///
/// Each keyword is searched in turn; hits are deduplicated by
/// `(path, method)`. Explicit `"METHOD /path"` requests are resolved
/// separately, whether or not they match any keyword.
#[instrument(skip_all, fields(explicit = explicit.len()))]
pub fn recommend_endpoints(
    index: &ApiSpecIndex,
    description: &str,
    explicit: &[String],
) -> Recommendation {
    let keywords = extract_keywords(description);
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut suggested = Vec::new();
    let mut relevant_tags = BTreeSet::new();

    'keywords: for keyword in &keywords {
        for endpoint in index.search(keyword) {
            if suggested.len() >= MAX_SUGGESTIONS {
                break 'keywords;
            }
            if !seen.insert(endpoint.key()) {
                continue;
            }
            relevant_tags.extend(endpoint.tags.iter().cloned());
            suggested.push(EndpointSummary::from(endpoint));
        }
    }

    let specific_endpoints = explicit
        .iter()
        .map(|request| resolve_explicit(index, request))
        .collect();

    debug!(
        keywords = keywords.len(),
        suggestions = suggested.len(),
        tags = relevant_tags.len(),
        "recommendation built"
    );

    Recommendation {
        keywords,
        suggested_endpoints: suggested,
        relevant_tags,
        specific_endpoints,
    }
}

fn resolve_explicit(index: &ApiSpecIndex, request: &str) -> ResolvedEndpoint {
    let Some((method, path)) = request.trim().split_once(char::is_whitespace) else {
        return ResolvedEndpoint {
            endpoint: request.to_string(),
            method: None,
            path: None,
            found: false,
            details: None,
        };
    };

    let method = method.to_uppercase();
    let path = path.trim();
    let details = index.get_endpoint_details(path, &method).cloned();

    ResolvedEndpoint {
        endpoint: request.to_string(),
        found: details.is_some(),
        method: Some(method),
        path: Some(path.to_string()),
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiSpecDocument;
    use crate::test_support::fixture_path;
    use serde_json::{Map, json};

    fn fixture_index() -> ApiSpecIndex {
        ApiSpecIndex::load(&fixture_path("json/openapi.json"))
    }

    #[test]
    fn keywords_drop_stop_words_and_short_tokens() {
        let keywords = extract_keywords("Let a User upload an avatar to the profile by ID, then UPLOAD");
        assert_eq!(
            keywords,
            ["let", "user", "upload", "avatar", "profile", "id,", "then", "upload"]
        );
    }

    #[test]
    fn keywords_of_blank_text_are_empty() {
        assert!(extract_keywords("   ").is_empty());
        assert!(extract_keywords("to of an by").is_empty());
    }

    #[test]
    fn recommends_deduplicated_endpoints_in_first_seen_order() {
        let index = fixture_index();
        let rec = recommend_endpoints(
            &index,
            "Allow a candidate to submit an application for a job",
            &[],
        );

        assert_eq!(
            rec.keywords,
            ["allow", "candidate", "submit", "application", "job"]
        );
        let ops: Vec<&str> = rec
            .suggested_endpoints
            .iter()
            .filter_map(|e| e.operation_id.as_deref())
            .collect();
        assert_eq!(
            ops,
            [
                "listCandidates",
                "createCandidate",
                "getCandidate",
                "deleteCandidate",
                "submitApplication",
                "listJobs",
                "createJob",
            ]
        );
        let tags: Vec<&str> = rec.relevant_tags.iter().map(String::as_str).collect();
        assert_eq!(tags, ["Applications", "Candidates", "Jobs"]);
        assert!(rec.specific_endpoints.is_empty());
    }

    #[test]
    fn no_matches_is_not_an_error() {
        let index = fixture_index();
        let rec = recommend_endpoints(&index, "render a sparkline widget", &[]);
        assert!(rec.suggested_endpoints.is_empty());
        assert!(rec.relevant_tags.is_empty());
    }

    #[test]
    fn suggestions_are_capped() {
        let mut paths = Map::new();
        for i in 0..15 {
            paths.insert(
                format!("/reports/{i}"),
                json!({"get": {"operationId": format!("getReport{i}"), "tags": [format!("T{i}")]}}),
            );
        }
        let doc = ApiSpecDocument::from_value(json!({ "paths": paths })).unwrap();
        let index = ApiSpecIndex::from_document(doc);

        let rec = recommend_endpoints(&index, "monthly reports export", &[]);
        assert_eq!(rec.suggested_endpoints.len(), MAX_SUGGESTIONS);
        assert_eq!(rec.suggested_endpoints[0].path, "/reports/0");
        assert_eq!(rec.relevant_tags.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn explicit_endpoints_resolve_regardless_of_keywords() {
        let index = fixture_index();
        let explicit = vec![
            "get /companies/{companyId}".to_string(),
            "DELETE /jobs".to_string(),
            "nonsense".to_string(),
        ];
        let rec = recommend_endpoints(&index, "render a sparkline widget", &explicit);

        assert_eq!(rec.specific_endpoints.len(), 3);

        let company = &rec.specific_endpoints[0];
        assert!(company.found);
        assert_eq!(company.method.as_deref(), Some("GET"));
        assert_eq!(company.details.as_ref().unwrap()["operationId"], "getCompany");

        let missing = &rec.specific_endpoints[1];
        assert!(!missing.found);
        assert_eq!(missing.path.as_deref(), Some("/jobs"));

        let malformed = &rec.specific_endpoints[2];
        assert!(!malformed.found);
        assert!(malformed.method.is_none());
    }
}
