//! Implementation guidance assembled from the API specification.

use docdesk_index::{ApiSpecIndex, recommend_endpoints};

use crate::responses::Guide;

pub const BEST_PRACTICES: [&str; 6] = [
    "Build screens from design-system components before writing custom ones.",
    "Call endpoints through a typed client generated from the API specification.",
    "Validate user input on the client and handle validation errors from the API.",
    "Show loading, empty and error states for every remote call.",
    "Keep components accessible: label controls and support keyboard navigation.",
    "Cover the feature with tests against mocked API responses.",
];

pub const IMPLEMENTATION_STEPS: [&str; 6] = [
    "Review the suggested endpoints and their request and response schemas.",
    "Pick the catalog components that cover the required UI.",
    "Define the data types and API client calls for the feature.",
    "Build the UI and wire it to the API calls.",
    "Add error handling and loading states.",
    "Write tests and review against the project rules.",
];

/// Correlate `feature` with the API and attach the fixed guidance lists.
pub fn build_guide(index: &ApiSpecIndex, feature: &str, endpoints_needed: &[String]) -> Guide {
    let rec = recommend_endpoints(index, feature, endpoints_needed);

    Guide {
        feature: feature.to_string(),
        best_practices: BEST_PRACTICES.iter().map(|s| s.to_string()).collect(),
        implementation_steps: IMPLEMENTATION_STEPS.iter().map(|s| s.to_string()).collect(),
        relevant_tags: rec.relevant_tags.into_iter().collect(),
        suggested_endpoints: rec.suggested_endpoints,
        specific_endpoints: rec.specific_endpoints,
    }
}
