//! HTML-to-text rendering for fetched pages.
//!
//! Pages are rendered to Markdown-flavoured plain text with the `htmd` crate,
//! then a short series of cleanup passes removes leftover markup and
//! normalizes whitespace. The whole `<body>` is kept (headers and footers
//! included) because contact details usually live there.

mod cleanup;

use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use docdesk_shared::{DocdeskError, Result};

/// Tags whose content never reaches the text rendering.
const SKIPPED_TAGS: [&str; 7] = [
    "script", "style", "noscript", "iframe", "svg", "template", "head",
];

/// Render an HTML document as plain text.
///
/// `source_url`, when given, is used to resolve relative links.
#[instrument(skip(html), fields(html_len = html.len()))]
pub fn render_text(html: &str, source_url: Option<&Url>) -> Result<String> {
    let body_html = extract_body_html(html);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build();

    let raw = converter
        .convert(&body_html)
        .map_err(|e| DocdeskError::Conversion(format!("htmd conversion failed: {e}")))?;

    let text = cleanup::run_pipeline(&raw, source_url);
    debug!(raw_len = raw.len(), text_len = text.len(), "page rendered to text");

    Ok(text)
}

/// Inner HTML of `<body>`, or the input unchanged when there is none.
fn extract_body_html(html: &str) -> String {
    let doc = Html::parse_document(html);
    let Ok(body_sel) = Selector::parse("body") else {
        return html.to_string();
    };
    doc.select(&body_sel)
        .next()
        .map(|body| body.inner_html())
        .unwrap_or_else(|| html.to_string())
}
