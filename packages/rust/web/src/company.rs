//! Company profile extraction from a fetched page.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use docdesk_shared::{CachedPage, Result, SummaryConfig};

use crate::fetcher::PageFetcher;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").expect("phone regex")
});

static DESCRIPTION_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("description selector")
});

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector"));

/// Platform key and the hosts that identify it.
const SOCIAL_PLATFORMS: [(&str, &[&str]); 5] = [
    ("facebook", &["facebook.com", "fb.com"]),
    ("twitter", &["twitter.com", "x.com"]),
    ("linkedin", &["linkedin.com"]),
    ("instagram", &["instagram.com"]),
    ("youtube", &["youtube.com", "youtu.be"]),
];

/// Emails and phone numbers found in the page text, sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

/// Profile assembled from a company's landing page.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyInfo {
    pub url: String,
    pub title: Option<String>,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub summary: String,
    pub fetch_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_media: Option<BTreeMap<String, String>>,
}

/// Fetch `url` (through the page cache) and extract a [`CompanyInfo`].
#[instrument(skip(fetcher, summary))]
pub async fn extract_company_info(
    fetcher: &PageFetcher,
    url: &str,
    summary: &SummaryConfig,
) -> Result<CompanyInfo> {
    let page = fetcher.fetch_page(url).await?;
    company_info_from_page(&page, summary)
}

/// Build a [`CompanyInfo`] from an already fetched page.
pub fn company_info_from_page(page: &CachedPage, summary: &SummaryConfig) -> Result<CompanyInfo> {
    let doc = Html::parse_document(&page.html);

    let base = Url::parse(&page.url).ok();

    let contacts = extract_contacts(&page.text);
    let socials = extract_social_links(&doc, base.as_ref());
    let description = doc
        .select(&DESCRIPTION_SEL)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty());

    let excerpt: String = page.text.chars().take(summary.company_text_limit).collect();
    let summary_text = if excerpt.trim().is_empty() {
        String::new()
    } else {
        docdesk_summarizer::summarize(&excerpt, summary.company_summary_sentences)?
    };

    debug!(
        emails = contacts.emails.len(),
        phones = contacts.phones.len(),
        socials = socials.len(),
        "company page analysed"
    );

    Ok(CompanyInfo {
        url: page.url.clone(),
        company_name: company_name(page.title.as_deref(), &page.url),
        title: page.title.clone(),
        description,
        summary: summary_text,
        fetch_time: page.fetched_at,
        contact_info: (!contacts.is_empty()).then_some(contacts),
        social_media: (!socials.is_empty()).then_some(socials),
    })
}

/// Title text before the first `" - "`, else the whole title. Without a
/// title, the URL host stands in.
pub fn company_name(title: Option<&str>, url: &str) -> String {
    match title {
        Some(title) => title
            .split_once(" - ")
            .map_or(title, |(name, _)| name)
            .trim()
            .to_string(),
        None => Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| url.to_string()),
    }
}

pub fn extract_contacts(text: &str) -> ContactInfo {
    let emails: BTreeSet<String> = EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    let phones: BTreeSet<String> = PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    ContactInfo {
        emails: emails.into_iter().collect(),
        phones: phones.into_iter().collect(),
    }
}

/// First link per platform, in document order, as an absolute URL.
fn extract_social_links(doc: &Html, base: Option<&Url>) -> BTreeMap<String, String> {
    let mut found = BTreeMap::new();

    for el in doc.select(&ANCHOR_SEL) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let Some((platform, url)) = social_link(base, href) else {
            continue;
        };
        found
            .entry(platform.to_string())
            .or_insert_with(|| url.to_string());
    }

    found
}

fn social_link(base: Option<&Url>, href: &str) -> Option<(&'static str, Url)> {
    let href = href.trim();
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => resolve_relative(base, href)?,
        Err(_) => return None,
    };
    let platform = social_platform(&url)?;
    Some((platform, url))
}

/// Protocol- and path-relative links resolve against the page; any other
/// scheme-less link is read as `host/path`.
fn resolve_relative(base: Option<&Url>, href: &str) -> Option<Url> {
    if href.starts_with(['/', '.', '#', '?']) {
        base?.join(href).ok()
    } else {
        Url::parse(&format!("https://{href}")).ok()
    }
}

fn social_platform(url: &Url) -> Option<&'static str> {
    let host = url.host_str()?.to_ascii_lowercase();

    SOCIAL_PLATFORMS.iter().find_map(|(platform, domains)| {
        domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
            .then_some(*platform)
    })
}
