//! HTTP page fetching backed by [`PageCache`].

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use docdesk_shared::{CachedPage, DocdeskError, Result, WebConfig};

use crate::cache::PageCache;

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector"));

/// Fetches pages over HTTP and remembers them for the life of the process.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    cache: Arc<PageCache>,
}

impl PageFetcher {
    /// Build a fetcher with the configured user agent and timeout.
    pub fn new(config: &WebConfig, cache: Arc<PageCache>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocdeskError::FetchFailure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, cache })
    }

    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    /// Fetch `url`, or return the page already cached under that exact string.
    ///
    /// Transport errors and non-2xx responses become
    /// [`DocdeskError::FetchFailure`] and are not cached.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, url: &str) -> Result<Arc<CachedPage>> {
        if let Some(page) = self.cache.get(url) {
            debug!("cache hit");
            return Ok(page);
        }
        self.cache
            .get_or_fetch(url, || download(&self.client, url))
            .await
    }
}

async fn download(client: &Client, url: &str) -> Result<CachedPage> {
    let parsed =
        Url::parse(url).map_err(|e| DocdeskError::FetchFailure(format!("{url}: invalid URL: {e}")))?;

    debug!(%parsed, "fetching page");
    let response = client
        .get(parsed.as_str())
        .send()
        .await
        .map_err(|e| DocdeskError::FetchFailure(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DocdeskError::FetchFailure(format!("{url}: HTTP {status}")));
    }

    let html = response
        .text()
        .await
        .map_err(|e| DocdeskError::FetchFailure(format!("{url}: body read failed: {e}")))?;

    let title = page_title(&html);
    let text = docdesk_markdown::render_text(&html, Some(&parsed))?;

    info!(
        status = status.as_u16(),
        bytes = html.len(),
        text_len = text.len(),
        "page fetched"
    );

    Ok(CachedPage {
        url: url.to_string(),
        html,
        text,
        title,
        fetched_at: Utc::now(),
    })
}

/// Trimmed text of the first `<title>` element; `None` when missing or blank.
pub fn page_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    doc.select(&TITLE_SEL)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><head><title>  Docs Home  </title></head>
        <body><p>Welcome to the docs.</p></body></html>"#;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(&WebConfig::default(), Arc::new(PageCache::new())).unwrap()
    }

    #[test]
    fn title_is_trimmed_and_optional() {
        assert_eq!(page_title(PAGE).as_deref(), Some("Docs Home"));
        assert_eq!(page_title("<html><body>none</body></html>"), None);
        assert_eq!(page_title("<title>   </title>"), None);
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher();
        let url = format!("{}/", server.uri());

        let first = fetcher.fetch_page(&url).await.unwrap();
        let second = fetcher.fetch_page(&url).await.unwrap();

        assert_eq!(first.fetched_at, second.fetched_at);
        assert_eq!(first.title.as_deref(), Some("Docs Home"));
        assert!(first.text.contains("Welcome to the docs."));
        assert_eq!(first.url, url);
        assert_eq!(fetcher.cache().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(PAGE)
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher();
        let url = format!("{}/slow", server.uri());

        let (a, b) = tokio::join!(fetcher.fetch_page(&url), fetcher.fetch_page(&url));
        assert_eq!(a.unwrap().fetched_at, b.unwrap().fetched_at);
    }

    #[tokio::test]
    async fn error_status_is_a_fetch_failure_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = fetcher();
        let url = format!("{}/missing", server.uri());

        for _ in 0..2 {
            let err = fetcher.fetch_page(&url).await.unwrap_err();
            assert!(matches!(err, DocdeskError::FetchFailure(_)));
            assert!(err.to_string().contains("404"));
        }
        assert!(fetcher.cache().is_empty());
    }

    #[tokio::test]
    async fn invalid_url_is_a_fetch_failure() {
        let err = fetcher().fetch_page("not a url").await.unwrap_err();
        assert!(matches!(err, DocdeskError::FetchFailure(_)));
    }

    #[tokio::test]
    async fn timeout_is_a_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(path("/hang"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(PAGE)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = WebConfig {
            timeout_secs: 1,
            ..WebConfig::default()
        };
        let fetcher = PageFetcher::new(&config, Arc::new(PageCache::new())).unwrap();
        let err = fetcher
            .fetch_page(&format!("{}/hang", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, DocdeskError::FetchFailure(_)));
    }
}
