//! Article page extraction

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use storyline_core::{ArticleFetcher, FetchedPage, StorylineError, StorylineResult};

/// Downloads article pages and extracts title, body and metadata
pub struct HttpArticleFetcher {
    client: Client,
}

impl HttpArticleFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent("Storyline/0.1")
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for HttpArticleFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(15))
    }
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch(&self, url: &str) -> StorylineResult<FetchedPage> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(StorylineError::fetch(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let html = response.text().await?;
        let page = extract_page(&html)
            .ok_or_else(|| StorylineError::fetch(format!("No article body found at {}", url)))?;

        debug!(url, chars = page.text.len(), "extracted article body");
        Ok(page)
    }
}

/// Pull title, paragraphs and metadata out of an article page
///
/// Returns `None` when the page yields no usable body text, which the
/// pipeline treats as a parse failure and skips.
fn extract_page(html: &str) -> Option<FetchedPage> {
    let document = Html::parse_document(html);

    // Selectors are constant and known-valid
    let p = Selector::parse("p").unwrap();
    let title_tag = Selector::parse("title").unwrap();
    let og_title = Selector::parse(r#"meta[property="og:title"]"#).unwrap();
    let og_image = Selector::parse(r#"meta[property="og:image"]"#).unwrap();
    let author_meta = Selector::parse(r#"meta[name="author"]"#).unwrap();

    let text = document
        .select(&p)
        .map(|el| el.text().collect::<String>())
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        // Short paragraphs are navigation chrome, captions and cookie banners
        .filter(|t| t.chars().count() >= 40)
        .collect::<Vec<_>>()
        .join("\n\n");

    if text.is_empty() {
        return None;
    }

    let meta_content = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let title = meta_content(&og_title)
        .or_else(|| {
            document
                .select(&title_tag)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default();

    Some(FetchedPage {
        title,
        text,
        author: meta_content(&author_meta),
        image: meta_content(&og_image),
    })
}
