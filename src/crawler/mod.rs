pub mod content;
pub mod parser;

pub use parser::NovelParser;

use anyhow::Result;
use scraper::Html;
use tracing::{debug, warn};

use crate::filters::{Category, PopularNovelsOptions, Sort};
use crate::models::{NovelItem, SourceNovel};

/// Novels per listing page served by the site.
const PAGE_SIZE: u32 = 70;
/// Query marker requesting the simplified single-page reader rendering.
const READER_MODE_PARAM: &str = "?mtr=true";

pub struct LibreBookCrawler {
    client: reqwest::Client,
    base_url: String,
    parser: NovelParser,
}

impl LibreBookCrawler {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();

        Self {
            client,
            base_url: "https://1.librebook.me".to_string(),
            parser: NovelParser,
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("fetching {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Fetch variant for structured API responses. The extraction itself only
    /// consumes HTML pages; this exists for hosts that probe site endpoints.
    pub async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        debug!("fetching {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Lists one page of the popular/catalog view.
    pub async fn popular_novels(
        &self,
        page_no: u32,
        options: &PopularNovelsOptions,
    ) -> Result<Vec<NovelItem>> {
        let url = self.build_list_url(page_no, options);
        let body = self.fetch_text(&url).await?;
        let document = Html::parse_document(&body);
        let novels = self.parser.parse_tiles(&document);
        debug!("listing page {page_no}: {} novels", novels.len());
        Ok(novels)
    }

    /// Runs a site search. The site paginates search results server-side, so
    /// the page number is accepted for interface parity and unused.
    pub async fn search_novels(&self, search_term: &str, _page_no: u32) -> Result<Vec<NovelItem>> {
        let url = self.build_search_url(search_term)?;
        let body = self.fetch_text(&url).await?;
        let document = Html::parse_document(&body);
        Ok(self.parser.parse_tiles(&document))
    }

    /// Fetches and assembles a novel's detail page, following up with the
    /// contents sub-page when the detail page itself lists no chapters.
    pub async fn parse_novel(&self, novel_path: &str) -> Result<SourceNovel> {
        let url = format!("{}{}", self.base_url, novel_path);
        let body = self.fetch_text(&url).await?;
        let document = Html::parse_document(&body);
        let mut novel = self.parser.parse_novel_page(&document, novel_path);

        // Some site revisions keep the table of contents off the detail page.
        // A missing or failing contents page just means no chapters.
        if novel.chapters.is_empty() {
            let contents_url = format!("{}{}/vol1/1{}", self.base_url, novel_path, READER_MODE_PARAM);
            match self.fetch_text(&contents_url).await {
                Ok(contents_body) => {
                    let contents = Html::parse_document(&contents_body);
                    novel.chapters = self.parser.parse_chapter_refs(&contents);
                }
                Err(error) => warn!("contents page fetch failed for {novel_path}: {error}"),
            }
        }

        Ok(novel)
    }

    /// Fetches one chapter in reader mode and returns its readable markup,
    /// empty when no extraction strategy matches.
    pub async fn parse_chapter(&self, chapter_path: &str) -> Result<String> {
        let url = format!("{}{}{}", self.base_url, chapter_path, READER_MODE_PARAM);
        let body = self.fetch_text(&url).await?;
        Ok(content::extract_chapter_content(&body))
    }

    fn build_list_url(&self, page_no: u32, options: &PopularNovelsOptions) -> String {
        let sort = if options.show_latest_novels {
            Sort::Created
        } else {
            options.sort.unwrap_or_default()
        };
        let offset = page_no.saturating_sub(1) * PAGE_SIZE;

        // A category switches the path segment but keeps the sort parameter.
        match options.category.and_then(Category::slug) {
            Some(slug) => format!(
                "{}/list/category/{}?sortType={}&offset={}",
                self.base_url,
                slug,
                sort.query_value(),
                offset
            ),
            None => format!(
                "{}/list?sortType={}&offset={}",
                self.base_url,
                sort.query_value(),
                offset
            ),
        }
    }

    fn build_search_url(&self, search_term: &str) -> Result<String> {
        let mut url = reqwest::Url::parse(&format!("{}/search", self.base_url))?;
        url.query_pairs_mut().append_pair("q", search_term);
        Ok(url.to_string())
    }
}
