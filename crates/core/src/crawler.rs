//! The crawl loop.
//!
//! Strictly sequential: one in-flight request, product pages processed in
//! the order they were discovered (sorted). A failure on one URL never
//! aborts the batch — it is logged and the loop moves on, yielding at
//! most one record per URL. Cancellation is cooperative: a shared flag
//! checked between URLs stops further iteration while preserving the
//! records accumulated so far.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};
use url::Url;

use crate::builder::RecordBuilder;
use crate::fetch::Fetcher;
use crate::parse::Document;
use crate::record::ProductRecord;
use crate::urls::find_product_links;

/// Crawls collection pages into product records.
pub struct Crawler {
    fetcher: Fetcher,
    builder: RecordBuilder,
    cancelled: Arc<AtomicBool>,
}

impl Crawler {
    /// Creates a crawler from a fetcher and a compiled record builder.
    pub fn new(fetcher: Fetcher, builder: RecordBuilder) -> Self {
        Self { fetcher, builder, cancelled: Arc::new(AtomicBool::new(false)) }
    }

    /// A handle for requesting cancellation from another task, typically
    /// a ctrl-c handler.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Scans collection pages for product detail links.
    ///
    /// Links are resolved, query-stripped, classified, and deduplicated;
    /// the result is sorted so crawls are reproducible.
    pub async fn discover(&mut self, collection_urls: &[String]) -> Vec<String> {
        let mut found = BTreeSet::new();

        for (i, url) in collection_urls.iter().enumerate() {
            if self.is_cancelled() {
                info!("cancelled; stopping collection scan");
                break;
            }

            info!(page = i + 1, total = collection_urls.len(), url = %url, "scanning collection");

            let base = match Url::parse(url) {
                Ok(base) => base,
                Err(e) => {
                    warn!(url = %url, error = %e, "invalid collection URL, skipping");
                    continue;
                }
            };

            match self.fetcher.fetch(url).await {
                Ok(html) => {
                    let doc = Document::parse(&html);
                    let links = find_product_links(&doc, &base, self.builder.url_patterns());
                    info!(url = %url, count = links.len(), "found product links");
                    found.extend(links);
                }
                Err(e) => warn!(url = %url, error = %e, "failed to scan collection page"),
            }
        }

        found.into_iter().collect()
    }

    /// Crawls product detail pages in order and extracts records.
    ///
    /// Records with an empty title are discarded; fetch or parse failures
    /// skip the URL.
    pub async fn crawl(&mut self, product_urls: &[String]) -> Vec<ProductRecord> {
        let mut records = Vec::new();

        for (i, url) in product_urls.iter().enumerate() {
            if self.is_cancelled() {
                info!(kept = records.len(), "cancelled; stopping crawl");
                break;
            }

            info!(page = i + 1, total = product_urls.len(), url = %url, "crawling product");

            let html = match self.fetcher.fetch(url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(url = %url, error = %e, "fetch failed, skipping");
                    continue;
                }
            };

            let doc = match Document::parse_with_url(&html, url) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(url = %url, error = %e, "parse failed, skipping");
                    continue;
                }
            };

            let record = self.builder.build(&doc, url);
            if record.is_valid() {
                info!(title = %record.title(), "extracted");
                records.push(record);
            } else {
                warn!(url = %url, "no title found, discarding");
            }
        }

        records
    }

    /// Full run: discover product URLs, then crawl them.
    pub async fn run(&mut self, collection_urls: &[String]) -> Vec<ProductRecord> {
        let product_urls = self.discover(collection_urls).await;

        if product_urls.is_empty() {
            warn!("no product URLs found on collection pages");
            return Vec::new();
        }

        info!(count = product_urls.len(), "crawling product pages");
        self.crawl(&product_urls).await
    }
}
