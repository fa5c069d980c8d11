use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use tokio::sync::Mutex;

use crate::config::PricingConfig;

/// Marketplace pages the prices are scraped from. Pluggable so tests can
/// feed canned HTML instead of hitting the network.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> anyhow::Result<String>;
    fn page_count(&self) -> u32;
}

/// Scrapes the Cardmarket singles listing, paginated.
pub struct CardmarketSource {
    client: reqwest::Client,
    base_url: String,
    pages: u32,
}

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123 Safari/537.36";

impl CardmarketSource {
    pub fn new(cfg: &PricingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: cfg.base_url.clone(),
            pages: cfg.pages,
        }
    }
}

#[async_trait]
impl PriceSource for CardmarketSource {
    async fn fetch_page(&self, page: u32) -> anyhow::Result<String> {
        let url = format!(
            "{}?searchMode=v1&idCategory=1655&idExpansion=6286&idRarity=0&sortBy=collectorsnumber_desc&site={page}",
            self.base_url
        );
        let res = self
            .client
            .get(&url)
            // The marketplace serves a challenge page to non-browser agents.
            .header(USER_AGENT, BROWSER_UA)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        anyhow::ensure!(res.status().is_success(), "fetch page {page}: {}", res.status());
        Ok(res.text().await?)
    }

    fn page_count(&self) -> u32 {
        self.pages
    }
}

/// Parse a European price string (`1.234,56`, `1,5`, `2.5`) into a float.
pub fn parse_euro(input: &str) -> Option<f64> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let raw = compact.trim_end_matches('€');
    let normalized = if raw.contains(',') && raw.contains('.') {
        // Dot is the thousands separator when both appear.
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.replace(',', ".")
    };
    let v: f64 = normalized.parse().ok()?;
    v.is_finite().then_some(v)
}

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(OG[NS]-\d+[a-z]?).{0,400}?(?:Starting\s+from|From)\s*([\d.,]+)\s*€")
        .expect("valid price pattern")
});

/// Scan listing HTML for `(collector number, starting price)` pairs.
pub fn extract_prices(html: &str) -> Vec<(String, f64)> {
    PRICE_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let code = caps[1].to_uppercase();
            parse_euro(&caps[2]).map(|price| (code, price))
        })
        .collect()
}

struct CacheEntry {
    fetched_at: Instant,
    prices: HashMap<String, f64>,
}

/// TTL cache over the scraped price map.
///
/// Initialized empty and injected through `AppState`; invalidated by TTL
/// expiry or an explicit `force` refresh. Holding the lock across a
/// refresh serializes concurrent refreshes of the same cache.
pub struct PriceCache {
    ttl: Duration,
    inner: Mutex<Option<CacheEntry>>,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(None),
        }
    }

    /// Return `(prices, served_from_cache)`.
    pub async fn get(&self, force: bool, source: &dyn PriceSource) -> (HashMap<String, f64>, bool) {
        let mut guard = self.inner.lock().await;
        if !force {
            if let Some(entry) = guard.as_ref() {
                if entry.fetched_at.elapsed() < self.ttl && !entry.prices.is_empty() {
                    return (entry.prices.clone(), true);
                }
            }
        }

        let prices = refresh(source).await;
        *guard = Some(CacheEntry {
            fetched_at: Instant::now(),
            prices: prices.clone(),
        });
        (prices, false)
    }
}

/// Best-effort scan of every listing page. A failed page degrades to "no
/// data for its codes" rather than failing the whole refresh; per code
/// the lowest observed price wins.
async fn refresh(source: &dyn PriceSource) -> HashMap<String, f64> {
    let mut map: HashMap<String, f64> = HashMap::new();
    for page in 1..=source.page_count() {
        match source.fetch_page(page).await {
            Ok(html) => {
                for (code, price) in extract_prices(&html) {
                    map.entry(code)
                        .and_modify(|p| {
                            if price < *p {
                                *p = price;
                            }
                        })
                        .or_insert(price);
                }
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "price page fetch failed");
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn parse_euro_handles_separator_combinations() {
        assert_eq!(parse_euro("1,5 €"), Some(1.5));
        assert_eq!(parse_euro("2.5"), Some(2.5));
        assert_eq!(parse_euro("1.234,56 €"), Some(1234.56));
        assert_eq!(parse_euro("0,20€"), Some(0.2));
        assert_eq!(parse_euro("garbage"), None);
    }

    #[test]
    fn extract_prices_finds_code_price_pairs() {
        let html = r#"
            <tr><td>ogn-001 Jinx</td><td>From 1,50 €</td></tr>
            <tr><td>OGN-012a Viktor</td><td>Starting from 0,20 €</td></tr>
            <tr><td>OGS-003 no price here</td></tr>
        "#;
        let prices = extract_prices(html);
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0], ("OGN-001".to_string(), 1.5));
        assert_eq!(prices[1], ("OGN-012A".to_string(), 0.2));
    }

    struct StubSource {
        pages: Vec<anyhow::Result<String>>,
        calls: AtomicU32,
    }

    impl StubSource {
        fn new(pages: Vec<anyhow::Result<String>>) -> Self {
            Self {
                pages,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl PriceSource for StubSource {
        async fn fetch_page(&self, page: u32) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.pages[(page - 1) as usize] {
                Ok(html) => Ok(html.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }

        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }
    }

    fn page(code: &str, price: &str) -> String {
        format!("<tr>{code} From {price} €</tr>")
    }

    #[tokio::test]
    async fn fresh_entry_is_served_from_cache() {
        let source = StubSource::new(vec![Ok(page("OGN-001", "1,50"))]);
        let cache = PriceCache::new(Duration::from_secs(3600));

        let (first, cached) = cache.get(false, &source).await;
        assert!(!cached);
        assert_eq!(first["OGN-001"], 1.5);

        let (_, cached) = cache.get(false, &source).await;
        assert!(cached);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn force_bypasses_fresh_cache() {
        let source = StubSource::new(vec![Ok(page("OGN-001", "1,50"))]);
        let cache = PriceCache::new(Duration::from_secs(3600));

        cache.get(false, &source).await;
        let (_, cached) = cache.get(true, &source).await;
        assert!(!cached);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_ttl_triggers_refetch() {
        let source = StubSource::new(vec![Ok(page("OGN-001", "1,50"))]);
        let cache = PriceCache::new(Duration::ZERO);

        cache.get(false, &source).await;
        let (_, cached) = cache.get(false, &source).await;
        assert!(!cached);
    }

    #[tokio::test]
    async fn failed_page_keeps_other_pages_data() {
        let source = StubSource::new(vec![
            Ok(page("OGN-001", "1,50")),
            Err(anyhow::anyhow!("boom")),
            Ok(page("OGN-003", "0,30")),
        ]);
        let cache = PriceCache::new(Duration::from_secs(3600));

        let (prices, _) = cache.get(false, &source).await;
        assert_eq!(prices.len(), 2);
        assert_eq!(prices["OGN-001"], 1.5);
        assert_eq!(prices["OGN-003"], 0.3);
    }

    #[tokio::test]
    async fn lowest_observed_price_wins() {
        let source = StubSource::new(vec![
            Ok(page("OGN-001", "1,50")),
            Ok(page("OGN-001", "0,90")),
        ]);
        let cache = PriceCache::new(Duration::from_secs(3600));

        let (prices, _) = cache.get(false, &source).await;
        assert_eq!(prices["OGN-001"], 0.9);
    }
}
