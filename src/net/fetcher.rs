//! Product server client.
//!
//! Every failure (bad URL, transport, decode) collapses to an empty list.
//! There is no retry and no cancellation.

use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::state::data::Product;

#[derive(Debug, Clone)]
pub struct ProductFetcher {
    base_url: String,
    http: Client,
}

impl ProductFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/selectVinoble?region={region}&wineType={wine_type}`
    pub fn listing_url(&self, region: i64, wine_type: i64) -> String {
        format!(
            "{}/selectVinoble?region={}&wineType={}",
            self.base_url, region, wine_type
        )
    }

    /// `{base}/searchProduct?searchProduct={query}` with the query percent-encoded
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/searchProduct?searchProduct={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    pub async fn fetch_listing(&self, region: i64, wine_type: i64) -> Vec<Product> {
        self.fetch(&self.listing_url(region, wine_type)).await
    }

    pub async fn search(&self, query: &str) -> Vec<Product> {
        self.fetch(&self.search_url(query)).await
    }

    /// GET `url` and decode a JSON array of products. Empty on any failure.
    pub async fn fetch(&self, url: &str) -> Vec<Product> {
        match self.try_fetch(url).await {
            Ok(products) => {
                debug!(url, count = products.len(), "fetched products");
                products
            }
            Err(err) => {
                warn!(url, error = %err, "product fetch failed; using empty list");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> AppResult<Vec<Product>> {
        let url = Url::parse(url).map_err(|_| AppError::InvalidUrl(url.to_string()))?;

        // The body is decoded whatever the status; an error page fails decoding
        let body = self.http.get(url).send().await?.bytes().await?;
        decode_products(&body)
    }
}

pub fn decode_products(body: &[u8]) -> AppResult<Vec<Product>> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::testing::serve_once;
    use tokio::net::TcpListener;

    #[test]
    fn test_urls() {
        let fetcher = ProductFetcher::new("http://localhost:5000/");
        assert_eq!(
            fetcher.listing_url(2, 1),
            "http://localhost:5000/selectVinoble?region=2&wineType=1"
        );
        assert_eq!(
            fetcher.search_url("pinot noir & co"),
            "http://localhost:5000/searchProduct?searchProduct=pinot%20noir%20%26%20co"
        );
    }

    #[test]
    fn test_decode_keeps_order() {
        let products =
            decode_products(br#"[{"index": 4}, {"index": 2, "name": "Rioja"}, {"index": 9}]"#)
                .unwrap();
        let indexes: Vec<i64> = products.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![4, 2, 9]);
    }

    #[test]
    fn test_decode_rejects_non_arrays() {
        assert!(decode_products(b"").is_err());
        assert!(decode_products(br#"{"index": 1}"#).is_err());
        assert!(decode_products(br#"[{"name": "no index"}]"#).is_err());
    }

    #[tokio::test]
    async fn test_fetch_listing_from_server() {
        let (base, request) = serve_once(
            "200 OK",
            r#"[{"index": 10, "name": "Sancerre"}, {"index": 11, "name": "Chablis"}]"#,
        )
        .await;

        let fetcher = ProductFetcher::new(&base);
        let products = fetcher.fetch_listing(3, 1).await;

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].index, 10);
        assert_eq!(products[1].display_name(), "Chablis");

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /selectVinoble?region=3&wineType=1 "));
    }

    #[tokio::test]
    async fn test_malformed_body_yields_empty() {
        let (base, _request) = serve_once("200 OK", "<html>oops</html>").await;
        let fetcher = ProductFetcher::new(&base);
        assert!(fetcher.search("merlot").await.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_with_product_body_still_decodes() {
        let (base, _request) = serve_once(
            "500 Internal Server Error",
            r#"[{"index": 40, "name": "Tokaji"}, {"index": 41}]"#,
        )
        .await;

        let products = ProductFetcher::new(&base).fetch_listing(1, 1).await;
        let indexes: Vec<i64> = products.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![40, 41]);
    }

    #[tokio::test]
    async fn test_not_found_page_yields_empty() {
        let (base, _request) =
            serve_once("404 Not Found", "<html><body>Not Found</body></html>").await;
        let fetcher = ProductFetcher::new(&base);
        assert!(fetcher.search("gamay").await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_url_and_transport_errors_yield_empty() {
        let fetcher = ProductFetcher::new("not a url");
        assert!(fetcher.fetch_listing(0, 0).await.is_empty());

        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = ProductFetcher::new(&format!("http://{addr}"));
        assert!(fetcher.fetch_listing(0, 0).await.is_empty());
    }
}
