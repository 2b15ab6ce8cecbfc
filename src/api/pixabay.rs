use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

use super::traits::{ImagePage, ImageRecord, ImageSource, PageRequest, SourceFuture};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    total_hits: usize,
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    id: u64,
    #[serde(rename = "webformatURL")]
    webformat_url: String,
    #[serde(rename = "largeImageURL")]
    large_image_url: String,
    #[serde(default)]
    tags: String,
}

impl From<Hit> for ImageRecord {
    fn from(hit: Hit) -> Self {
        Self {
            id: hit.id,
            thumbnail_url: hit.webformat_url,
            full_size_url: hit.large_image_url,
            tags: hit.tags,
        }
    }
}

pub fn parse_search_response(body: &[u8]) -> AppResult<ImagePage> {
    let parsed: SearchResponse =
        serde_json::from_slice(body).map_err(|err| AppError::decode(err.to_string()))?;
    Ok(ImagePage {
        records: parsed.hits.into_iter().map(ImageRecord::from).collect(),
        total_hits: parsed.total_hits,
    })
}

/// The search URL carries the API key in its query string; it must not reach
/// notices or the log.
fn redact_url(err: reqwest::Error) -> AppError {
    AppError::from(err.without_url())
}

#[derive(Debug, Clone)]
pub struct PixabayClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
    image_type: String,
    orientation: String,
}

impl PixabayClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("imf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            key: config.key.clone(),
            image_type: config.image_type.clone(),
            orientation: config.orientation.clone(),
        })
    }

    fn query_params(&self, request: &PageRequest) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.key.clone()),
            ("q", request.query.clone()),
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
            ("image_type", self.image_type.clone()),
            ("orientation", self.orientation.clone()),
        ]
    }
}

impl ImageSource for PixabayClient {
    fn search(&self, request: PageRequest) -> SourceFuture<ImagePage> {
        let http = self.http.clone();
        let url = self.base_url.clone();
        let params = self.query_params(&request);
        Box::pin(async move {
            tracing::debug!(query = %request.query, page = request.page, "requesting page");
            let response = http
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(redact_url)?;
            let status = response.status();
            if !status.is_success() {
                return Err(AppError::status(status.as_u16(), url));
            }
            let body = response.bytes().await.map_err(redact_url)?;
            parse_search_response(&body)
        })
    }

    fn download(&self, url: &str) -> SourceFuture<Vec<u8>> {
        let http = self.http.clone();
        let url = url.to_string();
        Box::pin(async move {
            let response = http.get(&url).send().await.map_err(redact_url)?;
            let status = response.status();
            if !status.is_success() {
                return Err(AppError::status(status.as_u16(), url));
            }
            Ok(response.bytes().await.map_err(redact_url)?.to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{ImageSource, PageRequest};
    use crate::config::ApiConfig;
    use crate::error::AppError;

    use super::{PixabayClient, parse_search_response};

    const SAMPLE: &str = r#"{
        "total": 4692,
        "totalHits": 500,
        "hits": [
            {
                "id": 195893,
                "pageURL": "https://pixabay.com/en/blossom-bloom-flower-195893/",
                "type": "photo",
                "tags": "blossom, bloom, flower",
                "previewURL": "https://cdn.pixabay.com/photo/2013/10/15/09/12/flower-195893_150.jpg",
                "webformatURL": "https://pixabay.com/get/35bbf209e13e39d2_640.jpg",
                "largeImageURL": "https://pixabay.com/get/ed6a99fd0a76647_1280.jpg",
                "likes": 571
            },
            {
                "id": 73424,
                "webformatURL": "https://pixabay.com/get/a_640.jpg",
                "largeImageURL": "https://pixabay.com/get/a_1280.jpg"
            }
        ]
    }"#;

    #[test]
    fn parse_search_response_keeps_order_and_total_hits() {
        let page = parse_search_response(SAMPLE.as_bytes()).expect("sample should parse");
        assert_eq!(page.total_hits, 500);
        assert_eq!(page.records.len(), 2);

        let first = &page.records[0];
        assert_eq!(first.id, 195893);
        assert_eq!(first.tags, "blossom, bloom, flower");
        assert_eq!(
            first.thumbnail_url,
            "https://pixabay.com/get/35bbf209e13e39d2_640.jpg"
        );
        assert_eq!(
            first.full_size_url,
            "https://pixabay.com/get/ed6a99fd0a76647_1280.jpg"
        );

        assert_eq!(page.records[1].id, 73424);
        assert_eq!(page.records[1].tags, "");
    }

    #[test]
    fn parse_search_response_rejects_malformed_body() {
        let err = parse_search_response(b"[ERROR 400] \"key\" is invalid")
            .expect_err("plain text body should fail");
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn query_params_carry_fixed_filters() {
        let config = ApiConfig {
            key: "k".to_string(),
            ..ApiConfig::default()
        };
        let client = PixabayClient::new(&config).expect("client should build");
        let params = client.query_params(&PageRequest {
            query: "red fox".to_string(),
            page: 3,
            per_page: 12,
        });

        assert!(params.contains(&("key", "k".to_string())));
        assert!(params.contains(&("q", "red fox".to_string())));
        assert!(params.contains(&("page", "3".to_string())));
        assert!(params.contains(&("per_page", "12".to_string())));
        assert!(params.contains(&("image_type", "photo".to_string())));
        assert!(params.contains(&("orientation", "horizontal".to_string())));
    }

    #[test]
    fn transport_errors_do_not_expose_api_key() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1/api/".to_string(),
            key: "SECRETKEY123".to_string(),
            timeout_ms: 2_000,
            ..ApiConfig::default()
        };
        let client = PixabayClient::new(&config).expect("client should build");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime should initialize");

        let err = runtime
            .block_on(client.search(PageRequest {
                query: "cats".to_string(),
                page: 1,
                per_page: 12,
            }))
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, AppError::Http(_)));
        assert!(!err.to_string().contains("SECRETKEY123"));
        assert!(!format!("{err:?}").contains("SECRETKEY123"));
    }
}
