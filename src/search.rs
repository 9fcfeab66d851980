use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::utils::strip_markup;

pub const PAGE_SIZE: usize = 7;
const SORT_ORDER: &str = "random";
const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

#[derive(Debug, Error)]
pub enum SearchError {
    /// Provider answered with something other than 200; `body` is verbatim.
    #[error("Place Search API 오류: {body}")]
    Provider { status: u16, body: String },
    #[error("Place Search API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceResult {
    pub title: String,
    pub address: String,
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    title: String,
    address: String,
    #[serde(default)]
    link: String,
}

impl From<RawPlace> for PlaceResult {
    fn from(raw: RawPlace) -> Self {
        Self {
            title: strip_markup(&raw.title),
            address: strip_markup(&raw.address),
            link: raw.link,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: Url,
    client_id: String,
    client_secret: String,
}

impl SearchClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.search_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    /// One request, no retry. Ordering is whatever the provider returns.
    pub async fn search(&self, query: &str) -> Result<Vec<PlaceResult>, SearchError> {
        info!("Searching places for: {}", query);
        let display = PAGE_SIZE.to_string();
        let params = [
            ("query", query),
            ("sort", SORT_ORDER),
            ("display", display.as_str()),
        ];

        debug!("Sending request to {} with params: {:?}", self.endpoint, params);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&params)
            .header(CLIENT_ID_HEADER, &self.client_id)
            .header(CLIENT_SECRET_HEADER, &self.client_secret)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await?;
            error!("Place Search API error. Status: {}", status);
            error!("Error body: {}", body);
            return Err(SearchError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.json::<SearchResponse>().await?;
        let places: Vec<PlaceResult> = payload
            .items
            .into_iter()
            .take(PAGE_SIZE)
            .map(PlaceResult::from)
            .collect();
        info!("Found {} places", places.len());
        debug!("Places: {:?}", places);
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LOCAL_SEARCH_PATH: &str = "/v1/search/local.json";

    fn client_for(server: &MockServer) -> SearchClient {
        let config = Config::for_endpoint(&format!("{}{}", server.uri(), LOCAL_SEARCH_PATH));
        SearchClient::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn sends_credentials_and_fixed_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LOCAL_SEARCH_PATH))
            .and(query_param("query", "서울 매운 한식 맛집"))
            .and(query_param("sort", "random"))
            .and(query_param("display", "7"))
            .and(header("X-Naver-Client-Id", "test-id"))
            .and(header("X-Naver-Client-Secret", "test-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "items": [{
                    "title": "<b>매운</b> 갈비찜",
                    "address": "서울특별시 <i>중구</i>",
                    "link": "https://example.com/galbi",
                    "category": "한식>찜,조림",
                    "mapx": "1269780000"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let places = client_for(&server).search("서울 매운 한식 맛집").await.unwrap();
        assert_eq!(
            places,
            vec![PlaceResult {
                title: "매운 갈비찜".to_string(),
                address: "서울특별시 중구".to_string(),
                link: "https://example.com/galbi".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn non_success_status_carries_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LOCAL_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("서울 맛집").await.unwrap_err();
        match &err {
            SearchError::Provider { status, body } => {
                assert_eq!(*status, 503);
                assert_eq!(body, "service unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "Place Search API 오류: service unavailable");
    }

    #[tokio::test]
    async fn malformed_success_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("서울 맛집").await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
    }

    #[tokio::test]
    async fn missing_link_defaults_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"title": "골목 식당", "address": "부산"}]
            })))
            .mount(&server)
            .await;

        let places = client_for(&server).search("부산 맛집").await.unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].link, "");
    }

    #[tokio::test]
    async fn results_are_capped_at_page_size() {
        let server = MockServer::start().await;
        let items: Vec<_> = (0..12)
            .map(|i| json!({"title": format!("식당 {i}"), "address": "서울", "link": ""}))
            .collect();
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
            .mount(&server)
            .await;

        let places = client_for(&server).search("서울 맛집").await.unwrap();
        assert_eq!(places.len(), PAGE_SIZE);
        assert_eq!(places[0].title, "식당 0");
        assert_eq!(places[6].title, "식당 6");
    }
}
