/// OMDb API provider
///
/// API Flow:
/// 1. Title Search: `?t=<title>` → best match, including its IMDB ID
/// 2. Details: `?i=<imdb_id>` → full record for one title
///
/// Misses are reported in-band as `{"Response": "False", "Error": "..."}`
/// with a 200 status.
use crate::{
    error::{AppError, AppResult},
    models::{CatalogId, MetadataRecord},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(flatten)]
    record: MetadataRecord,
}

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }

    /// Issues one OMDb request with the API key and the given parameters
    async fn request(&self, params: &[(&str, &str)]) -> AppResult<MetadataRecord> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let parsed: OmdbResponse = response.json().await?;

        if parsed.response.as_deref() == Some("False") {
            return Err(AppError::NotFound(
                parsed.error.unwrap_or_else(|| "No matching title".to_string()),
            ));
        }

        Ok(parsed.record)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for OmdbProvider {
    #[instrument(skip(self), fields(provider = "omdb"))]
    async fn search_title(&self, query: &str) -> AppResult<MetadataRecord> {
        let record = self.request(&[("t", query)]).await?;

        tracing::info!(
            query = %query,
            catalog_id = %record.catalog_id,
            "OMDb title search completed"
        );

        Ok(record)
    }

    #[instrument(skip(self, id), fields(provider = "omdb", catalog_id = %id))]
    async fn lookup(&self, id: &CatalogId) -> AppResult<MetadataRecord> {
        let record = self.request(&[("i", id.as_str())]).await?;

        tracing::debug!(catalog_id = %id, title = %record.title, "OMDb lookup completed");

        Ok(record)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OmdbProvider {
        OmdbProvider::new(HttpClient::new(), "test-key".to_string(), server.uri())
    }

    #[tokio::test]
    async fn test_search_title_sends_key_and_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("t", "the mist"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "The Mist",
                "imdbID": "tt0884328",
                "Response": "True"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = provider(&server).search_title("the mist").await.unwrap();
        assert_eq!(record.title, "The Mist");
        assert_eq!(record.id(), Some(CatalogId::new("tt0884328")));
    }

    #[tokio::test]
    async fn test_lookup_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("i", "tt0078748"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "Alien",
                "imdbID": "tt0078748",
                "Type": "movie",
                "Year": "1979",
                "imdbRating": "8.5",
                "Response": "True"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = provider(&server)
            .lookup(&CatalogId::new("tt0078748"))
            .await
            .unwrap();
        assert_eq!(record.year, "1979");
        assert_eq!(record.audience_rating, "8.5");
    }

    #[tokio::test]
    async fn test_in_band_miss_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": "False",
                "Error": "Movie not found!"
            })))
            .mount(&server)
            .await;

        let result = provider(&server).search_title("zzzz").await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Movie not found!"));
    }

    #[tokio::test]
    async fn test_error_status_is_external_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key!"))
            .mount(&server)
            .await;

        let result = provider(&server).lookup(&CatalogId::new("tt1")).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_http_client_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = provider(&server).lookup(&CatalogId::new("tt1")).await;
        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }
}
