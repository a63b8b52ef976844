use crate::core::model::FinancialSnapshot;
use crate::core::remote::RemoteSource;
use crate::providers::util::with_retry;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument};

const RETRIES: usize = 2;
const RETRY_DELAY_MS: u64 = 200;

/// Fetches the home snapshot as JSON from `{base_url}/home`.
pub struct HttpRemoteSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("expense-tracker/0.1")
            .build()?;
        Ok(HttpRemoteSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<FinancialSnapshot> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} URL: {}", response.status(), url));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| anyhow!("Failed to parse home data: {}", e))
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    #[instrument(name = "HttpRemoteFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&self) -> Result<FinancialSnapshot> {
        let url = format!("{}/home", self.base_url);
        debug!("Requesting home data from {}", url);

        let snapshot = with_retry(|| self.fetch_once(&url), RETRIES, RETRY_DELAY_MS).await?;
        debug!(
            expenses = snapshot.expenses.len(),
            transactions = snapshot.recent_transactions.len(),
            "Received home data"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/home"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let body = r#"{
            "user_name": "John",
            "balance": 34996.0,
            "expenses": [
                {"id": "1", "amount": 120.0, "date": "2024-05-21", "category": "Food"}
            ],
            "recipients": [],
            "recent_transactions": []
        }"#;
        let mock_server = create_mock_server(200, body).await;

        let source = HttpRemoteSource::new(&mock_server.uri()).unwrap();
        let snapshot = source.fetch().await.unwrap();

        assert_eq!(snapshot.user_name, "John");
        assert_eq!(snapshot.balance, Decimal::from(34996));
        assert_eq!(snapshot.expenses.len(), 1);
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let mock_server = create_mock_server(503, "unavailable").await;

        let source = HttpRemoteSource::new(&mock_server.uri()).unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(err.to_string().contains("HTTP error: 503"));
        // One initial attempt plus the retries
        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), RETRIES + 1);
    }

    #[tokio::test]
    async fn test_invalid_body_is_reported() {
        let mock_server = create_mock_server(200, r#"{"balance": 1}"#).await;

        let source = HttpRemoteSource::new(&format!("{}/", mock_server.uri())).unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(err.to_string().contains("Failed to parse home data"));
    }
}
