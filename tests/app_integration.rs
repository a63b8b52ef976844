use expense_tracker::core::config::AppConfig;
use expense_tracker::core::{DataOrigin, TimeRange};
use expense_tracker::home::{HomeOptions, HomeStateHolder};
use futures::StreamExt;
use rust_decimal::Decimal;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const HOME_RESPONSE: &str = r#"
    {
        "user_name": "Jane (Network)",
        "balance": 1234.5,
        "expenses": [
            {"id": "e1", "amount": 20.0, "date": "2024-06-01", "category": "Food"},
            {"id": "e2", "amount": 35.5, "date": "2024-06-03", "category": "Transport"}
        ],
        "recipients": [
            {"id": "r1", "name": "Alice", "avatar_ref": null, "recent_amount": 20.0}
        ],
        "recent_transactions": [
            {
                "id": "t1", "amount": 20.0, "date": "2024-06-01", "recipient_id": "r1",
                "recipient_name": "Alice", "category": "Food", "is_income": false
            }
        ]
    }"#;

    pub async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/home"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(
        dir: &std::path::Path,
        store: &str,
        base_url: &str,
        connectivity: &str,
    ) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
store:
  kind: {store}
  path: {}
remote:
  kind: http
  base_url: "{base_url}"
connectivity:
  kind: {connectivity}
default_range: 1Y
grace_period_ms: 50
"#,
            dir.join("store").display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server(200, test_utils::HOME_RESPONSE).await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), "memory", &mock_server.uri(), "online");

    let result = expense_tracker::run_command(
        expense_tracker::AppCommand::Home {
            range: Some(TimeRange::OneYear),
            refresh: true,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_offline_first_launch_shows_placeholder() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path =
        test_utils::write_config(dir.path(), "disk", "http://127.0.0.1:9", "offline");

    let result = expense_tracker::run_command(
        expense_tracker::AppCommand::Home {
            range: None,
            refresh: true,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Offline launch failed: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_refreshed_snapshot_is_cached_on_disk() {
    let mock_server = test_utils::create_mock_server(200, test_utils::HOME_RESPONSE).await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), "disk", &mock_server.uri(), "online");

    let config = AppConfig::load_from_path(&config_path).unwrap();
    let repository = expense_tracker::build_repository(&config).await.unwrap();
    let origins: Vec<DataOrigin> = repository
        .fetch_snapshot(false)
        .map(|result| result.unwrap().origin)
        .collect()
        .await;
    // Placeholder from the first-launch seed, then the server's data
    assert_eq!(origins, vec![DataOrigin::Local, DataOrigin::Remote]);

    let results: Vec<_> = repository.fetch_snapshot(true).collect().await;
    assert_eq!(results.len(), 1);
    let cached = results[0].as_ref().unwrap();
    info!(?cached, "Read cached snapshot");
    assert_eq!(cached.origin, DataOrigin::Local);
    // Stored verbatim; the origin marker is only stripped for display
    assert_eq!(cached.snapshot.user_name, "Jane (Network)");
    assert_eq!(cached.snapshot.balance, Decimal::new(12345, 1));
    assert_eq!(cached.snapshot.expenses.len(), 2);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_state_holder_with_http_remote() {
    let mock_server = test_utils::create_mock_server(200, test_utils::HOME_RESPONSE).await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), "memory", &mock_server.uri(), "online");
    let config = AppConfig::load_from_path(&config_path).unwrap();

    let repository = expense_tracker::build_repository(&config).await.unwrap();
    let holder = HomeStateHolder::new(
        repository,
        HomeOptions {
            initial_range: config.default_range,
            grace_period: config.grace_period(),
            today: std::sync::Arc::new(|| chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
        },
    );
    let mut updates = holder.subscribe();
    holder.settled().await;

    holder.reload();
    let state = updates
        .wait_for(|s| s.snapshot.as_ref().is_some_and(|s| s.user_name == "Jane"))
        .await
        .unwrap()
        .clone();
    assert_eq!(state.selected_range, TimeRange::OneYear);
    assert_eq!(state.chart_expenses.len(), 2);

    holder.settled().await;
    let state = holder.current();
    assert!(!state.is_loading);
    assert!(state.error.is_none());
    assert_eq!(state.data_origin, Some(DataOrigin::Remote));
}

#[test_log::test(tokio::test)]
async fn test_server_error_without_cache_is_reported() {
    let mock_server = test_utils::create_mock_server(500, "boom").await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), "memory", &mock_server.uri(), "online");
    let config = AppConfig::load_from_path(&config_path).unwrap();

    // Skip build_repository so the store is not seeded
    let repository = expense_tracker::repository::Repository::new(
        expense_tracker::store::open_store(&config).unwrap(),
        expense_tracker::providers::remote_source(&config).unwrap(),
        expense_tracker::providers::connectivity_check(&config),
    );
    let results: Vec<_> = repository.fetch_snapshot(false).collect().await;

    assert_eq!(results.len(), 1);
    let err = results[0].as_ref().unwrap_err();
    assert!(err.to_string().contains("HTTP error: 500"));
}
