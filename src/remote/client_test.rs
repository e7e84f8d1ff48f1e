#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::time::Duration;

    use crate::http::client::create_client;
    use crate::model::ControlError;
    use crate::remote::{is_running, HttpRemoteControl, RemoteControl, StateMap};
    use crate::support::StubService;

    fn remote(timeout: Duration) -> HttpRemoteControl {
        HttpRemoteControl::new(create_client(Duration::from_millis(200)).unwrap(), timeout)
    }

    #[tokio::test]
    async fn test_start_stop_and_state_round_trip() {
        let stub = StubService::start().await;
        let remote = remote(Duration::from_secs(2));

        remote.start(&stub.addr(), "/api/processing/start").await.unwrap();
        let state = remote.query_state(&stub.addr(), "/api/processing/state").await.unwrap();
        assert!(is_running(&state));

        remote.stop(&stub.addr(), "/api/processing/stop").await.unwrap();
        let state = remote.query_state(&stub.addr(), "/api/processing/state").await.unwrap();
        assert!(!is_running(&state));

        assert_eq!(
            stub.calls(),
            vec![
                "POST /api/processing/start",
                "GET /api/processing/state",
                "POST /api/processing/stop",
                "GET /api/processing/state",
            ]
        );
        stub.close().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_remote_unavailable() {
        let stub = StubService::start().await;
        stub.set_failing(true);
        let remote = remote(Duration::from_secs(2));

        let err = remote.start(&stub.addr(), "/api/processing/start").await.unwrap_err();
        assert!(matches!(err, ControlError::RemoteUnavailable(_)), "got {:?}", err);
        stub.close().await;
    }

    #[tokio::test]
    async fn test_unreachable_address_is_remote_unavailable() {
        let remote = remote(Duration::from_millis(500));
        let err = remote
            .query_state("http://127.0.0.1:9", "/api/processing/state")
            .await
            .unwrap_err();
        assert!(matches!(err, ControlError::RemoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_hanging_downstream_times_out() {
        let stub = StubService::start().await;
        stub.set_hanging(true);
        let remote = remote(Duration::from_millis(200));

        let err = remote
            .query_state(&stub.addr(), "/api/processing/state")
            .await
            .unwrap_err();
        assert!(matches!(err, ControlError::RemoteUnavailable(_)));
        stub.close().await;
    }

    #[tokio::test]
    async fn test_malformed_state_document() {
        let stub = StubService::start().await;
        stub.set_malformed_state(true);
        let remote = remote(Duration::from_secs(2));

        let err = remote
            .query_state(&stub.addr(), "/api/processing/state")
            .await
            .unwrap_err();
        assert!(matches!(err, ControlError::RemoteMalformedResponse(_)));
        stub.close().await;
    }

    #[tokio::test]
    async fn test_listing_is_returned_verbatim() {
        let stub = StubService::start().await;
        let remote = remote(Duration::from_secs(2));

        let files = remote.list_processed_files(&stub.addr(), "/files/processed").await.unwrap();
        assert_eq!(files["processedCount"], json!(1));
        assert_eq!(files["path"], json!("/files/processed"));
        stub.close().await;
    }

    #[test]
    fn test_is_running_reads_enabled_or_processing() {
        let mut state = StateMap::new();
        assert!(!is_running(&state));

        state.insert("processing".to_string(), json!(true));
        assert!(is_running(&state));

        state.insert("processing".to_string(), json!("true"));
        assert!(!is_running(&state), "only boolean true counts");

        state.insert("enabled".to_string(), json!(true));
        assert!(is_running(&state));
    }
}
