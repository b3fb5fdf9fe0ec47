#[cfg(test)]
mod tests {
    use crate::error::WidgetError;
    use crate::locator::{ApiLocator, PageLocation};
    use bookit_common::services::MockBookingApi;
    use bookit_common::ApiError;
    use bookit_config::ApiConfig;
    use mockall::Sequence;

    fn locator_for(page_url: &str, config: ApiConfig) -> ApiLocator {
        ApiLocator::new(config, PageLocation::parse(page_url).expect("valid page url"))
    }

    fn refused() -> ApiError {
        ApiError::Transport("connection refused".to_string())
    }

    #[test]
    fn test_resolve_base_url_rule_table() {
        let config = ApiConfig::default();

        let from_disk = locator_for("file:///srv/site/index.html", config.clone());
        assert_eq!(from_disk.resolve_base_url(), "http://localhost:5000/api");

        let dev_port = locator_for("http://localhost:8001/", config.clone());
        assert_eq!(dev_port.resolve_base_url(), "http://localhost:8002/api");

        let production = locator_for("https://osb.productions/booking/", config.clone());
        assert_eq!(production.resolve_base_url(), "https://osb.productions/api");

        let other_local_port = locator_for("http://localhost:8000/", config.clone());
        assert_eq!(other_local_port.resolve_base_url(), "http://localhost:5000/api");

        let loopback = locator_for("http://127.0.0.1:8001/", config);
        assert_eq!(loopback.resolve_base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn test_auto_detect_off_always_uses_configured_url() {
        let config = ApiConfig {
            auto_detect: false,
            base_url: "https://api.example.com/api".to_string(),
            ..ApiConfig::default()
        };
        let locator = locator_for("https://osb.productions/", config);
        assert_eq!(locator.resolve_base_url(), "https://api.example.com/api");
    }

    #[test]
    fn test_candidates_are_primary_then_fallbacks_resolved_against_page() {
        let locator = locator_for("http://localhost:8000/", ApiConfig::default());
        assert_eq!(
            locator.candidates(),
            vec![
                "http://localhost:5000/api".to_string(),
                "http://localhost:8002/api".to_string(),
                "http://127.0.0.1:5000/api".to_string(),
                "http://localhost:8000/api".to_string(),
            ]
        );
    }

    #[test]
    fn test_invalid_page_url_is_a_configuration_error() {
        let config = ApiConfig {
            page_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            ApiLocator::from_config(config),
            Err(WidgetError::InvalidConfiguration(_))
        ));
    }

    #[tokio::test]
    async fn test_first_healthy_candidate_is_adopted() {
        let locator = locator_for("http://localhost:8000/", ApiConfig::default());
        let mut api = MockBookingApi::new();
        let mut seq = Sequence::new();
        api.expect_health()
            .withf(|url| url == "http://localhost:5000/api")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(refused()));
        api.expect_health()
            .withf(|url| url == "http://localhost:8002/api")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let adopted = locator.discover(&api).await.expect("a backend should be adopted");

        assert_eq!(adopted, "http://localhost:8002/api");
        assert_eq!(locator.base_url(), Ok("http://localhost:8002/api"));
    }

    #[tokio::test]
    async fn test_all_candidates_failing_is_no_backend_available() {
        let locator = locator_for("http://localhost:8000/", ApiConfig::default());
        let mut api = MockBookingApi::new();
        api.expect_health()
            .times(4)
            .returning(|_| Err(ApiError::Status { status: 502, message: None }));

        let result = locator.discover(&api).await;

        match result {
            Err(WidgetError::NoBackendAvailable { tried }) => assert_eq!(tried.len(), 4),
            other => panic!("expected NoBackendAvailable, got {:?}", other),
        }
        assert_eq!(locator.base_url(), Err(WidgetError::NotReady));
    }

    #[tokio::test]
    async fn test_adopted_url_is_never_reprobed() {
        let locator = locator_for("http://localhost:8000/", ApiConfig::default());
        let mut api = MockBookingApi::new();
        api.expect_health().times(1).returning(|_| Ok(()));

        let first = locator.discover(&api).await.unwrap();
        let second = locator.discover(&api).await.unwrap();

        assert_eq!(first, second);
    }
}
