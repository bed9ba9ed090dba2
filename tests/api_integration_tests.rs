// API Integration Tests
//
// Purpose: exercise every endpoint against the in-memory fixture
// Run with: cargo test --features api --test api_integration_tests

mod common;

#[cfg(feature = "api")]
mod api_tests {
    use super::common;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sector_scorer::api_server::{create_router, AppState};
    use sector_scorer::{MemorySource, RegionScorer};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt; // for oneshot

    fn create_test_app(source: MemorySource) -> axum::Router {
        let state = AppState::new(RegionScorer::new(Arc::new(source)));
        create_router(state)
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        (status, serde_json::from_slice(&body).expect("Failed to parse JSON"))
    }

    // =========================================================================
    // Section 1: Service endpoints
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let (status, json) = get(create_test_app(common::full_source()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_root() {
        let (status, json) = get(create_test_app(common::full_source()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["version"].is_string());
    }

    // =========================================================================
    // Section 2: Scoring
    // =========================================================================

    #[tokio::test]
    async fn test_recommendation_endpoint() {
        let (status, json) = get(create_test_app(common::full_source()), "/recommendations/Mu%C4%9Fla").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["region"], "Muğla");
        assert_eq!(json["topSectors"][0]["sector"], "Hizmetler");
        assert_eq!(json["topSectors"][0]["score"], 1.0);
        assert_eq!(json["opportunities"].as_array().unwrap().len(), 3);
        assert_eq!(json["recommendation"]["actions"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_region_returns_error_payload() {
        let (status, json) = get(create_test_app(common::full_source()), "/recommendations/Atlantis").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["error"], "region not found (nominal output): Atlantis");
    }

    #[tokio::test]
    async fn test_all_recommendations_endpoint() {
        let (_, json) = get(create_test_app(common::full_source()), "/recommendations").await;
        assert_eq!(json["count"], 3);
        assert_eq!(json["items"][0]["region"], "Ankara");
        assert!(json["items"][2]["error"].is_string());
    }

    // =========================================================================
    // Section 3: Views and audit
    // =========================================================================

    #[tokio::test]
    async fn test_view_endpoints() {
        let app = create_test_app(common::full_source());

        let (_, nominal) = get(app.clone(), "/nominal/Ankara").await;
        assert_eq!(nominal["year"], 2022);
        assert_eq!(nominal["sectors"].as_array().unwrap().len(), 5);

        let (_, growth) = get(app.clone(), "/growth/Ankara").await;
        assert_eq!(growth["years"], serde_json::json!([2021, 2022, 2023]));

        let (_, renewables) = get(app, "/renewables/Mu%C4%9Fla").await;
        assert_eq!(renewables["suggestions"][1]["title"], "Rüzgar enerjisi");
    }

    #[tokio::test]
    async fn test_health_audit_endpoint() {
        let app = create_test_app(common::full_source());

        let (_, all) = get(app.clone(), "/health-audit").await;
        assert_eq!(all["summary"]["total"], 2);

        let (_, one) = get(app, "/health-audit?region=ankara").await;
        assert_eq!(one["summary"]["total"], 1);
        assert_eq!(one["results"][0]["doctorPer100k"], 300.0);
    }

    #[tokio::test]
    async fn test_missing_tables_surface_as_errors() {
        let (status, json) = get(create_test_app(MemorySource::new()), "/nominal/Ankara").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["error"], "data file not found: nominal output");
    }
}
