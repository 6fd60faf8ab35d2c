// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{artifact_image, dashboard_page, health_check, list_tabs, tab_view};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(health_check))
        .route("/api/tabs", get(list_tabs))
        .route("/api/tabs/:id", get(tab_view))
        .route("/artifacts/:section_id", get(artifact_image))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::freshness::FreshnessGate;
    use crate::infrastructure::config::DashboardConfig;
    use crate::infrastructure::fs_store::FsArtifactStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const LAYOUT: &str = r#"
        [[tabs]]
        id = "home"
        title = "Home Page"

        [[tabs.sections]]
        id = "spy-seasonality"
        title = "SPY Seasonality"
        artifact = "spy_seasonality"
        format = "png"

        [[tabs.sections]]
        id = "naaim"
        title = "NAAIM Exposure"
        artifact = "naaim_plot"
        format = "png"

        [[tabs]]
        id = "earnings"
        title = "Upcoming Earnings"

        [[tabs.sections]]
        id = "earnings-calendar"
        title = "Upcoming Earnings"
        artifact = "earnings_calendar"
        format = "csv"
    "#;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
    }

    fn app(dir: &TempDir) -> Router {
        let dashboard: DashboardConfig = toml::from_str(LAYOUT).unwrap();
        let store = FsArtifactStore::new(dir.path());
        let service = DashboardService::new(
            Arc::new(store),
            Arc::new(dashboard),
            FreshnessGate::default(),
        );
        router(Arc::new(AppState {
            dashboard_service: service,
            title: "Stock Market Dashboard".to_string(),
            today: fixed_today,
        }))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, body.to_vec())
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let (status, _, body) = get(app(&dir), "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_home_page_renders_with_missing_artifacts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("spy_seasonality_20240102.png"), b"\x89PNG").unwrap();

        let (status, content_type, body) = get(app(&dir), "/").await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(html.contains("<img class=\"chart\" src=\"/artifacts/spy-seasonality\""));
        assert!(html.contains("NAAIM Exposure: no artifact matching &#39;naaim_plot_*.png&#39; found."));
    }

    #[tokio::test]
    async fn test_unknown_tab_is_404() {
        let dir = TempDir::new().unwrap();
        let (status, _, _) = get(app(&dir), "/?tab=weekly").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get(app(&dir), "/api/tabs/weekly").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tab_json() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("earnings_calendar_20240102.csv"),
            "Ticker,Report Date\nAAPL,2024-01-25\nMSFT,2024-01-30\n",
        )
        .unwrap();

        let (status, _, body) = get(app(&dir), "/api/tabs/earnings").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let section = &json["sections"][0];
        assert_eq!(section["outcome"], "rendered");
        assert_eq!(section["artifact"], "earnings_calendar_20240102.csv");
        assert_eq!(section["body"]["kind"], "tables");
        assert_eq!(section["body"]["tables"][0]["count"], 2);
        assert_eq!(section["body"]["tables"][0]["caption"], "Upcoming Earnings — Count: 2");
    }

    #[tokio::test]
    async fn test_list_tabs() {
        let dir = TempDir::new().unwrap();
        let (status, _, body) = get(app(&dir), "/api/tabs").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["id"], "home");
        assert_eq!(json[1]["title"], "Upcoming Earnings");
    }

    #[tokio::test]
    async fn test_artifact_image() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("spy_seasonality_20240102.png"), b"\x89PNG").unwrap();

        let (status, content_type, body) = get(app(&dir), "/artifacts/spy-seasonality").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("image/png"));
        assert_eq!(body, b"\x89PNG");

        let (status, _, _) = get(app(&dir), "/artifacts/naaim").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get(app(&dir), "/artifacts/earnings-calendar").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
