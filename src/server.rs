use crate::error::ReportError;
use crate::filter::{SeverityFilter, Summary, ViewFilter};
use crate::store::ReportStore;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReportStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: ReportStore) -> Self {
        Self {
            store: Arc::new(store),
            started_at: Instant::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/reports", get(list_handler))
        .route("/api/reports/latest", get(latest_handler))
        .route("/api/reports/{filename}", get(report_handler))
        .route("/api/reports/{filename}/violations", get(violations_handler))
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;
    info!(
        "Serving reports from {} on http://{}",
        state.store.dir().display(),
        addr
    );
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    warn!("Received Ctrl+C, shutting down...");
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs_f64(),
    }))
}

async fn list_handler(State(state): State<AppState>) -> Result<Json<Value>, ReportError> {
    debug!("GET /api/reports");
    let reports = state.store.list().await?;
    Ok(Json(json!({
        "success": true,
        "total": reports.len(),
        "reports": reports,
    })))
}

async fn latest_handler(State(state): State<AppState>) -> Result<Json<Value>, ReportError> {
    debug!("GET /api/reports/latest");
    let (entry, data) = state.store.latest().await?;
    Ok(Json(json!({
        "success": true,
        "filename": entry.filename,
        "data": data,
    })))
}

async fn report_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, ReportError> {
    debug!("GET /api/reports/{}", filename);
    let data = state.store.read(&filename).await?;
    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}

#[derive(Debug, Default, Deserialize)]
struct ViolationsQuery {
    #[serde(default)]
    severity: String,
    #[serde(default)]
    search: String,
}

async fn violations_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<ViolationsQuery>,
) -> Result<Json<Value>, ReportError> {
    debug!("GET /api/reports/{}/violations {:?}", filename, query);
    let severity: SeverityFilter = query.severity.parse()?;
    let report = state.store.read_typed(&filename).await?.report;
    let summary = Summary::from_violations(&report.violations);
    let shown = ViewFilter::new(severity, query.search.as_str()).apply(&report.violations);
    Ok(Json(json!({
        "success": true,
        "filename": filename,
        "metadata": report.metadata,
        "summary": summary,
        "filter": {
            "severity": severity.as_str(),
            "search": query.search,
        },
        "total": summary.total,
        "shown": shown.len(),
        "violations": shown,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{sample_report, write_file};
    use std::net::SocketAddr;
    use tempfile::TempDir;

    async fn spawn(dir: &std::path::Path) -> SocketAddr {
        let store = ReportStore::new(dir, "*.json").unwrap();
        let app = build_router(AppState::new(store));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    async fn get_json(addr: SocketAddr, path: &str) -> (u16, Value) {
        let resp = reqwest::get(format!("http://{}{}", addr, path))
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json::<Value>().await.unwrap())
    }

    #[tokio::test]
    async fn test_list_reports() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "older.json", &sample_report().to_string(), 200);
        write_file(dir.path(), "newer.json", &sample_report().to_string(), 20);
        write_file(dir.path(), "readme.md", "# hi", 1);
        let addr = spawn(dir.path()).await;

        let (status, body) = get_json(addr, "/api/reports").await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["total"], 2);
        assert_eq!(body["reports"][0]["filename"], "newer.json");
        assert_eq!(body["reports"][0]["name"], "newer");
        assert_eq!(body["reports"][0]["path"], "/api/reports/newer.json");
        assert_eq!(body["reports"][1]["filename"], "older.json");
        assert!(body["reports"][0]["modified"].is_string());
    }

    #[tokio::test]
    async fn test_get_report_round_trip() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "r.json", &sample_report().to_string(), 10);
        let addr = spawn(dir.path()).await;

        let (status, body) = get_json(addr, "/api/reports/r.json").await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], sample_report());
    }

    #[tokio::test]
    async fn test_invalid_report_is_400() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "bad.json", r#"{"report": {"violations": []}}"#, 10);
        let addr = spawn(dir.path()).await;

        let (status, body) = get_json(addr, "/api/reports/bad.json").await;
        assert_eq!(status, 400);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid report file");
        assert!(body["message"].as_str().unwrap().contains("report.metadata"));
    }

    #[tokio::test]
    async fn test_null_fields_rejected_by_both_endpoints() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "n.json",
            r#"{"report": {"metadata": null, "violations": null}}"#,
            10,
        );
        std::fs::create_dir(dir.path().join("sub.json")).unwrap();
        let addr = spawn(dir.path()).await;

        for path in ["/api/reports/n.json", "/api/reports/n.json/violations"] {
            let (status, body) = get_json(addr, path).await;
            assert_eq!(status, 400, "{}", path);
            assert_eq!(body["error"], "Invalid report file");
        }
        let (status, _) = get_json(addr, "/api/reports/sub.json").await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_missing_report_is_404() {
        let dir = TempDir::new().unwrap();
        let addr = spawn(dir.path()).await;
        let (status, body) = get_json(addr, "/api/reports/does-not-exist.json").await;
        assert_eq!(status, 404);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Report not found");
    }

    #[tokio::test]
    async fn test_traversal_is_400() {
        let dir = TempDir::new().unwrap();
        let addr = spawn(dir.path()).await;
        let (status, body) = get_json(addr, "/api/reports/..%2Fsecret.json").await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid filename");
    }

    #[tokio::test]
    async fn test_missing_directory_is_500() {
        let dir = TempDir::new().unwrap();
        let addr = spawn(&dir.path().join("gone")).await;
        let (status, body) = get_json(addr, "/api/reports").await;
        assert_eq!(status, 500);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to load reports");
        assert!(!body["message"].as_str().unwrap().contains("gone"));
    }

    #[tokio::test]
    async fn test_latest() {
        let dir = TempDir::new().unwrap();
        let addr = spawn(dir.path()).await;
        let (status, _) = get_json(addr, "/api/reports/latest").await;
        assert_eq!(status, 404);

        write_file(dir.path(), "a.json", &sample_report().to_string(), 100);
        write_file(dir.path(), "b.json", &sample_report().to_string(), 1);
        let (status, body) = get_json(addr, "/api/reports/latest").await;
        assert_eq!(status, 200);
        assert_eq!(body["filename"], "b.json");
        assert_eq!(body["data"], sample_report());
    }

    #[tokio::test]
    async fn test_violations_filtering() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "r.json", &sample_report().to_string(), 10);
        let addr = spawn(dir.path()).await;

        let (status, body) = get_json(addr, "/api/reports/r.json/violations?severity=high").await;
        assert_eq!(status, 200);
        assert_eq!(body["shown"], 1);
        assert_eq!(body["total"], 2);
        assert_eq!(body["summary"]["high"], 1);
        assert_eq!(body["summary"]["low"], 1);
        assert_eq!(body["metadata"]["fileName"], "src/app.js");
        assert_eq!(body["violations"][0]["message"], "foo is not descriptive");

        let (_, body) = get_json(addr, "/api/reports/r.json/violations?search=CONSOLE").await;
        assert_eq!(body["shown"], 1);
        assert_eq!(body["filter"]["severity"], "all");
        assert_eq!(body["violations"][0]["rule"], "no-console");

        let (status, body) = get_json(addr, "/api/reports/r.json/violations?severity=urgent").await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid filter");
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let dir = TempDir::new().unwrap();
        let addr = spawn(dir.path()).await;
        let (status, body) = get_json(addr, "/health").await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert!(body["timestamp"].is_string());

        let resp = reqwest::get(format!("http://{}/", addr)).await.unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        assert!(resp.text().await.unwrap().contains("<table"));
    }
}
