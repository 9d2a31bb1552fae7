//! HTTP surface: the remote-store upload endpoints, the analysis endpoint
//! and a health probe, plus static assets for the demo UI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::analyzer::{DynAnalyzer, MockAnalyzer, StageAnalyzer, StageEvidence};
use crate::category::Category;
use crate::config::{AnalyzerMode, AppConfig};
use crate::validate::{validate, FileMeta};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub analyzer: DynAnalyzer,
}

impl AppState {
    /// The HTTP surface *is* the analysis backend: serving `/analyze`
    /// through the remote delegation would have the server call itself, so
    /// requests are always answered by the local simulation. Remote mode
    /// only steers the client-side submission pipeline.
    pub fn new(config: AppConfig) -> Self {
        if config.remote.mode == AnalyzerMode::Remote {
            tracing::warn!(
                base_url = %config.remote.base_url,
                "remote mode configured; /analyze still answers from the local simulation"
            );
        }
        let analyzer: DynAnalyzer = Arc::new(MockAnalyzer::new(config.analysis.thresholds));
        Self {
            config: Arc::new(config),
            analyzer,
        }
    }
}

pub fn router(state: AppState) -> Router {
    // Best-effort: the store directory may already exist.
    let _ = std::fs::create_dir_all(&state.config.server.upload_dir);

    // Generous cap above the largest per-category policy; the policy check
    // itself produces the user-facing rejection.
    let body_limit = 12 * 1024 * 1024;

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/upload/voice", post(upload_voice))
        .route("/upload/image", post(upload_image))
        .route("/analyze", post(analyze))
        .nest_service(
            "/static",
            ServeDir::new(state.config.server.static_dir.clone()),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn upload_voice(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    store_upload(state, Category::Voice, multipart).await
}

async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    store_upload(state, Category::Image, multipart).await
}

/// Accept one multipart file field named after the category, validate it
/// against that category's policy and persist it under the upload dir.
async fn store_upload(
    state: AppState,
    category: Category,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut file: Option<(FileMeta, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {e}"),
                );
            }
        };
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if field_name != category.as_str() {
            continue;
        }

        let name = field.file_name().map(|s| s.to_string()).unwrap_or_default();
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = match field.bytes().await {
            Ok(b) => b,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read file data: {e}"),
                );
            }
        };
        file = Some((
            FileMeta::new(name, bytes.len() as u64, content_type),
            bytes.to_vec(),
        ));
    }

    let Some((meta, bytes)) = file else {
        return error_response(StatusCode::BAD_REQUEST, "No file provided".to_string());
    };

    if let Err(reason) = validate(&meta, state.config.policy(category)) {
        return error_response(StatusCode::BAD_REQUEST, reason.to_string());
    }

    let filename = sanitize_filename(&meta.name);
    if filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Invalid filename".to_string());
    }
    let dest = PathBuf::from(&state.config.server.upload_dir).join(&filename);
    if let Err(e) = tokio::fs::write(&dest, &bytes).await {
        tracing::error!(error = %e, path = %dest.display(), "failed to persist upload");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store file".to_string(),
        );
    }

    tracing::info!(%category, %filename, size = bytes.len(), "stored upload");
    (
        StatusCode::OK,
        Json(json!({ "status": "success", "filename": filename })),
    )
}

#[derive(serde::Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    voice: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Analysis endpoint: answers per category independently, `null` for any
/// category the request did not carry. Sequencing and early termination are
/// the client pipeline's concern, not the wire's.
async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeBody>) -> Json<Value> {
    let evidence = StageEvidence {
        voice_id: body.voice.clone(),
        image_id: body.image.clone(),
        text: body.text.clone(),
    };

    // Each request is its own run; no state leaks between requests.
    state.analyzer.begin_run(&evidence).await;

    let mut out = serde_json::Map::new();
    for category in Category::ALL {
        let provided = match category {
            Category::Voice => body.voice.is_some(),
            Category::Image => body.image.is_some(),
            Category::Text => body.text.as_deref().is_some_and(|t| !t.is_empty()),
        };
        let value = if provided {
            let result = state.analyzer.analyze(category, &evidence).await;
            serde_json::to_value(&result).unwrap_or(Value::Null)
        } else {
            Value::Null
        };
        out.insert(category.as_str().to_string(), value);
    }

    Json(Value::Object(out))
}

fn error_response(status: StatusCode, message: String) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "status": "error", "error": message })))
}

/// Keep only path-safe characters; collapse everything else to `_` and drop
/// any directory components the client smuggled in.
fn sanitize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_filename("claim.wav"), "claim.wav");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my file (1).png"), "my_file__1_.png");
        assert_eq!(sanitize_filename("..."), "");
    }
}
