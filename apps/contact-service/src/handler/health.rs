//! # ヘルスチェックハンドラ
//!
//! Contact Service の稼働状態を確認するためのエンドポイント。
//!
//! - `/health` — Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready` — Readiness Check（リレーの認証情報が設定済みかを確認）
//!
//! Readiness Check はリレーに接続しない。接続確認は送信リクエストごとに行う。

use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use folio_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};

use super::ContactState;

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check エンドポイント
///
/// 全チェック OK → 200、1 つでも失敗 → 503。
pub async fn readiness_check(State(state): State<Arc<ContactState>>) -> impl IntoResponse {
    let credentials = if state.dispatcher.is_configured() {
        CheckStatus::Ok
    } else {
        tracing::warn!("readiness check: smtp credentials are not configured");
        CheckStatus::Error
    };

    let mut checks = HashMap::new();
    checks.insert("smtp_credentials".to_string(), credentials);

    let response = ReadinessResponse::from_checks(checks);
    let http_status = match response.status {
        ReadinessStatus::Ready => StatusCode::OK,
        ReadinessStatus::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(response))
}
