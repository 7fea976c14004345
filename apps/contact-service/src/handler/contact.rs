//! # 連絡先メール送信ハンドラ
//!
//! ## エンドポイント
//!
//! ```text
//! POST /api/sendEmail
//! Content-Type: application/json
//!
//! { "email": "visitor@example.com" }
//! ```
//!
//! 成功時は `200 { "success": true }`、失敗時は [`ContactError`] の変換規則に従う。

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};
use folio_domain::notification::{
    NotificationFailureKind,
    NotificationRequest,
    NotificationResult,
};
use folio_shared::{SuccessResponse, event_log::event, log_business_event};

use crate::{error::ContactError, usecase::ContactDispatcher};

/// 送信ハンドラの State
pub struct ContactState {
    pub dispatcher: ContactDispatcher,
}

/// 連絡先メールを送信する
///
/// ボディは自前で解釈する（axum の `Json` 抽出器の拒否レスポンスではなく、
/// フォームが読める `{ "error": ... }` 形式で返すため）。
/// ディスパッチャーに渡す前に拒否したリクエストもここで送信失敗イベントとして記録する。
#[tracing::instrument(skip_all)]
pub async fn send_email(
    State(state): State<Arc<ContactState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ContactError> {
    if !is_json_content_type(&headers) {
        log_rejected_request(
            NotificationFailureKind::MalformedInput,
            "Content-Type が application/json ではありません",
        );
        return Err(ContactError::InvalidContentType);
    }

    let request = NotificationRequest::from_json(&body)
        .inspect_err(|e| log_rejected_request(e.kind(), &e.detail()))?;

    match state.dispatcher.dispatch(request).await {
        NotificationResult::Success { .. } => Ok(Json(SuccessResponse::ok())),
        NotificationResult::Failure { kind, detail } => {
            Err(ContactError::Notification { kind, detail })
        }
    }
}

/// ディスパッチ前に拒否したリクエストを記録する
fn log_rejected_request(kind: NotificationFailureKind, detail: &str) {
    let failure_kind: &'static str = kind.into();
    log_business_event!(
        event.category = event::category::NOTIFICATION,
        event.action = event::action::NOTIFICATION_FAILED,
        event.result = event::result::FAILURE,
        notification.failure_kind = failure_kind,
        error = %detail,
        "連絡先メール送信失敗"
    );
}

/// Content-Type に `application/json` を含むかどうか（大文字小文字を区別する）
fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}
