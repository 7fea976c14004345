//! # Contact Service エラー定義
//!
//! Contact Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンスボディは `{ "error": string, "details"?: string }` 形式。
//! 呼び出し側の入力に起因するエラーは 400、それ以外は 500 を返す。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_domain::notification::{NotificationError, NotificationFailureKind};
use folio_shared::ErrorResponse;
use thiserror::Error;

/// Contact Service で発生するエラー
#[derive(Debug, Error)]
pub enum ContactError {
    /// Content-Type が JSON ではない
    #[error("Content-Type が application/json ではありません")]
    InvalidContentType,

    /// 送信要求の失敗
    #[error("{kind}: {detail}")]
    Notification {
        kind:   NotificationFailureKind,
        detail: String,
    },
}

impl From<NotificationError> for ContactError {
    fn from(e: NotificationError) -> Self {
        Self::Notification {
            kind:   e.kind(),
            detail: e.detail(),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ContactError::InvalidContentType => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Invalid content type"),
            ),
            ContactError::Notification { kind, detail } => {
                if !kind.is_caller_error() {
                    tracing::error!(
                        notification.failure_kind = %kind,
                        detail = %detail,
                        "送信リクエストがサーバー側の理由で失敗"
                    );
                }
                (status_for(*kind), error_body(*kind, detail))
            }
        };

        (status, Json(body)).into_response()
    }
}

fn status_for(kind: NotificationFailureKind) -> StatusCode {
    if kind.is_caller_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// 失敗種別ごとのレスポンスボディ
///
/// `details` を返すのは送信段階の失敗のみ。
fn error_body(kind: NotificationFailureKind, detail: &str) -> ErrorResponse {
    match kind {
        NotificationFailureKind::MalformedInput => ErrorResponse::new("Invalid request body"),
        NotificationFailureKind::MissingRecipient => ErrorResponse::new("Email is required"),
        NotificationFailureKind::InvalidFormat => ErrorResponse::new("Invalid email format"),
        NotificationFailureKind::ConfigurationError => {
            ErrorResponse::new("Server configuration error")
        }
        NotificationFailureKind::AuthenticationFailed => {
            ErrorResponse::new("Authentication failed. Check your email credentials.")
        }
        NotificationFailureKind::TransportUnavailable => {
            ErrorResponse::with_details("Failed to send email", "Mail relay is unavailable")
        }
        NotificationFailureKind::SendFailed => {
            ErrorResponse::with_details("Failed to send email", detail)
        }
    }
}
