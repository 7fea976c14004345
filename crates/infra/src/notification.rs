//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: SMTP（本番: 暗黙的 TLS のリレー）、Noop（ローカル開発用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **1 リクエスト 1 セッション**: `send_email()` は接続・認証・送信を 1 つのセッションで行う
//! - **宛先は接続前に確定**: [`check_recipient`] でヘッダーとして扱える宛先かを先に確認する

mod noop;
mod smtp;

use std::fmt;

use async_trait::async_trait;
use folio_domain::notification::{EmailMessage, MessageId, NotificationError, RecipientAddress};
use lettre::message::Mailbox;
pub use noop::NoopNotificationSender;
pub use smtp::{SmtpNotificationSender, SmtpSecurity, SmtpSettings};

/// メール送信トレイト
///
/// 通知基盤の中核。メール送信の具体的な方法を抽象化する。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを 1 通送信し、付与したメッセージ ID を返す
    ///
    /// リレーとのセッションは 1 回だけ開く。
    ///
    /// # エラー
    ///
    /// - 認証情報の拒否: [`NotificationError::AuthenticationFailed`]
    /// - 接続できない・セッションが確立しない: [`NotificationError::TransportUnavailable`]
    /// - 認証後の送信の失敗: [`NotificationError::SendFailed`]
    async fn send_email(&self, email: &EmailMessage) -> Result<MessageId, NotificationError>;
}

/// 宛先をメールヘッダーとして扱えるか確認する
///
/// 形式チェックを通過しても `To` ヘッダーに使えない宛先（`a..b@example.com` など）を
/// リレーへ接続する前に [`NotificationError::InvalidFormat`] として弾く。
pub fn check_recipient(recipient: &RecipientAddress) -> Result<(), NotificationError> {
    recipient_mailbox(recipient.as_str()).map(drop)
}

/// 宛先文字列をメールボックスに変換する
pub(crate) fn recipient_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address.parse().map_err(|e| {
        tracing::debug!(error = %e, "宛先をメールボックスとして解釈できない");
        NotificationError::InvalidFormat
    })
}

/// リレーの認証情報
///
/// `EMAIL_USER` はリレーのログインユーザーであり、送信元アドレスでもある。
#[derive(Clone, PartialEq, Eq)]
pub struct TransportCredentials {
    pub user:   String,
    pub secret: String,
}

impl TransportCredentials {
    pub fn new(user: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user:   user.into(),
            secret: secret.into(),
        }
    }
}

// secret をログに出さない
impl fmt::Debug for TransportCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportCredentials")
            .field("user", &self.user)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
