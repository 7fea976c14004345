//! # テスト用モック
//!
//! ユースケーステスト・ハンドラテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! folio-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use folio_domain::notification::{EmailMessage, MessageId, NotificationError};

use crate::notification::NotificationSender;

type ErrorFactory = Arc<dyn Fn() -> NotificationError + Send + Sync>;

// ===== MockNotificationSender =====

/// 応答を差し替えられる送信モック
///
/// 既定では `send_email()` が成功する。`send_email()` の 1 回の呼び出しを
/// リレーとの 1 セッションとみなす。クローンは呼び出し記録を共有する。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    send_error:  Option<ErrorFactory>,
    send_calls:  Arc<AtomicUsize>,
    sent_emails: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 認証情報を拒否するリレー（SMTP 535）
    pub fn rejecting_credentials() -> Self {
        Self {
            send_error: Some(Arc::new(|| {
                NotificationError::AuthenticationFailed(
                    "permanent error (535): 5.7.8 Username and Password not accepted".to_string(),
                )
            })),
            ..Self::default()
        }
    }

    /// 到達できないリレー
    pub fn unreachable() -> Self {
        Self {
            send_error: Some(Arc::new(|| {
                NotificationError::TransportUnavailable("Connection refused".to_string())
            })),
            ..Self::default()
        }
    }

    /// 認証は通るが送信で失敗するリレー
    pub fn failing_send(detail: &str) -> Self {
        let detail = detail.to_string();
        Self {
            send_error: Some(Arc::new(move || NotificationError::SendFailed(detail.clone()))),
            ..Self::default()
        }
    }

    /// `send_email()` の呼び出し回数（失敗を含む）
    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    /// リレーとのセッション数
    pub fn transport_calls(&self) -> usize {
        self.send_calls()
    }

    /// 送信に成功したメール
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent_emails.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<MessageId, NotificationError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(make_error) = &self.send_error {
            return Err(make_error());
        }
        self.sent_emails.lock().unwrap().push(email.clone());
        Ok(MessageId::generate("mock.example.com"))
    }
}
