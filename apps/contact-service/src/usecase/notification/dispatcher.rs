//! # コンタクト通知ディスパッチャー
//!
//! 入力検証 → 宛先確認 → 設定確認 → テンプレートレンダリング → 送信 → ログ記録を
//! 統合するサービス。
//!
//! ## 設計方針
//!
//! - **fail fast**: 入力と設定の不備はリレーへ接続する前に確定させる
//! - **リトライなし**: 1 回の `dispatch()` につきリレーとのセッションは最大 1 回
//! - **結果は値で返す**: `dispatch()` は失敗も [`NotificationResult::Failure`] として返す
//! - **依存性注入**: `NotificationSender` は trait で抽象化

use std::sync::Arc;

use folio_domain::{
    contact::ContactProfile,
    notification::{MessageId, NotificationError, NotificationRequest, NotificationResult},
};
use folio_infra::notification::{
    NoopNotificationSender,
    NotificationSender,
    SmtpNotificationSender,
    check_recipient,
};
use folio_shared::{
    event_log::{error, event},
    log_business_event,
};

use super::TemplateRenderer;
use crate::config::{NotificationBackend, NotificationConfig};

/// コンタクト通知ディスパッチャー
///
/// `sender` が `None` の場合はリレーの認証情報が未設定であり、
/// すべての送信要求を設定エラーとして扱う。
pub struct ContactDispatcher {
    sender:            Option<Arc<dyn NotificationSender>>,
    template_renderer: TemplateRenderer,
    profile:           ContactProfile,
}

impl ContactDispatcher {
    pub fn new(
        sender: Option<Arc<dyn NotificationSender>>,
        template_renderer: TemplateRenderer,
        profile: ContactProfile,
    ) -> Self {
        Self {
            sender,
            template_renderer,
            profile,
        }
    }

    /// 設定から送信バックエンドを組み立てる
    ///
    /// `smtp` バックエンドで認証情報が揃っていない場合は送信手段なしで作成する
    /// （起動は止めず、送信時に設定エラーを返す）。
    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotificationError> {
        let sender: Option<Arc<dyn NotificationSender>> = match config.backend {
            NotificationBackend::Noop => Some(Arc::new(NoopNotificationSender)),
            NotificationBackend::Smtp => match &config.credentials {
                Some(credentials) => Some(Arc::new(SmtpNotificationSender::new(
                    &config.smtp,
                    credentials,
                    &config.profile.display_name,
                )?)),
                None => None,
            },
        };

        Ok(Self::new(
            sender,
            TemplateRenderer::new()?,
            config.profile.clone(),
        ))
    }

    /// 送信手段が設定済みかどうか
    pub fn is_configured(&self) -> bool {
        self.sender.is_some()
    }

    /// 連絡先メールを 1 通送信する
    ///
    /// 成功・失敗どちらもビジネスイベントとしてログに記録する。
    pub async fn dispatch(&self, request: NotificationRequest) -> NotificationResult {
        let recipient = request.recipient_address().unwrap_or_default().to_string();

        let result = self.try_dispatch(&request).await;

        match &result {
            Ok(message_id) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.result = event::result::SUCCESS,
                    notification.recipient = %recipient,
                    notification.message_id = %message_id,
                    "連絡先メール送信成功"
                );
            }
            Err(e) => {
                let failure_kind: &'static str = e.kind().into();
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.result = event::result::FAILURE,
                    notification.recipient = %recipient,
                    notification.failure_kind = failure_kind,
                    error = %e,
                    "連絡先メール送信失敗"
                );
            }
        }

        NotificationResult::from(result)
    }

    async fn try_dispatch(&self, request: &NotificationRequest) -> Result<MessageId, NotificationError> {
        let recipient = request.validate()?;
        check_recipient(&recipient)?;

        let Some(sender) = &self.sender else {
            tracing::error!(
                error.category = error::category::CONFIGURATION,
                error.kind = error::kind::MISSING_CREDENTIALS,
                "EMAIL_USER / EMAIL_PASSWORD が設定されていません"
            );
            return Err(NotificationError::ConfigurationError(
                "リレーの認証情報が未設定です".to_string(),
            ));
        };

        let email = self.template_renderer.render(&self.profile, &recipient)?;

        sender.send_email(&email).await.inspect_err(|e| {
            let kind = match e {
                NotificationError::AuthenticationFailed(_) => error::kind::SMTP_AUTHENTICATION,
                NotificationError::TransportUnavailable(_) => error::kind::SMTP_UNAVAILABLE,
                _ => error::kind::SMTP_SEND,
            };
            tracing::error!(
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = kind,
                error = %e,
                "SMTP リレーへの送信に失敗"
            );
        })
    }
}
