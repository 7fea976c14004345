//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpConnection` を直接使い、1 回の送信につき 1 つのセッションで
//! 接続 → EHLO → 認証 → 送信 → QUIT を行う。
//! 本番のリレーには暗黙的 TLS（SMTPS、既定ポート 465）で接続する。
//!
//! メッセージはセッションを開く前に組み立てる。宛先がヘッダーとして扱えない場合は
//! リレーに接続せずに失敗する。

use std::time::Duration;

use async_trait::async_trait;
use folio_domain::notification::{EmailMessage, MessageId, NotificationError};
use lettre::{
    Address,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        self,
        authentication::{Credentials, DEFAULT_MECHANISMS},
        client::{AsyncSmtpConnection, TlsParameters},
        extension::ClientId,
        response::Code,
    },
};

use super::{NotificationSender, TransportCredentials, recipient_mailbox};

/// リレーとの通信の保護方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
pub enum SmtpSecurity {
    /// 接続直後から TLS（SMTPS）
    #[strum(serialize = "implicit")]
    Implicit,
    /// 平文（ローカルの Mailpit などの開発用リレー向け）
    #[strum(serialize = "none")]
    Plaintext,
}

/// SMTP リレーへの接続設定
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// リレーのホスト名（例: "smtp.gmail.com"）
    pub host:                 String,
    /// リレーのポート番号（例: 465）
    pub port:                 u16,
    /// 通信の保護方式
    pub security:             SmtpSecurity,
    /// 1 セッションあたりのタイムアウト
    pub timeout:              Duration,
    /// 証明書検証を緩和するか
    pub accept_invalid_certs: bool,
}

/// SMTP 通知送信
///
/// 接続プールを持たず、`send_email()` のたびにセッションを開いて閉じる。
pub struct SmtpNotificationSender {
    host:        String,
    port:        u16,
    tls:         Option<TlsParameters>,
    timeout:     Duration,
    hello_name:  ClientId,
    credentials: Credentials,
    from:        Mailbox,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// この時点ではリレーに接続しない。
    ///
    /// # 引数
    ///
    /// - `settings`: リレーの接続設定
    /// - `credentials`: リレーの認証情報（`user` は送信元アドレスを兼ねる）
    /// - `sender_name`: `From` ヘッダーの表示名
    ///
    /// # エラー
    ///
    /// 送信元アドレスが不正な場合、TLS 設定を構築できない場合は
    /// [`NotificationError::ConfigurationError`] を返す。
    pub fn new(
        settings: &SmtpSettings,
        credentials: &TransportCredentials,
        sender_name: &str,
    ) -> Result<Self, NotificationError> {
        let address: Address = credentials.user.parse().map_err(|e| {
            NotificationError::ConfigurationError(format!("送信元アドレス不正: {e}"))
        })?;
        let from = Mailbox::new(Some(sender_name.to_string()), address);

        let tls = match settings.security {
            SmtpSecurity::Implicit => Some(
                TlsParameters::builder(settings.host.clone())
                    .dangerous_accept_invalid_certs(settings.accept_invalid_certs)
                    .build()
                    .map_err(|e| {
                        NotificationError::ConfigurationError(format!("TLS 設定の構築に失敗: {e}"))
                    })?,
            ),
            SmtpSecurity::Plaintext => None,
        };

        Ok(Self {
            host: settings.host.clone(),
            port: settings.port,
            tls,
            timeout: settings.timeout,
            hello_name: ClientId::default(),
            credentials: Credentials::new(credentials.user.clone(), credentials.secret.clone()),
            from,
        })
    }

    /// メッセージを構築する
    ///
    /// 宛先をメールボックスとして解釈できない場合は [`NotificationError::InvalidFormat`]。
    fn build_message(
        &self,
        email: &EmailMessage,
        message_id: &MessageId,
    ) -> Result<Message, NotificationError> {
        let to = recipient_mailbox(&email.to)?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .message_id(Some(message_id.to_string()))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }

    /// 1 つのセッションで接続・認証・送信・切断を行う
    async fn deliver(&self, message: &Message) -> Result<(), NotificationError> {
        let mut connection = AsyncSmtpConnection::connect_tokio1(
            (self.host.as_str(), self.port),
            Some(self.timeout),
            &self.hello_name,
            self.tls.clone(),
            None,
        )
        .await
        .map_err(|e| classify_session_error(&e))?;

        if let Err(e) = connection.auth(DEFAULT_MECHANISMS, &self.credentials).await {
            connection.abort().await;
            return Err(classify_session_error(&e));
        }

        let response = match connection
            .send(message.envelope(), &message.formatted())
            .await
        {
            Ok(response) => response,
            Err(e) => {
                connection.abort().await;
                return Err(NotificationError::SendFailed(e.to_string()));
            }
        };

        tracing::debug!(
            smtp.code = %response.code(),
            smtp.response = response.first_line().unwrap_or(""),
            "SMTP リレーが送信を受け付けました"
        );

        // 受付済みなので QUIT の失敗は送信結果に影響しない
        if let Err(e) = connection.quit().await {
            tracing::debug!(error = %e, "SMTP セッションの終了に失敗");
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<MessageId, NotificationError> {
        let message_id = MessageId::generate(self.from.email.domain());
        let message = self.build_message(email, &message_id)?;

        tokio::time::timeout(self.timeout, self.deliver(&message))
            .await
            .map_err(|_| {
                NotificationError::TransportUnavailable(format!(
                    "{} 秒以内にセッションが完了しませんでした",
                    self.timeout.as_secs_f32()
                ))
            })??;

        Ok(message_id)
    }
}

/// 接続・認証時のエラーを分類する
fn classify_session_error(error: &smtp::Error) -> NotificationError {
    if error.status().is_some_and(is_auth_rejection) {
        NotificationError::AuthenticationFailed(error.to_string())
    } else {
        NotificationError::TransportUnavailable(error.to_string())
    }
}

/// 認証情報の拒否を示す応答コードかどうか
///
/// - 530: 認証が必要
/// - 534: 認証メカニズムが弱すぎる（アプリパスワード未使用など）
/// - 535: 認証情報が無効
fn is_auth_rejection(code: Code) -> bool {
    matches!(u16::from(code), 530 | 534 | 535)
}
