//! # 通知
//!
//! コンタクト通知メールに関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`NotificationRequest`] | 通知リクエスト | 1 回の送信要求。宛先アドレスのみを持つ |
//! | [`RecipientAddress`] | 宛先アドレス | 形式検証済みのメールアドレス |
//! | [`NotificationResult`] | 送信結果 | 成功（メッセージ ID）か失敗（種別 + 詳細） |
//! | [`NotificationError`] | 送信エラー | 呼び出し側エラー 3 種、サーバー側エラー 4 種 |
//!
//! ## 設計方針
//!
//! - **fail fast**: 入力検証はネットワーク接続より前にすべて完了させる
//! - **リトライなし**: 1 回のリクエストにつき送信は 1 回だけ試みる
//! - **エラー分類の明示**: HTTP ステータスへの対応は [`NotificationError::is_caller_error`] で決まる

use std::sync::LazyLock;

use derive_more::Display;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;
use uuid::Uuid;

/// 宛先アドレスの形式（`local@domain.tld`）
///
/// 空白と `@` 以外の文字列が `@` と `.` で区切られていることのみを要求する。
static RECIPIENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("宛先アドレスの正規表現が不正です")
});

/// 通知送信エラー
///
/// 前半 3 種は呼び出し側の入力に起因し（HTTP 400）、
/// 後半 4 種はサーバーの設定や外部リレーに起因する（HTTP 500）。
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 構造化入力として解釈できない（Content-Type 不正、JSON 不正）
    #[error("入力形式が不正です: {0}")]
    MalformedInput(String),

    /// 宛先アドレスが未指定
    #[error("宛先アドレスが指定されていません")]
    MissingRecipient,

    /// 宛先アドレスの形式が不正
    #[error("宛先アドレスの形式が不正です")]
    InvalidFormat,

    /// 送信に必要な設定（リレーの認証情報）が欠けている
    #[error("送信設定が不足しています: {0}")]
    ConfigurationError(String),

    /// リレーが認証情報を拒否した
    #[error("SMTP 認証に失敗: {0}")]
    AuthenticationFailed(String),

    /// リレーに到達できない、またはセッションを確立できない
    #[error("SMTP リレーに接続できません: {0}")]
    TransportUnavailable(String),

    /// メール送信に失敗（テンプレート生成の失敗を含む）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

impl NotificationError {
    /// エラー種別を返す
    pub fn kind(&self) -> NotificationFailureKind {
        match self {
            Self::MalformedInput(_) => NotificationFailureKind::MalformedInput,
            Self::MissingRecipient => NotificationFailureKind::MissingRecipient,
            Self::InvalidFormat => NotificationFailureKind::InvalidFormat,
            Self::ConfigurationError(_) => NotificationFailureKind::ConfigurationError,
            Self::AuthenticationFailed(_) => NotificationFailureKind::AuthenticationFailed,
            Self::TransportUnavailable(_) => NotificationFailureKind::TransportUnavailable,
            Self::SendFailed(_) => NotificationFailureKind::SendFailed,
        }
    }

    /// 呼び出し側の入力に起因するエラーかどうか
    pub fn is_caller_error(&self) -> bool {
        self.kind().is_caller_error()
    }

    /// 原因の詳細（リレーの応答など）
    ///
    /// 詳細を持たない種別はエラーメッセージそのものを返す。
    pub fn detail(&self) -> String {
        match self {
            Self::MalformedInput(detail)
            | Self::ConfigurationError(detail)
            | Self::AuthenticationFailed(detail)
            | Self::TransportUnavailable(detail)
            | Self::SendFailed(detail) => detail.clone(),
            Self::MissingRecipient | Self::InvalidFormat => self.to_string(),
        }
    }
}

/// 送信失敗の種別
///
/// ログの `notification.failure_kind` フィールドに snake_case で出力される。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationFailureKind {
    MalformedInput,
    MissingRecipient,
    InvalidFormat,
    ConfigurationError,
    AuthenticationFailed,
    TransportUnavailable,
    SendFailed,
}

impl NotificationFailureKind {
    /// 呼び出し側の入力に起因する種別かどうか
    pub fn is_caller_error(self) -> bool {
        matches!(
            self,
            Self::MalformedInput | Self::MissingRecipient | Self::InvalidFormat
        )
    }
}

/// 通知リクエスト
///
/// HTTP の `{ "email": string }` ボディに対応する。
/// 宛先の有無・形式の検証は [`validate`](Self::validate) で行う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationRequest {
    recipient_address: Option<String>,
}

/// HTTP ボディの形
#[derive(Debug, Deserialize)]
struct NotificationPayload {
    #[serde(default)]
    email: Option<String>,
}

impl NotificationRequest {
    /// 宛先アドレスを指定して作成する
    pub fn new(recipient_address: impl Into<String>) -> Self {
        Self {
            recipient_address: Some(recipient_address.into()),
        }
    }

    /// 宛先アドレスなしで作成する
    pub fn empty() -> Self {
        Self::default()
    }

    /// JSON ボディから作成する
    ///
    /// 空（または空白のみ）のボディは `{}` として扱い、宛先未指定のリクエストになる。
    /// JSON オブジェクトとして解釈できない場合、`email` が文字列でも null でもない場合は
    /// [`NotificationError::MalformedInput`] を返す。
    pub fn from_json(body: &[u8]) -> Result<Self, NotificationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::empty());
        }

        let payload: NotificationPayload = serde_json::from_slice(body)
            .map_err(|e| NotificationError::MalformedInput(e.to_string()))?;

        Ok(Self {
            recipient_address: payload.email,
        })
    }

    /// 入力された宛先アドレス（未検証）
    pub fn recipient_address(&self) -> Option<&str> {
        self.recipient_address.as_deref()
    }

    /// 宛先を検証して [`RecipientAddress`] を返す
    ///
    /// 未指定・空文字列は [`NotificationError::MissingRecipient`]、
    /// 形式不一致は [`NotificationError::InvalidFormat`]。
    pub fn validate(&self) -> Result<RecipientAddress, NotificationError> {
        match self.recipient_address.as_deref() {
            None | Some("") => Err(NotificationError::MissingRecipient),
            Some(address) => RecipientAddress::parse(address),
        }
    }
}

/// 宛先アドレス（値オブジェクト）
///
/// `local@domain.tld` 形式であることが保証される。
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct RecipientAddress(String);

impl RecipientAddress {
    /// 形式を検証して作成する
    pub fn parse(value: &str) -> Result<Self, NotificationError> {
        if RECIPIENT_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(NotificationError::InvalidFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `@` 以降のドメイン部
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

/// 送信したメッセージの ID
///
/// 送信時に付与する `Message-ID` ヘッダーの値（`<uuid@domain>`）。
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[display("{_0}")]
pub struct MessageId(String);

impl MessageId {
    /// 送信元ドメインを使って新しい ID を生成する
    ///
    /// UUID v7 を使用し、生成順にソート可能。
    pub fn generate(domain: &str) -> Self {
        Self(format!("<{}@{domain}>", Uuid::now_v7()))
    }

    /// 既存の値から作成する
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// 送信成功
    Success { message_id: MessageId },
    /// 送信失敗
    Failure {
        kind:   NotificationFailureKind,
        /// 原因の詳細（[`NotificationError::detail`]）
        detail: String,
    },
}

impl NotificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<Result<MessageId, NotificationError>> for NotificationResult {
    fn from(result: Result<MessageId, NotificationError>) -> Self {
        match result {
            Ok(message_id) => Self::Success { message_id },
            Err(e) => Self::Failure {
                kind:   e.kind(),
                detail: e.detail(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("user@example.com")]
    #[case("first.last+tag@sub.example.co.jp")]
    #[case("a@b.c")]
    #[case("ユーザー@例え.jp")]
    fn test_正しい形式の宛先を受け入れる(#[case] input: &str) {
        let address = RecipientAddress::parse(input).unwrap();
        assert_eq!(address.as_str(), input);
    }

    #[rstest]
    #[case("not-an-email", "@ なし")]
    #[case("user@example", "TLD なし")]
    #[case("@example.com", "ローカル部なし")]
    #[case("user@.com", "ドメイン名なし")]
    #[case("user@example.", "TLD が空")]
    #[case("us er@example.com", "空白を含む")]
    #[case("user@@example.com", "@ が 2 つ")]
    #[case(" user@example.com", "先頭に空白")]
    #[case("user@example.com\n", "末尾に改行")]
    fn test_不正な形式の宛先を拒否する(#[case] input: &str, #[case] _reason: &str) {
        assert!(matches!(
            RecipientAddress::parse(input),
            Err(NotificationError::InvalidFormat)
        ));
    }

    #[test]
    fn test_domainは最後の_at_以降を返す() {
        let address = RecipientAddress::parse("user@example.com").unwrap();
        assert_eq!(address.domain(), "example.com");
    }

    #[test]
    fn test_validateは未指定をmissing_recipientにする() {
        assert!(matches!(
            NotificationRequest::empty().validate(),
            Err(NotificationError::MissingRecipient)
        ));
        assert!(matches!(
            NotificationRequest::new("").validate(),
            Err(NotificationError::MissingRecipient)
        ));
    }

    #[test]
    fn test_validateは形式不一致をinvalid_formatにする() {
        assert!(matches!(
            NotificationRequest::new("not-an-email").validate(),
            Err(NotificationError::InvalidFormat)
        ));
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"  \n".as_slice())]
    #[case(b"{}".as_slice())]
    #[case(br#"{"email": null}"#.as_slice())]
    fn test_from_jsonで宛先なしのリクエストになる(#[case] body: &[u8]) {
        let request = NotificationRequest::from_json(body).unwrap();
        assert_eq!(request.recipient_address(), None);
    }

    #[test]
    fn test_from_jsonでemailを読み取る() {
        let request = NotificationRequest::from_json(br#"{"email":"user@example.com"}"#).unwrap();
        assert_eq!(request.recipient_address(), Some("user@example.com"));
    }

    #[rstest]
    #[case(b"not json".as_slice(), "JSON でない")]
    #[case(b"[1, 2]".as_slice(), "配列")]
    #[case(br#"{"email": 42}"#.as_slice(), "email が数値")]
    #[case(br#"{"email": "a@b.c""#.as_slice(), "閉じ括弧なし")]
    fn test_from_jsonで不正な構造をmalformed_inputにする(
        #[case] body: &[u8],
        #[case] _reason: &str,
    ) {
        assert!(matches!(
            NotificationRequest::from_json(body),
            Err(NotificationError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_呼び出し側エラーの分類() {
        assert!(NotificationError::MalformedInput("x".to_string()).is_caller_error());
        assert!(NotificationError::MissingRecipient.is_caller_error());
        assert!(NotificationError::InvalidFormat.is_caller_error());

        assert!(!NotificationError::ConfigurationError("x".to_string()).is_caller_error());
        assert!(!NotificationError::AuthenticationFailed("x".to_string()).is_caller_error());
        assert!(!NotificationError::TransportUnavailable("x".to_string()).is_caller_error());
        assert!(!NotificationError::SendFailed("x".to_string()).is_caller_error());
    }

    #[test]
    fn test_failure_kindの文字列変換が正しい() {
        assert_eq!(
            NotificationFailureKind::AuthenticationFailed.to_string(),
            "authentication_failed"
        );
        assert_eq!(
            NotificationFailureKind::from_str("transport_unavailable").unwrap(),
            NotificationFailureKind::TransportUnavailable
        );
    }

    #[test]
    fn test_message_idは山括弧とドメインを含む() {
        let id = MessageId::generate("example.com");

        assert!(id.as_str().starts_with('<'));
        assert!(id.as_str().ends_with("@example.com>"));
    }

    #[test]
    fn test_resultからnotification_resultに変換する() {
        let id = MessageId::from_string("<1@example.com>");
        assert_eq!(
            NotificationResult::from(Ok(id.clone())),
            NotificationResult::Success { message_id: id }
        );

        let failure = NotificationResult::from(Err(NotificationError::SendFailed(
            "550 mailbox unavailable".to_string(),
        )));
        let NotificationResult::Failure { kind, detail } = failure else {
            panic!("Failure であること");
        };
        assert_eq!(kind, NotificationFailureKind::SendFailed);
        assert_eq!(detail, "550 mailbox unavailable");
    }
}
