//! # Contact Service 設定
//!
//! 環境変数から Contact Service サーバーの設定を読み込む。
//!
//! 値の形式が不正な場合は起動時に [`ConfigError`] で停止する。
//! リレーの認証情報（`EMAIL_USER` / `EMAIL_PASSWORD`）の欠落だけは起動を止めず、
//! 送信リクエストごとに設定エラーとして応答する。

use std::{env, num::NonZeroU64, str::FromStr, time::Duration};

use folio_domain::contact::ContactProfile;
use folio_infra::notification::{SmtpSecurity, SmtpSettings, TransportCredentials};
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 値を解釈できない
    #[error("{name} の値が不正です: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Contact Service サーバーの設定
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationBackend {
    /// SMTP リレー経由で送信する
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: SMTP リレー（既定: smtp.gmail.com:465）経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:     NotificationBackend,
    pub smtp:        SmtpSettings,
    /// リレーの認証情報（未設定なら `None`）
    pub credentials: Option<TransportCredentials>,
    /// 本文に差し込むプロフィール
    pub profile:     ContactProfile,
}

impl ContactConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 空文字列の値は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Ok(Self {
            host:         get("CONTACT_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port:         parse_or("CONTACT_PORT", get("CONTACT_PORT"), 3000)?,
            notification: NotificationConfig::from_lookup(&get)?,
        })
    }
}

impl NotificationConfig {
    fn from_lookup<F>(get: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = parse_or(
            "NOTIFICATION_BACKEND",
            get("NOTIFICATION_BACKEND"),
            NotificationBackend::Smtp,
        )?;

        let smtp = SmtpSettings {
            host:                 get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            port:                 parse_or("SMTP_PORT", get("SMTP_PORT"), 465)?,
            security:             parse_or("SMTP_TLS", get("SMTP_TLS"), SmtpSecurity::Implicit)?,
            timeout:              parse_secs_or("SMTP_TIMEOUT_SECS", get("SMTP_TIMEOUT_SECS"), 10)?,
            accept_invalid_certs: parse_or(
                "SMTP_ACCEPT_INVALID_CERTS",
                get("SMTP_ACCEPT_INVALID_CERTS"),
                true,
            )?,
        };

        let user = get("EMAIL_USER");
        let credentials = match (&user, get("EMAIL_PASSWORD")) {
            (Some(user), Some(secret)) => Some(TransportCredentials::new(user.as_str(), secret)),
            _ => None,
        };

        let profile = ContactProfile {
            display_name:  get("CONTACT_DISPLAY_NAME")
                .unwrap_or_else(|| "Portfolio Owner".to_string()),
            contact_email: get("CONTACT_EMAIL").or(user).unwrap_or_default(),
            phone:         get("CONTACT_PHONE"),
            headline:      get("CONTACT_HEADLINE")
                .unwrap_or_else(|| "Software Developer".to_string()),
        };

        Ok(Self {
            backend,
            smtp,
            credentials,
            profile,
        })
    }
}

/// 値があればパースし、なければ既定値を返す
fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

/// 秒数を読み込む（0 は不正な値として扱う）
fn parse_secs_or(
    name: &'static str,
    value: Option<String>,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => match value.parse::<NonZeroU64>() {
            Ok(secs) => Ok(Duration::from_secs(secs.get())),
            Err(_) => Err(ConfigError::InvalidValue { name, value }),
        },
        None => Ok(Duration::from_secs(default_secs)),
    }
}
