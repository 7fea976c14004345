//! # Folio インフラ層
//!
//! 外部システム（SMTP リレー）との通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! ドメイン層で定義された型（`EmailMessage`, `MessageId`, `NotificationError`）を使い、
//! 送信手段の詳細をカプセル化する。ユースケース層は [`notification::NotificationSender`]
//! trait にのみ依存する。
//!
//! ## モジュール構成
//!
//! - [`notification`] - メール送信 trait と SMTP / Noop 実装
//! - `mock` - テスト用モック（`test-utils` feature）

pub mod notification;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
