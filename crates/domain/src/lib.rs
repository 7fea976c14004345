//! # Folio ドメイン層
//!
//! コンタクト通知（訪問者のメールアドレスへ連絡先を送るメール）の
//! ドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! contact-service → infra → domain
//!        ↓                    ↑
//!        └────────────────────┘
//! ```
//!
//! ドメイン層はインフラ層（SMTP、HTTP）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`notification`] - 通知リクエスト、宛先、送信結果、エラー分類
//! - [`contact`] - メール本文に差し込むオーナーのプロフィール
//!
//! ## 使用例
//!
//! ```rust
//! use folio_domain::notification::{NotificationError, NotificationRequest};
//!
//! let request = NotificationRequest::new("user@example.com");
//! assert!(request.validate().is_ok());
//!
//! let request = NotificationRequest::new("not-an-email");
//! assert!(matches!(
//!     request.validate(),
//!     Err(NotificationError::InvalidFormat)
//! ));
//! ```

pub mod contact;
pub mod notification;
