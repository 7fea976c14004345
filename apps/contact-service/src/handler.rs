//! # HTTP ハンドラ
//!
//! - [`contact`] - 連絡先メール送信（`POST /api/sendEmail`）
//! - [`health`] - Liveness / Readiness Check

pub mod contact;
pub mod health;

pub use contact::{ContactState, send_email};
pub use health::{health_check, readiness_check};
