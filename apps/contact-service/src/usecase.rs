//! # ユースケース層
//!
//! ハンドラから呼び出されるアプリケーションロジック。

pub mod notification;

pub use notification::{ContactDispatcher, TemplateRenderer};
