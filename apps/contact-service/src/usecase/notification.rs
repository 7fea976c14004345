//! # 通知ユースケース
//!
//! コンタクト通知メールの生成と送信を担当する。
//!
//! - [`ContactDispatcher`] - 検証から送信までの全体フロー
//! - [`TemplateRenderer`] - tera テンプレートによる本文生成

mod dispatcher;
mod template_renderer;

pub use dispatcher::ContactDispatcher;
pub use template_renderer::TemplateRenderer;
