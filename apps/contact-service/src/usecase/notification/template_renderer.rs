//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンでコンタクト通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名固定**: 件名は常に [`CONTACT_SUBJECT`]
//! - **HTML の自動エスケープ**: `.html` テンプレートはプロフィールの値をエスケープして埋め込む

use folio_domain::{
    contact::{CONTACT_SUBJECT, ContactProfile},
    notification::{EmailMessage, NotificationError, RecipientAddress},
};
use tera::{Context, Tera};

const HTML_TEMPLATE: &str = "contact_details.html";
const TEXT_TEMPLATE: &str = "contact_details.txt";

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`ContactProfile` と宛先から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    HTML_TEMPLATE,
                    include_str!("../../../templates/contact/contact_details.html"),
                ),
                (
                    TEXT_TEMPLATE,
                    include_str!("../../../templates/contact/contact_details.txt"),
                ),
            ])
            .map_err(|e| NotificationError::SendFailed(format!("テンプレート登録失敗: {e}")))?;

        Ok(Self { engine })
    }

    /// 連絡先メールを生成する
    ///
    /// # 引数
    ///
    /// - `profile`: 本文に差し込むプロフィール
    /// - `recipient`: 検証済みの宛先
    pub fn render(
        &self,
        profile: &ContactProfile,
        recipient: &RecipientAddress,
    ) -> Result<EmailMessage, NotificationError> {
        let context = Context::from_serialize(profile)
            .map_err(|e| NotificationError::SendFailed(format!("テンプレート生成失敗: {e}")))?;

        let html_body = self
            .engine
            .render(HTML_TEMPLATE, &context)
            .map_err(|e| NotificationError::SendFailed(format!("テンプレート生成失敗: {e}")))?;

        let text_body = self
            .engine
            .render(TEXT_TEMPLATE, &context)
            .map_err(|e| NotificationError::SendFailed(format!("テンプレート生成失敗: {e}")))?;

        Ok(EmailMessage {
            to: recipient.to_string(),
            subject: CONTACT_SUBJECT.to_string(),
            html_body,
            text_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_profile() -> ContactProfile {
        ContactProfile {
            display_name:  "Jane Doe".to_string(),
            contact_email: "jane@example.com".to_string(),
            phone:         Some("+1 555 0100".to_string()),
            headline:      "Software Developer".to_string(),
        }
    }

    fn make_recipient() -> RecipientAddress {
        RecipientAddress::parse("visitor@example.com").unwrap()
    }

    #[test]
    fn newが正常に初期化される() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.is_ok());
    }

    #[test]
    fn 宛先と固定の件名を設定する() {
        let renderer = TemplateRenderer::new().unwrap();

        let email = renderer.render(&make_profile(), &make_recipient()).unwrap();

        assert_eq!(email.to, "visitor@example.com");
        assert_eq!(email.subject, "Contact Details:");
    }

    #[test]
    fn プレーンテキスト本文に連絡先が含まれる() {
        let renderer = TemplateRenderer::new().unwrap();

        let email = renderer.render(&make_profile(), &make_recipient()).unwrap();

        assert!(email.text_body.starts_with("Hello,\nI'm Jane Doe,\n"));
        assert!(email.text_body.contains("Email: jane@example.com\n"));
        assert!(email.text_body.contains("Phone: +1 555 0100\n"));
        assert!(email.text_body.contains("Best regards,\nJane Doe"));
    }

    #[test]
    fn html本文に連絡先が含まれる() {
        let renderer = TemplateRenderer::new().unwrap();

        let email = renderer.render(&make_profile(), &make_recipient()).unwrap();

        assert!(email.html_body.contains("I'm Jane Doe, Software Developer"));
        assert!(email.html_body.contains("<li>Email: jane@example.com</li>"));
        assert!(email.html_body.contains("<li>Phone: +1 555 0100</li>"));
    }

    #[test]
    fn 電話番号がなければ行ごと省略する() {
        let renderer = TemplateRenderer::new().unwrap();
        let profile = ContactProfile {
            phone: None,
            ..make_profile()
        };

        let email = renderer.render(&profile, &make_recipient()).unwrap();

        assert!(!email.text_body.contains("Phone:"));
        assert!(!email.html_body.contains("Phone:"));
        assert!(email.text_body.contains("Email: jane@example.com\n\nBest regards,"));
    }

    #[test]
    fn html本文ではプロフィールの値をエスケープする() {
        let renderer = TemplateRenderer::new().unwrap();
        let profile = ContactProfile {
            display_name: "<script>alert(1)</script>".to_string(),
            ..make_profile()
        };

        let email = renderer.render(&profile, &make_recipient()).unwrap();

        assert!(!email.html_body.contains("<script>"));
        assert!(email.html_body.contains("&lt;script&gt;"));
        // プレーンテキストはそのまま
        assert!(email.text_body.contains("<script>"));
    }
}
