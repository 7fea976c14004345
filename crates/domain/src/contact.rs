//! # コンタクトプロフィール
//!
//! コンタクト通知メールの本文に差し込む、サイトオーナーの連絡先情報。

use serde::Serialize;

/// コンタクト通知メールの件名（固定）
pub const CONTACT_SUBJECT: &str = "Contact Details:";

/// サイトオーナーのプロフィール
///
/// テンプレートのコンテキストとしてそのままシリアライズされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactProfile {
    /// 送信者表示名（`From` ヘッダーと署名に使用）
    pub display_name:  String,
    /// 本文に記載する連絡先メールアドレス
    pub contact_email: String,
    /// 本文に記載する電話番号（未設定なら行ごと省略）
    pub phone:         Option<String>,
    /// 自己紹介の一文
    pub headline:      String,
}
