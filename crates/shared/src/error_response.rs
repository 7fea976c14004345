//! # エラーレスポンス
//!
//! コンタクトフォームが解釈する `{ "error": string, "details"?: string }` 形式の
//! エラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - HTTP ステータスは本体に含めない（ステータスラインで表現する）
//! - `details` は非機密の補足情報のみ。未設定時はフィールドごと省略する

use serde::{Deserialize, Serialize};

/// エラーレスポンス
///
/// `error` はフォームにそのまま表示できる短いメッセージ。
/// `details` はサーバー起因エラーの補足（リレーのエラーメッセージ等）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   pub error:   String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub details: Option<String>,
}

impl ErrorResponse {
   /// 補足情報なしのエラーレスポンスを作成する
   pub fn new(error: impl Into<String>) -> Self {
      Self {
         error:   error.into(),
         details: None,
      }
   }

   /// 補足情報付きのエラーレスポンスを作成する
   pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
      Self {
         error:   error.into(),
         details: Some(details.into()),
      }
   }
}

/// 成功レスポンス（`{ "success": true }`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
   pub success: bool,
}

impl SuccessResponse {
   pub fn ok() -> Self {
      Self { success: true }
   }
}
