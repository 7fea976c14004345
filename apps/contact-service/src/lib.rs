//! # Contact Service ライブラリ
//!
//! ポートフォリオサイトのコンタクトフォームから呼ばれ、訪問者に
//! サイトオーナーの連絡先をメールで送る HTTP サービス。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーターとミドルウェアの組み立て
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーと HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `usecase`: 検証から送信までのフロー

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
